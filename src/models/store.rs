// src/models/store.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_STORE_LANGUAGE: &str = "ja";
pub const DEFAULT_AI_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_MIN_RATING_FOR_EXTERNAL: u8 = 4;

fn default_true() -> bool {
    true
}

// ---
// 1. Location (Endereço físico da loja)
// ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[schema(example = "Tokyo Shibuya Jinnan 1-15-3")]
    pub address: String,
    #[schema(example = "Shibuya")]
    pub city: String,
    pub prefecture: String,
    pub postal_code: String,
    pub lat: f64,
    pub lng: f64,
    pub nearest_station: String,
    pub walking_minutes: Option<u32>,
}

// ---
// 2. Service (O que a loja oferece)
// ---
// O `id` é único dentro da loja.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "hair-cut")]
    pub id: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Hair Cut")]
    pub name: String,

    pub name_en: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,

    #[serde(default)]
    #[schema(example = json!(["cut", "style"]))]
    pub keywords: Vec<String>,
}

// ---
// 3. Platform (Site externo de avaliações)
// ---
// O `type` é único dentro da loja (google, hotpepper, tripadvisor...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "google")]
    pub platform_type: String,

    #[validate(url(message = "invalid_url"))]
    #[schema(example = "https://www.google.com/maps/place/sample-salon")]
    pub url: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

// ---
// 4. StoreSettings (Parâmetros da geração)
// ---
// `minRatingForExternal` é obrigatório no JSON: o padrão dele vem da
// configuração (MIN_RATING_FOR_EXTERNAL), não de uma constante.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    #[serde(default = "default_available_languages")]
    #[schema(example = json!(["ja", "en"]))]
    pub available_languages: Vec<String>,

    #[serde(default = "default_store_language")]
    #[schema(example = "ja")]
    pub default_language: String,

    // Nota mínima para mandar o cliente às plataformas externas.
    // Abaixo disso, vira feedback interno.
    #[validate(range(min = 1, max = 5, message = "rating_out_of_range"))]
    #[schema(example = 4, minimum = 1, maximum = 5)]
    pub min_rating_for_external: u8,

    #[serde(default = "default_ai_model")]
    #[schema(example = "gpt-4-turbo-preview")]
    pub ai_model: String,
}

fn default_available_languages() -> Vec<String> {
    vec![DEFAULT_STORE_LANGUAGE.to_string()]
}

fn default_store_language() -> String {
    DEFAULT_STORE_LANGUAGE.to_string()
}

fn default_ai_model() -> String {
    DEFAULT_AI_MODEL.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::with_min_rating(DEFAULT_MIN_RATING_FOR_EXTERNAL)
    }
}

impl StoreSettings {
    pub fn with_min_rating(min_rating_for_external: u8) -> Self {
        Self {
            available_languages: default_available_languages(),
            default_language: default_store_language(),
            min_rating_for_external,
            ai_model: default_ai_model(),
        }
    }

    /// `true` se a nota deve ir para as plataformas externas.
    pub fn routes_externally(&self, rating: u8) -> bool {
        rating >= self.min_rating_for_external
    }
}

// ---
// 5. Store (A loja)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub name_kana: Option<String>,
    pub description: String,
    pub location: Location,
    pub services: Vec<Service>,
    pub seo_keywords: Vec<String>,
    pub platforms: Vec<Platform>,
    pub settings: StoreSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// URLs das plataformas ativas, na ordem cadastrada.
    pub fn active_platform_urls(&self) -> Vec<String> {
        self.platforms
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.url.clone())
            .collect()
    }

    pub fn has_service(&self, service_id: &str) -> bool {
        self.services.iter().any(|s| s.id == service_id)
    }

    pub fn has_platform(&self, platform_type: &str) -> bool {
        self.platforms.iter().any(|p| p.platform_type == platform_type)
    }

    /// Busca case-insensitive em nome, descrição, leitura (kana) e palavras-chave SEO.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();

        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self
                .name_kana
                .as_deref()
                .is_some_and(|kana| kana.to_lowercase().contains(&term))
            || self
                .seo_keywords
                .iter()
                .any(|k| k.to_lowercase().contains(&term))
    }
}

/// Remove palavras-chave repetidas mantendo a primeira ocorrência.
pub fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    keywords
        .into_iter()
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

// --- PAYLOADS ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStorePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Sample Beauty Salon")]
    pub name: String,

    pub name_kana: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub location: Location,

    #[serde(default)]
    #[validate(nested)]
    pub services: Vec<Service>,

    #[serde(default)]
    #[schema(example = json!(["beauty salon", "shibuya"]))]
    pub seo_keywords: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub platforms: Vec<Platform>,

    // Se vier nulo, a loja nasce com as configurações padrão
    #[validate(nested)]
    pub settings: Option<StoreSettings>,
}

/// Patch parcial: só os campos presentes sobrescrevem.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStorePayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub name_kana: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    #[validate(nested)]
    pub services: Option<Vec<Service>>,
    pub seo_keywords: Option<Vec<String>>,
    #[validate(nested)]
    pub platforms: Option<Vec<Platform>>,
    #[validate(nested)]
    pub settings: Option<StoreSettings>,
}

/// Resposta de `GET /qr/{code}/...` e das listagens administrativas de QR.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeMapping {
    pub qr_code: String,
    pub store_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_platforms(platforms: Vec<Platform>) -> Store {
        let now = Utc::now();
        Store {
            id: Uuid::new_v4(),
            name: "Salon".into(),
            name_kana: Some("サロン".into()),
            description: "Hair salon".into(),
            location: Location::default(),
            services: vec![],
            seo_keywords: vec!["Shibuya".into()],
            platforms,
            settings: StoreSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_active_platforms_are_redirect_targets() {
        let store = store_with_platforms(vec![
            Platform { platform_type: "google".into(), url: "https://g".into(), is_active: true },
            Platform { platform_type: "yelp".into(), url: "https://y".into(), is_active: false },
        ]);

        assert_eq!(store.active_platform_urls(), vec!["https://g".to_string()]);
    }

    #[test]
    fn search_is_case_insensitive_over_every_field() {
        let store = store_with_platforms(vec![]);
        assert!(store.matches_search("SALON"));
        assert!(store.matches_search("shibuya"));
        assert!(store.matches_search("サロン"));
        assert!(!store.matches_search("ramen"));
    }

    #[test]
    fn threshold_partitions_the_rating_scale() {
        let settings = StoreSettings::with_min_rating(4);
        assert!(!settings.routes_externally(3));
        assert!(settings.routes_externally(4));
        assert!(settings.routes_externally(5));
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let keywords = vec!["cut".into(), "color".into(), "cut".into()];
        assert_eq!(dedup_keywords(keywords), vec!["cut".to_string(), "color".to_string()]);
    }

    #[test]
    fn platform_type_is_serialized_as_type() {
        let json = serde_json::json!({ "type": "google", "url": "https://g" });
        let platform: Platform = serde_json::from_value(json).unwrap();
        assert_eq!(platform.platform_type, "google");
        assert!(platform.is_active);
    }

    #[test]
    fn settings_require_an_explicit_threshold() {
        let partial = serde_json::json!({ "aiModel": "gpt-4o" });
        assert!(serde_json::from_value::<StoreSettings>(partial).is_err());

        let minimal = serde_json::json!({ "minRatingForExternal": 3 });
        let settings: StoreSettings = serde_json::from_value(minimal).unwrap();
        assert_eq!(settings.min_rating_for_external, 3);
        assert_eq!(settings.default_language, "ja");
        assert_eq!(settings.ai_model, DEFAULT_AI_MODEL);
    }
}
