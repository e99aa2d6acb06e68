// src/config.rs

use std::{env, fmt::Display, str::FromStr, sync::Arc, time::Duration};

use anyhow::{bail, Context};

use crate::{
    common::i18n::I18nStore,
    db::{FeedbackRepository, ReviewRepository, StoreRepository},
    models::store::{DEFAULT_AI_MODEL, DEFAULT_MIN_RATING_FOR_EXTERNAL},
    services::{
        ai_provider::{OpenAiClient, TextGenerator, DEFAULT_OPENAI_BASE_URL},
        ai_service::{AiService, GenerationSettings},
        QrCodeService, ReviewService,
    },
};

// =============================================================================
//  CONFIGURAÇÃO (variáveis de ambiente)
// =============================================================================

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub openai_temperature: f32,
    pub openai_timeout: Duration,
    pub min_rating_for_external: u8,
    pub review_landing_url: String,
    pub cors_origins: Vec<String>,
    pub seed_sample_data: bool,
}

impl Settings {
    /// Lê o `.env` (se existir) e depois o ambiente do processo.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta as configurações a partir de qualquer fonte chave -> valor.
    /// Valor inválido é erro de inicialização, não cai no padrão.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let settings = Self {
            app_name: text("APP_NAME", "SmartReview AI"),
            app_version: text("APP_VERSION", env!("CARGO_PKG_VERSION")),
            environment: text("APP_ENV", "development"),
            host: text("HOST", "0.0.0.0"),
            port: parse_var(&lookup, "PORT", 8000)?,
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            openai_base_url: text("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_model: text("OPENAI_MODEL", DEFAULT_AI_MODEL),
            openai_max_tokens: parse_var(&lookup, "OPENAI_MAX_TOKENS", 500)?,
            openai_temperature: parse_var(&lookup, "OPENAI_TEMPERATURE", 0.7)?,
            openai_timeout: Duration::from_secs(parse_var(&lookup, "OPENAI_TIMEOUT_SECS", 30)?),
            min_rating_for_external: parse_var(
                &lookup,
                "MIN_RATING_FOR_EXTERNAL",
                DEFAULT_MIN_RATING_FOR_EXTERNAL,
            )?,
            review_landing_url: text("REVIEW_LANDING_URL", "http://localhost:3000/review"),
            cors_origins: text("CORS_ORIGINS", "http://localhost:3000,http://localhost:8000")
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            seed_sample_data: parse_var(&lookup, "SEED_SAMPLE_DATA", true)?,
        };

        if !(1..=5).contains(&settings.min_rating_for_external) {
            bail!(
                "MIN_RATING_FOR_EXTERNAL deve estar entre 1 e 5 (recebido {})",
                settings.min_rating_for_external
            );
        }
        if !(0.0..=2.0).contains(&settings.openai_temperature) {
            bail!("OPENAI_TEMPERATURE deve estar entre 0.0 e 2.0");
        }
        if settings.openai_timeout.is_zero() {
            bail!("OPENAI_TIMEOUT_SECS deve ser maior que zero");
        }

        Ok(settings)
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.openai_model.clone(),
            max_tokens: self.openai_max_tokens,
            temperature: self.openai_temperature,
            timeout: self.openai_timeout,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Valor inválido para {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

// =============================================================================
//  ESTADO DA APLICAÇÃO
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub store_repo: StoreRepository,
    pub review_service: ReviewService,
    pub qr_code_service: QrCodeService,
}

impl AppState {
    /// Estado de produção: cliente OpenAI de verdade.
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let client = OpenAiClient::new(
            settings.openai_base_url.clone(),
            settings.openai_api_key.clone(),
        )
        .context("Falha ao criar o cliente HTTP do provedor de IA")?;

        Self::with_generator(settings, Arc::new(client)).await
    }

    /// Monta o gráfico de dependências com qualquer gerador de texto.
    pub async fn with_generator(
        settings: Settings,
        generator: Arc<dyn TextGenerator>,
    ) -> anyhow::Result<Self> {
        // --- Monta o gráfico de dependências ---
        let store_repo = StoreRepository::new(settings.min_rating_for_external);
        let review_repo = ReviewRepository::new();
        let feedback_repo = FeedbackRepository::new();

        let ai_service = AiService::new(generator, settings.generation_settings());
        let review_service =
            ReviewService::new(store_repo.clone(), review_repo, feedback_repo, ai_service);
        let qr_code_service = QrCodeService::new(settings.review_landing_url.clone());

        if settings.seed_sample_data {
            store_repo
                .seed_sample_data()
                .await
                .context("Falha ao carregar os dados de exemplo")?;
        }

        tracing::info!("✅ Estado da aplicação montado ({})", settings.environment);

        Ok(Self {
            settings: Arc::new(settings),
            i18n_store: Arc::new(I18nStore::new()),
            store_repo,
            review_service,
            qr_code_service,
        })
    }
}
