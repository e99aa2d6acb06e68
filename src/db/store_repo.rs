// src/db/store_repo.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Page},
    models::store::{
        dedup_keywords, CreateStorePayload, Location, Platform, QrCodeMapping, Service, Store,
        StoreSettings, UpdateStorePayload,
    },
};

pub const SAMPLE_QR_CODE: &str = "qr_sample_001";

// Loja e índice de QR ficam atrás do mesmo lock: a remoção em cascata
// acontece numa única escrita.
#[derive(Debug, Default)]
struct StoreTable {
    stores: HashMap<Uuid, Store>,
    qr_codes: HashMap<String, Uuid>,
}

// O repositório de lojas, dono dos registros e do mapeamento QR Code -> loja
#[derive(Debug, Clone)]
pub struct StoreRepository {
    table: Arc<RwLock<StoreTable>>,
    default_settings: StoreSettings,
}

impl StoreRepository {
    /// `default_min_rating` vem da configuração e vale para lojas criadas sem `settings`.
    pub fn new(default_min_rating: u8) -> Self {
        Self {
            table: Arc::new(RwLock::new(StoreTable::default())),
            default_settings: StoreSettings::with_min_rating(default_min_rating),
        }
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    pub async fn create(&self, payload: CreateStorePayload) -> Result<Store, AppError> {
        ensure_unique_services(&payload.services)?;
        ensure_unique_platforms(&payload.platforms)?;

        let now = Utc::now();
        let store = Store {
            id: Uuid::new_v4(),
            name: payload.name,
            name_kana: payload.name_kana,
            description: payload.description,
            location: payload.location,
            services: payload.services,
            seo_keywords: dedup_keywords(payload.seo_keywords),
            platforms: payload.platforms,
            settings: payload
                .settings
                .unwrap_or_else(|| self.default_settings.clone()),
            created_at: now,
            updated_at: now,
        };

        self.table
            .write()
            .await
            .stores
            .insert(store.id, store.clone());

        tracing::info!(store_id = %store.id, "Loja criada");
        Ok(store)
    }

    pub async fn find_by_id(&self, store_id: Uuid) -> Option<Store> {
        self.table.read().await.stores.get(&store_id).cloned()
    }

    /// Resolve o QR Code e depois a loja. Qualquer falha vira `None`.
    pub async fn find_by_qr_code(&self, qr_code: &str) -> Option<Store> {
        let table = self.table.read().await;
        let store_id = table.qr_codes.get(qr_code)?;
        table.stores.get(store_id).cloned()
    }

    pub async fn update(
        &self,
        store_id: Uuid,
        patch: UpdateStorePayload,
    ) -> Result<Store, AppError> {
        if let Some(services) = &patch.services {
            ensure_unique_services(services)?;
        }
        if let Some(platforms) = &patch.platforms {
            ensure_unique_platforms(platforms)?;
        }

        let mut table = self.table.write().await;
        let store = table
            .stores
            .get_mut(&store_id)
            .ok_or(AppError::StoreNotFound(store_id))?;

        // Só sobrescreve o que veio no patch
        if let Some(name) = patch.name {
            store.name = name;
        }
        if let Some(name_kana) = patch.name_kana {
            store.name_kana = Some(name_kana);
        }
        if let Some(description) = patch.description {
            store.description = description;
        }
        if let Some(location) = patch.location {
            store.location = location;
        }
        if let Some(services) = patch.services {
            store.services = services;
        }
        if let Some(seo_keywords) = patch.seo_keywords {
            store.seo_keywords = dedup_keywords(seo_keywords);
        }
        if let Some(platforms) = patch.platforms {
            store.platforms = platforms;
        }
        if let Some(settings) = patch.settings {
            store.settings = settings;
        }
        store.updated_at = Utc::now();

        tracing::info!(%store_id, "Loja atualizada");
        Ok(store.clone())
    }

    /// Remove a loja e, junto, todos os QR Codes que apontavam para ela.
    pub async fn delete(&self, store_id: Uuid) -> Result<(), AppError> {
        let mut table = self.table.write().await;

        if table.stores.remove(&store_id).is_none() {
            return Err(AppError::StoreNotFound(store_id));
        }

        let before = table.qr_codes.len();
        table.qr_codes.retain(|_, mapped| *mapped != store_id);
        let removed_codes = before - table.qr_codes.len();

        tracing::info!(%store_id, removed_codes, "Loja removida");
        Ok(())
    }

    /// Lista com busca opcional, mais recentes primeiro.
    pub async fn list(&self, search: Option<&str>, page: u32, limit: u32) -> Page<Store> {
        let mut stores: Vec<Store> = {
            let table = self.table.read().await;
            table
                .stores
                .values()
                .filter(|store| match search {
                    Some(term) if !term.is_empty() => store.matches_search(term),
                    _ => true,
                })
                .cloned()
                .collect()
        };

        stores.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        Page::slice(stores, page, limit)
    }

    // =========================================================================
    //  QR CODES
    // =========================================================================

    /// Vincula o QR Code à loja. Se o código já existia, passa a apontar para a nova loja.
    pub async fn add_qr_code(
        &self,
        qr_code: &str,
        store_id: Uuid,
    ) -> Result<QrCodeMapping, AppError> {
        let mut table = self.table.write().await;

        if !table.stores.contains_key(&store_id) {
            return Err(AppError::StoreNotFound(store_id));
        }

        if let Some(previous) = table.qr_codes.insert(qr_code.to_string(), store_id) {
            if previous != store_id {
                tracing::warn!(qr_code, %previous, %store_id, "QR Code remapeado para outra loja");
            }
        }

        tracing::info!(qr_code, %store_id, "QR Code vinculado");
        Ok(QrCodeMapping {
            qr_code: qr_code.to_string(),
            store_id,
        })
    }

    pub async fn remove_qr_code(&self, qr_code: &str) -> Result<(), AppError> {
        let removed = self.table.write().await.qr_codes.remove(qr_code);

        match removed {
            Some(_) => {
                tracing::info!(qr_code, "QR Code removido");
                Ok(())
            }
            None => Err(AppError::QrCodeNotFound(qr_code.to_string())),
        }
    }

    pub async fn qr_codes_for_store(&self, store_id: Uuid) -> Result<Vec<String>, AppError> {
        let table = self.table.read().await;

        if !table.stores.contains_key(&store_id) {
            return Err(AppError::StoreNotFound(store_id));
        }

        let mut codes: Vec<String> = table
            .qr_codes
            .iter()
            .filter(|(_, mapped)| **mapped == store_id)
            .map(|(code, _)| code.clone())
            .collect();
        codes.sort();
        Ok(codes)
    }

    /// Todos os mapeamentos (uso administrativo)
    pub async fn all_qr_mappings(&self) -> Vec<QrCodeMapping> {
        let table = self.table.read().await;
        let mut mappings: Vec<QrCodeMapping> = table
            .qr_codes
            .iter()
            .map(|(qr_code, store_id)| QrCodeMapping {
                qr_code: qr_code.clone(),
                store_id: *store_id,
            })
            .collect();
        mappings.sort_by(|a, b| a.qr_code.cmp(&b.qr_code));
        mappings
    }

    // =========================================================================
    //  SERVIÇOS, PLATAFORMAS E CONFIGURAÇÕES
    // =========================================================================

    pub async fn services(&self, store_id: Uuid) -> Result<Vec<Service>, AppError> {
        self.find_by_id(store_id)
            .await
            .map(|store| store.services)
            .ok_or(AppError::StoreNotFound(store_id))
    }

    pub async fn add_service(&self, store_id: Uuid, service: Service) -> Result<Store, AppError> {
        self.modify(store_id, |store| {
            if store.has_service(&service.id) {
                return Err(AppError::DuplicateService(service.id.clone()));
            }
            store.services.push(service);
            Ok(())
        })
        .await
    }

    pub async fn remove_service(&self, store_id: Uuid, service_id: &str) -> Result<Store, AppError> {
        self.modify(store_id, |store| {
            let position = store
                .services
                .iter()
                .position(|s| s.id == service_id)
                .ok_or_else(|| AppError::ServiceNotFound(service_id.to_string()))?;
            store.services.remove(position);
            Ok(())
        })
        .await
    }

    pub async fn platforms(&self, store_id: Uuid) -> Result<Vec<Platform>, AppError> {
        self.find_by_id(store_id)
            .await
            .map(|store| store.platforms)
            .ok_or(AppError::StoreNotFound(store_id))
    }

    pub async fn add_platform(&self, store_id: Uuid, platform: Platform) -> Result<Store, AppError> {
        self.modify(store_id, |store| {
            if store.has_platform(&platform.platform_type) {
                return Err(AppError::DuplicatePlatform(platform.platform_type.clone()));
            }
            store.platforms.push(platform);
            Ok(())
        })
        .await
    }

    pub async fn remove_platform(
        &self,
        store_id: Uuid,
        platform_type: &str,
    ) -> Result<Store, AppError> {
        self.modify(store_id, |store| {
            let position = store
                .platforms
                .iter()
                .position(|p| p.platform_type == platform_type)
                .ok_or_else(|| AppError::PlatformNotFound(platform_type.to_string()))?;
            store.platforms.remove(position);
            Ok(())
        })
        .await
    }

    /// Substitui as configurações inteiras.
    pub async fn update_settings(
        &self,
        store_id: Uuid,
        settings: StoreSettings,
    ) -> Result<Store, AppError> {
        self.modify(store_id, |store| {
            store.settings = settings;
            Ok(())
        })
        .await
    }

    // Aplica a mudança sob o lock de escrita. Se `change` falhar, nada é alterado
    // (as closures acima só mexem na loja depois de validar).
    async fn modify<F>(&self, store_id: Uuid, change: F) -> Result<Store, AppError>
    where
        F: FnOnce(&mut Store) -> Result<(), AppError>,
    {
        let mut table = self.table.write().await;
        let store = table
            .stores
            .get_mut(&store_id)
            .ok_or(AppError::StoreNotFound(store_id))?;

        change(store)?;
        store.updated_at = Utc::now();
        Ok(store.clone())
    }

    // =========================================================================
    //  DADOS DE EXEMPLO
    // =========================================================================

    /// Cria o salão de exemplo e vincula `qr_sample_001` a ele.
    pub async fn seed_sample_data(&self) -> Result<Store, AppError> {
        let payload = CreateStorePayload {
            name: "Sample Beauty Salon".to_string(),
            name_kana: Some("Sample Beauty Salon".to_string()),
            description:
                "A modern beauty salon providing professional services with the latest techniques."
                    .to_string(),
            location: Location {
                address: "Tokyo Shibuya Jinnan 1-15-3".to_string(),
                city: "Shibuya".to_string(),
                prefecture: "Tokyo".to_string(),
                postal_code: "150-0041".to_string(),
                lat: 35.661777,
                lng: 139.700065,
                nearest_station: "JR Shibuya Station".to_string(),
                walking_minutes: Some(5),
            },
            services: vec![
                Service {
                    id: "hair-cut".to_string(),
                    name: "Hair Cut".to_string(),
                    name_en: Some("Hair Cut".to_string()),
                    description: Some("Professional hair cutting service".to_string()),
                    category: Some("Hair Care".to_string()),
                    keywords: vec!["cut".into(), "style".into(), "hair".into()],
                },
                Service {
                    id: "hair-color".to_string(),
                    name: "Hair Color".to_string(),
                    name_en: Some("Hair Color".to_string()),
                    description: Some("Hair coloring with various options".to_string()),
                    category: Some("Hair Care".to_string()),
                    keywords: vec!["color".into(), "dye".into(), "style".into()],
                },
            ],
            seo_keywords: ["beauty salon", "hair salon", "shibuya", "cut", "color", "style", "professional"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            platforms: vec![
                Platform {
                    platform_type: "google".to_string(),
                    url: "https://www.google.com/maps/place/sample-salon".to_string(),
                    is_active: true,
                },
                Platform {
                    platform_type: "hotpepper".to_string(),
                    url: "https://beauty.hotpepper.jp/slnH000000001/".to_string(),
                    is_active: true,
                },
            ],
            settings: Some(StoreSettings {
                available_languages: vec!["ja".into(), "en".into()],
                ..StoreSettings::with_min_rating(4)
            }),
        };

        let store = self.create(payload).await?;
        self.add_qr_code(SAMPLE_QR_CODE, store.id).await?;

        tracing::info!("✅ Dados de exemplo carregados (loja {})", store.id);
        Ok(store)
    }
}

fn ensure_unique_services(services: &[Service]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    match services.iter().find(|s| !seen.insert(s.id.as_str())) {
        Some(duplicate) => Err(AppError::DuplicateService(duplicate.id.clone())),
        None => Ok(()),
    }
}

fn ensure_unique_platforms(platforms: &[Platform]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    match platforms.iter().find(|p| !seen.insert(p.platform_type.as_str())) {
        Some(duplicate) => Err(AppError::DuplicatePlatform(duplicate.platform_type.clone())),
        None => Ok(()),
    }
}
