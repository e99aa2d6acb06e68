// src/handlers/stores.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::{default_limit, default_page, Page},
    },
    config::AppState,
    handlers::MessageResponse,
    middleware::i18n::Locale,
    models::store::{
        CreateStorePayload, Platform, QrCodeMapping, Service, Store, StoreSettings,
        UpdateStorePayload,
    },
};

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StoreListQuery {
    /// Busca em nome, descrição, leitura e palavras-chave
    pub search: Option<String>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page_must_be_positive"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit_out_of_range"))]
    pub limit: u32,
}

// =============================================================================
//  ÁREA 1: CRUD DE LOJAS
// =============================================================================

// POST /api/v1/stores
#[utoipa::path(
    post,
    path = "/api/v1/stores",
    tag = "Stores",
    request_body = CreateStorePayload,
    responses(
        (status = 201, description = "Loja criada", body = Store),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Serviço ou plataforma duplicados")
    )
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateStorePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let store = app_state
        .store_repo
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(store)))
}

// GET /api/v1/stores
#[utoipa::path(
    get,
    path = "/api/v1/stores",
    tag = "Stores",
    params(StoreListQuery),
    responses(
        (status = 200, description = "Lista paginada de lojas", body = Page<Store>),
        (status = 400, description = "Paginação inválida")
    )
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<StoreListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let page = app_state
        .store_repo
        .list(query.search.as_deref(), query.page, query.limit)
        .await;

    Ok(Json(page))
}

// GET /api/v1/stores/{store_id}
#[utoipa::path(
    get,
    path = "/api/v1/stores/{store_id}",
    tag = "Stores",
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Loja encontrada", body = Store),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn get_store(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_repo
        .find_by_id(store_id)
        .await
        .ok_or_else(|| {
            AppError::StoreNotFound(store_id).to_api_error(&locale, &app_state.i18n_store)
        })?;

    Ok(Json(store))
}

// PUT /api/v1/stores/{store_id}
#[utoipa::path(
    put,
    path = "/api/v1/stores/{store_id}",
    tag = "Stores",
    request_body = UpdateStorePayload,
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Loja atualizada", body = Store),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn update_store(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
    Json(payload): Json<UpdateStorePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let store = app_state
        .store_repo
        .update(store_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(store))
}

// DELETE /api/v1/stores/{store_id}
#[utoipa::path(
    delete,
    path = "/api/v1/stores/{store_id}",
    tag = "Stores",
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Loja removida (e seus QR Codes)", body = MessageResponse),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn delete_store(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .store_repo
        .delete(store_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse::new("Store deleted successfully")))
}

// =============================================================================
//  ÁREA 2: QR CODES
// =============================================================================

// GET /api/v1/stores/qr/{qr_code}
#[utoipa::path(
    get,
    path = "/api/v1/stores/qr/{qr_code}",
    tag = "QR Codes",
    params(("qr_code" = String, Path, description = "Código impresso na loja")),
    responses(
        (status = 200, description = "Loja do QR Code", body = Store),
        (status = 404, description = "QR Code sem loja")
    )
)]
pub async fn get_store_by_qr(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(qr_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_repo
        .find_by_qr_code(&qr_code)
        .await
        .ok_or_else(|| {
            AppError::QrCodeNotFound(qr_code.clone()).to_api_error(&locale, &app_state.i18n_store)
        })?;

    Ok(Json(store))
}

// GET /api/v1/stores/qr/{qr_code}/image
#[utoipa::path(
    get,
    path = "/api/v1/stores/qr/{qr_code}/image",
    tag = "QR Codes",
    params(("qr_code" = String, Path, description = "Código impresso na loja")),
    responses(
        (status = 200, description = "PNG com o link da página de avaliação", content_type = "image/png"),
        (status = 404, description = "QR Code sem loja")
    )
)]
pub async fn qr_code_image(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(qr_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // Só gera imagem de código vinculado
    if app_state.store_repo.find_by_qr_code(&qr_code).await.is_none() {
        return Err(AppError::QrCodeNotFound(qr_code).to_api_error(&locale, &app_state.i18n_store));
    }

    let png = app_state
        .qr_code_service
        .render_landing_png(&qr_code)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

// POST /api/v1/stores/{store_id}/qr/{qr_code}
#[utoipa::path(
    post,
    path = "/api/v1/stores/{store_id}/qr/{qr_code}",
    tag = "QR Codes",
    params(
        ("store_id" = Uuid, Path, description = "ID da loja"),
        ("qr_code" = String, Path, description = "Código a vincular")
    ),
    responses(
        (status = 201, description = "QR Code vinculado", body = QrCodeMapping),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn add_qr_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((store_id, qr_code)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let mapping = app_state
        .store_repo
        .add_qr_code(&qr_code, store_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(mapping)))
}

// DELETE /api/v1/stores/qr/{qr_code}
#[utoipa::path(
    delete,
    path = "/api/v1/stores/qr/{qr_code}",
    tag = "QR Codes",
    params(("qr_code" = String, Path, description = "Código a desvincular")),
    responses(
        (status = 200, description = "QR Code removido", body = MessageResponse),
        (status = 404, description = "QR Code sem loja")
    )
)]
pub async fn remove_qr_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(qr_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .store_repo
        .remove_qr_code(&qr_code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse::new("QR code mapping removed successfully")))
}

// GET /api/v1/stores/{store_id}/qr
#[utoipa::path(
    get,
    path = "/api/v1/stores/{store_id}/qr",
    tag = "QR Codes",
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Códigos da loja", body = Vec<String>),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn list_store_qr_codes(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let codes = app_state
        .store_repo
        .qr_codes_for_store(store_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(codes))
}

// GET /api/v1/stores/admin/qr-mappings
#[utoipa::path(
    get,
    path = "/api/v1/stores/admin/qr-mappings",
    tag = "QR Codes",
    responses((status = 200, description = "Todos os vínculos QR -> loja", body = Vec<QrCodeMapping>))
)]
pub async fn list_qr_mappings(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.store_repo.all_qr_mappings().await)
}

// =============================================================================
//  ÁREA 3: SERVIÇOS E PLATAFORMAS
// =============================================================================

// GET /api/v1/stores/{store_id}/services
#[utoipa::path(
    get,
    path = "/api/v1/stores/{store_id}/services",
    tag = "Stores",
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Serviços da loja", body = Vec<Service>),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .store_repo
        .services(store_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(services))
}

// POST /api/v1/stores/{store_id}/services
#[utoipa::path(
    post,
    path = "/api/v1/stores/{store_id}/services",
    tag = "Stores",
    request_body = Service,
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 201, description = "Serviço adicionado", body = Store),
        (status = 404, description = "Loja não encontrada"),
        (status = 409, description = "Serviço já existe")
    )
)]
pub async fn add_service(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
    Json(service): Json<Service>,
) -> Result<impl IntoResponse, ApiError> {
    service
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let store = app_state
        .store_repo
        .add_service(store_id, service)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(store)))
}

// DELETE /api/v1/stores/{store_id}/services/{service_id}
#[utoipa::path(
    delete,
    path = "/api/v1/stores/{store_id}/services/{service_id}",
    tag = "Stores",
    params(
        ("store_id" = Uuid, Path, description = "ID da loja"),
        ("service_id" = String, Path, description = "ID do serviço")
    ),
    responses(
        (status = 200, description = "Serviço removido", body = Store),
        (status = 404, description = "Loja ou serviço não encontrados")
    )
)]
pub async fn remove_service(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((store_id, service_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_repo
        .remove_service(store_id, &service_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(store))
}

// GET /api/v1/stores/{store_id}/platforms
#[utoipa::path(
    get,
    path = "/api/v1/stores/{store_id}/platforms",
    tag = "Stores",
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Plataformas da loja", body = Vec<Platform>),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn list_platforms(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let platforms = app_state
        .store_repo
        .platforms(store_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(platforms))
}

// POST /api/v1/stores/{store_id}/platforms
#[utoipa::path(
    post,
    path = "/api/v1/stores/{store_id}/platforms",
    tag = "Stores",
    request_body = Platform,
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 201, description = "Plataforma adicionada", body = Store),
        (status = 400, description = "URL inválida"),
        (status = 404, description = "Loja não encontrada"),
        (status = 409, description = "Tipo de plataforma já existe")
    )
)]
pub async fn add_platform(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
    Json(platform): Json<Platform>,
) -> Result<impl IntoResponse, ApiError> {
    platform
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let store = app_state
        .store_repo
        .add_platform(store_id, platform)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(store)))
}

// DELETE /api/v1/stores/{store_id}/platforms/{platform_type}
#[utoipa::path(
    delete,
    path = "/api/v1/stores/{store_id}/platforms/{platform_type}",
    tag = "Stores",
    params(
        ("store_id" = Uuid, Path, description = "ID da loja"),
        ("platform_type" = String, Path, description = "Tipo da plataforma (google, hotpepper...)")
    ),
    responses(
        (status = 200, description = "Plataforma removida", body = Store),
        (status = 404, description = "Loja ou plataforma não encontradas")
    )
)]
pub async fn remove_platform(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((store_id, platform_type)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_repo
        .remove_platform(store_id, &platform_type)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(store))
}

// PUT /api/v1/stores/{store_id}/settings
#[utoipa::path(
    put,
    path = "/api/v1/stores/{store_id}/settings",
    tag = "Stores",
    request_body = StoreSettings,
    params(("store_id" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Configurações substituídas", body = Store),
        (status = 400, description = "Configuração inválida"),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
    Json(settings): Json<StoreSettings>,
) -> Result<impl IntoResponse, ApiError> {
    settings
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let store = app_state
        .store_repo
        .update_settings(store_id, settings)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(store))
}
