// src/handlers/health.rs

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    #[schema(example = "SmartReview AI API")]
    pub service: String,
    pub version: String,
    #[schema(example = "healthy")]
    pub status: String,
    pub environment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "healthy")]
    pub status: String,
    pub checks: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiHealth {
    pub status: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiHealth {
    #[schema(example = "available")]
    pub ai_service: String,
    pub openai_configured: bool,
    #[schema(example = "gpt-4-turbo-preview")]
    pub model: String,
}

// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Serviço no ar", body = ServiceStatus))
)]
pub async fn root(State(app_state): State<AppState>) -> Json<ServiceStatus> {
    let settings = &app_state.settings;
    Json(ServiceStatus {
        service: format!("{} API", settings.app_name),
        version: settings.app_version.clone(),
        status: "healthy".to_string(),
        environment: settings.environment.clone(),
    })
}

// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Checagem de saúde", body = HealthStatus))
)]
pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthStatus> {
    let ai_status = if app_state.review_service.ai().is_configured() {
        "ok"
    } else {
        "not_configured"
    };

    let checks = BTreeMap::from([
        ("api".to_string(), "ok".to_string()),
        ("storage".to_string(), "ok".to_string()),
        ("ai_service".to_string(), ai_status.to_string()),
    ]);

    Json(HealthStatus {
        status: "healthy".to_string(),
        checks,
    })
}

// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses((status = 200, description = "Saúde da API v1", body = ApiHealth))
)]
pub async fn api_health(State(app_state): State<AppState>) -> Json<ApiHealth> {
    Json(ApiHealth {
        status: "healthy".to_string(),
        version: app_state.settings.app_version.clone(),
        endpoints: BTreeMap::from([
            ("stores".to_string(), "/api/v1/stores".to_string()),
            ("reviews".to_string(), "/api/v1/reviews".to_string()),
        ]),
    })
}

// GET /api/v1/info
#[utoipa::path(
    get,
    path = "/api/v1/info",
    tag = "Health",
    responses((status = 200, description = "Informações da API", body = ApiInfo))
)]
pub async fn api_info(State(app_state): State<AppState>) -> Json<ApiInfo> {
    let features = [
        "AI review generation using OpenAI",
        "Store management via QR codes",
        "Rating-based review routing",
        "SEO keyword optimization",
        "Feedback capture for low ratings",
        "Review analytics and insights",
    ];

    Json(ApiInfo {
        name: format!("{} API", app_state.settings.app_name),
        version: app_state.settings.app_version.clone(),
        description: "AI-powered review generation system with SEO optimization".to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    })
}

// GET /api/v1/reviews/health/ai
#[utoipa::path(
    get,
    path = "/api/v1/reviews/health/ai",
    tag = "Health",
    responses((status = 200, description = "Estado do provedor de IA", body = AiHealth))
)]
pub async fn ai_health(State(app_state): State<AppState>) -> Json<AiHealth> {
    let ai = app_state.review_service.ai();
    Json(AiHealth {
        ai_service: "available".to_string(),
        openai_configured: ai.is_configured(),
        model: ai.default_model().to_string(),
    })
}
