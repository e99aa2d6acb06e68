// src/routes.rs

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

/// Monta o router completo: health, lojas, avaliações e Swagger.
pub fn build_router(app_state: AppState) -> Router {
    // Lojas, QR codes e catálogo
    let store_routes = Router::new()
        .route(
            "/",
            post(handlers::stores::create_store).get(handlers::stores::list_stores),
        )
        .route("/admin/qr-mappings", get(handlers::stores::list_qr_mappings))
        .route(
            "/qr/{qr_code}",
            get(handlers::stores::get_store_by_qr).delete(handlers::stores::remove_qr_code),
        )
        .route("/qr/{qr_code}/image", get(handlers::stores::qr_code_image))
        .route(
            "/{store_id}",
            get(handlers::stores::get_store)
                .put(handlers::stores::update_store)
                .delete(handlers::stores::delete_store),
        )
        .route("/{store_id}/qr", get(handlers::stores::list_store_qr_codes))
        .route("/{store_id}/qr/{qr_code}", post(handlers::stores::add_qr_code))
        .route(
            "/{store_id}/services",
            get(handlers::stores::list_services).post(handlers::stores::add_service),
        )
        .route(
            "/{store_id}/services/{service_id}",
            delete(handlers::stores::remove_service),
        )
        .route(
            "/{store_id}/platforms",
            get(handlers::stores::list_platforms).post(handlers::stores::add_platform),
        )
        .route(
            "/{store_id}/platforms/{platform_type}",
            delete(handlers::stores::remove_platform),
        )
        .route("/{store_id}/settings", put(handlers::stores::update_settings));

    // Geração, ciclo de vida, analytics e feedback
    let review_routes = Router::new()
        .route(
            "/",
            post(handlers::reviews::create_review).get(handlers::reviews::list_reviews),
        )
        .route("/generate", post(handlers::reviews::generate_review))
        .route("/batch/generate", post(handlers::reviews::batch_generate))
        .route("/batch/publish", post(handlers::reviews::batch_publish))
        .route("/store/{store_id}", get(handlers::reviews::list_store_reviews))
        .route("/analytics/summary", get(handlers::reviews::analytics_summary))
        .route("/health/ai", get(handlers::health::ai_health))
        .route(
            "/feedback",
            post(handlers::feedback::capture_feedback).get(handlers::feedback::list_feedback),
        )
        .route("/feedback/{feedback_id}", get(handlers::feedback::get_feedback))
        .route(
            "/feedback/{feedback_id}/suggestions",
            get(handlers::feedback::improvement_suggestions),
        )
        .route(
            "/{review_id}",
            get(handlers::reviews::get_review)
                .put(handlers::reviews::update_review)
                .delete(handlers::reviews::delete_review),
        )
        .route("/{review_id}/publish", post(handlers::reviews::publish_review));

    let cors = cors_layer(&app_state.settings.cors_origins);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/health", get(handlers::health::api_health))
        .route("/api/v1/info", get(handlers::health::api_info))
        .nest("/api/v1/stores", store_routes)
        .nest("/api/v1/reviews", review_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

// Origens inválidas são ignoradas com aviso; lista vazia libera qualquer origem.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Origem CORS inválida ignorada: {}", origin);
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}
