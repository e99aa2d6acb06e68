// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartReview AI API",
        description = "Geração de avaliações com IA, roteamento por nota e captura de feedback"
    ),
    paths(
        // --- Health ---
        handlers::health::root,
        handlers::health::health_check,
        handlers::health::api_health,
        handlers::health::api_info,
        handlers::health::ai_health,

        // --- Stores ---
        handlers::stores::create_store,
        handlers::stores::list_stores,
        handlers::stores::get_store,
        handlers::stores::update_store,
        handlers::stores::delete_store,
        handlers::stores::update_settings,

        // --- QR Codes ---
        handlers::stores::get_store_by_qr,
        handlers::stores::qr_code_image,
        handlers::stores::add_qr_code,
        handlers::stores::remove_qr_code,
        handlers::stores::list_store_qr_codes,
        handlers::stores::list_qr_mappings,

        // --- Catálogo ---
        handlers::stores::list_services,
        handlers::stores::add_service,
        handlers::stores::remove_service,
        handlers::stores::list_platforms,
        handlers::stores::add_platform,
        handlers::stores::remove_platform,

        // --- Reviews ---
        handlers::reviews::generate_review,
        handlers::reviews::batch_generate,
        handlers::reviews::batch_publish,
        handlers::reviews::create_review,
        handlers::reviews::list_reviews,
        handlers::reviews::list_store_reviews,
        handlers::reviews::get_review,
        handlers::reviews::update_review,
        handlers::reviews::delete_review,
        handlers::reviews::publish_review,
        handlers::reviews::analytics_summary,

        // --- Feedback ---
        handlers::feedback::capture_feedback,
        handlers::feedback::list_feedback,
        handlers::feedback::get_feedback,
        handlers::feedback::improvement_suggestions,
    ),
    components(
        schemas(
            // --- Stores ---
            models::store::Location,
            models::store::Service,
            models::store::Platform,
            models::store::StoreSettings,
            models::store::Store,
            models::store::CreateStorePayload,
            models::store::UpdateStorePayload,
            models::store::QrCodeMapping,

            // --- Reviews ---
            models::review::ReviewType,
            models::review::ReviewSource,
            models::review::ReviewStatus,
            models::review::ReviewMetadata,
            models::review::Review,
            models::review::ReviewLength,
            models::review::ReviewTone,
            models::review::ReviewRequest,
            models::review::CreateReviewPayload,
            models::review::UpdateReviewPayload,

            // --- Geração ---
            models::generation::GenerationResult,
            models::generation::BatchGenerateItem,
            models::generation::BatchPublishItem,
            models::analytics::ReviewAnalytics,

            // --- Feedback ---
            models::feedback::Feedback,
            models::feedback::CaptureFeedbackPayload,
            models::feedback::FeedbackCaptureResponse,
            models::feedback::ImprovementSuggestions,

            // --- Respostas auxiliares ---
            handlers::MessageResponse,
            handlers::health::ServiceStatus,
            handlers::health::HealthStatus,
            handlers::health::ApiHealth,
            handlers::health::ApiInfo,
            handlers::health::AiHealth,
        )
    ),
    tags(
        (name = "Health", description = "Estado do serviço e do provedor de IA"),
        (name = "Stores", description = "Lojas, catálogo de serviços e plataformas"),
        (name = "QR Codes", description = "Mapeamento de QR codes para lojas"),
        (name = "Reviews", description = "Geração, ciclo de vida e analytics de avaliações"),
        (name = "Feedback", description = "Feedback privado de notas baixas")
    )
)]
pub struct ApiDoc;
