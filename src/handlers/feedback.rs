// src/handlers/feedback.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
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
    middleware::i18n::Locale,
    models::feedback::{
        CaptureFeedbackPayload, Feedback, FeedbackCaptureResponse, ImprovementSuggestions,
    },
};

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct FeedbackListQuery {
    pub store_id: Option<Uuid>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page_must_be_positive"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit_out_of_range"))]
    pub limit: u32,
}

// POST /api/v1/reviews/feedback
#[utoipa::path(
    post,
    path = "/api/v1/reviews/feedback",
    tag = "Feedback",
    request_body = CaptureFeedbackPayload,
    responses(
        (status = 201, description = "Feedback registrado; sugestões quando a IA responde", body = FeedbackCaptureResponse),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn capture_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CaptureFeedbackPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (feedback, suggestions) = app_state.review_service.capture_feedback(payload).await;

    let response = FeedbackCaptureResponse {
        message: "Feedback captured successfully".to_string(),
        feedback_id: feedback.id,
        suggestions,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

// GET /api/v1/reviews/feedback
#[utoipa::path(
    get,
    path = "/api/v1/reviews/feedback",
    tag = "Feedback",
    params(FeedbackListQuery),
    responses(
        (status = 200, description = "Lista paginada de feedbacks", body = Page<Feedback>),
        (status = 400, description = "Paginação inválida")
    )
)]
pub async fn list_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<FeedbackListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let page = app_state
        .review_service
        .list_feedback(query.store_id, query.page, query.limit)
        .await;

    Ok(Json(page))
}

// GET /api/v1/reviews/feedback/{feedback_id}
#[utoipa::path(
    get,
    path = "/api/v1/reviews/feedback/{feedback_id}",
    tag = "Feedback",
    params(("feedback_id" = Uuid, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Feedback", body = Feedback),
        (status = 404, description = "Feedback não encontrado")
    )
)]
pub async fn get_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(feedback_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let feedback = app_state
        .review_service
        .get_feedback(feedback_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(feedback))
}

// GET /api/v1/reviews/feedback/{feedback_id}/suggestions
#[utoipa::path(
    get,
    path = "/api/v1/reviews/feedback/{feedback_id}/suggestions",
    tag = "Feedback",
    params(("feedback_id" = Uuid, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Sugestões de melhoria (lista fixa se a IA falhar)", body = ImprovementSuggestions),
        (status = 404, description = "Feedback ou loja não encontrados")
    )
)]
pub async fn improvement_suggestions(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(feedback_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let suggestions = app_state
        .review_service
        .improvement_suggestions(feedback_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(suggestions))
}
