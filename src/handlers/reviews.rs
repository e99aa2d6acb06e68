// src/handlers/reviews.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::{default_limit, default_page, Page},
    },
    config::AppState,
    db::ReviewFilter,
    handlers::MessageResponse,
    middleware::i18n::Locale,
    models::{
        analytics::ReviewAnalytics,
        generation::{BatchGenerateItem, BatchPublishItem, BatchResponse, GenerationResult},
        review::{CreateReviewPayload, Review, ReviewRequest, ReviewStatus, UpdateReviewPayload},
    },
    services::review_service::GenerationOutcome,
};

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ReviewListQuery {
    pub store_id: Option<Uuid>,
    pub status: Option<ReviewStatus>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page_must_be_positive"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit_out_of_range"))]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StoreReviewsQuery {
    pub status: Option<ReviewStatus>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page_must_be_positive"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit_out_of_range"))]
    pub limit: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub store_id: Option<Uuid>,
}

// =============================================================================
//  ÁREA 1: GERAÇÃO
// =============================================================================

// POST /api/v1/reviews/generate
#[utoipa::path(
    post,
    path = "/api/v1/reviews/generate",
    tag = "Reviews",
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Resultado da geração (sucesso, feedback ou falha)", body = GenerationResult),
        (status = 400, description = "Pedido inválido")
    )
)]
pub async fn generate_review(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(request): Json<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let outcome = app_state.review_service.generate(&request).await;

    Ok(Json(outcome.into_result(&locale.0, &app_state.i18n_store)))
}

// Converte item a item: um elemento malformado vira falha só dele.
fn parse_batch_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<Result<T, String>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| e.to_string()))
        .collect()
}

// POST /api/v1/reviews/batch/generate
#[utoipa::path(
    post,
    path = "/api/v1/reviews/batch/generate",
    tag = "Reviews",
    request_body = Vec<ReviewRequest>,
    responses((status = 200, description = "Um resultado por pedido, na mesma ordem; itens malformados falham sozinhos", body = BatchResponse<BatchGenerateItem>))
)]
pub async fn batch_generate(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(items): Json<Vec<Value>>,
) -> impl IntoResponse {
    let total = items.len();
    let requests = parse_batch_items::<ReviewRequest>(items);
    let outcomes = app_state.review_service.batch_generate(requests).await;

    let results = outcomes
        .into_iter()
        .map(|(store_id, outcome)| {
            let review_id = match &outcome {
                GenerationOutcome::Generated { review, .. } => Some(review.id),
                _ => None,
            };
            let result = outcome.into_result(&locale.0, &app_state.i18n_store);
            BatchGenerateItem {
                store_id,
                success: result.success,
                review_id,
                error: result.error,
            }
        })
        .collect();

    Json(BatchResponse {
        message: format!("Processed {} review generation requests", total),
        results,
    })
}

// POST /api/v1/reviews/batch/publish
#[utoipa::path(
    post,
    path = "/api/v1/reviews/batch/publish",
    tag = "Reviews",
    request_body = Vec<Uuid>,
    responses((status = 200, description = "Um resultado por avaliação, na mesma ordem; IDs inválidos falham sozinhos", body = BatchResponse<BatchPublishItem>))
)]
pub async fn batch_publish(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(items): Json<Vec<Value>>,
) -> impl IntoResponse {
    let total = items.len();
    let review_ids = parse_batch_items::<Uuid>(items);
    let outcomes = app_state.review_service.batch_publish(review_ids).await;

    let results = outcomes
        .into_iter()
        .map(|(review_id, outcome)| match outcome {
            Ok(_) => BatchPublishItem { review_id, success: true, error: None },
            Err(e) => BatchPublishItem {
                review_id,
                success: false,
                error: Some(e.to_api_error(&locale, &app_state.i18n_store).error),
            },
        })
        .collect();

    Json(BatchResponse {
        message: format!("Processed {} publish requests", total),
        results,
    })
}

// =============================================================================
//  ÁREA 2: CRUD
// =============================================================================

// POST /api/v1/reviews
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = CreateReviewPayload,
    responses(
        (status = 201, description = "Avaliação criada como rascunho", body = Review),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn create_review(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateReviewPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let review = app_state
        .review_service
        .create_review(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(review)))
}

// GET /api/v1/reviews
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Reviews",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Lista paginada, mais recentes primeiro", body = Page<Review>),
        (status = 400, description = "Paginação inválida")
    )
)]
pub async fn list_reviews(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReviewListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let filter = ReviewFilter {
        store_id: query.store_id,
        status: query.status,
    };
    let page = app_state
        .review_service
        .list_reviews(filter, query.page, query.limit)
        .await;

    Ok(Json(page))
}

// GET /api/v1/reviews/store/{store_id}
#[utoipa::path(
    get,
    path = "/api/v1/reviews/store/{store_id}",
    tag = "Reviews",
    params(
        ("store_id" = Uuid, Path, description = "ID da loja"),
        StoreReviewsQuery
    ),
    responses((status = 200, description = "Avaliações da loja", body = Page<Review>))
)]
pub async fn list_store_reviews(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(store_id): Path<Uuid>,
    Query(query): Query<StoreReviewsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let filter = ReviewFilter {
        store_id: Some(store_id),
        status: query.status,
    };
    let page = app_state
        .review_service
        .list_reviews(filter, query.page, query.limit)
        .await;

    Ok(Json(page))
}

// GET /api/v1/reviews/{review_id}
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{review_id}",
    tag = "Reviews",
    params(("review_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação", body = Review),
        (status = 404, description = "Avaliação não encontrada")
    )
)]
pub async fn get_review(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = app_state
        .review_service
        .get_review(review_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(review))
}

// PUT /api/v1/reviews/{review_id}
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{review_id}",
    tag = "Reviews",
    request_body = UpdateReviewPayload,
    params(("review_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação atualizada", body = Review),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Avaliação não encontrada"),
        (status = 409, description = "Transição de status inválida")
    )
)]
pub async fn update_review(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<UpdateReviewPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let review = app_state
        .review_service
        .update_review(review_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(review))
}

// DELETE /api/v1/reviews/{review_id}
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{review_id}",
    tag = "Reviews",
    params(("review_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação removida", body = MessageResponse),
        (status = 404, description = "Avaliação não encontrada")
    )
)]
pub async fn delete_review(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .review_service
        .delete_review(review_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse::new("Review deleted successfully")))
}

// POST /api/v1/reviews/{review_id}/publish
#[utoipa::path(
    post,
    path = "/api/v1/reviews/{review_id}/publish",
    tag = "Reviews",
    params(("review_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação publicada (repetir é permitido)", body = Review),
        (status = 404, description = "Avaliação não encontrada"),
        (status = 409, description = "Avaliação arquivada")
    )
)]
pub async fn publish_review(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = app_state
        .review_service
        .publish_review(review_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(review))
}

// =============================================================================
//  ÁREA 3: ANALYTICS
// =============================================================================

// GET /api/v1/reviews/analytics/summary
#[utoipa::path(
    get,
    path = "/api/v1/reviews/analytics/summary",
    tag = "Reviews",
    params(AnalyticsQuery),
    responses((status = 200, description = "Resumo das avaliações", body = ReviewAnalytics))
)]
pub async fn analytics_summary(
    State(app_state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> impl IntoResponse {
    Json(app_state.review_service.analytics(query.store_id).await)
}
