// src/models/generation.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::review::Review;

/// Resposta de `POST /reviews/generate`.
/// `success = true` com `review = None` significa "capturar feedback".
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub review: Option<Review>,
    pub error: Option<String>,
    pub suggestions: Vec<String>,
    pub redirect_platforms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchGenerateItem {
    // Ausente quando o item nem pôde ser lido
    pub store_id: Option<Uuid>,
    pub success: bool,
    pub review_id: Option<Uuid>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchPublishItem {
    pub review_id: Option<Uuid>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse<T> {
    pub message: String,
    pub results: Vec<T>,
}
