// src/models/feedback.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Feedback privado de um cliente insatisfeito. Nunca é publicado
// e não muda depois de criado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub store_id: Uuid,
    pub rating: u8,
    pub feedback_content: String,
    pub improvement_areas: Vec<String>,
    pub contact_info: Option<String>,
    pub follow_up_required: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureFeedbackPayload {
    pub store_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "rating_out_of_range"))]
    #[schema(example = 2, minimum = 1, maximum = 5)]
    pub rating: u8,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "The waiting time was too long.")]
    pub feedback_content: String,

    #[serde(default)]
    #[schema(example = json!(["waiting time"]))]
    pub improvement_areas: Vec<String>,

    pub contact_info: Option<String>,

    #[serde(default)]
    pub follow_up_required: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCaptureResponse {
    pub message: String,
    pub feedback_id: Uuid,
    // Vazio quando a IA falhou ou a loja não existe mais
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSuggestions {
    pub feedback_id: Uuid,
    pub suggestions: Vec<String>,
}
