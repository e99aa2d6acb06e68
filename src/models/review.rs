// src/models/review.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    Positive,
    Neutral,
    Negative,
}

impl ReviewType {
    /// Sempre derivado da nota: 4-5 positivo, 3 neutro, 1-2 negativo.
    pub fn from_rating(rating: u8) -> Self {
        match rating {
            r if r >= 4 => ReviewType::Positive,
            3 => ReviewType::Neutral,
            _ => ReviewType::Negative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::Positive => "positive",
            ReviewType::Neutral => "neutral",
            ReviewType::Negative => "negative",
        }
    }

    pub const ALL: [ReviewType; 3] = [ReviewType::Positive, ReviewType::Neutral, ReviewType::Negative];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    AiGenerated,
    UserInput,
    #[default]
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Draft,
    Generated,
    Published,
    Archived,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "draft",
            ReviewStatus::Generated => "generated",
            ReviewStatus::Published => "published",
            ReviewStatus::Archived => "archived",
        }
    }

    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::Draft,
        ReviewStatus::Generated,
        ReviewStatus::Published,
        ReviewStatus::Archived,
    ];

    /// Ciclo de vida: draft/generated -> published -> archived.
    /// Publicado só pode ir para arquivado; arquivado é final.
    pub fn can_transition_to(&self, next: ReviewStatus) -> bool {
        match (self, next) {
            (current, next) if *current == next => true,
            (ReviewStatus::Archived, _) => false,
            (ReviewStatus::Published, ReviewStatus::Archived) => true,
            (ReviewStatus::Published, _) => false,
            _ => true,
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- METADADOS ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewMetadata {
    pub keywords_used: Vec<String>,
    pub sentiment_score: Option<f64>,
    pub readability_score: Option<f64>,
    pub ai_model_used: Option<String>,
    // Em segundos
    pub generation_time: Option<f64>,
}

// --- AVALIAÇÃO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub store_id: Uuid,
    pub rating: u8,
    pub title: String,
    pub content: String,
    pub review_type: ReviewType,
    pub review_source: ReviewSource,
    pub language: String,
    pub seo_keywords: Vec<String>,
    pub metadata: ReviewMetadata,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

// --- PEDIDO DE GERAÇÃO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewLength {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewTone {
    Formal,
    #[default]
    Friendly,
    Casual,
}

fn default_language() -> String {
    "ja".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub store_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "rating_out_of_range"))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: u8,

    #[schema(example = json!(["cut", "color"]))]
    pub service_keywords: Option<Vec<String>>,

    pub custom_prompt: Option<String>,

    #[serde(default = "default_language")]
    #[schema(example = "ja")]
    pub language: String,

    #[serde(default = "default_true")]
    pub include_seo: bool,

    #[serde(default)]
    pub review_length: ReviewLength,

    #[serde(default)]
    pub tone: ReviewTone,
}

impl ReviewRequest {
    /// Pedido com os valores padrão; usado nos testes e no lote.
    pub fn new(store_id: Uuid, rating: u8) -> Self {
        Self {
            store_id,
            rating,
            service_keywords: None,
            custom_prompt: None,
            language: default_language(),
            include_seo: true,
            review_length: ReviewLength::default(),
            tone: ReviewTone::default(),
        }
    }
}

// --- PAYLOADS ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewPayload {
    pub store_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "rating_out_of_range"))]
    pub rating: u8,

    #[validate(length(min = 1, message = "required"))]
    pub title: String,

    #[validate(length(min = 1, message = "required"))]
    pub content: String,

    #[serde(default)]
    pub review_source: ReviewSource,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub seo_keywords: Vec<String>,

    pub metadata: Option<ReviewMetadata>,
}

/// Patch parcial. O tipo da avaliação não entra aqui: ele segue a nota.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewPayload {
    #[validate(range(min = 1, max = 5, message = "rating_out_of_range"))]
    pub rating: Option<u8>,
    #[validate(length(min = 1, message = "required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub content: Option<String>,
    pub seo_keywords: Option<Vec<String>>,
    pub metadata: Option<ReviewMetadata>,
    pub status: Option<ReviewStatus>,
}
