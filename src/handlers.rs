// src/handlers.rs

pub mod feedback;
pub mod health;
pub mod reviews;
pub mod stores;

use serde::Serialize;
use utoipa::ToSchema;

/// Resposta simples de confirmação (`DELETE` e afins).
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Store deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
