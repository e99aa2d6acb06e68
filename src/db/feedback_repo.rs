// src/db/feedback_repo.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::pagination::Page,
    models::feedback::{CaptureFeedbackPayload, Feedback},
};

// Feedback é só escrita + leitura: não existe update nem delete.
#[derive(Debug, Clone, Default)]
pub struct FeedbackRepository {
    records: Arc<RwLock<HashMap<Uuid, Feedback>>>,
}

impl FeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, payload: CaptureFeedbackPayload) -> Feedback {
        let feedback = Feedback {
            id: Uuid::new_v4(),
            store_id: payload.store_id,
            rating: payload.rating,
            feedback_content: payload.feedback_content,
            improvement_areas: payload.improvement_areas,
            contact_info: payload.contact_info,
            follow_up_required: payload.follow_up_required,
            created_at: Utc::now(),
        };

        self.records
            .write()
            .await
            .insert(feedback.id, feedback.clone());

        tracing::info!(feedback_id = %feedback.id, store_id = %feedback.store_id, "Feedback registrado");
        feedback
    }

    pub async fn find_by_id(&self, feedback_id: Uuid) -> Option<Feedback> {
        self.records.read().await.get(&feedback_id).cloned()
    }

    pub async fn list(&self, store_id: Option<Uuid>, page: u32, limit: u32) -> Page<Feedback> {
        let mut records: Vec<Feedback> = self
            .records
            .read()
            .await
            .values()
            .filter(|f| store_id.is_none_or(|id| f.store_id == id))
            .cloned()
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Page::slice(records, page, limit)
    }
}
