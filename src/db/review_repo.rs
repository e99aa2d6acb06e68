// src/db/review_repo.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Page},
    models::review::{
        CreateReviewPayload, Review, ReviewStatus, ReviewType, UpdateReviewPayload,
    },
};

/// Filtros opcionais da listagem. Combinados com "E".
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewFilter {
    pub store_id: Option<Uuid>,
    pub status: Option<ReviewStatus>,
}

impl ReviewFilter {
    fn matches(&self, review: &Review) -> bool {
        self.store_id.is_none_or(|id| review.store_id == id)
            && self.status.is_none_or(|status| review.status == status)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewRepository {
    reviews: Arc<RwLock<HashMap<Uuid, Review>>>,
}

impl ReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarda uma avaliação já montada (ex: a que saiu da geração por IA).
    pub async fn insert(&self, review: Review) -> Review {
        self.reviews
            .write()
            .await
            .insert(review.id, review.clone());

        tracing::info!(review_id = %review.id, store_id = %review.store_id, "Avaliação salva");
        review
    }

    /// Criação manual: o tipo vem da nota e o status nasce `draft`.
    pub async fn create(&self, payload: CreateReviewPayload) -> Review {
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            store_id: payload.store_id,
            rating: payload.rating,
            title: payload.title,
            content: payload.content,
            review_type: ReviewType::from_rating(payload.rating),
            review_source: payload.review_source,
            language: payload.language,
            seo_keywords: payload.seo_keywords,
            metadata: payload.metadata.unwrap_or_default(),
            status: ReviewStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
        };

        self.insert(review).await
    }

    pub async fn find_by_id(&self, review_id: Uuid) -> Option<Review> {
        self.reviews.read().await.get(&review_id).cloned()
    }

    pub async fn update(
        &self,
        review_id: Uuid,
        patch: UpdateReviewPayload,
    ) -> Result<Review, AppError> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get_mut(&review_id)
            .ok_or(AppError::ReviewNotFound(review_id))?;

        // Valida a transição antes de tocar em qualquer campo
        if let Some(next) = patch.status {
            if !review.status.can_transition_to(next) {
                return Err(AppError::InvalidStatusTransition {
                    from: review.status,
                    to: next,
                });
            }
        }

        let now = Utc::now();

        if let Some(rating) = patch.rating {
            review.rating = rating;
            review.review_type = ReviewType::from_rating(rating);
        }
        if let Some(title) = patch.title {
            review.title = title;
        }
        if let Some(content) = patch.content {
            review.content = content;
        }
        if let Some(seo_keywords) = patch.seo_keywords {
            review.seo_keywords = seo_keywords;
        }
        if let Some(metadata) = patch.metadata {
            review.metadata = metadata;
        }
        if let Some(status) = patch.status {
            if status == ReviewStatus::Published && review.published_at.is_none() {
                review.published_at = Some(now);
            }
            review.status = status;
        }
        review.updated_at = now;

        tracing::info!(%review_id, status = %review.status, "Avaliação atualizada");
        Ok(review.clone())
    }

    pub async fn delete(&self, review_id: Uuid) -> Result<(), AppError> {
        match self.reviews.write().await.remove(&review_id) {
            Some(_) => {
                tracing::info!(%review_id, "Avaliação removida");
                Ok(())
            }
            None => Err(AppError::ReviewNotFound(review_id)),
        }
    }

    /// Publica. Repetir a publicação é aceito e renova `published_at`.
    pub async fn publish(&self, review_id: Uuid) -> Result<Review, AppError> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get_mut(&review_id)
            .ok_or(AppError::ReviewNotFound(review_id))?;

        if !review.status.can_transition_to(ReviewStatus::Published) {
            return Err(AppError::InvalidStatusTransition {
                from: review.status,
                to: ReviewStatus::Published,
            });
        }

        let now = Utc::now();
        review.status = ReviewStatus::Published;
        review.published_at = Some(now);
        review.updated_at = now;

        tracing::info!(%review_id, "Avaliação publicada");
        Ok(review.clone())
    }

    /// Mais recentes primeiro; empate resolvido pelo id.
    pub async fn list(&self, filter: ReviewFilter, page: u32, limit: u32) -> Page<Review> {
        let mut reviews = self.snapshot(filter).await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Page::slice(reviews, page, limit)
    }

    /// Cópia das avaliações que passam no filtro, sem ordem definida (usado pelo analytics).
    pub async fn snapshot(&self, filter: ReviewFilter) -> Vec<Review> {
        self.reviews
            .read()
            .await
            .values()
            .filter(|review| filter.matches(review))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::review::{ReviewMetadata, ReviewSource};

    fn payload(store_id: Uuid, rating: u8) -> CreateReviewPayload {
        CreateReviewPayload {
            store_id,
            rating,
            title: "Nice".into(),
            content: "Nice place".into(),
            review_source: ReviewSource::Manual,
            language: "en".into(),
            seo_keywords: vec![],
            metadata: None,
        }
    }

    fn review_at(store_id: Uuid, minutes_ago: i64, status: ReviewStatus) -> Review {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Review {
            id: Uuid::new_v4(),
            store_id,
            rating: 5,
            title: "t".into(),
            content: "c".into(),
            review_type: ReviewType::Positive,
            review_source: ReviewSource::AiGenerated,
            language: "ja".into(),
            seo_keywords: vec![],
            metadata: ReviewMetadata::default(),
            status,
            created_at: at,
            updated_at: at,
            published_at: None,
        }
    }

    #[tokio::test]
    async fn manual_reviews_start_as_draft_with_derived_type() {
        let repo = ReviewRepository::new();
        let review = repo.create(payload(Uuid::new_v4(), 2)).await;

        assert_eq!(review.status, ReviewStatus::Draft);
        assert_eq!(review.review_type, ReviewType::Negative);
        assert!(review.published_at.is_none());
    }

    #[tokio::test]
    async fn changing_rating_rederives_type() {
        let repo = ReviewRepository::new();
        let review = repo.create(payload(Uuid::new_v4(), 2)).await;

        let patch = UpdateReviewPayload {
            rating: Some(5),
            ..Default::default()
        };
        let updated = repo.update(review.id, patch).await.unwrap();

        assert_eq!(updated.review_type, ReviewType::Positive);
    }

    #[tokio::test]
    async fn publish_twice_keeps_it_published_with_newer_timestamp() {
        let repo = ReviewRepository::new();
        let review = repo.create(payload(Uuid::new_v4(), 5)).await;

        let first = repo.publish(review.id).await.unwrap();
        let second = repo.publish(review.id).await.unwrap();

        assert_eq!(second.status, ReviewStatus::Published);
        assert!(second.published_at >= first.published_at);
        assert!(second.published_at.is_some());

        // Só os carimbos de tempo andam
        assert_eq!(second.content, first.content);
        assert_eq!(second.title, first.title);
        assert_eq!(second.rating, first.rating);
        assert_eq!(second.review_type, first.review_type);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn archived_reviews_cannot_be_published() {
        let repo = ReviewRepository::new();
        let review = repo.create(payload(Uuid::new_v4(), 5)).await;
        repo.publish(review.id).await.unwrap();

        let archive = UpdateReviewPayload {
            status: Some(ReviewStatus::Archived),
            ..Default::default()
        };
        repo.update(review.id, archive).await.unwrap();

        let result = repo.publish(review.id).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidStatusTransition {
                from: ReviewStatus::Archived,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn rejected_transition_leaves_review_untouched() {
        let repo = ReviewRepository::new();
        let review = repo.create(payload(Uuid::new_v4(), 4)).await;
        let published = repo.publish(review.id).await.unwrap();

        let patch = UpdateReviewPayload {
            title: Some("changed".into()),
            status: Some(ReviewStatus::Draft),
            ..Default::default()
        };
        assert!(repo.update(review.id, patch).await.is_err());
        assert_eq!(repo.find_by_id(review.id).await, Some(published));
    }

    #[tokio::test]
    async fn publishing_through_update_stamps_published_at() {
        let repo = ReviewRepository::new();
        let review = repo.create(payload(Uuid::new_v4(), 4)).await;

        let patch = UpdateReviewPayload {
            status: Some(ReviewStatus::Published),
            ..Default::default()
        };
        let updated = repo.update(review.id, patch).await.unwrap();
        assert!(updated.published_at.is_some());
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let repo = ReviewRepository::new();
        let store_a = Uuid::new_v4();
        let store_b = Uuid::new_v4();

        let oldest = repo.insert(review_at(store_a, 30, ReviewStatus::Generated)).await;
        let newest = repo.insert(review_at(store_a, 1, ReviewStatus::Generated)).await;
        repo.insert(review_at(store_a, 10, ReviewStatus::Published)).await;
        repo.insert(review_at(store_b, 5, ReviewStatus::Generated)).await;

        let filter = ReviewFilter {
            store_id: Some(store_a),
            status: Some(ReviewStatus::Generated),
        };
        let page = repo.list(filter, 1, 20).await;

        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id, newest.id);
        assert_eq!(page.items[1].id, oldest.id);

        let everything = repo.list(ReviewFilter::default(), 1, 3).await;
        assert_eq!(everything.total, 4);
        assert_eq!(everything.items.len(), 3);
    }

    #[tokio::test]
    async fn delete_missing_review_is_not_found() {
        let repo = ReviewRepository::new();
        assert!(matches!(
            repo.delete(Uuid::new_v4()).await,
            Err(AppError::ReviewNotFound(_))
        ));
    }
}
