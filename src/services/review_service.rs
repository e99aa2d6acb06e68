// src/services/review_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, i18n::I18nStore, pagination::Page},
    db::{FeedbackRepository, ReviewFilter, ReviewRepository, StoreRepository},
    models::{
        analytics::ReviewAnalytics,
        feedback::{CaptureFeedbackPayload, Feedback, ImprovementSuggestions},
        generation::GenerationResult,
        review::{
            CreateReviewPayload, Review, ReviewRequest, ReviewSource, ReviewStatus, ReviewType,
            UpdateReviewPayload,
        },
    },
    services::{ai_provider::ProviderError, ai_service::AiService, analytics_service},
};

pub const LOW_RATING_SUGGESTIONS: [&str; 2] = [
    "This is a low rating review. Please provide feedback for improvement.",
    "Your valuable feedback will be used to improve our services.",
];

// =============================================================================
//  RESULTADO DA GERAÇÃO
// =============================================================================

/// Por que a geração não produziu nada.
#[derive(Debug)]
pub enum GenerationFailure {
    StoreNotFound(Uuid),
    InvalidRequest(validator::ValidationErrors),
    Malformed(String),
    Provider(ProviderError),
}

impl GenerationFailure {
    /// Mensagem traduzida para o campo `error` do resultado.
    pub fn message(&self, lang: &str, i18n: &I18nStore) -> String {
        match self {
            GenerationFailure::StoreNotFound(id) => {
                i18n.translate(lang, "store_not_found", &id.to_string())
            }
            GenerationFailure::InvalidRequest(_) | GenerationFailure::Malformed(_) => {
                i18n.translate(lang, "validation_error", "")
            }
            GenerationFailure::Provider(ProviderError::Timeout(_)) => {
                i18n.translate(lang, "generation_timeout", "")
            }
            GenerationFailure::Provider(e) => i18n.translate(lang, "provider_error", &e.to_string()),
        }
    }
}

/// Os três desfechos possíveis de um pedido de geração.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Nota alta: avaliação gerada e salva, com as plataformas para redirecionar.
    Generated {
        review: Review,
        redirect_platforms: Vec<String>,
    },
    /// Nota abaixo do limite da loja: nada é gerado, o cliente vai para o feedback.
    CaptureFeedback { suggestions: Vec<String> },
    Failed(GenerationFailure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, GenerationOutcome::Failed(_))
    }

    pub fn into_result(self, lang: &str, i18n: &I18nStore) -> GenerationResult {
        match self {
            GenerationOutcome::Generated { review, redirect_platforms } => GenerationResult {
                success: true,
                review: Some(review),
                error: None,
                suggestions: vec![],
                redirect_platforms,
            },
            GenerationOutcome::CaptureFeedback { suggestions } => GenerationResult {
                success: true,
                review: None,
                error: None,
                suggestions,
                redirect_platforms: vec![],
            },
            GenerationOutcome::Failed(failure) => GenerationResult {
                success: false,
                review: None,
                error: Some(failure.message(lang, i18n)),
                suggestions: vec![],
                redirect_platforms: vec![],
            },
        }
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct ReviewService {
    stores: StoreRepository,
    reviews: ReviewRepository,
    feedback: FeedbackRepository,
    ai: AiService,
}

impl ReviewService {
    pub fn new(
        stores: StoreRepository,
        reviews: ReviewRepository,
        feedback: FeedbackRepository,
        ai: AiService,
    ) -> Self {
        Self { stores, reviews, feedback, ai }
    }

    pub fn ai(&self) -> &AiService {
        &self.ai
    }

    // -------------------------------------------------------------------------
    //  GERAÇÃO
    // -------------------------------------------------------------------------

    /// Decide entre feedback e IA, e gera a avaliação quando for o caso.
    /// Nenhum erro do provedor escapa daqui: vira `GenerationOutcome::Failed`.
    pub async fn generate(&self, request: &ReviewRequest) -> GenerationOutcome {
        // 1. Busca a loja (o lock é solto antes da chamada à IA)
        let Some(store) = self.stores.find_by_id(request.store_id).await else {
            tracing::warn!(store_id = %request.store_id, "Geração pedida para loja inexistente");
            return GenerationOutcome::Failed(GenerationFailure::StoreNotFound(request.store_id));
        };

        // 2. Nota abaixo do limite: sem IA, sem avaliação
        if !store.settings.routes_externally(request.rating) {
            tracing::info!(
                store_id = %store.id,
                rating = request.rating,
                threshold = store.settings.min_rating_for_external,
                "Nota baixa: direcionando para feedback"
            );
            return GenerationOutcome::CaptureFeedback {
                suggestions: LOW_RATING_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            };
        }

        // 3. Chamada ao provedor
        let generated = match self.ai.generate_review(&store, request).await {
            Ok(generated) => generated,
            Err(e) => {
                tracing::error!(store_id = %store.id, "Falha na geração da avaliação: {}", e);
                return GenerationOutcome::Failed(GenerationFailure::Provider(e));
            }
        };

        // 4. Só grava depois que a geração terminou
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            store_id: store.id,
            rating: request.rating,
            title: generated.title,
            content: generated.content,
            review_type: ReviewType::from_rating(request.rating),
            review_source: ReviewSource::AiGenerated,
            language: request.language.clone(),
            seo_keywords: if request.include_seo {
                store.seo_keywords.clone()
            } else {
                vec![]
            },
            metadata: generated.metadata,
            status: ReviewStatus::Generated,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        let review = self.reviews.insert(review).await;

        GenerationOutcome::Generated {
            review,
            redirect_platforms: store.active_platform_urls(),
        }
    }

    /// Processa em ordem; a falha de um item não interrompe os outros.
    /// Cada item chega já convertido, ou com o motivo de não ter sido.
    pub async fn batch_generate(
        &self,
        requests: Vec<Result<ReviewRequest, String>>,
    ) -> Vec<(Option<Uuid>, GenerationOutcome)> {
        let mut results = Vec::with_capacity(requests.len());

        for (index, item) in requests.into_iter().enumerate() {
            let result = match item {
                Ok(request) => {
                    let outcome = match request.validate() {
                        Ok(()) => self.generate(&request).await,
                        Err(e) => GenerationOutcome::Failed(GenerationFailure::InvalidRequest(e)),
                    };
                    (Some(request.store_id), outcome)
                }
                Err(reason) => {
                    tracing::warn!(index, "Item de lote malformado: {}", reason);
                    (None, GenerationOutcome::Failed(GenerationFailure::Malformed(reason)))
                }
            };
            results.push(result);
        }

        let succeeded = results.iter().filter(|(_, o)| o.is_success()).count();
        tracing::info!(total = results.len(), succeeded, "Lote de geração processado");
        results
    }

    pub async fn batch_publish(
        &self,
        review_ids: Vec<Result<Uuid, String>>,
    ) -> Vec<(Option<Uuid>, Result<Review, AppError>)> {
        let mut results = Vec::with_capacity(review_ids.len());
        for item in review_ids {
            let result = match item {
                Ok(review_id) => (Some(review_id), self.reviews.publish(review_id).await),
                Err(reason) => (None, Err(AppError::MalformedBatchItem(reason))),
            };
            results.push(result);
        }
        results
    }

    // -------------------------------------------------------------------------
    //  CRUD DE AVALIAÇÕES
    // -------------------------------------------------------------------------

    pub async fn create_review(&self, payload: CreateReviewPayload) -> Result<Review, AppError> {
        if self.stores.find_by_id(payload.store_id).await.is_none() {
            return Err(AppError::StoreNotFound(payload.store_id));
        }
        Ok(self.reviews.create(payload).await)
    }

    pub async fn get_review(&self, review_id: Uuid) -> Result<Review, AppError> {
        self.reviews
            .find_by_id(review_id)
            .await
            .ok_or(AppError::ReviewNotFound(review_id))
    }

    pub async fn update_review(
        &self,
        review_id: Uuid,
        patch: UpdateReviewPayload,
    ) -> Result<Review, AppError> {
        self.reviews.update(review_id, patch).await
    }

    pub async fn delete_review(&self, review_id: Uuid) -> Result<(), AppError> {
        self.reviews.delete(review_id).await
    }

    pub async fn publish_review(&self, review_id: Uuid) -> Result<Review, AppError> {
        self.reviews.publish(review_id).await
    }

    pub async fn list_reviews(&self, filter: ReviewFilter, page: u32, limit: u32) -> Page<Review> {
        self.reviews.list(filter, page, limit).await
    }

    pub async fn analytics(&self, store_id: Option<Uuid>) -> ReviewAnalytics {
        let reviews = self
            .reviews
            .snapshot(ReviewFilter { store_id, status: None })
            .await;
        analytics_service::summarize(&reviews, Utc::now())
    }

    // -------------------------------------------------------------------------
    //  FEEDBACK
    // -------------------------------------------------------------------------

    /// Grava o feedback e tenta gerar sugestões. Se a IA falhar, o feedback
    /// continua gravado e as sugestões voltam vazias.
    pub async fn capture_feedback(
        &self,
        payload: CaptureFeedbackPayload,
    ) -> (Feedback, Vec<String>) {
        let feedback = self.feedback.create(payload).await;

        let Some(store) = self.stores.find_by_id(feedback.store_id).await else {
            tracing::warn!(store_id = %feedback.store_id, "Feedback de loja inexistente; sem sugestões");
            return (feedback, vec![]);
        };

        let suggestions = match self
            .ai
            .try_suggest_improvements(&store.name, &feedback.feedback_content)
            .await
        {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::error!(feedback_id = %feedback.id, "Sugestões não geradas: {}", e);
                vec![]
            }
        };

        (feedback, suggestions)
    }

    pub async fn get_feedback(&self, feedback_id: Uuid) -> Result<Feedback, AppError> {
        self.feedback
            .find_by_id(feedback_id)
            .await
            .ok_or(AppError::FeedbackNotFound(feedback_id))
    }

    pub async fn list_feedback(&self, store_id: Option<Uuid>, page: u32, limit: u32) -> Page<Feedback> {
        self.feedback.list(store_id, page, limit).await
    }

    /// Sugestões sob demanda para um feedback já gravado (com lista fixa se a IA falhar).
    pub async fn improvement_suggestions(
        &self,
        feedback_id: Uuid,
    ) -> Result<ImprovementSuggestions, AppError> {
        let feedback = self.get_feedback(feedback_id).await?;
        let store = self
            .stores
            .find_by_id(feedback.store_id)
            .await
            .ok_or(AppError::StoreNotFound(feedback.store_id))?;

        let suggestions = self
            .ai
            .suggest_improvements(&store.name, &feedback.feedback_content)
            .await;

        Ok(ImprovementSuggestions { feedback_id, suggestions })
    }
}
