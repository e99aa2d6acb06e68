// src/services/ai_service.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    models::{
        review::{ReviewMetadata, ReviewRequest},
        store::Store,
    },
    services::{
        ai_provider::{CompletionRequest, ProviderError, TextGenerator},
        prompt_builder::{self, GenerationInstruction},
        response_parser,
    },
};

pub const MAX_SUGGESTIONS: usize = 5;
const SUGGESTION_MAX_TOKENS: u32 = 300;
const SUGGESTION_TEMPERATURE: f32 = 0.7;

pub const FALLBACK_SUGGESTIONS: [&str; 3] = [
    "We sincerely take customer feedback into account and strive to improve our services.",
    "We will strengthen staff training and improve service quality.",
    "We will review facilities and service environment.",
];

/// Parâmetros fixos das chamadas ao provedor, vindos da configuração.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

// ---
// Sentimento
// ---

/// Nota de sentimento (0.0 a 1.0) de uma avaliação gerada.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, rating: u8, content: &str) -> f64;
}

/// Tabela fixa por nota. Ignora o texto.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingTableScorer;

impl SentimentScorer for RatingTableScorer {
    fn score(&self, rating: u8, _content: &str) -> f64 {
        match rating {
            1 => 0.1,
            2 => 0.3,
            3 => 0.5,
            4 => 0.7,
            5 => 0.9,
            _ => 0.5,
        }
    }
}

/// Texto gerado e já interpretado, com os metadados da geração.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReview {
    pub title: String,
    pub content: String,
    pub metadata: ReviewMetadata,
}

#[derive(Clone)]
pub struct AiService {
    generator: Arc<dyn TextGenerator>,
    scorer: Arc<dyn SentimentScorer>,
    settings: GenerationSettings,
}

impl AiService {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: GenerationSettings) -> Self {
        Self::with_scorer(generator, Arc::new(RatingTableScorer), settings)
    }

    pub fn with_scorer(
        generator: Arc<dyn TextGenerator>,
        scorer: Arc<dyn SentimentScorer>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            generator,
            scorer,
            settings,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    pub fn default_model(&self) -> &str {
        &self.settings.model
    }

    /// Modelo da loja; se estiver em branco, o da configuração.
    pub fn model_for(&self, store: &Store) -> String {
        let model = store.settings.ai_model.trim();
        if model.is_empty() {
            self.settings.model.clone()
        } else {
            model.to_string()
        }
    }

    // =========================================================================
    //  AVALIAÇÃO
    // =========================================================================

    /// Uma única chamada ao provedor (sem retry), limitada pelo timeout configurado.
    pub async fn generate_review(
        &self,
        store: &Store,
        request: &ReviewRequest,
    ) -> Result<GeneratedReview, ProviderError> {
        let started = Instant::now();
        let model = self.model_for(store);
        let instruction = prompt_builder::build_review_instruction(store, request);

        let completion = CompletionRequest {
            system_role: instruction.system_role,
            user_prompt: instruction.prompt,
            model: model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            top_p: Some(0.9),
            frequency_penalty: Some(0.3),
            presence_penalty: Some(0.3),
        };

        let raw = self.call(completion).await?;
        let parsed = response_parser::parse_review(&raw);

        let metadata = ReviewMetadata {
            keywords_used: extract_keywords_used(&parsed.content, &store.seo_keywords),
            sentiment_score: Some(self.scorer.score(request.rating, &parsed.content)),
            readability_score: None,
            ai_model_used: Some(model),
            generation_time: Some(started.elapsed().as_secs_f64()),
        };

        tracing::info!(
            store_id = %store.id,
            rating = request.rating,
            keywords_used = metadata.keywords_used.len(),
            "✅ Avaliação gerada pela IA"
        );

        Ok(GeneratedReview {
            title: parsed.title,
            content: parsed.content,
            metadata,
        })
    }

    // =========================================================================
    //  SUGESTÕES DE MELHORIA
    // =========================================================================

    /// Versão que propaga a falha do provedor (usada na captura de feedback).
    pub async fn try_suggest_improvements(
        &self,
        store_name: &str,
        feedback: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let GenerationInstruction { system_role, prompt } =
            prompt_builder::build_suggestion_instruction(store_name, feedback);

        let completion = CompletionRequest {
            system_role,
            user_prompt: prompt,
            model: self.settings.model.clone(),
            max_tokens: SUGGESTION_MAX_TOKENS,
            temperature: SUGGESTION_TEMPERATURE,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        };

        let raw = self.call(completion).await?;
        Ok(parse_suggestions(&raw))
    }

    /// Versão que nunca falha: sem provedor, devolve a lista fixa.
    pub async fn suggest_improvements(&self, store_name: &str, feedback: &str) -> Vec<String> {
        match self.try_suggest_improvements(store_name, feedback).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::error!("Falha ao gerar sugestões de melhoria: {}", e);
                fallback_suggestions()
            }
        }
    }

    async fn call(&self, completion: CompletionRequest) -> Result<String, ProviderError> {
        let timeout = self.settings.timeout;
        tokio::time::timeout(timeout, self.generator.complete(completion))
            .await
            .map_err(|_| ProviderError::Timeout(timeout))?
    }
}

pub fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Palavras-chave SEO da loja que aparecem no texto (sem diferenciar maiúsculas).
pub fn extract_keywords_used(content: &str, seo_keywords: &[String]) -> Vec<String> {
    let content = content.to_lowercase();
    seo_keywords
        .iter()
        .filter(|keyword| content.contains(&keyword.to_lowercase()))
        .cloned()
        .collect()
}

/// Extrai as sugestões do texto do provedor.
///
/// Linhas com marcador (`•`, `-`, `*`) perdem o marcador. Linhas sem marcador
/// só entram se não tiverem `:`, `?` ou `？` (cabeçalhos e perguntas). No máximo cinco.
pub fn parse_suggestions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            // Só o primeiro marcador sai: "**Negrito**" vira "*Negrito**"
            if let Some(rest) = line.strip_prefix(['•', '-', '*']) {
                let suggestion = rest.trim_start();
                (!suggestion.is_empty()).then(|| suggestion.to_string())
            } else if line.contains([':', '?', '？']) {
                None
            } else {
                Some(line.to_string())
            }
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}
