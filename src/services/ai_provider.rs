// src/services/ai_provider.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Falha na requisição HTTP: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provedor respondeu {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Resposta do provedor sem conteúdo")]
    EmptyResponse,

    #[error("Chave da API do provedor não configurada")]
    NotConfigured,

    #[error("Provedor não respondeu em {0:?}")]
    Timeout(Duration),
}

/// Uma chamada de geração de texto: papel do sistema + prompt do usuário.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_role: String,
    pub user_prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

/// O colaborador externo que gera texto. O `ReviewService` só conhece esta trait.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Usado pelo health check da IA.
    fn is_configured(&self) -> bool {
        true
    }
}

// --- Formato do /chat/completions ---

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Cliente para qualquer API compatível com o `/chat/completions` da OpenAI.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("⚠️ OPENAI_API_KEY não definida: a geração por IA vai falhar");
        }

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;

        let body = ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage { role: "system", content: &request.system_role },
                ChatMessage { role: "user", content: &request.user_prompt },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
        };

        tracing::debug!(model = %request.model, max_tokens = request.max_tokens, "Chamando o provedor de IA");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Provedor de IA retornou erro");
            return Err(ProviderError::Api { status: status.as_u16(), body });
        }

        let parsed: ChatResponse = response.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_role: "system".into(),
            user_prompt: "prompt".into(),
            model: "gpt-test".into(),
            max_tokens: 500,
            temperature: 0.7,
            top_p: Some(0.9),
            frequency_penalty: None,
            presence_penalty: None,
        }
    }

    #[tokio::test]
    async fn sends_chat_request_and_returns_trimmed_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-test",
                "max_tokens": 500,
                "messages": [
                    { "role": "system", "content": "system" },
                    { "role": "user", "content": "prompt" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  Title: A\nReview: B  " } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("test-key".into())).unwrap();
        let text = client.complete(request()).await.unwrap();

        assert_eq!(text, "Title: A\nReview: B");
    }

    #[tokio::test]
    async fn api_errors_keep_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("k".into())).unwrap();
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 429, ref body } if body == "rate limited"));
    }

    #[tokio::test]
    async fn empty_choices_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("k".into())).unwrap();
        assert!(matches!(
            client.complete(request()).await,
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_out() {
        let client = OpenAiClient::new("http://127.0.0.1:9", None).unwrap();

        assert!(!client.is_configured());
        assert!(matches!(
            client.complete(request()).await,
            Err(ProviderError::NotConfigured)
        ));
    }
}
