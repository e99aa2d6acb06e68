use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::review::ReviewStatus,
};

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
// As mensagens do `#[error]` vão para os logs; o cliente recebe a versão traduzida.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Item de lote que não casa com o formato esperado
    #[error("Item de lote malformado: {0}")]
    MalformedBatchItem(String),

    #[error("Loja não encontrada: {0}")]
    StoreNotFound(Uuid),

    #[error("Avaliação não encontrada: {0}")]
    ReviewNotFound(Uuid),

    #[error("Feedback não encontrado: {0}")]
    FeedbackNotFound(Uuid),

    #[error("QR Code não mapeado: {0}")]
    QrCodeNotFound(String),

    #[error("Serviço não encontrado: {0}")]
    ServiceNotFound(String),

    #[error("Plataforma não encontrada: {0}")]
    PlatformNotFound(String),

    #[error("Serviço '{0}' já existe na loja")]
    DuplicateService(String),

    #[error("Plataforma '{0}' já existe na loja")]
    DuplicatePlatform(String),

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: ReviewStatus, to: ReviewStatus },

    // Erros do provedor de IA não passam por aqui: a geração os
    // converte em resultado de falha.
    #[error("Falha ao gerar o QR Code: {0}")]
    QrCodeRender(String),
}

// O formato que sai na resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MalformedBatchItem(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::StoreNotFound(_)
            | AppError::ReviewNotFound(_)
            | AppError::FeedbackNotFound(_)
            | AppError::QrCodeNotFound(_)
            | AppError::ServiceNotFound(_)
            | AppError::PlatformNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateService(_)
            | AppError::DuplicatePlatform(_)
            | AppError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            AppError::QrCodeRender(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no I18nStore.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::MalformedBatchItem(_) => "validation_error",
            AppError::StoreNotFound(_) => "store_not_found",
            AppError::ReviewNotFound(_) => "review_not_found",
            AppError::FeedbackNotFound(_) => "feedback_not_found",
            AppError::QrCodeNotFound(_) => "qr_code_not_found",
            AppError::ServiceNotFound(_) => "service_not_found",
            AppError::PlatformNotFound(_) => "platform_not_found",
            AppError::DuplicateService(_) => "duplicate_service",
            AppError::DuplicatePlatform(_) => "duplicate_platform",
            AppError::InvalidStatusTransition { .. } => "invalid_status_transition",
            AppError::QrCodeRender(_) => "internal_error",
        }
    }

    // Valor interpolado em `{value}` na mensagem traduzida
    fn message_value(&self) -> String {
        match self {
            AppError::StoreNotFound(id)
            | AppError::ReviewNotFound(id)
            | AppError::FeedbackNotFound(id) => id.to_string(),
            AppError::QrCodeNotFound(v)
            | AppError::ServiceNotFound(v)
            | AppError::PlatformNotFound(v)
            | AppError::DuplicateService(v)
            | AppError::DuplicatePlatform(v) => v.clone(),
            AppError::InvalidStatusTransition { from, to } => format!("{} -> {}", from, to),
            _ => String::new(),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status_code();
        let error = i18n.translate(&locale.0, self.message_key(), &self.message_value());

        let details = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        if status.is_server_error() {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Para handlers que não recebem o Locale: responde no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::shared())
            .into_response()
    }
}
