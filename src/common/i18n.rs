// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::LazyLock;

pub const DEFAULT_LANGUAGE: &str = "en";

// Tabela de mensagens: (chave, inglês, português, japonês).
// `{value}` é substituído pelo dado do erro (id, tipo de plataforma, etc).
const MESSAGES: &[(&str, &str, &str, &str)] = &[
    (
        "validation_error",
        "One or more fields are invalid.",
        "Um ou mais campos são inválidos.",
        "入力内容に誤りがあります。",
    ),
    (
        "store_not_found",
        "Store not found: {value}",
        "Loja não encontrada: {value}",
        "店舗が見つかりません: {value}",
    ),
    (
        "review_not_found",
        "Review not found: {value}",
        "Avaliação não encontrada: {value}",
        "レビューが見つかりません: {value}",
    ),
    (
        "feedback_not_found",
        "Feedback not found: {value}",
        "Feedback não encontrado: {value}",
        "フィードバックが見つかりません: {value}",
    ),
    (
        "qr_code_not_found",
        "Store not found for QR code: {value}",
        "Nenhuma loja vinculada ao QR Code: {value}",
        "QRコードに対応する店舗がありません: {value}",
    ),
    (
        "service_not_found",
        "Service not found: {value}",
        "Serviço não encontrado: {value}",
        "サービスが見つかりません: {value}",
    ),
    (
        "platform_not_found",
        "Platform not found: {value}",
        "Plataforma não encontrada: {value}",
        "プラットフォームが見つかりません: {value}",
    ),
    (
        "duplicate_service",
        "Service already exists: {value}",
        "O serviço '{value}' já existe nesta loja.",
        "サービスは既に存在します: {value}",
    ),
    (
        "duplicate_platform",
        "Platform type already exists: {value}",
        "A plataforma '{value}' já existe nesta loja.",
        "プラットフォームは既に存在します: {value}",
    ),
    (
        "invalid_status_transition",
        "Invalid review status transition: {value}",
        "Transição de status inválida: {value}",
        "レビューのステータスを変更できません: {value}",
    ),
    (
        "provider_error",
        "AI service error: {value}",
        "Erro no serviço de IA: {value}",
        "AIサービスエラー: {value}",
    ),
    (
        "generation_timeout",
        "AI service did not answer in time.",
        "O serviço de IA não respondeu a tempo.",
        "AIサービスがタイムアウトしました。",
    ),
    (
        "internal_error",
        "An unexpected error occurred.",
        "Ocorreu um erro inesperado.",
        "予期しないエラーが発生しました。",
    ),
];

static SHARED: LazyLock<I18nStore> = LazyLock::new(I18nStore::new);

/// Catálogo de mensagens por idioma. Construído uma vez e compartilhado pelo AppState.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> =
            HashMap::new();

        for &(key, en, pt, ja) in MESSAGES {
            messages.entry("en").or_default().insert(key, en);
            messages.entry("pt").or_default().insert(key, pt);
            messages.entry("ja").or_default().insert(key, ja);
        }

        Self { messages }
    }

    /// Instância global usada quando não há AppState (ex: `IntoResponse` de AppError).
    pub fn shared() -> &'static I18nStore {
        &SHARED
    }

    pub fn translate(&self, lang: &str, key: &str, value: &str) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.messages
                    .get(DEFAULT_LANGUAGE)
                    .and_then(|table| table.get(key))
            })
            .copied()
            // Chave desconhecida: devolve a própria chave para facilitar o debug
            .unwrap_or(key);

        template.replace("{value}", value)
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
