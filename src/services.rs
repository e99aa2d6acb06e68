// src/services.rs

pub mod ai_provider;
pub mod ai_service;
pub mod analytics_service;
pub mod prompt_builder;
pub mod qr_code_service;
pub mod response_parser;
pub mod review_service;

pub use ai_provider::{OpenAiClient, TextGenerator};
pub use ai_service::AiService;
pub use qr_code_service::QrCodeService;
pub use review_service::ReviewService;
