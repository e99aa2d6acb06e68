// src/services/qr_code_service.rs

use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::QrCode;

use crate::common::error::AppError;

/// Gera as imagens dos QR Codes impressos na loja.
/// Cada código aponta para a página de avaliação: `{landing_url}/{qr_code}`.
#[derive(Debug, Clone)]
pub struct QrCodeService {
    landing_url: String,
}

impl QrCodeService {
    pub fn new(landing_url: impl Into<String>) -> Self {
        Self {
            landing_url: landing_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn landing_url_for(&self, qr_code: &str) -> String {
        format!("{}/{}", self.landing_url, qr_code)
    }

    /// PNG com o QR Code da página de avaliação.
    pub fn render_landing_png(&self, qr_code: &str) -> Result<Vec<u8>, AppError> {
        self.render_png(&self.landing_url_for(qr_code))
    }

    pub fn render_png(&self, data: &str) -> Result<Vec<u8>, AppError> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| AppError::QrCodeRender(e.to_string()))?;

        // Renderiza para imagem em tons de cinza
        let image_buffer = code.render::<Luma<u8>>().min_dimensions(256, 256).build();
        let dynamic_image = DynamicImage::ImageLuma8(image_buffer);

        let mut buffer = Vec::new();
        dynamic_image
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| AppError::QrCodeRender(e.to_string()))?;

        Ok(buffer)
    }
}
