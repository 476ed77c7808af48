//! Poster rendering: an HTML rendition through tera and a print-ready PDF
//! laid out directly with pdf-writer.

pub mod context;
pub mod html;
pub mod paper;
pub mod pdf;
pub mod qr_codes;
pub mod text;

use std::path::Path;

use tracing::info;

pub use context::{PosterContext, PosterInput};

use crate::db::enums::SectionType;
use html::HtmlRenderer;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Invalid paper size: {0}")]
    InvalidSize(String),
    #[error("QR code generation failed: {0}")]
    QrCode(String),
    #[error("Template rendering failed: {0}")]
    Rendering(String),
    #[error("PDF generation failed: {0}")]
    Generation(String),
}

pub struct PosterPdfGenerator {
    html: HtmlRenderer,
    dpi: u32,
}

impl PosterPdfGenerator {
    pub fn new(dpi: u32) -> Result<Self, PdfError> {
        Ok(Self { html: HtmlRenderer::new()?, dpi })
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn build_context(&self, mut input: PosterInput<'_>) -> PosterContext {
        input.dpi = self.dpi;
        PosterContext::build(&input)
    }

    pub fn render_html(&self, ctx: &PosterContext) -> Result<String, PdfError> {
        self.html.render(ctx)
    }

    /// Renders the full poster. The HTML rendition is produced first so a
    /// broken template fails the request instead of yielding a partial PDF.
    pub fn generate_poster(&self, input: PosterInput<'_>) -> Result<Vec<u8>, PdfError> {
        let ctx = self.build_context(input);
        self.render_html(&ctx)?;
        let bytes = pdf::render_poster(&ctx);
        info!(
            beach = %ctx.beach_name,
            template = %ctx.template_type,
            size = %ctx.size,
            bytes = bytes.len(),
            "poster PDF rendered"
        );
        Ok(bytes)
    }

    pub fn generate_section(
        &self,
        input: PosterInput<'_>,
        section: SectionType,
    ) -> Result<Vec<u8>, PdfError> {
        let ctx = self.build_context(input);
        Ok(pdf::render_section(&ctx, section))
    }
}

/// Writes a rendered PDF, creating parent directories.
pub async fn save_pdf(path: &Path, bytes: &[u8]) -> Result<(), PdfError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PdfError::Generation(format!("creating {}: {e}", parent.display())))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| PdfError::Generation(format!("writing {}: {e}", path.display())))
}
