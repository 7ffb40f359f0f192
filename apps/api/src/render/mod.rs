// Render layer: turns a laid-out document into bytes and drives whole generations.
// The backend is an injected capability so the layout engine never touches PDF objects.

pub mod assembler;
pub mod handlers;
pub mod pdf;

use thiserror::Error;

use crate::layout::LaidOutDocument;

pub use assembler::{DocumentAssembler, ExportError};
pub use pdf::LopdfBackend;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata written into the output document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
}

/// Serializes positioned pages and link regions into a final document.
pub trait RenderBackend: Send + Sync {
    fn render(&self, document: &LaidOutDocument, info: &DocumentInfo) -> Result<Vec<u8>, RenderError>;
}
