//! Top-level driver for one document generation: layout pass, backend render, output.
//!
//! `save` is the recovery boundary. Errors and panics raised anywhere below it come
//! back as `false`, and the destination is only written once the full document exists.

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::layout::{compose, DocumentSource, LaidOutDocument, LayoutConfig, LayoutError, TextMeasurer};
use crate::render::{DocumentInfo, RenderBackend, RenderError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] LayoutError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generation panicked: {0}")]
    Panicked(String),
}

/// Holds the layout policy, the measurer and the backend shared by every generation.
#[derive(Clone)]
pub struct DocumentAssembler {
    config: Arc<LayoutConfig>,
    measurer: Arc<dyn TextMeasurer>,
    backend: Arc<dyn RenderBackend>,
}

impl DocumentAssembler {
    pub fn new(
        config: LayoutConfig,
        measurer: Arc<dyn TextMeasurer>,
        backend: Arc<dyn RenderBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            measurer,
            backend,
        }
    }

    /// Layout pass only, without serializing.
    pub fn layout(&self, source: &dyn DocumentSource) -> Result<LaidOutDocument, LayoutError> {
        compose(source, &self.config, self.measurer.as_ref())
    }

    /// Produces the finished document bytes. Panics inside the pass are returned as
    /// `ExportError::Panicked`.
    pub fn generate(&self, source: &dyn DocumentSource) -> Result<Vec<u8>, ExportError> {
        let generation_id = Uuid::new_v4();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run(source)))
            .unwrap_or_else(|payload| Err(ExportError::Panicked(panic_message(payload.as_ref()))));

        match &result {
            Ok(bytes) => info!(
                generation_id = %generation_id,
                kind = ?source.kind(),
                bytes = bytes.len(),
                "Document generated"
            ),
            Err(e) => error!(
                generation_id = %generation_id,
                kind = ?source.kind(),
                "Document generation failed: {e}"
            ),
        }
        result
    }

    /// Generates and writes the document to `path`. Returns whether a usable file now
    /// exists there; on failure the destination is left untouched.
    pub fn save(&self, source: &dyn DocumentSource, path: &Path) -> bool {
        match self.try_save(source, path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), "Export failed: {e}");
                false
            }
        }
    }

    pub fn try_save(&self, source: &dyn DocumentSource, path: &Path) -> Result<(), ExportError> {
        let bytes = self.generate(source)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Written beside the destination so the final rename stays on one filesystem.
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn run(&self, source: &dyn DocumentSource) -> Result<Vec<u8>, ExportError> {
        let document = self.layout(source)?;
        let info = DocumentInfo {
            title: source.title(),
            author: source.author(),
        };
        Ok(self.backend.render(&document, &info)?)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
