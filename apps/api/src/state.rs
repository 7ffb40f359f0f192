use crate::config::Config;
use crate::render::DocumentAssembler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Layout policy, measurer and PDF backend shared by every generation.
    pub assembler: DocumentAssembler,
}
