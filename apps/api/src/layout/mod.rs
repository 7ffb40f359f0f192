// Layout engine: text measurement, pagination, blocks, sections.
// The pass is synchronous and CPU-bound; callers on the async runtime run it inside
// tokio::task::spawn_blocking.

pub mod blocks;
pub mod composer;
pub mod cover_letter;
pub mod font_metrics;
pub mod links;
pub mod page;
pub mod resume;

// Re-export the public API consumed by the render layer and handlers.
pub use composer::{compose, DocumentKind, DocumentSource, LaidOutDocument, LayoutError};
pub use font_metrics::{FontFamily, FontStyle, StandardFonts, TextMeasurer};
pub use links::LinkHitBox;
pub use page::{default_layout_config, DrawOp, LayoutConfig, Page};
