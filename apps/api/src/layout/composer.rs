//! Section composer: walks a document's sections in order and lays them out.
//!
//! A document type only describes its sections as block lists (see `DocumentSource`);
//! heading placement, empty-section suppression and inter-section spacing live here so
//! resumes and cover letters share one spacing policy.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::layout::blocks::{Block, BlockRenderer};
use crate::layout::font_metrics::TextMeasurer;
use crate::layout::links::LinkHitBox;
use crate::layout::page::{LayoutConfig, Page, PageGeometry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn default_filename(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume.pdf",
            DocumentKind::CoverLetter => "cover-letter.pdf",
        }
    }
}

/// A named, optionally omitted group of blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
    /// Space added after the section when it is drawn.
    pub gap_after: f32,
    /// Start the section on a new page rather than split it, when it fits on one.
    pub keep_together: bool,
}

impl Section {
    pub fn new(heading: Option<&str>, blocks: Vec<Block>, gap_after: f32) -> Self {
        Self {
            heading: heading.map(str::to_string),
            blocks,
            gap_after,
            keep_together: false,
        }
    }

    pub fn kept_together(mut self) -> Self {
        self.keep_together = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_empty)
    }
}

/// Anything the composer can lay out: it validates itself and lists its sections.
pub trait DocumentSource {
    fn kind(&self) -> DocumentKind;

    /// Document title for the output's metadata.
    fn title(&self) -> String;

    fn author(&self) -> String;

    /// Rejects input that cannot produce a document. Runs before any page exists.
    fn validate(&self) -> Result<(), LayoutError>;

    /// Sections in drawing order. Blank entries are already filtered out.
    fn sections(&self, config: &LayoutConfig) -> Vec<Section>;
}

/// Result of one layout pass: positioned pages plus the links drawn on them.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub links: Vec<LinkHitBox>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs across all pages, in draw order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

/// Runs one complete layout pass over `source`.
pub fn compose(
    source: &dyn DocumentSource,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Result<LaidOutDocument, LayoutError> {
    source.validate()?;

    let mut renderer = BlockRenderer::new(config, measurer);
    for section in source.sections(config) {
        if section.is_empty() {
            debug!(heading = ?section.heading, "Layout: skipping empty section");
            continue;
        }
        let Section {
            heading,
            mut blocks,
            gap_after,
            keep_together,
        } = section;
        if let Some(heading) = heading {
            blocks.insert(0, Block::Heading(heading));
        }
        if keep_together {
            renderer.keep_together(&blocks);
        }
        renderer.render(&blocks);
        renderer.spacer(gap_after);
    }

    let (pages, links) = renderer.finish();
    let document = LaidOutDocument {
        geometry: config.page,
        pages,
        links,
    };
    debug!(
        pages = document.page_count(),
        links = document.links.len(),
        "Layout: pass complete"
    );
    Ok(document)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
