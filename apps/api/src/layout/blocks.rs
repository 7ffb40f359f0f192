//! Block vocabulary and the renderer that draws one block at a time at the cursor.
//!
//! Every block asks the page manager for room before it draws. Headings and rows are
//! atomic and stay on the page of the first line that follows them; wrapped text
//! (bullets, paragraphs, labeled wraps) asks line by line, so a long list or paragraph
//! can continue on the next page between two whole lines.

use tracing::debug;

use crate::layout::font_metrics::{FontStyle, TextMeasurer};
use crate::layout::links::{LinkHitBox, LinkRegistry};
use crate::layout::page::{LayoutConfig, Page, PageManager, BASELINE_RATIO};

/// Bullet glyph drawn in front of each list item.
pub const BULLET: &str = "•";

/// Line box height of a single-line row as a multiple of its largest font size.
const LINE_BOX_RATIO: f32 = 1.15;

// ────────────────────────────────────────────────────────────────────────────
// Text runs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub font: FontStyle,
    pub align: Align,
}

/// A string plus its style and optional link target. Built fresh for every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    text: String,
    style: TextStyle,
    url: Option<String>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, size: f32, font: FontStyle) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                size,
                font,
                align: Align::Left,
            },
            url: None,
        }
    }

    pub fn regular(text: impl Into<String>, size: f32) -> Self {
        Self::new(text, size, FontStyle::Regular)
    }

    pub fn bold(text: impl Into<String>, size: f32) -> Self {
        Self::new(text, size, FontStyle::Bold)
    }

    pub fn italic(text: impl Into<String>, size: f32) -> Self {
        Self::new(text, size, FontStyle::Italic)
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.style.align = align;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

/// One independently page-breakable unit of content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Bold uppercase title over a full-width rule.
    Heading(String),
    /// Runs drawn back to back on one line, placed by the first run's alignment.
    Line(Vec<TextRun>),
    /// Adjacent left runs plus an optional run flush with the right margin.
    KeyValueRow {
        left: Vec<TextRun>,
        right: Option<TextRun>,
    },
    /// Bulleted, wrapped items. Blank items are skipped.
    BulletList { items: Vec<String>, size: f32 },
    /// Inline bold label, then text wrapped in the width left after it.
    LabeledWrap {
        label: TextRun,
        text: String,
        width: Option<f32>,
    },
    /// Wrapped text across the full content width.
    Paragraph {
        text: String,
        size: f32,
        font: FontStyle,
    },
    /// Vertical gap. Dropped at the top of a page.
    Spacer(f32),
}

impl Block {
    /// True when rendering the block would draw nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Block::Heading(text) => text.trim().is_empty(),
            Block::Line(runs) => runs.iter().all(TextRun::is_blank),
            Block::KeyValueRow { left, right } => {
                left.iter().all(TextRun::is_blank) && right.as_ref().map_or(true, TextRun::is_blank)
            }
            Block::BulletList { items, .. } => items.iter().all(|i| i.trim().is_empty()),
            Block::LabeledWrap { text, .. } | Block::Paragraph { text, .. } => text.trim().is_empty(),
            Block::Spacer(_) => true,
        }
    }

    /// True for titles that must not end a page: a heading or an entry row.
    pub fn keeps_with_next(&self) -> bool {
        matches!(self, Block::Heading(_) | Block::KeyValueRow { .. })
    }

    /// Minimum vertical room the block needs before it starts drawing.
    pub fn footprint(&self, config: &LayoutConfig) -> f32 {
        let spacing = &config.spacing;
        match self {
            Block::Heading(_) => heading_height(config) + spacing.line_height,
            Block::Line(runs) => line_box_height(config, runs.iter()),
            Block::KeyValueRow { .. }
            | Block::BulletList { .. }
            | Block::LabeledWrap { .. }
            | Block::Paragraph { .. } => spacing.line_height,
            Block::Spacer(_) => 0.0,
        }
    }
}

fn heading_height(config: &LayoutConfig) -> f32 {
    config.type_scale.heading + config.spacing.heading_rule_offset + config.spacing.heading_gap
}

fn line_box_height<'r>(config: &LayoutConfig, runs: impl Iterator<Item = &'r TextRun>) -> f32 {
    let largest = runs.map(|r| r.style.size).fold(0.0_f32, f32::max);
    config.spacing.line_height.max(largest * LINE_BOX_RATIO)
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

/// Draws blocks onto the pages of one generation pass and collects their links.
pub struct BlockRenderer<'a> {
    config: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
    pages: PageManager,
    links: LinkRegistry,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(config: &'a LayoutConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            config,
            measurer,
            pages: PageManager::new(config.page),
            links: LinkRegistry::new(),
        }
    }

    /// Draws `blocks` in order, breaking the page when a block's footprint does not fit.
    /// A heading or row is moved to the next page together with the first line of the
    /// block after it.
    pub fn render(&mut self, blocks: &[Block]) {
        for (i, block) in blocks.iter().enumerate() {
            if !block.is_empty() {
                let needed = self.lookahead(&blocks[i..]);
                self.pages.break_if_needed(needed);
            }
            self.draw(block);
        }
    }

    /// Breaks once up front so that `blocks` land on one page whenever they fit on one.
    pub fn keep_together(&mut self, blocks: &[Block]) {
        let total: f32 = blocks.iter().map(|b| self.height_of(b)).sum();
        self.pages.break_if_needed(total);
    }

    /// Room needed before drawing `blocks[0]`, following chains of kept titles.
    fn lookahead(&self, blocks: &[Block]) -> f32 {
        let Some((first, rest)) = blocks.split_first() else {
            return 0.0;
        };
        let next_drawn = rest.first().is_some_and(|b| !b.is_empty());
        if !first.keeps_with_next() || !next_drawn {
            return first.footprint(self.config);
        }
        let own = match first {
            Block::Heading(_) => heading_height(self.config),
            _ => self.config.spacing.line_height,
        };
        own + self.lookahead(rest)
    }

    /// Full height the block occupies once drawn at the current wrap widths.
    fn height_of(&self, block: &Block) -> f32 {
        if block.is_empty() {
            return match block {
                Block::Spacer(amount) => *amount,
                _ => 0.0,
            };
        }
        let spacing = &self.config.spacing;
        let content_width = self.config.page.content_width();
        let wrapped = |text: &str, width: f32, size: f32, font: FontStyle| {
            self.measurer.wrap(text, width, size, font).len() as f32 * spacing.line_height
        };
        match block {
            Block::Heading(_) => heading_height(self.config),
            Block::Line(runs) => line_box_height(self.config, runs.iter().filter(|r| !r.is_blank())),
            Block::KeyValueRow { .. } => spacing.line_height,
            Block::BulletList { items, size } => items
                .iter()
                .map(|item| wrapped(item.as_str(), content_width - spacing.bullet_indent, *size, FontStyle::Regular))
                .sum(),
            Block::LabeledWrap { label, text, width } => {
                let available = width.unwrap_or(content_width - self.width_of(label));
                wrapped(text.as_str(), available, label.style.size, FontStyle::Regular)
            }
            Block::Paragraph { text, size, font } => wrapped(text.as_str(), content_width, *size, *font),
            Block::Spacer(amount) => *amount,
        }
    }

    fn draw(&mut self, block: &Block) {
        match block {
            Block::Heading(text) => self.heading(text),
            Block::Line(runs) => self.line(runs),
            Block::KeyValueRow { left, right } => self.key_value_row(left, right.as_ref()),
            Block::BulletList { items, size } => self.bullet_list(items, *size),
            Block::LabeledWrap { label, text, width } => self.labeled_wrap(label, text, *width),
            Block::Paragraph { text, size, font } => self.paragraph(text, *size, *font),
            Block::Spacer(amount) => self.spacer(*amount),
        }
    }

    pub fn heading(&mut self, text: &str) {
        let spacing = self.config.spacing;
        let size = self.config.type_scale.heading;
        let height = heading_height(self.config);
        // Keep room for one line of content so the heading is never stranded.
        self.pages.break_if_needed(height + spacing.line_height);

        let top = self.pages.y();
        let run = TextRun::bold(text.trim().to_uppercase(), size);
        self.draw_run(&run, self.config.page.margin_left, top);
        self.pages
            .draw_rule(top + size + spacing.heading_rule_offset, spacing.rule_thickness);
        self.pages.advance(height);
    }

    pub fn line(&mut self, runs: &[TextRun]) {
        let runs: Vec<&TextRun> = runs.iter().filter(|r| !r.is_blank()).collect();
        let Some(first) = runs.first() else {
            return;
        };
        let height = line_box_height(self.config, runs.iter().copied());
        self.pages.break_if_needed(height);

        let total: f32 = runs.iter().map(|r| self.width_of(r)).sum();
        let page = &self.config.page;
        // A line wider than the content area starts at the left margin.
        let mut x = match first.style.align {
            Align::Left => page.margin_left,
            Align::Center => page.margin_left + ((page.content_width() - total) / 2.0).max(0.0),
            Align::Right => (page.content_right() - total).max(page.margin_left),
        };
        let top = self.pages.y();
        for run in runs {
            x += self.draw_run(run, x, top);
        }
        self.pages.advance(height);
    }

    pub fn key_value_row(&mut self, left: &[TextRun], right: Option<&TextRun>) {
        let right = right.filter(|r| !r.is_blank());
        if left.iter().all(TextRun::is_blank) && right.is_none() {
            return;
        }
        let line_height = self.config.spacing.line_height;
        self.pages.break_if_needed(line_height);

        let top = self.pages.y();
        let mut x = self.config.page.margin_left;
        for run in left.iter().filter(|r| !r.is_blank()) {
            x += self.draw_run(run, x, top);
        }
        if let Some(run) = right {
            let x = self.config.page.content_right() - self.width_of(run);
            self.draw_run(run, x, top);
        }
        self.pages.advance(line_height);
    }

    pub fn bullet_list(&mut self, items: &[String], size: f32) {
        let spacing = self.config.spacing;
        let margin = self.config.page.margin_left;
        let width = self.config.page.content_width() - spacing.bullet_indent;

        for item in items {
            let item = item.trim();
            if item.is_empty() {
                debug!("Layout: skipping blank bullet");
                continue;
            }
            let lines = self.measurer.wrap(item, width, size, FontStyle::Regular);
            for (i, line) in lines.iter().enumerate() {
                self.pages.break_if_needed(spacing.line_height);
                let top = self.pages.y();
                if i == 0 {
                    self.draw_run(&TextRun::regular(BULLET, size), margin + spacing.bullet_offset, top);
                }
                self.draw_run(&TextRun::regular(line.as_str(), size), margin + spacing.bullet_indent, top);
                self.pages.advance(spacing.line_height);
            }
        }
    }

    /// `width` overrides the wrap width of the body (default: content width minus label).
    pub fn labeled_wrap(&mut self, label: &TextRun, text: &str, width: Option<f32>) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let line_height = self.config.spacing.line_height;
        let margin = self.config.page.margin_left;
        let label_width = self.width_of(label);
        let body_x = margin + label_width;
        let available = width.unwrap_or(self.config.page.content_width() - label_width);
        let size = label.style.size;

        let lines = self.measurer.wrap(text, available, size, FontStyle::Regular);
        for (i, line) in lines.iter().enumerate() {
            self.pages.break_if_needed(line_height);
            let top = self.pages.y();
            if i == 0 {
                self.draw_run(label, margin, top);
            }
            self.draw_run(&TextRun::regular(line.as_str(), size), body_x, top);
            self.pages.advance(line_height);
        }
    }

    pub fn paragraph(&mut self, text: &str, size: f32, font: FontStyle) {
        let line_height = self.config.spacing.line_height;
        let margin = self.config.page.margin_left;
        let lines = self
            .measurer
            .wrap(text, self.config.page.content_width(), size, font);
        for line in &lines {
            self.pages.break_if_needed(line_height);
            let top = self.pages.y();
            self.draw_run(&TextRun::new(line.as_str(), size, font), margin, top);
            self.pages.advance(line_height);
        }
    }

    pub fn spacer(&mut self, amount: f32) {
        if !self.pages.at_page_top() {
            self.pages.advance(amount);
        }
    }

    pub fn finish(self) -> (Vec<Page>, Vec<LinkHitBox>) {
        (self.pages.into_pages(), self.links.into_boxes())
    }

    fn width_of(&self, run: &TextRun) -> f32 {
        self.measurer
            .measure_width(&run.text, run.style.size, run.style.font)
    }

    /// Draws `run` with its line box starting at `top`; returns the advance width.
    fn draw_run(&mut self, run: &TextRun, x: f32, top: f32) -> f32 {
        if run.text.is_empty() {
            return 0.0;
        }
        let width = self.width_of(run);
        let baseline = top + run.style.size * BASELINE_RATIO;
        self.pages
            .draw_text(x, baseline, &run.text, run.style.font, run.style.size);
        if let Some(url) = run.url() {
            self.links.record(
                self.pages.page_index(),
                x,
                top,
                width,
                self.config.spacing.line_height,
                url,
            );
        }
        width
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
