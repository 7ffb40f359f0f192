//! Page geometry, the display list each page carries, and the cursor that walks it.
//!
//! Coordinates are PDF points with the origin at the top-left corner of the page and
//! `y` growing downward. The PDF backend flips to bottom-up coordinates when it
//! serializes the page.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::font_metrics::{FontFamily, FontStyle};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Converts millimetres to points.
pub fn mm(value: f32) -> f32 {
    value * PT_PER_MM
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Physical page size and the margin inset that defines the content rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    /// ISO A4 portrait with the same margin on every side.
    pub fn a4(margin: f32) -> Self {
        Self {
            width: mm(210.0),
            height: mm(297.0),
            margin_top: margin,
            margin_bottom: margin,
            margin_left: margin,
            margin_right: margin,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest `y` any content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.margin_right
    }
}

/// Font sizes per element, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeScale {
    pub name: f32,
    pub letter_name: f32,
    pub heading: f32,
    pub body: f32,
    pub detail: f32,
}

/// Vertical and horizontal spacing, shared by resumes and cover letters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub line_height: f32,
    pub heading_rule_offset: f32,
    pub heading_gap: f32,
    pub rule_thickness: f32,
    pub entry_spacing: f32,
    pub section_spacing: f32,
    pub paragraph_spacing: f32,
    pub bullet_offset: f32,
    pub bullet_indent: f32,
}

/// Everything the layout pass needs besides the data and a measurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub font: FontFamily,
    pub page: PageGeometry,
    pub type_scale: TypeScale,
    pub spacing: Spacing,
}

/// Ratio of font size from the top of a line box down to the baseline.
pub const BASELINE_RATIO: f32 = 0.8;

/// Returns the default layout config for the given font family.
///
/// Assumes: A4, 20mm margins (170mm content width), 11pt body text on a 13pt line.
pub fn default_layout_config(font: FontFamily) -> LayoutConfig {
    LayoutConfig {
        font,
        page: PageGeometry::a4(mm(20.0)),
        type_scale: TypeScale {
            name: 18.0,
            letter_name: 14.0,
            heading: 12.0,
            body: 11.0,
            detail: 10.0,
        },
        spacing: Spacing {
            line_height: 13.0,
            heading_rule_offset: 3.0,
            heading_gap: 6.0,
            rule_thickness: 0.5,
            entry_spacing: 6.0,
            section_spacing: 8.0,
            paragraph_spacing: 8.0,
            bullet_offset: 8.5,
            bullet_indent: 22.0,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Display list
// ────────────────────────────────────────────────────────────────────────────

/// One absolutely-positioned drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `x` is the left edge of the run, `baseline` its baseline.
    Text {
        x: f32,
        baseline: f32,
        text: String,
        style: FontStyle,
        size: f32,
    },
    /// Horizontal rule from `x1` to `x2` at `y`.
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
    },
}

/// A draw surface. Owns nothing but the operations drawn onto it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl Page {
    /// Text of every run on the page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor / page manager
// ────────────────────────────────────────────────────────────────────────────

/// Owns the pages of one layout pass and the vertical write position on the last one.
///
/// Invariant: right after `break_if_needed(h)` returns, `y + h` fits above the bottom
/// margin unless `h` is taller than an entire empty page.
#[derive(Debug)]
pub struct PageManager {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl PageManager {
    /// Starts a pass with a single empty page and the cursor at the top margin.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            y: geometry.margin_top,
        }
    }

    /// Current vertical position (top of the next line box).
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// True when nothing has been written below the top margin of the current page.
    pub fn at_page_top(&self) -> bool {
        self.y <= self.geometry.margin_top
    }

    pub fn advance(&mut self, amount: f32) {
        self.y += amount;
    }

    pub fn would_overflow(&self, needed_height: f32) -> bool {
        self.y + needed_height > self.geometry.content_bottom()
    }

    /// Starts a new page exactly when `needed_height` does not fit. Returns whether it did.
    ///
    /// A fresh page is never abandoned for another fresh page: content taller than the
    /// whole content area is drawn from the top and allowed to run past the margin.
    pub fn break_if_needed(&mut self, needed_height: f32) -> bool {
        if !self.would_overflow(needed_height) || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.geometry.margin_top;
        debug!(page = self.page_index(), "Layout: page break");
    }

    pub fn draw_text(&mut self, x: f32, baseline: f32, text: &str, style: FontStyle, size: f32) {
        self.current_page_mut().ops.push(DrawOp::Text {
            x,
            baseline,
            text: text.to_string(),
            style,
            size,
        });
    }

    /// Full content-width rule at `y`.
    pub fn draw_rule(&mut self, y: f32, thickness: f32) {
        let x1 = self.geometry.margin_left;
        let x2 = self.geometry.content_right();
        self.current_page_mut().ops.push(DrawOp::Rule {
            x1,
            x2,
            y,
            thickness,
        });
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    fn current_page_mut(&mut self) -> &mut Page {
        let idx = self.page_index();
        &mut self.pages[idx]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
