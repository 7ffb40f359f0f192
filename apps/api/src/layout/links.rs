//! Clickable link regions recorded alongside the text they cover.

use serde::Serialize;

/// A rectangular clickable region on one page, in top-left-origin points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkHitBox {
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub url: String,
}

#[cfg(test)]
impl LinkHitBox {
    /// True when the point lies inside the box (edges included).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Hit boxes collected during one generation pass.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    boxes: Vec<LinkHitBox>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, page_index: usize, x: f32, y: f32, width: f32, height: f32, url: &str) {
        self.boxes.push(LinkHitBox {
            page_index,
            x,
            y,
            width,
            height,
            url: url.to_string(),
        });
    }

    pub fn into_boxes(self) -> Vec<LinkHitBox> {
        self.boxes
    }
}

// ────────────────────────────────────────────────────────────────────────────
// URL helpers
// ────────────────────────────────────────────────────────────────────────────

/// Profile prefixes stripped from display text, after scheme and `www.` are gone.
const PLATFORM_PREFIXES: &[&str] = &["linkedin.com/in/", "github.com/"];

/// Prepends `https://` to a URL that has no scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if scheme_len(trimmed).is_some() {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Short text shown for a link: scheme, `www.`, known profile prefixes and a trailing
/// slash are removed. `http://github.com/user` → `user`, `https://me.dev/` → `me.dev`.
pub fn display_text(raw: &str) -> String {
    let mut rest = raw.trim();
    if let Some(len) = scheme_len(rest) {
        rest = &rest[len..];
    }
    rest = strip_prefix_ignore_case(rest, "www.").unwrap_or(rest);
    for prefix in PLATFORM_PREFIXES {
        if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
            rest = stripped;
            break;
        }
    }
    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        raw.trim().to_string()
    } else {
        rest.to_string()
    }
}

fn scheme_len(url: &str) -> Option<usize> {
    ["https://", "http://"]
        .iter()
        .find(|scheme| strip_prefix_ignore_case(url, scheme).is_some())
        .map(|scheme| scheme.len())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
