//! Cover-letter section list. Each group is a heading-less section; a group with no
//! present field is dropped along with the gap after it. The closing group is never
//! split across pages.

use crate::layout::blocks::{Block, TextRun};
use crate::layout::composer::{DocumentKind, DocumentSource, LayoutError, Section};
use crate::layout::font_metrics::FontStyle;
use crate::layout::page::LayoutConfig;
use crate::models::CoverLetterData;

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// One single-line block per present field.
fn lines(fields: &[&String], size: f32) -> Vec<Block> {
    fields
        .iter()
        .filter_map(|f| present(f))
        .map(|f| Block::Line(vec![TextRun::regular(f, size)]))
        .collect()
}

fn wrapped(text: &str, size: f32) -> Option<Block> {
    present(text).map(|t| Block::Paragraph {
        text: t.to_string(),
        size,
        font: FontStyle::Regular,
    })
}

impl DocumentSource for CoverLetterData {
    fn kind(&self) -> DocumentKind {
        DocumentKind::CoverLetter
    }

    fn title(&self) -> String {
        format!("{} - Cover Letter", self.header.applicant_name.trim())
    }

    fn author(&self) -> String {
        self.header.applicant_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if present(&self.header.applicant_name).is_none() {
            return Err(LayoutError::MissingField("header.applicantName"));
        }
        if present(&self.content).is_none() {
            return Err(LayoutError::MissingField("content"));
        }
        Ok(())
    }

    fn sections(&self, config: &LayoutConfig) -> Vec<Section> {
        let header = &self.header;
        let footer = &self.footer;
        let body = config.type_scale.body;
        let gap = config.spacing.paragraph_spacing;

        let mut identity = vec![Block::Line(vec![TextRun::bold(
            header.applicant_name.trim(),
            config.type_scale.letter_name,
        )])];
        identity.extend(lines(&[&header.degree, &header.university, &header.email], body));

        let mut paragraphs = Vec::new();
        for text in self.paragraphs() {
            if !paragraphs.is_empty() {
                paragraphs.push(Block::Spacer(gap));
            }
            paragraphs.extend(wrapped(&text, body));
        }

        let mut closing: Vec<Block> = [&footer.closing, &footer.sign_off]
            .into_iter()
            .filter_map(|f| wrapped(f, body))
            .collect();
        if let Some(signature) = present(&footer.signature) {
            closing.push(Block::Line(vec![TextRun::bold(signature, body)]));
        }

        vec![
            Section::new(None, identity, gap),
            Section::new(None, lines(&[&header.date], body), gap),
            Section::new(
                None,
                lines(&[&header.recipient_company, &header.recipient_location], body),
                gap,
            ),
            Section::new(None, wrapped(&header.salutation, body).into_iter().collect(), gap),
            Section::new(None, paragraphs, gap),
            Section::new(None, closing, gap).kept_together(),
        ]
    }
}
