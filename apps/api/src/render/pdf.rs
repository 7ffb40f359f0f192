//! PDF backend built on `lopdf`: standard-14 Type1 fonts, one content stream per page,
//! URI link annotations and an `/Info` dictionary.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::layout::font_metrics::base_font_name;
use crate::layout::{DrawOp, FontFamily, FontStyle, LaidOutDocument, LinkHitBox, Page};
use crate::render::{DocumentInfo, RenderBackend, RenderError};

pub const PRODUCER: &str = concat!("vitae-api ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy)]
pub struct LopdfBackend {
    family: FontFamily,
    compress: bool,
}

impl LopdfBackend {
    pub fn new(family: FontFamily, compress: bool) -> Self {
        Self { family, compress }
    }
}

fn font_key(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Regular => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

/// Encodes text for a WinAnsiEncoding font. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Display list of one page as PDF operators, flipping `y` to the bottom-up PDF space.
fn page_content(page: &Page, page_height: f32) -> Content {
    let mut operations = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                baseline,
                text,
                style,
                size,
            } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec![font_key(*style).into(), (*size).into()]));
                operations.push(Operation::new(
                    "Td",
                    vec![(*x).into(), (page_height - baseline).into()],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(text))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule { x1, x2, y, thickness } => {
                let y = page_height - y;
                operations.push(Operation::new("w", vec![(*thickness).into()]));
                operations.push(Operation::new("m", vec![(*x1).into(), y.into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), y.into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }
    Content { operations }
}

fn link_annotation(link: &LinkHitBox, page_height: f32) -> Dictionary {
    let rect: Vec<Object> = vec![
        link.x.into(),
        (page_height - (link.y + link.height)).into(),
        (link.x + link.width).into(),
        (page_height - link.y).into(),
    ];
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect,
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(link.url.as_bytes()),
        },
    }
}

impl RenderBackend for LopdfBackend {
    fn render(&self, document: &LaidOutDocument, info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
        let mut pdf = Document::with_version("1.7");
        let pages_id = pdf.new_object_id();
        let width = document.geometry.width;
        let height = document.geometry.height;

        let mut fonts = Dictionary::new();
        for style in FontStyle::ALL {
            let font_id = pdf.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base_font_name(self.family, style),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font_key(style), font_id);
        }
        let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

        let mut page_ids = Vec::with_capacity(document.pages.len());
        for (index, page) in document.pages.iter().enumerate() {
            let mut stream = Stream::new(Dictionary::new(), page_content(page, height).encode()?);
            if self.compress {
                stream.compress()?;
            }
            let content_id = pdf.add_object(stream);

            let annots: Vec<Object> = document
                .links
                .iter()
                .filter(|link| link.page_index == index)
                .map(|link| pdf.add_object(link_annotation(link, height)).into())
                .collect();

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            };
            if !annots.is_empty() {
                page_dict.set("Annots", annots);
            }
            page_ids.push(pdf.add_object(page_dict));
        }

        let count = page_ids.len() as i64;
        let kids: Vec<Object> = page_ids.into_iter().map(Object::from).collect();
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        let info_id = pdf.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(&info.title)),
            "Author" => Object::string_literal(encode_win_ansi(&info.author)),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        });
        pdf.trailer.set("Root", catalog_id);
        pdf.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
