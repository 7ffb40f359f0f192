//! Resume section list: header, education, skills, experience, projects, achievements.

use crate::layout::blocks::{Align, Block, TextRun};
use crate::layout::composer::{DocumentKind, DocumentSource, LayoutError, Section};
use crate::layout::font_metrics::FontStyle;
use crate::layout::links::{display_text, normalize_url};
use crate::layout::page::LayoutConfig;
use crate::models::{Education, Experience, PersonalInfo, Project, ResumeData, Skill};

pub const CONTACT_SEPARATOR: &str = " | ";

pub const EDUCATION: &str = "Education";
pub const SKILLS: &str = "Technical Skills";
pub const EXPERIENCE: &str = "Professional Experience";
pub const PROJECTS: &str = "Academic Projects";
pub const ACHIEVEMENTS: &str = "Achievements";

/// Trimmed value, or `None` when blank.
fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// `start - end`, with "Present" replacing any stored end date while `current`.
pub fn date_range(start: &str, end: &str, current: bool) -> String {
    let end = if current { Some("Present") } else { present(end) };
    match (present(start), end) {
        (Some(start), Some(end)) => format!("{start} - {end}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}

impl DocumentSource for ResumeData {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Resume
    }

    fn title(&self) -> String {
        format!("{} - Resume", self.personal_info.full_name.trim())
    }

    fn author(&self) -> String {
        self.personal_info.full_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if present(&self.personal_info.full_name).is_none() {
            return Err(LayoutError::MissingField("personalInfo.fullName"));
        }
        Ok(())
    }

    fn sections(&self, config: &LayoutConfig) -> Vec<Section> {
        let gap = config.spacing.section_spacing;
        vec![
            Section::new(None, header_blocks(&self.personal_info, config), gap),
            Section::new(
                Some(EDUCATION),
                entries(&self.education, config, education_blocks),
                gap,
            ),
            Section::new(Some(SKILLS), skill_blocks(&self.skills, config), gap),
            Section::new(
                Some(EXPERIENCE),
                entries(&self.experience, config, experience_blocks),
                gap,
            ),
            Section::new(
                Some(PROJECTS),
                entries(&self.projects, config, project_blocks),
                gap,
            ),
            Section::new(
                Some(ACHIEVEMENTS),
                vec![Block::BulletList {
                    items: self.achievements.clone(),
                    size: config.type_scale.body,
                }],
                gap,
            ),
        ]
    }
}

/// Blocks for every entry that survives filtering, with entry spacing between them.
fn entries<T>(
    items: &[T],
    config: &LayoutConfig,
    to_blocks: fn(&T, &LayoutConfig) -> Option<Vec<Block>>,
) -> Vec<Block> {
    let mut blocks = Vec::new();
    for entry in items.iter().filter_map(|item| to_blocks(item, config)) {
        if !blocks.is_empty() {
            blocks.push(Block::Spacer(config.spacing.entry_spacing));
        }
        blocks.extend(entry);
    }
    blocks
}

// ── header ──────────────────────────────────────────────────────────────────

fn header_blocks(info: &PersonalInfo, config: &LayoutConfig) -> Vec<Block> {
    let scale = &config.type_scale;
    let name = TextRun::bold(info.full_name.trim(), scale.name).aligned(Align::Center);

    let plain = [&info.email, &info.phone, &info.address]
        .into_iter()
        .filter_map(|v| present(v))
        .map(|v| TextRun::regular(v, scale.detail));
    let links = [&info.linkedin, &info.github, &info.website]
        .into_iter()
        .filter_map(|v| present(v))
        .map(|v| TextRun::regular(display_text(v), scale.detail).with_url(normalize_url(v)));

    let mut contact: Vec<TextRun> = Vec::new();
    for item in plain.chain(links) {
        if !contact.is_empty() {
            contact.push(TextRun::regular(CONTACT_SEPARATOR, scale.detail));
        }
        contact.push(item);
    }
    if let Some(first) = contact.first_mut() {
        *first = first.clone().aligned(Align::Center);
    }

    let mut blocks = vec![Block::Line(vec![name])];
    if !contact.is_empty() {
        blocks.push(Block::Line(contact));
    }
    blocks
}

// ── entries ─────────────────────────────────────────────────────────────────

fn education_blocks(edu: &Education, config: &LayoutConfig) -> Option<Vec<Block>> {
    let school = present(&edu.school)?;
    let degree = present(&edu.degree)?;
    let body = config.type_scale.body;

    let mut left = vec![
        TextRun::bold(school, body),
        TextRun::regular(format!(", {degree}"), body),
    ];
    if let Some(gpa) = present(&edu.gpa) {
        left.push(TextRun::italic(format!(", GPA: {gpa}"), body));
    }
    let right = present(&edu.graduation_date).map(|d| TextRun::regular(d, body).aligned(Align::Right));

    let mut blocks = vec![Block::KeyValueRow { left, right }];
    if let Some(coursework) = present(&edu.relevant_coursework) {
        blocks.push(Block::LabeledWrap {
            label: TextRun::bold("Relevant Coursework: ", config.type_scale.detail),
            text: coursework.to_string(),
            width: None,
        });
    }
    Some(blocks)
}

fn skill_blocks(skills: &[Skill], config: &LayoutConfig) -> Vec<Block> {
    let body = config.type_scale.body;
    skills
        .iter()
        .filter_map(|skill| {
            let category = present(&skill.category)?;
            let items: Vec<&str> = skill.items.iter().filter_map(|i| present(i)).collect();
            if items.is_empty() {
                return None;
            }
            Some(Block::LabeledWrap {
                label: TextRun::bold(format!("{category}: "), body),
                text: items.join(", "),
                width: None,
            })
        })
        .collect()
}

fn experience_blocks(exp: &Experience, config: &LayoutConfig) -> Option<Vec<Block>> {
    let title = present(&exp.title)?;
    let company = present(&exp.company)?;
    let body = config.type_scale.body;

    let mut left = vec![
        TextRun::bold(title, body),
        TextRun::regular(format!(", {company}"), body),
    ];
    if let Some(location) = present(&exp.location) {
        left.push(TextRun::italic(format!(", {location}"), body));
    }
    let range = date_range(&exp.start_date, &exp.end_date, exp.current);
    let right = present(&range).map(|r| TextRun::regular(r, body).aligned(Align::Right));

    Some(vec![
        Block::KeyValueRow { left, right },
        Block::BulletList {
            items: exp.description.clone(),
            size: body,
        },
    ])
}

fn project_blocks(proj: &Project, config: &LayoutConfig) -> Option<Vec<Block>> {
    let title = present(&proj.title)?;
    let scale = &config.type_scale;

    let mut title_run = TextRun::bold(title, scale.body);
    if let Some(link) = present(&proj.link) {
        title_run = title_run.with_url(normalize_url(link));
    }
    let right = present(&proj.date).map(|d| TextRun::regular(d, scale.body).aligned(Align::Right));

    let mut blocks = vec![Block::KeyValueRow {
        left: vec![title_run],
        right,
    }];
    if let Some(tech) = present(&proj.technologies) {
        blocks.push(Block::Paragraph {
            text: tech.to_string(),
            size: scale.detail,
            font: FontStyle::Italic,
        });
    }
    blocks.push(Block::BulletList {
        items: proj.description.clone(),
        size: scale.body,
    });
    Some(blocks)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::composer::{compose, LaidOutDocument};
    use crate::layout::font_metrics::{FontFamily, StandardFonts, TextMeasurer};
    use crate::layout::page::{default_layout_config, DrawOp};

    fn sample() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Jo Doe".into(),
                email: "jo@example.com".into(),
                phone: "555-0100".into(),
                linkedin: "https://www.linkedin.com/in/jodoe/".into(),
                github: "github.com/user".into(),
                ..Default::default()
            },
            education: vec![Education {
                school: "State University".into(),
                degree: "BS Computer Science".into(),
                graduation_date: "May 2024".into(),
                gpa: "3.8".into(),
                relevant_coursework: "Algorithms, Operating Systems".into(),
                ..Default::default()
            }],
            experience: vec![Experience {
                title: "Engineer".into(),
                company: "Acme".into(),
                location: "Remote".into(),
                start_date: "Jan 2020".into(),
                end_date: "Dec 2020".into(),
                current: true,
                description: vec!["Built the billing service".into(), "  ".into()],
                ..Default::default()
            }],
            projects: vec![Project {
                title: "Layout Engine".into(),
                technologies: "Rust, lopdf".into(),
                date: "2023".into(),
                link: "github.com/user/layout".into(),
                description: vec!["Paginates documents".into()],
                ..Default::default()
            }],
            skills: vec![Skill {
                category: "Languages".into(),
                items: vec!["Rust".into(), "".into(), "Go".into()],
            }],
            achievements: vec![],
        }
    }

    fn layout(resume: &ResumeData) -> LaidOutDocument {
        let config = default_layout_config(FontFamily::Times);
        compose(resume, &config, &StandardFonts::new(FontFamily::Times)).unwrap()
    }

    fn texts(doc: &LaidOutDocument) -> Vec<String> {
        doc.texts().map(str::to_string).collect()
    }

    // ── date range ──────────────────────────────────────────────────────────

    #[test]
    fn test_date_range_current_overrides_end_date() {
        assert_eq!(date_range("Jan 2020", "Dec 2020", true), "Jan 2020 - Present");
        assert_eq!(date_range("Jan 2020", "", true), "Jan 2020 - Present");
    }

    #[test]
    fn test_date_range_partial_values() {
        assert_eq!(date_range("Jan 2020", "Dec 2020", false), "Jan 2020 - Dec 2020");
        assert_eq!(date_range("Jan 2020", " ", false), "Jan 2020");
        assert_eq!(date_range("", "", false), "");
    }

    // ── sections ────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_achievements_emit_no_heading() {
        let doc = layout(&sample());
        assert!(!texts(&doc).iter().any(|t| t == "ACHIEVEMENTS"));
    }

    #[test]
    fn test_blank_achievements_emit_no_heading() {
        let mut resume = sample();
        resume.achievements = vec!["".into(), "   ".into()];
        assert!(!texts(&layout(&resume)).iter().any(|t| t == "ACHIEVEMENTS"));

        resume.achievements.push("Dean's list".into());
        let t = texts(&layout(&resume));
        assert!(t.iter().any(|t| t == "ACHIEVEMENTS"));
        assert!(t.iter().any(|t| t == "Dean's list"));
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let t = texts(&layout(&sample()));
        let pos = |needle: &str| t.iter().position(|x| x == needle).unwrap();
        assert_eq!(pos("Jo Doe"), 0);
        assert!(pos("EDUCATION") < pos("TECHNICAL SKILLS"));
        assert!(pos("TECHNICAL SKILLS") < pos("PROFESSIONAL EXPERIENCE"));
        assert!(pos("PROFESSIONAL EXPERIENCE") < pos("ACADEMIC PROJECTS"));
    }

    #[test]
    fn test_entries_missing_required_fields_are_skipped() {
        let mut resume = sample();
        resume.education[0].degree = " ".into();
        resume.experience[0].company.clear();
        resume.projects[0].title.clear();
        resume.skills[0].items = vec!["".into()];
        let t = texts(&layout(&resume));
        for heading in ["EDUCATION", "TECHNICAL SKILLS", "PROFESSIONAL EXPERIENCE", "ACADEMIC PROJECTS"] {
            assert!(!t.iter().any(|x| x == heading), "{heading} should be omitted");
        }
        assert_eq!(t[0], "Jo Doe");
    }

    #[test]
    fn test_current_role_renders_present() {
        let t = texts(&layout(&sample()));
        assert!(t.iter().any(|x| x == "Jan 2020 - Present"));
        assert!(!t.iter().any(|x| x.contains("Dec 2020")));
    }

    #[test]
    fn test_education_row_and_coursework() {
        let t = texts(&layout(&sample()));
        assert!(t.iter().any(|x| x == "State University"));
        assert!(t.iter().any(|x| x == ", BS Computer Science"));
        assert!(t.iter().any(|x| x == ", GPA: 3.8"));
        assert!(t.iter().any(|x| x == "Relevant Coursework: "));
        assert!(t.iter().any(|x| x == "Rust, Go"));
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let mut resume = sample();
        resume.personal_info.full_name = "  ".into();
        assert_eq!(
            resume.validate(),
            Err(LayoutError::MissingField("personalInfo.fullName"))
        );
    }

    #[test]
    fn test_name_only_resume_lays_out_one_page() {
        let resume = ResumeData {
            personal_info: PersonalInfo {
                full_name: "Jo Doe".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let doc = layout(&resume);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(texts(&doc), vec!["Jo Doe"]);
        assert!(doc.links.is_empty());
    }

    // ── links ───────────────────────────────────────────────────────────────

    #[test]
    fn test_github_without_scheme_links_to_https_with_short_display() {
        let doc = layout(&sample());
        let hit = doc
            .links
            .iter()
            .find(|l| l.url == "https://github.com/user")
            .expect("github link");
        assert!(texts(&doc).iter().any(|t| t == "user"));
        assert_eq!(hit.page_index, 0);
    }

    #[test]
    fn test_one_hit_box_per_url_field_bounding_its_text() {
        let doc = layout(&sample());
        let measurer = StandardFonts::new(FontFamily::Times);
        assert_eq!(doc.links.len(), 3);

        let expected = [
            ("https://www.linkedin.com/in/jodoe/", "jodoe"),
            ("https://github.com/user", "user"),
            ("https://github.com/user/layout", "Layout Engine"),
        ];
        for (url, shown) in expected {
            let hits: Vec<_> = doc.links.iter().filter(|l| l.url == url).collect();
            assert_eq!(hits.len(), 1, "{url}");
            let hit = hits[0];
            let page = &doc.pages[hit.page_index];
            let (x, baseline, style, size) = page
                .ops
                .iter()
                .find_map(|op| match op {
                    DrawOp::Text { x, baseline, text, style, size } if text == shown => {
                        Some((*x, *baseline, *style, *size))
                    }
                    _ => None,
                })
                .expect("link text drawn");
            let width = measurer.measure_width(shown, size, style);
            assert!((hit.x - x).abs() < 1e-3);
            assert!((hit.width - width).abs() < 1e-3);
            assert!(hit.contains(x, baseline - 1.0));
            assert!(hit.contains(x + width, baseline - 1.0));
        }
    }

    #[test]
    fn test_technologies_line_is_italic_detail() {
        let doc = layout(&sample());
        let config = default_layout_config(FontFamily::Times);
        let found = doc.pages[0].ops.iter().any(|op| {
            matches!(op, DrawOp::Text { text, style, size, .. }
                if text == "Rust, lopdf" && *style == FontStyle::Italic && *size == config.type_scale.detail)
        });
        assert!(found);
    }

    // ── pagination ──────────────────────────────────────────────────────────

    fn page_of(doc: &LaidOutDocument, text: &str) -> Option<usize> {
        doc.pages.iter().position(|p| p.texts().any(|t| t == text))
    }

    #[test]
    fn test_experience_row_is_never_stranded_from_its_first_bullet() {
        let mut crossed_page = false;
        for n in 0..60 {
            let mut resume = sample();
            resume.experience[0].description = vec![
                "Built the billing service".into(),
                "Cut invoice latency in half".into(),
                "Ran the on-call rotation".into(),
            ];
            resume.skills = (0..n)
                .map(|i| Skill {
                    category: format!("Tools {i}"),
                    items: vec!["Rust".into()],
                })
                .collect();
            let doc = layout(&resume);
            assert_eq!(page_of(&doc, "Engineer"), page_of(&doc, "Built the billing service"), "{n} skill lines");
            crossed_page |= page_of(&doc, "Engineer") == Some(1);
        }
        assert!(crossed_page);
    }

    #[test]
    fn test_education_row_is_never_stranded_from_its_coursework() {
        let mut crossed_page = false;
        for n in 20..50 {
            let mut resume = sample();
            let base = resume.education[0].clone();
            resume.education = (0..n)
                .map(|i| Education {
                    school: format!("College {i}"),
                    relevant_coursework: String::new(),
                    ..base.clone()
                })
                .chain(std::iter::once(Education {
                    school: "Last University".into(),
                    ..base.clone()
                }))
                .collect();
            let doc = layout(&resume);
            assert_eq!(
                page_of(&doc, "Last University"),
                page_of(&doc, "Relevant Coursework: "),
                "{n} education rows"
            );
            crossed_page |= page_of(&doc, "Last University") == Some(1);
        }
        assert!(crossed_page);
    }

    #[test]
    fn test_long_resume_spans_pages_without_splitting_rows() {
        let mut resume = sample();
        let base = resume.experience[0].clone();
        resume.experience = (0..25)
            .map(|i| Experience {
                title: format!("Engineer {i}"),
                description: vec![
                    "Owned the reconciliation pipeline end to end, from vendor ingestion to the \
                     reporting layer used by finance every morning."
                        .into();
                    3
                ],
                ..base.clone()
            })
            .collect();
        let doc = layout(&resume);
        assert!(doc.page_count() > 1);

        let config = default_layout_config(FontFamily::Times);
        for page in &doc.pages {
            for op in &page.ops {
                if let DrawOp::Text { baseline, size, .. } = op {
                    // Every line box starts inside the content area.
                    let top = baseline - size * 0.8;
                    assert!(top >= config.page.margin_top - 1e-3);
                    assert!(top + config.spacing.line_height <= config.page.content_bottom() + 1e-3);
                }
            }
        }
        // Every title row keeps its date on the same page and baseline.
        for page in &doc.pages {
            let rows: Vec<f32> = page
                .ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, baseline, .. } if text.starts_with("Engineer ") => Some(*baseline),
                    _ => None,
                })
                .collect();
            let dates: Vec<f32> = page
                .ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, baseline, .. } if text == "Jan 2020 - Present" => Some(*baseline),
                    _ => None,
                })
                .collect();
            assert_eq!(rows, dates);
        }
    }
}
