//! Cover-letter input model: header fields, free-text body, footer fields.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterData {
    pub header: CoverLetterHeader,
    /// Body text. Paragraphs are separated by blank lines.
    pub content: String,
    pub footer: CoverLetterFooter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterHeader {
    pub applicant_name: String,
    pub degree: String,
    pub university: String,
    pub email: String,
    pub date: String,
    pub recipient_company: String,
    pub recipient_location: String,
    pub salutation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterFooter {
    pub closing: String,
    pub sign_off: String,
    pub signature: String,
}

impl CoverLetterData {
    /// Body split on blank lines; single newlines inside a paragraph become spaces.
    pub fn paragraphs(&self) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in self.content.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(line.trim());
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }
        paragraphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(content: &str) -> CoverLetterData {
        CoverLetterData {
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let l = letter("First line\ncontinues here.\n\nSecond paragraph.\n\n\n  \nThird.");
        assert_eq!(
            l.paragraphs(),
            vec!["First line continues here.", "Second paragraph.", "Third."]
        );
    }

    #[test]
    fn test_paragraphs_of_blank_body_is_empty() {
        assert!(letter("  \n\n ").paragraphs().is_empty());
    }

    #[test]
    fn test_deserializes_nested_camel_case() {
        let json = r#"{"header": {"applicantName": "Jo", "recipientCompany": "Acme"},
                       "content": "Hello", "footer": {"signOff": "Best"}}"#;
        let l: CoverLetterData = serde_json::from_str(json).unwrap();
        assert_eq!(l.header.applicant_name, "Jo");
        assert_eq!(l.header.recipient_company, "Acme");
        assert_eq!(l.footer.sign_off, "Best");
    }
}
