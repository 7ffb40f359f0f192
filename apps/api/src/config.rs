use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::layout::FontFamily;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory server-side exports are written into.
    pub export_dir: PathBuf,
    pub layout_font: FontFamily,
    /// Flate-compress page content streams.
    pub pdf_compress: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            export_dir: PathBuf::from(env_or("EXPORT_DIR", "exports")),
            layout_font: env_or("LAYOUT_FONT", "times")
                .parse::<FontFamily>()
                .map_err(|e| anyhow!(e))
                .context("LAYOUT_FONT must be 'times' or 'helvetica'")?,
            pdf_compress: parse_bool(&env_or("PDF_COMPRESS", "true"))
                .context("PDF_COMPRESS must be true or false")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("'{other}' is not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool(" 1 ").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
