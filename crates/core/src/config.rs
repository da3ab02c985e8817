use std::env;
use crate::error::{AppError, Result};
use dotenvy::dotenv;

/// Model used when `GEMINI_MODEL` is not set. Must be an image-output model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Endpoint used when `GEMINI_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    pub model_name: String,
    pub api_base: String,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// `GEMINI_API_KEY` is required; without it the application cannot start.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| AppError::Config("GEMINI_API_KEY must be set in environment or .env file".to_string()))?;

        let model_name = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let api_base = env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let api_base = parse_api_base(&api_base)?;

        Ok(Self {
            gemini_api_key: api_key,
            model_name,
            api_base,
        })
    }
}

/// Validates and normalizes the API base URL (no trailing slash).
fn parse_api_base(base: &str) -> Result<String> {
    let trimmed = base.trim().trim_end_matches('/');
    url::Url::parse(trimmed)
        .map_err(|e| AppError::Config(format!("Invalid GEMINI_API_BASE '{}': {}", base, e)))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_is_normalized() {
        let base = parse_api_base("https://example.com/v1beta/").unwrap();
        assert_eq!(base, "https://example.com/v1beta");
    }

    #[test]
    fn default_api_base_parses() {
        assert_eq!(parse_api_base(DEFAULT_API_BASE).unwrap(), DEFAULT_API_BASE);
    }

    #[test]
    fn garbage_api_base_is_rejected() {
        let err = parse_api_base("not a url").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
