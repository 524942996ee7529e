//! From trait implementations for TallyError conversions

use super::types::TallyError;

impl From<std::io::Error> for TallyError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for TallyError {
    fn from(error: toml::de::Error) -> Self {
        Self::config_with_context(error.to_string(), "Parsing TOML settings file")
    }
}

impl From<reqwest::Error> for TallyError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}
