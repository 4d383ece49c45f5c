//! `[service]` section configuration.
//!
//! Where compile requests go when no branch is selected.
//!
//! # Example
//!
//! ```toml
//! [service]
//! url = "http://localhost:5000/"   # Compile service base URL
//! endpoint = "api/compilation"     # Joined onto the base or a branch url
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Compile service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the compile service.
    pub url: String,

    /// Path of the compile endpoint, relative to the base URL.
    pub endpoint: String,
}

impl ServiceConfig {
    pub const URL: FieldPath = FieldPath::new("service.url");
    pub const ENDPOINT: FieldPath = FieldPath::new("service.endpoint");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(err) = url::Url::parse(&self.url) {
            diag.error_with_hint(
                Self::URL,
                format!("invalid url `{}`: {err}", self.url),
                "use an absolute url like `http://localhost:5000/`",
            );
        }
        if self.endpoint.trim().is_empty() {
            diag.error(Self::ENDPOINT, "endpoint must not be empty");
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000/".into(),
            endpoint: "api/compilation".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_service_config() {
        let config = test_parse_config(
            "[service]\nurl = \"https://lab.example/\"\nendpoint = \"compile\"",
        );
        assert_eq!(config.service.url, "https://lab.example/");
        assert_eq!(config.service.endpoint, "compile");
    }

    #[test]
    fn test_service_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.service.url, "http://localhost:5000/");
        assert_eq!(config.service.endpoint, "api/compilation");
    }

    #[test]
    fn test_service_config_invalid_url() {
        let config = test_parse_config("[service]\nurl = \"localhost\"\nendpoint = \" \"");
        let mut diag = ConfigDiagnostics::new();
        config.service.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
