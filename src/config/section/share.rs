//! `[share]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [share]
//! base_url = "http://localhost:5000/"   # Prefix of every shareable URL
//! url_file = ".playsync/url"            # Optional: mirror of the current URL
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Shareable URL settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// URL the state fragment is appended to.
    pub base_url: String,

    /// File rewritten with the current URL on every save.
    pub url_file: Option<PathBuf>,
}

impl ShareConfig {
    pub const BASE_URL: FieldPath = FieldPath::new("share.base_url");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match url::Url::parse(&self.base_url) {
            Ok(url) if url.fragment().is_some() => {
                diag.error(Self::BASE_URL, "base url must not contain a fragment");
            }
            Ok(_) => {}
            Err(err) => diag.error(
                Self::BASE_URL,
                format!("invalid url `{}`: {err}", self.base_url),
            ),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/".into(),
            url_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_share_config() {
        let config = test_parse_config(
            "[share]\nbase_url = \"https://lab.example/\"\nurl_file = \"state/url\"",
        );
        assert_eq!(config.share.base_url, "https://lab.example/");
        assert_eq!(config.share.url_file.as_deref(), Some(Path::new("state/url")));
    }

    #[test]
    fn test_share_config_rejects_fragment() {
        let config = test_parse_config("[share]\nbase_url = \"https://lab.example/#x\"");
        let mut diag = ConfigDiagnostics::new();
        config.share.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
