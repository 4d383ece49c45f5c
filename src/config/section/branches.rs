//! `[branches]` section configuration.
//!
//! The branch listing comes from a local file or a URL, never both.
//! Without either, the session runs with an empty registry.
//!
//! # Example
//!
//! ```toml
//! [branches]
//! path = "branches.json"
//! # or
//! url = "https://lab.example/branches.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::branch::BranchSource;
use crate::config::{ConfigDiagnostics, FieldPath};

/// Branch listing source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchesConfig {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

impl BranchesConfig {
    pub const URL: FieldPath = FieldPath::new("branches.url");

    pub fn source(&self) -> Option<BranchSource> {
        match (&self.path, &self.url) {
            (Some(path), _) => Some(BranchSource::File(path.clone())),
            (None, Some(url)) => Some(BranchSource::Remote(url.clone())),
            (None, None) => None,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.path.is_some() && self.url.is_some() {
            diag.error_with_hint(
                Self::URL,
                "both `path` and `url` are set",
                "keep only one branch listing source",
            );
        }
        if let Some(url) = &self.url
            && let Err(err) = url::Url::parse(url)
        {
            diag.error(Self::URL, format!("invalid url `{url}`: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::branch::BranchSource;
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_branches_source() {
        let config = test_parse_config("[branches]\npath = \"branches.json\"");
        assert_eq!(
            config.branches.source(),
            Some(BranchSource::File(PathBuf::from("branches.json")))
        );

        let config = test_parse_config("[branches]\nurl = \"https://lab.example/b.json\"");
        assert_eq!(
            config.branches.source(),
            Some(BranchSource::Remote("https://lab.example/b.json".into()))
        );

        assert_eq!(test_parse_config("").branches.source(), None);
    }

    #[test]
    fn test_branches_both_sources_rejected() {
        let config = test_parse_config(
            "[branches]\npath = \"b.json\"\nurl = \"https://lab.example/b.json\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.branches.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
