//! Configuration management for `playsync.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── service    # [service]
//! │   ├── share      # [share]
//! │   ├── store      # [store]
//! │   ├── branches   # [branches]
//! │   └── defaults   # [defaults], [defaults.code]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # PlaysyncConfig (this file)
//! ```
//!
//! A missing config file is not an error: every section has defaults.

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, resolve_path};

pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use section::{BranchesConfig, DefaultsConfig, ServiceConfig, ShareConfig, StoreConfig};

use crate::{branch::BranchSource, cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing playsync.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaysyncConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl PlaysyncConfig {
    /// Load configuration for the given CLI arguments.
    ///
    /// Searches upward from cwd for the config file; the project root is
    /// the directory containing it, or cwd when there is none.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.validate()?;
        config.normalize_paths();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Branch listing source, resolved against the root.
    pub fn branch_source(&self) -> Option<BranchSource> {
        self.branches.source()
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    fn normalize_paths(&mut self) {
        let root = self.root.clone();

        self.store.path = resolve_path(&root, &self.store.path);
        if let Some(path) = self.share.url_file.take() {
            self.share.url_file = Some(resolve_path(&root, &path));
        }
        if let Some(path) = self.branches.path.take() {
            self.branches.path = Some(resolve_path(&root, &path));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section; all errors are reported at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.service.validate(&mut diag);
        self.share.validate(&mut diag);
        self.branches.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PlaysyncConfig {
    let (parsed, ignored) = PlaysyncConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(PlaysyncConfig::from_str("[service\nurl = \"x\"").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlaysyncConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[service]\nurl = \"http://x.example/\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PlaysyncConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.service.url, "http://x.example/");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[store]\npath = \"o.json\"\n[defaults.code]\nvbnet = \"x\"";
        let (_, ignored) = PlaysyncConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = test_parse_config(
            "[service]\nurl = \"nope\"\n[branches]\npath = \"b.json\"\nurl = \"also nope\"",
        );
        let err = config.validate().unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(diag)) => assert_eq!(diag.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_paths() {
        let mut config = test_parse_config(
            "[store]\npath = \"state/o.json\"\n[share]\nurl_file = \"/tmp/url\"\n[branches]\npath = \"b.json\"",
        );
        config.root = PathBuf::from("/lab");
        config.normalize_paths();

        assert_eq!(config.store.path, Path::new("/lab/state/o.json"));
        assert_eq!(config.share.url_file.as_deref(), Some(Path::new("/tmp/url")));
        assert_eq!(
            config.branch_source(),
            Some(BranchSource::File(PathBuf::from("/lab/b.json")))
        );
    }
}
