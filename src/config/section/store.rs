//! `[store]` section configuration.
//!
//! ```toml
//! [store]
//! path = ".playsync/options.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Remembered options location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".playsync/options.json"),
        }
    }
}
