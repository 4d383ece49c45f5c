//! Last-used options on disk.
//!
//! Only options are remembered; code travels through the share URL.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::{Options, PartialOptions};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when writing `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("cannot serialize options")]
    Json(#[from] serde_json::Error),
}

/// Durable storage for options, consulted only when the URL has none.
pub trait OptionStore: Send {
    fn load(&self) -> Option<PartialOptions>;
    fn save(&mut self, options: &Options) -> Result<(), StoreError>;
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct RememberStore {
    path: PathBuf,
}

impl RememberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OptionStore for RememberStore {
    fn load(&self) -> Option<PartialOptions> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                crate::log!("store"; "cannot read `{}`: {}", self.path.display(), err);
                return None;
            }
        };

        match serde_json::from_str::<PartialOptions>(&content) {
            Ok(options) => Some(options),
            Err(err) => {
                crate::log!("store"; "ignoring malformed `{}`: {}", self.path.display(), err);
                None
            }
        }
    }

    fn save(&mut self, options: &Options) -> Result<(), StoreError> {
        let io_err = |err| StoreError::Io(self.path.clone(), err);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(options)?;
        fs::write(&self.path, json).map_err(io_err)?;

        crate::debug!("store"; "saved to {}", self.path.display());
        Ok(())
    }
}
