//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};

use crate::branch::{BranchRegistry, BranchSource};
use crate::config::PlaysyncConfig;

/// Load the configured branch listing. No source means no branches.
pub async fn load_registry(config: &PlaysyncConfig) -> Result<BranchRegistry> {
    let Some(source) = config.branch_source() else {
        return Ok(BranchRegistry::default());
    };

    let registry = BranchRegistry::load(&source)
        .await
        .with_context(|| format!("failed to load branches from {}", describe(&source)))?;
    crate::debug!("branch"; "{} branches loaded", registry.len());
    Ok(registry)
}

fn describe(source: &BranchSource) -> String {
    match source {
        BranchSource::File(path) => format!("`{}`", path.display()),
        BranchSource::Remote(url) => format!("`{url}`"),
    }
}
