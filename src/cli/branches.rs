//! `playsync branches`: list the branch registry.

use anyhow::Result;
use owo_colors::OwoColorize;

use super::common::load_registry;
use crate::branch::BranchRegistry;
use crate::config::PlaysyncConfig;

pub async fn list_branches(config: &PlaysyncConfig) -> Result<()> {
    let registry = load_registry(config).await?;

    if registry.is_empty() {
        crate::log!("branch"; "no branches configured");
        return Ok(());
    }
    for line in render(&registry) {
        println!("{line}");
    }
    Ok(())
}

/// One line per branch: `id  display name  url`, ids padded to align.
fn render(registry: &BranchRegistry) -> Vec<String> {
    let width = registry.iter().map(|b| b.id.len()).max().unwrap_or(0);
    registry
        .iter()
        .map(|branch| {
            format!(
                "{}  {}  {}",
                format!("{:width$}", branch.id).cyan(),
                branch.display_name(),
                branch.url.dimmed()
            )
        })
        .collect()
}
