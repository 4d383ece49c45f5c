//! Normalized, immutable branch lookup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{Branch, RawBranch};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to fetch branch list from `{0}`")]
    Fetch(String, #[source] reqwest::Error),

    #[error("invalid branch list")]
    Json(#[from] serde_json::Error),
}

/// Where the raw branch list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchSource {
    File(PathBuf),
    Remote(String),
}

/// Branches in listing order, indexed by derived id.
///
/// Built once by [`BranchRegistry::normalize`]; ids and dates are never
/// recomputed on lookup and there is no way to mutate a built registry.
#[derive(Debug, Default)]
pub struct BranchRegistry {
    branches: Vec<Arc<Branch>>,
    by_id: FxHashMap<String, usize>,
}

impl BranchRegistry {
    pub fn normalize(raw: Vec<RawBranch>) -> Self {
        let mut branches = Vec::with_capacity(raw.len());
        let mut by_id = FxHashMap::default();

        for branch in raw.into_iter().map(Branch::from_raw) {
            // Identical names yield identical ids; the first listing wins.
            if by_id.contains_key(&branch.id) {
                crate::debug!("branch"; "duplicate branch `{}` ignored", branch.name);
                continue;
            }
            by_id.insert(branch.id.clone(), branches.len());
            branches.push(Arc::new(branch));
        }

        Self { branches, by_id }
    }

    /// Parse a JSON branch listing.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: Vec<RawBranch> = serde_json::from_str(json)?;
        Ok(Self::normalize(raw))
    }

    /// Load and normalize the listing from its configured source.
    pub async fn load(source: &BranchSource) -> Result<Self, RegistryError> {
        let json = match source {
            BranchSource::File(path) => read_file(path)?,
            BranchSource::Remote(url) => fetch(url).await?,
        };
        Self::from_json(&json)
    }

    /// Look up a branch by derived id. `None` is a regular outcome.
    pub fn resolve(&self, id: &str) -> Option<Arc<Branch>> {
        self.by_id
            .get(id)
            .map(|&index| Arc::clone(&self.branches[index]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Branch>> {
        self.branches.iter()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

fn read_file(path: &Path) -> Result<String, RegistryError> {
    std::fs::read_to_string(path).map_err(|err| RegistryError::Io(path.to_path_buf(), err))
}

async fn fetch(url: &str) -> Result<String, RegistryError> {
    let fetch_err = |err| RegistryError::Fetch(url.to_string(), err);
    reqwest::get(url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"[
        {"name": "master", "url": "http://master.example/", "commits": [{"date": "2024-03-05"}]},
        {"name": "features/x", "url": "http://x.example/", "commits": []},
        {"name": "features/x", "url": "http://dup.example/", "commits": []}
    ]"#;

    #[test]
    fn test_normalize_and_resolve() {
        let registry = BranchRegistry::from_json(LISTING).unwrap();

        assert_eq!(registry.len(), 2);
        let branch = registry.resolve("features~x").unwrap();
        assert_eq!(branch.name, "features/x");
        assert_eq!(branch.url, "http://x.example/");
        assert!(registry.resolve("master").is_some());
    }

    #[test]
    fn test_resolve_missing() {
        let registry = BranchRegistry::from_json(LISTING).unwrap();
        assert!(registry.resolve("ghost").is_none());
        // Only derived ids resolve, not raw names
        assert!(registry.resolve("features/x").is_none());
    }

    #[test]
    fn test_listing_order_preserved() {
        let registry = BranchRegistry::from_json(LISTING).unwrap();
        let ids: Vec<_> = registry.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["master", "features~x"]);
    }

    #[test]
    fn test_resolve_shares_entries() {
        let registry = BranchRegistry::from_json(LISTING).unwrap();
        let a = registry.resolve("master").unwrap();
        let b = registry.resolve("master").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            BranchRegistry::from_json("{"),
            Err(RegistryError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branches.json");
        std::fs::write(&path, LISTING).unwrap();

        let registry = BranchRegistry::load(&BranchSource::File(path)).await.unwrap();
        assert_eq!(registry.len(), 2);

        let missing = BranchSource::File(dir.path().join("missing.json"));
        assert!(matches!(
            BranchRegistry::load(&missing).await,
            Err(RegistryError::Io(..))
        ));
    }
}
