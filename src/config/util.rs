//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from the current directory
///
/// ```text
/// /home/user/lab/snippets/   ← cwd
/// /home/user/lab/playsync.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Search upward from `start`. Absolute names are only checked as-is.
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

/// Resolve a config-relative path against the config file's directory.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("playsync.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("playsync.toml")).unwrap();
        assert_eq!(found, dir.path().join("playsync.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            find_config_file_from(dir.path(), Path::new("missing-playsync.toml")),
            None
        );
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file_from(Path::new("/"), &path), None);

        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_file_from(Path::new("/"), &path), Some(path));
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/lab");
        assert_eq!(resolve_path(root, Path::new("b.json")), Path::new("/lab/b.json"));
        assert_eq!(resolve_path(root, Path::new("/etc/b.json")), Path::new("/etc/b.json"));
    }
}
