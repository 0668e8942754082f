//! Project-root discovery and `package.json` script lookup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GateError, Result};

/// Find the nearest ancestor of `start` (including `start` itself) that
/// contains a `package.json`. Returns `None` when the walk reaches the
/// filesystem root without a hit — that is a legitimate "not our project"
/// case, not an error.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join("package.json").is_file() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// The project's declared check commands, read once from `package.json`.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    scripts: BTreeMap<String, String>,
}

impl Manifest {
    /// Load `root/package.json` and keep its `scripts` table. A manifest
    /// without scripts parses to an empty table.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("package.json");
        let text = std::fs::read_to_string(&path)
            .map_err(|e| GateError::ManifestUnreadable(format!("{}: {e}", path.display())))?;
        let raw: RawManifest = serde_json::from_str(&text)
            .map_err(|e| GateError::ManifestUnreadable(format!("{}: {e}", path.display())))?;
        Ok(Self {
            scripts: raw.scripts,
        })
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }

    /// First declared script among `aliases`, in the given priority order.
    /// Returns the matching script name so the caller invokes exactly that
    /// one, never more.
    pub fn first_script<'a>(&self, aliases: &[&'a str]) -> Option<&'a str> {
        aliases
            .iter()
            .copied()
            .find(|name| self.scripts.contains_key(*name))
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, json: &str) {
        std::fs::write(dir.join("package.json"), json).unwrap();
    }

    #[test]
    fn finds_root_in_start_dir() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "{}");
        assert_eq!(find_project_root(dir.path()), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn finds_root_above_nested_dir() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "{}");
        let deep = dir.path().join("src/components/deep");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(find_project_root(&deep), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn nearest_manifest_wins() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "{}");
        let pkg = dir.path().join("packages/web");
        std::fs::create_dir_all(&pkg).unwrap();
        write_manifest(&pkg, "{}");
        assert_eq!(find_project_root(&pkg), Some(pkg));
    }

    #[test]
    fn no_manifest_returns_none() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a/b");
        std::fs::create_dir_all(&deep).unwrap();
        // The walk continues above the temp dir; /tmp and / carry no
        // package.json on any sane machine, but guard the assertion anyway.
        let found = find_project_root(&deep);
        if let Some(ref root) = found {
            assert!(!root.starts_with(dir.path()));
        }
    }

    #[test]
    fn loads_scripts_table() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            r#"{"name": "demo", "scripts": {"lint": "eslint .", "type-check": "tsc --noEmit"}}"#,
        );
        let manifest = Manifest::load(dir.path()).unwrap();
        assert_eq!(manifest.script("lint"), Some("eslint ."));
        assert_eq!(manifest.script("type-check"), Some("tsc --noEmit"));
        assert_eq!(manifest.script("format"), None);
    }

    #[test]
    fn missing_scripts_table_is_empty() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), r#"{"name": "demo"}"#);
        let manifest = Manifest::load(dir.path()).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "{ nope");
        assert!(Manifest::load(dir.path()).is_err());
    }

    #[test]
    fn first_script_respects_priority_order() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            r#"{"scripts": {"tsc": "tsc", "typecheck": "tsc --noEmit"}}"#,
        );
        let manifest = Manifest::load(dir.path()).unwrap();
        assert_eq!(
            manifest.first_script(&["type-check", "typecheck", "tsc"]),
            Some("typecheck")
        );
    }
}
