//! Typed view of the host project's `package.json`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The parts of `package.json` Rafters inspects.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    /// Read and parse `package.json` under `root`.
    ///
    /// Returns `None` when the file is missing or unparseable.
    #[must_use]
    pub fn read(root: &Path) -> Option<Self> {
        let path = root.join("package.json");
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(package) => Some(package),
            Err(e) => {
                tracing::debug!("Ignoring unparseable {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Whether `name` appears in either dependency table.
    #[must_use]
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    /// Declared version range for `name`, runtime dependencies first.
    #[must_use]
    pub fn dependency_version(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).or_else(|| self.dev_dependencies.get(name)).map(String::as_str)
    }

    /// Merged runtime and dev dependency names.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().chain(self.dev_dependencies.keys()).map(String::as_str)
    }
}
