//! Install manifest stored in `.rafters/component-manifest.json`.
//!
//! The manifest records which components were installed, where they were
//! written, and the design-intelligence metadata that came with them. It is
//! read-modify-written on every `add`:
//!
//! ```text
//! load (resilient) → upsert (full overwrite) → save (atomic)
//! ```
//!
//! There is no locking. Two concurrent `add` runs race and the last writer
//! wins; the atomic rename only guarantees the file is never half-written.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "initializedAt": "2026-10-17T09:30:00Z",
//!   "components": {
//!     "button": {
//!       "path": "src/components/ui/button.tsx",
//!       "installedAt": "2026-10-17T09:31:12Z",
//!       "version": "latest",
//!       "intelligence": { "cognitiveLoad": 2, "...": "..." },
//!       "dependencies": []
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::{MANIFEST_FILE, MANIFEST_FORMAT_VERSION, UNVERSIONED};
use crate::core::RaftersError;
use crate::registry::{Intelligence, MAX_COGNITIVE_LOAD, RemoteComponentDescriptor};
use crate::utils::fs::{read_json_file, write_json_file};

/// One installed component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRecord {
    /// Component file, relative to the project root
    pub path: String,
    /// Story file, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    pub installed_at: DateTime<Utc>,
    pub version: String,
    pub intelligence: Intelligence,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl InstallRecord {
    /// Build the record for `descriptor` installed at `path`.
    ///
    /// This is the integrity gate of `add`: it runs before any dependency is
    /// installed or any file is written.
    ///
    /// # Errors
    ///
    /// [`RaftersError::ManifestIntegrityError`] when the descriptor has no
    /// intelligence metadata or its cognitive load is out of range.
    pub fn from_descriptor(
        descriptor: &RemoteComponentDescriptor,
        path: impl Into<String>,
    ) -> Result<Self, RaftersError> {
        let intelligence =
            descriptor.intelligence().ok_or_else(|| RaftersError::ManifestIntegrityError {
                name: descriptor.name.clone(),
                reason: "registry entry has no design intelligence metadata".to_string(),
            })?;

        if intelligence.cognitive_load > MAX_COGNITIVE_LOAD {
            return Err(RaftersError::ManifestIntegrityError {
                name: descriptor.name.clone(),
                reason: format!(
                    "cognitive load {} is outside 0-{MAX_COGNITIVE_LOAD}",
                    intelligence.cognitive_load
                ),
            });
        }

        Ok(Self {
            path: path.into(),
            story: None,
            installed_at: Utc::now(),
            version: descriptor.version.clone().unwrap_or_else(|| UNVERSIONED.to_string()),
            intelligence: intelligence.clone(),
            dependencies: descriptor.dependencies.clone(),
        })
    }

    /// Attach the story file path.
    #[must_use]
    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story = Some(story.into());
        self
    }
}

/// Contents of `.rafters/component-manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallManifestFile {
    pub version: String,
    pub initialized_at: DateTime<Utc>,
    #[serde(default)]
    pub components: BTreeMap<String, InstallRecord>,
}

impl Default for InstallManifestFile {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallManifestFile {
    /// Create an empty manifest stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: MANIFEST_FORMAT_VERSION.to_string(),
            initialized_at: Utc::now(),
            components: BTreeMap::new(),
        }
    }

    /// Load the manifest of the project at `root`.
    ///
    /// Never fails: a missing, unreadable or corrupt manifest yields a fresh
    /// empty one so a damaged file cannot block installs. The damaged file is
    /// replaced on the next [`save`](Self::save).
    #[must_use]
    pub fn load(root: &Path) -> Self {
        let path = root.join(MANIFEST_FILE);
        if !path.exists() {
            debug!("No install manifest at {}, starting fresh", path.display());
            return Self::new();
        }

        match read_json_file::<Self>(&path) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Ignoring install manifest at {}: {:#}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Insert or fully replace the record for `name`.
    pub fn upsert(&mut self, name: impl Into<String>, record: InstallRecord) {
        self.components.insert(name.into(), record);
    }

    /// Record for `name`, if installed.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&InstallRecord> {
        self.components.get(name)
    }

    /// Whether `name` has been installed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Persist to `.rafters/component-manifest.json` under `root`.
    pub fn save(&self, root: &Path) -> Result<()> {
        write_json_file(&root.join(MANIFEST_FILE), self)
    }
}
