//! Registry payload types.
//!
//! These mirror the JSON served by a Rafters registry. Descriptors are
//! ephemeral: they are fetched for one invocation and never persisted verbatim.
//! Only the intelligence block is copied into the install manifest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of a registry item, serialized as `registry:<kind>`.
///
/// Registries that omit `type` are treated as serving UI primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryItemKind {
    /// A UI primitive such as a button or dialog
    #[default]
    #[serde(rename = "registry:ui")]
    Ui,
    /// A composed component
    #[serde(rename = "registry:component")]
    Component,
    /// A page-level block
    #[serde(rename = "registry:block")]
    Block,
    /// A React hook
    #[serde(rename = "registry:hook")]
    Hook,
    /// A shared library module
    #[serde(rename = "registry:lib")]
    Lib,
    /// A stylesheet fragment
    #[serde(rename = "registry:style")]
    Style,
    /// A token theme
    #[serde(rename = "registry:theme")]
    Theme,
}

impl fmt::Display for RegistryItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ui => "registry:ui",
            Self::Component => "registry:component",
            Self::Block => "registry:block",
            Self::Hook => "registry:hook",
            Self::Lib => "registry:lib",
            Self::Style => "registry:style",
            Self::Theme => "registry:theme",
        };
        f.write_str(name)
    }
}

/// One file shipped with a registry item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Path of the file inside the registry package
    pub path: String,
    /// Source text
    pub content: String,
}

impl RegistryFile {
    /// Whether the file is a Storybook story rather than component source.
    #[must_use]
    pub fn is_story(&self) -> bool {
        self.path.contains(".stories.")
    }
}

/// Do/never guidance for a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePatterns {
    /// Recommended usages
    #[serde(default)]
    pub dos: Vec<String>,
    /// Usages to avoid
    #[serde(default)]
    pub nevers: Vec<String>,
}

/// Link to an external design guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignGuide {
    /// Guide title
    pub name: String,
    /// Guide location
    #[serde(default)]
    pub url: String,
}

/// Design-intelligence metadata carried by every installable component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intelligence {
    /// Cognitive load score, 0 (trivial) to 10 (demanding)
    pub cognitive_load: u8,
    #[serde(default)]
    pub attention_economics: String,
    #[serde(default)]
    pub accessibility: String,
    #[serde(default)]
    pub trust_building: String,
    #[serde(default)]
    pub semantic_meaning: String,
    #[serde(default)]
    pub usage_patterns: UsagePatterns,
    #[serde(default)]
    pub design_guides: Vec<DesignGuide>,
}

/// Highest valid cognitive load score.
pub const MAX_COGNITIVE_LOAD: u8 = 10;

/// The `meta` block of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMeta {
    /// Required before install, but not at parse time
    #[serde(default)]
    pub intelligence: Option<Intelligence>,
}

/// The registry's per-component payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteComponentDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: RegistryItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<RegistryFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ComponentMeta>,
}

impl RemoteComponentDescriptor {
    /// Intelligence metadata, if the registry supplied it.
    #[must_use]
    pub fn intelligence(&self) -> Option<&Intelligence> {
        self.meta.as_ref().and_then(|m| m.intelligence.as_ref())
    }

    /// Component source: the first non-story file, else the inline `content`.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.files
            .as_deref()
            .and_then(|files| files.iter().find(|f| !f.is_story()))
            .map(|f| f.content.as_str())
            .or(self.content.as_deref())
    }

    /// Story source shipped by the registry, if any.
    #[must_use]
    pub fn story_source(&self) -> Option<&str> {
        self.files
            .as_deref()
            .and_then(|files| files.iter().find(|f| f.is_story()))
            .map(|f| f.content.as_str())
    }

    /// Development dependencies, empty when absent.
    #[must_use]
    pub fn dev_dependencies(&self) -> &[String] {
        self.dev_dependencies.as_deref().unwrap_or(&[])
    }
}

/// Normalized catalog: every accepted top-level shape becomes this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub components: Vec<RemoteComponentDescriptor>,
}

impl Catalog {
    /// Case-insensitive linear scan by component name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&RemoteComponentDescriptor> {
        self.components.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Names of every catalog entry, in registry order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }
}

/// Token theme served by `GET {registry}/themes/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTheme {
    #[serde(default)]
    pub name: Option<String>,
    pub tokens: BTreeMap<String, String>,
}
