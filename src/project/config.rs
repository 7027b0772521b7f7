//! Project configuration stored in `.rafters/config.json`.
//!
//! The configuration is written once by `init` and only read afterwards.
//! Re-initialization is refused while the file exists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::detect::PackageManager;
use crate::constants::CONFIG_FILE;
use crate::core::RaftersError;
use crate::utils::fs::write_json_file;

/// How design tokens are emitted during `init`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    /// `@theme` block inside the stylesheet
    #[default]
    Tailwind,
    /// Plain `:root` custom properties inside the stylesheet
    Css,
    /// Standalone `.rafters/tokens.json`
    Json,
}

impl TokenFormat {
    /// All formats, in the order they are offered.
    pub const ALL: [Self; 3] = [Self::Tailwind, Self::Css, Self::Json];
}

impl fmt::Display for TokenFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tailwind => "tailwind",
            Self::Css => "css",
            Self::Json => "json",
        })
    }
}

impl FromStr for TokenFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tailwind" => Ok(Self::Tailwind),
            "css" => Ok(Self::Css),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown token format '{other}'")),
        }
    }
}

/// Contents of `.rafters/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub components_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories_dir: Option<String>,
    #[serde(default)]
    pub has_storybook: bool,
    #[serde(default)]
    pub package_manager: PackageManager,
    pub registry_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_framework_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_format: Option<TokenFormat>,
}

impl ProjectConfig {
    /// Whether `root` already has a configuration file.
    #[must_use]
    pub fn exists(root: &Path) -> bool {
        root.join(CONFIG_FILE).exists()
    }

    /// Load the configuration of the project at `root`.
    ///
    /// # Errors
    ///
    /// - [`RaftersError::NotInitialized`] when the file is missing
    /// - [`RaftersError::ConfigParseError`] when it cannot be read or parsed
    pub fn load(root: &Path) -> Result<Self, RaftersError> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Err(RaftersError::NotInitialized {
                path: CONFIG_FILE.to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| RaftersError::ConfigParseError {
            path: CONFIG_FILE.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| RaftersError::ConfigParseError {
            path: CONFIG_FILE.to_string(),
            reason: e.to_string(),
        })
    }

    /// Write the configuration to `.rafters/config.json` under `root`.
    pub fn save(&self, root: &Path) -> anyhow::Result<()> {
        write_json_file(&root.join(CONFIG_FILE), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ProjectConfig {
        ProjectConfig {
            components_dir: "src/components/ui".to_string(),
            stories_dir: None,
            has_storybook: false,
            package_manager: PackageManager::Pnpm,
            registry_url: "https://registry.example.com".to_string(),
            css_file: Some("src/index.css".to_string()),
            css_framework_version: Some("^4.1.0".to_string()),
            token_format: Some(TokenFormat::Tailwind),
        }
    }

    #[test]
    fn test_load_missing_is_not_initialized() {
        let temp = TempDir::new().unwrap();
        let err = ProjectConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, RaftersError::NotInitialized { .. }));
        assert!(!ProjectConfig::exists(temp.path()));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let config = sample();
        config.save(temp.path()).unwrap();

        assert!(ProjectConfig::exists(temp.path()));
        assert_eq!(ProjectConfig::load(temp.path()).unwrap(), config);

        let raw = std::fs::read_to_string(temp.path().join(CONFIG_FILE)).unwrap();
        assert!(raw.contains("\"componentsDir\""));
        assert!(raw.contains("\"packageManager\": \"pnpm\""));
        assert!(!raw.contains("storiesDir"));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".rafters")).unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE), "{").unwrap();

        let err = ProjectConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, RaftersError::ConfigParseError { .. }));
    }

    #[test]
    fn test_token_format_parse() {
        assert_eq!("JSON".parse::<TokenFormat>().unwrap(), TokenFormat::Json);
        assert!("yaml".parse::<TokenFormat>().is_err());
    }
}
