//! Temporary host projects.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::cli::RunContext;
use crate::manifest::InstallManifestFile;
use crate::project::{PackageManager, ProjectConfig, TokenFormat};

/// Minimal `package.json` of a React project.
pub const REACT_PACKAGE_JSON: &str = r#"{
  "name": "demo-app",
  "private": true,
  "dependencies": {
    "react": "^19.0.0",
    "react-dom": "^19.0.0"
  }
}
"#;

/// A host project rooted in a temporary directory, removed on drop.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    /// Empty directory with no `package.json`.
    pub fn empty() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
        })
    }

    /// React project that has not run `init`.
    pub fn new() -> Result<Self> {
        let project = Self::empty()?;
        std::fs::write(project.path("package.json"), REACT_PACKAGE_JSON)?;
        Ok(project)
    }

    /// React project with a configuration and an empty manifest, as left by
    /// `init` with default answers.
    pub fn initialized() -> Result<Self> {
        let project = Self::new()?;
        project.config().save(project.root())?;
        InstallManifestFile::new().save(project.root())?;
        Ok(project)
    }

    /// Configuration written by [`TestProject::initialized`].
    #[must_use]
    pub fn config(&self) -> ProjectConfig {
        ProjectConfig {
            components_dir: "src/components/ui".to_string(),
            stories_dir: None,
            has_storybook: false,
            package_manager: PackageManager::Npm,
            registry_url: "http://127.0.0.1:9".to_string(),
            css_file: Some("src/index.css".to_string()),
            css_framework_version: None,
            token_format: Some(TokenFormat::Tailwind),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Non-interactive context for this project talking to `registry_url`.
    #[must_use]
    pub fn context(&self, registry_url: &str) -> RunContext {
        RunContext::new(self.root()).with_registry(registry_url)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        std::fs::write(&path, content).expect("write test file");
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    /// Load, modify and save the project configuration.
    pub fn update_config(&self, edit: impl FnOnce(&mut ProjectConfig)) {
        let mut config = ProjectConfig::load(self.root()).expect("load config");
        edit(&mut config);
        config.save(self.root()).expect("save config");
    }
}
