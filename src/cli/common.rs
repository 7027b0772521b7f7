//! State shared by every command.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::constants::{CI_ENV, DEFAULT_REGISTRY_URL};
use crate::project::ProjectConfig;
use crate::registry::RegistryClient;

/// Everything a command needs to know about where and how it runs.
///
/// Commands never consult the process working directory or environment
/// directly; `main` captures them once into this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Project root
    pub root: PathBuf,
    /// Registry URL from `RAFTERS_REGISTRY_URL` or `--registry`
    pub registry_override: Option<String>,
    /// Whether questions may be asked on the terminal
    pub interactive: bool,
}

impl RunContext {
    /// Non-interactive context rooted at `root`, with no registry override.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            registry_override: None,
            interactive: false,
        }
    }

    /// Capture the current process state.
    ///
    /// Interactive only when stdin is a terminal and `CI` is unset.
    pub fn from_process(registry_override: Option<String>) -> Result<Self> {
        let root = std::env::current_dir().context("Cannot determine the current directory")?;
        let interactive = std::io::stdin().is_terminal() && std::env::var_os(CI_ENV).is_none();
        Ok(Self {
            root,
            registry_override: registry_override.filter(|url| !url.trim().is_empty()),
            interactive,
        })
    }

    #[must_use]
    pub fn with_registry(mut self, url: impl Into<String>) -> Self {
        self.registry_override = Some(url.into());
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registry base URL: override, then project configuration, then default.
    #[must_use]
    pub fn registry_url(&self, config: Option<&ProjectConfig>) -> String {
        self.registry_override
            .clone()
            .or_else(|| config.map(|c| c.registry_url.clone()))
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
    }

    #[must_use]
    pub fn registry_client(&self, config: Option<&ProjectConfig>) -> RegistryClient {
        RegistryClient::new(self.registry_url(config))
    }

    /// Project-relative display form of `path`.
    #[must_use]
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root).unwrap_or(path).to_string_lossy().replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::PackageManager;

    fn config(url: &str) -> ProjectConfig {
        ProjectConfig {
            components_dir: "src/components/ui".to_string(),
            stories_dir: None,
            has_storybook: false,
            package_manager: PackageManager::Npm,
            registry_url: url.to_string(),
            css_file: None,
            css_framework_version: None,
            token_format: None,
        }
    }

    #[test]
    fn test_registry_url_precedence() {
        let ctx = RunContext::new("/project");
        assert_eq!(ctx.registry_url(None), DEFAULT_REGISTRY_URL);
        assert_eq!(ctx.registry_url(Some(&config("http://config"))), "http://config");

        let ctx = ctx.with_registry("http://override");
        assert_eq!(ctx.registry_url(Some(&config("http://config"))), "http://override");
        assert_eq!(ctx.registry_client(None).base_url(), "http://override");
    }

    #[test]
    fn test_display_path() {
        let ctx = RunContext::new("/project");
        assert_eq!(ctx.display_path(Path::new("/project/src/button.tsx")), "src/button.tsx");
        assert_eq!(ctx.display_path(Path::new("/elsewhere/x")), "/elsewhere/x");
    }
}
