//! Package-manager collaborator.
//!
//! Installing npm packages is delegated to the project's own package manager.
//! The [`DependencyInstaller`] trait is the seam the orchestrators talk to, so
//! tests can substitute a recording double and never spawn a process.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::RaftersError;
use crate::project::PackageManager;

/// Installs packages into a host project.
#[async_trait]
pub trait DependencyInstaller: Send + Sync {
    /// Add `packages` to the project at `root`, as dev dependencies when `dev`.
    ///
    /// Called once per batch and never retried.
    async fn install(&self, root: &Path, packages: &[String], dev: bool) -> Result<(), RaftersError>;
}

/// Runs `npm install`, `yarn add` or `pnpm add` in the project directory.
#[derive(Debug, Clone)]
pub struct PackageManagerInstaller {
    manager: PackageManager,
    /// Directories searched for the binary instead of `PATH`
    search_path: Option<OsString>,
}

impl PackageManagerInstaller {
    #[must_use]
    pub const fn new(manager: PackageManager) -> Self {
        Self {
            manager,
            search_path: None,
        }
    }

    /// Look the binary up in `paths` (a `PATH`-style list) instead of `PATH`.
    #[must_use]
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    fn failure(&self, reason: impl Into<String>) -> RaftersError {
        RaftersError::DependencyInstallError {
            manager: self.manager.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DependencyInstaller for PackageManagerInstaller {
    async fn install(&self, root: &Path, packages: &[String], dev: bool) -> Result<(), RaftersError> {
        if packages.is_empty() {
            return Ok(());
        }

        let binary = match &self.search_path {
            Some(paths) => which::which_in(self.manager.binary(), Some(paths), root),
            None => which::which(self.manager.binary()),
        }
        .map_err(|e| self.failure(format!("{} not found on PATH: {e}", self.manager.binary())))?;
        let args = self.manager.install_args(packages, dev);

        debug!("Executing command: {} {} (in {})", binary.display(), args.join(" "), root.display());
        info!("Installing {} with {}", packages.join(", "), self.manager);

        let output = Command::new(&binary)
            .args(&args)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.failure(format!("failed to spawn {}: {e}", binary.display())))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("Command failed with exit code: {:?}", output.status.code());

        let detail = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
        Err(self.failure(format!(
            "`{} {}` exited with {}{}",
            self.manager.binary(),
            args.join(" "),
            output.status.code().map_or_else(|| "a signal".to_string(), |c| format!("code {c}")),
            last_lines(detail, 5).map(|tail| format!(":\n{tail}")).unwrap_or_default()
        )))
    }
}

/// Last `n` lines of `text`, or `None` when it is empty.
fn last_lines(text: &str, n: usize) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let lines: Vec<&str> = text.lines().collect();
    Some(lines[lines.len().saturating_sub(n)..].join("\n"))
}
