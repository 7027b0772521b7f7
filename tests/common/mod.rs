//! Common helpers for Rafters integration tests.
//!
//! Every command runs against a temporary project with `CI` set, so prompts
//! take their defaults, and with `PATH` pointing at a directory of stub
//! package managers, so no real install ever runs.

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use rafters_cli::test_utils::{ComponentFixture, TestProject};

/// Temporary project plus a bin directory of stub package managers.
pub struct CliProject {
    pub project: TestProject,
    bin: TempDir,
}

impl CliProject {
    /// React project with a `package.json`, not yet initialized.
    pub fn new() -> Result<Self> {
        Self::wrap(TestProject::new()?)
    }

    /// Project already initialized with default answers.
    pub fn initialized() -> Result<Self> {
        Self::wrap(TestProject::initialized()?)
    }

    pub fn empty() -> Result<Self> {
        Self::wrap(TestProject::empty()?)
    }

    fn wrap(project: TestProject) -> Result<Self> {
        let bin = TempDir::new()?;
        for manager in ["npm", "yarn", "pnpm"] {
            write_stub(bin.path(), manager).with_context(|| format!("Failed to stub {manager}"))?;
        }
        Ok(Self {
            project,
            bin,
        })
    }

    pub fn root(&self) -> &Path {
        self.project.root()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project.path(relative)
    }

    /// `rafters` command for this project talking to `registry_url`.
    pub fn rafters(&self, registry_url: &str) -> Command {
        let mut cmd = Command::cargo_bin("rafters").expect("rafters binary is built");
        cmd.current_dir(self.root())
            .env("RAFTERS_REGISTRY_URL", registry_url)
            .env("CI", "1")
            .env("NO_COLOR", "1")
            .env("PATH", self.bin.path())
            .env_remove("RUST_LOG");
        cmd
    }
}

#[cfg(unix)]
fn write_stub(dir: &Path, name: &str) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\nexit 0\n")?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(windows)]
fn write_stub(dir: &Path, name: &str) -> Result<()> {
    std::fs::write(dir.join(format!("{name}.cmd")), "@exit /b 0\r\n")?;
    Ok(())
}

/// Parsed `.rafters/component-manifest.json`.
pub fn read_manifest(root: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(root.join(".rafters/component-manifest.json"))
        .expect("manifest exists");
    serde_json::from_str(&raw).expect("manifest is JSON")
}
