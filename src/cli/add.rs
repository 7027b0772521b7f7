//! Install a single component into an initialized project.
//!
//! `add` runs a fixed sequence of stages:
//!
//! ```text
//! ReadConfig → FetchComponent → CheckExisting → BuildRecord
//!     → InstallDependencies → AdaptAndWrite → WriteStory → UpdateManifest
//! ```
//!
//! Every stage before `InstallDependencies` is a gate: a failure aborts with
//! nothing written. A failed dependency install is reported as a warning and
//! the component is still written, since the user can rerun the package
//! manager by hand. The manifest is only updated after the component file is
//! on disk.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fmt;
use tracing::{debug, warn};

use super::common::RunContext;
use crate::adapter::{AdaptTarget, SourceAdapter};
use crate::constants::COMPONENT_EXTENSION;
use crate::core::RaftersError;
use crate::installer::{DependencyInstaller, PackageManagerInstaller};
use crate::manifest::{InstallManifestFile, InstallRecord};
use crate::project::{ProjectConfig, ProjectDetector};
use crate::templating::{render_story, story_file_name};
use crate::utils::fs::safe_write;
use crate::utils::paths;

/// Command to install a component from the registry.
///
/// # Examples
///
/// ```bash
/// rafters add button
/// rafters add dialog --force
/// ```
#[derive(Args, Debug)]
pub struct AddCommand {
    /// Component name as published by the registry
    component: String,

    /// Overwrite the component file if it already exists
    #[arg(short, long)]
    force: bool,
}

/// Orchestration stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStage {
    ReadConfig,
    FetchComponent,
    CheckExisting,
    BuildRecord,
    InstallDependencies,
    AdaptAndWrite,
    WriteStory,
    UpdateManifest,
}

impl fmt::Display for AddStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadConfig => "read config",
            Self::FetchComponent => "fetch component",
            Self::CheckExisting => "check existing",
            Self::BuildRecord => "build record",
            Self::InstallDependencies => "install dependencies",
            Self::AdaptAndWrite => "adapt and write",
            Self::WriteStory => "write story",
            Self::UpdateManifest => "update manifest",
        };
        f.write_str(name)
    }
}

/// What `add` did.
#[derive(Debug, Clone)]
pub struct AddReport {
    /// Canonical component name from the registry
    pub name: String,
    /// Component file, project-relative
    pub path: String,
    /// Story file, project-relative
    pub story: Option<String>,
    /// Whether an existing file was replaced
    pub overwritten: bool,
    /// Dependency install failures, downgraded to warnings
    pub dependency_warnings: Vec<RaftersError>,
    pub record: InstallRecord,
}

impl AddCommand {
    pub async fn execute(self, ctx: &RunContext) -> Result<()> {
        let config = ProjectConfig::load(ctx.root())?;
        let installer = PackageManagerInstaller::new(config.package_manager);

        let report = run_add(ctx, &self.component, self.force, &installer).await?;

        for warning in &report.dependency_warnings {
            eprintln!("{} {}", "⚠".yellow(), warning);
        }
        let verb = if report.overwritten { "Replaced" } else { "Installed" };
        println!("{} {} {} at {}", "✓".green(), verb, report.name.bold(), report.path);
        if let Some(story) = &report.story {
            println!("  Story: {story}");
        }
        println!(
            "  Cognitive load: {}/10",
            report.record.intelligence.cognitive_load.to_string().cyan()
        );
        Ok(())
    }
}

/// Install `name` into the project described by `ctx`.
pub async fn run_add(
    ctx: &RunContext,
    name: &str,
    force: bool,
    installer: &dyn DependencyInstaller,
) -> Result<AddReport> {
    let root = ctx.root();

    stage(name, AddStage::ReadConfig);
    let config = ProjectConfig::load(root)?;
    let components_dir = paths::segments(&config.components_dir).join("/");

    stage(name, AddStage::FetchComponent);
    let client = ctx.registry_client(Some(&config));
    let descriptor = client.fetch_component(name).await?;
    paths::validate_file_stem(&descriptor.name).map_err(|reason| RaftersError::RegistrySchemaError {
        url: client.base_url().to_string(),
        reason,
    })?;

    stage(name, AddStage::CheckExisting);
    let relative = format!("{components_dir}/{}.{COMPONENT_EXTENSION}", descriptor.name);
    let target = root.join(&relative);
    let overwritten = target.exists();
    if overwritten && !force {
        return Err(RaftersError::ComponentExists {
            path: relative,
        }
        .into());
    }

    stage(name, AddStage::BuildRecord);
    let mut record = InstallRecord::from_descriptor(&descriptor, relative.clone())?;

    stage(name, AddStage::InstallDependencies);
    let mut dependency_warnings = Vec::new();
    for (packages, dev) in [(descriptor.dependencies.as_slice(), false), (descriptor.dev_dependencies(), true)]
    {
        if packages.is_empty() {
            continue;
        }
        if let Err(e) = installer.install(root, packages, dev).await {
            warn!("Dependency install failed, continuing: {}", e);
            dependency_warnings.push(e);
        }
    }

    stage(name, AddStage::AdaptAndWrite);
    let alias = ProjectDetector::new(root).detect_import_alias();
    let adapter = SourceAdapter::new()?;
    let adapt_target = AdaptTarget {
        components_dir: &components_dir,
        alias: alias.as_deref(),
    };
    let source = descriptor.source().unwrap_or_else(|| {
        warn!("Registry entry '{}' has no source; writing an empty component file", descriptor.name);
        ""
    });
    safe_write(&target, &adapter.adapt(source, &adapt_target)).with_context(|| {
        RaftersError::FileSystemError {
            operation: "write component file".to_string(),
            path: relative.clone(),
        }
    })?;

    stage(name, AddStage::WriteStory);
    let mut story = None;
    if let (true, Some(stories_dir)) = (config.has_storybook, config.stories_dir.as_deref()) {
        let stories_dir = paths::segments(stories_dir).join("/");
        let story_relative = format!("{stories_dir}/{}", story_file_name(&descriptor.name));
        let content = match descriptor.story_source() {
            Some(shipped) => adapter.adapt(shipped, &adapt_target),
            None => render_story(&descriptor, &components_dir, &stories_dir)?,
        };
        safe_write(&root.join(&story_relative), &content).with_context(|| {
            RaftersError::FileSystemError {
                operation: "write story file".to_string(),
                path: story_relative.clone(),
            }
        })?;
        record = record.with_story(story_relative.clone());
        story = Some(story_relative);
    }

    stage(name, AddStage::UpdateManifest);
    let mut manifest = InstallManifestFile::load(root);
    manifest.upsert(descriptor.name.clone(), record.clone());
    manifest.save(root).with_context(|| RaftersError::FileSystemError {
        operation: "update install manifest".to_string(),
        path: crate::constants::MANIFEST_FILE.to_string(),
    })?;

    Ok(AddReport {
        name: descriptor.name,
        path: relative,
        story,
        overwritten,
        dependency_warnings,
        record,
    })
}

fn stage(name: &str, stage: AddStage) {
    debug!("add {}: {}", name, stage);
}
