//! Show registry components and which of them are installed.
//!
//! `list` never fails because of the registry: when the catalog cannot be
//! fetched it warns and falls back to the components recorded in the install
//! manifest. It works in uninitialized projects too, using the default or
//! environment registry URL.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;
use tracing::warn;

use super::common::RunContext;
use crate::core::RaftersError;
use crate::manifest::{InstallManifestFile, InstallRecord};
use crate::project::ProjectConfig;
use crate::registry::RemoteComponentDescriptor;

/// Command to list available and installed components.
///
/// # Examples
///
/// ```bash
/// rafters list
/// rafters list --details
/// ```
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Show description, type, cognitive load, dependencies and usage patterns
    #[arg(short, long)]
    details: bool,
}

/// One row of the listing.
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub name: String,
    /// Registry descriptor; `None` when the registry was unavailable or no
    /// longer publishes the component
    pub descriptor: Option<RemoteComponentDescriptor>,
    /// Install record, when installed
    pub record: Option<InstallRecord>,
}

impl ListEntry {
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        self.record.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ListReport {
    pub entries: Vec<ListEntry>,
    /// Set when the catalog could not be fetched
    pub registry_error: Option<RaftersError>,
}

impl ListCommand {
    pub async fn execute(self, ctx: &RunContext) -> Result<()> {
        let report = run_list(ctx).await?;
        if let Some(e) = &report.registry_error {
            eprintln!("{} Registry unavailable ({}); showing installed components only", "⚠".yellow(), e);
        }
        print!("{}", render(&report, self.details));
        Ok(())
    }
}

/// Collect the listing for the project described by `ctx`.
pub async fn run_list(ctx: &RunContext) -> Result<ListReport> {
    let config = match ProjectConfig::load(ctx.root()) {
        Ok(config) => Some(config),
        Err(RaftersError::NotInitialized {
            ..
        }) => None,
        Err(e) => return Err(e.into()),
    };
    let mut manifest = InstallManifestFile::load(ctx.root());

    let client = ctx.registry_client(config.as_ref());
    let catalog = match client.fetch_catalog().await {
        Ok(catalog) => catalog,
        Err(e) if e.is_registry_error() => {
            warn!("Falling back to installed components: {}", e);
            let entries = manifest
                .components
                .into_iter()
                .map(|(name, record)| ListEntry {
                    name,
                    descriptor: None,
                    record: Some(record),
                })
                .collect();
            return Ok(ListReport {
                entries,
                registry_error: Some(e),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut entries: Vec<ListEntry> = catalog
        .components
        .into_iter()
        .map(|descriptor| ListEntry {
            name: descriptor.name.clone(),
            record: manifest.components.remove(&descriptor.name),
            descriptor: Some(descriptor),
        })
        .collect();

    // Installed components the registry no longer publishes.
    entries.extend(manifest.components.into_iter().map(|(name, record)| ListEntry {
        name,
        descriptor: None,
        record: Some(record),
    }));

    Ok(ListReport {
        entries,
        registry_error: None,
    })
}

/// Render the listing as terminal text.
#[must_use]
pub fn render(report: &ListReport, details: bool) -> String {
    let mut out = String::new();
    let title = if report.registry_error.is_some() { "Installed components" } else { "Components" };

    if report.entries.is_empty() {
        let _ = writeln!(out, "No components found.");
        return out;
    }

    let installed = report.entries.iter().filter(|e| e.is_installed()).count();
    let _ = writeln!(out, "{} ({} total, {} installed)", title.bold(), report.entries.len(), installed);

    let width = report.entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in &report.entries {
        let marker = if entry.is_installed() { "✓".green().to_string() } else { " ".to_string() };
        let summary = entry
            .descriptor
            .as_ref()
            .and_then(|d| d.description.as_deref())
            .or_else(|| entry.record.as_ref().map(|r| r.path.as_str()))
            .unwrap_or_default();

        if !details {
            let _ = writeln!(out, "  {marker} {:<width$}  {}", entry.name, summary.dimmed());
            continue;
        }

        let _ = writeln!(out, "  {marker} {}", entry.name.bold());
        if !summary.is_empty() {
            let _ = writeln!(out, "      {summary}");
        }
        if let Some(descriptor) = &entry.descriptor {
            let _ = writeln!(out, "      Type: {}", descriptor.kind);
        }

        let intelligence = entry
            .descriptor
            .as_ref()
            .and_then(RemoteComponentDescriptor::intelligence)
            .or_else(|| entry.record.as_ref().map(|r| &r.intelligence));
        if let Some(intelligence) = intelligence {
            let _ = writeln!(out, "      Cognitive load: {}/10", intelligence.cognitive_load);
            let _ = writeln!(
                out,
                "      Usage: {} do(s), {} never(s)",
                intelligence.usage_patterns.dos.len(),
                intelligence.usage_patterns.nevers.len()
            );
        }

        let dependencies = entry
            .descriptor
            .as_ref()
            .map(|d| &d.dependencies)
            .or_else(|| entry.record.as_ref().map(|r| &r.dependencies));
        if let Some(dependencies) = dependencies.filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "      Dependencies: {}", dependencies.join(", "));
        }
        if let Some(record) = &entry.record {
            let _ = writeln!(out, "      Installed: {} ({})", record.path, record.version);
        }
    }
    out
}
