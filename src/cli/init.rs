//! Initialize Rafters in an existing JavaScript project.
//!
//! `init` runs once per project. It checks prerequisites, asks a handful of
//! questions seeded from project detection, and scaffolds:
//!
//! ```text
//! .rafters/
//! ├── config.json               # answers + detected package manager
//! ├── component-manifest.json   # empty install record
//! ├── AGENTS.md                 # guidance for coding agents
//! └── tokens.json               # only with the json token format
//! {componentsDir}/
//! {storiesDir}/                 # only with Storybook
//! {first segment}/lib/utils.ts  # class-name helper used by components
//! ```
//!
//! Design tokens go into the chosen stylesheet (or `tokens.json`), and the
//! packages the helper needs are installed on a best-effort basis.
//!
//! # Prerequisites
//!
//! - `package.json` exists and declares `react`
//! - `.rafters/config.json` does not exist yet
//! - `tailwindcss`, when declared, is at least version 4

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::{debug, warn};

use super::common::RunContext;
use super::prompt::{DefaultsPrompter, Prompter, TerminalPrompter};
use crate::constants::{
    AGENT_GUIDE_FILE, BASE_DEPENDENCIES, CONFIG_FILE, CSS_FRAMEWORK_PACKAGE, DEFAULT_COMPONENTS_DIR,
    DEFAULT_STORIES_DIR, MANIFEST_FILE, MIN_CSS_FRAMEWORK_MAJOR, REQUIRED_FRAMEWORK_DEPENDENCY,
};
use crate::core::RaftersError;
use crate::installer::{DependencyInstaller, PackageManagerInstaller};
use crate::manifest::InstallManifestFile;
use crate::project::{PackageJson, ProjectConfig, ProjectDetector, TokenFormat, version_range_major};
use crate::templating::render_agent_guide;
use crate::theme::{DEFAULT_THEME_ID, Theme, ThemeSource, TokenOutput};
use crate::utils::fs::{ensure_dir, safe_write};
use crate::utils::paths;

const UTILS_SOURCE: &str = r"import { type ClassValue, clsx } from 'clsx';
import { twMerge } from 'tailwind-merge';

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs));
}
";

/// Command to initialize Rafters in the current project.
///
/// Takes no flags. Questions are asked on the terminal when stdin is a TTY
/// and `CI` is unset; otherwise the detected defaults are used.
#[derive(Args, Debug)]
pub struct InitCommand {}

/// Answers collected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub has_storybook: bool,
    pub components_dir: String,
    pub stories_dir: Option<String>,
    pub css_file: String,
    pub theme_id: String,
    pub token_format: TokenFormat,
}

/// What `init` did.
#[derive(Debug, Clone)]
pub struct InitReport {
    pub config: ProjectConfig,
    pub framework: String,
    pub theme_source: ThemeSource,
    pub tokens: TokenOutput,
    /// Helper file created, project-relative; `None` when it already existed
    pub utils_file: Option<String>,
    /// Base packages that were not declared yet
    pub installed: Vec<String>,
    /// Best-effort install failure
    pub dependency_warning: Option<RaftersError>,
}

impl InitCommand {
    pub async fn execute(self, ctx: &RunContext) -> Result<()> {
        let manager = ProjectDetector::new(ctx.root()).detect_package_manager();
        let installer = PackageManagerInstaller::new(manager);

        let report = if ctx.interactive {
            run_init(ctx, &mut TerminalPrompter::stdio(), &installer).await?
        } else {
            run_init(ctx, &mut DefaultsPrompter, &installer).await?
        };

        println!("{} Initialized Rafters ({})", "✓".green(), report.framework);
        println!("  {} {}", "Config:".dimmed(), CONFIG_FILE);
        println!("  {} {}", "Components:".dimmed(), report.config.components_dir);
        if let Some(stories) = &report.config.stories_dir {
            println!("  {} {}", "Stories:".dimmed(), stories);
        }
        match &report.tokens {
            TokenOutput::Stylesheet(path) => println!("  {} {}", "Tokens:".dimmed(), path),
            TokenOutput::AlreadyPresent(path) => {
                println!("  {} {} (already present)", "Tokens:".dimmed(), path);
            }
            TokenOutput::Json(path) => println!("  {} {}", "Tokens:".dimmed(), ctx.display_path(path)),
        }
        if report.theme_source == ThemeSource::BuiltIn {
            println!("  {} built-in palette", "Theme:".dimmed());
        }
        if let Some(warning) = &report.dependency_warning {
            eprintln!("{} {}", "⚠".yellow(), warning);
            eprintln!("  Install manually: {} {}", report.config.package_manager, report.installed.join(" "));
        }

        println!("\n{}", "Next steps:".cyan());
        println!("  {} to browse components", "rafters list".bright_white());
        println!("  {} to install one", "rafters add <component>".bright_white());
        Ok(())
    }
}

/// Initialize the project described by `ctx`.
pub async fn run_init(
    ctx: &RunContext,
    prompter: &mut dyn Prompter,
    installer: &dyn DependencyInstaller,
) -> Result<InitReport> {
    let root = ctx.root();
    let detector = ProjectDetector::new(root);

    check_prerequisites(ctx, &detector)?;
    let css_framework_version = check_css_framework(&detector)?;

    let framework = detector.detect_framework();
    let package_manager = detector.detect_package_manager();
    debug!("Detected framework {} and package manager {}", framework, package_manager);

    let answers = ask(prompter, &detector)?;

    let registry_url = ctx.registry_url(None);
    let theme = Theme::acquire(&ctx.registry_client(None), &answers.theme_id).await;

    let config = ProjectConfig {
        components_dir: answers.components_dir.clone(),
        stories_dir: answers.stories_dir.clone(),
        has_storybook: answers.has_storybook,
        package_manager,
        registry_url,
        css_file: (answers.token_format != TokenFormat::Json).then(|| answers.css_file.clone()),
        css_framework_version,
        token_format: Some(answers.token_format),
    };

    // Scaffolding. The config is written last so a failed run can be retried.
    if !root.join(MANIFEST_FILE).exists() {
        InstallManifestFile::new().save(root)?;
    }
    safe_write(&root.join(AGENT_GUIDE_FILE), &render_agent_guide(&config)?)?;

    ensure_dir(&root.join(&config.components_dir))?;
    if let Some(stories_dir) = &config.stories_dir {
        ensure_dir(&root.join(stories_dir))?;
    }
    let utils_file = write_utils(root, &config.components_dir)?;
    let tokens = theme.write(root, answers.token_format, &answers.css_file)?;

    config.save(root).with_context(|| RaftersError::FileSystemError {
        operation: "write project configuration".to_string(),
        path: CONFIG_FILE.to_string(),
    })?;

    let declared = PackageJson::read(root).unwrap_or_default();
    let installed: Vec<String> = BASE_DEPENDENCIES
        .iter()
        .filter(|package| !declared.has_dependency(package))
        .map(|package| (*package).to_string())
        .collect();
    let dependency_warning = if installed.is_empty() {
        None
    } else {
        installer.install(root, &installed, false).await.err().inspect(|e| {
            warn!("Could not install base dependencies: {}", e);
        })
    };

    Ok(InitReport {
        config,
        framework: framework.to_string(),
        theme_source: theme.source,
        tokens,
        utils_file,
        installed,
        dependency_warning,
    })
}

fn check_prerequisites(ctx: &RunContext, detector: &ProjectDetector) -> Result<(), RaftersError> {
    if !detector.is_host_project() {
        return Err(RaftersError::NotAHostProject {
            path: ctx.root().display().to_string(),
        });
    }
    if !detector.has_required_framework_dependency() {
        return Err(RaftersError::MissingFrameworkDependency {
            dependency: REQUIRED_FRAMEWORK_DEPENDENCY.to_string(),
        });
    }
    if ProjectConfig::exists(ctx.root()) {
        return Err(RaftersError::AlreadyInitialized {
            path: CONFIG_FILE.to_string(),
        });
    }
    Ok(())
}

/// Reject CSS framework versions below the supported major.
///
/// Returns the declared range for the configuration. A range whose major
/// cannot be determined (`latest`, `workspace:*`) passes.
fn check_css_framework(detector: &ProjectDetector) -> Result<Option<String>, RaftersError> {
    let Some(range) = detector.detect_css_framework_version() else {
        debug!("{} not declared, skipping version gate", CSS_FRAMEWORK_PACKAGE);
        return Ok(None);
    };

    match version_range_major(&range) {
        Some(major) if major < MIN_CSS_FRAMEWORK_MAJOR => Err(RaftersError::IncompatibleCssFramework {
            package: CSS_FRAMEWORK_PACKAGE.to_string(),
            found: range,
            required: MIN_CSS_FRAMEWORK_MAJOR.to_string(),
        }),
        Some(_) => Ok(Some(range)),
        None => {
            debug!("Cannot determine major version of {} '{}'", CSS_FRAMEWORK_PACKAGE, range);
            Ok(Some(range))
        }
    }
}

fn ask(prompter: &mut dyn Prompter, detector: &ProjectDetector) -> Result<InitAnswers> {
    let has_storybook = prompter.confirm("Use Storybook?", detector.has_storybook_dependency())?;
    let components_dir = normalize_dir(&prompter.input("Components directory", DEFAULT_COMPONENTS_DIR)?);
    let stories_dir = if has_storybook {
        Some(normalize_dir(&prompter.input("Stories directory", DEFAULT_STORIES_DIR)?))
    } else {
        None
    };

    let css_default = detector
        .find_existing_stylesheet()
        .unwrap_or_else(|| detector.detect_framework().default_stylesheet().to_string());
    let css_file = normalize_dir(&prompter.input("Stylesheet for design tokens", &css_default)?);
    let theme_id = prompter.input("Theme", DEFAULT_THEME_ID)?;

    let formats: Vec<String> = TokenFormat::ALL.iter().map(ToString::to_string).collect();
    let choice = prompter.select("Token output format", &formats, 0)?;
    let token_format = TokenFormat::ALL.get(choice).copied().unwrap_or_default();

    Ok(InitAnswers {
        has_storybook,
        components_dir,
        stories_dir,
        css_file,
        theme_id,
        token_format,
    })
}

/// Forward-slash, project-relative form of a user-supplied path.
fn normalize_dir(input: &str) -> String {
    paths::segments(input.trim()).join("/")
}

/// Write `{first segment}/lib/utils.ts` unless it exists.
fn write_utils(root: &std::path::Path, components_dir: &str) -> Result<Option<String>> {
    let base = paths::first_segment(components_dir).unwrap_or("src");
    let relative = format!("{base}/lib/utils.ts");
    let path = root.join(&relative);
    if path.exists() {
        debug!("{} already exists", relative);
        return Ok(None);
    }
    safe_write(&path, UTILS_SOURCE)?;
    Ok(Some(relative))
}
