//! Error handling for Rafters
//!
//! This module provides the error taxonomy and user-friendly error reporting
//! for the Rafters CLI. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Configuration**: [`RaftersError::NotInitialized`], [`RaftersError::ConfigParseError`],
//!   [`RaftersError::AlreadyInitialized`], [`RaftersError::NotAHostProject`],
//!   [`RaftersError::MissingFrameworkDependency`], [`RaftersError::IncompatibleCssFramework`]
//! - **Registry**: [`RaftersError::RegistryTimeout`], [`RaftersError::RegistryHttpError`],
//!   [`RaftersError::RegistrySchemaError`], [`RaftersError::RegistryUnreachable`],
//!   [`RaftersError::ComponentNotFound`]
//! - **Dependencies**: [`RaftersError::DependencyInstallError`] (never fatal)
//! - **Integrity**: [`RaftersError::ManifestIntegrityError`]
//! - **File system**: [`RaftersError::FileSystemError`], [`RaftersError::ComponentExists`],
//!   [`RaftersError::IoError`]
//!
//! Detection helpers never produce these errors; they return `Option` values.
//! Fetch and resolution functions return them, and they are converted exactly
//! once at the command boundary with [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use rafters_cli::core::{RaftersError, ErrorContext};
//!
//! let context = ErrorContext::new(RaftersError::NotInitialized {
//!     path: ".rafters/config.json".to_string(),
//! })
//! .with_suggestion("Run 'rafters init' first");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for Rafters operations.
#[derive(Error, Debug)]
pub enum RaftersError {
    /// The project has no `.rafters/config.json`.
    #[error("Project is not initialized: {path} not found")]
    NotInitialized {
        /// Expected location of the configuration file
        path: String,
    },

    /// The configuration file exists but cannot be read or parsed.
    #[error("Invalid project configuration in {path}: {reason}")]
    ConfigParseError {
        /// Path of the configuration file
        path: String,
        /// Parser or I/O message
        reason: String,
    },

    /// `init` was run in a project that already has a configuration.
    #[error("Project is already initialized: {path} exists")]
    AlreadyInitialized {
        /// Path of the existing configuration file
        path: String,
    },

    /// No package descriptor was found at the project root.
    #[error("No package.json found in {path}")]
    NotAHostProject {
        /// The project root that was inspected
        path: String,
    },

    /// The package descriptor lacks the required framework dependency.
    #[error("Required dependency '{dependency}' is not declared in package.json")]
    MissingFrameworkDependency {
        /// Name of the missing dependency
        dependency: String,
    },

    /// The installed CSS framework major version is too old.
    #[error("{package} {found} is not supported (requires {required} or newer)")]
    IncompatibleCssFramework {
        /// Package name of the CSS framework
        package: String,
        /// Version range declared by the project
        found: String,
        /// Minimum supported major version
        required: String,
    },

    /// A registry request did not complete within the fixed timeout.
    #[error("Registry request to {url} timed out after {seconds}s")]
    RegistryTimeout {
        /// Requested URL
        url: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The registry answered with a non-success status code.
    #[error("Registry request to {url} failed with HTTP {status}")]
    RegistryHttpError {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The registry payload did not have the expected shape.
    #[error("Unexpected registry response from {url}: {reason}")]
    RegistrySchemaError {
        /// Requested URL
        url: String,
        /// What was wrong with the payload
        reason: String,
    },

    /// The registry could not be reached at all.
    #[error("Cannot reach registry at {url}")]
    RegistryUnreachable {
        /// Requested URL
        url: String,
        /// Transport error message
        reason: String,
    },

    /// Neither the per-item endpoint nor the catalog contained the component.
    #[error("Component '{name}' not found in registry")]
    ComponentNotFound {
        /// Requested component name
        name: String,
        /// Names the catalog does offer, for the hint
        available: Vec<String>,
    },

    /// The component file already exists and `--force` was not given.
    #[error("Component already exists at {path}")]
    ComponentExists {
        /// Project-relative path of the existing file
        path: String,
    },

    /// A fetched descriptor lacks the metadata every install record requires.
    #[error("Component '{name}' cannot be installed: {reason}")]
    ManifestIntegrityError {
        /// Component name
        name: String,
        /// Which metadata is missing or invalid
        reason: String,
    },

    /// The package manager failed to add dependencies.
    #[error("{manager} failed to install dependencies: {reason}")]
    DependencyInstallError {
        /// Package manager binary name
        manager: String,
        /// Exit status or stderr excerpt
        reason: String,
    },

    /// A file or directory could not be written.
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The operation that failed
        operation: String,
        /// Path involved
        path: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl RaftersError {
    /// Whether this error belongs to the registry family.
    ///
    /// Used by `list` and by `init`'s theme fetch, which degrade on registry
    /// failures instead of aborting.
    #[must_use]
    pub const fn is_registry_error(&self) -> bool {
        matches!(
            self,
            Self::RegistryTimeout { .. }
                | Self::RegistryHttpError { .. }
                | Self::RegistrySchemaError { .. }
                | Self::RegistryUnreachable { .. }
                | Self::ComponentNotFound { .. }
        )
    }
}

impl Clone for RaftersError {
    fn clone(&self) -> Self {
        match self {
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::NotInitialized {
                path,
            } => Self::NotInitialized {
                path: path.clone(),
            },
            Self::ConfigParseError {
                path,
                reason,
            } => Self::ConfigParseError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::AlreadyInitialized {
                path,
            } => Self::AlreadyInitialized {
                path: path.clone(),
            },
            Self::NotAHostProject {
                path,
            } => Self::NotAHostProject {
                path: path.clone(),
            },
            Self::MissingFrameworkDependency {
                dependency,
            } => Self::MissingFrameworkDependency {
                dependency: dependency.clone(),
            },
            Self::IncompatibleCssFramework {
                package,
                found,
                required,
            } => Self::IncompatibleCssFramework {
                package: package.clone(),
                found: found.clone(),
                required: required.clone(),
            },
            Self::RegistryTimeout {
                url,
                seconds,
            } => Self::RegistryTimeout {
                url: url.clone(),
                seconds: *seconds,
            },
            Self::RegistryHttpError {
                url,
                status,
            } => Self::RegistryHttpError {
                url: url.clone(),
                status: *status,
            },
            Self::RegistrySchemaError {
                url,
                reason,
            } => Self::RegistrySchemaError {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::RegistryUnreachable {
                url,
                reason,
            } => Self::RegistryUnreachable {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::ComponentNotFound {
                name,
                available,
            } => Self::ComponentNotFound {
                name: name.clone(),
                available: available.clone(),
            },
            Self::ComponentExists {
                path,
            } => Self::ComponentExists {
                path: path.clone(),
            },
            Self::ManifestIntegrityError {
                name,
                reason,
            } => Self::ManifestIntegrityError {
                name: name.clone(),
                reason: reason.clone(),
            },
            Self::DependencyInstallError {
                manager,
                reason,
            } => Self::DependencyInstallError {
                manager: manager.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a user-facing suggestion and details.
///
/// Displayed by `main` with color coding:
/// - Error message: red and bold
/// - Details: yellow
/// - Suggestion: green
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying Rafters error
    pub error: RaftersError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: RaftersError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions.
///
/// Recognizes [`RaftersError`] anywhere in the `anyhow` chain, then plain
/// [`std::io::Error`]s, and falls back to the full error chain for anything else.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    // `downcast_ref` also sees a RaftersError attached with `.context(...)`.
    if let Some(rafters_error) = error
        .downcast_ref::<RaftersError>()
        .or_else(|| error.chain().find_map(|e| e.downcast_ref::<RaftersError>()))
    {
        return create_error_context(rafters_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(RaftersError::FileSystemError {
                operation: "file access".to_string(),
                path: "unknown".to_string(),
            })
            .with_suggestion("Check file ownership and permissions in the project directory")
            .with_details("Rafters could not read or write a project file");
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(RaftersError::Other {
        message,
    })
}

/// Map each [`RaftersError`] variant to tailored suggestions.
fn create_error_context(error: RaftersError) -> ErrorContext {
    match &error {
        RaftersError::NotInitialized {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'rafters init' in the project root first"),
        RaftersError::ConfigParseError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Fix the JSON syntax in .rafters/config.json, or delete the .rafters directory and run 'rafters init' again",
        ),
        RaftersError::AlreadyInitialized {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Delete .rafters/config.json if you want to re-run initialization",
        ),
        RaftersError::NotAHostProject {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run this command from the root of a JavaScript project"),
        RaftersError::MissingFrameworkDependency {
            dependency,
        } => {
            let suggestion = format!("Add '{dependency}' to your project dependencies");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        RaftersError::IncompatibleCssFramework {
            package,
            required,
            ..
        } => {
            let suggestion = format!("Upgrade {package} to version {required} or newer");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        RaftersError::RegistryTimeout {
            ..
        }
        | RaftersError::RegistryUnreachable {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check your network connection or set RAFTERS_REGISTRY_URL")
            .with_details("Registry requests are not retried"),
        RaftersError::RegistryHttpError {
            ..
        }
        | RaftersError::RegistrySchemaError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Verify that the configured registry URL points to a Rafters registry"),
        RaftersError::ComponentNotFound {
            name,
            available,
        } => {
            let mut ctx = ErrorContext::new(error.clone());
            let similar = closest_names(name, available);
            if !similar.is_empty() {
                ctx = ctx.with_suggestion(format!("Did you mean: {}?", similar.join(", ")));
            } else {
                ctx = ctx.with_suggestion("Run 'rafters list' to see available components");
            }
            if !available.is_empty() {
                ctx = ctx.with_details(format!("Available components: {}", available.join(", ")));
            }
            ctx
        }
        RaftersError::ComponentExists {
            ..
        } => ErrorContext::new(error).with_suggestion("Use --force to overwrite"),
        RaftersError::ManifestIntegrityError {
            ..
        } => ErrorContext::new(error)
            .with_details("Every installed component must carry intelligence metadata")
            .with_suggestion("Report the incomplete component to the registry maintainers"),
        RaftersError::DependencyInstallError {
            manager,
            ..
        } => {
            let suggestion = format!("Run '{manager}' manually to add the missing packages");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        RaftersError::FileSystemError {
            path,
            ..
        } => {
            let details = format!("Path: {path}");
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check that the target directories are writable")
        }
        RaftersError::IoError(_) => ErrorContext::new(error)
            .with_suggestion("Check that the target directories are writable"),
        _ => ErrorContext::new(error),
    }
}

/// Rank catalog names by similarity to a misspelled request.
fn closest_names(name: &str, available: &[String]) -> Vec<String> {
    let needle = name.to_lowercase();
    let mut scored: Vec<(f64, &String)> = available
        .iter()
        .map(|candidate| (strsim::jaro_winkler(&needle, &candidate.to_lowercase()), candidate))
        .filter(|(score, _)| *score >= 0.8)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(3).map(|(_, n)| n.clone()).collect()
}
