//! Global constants used throughout the Rafters codebase.
//!
//! This module contains timeout durations, well-known file names and other
//! fixed values that are used across multiple modules. Defining them
//! centrally makes magic strings more discoverable.

use std::time::Duration;

/// Timeout for a single registry request (10 seconds).
///
/// Applied to every registry fetch, including the catalog fallback. There is
/// no retry after a timeout.
pub const REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default registry base URL used when neither the environment nor the
/// project configuration provides one.
pub const DEFAULT_REGISTRY_URL: &str = "https://rafters.realhandy.tech/registry";

/// Environment variable overriding the registry base URL.
pub const REGISTRY_URL_ENV: &str = "RAFTERS_REGISTRY_URL";

/// Environment variable that, when set, forces non-interactive prompting.
pub const CI_ENV: &str = "CI";

/// User agent sent with every registry request.
pub const USER_AGENT: &str = concat!("rafters-cli/", env!("CARGO_PKG_VERSION"));

/// Project configuration file, relative to the project root.
pub const CONFIG_FILE: &str = ".rafters/config.json";

/// Install manifest file, relative to the project root.
pub const MANIFEST_FILE: &str = ".rafters/component-manifest.json";

/// Agent guidance document written during `init`.
pub const AGENT_GUIDE_FILE: &str = ".rafters/AGENTS.md";

/// Token output used by the `json` token format.
pub const TOKENS_JSON_FILE: &str = ".rafters/tokens.json";

/// Format version written into new install manifests.
pub const MANIFEST_FORMAT_VERSION: &str = "1.0.0";

/// Version recorded when the registry does not publish one for a component.
pub const UNVERSIONED: &str = "latest";

/// File extension for generated component sources.
pub const COMPONENT_EXTENSION: &str = "tsx";

/// Suffix appended to story file names: `{name}-intelligence.stories.tsx`.
pub const STORY_SUFFIX: &str = "-intelligence.stories.tsx";

/// Default components directory offered during `init`.
pub const DEFAULT_COMPONENTS_DIR: &str = "src/components/ui";

/// Default stories directory offered during `init`.
pub const DEFAULT_STORIES_DIR: &str = "src/stories";

/// Runtime dependency every host project must declare.
pub const REQUIRED_FRAMEWORK_DEPENDENCY: &str = "react";

/// Package name of the CSS framework gated during `init`.
pub const CSS_FRAMEWORK_PACKAGE: &str = "tailwindcss";

/// Oldest supported major version of the CSS framework.
pub const MIN_CSS_FRAMEWORK_MAJOR: u64 = 4;

/// Packages installed by `init` so adapted components can resolve `lib/utils`.
pub const BASE_DEPENDENCIES: &[&str] = &["class-variance-authority", "clsx", "tailwind-merge"];
