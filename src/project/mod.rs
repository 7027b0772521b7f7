//! Host project context.
//!
//! - [`detect`] - read-only heuristics (package manager, framework, stylesheet, alias)
//! - [`config`] - `.rafters/config.json`
//! - [`package_json`] - typed view of the package descriptor

pub mod config;
pub mod detect;
pub mod package_json;

pub use config::{ProjectConfig, TokenFormat};
pub use detect::{Framework, PackageManager, ProjectDetector, version_range_major};
pub use package_json::PackageJson;
