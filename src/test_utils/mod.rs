//! Test utilities for Rafters
//!
//! Helpers shared by unit tests and the integration suite:
//!
//! - [`TestProject`] - a throwaway host project in a temporary directory
//! - [`RecordingInstaller`] - a [`DependencyInstaller`](crate::installer::DependencyInstaller)
//!   that records calls instead of spawning a package manager
//! - [`ScriptedPrompter`] - canned answers for `init`
//! - [`ComponentFixture`] - registry descriptor payloads
//!
//! # Example
//!
//! ```rust,no_run
//! use rafters_cli::test_utils::TestProject;
//!
//! let project = TestProject::initialized().unwrap();
//! assert!(project.path(".rafters/config.json").exists());
//! ```

pub mod doubles;
pub mod environment;
pub mod fixtures;

pub use doubles::{RecordingInstaller, ScriptedPrompter};
pub use environment::TestProject;
pub use fixtures::ComponentFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; without either, logging
/// stays off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=rafters_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
