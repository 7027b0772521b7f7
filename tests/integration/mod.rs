//! Integration test suite for Rafters
//!
//! End-to-end tests that run the `rafters` binary against temporary projects
//! and a mock registry.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **init**: Project initialization and prerequisites
//! - **add**: Component installation, overwrite protection and stories
//! - **list**: Catalog listing and registry degradation
//! - **error_scenarios**: Exit codes and messages for fatal errors

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod add;
mod error_scenarios;
mod init;
mod list;
