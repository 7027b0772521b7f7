//! Rafters - design-intelligent component installer
//!
//! Rafters copies React components from a remote registry into a host
//! project's source tree. Each component arrives with design-intelligence
//! metadata (cognitive load, attention and trust guidance, usage patterns)
//! that is recorded locally so people and coding agents can reason about a
//! screen's composition.
//!
//! # Architecture Overview
//!
//! ```text
//!             ┌──────────────┐
//!             │  cli (add,   │
//!             │  init, list) │
//!             └──────┬───────┘
//!    ┌─────────┬─────┴─────┬──────────┬───────────┐
//!    ▼         ▼           ▼          ▼           ▼
//! registry  project     adapter   manifest    installer
//! (HTTP)    (detect,    (rewrite  (install    (package
//!           config)     source)   record)     manager)
//! ```
//!
//! - The registry is read-only and every request is bounded by a fixed timeout.
//! - Project detection never fails; "not detected" is an explicit `None`.
//! - The source adapter is an ordered list of rewrite rules and is idempotent.
//! - The install manifest tolerates being missing or corrupt.
//!
//! # Project Files
//!
//! - `.rafters/config.json` - written once by `init`
//! - `.rafters/component-manifest.json` - updated by every `add`
//! - `.rafters/AGENTS.md` - guidance for coding agents
//! - `{componentsDir}/{name}.tsx` - installed component sources
//!
//! # Modules
//!
//! - [`cli`] - Command definitions and orchestration
//! - [`registry`] - Registry HTTP client and payload types
//! - [`project`] - Project detection and configuration
//! - [`adapter`] - Source rewriting for the host layout
//! - [`manifest`] - Install record persistence
//! - [`installer`] - Package-manager collaborator
//! - [`theme`] - Design-token palettes for `init`
//! - [`templating`] - Story and agent guide templates
//! - [`core`] - Error types and user-facing error formatting
//! - [`utils`] - Filesystem and path helpers

pub mod adapter;
pub mod cli;
pub mod constants;
pub mod core;
pub mod installer;
pub mod manifest;
pub mod project;
pub mod registry;
pub mod templating;
pub mod theme;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
