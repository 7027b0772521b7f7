//! Shared utilities
//!
//! - [`fs`] - Atomic writes and JSON helpers
//! - [`paths`] - Project-relative path arithmetic used by the adapter and story writer

pub mod fs;
pub mod paths;

pub use fs::{atomic_write, ensure_dir, read_json_file, safe_write, write_json_file};
