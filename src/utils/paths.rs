//! Project-relative path arithmetic.
//!
//! Configured directories (`componentsDir`, `storiesDir`) are stored as
//! forward-slash strings relative to the project root. These helpers operate
//! on those strings directly so generated import specifiers always use `/`,
//! regardless of the host platform.

use std::path::{Component, Path};

/// Split a project-relative directory into its normal segments.
///
/// Leading `./`, empty segments and `.` are dropped; `..` is kept verbatim.
#[must_use]
pub fn segments(dir: &str) -> Vec<&str> {
    dir.split(['/', '\\']).filter(|s| !s.is_empty() && *s != ".").collect()
}

/// Number of directory levels below the project root.
#[must_use]
pub fn depth(dir: &str) -> usize {
    segments(dir).len()
}

/// First segment of a directory, e.g. `src` for `src/components/ui`.
#[must_use]
pub fn first_segment(dir: &str) -> Option<&str> {
    segments(dir).into_iter().next()
}

/// Module specifier that reaches `to` (a project-relative path without
/// extension) from a file located in `from_dir`.
///
/// The result always starts with `./` or `../`, as required for relative
/// ES module imports.
#[must_use]
pub fn relative_specifier(from_dir: &str, to: &str) -> String {
    let from = segments(from_dir);
    let target = segments(to);

    let common = from.iter().zip(target.iter()).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from.len() {
        parts.push("..");
    }
    parts.extend(&target[common..]);

    let joined = parts.join("/");
    if joined.starts_with("..") { joined } else { format!("./{joined}") }
}

/// Check that a registry-supplied component name is a single file stem.
///
/// The name becomes a file name under the components and stories
/// directories, so separators, parent references, absolute paths and blank
/// names are rejected.
///
/// # Errors
/// Returns the reason the name cannot be used as a file name.
pub fn validate_file_stem(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("component name is empty".to_string());
    }
    if name.contains(['/', '\\']) {
        return Err(format!("component name '{name}' contains a path separator"));
    }
    if name.contains("..") {
        return Err(format!("component name '{name}' contains a parent directory reference (..)"));
    }
    let path = Path::new(name);
    if path.is_absolute() || !matches!(path.components().next(), Some(Component::Normal(_))) {
        return Err(format!("component name '{name}' is not a plain file name"));
    }
    Ok(())
}
