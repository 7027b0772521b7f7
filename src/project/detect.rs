//! Best-effort inspection of the host project.
//!
//! Everything here is read-only and never fails: missing or unreadable files
//! produce `None` or a documented default, and the caller decides what that
//! means. Every list below is scanned in order and the first match wins,
//! which keeps results deterministic when a project carries conflicting hints
//! (for example lockfiles from more than one package manager).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::package_json::PackageJson;
use crate::constants::{CSS_FRAMEWORK_PACKAGE, REQUIRED_FRAMEWORK_DEPENDENCY};

/// Package managers Rafters can drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

/// Lockfiles in priority order.
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
    /// Executable name.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// Arguments that add `packages` to the project.
    #[must_use]
    pub fn install_args(self, packages: &[String], dev: bool) -> Vec<String> {
        let mut args = match self {
            Self::Npm => vec!["install".to_string()],
            Self::Yarn | Self::Pnpm => vec!["add".to_string()],
        };
        if dev {
            args.push(if self == Self::Yarn { "--dev" } else { "--save-dev" }.to_string());
        }
        args.extend(packages.iter().cloned());
        args
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Front-end frameworks recognised from dependency names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    NextJs,
    Remix,
    ReactRouter,
    Astro,
    Vite,
    CreateReactApp,
    /// No known signature matched.
    Unknown,
}

/// Framework signatures in priority order.
const FRAMEWORK_SIGNATURES: &[(&str, Framework)] = &[
    ("next", Framework::NextJs),
    ("@remix-run/react", Framework::Remix),
    ("@react-router/dev", Framework::ReactRouter),
    ("astro", Framework::Astro),
    ("vite", Framework::Vite),
    ("react-scripts", Framework::CreateReactApp),
];

impl Framework {
    /// Conventional stylesheet path for projects with no existing one.
    #[must_use]
    pub const fn default_stylesheet(self) -> &'static str {
        match self {
            Self::NextJs => "src/app/globals.css",
            Self::Remix | Self::ReactRouter => "app/app.css",
            Self::Astro => "src/styles/global.css",
            Self::Vite | Self::CreateReactApp | Self::Unknown => "src/index.css",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NextJs => "Next.js",
            Self::Remix => "Remix",
            Self::ReactRouter => "React Router",
            Self::Astro => "Astro",
            Self::Vite => "Vite",
            Self::CreateReactApp => "Create React App",
            Self::Unknown => "none detected",
        };
        f.write_str(name)
    }
}

/// Conventional stylesheet locations, most specific first.
const STYLESHEET_CANDIDATES: &[&str] = &[
    "src/app/globals.css",
    "app/globals.css",
    "src/styles/globals.css",
    "styles/globals.css",
    "src/index.css",
    "src/globals.css",
    "app/app.css",
    "src/styles/global.css",
];

/// Compiler path-mapping configuration files, in scan order.
const ALIAS_CONFIG_FILES: &[&str] = &["tsconfig.json", "tsconfig.app.json", "jsconfig.json"];

/// Alias patterns recognised in `compilerOptions.paths`, in priority order.
const ALIAS_PATTERNS: &[&str] = &["@/*", "~/*", "#/*", "$/*"];

/// Inspects a project rooted at a given directory.
///
/// The package descriptor is read once on construction.
#[derive(Debug, Clone)]
pub struct ProjectDetector {
    root: PathBuf,
    package: Option<PackageJson>,
}

impl ProjectDetector {
    /// Inspect the project at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let package = PackageJson::read(&root);
        Self {
            root,
            package,
        }
    }

    /// Project root being inspected.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a readable `package.json` exists at the root.
    #[must_use]
    pub const fn is_host_project(&self) -> bool {
        self.package.is_some()
    }

    /// Whether the required framework dependency is declared.
    #[must_use]
    pub fn has_required_framework_dependency(&self) -> bool {
        self.has_dependency(REQUIRED_FRAMEWORK_DEPENDENCY)
    }

    /// Whether any Storybook package is declared.
    #[must_use]
    pub fn has_storybook_dependency(&self) -> bool {
        self.package.as_ref().is_some_and(|p| {
            p.dependency_names().any(|name| name == "storybook" || name.starts_with("@storybook/"))
        })
    }

    /// Package manager inferred from lockfiles; npm when none is present.
    #[must_use]
    pub fn detect_package_manager(&self) -> PackageManager {
        LOCKFILES
            .iter()
            .find(|(file, _)| self.root.join(file).is_file())
            .map(|(file, manager)| {
                debug!("Detected {} from {}", manager, file);
                *manager
            })
            .unwrap_or_default()
    }

    /// Framework inferred from dependency names.
    #[must_use]
    pub fn detect_framework(&self) -> Framework {
        FRAMEWORK_SIGNATURES
            .iter()
            .find(|(signature, _)| self.has_dependency(signature))
            .map_or(Framework::Unknown, |(_, framework)| *framework)
    }

    /// First conventional stylesheet that exists, as a project-relative path.
    #[must_use]
    pub fn find_existing_stylesheet(&self) -> Option<String> {
        STYLESHEET_CANDIDATES
            .iter()
            .find(|candidate| self.root.join(candidate).is_file())
            .map(|candidate| (*candidate).to_string())
    }

    /// Declared CSS framework version range, if any.
    #[must_use]
    pub fn detect_css_framework_version(&self) -> Option<String> {
        self.package
            .as_ref()
            .and_then(|p| p.dependency_version(CSS_FRAMEWORK_PACKAGE))
            .map(str::to_string)
    }

    /// Import alias prefix such as `@`, from the first path-mapping config
    /// file that parses and has a `paths` map.
    ///
    /// When several files define an alias, the first file in scan order wins.
    #[must_use]
    pub fn detect_import_alias(&self) -> Option<String> {
        for file in ALIAS_CONFIG_FILES {
            let path = self.root.join(file);
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            let Ok(value) = serde_json::from_str::<Value>(&strip_jsonc(&content)) else {
                debug!("Skipping unparseable {}", path.display());
                continue;
            };
            let Some(paths) = value.pointer("/compilerOptions/paths").and_then(Value::as_object)
            else {
                continue;
            };

            if let Some(pattern) = ALIAS_PATTERNS.iter().find(|p| paths.contains_key(**p)) {
                let prefix = pattern.trim_end_matches("/*").to_string();
                debug!("Detected import alias '{}' in {}", prefix, file);
                return Some(prefix);
            }
        }
        None
    }

    fn has_dependency(&self, name: &str) -> bool {
        self.package.as_ref().is_some_and(|p| p.has_dependency(name))
    }
}

/// Major version of a declared version range such as `^4.1.0`.
///
/// Returns `None` for ranges that are not plain semver requirements
/// (`latest`, `workspace:*`, git URLs).
#[must_use]
pub fn version_range_major(range: &str) -> Option<u64> {
    semver::VersionReq::parse(range.trim()).ok()?.comparators.first().map(|c| c.major)
}

/// Remove `//` and `/* */` comments and trailing commas from JSONC text.
///
/// String literals are copied verbatim, so `"@/*"` keys survive intact.
fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    remove_trailing_commas(&out)
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
        }
        if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(package_json: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), package_json).unwrap();
        temp
    }

    #[test]
    fn test_host_project_and_required_dependency() {
        let temp = project(r#"{"devDependencies": {"react": "^19.0.0"}}"#);
        let detector = ProjectDetector::new(temp.path());
        assert!(detector.is_host_project());
        assert!(detector.has_required_framework_dependency());

        let empty = TempDir::new().unwrap();
        let detector = ProjectDetector::new(empty.path());
        assert!(!detector.is_host_project());
        assert!(!detector.has_required_framework_dependency());
    }

    #[test]
    fn test_package_manager_priority() {
        let temp = project("{}");
        for file in ["package-lock.json", "yarn.lock", "pnpm-lock.yaml"] {
            fs::write(temp.path().join(file), "").unwrap();
        }
        assert_eq!(ProjectDetector::new(temp.path()).detect_package_manager(), PackageManager::Pnpm);

        fs::remove_file(temp.path().join("pnpm-lock.yaml")).unwrap();
        assert_eq!(ProjectDetector::new(temp.path()).detect_package_manager(), PackageManager::Yarn);
    }

    #[test]
    fn test_package_manager_defaults_to_npm() {
        let temp = project("{}");
        assert_eq!(ProjectDetector::new(temp.path()).detect_package_manager(), PackageManager::Npm);
    }

    #[test]
    fn test_detect_framework_first_signature_wins() {
        let temp = project(r#"{"dependencies": {"vite": "^6", "next": "15.0.0"}}"#);
        assert_eq!(ProjectDetector::new(temp.path()).detect_framework(), Framework::NextJs);

        let temp = project(r#"{"devDependencies": {"vite": "^6"}}"#);
        assert_eq!(ProjectDetector::new(temp.path()).detect_framework(), Framework::Vite);

        let temp = project(r#"{"dependencies": {"react": "^19"}}"#);
        assert_eq!(ProjectDetector::new(temp.path()).detect_framework(), Framework::Unknown);
    }

    #[test]
    fn test_stylesheet_detection_and_defaults() {
        let temp = project("{}");
        let detector = ProjectDetector::new(temp.path());
        assert_eq!(detector.find_existing_stylesheet(), None);

        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/index.css"), "").unwrap();
        fs::create_dir_all(temp.path().join("app")).unwrap();
        fs::write(temp.path().join("app/globals.css"), "").unwrap();
        assert_eq!(detector.find_existing_stylesheet().as_deref(), Some("app/globals.css"));

        assert_eq!(Framework::NextJs.default_stylesheet(), "src/app/globals.css");
        assert_eq!(Framework::ReactRouter.default_stylesheet(), "app/app.css");
        assert_eq!(Framework::Unknown.default_stylesheet(), "src/index.css");
    }

    #[test]
    fn test_detect_import_alias() {
        let temp = project("{}");
        fs::write(
            temp.path().join("tsconfig.json"),
            r#"{"compilerOptions": {"paths": {"@/*": ["./src/*"]}}}"#,
        )
        .unwrap();
        assert_eq!(ProjectDetector::new(temp.path()).detect_import_alias().as_deref(), Some("@"));
    }

    #[test]
    fn test_detect_import_alias_tolerates_comments() {
        let temp = project("{}");
        fs::write(
            temp.path().join("tsconfig.json"),
            r#"{
  // path aliases
  "compilerOptions": {
    /* block */ "paths": { "~/*": ["./app/*"], },
  },
}"#,
        )
        .unwrap();
        assert_eq!(ProjectDetector::new(temp.path()).detect_import_alias().as_deref(), Some("~"));
    }

    #[test]
    fn test_detect_import_alias_first_file_wins() {
        let temp = project("{}");
        fs::write(temp.path().join("tsconfig.json"), r#"{"files": []}"#).unwrap();
        fs::write(
            temp.path().join("tsconfig.app.json"),
            r#"{"compilerOptions": {"paths": {"~/*": ["./src/*"]}}}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("jsconfig.json"),
            r#"{"compilerOptions": {"paths": {"@/*": ["./src/*"]}}}"#,
        )
        .unwrap();
        assert_eq!(ProjectDetector::new(temp.path()).detect_import_alias().as_deref(), Some("~"));
    }

    #[test]
    fn test_detect_import_alias_none() {
        let temp = project("{}");
        fs::write(
            temp.path().join("tsconfig.json"),
            r#"{"compilerOptions": {"paths": {"components/*": ["./src/components/*"]}}}"#,
        )
        .unwrap();
        assert_eq!(ProjectDetector::new(temp.path()).detect_import_alias(), None);
    }

    #[test]
    fn test_storybook_and_css_version() {
        let temp = project(
            r#"{"devDependencies": {"@storybook/react": "^8", "tailwindcss": "^4.1.3"}}"#,
        );
        let detector = ProjectDetector::new(temp.path());
        assert!(detector.has_storybook_dependency());
        assert_eq!(detector.detect_css_framework_version().as_deref(), Some("^4.1.3"));
    }

    #[test]
    fn test_version_range_major() {
        assert_eq!(version_range_major("^4.1.3"), Some(4));
        assert_eq!(version_range_major("~3.4.0"), Some(3));
        assert_eq!(version_range_major("4"), Some(4));
        assert_eq!(version_range_major("latest"), None);
    }

    #[test]
    fn test_install_args() {
        let pkgs = vec!["clsx".to_string()];
        assert_eq!(PackageManager::Npm.install_args(&pkgs, false), vec!["install", "clsx"]);
        assert_eq!(PackageManager::Yarn.install_args(&pkgs, true), vec!["add", "--dev", "clsx"]);
        assert_eq!(PackageManager::Pnpm.install_args(&pkgs, true), vec!["add", "--save-dev", "clsx"]);
    }

    #[test]
    fn test_strip_jsonc_keeps_strings() {
        let stripped = strip_jsonc(r#"{"url": "http://x//y", "a": [1, 2,], /* c */ "b": "/*"}"#);
        let value: Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["url"], "http://x//y");
        assert_eq!(value["b"], "/*");
        assert_eq!(value["a"].as_array().unwrap().len(), 2);
    }
}
