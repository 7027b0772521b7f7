//! Design-token themes written during `init`.
//!
//! A theme is a flat map of token names (`color-primary`, `radius`) to CSS
//! values. `init` asks the registry for the chosen theme id and falls back to
//! the built-in palette on any registry failure, so initialization never
//! depends on the network.
//!
//! Stylesheet output is guarded by a marker comment: a stylesheet that already
//! carries the marker is left untouched, which makes re-running the token step
//! a no-op.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::TOKENS_JSON_FILE;
use crate::project::TokenFormat;
use crate::registry::RegistryClient;
use crate::utils::fs::{read_text_file, safe_write, write_json_file};

/// Theme id offered by default during `init`.
pub const DEFAULT_THEME_ID: &str = "default";

/// First line of every token block appended to a stylesheet.
pub const TOKENS_MARKER: &str = "/* rafters:tokens */";

const TAILWIND_IMPORT: &str = "@import \"tailwindcss\";";

/// Built-in palette, used when the registry cannot supply a theme.
const BUILTIN_TOKENS: &[(&str, &str)] = &[
    ("color-background", "oklch(1 0 0)"),
    ("color-foreground", "oklch(0.145 0 0)"),
    ("color-primary", "oklch(0.205 0 0)"),
    ("color-primary-foreground", "oklch(0.985 0 0)"),
    ("color-secondary", "oklch(0.97 0 0)"),
    ("color-secondary-foreground", "oklch(0.205 0 0)"),
    ("color-muted", "oklch(0.97 0 0)"),
    ("color-muted-foreground", "oklch(0.556 0 0)"),
    ("color-accent", "oklch(0.97 0 0)"),
    ("color-accent-foreground", "oklch(0.205 0 0)"),
    ("color-destructive", "oklch(0.577 0.245 27.325)"),
    ("color-destructive-foreground", "oklch(0.985 0 0)"),
    ("color-border", "oklch(0.922 0 0)"),
    ("color-input", "oklch(0.922 0 0)"),
    ("color-ring", "oklch(0.708 0 0)"),
    ("radius", "0.625rem"),
];

/// Where a theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Registry,
    BuiltIn,
}

/// A named set of design tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub tokens: BTreeMap<String, String>,
    pub source: ThemeSource,
}

/// What the token step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutput {
    /// Block appended to this stylesheet (project-relative)
    Stylesheet(String),
    /// Stylesheet already carried tokens
    AlreadyPresent(String),
    /// Standalone JSON file written
    Json(PathBuf),
}

impl Theme {
    /// The built-in palette.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            name: DEFAULT_THEME_ID.to_string(),
            tokens: BUILTIN_TOKENS.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
            source: ThemeSource::BuiltIn,
        }
    }

    /// Fetch theme `id` from the registry, falling back to [`Theme::builtin`].
    pub async fn acquire(client: &RegistryClient, id: &str) -> Self {
        match client.fetch_theme(id).await {
            Ok(remote) if !remote.tokens.is_empty() => {
                debug!("Using registry theme '{}' ({} tokens)", id, remote.tokens.len());
                Self {
                    name: remote.name.unwrap_or_else(|| id.to_string()),
                    tokens: remote
                        .tokens
                        .into_iter()
                        .map(|(k, v)| (k.trim_start_matches("--").to_string(), v))
                        .collect(),
                    source: ThemeSource::Registry,
                }
            }
            Ok(_) => {
                warn!("Registry theme '{}' has no tokens, using the built-in palette", id);
                Self::builtin()
            }
            Err(e) => {
                warn!("Could not fetch theme '{}' ({}), using the built-in palette", id, e);
                Self::builtin()
            }
        }
    }

    /// Render the stylesheet block for `format`.
    ///
    /// Returns `None` for [`TokenFormat::Json`], which has no stylesheet block.
    #[must_use]
    pub fn render_stylesheet_block(&self, format: TokenFormat) -> Option<String> {
        let selector = match format {
            TokenFormat::Tailwind => "@theme",
            TokenFormat::Css => ":root",
            TokenFormat::Json => return None,
        };

        let mut block = String::new();
        let _ = writeln!(block, "{TOKENS_MARKER}");
        let _ = writeln!(block, "{selector} {{");
        for (name, value) in &self.tokens {
            let _ = writeln!(block, "  --{name}: {value};");
        }
        block.push_str("}\n");
        Some(block)
    }

    /// Write the tokens for `format` into the project at `root`.
    ///
    /// Stylesheet formats append to `stylesheet` (created if missing). The
    /// Tailwind format also puts `@import "tailwindcss";` at the top of the
    /// file when it is not already imported. The JSON format writes
    /// `.rafters/tokens.json`.
    pub fn write(&self, root: &Path, format: TokenFormat, stylesheet: &str) -> Result<TokenOutput> {
        let Some(block) = self.render_stylesheet_block(format) else {
            let path = root.join(TOKENS_JSON_FILE);
            write_json_file(&path, &self.tokens)?;
            return Ok(TokenOutput::Json(path));
        };

        let path = root.join(stylesheet);
        let existing = if path.exists() { read_text_file(&path)? } else { String::new() };
        if existing.contains(TOKENS_MARKER) {
            debug!("{} already contains design tokens", stylesheet);
            return Ok(TokenOutput::AlreadyPresent(stylesheet.to_string()));
        }

        let mut content = String::new();
        if format == TokenFormat::Tailwind && !existing.contains(TAILWIND_IMPORT) {
            content.push_str(TAILWIND_IMPORT);
            content.push('\n');
        }
        if !existing.is_empty() {
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(&existing);
            if !existing.ends_with('\n') {
                content.push('\n');
            }
        }
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(&block);

        safe_write(&path, &content)?;
        Ok(TokenOutput::Stylesheet(stylesheet.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_palette() {
        let theme = Theme::builtin();
        assert_eq!(theme.source, ThemeSource::BuiltIn);
        assert!(theme.tokens.contains_key("color-primary"));
        assert_eq!(theme.tokens["radius"], "0.625rem");
    }

    #[test]
    fn test_tailwind_block() {
        let block = Theme::builtin().render_stylesheet_block(TokenFormat::Tailwind).unwrap();
        assert!(block.starts_with(TOKENS_MARKER));
        assert!(block.contains("@theme {\n"));
        assert!(block.contains("  --color-ring: oklch(0.708 0 0);\n"));
    }

    #[test]
    fn test_css_block() {
        let block = Theme::builtin().render_stylesheet_block(TokenFormat::Css).unwrap();
        assert!(block.contains(":root {"));
        assert!(Theme::builtin().render_stylesheet_block(TokenFormat::Json).is_none());
    }

    #[test]
    fn test_tailwind_import_goes_first() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("src/index.css"), "body { margin: 0; }").unwrap();

        Theme::builtin().write(temp.path(), TokenFormat::Tailwind, "src/index.css").unwrap();
        let css = std::fs::read_to_string(temp.path().join("src/index.css")).unwrap();

        assert!(css.starts_with("@import \"tailwindcss\";\n\nbody { margin: 0; }\n\n/* rafters:tokens */\n@theme {"));
        assert_eq!(css.matches("@import").count(), 1);
    }

    #[test]
    fn test_existing_import_is_kept() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("app.css"), "@import \"tailwindcss\";\n").unwrap();

        Theme::builtin().write(temp.path(), TokenFormat::Tailwind, "app.css").unwrap();
        let css = std::fs::read_to_string(temp.path().join("app.css")).unwrap();

        assert!(css.starts_with("@import \"tailwindcss\";\n\n/* rafters:tokens */"));
        assert_eq!(css.matches("@import").count(), 1);
    }

    #[test]
    fn test_css_format_creates_stylesheet() {
        let temp = TempDir::new().unwrap();
        Theme::builtin().write(temp.path(), TokenFormat::Css, "src/styles/global.css").unwrap();
        let css = std::fs::read_to_string(temp.path().join("src/styles/global.css")).unwrap();

        assert!(css.starts_with("/* rafters:tokens */\n:root {"));
        assert!(!css.contains("@import"));
    }

    #[test]
    fn test_write_is_idempotent() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("src/index.css"), "body { margin: 0; }\n").unwrap();

        let theme = Theme::builtin();
        let first = theme.write(temp.path(), TokenFormat::Tailwind, "src/index.css").unwrap();
        let after_first = std::fs::read_to_string(temp.path().join("src/index.css")).unwrap();
        let second = theme.write(temp.path(), TokenFormat::Tailwind, "src/index.css").unwrap();
        let after_second = std::fs::read_to_string(temp.path().join("src/index.css")).unwrap();

        assert_eq!(first, TokenOutput::Stylesheet("src/index.css".to_string()));
        assert_eq!(second, TokenOutput::AlreadyPresent("src/index.css".to_string()));
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_write_json() {
        let temp = TempDir::new().unwrap();
        let output = Theme::builtin().write(temp.path(), TokenFormat::Json, "unused.css").unwrap();

        assert_eq!(output, TokenOutput::Json(temp.path().join(TOKENS_JSON_FILE)));
        let raw = std::fs::read_to_string(temp.path().join(TOKENS_JSON_FILE)).unwrap();
        assert!(raw.contains("\"color-primary\""));
        assert!(!temp.path().join("unused.css").exists());
    }

    #[tokio::test]
    async fn test_acquire_from_registry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/themes/ocean")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "Ocean", "tokens": {"--color-primary": "oklch(0.5 0.1 240)"}}"#)
            .create_async()
            .await;

        let client = RegistryClient::new(server.url());
        let theme = Theme::acquire(&client, "ocean").await;

        mock.assert_async().await;
        assert_eq!(theme.source, ThemeSource::Registry);
        assert_eq!(theme.name, "Ocean");
        assert_eq!(theme.tokens["color-primary"], "oklch(0.5 0.1 240)");
    }

    #[tokio::test]
    async fn test_acquire_falls_back() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/themes/missing").with_status(404).create_async().await;

        let client = RegistryClient::new(server.url()).with_timeout(Duration::from_secs(2));
        let theme = Theme::acquire(&client, "missing").await;

        assert_eq!(theme, Theme::builtin());
    }
}
