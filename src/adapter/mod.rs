//! Source adaptation pipeline.
//!
//! Registry sources are authored as if they lived in `src/components/` and
//! import the shared class-name helper as `'../lib/utils'`. Before a component
//! is written into a host project, its source runs through an ordered list of
//! rewrite rules:
//!
//! | # | Rule                 | Condition                              |
//! |---|----------------------|----------------------------------------|
//! | 1 | `alias-utils`        | an import alias was detected           |
//! | 1 | `alias-relative`     | an import alias was detected           |
//! | 2 | `utils-depth`        | no alias, components dir depth != 2    |
//! | 3 | `strip-modules`      | always                                 |
//! | 3 | `strip-classes`      | always                                 |
//! | 4 | `cleanup-commas`     | always                                 |
//!
//! Each rule only matches the untransformed literal pattern, so running the
//! pipeline over already adapted source changes nothing:
//! `adapt(adapt(s)) == adapt(s)`.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::trace;

use crate::utils::paths;

/// Depth of the directory registry sources are authored in (`src/components`).
pub const CANONICAL_COMPONENTS_DEPTH: usize = 2;

/// Lead-in of a module specifier: `from `, `import `, or `import(`.
const IMPORT_LEAD: &str = r#"(?P<lead>\bfrom\s+|\bimport\s*\(\s*|\bimport\s+)(?P<q>['"])"#;

/// Modules and class names that only exist alongside an auxiliary feature
/// not shipped to host projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Module paths (suffix match on the import specifier) whose imports are removed
    pub stripped_modules: Vec<String>,
    /// Utility class tokens removed from class strings
    pub denied_classes: Vec<String>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            stripped_modules: vec!["lib/intelligence".to_string(), "hooks/use-intelligence".to_string()],
            denied_classes: vec![
                "intelligence-glow".to_string(),
                "trust-pulse".to_string(),
                "attention-focus".to_string(),
                "cognitive-load-indicator".to_string(),
            ],
        }
    }
}

/// Where an adapted source is going.
#[derive(Debug, Clone, Copy)]
pub struct AdaptTarget<'a> {
    /// Project-relative components directory, e.g. `src/components/ui`
    pub components_dir: &'a str,
    /// Detected import alias prefix, e.g. `@`
    pub alias: Option<&'a str>,
}

enum Replacement {
    Fixed(&'static str),
    Dynamic(fn(&AdaptTarget<'_>) -> String),
}

/// One step of the pipeline: a condition and the rewrites it guards.
struct RewriteRule {
    name: &'static str,
    condition: fn(&AdaptTarget<'_>) -> bool,
    rewrites: Vec<(Regex, Replacement)>,
    /// Re-apply until the text stops changing; needed where one match can
    /// consume the context the next one relies on.
    to_fixpoint: bool,
}

impl RewriteRule {
    fn apply(&self, source: String, target: &AdaptTarget<'_>) -> String {
        let mut current = source;
        loop {
            let mut next = current.clone();
            for (pattern, replacement) in &self.rewrites {
                next = match replacement {
                    Replacement::Fixed(text) => pattern.replace_all(&next, *text).into_owned(),
                    Replacement::Dynamic(build) => {
                        pattern.replace_all(&next, build(target).as_str()).into_owned()
                    }
                };
            }
            if !self.to_fixpoint || next == current {
                return next;
            }
            current = next;
        }
    }
}

/// Ordered rewrite pipeline applied to fetched component source.
pub struct SourceAdapter {
    rules: Vec<RewriteRule>,
}

impl SourceAdapter {
    /// Build the pipeline with the default denylists.
    pub fn new() -> Result<Self> {
        Self::with_options(&AdapterOptions::default())
    }

    /// Build the pipeline with custom denylists.
    pub fn with_options(options: &AdapterOptions) -> Result<Self> {
        let utils_import = Regex::new(&format!(r#"{IMPORT_LEAD}\.\./lib/utils(?P<q2>['"])"#))?;
        let parent_import = Regex::new(&format!(r"{IMPORT_LEAD}(?:\.\./)+"))?;

        let mut rules = Vec::new();

        // Rule 1: alias rewrites. The utils import is handled first so it keeps
        // its `lib/utils` path under the alias.
        rules.push(RewriteRule {
            name: "alias-utils",
            condition: |t| t.alias.is_some(),
            rewrites: vec![(
                utils_import.clone(),
                Replacement::Dynamic(|t| {
                    format!("${{lead}}${{q}}{}/lib/utils${{q2}}", escape_replacement(t.alias.unwrap_or("@")))
                }),
            )],
            to_fixpoint: false,
        });
        rules.push(RewriteRule {
            name: "alias-relative",
            condition: |t| t.alias.is_some(),
            rewrites: vec![(
                parent_import,
                Replacement::Dynamic(|t| {
                    format!("${{lead}}${{q}}{}/", escape_replacement(t.alias.unwrap_or("@")))
                }),
            )],
            to_fixpoint: false,
        });

        // Rule 2: relative utils path for non-canonical nesting.
        rules.push(RewriteRule {
            name: "utils-depth",
            condition: |t| {
                t.alias.is_none() && paths::depth(t.components_dir) != CANONICAL_COMPONENTS_DEPTH
            },
            rewrites: vec![(
                utils_import,
                Replacement::Dynamic(|t| {
                    format!("${{lead}}${{q}}{}${{q2}}", utils_specifier(t.components_dir))
                }),
            )],
            to_fixpoint: false,
        });

        // Rule 3: non-portable imports and class tokens.
        let mut module_rewrites = Vec::new();
        for module in &options.stripped_modules {
            let pattern = format!(
                r#"(?m)^[ \t]*import\s[^;'"]*?['"](?:[^'"\n]*/)?{}['"];?[ \t]*\r?\n?"#,
                regex::escape(module)
            );
            let regex = Regex::new(&pattern)
                .with_context(|| format!("Invalid stripped module pattern: {module}"))?;
            module_rewrites.push((regex, Replacement::Fixed("")));
        }
        rules.push(RewriteRule {
            name: "strip-modules",
            condition: |_| true,
            rewrites: module_rewrites,
            to_fixpoint: false,
        });

        let mut class_rewrites = Vec::new();
        for class in &options.denied_classes {
            let token = regex::escape(class);
            let patterns = [
                (format!(r#"'{token}'|"{token}"|`{token}`"#), Replacement::Fixed("")),
                (format!(r#"[ \t]+{token}(?P<end>[\s'"`])"#), Replacement::Fixed("${end}")),
                (format!(r#"(?P<q>['"`]){token}[ \t]+"#), Replacement::Fixed("${q}")),
            ];
            for (pattern, replacement) in patterns {
                let regex = Regex::new(&pattern)
                    .with_context(|| format!("Invalid denied class pattern: {class}"))?;
                class_rewrites.push((regex, replacement));
            }
        }
        rules.push(RewriteRule {
            name: "strip-classes",
            condition: |_| true,
            rewrites: class_rewrites,
            to_fixpoint: true,
        });

        // Rule 4: punctuation left behind by removed list entries.
        rules.push(RewriteRule {
            name: "cleanup-commas",
            condition: |_| true,
            rewrites: vec![
                (Regex::new(r",(?:\s*,)+")?, Replacement::Fixed(",")),
                (Regex::new(r"(?P<open>[(\[{])[ \t]*,[ \t]*")?, Replacement::Fixed("${open}")),
                // Same-line only: multi-line trailing commas in untouched code stay.
                (Regex::new(r",[ \t]*(?P<close>[)\]}])")?, Replacement::Fixed("${close}")),
            ],
            to_fixpoint: true,
        });

        Ok(Self {
            rules,
        })
    }

    /// Run every applicable rule, in order, over `source`.
    #[must_use]
    pub fn adapt(&self, source: &str, target: &AdaptTarget<'_>) -> String {
        let mut text = source.to_string();
        for rule in &self.rules {
            if (rule.condition)(target) {
                trace!("Applying rewrite rule '{}'", rule.name);
                text = rule.apply(text, target);
            }
        }
        text
    }
}

/// Adapt `source` for `components_dir` and `alias` with the default denylists.
pub fn adapt(source: &str, components_dir: &str, alias: Option<&str>) -> Result<String> {
    let adapter = SourceAdapter::new()?;
    Ok(adapter.adapt(
        source,
        &AdaptTarget {
            components_dir,
            alias,
        },
    ))
}

/// Relative specifier of `lib/utils` as seen from `components_dir`.
///
/// The helper lives in `{first segment}/lib/utils`, so a directory `d` levels
/// deep climbs `d - 1` levels.
#[must_use]
pub fn utils_specifier(components_dir: &str) -> String {
    let depth = paths::depth(components_dir);
    if depth <= 1 {
        "./lib/utils".to_string()
    } else {
        format!("{}lib/utils", "../".repeat(depth - 1))
    }
}

fn escape_replacement(text: &str) -> String {
    text.replace('$', "$$")
}
