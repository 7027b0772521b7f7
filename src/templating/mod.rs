//! Tera templates for generated project files.
//!
//! Two files are rendered rather than fetched:
//!
//! - the Storybook story written next to an installed component when the
//!   registry does not ship one (`{name}-intelligence.stories.tsx`)
//! - the agent guide written by `init` (`.rafters/AGENTS.md`)
//!
//! Templates are compiled into the binary and rendered with autoescaping
//! disabled; string values that end up inside TypeScript are emitted through
//! the `json_encode` filter so they are valid string literals.

use anyhow::{Context, Result};
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::constants::STORY_SUFFIX;
use crate::project::ProjectConfig;
use crate::registry::{Intelligence, RemoteComponentDescriptor};
use crate::utils::paths;

const STORY_TEMPLATE: &str = r#"import type { Meta, StoryObj } from '@storybook/react';
import { {{ component }} } from '{{ import_path }}';

/**
 * {{ component }}{% if description %}: {{ description }}{% endif %}
 *
 * Cognitive load: {{ doc.cognitiveLoad }}/10
{%- if doc.attentionEconomics %}
 * Attention: {{ doc.attentionEconomics }}
{%- endif %}
{%- if doc.trustBuilding %}
 * Trust: {{ doc.trustBuilding }}
{%- endif %}
{%- if doc.accessibility %}
 * Accessibility: {{ doc.accessibility }}
{%- endif %}
{%- for item in doc.usagePatterns.dos %}
 * Do: {{ item }}
{%- endfor %}
{%- for item in doc.usagePatterns.nevers %}
 * Never: {{ item }}
{%- endfor %}
 */
const meta = {
  title: 'Components/{{ component }}',
  component: {{ component }},
  parameters: {
    rafters: {{ intelligence | json_encode() | safe }},
  },
} satisfies Meta<typeof {{ component }}>;

export default meta;
type Story = StoryObj<typeof meta>;

export const Default: Story = {};
"#;

const AGENT_GUIDE_TEMPLATE: &str = r"# Rafters

This project installs UI components from a Rafters registry. Components are
copied into the source tree and owned by the project once installed.

## Layout

- Components: `{{ config.componentsDir }}`
{%- if config.hasStorybook and config.storiesDir %}
- Stories: `{{ config.storiesDir }}`
{%- endif %}
{%- if config.cssFile %}
- Design tokens: `{{ config.cssFile }}`
{%- endif %}
- Install record: `.rafters/component-manifest.json`

## Commands

- `rafters list --details` shows available components with their cognitive load
- `rafters add <component>` installs a component and its dependencies
  (`{{ config.packageManager }}`)

## Working with components

Every installed component carries design-intelligence metadata in
`.rafters/component-manifest.json`: a cognitive load score (0-10), attention
and trust guidance, and usage patterns. Read it before composing screens.
Keep the combined cognitive load of a single view low and follow each
component's `nevers`.
";

/// PascalCase export name for a component, e.g. `date-picker` -> `DatePicker`.
#[must_use]
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect()
}

/// File name of the story for component `name`.
#[must_use]
pub fn story_file_name(name: &str) -> String {
    format!("{}{STORY_SUFFIX}", name.to_lowercase())
}

#[derive(Serialize)]
struct StoryView<'a> {
    component: String,
    import_path: String,
    description: Option<String>,
    /// Intelligence with text made safe for the doc comment
    doc: Intelligence,
    intelligence: &'a Intelligence,
}

/// Keep registry text from closing the surrounding `/** */` block.
fn comment_safe(text: &str) -> String {
    text.replace("*/", "*\\/")
}

fn comment_safe_intelligence(intelligence: &Intelligence) -> Intelligence {
    let mut doc = intelligence.clone();
    for field in [&mut doc.attention_economics, &mut doc.trust_building, &mut doc.accessibility] {
        *field = comment_safe(field);
    }
    for item in doc.usage_patterns.dos.iter_mut().chain(doc.usage_patterns.nevers.iter_mut()) {
        *item = comment_safe(item);
    }
    doc
}

fn render(name: &str, template: &str, context: &TeraContext) -> Result<String> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(name, template).with_context(|| format!("Invalid template: {name}"))?;
    tera.render(name, context).with_context(|| format!("Failed to render template: {name}"))
}

/// Render a story for `descriptor`, installed under `components_dir`, as seen
/// from `stories_dir`.
///
/// Descriptors without intelligence metadata are rejected before this point.
pub fn render_story(
    descriptor: &RemoteComponentDescriptor,
    components_dir: &str,
    stories_dir: &str,
) -> Result<String> {
    let intelligence = descriptor
        .intelligence()
        .with_context(|| format!("Component '{}' has no intelligence metadata", descriptor.name))?;

    let view = StoryView {
        component: pascal_case(&descriptor.name),
        import_path: paths::relative_specifier(
            stories_dir,
            &format!("{components_dir}/{}", descriptor.name),
        ),
        description: descriptor.description.as_deref().map(comment_safe),
        doc: comment_safe_intelligence(intelligence),
        intelligence,
    };

    let context = TeraContext::from_serialize(&view).context("Failed to build story context")?;
    render("story", STORY_TEMPLATE, &context)
}

/// Render `.rafters/AGENTS.md` for `config`.
pub fn render_agent_guide(config: &ProjectConfig) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("config", config);
    render("agent-guide", AGENT_GUIDE_TEMPLATE, &context)
}
