//! Registry payload fixtures.

use serde_json::{Value, json};

/// Builder for a registry component descriptor.
#[derive(Debug, Clone)]
pub struct ComponentFixture {
    name: String,
    version: Option<String>,
    dependencies: Vec<String>,
    source: Option<String>,
    cognitive_load: Option<u8>,
}

impl ComponentFixture {
    /// Descriptor with intelligence (cognitive load 2), no version, no
    /// dependencies and no source.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: None,
            dependencies: Vec::new(),
            source: None,
            cognitive_load: Some(2),
        }
    }

    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    #[must_use]
    pub fn dependency(mut self, package: &str) -> Self {
        self.dependencies.push(package.to_string());
        self
    }

    #[must_use]
    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    #[must_use]
    pub fn without_intelligence(mut self) -> Self {
        self.cognitive_load = None;
        self
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "name": self.name,
            "dependencies": self.dependencies,
            "meta": {},
        });
        if let Some(load) = self.cognitive_load {
            value["meta"]["intelligence"] = json!({
                "cognitiveLoad": load,
                "attentionEconomics": "secondary",
                "usagePatterns": { "dos": [], "nevers": [] }
            });
        }
        if let Some(version) = &self.version {
            value["version"] = json!(version);
        }
        if let Some(source) = &self.source {
            value["files"] = json!([{ "path": format!("{}.tsx", self.name), "content": source }]);
        }
        value
    }

    /// `{"components": [...]}` body for the catalog endpoint.
    #[must_use]
    pub fn catalog(components: &[Self]) -> String {
        json!({ "components": components.iter().map(Self::to_json).collect::<Vec<_>>() }).to_string()
    }
}
