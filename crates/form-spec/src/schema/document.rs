use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Relation descriptor used to discover submission endpoints and chained schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enctype: Option<String>,
}

impl Link {
    /// HTTP method for the link, defaulting to POST.
    pub fn resolved_method(&self) -> &str {
        self.method.as_deref().unwrap_or("POST")
    }

    /// Payload encoding for the link, defaulting to JSON.
    pub fn resolved_enctype(&self) -> &str {
        self.enctype.as_deref().unwrap_or("application/json")
    }

    /// True when the link points at another schema rather than a data endpoint.
    pub fn is_schema_link(&self) -> bool {
        self.rel.to_lowercase().starts_with("describedby:")
    }

    /// Label to display on a button bound to this link.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.rel).trim()
    }
}

/// Top-level form definition: an ordered property mapping plus relation links.
///
/// Properties are kept as raw JSON values in declaration order; the reader
/// resolves them into [`super::FieldDescriptor`]s on demand so that malformed
/// entries surface as structured errors instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl SchemaDocument {
    /// Finds the first link whose rel matches exactly.
    pub fn link_by_rel(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.rel == rel)
    }

    /// Links that should be exposed as form buttons.
    pub fn button_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.rel != "instances")
    }

    /// The destination used when submit is called without an explicit rel:
    /// `create`, then `self`, then the first non-schema link.
    pub fn default_action(&self) -> Option<&Link> {
        self.link_by_rel("create")
            .or_else(|| self.link_by_rel("self"))
            .or_else(|| self.links.iter().find(|link| !link.is_schema_link()))
    }
}
