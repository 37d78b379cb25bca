use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value kind of one schema property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Date,
    Object,
    /// Anything the mapper does not recognize renders as plain text.
    #[serde(other)]
    Unknown,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Integer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Date => "date",
            FieldKind::Object => "object",
            FieldKind::Unknown => "unknown",
        }
    }
}

/// Element definition for array-of-X properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItemsDescriptor {
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Normalized representation of one schema property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    /// Free-form identifier; embedded digits drive the render order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(rename = "minItems", default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(rename = "maxItems", default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsDescriptor>,
}

impl FieldDescriptor {
    /// Kind used for widget resolution: the element kind wins for collections.
    pub fn effective_kind(&self) -> FieldKind {
        self.items.as_ref().map(|items| items.kind).unwrap_or(self.kind)
    }

    /// Format used for widget resolution, lowercased.
    pub fn effective_format(&self) -> Option<String> {
        self.items
            .as_ref()
            .and_then(|items| items.format.as_deref())
            .or(self.format.as_deref())
            .map(|format| format.to_lowercase())
    }

    /// True when array contents are edited externally and passed through verbatim.
    pub fn has_composite_items(&self) -> bool {
        self.items.as_ref().is_some_and(|items| {
            items.kind == FieldKind::Object
                || items
                    .format
                    .as_deref()
                    .is_some_and(|format| format.eq_ignore_ascii_case("uri"))
        })
    }

    /// True when array contents are a newline-separated multi-line widget.
    pub fn has_textarea_items(&self) -> bool {
        self.items.as_ref().is_some_and(|items| {
            items
                .format
                .as_deref()
                .is_some_and(|format| format.eq_ignore_ascii_case("textarea"))
        })
    }
}
