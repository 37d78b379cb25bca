use serde::Serialize;
use serde_json::Value;

use crate::schema::{FieldDescriptor, FieldKind};
use crate::validate::EMAIL_PATTERN;

/// Closed set of input representations a field can resolve to.
///
/// Resolution always lands on exactly one variant; unrecognized kinds and
/// formats fall back to [`WidgetKind::Text`], so there is no failure path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum WidgetKind {
    Text,
    Url,
    Textarea,
    Date,
    Password,
    Email,
    Number,
    Checkbox,
    Choice { options: Vec<String> },
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::Url => "url",
            WidgetKind::Textarea => "textarea",
            WidgetKind::Date => "date",
            WidgetKind::Password => "password",
            WidgetKind::Email => "email",
            WidgetKind::Number => "number",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::Choice { .. } => "choice",
        }
    }
}

/// Declarative rules carried on every widget for later validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConstraintSet {
    pub required: bool,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// One field's resolved input representation plus its constraint set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetSpec {
    #[serde(flatten)]
    pub kind: WidgetKind,
    pub constraints: ConstraintSet,
    /// Short description rendered inline inside the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Long description rendered as supplementary help text below the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl WidgetSpec {
    /// Options rendered for a choice widget: a blank entry plus each option.
    /// Empty for every other widget kind.
    pub fn select_options(&self) -> Vec<String> {
        match &self.kind {
            WidgetKind::Choice { options } => {
                let mut all = Vec::with_capacity(options.len() + 1);
                all.push(String::new());
                all.extend(options.iter().cloned());
                all
            }
            _ => Vec::new(),
        }
    }
}

/// Knobs for widget resolution.
#[derive(Debug, Clone, Copy)]
pub struct MapperOptions {
    /// Descriptions longer than this become help text instead of placeholders.
    pub placeholder_max_length: usize,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            placeholder_max_length: 75,
        }
    }
}

fn integral_bound(bound: Option<f64>) -> Option<i64> {
    bound.filter(|value| value.fract() == 0.0).map(|value| value as i64)
}

fn enum_option_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

/// Resolves one field descriptor into its widget representation.
///
/// Precedence: bounded integral range, numeric input, enumerated choices,
/// boolean checkbox, specialized string formats, then plain text.
pub fn map_field(descriptor: &FieldDescriptor, options: &MapperOptions) -> WidgetSpec {
    let kind = resolve_kind(descriptor);

    let mut constraints = ConstraintSet {
        required: descriptor.required,
        readonly: descriptor.readonly,
        pattern: descriptor.pattern.clone(),
        minimum: descriptor.minimum,
        maximum: descriptor.maximum,
        min_length: descriptor.min_length,
        max_length: descriptor.max_length,
        min_items: descriptor.min_items,
        max_items: descriptor.max_items,
    };

    // Email widgets carry the built-in address pattern unless the schema
    // supplies its own.
    if kind == WidgetKind::Email && constraints.pattern.is_none() {
        constraints.pattern = Some(EMAIL_PATTERN.to_string());
    }

    let (placeholder, help_text) = match descriptor.description.as_deref() {
        Some(description) if description.len() > options.placeholder_max_length => {
            (None, Some(description.to_string()))
        }
        Some(description) => (Some(description.to_string()), None),
        None => (None, None),
    };

    WidgetSpec {
        kind,
        constraints,
        placeholder,
        help_text,
    }
}

fn resolve_kind(descriptor: &FieldDescriptor) -> WidgetKind {
    let kind = descriptor.effective_kind();
    let format = descriptor.effective_format();

    if kind.is_numeric() {
        if let (Some(minimum), Some(maximum)) = (
            integral_bound(descriptor.minimum),
            integral_bound(descriptor.maximum),
        ) {
            let options = (minimum..=maximum).map(|value| value.to_string()).collect();
            return WidgetKind::Choice { options };
        }
        return WidgetKind::Number;
    }

    if let Some(values) = &descriptor.enum_values {
        let options = values.iter().map(enum_option_label).collect();
        return WidgetKind::Choice { options };
    }

    if kind == FieldKind::Boolean {
        return WidgetKind::Checkbox;
    }

    if kind == FieldKind::Date {
        return WidgetKind::Date;
    }

    match format.as_deref() {
        Some("url") | Some("uri") => WidgetKind::Url,
        Some("textarea") => WidgetKind::Textarea,
        Some("date") => WidgetKind::Date,
        Some("password") => WidgetKind::Password,
        Some("email") => WidgetKind::Email,
        _ => WidgetKind::Text,
    }
}
