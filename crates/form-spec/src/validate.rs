use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::schema::{FieldDescriptor, FieldKind, SchemaDocument};

/// Built-in pattern used for `format: email` fields.
pub const EMAIL_PATTERN: &str = "^[a-zA-Z0-9-_.]{1,}@[a-zA-Z0-9.-]{2,}[.]{1}[a-zA-Z]{2,}$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

/// Outcome of whole-form validation: one message per failing field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
}

/// True when the value counts as "provided" for constraint purposes.
/// Null, the empty string, and false are absent; everything else is present.
pub fn value_is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Bool(flag) => *flag,
        Value::Number(num) => num.as_f64().map(|n| n != 0.0).unwrap_or(true),
        _ => true,
    }
}

fn display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        other => other.to_string(),
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}

fn pluralize(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Checks one value against one field's constraints, returning the first
/// failing message. Format validity is checked before presence and range so
/// a wrongly shaped value is not masked by a lower-priority defect.
pub fn check_value(descriptor: &FieldDescriptor, value: &Value) -> Option<String> {
    let present = value_is_present(value);
    let display = display_string(value);
    let display_len = display.chars().count();

    if present
        && descriptor.kind == FieldKind::String
        && descriptor
            .format
            .as_deref()
            .is_some_and(|format| format.eq_ignore_ascii_case("email"))
        && !EMAIL_REGEX.is_match(&display)
    {
        return Some("Invalid email address".into());
    }

    if present
        && let Some(min_length) = descriptor.min_length
        && display_len < min_length
    {
        return Some(format!(
            "The value must have a minimum of {} character{}",
            min_length,
            pluralize(min_length)
        ));
    }

    // Pluralized on the value's length, not the bound.
    if present
        && let Some(max_length) = descriptor.max_length
        && display_len > max_length
    {
        return Some(format!(
            "Maximum {} character{}",
            max_length,
            pluralize(display_len)
        ));
    }

    let empty_collection = value.as_array().is_some_and(|items| items.is_empty());
    if descriptor.required && (!present || empty_collection) {
        return Some("This field must have a value".into());
    }

    if let Some(min_items) = descriptor.min_items
        && let Some(items) = value.as_array()
        && items.len() < min_items
    {
        return Some(format!("Please select at least {} item(s)", min_items));
    }

    if let Some(max_items) = descriptor.max_items
        && let Some(items) = value.as_array()
        && items.len() > max_items
    {
        return Some(format!("Please select a maximum of {} item(s)", max_items));
    }

    if present
        && let Some(pattern) = descriptor.pattern.as_deref()
        && let Ok(regex) = Regex::new(pattern)
        && !regex.is_match(&display)
    {
        return Some("The value is not in the expected format".into());
    }

    if present
        && let Some(minimum) = descriptor.minimum
        && let Some(numeric) = numeric_value(value)
        && numeric < minimum
    {
        return Some(format!(
            "The value must not be lower than {}",
            format_bound(minimum)
        ));
    }

    if present
        && let Some(maximum) = descriptor.maximum
        && let Some(numeric) = numeric_value(value)
        && numeric > maximum
    {
        return Some(format!(
            "The value must not be higher than {}",
            format_bound(maximum)
        ));
    }

    None
}

/// Validates one named field of the schema. Unknown fields pass.
pub fn validate_field(schema: &SchemaDocument, name: &str, value: &Value) -> Option<String> {
    let raw = schema.properties.get(name)?;
    let descriptor: FieldDescriptor = serde_json::from_value(raw.clone()).ok()?;
    check_value(&descriptor, value)
}

/// Applies the single-field check to every key present in the data object.
/// The result is valid only when no field produced a message.
pub fn validate_all(schema: &SchemaDocument, data: &Value) -> ValidationOutcome {
    let mut errors = BTreeMap::new();

    if let Some(map) = data.as_object() {
        for (name, value) in map {
            if let Some(message) = validate_field(schema, name, value) {
                errors.insert(name.clone(), message);
            }
        }
    }

    ValidationOutcome {
        valid: errors.is_empty(),
        errors,
    }
}
