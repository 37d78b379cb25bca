use serde_json::{Map, Number, Value};

use crate::error::SchemaError;
use crate::reader::{is_data_key, ordered_fields};
use crate::schema::{FieldDescriptor, FieldKind, SchemaDocument};
use crate::widget::{Widget, WidgetLookup};

fn display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(num) => num.as_f64().map(|n| n != 0.0).unwrap_or(true),
        _ => true,
    }
}

fn number_from_f64(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// Coerces one widget's raw state into a structured value, per field kind.
fn coerce(descriptor: &FieldDescriptor, widget: &dyn Widget) -> Option<Value> {
    match descriptor.kind {
        FieldKind::Array => {
            if descriptor.has_textarea_items() {
                let raw = widget.value();
                if raw.is_empty() {
                    Some(Value::Array(Vec::new()))
                } else {
                    Some(Value::Array(
                        raw.split('\n').map(|line| Value::String(line.into())).collect(),
                    ))
                }
            } else if descriptor.has_composite_items() {
                // Externally managed composite values pass through verbatim.
                widget.attached()
            } else {
                Some(Value::String(widget.value()))
            }
        }
        FieldKind::Boolean => Some(Value::Bool(widget.checked())),
        FieldKind::Integer => {
            let raw = widget.value();
            if raw.trim().is_empty() {
                Some(Value::String(String::new()))
            } else {
                Some(
                    raw.trim()
                        .parse::<i64>()
                        .map(Value::from)
                        .unwrap_or(Value::String(String::new())),
                )
            }
        }
        FieldKind::Number => {
            let raw = widget.value();
            if raw.trim().is_empty() {
                Some(Value::String(String::new()))
            } else {
                Some(
                    raw.trim()
                        .parse::<f64>()
                        .map(number_from_f64)
                        .unwrap_or(Value::String(String::new())),
                )
            }
        }
        _ => {
            let mut text = widget.value().trim().to_string();
            if let Some(max_length) = descriptor.max_length {
                text = text.chars().take(max_length).collect();
            }
            Some(Value::String(text))
        }
    }
}

/// Reads structured data out of the rendered widgets.
///
/// Fields iterate in resolved schema order. Read-only fields carry their
/// last known structured value (or their default when required), everything
/// else is coerced from the widget. Non-required fields whose coerced value
/// is the empty string are omitted, distinguishing "not provided" from
/// "explicitly empty".
pub fn extract(
    schema: &SchemaDocument,
    widgets: &dyn WidgetLookup,
    previous: &Map<String, Value>,
) -> Result<Map<String, Value>, SchemaError> {
    let mut data = Map::new();

    for (name, descriptor) in ordered_fields(schema)? {
        if descriptor.readonly {
            if let Some(value) = previous.get(&name) {
                data.insert(name, value.clone());
            } else if descriptor.required
                && let Some(default) = &descriptor.default
            {
                data.insert(name, default.clone());
            }
            continue;
        }

        let Some(widget) = widgets.widget(&name) else {
            continue;
        };

        if let Some(value) = coerce(&descriptor, widget) {
            if !descriptor.required && value == Value::String(String::new()) {
                continue;
            }
            data.insert(name, value);
        }
    }

    Ok(data)
}

/// Snapshot of the raw widget state, ignoring required/empty-string omission
/// and read-only carry-over. Used for persistence, never for submission.
pub fn raw_extract(
    schema: &SchemaDocument,
    widgets: &dyn WidgetLookup,
) -> Result<Map<String, Value>, SchemaError> {
    let mut data = Map::new();

    for (name, descriptor) in ordered_fields(schema)? {
        if descriptor.readonly {
            continue;
        }
        let Some(widget) = widgets.widget(&name) else {
            continue;
        };

        let value = match descriptor.kind {
            FieldKind::Array if descriptor.has_composite_items() => {
                widget.attached().unwrap_or(Value::Null)
            }
            FieldKind::Array => Value::String(widget.value()),
            FieldKind::Boolean => Value::Bool(widget.checked()),
            _ => Value::String(widget.value().trim().to_string()),
        };
        data.insert(name, value);
    }

    Ok(data)
}

fn parse_descriptor(schema: &SchemaDocument, name: &str) -> Option<FieldDescriptor> {
    let raw = schema.properties.get(name)?;
    serde_json::from_value(raw.clone()).ok()
}

fn refresh_remaining(descriptor: Option<&FieldDescriptor>, widget: &mut dyn Widget) {
    if let Some(max_length) = descriptor.and_then(|descriptor| descriptor.max_length) {
        let used = widget.value().chars().count();
        widget.set_characters_remaining(Some(max_length.saturating_sub(used)));
    }
}

/// Writes structured data into the rendered widgets.
///
/// Boolean widgets take their checked state from the value's truthiness,
/// multi-line array widgets join sequences with newlines, and everything
/// else takes the display form of the value. Keys without a widget are
/// silently skipped.
pub fn populate(schema: &SchemaDocument, widgets: &mut dyn WidgetLookup, data: &Map<String, Value>) {
    for (name, value) in data {
        if !is_data_key(name) {
            continue;
        }
        let descriptor = parse_descriptor(schema, name);
        let Some(widget) = widgets.widget_mut(name) else {
            continue;
        };

        match descriptor.as_ref().map(|descriptor| descriptor.kind) {
            Some(FieldKind::Boolean) => widget.set_checked(truthy(value)),
            Some(FieldKind::Array) => {
                if let Some(items) = value.as_array() {
                    if descriptor
                        .as_ref()
                        .is_some_and(|descriptor| descriptor.has_composite_items())
                    {
                        widget.set_attached(value.clone());
                    } else {
                        let joined = items
                            .iter()
                            .map(display_string)
                            .collect::<Vec<_>>()
                            .join("\n");
                        widget.set_value(&joined);
                    }
                } else {
                    widget.set_value(&display_string(value));
                }
            }
            _ => widget.set_value(&display_string(value)),
        }

        refresh_remaining(descriptor.as_ref(), widget);
    }
}
