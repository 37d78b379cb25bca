use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::schema::{FieldDescriptor, SchemaDocument};

/// Returns true for property keys that hold form data rather than schema
/// metadata. The literal key `links` and any key containing `$` are excluded.
pub fn is_data_key(key: &str) -> bool {
    key != "links" && !key.contains('$')
}

/// Order key for a field: every digit in its `id`, read as one base-10
/// integer. Missing or digit-free ids sort as 0.
fn order_key(descriptor: &FieldDescriptor) -> u64 {
    descriptor
        .id
        .as_deref()
        .map(|id| {
            id.chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

/// Resolves the schema's properties into `(name, descriptor)` pairs, filtered
/// to data keys and stably sorted by each field's embedded order number.
/// Ties keep their declaration order.
pub fn ordered_fields(
    schema: &SchemaDocument,
) -> Result<Vec<(String, FieldDescriptor)>, SchemaError> {
    let mut fields = Vec::with_capacity(schema.properties.len());

    for (name, raw) in &schema.properties {
        if !is_data_key(name) {
            continue;
        }
        let descriptor: FieldDescriptor =
            serde_json::from_value(raw.clone()).map_err(|source| SchemaError::MalformedProperty {
                name: name.clone(),
                source,
            })?;
        fields.push((name.clone(), descriptor));
    }

    fields.sort_by_key(|(_, descriptor)| order_key(descriptor));
    Ok(fields)
}

/// Parses a raw JSON value into a schema document.
///
/// Accepts either a full document with a `properties` mapping, or a bare
/// property mapping (an object whose values are all objects), which is
/// wrapped as the document's properties. Anything else is invalid.
pub fn document_from_value(value: Value) -> Result<SchemaDocument, SchemaError> {
    let Value::Object(map) = value else {
        return Err(SchemaError::SchemaInvalid(
            "document is not a JSON object".into(),
        ));
    };

    if map.get("properties").is_some_and(Value::is_object) {
        return serde_json::from_value(Value::Object(map))
            .map_err(|err| SchemaError::SchemaInvalid(err.to_string()));
    }

    if looks_like_property_map(&map) {
        return Ok(SchemaDocument {
            properties: map,
            ..SchemaDocument::default()
        });
    }

    Err(SchemaError::SchemaInvalid(
        "document has no 'properties' mapping and is not a flat property mapping".into(),
    ))
}

fn looks_like_property_map(map: &Map<String, Value>) -> bool {
    let mut saw_data_key = false;
    for (key, value) in map {
        if !is_data_key(key) {
            continue;
        }
        if !value.is_object() {
            return false;
        }
        saw_data_key = true;
    }
    saw_data_key
}
