use serde_json::{Map, Value, json};

use crate::error::SchemaError;
use crate::mapper::{MapperOptions, WidgetKind, WidgetSpec, map_field};
use crate::reader::ordered_fields;
use crate::schema::SchemaDocument;

/// One entry of the resolved render plan.
#[derive(Debug, Clone)]
pub struct PlannedField {
    pub name: String,
    pub label: String,
    pub spec: WidgetSpec,
}

/// The ordered set of widgets a schema resolves to, plus form chrome data.
#[derive(Debug, Clone)]
pub struct FormPlan {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<PlannedField>,
    pub buttons: Vec<(String, String)>,
}

/// Walks the schema and resolves every data field into a `(label, widget)`
/// pair, in render order.
pub fn build_form_plan(
    schema: &SchemaDocument,
    options: &MapperOptions,
) -> Result<FormPlan, SchemaError> {
    let fields = ordered_fields(schema)?
        .into_iter()
        .map(|(name, descriptor)| {
            let label = descriptor.title.clone().unwrap_or_else(|| name.clone());
            let spec = map_field(&descriptor, options);
            PlannedField { name, label, spec }
        })
        .collect();

    let buttons = schema
        .button_links()
        .map(|link| (link.rel.clone(), link.label().to_string()))
        .collect();

    Ok(FormPlan {
        title: schema.title.clone(),
        description: schema.description.clone(),
        fields,
        buttons,
    })
}

/// Renders the plan as human-friendly text.
pub fn render_text_plan(plan: &FormPlan) -> String {
    let mut lines = Vec::new();

    if let Some(title) = &plan.title {
        lines.push(format!("Form: {}", title));
    }
    if let Some(description) = &plan.description {
        lines.push(format!("Description: {}", description));
    }
    lines.push(format!("Fields ({}):", plan.fields.len()));

    for field in &plan.fields {
        let mut entry = format!(
            " - {} ({}) [{}]",
            field.name,
            field.label,
            field.spec.kind.as_str()
        );
        if field.spec.constraints.required {
            entry.push_str(" *required");
        }
        if field.spec.constraints.readonly {
            entry.push_str(" *readonly");
        }
        if let WidgetKind::Choice { options } = &field.spec.kind {
            entry.push_str(&format!(" choices: {}", options.join(", ")));
        }
        lines.push(entry);
        if let Some(help) = &field.spec.help_text {
            lines.push(format!("   {}", help));
        }
    }

    if !plan.buttons.is_empty() {
        lines.push(format!(
            "Buttons: {}",
            plan.buttons
                .iter()
                .map(|(_, label)| label.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    lines.join("\n")
}

/// Renders the plan as a structured JSON payload.
pub fn render_json_plan(plan: &FormPlan) -> Value {
    let fields = plan
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("name".into(), Value::String(field.name.clone()));
            map.insert("label".into(), Value::String(field.label.clone()));
            map.insert(
                "widget".into(),
                Value::String(field.spec.kind.as_str().to_string()),
            );
            if let WidgetKind::Choice { .. } = &field.spec.kind {
                map.insert(
                    "options".into(),
                    Value::Array(
                        field
                            .spec
                            .select_options()
                            .into_iter()
                            .map(Value::String)
                            .collect(),
                    ),
                );
            }
            map.insert(
                "constraints".into(),
                serde_json::to_value(&field.spec.constraints).unwrap_or(Value::Null),
            );
            if let Some(placeholder) = &field.spec.placeholder {
                map.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
            if let Some(help) = &field.spec.help_text {
                map.insert("help".into(), Value::String(help.clone()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "title": plan.title,
        "description": plan.description,
        "fields": fields,
        "buttons": plan.buttons.iter().map(|(rel, label)| {
            json!({ "rel": rel, "label": label })
        }).collect::<Vec<_>>(),
    })
}
