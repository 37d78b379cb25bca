use form_spec::{
    MemoryWidget, SchemaDocument, Widget, WidgetLookup, document_from_value, extract, populate,
    raw_extract,
};
use serde_json::{Map, Value, json};

/// Name-addressable panel of concrete widgets, so tests can inspect state
/// the trait only exposes as setters.
#[derive(Default)]
struct Panel {
    widgets: Vec<(String, MemoryWidget)>,
}

impl Panel {
    fn add(&mut self, name: &str, widget: MemoryWidget) -> &mut Self {
        self.widgets.push((name.to_string(), widget));
        self
    }

    fn get(&self, name: &str) -> &MemoryWidget {
        self.widgets
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, widget)| widget)
            .expect("widget exists")
    }
}

impl WidgetLookup for Panel {
    fn widget(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, widget)| widget as &dyn Widget)
    }

    fn widget_mut(&mut self, name: &str) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets
            .iter_mut()
            .find(|(entry, _)| entry == name)
            .map(|(_, widget)| widget as &mut (dyn Widget + 'static))
    }
}

fn schema(raw: Value) -> SchemaDocument {
    document_from_value(raw).expect("document parses")
}

fn no_previous() -> Map<String, Value> {
    Map::new()
}

#[test]
fn multi_line_arrays_split_on_newlines() {
    let schema = schema(json!({
        "notes": { "type": "array", "items": { "type": "string", "format": "textarea" } }
    }));
    let mut panel = Panel::default();
    panel.add("notes", MemoryWidget::with_value("line1\nline2"));

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["notes"], json!(["line1", "line2"]));
}

#[test]
fn empty_multi_line_arrays_extract_as_empty() {
    let schema = schema(json!({
        "notes": { "type": "array", "items": { "type": "string", "format": "textarea" } }
    }));
    let mut panel = Panel::default();
    panel.add("notes", MemoryWidget::default());

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["notes"], json!([]));
}

#[test]
fn readonly_required_fields_fall_back_to_their_default() {
    let schema = schema(json!({
        "token": { "type": "string", "readonly": true, "required": true, "default": "X" }
    }));
    let panel = Panel::default();

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["token"], json!("X"));

    // A previously bound value beats the default.
    let mut previous = Map::new();
    previous.insert("token".into(), json!("live-7"));
    let data = extract(&schema, &panel, &previous).expect("extracts");
    assert_eq!(data["token"], json!("live-7"));
}

#[test]
fn readonly_optional_fields_without_history_are_omitted() {
    let schema = schema(json!({
        "token": { "type": "string", "readonly": true, "default": "X" }
    }));
    let panel = Panel::default();

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert!(!data.contains_key("token"));
}

#[test]
fn empty_optional_values_are_omitted_but_required_ones_kept() {
    let schema = schema(json!({
        "nickname": { "type": "string" },
        "name": { "type": "string", "required": true }
    }));
    let mut panel = Panel::default();
    panel
        .add("nickname", MemoryWidget::default())
        .add("name", MemoryWidget::default());

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert!(!data.contains_key("nickname"));
    assert_eq!(data["name"], json!(""));
}

#[test]
fn numeric_widgets_coerce_their_raw_text() {
    let schema = schema(json!({
        "age": { "type": "integer", "required": true },
        "score": { "type": "number", "required": true }
    }));
    let mut panel = Panel::default();
    panel
        .add("age", MemoryWidget::with_value(" 42 "))
        .add("score", MemoryWidget::with_value("3.5"));

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["age"], json!(42));
    assert_eq!(data["score"], json!(3.5));
}

#[test]
fn unparsable_numbers_extract_as_empty_strings() {
    let schema = schema(json!({
        "age": { "type": "integer", "required": true }
    }));
    let mut panel = Panel::default();
    panel.add("age", MemoryWidget::with_value("forty"));

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["age"], json!(""));
}

#[test]
fn text_is_trimmed_and_clipped_to_max_length() {
    let schema = schema(json!({
        "name": { "type": "string", "required": true, "maxLength": 5 }
    }));
    let mut panel = Panel::default();
    panel.add("name", MemoryWidget::with_value("  Margaret  "));

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["name"], json!("Marga"));
}

#[test]
fn booleans_extract_from_checked_state() {
    let schema = schema(json!({
        "subscribed": { "type": "boolean", "required": true }
    }));
    let mut panel = Panel::default();
    let mut widget = MemoryWidget::default();
    widget.checked = true;
    panel.add("subscribed", widget);

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["subscribed"], json!(true));
}

#[test]
fn composite_arrays_pass_attached_values_through() {
    let schema = schema(json!({
        "documents": { "type": "array", "items": { "type": "object" } }
    }));
    let mut panel = Panel::default();
    let mut widget = MemoryWidget::default();
    widget.attached = Some(json!([{ "href": "/a" }]));
    panel.add("documents", widget);

    let data = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(data["documents"], json!([{ "href": "/a" }]));
}

#[test]
fn raw_snapshots_keep_empties_and_skip_readonly() {
    let schema = schema(json!({
        "nickname": { "type": "string" },
        "subscribed": { "type": "boolean" },
        "token": { "type": "string", "readonly": true, "default": "X" }
    }));
    let mut panel = Panel::default();
    panel
        .add("nickname", MemoryWidget::default())
        .add("subscribed", MemoryWidget::default())
        .add("token", MemoryWidget::with_value("ignored"));

    let data = raw_extract(&schema, &panel).expect("extracts");
    assert_eq!(data["nickname"], json!(""));
    assert_eq!(data["subscribed"], json!(false));
    assert!(!data.contains_key("token"));
}

#[test]
fn populate_writes_display_forms_into_widgets() {
    let schema = schema(json!({
        "name": { "type": "string" },
        "age": { "type": "integer" },
        "subscribed": { "type": "boolean" },
        "notes": { "type": "array", "items": { "type": "string", "format": "textarea" } }
    }));
    let mut panel = Panel::default();
    panel
        .add("name", MemoryWidget::default())
        .add("age", MemoryWidget::default())
        .add("subscribed", MemoryWidget::default())
        .add("notes", MemoryWidget::default());

    let mut data = Map::new();
    data.insert("name".into(), json!("Ada"));
    data.insert("age".into(), json!(36));
    data.insert("subscribed".into(), json!(1));
    data.insert("notes".into(), json!(["one", "two"]));
    data.insert("$meta".into(), json!("skipped"));
    data.insert("missing".into(), json!("no widget, no panic"));
    populate(&schema, &mut panel, &data);

    assert_eq!(panel.get("name").value, "Ada");
    assert_eq!(panel.get("age").value, "36");
    assert!(panel.get("subscribed").checked);
    assert_eq!(panel.get("notes").value, "one\ntwo");
}

#[test]
fn populate_clears_checkboxes_for_falsy_values() {
    let schema = schema(json!({
        "subscribed": { "type": "boolean" }
    }));
    let mut panel = Panel::default();
    let mut widget = MemoryWidget::default();
    widget.checked = true;
    panel.add("subscribed", widget);

    let mut data = Map::new();
    data.insert("subscribed".into(), json!(""));
    populate(&schema, &mut panel, &data);

    assert!(!panel.get("subscribed").checked);
}

#[test]
fn populate_attaches_composite_values() {
    let schema = schema(json!({
        "documents": { "type": "array", "items": { "type": "object" } }
    }));
    let mut panel = Panel::default();
    panel.add("documents", MemoryWidget::default());

    let mut data = Map::new();
    data.insert("documents".into(), json!([{ "href": "/a" }]));
    populate(&schema, &mut panel, &data);

    assert_eq!(panel.get("documents").attached, Some(json!([{ "href": "/a" }])));
}

#[test]
fn populate_refreshes_the_characters_remaining_hint() {
    let schema = schema(json!({
        "name": { "type": "string", "maxLength": 20 }
    }));
    let mut panel = Panel::default();
    panel.add("name", MemoryWidget::default());

    let mut data = Map::new();
    data.insert("name".into(), json!("Ada"));
    populate(&schema, &mut panel, &data);

    assert_eq!(panel.get("name").characters_remaining, Some(17));
}

#[test]
fn populate_then_extract_round_trips() {
    let schema = schema(json!({
        "name": { "type": "string", "required": true },
        "age": { "type": "integer", "required": true },
        "subscribed": { "type": "boolean", "required": true },
        "notes": { "type": "array", "items": { "type": "string", "format": "textarea" } }
    }));
    let mut panel = Panel::default();
    panel
        .add("name", MemoryWidget::default())
        .add("age", MemoryWidget::default())
        .add("subscribed", MemoryWidget::default())
        .add("notes", MemoryWidget::default());

    let mut data = Map::new();
    data.insert("name".into(), json!("Ada"));
    data.insert("age".into(), json!(36));
    data.insert("subscribed".into(), json!(true));
    data.insert("notes".into(), json!(["one", "two"]));
    populate(&schema, &mut panel, &data);

    let extracted = extract(&schema, &panel, &no_previous()).expect("extracts");
    assert_eq!(Value::Object(extracted), Value::Object(data));
}
