use form_spec::{MapperOptions, SchemaDocument, build_form_plan, render_json_plan, render_text_plan};

fn fixture() -> SchemaDocument {
    let raw = include_str!("fixtures/contact_form.json");
    serde_json::from_str(raw).expect("fixture parses")
}

#[test]
fn plans_resolve_labels_widgets_and_buttons_in_order() {
    let plan = build_form_plan(&fixture(), &MapperOptions::default()).expect("plan builds");

    let names: Vec<&str> = plan.fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names, vec!["website", "message", "tags", "token", "name", "age", "email"]);

    // Titles label the widget; untitled fields fall back to their name.
    assert_eq!(plan.fields[0].label, "Website");
    assert_eq!(plan.fields[3].label, "token");

    assert_eq!(
        plan.buttons,
        vec![
            ("create".to_string(), "Save".to_string()),
            ("describedby:archive".to_string(), "describedby:archive".to_string()),
        ]
    );
}

#[test]
fn text_rendering_lists_every_field_with_its_markers() {
    let plan = build_form_plan(&fixture(), &MapperOptions::default()).expect("plan builds");
    let text = render_text_plan(&plan);

    assert!(text.contains("Form: Contact"));
    assert!(text.contains("Fields (7):"));
    assert!(text.contains(" - website (Website) [url]"));
    assert!(text.contains(" - email (Email address) [email] *required"));
    assert!(text.contains(" - token (token) [text] *required *readonly"));
    assert!(text.contains(" - age (age) [choice]"));
    assert!(text.contains("Buttons: Save, describedby:archive"));

    // The long description renders as an indented help line.
    assert!(text.contains("\n   Tell us as much as you can"));
}

#[test]
fn json_rendering_exposes_constraints_and_choice_options() {
    let plan = build_form_plan(&fixture(), &MapperOptions::default()).expect("plan builds");
    let payload = render_json_plan(&plan);

    assert_eq!(payload["title"], "Contact");
    assert_eq!(payload["fields"].as_array().map(Vec::len), Some(7));

    let age = &payload["fields"][5];
    assert_eq!(age["name"], "age");
    assert_eq!(age["widget"], "choice");
    // 18..=65 inclusive plus the leading blank entry.
    assert_eq!(age["options"].as_array().map(Vec::len), Some(49));
    assert_eq!(age["constraints"]["minimum"], 18.0);

    let email = &payload["fields"][6];
    assert_eq!(email["widget"], "email");
    assert_eq!(email["constraints"]["required"], true);
    assert_eq!(email["placeholder"], "We reply within two days");
}
