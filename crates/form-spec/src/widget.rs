use std::collections::BTreeMap;

use serde_json::Value;

use crate::mapper::WidgetSpec;

/// Minimal capability contract a rendered input must satisfy.
///
/// The engine never touches a UI toolkit directly; hosts hand back anything
/// that can carry a raw string value, a checked state for boolean widgets,
/// an attached structured sub-value for composite array items, and
/// per-field error display state.
pub trait Widget {
    /// Raw displayed value.
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);

    /// Checked state; only meaningful for boolean widgets.
    fn checked(&self) -> bool {
        false
    }
    fn set_checked(&mut self, _checked: bool) {}

    fn focus(&mut self) {}

    /// Structured sub-value managed by an external editor
    /// (array fields with `uri`/`object` items).
    fn attached(&self) -> Option<Value> {
        None
    }
    fn set_attached(&mut self, _value: Value) {}

    /// Marks the widget invalid with a message, or valid again.
    fn set_invalid(&mut self, _message: &str) {}
    fn set_valid(&mut self) {}

    /// Dependent UI hint recomputed after every write for fields with a
    /// maximum length.
    fn set_characters_remaining(&mut self, _remaining: Option<usize>) {}
}

/// Name-indexed widget access used by the data binder.
pub trait WidgetLookup {
    fn widget(&self, name: &str) -> Option<&dyn Widget>;
    // The + 'static keeps the trait-object lifetime independent of the
    // borrow; boxed widgets could not be returned otherwise.
    fn widget_mut(&mut self, name: &str) -> Option<&mut (dyn Widget + 'static)>;
}

/// Collaborator that materializes one concrete widget per ordered field.
pub trait RenderTarget {
    fn create_widget(&mut self, name: &str, label: &str, spec: &WidgetSpec) -> Box<dyn Widget>;
}

/// Owned collection of the widgets rendered for the current schema.
#[derive(Default)]
pub struct WidgetBank {
    widgets: BTreeMap<String, Box<dyn Widget>>,
}

impl WidgetBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, widget: Box<dyn Widget>) {
        self.widgets.insert(name.into(), widget);
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }
}

impl WidgetLookup for WidgetBank {
    fn widget(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets.get(name).map(|boxed| boxed.as_ref())
    }

    fn widget_mut(&mut self, name: &str) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(name).map(|boxed| boxed.as_mut())
    }
}

/// In-memory widget for hosts without a real UI (tests, the CLI).
#[derive(Debug, Clone, Default)]
pub struct MemoryWidget {
    pub value: String,
    pub checked: bool,
    pub attached: Option<Value>,
    pub error: Option<String>,
    pub characters_remaining: Option<usize>,
    pub focused: bool,
}

impl MemoryWidget {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

impl Widget for MemoryWidget {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn checked(&self) -> bool {
        self.checked
    }

    fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn attached(&self) -> Option<Value> {
        self.attached.clone()
    }

    fn set_attached(&mut self, value: Value) {
        self.attached = Some(value);
    }

    fn set_invalid(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn set_valid(&mut self) {
        self.error = None;
    }

    fn set_characters_remaining(&mut self, remaining: Option<usize>) {
        self.characters_remaining = remaining;
    }
}

/// Render target producing [`MemoryWidget`]s, recording what was rendered.
#[derive(Default)]
pub struct MemoryRenderTarget {
    pub rendered: Vec<(String, String, WidgetSpec)>,
}

impl RenderTarget for MemoryRenderTarget {
    fn create_widget(&mut self, name: &str, label: &str, spec: &WidgetSpec) -> Box<dyn Widget> {
        self.rendered
            .push((name.to_string(), label.to_string(), spec.clone()));
        Box::new(MemoryWidget::default())
    }
}
