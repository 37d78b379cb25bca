use serde_json::{Map, Value};

/// Discrete notifications raised by the controller.
///
/// `ValueSet` and `SubmitRequested` are cancelable: an observer returning
/// [`EventVerdict::Cancel`] aborts the operation. Every other event is
/// informational and its verdict is ignored.
#[derive(Debug, Clone)]
pub enum FormEvent<'a> {
    SchemaLoaded { url: Option<&'a str> },
    SchemaLoadFailed { message: &'a str },
    RenderComplete { field_count: usize },
    ValueSet {
        old_value: &'a Map<String, Value>,
        new_value: &'a Map<String, Value>,
    },
    ValidationPassed,
    ValidationFailed,
    SubmitRequested,
    SubmitComplete {
        body: Option<&'a Value>,
        error: Option<&'a str>,
    },
    ButtonActivated { rel: &'a str, label: &'a str },
}

impl FormEvent<'_> {
    pub fn is_cancelable(&self) -> bool {
        matches!(self, FormEvent::ValueSet { .. } | FormEvent::SubmitRequested)
    }
}

/// Observer decision for a cancelable event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventVerdict {
    Proceed,
    Cancel,
}

/// Subscription interface for controller notifications.
pub trait FormObserver {
    fn on_event(&mut self, event: &FormEvent<'_>) -> EventVerdict;
}
