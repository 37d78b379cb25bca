use std::collections::BTreeMap;

use form_spec::SchemaDocument;
use serde_json::{Map, Value};

/// Lifecycle phase of a form controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No schema assigned yet.
    Empty,
    /// A schema fetch is in flight.
    Loading,
    /// Schema assigned, widgets rendered.
    Ready,
    /// A submission is in flight.
    Submitting,
}

/// Transient state owned exclusively by one controller instance.
#[derive(Debug, Default)]
pub struct FormState {
    pub schema: Option<SchemaDocument>,
    /// Last structured values written to the form; mirrors widget state.
    pub values: Map<String, Value>,
    /// One message per currently invalid field. Empty means valid.
    pub errors: BTreeMap<String, String>,
    /// Propagates to every rendered field.
    pub readonly: bool,
}

impl FormState {
    /// Clears per-schema state when a new schema replaces the old one.
    pub fn reset_for_schema(&mut self, schema: SchemaDocument) {
        self.schema = Some(schema);
        self.values.clear();
        self.errors.clear();
    }
}
