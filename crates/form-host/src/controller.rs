use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use form_spec::{
    FieldDescriptor, MapperOptions, RenderTarget, SchemaDocument, SchemaError, Widget, WidgetBank,
    WidgetLookup, binder, document_from_value, map_field, ordered_fields, reader, validate_field,
};

use crate::events::{EventVerdict, FormEvent, FormObserver};
use crate::persist::PersistenceStore;
use crate::state::{FormState, Phase};
use crate::transport::{SchemaTransport, SubmissionTransport, TransportError};

/// Failures surfaced by the controller. Validation failures are never
/// errors; they are reported through [`SubmitOutcome`] and field state.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no schema assigned")]
    NoSchema,
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("schema load failed: {0}")]
    SchemaLoadFailed(#[source] TransportError),
    #[error("submission failed: {0}")]
    SubmissionFailed(#[source] TransportError),
    #[error("no link matches rel '{0}'")]
    UnknownLink(String),
    #[error("schema declares no submission target")]
    NoSubmitTarget,
}

/// Result of a submit attempt that did not fail at the transport.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Data delivered; the response carried no follow-up schema.
    Completed { body: Value },
    /// Data delivered and the response chained into a new schema.
    ChainedSchema,
    /// Validation errors blocked the submission.
    Blocked,
    /// An observer cancelled the submit-requested event.
    Cancelled,
}

/// Button exposed for one schema link.
#[derive(Debug, Clone, PartialEq)]
pub struct FormButton {
    pub rel: String,
    pub label: String,
}

/// Behavior knobs mirrored from the host surface.
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Descriptions longer than this render as help text, not placeholders.
    pub placeholder_max_length: usize,
    /// Skip all validation (form-builder hosts drive their own).
    pub disable_validation: bool,
    /// Move focus to the first invalid widget after a failed validation.
    pub autofocus_error: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            placeholder_max_length: 75,
            disable_validation: false,
            autofocus_error: false,
        }
    }
}

/// Orchestrates schema lifecycle, data binding, validation, and submission
/// over injected collaborators. Owns all per-form state exclusively.
pub struct FormController {
    schema_transport: Box<dyn SchemaTransport>,
    submission_transport: Box<dyn SubmissionTransport>,
    render_target: Box<dyn RenderTarget>,
    persistence: Option<Box<dyn PersistenceStore>>,
    observers: Vec<Box<dyn FormObserver>>,
    options: ControllerOptions,
    state: FormState,
    phase: Phase,
    widgets: WidgetBank,
    /// Resolved field plan for the current schema, in render order.
    fields: Vec<(String, FieldDescriptor)>,
    /// URL the current schema was loaded from, if any.
    source: Option<String>,
    pending_source: Option<String>,
    request_counter: u64,
    active_request: Option<u64>,
}

impl FormController {
    pub fn new(
        schema_transport: Box<dyn SchemaTransport>,
        submission_transport: Box<dyn SubmissionTransport>,
        render_target: Box<dyn RenderTarget>,
    ) -> Self {
        Self {
            schema_transport,
            submission_transport,
            render_target,
            persistence: None,
            observers: Vec::new(),
            options: ControllerOptions::default(),
            state: FormState::default(),
            phase: Phase::Empty,
            widgets: WidgetBank::new(),
            fields: Vec::new(),
            source: None,
            pending_source: None,
            request_counter: 0,
            active_request: None,
        }
    }

    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_persistence(mut self, store: Box<dyn PersistenceStore>) -> Self {
        self.persistence = Some(store);
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn FormObserver>) {
        self.observers.push(observer);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn schema(&self) -> Option<&SchemaDocument> {
        self.state.schema.as_ref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.state.errors
    }

    /// Field names of the current schema, in render order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn widget(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets.widget(name)
    }

    pub fn widget_mut(&mut self, name: &str) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.widget_mut(name)
    }

    /// Applies before the next schema render; every widget then carries the
    /// read-only constraint.
    pub fn set_readonly(&mut self, readonly: bool) {
        self.state.readonly = readonly;
    }

    fn notify(&mut self, event: FormEvent<'_>) -> EventVerdict {
        let mut verdict = EventVerdict::Proceed;
        for observer in &mut self.observers {
            if observer.on_event(&event) == EventVerdict::Cancel && event.is_cancelable() {
                verdict = EventVerdict::Cancel;
            }
        }
        verdict
    }

    /// Replaces the current schema: clears values and errors, renders one
    /// widget per ordered field, and transitions to `Ready`.
    pub fn assign_schema(&mut self, schema: SchemaDocument) -> Result<(), HostError> {
        let fields = ordered_fields(&schema)?;
        let mapper_options = MapperOptions {
            placeholder_max_length: self.options.placeholder_max_length,
        };

        self.widgets.clear();
        let mut first_input = true;
        for (name, descriptor) in &fields {
            let mut spec = map_field(descriptor, &mapper_options);
            if self.state.readonly {
                spec.constraints.readonly = true;
            }
            let label = descriptor.title.clone().unwrap_or_else(|| name.clone());
            let mut widget = self.render_target.create_widget(name, &label, &spec);
            if first_input && !spec.constraints.readonly {
                widget.focus();
                first_input = false;
            }
            self.widgets.insert(name.clone(), widget);
        }

        self.fields = fields;
        self.state.reset_for_schema(schema);
        self.phase = Phase::Ready;

        let field_count = self.fields.len();
        self.notify(FormEvent::RenderComplete { field_count });
        Ok(())
    }

    /// Starts a schema load and returns its request key. Results delivered
    /// through [`Self::finish_load`] are discarded unless their key still
    /// matches the most recent request.
    pub fn begin_load(&mut self, url: &str) -> u64 {
        self.request_counter += 1;
        self.active_request = Some(self.request_counter);
        self.pending_source = Some(url.to_string());
        self.phase = Phase::Loading;
        self.request_counter
    }

    /// Completes a schema load. Returns `Ok(false)` when the result was
    /// stale and ignored.
    pub fn finish_load(
        &mut self,
        key: u64,
        result: Result<Value, TransportError>,
    ) -> Result<bool, HostError> {
        if self.active_request != Some(key) {
            return Ok(false);
        }
        self.active_request = None;
        let url = self.pending_source.take();

        let body = match result {
            Ok(body) => body,
            Err(err) => {
                self.recover_phase();
                let message = err.to_string();
                self.notify(FormEvent::SchemaLoadFailed { message: &message });
                return Err(HostError::SchemaLoadFailed(err));
            }
        };

        let schema = match document_from_value(body) {
            Ok(schema) => schema,
            Err(err) => {
                self.recover_phase();
                let message = err.to_string();
                self.notify(FormEvent::SchemaLoadFailed { message: &message });
                return Err(HostError::Schema(err));
            }
        };

        self.assign_schema(schema)?;
        self.source = url.clone();
        self.notify(FormEvent::SchemaLoaded {
            url: url.as_deref(),
        });
        self.restore_persisted();
        Ok(true)
    }

    /// Drives a full load through the injected schema transport.
    pub fn load_from(&mut self, url: &str) -> Result<(), HostError> {
        let key = self.begin_load(url);
        let result = self.schema_transport.fetch_schema(url);
        self.finish_load(key, result).map(|_| ())
    }

    fn recover_phase(&mut self) {
        self.phase = if self.state.schema.is_some() {
            Phase::Ready
        } else {
            Phase::Empty
        };
    }

    fn restore_persisted(&mut self) {
        let snapshot = match (&self.persistence, &self.source) {
            (Some(store), Some(source)) => store
                .load(source)
                .and_then(|payload| serde_json::from_str::<Value>(&payload).ok())
                .and_then(|value| value.as_object().cloned()),
            _ => None,
        };
        if let Some(data) = snapshot {
            self.apply_values(&data);
        }
    }

    fn apply_values(&mut self, data: &Map<String, Value>) {
        if let Some(schema) = &self.state.schema {
            binder::populate(schema, &mut self.widgets, data);
        }
        for (name, value) in data {
            if reader::is_data_key(name) {
                self.state.values.insert(name.clone(), value.clone());
            }
        }
    }

    /// Writes structured data into the form. Cancelable through the
    /// value-set event; returns whether the write was applied.
    pub fn set_value(&mut self, data: &Map<String, Value>) -> Result<bool, HostError> {
        if self.state.schema.is_none() {
            return Err(HostError::NoSchema);
        }
        let old_value = self.state.values.clone();
        let verdict = self.notify(FormEvent::ValueSet {
            old_value: &old_value,
            new_value: data,
        });
        if verdict == EventVerdict::Cancel {
            return Ok(false);
        }
        self.apply_values(data);
        Ok(true)
    }

    /// Current structured data, coerced from the widgets.
    pub fn value(&self) -> Result<Map<String, Value>, HostError> {
        let schema = self.state.schema.as_ref().ok_or(HostError::NoSchema)?;
        Ok(binder::extract(schema, &self.widgets, &self.state.values)?)
    }

    /// Validates a single field value, updating that field's error state and
    /// display. Used by blur handlers and explicit host calls.
    pub fn validate_value(
        &mut self,
        name: &str,
        value: &Value,
    ) -> Result<Option<String>, HostError> {
        let mut data = Map::new();
        data.insert(name.to_string(), value.clone());
        self.is_valid(Some(&data), false)?;
        Ok(self.state.errors.get(name).cloned())
    }

    /// Validates the field against its widget's current raw value.
    pub fn validate_widget(&mut self, name: &str) -> Result<Option<String>, HostError> {
        let raw = self
            .widgets
            .widget(name)
            .map(|widget| Value::String(widget.value()))
            .unwrap_or(Value::Null);
        self.validate_value(name, &raw)
    }

    /// Checks the given data (or the current form data) against the schema.
    ///
    /// Silent mode computes the verdict without touching widget error
    /// display, stored error state, or the event surface; it exists for
    /// pre-submit checks that must not flash error UI prematurely.
    pub fn is_valid(
        &mut self,
        data: Option<&Map<String, Value>>,
        silent: bool,
    ) -> Result<bool, HostError> {
        if self.options.disable_validation {
            return Ok(true);
        }
        if self.state.schema.is_none() {
            return Err(HostError::NoSchema);
        }

        let current;
        // Only the widget-driven path may substitute raw widget strings;
        // explicit data validates exactly what the caller supplied.
        let from_widgets = data.is_none();
        let data = match data {
            Some(data) => data,
            None => {
                current = self.value()?;
                &current
            }
        };

        let mut errors: BTreeMap<String, String> = BTreeMap::new();
        let mut checked: Vec<String> = Vec::new();
        if let Some(schema) = self.state.schema.as_ref() {
            for (name, value) in data {
                // Pattern-constrained fields validate the raw widget string,
                // so numeric coercion cannot strip leading zeros first.
                let raw_override = if from_widgets {
                    schema
                        .properties
                        .get(name)
                        .and_then(|property| property.get("pattern"))
                        .and_then(|_| self.widgets.widget(name))
                        .map(|widget| Value::String(widget.value()))
                } else {
                    None
                };
                let value = raw_override.as_ref().unwrap_or(value);
                if let Some(message) = validate_field(schema, name, value) {
                    errors.insert(name.clone(), message);
                }
                checked.push(name.clone());
            }
        }
        let valid = errors.is_empty();

        if !silent {
            for name in &checked {
                match errors.get(name) {
                    Some(message) => {
                        if let Some(widget) = self.widgets.widget_mut(name) {
                            widget.set_invalid(message);
                        }
                        self.state.errors.insert(name.clone(), message.clone());
                    }
                    None => {
                        if let Some(widget) = self.widgets.widget_mut(name) {
                            widget.set_valid();
                        }
                        self.state.errors.remove(name);
                    }
                }
            }

            if self.options.autofocus_error && !valid {
                let first_invalid = self
                    .fields
                    .iter()
                    .map(|(name, _)| name)
                    .find(|name| errors.contains_key(*name))
                    .cloned();
                if let Some(name) = first_invalid
                    && let Some(widget) = self.widgets.widget_mut(&name)
                {
                    widget.focus();
                }
            }

            self.notify(if valid {
                FormEvent::ValidationPassed
            } else {
                FormEvent::ValidationFailed
            });
        }

        self.persist_snapshot();
        Ok(valid)
    }

    fn persist_snapshot(&mut self) {
        if self.persistence.is_none() {
            return;
        }
        let payload = match (&self.state.schema, &self.source) {
            (Some(schema), Some(source)) => binder::raw_extract(schema, &self.widgets)
                .ok()
                .map(|raw| (source.clone(), Value::Object(raw).to_string())),
            _ => None,
        };
        if let Some((key, payload)) = payload
            && let Some(store) = &mut self.persistence
        {
            store.save(&key, &payload);
        }
    }

    /// Buttons for the schema's links, minus collection-listing rels.
    pub fn buttons(&self) -> Vec<FormButton> {
        self.state
            .schema
            .as_ref()
            .map(|schema| {
                schema
                    .button_links()
                    .map(|link| FormButton {
                        rel: link.rel.clone(),
                        label: link.label().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Handles a button press: schema links load their target directly,
    /// everything else submits through the link.
    pub fn activate_button(&mut self, rel: &str) -> Result<SubmitOutcome, HostError> {
        let link = {
            let schema = self.state.schema.as_ref().ok_or(HostError::NoSchema)?;
            schema
                .link_by_rel(rel)
                .cloned()
                .ok_or_else(|| HostError::UnknownLink(rel.to_string()))?
        };
        let label = link.label().to_string();
        self.notify(FormEvent::ButtonActivated { rel, label: &label });

        if link.is_schema_link() {
            self.load_from(&link.href)?;
            return Ok(SubmitOutcome::ChainedSchema);
        }
        self.submit(Some(rel))
    }

    /// Submits the current data to the link matching `rel`, or the schema's
    /// default action. A response body carrying `$schema` renders as the
    /// next form; a `next` link in the body chains a fresh load.
    pub fn submit(&mut self, rel: Option<&str>) -> Result<SubmitOutcome, HostError> {
        if !self.options.disable_validation && !self.is_valid(None, true)? {
            // repaint error state now that the submission is actually blocked
            self.is_valid(None, false)?;
            return Ok(SubmitOutcome::Blocked);
        }

        if self.notify(FormEvent::SubmitRequested) == EventVerdict::Cancel {
            return Ok(SubmitOutcome::Cancelled);
        }

        let link = {
            let schema = self.state.schema.as_ref().ok_or(HostError::NoSchema)?;
            match rel {
                Some(rel) => schema
                    .link_by_rel(rel)
                    .cloned()
                    .ok_or_else(|| HostError::UnknownLink(rel.to_string()))?,
                None => schema
                    .default_action()
                    .cloned()
                    .ok_or(HostError::NoSubmitTarget)?,
            }
        };

        let payload = Value::Object(self.value()?);
        self.phase = Phase::Submitting;

        let body = match self.submission_transport.submit(&link, &payload) {
            Ok(body) => body,
            Err(err) => {
                // entered data and schema stay intact for retry
                self.phase = Phase::Ready;
                let message = err.to_string();
                self.notify(FormEvent::SubmitComplete {
                    body: None,
                    error: Some(&message),
                });
                return Err(HostError::SubmissionFailed(err));
            }
        };

        self.notify(FormEvent::SubmitComplete {
            body: Some(&body),
            error: None,
        });

        if body.get("$schema").is_some() {
            let schema = document_from_value(body)?;
            self.assign_schema(schema)?;
            return Ok(SubmitOutcome::ChainedSchema);
        }

        let next_href = body
            .get("links")
            .and_then(Value::as_array)
            .and_then(|links| {
                links.iter().find(|link| {
                    link.get("rel").and_then(Value::as_str) == Some("next")
                })
            })
            .and_then(|link| link.get("href").and_then(Value::as_str))
            .map(str::to_string);
        if let Some(href) = next_href {
            self.load_from(&href)?;
            return Ok(SubmitOutcome::ChainedSchema);
        }

        self.phase = Phase::Ready;
        Ok(SubmitOutcome::Completed { body })
    }

    /// Repopulates every field from its default (or empty) and clears all
    /// error state.
    pub fn reset(&mut self) -> Result<(), HostError> {
        if self.state.schema.is_none() {
            return Err(HostError::NoSchema);
        }

        let defaults: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, descriptor)| {
                (
                    name.clone(),
                    descriptor
                        .default
                        .clone()
                        .unwrap_or(Value::String(String::new())),
                )
            })
            .collect();

        for (name, _) in &self.fields {
            if let Some(widget) = self.widgets.widget_mut(name) {
                widget.set_valid();
            }
        }
        self.state.errors.clear();
        self.state.values.clear();
        self.apply_values(&defaults);
        Ok(())
    }
}
