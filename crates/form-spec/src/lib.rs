#![allow(missing_docs)]

pub mod binder;
pub mod error;
pub mod mapper;
pub mod preview;
pub mod reader;
pub mod schema;
pub mod validate;
pub mod widget;

pub use binder::{extract, populate, raw_extract};
pub use error::SchemaError;
pub use mapper::{ConstraintSet, MapperOptions, WidgetKind, WidgetSpec, map_field};
pub use preview::{FormPlan, PlannedField, build_form_plan, render_json_plan, render_text_plan};
pub use reader::{document_from_value, ordered_fields};
pub use schema::{FieldDescriptor, FieldKind, ItemsDescriptor, Link, SchemaDocument};
pub use validate::{
    EMAIL_PATTERN, ValidationOutcome, validate_all, validate_field, value_is_present,
};
pub use widget::{MemoryRenderTarget, MemoryWidget, RenderTarget, Widget, WidgetBank, WidgetLookup};
