pub mod document;
pub mod field;

pub use document::{Link, SchemaDocument};
pub use field::{FieldDescriptor, FieldKind, ItemsDescriptor};
