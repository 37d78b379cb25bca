use thiserror::Error;

/// Structural failures raised while reading a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document has no usable property mapping.
    #[error("invalid schema: {0}")]
    SchemaInvalid(String),
    /// A property definition does not deserialize into a field descriptor.
    #[error("schema property '{name}' is malformed: {source}")]
    MalformedProperty {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
