use thiserror::Error;

/// Problems building a [`Schema`](crate::Schema).
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to parse SDL: {0}")]
    Syntax(String),

    #[error("Type `{0}` is defined more than once")]
    DuplicateType(String),

    #[error("Unknown type `{0}`")]
    UnknownType(String),

    #[error("Invalid introspection document: {0}")]
    InvalidIntrospection(String),

    #[error("Cannot derive a schema from the datamodel: {0}")]
    InvalidDatamodel(String),
}

/// Faults raised while rendering declaration or metadata documents.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No TypeScript mapping for scalar `{scalar}` (used by `{owner}.{field}`)")]
    UnmappedScalar {
        scalar: String,
        owner: String,
        field: String,
    },

    #[error("Unknown type `{0}` referenced by the schema")]
    UnknownType(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problems reading a previously rendered metadata document.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Metadata document does not start with `{0}`")]
    MissingExportPrefix(String),

    #[error("Malformed metadata document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
