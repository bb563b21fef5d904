use thiserror::Error;

/// Failure while decoding or resolving a schema document.
///
/// `at` is the JSON-pointer location of the offending node in the source
/// document (`""` is the document root).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The node matches no schema discriminant, or a keyword has the wrong shape.
    #[error("malformed schema node at `{at}`: {reason}")]
    MalformedNode { at: String, reason: String },

    /// A pointer names a definition that does not exist.
    #[error("unresolved reference `{reference}` at `{at}`")]
    UnresolvedReference { at: String, reference: String },

    /// A scalar keyword could not be coerced to its expected representation.
    #[error("cannot coerce `{keyword}` at `{at}`: expected {expected}, found {found}")]
    TypeCoercionFailure {
        at: String,
        keyword: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl SchemaError {
    pub(crate) fn malformed(at: &str, reason: impl Into<String>) -> Self {
        SchemaError::MalformedNode { at: at.to_string(), reason: reason.into() }
    }

    /// Location of the offending node.
    pub fn at(&self) -> &str {
        match self {
            SchemaError::MalformedNode { at, .. }
            | SchemaError::UnresolvedReference { at, .. }
            | SchemaError::TypeCoercionFailure { at, .. } => at,
        }
    }
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
