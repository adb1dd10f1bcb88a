use crate::domain::FieldKind;

/// Errors a field controller can surface. Missing entities are not errors
/// (the predicates fail open); the only failure here is a configuration
/// problem that the integration boundary should see, not swallow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// No renderer factory is registered for the field's kind.
    UnknownFieldKind { field: String, kind: FieldKind },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::UnknownFieldKind { field, kind } => {
                write!(f, "field '{field}': no renderer registered for kind '{kind}'")
            }
        }
    }
}

impl std::error::Error for FieldError {}
