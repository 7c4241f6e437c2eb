//! Resolution errors and best-effort warnings.
//!
//! Errors are fatal to the declaration they occur in, never to the run:
//! generation continues with the remaining declarations and reports the
//! failures alongside the output.

use serde::{Deserialize, Serialize};

/// A fatal per-declaration resolution error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ResolveError {
    /// A source construct with no target representation and no pass-through
    /// rule (e.g. a constant used in type position).
    #[error("unsupported type construct: {0}")]
    UnsupportedType(String),

    /// `flatten` applied to a field whose type does not resolve to a
    /// struct-shaped declaration.
    #[error("cannot flatten `{0}`: not a struct-shaped type")]
    FlattenTargetNotStruct(String),

    /// A named type used with the wrong number of generic arguments.
    #[error("`{name}` expects {expected} generic argument(s), got {found}")]
    GenericArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Internal tagging over a payload that cannot merge into the
    /// tag-carrying object.
    #[error("variant `{0}` cannot carry an internal tag: payload does not merge into an object")]
    InternalTagOnNonMergeableVariant(String),

    /// A named type with no matching declaration in the symbol table.
    #[error("unresolved reference to `{0}`")]
    UnresolvedReference(String),
}

/// A declaration that failed to translate, with the error that stopped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub declaration: String,
    pub error: ResolveError,
}

/// A best-effort pass-through that deserves attention but not failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub declaration: String,
    pub message: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.declaration, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_with_context() {
        let err = ResolveError::GenericArityMismatch {
            name: "Paginated".into(),
            expected: 1,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "`Paginated` expects 1 generic argument(s), got 2"
        );

        let err = ResolveError::UnresolvedReference("Missing".into());
        assert_eq!(err.to_string(), "unresolved reference to `Missing`");
    }
}
