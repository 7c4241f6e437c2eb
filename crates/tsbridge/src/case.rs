//! Identifier casing and property-key resolution.
//!
//! A [`CaseConvention`] is a deterministic transform applied to an emitted
//! name when no explicit rename overrides it. Reserved words are never
//! escaped or rejected; the only decision made here is whether a property
//! key needs quoting in the target's declaration syntax.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// A deterministic identifier-casing transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseConvention {
    /// Leave the identifier exactly as written.
    AsIs,
    /// `normal variant` (space separated).
    Lower,
    /// `NORMAL VARIANT` (space separated).
    Upper,
    /// `camelCase`.
    Camel,
    /// `PascalCase`.
    Pascal,
    /// `snake_case`.
    Snake,
    /// `SCREAMING_SNAKE_CASE`.
    ScreamingSnake,
    /// `kebab-case`.
    Kebab,
}

/// Attribute spellings recognized for `rename_all`, mirroring the source
/// schema's vocabulary.
static RENAME_ALL_SPELLINGS: &[(&str, CaseConvention)] = &[
    ("lowercase", CaseConvention::Lower),
    ("UPPERCASE", CaseConvention::Upper),
    ("camelCase", CaseConvention::Camel),
    ("PascalCase", CaseConvention::Pascal),
    ("snake_case", CaseConvention::Snake),
    ("SCREAMING_SNAKE_CASE", CaseConvention::ScreamingSnake),
    ("kebab-case", CaseConvention::Kebab),
];

impl CaseConvention {
    /// Look up an attribute spelling. Unknown spellings yield `None` and the
    /// attribute is ignored by the caller.
    pub fn from_attribute(spelling: &str) -> Option<Self> {
        RENAME_ALL_SPELLINGS
            .iter()
            .find(|(name, _)| *name == spelling)
            .map(|(_, convention)| *convention)
    }

    /// Apply the transform to an identifier.
    pub fn apply(&self, ident: &str) -> String {
        let case = match self {
            CaseConvention::AsIs => return ident.to_string(),
            CaseConvention::Lower => Case::Lower,
            CaseConvention::Upper => Case::Upper,
            CaseConvention::Camel => Case::Camel,
            CaseConvention::Pascal => Case::Pascal,
            CaseConvention::Snake => Case::Snake,
            CaseConvention::ScreamingSnake => Case::ScreamingSnake,
            CaseConvention::Kebab => Case::Kebab,
        };
        ident.to_case(case)
    }
}

/// Compute the emitted name for a field or variant.
///
/// Precedence: explicit rename, then the innermost convention the caller
/// resolved (field-level over type-level over default).
pub fn resolve_name(name: &str, rename: Option<&str>, convention: CaseConvention) -> String {
    match rename {
        Some(explicit) => explicit.to_string(),
        None => convention.apply(name),
    }
}

/// Render an identifier as a property key, quoting it only when the target's
/// declaration syntax requires it. Keywords are legal property names and pass
/// through unquoted.
pub fn property_key(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape_string(name))
    }
}

pub(crate) fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_alphabetic() && first != '_' && first != '$' {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

pub(crate) fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
