//! Declaration-level representation attributes and their resolution.
//!
//! The parser surfaces recognized attributes verbatim, in source order,
//! duplicates and conflicts included. Resolution is a pure fold over that
//! list: for each concern the last matching attribute wins, so repeated or
//! overridden attributes resolve to the final one.

use serde::{Deserialize, Serialize};

use crate::case::CaseConvention;

/// A recognized representation attribute attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attr {
    /// `tag = internal(key)` — the discriminant lives inside the variant object.
    Internal { tag: String },
    /// `tag = external` — the variant object nests under its tag key.
    External,
    /// `tag = adjacent(tag_key, content_key)` — discriminant and payload side
    /// by side.
    Adjacent { tag: String, content: String },
    /// `tag = untagged` — no discriminant at all.
    Untagged,
    /// `rename_all = <convention>` — naming convention for fields/variants.
    RenameAll(CaseConvention),
}

/// The resolved wire encoding for a sum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaggingStrategy {
    Internal { tag: String },
    External,
    Adjacent { tag: String, content: String },
    Untagged,
}

/// Fold the attribute list into exactly one tagging strategy.
///
/// The last attribute matching a tagging form wins; with none present the
/// default is external tagging.
pub fn resolve_tagging(attrs: &[Attr]) -> TaggingStrategy {
    attrs
        .iter()
        .fold(TaggingStrategy::External, |current, attr| match attr {
            Attr::Internal { tag } => TaggingStrategy::Internal { tag: tag.clone() },
            Attr::External => TaggingStrategy::External,
            Attr::Adjacent { tag, content } => TaggingStrategy::Adjacent {
                tag: tag.clone(),
                content: content.clone(),
            },
            Attr::Untagged => TaggingStrategy::Untagged,
            Attr::RenameAll(_) => current,
        })
}

/// Fold the attribute list into the type-level naming convention, if any.
/// As with tagging, the last `rename_all` wins.
pub fn resolve_rename_all(attrs: &[Attr]) -> Option<CaseConvention> {
    attrs.iter().fold(None, |current, attr| match attr {
        Attr::RenameAll(convention) => Some(*convention),
        _ => current,
    })
}
