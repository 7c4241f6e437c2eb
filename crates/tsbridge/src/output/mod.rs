//! Output backends.
//!
//! Each backend takes an IR [`Schema`](crate::ir::Schema) and renders
//! declarations as source text for one target surface.

pub mod typescript;

pub use typescript::{Generated, TypeScriptOptions, generate_typescript_types};
