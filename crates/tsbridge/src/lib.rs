//! Translate Rust type schemas into TypeScript declarations.
//!
//! `tsbridge` takes a language-neutral IR of type declarations — structs,
//! enums, aliases, constants — and renders equivalent TypeScript, preserving
//! documentation and the full set of enum wire representations (internal,
//! external, adjacent, untagged).
//!
//! # Architecture
//!
//! ```text
//! Source schema          IR                Passes                  Output
//! ─────────────     ─────────────     ─────────────────     ────────────────
//! parser (external) ─> Schema ───────> tagging resolution ─┐
//!                      (ir.rs)         case resolution     ├─> TypeScript
//!                                      flatten resolution  │   declarations
//!                                      type mapping       ─┘
//! ```
//!
//! The core is a pure, synchronous transform: declarations are independent of
//! each other except through a read-only symbol table built once per run, and
//! a resolution error aborts only the declaration it occurs in.
//!
//! # Example
//!
//! ```
//! use tsbridge::ir::{Declaration, Field, Schema, TypeRef};
//! use tsbridge::output::{TypeScriptOptions, generate_typescript_types};
//!
//! let mut schema = Schema::new();
//! schema.add(Declaration::structure(
//!     "Chapter",
//!     vec![
//!         Field::required("title", TypeRef::STRING),
//!         Field::required("pages", TypeRef::INTEGER),
//!     ],
//! ));
//!
//! let generated = generate_typescript_types(&schema, &TypeScriptOptions::default());
//! assert!(generated.text.contains("export interface Chapter"));
//! assert!(generated.failures.is_empty());
//! ```

pub mod attr;
pub mod case;
pub mod error;
pub mod ir;
pub mod output;
pub mod resolve;

// Re-export commonly used items
pub use attr::{Attr, TaggingStrategy, resolve_tagging};
pub use case::CaseConvention;
pub use error::{Failure, ResolveError, Warning};
pub use ir::{Declaration, Field, Schema, TypeRef, Variant};
pub use output::{Generated, TypeScriptOptions, generate_typescript_types};
