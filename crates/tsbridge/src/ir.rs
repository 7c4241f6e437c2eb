//! Intermediate representation for type declarations.
//!
//! The source-language parser normalizes everything to this IR before it is
//! handed to an output backend. Declarations are plain data: they carry the
//! raw representation attributes found on them (in source order, duplicates
//! included) and are interpreted by the resolution passes at generation time.

use serde::{Deserialize, Serialize};

use crate::attr::Attr;
use crate::case::CaseConvention;

/// A complete set of declarations for one translation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// All declarations, in source order.
    pub declarations: Vec<Declaration>,
}

/// A named top-level declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration name as it appears in the schema.
    pub name: String,
    /// Documentation lines, verbatim.
    #[serde(default)]
    pub docs: Vec<String>,
    /// Whether the declaration carries the target's export qualifier.
    #[serde(default = "default_true")]
    pub exported: bool,
    /// Raw representation attributes in source order.
    #[serde(default)]
    pub attrs: Vec<Attr>,
    /// The declaration's shape.
    pub kind: DeclKind,
}

/// The kind of declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeclKind {
    /// A struct with named fields.
    Struct(StructDecl),
    /// A sum type.
    Enum(EnumDecl),
    /// A type alias (e.g. `type UserId = string`).
    Alias(AliasDecl),
    /// A constant with a literal initializer.
    Const(ConstDecl),
}

/// A struct declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructDecl {
    /// Generic parameter names, in declaration order.
    #[serde(default)]
    pub generics: Vec<String>,
    pub fields: Vec<Field>,
}

/// An enum declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumDecl {
    #[serde(default)]
    pub generics: Vec<String>,
    pub variants: Vec<Variant>,
}

/// A type alias declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasDecl {
    #[serde(default)]
    pub generics: Vec<String>,
    pub target: TypeRef,
}

/// A constant declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstDecl {
    pub value: Literal,
}

/// A field in a struct or struct-like enum variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name as it appears in the schema (raw-identifier prefixes
    /// already stripped by the parser).
    pub name: String,
    /// Field type.
    pub ty: TypeRef,
    /// Whether the field is optional at the object level.
    #[serde(default)]
    pub optional: bool,
    /// Whether the field's members merge into the parent shape.
    #[serde(default)]
    pub flatten: bool,
    /// Explicit rename; wins over any convention.
    #[serde(default)]
    pub rename: Option<String>,
    /// Field-level naming convention; overrides the type-level default.
    #[serde(default)]
    pub case: Option<CaseConvention>,
    #[serde(default)]
    pub docs: Vec<String>,
}

/// A variant of an enum declaration.
///
/// The wire tag value is not stored: it is computed at generation time from
/// `rename` (if present) or from `name` under the enum's resolved convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub rename: Option<String>,
    /// Explicit integer discriminant, when the source declares one.
    #[serde(default)]
    pub discriminant: Option<i64>,
    #[serde(default)]
    pub kind: VariantKind,
    #[serde(default)]
    pub docs: Vec<String>,
}

/// The payload shape of a variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum VariantKind {
    /// No payload.
    #[default]
    Unit,
    /// Named fields.
    Struct(Vec<Field>),
    /// Fixed sequence of unnamed payload types.
    Tuple(Vec<TypeRef>),
    /// Exactly one unnamed payload type.
    Newtype(Box<TypeRef>),
}

/// A type reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(Primitive),
    /// Growable sequence of one element type.
    Array(Box<TypeRef>),
    /// A value that may be absent.
    Optional(Box<TypeRef>),
    /// Fixed-length heterogeneous sequence.
    Tuple(Vec<TypeRef>),
    /// Key/value mapping.
    Map(Box<TypeRef>, Box<TypeRef>),
    /// Reference to a declaration or an in-scope generic parameter, with
    /// positional generic arguments.
    Named {
        name: String,
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    /// Conjunction of shapes, rendered with the target's intersection syntax.
    Intersection(Vec<TypeRef>),
    /// Source text with no target equivalent; passes through verbatim and
    /// raises a warning.
    Unrepresentable(String),
}

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Integer,
    Float,
    Boolean,
    Char,
    String,
    DateTime,
}

/// A constant initializer.
///
/// Initializer expressions are never evaluated: numeric and structured bodies
/// keep their source text so `0.0` stays `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Verbatim numeric text.
    Number(String),
    String(String),
    Bool(bool),
    /// Verbatim body of a structured (JSON-like) initializer.
    Json(String),
    /// Verbatim source text with no target equivalent (byte strings etc.).
    Unrepresentable(String),
}

fn default_true() -> bool {
    true
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, decl: Declaration) {
        self.declarations.push(decl);
    }
}

impl Declaration {
    pub fn structure(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            exported: true,
            attrs: Vec::new(),
            kind: DeclKind::Struct(StructDecl {
                generics: Vec::new(),
                fields,
            }),
        }
    }

    pub fn enumeration(name: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            exported: true,
            attrs: Vec::new(),
            kind: DeclKind::Enum(EnumDecl {
                generics: Vec::new(),
                variants,
            }),
        }
    }

    pub fn alias(name: impl Into<String>, target: TypeRef) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            exported: true,
            attrs: Vec::new(),
            kind: DeclKind::Alias(AliasDecl {
                generics: Vec::new(),
                target,
            }),
        }
    }

    pub fn constant(name: impl Into<String>, value: Literal) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            exported: true,
            attrs: Vec::new(),
            kind: DeclKind::Const(ConstDecl { value }),
        }
    }

    pub fn with_docs(mut self, lines: &[&str]) -> Self {
        self.docs = lines.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_attrs(mut self, attrs: Vec<Attr>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_generics(mut self, params: &[&str]) -> Self {
        let params: Vec<String> = params.iter().map(|s| s.to_string()).collect();
        match &mut self.kind {
            DeclKind::Struct(s) => s.generics = params,
            DeclKind::Enum(e) => e.generics = params,
            DeclKind::Alias(a) => a.generics = params,
            DeclKind::Const(_) => {}
        }
        self
    }

    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }
}

impl Field {
    pub fn required(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            flatten: false,
            rename: None,
            case: None,
            docs: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            optional: true,
            ..Self::required(name, ty)
        }
    }

    pub fn flattened(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            flatten: true,
            ..Self::required(name, ty)
        }
    }

    pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    pub fn with_case(mut self, case: CaseConvention) -> Self {
        self.case = Some(case);
        self
    }

    pub fn with_docs(mut self, lines: &[&str]) -> Self {
        self.docs = lines.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl Variant {
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rename: None,
            discriminant: None,
            kind: VariantKind::Unit,
            docs: Vec::new(),
        }
    }

    pub fn structure(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            kind: VariantKind::Struct(fields),
            ..Self::unit(name)
        }
    }

    pub fn tuple(name: impl Into<String>, elems: Vec<TypeRef>) -> Self {
        Self {
            kind: VariantKind::Tuple(elems),
            ..Self::unit(name)
        }
    }

    pub fn newtype(name: impl Into<String>, payload: TypeRef) -> Self {
        Self {
            kind: VariantKind::Newtype(Box::new(payload)),
            ..Self::unit(name)
        }
    }

    pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    pub fn with_discriminant(mut self, value: i64) -> Self {
        self.discriminant = Some(value);
        self
    }

    pub fn with_docs(mut self, lines: &[&str]) -> Self {
        self.docs = lines.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
        }
    }

    pub fn array(elem: TypeRef) -> Self {
        TypeRef::Array(Box::new(elem))
    }

    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::Optional(Box::new(inner))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    pub const STRING: TypeRef = TypeRef::Primitive(Primitive::String);
    pub const INTEGER: TypeRef = TypeRef::Primitive(Primitive::Integer);
    pub const FLOAT: TypeRef = TypeRef::Primitive(Primitive::Float);
    pub const BOOLEAN: TypeRef = TypeRef::Primitive(Primitive::Boolean);
    pub const CHAR: TypeRef = TypeRef::Primitive(Primitive::Char);
    pub const DATE_TIME: TypeRef = TypeRef::Primitive(Primitive::DateTime);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_schema_programmatically() {
        let mut schema = Schema::new();

        schema.add(Declaration::enumeration(
            "Status",
            vec![Variant::unit("Pending"), Variant::unit("Done")],
        ));

        schema.add(Declaration::structure(
            "User",
            vec![
                Field::required("id", TypeRef::STRING),
                Field::required("name", TypeRef::STRING),
                Field::optional("email", TypeRef::STRING),
                Field::required("status", TypeRef::named("Status")),
            ],
        ));

        assert_eq!(schema.declarations.len(), 2);
        match &schema.declarations[1].kind {
            DeclKind::Struct(s) => assert_eq!(s.fields.len(), 4),
            _ => panic!("expected struct"),
        }
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = Schema {
            declarations: vec![
                Declaration::structure(
                    "Point",
                    vec![
                        Field::required("x", TypeRef::FLOAT),
                        Field::required("y", TypeRef::FLOAT),
                    ],
                )
                .with_docs(&["A 2D point."]),
            ],
        };

        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back.declarations.len(), 1);
        assert_eq!(back.declarations[0].name, "Point");
        assert!(back.declarations[0].exported);
    }
}
