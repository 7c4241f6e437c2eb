//! TypeScript declaration backend.
//!
//! Maps IR types to TypeScript type expressions and renders one declaration
//! block per input declaration, in input order. The mapping keeps the two
//! optionality encodings apart: an optional *field* becomes `name?: T`, an
//! optional value nested inside a composite becomes `T | undefined`.

use crate::attr::{TaggingStrategy, resolve_rename_all, resolve_tagging};
use crate::case::{self, CaseConvention};
use crate::error::{Failure, ResolveError, Warning};
use crate::ir::{
    AliasDecl, ConstDecl, DeclKind, Declaration, EnumDecl, Field, Literal, Primitive, Schema,
    StructDecl, TypeRef, Variant, VariantKind,
};
use crate::resolve::{SymbolTable, used_generics};

/// First line of every generated file.
pub const DEFAULT_HEADER: &str = "/* Generated file. Do not edit manually. */";

/// Options for TypeScript generation. Threaded explicitly into every
/// generation call; there is no ambient configuration.
#[derive(Debug, Clone)]
pub struct TypeScriptOptions {
    /// Header line prepended to the generated file.
    pub header: String,
    /// Convention for field names and variant tag values with no attribute.
    pub default_case: CaseConvention,
    /// Convention for variants of integer-discriminant enums with no
    /// attribute.
    pub int_variant_case: CaseConvention,
}

impl Default for TypeScriptOptions {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            default_case: CaseConvention::AsIs,
            int_variant_case: CaseConvention::ScreamingSnake,
        }
    }
}

/// The result of one generation run.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    /// The full generated file.
    pub text: String,
    /// Declarations that failed to resolve; they contribute no output block.
    pub failures: Vec<Failure>,
    /// Best-effort pass-throughs worth surfacing to the caller.
    pub warnings: Vec<Warning>,
}

/// Generate TypeScript declarations for a schema.
///
/// Declarations are independent: a resolution error aborts only the
/// declaration it occurs in, and its warnings are dropped with it.
pub fn generate_typescript_types(schema: &Schema, options: &TypeScriptOptions) -> Generated {
    let symbols = SymbolTable::build(schema);
    let mut blocks: Vec<String> = Vec::new();
    let mut failures = Vec::new();
    let mut warnings = Vec::new();

    for decl in &schema.declarations {
        let mut emitter = Emitter::new(decl, &symbols, options);
        match emitter.emit() {
            Ok(block) => {
                blocks.push(block);
                warnings.append(&mut emitter.warnings);
            }
            Err(error) => failures.push(Failure {
                declaration: decl.name.clone(),
                error,
            }),
        }
    }

    let mut text = options.header.clone();
    text.push('\n');
    if !blocks.is_empty() {
        text.push('\n');
        text.push_str(&blocks.join("\n\n"));
        text.push('\n');
    }

    Generated {
        text,
        failures,
        warnings,
    }
}

/// A mapped type expression plus the field-level optionality marker.
struct TsType {
    text: String,
    optional: bool,
}

impl TsType {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            optional: false,
        }
    }

    /// The expression to use when the type is embedded inside a composite,
    /// where optionality has to become part of the type itself.
    fn embed(self) -> String {
        if self.optional {
            format!("{} | undefined", self.text)
        } else {
            self.text
        }
    }
}

/// Renders a single declaration. One emitter per declaration, so warnings
/// from a failed declaration never leak into the run.
struct Emitter<'a> {
    decl: &'a Declaration,
    symbols: &'a SymbolTable<'a>,
    options: &'a TypeScriptOptions,
    /// Generic parameters in scope for the declaration.
    generics: Vec<String>,
    warnings: Vec<Warning>,
}

impl<'a> Emitter<'a> {
    fn new(decl: &'a Declaration, symbols: &'a SymbolTable<'a>, options: &'a TypeScriptOptions) -> Self {
        let generics = match &decl.kind {
            DeclKind::Struct(s) => s.generics.clone(),
            DeclKind::Enum(e) => e.generics.clone(),
            DeclKind::Alias(a) => a.generics.clone(),
            DeclKind::Const(_) => Vec::new(),
        };
        Self {
            decl,
            symbols,
            options,
            generics,
            warnings: Vec::new(),
        }
    }

    fn emit(&mut self) -> Result<String, ResolveError> {
        let block = match &self.decl.kind {
            DeclKind::Struct(s) => self.emit_struct(s)?,
            DeclKind::Enum(e) => self.emit_enum(e)?,
            DeclKind::Alias(a) => self.emit_alias(a)?,
            DeclKind::Const(c) => self.emit_const(c),
        };
        Ok(format!("{}{}", docs_block(&self.decl.docs, ""), block))
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(Warning {
            declaration: self.decl.name.clone(),
            message,
        });
    }

    fn export(&self) -> &'static str {
        if self.decl.exported { "export " } else { "" }
    }

    // --- types ---

    fn map_type(&mut self, ty: &TypeRef) -> Result<TsType, ResolveError> {
        Ok(match ty {
            TypeRef::Primitive(p) => TsType::plain(match p {
                Primitive::Integer | Primitive::Float => "number",
                Primitive::Boolean => "boolean",
                Primitive::Char | Primitive::String => "string",
                Primitive::DateTime => "Date",
            }),
            TypeRef::Array(elem) => {
                let elem = self.map_type(elem)?.embed();
                TsType::plain(format!("Array<{elem}>"))
            }
            TypeRef::Optional(inner) => {
                let inner = self.map_type(inner)?;
                TsType {
                    text: inner.embed(),
                    optional: true,
                }
            }
            TypeRef::Tuple(elems) => {
                let mut parts = Vec::with_capacity(elems.len());
                for elem in elems {
                    parts.push(self.map_type(elem)?.embed());
                }
                TsType::plain(format!("[{}]", parts.join(", ")))
            }
            TypeRef::Map(key, value) => {
                let key = self.map_type(key)?.embed();
                let value = self.map_type(value)?.embed();
                TsType::plain(format!("Record<{key}, {value}>"))
            }
            TypeRef::Named { name, args } => {
                self.symbols.check_named(name, args, &self.generics)?;
                if args.is_empty() {
                    TsType::plain(name.clone())
                } else {
                    let mut parts = Vec::with_capacity(args.len());
                    for arg in args {
                        parts.push(self.map_type(arg)?.embed());
                    }
                    TsType::plain(format!("{name}<{}>", parts.join(", ")))
                }
            }
            TypeRef::Intersection(parts) => {
                let mut mapped = Vec::with_capacity(parts.len());
                for part in parts {
                    mapped.push(self.map_type(part)?.embed());
                }
                TsType::plain(mapped.join(" & "))
            }
            TypeRef::Unrepresentable(text) => {
                self.warn(format!(
                    "no TypeScript equivalent for `{text}`; passed through verbatim"
                ));
                TsType::plain(text.clone())
            }
        })
    }

    // --- fields ---

    /// One `name?: T;` line per field, docs above, at the given indentation.
    fn render_fields(
        &mut self,
        fields: &[Field],
        type_case: Option<CaseConvention>,
        pad: &str,
    ) -> Result<String, ResolveError> {
        let mut out = String::new();
        for field in fields {
            let convention = field
                .case
                .or(type_case)
                .unwrap_or(self.options.default_case);
            let name = case::resolve_name(&field.name, field.rename.as_deref(), convention);
            let key = case::property_key(&name);
            let ty = self.map_type(&field.ty)?;
            let marker = if field.optional || ty.optional { "?" } else { "" };
            out.push_str(&docs_block(&field.docs, pad));
            out.push_str(&format!("{pad}{key}{marker}: {};\n", ty.text));
        }
        Ok(out)
    }

    // --- declarations ---

    fn emit_struct(&mut self, s: &StructDecl) -> Result<String, ResolveError> {
        let type_case = resolve_rename_all(&self.decl.attrs);
        let export = self.export();
        let name = &self.decl.name;
        let generics = render_generics(&s.generics);

        let has_flatten = s.fields.iter().any(|f| f.flatten);
        if !has_flatten {
            let fields = self.render_fields(&s.fields, type_case, "  ")?;
            if fields.is_empty() {
                return Ok(format!("{export}interface {name}{generics} {{}}"));
            }
            return Ok(format!("{export}interface {name}{generics} {{\n{fields}}}"));
        }

        // Flattened fields merge into the parent shape: the declaration
        // becomes an intersection of the flattened types (in field order)
        // and the remaining plain fields.
        let mut parts = Vec::new();
        for field in s.fields.iter().filter(|f| f.flatten) {
            self.symbols
                .check_flatten_target(&field.name, &field.ty, &self.generics)?;
            parts.push(self.map_type(&field.ty)?.embed());
        }
        let plain: Vec<Field> = s.fields.iter().filter(|f| !f.flatten).cloned().collect();
        if plain.is_empty() {
            return Ok(format!(
                "{export}type {name}{generics} = {};",
                parts.join(" & ")
            ));
        }
        let fields = self.render_fields(&plain, type_case, "  ")?;
        Ok(format!(
            "{export}type {name}{generics} = {} & {{\n{fields}}};",
            parts.join(" & ")
        ))
    }

    fn emit_alias(&mut self, a: &AliasDecl) -> Result<String, ResolveError> {
        let target = self.map_type(&a.target)?.embed();
        Ok(format!(
            "{}type {}{} = {target};",
            self.export(),
            self.decl.name,
            render_generics(&a.generics)
        ))
    }

    fn emit_const(&mut self, c: &ConstDecl) -> String {
        let body = match &c.value {
            Literal::Number(text) | Literal::Json(text) => text.clone(),
            Literal::String(s) => format!("\"{}\"", case::escape_string(s)),
            Literal::Bool(b) => b.to_string(),
            Literal::Unrepresentable(text) => {
                self.warn(format!(
                    "no TypeScript equivalent for `{text}`; passed through verbatim"
                ));
                text.clone()
            }
        };
        format!("{}const {} = {body};", self.export(), self.decl.name)
    }

    fn emit_enum(&mut self, e: &EnumDecl) -> Result<String, ResolveError> {
        let strategy = resolve_tagging(&self.decl.attrs);
        let type_case = resolve_rename_all(&self.decl.attrs);

        let pure_unit = e
            .variants
            .iter()
            .all(|v| matches!(v.kind, VariantKind::Unit));

        // Integer-discriminant enums default their tag values to screaming
        // snake case; everything else keeps the identifier as written.
        let int_enum = pure_unit && e.variants.iter().any(|v| v.discriminant.is_some());
        let variant_case = type_case.unwrap_or(if int_enum {
            self.options.int_variant_case
        } else {
            self.options.default_case
        });

        // Tagging is only observable once a variant carries data: unit-only
        // enums collapse to a union of string literals under any strategy.
        if pure_unit {
            return Ok(self.emit_unit_union(e, variant_case));
        }

        match strategy {
            TaggingStrategy::Internal { tag } => {
                self.emit_variant_types(e, &tag, None, variant_case)
            }
            TaggingStrategy::Adjacent { tag, content } => {
                self.emit_variant_types(e, &tag, Some(&content), variant_case)
            }
            TaggingStrategy::External => self.emit_external(e, variant_case),
            TaggingStrategy::Untagged => self.emit_untagged(e),
        }
    }

    fn emit_unit_union(&mut self, e: &EnumDecl, variant_case: CaseConvention) -> String {
        let name = &self.decl.name;
        let export = self.export();
        if e.variants.is_empty() {
            return format!("{export}type {name} = never;");
        }
        let literals: Vec<String> = e
            .variants
            .iter()
            .map(|v| format!("\"{}\"", case::escape_string(&self.tag_value(v, variant_case))))
            .collect();
        format!("{export}type {name} = {};", literals.join(" | "))
    }

    fn tag_value(&self, variant: &Variant, variant_case: CaseConvention) -> String {
        case::resolve_name(&variant.name, variant.rename.as_deref(), variant_case)
    }

    /// Internal and adjacent tagging share one layout: the enum is a union of
    /// per-variant type names, each declared right below with the tag field
    /// (and, for adjacent tagging, the content field) inside.
    fn emit_variant_types(
        &mut self,
        e: &EnumDecl,
        tag_key: &str,
        content_key: Option<&str>,
        variant_case: CaseConvention,
    ) -> Result<String, ResolveError> {
        // Validate the whole enum before rendering anything.
        if content_key.is_none() {
            for v in &e.variants {
                match &v.kind {
                    VariantKind::Tuple(_) => {
                        return Err(ResolveError::InternalTagOnNonMergeableVariant(
                            v.name.clone(),
                        ));
                    }
                    VariantKind::Newtype(payload) => {
                        self.symbols
                            .check_internal_merge(&v.name, payload, &self.generics)?;
                    }
                    _ => {}
                }
            }
        }

        let name = self.decl.name.clone();
        let tag_prop = case::property_key(tag_key);
        let content_prop = content_key.map(case::property_key);

        let mut members = Vec::with_capacity(e.variants.len());
        let mut helpers = String::new();
        for v in &e.variants {
            let used = used_generics(&e.generics, &variant_payload_types(v));
            let generics = render_generics(&used);
            let helper = format!("{name}__{}", v.name);
            members.push(format!("  | {helper}{generics}"));

            let tag_value = case::escape_string(&self.tag_value(v, variant_case));
            let tag_line = format!("  {tag_prop}: \"{tag_value}\";\n");

            helpers.push_str(&docs_block(&v.docs, ""));
            match (&v.kind, &content_prop) {
                (VariantKind::Unit, None) => {
                    helpers.push_str(&format!("type {helper} = {{\n{tag_line}}};\n"));
                }
                (VariantKind::Unit, Some(content)) => {
                    helpers.push_str(&format!(
                        "type {helper} = {{\n{tag_line}  {content}: {{}};\n}};\n"
                    ));
                }
                (VariantKind::Struct(fields), None) => {
                    let fields = self.render_fields(fields, Some(variant_case), "  ")?;
                    helpers.push_str(&format!(
                        "type {helper}{generics} = {{\n{tag_line}{fields}}};\n"
                    ));
                }
                (VariantKind::Struct(fields), Some(content)) => {
                    let fields = self.render_fields(fields, Some(variant_case), "    ")?;
                    helpers.push_str(&format!(
                        "type {helper}{generics} = {{\n{tag_line}  {content}: {{\n{fields}  }};\n}};\n"
                    ));
                }
                (VariantKind::Newtype(payload), None) => {
                    let payload = self.map_type(payload)?.embed();
                    helpers.push_str(&format!(
                        "type {helper}{generics} = {{ {tag_prop}: \"{tag_value}\" }} & {payload};\n"
                    ));
                }
                (VariantKind::Newtype(payload), Some(content)) => {
                    let payload = self.map_type(payload)?.embed();
                    helpers.push_str(&format!(
                        "type {helper}{generics} = {{\n{tag_line}  {content}: {payload};\n}};\n"
                    ));
                }
                (VariantKind::Tuple(elems), Some(content)) => {
                    let mut parts = Vec::with_capacity(elems.len());
                    for elem in elems {
                        parts.push(self.map_type(elem)?.embed());
                    }
                    helpers.push_str(&format!(
                        "type {helper}{generics} = {{\n{tag_line}  {content}: [{}];\n}};\n",
                        parts.join(", ")
                    ));
                }
                (VariantKind::Tuple(_), None) => unreachable!("rejected above"),
            }
        }

        Ok(format!(
            "{}type {name}{} =\n{};\n\n{}",
            self.export(),
            render_generics(&e.generics),
            members.join("\n"),
            helpers.trim_end()
        ))
    }

    fn emit_external(
        &mut self,
        e: &EnumDecl,
        variant_case: CaseConvention,
    ) -> Result<String, ResolveError> {
        let mut members = Vec::with_capacity(e.variants.len());
        for v in &e.variants {
            let key = case::property_key(&self.tag_value(v, variant_case));
            let mut member = docs_block(&v.docs, "  ");
            match &v.kind {
                VariantKind::Unit => {
                    member.push_str(&format!("  | {{\n      {key}: {{}}\n    }}"));
                }
                VariantKind::Struct(fields) => {
                    let fields = self.render_fields(fields, Some(variant_case), "        ")?;
                    member.push_str(&format!(
                        "  | {{\n      {key}: {{\n{fields}      }}\n    }}"
                    ));
                }
                VariantKind::Newtype(payload) => {
                    let payload = self.map_type(payload)?.embed();
                    member.push_str(&format!("  | {{ {key}: {payload} }}"));
                }
                VariantKind::Tuple(elems) => {
                    let mut parts = Vec::with_capacity(elems.len());
                    for elem in elems {
                        parts.push(self.map_type(elem)?.embed());
                    }
                    member.push_str(&format!("  | {{ {key}: [{}] }}", parts.join(", ")));
                }
            }
            members.push(member);
        }

        Ok(format!(
            "{}type {}{} =\n{};",
            self.export(),
            self.decl.name,
            render_generics(&e.generics),
            members.join("\n")
        ))
    }

    fn emit_untagged(&mut self, e: &EnumDecl) -> Result<String, ResolveError> {
        let mut members = Vec::with_capacity(e.variants.len());
        for v in &e.variants {
            let mut member = docs_block(&v.docs, "  ");
            match &v.kind {
                VariantKind::Unit => member.push_str("  | null"),
                VariantKind::Newtype(payload) => {
                    let payload = self.map_type(payload)?.embed();
                    member.push_str(&format!("  | {payload}"));
                }
                VariantKind::Tuple(elems) => {
                    let mut parts = Vec::with_capacity(elems.len());
                    for elem in elems {
                        parts.push(self.map_type(elem)?.embed());
                    }
                    member.push_str(&format!("  | [{}]", parts.join(", ")));
                }
                VariantKind::Struct(fields) => {
                    let fields = self.render_fields(fields, None, "      ")?;
                    member.push_str(&format!("  | {{\n{fields}    }}"));
                }
            }
            members.push(member);
        }

        Ok(format!(
            "{}type {}{} =\n{};",
            self.export(),
            self.decl.name,
            render_generics(&e.generics),
            members.join("\n")
        ))
    }
}

fn variant_payload_types(variant: &Variant) -> Vec<&TypeRef> {
    match &variant.kind {
        VariantKind::Unit => Vec::new(),
        VariantKind::Struct(fields) => fields.iter().map(|f| &f.ty).collect(),
        VariantKind::Tuple(elems) => elems.iter().collect(),
        VariantKind::Newtype(payload) => vec![payload.as_ref()],
    }
}

fn render_generics(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

/// Documentation lines as a block comment at the given indentation. One line
/// renders inline, several render the starred form; lines stay verbatim.
fn docs_block(docs: &[String], pad: &str) -> String {
    match docs.len() {
        0 => String::new(),
        1 => format!("{pad}/** {} */\n", docs[0]),
        _ => {
            let mut out = format!("{pad}/**\n");
            for line in docs {
                out.push_str(&format!("{pad} * {line}\n"));
            }
            out.push_str(&format!("{pad} */\n"));
            out
        }
    }
}
