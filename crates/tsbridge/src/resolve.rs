//! Reference resolution: symbol table, arity checks, and the shape rules
//! behind flattening and internal tagging.
//!
//! The table is built once per run and read-only afterwards; declarations are
//! otherwise independent of each other.

use std::collections::HashMap;

use crate::error::ResolveError;
use crate::ir::{DeclKind, Declaration, Schema, TypeRef, VariantKind};

/// Read-only name → declaration lookup for one translation run.
pub struct SymbolTable<'a> {
    map: HashMap<&'a str, &'a Declaration>,
}

impl<'a> SymbolTable<'a> {
    /// Build the table. With duplicate names the later declaration shadows
    /// the earlier one, matching source shadowing.
    pub fn build(schema: &'a Schema) -> Self {
        let mut map = HashMap::new();
        for decl in &schema.declarations {
            map.insert(decl.name.as_str(), decl);
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&'a Declaration> {
        self.map.get(name).copied()
    }

    /// Validate a named reference against in-scope generic parameters and the
    /// table: unknown names, constants in type position, and generic-argument
    /// arity all fail here.
    pub fn check_named(
        &self,
        name: &str,
        args: &[TypeRef],
        generics_in_scope: &[String],
    ) -> Result<(), ResolveError> {
        if generics_in_scope.iter().any(|p| p == name) {
            if args.is_empty() {
                return Ok(());
            }
            return Err(ResolveError::GenericArityMismatch {
                name: name.to_string(),
                expected: 0,
                found: args.len(),
            });
        }

        let decl = self
            .get(name)
            .ok_or_else(|| ResolveError::UnresolvedReference(name.to_string()))?;

        let expected = match &decl.kind {
            DeclKind::Struct(s) => s.generics.len(),
            DeclKind::Enum(e) => e.generics.len(),
            DeclKind::Alias(a) => a.generics.len(),
            DeclKind::Const(_) => {
                return Err(ResolveError::UnsupportedType(format!(
                    "`{name}` is a constant and cannot be used as a type"
                )));
            }
        };

        if expected != args.len() {
            return Err(ResolveError::GenericArityMismatch {
                name: name.to_string(),
                expected,
                found: args.len(),
            });
        }

        Ok(())
    }

    /// Whether a flattened field of this type may merge into its parent:
    /// a struct declaration, a data-carrying enum (tagged union), or an alias
    /// chain ending in one. Generic parameters are assumed mergeable.
    pub fn check_flatten_target(
        &self,
        field_name: &str,
        ty: &TypeRef,
        generics_in_scope: &[String],
    ) -> Result<(), ResolveError> {
        let TypeRef::Named { name, .. } = ty else {
            return Err(ResolveError::FlattenTargetNotStruct(field_name.to_string()));
        };
        if generics_in_scope.iter().any(|p| p == name) {
            return Ok(());
        }
        match self.shape_of(name) {
            Shape::Struct | Shape::DataEnum => Ok(()),
            Shape::Unknown => Err(ResolveError::UnresolvedReference(name.clone())),
            _ => Err(ResolveError::FlattenTargetNotStruct(field_name.to_string())),
        }
    }

    /// Whether a newtype payload may absorb an internal tag: only object
    /// shapes (structs, or alias chains ending in one) qualify. Generic
    /// parameters are assumed mergeable.
    pub fn check_internal_merge(
        &self,
        variant_name: &str,
        payload: &TypeRef,
        generics_in_scope: &[String],
    ) -> Result<(), ResolveError> {
        let TypeRef::Named { name, .. } = payload else {
            return Err(ResolveError::InternalTagOnNonMergeableVariant(
                variant_name.to_string(),
            ));
        };
        if generics_in_scope.iter().any(|p| p == name) {
            return Ok(());
        }
        match self.shape_of(name) {
            Shape::Struct => Ok(()),
            Shape::Unknown => Err(ResolveError::UnresolvedReference(name.clone())),
            _ => Err(ResolveError::InternalTagOnNonMergeableVariant(
                variant_name.to_string(),
            )),
        }
    }

    /// Classify what a name ultimately refers to, following alias chains with
    /// a visited set so reference cycles terminate.
    fn shape_of(&self, name: &str) -> Shape {
        let mut visited: Vec<&str> = Vec::new();
        let mut current = name;
        loop {
            if visited.contains(&current) {
                return Shape::Opaque;
            }
            visited.push(current);
            let Some(decl) = self.get(current) else {
                return Shape::Unknown;
            };
            match &decl.kind {
                DeclKind::Struct(_) => return Shape::Struct,
                DeclKind::Enum(e) => {
                    let has_data = e
                        .variants
                        .iter()
                        .any(|v| !matches!(v.kind, VariantKind::Unit));
                    return if has_data { Shape::DataEnum } else { Shape::UnitEnum };
                }
                DeclKind::Const(_) => return Shape::Const,
                DeclKind::Alias(a) => match &a.target {
                    TypeRef::Named { name, .. } => current = name.as_str(),
                    _ => return Shape::Opaque,
                },
            }
        }
    }
}

enum Shape {
    Struct,
    DataEnum,
    UnitEnum,
    Const,
    /// Alias chain ended in a non-named type (tuple, primitive, ...).
    Opaque,
    Unknown,
}

/// The enum generic parameters a set of types actually mentions, in the
/// enum's declaration order. Per-variant helper types declare only these.
pub fn used_generics(params: &[String], types: &[&TypeRef]) -> Vec<String> {
    let mut used = vec![false; params.len()];
    for ty in types {
        mark_used(ty, params, &mut used);
    }
    params
        .iter()
        .zip(used)
        .filter_map(|(param, hit)| hit.then(|| param.clone()))
        .collect()
}

fn mark_used(ty: &TypeRef, params: &[String], used: &mut [bool]) {
    match ty {
        TypeRef::Primitive(_) | TypeRef::Unrepresentable(_) => {}
        TypeRef::Array(inner) | TypeRef::Optional(inner) => mark_used(inner, params, used),
        TypeRef::Tuple(elems) | TypeRef::Intersection(elems) => {
            for elem in elems {
                mark_used(elem, params, used);
            }
        }
        TypeRef::Map(key, value) => {
            mark_used(key, params, used);
            mark_used(value, params, used);
        }
        TypeRef::Named { name, args } => {
            if let Some(i) = params.iter().position(|p| p == name) {
                used[i] = true;
            }
            for arg in args {
                mark_used(arg, params, used);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Declaration, Field, Literal, TypeRef, Variant};

    fn sample_schema() -> Schema {
        let mut schema = Schema::new();
        schema.add(Declaration::structure(
            "Chapter",
            vec![
                Field::required("title", TypeRef::STRING),
                Field::required("pages", TypeRef::INTEGER),
            ],
        ));
        schema.add(
            Declaration::structure(
                "Paginated",
                vec![Field::required(
                    "data",
                    TypeRef::array(TypeRef::named("T")),
                )],
            )
            .with_generics(&["T"]),
        );
        schema.add(Declaration::enumeration(
            "Animal",
            vec![Variant::unit("Dog"), Variant::unit("Cat")],
        ));
        schema.add(Declaration::enumeration(
            "Action",
            vec![Variant::newtype("Get", TypeRef::named("Chapter"))],
        ));
        schema.add(Declaration::alias("Book", TypeRef::named("Chapter")));
        schema.add(Declaration::alias(
            "Pair",
            TypeRef::Tuple(vec![TypeRef::INTEGER, TypeRef::STRING]),
        ));
        schema.add(Declaration::constant(
            "MAX",
            Literal::Number("10".into()),
        ));
        schema
    }

    #[test]
    fn named_references_resolve() {
        let schema = sample_schema();
        let symbols = SymbolTable::build(&schema);

        assert!(symbols.check_named("Chapter", &[], &[]).is_ok());
        assert!(symbols
            .check_named("Paginated", &[TypeRef::named("Chapter")], &[])
            .is_ok());
        assert!(symbols.check_named("T", &[], &["T".into()]).is_ok());

        assert_eq!(
            symbols.check_named("Missing", &[], &[]),
            Err(ResolveError::UnresolvedReference("Missing".into()))
        );
        assert_eq!(
            symbols.check_named("Paginated", &[], &[]),
            Err(ResolveError::GenericArityMismatch {
                name: "Paginated".into(),
                expected: 1,
                found: 0,
            })
        );
        assert!(matches!(
            symbols.check_named("MAX", &[], &[]),
            Err(ResolveError::UnsupportedType(_))
        ));
    }

    #[test]
    fn flatten_targets_must_be_struct_shaped() {
        let schema = sample_schema();
        let symbols = SymbolTable::build(&schema);

        // Structs, data enums, aliases to structs, and generic parameters.
        assert!(symbols
            .check_flatten_target("f", &TypeRef::named("Chapter"), &[])
            .is_ok());
        assert!(symbols
            .check_flatten_target("f", &TypeRef::named("Action"), &[])
            .is_ok());
        assert!(symbols
            .check_flatten_target("f", &TypeRef::named("Book"), &[])
            .is_ok());
        assert!(symbols
            .check_flatten_target("f", &TypeRef::named("T"), &["T".into()])
            .is_ok());

        // Unit enums, tuple aliases, and non-named types are not.
        assert_eq!(
            symbols.check_flatten_target("f", &TypeRef::named("Animal"), &[]),
            Err(ResolveError::FlattenTargetNotStruct("f".into()))
        );
        assert_eq!(
            symbols.check_flatten_target("f", &TypeRef::named("Pair"), &[]),
            Err(ResolveError::FlattenTargetNotStruct("f".into()))
        );
        assert_eq!(
            symbols.check_flatten_target("f", &TypeRef::array(TypeRef::named("T")), &["T".into()]),
            Err(ResolveError::FlattenTargetNotStruct("f".into()))
        );
    }

    #[test]
    fn internal_merge_rejects_non_objects() {
        let schema = sample_schema();
        let symbols = SymbolTable::build(&schema);

        assert!(symbols
            .check_internal_merge("V", &TypeRef::named("Chapter"), &[])
            .is_ok());
        assert!(symbols
            .check_internal_merge("V", &TypeRef::named("Book"), &[])
            .is_ok());
        assert_eq!(
            symbols.check_internal_merge("V", &TypeRef::named("Animal"), &[]),
            Err(ResolveError::InternalTagOnNonMergeableVariant("V".into()))
        );
        assert_eq!(
            symbols.check_internal_merge("V", &TypeRef::STRING, &[]),
            Err(ResolveError::InternalTagOnNonMergeableVariant("V".into()))
        );
    }

    #[test]
    fn alias_cycles_terminate() {
        let mut schema = Schema::new();
        schema.add(Declaration::alias("A", TypeRef::named("B")));
        schema.add(Declaration::alias("B", TypeRef::named("A")));
        let symbols = SymbolTable::build(&schema);

        assert_eq!(
            symbols.check_flatten_target("f", &TypeRef::named("A"), &[]),
            Err(ResolveError::FlattenTargetNotStruct("f".into()))
        );
    }

    #[test]
    fn generic_usage_is_positional_and_deduplicated() {
        let params: Vec<String> = vec!["T".into(), "U".into()];
        let payload = TypeRef::generic("Request", vec![TypeRef::named("T")]);
        assert_eq!(used_generics(&params, &[&payload]), vec!["T".to_string()]);

        let both = TypeRef::Tuple(vec![
            TypeRef::named("U"),
            TypeRef::array(TypeRef::named("T")),
            TypeRef::named("U"),
        ]);
        assert_eq!(
            used_generics(&params, &[&both]),
            vec!["T".to_string(), "U".to_string()]
        );

        assert!(used_generics(&params, &[&TypeRef::STRING]).is_empty());
    }
}
