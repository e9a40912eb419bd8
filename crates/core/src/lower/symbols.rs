//! Name resolution over a schema's declarations.

use std::collections::BTreeMap;

use serde::Serialize;
use typemux_common::naming::unqualified_name;
use typemux_common::{Declaration, Schema};

use crate::error::GenerateError;

/// Which schema collection a declaration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    /// `Schema::types`.
    Type,
    /// `Schema::enums`.
    Enum,
    /// `Schema::unions`.
    Union,
    /// `Schema::services`.
    Service,
}

/// Index of a declaration inside its schema collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DeclRef {
    /// Collection.
    pub kind: DeclKind,
    /// Position in the collection.
    pub index: usize,
}

impl DeclRef {
    /// The element id of the declaration itself.
    pub const fn element(self) -> ElementId {
        match self.kind {
            DeclKind::Type => ElementId::Type(self.index),
            DeclKind::Enum => ElementId::Enum(self.index),
            DeclKind::Union => ElementId::Union(self.index),
            DeclKind::Service => ElementId::Service(self.index),
        }
    }
}

/// Any element that can carry overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ElementId {
    /// A type, by index.
    Type(usize),
    /// A field, by type and field index.
    Field(usize, usize),
    /// An enum, by index.
    Enum(usize),
    /// An enum value, by enum and value index.
    EnumValue(usize, usize),
    /// A union, by index.
    Union(usize),
    /// A service, by index.
    Service(usize),
    /// A method, by service and method index.
    Method(usize, usize),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SymbolTable {
    by_qualified: BTreeMap<String, Vec<DeclRef>>,
    by_simple: BTreeMap<String, Vec<(String, DeclRef)>>,
}

impl SymbolTable {
    pub(crate) fn build(schema: &Schema) -> Self {
        let mut table = Self::default();
        let default_ns = schema.default_namespace();
        for (index, d) in schema.types.iter().enumerate() {
            table.insert(d, default_ns, DeclRef { kind: DeclKind::Type, index });
        }
        for (index, d) in schema.enums.iter().enumerate() {
            table.insert(d, default_ns, DeclRef { kind: DeclKind::Enum, index });
        }
        for (index, d) in schema.unions.iter().enumerate() {
            table.insert(d, default_ns, DeclRef { kind: DeclKind::Union, index });
        }
        for (index, d) in schema.services.iter().enumerate() {
            table.insert(d, default_ns, DeclRef { kind: DeclKind::Service, index });
        }
        table
    }

    fn insert(&mut self, decl: &dyn Declaration, default_ns: Option<&str>, r: DeclRef) {
        let qualified = decl.qualified_name(default_ns);
        self.by_simple
            .entry(decl.name().to_string())
            .or_default()
            .push((qualified.clone(), r));
        self.by_qualified.entry(qualified).or_default().push(r);
    }

    /// Resolve `name` as seen from namespace `from_ns`.
    ///
    /// An exact qualified match wins, then the same name inside `from_ns`,
    /// then a unique declaration whose qualified name ends with `name`.
    pub(crate) fn resolve(
        &self,
        name: &str,
        from_ns: Option<&str>,
        path: &str,
    ) -> Result<DeclRef, GenerateError> {
        if let Some(found) = Self::unique(self.by_qualified.get(name), name, path)? {
            return Ok(found);
        }
        if let Some(ns) = from_ns {
            let local = format!("{ns}.{name}");
            if let Some(found) = Self::unique(self.by_qualified.get(&local), name, path)? {
                return Ok(found);
            }
        }
        let suffix = format!(".{name}");
        let candidates: Vec<DeclRef> = self
            .by_simple
            .get(unqualified_name(name))
            .into_iter()
            .flatten()
            .filter(|(qualified, _)| qualified == name || qualified.ends_with(&suffix))
            .map(|(_, r)| *r)
            .collect();
        match candidates.as_slice() {
            [single] => Ok(*single),
            [] => Err(GenerateError::precondition(
                path,
                format!("reference '{name}' does not resolve to a declaration"),
            )),
            _ => Err(GenerateError::precondition(
                path,
                format!("reference '{name}' is ambiguous across namespaces"),
            )),
        }
    }

    fn unique(
        refs: Option<&Vec<DeclRef>>,
        name: &str,
        path: &str,
    ) -> Result<Option<DeclRef>, GenerateError> {
        match refs.map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([single]) => Ok(Some(*single)),
            Some(_) => Err(GenerateError::precondition(
                path,
                format!("'{name}' is declared more than once"),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use typemux_common::{EnumDef, EnumValue, TypeDef};

    fn schema() -> Schema {
        Schema::new(Some("com.example"))
            .with_type(TypeDef::new("User", vec![]))
            .with_type(TypeDef::new("User", vec![]).in_namespace("com.other"))
            .with_type(TypeDef::new("Address", vec![]).in_namespace("com.other"))
            .with_enum(EnumDef::new("Status", vec![EnumValue::new("ACTIVE")]))
    }

    #[test]
    fn test_resolve_prefers_exact_then_local() {
        let table = SymbolTable::build(&schema());
        let exact = table.resolve("com.other.User", None, "x").unwrap();
        assert_eq!(exact, DeclRef { kind: DeclKind::Type, index: 1 });

        let local = table.resolve("User", Some("com.example"), "x").unwrap();
        assert_eq!(local, DeclRef { kind: DeclKind::Type, index: 0 });

        let local = table.resolve("User", Some("com.other"), "x").unwrap();
        assert_eq!(local.index, 1);
    }

    #[test]
    fn test_resolve_unique_suffix() {
        let table = SymbolTable::build(&schema());
        let found = table.resolve("Address", Some("com.example"), "x").unwrap();
        assert_eq!(found, DeclRef { kind: DeclKind::Type, index: 2 });
        let found = table.resolve("other.Address", None, "x").unwrap();
        assert_eq!(found.index, 2);
        let status = table.resolve("Status", None, "x").unwrap();
        assert_eq!(status.kind, DeclKind::Enum);
    }

    #[test]
    fn test_resolve_failures_name_the_path() {
        let table = SymbolTable::build(&schema());
        let err = table.resolve("User", None, "Post.author").unwrap_err();
        assert_eq!(err.path(), "Post.author");
        assert!(err.to_string().contains("ambiguous"));

        let err = table.resolve("Missing", Some("com.example"), "Post.x").unwrap_err();
        assert!(err.to_string().contains("does not resolve"));
    }
}
