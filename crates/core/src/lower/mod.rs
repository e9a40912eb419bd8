//! Composite-type lowering.
//!
//! One pass over the schema, in declaration order (Types, then their Fields,
//! then nested shapes depth-first, then Services), that:
//! - binds every name-addressed override to its element,
//! - checks every reference resolves,
//! - synthesizes entry types for maps, wrapper types for maps-of-maps, and
//!   request/response types for fields with arguments.
//!
//! Synthesized names depend only on shapes and discovery order. Backends read
//! them from the resulting [`Lowering`] and never invent their own.

mod symbols;
mod synth;

use std::collections::BTreeMap;

use tracing::debug;
use typemux_common::naming::{capitalize_first, unqualified_name};
use typemux_common::{
    Declaration, Field, FieldType, Format, Overrides, Schema, TypeDef, TypeKind,
};

use crate::error::GenerateError;

pub use symbols::{DeclKind, DeclRef, ElementId};
pub use synth::{ArgumentTypes, EntryValue, MapEntry, MapWrapper, Synthesized, scalar_name};

use symbols::SymbolTable;

/// Result of the lowering pass. Read-only once built.
#[derive(Debug)]
pub struct Lowering<'s> {
    schema: &'s Schema,
    symbols: SymbolTable,
    overrides: BTreeMap<ElementId, Overrides>,
    synthesized: Vec<Synthesized>,
    entry_by_signature: BTreeMap<String, usize>,
    wrapper_by_signature: BTreeMap<String, usize>,
    arguments_by_field: BTreeMap<(usize, usize), usize>,
}

/// Run the lowering pass over `schema`.
pub fn lower(schema: &Schema) -> Result<Lowering<'_>, GenerateError> {
    let mut lowerer = Lowerer {
        lowering: Lowering {
            schema,
            symbols: SymbolTable::build(schema),
            overrides: BTreeMap::new(),
            synthesized: Vec::new(),
            entry_by_signature: BTreeMap::new(),
            wrapper_by_signature: BTreeMap::new(),
            arguments_by_field: BTreeMap::new(),
        },
        entry_names: BTreeMap::new(),
        next_wrapper: 0,
    };
    lowerer.bind_overrides()?;
    lowerer.walk_types()?;
    lowerer.check_unions()?;
    lowerer.check_services()?;

    let lowering = lowerer.lowering;
    debug!(
        synthesized = lowering.synthesized.len(),
        bound_overrides = lowering.overrides.len(),
        "lowering complete"
    );
    Ok(lowering)
}

impl<'s> Lowering<'s> {
    /// The schema this lowering was built from.
    pub const fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Everything synthesized, in discovery order.
    pub fn synthesized(&self) -> &[Synthesized] {
        &self.synthesized
    }

    /// Map entry types in discovery order.
    pub fn map_entries(&self) -> impl Iterator<Item = &MapEntry> {
        self.synthesized.iter().filter_map(|s| match s {
            Synthesized::MapEntry(e) => Some(e),
            _ => None,
        })
    }

    /// Map wrapper types ordered by their number.
    pub fn map_wrappers(&self) -> Vec<&MapWrapper> {
        let mut wrappers: Vec<&MapWrapper> = self
            .synthesized
            .iter()
            .filter_map(|s| match s {
                Synthesized::MapWrapper(w) => Some(w),
                _ => None,
            })
            .collect();
        wrappers.sort_by_key(|w| w.number);
        wrappers
    }

    /// Argument request/response pairs in discovery order.
    pub fn argument_types(&self) -> impl Iterator<Item = &ArgumentTypes> {
        self.synthesized.iter().filter_map(|s| match s {
            Synthesized::Arguments(a) => Some(a),
            _ => None,
        })
    }

    /// Request/response pair of the field at `(type_index, field_index)`.
    pub fn arguments_for(&self, type_index: usize, field_index: usize) -> Option<&ArgumentTypes> {
        let idx = self.arguments_by_field.get(&(type_index, field_index))?;
        match self.synthesized.get(*idx)? {
            Synthesized::Arguments(a) => Some(a),
            _ => None,
        }
    }

    /// Entry type synthesized for the map expression `ty`.
    pub fn entry_for(&self, ty: &FieldType, from_ns: Option<&str>) -> Option<&MapEntry> {
        let sig = self.signature(ty, from_ns);
        match self.synthesized.get(*self.entry_by_signature.get(&sig)?)? {
            Synthesized::MapEntry(e) => Some(e),
            _ => None,
        }
    }

    /// Wrapper type synthesized for the map expression `ty` when it sits in a map value.
    pub fn wrapper_for(&self, ty: &FieldType, from_ns: Option<&str>) -> Option<&MapWrapper> {
        let sig = self.signature(ty, from_ns);
        match self.synthesized.get(*self.wrapper_by_signature.get(&sig)?)? {
            Synthesized::MapWrapper(w) => Some(w),
            _ => None,
        }
    }

    /// Entry type for a map expression, or a precondition failure naming `path`.
    pub fn require_entry(
        &self,
        ty: &FieldType,
        from_ns: Option<&str>,
        path: &str,
    ) -> Result<&MapEntry, GenerateError> {
        self.entry_for(ty, from_ns).ok_or_else(|| {
            GenerateError::precondition(path, "map shape was not lowered to an entry type")
        })
    }

    /// Resolve a type reference written inside namespace `from_ns`.
    pub fn resolve(
        &self,
        name: &str,
        from_ns: Option<&str>,
        path: &str,
    ) -> Result<DeclRef, GenerateError> {
        self.symbols.resolve(name, from_ns, path)
    }

    /// The declaration `r` points at.
    pub fn decl(&self, r: DeclRef) -> Option<&'s dyn Declaration> {
        let schema = self.schema;
        let decl: &'s dyn Declaration = match r.kind {
            DeclKind::Type => schema.types.get(r.index)?,
            DeclKind::Enum => schema.enums.get(r.index)?,
            DeclKind::Union => schema.unions.get(r.index)?,
            DeclKind::Service => schema.services.get(r.index)?,
        };
        Some(decl)
    }

    /// Effective namespace of a declaration.
    pub fn namespace_of(&self, r: DeclRef) -> Option<&'s str> {
        let decl = self.decl(r)?;
        decl.namespace()
            .filter(|ns| !ns.is_empty())
            .or_else(|| self.schema.default_namespace())
    }

    /// Overrides for `id`: bound overrides layered over the inline ones.
    pub fn overrides(&self, id: ElementId) -> &Overrides {
        if let Some(bound) = self.overrides.get(&id) {
            return bound;
        }
        inline_overrides(self.schema, id).unwrap_or(&EMPTY_OVERRIDES)
    }

    /// Rendered name of a declaration in `format`: the override, else the declared name.
    pub fn decl_name(&self, r: DeclRef, format: Format) -> &str {
        if let Some(name) = self.overrides(r.element()).name(format) {
            return name;
        }
        self.decl(r).map_or("", |d| d.name())
    }

    /// Canonical shape string of a type expression.
    pub fn signature(&self, ty: &FieldType, from_ns: Option<&str>) -> String {
        match &ty.kind {
            TypeKind::Primitive { name } => name.as_str().to_string(),
            TypeKind::Reference { name } => self
                .symbols
                .resolve(name, from_ns, "")
                .ok()
                .and_then(|r| self.decl(r).map(|d| d.qualified_name(self.schema.default_namespace())))
                .unwrap_or_else(|| name.clone()),
            TypeKind::Array { items } => format!("[]{}", self.signature(items, from_ns)),
            TypeKind::Map { key, value } => format!(
                "map<{},{}>",
                self.signature(key, from_ns),
                self.signature(value, from_ns)
            ),
        }
    }
}

static EMPTY_OVERRIDES: Overrides = Overrides {
    graphql: typemux_common::FormatOverride {
        name: None,
        options: Vec::new(),
    },
    protobuf: typemux_common::FormatOverride {
        name: None,
        options: Vec::new(),
    },
    openapi: typemux_common::FormatOverride {
        name: None,
        options: Vec::new(),
    },
    go: typemux_common::FormatOverride {
        name: None,
        options: Vec::new(),
    },
};

fn inline_overrides(schema: &Schema, id: ElementId) -> Option<&Overrides> {
    Some(match id {
        ElementId::Type(t) => &schema.types.get(t)?.overrides,
        ElementId::Field(t, f) => &schema.types.get(t)?.fields.get(f)?.overrides,
        ElementId::Enum(e) => &schema.enums.get(e)?.overrides,
        ElementId::EnumValue(e, v) => &schema.enums.get(e)?.values.get(v)?.overrides,
        ElementId::Union(u) => &schema.unions.get(u)?.overrides,
        ElementId::Service(s) => &schema.services.get(s)?.overrides,
        ElementId::Method(s, m) => &schema.services.get(s)?.methods.get(m)?.overrides,
    })
}

struct Lowerer<'s> {
    lowering: Lowering<'s>,
    entry_names: BTreeMap<String, usize>,
    next_wrapper: usize,
}

impl<'s> Lowerer<'s> {
    fn schema(&self) -> &'s Schema {
        self.lowering.schema
    }

    fn bind_overrides(&mut self) -> Result<(), GenerateError> {
        let schema = self.schema();
        for binding in &schema.bindings {
            let id = self.bind_target(&binding.target)?;
            let mut merged = inline_overrides(schema, id).cloned().unwrap_or_default();
            if let Some(previous) = self.lowering.overrides.get(&id) {
                merged = previous.clone();
            }
            merged.merge(&binding.overrides);
            self.lowering.overrides.insert(id, merged);
        }
        Ok(())
    }

    fn bind_target(&self, target: &str) -> Result<ElementId, GenerateError> {
        let schema = self.schema();
        let default_ns = schema.default_namespace();
        if let Ok(r) = self.lowering.symbols.resolve(target, default_ns, target) {
            return Ok(r.element());
        }
        let unbound = || {
            GenerateError::precondition(target, "override target does not name an element")
        };
        let (owner, member) = target.rsplit_once('.').ok_or_else(unbound)?;
        let r = self
            .lowering
            .symbols
            .resolve(owner, default_ns, target)
            .map_err(|_| unbound())?;
        let found = match r.kind {
            DeclKind::Type => schema.types[r.index]
                .fields
                .iter()
                .position(|f| f.name == member)
                .map(|i| ElementId::Field(r.index, i)),
            DeclKind::Enum => schema.enums[r.index]
                .values
                .iter()
                .position(|v| v.name == member)
                .map(|i| ElementId::EnumValue(r.index, i)),
            DeclKind::Service => schema.services[r.index]
                .methods
                .iter()
                .position(|m| m.name == member)
                .map(|i| ElementId::Method(r.index, i)),
            DeclKind::Union => None,
        };
        found.ok_or_else(unbound)
    }

    fn walk_types(&mut self) -> Result<(), GenerateError> {
        let schema = self.schema();
        for (ti, ty) in schema.types.iter().enumerate() {
            let ns = schema.namespace_of(ty);
            for (fi, field) in ty.fields.iter().enumerate() {
                let path = format!("{}.{}", ty.name, field.name);
                self.walk(&field.ty, ns, &path)?;
                for arg in &field.arguments {
                    self.walk(&arg.ty, ns, &format!("{path}({})", arg.name))?;
                }
                if !field.arguments.is_empty() {
                    self.synthesize_arguments(ti, fi, ns)?;
                }
            }
        }
        Ok(())
    }

    fn walk(&mut self, ty: &FieldType, ns: Option<&str>, path: &str) -> Result<(), GenerateError> {
        match &ty.kind {
            TypeKind::Primitive { .. } => Ok(()),
            TypeKind::Reference { name } => {
                let r = self.lowering.symbols.resolve(name, ns, path)?;
                if r.kind == DeclKind::Service {
                    return Err(GenerateError::precondition(
                        path,
                        format!("'{name}' is a service, not a type"),
                    ));
                }
                Ok(())
            }
            TypeKind::Array { items } => self.walk(items, ns, path),
            TypeKind::Map { key, value } => self.map_entry(key, value, ty, ns, path).map(|_| ()),
        }
    }

    /// Lower a map shape to its entry type and return the entry name.
    fn map_entry(
        &mut self,
        key: &FieldType,
        value: &FieldType,
        whole: &FieldType,
        ns: Option<&str>,
        path: &str,
    ) -> Result<String, GenerateError> {
        let key_kind = key
            .as_primitive()
            .filter(|p| p.is_valid_map_key())
            .ok_or_else(|| GenerateError::InvalidMapKey {
                path: path.to_string(),
                found: self.lowering.signature(key, ns),
            })?;

        let signature = self.lowering.signature(whole, ns);
        if let Some(idx) = self.lowering.entry_by_signature.get(&signature) {
            if let Some(Synthesized::MapEntry(e)) = self.lowering.synthesized.get(*idx) {
                return Ok(e.name.clone());
            }
        }

        let (value_name, entry_value) = match &value.kind {
            TypeKind::Map {
                key: inner_key,
                value: inner_value,
            } => {
                let wrapper = self.map_wrapper(inner_key, inner_value, value, ns, path)?;
                (wrapper.clone(), EntryValue::Wrapper { name: wrapper })
            }
            _ => {
                self.walk(value, ns, path)?;
                (
                    self.value_name(value, ns),
                    EntryValue::Declared { ty: value.clone() },
                )
            }
        };

        let name = format!("{}{value_name}Entry", scalar_name(key_kind));
        let idx = match self.entry_names.get(&name) {
            Some(idx) => *idx,
            None => {
                let idx = self.lowering.synthesized.len();
                debug!(entry = %name, shape = %signature, "synthesized map entry");
                self.lowering.synthesized.push(Synthesized::MapEntry(MapEntry {
                    name: name.clone(),
                    signature: signature.clone(),
                    key: key_kind,
                    value: entry_value,
                    namespace: ns.map(str::to_string),
                }));
                self.entry_names.insert(name.clone(), idx);
                idx
            }
        };
        self.lowering.entry_by_signature.insert(signature, idx);
        Ok(name)
    }

    /// Lower a map that is itself a map value. The wrapper number is taken
    /// before the inner level is lowered, so outer shapes number first.
    fn map_wrapper(
        &mut self,
        key: &FieldType,
        value: &FieldType,
        whole: &FieldType,
        ns: Option<&str>,
        path: &str,
    ) -> Result<String, GenerateError> {
        let signature = self.lowering.signature(whole, ns);
        if let Some(idx) = self.lowering.wrapper_by_signature.get(&signature) {
            if let Some(Synthesized::MapWrapper(w)) = self.lowering.synthesized.get(*idx) {
                return Ok(w.name.clone());
            }
        }

        let number = self.next_wrapper;
        self.next_wrapper += 1;
        let name = format!("MapWrapper{number}");
        let entry = self.map_entry(key, value, whole, ns, path)?;

        let idx = self.lowering.synthesized.len();
        debug!(wrapper = %name, shape = %signature, "synthesized map wrapper");
        self.lowering.synthesized.push(Synthesized::MapWrapper(MapWrapper {
            name: name.clone(),
            number,
            signature: signature.clone(),
            entry,
        }));
        self.lowering.wrapper_by_signature.insert(signature, idx);
        Ok(name)
    }

    /// Name fragment for an entry's value slot.
    fn value_name(&self, ty: &FieldType, ns: Option<&str>) -> String {
        match &ty.kind {
            TypeKind::Primitive { name } => scalar_name(*name).to_string(),
            TypeKind::Reference { name } => unqualified_name(name).to_string(),
            TypeKind::Array { items } => format!("{}List", self.value_name(items, ns)),
            TypeKind::Map { .. } => self
                .lowering
                .entry_for(ty, ns)
                .map_or_else(|| "Map".to_string(), |e| e.name.clone()),
        }
    }

    fn synthesize_arguments(
        &mut self,
        ti: usize,
        fi: usize,
        ns: Option<&str>,
    ) -> Result<(), GenerateError> {
        let schema = self.schema();
        let parent = &schema.types[ti];
        let field = &parent.fields[fi];
        let path = format!("{}.{}", parent.name, field.name);
        let base = format!("{}{}", parent.name, capitalize_first(&field.name));

        let request = TypeDef {
            name: format!("{base}Request"),
            namespace: parent.namespace.clone(),
            fields: field
                .arguments
                .iter()
                .map(|arg| {
                    let mut f = Field::new(arg.name.clone(), arg.ty.clone());
                    f.required = arg.required;
                    f.default.clone_from(&arg.default);
                    f.doc = arg.doc.clone();
                    f
                })
                .collect(),
            doc: typemux_common::Documentation::new(format!(
                "Arguments of {}.{}",
                parent.name, field.name
            )),
            overrides: Overrides::default(),
        };

        let returns_message = match &field.ty.kind {
            TypeKind::Reference { name } => matches!(
                self.lowering.symbols.resolve(name, ns, &path)?.kind,
                DeclKind::Type | DeclKind::Union
            ),
            _ => false,
        };
        let response = if field.ty.is_array() {
            Some(response_type(&base, parent, "items", field))
        } else if returns_message {
            None
        } else {
            Some(response_type(&base, parent, "value", field))
        };

        for name in std::iter::once(&request.name).chain(response.as_ref().map(|r| &r.name)) {
            if self.lowering.symbols.resolve(name, ns, &path).is_ok() {
                return Err(GenerateError::precondition(
                    path,
                    format!("synthesized type '{name}' collides with a declaration"),
                ));
            }
        }

        let args = ArgumentTypes {
            type_index: ti,
            field_index: fi,
            parent: parent.name.clone(),
            field: field.name.clone(),
            request,
            response,
            rpc_method: format!("Get{base}"),
            service: format!("{}FieldService", parent.name),
        };
        debug!(field = %path, request = %args.request.name, "synthesized argument types");
        let idx = self.lowering.synthesized.len();
        self.lowering.synthesized.push(Synthesized::Arguments(args));
        self.lowering.arguments_by_field.insert((ti, fi), idx);
        Ok(())
    }

    fn check_unions(&self) -> Result<(), GenerateError> {
        let schema = self.schema();
        for union in &schema.unions {
            let ns = schema.namespace_of(union);
            for option in &union.options {
                let path = format!("{}.{option}", union.name);
                let r = self.lowering.symbols.resolve(option, ns, &path)?;
                if r.kind != DeclKind::Type {
                    return Err(GenerateError::precondition(
                        path,
                        "union option must be a declared type",
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_services(&self) -> Result<(), GenerateError> {
        let schema = self.schema();
        for service in &schema.services {
            let ns = schema.namespace_of(service);
            for method in &service.methods {
                let path = format!("{}.{}", service.name, method.name);
                for name in [&method.input, &method.output] {
                    let r = self.lowering.symbols.resolve(name, ns, &path)?;
                    if r.kind != DeclKind::Type {
                        return Err(GenerateError::precondition(
                            path,
                            format!("'{name}' must be a declared type"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn response_type(base: &str, parent: &TypeDef, member: &str, field: &Field) -> TypeDef {
    let mut slot = Field::new(member, field.ty.clone());
    slot.required = field.required;
    TypeDef {
        name: format!("{base}Response"),
        namespace: parent.namespace.clone(),
        fields: vec![slot],
        doc: typemux_common::Documentation::new(format!(
            "Result of {}.{}",
            parent.name, field.name
        )),
        overrides: Overrides::default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use typemux_common::{Argument, OverrideBinding, Primitive, UnionDef};

    fn string() -> FieldType {
        FieldType::primitive(Primitive::String)
    }

    fn int32() -> FieldType {
        FieldType::primitive(Primitive::Int32)
    }

    fn names(lowering: &Lowering<'_>) -> Vec<String> {
        lowering
            .synthesized()
            .iter()
            .flat_map(|s| s.names().into_iter().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn test_flat_map_entry() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "User",
            vec![Field::new("meta", FieldType::map(string(), string()))],
        ));
        let lowering = lower(&schema).unwrap();
        assert_eq!(names(&lowering), ["StringStringEntry"]);
        let entry = lowering
            .entry_for(&schema.types[0].fields[0].ty, None)
            .unwrap();
        assert_eq!(entry.key, Primitive::String);
        assert_eq!(entry.signature, "map<string,string>");
    }

    #[test]
    fn test_nested_map_wraps_inner_level_first() {
        let deep = FieldType::map(string(), FieldType::map(string(), int32()));
        let schema = Schema::new(None).with_type(TypeDef::new(
            "Config",
            vec![Field::new("deep", deep.clone())],
        ));
        let lowering = lower(&schema).unwrap();
        assert_eq!(
            names(&lowering),
            ["StringIntEntry", "MapWrapper0", "StringMapWrapper0Entry"]
        );
        let wrapper = lowering.map_wrappers()[0];
        assert_eq!(wrapper.entry, "StringIntEntry");
        let TypeKind::Map { value, .. } = &deep.kind else {
            unreachable!()
        };
        assert_eq!(lowering.wrapper_for(value, None), Some(wrapper));
        let outer = lowering.entry_for(&deep, None).unwrap();
        assert_eq!(
            outer.value,
            EntryValue::Wrapper {
                name: "MapWrapper0".to_string()
            }
        );
    }

    #[test]
    fn test_wrapper_numbers_follow_first_discovery() {
        let three = FieldType::map(
            string(),
            FieldType::map(string(), FieldType::map(string(), int32())),
        );
        let schema = Schema::new(None).with_type(TypeDef::new(
            "T",
            vec![
                Field::new("a", three),
                Field::new("b", FieldType::map(string(), FieldType::map(string(), int32()))),
            ],
        ));
        let lowering = lower(&schema).unwrap();
        let wrappers: Vec<_> = lowering
            .map_wrappers()
            .iter()
            .map(|w| (w.name.clone(), w.signature.clone()))
            .collect();
        assert_eq!(
            wrappers,
            [
                (
                    "MapWrapper0".to_string(),
                    "map<string,map<string,int32>>".to_string()
                ),
                ("MapWrapper1".to_string(), "map<string,int32>".to_string()),
            ]
        );
        // field `b` reuses the inner wrapper discovered through `a`
        assert_eq!(lowering.map_wrappers().len(), 2);
    }

    #[test]
    fn test_invalid_map_key() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "User",
            vec![Field::new(
                "flags",
                FieldType::map(FieldType::primitive(Primitive::Bool), string()),
            )],
        ));
        let err = lower(&schema).unwrap_err();
        assert_eq!(
            err,
            GenerateError::InvalidMapKey {
                path: "User.flags".to_string(),
                found: "bool".to_string(),
            }
        );
    }

    #[test]
    fn test_argument_types() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Post", vec![Field::new("id", string())]))
            .with_type(TypeDef::new(
                "User",
                vec![
                    Field::new("id", string()).required(),
                    Field::new("posts", FieldType::array(FieldType::reference("Post")))
                        .with_argument(Argument::new("limit", int32()).with_default("10"))
                        .with_argument(Argument::new("cursor", string())),
                    Field::new("bestPost", FieldType::reference("Post"))
                        .with_argument(Argument::new("since", string()).required()),
                    Field::new("postCount", int32())
                        .with_argument(Argument::new("since", string())),
                ],
            ));
        let lowering = lower(&schema).unwrap();
        assert_eq!(
            names(&lowering),
            [
                "UserPostsRequest",
                "UserPostsResponse",
                "UserBestPostRequest",
                "UserPostCountRequest",
                "UserPostCountResponse",
            ]
        );

        let posts = lowering.arguments_for(1, 1).unwrap();
        assert_eq!(posts.rpc_method, "GetUserPosts");
        assert_eq!(posts.service, "UserFieldService");
        assert_eq!(posts.request.fields.len(), 2);
        assert_eq!(posts.request.fields[0].default.as_deref(), Some("10"));
        let response = posts.response.as_ref().unwrap();
        assert_eq!(response.fields[0].name, "items");
        assert!(response.fields[0].ty.is_array());

        let best = lowering.arguments_for(1, 2).unwrap();
        assert!(best.response.is_none());
        assert!(best.request.fields[0].required);

        let count = lowering.arguments_for(1, 3).unwrap();
        assert_eq!(count.response.as_ref().unwrap().fields[0].name, "value");
    }

    #[test]
    fn test_naming_is_stable_under_unrelated_edits() {
        let base = || {
            TypeDef::new(
                "Config",
                vec![
                    Field::new("labels", FieldType::map(string(), string())),
                    Field::new("deep", FieldType::map(string(), FieldType::map(string(), int32()))),
                ],
            )
        };
        let a = Schema::new(None).with_type(base());
        let b = Schema::new(None)
            .with_type(base())
            .with_type(TypeDef::new("Unrelated", vec![Field::new("x", string())]))
            .with_union(UnionDef::new("U", ["Unrelated"]));
        assert_eq!(names(&lower(&a).unwrap()), names(&lower(&b).unwrap()));
    }

    #[test]
    fn test_bound_overrides_layer_over_inline() {
        let mut schema = Schema::new(Some("shop")).with_type(TypeDef::new(
            "User",
            vec![Field::new("id", string())],
        ));
        schema.types[0].overrides.graphql.options.push("@key(fields: \"id\")".to_string());
        let mut bound = Overrides::default();
        bound.protobuf.name = Some("UserV2".to_string());
        schema.bindings.push(OverrideBinding {
            target: "shop.User".to_string(),
            overrides: bound.clone(),
        });
        let mut field_bound = Overrides::default();
        field_bound.openapi.name = Some("userId".to_string());
        schema.bindings.push(OverrideBinding {
            target: "User.id".to_string(),
            overrides: field_bound,
        });

        let lowering = lower(&schema).unwrap();
        let user = DeclRef {
            kind: DeclKind::Type,
            index: 0,
        };
        assert_eq!(lowering.decl_name(user, Format::Protobuf), "UserV2");
        assert_eq!(lowering.decl_name(user, Format::Graphql), "User");
        assert_eq!(
            lowering.overrides(ElementId::Type(0)).options(Format::Graphql).len(),
            1
        );
        assert_eq!(
            lowering.overrides(ElementId::Field(0, 0)).name(Format::Openapi),
            Some("userId")
        );
    }

    #[test]
    fn test_unbound_override_target() {
        let mut schema = Schema::new(None);
        schema.bindings.push(OverrideBinding {
            target: "Nope.field".to_string(),
            overrides: Overrides::default(),
        });
        let err = lower(&schema).unwrap_err();
        assert!(matches!(err, GenerateError::InternalPrecondition { .. }));
        assert_eq!(err.path(), "Nope.field");
    }

    #[test]
    fn test_unresolved_reference_is_a_precondition_failure() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "User",
            vec![Field::new("org", FieldType::reference("Org"))],
        ));
        let err = lower(&schema).unwrap_err();
        assert!(matches!(err, GenerateError::InternalPrecondition { .. }));
        assert_eq!(err.path(), "User.org");
    }
}
