//! Query-schema backend (GraphQL SDL).
//!
//! GraphQL has no maps and no namespaces: maps render as lists of the
//! synthesized entry types, and every declaration must have a globally unique
//! name. Types reachable from a method input are rendered as `input` objects;
//! types reachable from both sides are rendered twice.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use typemux_common::naming::{escape_string, lower_first};
use typemux_common::{Declaration, Field, FieldType, Format, GraphqlOperation, Primitive, TypeKind};

use super::{Backend, Rendered, doc_lines, reject_streaming, single_line, visible_fields};
use crate::config::GraphqlConfig;
use crate::error::GenerateError;
use crate::lower::{DeclKind, DeclRef, ElementId, EntryValue, Lowering, MapEntry, scalar_name};

const FORMAT: Format = Format::Graphql;

/// Renders the schema as GraphQL SDL.
#[derive(Debug, Clone, Copy)]
pub struct GraphqlBackend {
    config: GraphqlConfig,
}

impl GraphqlBackend {
    /// A backend using the `graphql` config section.
    pub const fn new(config: GraphqlConfig) -> Self {
        Self { config }
    }
}

impl Backend for GraphqlBackend {
    fn format(&self) -> Format {
        FORMAT
    }

    fn render(&self, lowering: &Lowering<'_>) -> Result<Rendered, GenerateError> {
        reject_streaming(lowering, FORMAT)?;
        check_duplicates(lowering)?;
        let renderer = Renderer::new(lowering, &self.config)?;
        renderer.render().map(Rendered::single)
    }
}

/// How a Type is reached from service methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Usage {
    input: bool,
    output: bool,
}

struct Renderer<'a, 's> {
    lowering: &'a Lowering<'s>,
    config: &'a GraphqlConfig,
    usage: Vec<Usage>,
    union_options: BTreeSet<usize>,
}

impl<'a, 's> Renderer<'a, 's> {
    fn new(lowering: &'a Lowering<'s>, config: &'a GraphqlConfig) -> Result<Self, GenerateError> {
        let schema = lowering.schema();
        let mut renderer = Self {
            lowering,
            config,
            usage: vec![Usage::default(); schema.types.len()],
            union_options: BTreeSet::new(),
        };
        for union in &schema.unions {
            let ns = schema.namespace_of(union);
            for option in &union.options {
                let r = lowering.resolve(option, ns, &format!("{}.{option}", union.name))?;
                renderer.union_options.insert(r.index);
            }
        }
        renderer.analyze_usage()?;
        Ok(renderer)
    }

    fn analyze_usage(&mut self) -> Result<(), GenerateError> {
        let schema = self.lowering.schema();
        let mut visited = BTreeSet::new();
        for service in &schema.services {
            let ns = schema.namespace_of(service);
            for method in &service.methods {
                let path = format!("{}.{}", service.name, method.name);
                let input = self.lowering.resolve(&method.input, ns, &path)?;
                self.mark(input, true, &mut visited)?;
                let output = self.lowering.resolve(&method.output, ns, &path)?;
                self.mark(output, false, &mut visited)?;
            }
        }
        // Entry types always come in both variants, so whatever they hold must too.
        let lowering = self.lowering;
        for entry in lowering.map_entries() {
            if let EntryValue::Declared { ty } = &entry.value {
                for name in ty.references() {
                    let target = lowering.resolve(name, entry.namespace.as_deref(), &entry.name)?;
                    self.mark(target, true, &mut visited)?;
                    self.mark(target, false, &mut visited)?;
                }
            }
        }
        debug!(
            inputs = self.usage.iter().filter(|u| u.input).count(),
            outputs = self.usage.iter().filter(|u| u.output).count(),
            "analyzed type usage"
        );
        Ok(())
    }

    fn mark(
        &mut self,
        r: DeclRef,
        as_input: bool,
        visited: &mut BTreeSet<(DeclRef, bool)>,
    ) -> Result<(), GenerateError> {
        if !visited.insert((r, as_input)) {
            return Ok(());
        }
        let schema = self.lowering.schema();
        match r.kind {
            DeclKind::Type => {
                if let Some(usage) = self.usage.get_mut(r.index) {
                    if as_input {
                        usage.input = true;
                    } else {
                        usage.output = true;
                    }
                }
                let ty = &schema.types[r.index];
                let ns = schema.namespace_of(ty);
                for (_, field) in visible_fields(&ty.name, &ty.fields, FORMAT)? {
                    let path = format!("{}.{}", ty.name, field.name);
                    for name in field.ty.references() {
                        let target = self.lowering.resolve(name, ns, &path)?;
                        self.mark(target, as_input, visited)?;
                    }
                }
            }
            DeclKind::Union => {
                let union = &schema.unions[r.index];
                let ns = schema.namespace_of(union);
                for option in &union.options {
                    let target =
                        self.lowering
                            .resolve(option, ns, &format!("{}.{option}", union.name))?;
                    self.mark(target, as_input, visited)?;
                }
            }
            DeclKind::Enum | DeclKind::Service => {}
        }
        Ok(())
    }

    fn type_ref(index: usize) -> DeclRef {
        DeclRef {
            kind: DeclKind::Type,
            index,
        }
    }

    fn name_of(&self, r: DeclRef) -> &str {
        self.lowering.decl_name(r, FORMAT)
    }

    /// Only ever used as an input: rendered once, as `input`, without a suffix.
    fn is_input_only(&self, index: usize) -> bool {
        let usage = self.usage.get(index).copied().unwrap_or_default();
        usage.input && !usage.output && !self.union_options.contains(&index)
    }

    fn input_name(&self, index: usize) -> String {
        let name = self.name_of(Self::type_ref(index));
        if self.is_input_only(index) {
            name.to_string()
        } else {
            format!("{name}Input")
        }
    }

    fn render(&self) -> Result<String, GenerateError> {
        let schema = self.lowering.schema();
        let mut blocks: Vec<String> = Vec::new();

        let mut header = String::from("# Generated GraphQL Schema\n");
        if let Some(ns) = schema.default_namespace() {
            header.push_str(&format!("# Namespace: {ns}\n"));
        }
        blocks.push(header.trim_end().to_string());

        let schema_directives = schema.annotations.options(FORMAT);
        if !schema_directives.is_empty() {
            blocks.push(
                schema_directives
                    .iter()
                    .map(|d| format!("extend schema {d}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }

        for wrapper in self.lowering.map_wrappers() {
            for input in [false, true] {
                let suffix = if input { "Input" } else { "" };
                blocks.push(format!(
                    "\"{name}{suffix} is an auto-generated wrapper for nested map\"\n{keyword} {name}{suffix} {{\n  value: [{entry}{suffix}!]!\n}}",
                    name = wrapper.name,
                    keyword = keyword(input),
                    entry = wrapper.entry,
                ));
            }
        }
        for entry in self.lowering.map_entries() {
            for input in [false, true] {
                blocks.push(self.render_entry(entry, input)?);
            }
        }

        blocks.push("directive @oneOf on INPUT_OBJECT".to_string());

        for (index, e) in schema.enums.iter().enumerate() {
            let r = DeclRef {
                kind: DeclKind::Enum,
                index,
            };
            let mut out = description(e.doc().for_format(FORMAT), "");
            out.push_str(&format!(
                "enum {}{} {{\n",
                self.name_of(r),
                directives(self.lowering.overrides(r.element()).options(FORMAT))
            ));
            for (vi, value) in e.values.iter().enumerate() {
                out.push_str(&description(value.doc.for_format(FORMAT), "  "));
                let overrides = self.lowering.overrides(ElementId::EnumValue(index, vi));
                out.push_str(&format!(
                    "  {}{}\n",
                    overrides.name(FORMAT).unwrap_or(&value.name),
                    directives(overrides.options(FORMAT))
                ));
            }
            out.push('}');
            blocks.push(out);
        }

        for index in 0..schema.types.len() {
            let usage = self.usage[index];
            let needs_input = usage.input || self.union_options.contains(&index);
            if needs_input {
                blocks.push(self.render_type(index, true)?);
            }
            if !self.is_input_only(index) {
                blocks.push(self.render_type(index, false)?);
            }
        }

        for (index, union) in schema.unions.iter().enumerate() {
            let r = DeclRef {
                kind: DeclKind::Union,
                index,
            };
            let ns = schema.namespace_of(union);
            let mut options = Vec::with_capacity(union.options.len());
            for option in &union.options {
                let target = self
                    .lowering
                    .resolve(option, ns, &format!("{}.{option}", union.name))?;
                options.push(target);
            }
            let doc = union.doc.for_format(FORMAT);
            let name = self.name_of(r);
            let mut out = description(doc, "");
            out.push_str(&format!(
                "union {name}{} = {}",
                directives(self.lowering.overrides(r.element()).options(FORMAT)),
                options
                    .iter()
                    .map(|o| self.name_of(*o))
                    .collect::<Vec<_>>()
                    .join(" | ")
            ));
            blocks.push(out);

            let mut input = description(
                doc.map(|d| format!("{} (Input variant with @oneOf)", single_line(d)))
                    .as_deref(),
                "",
            );
            input.push_str(&format!("input {name}Input @oneOf {{\n"));
            for option in &options {
                let option_name = self.name_of(*option);
                input.push_str(&format!(
                    "  {}: {}\n",
                    lower_first(option_name),
                    self.input_name(option.index)
                ));
            }
            input.push('}');
            blocks.push(input);
        }

        blocks.extend(self.render_operations()?);

        let mut out = blocks.join("\n\n");
        out.push('\n');
        Ok(out)
    }

    fn render_entry(&self, entry: &MapEntry, input: bool) -> Result<String, GenerateError> {
        let suffix = if input { "Input" } else { "" };
        let ns = entry.namespace.as_deref();
        let (value_type, value_spelling) = match &entry.value {
            EntryValue::Declared { ty } => (
                self.type_expr(ty, ns, input, &entry.name)?,
                idl_spelling(ty),
            ),
            EntryValue::Wrapper { name } => (format!("{name}{suffix}"), name.clone()),
        };
        Ok(format!(
            "\"{name}{suffix} represents a key-value pair for map<{key}, {value_spelling}>\"\n{keyword} {name}{suffix} {{\n  key: {key_type}!\n  value: {value_type}!\n}}",
            name = entry.name,
            key = entry.key.as_str(),
            keyword = keyword(input),
            key_type = scalar_name(entry.key),
        ))
    }

    fn render_type(&self, index: usize, input: bool) -> Result<String, GenerateError> {
        let schema = self.lowering.schema();
        let ty = &schema.types[index];
        let r = Self::type_ref(index);
        let ns = schema.namespace_of(ty);
        let name = if input {
            self.input_name(index)
        } else {
            self.name_of(r).to_string()
        };

        let mut out = description(ty.doc.for_format(FORMAT), "");
        let type_directives = if input {
            String::new()
        } else {
            directives(self.lowering.overrides(r.element()).options(FORMAT))
        };
        out.push_str(&format!("{} {name}{type_directives} {{\n", keyword(input)));

        for (fi, field) in visible_fields(&ty.name, &ty.fields, FORMAT)? {
            if field.deprecated.is_some() && !self.config.include_deprecated {
                continue;
            }
            let path = format!("{}.{}", ty.name, field.name);
            let overrides = self.lowering.overrides(ElementId::Field(index, fi));
            let field_name = overrides.name(FORMAT).unwrap_or(&field.name);

            out.push_str(&description(field.doc.for_format(FORMAT), "  "));
            let args = if input || field.arguments.is_empty() {
                String::new()
            } else {
                self.render_arguments(field, ns, &path)?
            };
            let mut field_directives = Vec::new();
            if !input {
                if let Some(dep) = &field.deprecated {
                    field_directives.push(format!(
                        "@deprecated(reason: \"{}\")",
                        escape_string(dep.reason_or_default())
                    ));
                }
                field_directives.extend(overrides.options(FORMAT).iter().cloned());
            }
            out.push_str(&format!(
                "  {field_name}{args}: {}{}\n",
                self.field_type(field, ns, input, &path)?,
                directives(&field_directives)
            ));
        }
        out.push('}');
        Ok(out)
    }

    fn render_arguments(
        &self,
        field: &Field,
        ns: Option<&str>,
        path: &str,
    ) -> Result<String, GenerateError> {
        let mut parts = Vec::with_capacity(field.arguments.len());
        for arg in &field.arguments {
            let arg_path = format!("{path}({})", arg.name);
            let mut part = format!("{}: {}", arg.name, self.type_expr(&arg.ty, ns, true, &arg_path)?);
            if arg.required && !arg.ty.optional {
                part.push('!');
            }
            if let Some(default) = &arg.default {
                part.push_str(&format!(" = {}", default_literal(default, &arg.ty)));
            }
            parts.push(part);
        }
        Ok(format!("({})", parts.join(", ")))
    }

    /// Field type with the trailing `!` for non-null fields.
    fn field_type(
        &self,
        field: &Field,
        ns: Option<&str>,
        input: bool,
        path: &str,
    ) -> Result<String, GenerateError> {
        let mut expr = self.type_expr(&field.ty, ns, input, path)?;
        if field.is_non_null() {
            expr.push('!');
        }
        Ok(expr)
    }

    fn type_expr(
        &self,
        ty: &FieldType,
        ns: Option<&str>,
        input: bool,
        path: &str,
    ) -> Result<String, GenerateError> {
        Ok(match &ty.kind {
            TypeKind::Primitive { name } => scalar_name(*name).to_string(),
            TypeKind::Reference { name } => {
                let r = self.lowering.resolve(name, ns, path)?;
                match r.kind {
                    DeclKind::Type if input => self.input_name(r.index),
                    DeclKind::Union if input => format!("{}Input", self.name_of(r)),
                    DeclKind::Type | DeclKind::Union | DeclKind::Enum => {
                        self.name_of(r).to_string()
                    }
                    DeclKind::Service => {
                        return Err(GenerateError::precondition(
                            path,
                            format!("'{name}' is a service, not a type"),
                        ));
                    }
                }
            }
            TypeKind::Array { items } => format!("[{}]", self.type_expr(items, ns, input, path)?),
            TypeKind::Map { .. } => {
                let entry = self.lowering.require_entry(ty, ns, path)?;
                let suffix = if input { "Input" } else { "" };
                format!("[{}{suffix}!]", entry.name)
            }
        })
    }

    fn render_operations(&self) -> Result<Vec<String>, GenerateError> {
        let schema = self.lowering.schema();
        let mut groups: BTreeMap<GraphqlOperation, Vec<String>> = BTreeMap::new();
        for (si, service) in schema.services.iter().enumerate() {
            let ns = schema.namespace_of(service);
            for (mi, method) in service.methods.iter().enumerate() {
                let path = format!("{}.{}", service.name, method.name);
                let input = self.lowering.resolve(&method.input, ns, &path)?;
                let output = self.lowering.resolve(&method.output, ns, &path)?;
                let overrides = self.lowering.overrides(ElementId::Method(si, mi));
                let field_name = overrides
                    .name(FORMAT)
                    .map_or_else(|| lower_first(&method.name), str::to_string);
                let mut line = description(method.doc.for_format(FORMAT), "  ");
                line.push_str(&format!(
                    "  {field_name}(input: {}): {}{}",
                    self.input_name(input.index),
                    self.name_of(output),
                    directives(overrides.options(FORMAT))
                ));
                groups
                    .entry(method.effective_graphql_operation())
                    .or_default()
                    .push(line);
            }
        }
        Ok(groups
            .into_iter()
            .map(|(op, lines)| {
                let root = match op {
                    GraphqlOperation::Query => "Query",
                    GraphqlOperation::Mutation => "Mutation",
                    GraphqlOperation::Subscription => "Subscription",
                };
                format!("type {root} {{\n{}\n}}", lines.join("\n"))
            })
            .collect())
    }
}

/// GraphQL has one global namespace: two declarations rendering to the same
/// name cannot coexist.
fn check_duplicates(lowering: &Lowering<'_>) -> Result<(), GenerateError> {
    let schema = lowering.schema();
    let default_ns = schema.default_namespace();
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    let decls = (0..schema.types.len())
        .map(|index| DeclRef {
            kind: DeclKind::Type,
            index,
        })
        .chain((0..schema.enums.len()).map(|index| DeclRef {
            kind: DeclKind::Enum,
            index,
        }))
        .chain((0..schema.unions.len()).map(|index| DeclRef {
            kind: DeclKind::Union,
            index,
        }));
    for r in decls {
        let Some(decl) = lowering.decl(r) else {
            continue;
        };
        let name = lowering.decl_name(r, FORMAT).to_string();
        let qualified = decl.qualified_name(default_ns);
        if let Some(other) = seen.get(&name) {
            return Err(GenerateError::DuplicateGlobalName {
                path: qualified,
                name,
                other: other.clone(),
                format: FORMAT,
            });
        }
        seen.insert(name, qualified);
    }
    for synthesized in lowering.map_wrappers().iter().map(|w| w.name.as_str()).chain(
        lowering.map_entries().map(|e| e.name.as_str()),
    ) {
        if let Some(other) = seen.get(synthesized) {
            return Err(GenerateError::DuplicateGlobalName {
                path: synthesized.to_string(),
                name: synthesized.to_string(),
                other: other.clone(),
                format: FORMAT,
            });
        }
    }
    Ok(())
}

const fn keyword(input: bool) -> &'static str {
    if input { "input" } else { "type" }
}

fn directives(options: &[String]) -> String {
    if options.is_empty() {
        String::new()
    } else {
        format!(" {}", options.join(" "))
    }
}

/// `"..."` description line, or nothing.
fn description(doc: Option<&str>, indent: &str) -> String {
    let lines = doc_lines(doc);
    if lines.is_empty() {
        return String::new();
    }
    format!("{indent}\"{}\"\n", escape_string(&single_line(&lines.join("\n"))))
}

fn default_literal(value: &str, ty: &FieldType) -> String {
    let quoted = value.starts_with('"') && value.ends_with('"') && value.len() >= 2;
    match ty.as_primitive() {
        Some(Primitive::String | Primitive::Timestamp | Primitive::Bytes) if !quoted => {
            format!("\"{}\"", escape_string(value))
        }
        _ => value.to_string(),
    }
}

/// IDL spelling of a type expression, for entry descriptions.
fn idl_spelling(ty: &FieldType) -> String {
    match &ty.kind {
        TypeKind::Primitive { name } => name.as_str().to_string(),
        TypeKind::Reference { name } => name.clone(),
        TypeKind::Array { items } => format!("[]{}", idl_spelling(items)),
        TypeKind::Map { key, value } => {
            format!("map<{}, {}>", idl_spelling(key), idl_spelling(value))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::lower::lower;
    use typemux_common::{
        Argument, EnumDef, EnumValue, Method, Schema, Service, TypeDef, UnionDef,
    };

    fn render(schema: &Schema) -> Result<String, GenerateError> {
        let lowering = lower(schema)?;
        GraphqlBackend::new(GraphqlConfig::default())
            .render(&lowering)
            .map(|r| r.text())
    }

    fn string() -> FieldType {
        FieldType::primitive(Primitive::String)
    }

    #[test]
    fn test_fields_and_nullability() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "User",
            vec![
                Field::new("id", string()).required(),
                Field::new("tags", FieldType::array(string())),
                Field::new("meta", FieldType::map(string(), string())),
                Field::new("nick", string().optional()).required(),
            ],
        ));
        let out = render(&schema).unwrap();
        assert!(out.starts_with("# Generated GraphQL Schema\n"));
        assert!(out.contains("type User {\n  id: String!\n  tags: [String]\n  meta: [StringStringEntry!]\n  nick: String\n}"));
        assert!(out.contains(
            "\"StringStringEntry represents a key-value pair for map<string, string>\"\ntype StringStringEntry {\n  key: String!\n  value: String!\n}"
        ));
        assert!(out.contains("input StringStringEntryInput {"));
        assert!(out.contains("directive @oneOf on INPUT_OBJECT"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_nested_map_uses_wrapper_chain() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "Config",
            vec![Field::new(
                "deep",
                FieldType::map(string(), FieldType::map(string(), FieldType::primitive(Primitive::Int32))),
            )],
        ));
        let out = render(&schema).unwrap();
        assert!(out.contains("deep: [StringMapWrapper0Entry!]"));
        assert!(out.contains("type MapWrapper0 {\n  value: [StringIntEntry!]!\n}"));
        assert!(out.contains("input MapWrapper0Input {\n  value: [StringIntEntryInput!]!\n}"));
        assert!(out.contains("type StringMapWrapper0Entry {\n  key: String!\n  value: MapWrapper0!\n}"));
        assert!(!out.contains("map<string, map"));
        let wrapper_at = out.find("type MapWrapper0").unwrap();
        let entry_at = out.find("type StringMapWrapper0Entry").unwrap();
        assert!(wrapper_at < entry_at);
    }

    #[test]
    fn test_usage_analysis_and_operations() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Address", vec![Field::new("city", string())]))
            .with_type(TypeDef::new(
                "User",
                vec![
                    Field::new("id", string()).required(),
                    Field::new("address", FieldType::reference("Address")),
                ],
            ))
            .with_type(TypeDef::new(
                "CreateUserRequest",
                vec![Field::new("user", FieldType::reference("User")).required()],
            ))
            .with_type(TypeDef::new("GetUserRequest", vec![Field::new("id", string())]))
            .with_service(Service::new(
                "UserService",
                vec![
                    Method::new("GetUser", "GetUserRequest", "User"),
                    Method::new("CreateUser", "CreateUserRequest", "User"),
                ],
            ));
        let out = render(&schema).unwrap();
        assert!(out.contains("input CreateUserRequest {\n  user: UserInput!\n}"));
        assert!(out.contains("input UserInput {\n  id: String!\n  address: AddressInput\n}"));
        assert!(out.contains("type User {\n  id: String!\n  address: Address\n}"));
        assert!(out.contains("input AddressInput {"));
        assert!(!out.contains("type CreateUserRequest"));
        assert!(out.contains("type Query {\n  getUser(input: GetUserRequest): User\n}"));
        assert!(out.contains("type Mutation {\n  createUser(input: CreateUserRequest): User\n}"));
    }

    #[test]
    fn test_union_and_oneof_input() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Text", vec![Field::new("body", string())]))
            .with_type(TypeDef::new("Image", vec![Field::new("url", string())]))
            .with_type(TypeDef::new("Video", vec![Field::new("url", string())]))
            .with_union(UnionDef::new("Message", ["Text", "Image", "Video"]));
        let out = render(&schema).unwrap();
        assert!(out.contains("union Message = Text | Image | Video\n"));
        assert!(out.contains(
            "input MessageInput @oneOf {\n  text: TextInput\n  image: ImageInput\n  video: VideoInput\n}"
        ));
        assert!(out.contains("input TextInput {"));
        assert!(out.contains("type Text {"));
    }

    #[test]
    fn test_enum_and_deprecation() {
        let schema = Schema::new(None)
            .with_enum(EnumDef::new(
                "Status",
                vec![EnumValue::new("ACTIVE"), EnumValue::new("INACTIVE").with_number(5)],
            ))
            .with_type(TypeDef::new(
                "User",
                vec![
                    Field::new("status", FieldType::reference("Status")),
                    Field::new("legacy", string()).deprecated("Use status"),
                ],
            ));
        let out = render(&schema).unwrap();
        assert!(out.contains("enum Status {\n  ACTIVE\n  INACTIVE\n}"));
        assert!(out.contains("legacy: String @deprecated(reason: \"Use status\")"));

        let lowering = lower(&schema).unwrap();
        let hidden = GraphqlBackend::new(GraphqlConfig {
            include_deprecated: false,
        })
        .render(&lowering)
        .unwrap()
        .text();
        assert!(!hidden.contains("legacy"));
    }

    #[test]
    fn test_inline_arguments_stay_native() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Post", vec![Field::new("title", string())]))
            .with_type(TypeDef::new(
                "User",
                vec![Field::new("posts", FieldType::array(FieldType::reference("Post")))
                    .with_argument(
                        Argument::new("limit", FieldType::primitive(Primitive::Int32)).with_default("10"),
                    )
                    .with_argument(Argument::new("after", string()).required())],
            ));
        let out = render(&schema).unwrap();
        assert!(out.contains("posts(limit: Int = 10, after: String!): [Post]"));
        assert!(!out.contains("UserPostsRequest"));
    }

    #[test]
    fn test_overrides_and_directives() {
        let mut schema = Schema::new(Some("shop"))
            .with_type(TypeDef::new("Product", vec![Field::new("id", string()).required()]));
        schema.annotations.graphql.options.push("@link(url: \"https://specs.apollo.dev/federation/v2.0\")".to_string());
        schema.types[0].overrides.graphql.name = Some("Item".to_string());
        schema.types[0].overrides.graphql.options.push("@key(fields: \"id\")".to_string());
        let out = render(&schema).unwrap();
        assert!(out.contains("# Namespace: shop"));
        assert!(out.contains("extend schema @link("));
        assert!(out.contains("type Item @key(fields: \"id\") {"));
    }

    #[test]
    fn test_duplicate_global_name() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("User", vec![]).in_namespace("a"))
            .with_type(TypeDef::new("User", vec![]).in_namespace("b"));
        let err = render(&schema).unwrap_err();
        assert_eq!(
            err,
            GenerateError::DuplicateGlobalName {
                path: "b.User".to_string(),
                name: "User".to_string(),
                other: "a.User".to_string(),
                format: Format::Graphql,
            }
        );
    }

    #[test]
    fn test_streaming_rejected() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Req", vec![]))
            .with_type(TypeDef::new("Event", vec![]))
            .with_service(Service::new(
                "Feed",
                vec![Method::new("Watch", "Req", "Event").streaming(false, true)],
            ));
        let err = render(&schema).unwrap_err();
        assert_eq!(
            err,
            GenerateError::UnsupportedStreaming {
                path: "Feed.Watch".to_string(),
                format: Format::Graphql,
            }
        );
    }
}
