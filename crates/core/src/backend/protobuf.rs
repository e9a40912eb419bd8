//! Wire-format backend (Protobuf proto3).
//!
//! Output is split into one file per package (namespace). Maps and streams are
//! native here, so the only synthesized types rendered are the request and
//! response messages of fields with arguments, served by an implicit
//! `{Parent}FieldService`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use typemux_common::naming::{escape_string, to_screaming_snake_case, to_snake_case};
use typemux_common::{FieldType, Format, Primitive, TypeDef, TypeKind, Validation};

use super::{Backend, Rendered, RenderedFile, doc_lines, visible_fields};
use crate::config::ProtobufConfig;
use crate::error::GenerateError;
use crate::lower::{ArgumentTypes, DeclKind, DeclRef, ElementId, Lowering};
use crate::rules::Numbering;

const FORMAT: Format = Format::Protobuf;
const DEFAULT_PACKAGE: &str = "api";
const TIMESTAMP_IMPORT: &str = "google/protobuf/timestamp.proto";
const VALIDATE_IMPORT: &str = "buf/validate/validate.proto";
const VALIDATE: &str = "(buf.validate.field)";

/// Renders the schema as proto3.
#[derive(Debug, Clone, Copy)]
pub struct ProtobufBackend {
    config: ProtobufConfig,
}

impl ProtobufBackend {
    /// A backend using the `protobuf` config section.
    pub const fn new(config: ProtobufConfig) -> Self {
        Self { config }
    }
}

impl Backend for ProtobufBackend {
    fn format(&self) -> Format {
        FORMAT
    }

    fn render(&self, lowering: &Lowering<'_>) -> Result<Rendered, GenerateError> {
        let renderer = Renderer {
            lowering,
            config: self.config,
        };
        let packages = renderer.packages();
        let mut files = Vec::with_capacity(packages.len());
        for (package, members) in &packages {
            let contents = renderer.render_file(package, members)?;
            debug!(package = %package, bytes = contents.len(), "rendered proto file");
            files.push(RenderedFile {
                namespace: Some((*package).to_string()),
                contents,
            });
        }
        Ok(Rendered { files })
    }
}

/// Declarations that land in one package file, in schema order.
#[derive(Debug, Default)]
struct Package<'a> {
    enums: Vec<usize>,
    types: Vec<usize>,
    arguments: Vec<&'a ArgumentTypes>,
    unions: Vec<usize>,
    services: Vec<usize>,
}

/// Per-file state collected while rendering.
struct FileContext<'p> {
    package: &'p str,
    imports: BTreeSet<String>,
}

struct Renderer<'a, 's> {
    lowering: &'a Lowering<'s>,
    config: ProtobufConfig,
}

const fn decl(kind: DeclKind, index: usize) -> DeclRef {
    DeclRef { kind, index }
}

impl<'a, 's> Renderer<'a, 's> {
    fn package_of(&self, r: DeclRef) -> &'s str {
        self.lowering.namespace_of(r).unwrap_or(DEFAULT_PACKAGE)
    }

    /// Package receiving the schema-level options.
    fn main_package(&self) -> &'s str {
        self.lowering
            .schema()
            .default_namespace()
            .unwrap_or(DEFAULT_PACKAGE)
    }

    fn packages(&self) -> BTreeMap<&'s str, Package<'a>> {
        let schema = self.lowering.schema();
        let mut packages: BTreeMap<&'s str, Package<'a>> = BTreeMap::new();
        for index in 0..schema.enums.len() {
            let package = self.package_of(decl(DeclKind::Enum, index));
            packages.entry(package).or_default().enums.push(index);
        }
        for index in 0..schema.types.len() {
            let package = self.package_of(decl(DeclKind::Type, index));
            packages.entry(package).or_default().types.push(index);
        }
        for args in self.lowering.argument_types() {
            let package = self.package_of(decl(DeclKind::Type, args.type_index));
            packages.entry(package).or_default().arguments.push(args);
        }
        for index in 0..schema.unions.len() {
            let package = self.package_of(decl(DeclKind::Union, index));
            packages.entry(package).or_default().unions.push(index);
        }
        for index in 0..schema.services.len() {
            let package = self.package_of(decl(DeclKind::Service, index));
            packages.entry(package).or_default().services.push(index);
        }
        if packages.is_empty() {
            packages.insert(self.main_package(), Package::default());
        }
        packages
    }

    fn render_file(&self, package: &str, members: &Package<'_>) -> Result<String, GenerateError> {
        let schema = self.lowering.schema();
        let mut ctx = FileContext {
            package,
            imports: BTreeSet::new(),
        };
        let mut blocks = Vec::new();

        for &index in &members.enums {
            blocks.push(self.render_enum(index)?);
        }
        for &index in &members.types {
            let name = self.lowering.decl_name(decl(DeclKind::Type, index), FORMAT);
            blocks.push(self.render_message(&schema.types[index], name, Some(index), &mut ctx)?);
        }
        for args in &members.arguments {
            blocks.push(self.render_message(&args.request, &args.request.name, None, &mut ctx)?);
            if let Some(response) = &args.response {
                blocks.push(self.render_message(response, &response.name, None, &mut ctx)?);
            }
        }
        for &index in &members.unions {
            blocks.push(self.render_union(index, &mut ctx)?);
        }
        for &index in &members.services {
            blocks.push(self.render_service(index, &mut ctx)?);
        }
        blocks.extend(self.render_field_services(&members.arguments, &mut ctx)?);

        let mut out = String::from("// Generated Protobuf Schema\nsyntax = \"proto3\";\n\n");
        out.push_str(&format!("package {package};\n\n"));
        if package == self.main_package() {
            let options = schema.annotations.options(FORMAT);
            if !options.is_empty() {
                for option in options {
                    out.push_str(&format!("option {option};\n"));
                }
                out.push('\n');
            }
        }
        if !ctx.imports.is_empty() {
            for import in &ctx.imports {
                out.push_str(&format!("import \"{import}\";\n"));
            }
            out.push('\n');
        }
        out.push_str(&blocks.join("\n\n"));

        let mut out = out.trim_end().to_string();
        out.push('\n');
        Ok(out)
    }

    fn render_enum(&self, index: usize) -> Result<String, GenerateError> {
        let e = &self.lowering.schema().enums[index];
        let r = decl(DeclKind::Enum, index);
        let name = self.lowering.decl_name(r, FORMAT);
        let sentinel = format!("{}_UNSPECIFIED", to_screaming_snake_case(name));
        let mut numbering = Numbering::new(&e.name, 1);
        numbering.reserve(0, &sentinel);

        let mut out = comments(e.doc.for_format(FORMAT), "");
        out.push_str(&format!("enum {name} {{\n"));
        out.push_str(&option_lines(self.lowering.overrides(r.element()).options(FORMAT)));
        out.push_str(&format!("  {sentinel} = 0;\n"));
        for (vi, value) in e.values.iter().enumerate() {
            let number = numbering.assign(&value.name, value.number)?;
            let overrides = self.lowering.overrides(ElementId::EnumValue(index, vi));
            out.push_str(&comments(value.doc.for_format(FORMAT), "  "));
            out.push_str(&format!(
                "  {} = {number}{};\n",
                overrides.name(FORMAT).unwrap_or(&value.name),
                bracketed(overrides.options(FORMAT))
            ));
        }
        out.push('}');
        Ok(out)
    }

    /// A declared Type (`index` set) or a synthesized one.
    fn render_message(
        &self,
        ty: &TypeDef,
        name: &str,
        index: Option<usize>,
        ctx: &mut FileContext<'_>,
    ) -> Result<String, GenerateError> {
        let ns = self.lowering.schema().namespace_of(ty);
        let mut out = comments(ty.doc.for_format(FORMAT), "");
        out.push_str(&format!("message {name} {{\n"));
        if let Some(ti) = index {
            out.push_str(&option_lines(
                self.lowering.overrides(ElementId::Type(ti)).options(FORMAT),
            ));
        }

        let mut numbering = Numbering::new(&ty.name, 1);
        for (fi, field) in visible_fields(&ty.name, &ty.fields, FORMAT)? {
            let number = numbering.assign(&field.name, field.number)?;
            // served by the field service instead; its number stays taken
            if !field.arguments.is_empty() {
                continue;
            }
            let path = format!("{}.{}", ty.name, field.name);
            let overrides = index.map(|ti| self.lowering.overrides(ElementId::Field(ti, fi)));
            let field_name = overrides
                .and_then(|o| o.name(FORMAT))
                .unwrap_or(&field.name);

            out.push_str(&comments(field.doc.for_format(FORMAT), "  "));
            let mut options = Vec::new();
            if let Some(dep) = &field.deprecated {
                let mut line = String::from("  // DEPRECATED");
                if let Some(since) = &dep.since {
                    line.push_str(&format!(" (since {since})"));
                }
                if let Some(removed) = &dep.removed {
                    line.push_str(&format!(" - will be removed in {removed}"));
                }
                out.push_str(&line);
                out.push('\n');
                if let Some(reason) = &dep.reason {
                    out.push_str(&format!("  // {reason}\n"));
                }
                options.push("deprecated = true".to_string());
            }
            if let Some(rules) = &field.validation {
                let rules = validation_options(rules, &field.ty);
                if !rules.is_empty() && self.config.import_buf_validate {
                    ctx.imports.insert(VALIDATE_IMPORT.to_string());
                }
                options.extend(rules);
            }
            if let Some(o) = overrides {
                options.extend(o.options(FORMAT).iter().cloned());
            }

            out.push_str(&format!(
                "  {} {field_name} = {number}{};\n",
                self.field_type(&field.ty, ns, ctx, &path)?,
                bracketed(&options)
            ));
        }
        out.push('}');
        Ok(out)
    }

    fn field_type(
        &self,
        ty: &FieldType,
        ns: Option<&str>,
        ctx: &mut FileContext<'_>,
        path: &str,
    ) -> Result<String, GenerateError> {
        let expr = self.type_expr(ty, ns, ctx, path)?;
        Ok(match ty.kind {
            TypeKind::Primitive { .. } | TypeKind::Reference { .. } if ty.optional => {
                format!("optional {expr}")
            }
            _ => expr,
        })
    }

    fn type_expr(
        &self,
        ty: &FieldType,
        ns: Option<&str>,
        ctx: &mut FileContext<'_>,
        path: &str,
    ) -> Result<String, GenerateError> {
        Ok(match &ty.kind {
            TypeKind::Primitive { name } => {
                if *name == Primitive::Timestamp {
                    ctx.imports.insert(TIMESTAMP_IMPORT.to_string());
                }
                scalar(*name).to_string()
            }
            TypeKind::Reference { name } => {
                let r = self.lowering.resolve(name, ns, path)?;
                self.reference(r, ctx)
            }
            TypeKind::Array { items } => {
                format!("repeated {}", self.type_expr(items, ns, ctx, path)?)
            }
            TypeKind::Map { key, value } => format!(
                "map<{}, {}>",
                self.type_expr(key, ns, ctx, path)?,
                self.type_expr(value, ns, ctx, path)?
            ),
        })
    }

    /// Name of `r` as seen from the current file, importing its package if needed.
    fn reference(&self, r: DeclRef, ctx: &mut FileContext<'_>) -> String {
        let name = self.lowering.decl_name(r, FORMAT);
        let package = self.package_of(r);
        if package == ctx.package {
            return name.to_string();
        }
        ctx.imports
            .insert(format!("{}.proto", package.replace('.', "/")));
        format!("{package}.{name}")
    }

    fn render_union(&self, index: usize, ctx: &mut FileContext<'_>) -> Result<String, GenerateError> {
        let schema = self.lowering.schema();
        let union = &schema.unions[index];
        let ns = schema.namespace_of(union);
        let r = decl(DeclKind::Union, index);

        let mut out = comments(union.doc.for_format(FORMAT), "");
        out.push_str(&format!("message {} {{\n", self.lowering.decl_name(r, FORMAT)));
        out.push_str(&option_lines(self.lowering.overrides(r.element()).options(FORMAT)));
        out.push_str("  oneof value {\n");
        for (i, option) in union.options.iter().enumerate() {
            let target = self
                .lowering
                .resolve(option, ns, &format!("{}.{option}", union.name))?;
            let field = to_snake_case(self.lowering.decl_name(target, FORMAT));
            out.push_str(&format!(
                "    {} {field} = {};\n",
                self.reference(target, ctx),
                i + 1
            ));
        }
        out.push_str("  }\n}");
        Ok(out)
    }

    fn render_service(&self, index: usize, ctx: &mut FileContext<'_>) -> Result<String, GenerateError> {
        let schema = self.lowering.schema();
        let service = &schema.services[index];
        let ns = schema.namespace_of(service);
        let r = decl(DeclKind::Service, index);

        let mut out = comments(service.doc.for_format(FORMAT), "");
        out.push_str(&format!("service {} {{\n", self.lowering.decl_name(r, FORMAT)));
        out.push_str(&option_lines(self.lowering.overrides(r.element()).options(FORMAT)));
        for (mi, method) in service.methods.iter().enumerate() {
            let path = format!("{}.{}", service.name, method.name);
            let overrides = self.lowering.overrides(ElementId::Method(index, mi));
            let input = self.lowering.resolve(&method.input, ns, &path)?;
            let output = self.lowering.resolve(&method.output, ns, &path)?;
            let input = stream_prefix(method.input_stream) + &self.reference(input, ctx);
            let output = stream_prefix(method.output_stream) + &self.reference(output, ctx);

            out.push_str(&comments(method.doc.for_format(FORMAT), "  "));
            out.push_str(&rpc_line(
                overrides.name(FORMAT).unwrap_or(&method.name),
                &input,
                &output,
                overrides.options(FORMAT),
            ));
        }
        out.push('}');
        Ok(out)
    }

    /// One implicit service per parent Type with argument fields.
    fn render_field_services(
        &self,
        arguments: &[&ArgumentTypes],
        ctx: &mut FileContext<'_>,
    ) -> Result<Vec<String>, GenerateError> {
        let schema = self.lowering.schema();
        let mut services: Vec<(&str, Vec<&ArgumentTypes>)> = Vec::new();
        for &args in arguments {
            match services.iter_mut().find(|(name, _)| *name == args.service) {
                Some((_, group)) => group.push(args),
                None => services.push((args.service.as_str(), vec![args])),
            }
        }

        let mut blocks = Vec::with_capacity(services.len());
        for (service, group) in services {
            let mut out = String::new();
            if let Some(first) = group.first() {
                out.push_str(&format!("// Field-argument RPCs of {}\n", first.parent));
            }
            out.push_str(&format!("service {service} {{\n"));
            for args in group {
                let output = match &args.response {
                    Some(response) => response.name.clone(),
                    None => {
                        let parent = &schema.types[args.type_index];
                        let field = &parent.fields[args.field_index];
                        let path = format!("{}.{}", parent.name, field.name);
                        let TypeKind::Reference { name } = &field.ty.kind else {
                            return Err(GenerateError::precondition(
                                path,
                                "argument field without a response type must return a message",
                            ));
                        };
                        let r = self
                            .lowering
                            .resolve(name, schema.namespace_of(parent), &path)?;
                        self.reference(r, ctx)
                    }
                };
                out.push_str(&rpc_line(&args.rpc_method, &args.request.name, &output, &[]));
            }
            out.push('}');
            blocks.push(out);
        }
        Ok(blocks)
    }
}

const fn scalar(p: Primitive) -> &'static str {
    match p {
        Primitive::String => "string",
        Primitive::Int32 => "int32",
        Primitive::Int64 => "int64",
        Primitive::Uint8 | Primitive::Uint16 | Primitive::Uint32 => "uint32",
        Primitive::Uint64 => "uint64",
        Primitive::Float32 => "float",
        Primitive::Float64 => "double",
        Primitive::Bool => "bool",
        Primitive::Timestamp => "google.protobuf.Timestamp",
        Primitive::Bytes => "bytes",
    }
}

fn stream_prefix(streaming: bool) -> String {
    if streaming {
        "stream ".to_string()
    } else {
        String::new()
    }
}

fn rpc_line(name: &str, input: &str, output: &str, options: &[String]) -> String {
    if options.is_empty() {
        return format!("  rpc {name}({input}) returns ({output});\n");
    }
    let mut out = format!("  rpc {name}({input}) returns ({output}) {{\n");
    for option in options {
        out.push_str(&format!("    option {option};\n"));
    }
    out.push_str("  }\n");
    out
}

fn comments(doc: Option<&str>, indent: &str) -> String {
    doc_lines(doc)
        .into_iter()
        .map(|line| format!("{indent}// {line}\n"))
        .collect()
}

fn option_lines(options: &[String]) -> String {
    options
        .iter()
        .map(|option| format!("  option {option};\n"))
        .collect()
}

fn bracketed(options: &[String]) -> String {
    if options.is_empty() {
        String::new()
    } else {
        format!(" [{}]", options.join(", "))
    }
}

/// `buf.validate` field constraints for `rules` on a field of type `ty`.
fn validation_options(rules: &Validation, ty: &FieldType) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(n) = rules.min_length {
        out.push(format!("{VALIDATE}.string.min_len = {n}"));
    }
    if let Some(n) = rules.max_length {
        out.push(format!("{VALIDATE}.string.max_len = {n}"));
    }
    if let Some(pattern) = &rules.pattern {
        out.push(format!(
            "{VALIDATE}.string.pattern = \"{}\"",
            escape_string(pattern)
        ));
    }
    if let Some(rule) = rules.format.as_deref().and_then(string_format_rule) {
        out.push(format!("{VALIDATE}.string.{rule} = true"));
    }
    if let Some(p) = ty.as_primitive().filter(|p| p.is_integer() || p.is_float()) {
        let kind = scalar(p);
        let literal = |v: f64| {
            if p.is_integer() {
                format!("{}", v.trunc() as i64)
            } else {
                format!("{v}")
            }
        };
        if let Some(min) = rules.minimum {
            out.push(format!("{VALIDATE}.{kind}.gte = {}", literal(min)));
        }
        if let Some(max) = rules.maximum {
            out.push(format!("{VALIDATE}.{kind}.lte = {}", literal(max)));
        }
    }
    if ty.is_array() {
        if let Some(n) = rules.min_items {
            out.push(format!("{VALIDATE}.repeated.min_items = {n}"));
        }
        if let Some(n) = rules.max_items {
            out.push(format!("{VALIDATE}.repeated.max_items = {n}"));
        }
        if rules.unique_items {
            out.push(format!("{VALIDATE}.repeated.unique = true"));
        }
    }
    out
}

fn string_format_rule(format: &str) -> Option<&'static str> {
    Some(match format {
        "email" => "email",
        "uuid" => "uuid",
        "uri" | "url" => "uri",
        "hostname" => "hostname",
        "ipv4" => "ipv4",
        "ipv6" => "ipv6",
        _ => return None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::lower::lower;
    use typemux_common::{
        Argument, EnumDef, EnumValue, Field, Method, Schema, Service, UnionDef,
    };

    fn render_with(schema: &Schema, config: ProtobufConfig) -> Result<Rendered, GenerateError> {
        let lowering = lower(schema)?;
        ProtobufBackend::new(config).render(&lowering)
    }

    fn render(schema: &Schema) -> Result<String, GenerateError> {
        render_with(schema, ProtobufConfig::default()).map(|r| r.text())
    }

    fn string() -> FieldType {
        FieldType::primitive(Primitive::String)
    }

    fn int32() -> FieldType {
        FieldType::primitive(Primitive::Int32)
    }

    #[test]
    fn test_message_fields() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "User",
            vec![
                Field::new("id", string()).required(),
                Field::new("tags", FieldType::array(string())),
                Field::new("meta", FieldType::map(string(), string())),
                Field::new("nick", string().optional()),
            ],
        ));
        let out = render(&schema).unwrap();
        assert!(out.starts_with("// Generated Protobuf Schema\nsyntax = \"proto3\";\n\npackage api;\n\n"));
        assert!(out.contains(
            "message User {\n  string id = 1;\n  repeated string tags = 2;\n  map<string, string> meta = 3;\n  optional string nick = 4;\n}"
        ));
        assert!(!out.contains("import"));
        assert!(!out.contains("Entry"));
    }

    #[test]
    fn test_nested_map_is_native() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "Config",
            vec![Field::new("deep", FieldType::map(string(), FieldType::map(string(), int32())))],
        ));
        let out = render(&schema).unwrap();
        assert!(out.contains("  map<string, map<string, int32>> deep = 1;\n"));
        assert!(!out.contains("MapWrapper"));
    }

    #[test]
    fn test_field_numbering() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "T",
            vec![
                Field::new("a", string()),
                Field::new("b", string()),
                Field::new("c", string()).with_number(5),
                Field::new("d", string()),
                Field::new("e", string()),
            ],
        ));
        let out = render(&schema).unwrap();
        assert!(out.contains(
            "  string a = 1;\n  string b = 2;\n  string c = 5;\n  string d = 6;\n  string e = 7;\n"
        ));

        let clash = Schema::new(None).with_type(TypeDef::new(
            "T",
            vec![Field::new("a", string()), Field::new("b", string()).with_number(1)],
        ));
        assert_eq!(
            render(&clash).unwrap_err(),
            GenerateError::FieldNumberCollision {
                path: "T.b".to_string(),
                number: 1,
                claimed_by: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_enum_sentinel() {
        let schema = Schema::new(None).with_enum(EnumDef::new(
            "OrderStatus",
            vec![
                EnumValue::new("ACTIVE"),
                EnumValue::new("INACTIVE"),
                EnumValue::new("PENDING").with_number(5),
                EnumValue::new("ARCHIVED"),
            ],
        ));
        let out = render(&schema).unwrap();
        assert!(out.contains(
            "enum OrderStatus {\n  ORDER_STATUS_UNSPECIFIED = 0;\n  ACTIVE = 1;\n  INACTIVE = 2;\n  PENDING = 5;\n  ARCHIVED = 6;\n}"
        ));

        let zero = Schema::new(None).with_enum(EnumDef::new(
            "Status",
            vec![EnumValue::new("NONE").with_number(0)],
        ));
        assert_eq!(
            render(&zero).unwrap_err(),
            GenerateError::FieldNumberCollision {
                path: "Status.NONE".to_string(),
                number: 0,
                claimed_by: "STATUS_UNSPECIFIED".to_string(),
            }
        );
    }

    #[test]
    fn test_union_oneof() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Text", vec![Field::new("body", string())]))
            .with_type(TypeDef::new("Image", vec![Field::new("url", string())]))
            .with_type(TypeDef::new("VideoClip", vec![Field::new("url", string())]))
            .with_union(UnionDef::new("Message", ["Text", "Image", "VideoClip"]));
        let out = render(&schema).unwrap();
        assert!(out.contains(
            "message Message {\n  oneof value {\n    Text text = 1;\n    Image image = 2;\n    VideoClip video_clip = 3;\n  }\n}"
        ));
    }

    #[test]
    fn test_one_file_per_namespace() {
        let schema = Schema::new(Some("com.example.users"))
            .with_type(
                TypeDef::new(
                    "Address",
                    vec![Field::new("city", string())],
                )
                .in_namespace("com.example.common"),
            )
            .with_type(TypeDef::new(
                "User",
                vec![
                    Field::new("id", string()),
                    Field::new("address", FieldType::reference("com.example.common.Address")),
                    Field::new("created", FieldType::primitive(Primitive::Timestamp)),
                ],
            ));
        let rendered = render_with(&schema, ProtobufConfig::default()).unwrap();
        let packages: Vec<_> = rendered
            .files
            .iter()
            .map(|f| f.namespace.clone().unwrap())
            .collect();
        assert_eq!(packages, ["com.example.common", "com.example.users"]);

        let users = &rendered.files[1].contents;
        assert!(users.contains("package com.example.users;\n"));
        assert!(users.contains(
            "import \"com/example/common.proto\";\nimport \"google/protobuf/timestamp.proto\";\n"
        ));
        assert!(users.contains("  com.example.common.Address address = 2;\n"));
        assert!(users.contains("  google.protobuf.Timestamp created = 3;\n"));
        assert!(!rendered.files[0].contents.contains("import"));
    }

    #[test]
    fn test_argument_fields_become_rpcs() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Post", vec![Field::new("title", string())]))
            .with_type(TypeDef::new(
                "User",
                vec![
                    Field::new("id", string()),
                    Field::new("posts", FieldType::array(FieldType::reference("Post")))
                        .with_argument(Argument::new("limit", int32())),
                    Field::new("latestPost", FieldType::reference("Post"))
                        .with_argument(Argument::new("since", string())),
                    Field::new("name", string()),
                ],
            ));
        let out = render(&schema).unwrap();
        assert!(out.contains("message User {\n  string id = 1;\n  string name = 4;\n}"));

        let pinned = Schema::new(None).with_type(TypeDef::new(
            "Feed",
            vec![
                Field::new("items", FieldType::array(string()))
                    .with_argument(Argument::new("limit", int32())),
                Field::new("cursor", string()),
            ],
        ));
        let plain = Schema::new(None).with_type(TypeDef::new(
            "Feed",
            vec![
                Field::new("items", FieldType::array(string())),
                Field::new("cursor", string()),
            ],
        ));
        assert!(render(&pinned).unwrap().contains("  string cursor = 2;\n"));
        assert!(render(&plain).unwrap().contains("  string cursor = 2;\n"));
        assert!(out.contains("message UserPostsRequest {\n  int32 limit = 1;\n}"));
        assert!(out.contains("message UserPostsResponse {\n  repeated Post items = 1;\n}"));
        assert!(out.contains("message UserLatestPostRequest {\n  string since = 1;\n}"));
        assert!(out.contains(
            "service UserFieldService {\n  rpc GetUserPosts(UserPostsRequest) returns (UserPostsResponse);\n  rpc GetUserLatestPost(UserLatestPostRequest) returns (Post);\n}"
        ));
    }

    #[test]
    fn test_streaming_is_native() {
        let schema = Schema::new(None)
            .with_type(TypeDef::new("Req", vec![]))
            .with_type(TypeDef::new("Event", vec![]))
            .with_service(Service::new(
                "Feed",
                vec![
                    Method::new("Watch", "Req", "Event").streaming(false, true),
                    Method::new("Chat", "Req", "Event").streaming(true, true),
                ],
            ));
        let out = render(&schema).unwrap();
        assert!(out.contains("  rpc Watch(Req) returns (stream Event);\n"));
        assert!(out.contains("  rpc Chat(stream Req) returns (stream Event);\n"));
    }

    #[test]
    fn test_validation_deprecation_and_options() {
        let mut schema = Schema::new(Some("shop")).with_type(TypeDef::new(
            "Product",
            vec![
                {
                    let mut f = Field::new("sku", string());
                    f.validation = Some(Validation {
                        min_length: Some(3),
                        pattern: Some("^[A-Z]+$".to_string()),
                        ..Validation::default()
                    });
                    f
                },
                {
                    let mut f = Field::new("qty", int32());
                    f.validation = Some(Validation {
                        minimum: Some(1.0),
                        ..Validation::default()
                    });
                    f
                },
                {
                    let mut f = Field::new("code", string()).deprecated("Use sku");
                    if let Some(dep) = f.deprecated.as_mut() {
                        dep.since = Some("2.0".to_string());
                        dep.removed = Some("3.0".to_string());
                    }
                    f
                },
            ],
        ));
        schema
            .annotations
            .protobuf
            .options
            .push("go_package = \"example.com/shop\"".to_string());
        schema.types[0].overrides.protobuf.name = Some("Item".to_string());

        let out = render_with(
            &schema,
            ProtobufConfig {
                import_buf_validate: true,
            },
        )
        .unwrap()
        .text();
        assert!(out.contains("package shop;\n\noption go_package = \"example.com/shop\";\n\nimport \"buf/validate/validate.proto\";\n"));
        assert!(out.contains("message Item {\n"));
        assert!(out.contains(
            "  string sku = 1 [(buf.validate.field).string.min_len = 3, (buf.validate.field).string.pattern = \"^[A-Z]+$\"];\n"
        ));
        assert!(out.contains("  int32 qty = 2 [(buf.validate.field).int32.gte = 1];\n"));
        assert!(out.contains(
            "  // DEPRECATED (since 2.0) - will be removed in 3.0\n  // Use sku\n  string code = 3 [deprecated = true];\n"
        ));
    }
}
