//! HTTP-spec backend (OpenAPI 3.0, YAML).
//!
//! Declarations become `components.schemas`, service methods become paths, and
//! fields with arguments become `GET` sub-resource paths whose arguments are
//! query parameters. The document is flat: namespaces are not rendered.

mod document;

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};
use typemux_common::naming::{capitalize_first, to_kebab_case};
use typemux_common::{Field, FieldType, Format, Primitive, TypeDef, TypeKind};

use super::{Backend, Rendered, reject_streaming, visible_fields};
use crate::config::OpenapiConfig;
use crate::error::GenerateError;
use crate::lower::{DeclKind, DeclRef, ElementId, Lowering};

pub use document::{
    Components, Discriminator, Document, Extensions, Info, MediaType, Operation, Parameter,
    ParameterLocation, RequestBody, Response, Schema,
};
use document::{json_content, number};

const FORMAT: Format = Format::Openapi;
const DEFAULT_TITLE: &str = "Generated API";
const DEFAULT_VERSION: &str = "1.0.0";

/// Renders the schema as OpenAPI 3 YAML.
#[derive(Debug, Clone)]
pub struct OpenapiBackend {
    config: OpenapiConfig,
}

impl OpenapiBackend {
    /// A backend using the `openapi` config section.
    pub const fn new(config: OpenapiConfig) -> Self {
        Self { config }
    }

    /// Build the document without serializing it.
    pub fn document(&self, lowering: &Lowering<'_>) -> Result<Document, GenerateError> {
        reject_streaming(lowering, FORMAT)?;
        let renderer = Renderer { lowering };
        let mut document = Document {
            openapi: self.config.version.clone(),
            info: self.info(lowering),
            paths: BTreeMap::new(),
            components: Components::default(),
        };
        renderer.add_components(&mut document.components)?;
        renderer.add_service_paths(&mut document.paths)?;
        renderer.add_field_argument_paths(&mut document.paths)?;
        debug!(
            schemas = document.components.schemas.len(),
            paths = document.paths.len(),
            "built openapi document"
        );
        Ok(document)
    }

    fn info(&self, lowering: &Lowering<'_>) -> Info {
        let schema = lowering.schema();
        let mut info = Info {
            title: schema
                .default_namespace()
                .map_or_else(|| DEFAULT_TITLE.to_string(), |ns| format!("{ns} API")),
            version: DEFAULT_VERSION.to_string(),
            description: None,
            extensions: Extensions::new(),
        };
        for entry in schema.annotations.options(FORMAT) {
            if entry.trim_start().starts_with('{') {
                info.extensions.extend(parse_extensions(entry));
                continue;
            }
            let Some((key, value)) = entry.split_once(':') else {
                warn!(annotation = %entry, "ignoring openapi annotation without a key");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "title" => info.title = value.to_string(),
                "version" => info.version = value.to_string(),
                "description" => info.description = Some(value.to_string()),
                _ if key.starts_with("x-") => {
                    info.extensions.insert(key.to_string(), scalar_value(value));
                }
                _ => warn!(key = %key, "ignoring unknown openapi info key"),
            }
        }
        if let Some(title) = &self.config.title {
            info.title.clone_from(title);
        }
        info
    }
}

impl Backend for OpenapiBackend {
    fn format(&self) -> Format {
        FORMAT
    }

    fn render(&self, lowering: &Lowering<'_>) -> Result<Rendered, GenerateError> {
        let document = self.document(lowering)?;
        serde_yaml::to_string(&document)
            .map(Rendered::single)
            .map_err(|e| GenerateError::precondition("openapi", format!("Failed to serialize document: {e}")))
    }
}

struct Renderer<'a, 's> {
    lowering: &'a Lowering<'s>,
}

const fn decl(kind: DeclKind, index: usize) -> DeclRef {
    DeclRef { kind, index }
}

/// The document is flat, so a later declaration with the same name from
/// another namespace wins. Returns whether an earlier schema was replaced.
fn insert_component(components: &mut Components, name: &str, schema: Schema) -> bool {
    let replaced = components.schemas.insert(name.to_string(), schema).is_some();
    if replaced {
        warn!(schema = name, "component schema replaced by a later declaration of the same name");
    }
    replaced
}

impl Renderer<'_, '_> {
    fn schema_name(&self, r: DeclRef) -> &str {
        self.lowering.decl_name(r, FORMAT)
    }

    fn add_components(&self, components: &mut Components) -> Result<(), GenerateError> {
        let schema = self.lowering.schema();

        for (index, e) in schema.enums.iter().enumerate() {
            let r = decl(DeclKind::Enum, index);
            let mut out = Schema::typed("string");
            out.description = e.doc.for_format(FORMAT).map(str::to_string);
            out.enum_values = e
                .values
                .iter()
                .enumerate()
                .map(|(vi, v)| {
                    self.lowering
                        .overrides(ElementId::EnumValue(index, vi))
                        .name(FORMAT)
                        .unwrap_or(&v.name)
                        .to_string()
                })
                .collect();
            out.extensions = extensions_of(self.lowering.overrides(r.element()).options(FORMAT));
            insert_component(components, self.schema_name(r), out);
        }

        for (index, ty) in schema.types.iter().enumerate() {
            let r = decl(DeclKind::Type, index);
            let out = self.object_schema(ty, Some(index))?;
            insert_component(components, self.schema_name(r), out);
        }

        // Argument requests are spelled out as query parameters; only the
        // response wrappers are referenced from the document.
        for args in self.lowering.argument_types() {
            if let Some(response) = &args.response {
                let out = self.object_schema(response, None)?;
                insert_component(components, &response.name, out);
            }
        }

        for (index, union) in schema.unions.iter().enumerate() {
            let r = decl(DeclKind::Union, index);
            let ns = schema.namespace_of(union);
            let mut out = Schema {
                description: union.doc.for_format(FORMAT).map(str::to_string),
                extensions: extensions_of(self.lowering.overrides(r.element()).options(FORMAT)),
                ..Schema::default()
            };
            let mut mapping = BTreeMap::new();
            for option in &union.options {
                let target = self
                    .lowering
                    .resolve(option, ns, &format!("{}.{option}", union.name))?;
                let name = self.schema_name(target);
                let option_schema = Schema::reference(name);
                if let Some(reference) = &option_schema.reference {
                    mapping.insert(name.to_string(), reference.clone());
                }
                out.one_of.push(option_schema);
            }
            out.discriminator = Some(Discriminator {
                property_name: "type".to_string(),
                mapping,
            });
            insert_component(components, self.schema_name(r), out);
        }
        Ok(())
    }

    /// `type: object` schema of a declared (`index` set) or synthesized Type.
    fn object_schema(&self, ty: &TypeDef, index: Option<usize>) -> Result<Schema, GenerateError> {
        let ns = self.lowering.schema().namespace_of(ty);
        let mut out = Schema::typed("object");
        out.description = ty.doc.for_format(FORMAT).map(str::to_string);
        if let Some(ti) = index {
            out.extensions = extensions_of(self.lowering.overrides(ElementId::Type(ti)).options(FORMAT));
        }

        for (fi, field) in visible_fields(&ty.name, &ty.fields, FORMAT)? {
            // becomes a sub-resource path
            if !field.arguments.is_empty() {
                continue;
            }
            let path = format!("{}.{}", ty.name, field.name);
            let overrides = index.map(|ti| self.lowering.overrides(ElementId::Field(ti, fi)));
            let name = overrides
                .and_then(|o| o.name(FORMAT))
                .unwrap_or(&field.name)
                .to_string();
            let mut property = self.property(field, ns, &path)?;
            if let Some(o) = overrides {
                property.extensions.extend(extensions_of(o.options(FORMAT)));
            }
            if field.is_non_null() {
                out.required.push(name.clone());
            }
            out.properties.insert(name, property);
        }
        Ok(out)
    }

    fn property(&self, field: &Field, ns: Option<&str>, path: &str) -> Result<Schema, GenerateError> {
        let mut property = self.type_schema(&field.ty, ns, path)?;
        // siblings of `$ref` are ignored by OpenAPI 3.0
        if property.is_reference() {
            return Ok(property);
        }

        let mut description = field.doc.for_format(FORMAT).map(str::to_string);
        if description.is_none() && field.ty.is_map() {
            description = Some(map_description(&field.ty));
        }
        if let Some(dep) = &field.deprecated {
            property.deprecated = true;
            let mut note = String::from("**DEPRECATED**");
            if let Some(since) = &dep.since {
                note.push_str(&format!(" (since {since})"));
            }
            if let Some(removed) = &dep.removed {
                note.push_str(&format!(" - will be removed in {removed}"));
            }
            if let Some(reason) = &dep.reason {
                note.push_str(&format!(": {reason}"));
            }
            description = Some(match description {
                Some(d) => format!("{d}\n\n{note}"),
                None => note,
            });
        }
        property.description = description;
        property.nullable = field.ty.optional;

        if let (Some(default), Some(p)) = (&field.default, field.ty.as_primitive()) {
            property.default = Some(default_value(default, p));
        }
        if let Some(rules) = &field.validation {
            if rules.min_length.is_some() {
                property.min_length = rules.min_length;
            }
            if rules.max_length.is_some() {
                property.max_length = rules.max_length;
            }
            if rules.pattern.is_some() {
                property.pattern.clone_from(&rules.pattern);
            }
            if rules.format.is_some() {
                property.format.clone_from(&rules.format);
            }
            if let Some(min) = rules.minimum {
                property.minimum = number(min);
            }
            if let Some(max) = rules.maximum {
                property.maximum = number(max);
            }
            property.min_items = rules.min_items;
            property.max_items = rules.max_items;
            property.unique_items = rules.unique_items;
        }
        Ok(property)
    }

    fn type_schema(&self, ty: &FieldType, ns: Option<&str>, path: &str) -> Result<Schema, GenerateError> {
        Ok(match &ty.kind {
            TypeKind::Primitive { name } => primitive_schema(*name),
            TypeKind::Reference { name } => {
                let r = self.lowering.resolve(name, ns, path)?;
                Schema::reference(self.schema_name(r))
            }
            TypeKind::Array { items } => Schema {
                items: Some(Box::new(self.type_schema(items, ns, path)?)),
                ..Schema::typed("array")
            },
            TypeKind::Map { value, .. } => Schema {
                additional_properties: Some(Box::new(self.type_schema(value, ns, path)?)),
                ..Schema::typed("object")
            },
        })
    }

    fn add_service_paths(&self, paths: &mut BTreeMap<String, document::PathItem>) -> Result<(), GenerateError> {
        let schema = self.lowering.schema();
        for (si, service) in schema.services.iter().enumerate() {
            let ns = schema.namespace_of(service);
            for (mi, method) in service.methods.iter().enumerate() {
                let path = format!("{}.{}", service.name, method.name);
                let overrides = self.lowering.overrides(ElementId::Method(si, mi));
                let input = self.lowering.resolve(&method.input, ns, &path)?;
                let output = self.lowering.resolve(&method.output, ns, &path)?;
                let output_schema = Schema::reference(self.schema_name(output));

                let route = method.path_template.clone().unwrap_or_else(|| {
                    format!(
                        "/{}/{}",
                        service.name.to_lowercase(),
                        method.name.to_lowercase()
                    )
                });
                let verb = method.effective_http_method();

                let mut responses = BTreeMap::new();
                responses.insert(
                    "200".to_string(),
                    Response::json("Successful response", output_schema.clone()),
                );
                for code in &method.success_codes {
                    responses.insert(
                        code.to_string(),
                        Response::json(success_description(*code), output_schema.clone()),
                    );
                }
                for code in &method.error_codes {
                    responses.insert(
                        code.to_string(),
                        Response::json(error_description(*code), error_body()),
                    );
                }

                let operation = Operation {
                    summary: format!("{} operation", method.name),
                    description: method.doc.for_format(FORMAT).map(str::to_string),
                    operation_id: overrides.name(FORMAT).unwrap_or(&method.name).to_string(),
                    parameters: path_parameters(&route),
                    request_body: verb.has_body().then(|| RequestBody {
                        required: true,
                        content: json_content(Schema::reference(self.schema_name(input))),
                    }),
                    responses,
                    extensions: extensions_of(overrides.options(FORMAT)),
                };
                paths
                    .entry(route)
                    .or_default()
                    .insert(verb.as_lower().to_string(), operation);
            }
        }
        Ok(())
    }

    fn add_field_argument_paths(
        &self,
        paths: &mut BTreeMap<String, document::PathItem>,
    ) -> Result<(), GenerateError> {
        let schema = self.lowering.schema();
        for (ti, ty) in schema.types.iter().enumerate() {
            let ns = schema.namespace_of(ty);
            let type_name = self.schema_name(decl(DeclKind::Type, ti));
            let top_level = matches!(ty.name.as_str(), "Query" | "Mutation");
            let id_field = if top_level { None } else { find_id_field(ty) };

            for (fi, field) in visible_fields(&ty.name, &ty.fields, FORMAT)? {
                if field.arguments.is_empty() {
                    continue;
                }
                let path = format!("{}.{}", ty.name, field.name);
                let args = self.lowering.arguments_for(ti, fi).ok_or_else(|| {
                    GenerateError::precondition(&path, "field arguments were not lowered")
                })?;

                let segment = to_kebab_case(&field.name);
                let route = match (top_level, id_field) {
                    (true, _) => format!("/{segment}"),
                    (false, Some(id)) => format!("/{}/{{{id}}}/{segment}", to_kebab_case(type_name)),
                    (false, None) => format!("/{}/{segment}", to_kebab_case(type_name)),
                };

                let mut parameters = Vec::new();
                if let Some(id) = id_field {
                    parameters.push(Parameter::path(id));
                }
                for arg in &args.request.fields {
                    let mut param_schema = parameter_schema(&arg.ty);
                    if let (Some(default), Some(p)) = (&arg.default, arg.ty.as_primitive()) {
                        param_schema.default = Some(default_value(default, p));
                    }
                    parameters.push(Parameter {
                        name: arg.name.clone(),
                        location: ParameterLocation::Query,
                        required: arg.required,
                        description: arg.doc.for_format(FORMAT).map(str::to_string),
                        schema: param_schema,
                    });
                }

                let result = match &args.response {
                    Some(response) => Schema::reference(&response.name),
                    None => self.type_schema(&field.ty, ns, &path)?,
                };
                let operation = Operation {
                    summary: format!("Get {} for {}", field.name, ty.name),
                    description: field.doc.for_format(FORMAT).map(str::to_string),
                    operation_id: format!("Get{}{}", ty.name, capitalize_first(&field.name)),
                    parameters,
                    request_body: None,
                    responses: BTreeMap::from([(
                        "200".to_string(),
                        Response::json("Successful response", result),
                    )]),
                    extensions: Extensions::new(),
                };
                paths
                    .entry(route)
                    .or_default()
                    .insert("get".to_string(), operation);
            }
        }
        Ok(())
    }
}

fn primitive_schema(p: Primitive) -> Schema {
    let (schema_type, format) = match p {
        Primitive::String => ("string", None),
        Primitive::Int32 | Primitive::Uint8 | Primitive::Uint16 => ("integer", Some("int32")),
        Primitive::Int64 | Primitive::Uint32 | Primitive::Uint64 => ("integer", Some("int64")),
        Primitive::Float32 => ("number", Some("float")),
        Primitive::Float64 => ("number", Some("double")),
        Primitive::Bool => ("boolean", None),
        Primitive::Timestamp => ("string", Some("date-time")),
        Primitive::Bytes => ("string", Some("byte")),
    };
    Schema {
        format: format.map(str::to_string),
        minimum: if p.is_unsigned() { number(0.0) } else { None },
        ..Schema::typed(schema_type)
    }
}

/// Query parameters are scalars; references fall back to `string`.
fn parameter_schema(ty: &FieldType) -> Schema {
    match ty.as_primitive() {
        Some(p) => Schema {
            minimum: None,
            ..primitive_schema(p)
        },
        None => Schema::typed("string"),
    }
}

/// `Map of string to map<...>` style description of a map field.
fn map_description(ty: &FieldType) -> String {
    match &ty.kind {
        TypeKind::Map { key, value } => {
            let value = if value.is_map() {
                map_description(value)
            } else {
                spelling(value)
            };
            format!("Map of {} to {value}", spelling(key))
        }
        _ => spelling(ty),
    }
}

fn spelling(ty: &FieldType) -> String {
    match &ty.kind {
        TypeKind::Primitive { name } => name.as_str().to_string(),
        TypeKind::Reference { name } => name.clone(),
        TypeKind::Array { items } => format!("[]{}", spelling(items)),
        TypeKind::Map { .. } => map_description(ty),
    }
}

/// Default value typed after the field's primitive.
fn default_value(raw: &str, p: Primitive) -> Value {
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    if p.is_integer() {
        if let Ok(n) = unquoted.parse::<i64>() {
            return Value::from(n);
        }
    } else if p.is_float() {
        if let Some(n) = unquoted.parse::<f64>().ok().and_then(number) {
            return Value::Number(n);
        }
    } else if p == Primitive::Bool {
        return Value::Bool(unquoted == "true");
    }
    Value::String(unquoted.to_string())
}

/// `id`, else the first `...Id`/`...ID` field.
fn find_id_field(ty: &TypeDef) -> Option<&str> {
    ty.fields
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case("id"))
        .or_else(|| {
            ty.fields
                .iter()
                .find(|f| f.name.ends_with("Id") || f.name.ends_with("ID"))
        })
        .map(|f| f.name.as_str())
}

/// `{name}` placeholders of a path template.
fn path_parameters(route: &str) -> Vec<Parameter> {
    let mut params = Vec::new();
    let mut rest = route;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        params.push(Parameter::path(&rest[start + 1..start + 1 + len]));
        rest = &rest[start + 1 + len + 1..];
    }
    params
}

fn error_body() -> Schema {
    let field = |description: &str| Schema {
        description: Some(description.to_string()),
        ..Schema::typed("string")
    };
    Schema {
        properties: BTreeMap::from([
            ("code".to_string(), field("Error code")),
            ("error".to_string(), field("Error message")),
        ]),
        ..Schema::typed("object")
    }
}

fn success_description(code: u16) -> String {
    match code {
        200 => "OK - Successful response".to_string(),
        201 => "Created - Resource created successfully".to_string(),
        202 => "Accepted - Request accepted for processing".to_string(),
        204 => "No Content - Successful request with no response body".to_string(),
        206 => "Partial Content - Partial resource returned".to_string(),
        _ => format!("Success response ({code})"),
    }
}

fn error_description(code: u16) -> String {
    match code {
        400 => "Bad Request - Invalid input parameters".to_string(),
        401 => "Unauthorized - Authentication required".to_string(),
        403 => "Forbidden - Insufficient permissions".to_string(),
        404 => "Not Found - Resource not found".to_string(),
        409 => "Conflict - Resource already exists or conflict".to_string(),
        422 => "Unprocessable Entity - Validation error".to_string(),
        429 => "Too Many Requests - Rate limit exceeded".to_string(),
        500 => "Internal Server Error".to_string(),
        502 => "Bad Gateway".to_string(),
        503 => "Service Unavailable".to_string(),
        504 => "Gateway Timeout".to_string(),
        _ => format!("Error response ({code})"),
    }
}

/// Extension entries from override options: JSON objects or `key: value` lines.
fn extensions_of(options: &[String]) -> Extensions {
    let mut out = Extensions::new();
    for option in options {
        if option.trim_start().starts_with('{') {
            out.extend(parse_extensions(option));
        } else if let Some((key, value)) = option.split_once(':') {
            out.insert(key.trim().to_string(), scalar_value(value.trim()));
        } else {
            warn!(option = %option, "ignoring openapi option without a key");
        }
    }
    out
}

fn parse_extensions(json: &str) -> Extensions {
    match serde_json::from_str::<serde_json::Map<String, Value>>(json) {
        Ok(map) => map.into_iter().collect(),
        Err(e) => {
            warn!(error = %e, "ignoring openapi extension that is not a JSON object");
            Extensions::new()
        }
    }
}

/// A JSON literal if `raw` is one, else the raw string.
fn scalar_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::lower::lower;
    use serde_yaml::Value as Yaml;
    use typemux_common::{
        Argument, EnumDef, EnumValue, HttpMethod, Method, Schema as Ir, Service, UnionDef,
    };

    fn render(schema: &Ir) -> Result<Yaml, GenerateError> {
        render_with(schema, OpenapiConfig::default())
    }

    fn render_with(schema: &Ir, config: OpenapiConfig) -> Result<Yaml, GenerateError> {
        let lowering = lower(schema)?;
        let text = OpenapiBackend::new(config).render(&lowering)?.text();
        Ok(serde_yaml::from_str(&text).unwrap())
    }

    fn string() -> FieldType {
        FieldType::primitive(Primitive::String)
    }

    fn component<'y>(doc: &'y Yaml, name: &str) -> &'y Yaml {
        &doc["components"]["schemas"][name]
    }

    #[test]
    fn test_same_name_across_namespaces_keeps_last() {
        let schema = Ir::new(Some("shop"))
            .with_type(
                TypeDef::new("User", vec![Field::new("legacy", string())]).in_namespace("old"),
            )
            .with_type(TypeDef::new("User", vec![Field::new("email", string())]));
        let doc = render(&schema).unwrap();
        let user = component(&doc, "User");
        assert_eq!(user["properties"]["email"]["type"], Yaml::from("string"));
        assert!(user["properties"]["legacy"].is_null());

        let mut components = Components::default();
        assert!(!insert_component(&mut components, "User", Schema::typed("object")));
        assert!(insert_component(&mut components, "User", Schema::typed("object")));
    }

    #[test]
    fn test_document_header() {
        let doc = render(&Ir::new(None)).unwrap();
        assert_eq!(doc["openapi"], Yaml::from("3.0.0"));
        assert_eq!(doc["info"]["title"], Yaml::from("Generated API"));
        assert_eq!(doc["info"]["version"], Yaml::from("1.0.0"));

        let mut named = Ir::new(Some("shop"));
        named.annotations.openapi.options.extend([
            "version: 2.1.0".to_string(),
            "description: Shop backend".to_string(),
            "x-audience: internal".to_string(),
        ]);
        let doc = render(&named).unwrap();
        assert_eq!(doc["info"]["title"], Yaml::from("shop API"));
        assert_eq!(doc["info"]["version"], Yaml::from("2.1.0"));
        assert_eq!(doc["info"]["description"], Yaml::from("Shop backend"));
        assert_eq!(doc["info"]["x-audience"], Yaml::from("internal"));

        let doc = render_with(
            &named,
            OpenapiConfig {
                title: Some("Storefront".to_string()),
                ..OpenapiConfig::default()
            },
        )
        .unwrap();
        assert_eq!(doc["info"]["title"], Yaml::from("Storefront"));
    }

    #[test]
    fn test_object_schema() {
        let schema = Ir::new(None).with_type(TypeDef::new(
            "User",
            vec![
                Field::new("id", string()).required(),
                Field::new("tags", FieldType::array(string())),
                Field::new("meta", FieldType::map(string(), string())),
                Field::new("age", FieldType::primitive(Primitive::Uint8)),
                Field::new("nick", string().optional()),
            ],
        ));
        let doc = render(&schema).unwrap();
        let user = component(&doc, "User");
        assert_eq!(user["type"], Yaml::from("object"));
        assert_eq!(user["required"], serde_yaml::from_str::<Yaml>("[id]").unwrap());
        assert_eq!(user["properties"]["tags"]["type"], Yaml::from("array"));
        assert_eq!(user["properties"]["tags"]["items"]["type"], Yaml::from("string"));
        let meta = &user["properties"]["meta"];
        assert_eq!(meta["type"], Yaml::from("object"));
        assert_eq!(meta["additionalProperties"]["type"], Yaml::from("string"));
        assert_eq!(meta["description"], Yaml::from("Map of string to string"));
        assert_eq!(user["properties"]["age"]["format"], Yaml::from("int32"));
        assert_eq!(user["properties"]["age"]["minimum"], Yaml::from(0));
        assert_eq!(user["properties"]["nick"]["nullable"], Yaml::from(true));
    }

    #[test]
    fn test_nested_map_mirrors_each_level() {
        let schema = Ir::new(None).with_type(TypeDef::new(
            "Config",
            vec![Field::new(
                "deep",
                FieldType::map(string(), FieldType::map(string(), FieldType::primitive(Primitive::Int32))),
            )],
        ));
        let doc = render(&schema).unwrap();
        let deep = &component(&doc, "Config")["properties"]["deep"];
        assert_eq!(deep["additionalProperties"]["type"], Yaml::from("object"));
        assert_eq!(
            deep["additionalProperties"]["additionalProperties"]["format"],
            Yaml::from("int32")
        );
        assert_eq!(
            deep["description"],
            Yaml::from("Map of string to Map of string to int32")
        );
        assert!(doc["components"]["schemas"].get("MapWrapper0").is_none());
    }

    #[test]
    fn test_enum_union_and_deprecation() {
        let schema = Ir::new(None)
            .with_enum(EnumDef::new("Status", vec![EnumValue::new("ACTIVE"), EnumValue::new("GONE")]))
            .with_type(TypeDef::new("Text", vec![Field::new("body", string())]))
            .with_type(TypeDef::new("Image", vec![Field::new("url", string())]))
            .with_type(TypeDef::new(
                "Post",
                vec![
                    Field::new("status", FieldType::reference("Status")),
                    {
                        let mut f = Field::new("legacy", string()).deprecated("Use status");
                        if let Some(dep) = f.deprecated.as_mut() {
                            dep.since = Some("2.0".to_string());
                        }
                        f
                    },
                ],
            ))
            .with_union(UnionDef::new("Message", ["Text", "Image"]));
        let doc = render(&schema).unwrap();
        assert_eq!(
            component(&doc, "Status")["enum"],
            serde_yaml::from_str::<Yaml>("[ACTIVE, GONE]").unwrap()
        );
        let message = component(&doc, "Message");
        let one_of = message["oneOf"].as_sequence().unwrap();
        assert_eq!(one_of.len(), 2);
        assert_eq!(one_of[0]["$ref"], Yaml::from("#/components/schemas/Text"));
        assert_eq!(one_of[1]["$ref"], Yaml::from("#/components/schemas/Image"));
        assert_eq!(message["discriminator"]["propertyName"], Yaml::from("type"));

        let post = component(&doc, "Post");
        assert_eq!(post["properties"]["status"]["$ref"], Yaml::from("#/components/schemas/Status"));
        let legacy = &post["properties"]["legacy"];
        assert_eq!(legacy["deprecated"], Yaml::from(true));
        assert_eq!(
            legacy["description"],
            Yaml::from("**DEPRECATED** (since 2.0): Use status")
        );
    }

    #[test]
    fn test_service_paths() {
        let mut create = Method::new("CreateUser", "CreateUserRequest", "User");
        create.error_codes = vec![409];
        create.success_codes = vec![201];
        let mut fetch = Method::new("GetUser", "GetUserRequest", "User");
        fetch.path_template = Some("/users/{id}".to_string());
        let mut remove = Method::new("RemoveUser", "GetUserRequest", "User");
        remove.http_method = Some(HttpMethod::Delete);
        let schema = Ir::new(None)
            .with_type(TypeDef::new("User", vec![Field::new("id", string())]))
            .with_type(TypeDef::new("CreateUserRequest", vec![Field::new("name", string())]))
            .with_type(TypeDef::new("GetUserRequest", vec![Field::new("id", string())]))
            .with_service(Service::new("UserService", vec![create, fetch, remove]));
        let doc = render(&schema).unwrap();

        let post = &doc["paths"]["/userservice/createuser"]["post"];
        assert_eq!(post["operationId"], Yaml::from("CreateUser"));
        assert_eq!(
            post["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            Yaml::from("#/components/schemas/CreateUserRequest")
        );
        assert_eq!(
            post["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            Yaml::from("#/components/schemas/User")
        );
        assert_eq!(
            post["responses"]["201"]["description"],
            Yaml::from("Created - Resource created successfully")
        );
        assert_eq!(
            post["responses"]["409"]["content"]["application/json"]["schema"]["properties"]["error"]["type"],
            Yaml::from("string")
        );

        let get = &doc["paths"]["/users/{id}"]["get"];
        assert_eq!(get["parameters"][0]["name"], Yaml::from("id"));
        assert_eq!(get["parameters"][0]["in"], Yaml::from("path"));
        assert!(get.get("requestBody").is_none());

        assert!(doc["paths"]["/userservice/removeuser"].get("delete").is_some());
    }

    #[test]
    fn test_field_argument_paths() {
        let schema = Ir::new(None)
            .with_type(TypeDef::new("Post", vec![Field::new("title", string())]))
            .with_type(TypeDef::new(
                "UserProfile",
                vec![
                    Field::new("userId", string()).required(),
                    Field::new("recentPosts", FieldType::array(FieldType::reference("Post")))
                        .with_argument(
                            Argument::new("limit", FieldType::primitive(Primitive::Int32))
                                .with_default("10"),
                        ),
                ],
            ))
            .with_type(TypeDef::new(
                "Query",
                vec![Field::new("search", FieldType::reference("Post"))
                    .with_argument(Argument::new("term", string()).required())],
            ));
        let doc = render(&schema).unwrap();

        let profile = component(&doc, "UserProfile");
        assert!(profile["properties"].get("recentPosts").is_none());

        let get = &doc["paths"]["/user-profile/{userId}/recent-posts"]["get"];
        assert_eq!(get["operationId"], Yaml::from("GetUserProfileRecentPosts"));
        assert_eq!(get["summary"], Yaml::from("Get recentPosts for UserProfile"));
        assert_eq!(get["parameters"][0]["in"], Yaml::from("path"));
        assert_eq!(get["parameters"][1]["name"], Yaml::from("limit"));
        assert_eq!(get["parameters"][1]["in"], Yaml::from("query"));
        assert_eq!(get["parameters"][1]["schema"]["default"], Yaml::from(10));
        assert_eq!(
            get["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            Yaml::from("#/components/schemas/UserProfileRecentPostsResponse")
        );
        assert_eq!(
            component(&doc, "UserProfileRecentPostsResponse")["properties"]["items"]["type"],
            Yaml::from("array")
        );

        let search = &doc["paths"]["/search"]["get"];
        assert_eq!(search["parameters"][0]["required"], Yaml::from(true));
        assert_eq!(
            search["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            Yaml::from("#/components/schemas/Post")
        );
    }

    #[test]
    fn test_streaming_rejected() {
        let schema = Ir::new(None)
            .with_type(TypeDef::new("Req", vec![]))
            .with_type(TypeDef::new("Event", vec![]))
            .with_service(Service::new(
                "UserService",
                vec![Method::new("Watch", "Req", "Event").streaming(false, true)],
            ));
        let err = render(&schema).unwrap_err();
        assert_eq!(
            err.to_string(),
            "UserService.Watch: streaming methods cannot be represented in openapi output"
        );
    }
}
