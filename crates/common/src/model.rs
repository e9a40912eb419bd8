//! Schema IR: declarations, fields and the recursive field type expression.
//!
//! Every collection keeps declaration order. Nothing in this module sorts or
//! hashes, so downstream passes can rely on the order the parser produced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::Format;

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// UTF-8 text.
    String,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Single-precision float.
    Float32,
    /// Double-precision float.
    Float64,
    /// Boolean.
    Bool,
    /// Point in time.
    Timestamp,
    /// Opaque byte string.
    Bytes,
}

impl Primitive {
    /// IDL spelling of the primitive.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Timestamp => "timestamp",
            Self::Bytes => "bytes",
        }
    }

    /// Signed or unsigned integer of any width.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64
        )
    }

    /// Unsigned integer of any width.
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64)
    }

    /// `float32` or `float64`.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether the primitive may key a map. Only strings and integers can.
    pub const fn is_valid_map_key(self) -> bool {
        matches!(self, Self::String) || self.is_integer()
    }
}

/// A type expression. `optional` is orthogonal to the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    /// Shape of the expression.
    #[serde(flatten)]
    pub kind: TypeKind,
    /// The `optional` qualifier.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// The closed set of type expression shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// A built-in scalar.
    Primitive {
        /// The scalar kind.
        name: Primitive,
    },
    /// A declared Type, Enum or Union, simple or namespace-qualified.
    Reference {
        /// Simple or qualified declaration name.
        name: String,
    },
    /// A list of `items`.
    Array {
        /// Element type.
        items: Box<FieldType>,
    },
    /// A map. The key must lower to a string or integer primitive.
    Map {
        /// Key type.
        key: Box<FieldType>,
        /// Value type, possibly another map.
        value: Box<FieldType>,
    },
}

impl FieldType {
    /// A primitive type.
    pub const fn primitive(name: Primitive) -> Self {
        Self {
            kind: TypeKind::Primitive { name },
            optional: false,
        }
    }

    /// A reference to a declared Type, Enum or Union.
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Reference { name: name.into() },
            optional: false,
        }
    }

    /// A list of `items`.
    pub fn array(items: Self) -> Self {
        Self {
            kind: TypeKind::Array {
                items: Box::new(items),
            },
            optional: false,
        }
    }

    /// A `key` to `value` map.
    pub fn map(key: Self, value: Self) -> Self {
        Self {
            kind: TypeKind::Map {
                key: Box::new(key),
                value: Box::new(value),
            },
            optional: false,
        }
    }

    /// Mark the type with the `optional` qualifier.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The primitive kind, for primitive expressions.
    pub const fn as_primitive(&self) -> Option<Primitive> {
        match self.kind {
            TypeKind::Primitive { name } => Some(name),
            _ => None,
        }
    }

    /// Whether the expression is an array.
    pub const fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    /// Whether the expression is a map.
    pub const fn is_map(&self) -> bool {
        matches!(self.kind, TypeKind::Map { .. })
    }

    /// Names of every Reference in the expression, depth-first.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            TypeKind::Primitive { .. } => {}
            TypeKind::Reference { name } => out.push(name),
            TypeKind::Array { items } => items.collect_references(out),
            TypeKind::Map { key, value } => {
                key.collect_references(out);
                value.collect_references(out);
            }
        }
    }
}

/// Per-format rename plus free-form options.
///
/// `options` are proto field/message options, GraphQL directives, OpenAPI
/// `x-` extensions or extra Go struct tags, depending on the format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOverride {
    /// Replacement name for the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form options, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FormatOverride {
    /// No rename and no options.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.options.is_empty()
    }
}

/// Overrides for every format, already merged onto an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    /// Query-schema overrides.
    #[serde(default, skip_serializing_if = "FormatOverride::is_empty")]
    pub graphql: FormatOverride,
    /// Wire-format overrides.
    #[serde(default, skip_serializing_if = "FormatOverride::is_empty")]
    pub protobuf: FormatOverride,
    /// HTTP-spec overrides.
    #[serde(default, skip_serializing_if = "FormatOverride::is_empty")]
    pub openapi: FormatOverride,
    /// Go overrides.
    #[serde(default, skip_serializing_if = "FormatOverride::is_empty")]
    pub go: FormatOverride,
}

impl Overrides {
    /// Overrides for `format`.
    pub const fn get(&self, format: Format) -> &FormatOverride {
        match format {
            Format::Graphql => &self.graphql,
            Format::Protobuf => &self.protobuf,
            Format::Openapi => &self.openapi,
            Format::Go => &self.go,
        }
    }

    /// Mutable overrides for `format`.
    pub const fn get_mut(&mut self, format: Format) -> &mut FormatOverride {
        match format {
            Format::Graphql => &mut self.graphql,
            Format::Protobuf => &mut self.protobuf,
            Format::Openapi => &mut self.openapi,
            Format::Go => &mut self.go,
        }
    }

    /// The override name for `format`, if any.
    pub fn name(&self, format: Format) -> Option<&str> {
        self.get(format).name.as_deref()
    }

    /// Options for `format`, in declaration order.
    pub fn options(&self, format: Format) -> &[String] {
        &self.get(format).options
    }

    /// No format carries an override.
    pub fn is_empty(&self) -> bool {
        Format::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Layer `other` on top: names replace, options append without duplicates.
    pub fn merge(&mut self, other: &Self) {
        for format in Format::ALL {
            let theirs = other.get(format);
            let ours = self.get_mut(format);
            if let Some(name) = &theirs.name {
                ours.name = Some(name.clone());
            }
            for opt in &theirs.options {
                if !ours.options.contains(opt) {
                    ours.options.push(opt.clone());
                }
            }
        }
    }
}

/// Overrides addressed by name rather than attached inline.
///
/// `target` is `Type`, `ns.Type`, `Type.field`, `Enum.VALUE` or
/// `Service.Method`. The lowering pass binds each one to its element once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideBinding {
    /// Element path the overrides apply to.
    pub target: String,
    /// The overrides to layer onto the element.
    #[serde(flatten)]
    pub overrides: Overrides,
}

/// Leading documentation, with optional per-format replacements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    /// Text used by every format without a specific entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<String>,
    /// Per-format replacements for `general`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specific: BTreeMap<Format, String>,
}

impl Documentation {
    /// Documentation with general text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            general: Some(text.into()),
            specific: BTreeMap::new(),
        }
    }

    /// Text to render for `format`: the format-specific entry, else the general one.
    pub fn for_format(&self, format: Format) -> Option<&str> {
        self.specific
            .get(&format)
            .or(self.general.as_ref())
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Neither general nor specific text.
    pub fn is_empty(&self) -> bool {
        self.general.is_none() && self.specific.is_empty()
    }
}

/// Deprecation notice on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    /// Why the element is deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Version the deprecation started in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Version the element goes away in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<String>,
}

impl Deprecation {
    /// Human-readable reason, falling back to a generic one.
    pub fn reason_or_default(&self) -> &str {
        self.reason.as_deref().unwrap_or("No longer supported")
    }
}

/// Value constraints on a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    /// Minimum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Regular expression a string must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Well-known string format such as `email` or `uuid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Inclusive numeric lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive numeric upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum number of list items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum number of list items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// List items must be distinct.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
}

impl Validation {
    /// No rule is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A field-level query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Argument type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Whether the caller must supply the argument.
    #[serde(default)]
    pub required: bool,
    /// Default value, as written in the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
}

impl Argument {
    /// An optional argument without default or documentation.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: None,
            doc: Documentation::default(),
        }
    }

    /// Mark the argument required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A named, typed slot in a Type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Whether the field must be present.
    #[serde(default)]
    pub required: bool,
    /// Explicit wire number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Formats the field is hidden from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Format>,
    /// The only formats the field is rendered for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<Format>,
    /// Arguments that turn the field into a query.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    /// Default value, as written in the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Deprecation notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
    /// Value constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    /// Per-format overrides.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl Field {
    /// An optional field with no qualifiers.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            number: None,
            exclude: Vec::new(),
            only: Vec::new(),
            arguments: Vec::new(),
            default: None,
            deprecated: None,
            doc: Documentation::default(),
            validation: None,
            overrides: Overrides::default(),
        }
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Pin the wire number.
    pub const fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    /// Add a field argument.
    pub fn with_argument(mut self, arg: Argument) -> Self {
        self.arguments.push(arg);
        self
    }

    /// Hide the field from `format`.
    pub fn excluding(mut self, format: Format) -> Self {
        self.exclude.push(format);
        self
    }

    /// Render the field for `format` only.
    pub fn only_for(mut self, format: Format) -> Self {
        self.only.push(format);
        self
    }

    /// Deprecate the field with `reason`.
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(Deprecation {
            reason: Some(reason.into()),
            ..Deprecation::default()
        });
        self
    }

    /// Set general documentation.
    pub fn with_doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Documentation::new(text);
        self
    }

    /// Non-null in every target: required and not qualified optional.
    pub const fn is_non_null(&self) -> bool {
        self.required && !self.ty.optional
    }
}

/// Common accessors over the four declaration kinds.
pub trait Declaration {
    /// Declared name.
    fn name(&self) -> &str;
    /// Namespace written on the declaration itself.
    fn namespace(&self) -> Option<&str>;
    /// Documentation.
    fn doc(&self) -> &Documentation;
    /// Per-format overrides.
    fn overrides(&self) -> &Overrides;

    /// `namespace.Name`, using `default_ns` when the declaration has none.
    fn qualified_name(&self, default_ns: Option<&str>) -> String {
        match self.namespace().or(default_ns) {
            Some(ns) if !ns.is_empty() => format!("{ns}.{}", self.name()),
            _ => self.name().to_string(),
        }
    }
}

macro_rules! impl_declaration {
    ($($ty:ty),*) => {
        $(
            impl Declaration for $ty {
                fn name(&self) -> &str {
                    &self.name
                }
                fn namespace(&self) -> Option<&str> {
                    self.namespace.as_deref()
                }
                fn doc(&self) -> &Documentation {
                    &self.doc
                }
                fn overrides(&self) -> &Overrides {
                    &self.overrides
                }
            }
        )*
    };
}

impl_declaration!(TypeDef, EnumDef, UnionDef, Service);

/// A structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Type name.
    pub name: String,
    /// Own namespace, overriding the schema's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
    /// Per-format overrides.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl TypeDef {
    /// A type in the schema's default namespace.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            fields,
            doc: Documentation::default(),
            overrides: Overrides::default(),
        }
    }

    /// Place the type in namespace `ns`.
    pub fn in_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }
}

/// A single enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Member name.
    pub name: String,
    /// Explicit wire number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
    /// Per-format overrides.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl EnumValue {
    /// A member numbered in sequence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: None,
            doc: Documentation::default(),
            overrides: Overrides::default(),
        }
    }

    /// Pin the wire number.
    pub const fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }
}

/// Closed set of named integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Own namespace, overriding the schema's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Members in declaration order.
    pub values: Vec<EnumValue>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
    /// Per-format overrides.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl EnumDef {
    /// An enum in the schema's default namespace.
    pub fn new(name: impl Into<String>, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            values,
            doc: Documentation::default(),
            overrides: Overrides::default(),
        }
    }
}

/// Closed sum over declared Types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionDef {
    /// Union name.
    pub name: String,
    /// Own namespace, overriding the schema's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Referenced Type names, in declaration order.
    pub options: Vec<String>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
    /// Per-format overrides.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl UnionDef {
    /// A union over `options`.
    pub fn new<S: Into<String>>(name: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            options: options.into_iter().map(Into::into).collect(),
            doc: Documentation::default(),
            overrides: Overrides::default(),
        }
    }
}

/// HTTP verb for a method binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
}

impl HttpMethod {
    /// Lower-case verb, as used for OpenAPI path items.
    pub const fn as_lower(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Whether the verb carries a request body.
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// Which root operation type a method lands in for the query schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphqlOperation {
    /// Read operation.
    Query,
    /// Write operation.
    Mutation,
    /// Subscription.
    Subscription,
}

/// One RPC on a Service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Request type name.
    pub input: String,
    /// Response type name.
    pub output: String,
    /// The client sends a stream.
    #[serde(default)]
    pub input_stream: bool,
    /// The server sends a stream.
    #[serde(default)]
    pub output_stream: bool,
    /// HTTP verb override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<HttpMethod>,
    /// HTTP path override, with `{name}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_template: Option<String>,
    /// Root operation override for the query schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_operation: Option<GraphqlOperation>,
    /// Extra success status codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub success_codes: Vec<u16>,
    /// Error status codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_codes: Vec<u16>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
    /// Per-format overrides.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl Method {
    /// A unary method.
    pub fn new(name: impl Into<String>, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            input_stream: false,
            output_stream: false,
            http_method: None,
            path_template: None,
            graphql_operation: None,
            success_codes: Vec::new(),
            error_codes: Vec::new(),
            doc: Documentation::default(),
            overrides: Overrides::default(),
        }
    }

    /// Set the streaming directions.
    pub const fn streaming(mut self, input: bool, output: bool) -> Self {
        self.input_stream = input;
        self.output_stream = output;
        self
    }

    /// Either direction streams.
    pub const fn is_streaming(&self) -> bool {
        self.input_stream || self.output_stream
    }

    fn has_read_prefix(&self) -> bool {
        self.name.starts_with("Get") || self.name.starts_with("List")
    }

    /// Explicit verb, else `GET` for `Get*`/`List*` and `POST` for the rest.
    pub fn effective_http_method(&self) -> HttpMethod {
        self.http_method.unwrap_or_else(|| {
            if self.has_read_prefix() {
                HttpMethod::Get
            } else {
                HttpMethod::Post
            }
        })
    }

    /// Explicit operation kind, else query for `Get*`/`List*` and mutation for the rest.
    pub fn effective_graphql_operation(&self) -> GraphqlOperation {
        self.graphql_operation.unwrap_or_else(|| {
            if self.has_read_prefix() {
                GraphqlOperation::Query
            } else {
                GraphqlOperation::Mutation
            }
        })
    }
}

/// An RPC surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service name.
    pub name: String,
    /// Own namespace, overriding the schema's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub doc: Documentation,
    /// Per-format overrides.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl Service {
    /// A service in the schema's default namespace.
    pub fn new(name: impl Into<String>, methods: Vec<Method>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            methods,
            doc: Documentation::default(),
            overrides: Overrides::default(),
        }
    }
}

/// One compiled unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Namespace for declarations that do not name their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Namespace-level annotations: schema directives, file options, info
    /// entries and the Go package name.
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub annotations: Overrides,
    /// Types in declaration order.
    #[serde(default)]
    pub types: Vec<TypeDef>,
    /// Enums in declaration order.
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    /// Unions in declaration order.
    #[serde(default)]
    pub unions: Vec<UnionDef>,
    /// Services in declaration order.
    #[serde(default)]
    pub services: Vec<Service>,
    /// Overrides addressed by element path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<OverrideBinding>,
}

impl Schema {
    /// An empty schema.
    pub fn new(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            ..Self::default()
        }
    }

    /// Append a type.
    pub fn with_type(mut self, ty: TypeDef) -> Self {
        self.types.push(ty);
        self
    }

    /// Append an enum.
    pub fn with_enum(mut self, e: EnumDef) -> Self {
        self.enums.push(e);
        self
    }

    /// Append a union.
    pub fn with_union(mut self, u: UnionDef) -> Self {
        self.unions.push(u);
        self
    }

    /// Append a service.
    pub fn with_service(mut self, s: Service) -> Self {
        self.services.push(s);
        self
    }

    /// The schema namespace, if set and not empty.
    pub fn default_namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// Effective namespace of a declaration.
    pub fn namespace_of<'a>(&'a self, decl: &'a dyn Declaration) -> Option<&'a str> {
        decl.namespace()
            .filter(|ns| !ns.is_empty())
            .or_else(|| self.default_namespace())
    }
}
