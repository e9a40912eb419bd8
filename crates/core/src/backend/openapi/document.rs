//! OpenAPI 3.0 document structs for serde serialization.
//!
//! Only the subset the HTTP-spec backend emits. Every map is a `BTreeMap` so
//! the YAML output never depends on hashing order.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Number, Value};

/// `x-` extensions, flattened into the owning object.
pub type Extensions = BTreeMap<String, Value>;

/// Root document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// OpenAPI version string.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Operations keyed by path template.
    pub paths: BTreeMap<String, PathItem>,
    /// Reusable schemas.
    pub components: Components,
}

/// Document metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `x-` extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Operations of one path, keyed by lower-case HTTP verb.
pub type PathItem = BTreeMap<String, Operation>;

/// A single HTTP operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// One-line summary.
    pub summary: String,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unique operation identifier.
    pub operation_id: String,
    /// Path and query parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// JSON request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code.
    pub responses: BTreeMap<String, Response>,
    /// `x-` extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// A `{name}` path segment.
    Path,
    /// A query string parameter.
    Query,
}

/// A path or query parameter.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter must be supplied.
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    /// Parameter description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameter value schema.
    pub schema: Schema,
}

impl Parameter {
    /// A required `string` path parameter.
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            required: true,
            description: None,
            schema: Schema::typed("string"),
        }
    }
}

/// A request body.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Whether the body must be supplied.
    pub required: bool,
    /// Body schemas keyed by media type.
    pub content: BTreeMap<String, MediaType>,
}

/// Schema of one media type.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// Body schema.
    pub schema: Schema,
}

/// One response of an operation.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Response description.
    pub description: String,
    /// Body schemas keyed by media type.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
}

impl Response {
    /// A response with an `application/json` body.
    pub fn json(description: impl Into<String>, schema: Schema) -> Self {
        Self {
            description: description.into(),
            content: json_content(schema),
        }
    }
}

/// `application/json` content map holding `schema`.
pub fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    BTreeMap::from([("application/json".to_string(), MediaType { schema })])
}

/// Reusable document parts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Components {
    /// Named schemas.
    pub schemas: BTreeMap<String, Schema>,
}

/// Discriminator for polymorphic `oneOf` schemas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// Property naming the variant.
    pub property_name: String,
    /// Variant value to schema reference.
    pub mapping: BTreeMap<String, String>,
}

/// JSON Schema object as used by OpenAPI 3.0.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `$ref` target.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// JSON type name.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Type format such as `int32` or `date-time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Object properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,

    /// Required property names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Array item schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Value schema of a map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,

    /// Allowed string values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    /// Alternatives.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,

    /// Variant discriminator for `oneOf`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    /// Whether `null` is allowed.
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,

    /// Whether the schema is deprecated.
    #[serde(skip_serializing_if = "is_false")]
    pub deprecated: bool,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    // --- validation keywords ---
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Pattern a string must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    /// Minimum number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Maximum number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Items must be distinct.
    #[serde(skip_serializing_if = "is_false")]
    pub unique_items: bool,

    /// `x-` extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Schema {
    /// A `$ref` to the component `name`.
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{name}")),
            ..Self::default()
        }
    }

    /// A schema with only `type` set.
    pub fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    /// Whether the schema is a `$ref`.
    pub const fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// JSON number for a schema keyword: integral values stay integers.
pub fn number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}
