//! Per-backend generator settings.

use serde::{Deserialize, Serialize};

/// Settings for every backend, one section per format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Query-schema settings.
    pub graphql: GraphqlConfig,
    /// Wire-format settings.
    pub protobuf: ProtobufConfig,
    /// HTTP-spec settings.
    pub openapi: OpenapiConfig,
    /// Go settings.
    pub go: GoConfig,
}

/// `[graphql]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphqlConfig {
    /// Keep deprecated fields (marked `@deprecated`) in the output.
    pub include_deprecated: bool,
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            include_deprecated: true,
        }
    }
}

/// `[protobuf]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtobufConfig {
    /// Import `buf/validate/validate.proto` when a field carries validation rules.
    pub import_buf_validate: bool,
}

/// `[openapi]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenapiConfig {
    /// API version written to `info.version`.
    pub version: String,
    /// Replaces the title derived from the namespace.
    pub title: Option<String>,
}

impl Default for OpenapiConfig {
    fn default() -> Self {
        Self {
            version: "3.0.0".to_string(),
            title: None,
        }
    }
}

/// `[go]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoConfig {
    /// Package clause; wins over the `package` annotation and the namespace.
    pub package_name: Option<String>,
    /// Emit `json:"..."` struct tags.
    pub json_tags: bool,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            package_name: None,
            json_tags: true,
        }
    }
}
