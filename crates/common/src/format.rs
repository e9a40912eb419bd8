//! Backend identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four target representations a schema can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Query-language schema (GraphQL SDL).
    Graphql,
    /// Binary wire-format schema (proto3).
    Protobuf,
    /// HTTP API specification (OpenAPI 3 YAML).
    Openapi,
    /// Typed struct source file (Go).
    Go,
}

impl Format {
    /// Every backend, in dispatch order.
    pub const ALL: [Self; 4] = [Self::Graphql, Self::Protobuf, Self::Openapi, Self::Go];

    /// Stable identifier used in configuration files and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Graphql => "graphql",
            Self::Protobuf => "protobuf",
            Self::Openapi => "openapi",
            Self::Go => "go",
        }
    }

    /// Conventional output file name for a single-file render.
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::Graphql => "schema.graphql",
            Self::Protobuf => "schema.proto",
            Self::Openapi => "openapi.yaml",
            Self::Go => "types.go",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graphql" | "gql" => Ok(Self::Graphql),
            "protobuf" | "proto" => Ok(Self::Protobuf),
            "openapi" | "oas" => Ok(Self::Openapi),
            "go" | "golang" => Ok(Self::Go),
            other => Err(format!(
                "unknown format '{other}' (expected one of: graphql, protobuf, openapi, go)"
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("proto".parse::<Format>().unwrap(), Format::Protobuf);
        assert_eq!("GraphQL".parse::<Format>().unwrap(), Format::Graphql);
        assert_eq!("golang".parse::<Format>().unwrap(), Format::Go);
        assert!("thrift".parse::<Format>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for format in Format::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{format}\""));
        }
    }
}
