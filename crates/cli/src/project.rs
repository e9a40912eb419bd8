//! Schema and project configuration loading.
//!
//! The schema is an already-validated IR document (JSON or YAML). The project
//! configuration is a TOML file with an optional `[output]` table next to the
//! per-backend generator sections.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use typemux_common::{Format, Schema};
use typemux_core::GeneratorConfig;

/// Config file picked up next to the schema when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "typemux.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub output: OutputConfig,
    #[serde(flatten)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, relative to the config file.
    pub directory: Option<PathBuf>,
    /// Formats rendered when none are given on the command line.
    pub formats: Vec<Format>,
    /// File name overrides for single-file outputs.
    pub filenames: BTreeMap<Format, String>,
}

/// A loaded config together with the directory its relative paths start from.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: ProjectConfig,
    pub base_dir: PathBuf,
}

impl Project {
    /// Output directory: `--out`, else `output.directory`, else the base dir.
    pub fn output_dir(&self, cli_out: Option<&Path>) -> PathBuf {
        match (cli_out, &self.config.output.directory) {
            (Some(out), _) => out.to_path_buf(),
            (None, Some(dir)) => self.base_dir.join(dir),
            (None, None) => self.base_dir.clone(),
        }
    }

    /// Formats to render: the command line, else `output.formats`, else all.
    pub fn formats(&self, requested: &[Format]) -> Vec<Format> {
        if !requested.is_empty() {
            requested.to_vec()
        } else if !self.config.output.formats.is_empty() {
            self.config.output.formats.clone()
        } else {
            Format::ALL.to_vec()
        }
    }
}

/// Parse a schema document. `.yaml`/`.yml` files are YAML, anything else JSON.
pub fn load_schema(path: &Path) -> Result<Schema, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read schema {}: {e}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "yaml" | "yml"));
    let schema: Schema = if is_yaml {
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse schema {}: {e}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse schema {}: {e}", path.display()))?
    };
    debug!(
        path = %path.display(),
        types = schema.types.len(),
        enums = schema.enums.len(),
        unions = schema.unions.len(),
        services = schema.services.len(),
        "loaded schema"
    );
    Ok(schema)
}

/// Load the explicit config, else `typemux.toml` beside the schema, else defaults.
pub fn load_project(config: Option<&Path>, schema_path: &Path) -> Result<Project, String> {
    let schema_dir = schema_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let path = match config {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = schema_dir.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(Project {
                    config: ProjectConfig::default(),
                    base_dir: schema_dir,
                });
            }
            candidate
        }
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    debug!(path = %path.display(), "loaded config");

    let base_dir = path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok(Project { config, base_dir })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCHEMA_YAML: &str = r"
namespace: com.example.users
types:
  - name: User
    fields:
      - name: id
        type: { kind: primitive, name: string }
        required: true
";

    #[test]
    fn test_load_yaml_and_json_schema() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("schema.yaml");
        fs::write(&yaml, SCHEMA_YAML).unwrap();
        let schema = load_schema(&yaml).unwrap();
        assert_eq!(schema.types[0].name, "User");

        let json = dir.path().join("schema.json");
        fs::write(&json, serde_json::to_string(&schema).unwrap()).unwrap();
        assert_eq!(load_schema(&json).unwrap(), schema);
    }

    #[test]
    fn test_bad_schema_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_schema(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse schema"));
        assert!(err.contains("broken.json"));
    }

    #[test]
    fn test_config_beside_schema() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.yaml");
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"
[output]
directory = "gen"
formats = ["go", "protobuf"]

[output.filenames]
go = "models.go"

[go]
package_name = "models"
json_tags = false

[protobuf]
import_buf_validate = true
"#,
        )
        .unwrap();

        let project = load_project(None, &schema).unwrap();
        assert_eq!(project.output_dir(None), dir.path().join("gen"));
        assert_eq!(project.formats(&[]), [Format::Go, Format::Protobuf]);
        assert_eq!(project.formats(&[Format::Openapi]), [Format::Openapi]);
        assert_eq!(
            project.config.output.filenames.get(&Format::Go).map(String::as_str),
            Some("models.go")
        );
        assert_eq!(project.config.generator.go.package_name.as_deref(), Some("models"));
        assert!(!project.config.generator.go.json_tags);
        assert!(project.config.generator.protobuf.import_buf_validate);
        assert!(project.config.generator.graphql.include_deprecated);
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = TempDir::new().unwrap();
        let project = load_project(None, &dir.path().join("schema.json")).unwrap();
        assert_eq!(project.output_dir(None), dir.path());
        assert_eq!(project.formats(&[]), Format::ALL);

        let missing = load_project(Some(&dir.path().join("nope.toml")), &dir.path().join("s.json"));
        assert!(missing.unwrap_err().starts_with("Failed to read config"));
    }
}
