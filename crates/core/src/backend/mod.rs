//! Format backends.
//!
//! Every backend renders from the same [`Lowering`]; none of them mutates it
//! or invents synthesized names of its own.

pub mod golang;
pub mod graphql;
pub mod openapi;
pub mod protobuf;

use typemux_common::{Field, Format};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::lower::Lowering;
use crate::rules::is_visible;

/// One `Schema -> text` projection.
pub trait Backend: Send + Sync {
    /// The format this backend produces.
    fn format(&self) -> Format;

    /// Render the lowered schema.
    fn render(&self, lowering: &Lowering<'_>) -> Result<Rendered, GenerateError>;
}

/// A rendered output file. `namespace` is set when a backend splits its
/// output per namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Namespace the file holds, for split output.
    pub namespace: Option<String>,
    /// File text.
    pub contents: String,
}

/// Everything one backend produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Files in output order.
    pub files: Vec<RenderedFile>,
}

impl Rendered {
    /// Output made of one unsplit file.
    pub fn single(contents: String) -> Self {
        Self {
            files: vec![RenderedFile {
                namespace: None,
                contents,
            }],
        }
    }

    /// All files concatenated, in order.
    pub fn text(&self) -> String {
        self.files
            .iter()
            .map(|f| f.contents.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the backend for `format`.
pub fn backend_for(format: Format, config: &GeneratorConfig) -> Box<dyn Backend> {
    match format {
        Format::Graphql => Box::new(graphql::GraphqlBackend::new(config.graphql)),
        Format::Protobuf => Box::new(protobuf::ProtobufBackend::new(config.protobuf)),
        Format::Openapi => Box::new(openapi::OpenapiBackend::new(config.openapi.clone())),
        Format::Go => Box::new(golang::GoBackend::new(config.go.clone())),
    }
}

/// Fields of `owner` rendered for `format`, with their declaration index.
pub(crate) fn visible_fields<'f>(
    owner: &str,
    fields: &'f [Field],
    format: Format,
) -> Result<Vec<(usize, &'f Field)>, GenerateError> {
    let mut out = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        if is_visible(owner, field, format)? {
            out.push((i, field));
        }
    }
    Ok(out)
}

/// Fail on the first streaming method, for formats with no streaming concept.
pub(crate) fn reject_streaming(lowering: &Lowering<'_>, format: Format) -> Result<(), GenerateError> {
    for service in &lowering.schema().services {
        if let Some(method) = service.methods.iter().find(|m| m.is_streaming()) {
            return Err(GenerateError::UnsupportedStreaming {
                path: format!("{}.{}", service.name, method.name),
                format,
            });
        }
    }
    Ok(())
}

/// Non-empty lines of a doc string.
pub(crate) fn doc_lines(doc: Option<&str>) -> Vec<&str> {
    doc.map(|d| d.lines().map(str::trim_end).collect())
        .unwrap_or_default()
}

/// Collapse a doc string to one line, for formats with single-line descriptions.
pub(crate) fn single_line(doc: &str) -> String {
    doc.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
