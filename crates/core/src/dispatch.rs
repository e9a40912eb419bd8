//! Backend dispatcher.
//!
//! Lowers the schema once, then runs every requested backend in parallel over
//! the shared lowering. A failing backend does not stop the others; each
//! result is reported under its own format.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};
use typemux_common::{Format, Schema};

use crate::backend::{Rendered, backend_for};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::lower::lower;

/// Per-format render results, ordered by format.
pub type Outputs = BTreeMap<Format, Result<Rendered, GenerateError>>;

/// Render `schema` in every format of `formats`.
///
/// Duplicate formats are rendered once. The outer error is a lowering
/// failure, which no backend could render past.
pub fn generate(
    schema: &Schema,
    formats: &[Format],
    config: &GeneratorConfig,
) -> Result<Outputs, GenerateError> {
    let mut requested = formats.to_vec();
    requested.sort_unstable();
    requested.dedup();

    let lowering = lower(schema)?;
    debug!(
        entries = lowering.map_entries().count(),
        wrappers = lowering.map_wrappers().len(),
        arguments = lowering.argument_types().count(),
        "lowered schema"
    );

    let outputs: Outputs = requested
        .par_iter()
        .map(|&format| {
            let span = info_span!("render", format = %format);
            let _guard = span.enter();
            let result = backend_for(format, config).render(&lowering);
            match &result {
                Ok(rendered) => debug!(files = rendered.files.len(), "backend finished"),
                Err(e) => warn!(error = %e, "backend failed"),
            }
            (format, result)
        })
        .collect();

    info!(
        formats = outputs.len(),
        failed = outputs.values().filter(|r| r.is_err()).count(),
        "generation complete"
    );
    Ok(outputs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use typemux_common::{Field, FieldType, Method, Primitive, Service, TypeDef};

    fn streaming_schema() -> Schema {
        Schema::new(Some("feeds"))
            .with_type(TypeDef::new(
                "Event",
                vec![Field::new("id", FieldType::primitive(Primitive::String)).required()],
            ))
            .with_service(Service::new(
                "EventService",
                vec![Method::new("Watch", "Event", "Event").streaming(false, true)],
            ))
    }

    #[test]
    fn test_every_requested_format_is_reported() {
        let outputs = generate(
            &streaming_schema(),
            &Format::ALL,
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert_eq!(outputs.keys().copied().collect::<Vec<_>>(), Format::ALL);
        assert!(outputs[&Format::Protobuf].is_ok());
        assert!(outputs[&Format::Go].is_ok());
        assert_eq!(
            outputs[&Format::Openapi].as_ref().unwrap_err(),
            &GenerateError::UnsupportedStreaming {
                path: "EventService.Watch".to_string(),
                format: Format::Openapi,
            }
        );
    }

    #[test]
    fn test_duplicate_formats_render_once() {
        let outputs = generate(
            &streaming_schema(),
            &[Format::Go, Format::Protobuf, Format::Go],
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert_eq!(
            outputs.keys().copied().collect::<Vec<_>>(),
            [Format::Protobuf, Format::Go]
        );
    }

    #[test]
    fn test_empty_request_yields_no_outputs() {
        let outputs = generate(&streaming_schema(), &[], &GeneratorConfig::default()).unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_lowering_failure_is_returned() {
        let schema = Schema::new(None).with_type(TypeDef::new(
            "Bad",
            vec![Field::new(
                "m",
                FieldType::map(
                    FieldType::primitive(Primitive::Bool),
                    FieldType::primitive(Primitive::String),
                ),
            )],
        ));
        let err = generate(&schema, &Format::ALL, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidMapKey { .. }));
    }
}
