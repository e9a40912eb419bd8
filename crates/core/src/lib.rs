//! TypeMUX lowering pass, format backends and dispatcher.
//!
//! A [`Schema`](typemux_common::Schema) is lowered once into a [`Lowering`],
//! which owns every synthesized name. The four backends then render from that
//! shared, read-only result, possibly in parallel.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lower;
pub mod rules;

pub use backend::{Backend, Rendered, RenderedFile, backend_for};
pub use config::GeneratorConfig;
pub use dispatch::{Outputs, generate};
pub use error::GenerateError;
pub use lower::{DeclKind, DeclRef, ElementId, Lowering, lower};
