//! Canonical type model shared by the TypeMUX compiler crates.
//!
//! The model is produced by an upstream parser and annotation merger and is
//! consumed read-only by the lowering pass and the format backends. It is
//! serde-(de)serializable so a validated schema can be handed over as JSON or
//! YAML.

pub mod format;
pub mod model;
pub mod naming;

pub use format::Format;
pub use model::{
    Argument, Declaration, Deprecation, Documentation, EnumDef, EnumValue, Field, FieldType,
    FormatOverride, GraphqlOperation, HttpMethod, Method, OverrideBinding, Overrides, Primitive,
    Schema, Service, TypeDef, TypeKind, UnionDef, Validation,
};
