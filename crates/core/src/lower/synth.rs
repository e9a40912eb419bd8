//! Auxiliary declarations invented by the lowering pass.

use serde::Serialize;
use typemux_common::{FieldType, Primitive, TypeDef};

/// A `(key, value)` record standing in for one flat map shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    /// `{Key}{Value}Entry`.
    pub name: String,
    /// Canonical shape, e.g. `map<string,int32>`.
    pub signature: String,
    /// Key primitive.
    pub key: Primitive,
    /// What the value slot holds.
    pub value: EntryValue,
    /// Namespace the shape was first met in; references in `value` resolve from here.
    pub namespace: Option<String>,
}

/// What the `value` slot of an entry holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryValue {
    /// Any non-map value, as declared.
    Declared {
        /// The value type.
        ty: FieldType,
    },
    /// A nested map, represented by its wrapper.
    Wrapper {
        /// Wrapper type name.
        name: String,
    },
}

/// One nesting level of a map-of-map: a record holding a list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapWrapper {
    /// `MapWrapper{number}`.
    pub name: String,
    /// Discovery index among distinct nested shapes.
    pub number: usize,
    /// Canonical shape of the wrapped map.
    pub signature: String,
    /// Entry type of the wrapped map.
    pub entry: String,
}

/// Request/response pair for a field with inline arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentTypes {
    /// Index of the parent in `Schema::types`.
    pub type_index: usize,
    /// Index of the field in the parent.
    pub field_index: usize,
    /// Declared parent type name.
    pub parent: String,
    /// Declared field name.
    pub field: String,
    /// `{Parent}{Field}Request`, one member per argument.
    pub request: TypeDef,
    /// `{Parent}{Field}Response`, present when the result is a list
    /// (`items`) or not a message (`value`).
    pub response: Option<TypeDef>,
    /// RPC name on the implicit field service: `Get{Parent}{Field}`.
    pub rpc_method: String,
    /// Implicit service grouping every argument field of the parent.
    pub service: String,
}

impl ArgumentTypes {
    /// Name of the RPC/HTTP result: the response type, or the declared result.
    pub fn response_name(&self) -> Option<&str> {
        self.response.as_ref().map(|r| r.name.as_str())
    }
}

/// Everything the pass produced, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "synthesized", rename_all = "snake_case")]
pub enum Synthesized {
    /// Entry of one map shape.
    MapEntry(MapEntry),
    /// Wrapper of one nested map level.
    MapWrapper(MapWrapper),
    /// Request/response pair of an argument field.
    Arguments(ArgumentTypes),
}

impl Synthesized {
    /// Names of the declarations this record introduces.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::MapEntry(e) => vec![e.name.as_str()],
            Self::MapWrapper(w) => vec![w.name.as_str()],
            Self::Arguments(a) => std::iter::once(a.request.name.as_str())
                .chain(a.response_name())
                .collect(),
        }
    }
}

/// Scalar spelling used in entry names: `string` -> `String`, `int64` -> `Int`.
pub const fn scalar_name(p: Primitive) -> &'static str {
    match p {
        Primitive::String | Primitive::Timestamp | Primitive::Bytes => "String",
        Primitive::Int32
        | Primitive::Int64
        | Primitive::Uint8
        | Primitive::Uint16
        | Primitive::Uint32
        | Primitive::Uint64 => "Int",
        Primitive::Float32 | Primitive::Float64 => "Float",
        Primitive::Bool => "Boolean",
    }
}
