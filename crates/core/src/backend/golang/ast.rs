//! Go syntax nodes for the typed-struct backend.
//!
//! - `GoType`: type expressions (named, pointer, slice, map, chan)
//! - `GoDecl`: top-level declarations (structs, enums, interfaces, marker methods)
//! - `GoFile`: one generated source file

/// Go type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// Named or builtin type: `string`, `time.Time`, `User`
    Named(String),
    /// `*T`
    Pointer(Box<GoType>),
    /// `[]T`
    Slice(Box<GoType>),
    /// `map[K]V`
    Map {
        /// Key type.
        key: Box<GoType>,
        /// Value type.
        value: Box<GoType>,
    },
    /// `chan T`
    Chan(Box<GoType>),
}

impl GoType {
    /// A named or builtin type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `*self`.
    pub fn pointer(self) -> Self {
        Self::Pointer(Box::new(self))
    }

    /// `[]self`.
    pub fn slice(self) -> Self {
        Self::Slice(Box::new(self))
    }

    /// `chan self`.
    pub fn chan(self) -> Self {
        Self::Chan(Box::new(self))
    }

    /// Whether the zero value is already `nil`.
    pub const fn is_nilable(&self) -> bool {
        !matches!(self, Self::Named(_))
    }
}

/// Struct field.
#[derive(Debug, Clone)]
pub struct GoField {
    /// Exported field name.
    pub name: String,
    /// Field type.
    pub ty: GoType,
    /// Raw tag body without backquotes: `json:"id"`.
    pub tag: Option<String>,
    /// Comment lines above the field, without `//`.
    pub doc: Vec<String>,
}

/// `type X struct { ... }`.
#[derive(Debug, Clone)]
pub struct GoStruct {
    /// Type name.
    pub name: String,
    /// Comment lines above the declaration, without `//`.
    pub doc: Vec<String>,
    /// Lines emitted verbatim above the declaration (`//go:generate ...`).
    pub directives: Vec<String>,
    /// Fields in declaration order.
    pub fields: Vec<GoField>,
}

/// One named constant of an enum.
#[derive(Debug, Clone)]
pub struct GoConst {
    /// Constant name.
    pub name: String,
    /// Explicit value; `None` continues the `iota` sequence.
    pub value: Option<u32>,
    /// Comment lines above the constant, without `//`.
    pub doc: Vec<String>,
}

/// `type X int` plus its `const` block.
#[derive(Debug, Clone)]
pub struct GoEnum {
    /// Type name.
    pub name: String,
    /// Comment lines above the declaration, without `//`.
    pub doc: Vec<String>,
    /// Lines emitted verbatim above the declaration.
    pub directives: Vec<String>,
    /// Emit `= iota` on the first constant instead of explicit values.
    pub iota: bool,
    /// Constants in declaration order.
    pub consts: Vec<GoConst>,
}

/// Named method parameter.
#[derive(Debug, Clone)]
pub struct GoParam {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: GoType,
}

/// Interface method signature.
#[derive(Debug, Clone)]
pub struct GoMethod {
    /// Method name.
    pub name: String,
    /// Parameters in order.
    pub params: Vec<GoParam>,
    /// Result types in order.
    pub results: Vec<GoType>,
    /// Comment lines above the method, without `//`.
    pub doc: Vec<String>,
}

/// `type X interface { ... }`.
#[derive(Debug, Clone)]
pub struct GoInterface {
    /// Interface name.
    pub name: String,
    /// Comment lines above the declaration, without `//`.
    pub doc: Vec<String>,
    /// Lines emitted verbatim above the declaration.
    pub directives: Vec<String>,
    /// Method signatures in order.
    pub methods: Vec<GoMethod>,
}

/// Empty method sealing a union: `func (Receiver) method() {}`.
#[derive(Debug, Clone)]
pub struct GoMarker {
    /// Type implementing the marker.
    pub receiver: String,
    /// Unexported marker method name.
    pub method: String,
}

/// Top-level declaration.
#[derive(Debug, Clone)]
pub enum GoDecl {
    /// A struct type.
    Struct(GoStruct),
    /// An integer enum with its constants.
    Enum(GoEnum),
    /// An interface type.
    Interface(GoInterface),
    /// A marker method sealing a union.
    Marker(GoMarker),
}

/// One generated source file.
#[derive(Debug, Clone)]
pub struct GoFile {
    /// Package clause name.
    pub package: String,
    /// Imported package paths.
    pub imports: Vec<String>,
    /// Declarations separated by blank lines.
    pub decls: Vec<GoDecl>,
}
