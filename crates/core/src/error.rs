//! Fatal rendering errors. Each one names the element it was raised for.

use typemux_common::Format;

/// Why a schema could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// A map is keyed by something other than a string or integer primitive.
    #[error("{path}: map key must be a string or integer primitive, found {found}")]
    InvalidMapKey {
        /// Field holding the map.
        path: String,
        /// The key type as written.
        found: String,
    },

    /// Two members of one message or enum claim the same wire number.
    #[error("{path}: wire number {number} is already claimed by {claimed_by}")]
    FieldNumberCollision {
        /// The member claiming the number second.
        path: String,
        /// The contested number.
        number: u32,
        /// The member that claimed it first.
        claimed_by: String,
    },

    /// A field sets both `exclude` and `only`.
    #[error("{path}: field sets both `exclude` and `only`")]
    ConflictingVisibility {
        /// The field.
        path: String,
    },

    /// Two declarations share a name in a format without namespaces.
    #[error("{path}: {format} output has no namespaces and '{name}' is already declared by {other}")]
    DuplicateGlobalName {
        /// The later declaration.
        path: String,
        /// The rendered name both declarations map to.
        name: String,
        /// The earlier declaration.
        other: String,
        /// The format that flattens namespaces.
        format: Format,
    },

    /// A streaming method was rendered by a format without streams.
    #[error("{path}: streaming methods cannot be represented in {format} output")]
    UnsupportedStreaming {
        /// `Service.Method`.
        path: String,
        /// The format that cannot stream.
        format: Format,
    },

    /// The schema broke an invariant the parser guarantees.
    #[error("{path}: internal precondition violated: {detail}")]
    InternalPrecondition {
        /// Element being processed.
        path: String,
        /// What was wrong.
        detail: String,
    },
}

impl GenerateError {
    /// Qualified path of the offending element.
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidMapKey { path, .. }
            | Self::FieldNumberCollision { path, .. }
            | Self::ConflictingVisibility { path }
            | Self::DuplicateGlobalName { path, .. }
            | Self::UnsupportedStreaming { path, .. }
            | Self::InternalPrecondition { path, .. } => path,
        }
    }

    pub(crate) fn precondition(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InternalPrecondition {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
