//! Error types for skyfem operations.

use thiserror::Error;

/// Result type alias using the skyfem [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which kind of numbered record broke the input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Node,
    Element,
    LoadCase,
    MaterialSet,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::Node => "node",
            RecordKind::Element => "element",
            RecordKind::LoadCase => "load case",
            RecordKind::MaterialSet => "material set",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during an analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// Records were supplied out of sequential order.
    #[error("{kind}s must be input in order: expected {kind} {expected}, found {found}")]
    Ordering {
        kind: RecordKind,
        expected: usize,
        found: usize,
    },

    /// Non-positive or vanishing pivot during LDLᵀ factorization.
    #[error("stiffness matrix is not positive definite: pivot {pivot:e} at equation {equation}")]
    SingularMatrix { equation: usize, pivot: f64 },

    /// A write fell outside the computed skyline profile.
    ///
    /// This is an internal consistency failure between profile sizing and assembly.
    #[error("entry ({row}, {column}) lies outside the skyline of column {column} (height {height})")]
    ProfileViolation {
        row: usize,
        column: usize,
        height: usize,
    },

    /// An element references a material set that its group does not declare.
    #[error("element {element} of group {group} references material set {set}, but only {available} set(s) are defined")]
    MaterialReference {
        group: usize,
        element: usize,
        set: usize,
        available: usize,
    },

    /// Invalid material properties.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Element-related errors (degenerate geometry, wrong section kind).
    #[error("element error: {0}")]
    Element(String),

    /// Mesh-related errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Load definition errors.
    #[error("load error: {0}")]
    Load(String),

    /// Solver errors (dimension mismatch).
    #[error("solver error: {0}")]
    Solver(String),

    /// Malformed input deck.
    #[error("input line {line}: {message}")]
    Input { line: usize, message: String },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_message_names_record() {
        let err = Error::Ordering {
            kind: RecordKind::Node,
            expected: 3,
            found: 5,
        };
        assert_eq!(
            err.to_string(),
            "nodes must be input in order: expected node 3, found 5"
        );
    }

    #[test]
    fn test_singular_message_names_equation() {
        let err = Error::SingularMatrix {
            equation: 7,
            pivot: 0.0,
        };
        assert!(err.to_string().contains("equation 7"));
    }
}
