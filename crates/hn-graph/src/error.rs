//! Network-specific error types.

use hn_core::ElementId;

use crate::element::ElementKind;

pub type GraphResult<T> = Result<T, GraphError>;

/// Network construction and editing errors.
///
/// Lookups by name and deletions never produce these; they report
/// "not found" or "refused" through `Option`/`bool` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An id does not belong to this network.
    UnknownElement { id: ElementId },

    /// An attribute setter was applied to the wrong kind of element.
    KindMismatch {
        name: String,
        expected: ElementKind,
        actual: ElementKind,
    },

    /// Proportions vector length differs from the multisplit's output count.
    ProportionCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A multisplit was requested with zero outputs.
    NoOutputs { name: String },

    /// The network was created with a capacity limit and is full.
    CapacityExceeded { limit: usize },

    /// ID not found in index map.
    IdNotFound { id: ElementId },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownElement { id } => {
                write!(f, "Element {} does not belong to this network", id)
            }
            GraphError::KindMismatch {
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Element '{}' is a {} but the operation requires a {}",
                    name, actual, expected
                )
            }
            GraphError::ProportionCount {
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Multisplit '{}' has {} outputs but {} proportions were given",
                    name, expected, actual
                )
            }
            GraphError::NoOutputs { name } => {
                write!(f, "Multisplit '{}' must have at least one output", name)
            }
            GraphError::CapacityExceeded { limit } => {
                write!(f, "Network is full ({} elements)", limit)
            }
            GraphError::IdNotFound { id } => {
                write!(f, "Element {} not found in index map", id)
            }
        }
    }
}

impl std::error::Error for GraphError {}
