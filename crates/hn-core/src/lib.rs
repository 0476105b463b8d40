//! hn-core: shared foundation for hydronet.
//!
//! Contains:
//! - ids (element handles and the sequence a network draws them from)
//! - `Real`, the scalar type of every flow quantity

pub mod ids;

pub use ids::{ElementId, IdSequence};

/// Floating point type used for flows, capacities and proportions.
pub type Real = f64;
