//! Structural diagnostics.
//!
//! Nothing here is enforced: a network with diagnostics still simulates.
//! The checks point out the shapes the engine and `delete` treat in a
//! well-defined but possibly surprising way.

use std::fmt;

use hn_core::{ElementId, Real};

use crate::element::ElementKind;
use crate::network::Network;

/// Largest deviation from 1 tolerated in a multisplit's proportion sum.
///
/// Covers the rounding of uniform shares such as `1/3`.
pub const PROPORTION_SUM_TOLERANCE: Real = 1e-9;

/// A structural remark about one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// More than one slot feeds this element. Simulation visits it once per
    /// incoming path; `delete` rewires only the first predecessor.
    SharedInput {
        element: String,
        predecessors: Vec<String>,
    },

    /// A non-source element nothing feeds. Simulation never reaches it.
    Unreachable { element: String },

    /// An empty output slot on an element that passes flow on. Flow sent
    /// into it is dropped.
    OpenOutput { element: String, slot: usize },

    /// Multisplit proportions do not sum to 1. They are used verbatim.
    ProportionSum { element: String, sum: Real },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SharedInput {
                element,
                predecessors,
            } => write!(
                f,
                "'{}' is fed by several elements: {}",
                element,
                predecessors.join(", ")
            ),
            Diagnostic::Unreachable { element } => {
                write!(f, "'{}' is not fed by any element", element)
            }
            Diagnostic::OpenOutput { element, slot } => {
                write!(f, "'{}' output {} is not connected", element, slot)
            }
            Diagnostic::ProportionSum { element, sum } => {
                write!(f, "'{}' proportions sum to {} instead of 1", element, sum)
            }
        }
    }
}

/// Inspect a network and report diagnostics in insertion order.
pub fn diagnose(network: &Network) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    for element in network.iter() {
        let name = element.name().to_string();
        let preds = network.predecessors(element.id());

        if preds.len() > 1 {
            out.push(Diagnostic::SharedInput {
                element: name.clone(),
                predecessors: preds.iter().map(|&(id, _)| name_of(network, id)).collect(),
            });
        }
        if preds.is_empty() && element.kind() != ElementKind::Source {
            out.push(Diagnostic::Unreachable {
                element: name.clone(),
            });
        }
        if element.kind() != ElementKind::Sink {
            for (slot, target) in element.outputs().iter().enumerate() {
                if target.is_none() {
                    out.push(Diagnostic::OpenOutput {
                        element: name.clone(),
                        slot,
                    });
                }
            }
        }
        if let Some(proportions) = element.proportions() {
            let sum: Real = proportions.iter().sum();
            if (sum - 1.0).abs() > PROPORTION_SUM_TOLERANCE {
                out.push(Diagnostic::ProportionSum { element: name, sum });
            }
        }
    }

    out
}

fn name_of(network: &Network, id: ElementId) -> String {
    network
        .element(id)
        .map(|e| e.name().to_string())
        .unwrap_or_else(|| id.to_string())
}
