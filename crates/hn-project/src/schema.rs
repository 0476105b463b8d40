//! Network description file schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    pub version: u32,
    pub name: String,
    /// Reproduces a fixed-capacity container when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_elements: Option<usize>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub name: String,
    pub kind: ElementKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_flow: Option<f64>,
    /// Downstream element names by slot; `~` leaves a slot empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ElementKindDef {
    Source {
        #[serde(default)]
        flow: f64,
    },
    Tap {
        #[serde(default)]
        open: bool,
    },
    Sink,
    Split,
    /// One output slot per proportion.
    Multisplit { proportions: Vec<f64> },
}

impl ElementKindDef {
    /// Number of output slots the element will have.
    pub fn slots(&self) -> usize {
        match self {
            ElementKindDef::Source { .. } | ElementKindDef::Tap { .. } | ElementKindDef::Sink => 1,
            ElementKindDef::Split => 2,
            ElementKindDef::Multisplit { proportions } => proportions.len(),
        }
    }
}
