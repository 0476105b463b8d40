//! Conversion between description files and live networks.

use std::collections::HashMap;

use hn_core::ElementId;
use hn_graph::{ElementData, Network};

use crate::schema::{ElementDef, ElementKindDef, NetworkDef};
use crate::validate::validate_network_def;
use crate::{LATEST_VERSION, ProjectResult};

/// Build a network from a description.
///
/// Elements are added in file order, then output slots are wired by name.
pub fn to_network(def: &NetworkDef) -> ProjectResult<Network> {
    validate_network_def(def)?;

    let mut network = match def.max_elements {
        Some(limit) => Network::with_capacity_limit(limit),
        None => Network::new(),
    };

    let mut ids: HashMap<&str, ElementId> = HashMap::with_capacity(def.elements.len());
    for element in &def.elements {
        let id = network.add(element.name.clone(), element_data(&element.kind))?;
        if let Some(max_flow) = element.max_flow {
            network.set_max_flow(id, max_flow)?;
        }
        ids.insert(element.name.as_str(), id);
    }

    // Names were checked by validation, so every lookup succeeds.
    for element in &def.elements {
        let Some(&from) = ids.get(element.name.as_str()) else {
            continue;
        };
        for (slot, target) in element.outputs.iter().enumerate() {
            if let Some(&to) = target.as_deref().and_then(|name| ids.get(name)) {
                network.connect_at(from, to, slot)?;
            }
        }
    }

    Ok(network)
}

/// Describe an existing network.
///
/// Empty trailing slots are omitted from `outputs`.
pub fn from_network(name: impl Into<String>, network: &Network) -> NetworkDef {
    let elements = network
        .iter()
        .map(|element| {
            let mut outputs: Vec<Option<String>> = element
                .outputs()
                .iter()
                .map(|slot| {
                    slot.and_then(|id| network.element(id))
                        .map(|e| e.name().to_string())
                })
                .collect();
            while matches!(outputs.last(), Some(None)) {
                outputs.pop();
            }

            ElementDef {
                name: element.name().to_string(),
                kind: kind_def(element.data()),
                max_flow: element.max_flow(),
                outputs,
            }
        })
        .collect();

    NetworkDef {
        version: LATEST_VERSION,
        name: name.into(),
        max_elements: network.capacity_limit(),
        elements,
    }
}

fn element_data(kind: &ElementKindDef) -> ElementData {
    match kind {
        ElementKindDef::Source { flow } => ElementData::Source { flow: *flow },
        ElementKindDef::Tap { open } => ElementData::Tap { open: *open },
        ElementKindDef::Sink => ElementData::Sink,
        ElementKindDef::Split => ElementData::Split,
        ElementKindDef::Multisplit { proportions } => ElementData::Multisplit {
            proportions: proportions.clone(),
        },
    }
}

fn kind_def(data: &ElementData) -> ElementKindDef {
    match data {
        ElementData::Source { flow } => ElementKindDef::Source { flow: *flow },
        ElementData::Tap { open } => ElementKindDef::Tap { open: *open },
        ElementData::Sink => ElementKindDef::Sink,
        ElementData::Split => ElementKindDef::Split,
        ElementData::Multisplit { proportions } => ElementKindDef::Multisplit {
            proportions: proportions.clone(),
        },
    }
}
