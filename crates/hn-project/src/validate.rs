//! Network description validation.

use std::collections::{HashMap, HashSet};

use crate::schema::{ElementKindDef, NetworkDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate element name: {name}")]
    DuplicateName { name: String },

    #[error("Missing reference: {name} in outputs of {context}")]
    MissingReference { name: String, context: String },

    #[error("Too many outputs for {element}: {given} given, {slots} available")]
    TooManyOutputs {
        element: String,
        slots: usize,
        given: usize,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cycle through element: {name}")]
    Cycle { name: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_network_def(def: &NetworkDef) -> Result<(), ValidationError> {
    if def.version == 0 || def.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: def.version,
        });
    }

    let mut names = HashSet::new();
    for element in &def.elements {
        if !names.insert(element.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: element.name.clone(),
            });
        }
    }

    if let Some(limit) = def.max_elements {
        if def.elements.len() > limit {
            return Err(ValidationError::InvalidValue {
                field: "max_elements".to_string(),
                value: limit.to_string(),
                reason: format!("{} elements declared", def.elements.len()),
            });
        }
    }

    for element in &def.elements {
        match &element.kind {
            ElementKindDef::Source { flow } => check_finite(&element.name, "flow", *flow)?,
            ElementKindDef::Multisplit { proportions } => {
                if proportions.is_empty() {
                    return Err(ValidationError::InvalidValue {
                        field: format!("{}.proportions", element.name),
                        value: "[]".to_string(),
                        reason: "a multisplit needs at least one output".to_string(),
                    });
                }
                for p in proportions {
                    check_finite(&element.name, "proportions", *p)?;
                }
            }
            _ => {}
        }
        if let Some(max_flow) = element.max_flow {
            check_finite(&element.name, "max_flow", max_flow)?;
        }

        let slots = element.kind.slots();
        if element.outputs.len() > slots {
            return Err(ValidationError::TooManyOutputs {
                element: element.name.clone(),
                slots,
                given: element.outputs.len(),
            });
        }
        for target in element.outputs.iter().flatten() {
            if !names.contains(target.as_str()) {
                return Err(ValidationError::MissingReference {
                    name: target.clone(),
                    context: element.name.clone(),
                });
            }
        }
    }

    check_acyclic(def)
}

fn check_finite(element: &str, field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: format!("{}.{}", element, field),
        value: value.to_string(),
        reason: "must be a finite number".to_string(),
    })
}

/// Kahn's algorithm over the declared outputs.
fn check_acyclic(def: &NetworkDef) -> Result<(), ValidationError> {
    let index: HashMap<&str, usize> = def
        .elements
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name.as_str(), i))
        .collect();

    let edges: Vec<Vec<usize>> = def
        .elements
        .iter()
        .map(|e| {
            e.outputs
                .iter()
                .flatten()
                .filter_map(|name| index.get(name.as_str()).copied())
                .collect()
        })
        .collect();

    let mut in_degree = vec![0usize; def.elements.len()];
    for targets in &edges {
        for &t in targets {
            in_degree[t] += 1;
        }
    }

    let mut ready: Vec<usize> = (0..def.elements.len())
        .filter(|&i| in_degree[i] == 0)
        .collect();
    let mut done = 0;
    while let Some(i) = ready.pop() {
        done += 1;
        for &t in &edges[i] {
            in_degree[t] -= 1;
            if in_degree[t] == 0 {
                ready.push(t);
            }
        }
    }

    if done == def.elements.len() {
        return Ok(());
    }
    let stuck = in_degree
        .iter()
        .position(|&d| d > 0)
        .map(|i| def.elements[i].name.clone())
        .unwrap_or_default();
    Err(ValidationError::Cycle { name: stuck })
}
