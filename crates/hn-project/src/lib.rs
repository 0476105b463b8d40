//! hn-project: network description files and their validation.
//!
//! A description lists elements in insertion order with their attributes and
//! the names of their downstream elements per output slot. It is loaded from
//! YAML or JSON, validated, and turned into an [`hn_graph::Network`].

pub mod convert;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use convert::{from_network, to_network};
pub use schema::*;
pub use validate::{ValidationError, validate_network_def};

/// Newest description format this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Graph(#[from] hn_graph::GraphError),

    #[error("Unsupported file extension: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<NetworkDef> {
    let content = std::fs::read_to_string(path)?;
    let def: NetworkDef = serde_yaml::from_str(&content)?;
    validate_network_def(&def)?;
    Ok(def)
}

pub fn save_yaml(path: &Path, def: &NetworkDef) -> ProjectResult<()> {
    validate_network_def(def)?;
    let content = serde_yaml::to_string(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<NetworkDef> {
    let content = std::fs::read_to_string(path)?;
    let def: NetworkDef = serde_json::from_str(&content)?;
    validate_network_def(&def)?;
    Ok(def)
}

pub fn save_json(path: &Path, def: &NetworkDef) -> ProjectResult<()> {
    validate_network_def(def)?;
    let content = serde_json::to_string_pretty(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a description, choosing the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<NetworkDef> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}
