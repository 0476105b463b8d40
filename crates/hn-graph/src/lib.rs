//! hn-graph: network model layer for hydronet.
//!
//! Provides:
//! - Element model (kinds, attributes, output slots)
//! - The `Network` container with structural deletion and rewiring
//! - A fluent, scope-aware `NetworkBuilder`
//! - Stable id -> position indexing for traversals
//! - Non-fatal structural diagnostics and a text layout
//!
//! # Example
//!
//! ```
//! use hn_graph::Network;
//!
//! let mut net = Network::new();
//! let s = net.add_source("Source").unwrap();
//! let k = net.add_sink("Drain").unwrap();
//! net.connect(s, k).unwrap();
//! net.set_flow(s, 2.5).unwrap();
//!
//! assert_eq!(net.len(), 2);
//! assert_eq!(net.layout(), "[Source]Source +-> [Drain]Sink");
//! ```

pub mod builder;
pub mod element;
pub mod error;
pub mod indexing;
pub mod layout;
pub mod network;
pub mod validate;

// Re-exports for ergonomics
pub use builder::{BuilderScope, NetworkBuilder};
pub use element::{Element, ElementData, ElementKind};
pub use error::{GraphError, GraphResult};
pub use indexing::IndexMap;
pub use network::Network;
pub use validate::{Diagnostic, diagnose};
