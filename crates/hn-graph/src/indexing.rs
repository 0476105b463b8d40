//! Stable indexing for read-only passes.
//!
//! Maps element ids to their current position in the network so a traversal
//! can resolve every edge in O(1).

use hn_core::ElementId;

use crate::error::{GraphError, GraphResult};
use crate::network::Network;

/// Id -> position lookup for one snapshot of a network.
///
/// Any structural edit of the network invalidates the map.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Position -> id, in insertion order.
    ids: Vec<ElementId>,

    /// Reverse lookup: id index -> position.
    /// Sized to max(id.offset) + 1; None for ids not in the network.
    positions: Vec<Option<usize>>,
}

impl IndexMap {
    /// Build an index map from a network.
    pub fn from_network(network: &Network) -> Self {
        let ids: Vec<ElementId> = network.iter().map(|e| e.id()).collect();

        let len = ids
            .iter()
            .map(|id| id.offset() + 1)
            .max()
            .unwrap_or(0);
        let mut positions = vec![None; len];
        for (pos, id) in ids.iter().enumerate() {
            positions[id.offset()] = Some(pos);
        }

        Self { ids, positions }
    }

    /// Number of indexed elements.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of an id, if it belongs to the indexed network.
    pub fn get(&self, id: ElementId) -> Option<usize> {
        self.positions.get(id.offset()).copied().flatten()
    }

    /// Position of an id, as an error when it is unknown.
    pub fn position(&self, id: ElementId) -> GraphResult<usize> {
        self.get(id).ok_or(GraphError::IdNotFound { id })
    }

    /// Id at a position (None if out of bounds).
    pub fn id(&self, pos: usize) -> Option<ElementId> {
        self.ids.get(pos).copied()
    }

    /// All ids in position order.
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }
}
