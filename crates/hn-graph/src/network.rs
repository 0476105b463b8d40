//! The network container: owns every element and performs structural edits.

use hn_core::{ElementId, IdSequence, Real};
use tracing::debug;

use crate::builder::NetworkBuilder;
use crate::element::{Element, ElementData, ElementKind};
use crate::error::{GraphError, GraphResult};

/// An ordered collection of elements connected by output slots.
///
/// Insertion order is preserved and drives both enumeration and the
/// simulation's source order. Edges are stored as [`ElementId`]s; every
/// occupied slot refers to an element of this network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    elements: Vec<Element>,
    ids: IdSequence,
    capacity_limit: Option<usize>,
}

impl Network {
    /// Create an empty, growable network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a network that refuses to hold more than `limit` elements.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            elements: Vec::with_capacity(limit),
            capacity_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Start a fluent builder for a new network.
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity_limit
    }

    /// Append a new element and return its id.
    pub fn add(&mut self, name: impl Into<String>, data: ElementData) -> GraphResult<ElementId> {
        let name = name.into();
        if let Some(limit) = self.capacity_limit {
            if self.elements.len() >= limit {
                return Err(GraphError::CapacityExceeded { limit });
            }
        }
        if data.output_count() == 0 {
            return Err(GraphError::NoOutputs { name });
        }
        let id = self.ids.next_id().ok_or(GraphError::CapacityExceeded {
            limit: u32::MAX as usize,
        })?;

        debug!(%id, name = %name, kind = %data.kind(), "element added");
        self.elements.push(Element::new(id, name, data));
        Ok(id)
    }

    pub fn add_source(&mut self, name: impl Into<String>) -> GraphResult<ElementId> {
        self.add(name, ElementData::source())
    }

    pub fn add_tap(&mut self, name: impl Into<String>) -> GraphResult<ElementId> {
        self.add(name, ElementData::tap())
    }

    pub fn add_sink(&mut self, name: impl Into<String>) -> GraphResult<ElementId> {
        self.add(name, ElementData::Sink)
    }

    pub fn add_split(&mut self, name: impl Into<String>) -> GraphResult<ElementId> {
        self.add(name, ElementData::Split)
    }

    pub fn add_multisplit(
        &mut self,
        name: impl Into<String>,
        outputs: usize,
    ) -> GraphResult<ElementId> {
        self.add(name, ElementData::multisplit(outputs))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Snapshot of all elements in insertion order.
    ///
    /// The returned vector is independent of the network: later edits do not
    /// show up in it.
    pub fn elements(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Borrowing iteration in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Source elements in insertion order.
    pub fn sources(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| e.kind() == ElementKind::Source)
    }

    /// Current position of an element in insertion order.
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Element at a position in insertion order.
    pub fn at(&self, pos: usize) -> Option<&Element> {
        self.elements.get(pos)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> GraphResult<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(GraphError::UnknownElement { id })
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    /// Look up an element by name.
    ///
    /// Names are not required to be unique; the most recently added match wins.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements.iter().rev().find(|e| e.name == name)
    }

    /// Every `(element, slot)` pair whose slot refers to `id`, in insertion order.
    pub fn predecessors(&self, id: ElementId) -> Vec<(ElementId, usize)> {
        self.elements
            .iter()
            .flat_map(|e| {
                e.live_outputs()
                    .filter(move |&(_, target)| target == id)
                    .map(move |(slot, _)| (e.id, slot))
            })
            .collect()
    }

    /// Connect the first output slot of `from` to `to`.
    pub fn connect(&mut self, from: ElementId, to: ElementId) -> GraphResult<()> {
        if !self.contains(to) {
            return Err(GraphError::UnknownElement { id: to });
        }
        self.element_mut(from)?.connect(Some(to));
        Ok(())
    }

    /// Connect output slot `index` of `from` to `to`.
    ///
    /// Returns `Ok(false)` without changing anything when `from` has no such
    /// slot (single-slot kinds only have slot 0).
    pub fn connect_at(
        &mut self,
        from: ElementId,
        to: ElementId,
        index: usize,
    ) -> GraphResult<bool> {
        if !self.contains(to) {
            return Err(GraphError::UnknownElement { id: to });
        }
        let element = self.element_mut(from)?;
        let connected = element.connect_at(Some(to), index);
        if !connected {
            debug!(from = %element.name, slot = index, "connection to missing slot ignored");
        }
        Ok(connected)
    }

    pub fn set_flow(&mut self, id: ElementId, flow: Real) -> GraphResult<()> {
        let element = self.element_mut(id)?;
        if let ElementData::Source { flow: f } = &mut element.data {
            *f = flow;
            return Ok(());
        }
        Err(kind_mismatch(element, ElementKind::Source))
    }

    pub fn set_open(&mut self, id: ElementId, open: bool) -> GraphResult<()> {
        let element = self.element_mut(id)?;
        if let ElementData::Tap { open: o } = &mut element.data {
            *o = open;
            return Ok(());
        }
        Err(kind_mismatch(element, ElementKind::Tap))
    }

    /// Replace a multisplit's proportions. They are kept verbatim, even when
    /// they do not sum to 1.
    pub fn set_proportions(&mut self, id: ElementId, proportions: Vec<Real>) -> GraphResult<()> {
        let element = self.element_mut(id)?;
        let outputs = element.outputs.len();
        if let ElementData::Multisplit { proportions: p } = &mut element.data {
            if proportions.len() != outputs {
                return Err(GraphError::ProportionCount {
                    name: element.name.clone(),
                    expected: outputs,
                    actual: proportions.len(),
                });
            }
            *p = proportions;
            return Ok(());
        }
        Err(kind_mismatch(element, ElementKind::Multisplit))
    }

    pub fn set_max_flow(&mut self, id: ElementId, max_flow: Real) -> GraphResult<()> {
        self.element_mut(id)?.set_max_flow(max_flow);
        Ok(())
    }

    /// Delete the first element called `name` and splice its neighbours together.
    ///
    /// Returns `false` when no element has that name, or when the element is a
    /// split/multisplit with more than one occupied output; the network is
    /// left untouched in both cases.
    ///
    /// The upstream element (the first one in insertion order whose slot refers
    /// to the target) gets that slot repointed at the target's downstream
    /// element, if any. Other slots still referring to the target are emptied.
    pub fn delete(&mut self, name: &str) -> bool {
        let Some(pos) = self.elements.iter().position(|e| e.name == name) else {
            debug!(name, "delete: no such element");
            return false;
        };

        let target = &self.elements[pos];
        let id = target.id;
        let live = target.live_outputs().count();
        if target.kind().is_branching() && live > 1 {
            debug!(name, live, "delete refused: more than one live branch");
            return false;
        }

        let downstream = target
            .live_outputs()
            .map(|(_, next)| next)
            .find(|&next| next != id);
        let mut upstream = self
            .predecessors(id)
            .into_iter()
            .filter(|&(pred, _)| pred != id);

        if let Some((pred, slot)) = upstream.next() {
            if let Ok(element) = self.element_mut(pred) {
                element.connect_at(downstream, slot);
                debug!(name, upstream = %element.name, slot, "rewired around deleted element");
            }
        }
        for (pred, slot) in upstream {
            if let Ok(element) = self.element_mut(pred) {
                element.connect_at(None, slot);
                debug!(
                    name,
                    upstream = %element.name,
                    slot,
                    "extra reference to deleted element cleared"
                );
            }
        }

        // Removing the element from the arena also drops its own slots.
        let removed = self.elements.remove(pos);
        debug!(name, kind = %removed.kind(), "element deleted");
        true
    }
}

fn kind_mismatch(element: &Element, expected: ElementKind) -> GraphError {
    GraphError::KindMismatch {
        name: element.name.clone(),
        expected,
        actual: element.kind(),
    }
}
