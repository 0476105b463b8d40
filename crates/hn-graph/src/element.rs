//! Element model: the node kinds of a hydraulic network and their output slots.

use std::fmt;

use hn_core::{ElementId, Real};

/// Kind of a network element, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// No input, constant output flow.
    Source,
    /// Passes its input through when open, nothing when closed.
    Tap,
    /// Terminal element.
    Sink,
    /// Two outputs, each receiving half the input.
    Split,
    /// N outputs, each receiving a configured proportion of the input.
    Multisplit,
}

impl ElementKind {
    /// Label used in observer notifications and layouts.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Source => "Source",
            ElementKind::Tap => "Tap",
            ElementKind::Sink => "Sink",
            ElementKind::Split => "Split",
            ElementKind::Multisplit => "Multisplit",
        }
    }

    /// Split and Multisplit: elements with more than one output slot.
    pub fn is_branching(self) -> bool {
        matches!(self, ElementKind::Split | ElementKind::Multisplit)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific attributes of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    Source { flow: Real },
    Tap { open: bool },
    Sink,
    Split,
    Multisplit { proportions: Vec<Real> },
}

impl ElementData {
    /// A source with zero output flow.
    pub fn source() -> Self {
        ElementData::Source { flow: 0.0 }
    }

    /// A closed tap.
    pub fn tap() -> Self {
        ElementData::Tap { open: false }
    }

    /// A multisplit with `outputs` slots and uniform proportions.
    pub fn multisplit(outputs: usize) -> Self {
        let share = if outputs == 0 {
            0.0
        } else {
            1.0 / outputs as Real
        };
        ElementData::Multisplit {
            proportions: vec![share; outputs],
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementData::Source { .. } => ElementKind::Source,
            ElementData::Tap { .. } => ElementKind::Tap,
            ElementData::Sink => ElementKind::Sink,
            ElementData::Split => ElementKind::Split,
            ElementData::Multisplit { .. } => ElementKind::Multisplit,
        }
    }

    /// Number of output slots an element with these attributes owns.
    pub fn output_count(&self) -> usize {
        match self {
            ElementData::Source { .. } | ElementData::Tap { .. } | ElementData::Sink => 1,
            ElementData::Split => 2,
            ElementData::Multisplit { proportions } => proportions.len(),
        }
    }
}

/// A node of the network.
///
/// Outputs are a fixed-size slot array: one slot for Source/Tap/Sink, two for
/// Split, N for Multisplit. Traversal code only ever looks at `outputs()`, so
/// it never needs to know the kind to walk the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) name: String,
    pub(crate) max_flow: Option<Real>,
    pub(crate) data: ElementData,
    pub(crate) outputs: Vec<Option<ElementId>>,
}

impl Element {
    pub(crate) fn new(id: ElementId, name: String, data: ElementData) -> Self {
        let outputs = vec![None; data.output_count()];
        Self {
            id,
            name,
            max_flow: None,
            data,
            outputs,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    /// Output slots, in slot order.
    pub fn outputs(&self) -> &[Option<ElementId>] {
        &self.outputs
    }

    /// Occupied output slots, in slot order.
    pub fn live_outputs(&self) -> impl Iterator<Item = (usize, ElementId)> + '_ {
        self.outputs
            .iter()
            .enumerate()
            .filter_map(|(slot, target)| target.map(|id| (slot, id)))
    }

    /// Maximum acceptable input flow; `None` means unbounded.
    pub fn max_flow(&self) -> Option<Real> {
        self.max_flow
    }

    pub fn set_max_flow(&mut self, max_flow: Real) {
        self.max_flow = Some(max_flow);
    }

    pub fn clear_max_flow(&mut self) {
        self.max_flow = None;
    }

    /// Output flow of a source, `None` for other kinds.
    pub fn flow(&self) -> Option<Real> {
        match self.data {
            ElementData::Source { flow } => Some(flow),
            _ => None,
        }
    }

    /// Open state of a tap, `None` for other kinds.
    pub fn is_open(&self) -> Option<bool> {
        match self.data {
            ElementData::Tap { open } => Some(open),
            _ => None,
        }
    }

    /// Proportions of a multisplit, `None` for other kinds.
    pub fn proportions(&self) -> Option<&[Real]> {
        match &self.data {
            ElementData::Multisplit { proportions } => Some(proportions),
            _ => None,
        }
    }

    /// Connect the first output slot.
    pub(crate) fn connect(&mut self, target: Option<ElementId>) {
        self.connect_at(target, 0);
    }

    /// Connect a specific output slot.
    ///
    /// Single-slot kinds only accept index 0; any index without a slot is
    /// ignored and `false` is returned.
    pub(crate) fn connect_at(&mut self, target: Option<ElementId>, index: usize) -> bool {
        match self.outputs.get_mut(index) {
            Some(slot) => {
                *slot = target;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: u32) -> ElementId {
        ElementId::new(i + 1).unwrap()
    }

    #[test]
    fn slot_counts_follow_kind() {
        assert_eq!(ElementData::source().output_count(), 1);
        assert_eq!(ElementData::tap().output_count(), 1);
        assert_eq!(ElementData::Sink.output_count(), 1);
        assert_eq!(ElementData::Split.output_count(), 2);
        assert_eq!(ElementData::multisplit(4).output_count(), 4);
    }

    #[test]
    fn multisplit_defaults_to_uniform_shares() {
        let data = ElementData::multisplit(4);
        let e = Element::new(id(0), "M".into(), data);
        assert_eq!(e.proportions(), Some(&[0.25, 0.25, 0.25, 0.25][..]));
        assert_eq!(e.outputs().len(), 4);
    }

    #[test]
    fn connect_at_ignores_missing_slots() {
        let mut tap = Element::new(id(0), "T".into(), ElementData::tap());
        assert!(!tap.connect_at(Some(id(1)), 1));
        assert_eq!(tap.outputs(), &[None]);
        assert!(tap.connect_at(Some(id(1)), 0));
        assert_eq!(tap.outputs(), &[Some(id(1))]);

        let mut split = Element::new(id(2), "X".into(), ElementData::Split);
        assert!(split.connect_at(Some(id(3)), 1));
        assert!(!split.connect_at(Some(id(4)), 2));
        assert_eq!(split.outputs(), &[None, Some(id(3))]);
    }

    #[test]
    fn kind_specific_accessors() {
        let src = Element::new(id(0), "S".into(), ElementData::Source { flow: 3.5 });
        assert_eq!(src.flow(), Some(3.5));
        assert_eq!(src.is_open(), None);
        assert_eq!(src.proportions(), None);

        let tap = Element::new(id(1), "T".into(), ElementData::tap());
        assert_eq!(tap.is_open(), Some(false));
        assert_eq!(tap.flow(), None);
    }

    #[test]
    fn live_outputs_skip_empty_slots() {
        let mut split = Element::new(id(0), "X".into(), ElementData::Split);
        split.connect_at(Some(id(5)), 1);
        let live: Vec<_> = split.live_outputs().collect();
        assert_eq!(live, vec![(1, id(5))]);
    }

    #[test]
    fn max_flow_defaults_to_unbounded() {
        let mut sink = Element::new(id(0), "K".into(), ElementData::Sink);
        assert_eq!(sink.max_flow(), None);
        sink.set_max_flow(5.0);
        assert_eq!(sink.max_flow(), Some(5.0));
        sink.clear_max_flow();
        assert_eq!(sink.max_flow(), None);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ElementKind::Multisplit.to_string(), "Multisplit");
        assert!(ElementKind::Split.is_branching());
        assert!(!ElementKind::Tap.is_branching());
    }
}
