//! Flow propagation over a network.

use hn_core::{ElementId, Real};
use hn_graph::{Element, ElementData, IndexMap, Network};
use tracing::{trace, warn};

use crate::observer::{FlowObserver, OutFlow};

/// Options for simulation runs.
#[derive(Clone, Debug, Default)]
pub struct SimOptions {
    /// Compare each element's input flow with its `max_flow` and report
    /// violations. Flow values and visiting order are unaffected.
    pub check_max_flow: bool,
}

impl SimOptions {
    /// Options with capacity checking enabled.
    pub fn checked() -> Self {
        Self {
            check_max_flow: true,
        }
    }
}

/// Summary of one simulation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimReport {
    /// Sources the pass started from.
    pub sources: usize,
    /// Flow notifications sent (one per visit; an element fed through two
    /// paths is visited twice).
    pub visited: usize,
    /// Violation notifications sent.
    pub violations: usize,
}

/// Pending visit: an element and the flow arriving at it.
#[derive(Clone, Copy, Debug)]
struct Frame {
    id: ElementId,
    in_flow: Real,
}

/// Simulate without capacity checks.
pub fn simulate<O: FlowObserver + ?Sized>(network: &Network, observer: &mut O) -> SimReport {
    run(network, &SimOptions::default(), observer)
}

/// Simulate and report every element whose input exceeds its `max_flow`.
pub fn simulate_checked<O: FlowObserver + ?Sized>(
    network: &Network,
    observer: &mut O,
) -> SimReport {
    run(network, &SimOptions::checked(), observer)
}

/// Propagate flow from every source, in insertion order, depth-first.
///
/// Lower output slots are explored before higher ones. Empty slots end their
/// branch silently. Sinks end a branch even if their slot is connected.
///
/// The network must be acyclic.
pub fn run<O: FlowObserver + ?Sized>(
    network: &Network,
    opts: &SimOptions,
    observer: &mut O,
) -> SimReport {
    let index = IndexMap::from_network(network);
    let mut report = SimReport::default();
    let mut stack: Vec<Frame> = Vec::new();

    for source in network.sources() {
        report.sources += 1;
        stack.push(Frame {
            id: source.id(),
            in_flow: 0.0,
        });

        while let Some(frame) = stack.pop() {
            let Some(element) = index.get(frame.id).and_then(|pos| network.at(pos)) else {
                warn!(id = %frame.id, "slot refers to an element outside the network");
                continue;
            };
            report.visited += 1;
            visit(element, frame.in_flow, opts, observer, &mut report, &mut stack);
        }
    }

    report
}

fn visit<O: FlowObserver + ?Sized>(
    element: &Element,
    in_flow: Real,
    opts: &SimOptions,
    observer: &mut O,
    report: &mut SimReport,
    stack: &mut Vec<Frame>,
) {
    let kind = element.kind();
    let name = element.name();

    let out_flow = match element.data() {
        ElementData::Source { flow } => {
            trace!(name, out = flow, "source");
            observer.notify_flow(kind, name, None, &OutFlow::Single(*flow));
            push_outputs(element, &[*flow], stack);
            return;
        }
        ElementData::Tap { open } => OutFlow::Single(if *open { in_flow } else { 0.0 }),
        ElementData::Split => OutFlow::Split(vec![in_flow / 2.0; 2]),
        ElementData::Multisplit { proportions } => {
            OutFlow::Split(proportions.iter().map(|p| in_flow * p).collect())
        }
        ElementData::Sink => OutFlow::None,
    };

    if opts.check_max_flow {
        if let Some(max_flow) = element.max_flow() {
            if in_flow > max_flow {
                report.violations += 1;
                observer.notify_flow_error(kind, name, in_flow, max_flow);
            }
        }
    }

    trace!(name, %kind, in_flow, ?out_flow, "visit");
    observer.notify_flow(kind, name, Some(in_flow), &out_flow);

    match &out_flow {
        OutFlow::Single(v) => push_outputs(element, &[*v], stack),
        OutFlow::Split(vs) => push_outputs(element, vs, stack),
        OutFlow::None => {}
    }
}

/// Queue the occupied output slots, highest slot first so the lowest is
/// popped next.
fn push_outputs(element: &Element, flows: &[Real], stack: &mut Vec<Frame>) {
    for (slot, target) in element.outputs().iter().enumerate().rev() {
        if let (Some(id), Some(&in_flow)) = (target, flows.get(slot)) {
            stack.push(Frame { id: *id, in_flow });
        }
    }
}
