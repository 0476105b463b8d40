//! Observer protocol: how a simulation pass reports what it sees.
//!
//! The engine calls an observer synchronously, once per visited element and
//! once per capacity violation, in traversal order. It keeps no history of
//! its own; an observer that needs one (like [`FlowLog`]) accumulates it.

use hn_core::Real;
use hn_graph::ElementKind;

/// Output side of a flow notification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OutFlow {
    /// Not applicable: sinks have no output. Distinct from a zero flow.
    None,
    /// Single output (source, tap).
    Single(Real),
    /// One value per output slot (split, multisplit), empty slots included.
    Split(Vec<Real>),
}

impl OutFlow {
    /// Total flow leaving the element.
    pub fn total(&self) -> Option<Real> {
        match self {
            OutFlow::None => None,
            OutFlow::Single(v) => Some(*v),
            OutFlow::Split(vs) => Some(vs.iter().sum()),
        }
    }
}

/// Receiver of simulation notifications.
pub trait FlowObserver {
    /// Called for every visited element. `in_flow` is `None` for sources,
    /// which have no input.
    fn notify_flow(
        &mut self,
        kind: ElementKind,
        name: &str,
        in_flow: Option<Real>,
        out_flow: &OutFlow,
    );

    /// Called in checked mode when `in_flow` exceeds the element's `max_flow`,
    /// right before that element's `notify_flow`.
    fn notify_flow_error(&mut self, kind: ElementKind, name: &str, in_flow: Real, max_flow: Real);
}

impl<O: FlowObserver + ?Sized> FlowObserver for &mut O {
    fn notify_flow(
        &mut self,
        kind: ElementKind,
        name: &str,
        in_flow: Option<Real>,
        out_flow: &OutFlow,
    ) {
        (**self).notify_flow(kind, name, in_flow, out_flow);
    }

    fn notify_flow_error(&mut self, kind: ElementKind, name: &str, in_flow: Real, max_flow: Real) {
        (**self).notify_flow_error(kind, name, in_flow, max_flow);
    }
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event"))]
pub enum FlowEvent {
    Flow {
        #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_kind"))]
        kind: ElementKind,
        name: String,
        in_flow: Option<Real>,
        out_flow: OutFlow,
    },
    Violation {
        #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_kind"))]
        kind: ElementKind,
        name: String,
        in_flow: Real,
        max_flow: Real,
    },
}

#[cfg(feature = "serde")]
fn serialize_kind<S: serde::Serializer>(kind: &ElementKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.label())
}

impl FlowEvent {
    pub fn name(&self) -> &str {
        match self {
            FlowEvent::Flow { name, .. } | FlowEvent::Violation { name, .. } => name,
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, FlowEvent::Violation { .. })
    }
}

/// Observer that records every notification in order.
#[derive(Debug, Clone, Default)]
pub struct FlowLog {
    events: Vec<FlowEvent>,
}

impl FlowLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications in arrival order.
    pub fn events(&self) -> &[FlowEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<FlowEvent> {
        self.events
    }

    /// Flow notifications only.
    pub fn flows(&self) -> impl Iterator<Item = &FlowEvent> {
        self.events.iter().filter(|e| !e.is_violation())
    }

    /// Violation notifications only.
    pub fn violations(&self) -> impl Iterator<Item = &FlowEvent> {
        self.events.iter().filter(|e| e.is_violation())
    }

    /// Input flow reported for the last visit of `name`.
    pub fn in_flow_of(&self, name: &str) -> Option<Real> {
        self.events.iter().rev().find_map(|e| match e {
            FlowEvent::Flow {
                name: n, in_flow, ..
            } if n == name => *in_flow,
            _ => None,
        })
    }

    /// Output reported for the last visit of `name`.
    pub fn out_flow_of(&self, name: &str) -> Option<&OutFlow> {
        self.events.iter().rev().find_map(|e| match e {
            FlowEvent::Flow {
                name: n, out_flow, ..
            } if n == name => Some(out_flow),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FlowObserver for FlowLog {
    fn notify_flow(
        &mut self,
        kind: ElementKind,
        name: &str,
        in_flow: Option<Real>,
        out_flow: &OutFlow,
    ) {
        self.events.push(FlowEvent::Flow {
            kind,
            name: name.to_string(),
            in_flow,
            out_flow: out_flow.clone(),
        });
    }

    fn notify_flow_error(&mut self, kind: ElementKind, name: &str, in_flow: Real, max_flow: Real) {
        self.events.push(FlowEvent::Violation {
            kind,
            name: name.to_string(),
            in_flow,
            max_flow,
        });
    }
}

/// Observer that forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FlowObserver for TracingObserver {
    fn notify_flow(
        &mut self,
        kind: ElementKind,
        name: &str,
        in_flow: Option<Real>,
        out_flow: &OutFlow,
    ) {
        tracing::info!(%kind, name, ?in_flow, ?out_flow, "flow");
    }

    fn notify_flow_error(&mut self, kind: ElementKind, name: &str, in_flow: Real, max_flow: Real) {
        tracing::warn!(%kind, name, in_flow, max_flow, "max flow exceeded");
    }
}
