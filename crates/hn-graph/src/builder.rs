//! Fluent network builder.

use hn_core::{ElementId, Real};
use tracing::debug;

use crate::element::ElementData;
use crate::error::{GraphError, GraphResult};
use crate::network::Network;

/// One open output scope: a branching element and the slot the next link
/// attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderScope {
    pub element: ElementId,
    pub index: usize,
}

/// Builder for constructing a network with chained calls.
///
/// Each `link_to_*` call appends one element and connects it downstream of
/// the previously linked element, or, right after `with_outputs()`/`then()`,
/// to the current slot of the innermost open scope. Scopes nest, so
/// branches can contain further splits.
///
/// Attribute calls (`with_flow`, `open`, `closed`, `with_proportions`,
/// `max_flow`) apply to the most recently created element and are ignored
/// when its kind does not match.
///
/// ```
/// use hn_graph::Network;
///
/// let net = Network::builder()
///     .add_source("S").with_flow(10.0)
///     .link_to_split("X")
///     .with_outputs()
///         .link_to_sink("A")
///     .then()
///         .link_to_sink("B")
///     .done()
///     .complete()
///     .unwrap();
/// assert_eq!(net.len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    network: Network,
    last: Option<ElementId>,
    current: Option<ElementId>,
    branch: Option<ElementId>,
    scopes: Vec<BuilderScope>,
    attach_to_scope: bool,
    error: Option<GraphError>,
}

impl NetworkBuilder {
    /// Create a builder around an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder around an existing (possibly capacity-limited) network.
    pub fn with_network(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Element that attribute calls currently apply to.
    pub fn current(&self) -> Option<ElementId> {
        self.current
    }

    /// Element the next linear link attaches to.
    pub fn last(&self) -> Option<ElementId> {
        self.last
    }

    /// Open output scopes, outermost first.
    pub fn scopes(&self) -> &[BuilderScope] {
        &self.scopes
    }

    /// Network built so far.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Add a source. It is not connected to anything.
    pub fn add_source(mut self, name: impl Into<String>) -> Self {
        if let Some(id) = self.append(name.into(), ElementData::source()) {
            self.current = Some(id);
            self.last = Some(id);
        }
        self
    }

    pub fn link_to_tap(self, name: impl Into<String>) -> Self {
        self.link(name.into(), ElementData::tap())
    }

    pub fn link_to_sink(self, name: impl Into<String>) -> Self {
        self.link(name.into(), ElementData::Sink)
    }

    /// Link a split; it becomes the target of the next `with_outputs()`.
    pub fn link_to_split(mut self, name: impl Into<String>) -> Self {
        self = self.link(name.into(), ElementData::Split);
        self.branch = self.current;
        self
    }

    /// Link a multisplit with `outputs` slots; it becomes the target of the
    /// next `with_outputs()`.
    pub fn link_to_multisplit(mut self, name: impl Into<String>, outputs: usize) -> Self {
        self = self.link(name.into(), ElementData::multisplit(outputs));
        self.branch = self.current;
        self
    }

    /// Open a scope on the most recent split/multisplit, at slot 0.
    pub fn with_outputs(mut self) -> Self {
        match self.branch {
            Some(element) => {
                self.scopes.push(BuilderScope { element, index: 0 });
                self.attach_to_scope = true;
            }
            None => debug!("with_outputs ignored: no split or multisplit to branch from"),
        }
        self
    }

    /// Move to the next slot of the innermost scope.
    pub fn then(mut self) -> Self {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.index += 1;
                self.attach_to_scope = true;
            }
            None => debug!("then ignored: no open output scope"),
        }
        self
    }

    /// Close the innermost scope; `then()` now advances the enclosing one.
    pub fn done(mut self) -> Self {
        match self.scopes.pop() {
            Some(_) => {
                self.attach_to_scope = false;
                self.branch = self.scopes.last().map(|scope| scope.element);
            }
            None => debug!("done ignored: no open output scope"),
        }
        self
    }

    /// Set the output flow of the current source.
    pub fn with_flow(mut self, flow: Real) -> Self {
        self.configure("with_flow", |net, id| net.set_flow(id, flow));
        self
    }

    /// Open the current tap.
    pub fn open(mut self) -> Self {
        self.configure("open", |net, id| net.set_open(id, true));
        self
    }

    /// Close the current tap.
    pub fn closed(mut self) -> Self {
        self.configure("closed", |net, id| net.set_open(id, false));
        self
    }

    /// Set the proportions of the current multisplit.
    pub fn with_proportions(mut self, proportions: impl Into<Vec<Real>>) -> Self {
        let proportions = proportions.into();
        self.configure("with_proportions", |net, id| {
            net.set_proportions(id, proportions)
        });
        self
    }

    /// Set the maximum input flow of the current element (any kind).
    pub fn max_flow(mut self, max_flow: Real) -> Self {
        self.configure("max_flow", |net, id| net.set_max_flow(id, max_flow));
        self
    }

    /// Finish building.
    ///
    /// Fails with the first network error met while adding elements (only a
    /// capacity-limited network can produce one).
    pub fn complete(self) -> GraphResult<Network> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.network),
        }
    }

    fn append(&mut self, name: String, data: ElementData) -> Option<ElementId> {
        if self.error.is_some() {
            return None;
        }
        match self.network.add(name, data) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(error = %err, "builder stopped adding elements");
                self.error = Some(err);
                None
            }
        }
    }

    fn link(mut self, name: String, data: ElementData) -> Self {
        let Some(id) = self.append(name, data) else {
            return self;
        };

        let upstream = match self.scopes.last() {
            Some(scope) if self.attach_to_scope => Some((scope.element, scope.index)),
            _ => self.last.map(|last| (last, 0)),
        };
        self.attach_to_scope = false;

        if let Some((from, index)) = upstream {
            if let Err(err) = self.network.connect_at(from, id, index) {
                debug!(error = %err, "builder link skipped");
            }
        }
        self.current = Some(id);
        self.last = Some(id);
        self
    }

    fn configure<F>(&mut self, call: &'static str, apply: F)
    where
        F: FnOnce(&mut Network, ElementId) -> GraphResult<()>,
    {
        let Some(id) = self.current else {
            debug!(call, "ignored: no current element");
            return;
        };
        if let Err(err) = apply(&mut self.network, id) {
            debug!(call, error = %err, "ignored");
        }
    }
}
