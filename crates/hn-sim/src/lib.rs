//! hn-sim: deterministic flow simulation for hydronet networks.
//!
//! The engine walks a [`hn_graph::Network`] from every source, depth-first,
//! and reports each element's input/output flow to a [`FlowObserver`]. In
//! checked mode it additionally reports elements whose input exceeds their
//! configured maximum.
//!
//! ```
//! use hn_graph::Network;
//! use hn_sim::{FlowLog, simulate};
//!
//! let net = Network::builder()
//!     .add_source("S").with_flow(10.0)
//!     .link_to_tap("T").open()
//!     .link_to_sink("K")
//!     .complete()
//!     .unwrap();
//!
//! let mut log = FlowLog::new();
//! simulate(&net, &mut log);
//! assert_eq!(log.in_flow_of("K"), Some(10.0));
//! ```

pub mod engine;
pub mod observer;

pub use engine::{SimOptions, SimReport, run, simulate, simulate_checked};
pub use observer::{FlowEvent, FlowLog, FlowObserver, OutFlow, TracingObserver};
