//! End-to-end flow propagation checks.

use hn_core::Real;
use hn_graph::{ElementKind, Network, NetworkBuilder};
use hn_sim::{
    FlowEvent, FlowLog, OutFlow, SimOptions, TracingObserver, run, simulate, simulate_checked,
};
use proptest::prelude::*;

fn flows_only(log: &FlowLog) -> Vec<FlowEvent> {
    log.flows().cloned().collect()
}

#[test]
fn open_tap_chain_passes_source_flow() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(7.25)
        .link_to_tap("T")
        .open()
        .link_to_sink("K")
        .complete()
        .unwrap();
    let mut log = FlowLog::new();
    simulate(&net, &mut log);
    assert_eq!(log.in_flow_of("K"), Some(7.25));
}

#[test]
fn split_halves_flow() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(10.0)
        .link_to_split("X")
        .with_outputs()
        .link_to_sink("A")
        .then()
        .link_to_sink("B")
        .done()
        .complete()
        .unwrap();
    assert_eq!(net.len(), 4);

    let mut log = FlowLog::new();
    simulate(&net, &mut log);
    assert_eq!(log.in_flow_of("A"), Some(5.0));
    assert_eq!(log.in_flow_of("B"), Some(5.0));
    assert_eq!(log.out_flow_of("X"), Some(&OutFlow::Split(vec![5.0, 5.0])));
}

#[test]
fn multisplit_uses_proportions() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(10.0)
        .link_to_multisplit("M", 2)
        .with_proportions([0.3, 0.7])
        .with_outputs()
        .link_to_sink("A")
        .then()
        .link_to_sink("B")
        .done()
        .complete()
        .unwrap();
    let mut log = FlowLog::new();
    simulate(&net, &mut log);
    assert_eq!(log.in_flow_of("A"), Some(3.0));
    assert_eq!(log.in_flow_of("B"), Some(7.0));
}

#[test]
fn multisplit_proportions_are_not_renormalized() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(10.0)
        .link_to_multisplit("M", 2)
        .with_proportions([0.5, 1.0])
        .with_outputs()
        .link_to_sink("A")
        .then()
        .link_to_sink("B")
        .done()
        .complete()
        .unwrap();
    let mut log = FlowLog::new();
    simulate(&net, &mut log);
    assert_eq!(log.in_flow_of("A"), Some(5.0));
    assert_eq!(log.in_flow_of("B"), Some(10.0));
}

#[test]
fn checked_mode_adds_one_violation_only() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(6.0)
        .link_to_tap("T")
        .open()
        .max_flow(5.0)
        .link_to_sink("K")
        .complete()
        .unwrap();

    let mut plain = FlowLog::new();
    simulate(&net, &mut plain);
    let mut checked = FlowLog::new();
    let report = simulate_checked(&net, &mut checked);

    assert_eq!(report.violations, 1);
    assert_eq!(
        checked.violations().cloned().collect::<Vec<_>>(),
        vec![FlowEvent::Violation {
            kind: ElementKind::Tap,
            name: "T".into(),
            in_flow: 6.0,
            max_flow: 5.0,
        }]
    );
    assert_eq!(flows_only(&plain), flows_only(&checked));
    assert_eq!(plain.violations().count(), 0);
}

#[test]
fn checked_multisplit_reports_violation_before_its_flow() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(10.0)
        .link_to_multisplit("M", 2)
        .with_proportions([0.3, 0.7])
        .max_flow(9.0)
        .with_outputs()
        .link_to_sink("A")
        .then()
        .link_to_sink("B")
        .done()
        .complete()
        .unwrap();

    let mut log = FlowLog::new();
    let report = simulate_checked(&net, &mut log);

    assert_eq!(report.violations, 1);
    let m_events: Vec<&FlowEvent> = log
        .events()
        .iter()
        .filter(|e| e.name() == "M")
        .collect();
    assert_eq!(
        m_events,
        vec![
            &FlowEvent::Violation {
                kind: ElementKind::Multisplit,
                name: "M".into(),
                in_flow: 10.0,
                max_flow: 9.0,
            },
            &FlowEvent::Flow {
                kind: ElementKind::Multisplit,
                name: "M".into(),
                in_flow: Some(10.0),
                out_flow: OutFlow::Split(vec![3.0, 7.0]),
            },
        ]
    );
    assert_eq!(log.in_flow_of("A"), Some(3.0));
    assert_eq!(log.in_flow_of("B"), Some(7.0));
}

#[test]
fn checked_split_within_capacity_is_silent() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(10.0)
        .link_to_split("X")
        .max_flow(10.0)
        .with_outputs()
        .link_to_sink("A")
        .then()
        .link_to_sink("B")
        .done()
        .complete()
        .unwrap();

    let mut log = FlowLog::new();
    assert_eq!(simulate_checked(&net, &mut log).violations, 0);
}

#[test]
fn deleting_tap_is_pass_through() {
    let build = || {
        Network::builder()
            .add_source("A")
            .with_flow(9.0)
            .link_to_tap("Tap")
            .open()
            .link_to_sink("B")
            .complete()
            .unwrap()
    };

    let mut before = FlowLog::new();
    simulate(&build(), &mut before);

    let mut net = build();
    assert!(net.delete("Tap"));
    let mut after = FlowLog::new();
    simulate(&net, &mut after);

    assert_eq!(after.in_flow_of("B"), before.in_flow_of("B"));
    assert_eq!(after.in_flow_of("B"), Some(9.0));
    assert_eq!(after.in_flow_of("Tap"), None);
}

#[test]
fn deleting_closed_tap_restores_flow() {
    let mut net = Network::builder()
        .add_source("A")
        .with_flow(9.0)
        .link_to_tap("Tap")
        .closed()
        .link_to_sink("B")
        .complete()
        .unwrap();
    assert!(net.delete("Tap"));
    let mut log = FlowLog::new();
    simulate(&net, &mut log);
    assert_eq!(log.in_flow_of("B"), Some(9.0));
}

#[test]
fn deleting_source_leaves_orphan_unsimulated() {
    let mut net = Network::builder()
        .add_source("S")
        .with_flow(1.0)
        .link_to_sink("K")
        .complete()
        .unwrap();
    assert!(net.delete("S"));
    let mut log = FlowLog::new();
    let report = simulate(&net, &mut log);
    assert_eq!(report.sources, 0);
    assert!(log.events().is_empty());
}

#[test]
fn nested_scopes_traverse_depth_first() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(8.0)
        .link_to_split("X")
        .with_outputs()
        .link_to_split("Y")
        .with_outputs()
        .link_to_sink("A")
        .then()
        .link_to_sink("B")
        .done()
        .then()
        .link_to_sink("C")
        .done()
        .complete()
        .unwrap();

    let mut log = FlowLog::new();
    simulate(&net, &mut log);
    let order: Vec<&str> = log.events().iter().map(|e| e.name()).collect();
    assert_eq!(order, vec!["S", "X", "Y", "A", "B", "C"]);
    assert_eq!(log.in_flow_of("A"), Some(2.0));
    assert_eq!(log.in_flow_of("C"), Some(4.0));
}

#[test]
fn tracing_observer_accepts_notifications() {
    let net = Network::builder()
        .add_source("S")
        .with_flow(1.0)
        .link_to_sink("K")
        .max_flow(0.5)
        .complete()
        .unwrap();
    let report = run(&net, &SimOptions::checked(), &mut TracingObserver);
    assert_eq!(report.visited, 2);
    assert_eq!(report.violations, 1);
}

/// One level of tap + split per `depth`, ending in sinks.
fn branch(mut b: NetworkBuilder, depth: usize, prefix: &str, cap: Option<Real>) -> NetworkBuilder {
    if depth == 0 {
        b = b.link_to_sink(format!("{}K", prefix));
        if let Some(c) = cap {
            b = b.max_flow(c);
        }
        return b;
    }
    b = b.link_to_tap(format!("{}T", prefix)).open();
    if let Some(c) = cap {
        b = b.max_flow(c);
    }
    b = b.link_to_split(format!("{}X", prefix)).with_outputs();
    b = branch(b, depth - 1, &format!("{}0", prefix), cap);
    b = b.then();
    b = branch(b, depth - 1, &format!("{}1", prefix), cap);
    b.done()
}

/// Build S -> split tree of the given depth, with optional capacities.
fn random_tree(flow: Real, depth: usize, cap: Option<Real>) -> Network {
    let b = Network::builder().add_source("S").with_flow(flow);
    branch(b, depth, "n", cap).complete().unwrap()
}

proptest! {
    #[test]
    fn checked_and_plain_flows_match(
        flow in 0.0_f64..1000.0,
        depth in 0usize..5,
        cap in 0.0_f64..500.0,
    ) {
        let net = random_tree(flow, depth, Some(cap));
        let mut plain = FlowLog::new();
        let mut checked = FlowLog::new();
        let plain_report = simulate(&net, &mut plain);
        let checked_report = simulate_checked(&net, &mut checked);

        prop_assert_eq!(flows_only(&plain), flows_only(&checked));
        prop_assert_eq!(plain_report.visited, checked_report.visited);
        prop_assert_eq!(checked_report.violations, checked.violations().count());
    }

    #[test]
    fn split_tree_conserves_flow(flow in 0.0_f64..1000.0, depth in 0usize..6) {
        let net = random_tree(flow, depth, None);
        let mut log = FlowLog::new();
        simulate(&net, &mut log);

        let total: Real = log
            .flows()
            .filter_map(|e| match e {
                FlowEvent::Flow { out_flow: OutFlow::None, in_flow, .. } => *in_flow,
                _ => None,
            })
            .sum();
        prop_assert!((total - flow).abs() <= 1e-9 * flow.max(1.0));
    }

    #[test]
    fn open_chain_passes_flow_through(flow in 0.0_f64..1e6, taps in 0usize..25) {
        let mut b = Network::builder().add_source("S").with_flow(flow);
        for i in 0..taps {
            b = b.link_to_tap(format!("T{}", i)).open();
        }
        let net = b.link_to_sink("K").complete().unwrap();

        let mut log = FlowLog::new();
        let report = simulate(&net, &mut log);
        prop_assert_eq!(report.visited, taps + 2);
        prop_assert_eq!(log.in_flow_of("K"), Some(flow));
    }
}
