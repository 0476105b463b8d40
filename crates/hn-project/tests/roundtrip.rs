use hn_graph::Network;
use hn_project::schema::*;
use hn_project::{from_network, load_json, load_yaml, save_json, save_yaml, to_network};

fn sample() -> Network {
    Network::builder()
        .add_source("S")
        .with_flow(10.0)
        .link_to_tap("T")
        .open()
        .max_flow(12.0)
        .link_to_split("X")
        .with_outputs()
        .link_to_sink("A")
        .then()
        .link_to_multisplit("M", 2)
        .with_proportions([0.25, 0.75])
        .with_outputs()
        .link_to_sink("B")
        .then()
        .link_to_sink("C")
        .done()
        .done()
        .complete()
        .unwrap()
}

#[test]
fn roundtrip_yaml_network() {
    let def = from_network("sample", &sample());

    let path = std::env::temp_dir().join("hn_project_roundtrip.yaml");
    save_yaml(&path, &def).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(def, loaded);
}

#[test]
fn roundtrip_json_network() {
    let def = from_network("sample", &sample());

    let path = std::env::temp_dir().join("hn_project_roundtrip.json");
    save_json(&path, &def).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(def, loaded);
}

#[test]
fn rebuilt_network_has_same_layout() {
    let original = sample();
    let rebuilt = to_network(&from_network("sample", &original)).unwrap();
    assert_eq!(original.layout(), rebuilt.layout());
    assert_eq!(original.len(), rebuilt.len());
}

#[test]
fn save_rejects_invalid_description() {
    let def = NetworkDef {
        version: 1,
        name: "dup".into(),
        max_elements: None,
        elements: vec![
            ElementDef {
                name: "K".into(),
                kind: ElementKindDef::Sink,
                max_flow: None,
                outputs: vec![],
            },
            ElementDef {
                name: "K".into(),
                kind: ElementKindDef::Sink,
                max_flow: None,
                outputs: vec![],
            },
        ],
    };
    let path = std::env::temp_dir().join("hn_project_invalid.yaml");
    assert!(save_yaml(&path, &def).is_err());
}
