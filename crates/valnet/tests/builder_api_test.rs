//! Integration tests for the GraphBuilder API
//!
//! These tests drive the public pipeline from export text to SVG.

use valnet::{
    GraphBuilder, ValnetError,
    config::AppConfig,
    geometry::Point,
    identifier::Id,
    shell::Viewport,
    source::{Scope, SourceError},
};

const HERBS: &str = r#"{
    "projects": { "Project-1": { "name": "Herbs" } },
    "processes": {
        "Process-1": { "name": "Harvest", "project-id": "Project-1",
                       "start": "2014-03-01", "end": "2014-03-03", "next": ["ResourceType-1"] },
        "Process-2": { "name": "Dry", "project-id": "Project-1",
                       "start": "2014-03-04", "end": "2014-03-10", "next": [] },
        "Process-3": { "name": "Sell", "start": "2014-04-01", "end": "2014-04-01", "next": [] }
    },
    "resource_types": {
        "ResourceType-1": { "name": "Fresh herbs", "next": ["Process-2"] },
        "ResourceType-2": { "name": "Jars", "next": [] }
    }
}"#;

fn config(toml_text: &str) -> AppConfig {
    toml::from_str(toml_text).expect("valid config")
}

#[test]
fn test_load_assemble_render() {
    let builder = GraphBuilder::default();
    let network = builder.load(HERBS).expect("Failed to load export");
    let mut graph = builder
        .assemble(&network, &Scope::All)
        .expect("Failed to assemble graph");
    builder.layout(&mut graph).expect("Failed to lay out graph");

    let svg = builder
        .render_svg(&graph, &Viewport::new())
        .expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    for name in ["Harvest", "Dry", "Sell", "Fresh herbs", "Jars"] {
        assert!(svg.contains(name), "missing {name}");
    }
}

#[test]
fn test_layout_keeps_processes_on_their_dates() {
    let builder = GraphBuilder::new(config("[layout]\naxes = \"both\"\niterations = 30"));
    let network = builder.load(HERBS).unwrap();
    let mut graph = builder.assemble(&network, &Scope::All).unwrap();
    let before: Vec<(Id, Option<f32>)> =
        graph.nodes().map(|node| (node.id(), node.fixed_x())).collect();

    builder.layout(&mut graph).unwrap();

    for (id, fixed_x) in before {
        let node = graph.node(id).unwrap();
        if let Some(x) = fixed_x {
            assert_eq!(node.position().x(), x, "{id} left its date");
        }
        assert!(node.position().x().is_finite());
        assert!(node.position().y().is_finite());
    }
}

#[test]
fn test_layout_is_deterministic() {
    let builder = GraphBuilder::new(config("[layout]\naxes = \"both\""));
    let network = builder.load(HERBS).unwrap();

    let positions = || -> Vec<Point> {
        let mut graph = builder.assemble(&network, &Scope::All).unwrap();
        builder.layout(&mut graph).unwrap();
        graph.nodes().map(|node| node.position()).collect()
    };

    assert_eq!(positions(), positions());
}

#[test]
fn test_project_scope() {
    let builder = GraphBuilder::default();
    let network = builder.load(HERBS).unwrap();
    let graph = builder
        .assemble(&network, &"project:Project-1".parse().unwrap())
        .unwrap();

    assert!(graph.contains_node(Id::new("Process-1")));
    assert!(graph.contains_node(Id::new("Process-2")));
    assert!(!graph.contains_node(Id::new("Process-3")));
    assert!(graph.contains_node(Id::new("ResourceType-1")));
    assert!(!graph.contains_node(Id::new("ResourceType-2")));
    assert_eq!(graph.edges().len(), 2);
}

#[test]
fn test_syntax_error_keeps_source() {
    let builder = GraphBuilder::default();
    let err = builder.load("{ \"processes\": [ }").unwrap_err();

    match err {
        ValnetError::Source {
            err: SourceError::Json { line, .. },
            src,
        } => {
            assert_eq!(line, 1);
            assert_eq!(src.as_deref(), Some("{ \"processes\": [ }"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_scope_target() {
    let builder = GraphBuilder::default();
    let network = builder.load(HERBS).unwrap();
    let err = builder
        .assemble(&network, &Scope::Agent(Id::new("Agent-1")))
        .unwrap_err();

    assert!(matches!(
        err,
        ValnetError::Source {
            err: SourceError::UnknownScope { kind: "agent", .. },
            src: None,
        }
    ));
}

#[test]
fn test_invalid_config_values() {
    let builder = GraphBuilder::new(config("[layout]\naxes = \"diagonal\""));
    let network = builder.load(HERBS).unwrap();
    let mut graph = builder.assemble(&network, &Scope::All).unwrap();
    let untouched = graph.clone();

    let err = builder.layout(&mut graph).unwrap_err();
    assert!(matches!(err, ValnetError::Config(_)));
    assert_eq!(graph, untouched);

    let builder = GraphBuilder::new(config("[style]\nprocess_color = \"not-a-color\""));
    let err = builder.assemble(&network, &Scope::All).unwrap_err();
    assert!(matches!(err, ValnetError::Config(_)));
}

#[test]
fn test_non_finite_config_values() {
    let builder = GraphBuilder::new(config("[timeline]\nx_scale = inf"));
    let network = builder.load(HERBS).unwrap();
    let err = builder.assemble(&network, &Scope::All).unwrap_err();
    assert!(matches!(err, ValnetError::Config(ref message) if message.contains("x_scale")));

    let builder = GraphBuilder::new(config("[layout]\nrepulsion = nan"));
    let mut graph = builder.assemble(&network, &Scope::All).unwrap();
    let untouched = graph.clone();
    let err = builder.layout(&mut graph).unwrap_err();
    assert!(matches!(err, ValnetError::Config(_)));
    assert_eq!(graph, untouched);
}

#[test]
fn test_empty_export() {
    let builder = GraphBuilder::default();
    let network = builder.load("{}").unwrap();
    let mut graph = builder.assemble(&network, &Scope::All).unwrap();
    builder.layout(&mut graph).unwrap();

    assert_eq!(graph.nodes_count(), 0);
    let svg = builder.render_svg(&graph, &Viewport::new()).unwrap();
    assert!(svg.contains("<svg"));
}
