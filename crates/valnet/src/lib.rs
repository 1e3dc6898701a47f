//! Valnet - process graph layout for value-network accounting data.
//!
//! A value network export lists processes with their dates and the resource
//! types flowing between them. This crate turns such an export into a graph,
//! places processes on a timeline, spreads the rest with a one-sided force
//! layout and renders the result to SVG. The interactive pieces (pointer
//! handling, redraw throttling, panels) live in [`canvas`] and friends.

pub mod canvas;
pub mod config;
pub mod export;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod panel;
pub mod scheduler;
pub mod shell;
pub mod source;
pub mod timeline;

mod error;

pub use valnet_core::{color, draw, geometry, identifier};

pub use error::ValnetError;

use log::{debug, info};

use config::AppConfig;
use export::SvgBuilder;
use graph::Graph;
use shell::{Scene, Viewport};
use source::{Scope, ValueNetwork};
use timeline::Assembler;

/// Builder for loading, laying out and rendering process graphs.
///
/// # Examples
///
/// ```rust
/// use valnet::{GraphBuilder, shell::Viewport, source::Scope};
///
/// let json = r#"{
///     "processes": {
///         "Process-1": { "name": "Harvest", "start": "2014-03-01", "end": "2014-03-03",
///                        "next": ["ResourceType-1"] }
///     },
///     "resource_types": {
///         "ResourceType-1": { "name": "Herbs", "next": [] }
///     }
/// }"#;
///
/// let builder = GraphBuilder::default();
/// let network = builder.load(json).expect("valid export");
/// let mut graph = builder.assemble(&network, &Scope::All).expect("valid dates");
/// builder.layout(&mut graph).expect("edges are consistent");
///
/// let svg = builder.render_svg(&graph, &Viewport::default()).expect("valid style");
/// assert!(svg.contains("Harvest"));
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: AppConfig,
}

impl GraphBuilder {
    /// Create a new graph builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a value-network export.
    ///
    /// # Errors
    ///
    /// Returns `ValnetError::Source` carrying `json`, so syntax errors can
    /// be reported with a location.
    pub fn load(&self, json: &str) -> Result<ValueNetwork, ValnetError> {
        info!(bytes = json.len(); "Loading value network");
        ValueNetwork::from_json(json).map_err(|err| ValnetError::new_source_error(err, json))
    }

    /// Build the graph for the part of `network` selected by `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ValnetError::Config` for invalid node colors or timeline
    /// sizes and `ValnetError::Source` for unknown scope targets or bad dates.
    pub fn assemble(&self, network: &ValueNetwork, scope: &Scope) -> Result<Graph, ValnetError> {
        let style = self.config.style();
        self.config
            .timeline()
            .validate()
            .map_err(ValnetError::Config)?;
        let mut assembler = Assembler::new(self.config.timeline().clone());
        assembler
            .set_process_color(style.process_color().map_err(ValnetError::Config)?)
            .set_resource_color(style.resource_color().map_err(ValnetError::Config)?);

        Ok(assembler.assemble(network, scope)?)
    }

    /// Run the configured force layout on `graph` in place.
    ///
    /// # Errors
    ///
    /// Returns `ValnetError::Config` for an invalid axis mask or force
    /// constant. The graph is unchanged on any error.
    pub fn layout(&self, graph: &mut Graph) -> Result<(), ValnetError> {
        let layout = self.config.layout();
        let axes = layout.axes().map_err(ValnetError::Config)?;
        let engine = layout.engine().map_err(ValnetError::Config)?;
        let edges = graph.edge_pairs();
        let constraints = graph.constraints();

        info!(
            node_count = graph.nodes_count(),
            iterations = layout.iterations();
            "Calculating layout"
        );
        engine.apply(graph, &edges, axes, layout.iterations(), &constraints)?;
        debug!("Layout calculated");
        Ok(())
    }

    /// Render `graph` under `viewport` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `ValnetError::Export` for invalid style colors.
    pub fn render_svg(&self, graph: &Graph, viewport: &Viewport) -> Result<String, ValnetError> {
        let renderer = SvgBuilder::new().with_style(self.config.style()).build()?;
        let svg = renderer
            .document(&Scene { graph, viewport })
            .to_string();
        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }
}
