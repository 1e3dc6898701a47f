//! The process graph owned by the caller of the layout engine.
//!
//! A [`Graph`] is an insertion-ordered set of [`Node`]s plus a list of
//! directed [`Edge`]s. Insertion order matters: the force layout visits nodes
//! in this order, so two graphs built the same way always lay out the same.
//!
//! Unlike a browser page there is no process-wide node registry; every
//! consumer (layout, interaction, rendering) receives the graph explicitly.

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use valnet_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::layout::Constraints;

/// Errors raised while building or mutating a [`Graph`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("edge {from} -> {to} references unknown node `{missing}`")]
    UnknownEndpoint { from: Id, to: Id, missing: Id },

    #[error("node `{0}` does not exist")]
    NodeNotFound(Id),
}

/// Domain category of a node, taken from the data source's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    Process,
    ResourceType,
    #[default]
    Other,
}

impl NodeKind {
    /// Maps the data source's `type` string onto a kind.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "process" => Self::Process,
            "resourcetype" => Self::ResourceType,
            _ => Self::Other,
        }
    }
}

/// Fill colors used while a node is pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinPalette {
    process: Color,
    other: Color,
}

impl PinPalette {
    pub fn new(process: Color, other: Color) -> Self {
        Self { process, other }
    }

    /// Highlight color for a pinned node of the given kind.
    pub fn color_for(&self, kind: NodeKind) -> Color {
        match kind {
            NodeKind::Process => self.process,
            NodeKind::ResourceType | NodeKind::Other => self.other,
        }
    }
}

impl Default for PinPalette {
    fn default() -> Self {
        Self {
            process: Color::new("#4cfe4c").expect("valid pin color"),
            other: Color::new("#dda0dd").expect("valid pin color"),
        }
    }
}

/// A positioned node with its display metadata.
///
/// Only `position`, `pinned` and `fixed_x` are meaningful to the layout
/// engine. The rest is carried for the render shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    kind: NodeKind,
    name: String,
    position: Point,
    size: Size,
    color: Color,
    saved_color: Option<Color>,
    pinned: bool,
    fixed_x: Option<f32>,
    url: Option<String>,
    dates: Option<String>,
    zoom: f32,
}

impl Node {
    /// Creates an unpinned node at the origin with a default 150x25 box.
    pub fn new(id: Id, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            position: Point::default(),
            size: Size::new(150.0, 25.0),
            color: Color::default(),
            saved_color: None,
            pinned: false,
            fixed_x: None,
            url: None,
            dates: None,
            zoom: 1.0,
        }
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Locks the node's x-coordinate to `x` after every layout pass.
    pub fn with_fixed_x(mut self, x: f32) -> Self {
        self.fixed_x = Some(x);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_dates(mut self, dates: impl Into<String>) -> Self {
        self.dates = Some(dates.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn fixed_x(&self) -> Option<f32> {
        self.fixed_x
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn dates(&self) -> Option<&str> {
        self.dates.as_deref()
    }

    /// Content zoom factor of the node's panel.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Bounding box of the node, centered on its position.
    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    /// Pins the node and swaps in the highlight color. No-op when already pinned.
    pub fn pin(&mut self, palette: &PinPalette) {
        if self.pinned {
            return;
        }
        self.pinned = true;
        self.saved_color = Some(self.color);
        self.color = palette.color_for(self.kind);
    }

    /// Unpins the node and restores the color it had before pinning.
    pub fn unpin(&mut self) {
        if !self.pinned {
            return;
        }
        self.pinned = false;
        if let Some(color) = self.saved_color.take() {
            self.color = color;
        }
    }
}

/// Optional per-edge styling; opaque to the layout engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeStyle {
    label: Option<String>,
}

impl EdgeStyle {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A directed edge between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    style: EdgeStyle,
}

impl Edge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }
}

/// Insertion-ordered node set plus directed edges.
///
/// Self-loops and parallel edges are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. A node with the same id is replaced in place, keeping
    /// its original position in the iteration order.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id(), node);
    }

    /// Adds a directed edge after checking both endpoints exist.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownEndpoint`] when either endpoint is missing.
    pub fn add_edge(&mut self, source: Id, target: Id, style: EdgeStyle) -> Result<(), GraphError> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::UnknownEndpoint {
                    from: source,
                    to: target,
                    missing: endpoint,
                });
            }
        }
        self.edges.push(Edge {
            source,
            target,
            style,
        });
        Ok(())
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Like [`Graph::node_mut`] but reports a missing node as an error.
    pub fn try_node_mut(&mut self, id: Id) -> Result<&mut Node, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edge endpoints in edge order, as consumed by the layout engine.
    pub fn edge_pairs(&self) -> Vec<(Id, Id)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect()
    }

    /// Pinned and fixed-X constraints of the current node set.
    pub fn constraints(&self) -> Constraints {
        let mut constraints = Constraints::default();
        for node in self.nodes.values() {
            if node.pinned {
                constraints.pin(node.id);
            }
            if let Some(x) = node.fixed_x {
                constraints.fix_x(node.id, x);
            }
        }
        constraints
    }

    /// Flips the pinned state of a node and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] for an unknown id.
    pub fn toggle_pin(&mut self, id: Id, palette: &PinPalette) -> Result<bool, GraphError> {
        let node = self.try_node_mut(id)?;
        if node.pinned {
            node.unpin();
        } else {
            node.pin(palette);
        }
        debug!(node_id:% = id, pinned = node.pinned; "Toggled pin");
        Ok(node.pinned)
    }

    /// Bounding box of all nodes, or `None` for an empty graph.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut nodes = self.nodes.values();
        let first = nodes.next()?.bounds();
        Some(nodes.fold(first, |acc, node| acc.merge(&node.bounds())))
    }
}
