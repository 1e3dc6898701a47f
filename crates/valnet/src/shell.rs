//! The render/interaction shell seam.
//!
//! The layout engine only ever sees a [`NodePositions`] accessor. Rendering
//! goes through a [`Renderer`] that receives a [`Scene`]: the graph plus the
//! whole-scene [`Viewport`] transform.

use indexmap::IndexMap;

use valnet_core::{geometry::Point, identifier::Id};

use crate::graph::Graph;

/// Read/write access to node positions, in a stable order.
pub trait NodePositions {
    /// Node identities in iteration order.
    fn node_ids(&self) -> Vec<Id>;

    fn position(&self, id: Id) -> Option<Point>;

    /// Overwrites the position of `id`. Unknown ids are ignored.
    fn set_position(&mut self, id: Id, position: Point);
}

impl NodePositions for Graph {
    fn node_ids(&self) -> Vec<Id> {
        self.nodes().map(|node| node.id()).collect()
    }

    fn position(&self, id: Id) -> Option<Point> {
        self.node(id).map(|node| node.position())
    }

    fn set_position(&mut self, id: Id, position: Point) {
        if let Some(node) = self.node_mut(id) {
            node.set_position(position);
        }
    }
}

impl NodePositions for IndexMap<Id, Point> {
    fn node_ids(&self) -> Vec<Id> {
        self.keys().copied().collect()
    }

    fn position(&self, id: Id) -> Option<Point> {
        self.get(&id).copied()
    }

    fn set_position(&mut self, id: Id, position: Point) {
        if let Some(slot) = self.get_mut(&id) {
            *slot = position;
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub graph: &'a Graph,
    pub viewport: &'a Viewport,
}

/// Consumer of laid-out scenes.
pub trait Renderer {
    fn render(&mut self, scene: &Scene<'_>);
}

/// Initial scene translation, which lifts the top band of the timeline
/// into view.
pub const INITIAL_TRANSLATE: Point = Point::new(0.0, -200.0);

/// Default zoom factor applied per wheel notch.
pub const DEFAULT_ZOOM_STEP: f32 = 0.9;

/// Whole-scene transform: a translation followed by a uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f32,
    translate: Point,
    zoom_step: f32,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            translate: INITIAL_TRANSLATE,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }

    /// Sets the factor applied per wheel notch. Values outside `(0, 1)` are
    /// ignored.
    pub fn set_zoom_step(&mut self, step: f32) -> &mut Self {
        if step > 0.0 && step < 1.0 {
            self.zoom_step = step;
        }
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translate(&self) -> Point {
        self.translate
    }

    /// Applies one wheel notch. Scrolling down (`delta_y > 0`) shrinks the
    /// scene, scrolling up grows it, and a zero delta does nothing.
    pub fn zoom_wheel(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.scale *= self.zoom_step;
        } else if delta_y < 0.0 {
            self.scale /= self.zoom_step;
        }
    }

    pub fn pan(&mut self, delta: Point) {
        self.translate = self.translate.add_point(delta);
    }

    /// Converts a screen-space displacement into scene space.
    pub fn to_scene_delta(&self, delta: Point) -> Point {
        delta.scale(1.0 / self.scale)
    }

    /// SVG `transform` attribute value for the scene group.
    pub fn svg_transform(&self) -> String {
        format!(
            "translate({},{}) scale({},{})",
            self.translate.x(),
            self.translate.y(),
            self.scale,
            self.scale
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}
