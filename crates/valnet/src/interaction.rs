//! Pointer and wheel handling for the process graph canvas.
//!
//! [`Controller`] is an explicit state machine. Each [`InputEvent`] is applied
//! to the graph and viewport it is handed, and the controller reports what
//! the shell has to do next as an [`Effect`].

use log::debug;

use valnet_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    graph::{Graph, GraphError, PinPalette},
    panel::{self, DEFAULT_ICON_SIZE, ZoomRange},
    shell::Viewport,
};

/// Mouse button of a press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What a drag gesture is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragTarget {
    /// Empty canvas: the whole scene pans.
    Canvas,
    /// A single node, which the layout holds in place until release.
    Node(Id),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        target: DragTarget,
        /// Pointer position of the previous event, in screen space.
        last: Point,
        /// Whether the pointer travelled since the press.
        moved: bool,
    },
    ResizingPanel {
        node: Id,
        origin: Point,
        start_size: Size,
    },
}

/// Input forwarded by the shell. Positions are in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: PointerButton,
        /// Node under the pointer, if any.
        node: Option<Id>,
    },
    PointerMove {
        position: Point,
        primary_held: bool,
    },
    PointerUp,
    Wheel {
        delta_y: f32,
    },
    Click {
        node: Id,
    },
    DoubleClick {
        node: Id,
    },
    ResizeStart {
        node: Id,
        position: Point,
    },
    ZoomSlider {
        node: Id,
        fraction: f32,
    },
    WindowResized {
        size: Size,
    },
}

/// Follow-up work for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Redraw,
    OpenUrl(String),
}

/// Interaction state machine.
#[derive(Debug, Clone)]
pub struct Controller {
    state: InteractionState,
    palette: PinPalette,
    zoom_range: ZoomRange,
    icon_size: f32,
    /// Set when a drag that moved ends; the click the shell sends for the
    /// same press is dropped.
    suppress_click: bool,
}

impl Controller {
    pub fn new(palette: PinPalette, zoom_range: ZoomRange, icon_size: f32) -> Self {
        Self {
            state: InteractionState::Idle,
            palette,
            zoom_range,
            icon_size,
            suppress_click: false,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn palette(&self) -> &PinPalette {
        &self.palette
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    pub fn icon_size(&self) -> f32 {
        self.icon_size
    }

    /// Node currently under a drag, which layout passes must not move.
    pub fn held_node(&self) -> Option<Id> {
        match self.state {
            InteractionState::Dragging {
                target: DragTarget::Node(id),
                ..
            } => Some(id),
            _ => None,
        }
    }

    /// Applies `event` to `graph` and `viewport`.
    ///
    /// Events naming a node that is not in `graph` fail with
    /// [`GraphError::NodeNotFound`] and leave the state machine idle.
    pub fn handle(
        &mut self,
        event: InputEvent,
        graph: &mut Graph,
        viewport: &mut Viewport,
    ) -> Result<Option<Effect>, GraphError> {
        let result = self.dispatch(event, graph, viewport);
        if result.is_err() {
            self.transition(InteractionState::Idle);
        }
        result
    }

    fn dispatch(
        &mut self,
        event: InputEvent,
        graph: &mut Graph,
        viewport: &mut Viewport,
    ) -> Result<Option<Effect>, GraphError> {
        match event {
            InputEvent::PointerDown {
                position,
                button,
                node,
            } => self.pointer_down(position, button, node, graph),
            InputEvent::PointerMove {
                position,
                primary_held,
            } => self.pointer_move(position, primary_held, graph, viewport),
            InputEvent::PointerUp => {
                if let InteractionState::Dragging { moved: true, .. } = self.state {
                    self.suppress_click = true;
                }
                self.transition(InteractionState::Idle);
                Ok(None)
            }
            InputEvent::Wheel { delta_y } => {
                if delta_y == 0.0 {
                    return Ok(None);
                }
                viewport.zoom_wheel(delta_y);
                debug!(scale = viewport.scale(); "Viewport zoomed");
                Ok(Some(Effect::Redraw))
            }
            InputEvent::Click { node } => {
                if std::mem::take(&mut self.suppress_click) {
                    debug!(node_id:% = node; "Click after drag ignored");
                    return Ok(None);
                }
                graph.toggle_pin(node, &self.palette)?;
                Ok(Some(Effect::Redraw))
            }
            InputEvent::DoubleClick { node } => {
                let node = graph.node(node).ok_or(GraphError::NodeNotFound(node))?;
                Ok(node.url().map(|url| Effect::OpenUrl(url.to_string())))
            }
            InputEvent::ResizeStart { node, position } => {
                let start_size = graph
                    .node(node)
                    .ok_or(GraphError::NodeNotFound(node))?
                    .size();
                self.transition(InteractionState::ResizingPanel {
                    node,
                    origin: position,
                    start_size,
                });
                Ok(None)
            }
            InputEvent::ZoomSlider { node, fraction } => {
                let zoom = self.zoom_range.zoom_at(fraction);
                graph.try_node_mut(node)?.set_zoom(zoom);
                debug!(node_id:% = node, zoom; "Panel zoom changed");
                Ok(Some(Effect::Redraw))
            }
            InputEvent::WindowResized { .. } => Ok(Some(Effect::Redraw)),
        }
    }

    fn pointer_down(
        &mut self,
        position: Point,
        button: PointerButton,
        node: Option<Id>,
        graph: &Graph,
    ) -> Result<Option<Effect>, GraphError> {
        if button != PointerButton::Primary {
            return Ok(None);
        }
        self.suppress_click = false;
        let target = match node {
            None => DragTarget::Canvas,
            Some(id) => {
                graph.node(id).ok_or(GraphError::NodeNotFound(id))?;
                DragTarget::Node(id)
            }
        };
        self.transition(InteractionState::Dragging {
            target,
            last: position,
            moved: false,
        });
        Ok(None)
    }

    fn pointer_move(
        &mut self,
        position: Point,
        primary_held: bool,
        graph: &mut Graph,
        viewport: &mut Viewport,
    ) -> Result<Option<Effect>, GraphError> {
        if !primary_held {
            // The release happened outside the canvas.
            self.transition(InteractionState::Idle);
            return Ok(None);
        }

        match self.state {
            InteractionState::Idle => Ok(None),
            InteractionState::Dragging {
                target,
                last,
                moved,
            } => {
                let delta = position.sub_point(last);
                self.state = InteractionState::Dragging {
                    target,
                    last: position,
                    moved: moved || !delta.is_zero(),
                };
                if delta.is_zero() {
                    return Ok(None);
                }
                match target {
                    DragTarget::Canvas => viewport.pan(delta),
                    DragTarget::Node(id) => {
                        let node = graph.try_node_mut(id)?;
                        let moved = node
                            .position()
                            .add_point(viewport.to_scene_delta(delta));
                        node.set_position(moved);
                    }
                }
                Ok(Some(Effect::Redraw))
            }
            InteractionState::ResizingPanel {
                node,
                origin,
                start_size,
            } => {
                let delta = position.sub_point(origin);
                let requested = Size::new(
                    start_size.width() + delta.x(),
                    start_size.height() + delta.y(),
                );
                let size = panel::clamp_size(requested, self.icon_size);
                graph.try_node_mut(node)?.set_size(size);
                Ok(Some(Effect::Redraw))
            }
        }
    }

    fn transition(&mut self, next: InteractionState) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            debug!(from:? = self.state, to:? = next; "Interaction state changed");
        }
        self.state = next;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(
            PinPalette::default(),
            ZoomRange::default(),
            DEFAULT_ICON_SIZE,
        )
    }
}
