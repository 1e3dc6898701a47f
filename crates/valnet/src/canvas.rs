//! The interactive process-graph canvas.
//!
//! [`Canvas`] owns everything one view needs: the graph, the scene
//! transform, the interaction state machine, the redraw throttle and the
//! renderer. Handlers take `&mut self`, so a layout run and an input event
//! can never interleave.

use std::time::Instant;

use log::{debug, info};

use valnet_core::{geometry::Axes, identifier::Id};

use crate::{
    config::{AppConfig, LayoutConfig},
    error::ValnetError,
    graph::{Graph, GraphError},
    interaction::{Controller, Effect, InputEvent, InteractionState},
    layout::{Engine, LayoutError},
    panel,
    scheduler::RedrawScheduler,
    shell::{Renderer, Scene, Viewport},
};

/// Panel state of a node as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelView {
    pub zoom: f32,
    /// Slider position in `[0, 1]` matching `zoom`.
    pub slider: f32,
    pub collapsed: bool,
}

pub struct Canvas {
    graph: Graph,
    viewport: Viewport,
    controller: Controller,
    scheduler: RedrawScheduler,
    renderer: Box<dyn Renderer>,
    engine: Engine,
    axes: Axes,
    iterations: usize,
}

impl Canvas {
    /// Canvas with the default configuration.
    pub fn new(graph: Graph, renderer: Box<dyn Renderer>) -> Self {
        let layout = LayoutConfig::default();
        Self {
            graph,
            viewport: Viewport::new(),
            controller: Controller::default(),
            scheduler: RedrawScheduler::default(),
            renderer,
            engine: Engine::default(),
            axes: Axes::Y,
            iterations: layout.iterations(),
        }
    }

    /// Canvas configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ValnetError::Config`] for an invalid axis mask or color.
    pub fn from_config(
        graph: Graph,
        renderer: Box<dyn Renderer>,
        config: &AppConfig,
    ) -> Result<Self, ValnetError> {
        let interaction = config.interaction();
        let palette = config.style().pin_palette().map_err(ValnetError::Config)?;
        let mut viewport = Viewport::new();
        viewport.set_zoom_step(interaction.zoom_step());

        Ok(Self {
            graph,
            viewport,
            controller: Controller::new(
                palette,
                interaction.zoom_range(),
                interaction.icon_size(),
            ),
            scheduler: RedrawScheduler::with_fps(interaction.redraw_fps()),
            renderer,
            engine: config.layout().engine().map_err(ValnetError::Config)?,
            axes: config.layout().axes().map_err(ValnetError::Config)?,
            iterations: config.layout().iterations(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn interaction_state(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn set_layout_axes(&mut self, axes: Axes) -> &mut Self {
        self.axes = axes;
        self
    }

    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Runs the force layout over the current positions and schedules a
    /// redraw. On error no position changes.
    pub fn run_layout(&mut self, now: Instant) -> Result<(), LayoutError> {
        let edges = self.graph.edge_pairs();
        let mut constraints = self.graph.constraints();
        if let Some(id) = self.controller.held_node() {
            constraints.pin(id);
        }
        self.engine.apply(
            &mut self.graph,
            &edges,
            self.axes,
            self.iterations,
            &constraints,
        )?;
        info!(
            node_count = self.graph.nodes_count(),
            iterations = self.iterations;
            "Canvas layout updated"
        );
        self.request_redraw(now);
        Ok(())
    }

    /// Feeds one input event through the state machine.
    ///
    /// Redraw effects are routed through the throttle. The effect is still
    /// returned so the shell can act on URL requests.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        now: Instant,
    ) -> Result<Option<Effect>, GraphError> {
        let effect = self
            .controller
            .handle(event, &mut self.graph, &mut self.viewport)?;
        if effect == Some(Effect::Redraw) {
            self.request_redraw(now);
        }
        Ok(effect)
    }

    /// Renders a deferred redraw if its window has passed. Returns whether a
    /// frame was rendered.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.scheduler.poll(now) {
            self.render();
            return true;
        }
        false
    }

    /// Renders a deferred redraw right away.
    pub fn flush(&mut self) -> bool {
        if self.scheduler.flush() {
            self.render();
            return true;
        }
        false
    }

    /// Drops a deferred redraw.
    pub fn cancel_redraw(&mut self) {
        self.scheduler.cancel();
    }

    /// Panel zoom and collapse state of `id`.
    pub fn panel_view(&self, id: Id) -> Option<PanelView> {
        let node = self.graph.node(id)?;
        let zoom = node.zoom();
        Some(PanelView {
            zoom,
            slider: self.controller.zoom_range().fraction_for(zoom),
            collapsed: panel::is_collapsed(node.size(), self.controller.icon_size()),
        })
    }

    fn request_redraw(&mut self, now: Instant) {
        if self.scheduler.request(now) {
            self.render();
        }
    }

    fn render(&mut self) {
        debug!("Rendering canvas");
        let scene = Scene {
            graph: &self.graph,
            viewport: &self.viewport,
        };
        self.renderer.render(&scene);
    }
}
