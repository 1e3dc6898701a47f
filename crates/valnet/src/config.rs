//! Configuration types for Valnet process graphs.
//!
//! All types implement [`serde::Deserialize`] and fill every missing field
//! with its default, so a partial TOML file is always valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LayoutConfig`] - Force constants, iteration count and axis mask.
//! - [`TimelineConfig`] - How process dates map to horizontal positions.
//! - [`StyleConfig`] - Node, pin and edge colors.
//! - [`InteractionConfig`] - Redraw rate, wheel zoom step and panel limits.
//!
//! # Example
//!
//! ```
//! # use valnet::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().iterations(), 50);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use valnet_core::{
    color::Color,
    draw::{StrokeDefinition, StrokeStyle},
    geometry::Axes,
};

use crate::{
    graph::PinPalette,
    layout::{
        Engine,
        force::{DEFAULT_ATTRACTION, DEFAULT_REPULSION},
    },
    panel::{DEFAULT_ICON_SIZE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, ZoomRange},
    scheduler::DEFAULT_FPS,
    shell::DEFAULT_ZOOM_STEP,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    timeline: TimelineConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    interaction: InteractionConfig,
}

impl AppConfig {
    pub fn new(
        layout: LayoutConfig,
        timeline: TimelineConfig,
        style: StyleConfig,
        interaction: InteractionConfig,
    ) -> Self {
        Self {
            layout,
            timeline,
            style,
            interaction,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Mutable access for command-line overrides.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    pub fn timeline(&self) -> &TimelineConfig {
        &self.timeline
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }
}

/// Force layout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    repulsion: f32,
    attraction: f32,
    iterations: usize,
    /// One of `x`, `y`, `xy`/`both`, `none`.
    axes: String,
}

impl LayoutConfig {
    pub fn repulsion(&self) -> f32 {
        self.repulsion
    }

    pub fn attraction(&self) -> f32 {
        self.attraction
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the parsed axis mask.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a known mask.
    pub fn axes(&self) -> Result<Axes, String> {
        self.axes
            .parse()
            .map_err(|err| format!("Invalid layout axes in config: {err}"))
    }

    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    pub fn set_axes(&mut self, axes: impl Into<String>) -> &mut Self {
        self.axes = axes.into();
        self
    }

    /// Builds a force engine with the configured constants.
    ///
    /// # Errors
    ///
    /// Returns an error if either constant is infinite or NaN.
    pub fn engine(&self) -> Result<Engine, String> {
        let repulsion = finite("layout.repulsion", self.repulsion)?;
        let attraction = finite("layout.attraction", self.attraction)?;
        let mut engine = Engine::new();
        engine
            .set_repulsion_constant(repulsion)
            .set_attraction_constant(attraction);
        Ok(engine)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: DEFAULT_REPULSION,
            attraction: DEFAULT_ATTRACTION,
            iterations: 50,
            // Processes are fixed on X by the timeline.
            axes: "y".to_string(),
        }
    }
}

/// Mapping of process dates to horizontal positions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    x_scale: f32,
    min_process_width: f32,
    instant_padding_ms: i64,
    seed: u64,
}

impl TimelineConfig {
    /// Width of the whole timeline in scene units.
    pub fn x_scale(&self) -> f32 {
        self.x_scale
    }

    pub fn min_process_width(&self) -> f32 {
        self.min_process_width
    }

    /// Padding added on each side of a process whose start equals its end.
    pub fn instant_padding_ms(&self) -> i64 {
        self.instant_padding_ms
    }

    /// Seed of the generator used for initial positions.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Checks that the scene sizes are finite and not negative.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("timeline.x_scale", self.x_scale),
            ("timeline.min_process_width", self.min_process_width),
        ] {
            if finite(field, value)? < 0.0 {
                return Err(format!("Invalid {field} in config: {value} is negative"));
            }
        }
        Ok(())
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            x_scale: 1000.0,
            min_process_width: 150.0,
            instant_padding_ms: 75,
            seed: 0,
        }
    }
}

/// Colors and strokes of rendered graphs.
///
/// Colors are kept as strings and validated when read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    edge_color: String,
    edge_width: f32,
    /// `solid`, `dashed`, `dotted` or an SVG dasharray such as `"10,5"`.
    edge_style: String,
    process_color: String,
    resource_color: String,
    pinned_process_color: String,
    pinned_resource_color: String,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn process_color(&self) -> Result<Color, String> {
        parse_color("process_color", &self.process_color)
    }

    pub fn resource_color(&self) -> Result<Color, String> {
        parse_color("resource_color", &self.resource_color)
    }

    /// Stroke of every edge.
    pub fn edge_stroke(&self) -> Result<StrokeDefinition, String> {
        let color = parse_color("edge_color", &self.edge_color)?;
        let width = finite("style.edge_width", self.edge_width)?;
        let style: StrokeStyle = self
            .edge_style
            .parse()
            .map_err(|err| format!("Invalid edge_style in config: {err}"))?;
        let mut stroke = StrokeDefinition::new(color, width);
        stroke.set_style(style);
        Ok(stroke)
    }

    /// Highlight colors of pinned nodes.
    pub fn pin_palette(&self) -> Result<PinPalette, String> {
        Ok(PinPalette::new(
            parse_color("pinned_process_color", &self.pinned_process_color)?,
            parse_color("pinned_resource_color", &self.pinned_resource_color)?,
        ))
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            edge_color: "black".to_string(),
            edge_width: 1.0,
            edge_style: "solid".to_string(),
            process_color: "#bbffbb".to_string(),
            resource_color: "#bbbbff".to_string(),
            pinned_process_color: "#4cfe4c".to_string(),
            pinned_resource_color: "#dda0dd".to_string(),
        }
    }
}

fn finite(field: &str, value: f32) -> Result<f32, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("Invalid {field} in config: {value} is not finite"))
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {field} in config: {err}"))
}

/// Canvas interaction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    redraw_fps: u32,
    zoom_step: f32,
    icon_size: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl InteractionConfig {
    pub fn redraw_fps(&self) -> u32 {
        self.redraw_fps
    }

    /// Scale factor applied per wheel notch.
    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    pub fn icon_size(&self) -> f32 {
        self.icon_size
    }

    pub fn zoom_range(&self) -> ZoomRange {
        ZoomRange::new(self.min_zoom, self.max_zoom)
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            redraw_fps: DEFAULT_FPS,
            zoom_step: DEFAULT_ZOOM_STEP,
            icon_size: DEFAULT_ICON_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}
