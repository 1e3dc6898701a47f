//! Visual definitions shared by the render shell.
//!
//! Only edge strokes live here; node boxes are plain filled rectangles and are
//! described directly by the graph model.

mod stroke;

pub use stroke::{StrokeDefinition, StrokeStyle};
