//! Exporters that turn a laid-out scene into an output format.

pub mod svg;

use std::io;

use thiserror::Error;

pub use self::svg::{SvgBuilder, SvgRenderer};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid style: {0}")]
    Style(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
