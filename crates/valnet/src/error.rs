//! Error types for Valnet operations.
//!
//! This module provides the main error type [`ValnetError`] which wraps the
//! per-concern errors raised while loading, assembling, laying out and
//! exporting a process graph.

use std::io;

use thiserror::Error;

use crate::{export::ExportError, graph::GraphError, layout::LayoutError, source::SourceError};

/// The main error type for Valnet operations.
///
/// # Diagnostic Variants
///
/// The `Source` variant keeps the export text when it is known, so a JSON
/// syntax error can be reported with a span into the input.
#[derive(Debug, Error)]
pub enum ValnetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Source {
        err: SourceError,
        src: Option<String>,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<SourceError> for ValnetError {
    fn from(err: SourceError) -> Self {
        Self::Source { err, src: None }
    }
}

impl ValnetError {
    /// Create a new `Source` error with the export text it refers to.
    pub fn new_source_error(err: SourceError, src: impl Into<String>) -> Self {
        Self::Source {
            err,
            src: Some(src.into()),
        }
    }
}
