//! Error adapter for converting ValnetError to miette diagnostics.
//!
//! JSON syntax errors in the export are rendered with a labelled snippet
//! of the input. Everything else becomes a plain report with an error code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use valnet::{ValnetError, source::SourceError};

/// A JSON syntax error pointing into the export text.
pub struct JsonDiagnostic<'a> {
    message: &'a str,
    offset: usize,
    src: &'a str,
}

impl<'a> JsonDiagnostic<'a> {
    /// Create a diagnostic for a 1-based `line` and `column` in `src`.
    pub fn new(message: &'a str, line: usize, column: usize, src: &'a str) -> Self {
        Self {
            message,
            offset: line_column_to_offset(src, line, column),
            src,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Debug for JsonDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDiagnostic")
            .field("message", &self.message)
            .field("offset", &self.offset)
            .finish()
    }
}

impl fmt::Display for JsonDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value network JSON: {}", self.message)
    }
}

impl std::error::Error for JsonDiagnostic<'_> {}

impl MietteDiagnostic for JsonDiagnostic<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("valnet::json"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = SourceSpan::new(self.offset.into(), 0);
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(self.message.to_string()),
            span,
        ))))
    }
}

/// Adapter for [`ValnetError`] values without a source location.
pub struct ErrorAdapter<'a>(pub &'a ValnetError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ValnetError::Io(_) => "valnet::io",
            ValnetError::Source { .. } => "valnet::source",
            ValnetError::Graph(_) => "valnet::graph",
            ValnetError::Layout(_) => "valnet::layout",
            ValnetError::Config(_) => "valnet::config",
            ValnetError::Export(_) => "valnet::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            ValnetError::Source {
                err: SourceError::InvalidDate { .. },
                ..
            } => Some(Box::new("dates are expected as YYYY-MM-DD")),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A JSON syntax error with its location in the input.
    Json(JsonDiagnostic<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Json(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Json(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Json(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Json(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Byte offset of a 1-based line and column, clamped to the text.
fn line_column_to_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

/// Convert a [`ValnetError`] into a list of reportable errors.
pub fn to_reportables(err: &ValnetError) -> Vec<Reportable<'_>> {
    match err {
        ValnetError::Source {
            err:
                SourceError::Json {
                    message,
                    line,
                    column,
                },
            src: Some(src),
        } => vec![Reportable::Json(JsonDiagnostic::new(
            message, *line, *column, src,
        ))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
