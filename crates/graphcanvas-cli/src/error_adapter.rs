//! Error adapter for converting [`GraphCanvasError`] to miette diagnostics.
//!
//! Layout engine failures carry the DOT description that was submitted; the
//! adapter attaches it as the diagnostic's source code and, when Graphviz
//! reports a line number, labels the offending line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use graphcanvas::{GraphCanvasError, engine::EngineError};

/// Adapter rendering a [`GraphCanvasError`] through miette.
pub struct ErrorAdapter<'a> {
    err: &'a GraphCanvasError,
    description: Option<&'a str>,
}

impl<'a> ErrorAdapter<'a> {
    pub fn new(err: &'a GraphCanvasError) -> Self {
        let description = match err {
            GraphCanvasError::Engine(engine_err) => Some(engine_err.description()),
            _ => None,
        };
        Self { err, description }
    }

    fn engine_error(&self) -> Option<&EngineError> {
        match self.err {
            GraphCanvasError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.err, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.err)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err {
            GraphCanvasError::Io(_) => "graphcanvas::io",
            GraphCanvasError::Graph(_) => "graphcanvas::graph",
            GraphCanvasError::Engine(_) => "graphcanvas::engine",
            GraphCanvasError::Contract(_) => "graphcanvas::contract",
            GraphCanvasError::Config(_) => "graphcanvas::config",
            GraphCanvasError::Export(_) => "graphcanvas::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.engine_error()? {
            EngineError::Unavailable { .. } => {
                "install Graphviz or point `[graphviz] binary_dir` at its executables"
            }
            EngineError::LayoutFailed { .. } => "try a different layout engine with `--engine`",
            EngineError::Unreadable { .. } | EngineError::RenderFailed { .. } => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.description
            .as_ref()
            .map(|description| description as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let description = self.description?;
        let message = self.engine_error()?.message()?;
        let line = reported_line(message)?;
        let span = line_span(description, line)?;
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("reported here".to_string()),
            span,
        ))))
    }
}

/// Renders `err` as a graphical miette report.
///
/// Falls back to the plain error message if the report cannot be rendered.
pub fn render_report(err: &GraphCanvasError) -> String {
    let mut report = String::new();
    let rendered = miette::GraphicalReportHandler::new()
        .render_report(&mut report, &ErrorAdapter::new(err));
    match rendered {
        Ok(()) => report,
        Err(_) => err.to_string(),
    }
}

/// Extracts the 1-based line number from a Graphviz message such as
/// `syntax error in line 3 near 'x'`.
fn reported_line(message: &str) -> Option<usize> {
    let (_, rest) = message.split_once("line ")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn line_span(source: &str, line: usize) -> Option<SourceSpan> {
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let len = text.trim_end_matches(['\r', '\n']).len();
            return Some(SourceSpan::new(offset.into(), len));
        }
        offset += text.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use std::io;

    use graphcanvas::engine::LayoutEngine;

    use super::*;

    #[test]
    fn test_engine_error_carries_description() {
        let err = GraphCanvasError::Engine(EngineError::Unreadable {
            message: "Error: /tmp/g.dot: syntax error in line 2 near 'x'".to_string(),
            description: "digraph G {\n  x y\n}".to_string(),
        });
        let adapter = ErrorAdapter::new(&err);

        assert!(adapter.source_code().is_some());
        assert_eq!(adapter.code().unwrap().to_string(), "graphcanvas::engine");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 12);
        assert_eq!(labels[0].len(), 5);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_layout_failure_suggests_other_engine() {
        let err = GraphCanvasError::Engine(EngineError::LayoutFailed {
            engine: LayoutEngine::Dot,
            message: "trouble in init_rank".to_string(),
            description: "digraph G {}".to_string(),
        });
        let adapter = ErrorAdapter::new(&err);
        assert!(adapter.help().unwrap().to_string().contains("--engine"));
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_non_engine_error() {
        let err = GraphCanvasError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let adapter = ErrorAdapter::new(&err);
        assert_eq!(adapter.to_string(), "I/O error: missing");
        assert!(adapter.source_code().is_none());
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_render_report_shows_code_and_source() {
        let err = GraphCanvasError::Engine(EngineError::Unreadable {
            message: "syntax error in line 2 near 'x'".to_string(),
            description: "digraph G {\n  x y\n}".to_string(),
        });
        let report = render_report(&err);

        assert!(report.contains("graphcanvas::engine"));
        assert!(report.contains("syntax error in line 2"));
        assert!(report.contains("x y"));
        assert!(report.contains("reported here"));
    }

    #[test]
    fn test_reported_line() {
        assert_eq!(reported_line("syntax error in line 14 near '}'"), Some(14));
        assert_eq!(reported_line("trouble in init_rank"), None);
    }
}
