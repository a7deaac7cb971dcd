//! Error adapter for converting InfragramError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a scene is rejected by the validator, each of its
//! [`Diagnostic`]s is rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity};

use infragram::{
    InfragramError,
    validate::{Diagnostic, Severity},
};

/// Adapter for a single validator diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic) -> Self {
        Self { diag }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("infragram::{}", self.diag.code())))
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Warning => MietteSeverity::Warning,
            Severity::Error => MietteSeverity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

/// Adapter for [`InfragramError`] variants without validator diagnostics.
pub struct ErrorAdapter<'a>(pub &'a InfragramError);

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
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            InfragramError::Io(_) => "infragram::io",
            InfragramError::Document(_) => "infragram::document",
            InfragramError::Scene(_) => "infragram::scene",
            InfragramError::Render(_) => "infragram::render",
            InfragramError::Export(_) => "infragram::export",
            InfragramError::Config(_) => "infragram::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            InfragramError::Export(infragram::export::Error::PngDisabled) => Some(Box::new(
                "rebuild with the `png` feature or render to SVG instead",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A validator finding.
    Diagnostic(DiagnosticAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert an [`InfragramError`] into a list of reportable errors.
///
/// A scene rejected by the validator yields one [`Reportable`] per
/// diagnostic. Every other error yields a single [`Reportable`].
pub fn to_reportables(err: &InfragramError) -> Vec<Reportable<'_>> {
    match err.diagnostics() {
        Some(diagnostics) if !diagnostics.is_empty() => diagnostics
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Render a reportable through miette's graphical handler.
pub fn render_report(reportable: &dyn MietteDiagnostic) -> String {
    let mut writer = String::new();
    if miette::GraphicalReportHandler::new()
        .render_report(&mut writer, reportable)
        .is_err()
    {
        writer = reportable.to_string();
    }
    writer
}

#[cfg(test)]
mod tests {
    use infragram::{
        DiagramBuilder,
        geometry::{Point, Size},
        render::RenderError,
        scene::{AnchorPoint, AnchorSpec, Canvas, Connector, ConnectorStyle, Node, Scene},
    };

    use super::*;

    fn rejected_scene_error() -> InfragramError {
        let mut scene = Scene::new(Canvas::new(100.0, 100.0).unwrap());
        scene
            .add_node(Node::rectangle(
                "web",
                Point::new(10.0, 10.0),
                Size::new(20.0, 20.0),
            ))
            .unwrap();
        for target in ["db", "cache"] {
            scene
                .add_connector(Connector::new(
                    AnchorSpec::node("web", AnchorPoint::Auto),
                    AnchorSpec::node(target, AnchorPoint::Auto),
                    ConnectorStyle::Directed,
                ))
                .unwrap();
        }
        DiagramBuilder::default().render_svg(&scene).unwrap_err()
    }

    #[test]
    fn test_each_diagnostic_is_reported() {
        let err = rejected_scene_error();

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        for reportable in &reportables {
            let Reportable::Diagnostic(adapter) = reportable else {
                panic!("Expected Diagnostic");
            };
            assert_eq!(
                adapter.code().unwrap().to_string(),
                "infragram::unresolved-anchor"
            );
            assert_eq!(adapter.severity(), Some(MietteSeverity::Error));
        }
        assert!(reportables[0].to_string().contains("db"));
        assert!(reportables[1].to_string().contains("cache"));
    }

    #[test]
    fn test_non_diagnostic_error() {
        let err = InfragramError::Config("bad scale".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad scale");
                assert_eq!(e.code().unwrap().to_string(), "infragram::config");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_empty_validation_falls_back_to_error() {
        let err = InfragramError::Render(RenderError::Validation {
            diagnostics: Vec::new(),
        });

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert!(matches!(reportables[0], Reportable::Error(_)));
    }

    #[test]
    fn test_render_report_includes_code() {
        let err = InfragramError::Config("bad scale".to_string());
        let report = render_report(&ErrorAdapter(&err));
        assert!(report.contains("infragram::config"));
        assert!(report.contains("bad scale"));
    }
}
