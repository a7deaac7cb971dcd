//! Layout validation.
//!
//! [`validate`] inspects a [`Scene`] before it is drawn and reports problems
//! as [`Diagnostic`]s. Only unresolved anchors are fatal; the other checks
//! produce warnings and rendering proceeds.
//!
//! Checks run in a fixed order, so the diagnostic list for a given scene is
//! always the same:
//!
//! 1. connector anchors naming a node must resolve (`unresolved-anchor`, error)
//! 2. no two nodes share an identical bounding box (`overlapping-nodes`)
//! 3. nodes and zones stay on the canvas (`out-of-bounds`)
//! 4. resolved connector endpoints do not coincide (`degenerate-connector`)

use std::fmt;

use log::debug;

use crate::{
    router::resolve_endpoints,
    scene::{AnchorSpec, Scene},
};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A reference to a scene entity in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Node(String),
    /// A zone by declaration index, with its id when it has one.
    Zone { index: usize, id: Option<String> },
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node `{id}`"),
            Self::Zone { id: Some(id), .. } => write!(f, "zone `{id}`"),
            Self::Zone { index, id: None } => write!(f, "zone {index}"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnresolvedAnchor { connector: usize, node_id: String },
    OverlappingNodes { first: String, second: String },
    OutOfBounds { entity: EntityRef },
    DegenerateConnector { connector: usize },
}

impl DiagnosticKind {
    /// Returns the stable code of this kind of problem.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedAnchor { .. } => "unresolved-anchor",
            Self::OverlappingNodes { .. } => "overlapping-nodes",
            Self::OutOfBounds { .. } => "out-of-bounds",
            Self::DegenerateConnector { .. } => "degenerate-connector",
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    severity: Severity,
    message: String,
    help: Option<String>,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, severity: Severity, message: String) -> Self {
        Self {
            kind,
            severity,
            message,
            help: None,
        }
    }

    fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns true when this diagnostic prevents rendering.
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code(), self.message)
    }
}

/// Returns true if any diagnostic in `diagnostics` is fatal.
pub fn has_fatal(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_fatal)
}

/// Validates `scene`, returning every finding in check order.
///
/// # Examples
///
/// ```
/// # use infragram::scene::{AnchorPoint, AnchorSpec, Canvas, Connector, ConnectorStyle, Scene};
/// # use infragram::validate::{validate, DiagnosticKind};
/// let mut scene = Scene::new(Canvas::new(10.0, 10.0).unwrap());
/// scene
///     .add_connector(Connector::new(
///         AnchorSpec::absolute(1.0, 1.0),
///         AnchorSpec::node("X", AnchorPoint::Left),
///         ConnectorStyle::Directed,
///     ))
///     .unwrap();
///
/// let diagnostics = validate(&scene);
/// assert_eq!(diagnostics.len(), 1);
/// assert!(diagnostics[0].is_fatal());
/// assert_eq!(
///     diagnostics[0].kind(),
///     &DiagnosticKind::UnresolvedAnchor { connector: 0, node_id: "X".to_string() }
/// );
/// ```
pub fn validate(scene: &Scene) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    check_anchors(scene, &mut diagnostics);
    check_overlaps(scene, &mut diagnostics);
    check_bounds(scene, &mut diagnostics);
    check_degenerate(scene, &mut diagnostics);

    debug!(
        diagnostics = diagnostics.len(),
        fatal = diagnostics.iter().filter(|d| d.is_fatal()).count();
        "Scene validated"
    );

    diagnostics
}

fn check_anchors(scene: &Scene, diagnostics: &mut Vec<Diagnostic>) {
    for (index, connector) in scene.connectors().iter().enumerate() {
        let mut reported: Vec<&str> = Vec::new();
        for anchor in [connector.from(), connector.to()] {
            let AnchorSpec::Node { id, .. } = anchor else {
                continue;
            };
            if scene.node(id).is_some() || reported.contains(&id.as_str()) {
                continue;
            }
            reported.push(id);
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::UnresolvedAnchor {
                        connector: index,
                        node_id: id.clone(),
                    },
                    Severity::Error,
                    format!("connector {index} references unknown node `{id}`"),
                )
                .with_help("add a node with this id or point the anchor at an existing node"),
            );
        }
    }
}

fn check_overlaps(scene: &Scene, diagnostics: &mut Vec<Diagnostic>) {
    let nodes: Vec<_> = scene.nodes().collect();
    for (i, first) in nodes.iter().enumerate() {
        for second in &nodes[i + 1..] {
            if first.bounds() != second.bounds() {
                continue;
            }
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::OverlappingNodes {
                        first: first.id().to_string(),
                        second: second.id().to_string(),
                    },
                    Severity::Warning,
                    format!(
                        "nodes `{}` and `{}` occupy the same bounding box",
                        first.id(),
                        second.id()
                    ),
                )
                .with_help("one of the nodes will be hidden behind the other"),
            );
        }
    }
}

fn check_bounds(scene: &Scene, diagnostics: &mut Vec<Diagnostic>) {
    let canvas = scene.canvas().bounds();
    let out_of_bounds = |entity: EntityRef| {
        Diagnostic::new(
            DiagnosticKind::OutOfBounds {
                entity: entity.clone(),
            },
            Severity::Warning,
            format!(
                "{entity} extends beyond the {}x{} canvas",
                scene.canvas().width(),
                scene.canvas().height()
            ),
        )
        .with_help("part of it will be clipped in the output")
    };

    for node in scene.nodes() {
        if !canvas.contains(&node.bounds()) {
            diagnostics.push(out_of_bounds(EntityRef::Node(node.id().to_string())));
        }
    }
    for (index, zone) in scene.zones().iter().enumerate() {
        if !canvas.contains(&zone.bounds()) {
            diagnostics.push(out_of_bounds(EntityRef::Zone {
                index,
                id: zone.id().map(str::to_string),
            }));
        }
    }
}

fn check_degenerate(scene: &Scene, diagnostics: &mut Vec<Diagnostic>) {
    for (index, connector) in scene.connectors().iter().enumerate() {
        // Unresolved anchors were already reported
        let Ok((from, to)) = resolve_endpoints(scene, connector) else {
            continue;
        };
        if from.sub_point(to).normalize().is_some() {
            continue;
        }
        diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::DegenerateConnector { connector: index },
                Severity::Warning,
                format!(
                    "connector {index} ({} -> {}) has coincident endpoints and will be skipped",
                    connector.from(),
                    connector.to()
                ),
            )
            .with_help("use distinct anchor points for the two ends"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{AnchorPoint, Canvas, Connector, ConnectorStyle, Node, Zone};
    use infragram_core::geometry::{Point, Size};

    fn scene() -> Scene {
        Scene::new(Canvas::new(10.0, 10.0).unwrap())
    }

    fn rect(id: &str, x: f32, y: f32) -> Node {
        Node::rectangle(id, Point::new(x, y), Size::new(2.0, 1.0))
    }

    #[test]
    fn test_clean_scene_has_no_diagnostics() {
        let mut scene = scene();
        scene.add_node(rect("a", 1.0, 1.0)).unwrap();
        scene.add_node(rect("b", 7.0, 1.0)).unwrap();
        scene
            .add_connector(Connector::new(
                AnchorSpec::node("a", AnchorPoint::Right),
                AnchorSpec::node("b", AnchorPoint::Left),
                ConnectorStyle::Directed,
            ))
            .unwrap();
        assert!(validate(&scene).is_empty());
    }

    #[test]
    fn test_unresolved_anchor_reported_once_per_id() {
        let mut scene = scene();
        scene
            .add_connector(Connector::new(
                AnchorSpec::node("X", AnchorPoint::Top),
                AnchorSpec::node("X", AnchorPoint::Bottom),
                ConnectorStyle::Directed,
            ))
            .unwrap();
        scene
            .add_connector(Connector::new(
                AnchorSpec::node("Y", AnchorPoint::Auto),
                AnchorSpec::node("Z", AnchorPoint::Auto),
                ConnectorStyle::Plain,
            ))
            .unwrap();

        let diagnostics = validate(&scene);
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind().clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::UnresolvedAnchor {
                    connector: 0,
                    node_id: "X".to_string()
                },
                DiagnosticKind::UnresolvedAnchor {
                    connector: 1,
                    node_id: "Y".to_string()
                },
                DiagnosticKind::UnresolvedAnchor {
                    connector: 1,
                    node_id: "Z".to_string()
                },
            ]
        );
        assert!(has_fatal(&diagnostics));
        assert_eq!(diagnostics[0].code(), "unresolved-anchor");
        assert!(diagnostics[0].help().is_some());
    }

    #[test]
    fn test_overlapping_nodes_each_pair_once() {
        let mut scene = scene();
        scene.add_node(rect("a", 1.0, 1.0)).unwrap();
        scene.add_node(rect("b", 1.0, 1.0)).unwrap();
        scene.add_node(rect("c", 1.0, 1.0)).unwrap();
        // Partial overlap is not reported
        scene.add_node(rect("d", 1.5, 1.0)).unwrap();

        let pairs: Vec<_> = validate(&scene)
            .into_iter()
            .filter_map(|d| match d.kind() {
                DiagnosticKind::OverlappingNodes { first, second } => {
                    Some((first.clone(), second.clone()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_out_of_bounds_nodes_and_zones() {
        let mut scene = scene();
        scene.add_node(rect("inside", 8.0, 9.0)).unwrap();
        scene.add_node(rect("outside", 9.0, 1.0)).unwrap();
        scene
            .add_node(Node::circle("edge", Point::new(1.0, 5.0), 1.5))
            .unwrap();
        scene
            .add_zone(Zone::new(Point::new(-1.0, 0.0), Size::new(5.0, 5.0)))
            .unwrap();
        scene
            .add_zone(Zone::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0)).with_id("full"))
            .unwrap();

        let diagnostics = validate(&scene);
        let entities: Vec<_> = diagnostics
            .iter()
            .map(|d| match d.kind() {
                DiagnosticKind::OutOfBounds { entity } => entity.to_string(),
                other => panic!("unexpected diagnostic {other:?}"),
            })
            .collect();
        assert_eq!(entities, vec!["node `outside`", "node `edge`", "zone 0"]);
        assert!(!has_fatal(&diagnostics));
        assert!(diagnostics.iter().all(|d| d.severity() == Severity::Warning));
    }

    #[test]
    fn test_degenerate_connector_is_warning() {
        let mut scene = scene();
        scene.add_node(rect("a", 1.0, 1.0)).unwrap();
        scene
            .add_connector(Connector::new(
                AnchorSpec::node("a", AnchorPoint::Center),
                AnchorSpec::absolute(2.0, 1.5),
                ConnectorStyle::Directed,
            ))
            .unwrap();

        let diagnostics = validate(&scene);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind(),
            &DiagnosticKind::DegenerateConnector { connector: 0 }
        );
        assert_eq!(diagnostics[0].code(), "degenerate-connector");
        assert!(!diagnostics[0].is_fatal());
    }

    #[test]
    fn test_check_order() {
        let mut scene = scene();
        scene.add_node(rect("a", 9.0, 1.0)).unwrap();
        scene.add_node(rect("b", 9.0, 1.0)).unwrap();
        scene
            .add_connector(Connector::new(
                AnchorSpec::node("a", AnchorPoint::Left),
                AnchorSpec::node("missing", AnchorPoint::Left),
                ConnectorStyle::Directed,
            ))
            .unwrap();

        let codes: Vec<_> = validate(&scene).iter().map(Diagnostic::code).collect();
        assert_eq!(
            codes,
            vec![
                "unresolved-anchor",
                "overlapping-nodes",
                "out-of-bounds",
                "out-of-bounds"
            ]
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let mut scene = scene();
        scene
            .add_connector(Connector::new(
                AnchorSpec::absolute(0.0, 0.0),
                AnchorSpec::node("db", AnchorPoint::Top),
                ConnectorStyle::Directed,
            ))
            .unwrap();
        let diagnostic = &validate(&scene)[0];
        assert_eq!(
            diagnostic.to_string(),
            "error[unresolved-anchor]: connector 0 references unknown node `db`"
        );
    }
}
