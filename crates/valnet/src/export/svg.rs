//! SVG rendering of process graphs.
//!
//! Nodes are drawn as rounded boxes centred on their positions, with the
//! name and, for processes, the date span. Edges are straight arrows from
//! the right side of the source to the left side of the target, which reads
//! left to right along the timeline.

use std::{fs::File, io::Write, path::Path};

use log::{debug, error, info};
use svg::{
    Document,
    node::element::{Definitions, Group, Line, Marker, Path as SvgPath, Rectangle, Text},
};

use valnet_core::{
    apply_stroke,
    color::Color,
    draw::StrokeDefinition,
    geometry::{Bounds, Point, Size},
};

use crate::{
    config::StyleConfig,
    export::ExportError,
    graph::{Edge, Graph, Node},
    shell::{Renderer, Scene, Viewport},
};

/// Margin around the scene in the output document.
const MARGIN: f32 = 50.0;
/// Edge labels longer than this are cut.
const MAX_LABEL_CHARS: usize = 24;
const FONT_SIZE: f32 = 12.0;
const ARROWHEAD_ID: &str = "arrowhead";

/// Builder for [`SvgRenderer`].
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    style: Option<&'a StyleConfig>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Builds the renderer, validating the style colors.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Style`] if a configured color is invalid.
    pub fn build(self) -> Result<SvgRenderer, ExportError> {
        let Some(style) = self.style else {
            return Ok(SvgRenderer::default());
        };
        Ok(SvgRenderer {
            background: style.background_color().map_err(ExportError::Style)?,
            edge_stroke: style.edge_stroke().map_err(ExportError::Style)?,
            last_document: None,
        })
    }
}

/// Renders scenes to SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    background: Option<Color>,
    edge_stroke: StrokeDefinition,
    last_document: Option<String>,
}

impl SvgRenderer {
    /// The document produced by the latest [`Renderer::render`] call.
    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    /// Builds the SVG document for `scene`.
    pub fn document(&self, scene: &Scene<'_>) -> Document {
        let graph = scene.graph;
        let view_box = view_box(graph, scene.viewport);
        debug!(
            node_count = graph.nodes_count(),
            edge_count = graph.edges().len(),
            width = view_box.width(),
            height = view_box.height();
            "Rendering SVG document"
        );

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view_box.min_x(),
                    view_box.min_y(),
                    view_box.width(),
                    view_box.height()
                ),
            )
            .set("width", view_box.width())
            .set("height", view_box.height());

        if let Some(background) = &self.background {
            doc = doc.add(
                Rectangle::new()
                    .set("x", view_box.min_x())
                    .set("y", view_box.min_y())
                    .set("width", view_box.width())
                    .set("height", view_box.height())
                    .set("fill", background),
            );
        }

        doc = doc.add(Definitions::new().add(self.arrowhead()));

        let mut content = Group::new().set("transform", scene.viewport.svg_transform());
        for edge in graph.edges() {
            if let Some(group) = self.render_edge(graph, edge) {
                content = content.add(group);
            }
        }
        for node in graph.nodes() {
            content = content.add(render_node(node));
        }

        doc.add(content)
    }

    /// Writes the document for `scene` to `path`.
    pub fn write_to(&self, scene: &Scene<'_>, path: &Path) -> Result<(), ExportError> {
        info!(path:? = path; "Creating SVG file");
        let doc = self.document(scene);
        let mut file = File::create(path).inspect_err(|err| {
            error!(path:? = path, err:% = err; "Failed to create SVG file");
        })?;
        write!(file, "{doc}").inspect_err(|err| {
            error!(path:? = path, err:% = err; "Failed to write SVG content");
        })?;
        Ok(())
    }

    fn arrowhead(&self) -> Marker {
        Marker::new()
            .set("id", ARROWHEAD_ID)
            .set("viewBox", "0 -5 10 10")
            .set("refX", 10)
            .set("markerWidth", 12)
            .set("markerHeight", 12)
            .set("orient", "auto")
            .add(
                SvgPath::new()
                    .set("d", "M0,-5L10,0L0,5")
                    .set("fill", self.edge_stroke.color().to_string()),
            )
    }

    fn render_edge(&self, graph: &Graph, edge: &Edge) -> Option<Group> {
        let source = graph.node(edge.source())?;
        let target = graph.node(edge.target())?;

        let start = source
            .position()
            .add_point(Point::new(source.size().width() / 2.0, 0.0));
        let end = target
            .position()
            .sub_point(Point::new(target.size().width() / 2.0, 0.0));

        let line = Line::new()
            .set("x1", start.x())
            .set("y1", start.y())
            .set("x2", end.x())
            .set("y2", end.y())
            .set("marker-end", format!("url(#{ARROWHEAD_ID})"));
        let mut group = Group::new()
            .set("class", "edge")
            .add(apply_stroke!(line, &self.edge_stroke));

        if let Some(label) = edge.style().label() {
            let mid = start.midpoint(end);
            group = group.add(
                Text::new(truncate_label(label))
                    .set("x", mid.x())
                    .set("y", mid.y())
                    .set("text-anchor", "middle")
                    .set("font-size", FONT_SIZE),
            );
        }
        Some(group)
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &Scene<'_>) {
        self.last_document = Some(self.document(scene).to_string());
    }
}

fn render_node(node: &Node) -> Group {
    let bounds = node.bounds();
    let center = node.position();
    let font_size = FONT_SIZE * node.zoom();

    let mut group = Group::new()
        .set("class", "node")
        .set("data-id", node.id().to_string())
        .add(
            Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("rx", 4)
                .set("fill", &node.color())
                .set("stroke", "#888"),
        );

    let name_y = if node.dates().is_some() {
        center.y() - font_size * 0.25
    } else {
        center.y() + font_size * 0.35
    };
    group = group.add(
        Text::new(node.name())
            .set("x", center.x())
            .set("y", name_y)
            .set("text-anchor", "middle")
            .set("font-size", font_size),
    );

    if let Some(dates) = node.dates() {
        group = group.add(
            Text::new(dates)
                .set("x", center.x())
                .set("y", center.y() + font_size)
                .set("text-anchor", "middle")
                .set("font-size", font_size * 0.8),
        );
    }
    group
}

/// Document bounds: the graph under the viewport transform, plus a margin.
fn view_box(graph: &Graph, viewport: &Viewport) -> Bounds {
    let Some(bounds) = graph.bounds() else {
        return Bounds::new_from_top_left(Point::default(), Size::new(0.0, 0.0))
            .expand(MARGIN);
    };
    let scale = viewport.scale();
    let top_left = bounds.min_point().scale(scale).add_point(viewport.translate());
    Bounds::new_from_top_left(top_left, bounds.to_size().scale(scale)).expand(MARGIN)
}

fn truncate_label(label: &str) -> String {
    label.chars().take(MAX_LABEL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use valnet_core::identifier::Id;

    use super::*;
    use crate::graph::{EdgeStyle, NodeKind};

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(
            Node::new(Id::new("Process-1"), NodeKind::Process, "Harvest")
                .with_position(Point::new(100.0, 100.0))
                .with_size(Size::new(200.0, 40.0))
                .with_dates("2014-03-01..2014-03-03"),
        );
        graph.add_node(
            Node::new(Id::new("ResourceType-1"), NodeKind::ResourceType, "Herbs & spices")
                .with_position(Point::new(400.0, 150.0)),
        );
        graph
            .add_edge(
                Id::new("Process-1"),
                Id::new("ResourceType-1"),
                EdgeStyle::default().with_label("a very long label that goes on and on"),
            )
            .unwrap();
        graph
    }

    fn render(graph: &Graph) -> String {
        let viewport = Viewport::new();
        let renderer = SvgBuilder::new().build().unwrap();
        renderer
            .document(&Scene {
                graph,
                viewport: &viewport,
            })
            .to_string()
    }

    #[test]
    fn test_document_contains_nodes_and_edges() {
        let svg = render(&sample_graph());

        assert!(svg.contains("<svg"));
        assert!(svg.contains("id=\"arrowhead\""));
        assert_eq!(svg.matches("class=\"node\"").count(), 2);
        assert_eq!(svg.matches("class=\"edge\"").count(), 1);
        assert!(svg.contains("Harvest"));
        assert!(svg.contains("2014-03-01..2014-03-03"));
        assert!(svg.contains("translate(0,-200) scale(1,1)"));
    }

    #[test]
    fn test_edge_runs_between_facing_sides() {
        let svg = render(&sample_graph());

        // Source right side: 100 + 200/2. Target left side: 400 - 150/2.
        assert!(svg.contains("x1=\"200\""));
        assert!(svg.contains("x2=\"325\""));
        assert!(svg.contains("marker-end=\"url(#arrowhead)\""));
    }

    #[test]
    fn test_edge_label_is_truncated() {
        let svg = render(&sample_graph());
        assert!(svg.contains("a very long label that g"));
        assert!(!svg.contains("goes on and on"));
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = render(&sample_graph());
        assert!(svg.contains("Herbs &amp; spices"));
    }

    #[test]
    fn test_background_from_style() {
        let style: StyleConfig = toml::from_str("background_color = \"white\"").unwrap();
        let renderer = SvgBuilder::new().with_style(&style).build().unwrap();
        let graph = sample_graph();
        let viewport = Viewport::new();

        let svg = renderer
            .document(&Scene {
                graph: &graph,
                viewport: &viewport,
            })
            .to_string();

        assert!(svg.contains("fill=\"white\""));
    }

    #[test]
    fn test_edge_style_sets_dasharray() {
        let style: StyleConfig = toml::from_str("edge_style = \"dotted\"").unwrap();
        let renderer = SvgBuilder::new().with_style(&style).build().unwrap();
        let graph = sample_graph();
        let viewport = Viewport::new();

        let svg = renderer
            .document(&Scene {
                graph: &graph,
                viewport: &viewport,
            })
            .to_string();

        assert!(svg.contains("stroke-dasharray=\"2,3\""));
        assert!(!render(&graph).contains("stroke-dasharray"));
    }

    #[test]
    fn test_invalid_style_fails_build() {
        let style: StyleConfig = toml::from_str("edge_color = \"nope\"").unwrap();
        let err = SvgBuilder::new().with_style(&style).build().unwrap_err();
        assert!(matches!(err, ExportError::Style(_)));
    }

    #[test]
    fn test_empty_graph_renders() {
        let svg = render(&Graph::new());
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("class=\"node\""));
    }

    #[test]
    fn test_renderer_keeps_last_document() {
        let graph = sample_graph();
        let viewport = Viewport::new();
        let mut renderer = SvgRenderer::default();
        assert!(renderer.last_document().is_none());

        renderer.render(&Scene {
            graph: &graph,
            viewport: &viewport,
        });

        assert!(renderer.last_document().unwrap().contains("Harvest"));
    }

    #[test]
    fn test_truncate_label_counts_chars() {
        assert_eq!(truncate_label("short"), "short");
        let long = "é".repeat(30);
        assert_eq!(truncate_label(&long).chars().count(), 24);
    }
}
