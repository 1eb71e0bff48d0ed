//! Raw diagram scene: text labels, connector-candidate lines/polylines and
//! closed-shape region primitives, all in one coordinate space.
//!
//! The scene is read once, at diagram-load time. Malformed primitives
//! (missing or unparsable coordinates) are excluded here and never reach the
//! wiring pass; the rest of the document is unaffected.

use crate::Result;
use crate::text::TextMeasurer;
use svgtypes::{Length, LengthUnit, PathParser, PathSegment, PointsParser};
use tuscomap_core::geom::{Point, Rect, point, rect};
use tuscomap_core::normalize_label;

const DEFAULT_FONT_SIZE: f64 = 16.0;
// Portion of the text box above the baseline, used to place the headless
// bounding box around an `x`/`y` text origin.
const ASCENT_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// A text label captured from the scene. Immutable once captured.
#[derive(Debug, Clone)]
pub struct TextLabel {
    pub raw_text: String,
    pub normalized_text: String,
    /// Bounding-box center of the rendered text.
    pub anchor: Point,
    /// The authored `x`/`y` origin (baseline start), kept for re-emission.
    pub origin: Point,
    pub font_size: f64,
    pub text_anchor: TextAnchor,
}

#[derive(Debug, Clone)]
pub enum ConnectorShape {
    Line([Point; 2]),
    Polyline(Vec<Point>),
}

/// A connector-candidate line or polyline.
#[derive(Debug, Clone)]
pub struct Connector {
    pub shape: ConnectorShape,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
}

impl Connector {
    pub fn vertices(&self) -> &[Point] {
        match &self.shape {
            ConnectorShape::Line(points) => points,
            ConnectorShape::Polyline(points) => points,
        }
    }

    /// Representative row Y: midpoint Y of a line, median vertex Y of a
    /// polyline.
    pub fn row_y(&self) -> f64 {
        match &self.shape {
            ConnectorShape::Line([a, b]) => (a.y + b.y) / 2.0,
            ConnectorShape::Polyline(points) => {
                let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
                ys.sort_by(f64::total_cmp);
                ys[ys.len() / 2]
            }
        }
    }

    /// Euclidean distance from `from` to the nearest vertex.
    pub fn nearest_vertex_distance(&self, from: Point) -> f64 {
        self.vertices()
            .iter()
            .map(|p| (*p - from).length())
            .fold(f64::INFINITY, f64::min)
    }

    /// The vertex farthest (max squared distance) from `from`.
    pub fn farthest_vertex_from(&self, from: Point) -> Option<Point> {
        self.vertices()
            .iter()
            .copied()
            .max_by(|a, b| (*a - from).square_length().total_cmp(&(*b - from).square_length()))
    }
}

#[derive(Debug, Clone)]
pub enum RegionShape {
    Path {
        /// The authored path data, kept for re-emission.
        d: String,
        /// Flattened subpath outlines used for containment tests.
        outlines: Vec<Vec<Point>>,
    },
    Polygon(Vec<Point>),
    Rect(Rect),
}

/// A closed-shape anatomical region. Opaque to the linker except for its
/// group tag and highlight flag.
#[derive(Debug, Clone)]
pub struct Region {
    pub shape: RegionShape,
    pub fill: Option<String>,
    pub hidden: bool,
}

/// Minimal scene capability surface consumed by the wiring pass, so linking
/// stays testable against purely in-memory scenes.
pub trait SceneSource {
    fn text_labels(&self) -> &[TextLabel];
    fn connector_candidates(&self) -> &[Connector];
    fn regions(&self) -> &[Region];
    fn label_anchor(&self, index: usize) -> Option<Point>;
}

#[derive(Debug, Clone, Default)]
pub struct SvgScene {
    labels: Vec<TextLabel>,
    connectors: Vec<Connector>,
    regions: Vec<Region>,
    view_box: Option<Rect>,
}

impl SvgScene {
    /// Builds a scene directly from primitives (renderer-free tests, or a
    /// host that already has a scene graph).
    pub fn from_parts(
        labels: Vec<TextLabel>,
        connectors: Vec<Connector>,
        regions: Vec<Region>,
    ) -> Self {
        Self {
            labels,
            connectors,
            regions,
            view_box: None,
        }
    }

    /// Parses an SVG document into a scene.
    ///
    /// Labels with nested sub-text runs take the last run as the label text.
    /// Primitives with malformed geometry are skipped.
    pub fn parse(svg_text: &str, measurer: &dyn TextMeasurer) -> Result<Self> {
        let doc = roxmltree::Document::parse(svg_text)?;
        let mut scene = SvgScene::default();

        if let Some(vb) = doc.root_element().attribute("viewBox") {
            scene.view_box = parse_view_box(vb);
        }

        for node in doc.descendants().filter(roxmltree::Node::is_element) {
            match node.tag_name().name() {
                "text" => {
                    if let Some(label) = parse_text_label(&node, measurer) {
                        scene.labels.push(label);
                    }
                }
                "line" => {
                    if let Some(connector) = parse_line(&node) {
                        scene.connectors.push(connector);
                    } else {
                        tracing::trace!("skipping line with malformed coordinates");
                    }
                }
                "polyline" => {
                    if let Some(connector) = parse_polyline(&node) {
                        scene.connectors.push(connector);
                    } else {
                        tracing::trace!("skipping polyline with malformed points");
                    }
                }
                "path" | "polygon" | "rect" => {
                    if let Some(region) = parse_region(&node) {
                        scene.regions.push(region);
                    }
                }
                _ => {}
            }
        }

        Ok(scene)
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn region_list(&self) -> &[Region] {
        &self.regions
    }

    pub fn view_box(&self) -> Option<Rect> {
        self.view_box
    }
}

impl SceneSource for SvgScene {
    fn text_labels(&self) -> &[TextLabel] {
        &self.labels
    }

    fn connector_candidates(&self) -> &[Connector] {
        &self.connectors
    }

    fn regions(&self) -> &[Region] {
        &self.regions
    }

    fn label_anchor(&self, index: usize) -> Option<Point> {
        self.labels.get(index).map(|l| l.anchor)
    }
}

fn parse_coord(value: &str) -> Option<f64> {
    let length: Length = value.trim().parse().ok()?;
    match length.unit {
        LengthUnit::None | LengthUnit::Px => Some(length.number),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn attr_coord(node: &roxmltree::Node, name: &str) -> Option<f64> {
    node.attribute(name).and_then(parse_coord)
}

fn parse_view_box(value: &str) -> Option<Rect> {
    let mut nums = value
        .split([' ', ',', '\t', '\n'])
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok());
    let min_x = nums.next()??;
    let min_y = nums.next()??;
    let width = nums.next()??;
    let height = nums.next()??;
    Some(rect(min_x, min_y, width, height))
}

fn element_text(node: &roxmltree::Node) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if let Some(text) = descendant.text() {
            out.push_str(text);
        }
    }
    out
}

fn parse_text_label(node: &roxmltree::Node, measurer: &dyn TextMeasurer) -> Option<TextLabel> {
    // A label may contain nested sub-text runs; the last run is the most
    // specific label text.
    let tspans: Vec<roxmltree::Node> = node
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "tspan")
        .collect();
    let raw_text = match tspans.last() {
        Some(tspan) => element_text(tspan).trim().to_string(),
        None => element_text(node).trim().to_string(),
    };
    if raw_text.is_empty() {
        return None;
    }

    let position_node = if node.attribute("x").is_some() || tspans.is_empty() {
        node
    } else {
        tspans.last().unwrap()
    };
    let x = attr_coord(position_node, "x").unwrap_or(0.0);
    let y = attr_coord(position_node, "y").unwrap_or(0.0);

    let font_size = attr_coord(node, "font-size").unwrap_or(DEFAULT_FONT_SIZE);
    let text_anchor = match node.attribute("text-anchor") {
        Some("middle") => TextAnchor::Middle,
        Some("end") => TextAnchor::End,
        _ => TextAnchor::Start,
    };

    let metrics = measurer.measure(&raw_text, font_size);
    let min_x = match text_anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - metrics.width / 2.0,
        TextAnchor::End => x - metrics.width,
    };
    let min_y = y - metrics.height * ASCENT_RATIO;
    let anchor = point(min_x + metrics.width / 2.0, min_y + metrics.height / 2.0);

    Some(TextLabel {
        normalized_text: normalize_label(&raw_text),
        raw_text,
        anchor,
        origin: point(x, y),
        font_size,
        text_anchor,
    })
}

fn stroke_attrs(node: &roxmltree::Node) -> (Option<String>, Option<String>) {
    (
        node.attribute("stroke").map(str::to_string),
        node.attribute("stroke-width").map(str::to_string),
    )
}

fn parse_line(node: &roxmltree::Node) -> Option<Connector> {
    let x1 = attr_coord(node, "x1")?;
    let y1 = attr_coord(node, "y1")?;
    let x2 = attr_coord(node, "x2")?;
    let y2 = attr_coord(node, "y2")?;
    let (stroke, stroke_width) = stroke_attrs(node);
    Some(Connector {
        shape: ConnectorShape::Line([point(x1, y1), point(x2, y2)]),
        stroke,
        stroke_width,
    })
}

fn parse_points(value: &str) -> Vec<Point> {
    PointsParser::from(value).map(|(x, y)| point(x, y)).collect()
}

fn parse_polyline(node: &roxmltree::Node) -> Option<Connector> {
    let points = parse_points(node.attribute("points")?);
    if points.len() < 2 {
        return None;
    }
    let (stroke, stroke_width) = stroke_attrs(node);
    Some(Connector {
        shape: ConnectorShape::Polyline(points),
        stroke,
        stroke_width,
    })
}

fn parse_region(node: &roxmltree::Node) -> Option<Region> {
    let shape = match node.tag_name().name() {
        "rect" => {
            let x = attr_coord(node, "x").unwrap_or(0.0);
            let y = attr_coord(node, "y").unwrap_or(0.0);
            let width = attr_coord(node, "width")?;
            let height = attr_coord(node, "height")?;
            if width <= 0.0 || height <= 0.0 {
                return None;
            }
            RegionShape::Rect(rect(x, y, width, height))
        }
        "polygon" => {
            let points = parse_points(node.attribute("points")?);
            if points.len() < 3 {
                return None;
            }
            RegionShape::Polygon(points)
        }
        "path" => {
            let d = node.attribute("d")?;
            let outlines = flatten_path(d);
            if outlines.iter().all(|ring| ring.len() < 3) {
                return None;
            }
            RegionShape::Path {
                d: d.to_string(),
                outlines,
            }
        }
        _ => return None,
    };

    Some(Region {
        shape,
        fill: node.attribute("fill").map(str::to_string),
        hidden: node.attribute("display") == Some("none"),
    })
}

// Fixed-step curve subdivision; fine enough that chord error stays below the
// region-probe offset scale.
const CURVE_STEPS: usize = 8;

struct PathFlattener {
    outlines: Vec<Vec<Point>>,
    current: Vec<Point>,
    subpath_start: Point,
    cursor: Point,
    last_cubic_ctrl: Option<Point>,
    last_quad_ctrl: Option<Point>,
}

impl PathFlattener {
    fn new() -> Self {
        Self {
            outlines: Vec::new(),
            current: Vec::new(),
            subpath_start: point(0.0, 0.0),
            cursor: point(0.0, 0.0),
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
        }
    }

    fn flush(&mut self) {
        if self.current.len() >= 2 {
            self.outlines.push(std::mem::take(&mut self.current));
        } else {
            self.current.clear();
        }
    }

    fn move_to(&mut self, p: Point) {
        self.flush();
        self.subpath_start = p;
        self.cursor = p;
        self.current.push(p);
    }

    fn line_to(&mut self, p: Point) {
        self.cursor = p;
        self.current.push(p);
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) {
        let start = self.cursor;
        for step in 1..=CURVE_STEPS {
            let t = step as f64 / CURVE_STEPS as f64;
            let u = 1.0 - t;
            let x = u * u * u * start.x
                + 3.0 * u * u * t * c1.x
                + 3.0 * u * t * t * c2.x
                + t * t * t * end.x;
            let y = u * u * u * start.y
                + 3.0 * u * u * t * c1.y
                + 3.0 * u * t * t * c2.y
                + t * t * t * end.y;
            self.current.push(point(x, y));
        }
        self.cursor = end;
        self.last_cubic_ctrl = Some(c2);
    }

    fn quad_to(&mut self, c: Point, end: Point) {
        let start = self.cursor;
        for step in 1..=CURVE_STEPS {
            let t = step as f64 / CURVE_STEPS as f64;
            let u = 1.0 - t;
            let x = u * u * start.x + 2.0 * u * t * c.x + t * t * end.x;
            let y = u * u * start.y + 2.0 * u * t * c.y + t * t * end.y;
            self.current.push(point(x, y));
        }
        self.cursor = end;
        self.last_quad_ctrl = Some(c);
    }

    fn close(&mut self) {
        if !self.current.is_empty() {
            self.current.push(self.subpath_start);
            self.cursor = self.subpath_start;
        }
        self.flush();
        self.current.push(self.subpath_start);
    }

    fn reflect(&self, ctrl: Option<Point>) -> Point {
        match ctrl {
            Some(c) => point(2.0 * self.cursor.x - c.x, 2.0 * self.cursor.y - c.y),
            None => self.cursor,
        }
    }
}

/// Flattens path data into subpath outlines for containment testing.
/// Elliptical arcs flatten to their chords.
fn flatten_path(d: &str) -> Vec<Vec<Point>> {
    let mut fl = PathFlattener::new();

    for segment in PathParser::from(d) {
        let Ok(segment) = segment else {
            // Malformed tail: keep what parsed so far.
            break;
        };

        let abs_point = |abs: bool, x: f64, y: f64, cursor: Point| {
            if abs {
                point(x, y)
            } else {
                point(cursor.x + x, cursor.y + y)
            }
        };

        let mut keep_cubic = false;
        let mut keep_quad = false;
        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let p = abs_point(abs, x, y, fl.cursor);
                fl.move_to(p);
            }
            PathSegment::LineTo { abs, x, y } => {
                let p = abs_point(abs, x, y, fl.cursor);
                fl.line_to(p);
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = if abs { x } else { fl.cursor.x + x };
                let y = fl.cursor.y;
                fl.line_to(point(x, y));
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let x = fl.cursor.x;
                let y = if abs { y } else { fl.cursor.y + y };
                fl.line_to(point(x, y));
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let c1 = abs_point(abs, x1, y1, fl.cursor);
                let c2 = abs_point(abs, x2, y2, fl.cursor);
                let end = abs_point(abs, x, y, fl.cursor);
                fl.cubic_to(c1, c2, end);
                keep_cubic = true;
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c1 = fl.reflect(fl.last_cubic_ctrl);
                let c2 = abs_point(abs, x2, y2, fl.cursor);
                let end = abs_point(abs, x, y, fl.cursor);
                fl.cubic_to(c1, c2, end);
                keep_cubic = true;
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let c = abs_point(abs, x1, y1, fl.cursor);
                let end = abs_point(abs, x, y, fl.cursor);
                fl.quad_to(c, end);
                keep_quad = true;
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let c = fl.reflect(fl.last_quad_ctrl);
                let end = abs_point(abs, x, y, fl.cursor);
                fl.quad_to(c, end);
                keep_quad = true;
            }
            PathSegment::EllipticalArc { abs, x, y, .. } => {
                let end = abs_point(abs, x, y, fl.cursor);
                fl.line_to(end);
            }
            PathSegment::ClosePath { .. } => {
                fl.close();
            }
        }
        if !keep_cubic {
            fl.last_cubic_ctrl = None;
        }
        if !keep_quad {
            fl.last_quad_ctrl = None;
        }
    }

    fl.flush();
    fl.outlines
}
