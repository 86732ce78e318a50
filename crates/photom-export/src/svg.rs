//! SVG preview serializer.
//!
//! Renders shape traces over a canvas the size of the camera frame using
//! the [`svg`] crate for document construction, XML escaping, and path
//! data formatting. Each trace becomes a `<g>` group holding:
//!
//! - the closed ROI boundary as a `<path>`,
//! - one grey `<circle>` per preview (pattern) point,
//! - a thin red travel `<path>` through the ablation points in order,
//! - one red `<circle>` per ablation point.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements and
//! the serialized engine configuration.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Path, Title};
use svg::node::{Node, Text, Value};

use photom_pattern::{Point, ShapeTrace};

/// Boundary stroke colour.
const BOUNDARY_COLOR: &str = "gold";
/// Preview point fill colour.
const PATTERN_COLOR: &str = "gray";
/// Ablation point and travel path colour.
const ABLATION_COLOR: &str = "red";
/// Preview dot radius in pixels.
const PATTERN_RADIUS: f64 = 1.0;
/// Ablation dot radius in pixels.
const ABLATION_RADIUS: f64 = 1.5;

/// Canvas size in pixels (normally the camera frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Metadata to embed in the SVG document.
///
/// All fields are optional. When present, `<title>`, `<desc>` and
/// `<metadata>` elements are emitted immediately after the opening
/// `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the pattern parameters so exported previews are
    /// distinguishable.
    pub description: Option<&'a str>,

    /// Serialized engine configuration, emitted inside a `<metadata>`
    /// element wrapped in a namespaced `<photom:config>` element.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string through `points`.
///
/// Uses `M` for the first point and `L` for subsequent points, and
/// appends `Z` when `closed` is set. Returns an empty string for fewer
/// than 2 points.
///
/// # Examples
///
/// ```
/// use photom_pattern::Point;
/// use photom_export::build_path_data;
///
/// let d = build_path_data(&[Point::new(10.0, 20.0), Point::new(30.0, 40.0)], false);
/// assert_eq!(d, "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(points: &[Point], closed: bool) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    if closed {
        data = data.close();
    }
    String::from(Value::from(data))
}

fn dot(p: Point, radius: f64, color: &str) -> Circle {
    Circle::new()
        .set("cx", p.x)
        .set("cy", p.y)
        .set("r", radius)
        .set("fill", color)
}

/// Render one trace as a `<g>` group.
fn trace_group(trace: &ShapeTrace) -> Group {
    let mut group = Group::new().set("id", format!("shape-{}", trace.id().0));

    let boundary = build_path_data(trace.border_points(), true);
    if !boundary.is_empty() {
        group = group.add(
            Path::new()
                .set("class", "boundary")
                .set("d", boundary)
                .set("fill", "none")
                .set("stroke", BOUNDARY_COLOR)
                .set("stroke-width", 1),
        );
    }

    for &p in trace.pattern_points() {
        group = group.add(dot(p, PATTERN_RADIUS, PATTERN_COLOR).set("class", "pattern"));
    }

    let travel = build_path_data(trace.ablation_points(), false);
    if !travel.is_empty() {
        group = group.add(
            Path::new()
                .set("class", "travel")
                .set("d", travel)
                .set("fill", "none")
                .set("stroke", ABLATION_COLOR)
                .set("stroke-width", 0.5)
                .set("stroke-opacity", 0.5),
        );
    }

    for &p in trace.ablation_points() {
        group = group.add(dot(p, ABLATION_RADIUS, ABLATION_COLOR).set("class", "ablation"));
    }

    group
}

/// Serialize shape traces to an SVG preview string.
///
/// Produces a complete SVG document with an XML declaration and a
/// `viewBox` matching `dimensions`, so pixel coordinates map one-to-one.
/// Traces without a pattern are drawn as a bare boundary.
#[must_use]
pub fn to_svg<'a>(
    traces: impl IntoIterator<Item = &'a ShapeTrace>,
    dimensions: Dimensions,
    metadata: &SvgMetadata<'_>,
) -> String {
    let w = dimensions.width;
    let h = dimensions.height;
    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("photom:config");
        config_el.assign("xmlns:photom", "https://photom-lab.github.io/ns/1");
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    for trace in traces {
        doc = doc.add(trace_group(trace));
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use photom_pattern::{
        BidirectionalParams, EngineConfig, PatternSpec, Polygon, ShapeId, SpiralParams,
    };

    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn no_meta() -> SvgMetadata<'static> {
        SvgMetadata::default()
    }

    fn triangle() -> ShapeTrace {
        let polygon = Polygon::from_coords(&[(10.0, 10.0), (50.0, 10.0), (10.0, 50.0)]).unwrap();
        ShapeTrace::new(ShapeId(3), polygon)
    }

    // --- build_path_data ---

    #[test]
    fn build_path_data_empty() {
        assert_eq!(build_path_data(&[], false), "");
    }

    #[test]
    fn build_path_data_single_point() {
        assert_eq!(build_path_data(&[Point::new(5.0, 5.0)], true), "");
    }

    #[test]
    fn build_path_data_open_and_closed() {
        let points = [
            Point::new(10.0, 15.0),
            Point::new(12.5, 18.3),
            Point::new(14.0, 20.1),
        ];
        assert_eq!(
            build_path_data(&points, false),
            "M10,15 L12.5,18.3 L14,20.1"
        );
        let closed = build_path_data(&points, true);
        assert!(closed.starts_with("M10,15 L12.5,18.3 L14,20.1"));
        assert!(closed.to_lowercase().ends_with('z'));
    }

    // --- Document structure ---

    #[test]
    fn empty_input_produces_valid_svg() {
        let svg = to_svg(std::iter::empty(), dims(640, 480), &no_meta());
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"width="640""#));
        assert!(svg.contains(r#"height="480""#));
        assert!(svg.contains(r#"viewBox="0 0 640 480""#));
        assert!(!svg.contains("<g"));
    }

    #[test]
    fn unpatterned_trace_is_boundary_only() {
        let svg = to_svg(&[triangle()], dims(100, 100), &no_meta());
        assert!(svg.contains(r#"id="shape-3""#));
        assert!(svg.contains(r#"d="M10,10 L50,10 L10,50"#));
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains(r#"class="travel""#));
    }

    #[test]
    fn lattice_trace_draws_ablation_dots_and_travel() {
        let mut trace = triangle();
        trace
            .apply_pattern(
                &PatternSpec::Bidirectional(BidirectionalParams {
                    horizontal_spacing: 20,
                    vertical_spacing: 20,
                    target_point_count: None,
                }),
                &EngineConfig::default(),
            )
            .unwrap();
        let n = trace.ablation_points().len();
        let svg = to_svg(&[trace], dims(100, 100), &no_meta());

        assert_eq!(svg.matches(r#"class="ablation""#).count(), n);
        assert_eq!(svg.matches(r#"class="pattern""#).count(), 0);
        assert!(svg.contains(r#"class="travel""#));
        assert!(svg.contains(r#"fill="red""#));
    }

    #[test]
    fn spiral_trace_draws_preview_points() {
        let mut trace = triangle();
        trace
            .apply_pattern(
                &PatternSpec::Spiral(SpiralParams {
                    target_point_count: Some(5),
                }),
                &EngineConfig::default(),
            )
            .unwrap();
        let preview = trace.pattern_points().len();
        assert!(preview > 0);
        let svg = to_svg(&[trace], dims(100, 100), &no_meta());
        assert_eq!(svg.matches(r#"class="pattern""#).count(), preview);
        assert!(svg.contains(r#"fill="gray""#));
    }

    #[test]
    fn traces_render_in_order() {
        let polygon = Polygon::from_coords(&[(0.0, 0.0), (5.0, 0.0), (0.0, 5.0)]).unwrap();
        let traces = [
            ShapeTrace::new(ShapeId(1), polygon.clone()),
            ShapeTrace::new(ShapeId(4), polygon),
        ];
        let svg = to_svg(&traces, dims(10, 10), &no_meta());
        let first = svg.find(r#"id="shape-1""#).unwrap();
        let second = svg.find(r#"id="shape-4""#).unwrap();
        assert!(first < second);
    }

    // --- Metadata ---

    #[test]
    fn metadata_is_embedded_and_escaped() {
        let meta = SvgMetadata {
            title: Some("ROI <1>"),
            description: Some("spacing 10 & 10"),
            config_json: Some(r#"{"minimum_gap":5.0}"#),
        };
        let svg = to_svg(std::iter::empty(), dims(10, 10), &meta);
        assert!(svg.contains("<title>ROI &lt;1&gt;</title>"));
        assert!(svg.contains("<desc>spacing 10 &amp; 10</desc>"));
        assert!(svg.contains("<metadata>"));
        assert!(svg.contains(r#"xmlns:photom="https://photom-lab.github.io/ns/1""#));
        assert!(svg.contains("minimum_gap"));
    }

    #[test]
    fn no_metadata_elements_by_default() {
        let svg = to_svg(std::iter::empty(), dims(10, 10), &no_meta());
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("<desc>"));
        assert!(!svg.contains("<metadata>"));
    }
}
