//! Serializes a wired scene back to SVG.
//!
//! The output mirrors what the runtime DOM linker produces in the browser:
//! data-linked labels wrapped in `<a href download>`, connectors and regions
//! tagged with their group id, an overlay group hosting the endpoint dots,
//! and a small scoped style block with the class hooks. Highlight visuals
//! beyond the hooks are the embedding page's concern.

use crate::activate::ActivationState;
use crate::linker::{LinkOptions, LinkedScene};
use crate::scene::{ConnectorShape, RegionShape, TextAnchor};
use std::fmt::Write as _;
use tuscomap_core::geom::Point;

const STYLE_BLOCK: &str = r#"<style>
a.svg-tissue-link { cursor: pointer; text-decoration: none; outline: none; }
text.svg-tissue-unavailable { cursor: not-allowed; }
.tissue-highlight-dot { opacity: 0; pointer-events: none; }
.tissue-highlight-dot.active { opacity: 1; }
</style>
"#;

#[derive(Debug, Clone)]
pub struct SvgEmitOptions {
    /// Adds extra space around the computed viewBox when the source scene
    /// carried none.
    pub viewbox_padding: f64,
    /// When false, the scoped style block is omitted and only class hooks
    /// are emitted.
    pub include_style_block: bool,
}

impl Default for SvgEmitOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
            include_style_block: true,
        }
    }
}

/// Renders the linked scene. When `state` is given, members of active groups
/// carry the `active` class and markers grow to their active radius.
pub fn render_linked_scene_svg(
    linked: &LinkedScene,
    state: Option<&ActivationState>,
    link_options: &LinkOptions,
    options: &SvgEmitOptions,
) -> String {
    let scene = linked.scene();
    let (min_x, min_y, width, height) = match scene.view_box() {
        Some(vb) => (
            vb.origin.x,
            vb.origin.y,
            vb.size.width.max(1.0),
            vb.size.height.max(1.0),
        ),
        None => {
            let pad = options.viewbox_padding.max(0.0);
            let b = scene_bounds(linked);
            (
                b.0 - pad,
                b.1 - pad,
                (b.2 - b.0) + pad * 2.0,
                (b.3 - b.1) + pad * 2.0,
            )
        }
    };

    let is_active = |group: Option<u32>| {
        group.is_some_and(|id| state.is_some_and(|s| s.is_active(id)))
    };

    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        fmt(min_x),
        fmt(min_y),
        fmt(width.max(1.0)),
        fmt(height.max(1.0))
    );
    if options.include_style_block {
        out.push_str(STYLE_BLOCK);
    }

    out.push_str(r#"<g class="regions">"#);
    for (idx, region) in scene.region_list().iter().enumerate() {
        let group = linked.region_group(idx);
        let mut attrs = String::new();
        if let Some(fill) = &region.fill {
            let _ = write!(&mut attrs, r#" fill="{}""#, escape_attr(fill));
        }
        if region.hidden {
            attrs.push_str(r#" display="none""#);
        }
        if let Some(id) = group {
            let _ = write!(&mut attrs, r#" data-tissue-group="tg-{id}""#);
        }
        if is_active(group) {
            attrs.push_str(r#" class="tissue-region-highlighted active""#);
        }
        match &region.shape {
            RegionShape::Path { d, .. } => {
                let _ = write!(&mut out, r#"<path d="{}"{attrs} />"#, escape_attr(d));
            }
            RegionShape::Polygon(points) => {
                let _ = write!(
                    &mut out,
                    r#"<polygon points="{}"{attrs} />"#,
                    points_attr(points)
                );
            }
            RegionShape::Rect(rect) => {
                let _ = write!(
                    &mut out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}"{attrs} />"#,
                    fmt(rect.origin.x),
                    fmt(rect.origin.y),
                    fmt(rect.size.width),
                    fmt(rect.size.height)
                );
            }
        }
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="connectors">"#);
    for (idx, connector) in scene.connectors().iter().enumerate() {
        let group = linked.connector_group(idx);
        let mut attrs = String::new();
        if let Some(stroke) = &connector.stroke {
            let _ = write!(&mut attrs, r#" stroke="{}""#, escape_attr(stroke));
        }
        if let Some(width) = &connector.stroke_width {
            let _ = write!(&mut attrs, r#" stroke-width="{}""#, escape_attr(width));
        }
        if linked.connector_candidates().contains(&idx) {
            let active = if is_active(group) { " active" } else { "" };
            let _ = write!(&mut attrs, r#" class="tissue-connector{active}""#);
        }
        if let Some(id) = group {
            let _ = write!(&mut attrs, r#" data-tissue-group="tg-{id}""#);
        }
        match &connector.shape {
            ConnectorShape::Line([a, b]) => {
                let _ = write!(
                    &mut out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{attrs} />"#,
                    fmt(a.x),
                    fmt(a.y),
                    fmt(b.x),
                    fmt(b.y)
                );
            }
            ConnectorShape::Polyline(points) => {
                let _ = write!(
                    &mut out,
                    r#"<polyline fill="none" points="{}"{attrs} />"#,
                    points_attr(points)
                );
            }
        }
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="labels">"#);
    for (idx, label) in scene.labels().iter().enumerate() {
        let link = &linked.labels()[idx];
        let mut text_attrs = String::new();
        let _ = write!(
            &mut text_attrs,
            r#" x="{}" y="{}" font-size="{}""#,
            fmt(label.origin.x),
            fmt(label.origin.y),
            fmt(label.font_size)
        );
        match label.text_anchor {
            TextAnchor::Start => {}
            TextAnchor::Middle => text_attrs.push_str(r#" text-anchor="middle""#),
            TextAnchor::End => text_attrs.push_str(r#" text-anchor="end""#),
        }

        match (&link.href, &link.download_name) {
            (Some(href), Some(download)) => {
                let active = if is_active(link.group) { " active" } else { "" };
                let mut anchor_attrs = String::new();
                if let Some(id) = link.group {
                    let _ = write!(&mut anchor_attrs, r#" data-tissue-group="tg-{id}""#);
                }
                let _ = write!(
                    &mut out,
                    r#"<a href="{}" download="{}" class="svg-tissue-link{active}"{anchor_attrs}><text class="svg-tissue-label"{text_attrs}>{}</text></a>"#,
                    escape_attr(href),
                    escape_attr(download),
                    escape_xml(&label.raw_text)
                );
            }
            _ => {
                let _ = write!(
                    &mut out,
                    r#"<text class="svg-tissue-unavailable"{text_attrs}>{}</text>"#,
                    escape_xml(&label.raw_text)
                );
            }
        }
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g id="tissue-hover-overlays" pointer-events="none">"#);
    for group in linked.groups() {
        let Some(marker) = &group.marker else { continue };
        let active = is_active(Some(group.id));
        let radius = if active {
            link_options.marker_radius_active
        } else {
            link_options.marker_radius
        };
        let class = if active {
            "tissue-highlight-dot active"
        } else {
            "tissue-highlight-dot"
        };
        let _ = write!(
            &mut out,
            r#"<circle class="{class}" cx="{}" cy="{}" r="{}" data-tissue-group="tg-{}" />"#,
            fmt(marker.at.x),
            fmt(marker.at.y),
            fmt(radius),
            group.id
        );
    }
    out.push_str("</g>\n");

    out.push_str("</svg>\n");
    out
}

fn scene_bounds(linked: &LinkedScene) -> (f64, f64, f64, f64) {
    let scene = linked.scene();
    let mut b = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut grow = |p: Point| {
        b.0 = b.0.min(p.x);
        b.1 = b.1.min(p.y);
        b.2 = b.2.max(p.x);
        b.3 = b.3.max(p.y);
    };

    for label in scene.labels() {
        grow(label.origin);
        grow(label.anchor);
    }
    for connector in scene.connectors() {
        for p in connector.vertices() {
            grow(*p);
        }
    }
    for region in scene.region_list() {
        match &region.shape {
            RegionShape::Path { outlines, .. } => {
                for ring in outlines {
                    for p in ring {
                        grow(*p);
                    }
                }
            }
            RegionShape::Polygon(points) => {
                for p in points {
                    grow(*p);
                }
            }
            RegionShape::Rect(rect) => {
                grow(rect.origin);
                grow(rect.origin + rect.size);
            }
        }
    }

    if b.0 > b.2 || b.1 > b.3 {
        return (0.0, 0.0, 100.0, 100.0);
    }
    b
}

fn points_attr(points: &[Point]) -> String {
    let mut out = String::new();
    for (idx, p) in points.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(&mut out, "{},{}", fmt(p.x), fmt(p.y));
    }
    out
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form, avoiding `-0` and tiny float noise from
    // our own calculations.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
