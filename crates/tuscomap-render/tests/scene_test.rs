use tuscomap_render::scene::{ConnectorShape, RegionShape, SvgScene};
use tuscomap_render::text::DeterministicTextMeasurer;

fn parse(svg: &str) -> SvgScene {
    SvgScene::parse(svg, &DeterministicTextMeasurer::default()).expect("scene parses")
}

#[test]
fn scene_collects_labels_connectors_and_regions() {
    let scene = parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 120">
            <text x="10" y="50" font-size="8">Liver</text>
            <line x1="14" y1="50" x2="40" y2="49" stroke="#434343" stroke-width="0.25"/>
            <polyline points="14,60 30,60 40,58" stroke="#231f20" stroke-width="0.2"/>
            <path d="M35 44 L45 44 L45 54 L35 54 Z" fill="#e3c5b0"/>
            <polygon points="0,0 10,0 10,10" fill="#ccc"/>
        </svg>"##,
    );

    assert_eq!(scene.labels().len(), 1);
    assert_eq!(scene.labels()[0].raw_text, "Liver");
    assert_eq!(scene.labels()[0].normalized_text, "liver");
    assert_eq!(scene.connectors().len(), 2);
    assert_eq!(scene.region_list().len(), 2);
    assert!(scene.view_box().is_some());

    match &scene.connectors()[1].shape {
        ConnectorShape::Polyline(points) => assert_eq!(points.len(), 3),
        other => panic!("expected polyline, got {other:?}"),
    }
    match &scene.region_list()[0].shape {
        RegionShape::Path { outlines, .. } => {
            assert_eq!(outlines.len(), 1);
            assert!(outlines[0].len() >= 4);
        }
        other => panic!("expected path region, got {other:?}"),
    }
}

#[test]
fn nested_sub_text_runs_use_the_last_run() {
    let scene = parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
            <text x="10" y="60" font-size="8">
                <tspan x="10" y="56">Kidney -</tspan>
                <tspan x="10" y="64">Cortex</tspan>
            </text>
        </svg>"##,
    );

    assert_eq!(scene.labels().len(), 1);
    assert_eq!(scene.labels()[0].raw_text, "Cortex");
    // The text element carries its own x/y, so the origin comes from it.
    assert_eq!(scene.labels()[0].origin.x, 10.0);
    assert_eq!(scene.labels()[0].origin.y, 60.0);
}

#[test]
fn label_position_falls_back_to_the_last_run() {
    let scene = parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
            <text font-size="8"><tspan x="5" y="7">Heart</tspan></text>
        </svg>"##,
    );

    assert_eq!(scene.labels().len(), 1);
    assert_eq!(scene.labels()[0].origin.x, 5.0);
    assert_eq!(scene.labels()[0].origin.y, 7.0);
    assert!(scene.labels()[0].anchor.x > 5.0);
}

#[test]
fn malformed_primitives_are_silently_excluded() {
    let scene = parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
            <text x="1" y="2">Lung</text>
            <text x="3" y="4">   </text>
            <line x1="14" y1="60" stroke="#434343" stroke-width="0.25"/>
            <polyline points="garbage" stroke="#231f20" stroke-width="0.2"/>
            <polyline points="8,8" stroke="#231f20" stroke-width="0.2"/>
            <rect x="5" y="5" width="0" height="10" fill="#fff"/>
            <polygon points="0,0 10,0" fill="#ccc"/>
            <path d="M0 0" fill="#ccc"/>
        </svg>"##,
    );

    assert_eq!(scene.labels().len(), 1);
    assert!(scene.connectors().is_empty());
    assert!(scene.region_list().is_empty());
}

#[test]
fn middle_anchored_labels_center_on_their_origin() {
    let scene = parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
            <text x="50" y="20" font-size="10" text-anchor="middle">Spleen</text>
        </svg>"##,
    );

    let label = &scene.labels()[0];
    assert!((label.anchor.x - 50.0).abs() < 1e-9);
}

#[test]
fn curved_region_outlines_are_flattened_for_containment() {
    let scene = parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
            <path d="M0 10 C 0 0, 20 0, 20 10 S 40 20, 40 10 Z" fill="#e3c5b0"/>
        </svg>"##,
    );

    match &scene.region_list()[0].shape {
        RegionShape::Path { outlines, .. } => {
            assert_eq!(outlines.len(), 1);
            // Two cubics at 8 steps each, plus the start and closing points.
            assert!(outlines[0].len() > 16);
        }
        other => panic!("expected path region, got {other:?}"),
    }
}

#[test]
fn connector_row_y_is_midpoint_for_lines_and_median_for_polylines() {
    let scene = parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
            <line x1="0" y1="10" x2="20" y2="14" stroke="#000" stroke-width="0.2"/>
            <polyline points="0,10 10,11 20,30" stroke="#000" stroke-width="0.2"/>
        </svg>"##,
    );

    assert_eq!(scene.connectors()[0].row_y(), 12.0);
    assert_eq!(scene.connectors()[1].row_y(), 11.0);
}
