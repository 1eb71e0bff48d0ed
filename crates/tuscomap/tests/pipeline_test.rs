use tuscomap::render::{
    HeadlessError, LinkOptions, SvgEmitOptions, link_diagram, link_diagram_sync,
    render_linked_scene_svg,
};
use tuscomap::rules::RuleTable;
use tuscomap::session::ViewSession;
use tuscomap::{Catalog, Species};

const BODY_MAP: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 240 160">
  <text x="10" y="50" font-size="8">Heart - Left Ventricle</text>
  <line x1="64" y1="50" x2="120" y2="48" stroke="#434343" stroke-width="0.25"/>
  <path d="M110 38 L130 38 L130 58 L110 58 Z" fill="#c46b6b"/>
  <text x="10" y="80" font-size="8">Kidney - Cortex</text>
  <line x1="58" y1="78" x2="120" y2="80" stroke="#231f20" stroke-width="0.2"/>
  <polygon points="112,74 130,74 130,90 112,90" fill="#b06a50"/>
  <text x="10" y="110" font-size="8">Mystery Organ</text>
</svg>"##;

const LISTING: &str = r#"[
  { "tissueName": "Heart", "uberonId": "UBERON:0000948", "filename": "tusco_human_heart.tsv", "size": 2048 },
  { "tissueName": "Kidney", "uberonId": "UBERON:0002113", "filename": "tusco_human_kidney.tsv", "size": 4096 }
]"#;

#[test]
fn end_to_end_linking_resolves_wires_and_emits() {
    let linked = link_diagram_sync(
        BODY_MAP,
        Species::Human,
        LISTING,
        &RuleTable::default_tusco(),
        &LinkOptions::default(),
    )
    .unwrap();

    // "Heart - Left Ventricle" has no dedicated dataset, so the fallback
    // rule's second candidate wins; "Kidney - Cortex" shares the kidney file.
    let slugs: Vec<Option<&str>> = linked.labels().iter().map(|l| l.slug.as_deref()).collect();
    assert_eq!(slugs, vec![Some("heart"), Some("kidney"), None]);

    assert_eq!(linked.groups().len(), 2);
    assert!(linked.groups().iter().all(|g| g.marker.is_some()));
    assert_eq!(linked.groups()[0].region, Some(0));
    assert_eq!(linked.groups()[1].region, Some(1));

    let svg = render_linked_scene_svg(
        &linked,
        None,
        &LinkOptions::default(),
        &SvgEmitOptions::default(),
    );
    assert!(svg.contains(r#"href="/data/human/tusco_human_heart.tsv""#));
    assert!(svg.contains(r#"href="/data/human/tusco_human_kidney.tsv""#));
    assert!(svg.contains(r#"class="svg-tissue-unavailable""#));

    let doc = roxmltree::Document::parse(&svg).expect("well-formed output");
    assert_eq!(doc.root_element().tag_name().name(), "svg");
}

#[test]
fn async_entry_point_matches_the_sync_one() {
    let linked = futures::executor::block_on(link_diagram(
        BODY_MAP,
        Species::Human,
        LISTING,
        &RuleTable::default_tusco(),
        &LinkOptions::default(),
    ))
    .unwrap();
    assert_eq!(linked.groups().len(), 2);
}

#[test]
fn fetch_failures_surface_as_errors_without_partial_wiring() {
    let err = link_diagram_sync(
        "this is not an svg document",
        Species::Human,
        LISTING,
        &RuleTable::default_tusco(),
        &LinkOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HeadlessError::Scene(_)));

    let err = link_diagram_sync(
        BODY_MAP,
        Species::Human,
        "{ definitely not a listing",
        &RuleTable::default_tusco(),
        &LinkOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HeadlessError::Catalog(_)));
}

#[test]
fn stale_loads_are_never_applied_to_a_reloaded_view() {
    let session = ViewSession::new();
    let ticket = session.ticket();

    // The fetch completes only after the view reloaded; the result must be
    // dropped and the fresh generation's fetch applied instead.
    let fresh = session.reload();
    let stale_catalog = Catalog::from_json(Species::Human, LISTING).unwrap();
    assert!(session.apply(ticket, &stale_catalog).is_none());

    let catalog = Catalog::from_json(Species::Human, LISTING).unwrap();
    assert!(session.apply(fresh, &catalog).is_some());
}

#[test]
fn two_labels_may_share_one_dataset() {
    let map = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 240 160">
      <text x="10" y="50" font-size="8">Kidney - Cortex</text>
      <text x="10" y="80" font-size="8">Kidney - Medulla</text>
    </svg>"##;
    let linked = link_diagram_sync(
        map,
        Species::Human,
        LISTING,
        &RuleTable::default_tusco(),
        &LinkOptions::default(),
    )
    .unwrap();

    let slugs: Vec<Option<&str>> = linked.labels().iter().map(|l| l.slug.as_deref()).collect();
    assert_eq!(slugs, vec![Some("kidney"), Some("kidney")]);
    assert_eq!(
        linked.labels()[0].href,
        linked.labels()[1].href,
        "sibling sub-labels share the kidney dataset file"
    );
}
