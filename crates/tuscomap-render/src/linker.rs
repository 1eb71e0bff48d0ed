//! The wiring pass: associate each resolved label with its nearest same-row
//! connector, place an endpoint marker at the connector's far end, hit-test
//! the anatomical region underneath, and group the lot under one id.

use crate::hittest::HitTester;
use crate::scene::{SceneSource, SvgScene};
use crate::style::ConnectorStylePredicate;
use rustc_hash::FxHashMap;
use std::time::Duration;
use tuscomap_core::Species;
use tuscomap_core::catalog::{dataset_file_name, dataset_href};
use tuscomap_core::geom::{Point, point};

pub type GroupId = u32;

#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// How far a connector's representative Y may sit from a label anchor's Y
    /// while still counting as the same row, in scene units.
    pub row_tolerance: f64,
    /// How long a click-forced activation stays on before auto-reverting.
    pub click_hold: Duration,
    pub marker_radius: f64,
    pub marker_radius_active: f64,
    pub style: ConnectorStylePredicate,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            row_tolerance: 3.2,
            click_hold: Duration::from_millis(350),
            marker_radius: 2.5,
            marker_radius_active: 3.5,
            style: ConnectorStylePredicate::tusco_leader_lines(),
        }
    }
}

/// Inactive marker placed at the connector endpoint that points into the
/// anatomical region.
#[derive(Debug, Clone, Copy)]
pub struct EndpointMarker {
    pub at: Point,
}

#[derive(Debug, Clone)]
pub struct LinkGroup {
    pub id: GroupId,
    /// Label index in the scene.
    pub label: usize,
    /// Connector index in the scene.
    pub connector: usize,
    pub marker: Option<EndpointMarker>,
    /// Region index in the scene, when the probe found one.
    pub region: Option<usize>,
}

/// Per-label link state: where the label's dataset lives, and which group
/// (if any) the label was wired into.
#[derive(Debug, Clone)]
pub struct LabelLink {
    /// `None` marks the label unavailable (no candidate in the catalog).
    pub slug: Option<String>,
    pub href: Option<String>,
    pub download_name: Option<String>,
    pub group: Option<GroupId>,
}

/// A scene plus its label links and wired groups.
#[derive(Debug, Clone)]
pub struct LinkedScene {
    scene: SvgScene,
    species: Species,
    labels: Vec<LabelLink>,
    groups: Vec<LinkGroup>,
    connector_groups: FxHashMap<usize, GroupId>,
    region_groups: FxHashMap<usize, GroupId>,
    connector_candidates: Vec<usize>,
}

impl LinkedScene {
    /// Builds label links from per-label resolution results (`resolved` is
    /// parallel to the scene's labels). No groups exist until a [`Linker`]
    /// runs its wiring pass.
    pub fn new(scene: SvgScene, species: Species, resolved: &[Option<String>]) -> Self {
        let labels = scene
            .labels()
            .iter()
            .enumerate()
            .map(|(idx, _)| match resolved.get(idx).and_then(|r| r.clone()) {
                Some(slug) => LabelLink {
                    href: Some(dataset_href(species, &slug)),
                    download_name: Some(dataset_file_name(species, &slug)),
                    slug: Some(slug),
                    group: None,
                },
                None => LabelLink {
                    slug: None,
                    href: None,
                    download_name: None,
                    group: None,
                },
            })
            .collect();

        Self {
            scene,
            species,
            labels,
            groups: Vec::new(),
            connector_groups: FxHashMap::default(),
            region_groups: FxHashMap::default(),
            connector_candidates: Vec::new(),
        }
    }

    pub fn scene(&self) -> &SvgScene {
        &self.scene
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn labels(&self) -> &[LabelLink] {
        &self.labels
    }

    pub fn groups(&self) -> &[LinkGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&LinkGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Connector indices that passed style classification in the last pass.
    pub fn connector_candidates(&self) -> &[usize] {
        &self.connector_candidates
    }

    pub fn connector_group(&self, connector: usize) -> Option<GroupId> {
        self.connector_groups.get(&connector).copied()
    }

    pub fn region_group(&self, region: usize) -> Option<GroupId> {
        self.region_groups.get(&region).copied()
    }

    pub fn label_group(&self, label: usize) -> Option<GroupId> {
        self.labels.get(label).and_then(|l| l.group)
    }
}

/// Scene linker. The group-id counter is scoped to the instance, so ids are
/// collision-free within every scene this linker wires; there is no
/// cross-diagram ordering.
#[derive(Debug, Default)]
pub struct Linker {
    next_group_id: GroupId,
}

// Probe offsets around the far endpoint; sampling the exact endpoint tends to
// land on the connector's own stroke.
const PROBE_OFFSETS: [(f64, f64); 9] = [
    (0.0, 0.0),
    (1.5, 0.0),
    (-1.5, 0.0),
    (0.0, 1.5),
    (0.0, -1.5),
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
];

impl Linker {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_group_id(&mut self) -> GroupId {
        self.next_group_id += 1;
        self.next_group_id
    }

    /// Wires (or re-wires) a linked scene.
    ///
    /// The pass is idempotent: a label, connector or region already carrying
    /// a group id is never reassigned, so running it twice produces identical
    /// assignments and no duplicate ids. Missing connectors or regions are
    /// non-fatal; the label stays a plain link target.
    pub fn wire(&mut self, linked: &mut LinkedScene, tester: &dyn HitTester, options: &LinkOptions) {
        linked.connector_candidates = classify_connectors(&linked.scene, &options.style);

        for label_idx in 0..linked.labels.len() {
            if linked.labels[label_idx].slug.is_none() {
                // Unavailable: resolution found no dataset for this label.
                continue;
            }
            if linked.labels[label_idx].group.is_some() {
                // Already wired by a previous pass.
                continue;
            }
            let Some(anchor) = linked.scene.label_anchor(label_idx) else {
                continue;
            };

            let Some(connector_idx) =
                nearest_row_connector(linked, anchor, options.row_tolerance)
            else {
                continue;
            };

            let id = self.fresh_group_id();
            let connector = &linked.scene.connectors()[connector_idx];
            let endpoint = connector.farthest_vertex_from(anchor);
            let marker = endpoint.map(|at| EndpointMarker { at });

            let region = endpoint.and_then(|p| probe_region(tester, p)).filter(|idx| {
                // A region tagged by an earlier group keeps its tag.
                !linked.region_groups.contains_key(idx)
            });

            linked.labels[label_idx].group = Some(id);
            linked.connector_groups.insert(connector_idx, id);
            if let Some(region_idx) = region {
                linked.region_groups.insert(region_idx, id);
            }
            linked.groups.push(LinkGroup {
                id,
                label: label_idx,
                connector: connector_idx,
                marker,
                region,
            });
        }
    }
}

fn classify_connectors(scene: &SvgScene, style: &ConnectorStylePredicate) -> Vec<usize> {
    scene
        .connectors()
        .iter()
        .enumerate()
        .filter(|(_, c)| style.matches(c.stroke.as_deref(), c.stroke_width.as_deref()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Among same-row connector candidates not yet grouped, the one whose nearest
/// vertex is closest to the anchor.
fn nearest_row_connector(linked: &LinkedScene, anchor: Point, tolerance: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &idx in &linked.connector_candidates {
        if linked.connector_groups.contains_key(&idx) {
            continue;
        }
        let connector = &linked.scene.connectors()[idx];
        if (connector.row_y() - anchor.y).abs() > tolerance {
            continue;
        }
        let distance = connector.nearest_vertex_distance(anchor);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Probes the endpoint and eight offsets around it; the first region hit
/// wins. A hit-test failure is caught here and means "no region found".
fn probe_region(tester: &dyn HitTester, endpoint: Point) -> Option<usize> {
    for (dx, dy) in PROBE_OFFSETS {
        match tester.hit_test(point(endpoint.x + dx, endpoint.y + dy)) {
            Ok(Some(region)) => return Some(region),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "region hit test failed");
                return None;
            }
        }
    }
    None
}
