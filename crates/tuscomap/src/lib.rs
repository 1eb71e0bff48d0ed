#![forbid(unsafe_code)]

//! `tuscomap` is a headless engine for the TUSCO anatomy body maps: it
//! matches diagram text labels to per-tissue dataset files and wires the
//! diagram's connector lines and anatomical regions into synchronized
//! highlight groups.
//!
//! # Features
//!
//! - `render`: enable SVG scene parsing, wiring and linked-SVG output
//!   (`tuscomap::render`)

pub mod session;

pub use tuscomap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use tuscomap_render::activate::{ActivationState, InteractionTarget};
    pub use tuscomap_render::hittest::{HitTestError, HitTester, NullHitTester, RegionIndex};
    pub use tuscomap_render::linker::{
        EndpointMarker, GroupId, LinkGroup, LinkOptions, LinkedScene, Linker,
    };
    pub use tuscomap_render::scene::{Connector, Region, SceneSource, SvgScene, TextLabel};
    pub use tuscomap_render::style::ConnectorStylePredicate;
    pub use tuscomap_render::svg::{SvgEmitOptions, render_linked_scene_svg};
    pub use tuscomap_render::text::{DeterministicTextMeasurer, TextMeasurer};

    use tuscomap_core::resolve::resolve_slug;
    use tuscomap_core::rules::{RuleTable, candidate_slugs_for_label};
    use tuscomap_core::{Catalog, Species};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Catalog(#[from] tuscomap_core::Error),
        #[error(transparent)]
        Scene(#[from] tuscomap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Synchronous one-call pipeline (executor-free): parse the scene,
    /// resolve every label against the catalog, and run the wiring pass
    /// with the bundled in-memory hit tester.
    pub fn link_svg_scene_sync(
        svg_text: &str,
        catalog: &Catalog,
        rules: &RuleTable,
        options: &LinkOptions,
    ) -> Result<LinkedScene> {
        let measurer = DeterministicTextMeasurer::default();
        let scene = SvgScene::parse(svg_text, &measurer)?;

        let resolved: Vec<Option<String>> = scene
            .labels()
            .iter()
            .map(|label| {
                let candidates = candidate_slugs_for_label(&label.raw_text, rules);
                resolve_slug(
                    &label.raw_text,
                    &candidates,
                    Some(catalog.available_slugs()),
                    Some(catalog.aliases()),
                )
            })
            .collect();

        let tester = RegionIndex::new(scene.region_list());
        let mut linked = LinkedScene::new(scene, catalog.species(), &resolved);
        let mut linker = Linker::new();
        linker.wire(&mut linked, &tester, options);
        Ok(linked)
    }

    /// Runtime-agnostic async variant of [`link_svg_scene_sync`]; the work is
    /// CPU-bound and performs no I/O.
    pub async fn link_svg_scene(
        svg_text: &str,
        catalog: &Catalog,
        rules: &RuleTable,
        options: &LinkOptions,
    ) -> Result<LinkedScene> {
        link_svg_scene_sync(svg_text, catalog, rules, options)
    }

    /// Full pipeline from raw inputs: parses the catalog listing JSON, then
    /// links the scene.
    pub fn link_diagram_sync(
        svg_text: &str,
        species: Species,
        catalog_json: &str,
        rules: &RuleTable,
        options: &LinkOptions,
    ) -> Result<LinkedScene> {
        let catalog = Catalog::from_json(species, catalog_json)?;
        link_svg_scene_sync(svg_text, &catalog, rules, options)
    }

    pub async fn link_diagram(
        svg_text: &str,
        species: Species,
        catalog_json: &str,
        rules: &RuleTable,
        options: &LinkOptions,
    ) -> Result<LinkedScene> {
        link_diagram_sync(svg_text, species, catalog_json, rules, options)
    }
}
