#![forbid(unsafe_code)]

//! Scene side of the TUSCO anatomy map engine: parses a raw SVG body map,
//! wires resolved labels to their connector lines and anatomical regions, and
//! serializes the wired scene back to SVG.
//!
//! Everything here is headless and deterministic. Hit testing is a capability
//! trait; the bundled [`hittest::RegionIndex`] backs it with a pure in-memory
//! point-in-shape index so wiring is testable without a renderer.

pub mod activate;
pub mod hittest;
pub mod linker;
pub mod scene;
pub mod style;
pub mod svg;
pub mod text;

pub use activate::{ActivationState, InteractionTarget};
pub use hittest::{HitTestError, HitTester, NullHitTester, RegionIndex};
pub use linker::{
    EndpointMarker, GroupId, LabelLink, LinkGroup, LinkOptions, LinkedScene, Linker,
};
pub use scene::{
    Connector, ConnectorShape, Region, RegionShape, SceneSource, SvgScene, TextAnchor, TextLabel,
};
pub use style::ConnectorStylePredicate;
pub use svg::{SvgEmitOptions, render_linked_scene_svg};
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid SVG scene: {0}")]
    SceneXml(#[from] roxmltree::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
