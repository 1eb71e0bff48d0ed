//! Point-in-region queries.
//!
//! The linker consumes hit testing through the [`HitTester`] trait so a live
//! renderer can back it with real picking. [`RegionIndex`] is the bundled
//! pure implementation: even-odd containment over flattened outlines, with
//! the topmost region being the last one in document order. Either way, a
//! failing or always-empty tester only degrades the region-highlight
//! affordance; wiring still succeeds.

use crate::scene::{Region, RegionShape};
use tuscomap_core::geom::Point;

#[derive(Debug, thiserror::Error)]
#[error("hit test failed: {message}")]
pub struct HitTestError {
    pub message: String,
}

pub trait HitTester {
    /// The topmost visible closed-shape region containing `point`, as an
    /// index into the scene's region list, or `None`.
    fn hit_test(&self, point: Point) -> Result<Option<usize>, HitTestError>;
}

/// A tester for scenes with no pickable regions; wiring degrades gracefully.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHitTester;

impl HitTester for NullHitTester {
    fn hit_test(&self, _point: Point) -> Result<Option<usize>, HitTestError> {
        Ok(None)
    }
}

enum IndexedShape {
    Rings(Vec<Vec<Point>>),
    Rect(tuscomap_core::geom::Rect),
}

/// In-memory point-in-shape index over a scene's regions.
pub struct RegionIndex {
    shapes: Vec<(usize, IndexedShape)>,
}

impl RegionIndex {
    /// Indexes the visible regions. `fill="none"` and `display="none"`
    /// shapes are not pickable, matching what live element picking returns
    /// for unfilled interiors.
    pub fn new(regions: &[Region]) -> Self {
        let mut shapes = Vec::new();
        for (idx, region) in regions.iter().enumerate() {
            if region.hidden || region.fill.as_deref().is_some_and(|f| f.trim() == "none") {
                continue;
            }
            let shape = match &region.shape {
                RegionShape::Rect(rect) => IndexedShape::Rect(*rect),
                RegionShape::Polygon(points) => IndexedShape::Rings(vec![points.clone()]),
                RegionShape::Path { outlines, .. } => IndexedShape::Rings(outlines.clone()),
            };
            shapes.push((idx, shape));
        }
        Self { shapes }
    }
}

impl HitTester for RegionIndex {
    fn hit_test(&self, point: Point) -> Result<Option<usize>, HitTestError> {
        // Last in document order paints on top.
        for (idx, shape) in self.shapes.iter().rev() {
            let contains = match shape {
                IndexedShape::Rect(rect) => {
                    point.x >= rect.origin.x
                        && point.x <= rect.origin.x + rect.size.width
                        && point.y >= rect.origin.y
                        && point.y <= rect.origin.y + rect.size.height
                }
                IndexedShape::Rings(rings) => point_in_rings(point, rings),
            };
            if contains {
                return Ok(Some(*idx));
            }
        }
        Ok(None)
    }
}

/// Even-odd rule across all rings of a shape.
fn point_in_rings(p: Point, rings: &[Vec<Point>]) -> bool {
    let mut inside = false;
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[j];
            if (a.y > p.y) != (b.y > p.y)
                && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Region, RegionShape};
    use tuscomap_core::geom::{point, rect};

    fn polygon(points: &[(f64, f64)]) -> Region {
        Region {
            shape: RegionShape::Polygon(points.iter().map(|&(x, y)| point(x, y)).collect()),
            fill: Some("#e3c5b0".to_string()),
            hidden: false,
        }
    }

    #[test]
    fn rect_containment_is_inclusive_of_edges() {
        let regions = vec![Region {
            shape: RegionShape::Rect(rect(10.0, 10.0, 20.0, 10.0)),
            fill: Some("#fff".to_string()),
            hidden: false,
        }];
        let index = RegionIndex::new(&regions);
        assert_eq!(index.hit_test(point(15.0, 15.0)).unwrap(), Some(0));
        assert_eq!(index.hit_test(point(10.0, 10.0)).unwrap(), Some(0));
        assert_eq!(index.hit_test(point(31.0, 15.0)).unwrap(), None);
    }

    #[test]
    fn topmost_region_wins() {
        let regions = vec![
            polygon(&[(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0)]),
            polygon(&[(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)]),
        ];
        let index = RegionIndex::new(&regions);
        assert_eq!(index.hit_test(point(20.0, 20.0)).unwrap(), Some(1));
        assert_eq!(index.hit_test(point(5.0, 5.0)).unwrap(), Some(0));
    }

    #[test]
    fn unfilled_and_hidden_regions_are_not_pickable() {
        let mut unfilled = polygon(&[(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0)]);
        unfilled.fill = Some("none".to_string());
        let mut hidden = polygon(&[(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0)]);
        hidden.hidden = true;

        let index = RegionIndex::new(&[unfilled, hidden]);
        assert_eq!(index.hit_test(point(20.0, 20.0)).unwrap(), None);
    }

    #[test]
    fn even_odd_rule_excludes_holes() {
        let donut = Region {
            shape: RegionShape::Path {
                d: String::new(),
                outlines: vec![
                    vec![point(0.0, 0.0), point(40.0, 0.0), point(40.0, 40.0), point(0.0, 40.0)],
                    vec![point(15.0, 15.0), point(25.0, 15.0), point(25.0, 25.0), point(15.0, 25.0)],
                ],
            },
            fill: Some("#ccc".to_string()),
            hidden: false,
        };
        let index = RegionIndex::new(&[donut]);
        assert_eq!(index.hit_test(point(5.0, 20.0)).unwrap(), Some(0));
        assert_eq!(index.hit_test(point(20.0, 20.0)).unwrap(), None);
    }

    #[test]
    fn null_tester_never_hits() {
        assert_eq!(NullHitTester.hit_test(point(1.0, 1.0)).unwrap(), None);
    }
}
