//! Connector classification: which lines/polylines count as leader lines.
//!
//! The recognized visual styles are data, not code, so a diagram with a
//! different drawing convention only needs a different predicate value.

use serde::{Deserialize, Serialize};

/// Accepted stroke colors and widths for connector candidates. A primitive
/// qualifies when its stroke is in `strokes` and its parsed stroke width is
/// in `stroke_widths`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorStylePredicate {
    strokes: Vec<String>,
    stroke_widths: Vec<f64>,
}

impl ConnectorStylePredicate {
    pub fn new<S: Into<String>>(
        strokes: impl IntoIterator<Item = S>,
        stroke_widths: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            strokes: strokes
                .into_iter()
                .map(|s| s.into().trim().to_ascii_lowercase())
                .collect(),
            stroke_widths: stroke_widths.into_iter().collect(),
        }
    }

    /// The thin dark leader lines used on the TUSCO body maps.
    pub fn tusco_leader_lines() -> Self {
        Self::new(["#434343", "#231f20", "#000", "#000000"], [0.25, 0.2])
    }

    pub fn matches(&self, stroke: Option<&str>, stroke_width: Option<&str>) -> bool {
        let Some(stroke) = stroke else { return false };
        let Some(width) = stroke_width.and_then(parse_stroke_width) else {
            return false;
        };
        let stroke = stroke.trim().to_ascii_lowercase();
        self.strokes.iter().any(|s| *s == stroke)
            && self.stroke_widths.iter().any(|w| (w - width).abs() < 1e-9)
    }
}

impl Default for ConnectorStylePredicate {
    fn default() -> Self {
        Self::tusco_leader_lines()
    }
}

fn parse_stroke_width(value: &str) -> Option<f64> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim();
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
