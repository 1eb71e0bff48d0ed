//! Headless text measurement for label bounding boxes.

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics;
}

/// Character-count heuristic good enough for anchor and row geometry; a live
/// integration can substitute real font metrics behind the same trait.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let font_size = font_size.max(1.0);
        TextMetrics {
            width: text.chars().count() as f64 * font_size * char_width_factor,
            height: font_size * line_height_factor,
        }
    }
}
