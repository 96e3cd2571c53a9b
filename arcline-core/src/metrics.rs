//! Font metrics seam. The layout engine only ever asks "how wide is
//! this character?" and "how tall is a line?".
//!
//! Concrete providers:
//! - `HashMap<char, f32>`: explicit advance table, handy for tests.
//! - [`FixedAdvance`]: every character gets the same advance.
//! - `ShapedMetrics` in `arcline-text`: advances from real shaping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Advance information for one character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphAdvance {
    /// Horizontal advance in pixels.
    pub width: f32,
    /// The glyph was drawn from a fallback font.
    pub substituted: bool,
}

impl GlyphAdvance {
    pub const fn new(width: f32) -> Self {
        Self {
            width,
            substituted: false,
        }
    }

    pub const fn substituted(width: f32) -> Self {
        Self {
            width,
            substituted: true,
        }
    }
}

/// Vertical metrics of a line, in pixels (ascent/descent positive).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl LineMetrics {
    /// Rough metrics for a font of `size` pixels when the real font
    /// tables are not available.
    pub fn estimate(size: f32) -> Self {
        Self {
            ascent: size * 0.8,
            descent: size * 0.2,
            leading: 0.0,
        }
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

impl Default for LineMetrics {
    fn default() -> Self {
        Self::estimate(16.0)
    }
}

/// Maps characters to advance widths for a given font.
pub trait FontMetrics {
    /// Advance for `ch`, or `None` if the font has no metrics for it.
    fn advance(&self, ch: char) -> Option<GlyphAdvance>;

    /// Advance for the `index`-th character of the text being laid out.
    ///
    /// Shaped providers override this because the same character can
    /// measure differently depending on its neighbours (ligatures,
    /// clusters). Defaults to [`FontMetrics::advance`].
    fn advance_at(&self, index: usize, ch: char) -> Option<GlyphAdvance> {
        let _ = index;
        self.advance(ch)
    }

    /// Vertical metrics used for the debug overlay.
    fn line_metrics(&self) -> LineMetrics {
        LineMetrics::default()
    }
}

impl<M: FontMetrics + ?Sized> FontMetrics for &M {
    fn advance(&self, ch: char) -> Option<GlyphAdvance> {
        (**self).advance(ch)
    }

    fn advance_at(&self, index: usize, ch: char) -> Option<GlyphAdvance> {
        (**self).advance_at(index, ch)
    }

    fn line_metrics(&self) -> LineMetrics {
        (**self).line_metrics()
    }
}

impl FontMetrics for HashMap<char, f32> {
    fn advance(&self, ch: char) -> Option<GlyphAdvance> {
        self.get(&ch).copied().map(GlyphAdvance::new)
    }
}

impl FontMetrics for HashMap<char, GlyphAdvance> {
    fn advance(&self, ch: char) -> Option<GlyphAdvance> {
        self.get(&ch).copied()
    }
}

/// Monospace provider: every character has the same advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub width: f32,
    pub line: LineMetrics,
}

impl FixedAdvance {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            line: LineMetrics::estimate(width / 0.6),
        }
    }
}

impl FontMetrics for FixedAdvance {
    fn advance(&self, _ch: char) -> Option<GlyphAdvance> {
        Some(GlyphAdvance::new(self.width))
    }

    fn line_metrics(&self) -> LineMetrics {
        self.line
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_metrics() {
        let table: HashMap<char, f32> = [('A', 10.0), ('B', 12.0)].into_iter().collect();
        assert_eq!(table.advance('A'), Some(GlyphAdvance::new(10.0)));
        assert_eq!(table.advance('Z'), None);
        assert_eq!(table.line_metrics(), LineMetrics::default());
    }

    #[test]
    fn test_hashmap_with_substitution() {
        let mut table: HashMap<char, GlyphAdvance> = HashMap::new();
        table.insert('字', GlyphAdvance::substituted(16.0));
        let adv = table.advance('字').unwrap();
        assert!(adv.substituted);
        assert_eq!(adv.width, 16.0);
    }

    #[test]
    fn test_fixed_advance() {
        let fixed = FixedAdvance::new(6.0);
        assert_eq!(fixed.advance('x').unwrap().width, 6.0);
        assert_eq!(fixed.advance('\u{1F600}').unwrap().width, 6.0);
        assert!(fixed.line_metrics().ascent > 0.0);
    }

    #[test]
    fn test_reference_forwarding() {
        let fixed = FixedAdvance::new(4.0);
        let by_ref: &dyn FontMetrics = &fixed;
        assert_eq!((&by_ref).advance('a').unwrap().width, 4.0);
        assert_eq!((&by_ref).advance_at(7, 'a').unwrap().width, 4.0);
    }

    #[test]
    fn test_line_metrics_estimate() {
        let m = LineMetrics::estimate(20.0);
        assert_eq!(m.ascent, 16.0);
        assert_eq!(m.descent, 4.0);
        assert_eq!(m.height(), 20.0);
    }
}
