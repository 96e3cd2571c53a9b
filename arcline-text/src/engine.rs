//! Text engine — measures strings with `cosmic-text` for arc layout.
//!
//! The engine manages a `FontSystem` (font discovery + shaping) and a
//! `SwashCache` (glyph rasterization). Instead of positioned quads on a
//! straight line it hands back per-character advances as a
//! [`ShapedMetrics`], which plugs into the arc layout engine as its
//! `FontMetrics` provider.
//!
//! ## Substitution
//!
//! The requested family chain is resolved once against the font
//! database. Any glyph shaped from a different face came from
//! cosmic-text's fallback list and is reported as substituted; a glyph
//! id of 0 (`.notdef`) means the character has no metrics at all.

use std::collections::HashMap;

use cosmic_text::{
    fontdb, Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style as CStyle, SwashCache,
    Weight,
};

use arcline_core::layout::validate_font_size;
use arcline_core::{FontMetrics, FontSpec, GlyphAdvance, LineMetrics, Rect};

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Per-character advances of one shaped string.
#[derive(Clone, Debug, Default)]
pub struct ShapedMetrics {
    /// One entry per character of the measured text, in order.
    positions: Vec<(char, Option<GlyphAdvance>)>,
    /// Context-free fallback; cluster starts win over interior chars.
    by_char: HashMap<char, GlyphAdvance>,
    /// Vertical metrics of the primary font.
    pub line: LineMetrics,
    /// Total advance of the shaped text.
    pub width: f32,
}

impl ShapedMetrics {
    fn from_positions(positions: Vec<(char, Option<GlyphAdvance>)>, line: LineMetrics, width: f32) -> Self {
        let mut by_char: HashMap<char, GlyphAdvance> = HashMap::new();
        for &(ch, adv) in &positions {
            let Some(adv) = adv else { continue };
            match by_char.get(&ch) {
                Some(prev) if prev.width > 0.0 || adv.width == 0.0 => {}
                _ => {
                    by_char.insert(ch, adv);
                }
            }
        }
        Self {
            positions,
            by_char,
            line,
            width,
        }
    }

    /// Number of characters measured.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FontMetrics for ShapedMetrics {
    fn advance(&self, ch: char) -> Option<GlyphAdvance> {
        self.by_char.get(&ch).copied()
    }

    fn advance_at(&self, index: usize, ch: char) -> Option<GlyphAdvance> {
        match self.positions.get(index) {
            Some(&(measured, adv)) if measured == ch => adv,
            _ => self.advance(ch),
        }
    }

    fn line_metrics(&self) -> LineMetrics {
        self.line
    }
}

/// Map a lowercase family name onto a cosmic-text family.
fn family_of(name: &str) -> Family<'_> {
    match name {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        concrete => Family::Name(concrete),
    }
}

/// Byte offset in `text` where each buffer line starts.
///
/// Glyph offsets from cosmic-text are relative to their own line.
fn line_starts(text: &str, buffer: &Buffer) -> Vec<usize> {
    let mut starts = Vec::with_capacity(buffer.lines.len());
    let mut cursor = 0usize;
    for line in &buffer.lines {
        let line_text = line.text();
        let start = text
            .get(cursor..)
            .and_then(|rest| rest.find(line_text))
            .map_or(cursor, |offset| cursor + offset);
        starts.push(start);
        cursor = start + line_text.len();
    }
    starts
}

/// Core text engine wrapping cosmic-text.
pub struct TextEngine {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Create a new text engine with system font discovery.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    /// Use an existing font system (e.g. one with bundled fonts loaded).
    pub fn with_font_system(font_system: FontSystem) -> Self {
        log::debug!(
            "TextEngine: {} font faces available",
            font_system.db().faces().count()
        );
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    /// Whether any font face is loaded at all.
    pub fn has_fonts(&self) -> bool {
        self.font_system.db().faces().next().is_some()
    }

    /// Resolve the first family of the chain that exists in the database.
    fn resolve_primary(&self, font: &FontSpec) -> Option<fontdb::ID> {
        let weight = Weight(font.weight);
        let style = if font.italic {
            CStyle::Italic
        } else {
            CStyle::Normal
        };
        font.families().iter().find_map(|name| {
            let families = [family_of(name)];
            self.font_system.db().query(&fontdb::Query {
                families: &families,
                weight,
                stretch: fontdb::Stretch::Normal,
                style,
            })
        })
    }

    /// Shape `text` with unbounded width. The size must already be valid.
    fn shape(&mut self, text: &str, font: &FontSpec) -> Buffer {
        let metrics = Metrics::new(font.size, font.size * LINE_HEIGHT_FACTOR);
        let primary = font.primary_family();
        let attrs = Attrs::new()
            .family(family_of(&primary))
            .weight(Weight(font.weight))
            .style(if font.italic {
                CStyle::Italic
            } else {
                CStyle::Normal
            });

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Vertical metrics of a face scaled to `size`, or an estimate.
    fn line_metrics_for(&mut self, id: Option<fontdb::ID>, size: f32) -> LineMetrics {
        let Some(font) = id.and_then(|id| self.font_system.get_font(id)) else {
            return LineMetrics::estimate(size);
        };
        let m = font.as_swash().metrics(&[]).scale(size);
        LineMetrics {
            ascent: m.ascent,
            descent: m.descent.abs(),
            leading: m.leading,
        }
    }

    /// Shape `text` and collect per-character advances.
    ///
    /// The first character of a glyph cluster receives the cluster's
    /// advance; interior characters get zero width. Advances are kept
    /// per position, so a character that is a ligature tail in one place
    /// keeps its own width elsewhere. An unusable font size measures
    /// nothing.
    pub fn measure(&mut self, text: &str, font: &FontSpec) -> ShapedMetrics {
        if let Err(e) = validate_font_size(font.size) {
            log::warn!("Skipping shaping: {e}");
            return ShapedMetrics::default();
        }
        let primary = self.resolve_primary(font);
        let line = self.line_metrics_for(primary, font.size);
        if text.is_empty() {
            return ShapedMetrics {
                line,
                ..Default::default()
            };
        }
        if primary.is_none() {
            log::warn!(
                "No face matches '{}', every glyph will be a fallback",
                font.family
            );
        }

        let buffer = self.shape(text, font);
        let starts = line_starts(text, &buffer);

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let index_of = |byte: usize| chars.binary_search_by_key(&byte, |(b, _)| *b).ok();

        let mut advances: Vec<Option<GlyphAdvance>> = vec![None; chars.len()];
        let mut width = 0.0f32;
        for run in buffer.layout_runs() {
            let base = starts.get(run.line_i).copied().unwrap_or(0);
            for glyph in run.glyphs.iter() {
                width += glyph.w;
                if glyph.glyph_id == 0 {
                    // .notdef: leave the char unknown.
                    continue;
                }
                let Some(first) = index_of(base + glyph.start) else {
                    continue;
                };
                let substituted = primary.is_some_and(|id| id != glyph.font_id);
                match &mut advances[first] {
                    // Several glyphs in one cluster (base + marks).
                    Some(adv) => adv.width += glyph.w,
                    slot => {
                        *slot = Some(GlyphAdvance {
                            width: glyph.w,
                            substituted,
                        })
                    }
                }
                let cluster_end = base + glyph.end;
                for (i, &(b, _)) in chars.iter().enumerate().skip(first + 1) {
                    if b >= cluster_end {
                        break;
                    }
                    advances[i].get_or_insert(GlyphAdvance {
                        width: 0.0,
                        substituted,
                    });
                }
            }
        }

        log::debug!(
            "measured {} chars ({} known) at {}px: width {:.1}",
            chars.len(),
            advances.iter().filter(|a| a.is_some()).count(),
            font.size,
            width
        );
        let positions = chars
            .iter()
            .zip(advances)
            .map(|(&(_, ch), adv)| (ch, adv))
            .collect();
        ShapedMetrics::from_positions(positions, line, width)
    }

    /// Ink bounds of each character's glyph, relative to the glyph's
    /// baseline origin (y grows downwards). `None` for characters with
    /// no visible ink, such as spaces.
    pub fn ink_bounds(&mut self, text: &str, font: &FontSpec) -> Vec<Option<Rect>> {
        let chars: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        let mut bounds = vec![None; chars.len()];
        if text.is_empty() || validate_font_size(font.size).is_err() {
            return bounds;
        }

        let buffer = self.shape(text, font);
        let starts = line_starts(text, &buffer);
        for run in buffer.layout_runs() {
            let base = starts.get(run.line_i).copied().unwrap_or(0);
            for glyph in run.glyphs.iter() {
                let Ok(index) = chars.binary_search(&(base + glyph.start)) else {
                    continue;
                };
                let physical = glyph.physical((0.0, 0.0), 1.0);
                let image = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key);
                let Some(image) = image else {
                    continue; // whitespace or missing glyph
                };
                if image.placement.width == 0 || image.placement.height == 0 {
                    continue;
                }
                bounds[index] = Some(Rect::new(
                    image.placement.left as f32,
                    -(image.placement.top as f32),
                    image.placement.width as f32,
                    image.placement.height as f32,
                ));
            }
        }
        bounds
    }
}

// ===================================================================
// Tests
// ===================================================================
