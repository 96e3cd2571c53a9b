//! Immutable arc-text configuration.
//!
//! [`ArcTextConfig`] is a plain value: every `with_*` combinator returns a
//! modified copy, so a view can compare the old and new value to decide
//! what needs recomputing. Configs load from JSON with defaults for any
//! omitted field:
//!
//! ```json
//! { "text": "Hello, arc!", "radius": 120, "arc_size": 90,
//!   "font": { "family": "serif", "size": 24 },
//!   "debug": { "shows_glyph_bounds": true } }
//! ```

use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Color;
use crate::layout::{clamp_arc_size, validate_font_size, validate_radius, LayoutError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Layout(#[from] LayoutError),
}

// ── Font ────────────────────────────────────────────────────────────

/// Font selection for the run.
///
/// Equality and hashing compare `size` bit for bit so a `FontSpec` can key a
/// cache even when the size is NaN or negative zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// CSS-style family chain (e.g. `"Georgia, serif"`).
    pub family: String,
    /// Font size in pixels.
    pub size: f32,
    /// Weight (100–900). 400 = normal, 700 = bold.
    pub weight: u16,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: String::from("sans-serif"),
            size: 16.0,
            weight: 400,
            italic: false,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Default::default()
        }
    }

    /// Family chain split on commas, unquoted, lowercased.
    pub fn families(&self) -> Vec<String> {
        let families: Vec<String> = self
            .family
            .split(',')
            .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if families.is_empty() {
            vec!["sans-serif".into()]
        } else {
            families
        }
    }

    /// First family of the chain.
    pub fn primary_family(&self) -> String {
        self.families()
            .into_iter()
            .next()
            .unwrap_or_else(|| "sans-serif".into())
    }
}

impl Hash for FontSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.size.to_bits().hash(state);
        self.weight.hash(state);
        self.italic.hash(state);
    }
}

impl PartialEq for FontSpec {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.size.to_bits() == other.size.to_bits()
            && self.weight == other.weight
            && self.italic == other.italic
    }
}

impl Eq for FontSpec {}

// ── Debug flags ─────────────────────────────────────────────────────

/// Debug drawing switches. None of them affect glyph placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugFlags {
    /// Outline each glyph's box.
    pub shows_glyph_bounds: bool,
    /// Draw baseline, ascent and descent circles.
    pub shows_line_metrics: bool,
    /// Draw fallback-font glyphs at reduced opacity.
    pub dims_substituted_glyphs: bool,
}

impl DebugFlags {
    pub fn any(&self) -> bool {
        self.shows_glyph_bounds || self.shows_line_metrics || self.dims_substituted_glyphs
    }
}

// ── Attributed text ─────────────────────────────────────────────────

/// Read-only styled view of a config's text: the string plus the font
/// and color attributes applied across its whole range.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledText<'a> {
    pub text: &'a str,
    pub font: &'a FontSpec,
    pub color: Color,
}

impl StyledText<'_> {
    /// Number of characters the attributes span.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Fingerprint of every field that affects glyph geometry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutKey {
    text: String,
    font: FontSpec,
    radius: u32,
    arc_size: u32,
    shift_h: u32,
    shift_v: u32,
}

/// Complete description of one arc-text drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcTextConfig {
    pub font: FontSpec,
    pub text: String,
    /// Circle radius in pixels. Must be positive.
    pub radius: f32,
    pub color: Color,
    /// Angular span in degrees, clamped to [0, 360] at layout time.
    pub arc_size: f32,
    pub shift_h: f32,
    pub shift_v: f32,
    pub debug: DebugFlags,
}

impl Default for ArcTextConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            text: String::new(),
            radius: 100.0,
            color: Color::BLACK,
            arc_size: 90.0,
            shift_h: 0.0,
            shift_v: 0.0,
            debug: DebugFlags::default(),
        }
    }
}

impl ArcTextConfig {
    /// Convenience constructor covering the common fields.
    pub fn new(
        font: FontSpec,
        text: impl Into<String>,
        radius: f32,
        arc_size: f32,
        color: Color,
    ) -> Result<Self, LayoutError> {
        validate_font_size(font.size)?;
        let config = Self {
            font,
            text: text.into(),
            radius: validate_radius(radius)?,
            color,
            arc_size,
            ..Default::default()
        };
        Ok(config)
    }

    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded arc text config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        validate_radius(self.radius)?;
        validate_font_size(self.font.size)?;
        Ok(())
    }

    /// Arc size after clamping, in degrees.
    pub fn effective_arc_size(&self) -> f32 {
        clamp_arc_size(self.arc_size)
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_font(&self, font: FontSpec) -> Self {
        Self {
            font,
            ..self.clone()
        }
    }

    pub fn with_radius(&self, radius: f32) -> Result<Self, LayoutError> {
        Ok(Self {
            radius: validate_radius(radius)?,
            ..self.clone()
        })
    }

    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    pub fn with_arc_size(&self, arc_size: f32) -> Self {
        Self {
            arc_size,
            ..self.clone()
        }
    }

    pub fn with_shift(&self, shift_h: f32, shift_v: f32) -> Self {
        Self {
            shift_h,
            shift_v,
            ..self.clone()
        }
    }

    pub fn with_debug(&self, debug: DebugFlags) -> Self {
        Self {
            debug,
            ..self.clone()
        }
    }

    pub fn styled_text(&self) -> StyledText<'_> {
        StyledText {
            text: &self.text,
            font: &self.font,
            color: self.color,
        }
    }

    pub fn layout_key(&self) -> LayoutKey {
        LayoutKey {
            text: self.text.clone(),
            font: self.font.clone(),
            radius: self.radius.to_bits(),
            arc_size: self.arc_size.to_bits(),
            shift_h: self.shift_h.to_bits(),
            shift_v: self.shift_v.to_bits(),
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
