//! Arc text layout — places each character of a string on a circle.
//!
//! Advances are accumulated along the baseline and mapped linearly onto
//! the requested angular span. The run is centred on the top of the
//! circle and reads clockwise (left to right), so glyph tops point away
//! from the centre.
//!
//! ```text
//!            θ₀   θ₁   θ₂
//!          ╭─ A ─ B ─ C ─╮        θ_i = -π/2 - span/2
//!         ╱               ╲             + span · (cum_i + w_i/2) / total
//!        │       ● c       │
//! ```

use std::f32::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point;
use crate::metrics::{FontMetrics, GlyphAdvance};

/// Angle of the top of the circle in screen coordinates.
pub const TOP_ANGLE: f32 = -FRAC_PI_2;

/// Largest accepted arc size, in degrees.
pub const MAX_ARC_DEGREES: f32 = 360.0;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LayoutError {
    #[error("Invalid radius: {0} (must be positive and finite)")]
    InvalidRadius(f32),
    #[error("Invalid font size: {0} (must be positive and finite)")]
    InvalidFontSize(f32),
}

/// Everything the engine needs for one layout pass.
pub struct ArcLayoutRequest<'a, M: FontMetrics + ?Sized> {
    pub text: &'a str,
    pub metrics: &'a M,
    /// Circle radius in pixels.
    pub radius: f32,
    /// Angular span of the whole run, in degrees. Clamped to [0, 360].
    pub arc_size: f32,
    /// Horizontal offset of the circle centre.
    pub shift_h: f32,
    /// Vertical offset of the circle centre.
    pub shift_v: f32,
}

impl<'a, M: FontMetrics + ?Sized> ArcLayoutRequest<'a, M> {
    pub fn new(text: &'a str, metrics: &'a M, radius: f32, arc_size: f32) -> Self {
        Self {
            text,
            metrics,
            radius,
            arc_size,
            shift_h: 0.0,
            shift_v: 0.0,
        }
    }

    pub fn with_shift(mut self, shift_h: f32, shift_v: f32) -> Self {
        self.shift_h = shift_h;
        self.shift_v = shift_v;
        self
    }

    /// Centre of the circle after shifting.
    pub fn center(&self) -> Point {
        arc_center(self.shift_h, self.shift_v)
    }

    /// Span in radians after clamping.
    pub fn span(&self) -> f32 {
        clamp_arc_size(self.arc_size).to_radians()
    }
}

/// One positioned character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphPlacement {
    pub character: char,
    /// Angle of the glyph centre, radians from the +x axis.
    pub angle: f32,
    /// Glyph centre on the baseline circle.
    pub position: Point,
    /// Baseline direction, always `angle + π/2`.
    pub rotation: f32,
    /// Advance used for this glyph.
    pub advance: f32,
    /// Fallback-font glyph or zero-width placeholder for missing metrics.
    pub substituted: bool,
}

/// Clamp an arc size in degrees to [0, 360]. NaN maps to 0.
pub fn clamp_arc_size(degrees: f32) -> f32 {
    if degrees.is_nan() {
        0.0
    } else {
        degrees.clamp(0.0, MAX_ARC_DEGREES)
    }
}

pub fn validate_radius(radius: f32) -> Result<f32, LayoutError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(LayoutError::InvalidRadius(radius))
    }
}

pub fn validate_font_size(size: f32) -> Result<f32, LayoutError> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(LayoutError::InvalidFontSize(size))
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Circle centre for the given shifts. Non-finite shifts count as 0.
pub fn arc_center(shift_h: f32, shift_v: f32) -> Point {
    Point::new(finite_or_zero(shift_h), finite_or_zero(shift_v))
}

/// Lay out `request.text` along the arc.
///
/// Pure: identical requests give bit-identical output. Characters the
/// metrics provider does not know become zero-width substituted
/// placeholders; if it knows none of them the result is empty.
pub fn layout<M: FontMetrics + ?Sized>(
    request: &ArcLayoutRequest<'_, M>,
) -> Result<Vec<GlyphPlacement>, LayoutError> {
    let radius = validate_radius(request.radius)?;
    if request.text.is_empty() {
        return Ok(Vec::new());
    }

    let mut known = 0usize;
    let advances: Vec<(char, GlyphAdvance)> = request
        .text
        .chars()
        .enumerate()
        .map(|(index, ch)| match request.metrics.advance_at(index, ch) {
            Some(adv) => {
                known += 1;
                let width = if adv.width.is_finite() { adv.width.max(0.0) } else { 0.0 };
                (ch, GlyphAdvance { width, ..adv })
            }
            None => (ch, GlyphAdvance::substituted(0.0)),
        })
        .collect();

    if known == 0 {
        log::debug!("arc layout: no metrics for any of {} chars", advances.len());
        return Ok(Vec::new());
    }

    let total: f32 = advances.iter().map(|(_, a)| a.width).sum();
    let span = request.span().min(TAU);
    let start = TOP_ANGLE - span / 2.0;
    let center = request.center();

    let mut cum = 0.0f32;
    let placements = advances
        .into_iter()
        .map(|(character, adv)| {
            let fraction = if total > 0.0 {
                (cum + adv.width / 2.0) / total
            } else {
                0.5
            };
            cum += adv.width;
            let angle = start + span * fraction;
            GlyphPlacement {
                character,
                angle,
                position: Point::on_circle(center, radius, angle),
                rotation: angle + FRAC_PI_2,
                advance: adv.width,
                substituted: adv.substituted,
            }
        })
        .collect::<Vec<_>>();

    log::trace!(
        "arc layout: {} glyphs, span {:.3} rad, radius {}",
        placements.len(),
        span,
        radius
    );
    Ok(placements)
}

// ── Stateful engine ─────────────────────────────────────────────────

/// Key identifying a layout pass; equal keys give equal placements for
/// the same metrics provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestKey {
    text: String,
    radius: u32,
    arc_size: u32,
    shift_h: u32,
    shift_v: u32,
}

impl RequestKey {
    pub fn new<M: FontMetrics + ?Sized>(request: &ArcLayoutRequest<'_, M>) -> Self {
        Self {
            text: request.text.to_owned(),
            radius: request.radius.to_bits(),
            arc_size: request.arc_size.to_bits(),
            shift_h: request.shift_h.to_bits(),
            shift_v: request.shift_v.to_bits(),
        }
    }
}

/// Layout engine that remembers the last pass.
///
/// Callers that redraw every frame with unchanged inputs get the cached
/// placements back. The cache assumes the metrics provider does not
/// change between calls; call [`ArcLayoutEngine::invalidate`] when it
/// does (e.g. after a font change).
#[derive(Default)]
pub struct ArcLayoutEngine {
    last: Option<(RequestKey, Vec<GlyphPlacement>)>,
    hits: u64,
    misses: u64,
}

impl ArcLayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout<M: FontMetrics + ?Sized>(
        &mut self,
        request: &ArcLayoutRequest<'_, M>,
    ) -> Result<&[GlyphPlacement], LayoutError> {
        let key = RequestKey::new(request);
        let fresh = match &self.last {
            Some((last_key, _)) => *last_key != key,
            None => true,
        };
        if fresh {
            let placements = layout(request)?;
            self.misses += 1;
            self.last = Some((key, placements));
        } else {
            self.hits += 1;
        }
        Ok(self
            .last
            .as_ref()
            .map(|(_, p)| p.as_slice())
            .unwrap_or_default())
    }

    /// Drop the cached pass.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

// ===================================================================
// Tests
// ===================================================================
