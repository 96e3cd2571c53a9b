//! Debug overlay geometry for the three [`DebugFlags`].
//!
//! Produces shapes only; stroking and filling them belongs to whatever
//! renderer consumes the frame.

use serde::{Deserialize, Serialize};

use crate::config::{ArcTextConfig, DebugFlags};
use crate::geometry::{Color, Point, Rect};
use crate::layout::{arc_center, clamp_arc_size, GlyphPlacement, TOP_ANGLE};
use crate::metrics::LineMetrics;

/// Opacity multiplier for substituted glyphs when dimming is on.
pub const SUBSTITUTED_ALPHA: f32 = 0.5;

/// Which line-metric a circle traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    Baseline,
    Ascent,
    Descent,
}

/// A circle centred on the arc centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricCircle {
    pub kind: MetricKind,
    pub center: Point,
    pub radius: f32,
}

/// Rotated glyph box, corners in drawing order (baseline-left,
/// baseline-right, top-right, top-left with descent applied).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphBox {
    pub corners: [Point; 4],
}

impl GlyphBox {
    pub fn bounds(&self) -> Rect {
        Rect::bounding(self.corners)
    }
}

/// Everything the debug flags ask to draw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub glyph_boxes: Vec<GlyphBox>,
    pub metric_circles: Vec<MetricCircle>,
    /// Start and end of the arc span on the baseline circle.
    pub span_endpoints: Option<(Point, Point)>,
    /// Fill color per placement, same order as the placements.
    pub glyph_colors: Vec<Color>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.glyph_boxes.is_empty()
            && self.metric_circles.is_empty()
            && self.span_endpoints.is_none()
    }
}

/// Box for one glyph: `advance` wide, from `descent` below the baseline
/// to `ascent` above it, following the glyph's rotation.
pub fn glyph_box(placement: &GlyphPlacement, line: &LineMetrics) -> GlyphBox {
    let half = placement.advance / 2.0;
    // In glyph space +x is along the baseline and -y points away from
    // the centre (the glyph's "up").
    let local = [
        Point::new(-half, line.descent),
        Point::new(half, line.descent),
        Point::new(half, -line.ascent),
        Point::new(-half, -line.ascent),
    ];
    let corners = local.map(|p| {
        let r = p.rotated(placement.rotation);
        placement.position.offset(r.x, r.y)
    });
    GlyphBox { corners }
}

/// Build the overlay requested by `config.debug`.
///
/// `glyph_colors` is always filled so renderers can use it
/// unconditionally; it only differs from the base color when
/// substituted glyphs are dimmed.
pub fn build_overlay(
    placements: &[GlyphPlacement],
    line: &LineMetrics,
    config: &ArcTextConfig,
) -> Overlay {
    let DebugFlags {
        shows_glyph_bounds,
        shows_line_metrics,
        dims_substituted_glyphs,
    } = config.debug;

    let glyph_boxes = if shows_glyph_bounds {
        placements.iter().map(|p| glyph_box(p, line)).collect()
    } else {
        Vec::new()
    };

    let center = arc_center(config.shift_h, config.shift_v);
    let (metric_circles, span_endpoints) = if shows_line_metrics {
        let circles = vec![
            MetricCircle {
                kind: MetricKind::Baseline,
                center,
                radius: config.radius,
            },
            MetricCircle {
                kind: MetricKind::Ascent,
                center,
                radius: config.radius + line.ascent,
            },
            MetricCircle {
                kind: MetricKind::Descent,
                center,
                radius: (config.radius - line.descent).max(0.0),
            },
        ];
        let span = clamp_arc_size(config.arc_size).to_radians();
        let start = Point::on_circle(center, config.radius, TOP_ANGLE - span / 2.0);
        let end = Point::on_circle(center, config.radius, TOP_ANGLE + span / 2.0);
        (circles, Some((start, end)))
    } else {
        (Vec::new(), None)
    };

    let glyph_colors = placements
        .iter()
        .map(|p| {
            if dims_substituted_glyphs && p.substituted {
                config.color.faded(SUBSTITUTED_ALPHA)
            } else {
                config.color
            }
        })
        .collect();

    Overlay {
        glyph_boxes,
        metric_circles,
        span_endpoints,
        glyph_colors,
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout, ArcLayoutRequest};
    use crate::metrics::GlyphAdvance;
    use std::collections::HashMap;

    fn placements(config: &ArcTextConfig) -> Vec<GlyphPlacement> {
        let mut table: HashMap<char, GlyphAdvance> = HashMap::new();
        table.insert('A', GlyphAdvance::new(10.0));
        table.insert('B', GlyphAdvance::new(10.0));
        table.insert('★', GlyphAdvance::substituted(14.0));
        let req = ArcLayoutRequest::new(&config.text, &table, config.radius, config.arc_size)
            .with_shift(config.shift_h, config.shift_v);
        layout(&req).unwrap()
    }

    #[test]
    fn test_no_flags_no_shapes() {
        let cfg = ArcTextConfig::default().with_text("AB");
        let p = placements(&cfg);
        let overlay = build_overlay(&p, &LineMetrics::default(), &cfg);
        assert!(overlay.is_empty());
        assert_eq!(overlay.glyph_colors, vec![cfg.color; 2]);
    }

    #[test]
    fn test_glyph_bounds_one_box_per_glyph() {
        let cfg = ArcTextConfig::default().with_text("A★B").with_debug(DebugFlags {
            shows_glyph_bounds: true,
            ..Default::default()
        });
        let p = placements(&cfg);
        let line = LineMetrics::estimate(20.0);
        let overlay = build_overlay(&p, &line, &cfg);
        assert_eq!(overlay.glyph_boxes.len(), 3);
        assert!(overlay.metric_circles.is_empty());

        // Baseline edge has the glyph's advance as its length.
        let b = overlay.glyph_boxes[1];
        assert!((b.corners[0].distance_to(b.corners[1]) - 14.0).abs() < 1e-3);
        // Vertical edge spans ascent + descent.
        assert!((b.corners[1].distance_to(b.corners[2]) - line.height()).abs() < 1e-3);
    }

    #[test]
    fn test_glyph_box_top_points_outward() {
        let cfg = ArcTextConfig::default().with_text("A");
        let p = placements(&cfg);
        let b = glyph_box(&p[0], &LineMetrics::estimate(10.0));
        let center = Point::new(0.0, 0.0);
        // Top corners sit further from the centre than baseline corners.
        assert!(b.corners[2].distance_to(center) > b.corners[1].distance_to(center));
        assert!(b.corners[3].distance_to(center) > b.corners[0].distance_to(center));
    }

    #[test]
    fn test_line_metrics_circles() {
        let cfg = ArcTextConfig::default()
            .with_text("AB")
            .with_shift(5.0, 6.0)
            .with_debug(DebugFlags {
                shows_line_metrics: true,
                ..Default::default()
            });
        let p = placements(&cfg);
        let line = LineMetrics::estimate(20.0);
        let overlay = build_overlay(&p, &line, &cfg);
        assert_eq!(overlay.metric_circles.len(), 3);
        let ascent = overlay
            .metric_circles
            .iter()
            .find(|c| c.kind == MetricKind::Ascent)
            .unwrap();
        assert_eq!(ascent.radius, cfg.radius + line.ascent);
        assert_eq!(ascent.center, Point::new(5.0, 6.0));

        let (start, end) = overlay.span_endpoints.unwrap();
        // 90° span centred on the top: endpoints mirror around x = 5.
        assert!(((start.x - 5.0) + (end.x - 5.0)).abs() < 1e-3);
        assert!((start.y - end.y).abs() < 1e-3);
        assert!(start.x < end.x);
    }

    #[test]
    fn test_non_finite_shift_matches_glyph_center() {
        let cfg = ArcTextConfig::default()
            .with_text("AB")
            .with_shift(f32::NAN, f32::INFINITY)
            .with_debug(DebugFlags {
                shows_line_metrics: true,
                ..Default::default()
            });
        let p = placements(&cfg);
        let overlay = build_overlay(&p, &LineMetrics::default(), &cfg);
        let origin = Point::new(0.0, 0.0);
        for circle in &overlay.metric_circles {
            assert_eq!(circle.center, origin);
        }
        let (start, end) = overlay.span_endpoints.unwrap();
        assert!(start.x.is_finite() && start.y.is_finite());
        assert!(end.x.is_finite() && end.y.is_finite());
        // Glyphs and circles share the same centre.
        for g in &p {
            assert!((g.position.distance_to(origin) - cfg.radius).abs() < 1e-3);
        }
    }

    #[test]
    fn test_dim_substituted() {
        let base = Color::rgba(0.2, 0.4, 0.6, 1.0);
        let cfg = ArcTextConfig::default()
            .with_text("A★B")
            .with_color(base)
            .with_debug(DebugFlags {
                dims_substituted_glyphs: true,
                ..Default::default()
            });
        let p = placements(&cfg);
        let overlay = build_overlay(&p, &LineMetrics::default(), &cfg);
        assert_eq!(overlay.glyph_colors[0], base);
        assert_eq!(overlay.glyph_colors[1].alpha(), SUBSTITUTED_ALPHA);
        assert_eq!(overlay.glyph_colors[2], base);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_substituted_not_dimmed_without_flag() {
        let cfg = ArcTextConfig::default().with_text("★");
        let p = placements(&cfg);
        let overlay = build_overlay(&p, &LineMetrics::default(), &cfg);
        assert_eq!(overlay.glyph_colors[0], cfg.color);
    }
}
