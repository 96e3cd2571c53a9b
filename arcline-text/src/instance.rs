//! GPU instance data for arc text frames.
//!
//! `GlyphInstance` derives `bytemuck::Pod` + `Zeroable` so a frame can be
//! uploaded to an instance buffer without copying field by field.

use bytemuck::{Pod, Zeroable};

use crate::view::ArcTextFrame;

/// Per-glyph instance record.
///
/// 32 bytes per instance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlyphInstance {
    /// Glyph centre on the baseline, view-local pixels.
    pub position: [f32; 2],
    /// Baseline direction in radians.
    pub rotation: f32,
    /// Advance width in pixels.
    pub advance: f32,
    /// RGBA color, already dimmed for substituted glyphs if requested.
    pub color: [f32; 4],
}

impl GlyphInstance {
    /// Build one instance per placement of `frame`.
    pub fn from_frame(frame: &ArcTextFrame) -> Vec<GlyphInstance> {
        frame
            .placements
            .iter()
            .enumerate()
            .map(|(i, p)| GlyphInstance {
                position: [p.position.x, p.position.y],
                rotation: p.rotation,
                advance: p.advance,
                color: frame
                    .overlay
                    .glyph_colors
                    .get(i)
                    .copied()
                    .unwrap_or(frame.color)
                    .0,
            })
            .collect()
    }
}

/// Raw bytes of an instance slice, ready for a buffer write.
pub fn as_bytes(instances: &[GlyphInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arcline_core::{
        build_overlay, layout, ArcLayoutRequest, ArcTextConfig, Color, DebugFlags, GlyphAdvance,
        LineMetrics,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    fn frame(config: &ArcTextConfig) -> ArcTextFrame {
        let mut table: HashMap<char, GlyphAdvance> = HashMap::new();
        table.insert('a', GlyphAdvance::new(8.0));
        table.insert('ß', GlyphAdvance::substituted(9.0));
        let req = ArcLayoutRequest::new(&config.text, &table, config.radius, config.arc_size);
        let placements = layout(&req).unwrap();
        let line = LineMetrics::default();
        let overlay = build_overlay(&placements, &line, config);
        ArcTextFrame {
            placements: Arc::from(placements),
            line,
            color: config.color,
            overlay,
            ink_bounds: Arc::from([]),
        }
    }

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 32);
    }

    #[test]
    fn test_from_frame() {
        let config = ArcTextConfig::default().with_text("aßa");
        let f = frame(&config);
        let instances = GlyphInstance::from_frame(&f);
        assert_eq!(instances.len(), 3);
        for (inst, p) in instances.iter().zip(f.placements.iter()) {
            assert_eq!(inst.position, [p.position.x, p.position.y]);
            assert_eq!(inst.rotation, p.rotation);
            assert_eq!(inst.color, config.color.0);
        }
        assert_eq!(as_bytes(&instances).len(), 3 * 32);
    }

    #[test]
    fn test_dimmed_colors_carried() {
        let config = ArcTextConfig::default()
            .with_text("aß")
            .with_color(Color::WHITE)
            .with_debug(DebugFlags {
                dims_substituted_glyphs: true,
                ..Default::default()
            });
        let instances = GlyphInstance::from_frame(&frame(&config));
        assert_eq!(instances[0].color[3], 1.0);
        assert_eq!(instances[1].color[3], 0.5);
    }
}
