//! Arc text view — owns a configuration and caches its layout.
//!
//! The configuration is an immutable [`ArcTextConfig`]; changing any
//! property means handing the view a new value. Geometry is cached by
//! [`LayoutKey`], so color and debug-flag changes reuse the previous
//! placements and only rebuild the cheap overlay.
//!
//! ```text
//! set_config(cfg) ──► frame(engine)
//!                        │ key hit?  ── yes ──► cached placements
//!                        │  no
//!                        ▼
//!                 TextEngine::measure ──► layout() ──► LRU insert
//!                        │
//!                        ▼
//!                 build_overlay(cfg.debug) ──► ArcTextFrame
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use thiserror::Error;

use arcline_core::{
    build_overlay, layout, ArcLayoutRequest, ArcTextConfig, Color, GlyphPlacement, LayoutError,
    LayoutKey, LineMetrics, Overlay, Rect, StyledText,
};

use crate::engine::TextEngine;

/// Number of distinct layouts kept per view.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Error, Debug)]
pub enum TextError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Geometry shared between frames with the same layout key.
#[derive(Debug)]
struct CachedLayout {
    placements: Vec<GlyphPlacement>,
    line: LineMetrics,
    /// Rasterized once, the first time glyph bounds are shown.
    ink_bounds: Option<Arc<[Option<Rect>]>>,
}

/// Everything a renderer needs to draw the arc text once.
#[derive(Clone, Debug)]
pub struct ArcTextFrame {
    pub placements: Arc<[GlyphPlacement]>,
    pub line: LineMetrics,
    pub color: Color,
    pub overlay: Overlay,
    /// Glyph-local ink rectangles, only filled when glyph bounds are shown.
    pub ink_bounds: Arc<[Option<Rect>]>,
}

/// Arc text component with layout caching.
pub struct ArcTextView {
    config: ArcTextConfig,
    cache: LruCache<LayoutKey, Arc<CachedLayout>>,
    placements: Option<(LayoutKey, Arc<[GlyphPlacement]>)>,
    layouts_computed: u64,
    ink_passes: u64,
}

impl ArcTextView {
    pub fn new(config: ArcTextConfig) -> Self {
        Self::with_capacity(config, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(config: ArcTextConfig, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            cache: LruCache::new(capacity),
            placements: None,
            layouts_computed: 0,
            ink_passes: 0,
        }
    }

    pub fn config(&self) -> &ArcTextConfig {
        &self.config
    }

    /// Replace the configuration. Returns `true` if glyph geometry has to
    /// be recomputed (as opposed to a color or debug-flag change).
    pub fn set_config(&mut self, config: ArcTextConfig) -> bool {
        let relayout = config.layout_key() != self.config.layout_key();
        if relayout {
            log::debug!("ArcTextView: geometry invalidated");
        }
        self.config = config;
        relayout
    }

    /// The text with its font and color attributes.
    pub fn attributed_string(&self) -> StyledText<'_> {
        self.config.styled_text()
    }

    /// Number of layout passes actually run (cache misses).
    pub fn layouts_computed(&self) -> u64 {
        self.layouts_computed
    }

    /// Number of times glyph ink bounds were rasterized.
    pub fn ink_passes(&self) -> u64 {
        self.ink_passes
    }

    /// Drop all cached layouts, e.g. after fonts were added to the engine.
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.placements = None;
    }

    fn cached_layout(&mut self, engine: &mut TextEngine) -> Result<Arc<CachedLayout>, TextError> {
        let key = self.config.layout_key();
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Arc::clone(hit));
        }

        let cfg = &self.config;
        let metrics = engine.measure(&cfg.text, &cfg.font);
        let request = ArcLayoutRequest::new(&cfg.text, &metrics, cfg.radius, cfg.arc_size)
            .with_shift(cfg.shift_h, cfg.shift_v);
        let placements = layout(&request)?;
        self.layouts_computed += 1;
        log::debug!(
            "ArcTextView: laid out {} glyphs (pass #{})",
            placements.len(),
            self.layouts_computed
        );

        let entry = Arc::new(CachedLayout {
            placements,
            line: metrics.line,
            ink_bounds: None,
        });
        self.cache.put(key, Arc::clone(&entry));
        Ok(entry)
    }

    /// Compute (or reuse) the frame for the current configuration.
    pub fn frame(&mut self, engine: &mut TextEngine) -> Result<ArcTextFrame, TextError> {
        self.config.validate()?;
        let mut cached = self.cached_layout(engine)?;
        let key = self.config.layout_key();
        let placements = match &self.placements {
            Some((k, p)) if *k == key => Arc::clone(p),
            _ => {
                let p: Arc<[GlyphPlacement]> = Arc::from(cached.placements.as_slice());
                self.placements = Some((key.clone(), Arc::clone(&p)));
                p
            }
        };

        let overlay = build_overlay(&placements, &cached.line, &self.config);
        let ink_bounds = if self.config.debug.shows_glyph_bounds {
            match cached.ink_bounds.clone() {
                Some(ink) => ink,
                None => {
                    let ink: Arc<[Option<Rect>]> =
                        engine.ink_bounds(&self.config.text, &self.config.font).into();
                    self.ink_passes += 1;
                    cached = Arc::new(CachedLayout {
                        placements: cached.placements.clone(),
                        line: cached.line,
                        ink_bounds: Some(Arc::clone(&ink)),
                    });
                    self.cache.put(key, Arc::clone(&cached));
                    ink
                }
            }
        } else {
            Arc::from([])
        };

        Ok(ArcTextFrame {
            placements,
            line: cached.line,
            color: self.config.color,
            overlay,
            ink_bounds,
        })
    }
}

// ===================================================================
// Tests
// ===================================================================
