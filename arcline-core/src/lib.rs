//! # arcline-core
//!
//! Geometry core for drawing text along a circular arc. Everything here
//! is pure computation; fonts and rendering live in `arcline-text`.
//!
//! ## Architecture
//!
//! ```text
//! ArcTextConfig ──► ArcLayoutRequest + FontMetrics
//!                          │
//!                          ▼
//!                   layout() ──► Vec<GlyphPlacement>
//!                          │
//!                          ▼
//!                 build_overlay() ──► Overlay (debug shapes)
//! ```
//!
//! - **`geometry`** — points, rects, colors (screen coordinates).
//! - **`metrics`** — the `FontMetrics` seam and simple providers.
//! - **`layout`** — the arc layout pass and a caching engine.
//! - **`config`** — immutable, JSON-loadable view configuration.
//! - **`overlay`** — debug shapes for glyph bounds and line metrics.

pub mod config;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod overlay;

// Re-exports for ergonomic use.
pub use config::{ArcTextConfig, ConfigError, DebugFlags, FontSpec, LayoutKey, StyledText};
pub use geometry::{Color, Point, Rect};
pub use layout::{layout, ArcLayoutEngine, ArcLayoutRequest, GlyphPlacement, LayoutError};
pub use metrics::{FixedAdvance, FontMetrics, GlyphAdvance, LineMetrics};
pub use overlay::{build_overlay, GlyphBox, MetricCircle, MetricKind, Overlay};
