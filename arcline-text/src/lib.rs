//! # arcline-text
//!
//! Font-backed side of arcline. Measures text with `cosmic-text`, feeds
//! the advances into the arc layout engine, and caches the result per
//! view.
//!
//! ## Architecture
//!
//! ```text
//! TextEngine (cosmic-text FontSystem + SwashCache)
//!     │
//!     ▼
//! measure(str, font) ──► ShapedMetrics (FontMetrics)
//!     │
//!     ▼
//! ArcTextView ──► ArcTextFrame ──► GlyphInstance (GPU upload)
//! ```
//!
//! - **`engine`** — shaping, fallback detection, ink bounds.
//! - **`view`** — config ownership and LRU layout cache.
//! - **`instance`** — `bytemuck` instance records for renderers.

pub mod engine;
pub mod instance;
pub mod view;

// Re-exports for ergonomic use.
pub use engine::{ShapedMetrics, TextEngine};
pub use instance::GlyphInstance;
pub use view::{ArcTextFrame, ArcTextView, TextError};
