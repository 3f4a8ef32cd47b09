//! # Kumihan
//!
//! Text layout for rendering pipelines: turns a run of Unicode text into lines of
//! positioned glyphs with bounding boxes at the text, line and glyph level.
//!
//! ## Overview
//!
//! The engine is [`text::layout_text`]. It splits text with a pluggable
//! [`BreakText`] strategy, measures glyphs through a [`FontMetrics`] provider,
//! packs chunks greedily into lines and aligns the block around an origin.
//! [`FontFace`] is the `fontdue`-backed provider that also rasterizes glyphs, and
//! [`FontSystem`] finds faces among loaded or system fonts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kumihan::{FontFace, text::TextLayoutConfig};
//!
//! # fn main() -> kumihan::Result<()> {
//! let face = FontFace::from_file("DejaVuSans.ttf")?;
//! let size = face.request_pixel_size(None, Some(16))?;
//!
//! let config = TextLayoutConfig {
//!     max_line_size: Some(200.0),
//!     ..Default::default()
//! };
//! if let Some(layout) = face.layout_text("hello world", &size, &config)? {
//!     for glyph in layout.glyphs() {
//!         println!("{:?} at {:?}", glyph.character, glyph.bounding_box);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! *   **Pluggable breaking**: Unicode line breaking by default, no breaking, or your own strategy.
//! *   **Alignment**: Begin, center or end on both axes, anchored at any origin.
//! *   **Font Management**: Loading of system fonts and custom font files.
//! *   **Thread Safety**: Faces are immutable and can be shared between threads.

pub mod break_text;
pub mod error;
pub mod font;
pub mod font_face;
pub mod font_storage;
pub mod font_system;
pub mod metrics;
pub mod text;
pub mod unicode;

// common re-exports
pub use break_text::{
    BreakText, BreakTextChunk, IcuLineBreak, NeverBreak, break_text_icu_line, break_text_never,
};
pub use error::{Result, TextError};
pub use font::Font;
pub use font_face::{FontFace, GlyphRef, RenderedGlyph, RenderedGlyphFormat};
pub use font_storage::FontStorage;
pub use font_system::FontSystem;
pub use metrics::{FaceId, FontFaceSize, FontMetrics, GlyphMetrics, LineMetrics};
pub use unicode::{
    IsCharacterRendered, NormallyRendered, character_is_normally_rendered, is_normally_rendered,
};

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use parking_lot;
