use std::sync::atomic::{AtomicU64, Ordering};

use euclid::default::{Size2D, Vector2D};

use crate::error::{Result, TextError};

/// Identity tag of a loaded face.
///
/// Tags are unique per load: two faces parsed from the same bytes get
/// different tags, while clones of one face share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceId(u64);

impl FaceId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A face bound to a concrete nominal size in device pixels.
///
/// The handle does not own the face. It only remembers which face it was
/// requested from, and every query made with it is checked against that.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontFaceSize {
    face: FaceId,
    nominal_size: Size2D<u32>,
}

impl FontFaceSize {
    pub(crate) fn new(face: FaceId, nominal_size: Size2D<u32>) -> Self {
        Self { face, nominal_size }
    }

    /// The face this size was requested from.
    pub fn face(&self) -> FaceId {
        self.face
    }

    pub fn nominal_size(&self) -> Size2D<u32> {
        self.nominal_size
    }
}

/// Metrics of one glyph at a given size. **Y-axis goes down**.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    /// Distance to the next pen position.
    pub advance: f32,
    /// Offset from the pen position on the baseline to the top-left of the ink.
    pub bearing: Vector2D<f32>,
    /// Size of the ink box.
    pub size: Size2D<f32>,
}

/// Face-wide vertical metrics at a given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    /// Usually negative.
    pub descent: f32,
    /// Default distance between two consecutive baselines.
    pub line_height: f32,
}

/// Source of glyph and line metrics used by the layout engine.
pub trait FontMetrics {
    fn face_id(&self) -> FaceId;

    /// Resolves the glyph used to draw `character`.
    fn lookup_glyph_index(&self, character: char) -> Result<u16>;

    fn glyph_metrics(&self, glyph_index: u16, size: &FontFaceSize) -> Result<GlyphMetrics>;

    fn line_metrics(&self, size: &FontFaceSize) -> Result<LineMetrics>;

    /// Fails with [`TextError::IncompatibleSize`] unless `size` was requested
    /// from this face.
    fn check_size(&self, size: &FontFaceSize) -> Result<()> {
        if size.face() == self.face_id() {
            Ok(())
        } else {
            Err(TextError::IncompatibleSize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_ids_are_unique() {
        let a = FaceId::next();
        let b = FaceId::next();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }

    #[test]
    fn sizes_compare_by_face() {
        let a = FaceId::next();
        let b = FaceId::next();
        let nominal = Size2D::new(10, 10);
        assert_eq!(FontFaceSize::new(a, nominal), FontFaceSize::new(a, nominal));
        assert_ne!(FontFaceSize::new(a, nominal), FontFaceSize::new(b, nominal));
    }
}
