use std::fmt;

use crate::{
    error::Result,
    font_face::{FontFace, GlyphRef, RenderedGlyph, RenderedGlyphFormat},
    metrics::{FontFaceSize, FontMetrics},
    text::{TextLayout, TextLayoutConfig},
};

/// A face bound to one size.
///
/// Convenience handle for callers that always use the same size: every
/// operation forwards to the [`FontFace`] with the stored size.
#[derive(Clone, Debug)]
pub struct Font {
    face: FontFace,
    size: FontFaceSize,
}

impl Font {
    /// Fails with [`crate::TextError::IncompatibleSize`] when `size` was
    /// requested from another face.
    pub fn new(face: FontFace, size: FontFaceSize) -> Result<Self> {
        face.check_size(&size)?;
        Ok(Self { face, size })
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    pub fn size(&self) -> &FontFaceSize {
        &self.size
    }

    pub fn glyph_index(&self, character: &str) -> Result<u16> {
        self.face.glyph_index(character)
    }

    pub fn render_glyph<'a>(
        &self,
        glyph: impl Into<GlyphRef<'a>>,
        format: RenderedGlyphFormat,
    ) -> Result<RenderedGlyph> {
        self.face.render_glyph(glyph, &self.size, format)
    }

    pub fn layout_text(
        &self,
        text: &str,
        config: &TextLayoutConfig<'_>,
    ) -> Result<Option<TextLayout>> {
        self.face.layout_text(text, &self.size, config)
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nominal_size = self.size.nominal_size();
        write!(
            f,
            "{} of {}x{}",
            self.face, nominal_size.width, nominal_size.height
        )
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TextError;

    const DEJAVU_SANS: &[u8] = include_bytes!("../resources/DejaVuSans.ttf");

    fn font() -> Font {
        let face = FontFace::from_bytes(DEJAVU_SANS, 0).unwrap();
        let size = face.request_pixel_size(Some(12), Some(14)).unwrap();
        face.font(size).unwrap()
    }

    #[test]
    fn binds_face_and_size() {
        let font = font();
        assert_eq!(font.size().face(), font.face().id());
        assert_eq!(font.to_string(), "DejaVuSans of 12x14");
    }

    #[test]
    fn rejects_foreign_size() {
        let face = FontFace::from_bytes(DEJAVU_SANS, 0).unwrap();
        let other = FontFace::from_bytes(DEJAVU_SANS, 0).unwrap();
        let size = other.request_pixel_size(None, Some(10)).unwrap();
        assert!(matches!(
            Font::new(face, size),
            Err(TextError::IncompatibleSize)
        ));
    }

    #[test]
    fn forwards_to_face() {
        let font = font();
        let face = font.face();
        let size = font.size();

        assert_eq!(font.glyph_index("a").unwrap(), face.glyph_index("a").unwrap());
        assert!(matches!(
            font.glyph_index("ab"),
            Err(TextError::InvalidInput { count: 2 })
        ));
        assert_eq!(
            font.render_glyph("a", RenderedGlyphFormat::Alpha).unwrap(),
            face.render_glyph("a", size, RenderedGlyphFormat::Alpha).unwrap()
        );

        let config = TextLayoutConfig::default();
        assert_eq!(
            font.layout_text("bcdef", &config).unwrap(),
            face.layout_text("bcdef", size, &config).unwrap()
        );
    }
}
