use std::{fmt, path::Path, sync::Arc};

use euclid::default::{Size2D, Vector2D};

use crate::{
    error::{Result, TextError},
    font::Font,
    metrics::{FaceId, FontFaceSize, FontMetrics, GlyphMetrics, LineMetrics},
    text::{TextLayout, TextLayoutConfig, layout_text},
    unicode::single_character,
};

const POINTS_PER_INCH: f32 = 72.0;

/// A parsed font face.
///
/// Cloning is cheap and clones share the same identity, so a
/// [`FontFaceSize`] requested from one clone is valid for all of them. The
/// face is read-only and can be used from several threads at once.
#[derive(Clone)]
pub struct FontFace {
    inner: Arc<FaceData>,
}

struct FaceData {
    id: FaceId,
    name: String,
    font: fontdue::Font,
}

/// Pixel layout of a [`RenderedGlyph`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderedGlyphFormat {
    /// One coverage byte per pixel.
    #[default]
    Alpha,
    /// Three coverage bytes (R, G, B) per pixel for horizontal subpixel
    /// rendering.
    Lcd,
}

impl RenderedGlyphFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Alpha => 1,
            Self::Lcd => 3,
        }
    }
}

/// Rasterized glyph bitmap, row-major with the origin at the top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedGlyph {
    pub data: Vec<u8>,
    pub size: Size2D<u32>,
    /// Offset from the pen position on the baseline to the top-left pixel.
    pub bearing: Vector2D<f32>,
    pub format: RenderedGlyphFormat,
}

/// Glyph selector accepted by [`FontFace::render_glyph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphRef<'a> {
    /// Must hold exactly one character.
    Text(&'a str),
    Character(char),
    Index(u16),
}

impl<'a> From<&'a str> for GlyphRef<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl From<char> for GlyphRef<'_> {
    fn from(character: char) -> Self {
        Self::Character(character)
    }
}

impl From<u16> for GlyphRef<'_> {
    fn from(index: u16) -> Self {
        Self::Index(index)
    }
}

pub(crate) fn font_settings(collection_index: u32) -> fontdue::FontSettings {
    fontdue::FontSettings {
        collection_index,
        scale: 40.0,
        load_substitutions: true,
    }
}

/// Loading.
impl FontFace {
    /// Parses the face at `collection_index` of a font file held in memory.
    pub fn from_bytes(data: impl Into<Vec<u8>>, collection_index: u32) -> Result<Self> {
        let data: Vec<u8> = data.into();
        let font = fontdue::Font::from_bytes(data.as_slice(), font_settings(collection_index))
            .map_err(TextError::FontParse)?;

        let mut font_db = fontdb::Database::new();
        font_db.load_font_data(data);
        let name = font_db
            .faces()
            .find(|info| info.index == collection_index)
            .map(|info| info.post_script_name.clone())
            .unwrap_or_else(|| {
                log::warn!("font face {collection_index} has no readable name table");
                String::new()
            });

        Ok(Self::from_font(font, name))
    }

    /// Reads and parses the first face of a font file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data, 0)
    }

    pub(crate) fn from_font(font: fontdue::Font, name: String) -> Self {
        Self {
            inner: Arc::new(FaceData {
                id: FaceId::next(),
                name,
                font,
            }),
        }
    }
}

/// Queries.
impl FontFace {
    pub fn id(&self) -> FaceId {
        self.inner.id
    }

    /// PostScript name of the face.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn glyph_count(&self) -> u16 {
        self.inner.font.glyph_count()
    }

    /// Resolves the glyph index of a single character.
    ///
    /// Characters the face does not map resolve to `.notdef` (index 0).
    pub fn glyph_index(&self, character: &str) -> Result<u16> {
        self.lookup_glyph_index(single_character(character)?)
    }

    /// Requests a size in device pixels. A missing dimension copies the
    /// other one.
    pub fn request_pixel_size(&self, width: Option<u32>, height: Option<u32>) -> Result<FontFaceSize> {
        let (width, height) = fill_dimensions(width, height)?;
        Ok(FontFaceSize::new(self.id(), Size2D::new(width, height)))
    }

    /// Requests a size in points, resolved to pixels with `dpi` (72x72 when
    /// `None`). Fractional pixels are truncated.
    ///
    /// Fails with [`TextError::Configuration`] for values that are not finite
    /// and positive.
    pub fn request_point_size(
        &self,
        width: Option<f32>,
        height: Option<f32>,
        dpi: Option<Size2D<u32>>,
    ) -> Result<FontFaceSize> {
        let (width, height) = fill_dimensions(width, height)?;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(TextError::Configuration);
        }
        let dpi = dpi.unwrap_or(Size2D::new(72, 72));
        let nominal_size = Size2D::new(
            (width * (dpi.width as f32 / POINTS_PER_INCH)) as u32,
            (height * (dpi.height as f32 / POINTS_PER_INCH)) as u32,
        );
        Ok(FontFaceSize::new(self.id(), nominal_size))
    }

    /// Sizes of embedded bitmap strikes.
    ///
    /// Always empty: `fontdue` only reads outline glyphs, which scale to any
    /// requested size.
    pub fn fixed_sizes(&self) -> &[Size2D<u32>] {
        &[]
    }

    /// Binds this face to `size`.
    pub fn font(&self, size: FontFaceSize) -> Result<Font> {
        Font::new(self.clone(), size)
    }
}

/// Rendering and layout.
impl FontFace {
    /// Rasterizes one glyph with `fontdue`.
    pub fn render_glyph<'a>(
        &self,
        glyph: impl Into<GlyphRef<'a>>,
        size: &FontFaceSize,
        format: RenderedGlyphFormat,
    ) -> Result<RenderedGlyph> {
        let glyph_index = match glyph.into() {
            GlyphRef::Text(text) => self.glyph_index(text)?,
            GlyphRef::Character(character) => self.lookup_glyph_index(character)?,
            GlyphRef::Index(index) => index,
        };
        self.check_size(size)?;
        self.check_glyph(glyph_index)?;

        let px = pixel_size(size);
        let (metrics, data) = match format {
            RenderedGlyphFormat::Alpha => self.inner.font.rasterize_indexed(glyph_index, px),
            RenderedGlyphFormat::Lcd => self.inner.font.rasterize_indexed_subpixel(glyph_index, px),
        };

        Ok(RenderedGlyph {
            data,
            size: Size2D::new(metrics.width as u32, metrics.height as u32),
            bearing: bearing(&metrics),
            format,
        })
    }

    /// Lays out `text` with this face, see [`layout_text`].
    pub fn layout_text(
        &self,
        text: &str,
        size: &FontFaceSize,
        config: &TextLayoutConfig<'_>,
    ) -> Result<Option<TextLayout>> {
        layout_text(self, text, size, config)
    }

    fn check_glyph(&self, glyph_index: u16) -> Result<()> {
        if glyph_index < self.glyph_count() {
            Ok(())
        } else {
            Err(TextError::GlyphResolution(glyph_index.into()))
        }
    }
}

impl FontMetrics for FontFace {
    fn face_id(&self) -> FaceId {
        self.id()
    }

    fn lookup_glyph_index(&self, character: char) -> Result<u16> {
        let glyph_index = self.inner.font.lookup_glyph_index(character);
        // a malformed cmap can point past the end of the glyph table
        self.check_glyph(glyph_index)?;
        Ok(glyph_index)
    }

    fn glyph_metrics(&self, glyph_index: u16, size: &FontFaceSize) -> Result<GlyphMetrics> {
        self.check_size(size)?;
        self.check_glyph(glyph_index)?;

        let metrics = self.inner.font.metrics_indexed(glyph_index, pixel_size(size));
        Ok(GlyphMetrics {
            advance: metrics.advance_width,
            bearing: bearing(&metrics),
            size: Size2D::new(metrics.width as f32, metrics.height as f32),
        })
    }

    fn line_metrics(&self, size: &FontFaceSize) -> Result<LineMetrics> {
        self.check_size(size)?;

        let px = pixel_size(size);
        match self.inner.font.horizontal_line_metrics(px) {
            Some(metrics) => Ok(LineMetrics {
                ascent: metrics.ascent,
                descent: metrics.descent,
                line_height: metrics.new_line_size,
            }),
            None => {
                log::warn!(
                    "face {:?} has no horizontal line metrics, using the em size",
                    self.name()
                );
                Ok(LineMetrics {
                    ascent: px,
                    descent: 0.0,
                    line_height: px,
                })
            }
        }
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `fontdue` scales isotropically, so the nominal height is the em size.
fn pixel_size(size: &FontFaceSize) -> f32 {
    size.nominal_size().height as f32
}

/// `fontdue` measures the bitmap from its bottom-left corner with the Y-axis
/// going up. Convert to the top-left corner with the Y-axis going down.
fn bearing(metrics: &fontdue::Metrics) -> Vector2D<f32> {
    Vector2D::new(
        metrics.xmin as f32,
        -(metrics.ymin as f32 + metrics.height as f32),
    )
}

fn fill_dimensions<T: Copy>(width: Option<T>, height: Option<T>) -> Result<(T, T)> {
    match (width, height) {
        (Some(width), Some(height)) => Ok((width, height)),
        (Some(width), None) => Ok((width, width)),
        (None, Some(height)) => Ok((height, height)),
        (None, None) => Err(TextError::Configuration),
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::break_text::NeverBreak;

    const DEJAVU_SANS: &[u8] = include_bytes!("../resources/DejaVuSans.ttf");

    fn face() -> FontFace {
        FontFace::from_bytes(DEJAVU_SANS, 0).unwrap()
    }

    #[test]
    fn reads_name() {
        let face = face();
        assert_eq!(face.name(), "DejaVuSans");
        assert_eq!(face.to_string(), "DejaVuSans");
        assert!(face.glyph_count() > 0);
    }

    #[test]
    fn rejects_garbage() {
        let result = FontFace::from_bytes(vec![0u8; 16], 0);
        assert!(matches!(result, Err(TextError::FontParse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FontFace::from_file("resources/does-not-exist.ttf");
        assert!(matches!(result, Err(TextError::Io(_))));
    }

    #[test]
    fn clones_share_identity() {
        let face = face();
        let clone = face.clone();
        assert_eq!(face.id(), clone.id());
        assert_ne!(face.id(), self::face().id());
    }

    #[test]
    fn glyph_index_of_single_characters() {
        let face = face();
        for character in ["a", "z", "A", "Z", "\n", "食", "\u{2028}"] {
            assert!(face.glyph_index(character).is_ok(), "{character:?}");
        }
        assert_ne!(face.glyph_index("a").unwrap(), 0);
        assert_ne!(face.glyph_index("a").unwrap(), face.glyph_index("b").unwrap());
    }

    #[test]
    fn glyph_index_rejects_wrong_length() {
        let face = face();
        for character in ["", "aZ", "食食"] {
            assert!(matches!(
                face.glyph_index(character),
                Err(TextError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn pixel_sizes() {
        let face = face();
        let cases = [
            (Some(10), None, (10, 10)),
            (None, Some(10), (10, 10)),
            (Some(20), Some(25), (20, 25)),
            (Some(25), Some(20), (25, 20)),
        ];
        for (width, height, (w, h)) in cases {
            let size = face.request_pixel_size(width, height).unwrap();
            assert_eq!(size.face(), face.id());
            assert_eq!(size.nominal_size(), Size2D::new(w, h));
        }
        assert!(matches!(
            face.request_pixel_size(None, None),
            Err(TextError::Configuration)
        ));
    }

    #[test]
    fn point_sizes() {
        let face = face();
        let cases = [
            (Some(10.0), None, None, (10, 10)),
            (None, Some(20.0), None, (20, 20)),
            (Some(20.0), Some(25.0), Some(Size2D::new(144, 72)), (40, 25)),
            (None, Some(10.0), Some(Size2D::new(72, 144)), (10, 20)),
            (Some(10.0), None, Some(Size2D::new(96, 96)), (13, 13)),
        ];
        for (width, height, dpi, (w, h)) in cases {
            let size = face.request_point_size(width, height, dpi).unwrap();
            assert_eq!(size.nominal_size(), Size2D::new(w, h));
        }
        assert!(matches!(
            face.request_point_size(None, None, None),
            Err(TextError::Configuration)
        ));
    }

    #[test]
    fn point_sizes_must_be_positive_and_finite() {
        let face = face();
        let invalid = [
            (Some(-12.0), None),
            (None, Some(0.0)),
            (Some(f32::NAN), Some(12.0)),
            (Some(12.0), Some(f32::INFINITY)),
        ];
        for (width, height) in invalid {
            assert!(
                matches!(
                    face.request_point_size(width, height, None),
                    Err(TextError::Configuration)
                ),
                "{width:?} x {height:?}"
            );
        }
    }

    #[test]
    fn outline_faces_have_no_fixed_sizes() {
        assert!(face().fixed_sizes().is_empty());
    }

    #[test]
    fn renders_glyphs_in_every_format() {
        let face = face();
        let size = face.request_pixel_size(None, Some(10)).unwrap();
        for character in ["a", "Z", "1"] {
            let index = face.glyph_index(character).unwrap();
            for format in [RenderedGlyphFormat::Alpha, RenderedGlyphFormat::Lcd] {
                for glyph in [GlyphRef::from(character), GlyphRef::from(index)] {
                    let rendered = face.render_glyph(glyph, &size, format).unwrap();
                    assert!(rendered.size.width > 0 && rendered.size.height > 0);
                    assert_eq!(
                        rendered.data.len(),
                        (rendered.size.width * rendered.size.height) as usize * format.channels()
                    );
                    assert!(rendered.data.iter().any(|&coverage| coverage > 0));
                    assert_eq!(rendered.format, format);
                }
            }
        }
    }

    #[test]
    fn render_rejects_wrong_length() {
        let face = face();
        let size = face.request_pixel_size(None, Some(10)).unwrap();
        for character in ["", "ab"] {
            assert!(matches!(
                face.render_glyph(character, &size, RenderedGlyphFormat::Alpha),
                Err(TextError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn render_rejects_foreign_size() {
        let face = face();
        let other = self::face();
        let size = other.request_pixel_size(None, Some(10)).unwrap();
        assert!(matches!(
            face.render_glyph('a', &size, RenderedGlyphFormat::Alpha),
            Err(TextError::IncompatibleSize)
        ));
    }

    #[test]
    fn render_rejects_unknown_index() {
        let face = face();
        let size = face.request_pixel_size(None, Some(10)).unwrap();
        for index in [face.glyph_count(), u16::MAX] {
            assert!(matches!(
                face.render_glyph(index, &size, RenderedGlyphFormat::Alpha),
                Err(TextError::GlyphResolution(_))
            ));
        }
    }

    #[test]
    fn layout_rejects_foreign_size() {
        let face = face();
        let other = self::face();
        let size = other.request_pixel_size(None, Some(10)).unwrap();
        assert!(matches!(
            face.layout_text("a", &size, &TextLayoutConfig::default()),
            Err(TextError::IncompatibleSize)
        ));
    }

    #[test]
    fn layout_measures_with_face_metrics() {
        let face = face();
        let size = face.request_pixel_size(None, Some(16)).unwrap();
        let text = "hello world";

        let layout = face
            .layout_text(text, &size, &TextLayoutConfig::default())
            .unwrap()
            .unwrap();
        let expected_width: f32 = text
            .chars()
            .map(|c| {
                let index = face.lookup_glyph_index(c).unwrap();
                face.glyph_metrics(index, &size).unwrap().advance
            })
            .sum();
        let line_height = face.line_metrics(&size).unwrap().line_height;

        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.glyphs().count(), text.chars().count());
        assert!((layout.bounding_box.size.width - expected_width).abs() < 1e-3);
        assert!((layout.bounding_box.size.height - line_height).abs() < 1e-3);
        assert!(line_height > 0.0);

        // "hello " is wider than the limit but still gets its own line
        let narrow = TextLayoutConfig {
            max_line_size: Some(1.0),
            ..Default::default()
        };
        let wrapped = face.layout_text(text, &size, &narrow).unwrap().unwrap();
        assert_eq!(wrapped.lines.len(), 2);

        let single = TextLayoutConfig {
            break_text: &NeverBreak,
            max_line_size: Some(1.0),
            ..Default::default()
        };
        let unwrapped = face.layout_text(text, &size, &single).unwrap().unwrap();
        assert_eq!(unwrapped.lines.len(), 1);

        assert!(face.layout_text("", &size, &TextLayoutConfig::default()).unwrap().is_none());
    }

    #[test]
    fn glyph_boxes_match_rendered_bitmaps() {
        let face = face();
        let size = face.request_pixel_size(None, Some(16)).unwrap();
        let layout = face
            .layout_text("g", &size, &TextLayoutConfig::default())
            .unwrap()
            .unwrap();
        let glyph = layout.glyphs().next().unwrap();
        let rendered = face
            .render_glyph(glyph.glyph_index, &size, RenderedGlyphFormat::Alpha)
            .unwrap();

        assert_eq!(glyph.bounding_box.size.to_u32(), rendered.size);
        let ascent = face.line_metrics(&size).unwrap().ascent;
        assert_eq!(glyph.bounding_box.origin.y, ascent + rendered.bearing.y);
    }

    #[test]
    fn shared_face_lays_out_concurrently() {
        let face = face();
        let size = face.request_pixel_size(None, Some(12)).unwrap();
        let text = "the quick brown fox\njumps over the lazy dog";
        let layout = |face: &FontFace| {
            let config = TextLayoutConfig {
                max_line_size: Some(80.0),
                ..Default::default()
            };
            face.layout_text(text, &size, &config).unwrap()
        };
        let expected = layout(&face);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| layout(&face)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
