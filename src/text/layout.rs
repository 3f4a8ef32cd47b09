use std::fmt;

use euclid::default::{Point2D, Rect, Size2D, Vector2D};

use crate::{
    break_text::{BreakText, IcuLineBreak},
    error::Result,
    metrics::{FontFaceSize, FontMetrics, GlyphMetrics},
    unicode::{IsCharacterRendered, NormallyRendered},
};

/// Configuration knobs used by the text layout pipeline.
///
/// All parameters are honored during a single [`layout_text`] call. The
/// strategies are borrowed so callers can plug in their own without boxing.
#[derive(Clone, Copy)]
pub struct TextLayoutConfig<'a> {
    pub break_text: &'a dyn BreakText,
    /// Maximum visible width of a line, in the units of glyph advances.
    pub max_line_size: Option<f32>,
    pub is_character_rendered: &'a dyn IsCharacterRendered,
    /// Overrides the face's default line height.
    pub line_height: Option<f32>,
    pub primary_axis_alignment: PrimaryAxisTextAlign,
    pub secondary_axis_alignment: SecondaryAxisTextAlign,
    /// Added to every position of the finished layout.
    pub origin: Vector2D<f32>,
}

impl Default for TextLayoutConfig<'_> {
    fn default() -> Self {
        Self {
            break_text: &IcuLineBreak,
            max_line_size: None,
            is_character_rendered: &NormallyRendered,
            line_height: None,
            primary_axis_alignment: PrimaryAxisTextAlign::Begin,
            secondary_axis_alignment: SecondaryAxisTextAlign::Begin,
            origin: Vector2D::zero(),
        }
    }
}

impl fmt::Debug for TextLayoutConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLayoutConfig")
            .field("max_line_size", &self.max_line_size)
            .field("line_height", &self.line_height)
            .field("primary_axis_alignment", &self.primary_axis_alignment)
            .field("secondary_axis_alignment", &self.secondary_axis_alignment)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Alignment of each line along the axis glyphs advance on.
///
/// Lines are aligned against the widest line of the block.
pub enum PrimaryAxisTextAlign {
    #[default]
    Begin,
    Center,
    End,
}

impl PrimaryAxisTextAlign {
    /// Offset of a line start given the difference between the widest line
    /// and this line.
    fn offset(self, slack: f32) -> f32 {
        match self {
            Self::Begin => 0.0,
            Self::Center => slack / 2.0,
            Self::End => slack,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Alignment of the whole block along the axis lines are stacked on.
///
/// The origin represents the top, the middle or the bottom of the block.
pub enum SecondaryAxisTextAlign {
    #[default]
    Begin,
    Center,
    End,
}

impl SecondaryAxisTextAlign {
    fn offset(self, extent: f32) -> f32 {
        match self {
            Self::Begin => 0.0,
            Self::Center => -extent / 2.0,
            Self::End => -extent,
        }
    }
}

/// Final layout output produced by [`layout_text`].
///
/// **Y-axis goes down**. Every bounding box is expressed in the caller's
/// coordinates, already translated by [`TextLayoutConfig::origin`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// Union of all line bounding boxes.
    pub bounding_box: Rect<f32>,
    pub lines: Vec<TextLine>,
}

impl TextLayout {
    /// Iterates the glyphs of every line in order.
    pub fn glyphs(&self) -> impl Iterator<Item = &TextGlyph> {
        self.lines.iter().flat_map(|line| line.glyphs.iter())
    }
}

/// A single row of positioned glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Spans the advances of rendered glyphs only, and the line height.
    pub bounding_box: Rect<f32>,
    pub glyphs: Vec<TextGlyph>,
}

/// A positioned glyph.
///
/// The bounding box is the ink box: the pen position on the baseline moved by
/// the glyph bearing, sized like the rasterized glyph. Passing
/// `glyph_index` to a rasterizer yields a bitmap that can be drawn at the
/// box origin directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextGlyph {
    pub bounding_box: Rect<f32>,
    pub character: char,
    pub glyph_index: u16,
}

/// Lays out `text` with the metrics of `font` at `size`.
///
/// The implementation follows a two-stage pipeline:
/// 1. Chunks produced by the break strategy are measured and greedily packed
///    into lines. Positions are relative to each line's start.
/// 2. The lines are stacked, aligned on both axes and moved to the origin.
///
/// Returns `Ok(None)` when the text produces no lines, i.e. when it is empty.
pub fn layout_text<F>(
    font: &F,
    text: &str,
    size: &FontFaceSize,
    config: &TextLayoutConfig<'_>,
) -> Result<Option<TextLayout>>
where
    F: FontMetrics + ?Sized,
{
    font.check_size(size)?;

    let lines = assemble_lines(font, text, size, config)?;
    if lines.is_empty() {
        return Ok(None);
    }

    let line_metrics = font.line_metrics(size)?;
    let line_height = config
        .line_height
        .unwrap_or(line_metrics.line_height)
        .max(0.0);

    log::debug!(
        "laid out {} chars into {} lines (line height {})",
        text.chars().count(),
        lines.len(),
        line_height
    );

    Ok(Some(resolve_lines(
        lines,
        line_height,
        line_metrics.ascent,
        config,
    )))
}

/// Glyph positioned relative to the start of its line.
struct LineGlyph {
    character: char,
    glyph_index: u16,
    metrics: GlyphMetrics,
    pen_x: f32,
}

/// Measured chunk waiting to be placed on a line.
struct ChunkBuffer {
    glyphs: Vec<(char, u16, GlyphMetrics)>,
    /// Sum of the advances of rendered characters.
    width: f32,
}

impl ChunkBuffer {
    fn measure<F>(
        font: &F,
        text: &str,
        size: &FontFaceSize,
        is_character_rendered: &dyn IsCharacterRendered,
    ) -> Result<Self>
    where
        F: FontMetrics + ?Sized,
    {
        let mut glyphs = Vec::with_capacity(text.len());
        let mut width = 0.0;

        for character in text.chars() {
            let glyph_index = font.lookup_glyph_index(character)?;
            let metrics = font.glyph_metrics(glyph_index, size)?;
            if is_character_rendered.is_character_rendered(character) {
                width += metrics.advance;
            }
            glyphs.push((character, glyph_index, metrics));
        }

        Ok(Self { glyphs, width })
    }
}

/// Line accumulator. Finalized lines are moved out with [`std::mem::take`].
#[derive(Default)]
struct LineBuffer {
    glyphs: Vec<LineGlyph>,
    pen_x: f32,
    width: f32,
}

impl LineBuffer {
    fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Appends a whole chunk. The pen moves by the true advance of every
    /// glyph, rendered or not.
    fn append(&mut self, chunk: ChunkBuffer) {
        for (character, glyph_index, metrics) in chunk.glyphs {
            self.glyphs.push(LineGlyph {
                character,
                glyph_index,
                metrics,
                pen_x: self.pen_x,
            });
            self.pen_x += metrics.advance;
        }
        self.width += chunk.width;
    }
}

/// Pushes the buffered line (if any) into the line list.
fn finalize_line(line: &mut LineBuffer, lines: &mut Vec<LineBuffer>) {
    if !line.is_empty() {
        lines.push(std::mem::take(line));
    }
}

/// Greedy single pass over the chunks. A chunk is never split: when it does
/// not fit on a line that already has content it starts the next line, and a
/// chunk wider than the limit simply gets a line of its own.
fn assemble_lines<F>(
    font: &F,
    text: &str,
    size: &FontFaceSize,
    config: &TextLayoutConfig<'_>,
) -> Result<Vec<LineBuffer>>
where
    F: FontMetrics + ?Sized,
{
    let mut lines = Vec::new();
    let mut line = LineBuffer::default();

    for chunk in config.break_text.break_text(text) {
        let buffer = ChunkBuffer::measure(font, chunk.text, size, config.is_character_rendered)?;

        if let Some(limit) = config.max_line_size
            && !line.is_empty()
            && line.width + buffer.width > limit
        {
            log::trace!(
                "wrapping before {:?}: {} + {} > {}",
                chunk.text,
                line.width,
                buffer.width,
                limit
            );
            finalize_line(&mut line, &mut lines);
        }

        line.append(buffer);

        if chunk.is_hard_break {
            finalize_line(&mut line, &mut lines);
        }
    }

    finalize_line(&mut line, &mut lines);
    Ok(lines)
}

/// Stacks the lines, applies both alignments and translates everything by
/// the origin.
fn resolve_lines(
    lines: Vec<LineBuffer>,
    line_height: f32,
    ascent: f32,
    config: &TextLayoutConfig<'_>,
) -> TextLayout {
    let block_width = lines.iter().map(|line| line.width).fold(0.0, f32::max);
    let block_height = line_height * lines.len() as f32;
    let block_top = config.secondary_axis_alignment.offset(block_height) + config.origin.y;

    let mut bounding_box: Option<Rect<f32>> = None;
    let mut lines_out = Vec::with_capacity(lines.len());

    for (row, line) in lines.into_iter().enumerate() {
        let left = config
            .primary_axis_alignment
            .offset(block_width - line.width)
            + config.origin.x;
        let top = block_top + row as f32 * line_height;
        let baseline = top + ascent;

        let glyphs = line
            .glyphs
            .into_iter()
            .map(|glyph| TextGlyph {
                bounding_box: Rect::new(
                    Point2D::new(
                        left + glyph.pen_x + glyph.metrics.bearing.x,
                        baseline + glyph.metrics.bearing.y,
                    ),
                    glyph.metrics.size,
                ),
                character: glyph.character,
                glyph_index: glyph.glyph_index,
            })
            .collect();

        let line_box = Rect::new(
            Point2D::new(left, top),
            Size2D::new(line.width.max(0.0), line_height),
        );
        bounding_box = Some(match bounding_box {
            Some(current) => union(&current, &line_box),
            None => line_box,
        });

        lines_out.push(TextLine {
            bounding_box: line_box,
            glyphs,
        });
    }

    TextLayout {
        bounding_box: bounding_box.unwrap_or_else(Rect::zero),
        lines: lines_out,
    }
}

/// Union that keeps zero-width rectangles, unlike [`Rect::union`].
fn union(a: &Rect<f32>, b: &Rect<f32>) -> Rect<f32> {
    let min = a.min().min(b.min());
    let max = a.max().max(b.max());
    Rect::new(min, (max - min).to_size())
}
