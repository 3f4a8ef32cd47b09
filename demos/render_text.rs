use std::{error::Error, path::PathBuf, str::FromStr};

use clap::{Parser, ValueEnum};
use image::{GrayImage, Luma, Rgb, RgbImage};
use kumihan::{
    BreakText, FontFace, FontSystem, IcuLineBreak, NeverBreak, RenderedGlyphFormat,
    euclid::default::Vector2D,
    fontdb::{self, Family, Query},
    text::{PrimaryAxisTextAlign, SecondaryAxisTextAlign, TextLayout, TextLayoutConfig},
};

const PADDING: f32 = 8.0;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Align {
    Begin,
    Center,
    End,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Breaking {
    /// Unicode line break opportunities
    Line,
    /// Keep everything on one line
    Never,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Alpha,
    Lcd,
}

/// Font size given as `16px`, `12pt` or a bare pixel count.
#[derive(Clone, Copy, Debug)]
enum FontSize {
    Pixels(u32),
    Points(f32),
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(points) = s.strip_suffix("pt") {
            points
                .trim()
                .parse()
                .map(Self::Points)
                .map_err(|e| format!("invalid point size {s:?}: {e}"))
        } else {
            s.strip_suffix("px")
                .unwrap_or(s)
                .trim()
                .parse()
                .map(Self::Pixels)
                .map_err(|e| format!("invalid pixel size {s:?}: {e}"))
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "render_text")]
#[command(about = "Lay out text and write the rasterized result to a PNG")]
struct Cli {
    /// Text to lay out. `\n` starts a new line.
    text: String,

    /// Font file. Defaults to a sans-serif system font.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size, e.g. `16px` or `12pt`
    #[arg(long, default_value = "24px")]
    size: FontSize,

    /// DPI used to resolve point sizes
    #[arg(long, default_value_t = 72)]
    dpi: u32,

    /// Wrap lines wider than this many pixels
    #[arg(long)]
    max_line_size: Option<f32>,

    /// Override the face's line height
    #[arg(long)]
    line_height: Option<f32>,

    #[arg(long, value_enum, default_value = "line")]
    breaking: Breaking,

    #[arg(long, value_enum, default_value = "begin")]
    primary_align: Align,

    #[arg(long, value_enum, default_value = "begin")]
    secondary_align: Align,

    #[arg(long, value_enum, default_value = "alpha")]
    format: Format,

    /// Output PNG path
    #[arg(long, short, default_value = "debug/render_text.png")]
    output: PathBuf,
}

fn pick_face(font: Option<&PathBuf>) -> Result<FontFace, Box<dyn Error>> {
    if let Some(path) = font {
        return Ok(FontFace::from_file(path)?);
    }

    let font_system = FontSystem::new();
    font_system.load_system_fonts();

    const FAMILIES: &[Family<'_>] = &[Family::SansSerif];
    let query = Query {
        families: FAMILIES,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    if let Some((_, face)) = font_system.query(&query) {
        return Ok(face);
    }

    font_system
        .faces()
        .iter()
        .find_map(|info| font_system.face(info.id))
        .ok_or_else(|| "no usable system font found, pass --font".into())
}

/// Smallest rectangle holding every line and glyph box, as (min, max).
fn extents(layout: &TextLayout) -> (Vector2D<f32>, Vector2D<f32>) {
    let mut min = layout.bounding_box.min().to_vector();
    let mut max = layout.bounding_box.max().to_vector();
    for glyph in layout.glyphs() {
        min = min.min(glyph.bounding_box.min().to_vector());
        max = max.max(glyph.bounding_box.max().to_vector());
    }
    (min, max)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let face = pick_face(cli.font.as_ref())?;
    let size = match cli.size {
        FontSize::Pixels(px) => face.request_pixel_size(None, Some(px))?,
        FontSize::Points(pt) => face.request_point_size(
            None,
            Some(pt),
            Some(kumihan::euclid::default::Size2D::new(cli.dpi, cli.dpi)),
        )?,
    };
    println!("Using {}", face.font(size)?);

    let config = TextLayoutConfig {
        break_text: match cli.breaking {
            Breaking::Line => &IcuLineBreak as &dyn BreakText,
            Breaking::Never => &NeverBreak,
        },
        max_line_size: cli.max_line_size,
        line_height: cli.line_height,
        primary_axis_alignment: match cli.primary_align {
            Align::Begin => PrimaryAxisTextAlign::Begin,
            Align::Center => PrimaryAxisTextAlign::Center,
            Align::End => PrimaryAxisTextAlign::End,
        },
        secondary_axis_alignment: match cli.secondary_align {
            Align::Begin => SecondaryAxisTextAlign::Begin,
            Align::Center => SecondaryAxisTextAlign::Center,
            Align::End => SecondaryAxisTextAlign::End,
        },
        ..Default::default()
    };

    let text = cli.text.replace("\\n", "\n");
    let Some(layout) = face.layout_text(&text, &size, &config)? else {
        println!("Text is empty; nothing to write.");
        return Ok(());
    };
    println!(
        "Layout: bounding_box={:?} lines={}",
        layout.bounding_box,
        layout.lines.len()
    );

    // shift the layout so that every ink box lands inside the canvas
    let (min, max) = extents(&layout);
    let offset = Vector2D::new(PADDING, PADDING) - min;
    let width = (max.x - min.x + 2.0 * PADDING).ceil().max(1.0) as u32;
    let height = (max.y - min.y + 2.0 * PADDING).ceil().max(1.0) as u32;

    let format = match cli.format {
        Format::Alpha => RenderedGlyphFormat::Alpha,
        Format::Lcd => RenderedGlyphFormat::Lcd,
    };
    let mut gray = GrayImage::new(width, height);
    let mut rgb = RgbImage::new(width, height);

    let timer = std::time::Instant::now();
    for glyph in layout.glyphs() {
        if !kumihan::is_normally_rendered(glyph.character) {
            continue;
        }
        let rendered = face.render_glyph(glyph.glyph_index, &size, format)?;
        let origin = (glyph.bounding_box.origin + offset).round().to_i32();
        let channels = format.channels();

        for row in 0..rendered.size.height {
            for column in 0..rendered.size.width {
                let x = origin.x + column as i32;
                let y = origin.y + row as i32;
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    continue;
                }
                let start = (row * rendered.size.width + column) as usize * channels;
                let coverage = &rendered.data[start..start + channels];
                match format {
                    RenderedGlyphFormat::Alpha => {
                        let Luma([value]) = gray.get_pixel_mut(x as u32, y as u32);
                        *value = value.saturating_add(coverage[0]);
                    }
                    RenderedGlyphFormat::Lcd => {
                        let Rgb(pixel) = rgb.get_pixel_mut(x as u32, y as u32);
                        for (value, c) in pixel.iter_mut().zip(coverage) {
                            *value = value.saturating_add(*c);
                        }
                    }
                }
            }
        }
    }
    println!(
        "Rendered image: width={} height={} (elapsed: {:.2?})",
        width,
        height,
        timer.elapsed()
    );

    if let Some(parent) = cli.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match format {
        RenderedGlyphFormat::Alpha => gray.save(&cli.output)?,
        RenderedGlyphFormat::Lcd => rgb.save(&cli.output)?,
    }
    println!("Saved image to {}", cli.output.display());

    Ok(())
}
