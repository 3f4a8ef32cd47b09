/// The core text layout engine and configuration.
pub mod layout;

pub use layout::{
    PrimaryAxisTextAlign, SecondaryAxisTextAlign, TextGlyph, TextLayout, TextLayoutConfig,
    TextLine, layout_text,
};
