use thiserror::Error;

/// All errors that the crate can generate.
///
/// Every error is raised at the point of detection. Layout never returns a
/// partially built result alongside an error.
#[derive(Error, Debug)]
pub enum TextError {
    #[error("only a single character may be entered (got {count})")]
    /// A single-character operation received zero or several characters.
    InvalidInput { count: usize },

    #[error("size is not compatible with this face")]
    /// The size handle was requested from a different face.
    IncompatibleSize,

    #[error("face does not contain the glyph {0}")]
    /// The requested glyph index does not exist in the face.
    GlyphResolution(u32),

    #[error("no face with id {0:?} is loaded")]
    /// The face ID is not (or no longer) known to the font storage.
    UnknownFace(fontdb::ID),

    #[error("width or height must be specified")]
    /// A size request carried neither a width nor a height.
    Configuration,

    #[error("failed to parse font: {0}")]
    /// [fontdue] or [fontdb] rejected the font data.
    FontParse(&'static str),

    #[error(transparent)]
    /// An I/O error occurred while reading a font file.
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
