use std::path::PathBuf;

use parking_lot::Mutex;

use crate::{
    error::{Result, TextError},
    font_face::FontFace,
    font_storage::FontStorage,
    metrics::FontFaceSize,
    text::{TextLayout, TextLayoutConfig},
};

/// High-level entry point shared across threads.
///
/// Wraps a [`FontStorage`] in a `Mutex` so loading and querying can happen
/// from anywhere, which is common in UI frameworks. The lock is only held
/// while looking faces up: the returned [`FontFace`] handles are independent
/// and layout runs without touching the storage.
///
/// The field is public to allow direct access to the underlying storage when necessary.
pub struct FontSystem {
    /// The underlying font storage.
    pub font_storage: Mutex<FontStorage>,
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSystem {
    /// Creates a new font system with empty storage.
    pub fn new() -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
        }
    }
}

/// font storage initialization
impl FontSystem {
    /// Loads the system fonts into the storage.
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_storage.lock().load_font_binary(data);
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: PathBuf) -> std::result::Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&self, dir: PathBuf) {
        self.font_storage.lock().load_fonts_dir(dir)
    }

    /// Removes a face by ID.
    pub fn remove_face(&self, id: fontdb::ID) {
        self.font_storage.lock().remove_face(id);
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }

    /// Returns the number of known faces.
    pub fn len(&self) -> usize {
        self.font_storage.lock().len()
    }
}

/// font querying
impl FontSystem {
    /// Queries for a face matching the description.
    pub fn query(&self, query: &fontdb::Query) -> Option<(fontdb::ID, FontFace)> {
        self.font_storage.lock().query(query)
    }

    /// Retrieves a parsed face by ID.
    pub fn face(&self, id: fontdb::ID) -> Option<FontFace> {
        self.font_storage.lock().face(id)
    }

    /// Returns a vec over all available faces.
    ///
    /// # Performance
    /// This method clones all face info to avoid holding a lock on the storage.
    /// If you need to iterate without allocation, lock `font_storage` directly.
    pub fn faces(&self) -> Vec<fontdb::FaceInfo> {
        self.font_storage.lock().faces().cloned().collect()
    }

    /// Returns a copy of the face info for an ID.
    pub fn face_info(&self, id: fontdb::ID) -> Option<fontdb::FaceInfo> {
        self.font_storage.lock().face_info(id).cloned()
    }
}

/// text layout
impl FontSystem {
    /// Looks up a face by ID and lays out `text` with it.
    ///
    /// Returns `Ok(None)` when the text is empty and fails with
    /// [`TextError::UnknownFace`] when no face has that ID.
    pub fn layout_text(
        &self,
        id: fontdb::ID,
        text: &str,
        size: &FontFaceSize,
        config: &TextLayoutConfig<'_>,
    ) -> Result<Option<TextLayout>> {
        let face = self.face(id).ok_or(TextError::UnknownFace(id))?;
        face.layout_text(text, size, config)
    }
}
