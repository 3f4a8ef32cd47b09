use std::{collections::HashMap, path::PathBuf};

use crate::font_face::{FontFace, font_settings};

/// Manages font loading and retrieval using `fontdb` and `fontdue`.
///
/// This struct combines a database of available fonts (`fontdb`) with a cache of parsed
/// faces. It allows querying for fonts by family and properties, and lazily parses the
/// actual font data when a face is requested.
pub struct FontStorage {
    /// This is the font set that has been loaded by fontdb.
    font_db: fontdb::Database,
    /// Faces parsed so far.
    /// Not all fonts in fontdb are necessarily loaded here.
    loaded_faces: HashMap<fontdb::ID, FontFace, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates a new empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_faces: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading fonts into fontdb.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Removes a face by ID.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.loaded_faces.remove(&id);
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of known faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Get `FontFace`
impl FontStorage {
    /// Queries for a face matching the description.
    ///
    /// Returns the ID and the parsed face if found.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, FontFace)> {
        let id = self.font_db.query(query)?;
        self.face(id).map(|face| (id, face))
    }

    /// Retrieves a parsed face by ID, parsing it if necessary.
    ///
    /// Repeated calls return clones of the same face, so sizes requested from
    /// one of them stay valid for the others.
    pub fn face(&mut self, id: fontdb::ID) -> Option<FontFace> {
        use std::collections::hash_map::Entry;

        match self.loaded_faces.entry(id) {
            Entry::Occupied(entry) => Some(entry.get().clone()),
            Entry::Vacant(entry) => {
                let name = self.font_db.face(id)?.post_script_name.clone();
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(data, font_settings(index))
                })?;

                match font_result {
                    Ok(font) => {
                        let face = entry.insert(FontFace::from_font(font, name));
                        Some(face.clone())
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }

    /// Returns an iterator over all available faces.
    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }

    /// Returns face info for an ID.
    pub fn face_info(&self, id: fontdb::ID) -> Option<&fontdb::FaceInfo> {
        self.font_db.face(id)
    }
}
