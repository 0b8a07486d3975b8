//! Map file save/load operations

use super::MapDocument;
use std::path::Path;

#[derive(Debug)]
pub enum MapFileError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    NoPath,
}

impl std::fmt::Display for MapFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapFileError::IoError(e) => write!(f, "IO error: {}", e),
            MapFileError::ParseError(e) => write!(f, "Parse error: {}", e),
            MapFileError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            MapFileError::NoPath => write!(f, "No file path set"),
        }
    }
}

impl std::error::Error for MapFileError {}

impl MapDocument {
    /// Load a document from file
    pub fn load(path: &Path) -> Result<Self, MapFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MapFileError::IoError(e.to_string()))?;

        let mut document: MapDocument =
            serde_json::from_str(&content).map_err(|e| MapFileError::ParseError(e.to_string()))?;

        // Hand-edited files may have no layers or a stale active index
        document.map.ensure_invariants();

        Ok(document)
    }

    /// Save the document to file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), MapFileError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| MapFileError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| MapFileError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| MapFileError::IoError(e.to_string()))
    }

    /// Save to `path` if one is set
    pub fn save_to(&self, path: Option<&Path>) -> Result<(), MapFileError> {
        match path {
            Some(path) => self.save(path),
            None => Err(MapFileError::NoPath),
        }
    }
}
