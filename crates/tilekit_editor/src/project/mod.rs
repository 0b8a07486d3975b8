//! Map documents: the map plus the tilesets it was painted with

mod file;

pub use file::MapFileError;

use serde::{Deserialize, Serialize};
use tilekit_core::{Map, Tileset, TilesetManager};

/// Current on-disk document version
pub const MAP_FILE_VERSION: u32 = 1;

/// Everything written to a map file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub map: Map,
    /// Tileset definitions in load order
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
}

fn default_version() -> u32 {
    MAP_FILE_VERSION
}

impl MapDocument {
    pub fn new(map: Map, tilesets: &TilesetManager) -> Self {
        Self {
            version: MAP_FILE_VERSION,
            map,
            tilesets: tilesets.iter().cloned().collect(),
        }
    }

    /// Build a registry from the stored tileset definitions
    pub fn tileset_manager(&self) -> TilesetManager {
        let mut manager = TilesetManager::new();
        for tileset in &self.tilesets {
            manager.register(tileset.clone());
        }
        manager
    }

    /// Names of tilesets referenced by placed tiles but missing from the document
    pub fn missing_tilesets(&self) -> Vec<String> {
        let manager = self.tileset_manager();
        let mut missing: Vec<String> = self
            .map
            .layers()
            .iter()
            .filter_map(|layer| layer.tiles())
            .flat_map(|tiles| tiles.iter_tiles())
            .filter(|(_, tile)| manager.get(&tile.tileset).is_none())
            .map(|(_, tile)| tile.tileset.clone())
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_core::{CellCoord, TileInfo};

    #[test]
    fn test_missing_tilesets() {
        let mut map = Map::new("Test");
        map.active_layer_mut()
            .place_tile(CellCoord::new(0, 0), TileInfo::new("Grass", 1));
        map.active_layer_mut()
            .place_tile(CellCoord::new(1, 0), TileInfo::new("Water", 1));
        map.active_layer_mut()
            .place_tile(CellCoord::new(2, 0), TileInfo::new("Water", 2));

        let mut tilesets = TilesetManager::new();
        tilesets.register(Tileset::new("Grass", "grass.png", 16, 16, 4, 16));
        let document = MapDocument::new(map, &tilesets);

        assert_eq!(document.missing_tilesets(), vec!["Water".to_string()]);
        assert_eq!(document.tileset_manager().len(), 1);
    }
}
