//! Tilesets and the registry the renderer resolves tiles through

use crate::TileInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tile atlas: one image sliced into a grid of equally sized tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    /// Unique name, used by [`TileInfo::tileset`]
    pub name: String,
    /// Asset path of the atlas image
    pub image_path: String,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Tiles per row in the atlas
    pub columns: u32,
    pub tile_count: u32,
    /// Pixels between tiles
    #[serde(default)]
    pub spacing: u32,
    /// Pixels around the atlas border
    #[serde(default)]
    pub margin: u32,
}

impl Tileset {
    pub fn new(
        name: impl Into<String>,
        image_path: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        columns: u32,
        tile_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            image_path: image_path.into(),
            tile_width,
            tile_height,
            columns,
            tile_count,
            spacing: 0,
            margin: 0,
        }
    }

    pub fn contains(&self, tile_id: u32) -> bool {
        tile_id < self.tile_count
    }

    /// Pixel rectangle of a tile inside the atlas image.
    /// `None` for unknown ids and for geometry whose offsets do not fit in `u32`.
    pub fn tile_region(&self, tile_id: u32) -> Option<TextureRegion> {
        if !self.contains(tile_id) || self.columns == 0 {
            return None;
        }
        let col = tile_id % self.columns;
        let row = tile_id / self.columns;
        let offset = |index: u32, size: u32| {
            size.checked_add(self.spacing)?
                .checked_mul(index)?
                .checked_add(self.margin)
        };
        Some(TextureRegion {
            image_path: self.image_path.clone(),
            x: offset(col, self.tile_width)?,
            y: offset(row, self.tile_height)?,
            width: self.tile_width,
            height: self.tile_height,
        })
    }
}

/// Where to find a tile's pixels: the atlas image plus the sub-rectangle in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRegion {
    pub image_path: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Registry of loaded tilesets, keyed by name, in load order.
/// Serialized as the plain tileset list; the name index is rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Tileset>", into = "Vec<Tileset>")]
pub struct TilesetManager {
    tilesets: Vec<Tileset>,
    // O(1) name lookups
    index: HashMap<String, usize>,
}

impl From<Vec<Tileset>> for TilesetManager {
    fn from(tilesets: Vec<Tileset>) -> Self {
        let mut manager = Self::new();
        for tileset in tilesets {
            manager.register(tileset);
        }
        manager
    }
}

impl From<TilesetManager> for Vec<Tileset> {
    fn from(manager: TilesetManager) -> Self {
        manager.tilesets
    }
}

impl TilesetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the lookup index from the tileset list
    pub fn rebuild_index(&mut self) {
        self.index = self
            .tilesets
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
    }

    /// Register a tileset, replacing any existing one with the same name.
    /// Returns the replaced tileset.
    pub fn register(&mut self, tileset: Tileset) -> Option<Tileset> {
        if let Some(&i) = self.index.get(&tileset.name) {
            return Some(std::mem::replace(&mut self.tilesets[i], tileset));
        }
        self.index.insert(tileset.name.clone(), self.tilesets.len());
        self.tilesets.push(tileset);
        None
    }

    /// Remove a tileset by name
    pub fn remove(&mut self, name: &str) -> Option<Tileset> {
        let i = self.index.remove(name)?;
        let removed = self.tilesets.remove(i);
        self.rebuild_index();
        Some(removed)
    }

    pub fn get(&self, name: &str) -> Option<&Tileset> {
        self.index.get(name).and_then(|&i| self.tilesets.get(i))
    }

    pub fn contains_tile(&self, tileset: &str, tile_id: u32) -> bool {
        self.get(tileset).is_some_and(|t| t.contains(tile_id))
    }

    /// Tilesets in load order
    pub fn iter(&self) -> impl Iterator<Item = &Tileset> {
        self.tilesets.iter()
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    /// Resolve a placed tile to its atlas region; `None` when the tileset or id is unknown
    pub fn tile_texture(&self, tile: &TileInfo) -> Option<TextureRegion> {
        self.get(&tile.tileset)?.tile_region(tile.tile_id)
    }
}
