//! Tile identity and rotation

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Quarter-turn rotation applied to a placed tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Rotate a further quarter turn clockwise
    pub fn rotated_cw(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Rotate a quarter turn counter-clockwise
    pub fn rotated_ccw(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R270,
            Rotation::R90 => Rotation::R0,
            Rotation::R180 => Rotation::R90,
            Rotation::R270 => Rotation::R180,
        }
    }

    /// Angle in degrees (clockwise)
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }
}

/// Identifies the tile occupying a cell: which tileset, which tile in it, and how it is turned.
///
/// Equality and hashing only look at `(tileset, tile_id)`. Two tiles that differ
/// only by rotation compare equal even though the rotation is stored and saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileInfo {
    pub tileset: String,
    pub tile_id: u32,
    #[serde(default)]
    pub rotation: Rotation,
}

impl TileInfo {
    pub fn new(tileset: impl Into<String>, tile_id: u32) -> Self {
        Self {
            tileset: tileset.into(),
            tile_id,
            rotation: Rotation::R0,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

impl PartialEq for TileInfo {
    fn eq(&self, other: &Self) -> bool {
        self.tileset == other.tileset && self.tile_id == other.tile_id
    }
}

impl Eq for TileInfo {}

impl Hash for TileInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tileset.hash(state);
        self.tile_id.hash(state);
    }
}
