//! Fixed-size tile chunks and the coordinate math that addresses them

use crate::TileInfo;
use serde::{Deserialize, Serialize};

/// Edge length of a chunk in cells
pub const CHUNK_SIZE: i32 = 16;

const CHUNK_CELLS: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// A global cell position in tile units (may be negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Split into the owning chunk and the offset inside it.
    ///
    /// Uses floor division so that `(-1, -1)` lands in chunk `(-1, -1)` at local
    /// `(CHUNK_SIZE - 1, CHUNK_SIZE - 1)` rather than in chunk `(0, 0)`.
    pub fn to_chunk(self) -> (ChunkCoord, LocalCoord) {
        let chunk = ChunkCoord {
            x: self.x.div_euclid(CHUNK_SIZE),
            y: self.y.div_euclid(CHUNK_SIZE),
        };
        let local = LocalCoord {
            x: (self.x - chunk.x * CHUNK_SIZE) as usize,
            y: (self.y - chunk.y * CHUNK_SIZE) as usize,
        };
        (chunk, local)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Position of a chunk in chunk units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Global cell of this chunk's local `(0, 0)`
    pub fn origin(self) -> CellCoord {
        CellCoord::new(self.x * CHUNK_SIZE, self.y * CHUNK_SIZE)
    }

    /// Global cell for a local offset inside this chunk
    pub fn cell_at(self, local: LocalCoord) -> CellCoord {
        let origin = self.origin();
        CellCoord::new(origin.x + local.x as i32, origin.y + local.y as i32)
    }
}

/// Offset of a cell inside its chunk, each axis in `[0, CHUNK_SIZE)` when produced by [`CellCoord::to_chunk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LocalCoord {
    pub x: usize,
    pub y: usize,
}

impl LocalCoord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    fn index(self) -> Option<usize> {
        let size = CHUNK_SIZE as usize;
        if self.x < size && self.y < size {
            Some(self.y * size + self.x)
        } else {
            None
        }
    }
}

/// Dense square block of optional tiles, the unit of sparse allocation in a tile layer.
///
/// Out-of-range local coordinates read as empty and writes to them are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Row-major cells, `CHUNK_SIZE * CHUNK_SIZE` long
    tiles: Vec<Option<TileInfo>>,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    /// Create an empty chunk
    pub fn new() -> Self {
        Self {
            tiles: vec![None; CHUNK_CELLS],
        }
    }

    /// Get the tile at a local position
    pub fn get(&self, local: LocalCoord) -> Option<&TileInfo> {
        local
            .index()
            .and_then(|idx| self.tiles.get(idx))
            .and_then(|t| t.as_ref())
    }

    /// Write a cell, returning what was there before. Out-of-range writes do nothing.
    pub fn set(&mut self, local: LocalCoord, tile: Option<TileInfo>) -> Option<TileInfo> {
        let idx = local.index()?;
        let slot = self.tiles.get_mut(idx)?;
        std::mem::replace(slot, tile)
    }

    /// Clear a cell, returning what was there
    pub fn clear(&mut self, local: LocalCoord) -> Option<TileInfo> {
        self.set(local, None)
    }

    /// True if no cell holds a tile
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|t| t.is_none())
    }

    /// Number of occupied cells
    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// Iterate occupied cells with their local positions
    pub fn iter(&self) -> impl Iterator<Item = (LocalCoord, &TileInfo)> {
        let size = CHUNK_SIZE as usize;
        self.tiles.iter().enumerate().filter_map(move |(idx, tile)| {
            tile.as_ref()
                .map(|t| (LocalCoord::new(idx % size, idx / size), t))
        })
    }

    /// Rebuild a chunk from serialized cells, padding or truncating to the fixed size
    pub(crate) fn from_cells(mut tiles: Vec<Option<TileInfo>>) -> Self {
        tiles.resize(CHUNK_CELLS, None);
        Self { tiles }
    }

    pub(crate) fn cells(&self) -> &[Option<TileInfo>] {
        &self.tiles
    }
}
