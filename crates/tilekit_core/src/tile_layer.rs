//! Sparse, chunked tile storage for unbounded tile layers

use crate::{CellCoord, Chunk, ChunkCoord, TileInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tile storage built from lazily allocated [`Chunk`]s.
///
/// Chunks are created on first write and kept when they become empty, so a layer
/// only grows while being edited. [`TileLayer::prune_empty_chunks`] compacts explicitly.
/// Equality compares occupied cells (rotation included); emptied chunks do not count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileLayer {
    /// Serialized as a list of `{ coord, tiles }` entries since JSON maps cannot be keyed by a struct
    #[serde(with = "chunk_list", default)]
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl TileLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a tile, allocating its chunk if needed. Returns the tile previously in the cell.
    pub fn set_tile(&mut self, cell: CellCoord, tile: TileInfo) -> Option<TileInfo> {
        let (chunk_coord, local) = cell.to_chunk();
        self.chunks
            .entry(chunk_coord)
            .or_default()
            .set(local, Some(tile))
    }

    /// Clear a cell. Never allocates: a missing chunk means there is nothing to remove.
    pub fn remove_tile(&mut self, cell: CellCoord) -> Option<TileInfo> {
        let (chunk_coord, local) = cell.to_chunk();
        self.chunks.get_mut(&chunk_coord)?.clear(local)
    }

    /// Get the tile in a cell, `None` if the cell or its chunk is empty
    pub fn get_tile(&self, cell: CellCoord) -> Option<&TileInfo> {
        let (chunk_coord, local) = cell.to_chunk();
        self.chunks.get(&chunk_coord)?.get(local)
    }

    /// Get an allocated chunk
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Number of allocated chunks (including emptied ones)
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of occupied cells across all chunks
    pub fn tile_count(&self) -> usize {
        self.chunks.values().map(Chunk::tile_count).sum()
    }

    /// Iterate allocated chunks in no particular order
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        self.chunks.iter().map(|(coord, chunk)| (*coord, chunk))
    }

    /// Chunks overlapping the inclusive cell rectangle `min..=max`, for culled iteration
    pub fn chunks_in_rect(
        &self,
        min: CellCoord,
        max: CellCoord,
    ) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        let (lo, _) = CellCoord::new(min.x.min(max.x), min.y.min(max.y)).to_chunk();
        let (hi, _) = CellCoord::new(min.x.max(max.x), min.y.max(max.y)).to_chunk();
        self.chunks.iter().filter_map(move |(coord, chunk)| {
            let inside = coord.x >= lo.x && coord.x <= hi.x && coord.y >= lo.y && coord.y <= hi.y;
            inside.then_some((*coord, chunk))
        })
    }

    /// Iterate every occupied cell with its global coordinate
    pub fn iter_tiles(&self) -> impl Iterator<Item = (CellCoord, &TileInfo)> {
        self.chunks.iter().flat_map(|(coord, chunk)| {
            chunk
                .iter()
                .map(move |(local, tile)| (coord.cell_at(local), tile))
        })
    }

    /// Drop chunks that no longer hold any tile. Returns how many were removed.
    pub fn prune_empty_chunks(&mut self) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|_, chunk| !chunk.is_empty());
        before - self.chunks.len()
    }

    /// Bounding rectangle (inclusive) of all occupied cells
    pub fn bounds(&self) -> Option<(CellCoord, CellCoord)> {
        let mut iter = self.iter_tiles().map(|(cell, _)| cell);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), cell| {
            (
                CellCoord::new(min.x.min(cell.x), min.y.min(cell.y)),
                CellCoord::new(max.x.max(cell.x), max.y.max(cell.y)),
            )
        }))
    }
}

impl PartialEq for TileLayer {
    fn eq(&self, other: &Self) -> bool {
        self.tile_count() == other.tile_count()
            && self
                .iter_tiles()
                .all(|(cell, tile)| {
                    other
                        .get_tile(cell)
                        .is_some_and(|o| o == tile && o.rotation == tile.rotation)
                })
    }
}

/// Serde adapter writing the chunk map as an explicit entry list
mod chunk_list {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Serialize)]
    struct ChunkEntryRef<'a> {
        coord: ChunkCoord,
        tiles: &'a [Option<TileInfo>],
    }

    #[derive(Deserialize)]
    struct ChunkEntry {
        coord: ChunkCoord,
        tiles: Vec<Option<TileInfo>>,
    }

    pub fn serialize<S: Serializer>(
        chunks: &HashMap<ChunkCoord, Chunk>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<ChunkEntryRef> = chunks
            .iter()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(coord, chunk)| ChunkEntryRef {
                coord: *coord,
                tiles: chunk.cells(),
            })
            .collect();
        // Stable output for diffs
        entries.sort_by_key(|e| (e.coord.y, e.coord.x));
        serializer.collect_seq(entries)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<ChunkCoord, Chunk>, D::Error> {
        let entries = Vec::<ChunkEntry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.coord, Chunk::from_cells(entry.tiles)))
            .collect())
    }
}
