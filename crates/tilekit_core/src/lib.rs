//! Core data structures for tilekit
//!
//! This crate provides the types the editing kernel mutates and the renderer reads:
//! - `TileInfo` - Which tile (from which tileset) occupies a cell
//! - `Chunk` - Fixed-size dense block of cells, the unit of sparse allocation
//! - `TileLayer` - Unbounded tile storage built from lazily created chunks
//! - `Layer` - One plane of content (tiles, objects, collision, navigation, triggers)
//! - `Map` - Ordered layer stack that always keeps at least one layer
//! - `TilesetManager` - Tileset registry used to resolve tiles to atlas regions

mod chunk;
mod layer;
mod map;
mod object;
mod tile;
mod tile_layer;
mod tileset;

pub use chunk::{CellCoord, Chunk, ChunkCoord, LocalCoord, CHUNK_SIZE};
pub use layer::{Layer, LayerData, LayerKind};
pub use map::{Map, DEFAULT_LAYER_NAME};
pub use object::{MapObject, ObjectShape, ObjectTransform};
pub use tile::{Rotation, TileInfo};
pub use tile_layer::TileLayer;
pub use tileset::{TextureRegion, Tileset, TilesetManager};
