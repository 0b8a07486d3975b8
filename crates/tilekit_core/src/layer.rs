//! Layer types for tile, object, collision, navigation and trigger layers

use crate::{CellCoord, MapObject, TileInfo, TileLayer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single plane of map content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    /// Locked layers ignore every edit
    #[serde(default)]
    pub locked: bool,
    /// UI fold state in the layer panel
    #[serde(default = "default_true")]
    pub expanded: bool,
    pub data: LayerData,
}

fn default_true() -> bool {
    true
}

impl Layer {
    fn with_data(name: impl Into<String>, data: LayerData) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visible: true,
            locked: false,
            expanded: true,
            data,
        }
    }

    /// Create an empty layer of the given kind
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self::with_data(name, LayerData::empty(kind))
    }

    /// Create a new, empty tile layer
    pub fn new_tile_layer(name: impl Into<String>) -> Self {
        Self::new(name, LayerKind::Tile)
    }

    /// Create a new object layer
    pub fn new_object_layer(name: impl Into<String>) -> Self {
        Self::new(name, LayerKind::Object)
    }

    /// Get the type of this layer
    pub fn kind(&self) -> LayerKind {
        self.data.kind()
    }

    pub fn tiles(&self) -> Option<&TileLayer> {
        match &self.data {
            LayerData::Tiles(tiles) => Some(tiles),
            _ => None,
        }
    }

    fn tiles_mut(&mut self) -> Option<&mut TileLayer> {
        if self.locked {
            return None;
        }
        match &mut self.data {
            LayerData::Tiles(tiles) => Some(tiles),
            _ => None,
        }
    }

    /// Place a tile. Does nothing on locked or non-tile layers.
    pub fn place_tile(&mut self, cell: CellCoord, tile: TileInfo) -> bool {
        match self.tiles_mut() {
            Some(tiles) => {
                tiles.set_tile(cell, tile);
                true
            }
            None => false,
        }
    }

    /// Remove a tile. Does nothing on locked or non-tile layers, or when the chunk is missing.
    pub fn remove_tile(&mut self, cell: CellCoord) -> Option<TileInfo> {
        self.tiles_mut()?.remove_tile(cell)
    }

    /// Tile at a cell, `None` for empty cells and non-tile layers
    pub fn tile_at(&self, cell: CellCoord) -> Option<&TileInfo> {
        self.tiles()?.get_tile(cell)
    }

    /// Objects on a shape-holding layer
    pub fn objects(&self) -> Option<&[MapObject]> {
        self.data.objects().map(Vec::as_slice)
    }

    fn objects_mut(&mut self) -> Option<&mut Vec<MapObject>> {
        if self.locked {
            return None;
        }
        self.data.objects_mut()
    }

    /// Find an object by id, returning its position in the layer's list
    pub fn find_object(&self, id: Uuid) -> Option<(usize, &MapObject)> {
        self.objects()?
            .iter()
            .enumerate()
            .find(|(_, o)| o.id == id)
    }

    /// Insert an object at `index` (clamped), or append when `index` is `None`
    pub fn insert_object(&mut self, index: Option<usize>, object: MapObject) -> bool {
        let Some(objects) = self.objects_mut() else {
            return false;
        };
        let index = index.unwrap_or(objects.len()).min(objects.len());
        objects.insert(index, object);
        true
    }

    /// Remove an object by id, returning its former index and value
    pub fn remove_object(&mut self, id: Uuid) -> Option<(usize, MapObject)> {
        let objects = self.objects_mut()?;
        let pos = objects.iter().position(|o| o.id == id)?;
        Some((pos, objects.remove(pos)))
    }

    /// Mutable access to an object by id, `None` on locked layers
    pub fn object_mut(&mut self, id: Uuid) -> Option<&mut MapObject> {
        self.objects_mut()?.iter_mut().find(|o| o.id == id)
    }
}

/// The type of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Tile,
    Object,
    Collision,
    Navigation,
    Trigger,
}

impl LayerKind {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerKind::Tile => "Tile Layer",
            LayerKind::Object => "Object Layer",
            LayerKind::Collision => "Collision Layer",
            LayerKind::Navigation => "Navigation Layer",
            LayerKind::Trigger => "Trigger Layer",
        }
    }
}

/// The data contained in a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerData {
    /// Sparse chunked tiles
    Tiles(TileLayer),
    /// Free-standing shapes and markers
    Objects { objects: Vec<MapObject> },
    /// Solid collision shapes
    Collision { shapes: Vec<MapObject> },
    /// Walkable regions
    Navigation { regions: Vec<MapObject> },
    /// Areas that fire an event on enter
    Triggers { triggers: Vec<MapObject> },
}

impl LayerData {
    pub fn empty(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Tile => LayerData::Tiles(TileLayer::new()),
            LayerKind::Object => LayerData::Objects {
                objects: Vec::new(),
            },
            LayerKind::Collision => LayerData::Collision { shapes: Vec::new() },
            LayerKind::Navigation => LayerData::Navigation {
                regions: Vec::new(),
            },
            LayerKind::Trigger => LayerData::Triggers {
                triggers: Vec::new(),
            },
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerData::Tiles(_) => LayerKind::Tile,
            LayerData::Objects { .. } => LayerKind::Object,
            LayerData::Collision { .. } => LayerKind::Collision,
            LayerData::Navigation { .. } => LayerKind::Navigation,
            LayerData::Triggers { .. } => LayerKind::Trigger,
        }
    }

    fn objects(&self) -> Option<&Vec<MapObject>> {
        match self {
            LayerData::Tiles(_) => None,
            LayerData::Objects { objects } => Some(objects),
            LayerData::Collision { shapes } => Some(shapes),
            LayerData::Navigation { regions } => Some(regions),
            LayerData::Triggers { triggers } => Some(triggers),
        }
    }

    fn objects_mut(&mut self) -> Option<&mut Vec<MapObject>> {
        match self {
            LayerData::Tiles(_) => None,
            LayerData::Objects { objects } => Some(objects),
            LayerData::Collision { shapes } => Some(shapes),
            LayerData::Navigation { regions } => Some(regions),
            LayerData::Triggers { triggers } => Some(triggers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tile_layer() {
        let layer = Layer::new_tile_layer("Ground");

        assert_eq!(layer.name, "Ground");
        assert!(layer.visible);
        assert!(!layer.locked);
        assert_eq!(layer.kind(), LayerKind::Tile);
        assert_eq!(layer.tiles().map(TileLayer::chunk_count), Some(0));
    }

    #[test]
    fn test_new_object_layer() {
        let layer = Layer::new_object_layer("Entities");

        assert_eq!(layer.name, "Entities");
        assert!(layer.visible);
        assert_eq!(layer.kind(), LayerKind::Object);
        assert!(layer.objects().unwrap().is_empty());
    }

    #[test]
    fn test_every_kind_round_trips_through_data() {
        for kind in [
            LayerKind::Tile,
            LayerKind::Object,
            LayerKind::Collision,
            LayerKind::Navigation,
            LayerKind::Trigger,
        ] {
            assert_eq!(Layer::new("L", kind).kind(), kind);
        }
    }

    #[test]
    fn test_locked_layer_ignores_edits() {
        let mut layer = Layer::new_tile_layer("Ground");
        let cell = CellCoord::new(1, 1);
        assert!(layer.place_tile(cell, TileInfo::new("Grass", 1)));

        layer.locked = true;
        assert!(!layer.place_tile(cell, TileInfo::new("Grass", 2)));
        assert_eq!(layer.remove_tile(cell), None);
        assert_eq!(layer.tile_at(cell), Some(&TileInfo::new("Grass", 1)));
    }

    #[test]
    fn test_tile_ops_on_object_layer_are_noops() {
        let mut layer = Layer::new_object_layer("Entities");
        assert!(!layer.place_tile(CellCoord::new(0, 0), TileInfo::new("Grass", 1)));
        assert_eq!(layer.tile_at(CellCoord::new(0, 0)), None);
    }

    #[test]
    fn test_object_insert_remove() {
        let mut layer = Layer::new("Walls", LayerKind::Collision);
        let a = MapObject::polygon("A", vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        let b = MapObject::polygon("B", vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]]);
        let (a_id, b_id) = (a.id, b.id);

        assert!(layer.insert_object(None, a));
        assert!(layer.insert_object(Some(0), b));
        assert_eq!(layer.find_object(b_id).map(|(i, _)| i), Some(0));

        let (index, removed) = layer.remove_object(a_id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.name, "A");
        assert!(layer.find_object(a_id).is_none());

        layer.locked = true;
        assert!(layer.remove_object(b_id).is_none());
        assert!(layer.object_mut(b_id).is_none());
    }

    #[test]
    fn test_insert_index_is_clamped() {
        let mut layer = Layer::new("Zones", LayerKind::Trigger);
        let zone = MapObject::polygon("Door", vec![]).with_property("event", "open_door");
        let id = zone.id;
        assert!(layer.insert_object(Some(99), zone));
        assert_eq!(layer.find_object(id).map(|(i, _)| i), Some(0));
    }
}
