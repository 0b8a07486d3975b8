//! Map: the ordered layer stack being edited

use crate::{CellCoord, Layer, TileInfo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to the layer every fresh map starts with
pub const DEFAULT_LAYER_NAME: &str = "Layer 1";

/// A map made of an ordered stack of layers.
///
/// Index 0 is the top of the stack: it is listed first in the layer panel and
/// drawn last. A map always holds at least one layer and `active_layer` always
/// points at one of them; every mutating method re-establishes both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: Uuid,
    pub name: String,
    layers: Vec<Layer>,
    #[serde(default)]
    active_layer: usize,
}

impl Default for Map {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Map {
    /// Create a map with a single empty tile layer
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_layer(name, Layer::new_tile_layer(DEFAULT_LAYER_NAME))
    }

    /// Create a map whose only layer is `layer`
    pub fn with_layer(name: impl Into<String>, layer: Layer) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layers: vec![layer],
            active_layer: 0,
        }
    }

    /// Restore the layer invariants after loading untrusted data
    pub fn ensure_invariants(&mut self) {
        if self.layers.is_empty() {
            self.layers.push(Layer::new_tile_layer(DEFAULT_LAYER_NAME));
        }
        self.active_layer = self.active_layer.min(self.layers.len() - 1);
    }

    /// Layers from top to bottom
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Get layer by index
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Get mutable layer by index
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Current position of a layer in the stack
    pub fn layer_index(&self, id: Uuid) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn layer_by_id(&self, id: Uuid) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_by_id_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn active_layer_index(&self) -> usize {
        self.active_layer
    }

    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active_layer]
    }

    pub fn active_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.active_layer]
    }

    /// Make a layer active. The index is clamped to the stack.
    pub fn set_active_layer(&mut self, index: usize) {
        self.active_layer = index.min(self.layers.len() - 1);
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.layers.len() - 1)
    }

    /// Insert a layer directly above `index` (clamped) and make it active. Returns its index.
    pub fn add_layer_above(&mut self, index: usize, layer: Layer) -> usize {
        let at = self.clamp_index(index);
        self.layers.insert(at, layer);
        self.active_layer = at;
        at
    }

    /// Insert a layer directly below `index` (clamped) and make it active. Returns its index.
    pub fn add_layer_below(&mut self, index: usize, layer: Layer) -> usize {
        let at = self.clamp_index(index) + 1;
        self.layers.insert(at, layer);
        self.active_layer = at;
        at
    }

    /// Add a layer at the bottom of the stack without changing the active layer
    pub fn add_layer(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Move a layer up (toward index 0)
    pub fn move_layer_up(&mut self, index: usize) -> bool {
        if index > 0 && index < self.layers.len() {
            self.swap_layers(index, index - 1);
            true
        } else {
            false
        }
    }

    /// Move a layer down (toward higher index)
    pub fn move_layer_down(&mut self, index: usize) -> bool {
        if index + 1 < self.layers.len() {
            self.swap_layers(index, index + 1);
            true
        } else {
            false
        }
    }

    fn swap_layers(&mut self, a: usize, b: usize) {
        self.layers.swap(a, b);
        if self.active_layer == a {
            self.active_layer = b;
        } else if self.active_layer == b {
            self.active_layer = a;
        }
    }

    /// Remove a layer by index. Refused when out of range or when it is the last layer.
    pub fn delete_layer(&mut self, index: usize) -> Option<Layer> {
        if self.layers.len() <= 1 || index >= self.layers.len() {
            return None;
        }
        let removed = self.layers.remove(index);
        if self.active_layer > index {
            self.active_layer -= 1;
        }
        self.active_layer = self.clamp_index(self.active_layer);
        Some(removed)
    }

    /// Toggle layer visibility
    pub fn toggle_layer_visibility(&mut self, index: usize) -> bool {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.visible = !layer.visible;
            true
        } else {
            false
        }
    }

    /// Toggle whether a layer accepts edits
    pub fn toggle_layer_lock(&mut self, index: usize) -> bool {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.locked = !layer.locked;
            true
        } else {
            false
        }
    }

    /// Toggle a layer's fold state in the layer panel
    pub fn toggle_layer_expanded(&mut self, index: usize) -> bool {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.expanded = !layer.expanded;
            true
        } else {
            false
        }
    }

    /// Rename a layer. Empty names are refused.
    pub fn rename_layer(&mut self, index: usize, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.trim().is_empty() {
            return false;
        }
        if let Some(layer) = self.layers.get_mut(index) {
            layer.name = name;
            true
        } else {
            false
        }
    }

    /// Get tile at a cell on a specific layer
    pub fn tile_at(&self, layer_index: usize, cell: CellCoord) -> Option<&TileInfo> {
        self.layers.get(layer_index)?.tile_at(cell)
    }

    /// Get all cells in an inclusive region of a layer, empty ones included
    pub fn tiles_in_region(
        &self,
        layer_index: usize,
        min: CellCoord,
        max: CellCoord,
    ) -> Vec<(CellCoord, Option<TileInfo>)> {
        let mut tiles = Vec::new();
        for y in min.y.min(max.y)..=min.y.max(max.y) {
            for x in min.x.min(max.x)..=min.x.max(max.x) {
                let cell = CellCoord::new(x, y);
                tiles.push((cell, self.tile_at(layer_index, cell).cloned()));
            }
        }
        tiles
    }

    /// Visible layers in draw order (bottom first)
    pub fn draw_order(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().rev().filter(|l| l.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayerKind;

    fn names(map: &Map) -> Vec<&str> {
        map.layers().iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_new_map_has_one_layer() {
        let map = Map::new("Test Map");
        assert_eq!(map.name, "Test Map");
        assert_eq!(map.layer_count(), 1);
        assert_eq!(map.active_layer().name, DEFAULT_LAYER_NAME);
    }

    #[test]
    fn test_add_above_and_below() {
        let mut map = Map::new("Test");
        assert_eq!(map.add_layer_above(0, Layer::new_tile_layer("Top")), 0);
        assert_eq!(map.add_layer_below(1, Layer::new_object_layer("Bottom")), 2);
        assert_eq!(names(&map), vec!["Top", DEFAULT_LAYER_NAME, "Bottom"]);
        assert_eq!(map.active_layer_index(), 2);

        // Out-of-range index is clamped to the last layer
        assert_eq!(map.add_layer_below(99, Layer::new_tile_layer("Deep")), 3);
        assert_eq!(map.add_layer_above(99, Layer::new_tile_layer("Mid")), 3);
        assert_eq!(names(&map), vec!["Top", DEFAULT_LAYER_NAME, "Bottom", "Mid", "Deep"]);
    }

    #[test]
    fn test_move_layers_with_boundaries() {
        let mut map = Map::new("Test");
        map.add_layer_below(0, Layer::new_tile_layer("B"));
        map.set_active_layer(0);

        assert!(!map.move_layer_up(0));
        assert!(!map.move_layer_down(1));
        assert!(!map.move_layer_down(42));

        assert!(map.move_layer_down(0));
        assert_eq!(names(&map), vec!["B", DEFAULT_LAYER_NAME]);
        // Active layer follows the moved layer
        assert_eq!(map.active_layer().name, DEFAULT_LAYER_NAME);

        assert!(map.move_layer_up(1));
        assert_eq!(names(&map), vec![DEFAULT_LAYER_NAME, "B"]);
        assert_eq!(map.active_layer_index(), 0);
    }

    #[test]
    fn test_delete_last_layer_is_refused() {
        let mut map = Map::new("Test");
        assert!(map.delete_layer(0).is_none());
        assert_eq!(map.layer_count(), 1);
    }

    #[test]
    fn test_delete_keeps_active_index_valid() {
        let mut map = Map::new("Test");
        map.add_layer_below(0, Layer::new_tile_layer("B"));
        map.add_layer_below(1, Layer::new_tile_layer("C"));
        assert_eq!(map.active_layer_index(), 2);

        assert!(map.delete_layer(5).is_none());
        assert_eq!(map.delete_layer(2).map(|l| l.name), Some("C".to_string()));
        assert_eq!(map.active_layer_index(), 1);

        map.set_active_layer(1);
        assert!(map.delete_layer(0).is_some());
        assert_eq!(map.active_layer().name, "B");
        assert!(map.delete_layer(0).is_none());
    }

    #[test]
    fn test_random_operations_keep_at_least_one_layer() {
        let mut map = Map::new("Test");
        for step in 0..200usize {
            let index = (step * 7) % 5;
            match step % 5 {
                0 => {
                    map.add_layer_above(index, Layer::new("L", LayerKind::Object));
                }
                1 | 2 => {
                    map.delete_layer(index);
                }
                3 => {
                    map.move_layer_up(index);
                }
                _ => {
                    map.move_layer_down(index);
                }
            }
            assert!(map.layer_count() >= 1);
            assert!(map.active_layer_index() < map.layer_count());
        }
    }

    #[test]
    fn test_toggles_and_rename() {
        let mut map = Map::new("Test");
        assert!(map.toggle_layer_visibility(0));
        assert!(!map.layer(0).unwrap().visible);
        assert!(map.toggle_layer_lock(0));
        assert!(map.layer(0).unwrap().locked);
        assert!(map.toggle_layer_expanded(0));
        assert!(!map.layer(0).unwrap().expanded);
        assert!(!map.toggle_layer_visibility(3));

        assert!(map.rename_layer(0, "Ground"));
        assert!(!map.rename_layer(0, "   "));
        assert_eq!(map.layer(0).unwrap().name, "Ground");
    }

    #[test]
    fn test_ensure_invariants_repairs_loaded_map() {
        let mut map: Map = serde_json::from_str(&format!(
            r#"{{"id":"{}","name":"Broken","layers":[],"active_layer":7}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        map.ensure_invariants();
        assert_eq!(map.layer_count(), 1);
        assert_eq!(map.active_layer_index(), 0);
    }

    #[test]
    fn test_tiles_in_region_includes_empty_cells() {
        let mut map = Map::new("Test");
        map.active_layer_mut()
            .place_tile(CellCoord::new(-1, 0), TileInfo::new("Grass", 1));
        let region = map.tiles_in_region(0, CellCoord::new(0, 1), CellCoord::new(-1, 0));
        assert_eq!(region.len(), 4);
        assert_eq!(region[0], (CellCoord::new(-1, 0), Some(TileInfo::new("Grass", 1))));
        assert!(region[1..].iter().all(|(_, t)| t.is_none()));
    }

    #[test]
    fn test_draw_order_skips_hidden() {
        let mut map = Map::new("Test");
        map.add_layer_above(0, Layer::new_tile_layer("Top"));
        map.toggle_layer_visibility(1);
        let drawn: Vec<_> = map.draw_order().map(|l| l.name.as_str()).collect();
        assert_eq!(drawn, vec!["Top"]);
    }
}
