//! Undoable map mutations
//!
//! Each constructor reads the map and captures exactly the state its command will
//! overwrite, before anything is executed. `apply` writes the new state and
//! `invert` writes the captured state back, removing tiles/objects that did not
//! exist before instead of leaving placeholders.

use tilekit_core::{CellCoord, Layer, Map, MapObject, ObjectTransform, TileInfo};
use uuid::Uuid;

use super::{Capability, CommandKind};

/// Polygon boolean operation that produced a reshape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

impl BooleanOp {
    pub fn display_name(&self) -> &'static str {
        match self {
            BooleanOp::Union => "Union",
            BooleanOp::Subtract => "Subtract",
            BooleanOp::Intersect => "Intersect",
        }
    }
}

/// A reversible change to the map. Layers are referenced by id so that
/// reordering layers between an edit and its undo does not retarget it.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    PlaceTile {
        layer: Uuid,
        cell: CellCoord,
        tile: TileInfo,
        /// Whatever occupied the cell before, `None` for an empty cell
        previous: Option<TileInfo>,
    },
    EraseTile {
        layer: Uuid,
        cell: CellCoord,
        previous: TileInfo,
    },
    AddObject {
        layer: Uuid,
        object: MapObject,
    },
    RemoveObject {
        layer: Uuid,
        object: MapObject,
        /// Position in the layer's object list, restored on undo
        index: usize,
    },
    AddPolygon {
        layer: Uuid,
        object: MapObject,
    },
    ReshapePolygon {
        layer: Uuid,
        object: Uuid,
        op: BooleanOp,
        before: Vec<[f32; 2]>,
        after: Vec<[f32; 2]>,
    },
    TransformObject {
        layer: Uuid,
        object: Uuid,
        before: ObjectTransform,
        after: ObjectTransform,
    },
    /// Applied front to back, undone back to front
    Compound {
        description: String,
        commands: Vec<EditCommand>,
    },
}

/// Layer that accepts edits: present and unlocked
fn editable_layer(map: &Map, id: Uuid) -> Option<&Layer> {
    map.layer_by_id(id).filter(|l| !l.locked)
}

impl EditCommand {
    /// Place `tile` at `cell`. `None` if the layer is missing, locked or not a tile layer.
    pub fn place_tile(map: &Map, layer: Uuid, cell: CellCoord, tile: TileInfo) -> Option<Self> {
        let target = editable_layer(map, layer)?;
        let previous = target.tiles()?.get_tile(cell).cloned();
        Some(EditCommand::PlaceTile {
            layer,
            cell,
            tile,
            previous,
        })
    }

    /// Erase the tile at `cell`. `None` if there is nothing to erase.
    pub fn erase_tile(map: &Map, layer: Uuid, cell: CellCoord) -> Option<Self> {
        let previous = editable_layer(map, layer)?.tile_at(cell)?.clone();
        Some(EditCommand::EraseTile {
            layer,
            cell,
            previous,
        })
    }

    /// Append an object to a shape layer
    pub fn add_object(map: &Map, layer: Uuid, object: MapObject) -> Option<Self> {
        editable_layer(map, layer)?.objects()?;
        Some(EditCommand::AddObject { layer, object })
    }

    /// Remove an object, remembering where it sat in the layer's list
    pub fn remove_object(map: &Map, layer: Uuid, object: Uuid) -> Option<Self> {
        let (index, found) = editable_layer(map, layer)?.find_object(object)?;
        Some(EditCommand::RemoveObject {
            layer,
            object: found.clone(),
            index,
        })
    }

    /// Add a polygon outline. Needs at least three points.
    pub fn add_polygon(
        map: &Map,
        layer: Uuid,
        name: impl Into<String>,
        points: Vec<[f32; 2]>,
    ) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        editable_layer(map, layer)?.objects()?;
        Some(EditCommand::AddPolygon {
            layer,
            object: MapObject::polygon(name, points),
        })
    }

    /// Replace a polygon's outline with the result of a boolean operation
    pub fn reshape_polygon(
        map: &Map,
        layer: Uuid,
        object: Uuid,
        op: BooleanOp,
        after: Vec<[f32; 2]>,
    ) -> Option<Self> {
        let (_, found) = editable_layer(map, layer)?.find_object(object)?;
        let before = found.polygon_points()?.to_vec();
        Some(EditCommand::ReshapePolygon {
            layer,
            object,
            op,
            before,
            after,
        })
    }

    /// Move/rotate/scale an object
    pub fn transform_object(
        map: &Map,
        layer: Uuid,
        object: Uuid,
        after: ObjectTransform,
    ) -> Option<Self> {
        let (_, found) = editable_layer(map, layer)?.find_object(object)?;
        Some(EditCommand::TransformObject {
            layer,
            object,
            before: found.transform,
            after,
        })
    }

    /// Bundle already-constructed commands. Each must have captured its pre-state
    /// against the effects of the ones before it; see [`CompoundBuilder`].
    pub fn compound(description: impl Into<String>, commands: Vec<EditCommand>) -> Self {
        EditCommand::Compound {
            description: description.into(),
            commands,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            EditCommand::PlaceTile { .. } => CommandKind::PlaceTile,
            EditCommand::EraseTile { .. } => CommandKind::EraseTile,
            EditCommand::AddObject { .. } => CommandKind::AddObject,
            EditCommand::RemoveObject { .. } => CommandKind::RemoveObject,
            EditCommand::AddPolygon { .. } => CommandKind::AddPolygon,
            EditCommand::ReshapePolygon { .. } => CommandKind::ReshapePolygon,
            EditCommand::TransformObject { .. } => CommandKind::TransformObject,
            EditCommand::Compound { .. } => CommandKind::Compound,
        }
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            EditCommand::PlaceTile { .. } | EditCommand::EraseTile { .. } => &[
                Capability::Undoable,
                Capability::TileEdit,
                Capability::ModifiesMap,
            ],
            EditCommand::AddObject { .. }
            | EditCommand::RemoveObject { .. }
            | EditCommand::AddPolygon { .. }
            | EditCommand::ReshapePolygon { .. }
            | EditCommand::TransformObject { .. } => &[
                Capability::Undoable,
                Capability::ObjectEdit,
                Capability::ModifiesMap,
            ],
            EditCommand::Compound { .. } => &[Capability::Undoable, Capability::ModifiesMap],
        }
    }

    /// Label for the Edit menu ("Undo Place Tile")
    pub fn description(&self) -> String {
        match self {
            EditCommand::PlaceTile { .. } => "Place Tile".to_string(),
            EditCommand::EraseTile { .. } => "Erase Tile".to_string(),
            EditCommand::AddObject { .. } => "Add Object".to_string(),
            EditCommand::RemoveObject { .. } => "Remove Object".to_string(),
            EditCommand::AddPolygon { .. } => "Add Polygon".to_string(),
            EditCommand::ReshapePolygon { op, .. } => {
                format!("Reshape Polygon ({})", op.display_name())
            }
            EditCommand::TransformObject { .. } => "Transform Object".to_string(),
            EditCommand::Compound { description, .. } => description.clone(),
        }
    }

    /// Layers this command writes to
    pub fn layers(&self) -> Vec<Uuid> {
        match self {
            EditCommand::PlaceTile { layer, .. }
            | EditCommand::EraseTile { layer, .. }
            | EditCommand::AddObject { layer, .. }
            | EditCommand::RemoveObject { layer, .. }
            | EditCommand::AddPolygon { layer, .. }
            | EditCommand::ReshapePolygon { layer, .. }
            | EditCommand::TransformObject { layer, .. } => vec![*layer],
            EditCommand::Compound { commands, .. } => {
                let mut layers: Vec<Uuid> = commands.iter().flat_map(|c| c.layers()).collect();
                layers.sort_unstable();
                layers.dedup();
                layers
            }
        }
    }

    /// True if any layer this command writes to is currently locked
    pub fn touches_locked_layer(&self, map: &Map) -> bool {
        self.layers()
            .into_iter()
            .any(|id| map.layer_by_id(id).is_some_and(|l| l.locked))
    }

    /// Write the new state
    pub fn apply(&self, map: &mut Map) {
        match self {
            EditCommand::PlaceTile {
                layer, cell, tile, ..
            } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    layer.place_tile(*cell, tile.clone());
                }
            }
            EditCommand::EraseTile { layer, cell, .. } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    layer.remove_tile(*cell);
                }
            }
            EditCommand::AddObject { layer, object } | EditCommand::AddPolygon { layer, object } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    layer.insert_object(None, object.clone());
                }
            }
            EditCommand::RemoveObject { layer, object, .. } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    layer.remove_object(object.id);
                }
            }
            EditCommand::ReshapePolygon {
                layer,
                object,
                after,
                ..
            } => set_outline(map, *layer, *object, after),
            EditCommand::TransformObject {
                layer,
                object,
                after,
                ..
            } => set_transform(map, *layer, *object, *after),
            EditCommand::Compound { commands, .. } => {
                for command in commands {
                    command.apply(map);
                }
            }
        }
    }

    /// Write the captured state back
    pub fn invert(&self, map: &mut Map) {
        match self {
            EditCommand::PlaceTile {
                layer,
                cell,
                previous,
                ..
            } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    match previous {
                        Some(previous) => {
                            layer.place_tile(*cell, previous.clone());
                        }
                        None => {
                            layer.remove_tile(*cell);
                        }
                    }
                }
            }
            EditCommand::EraseTile {
                layer,
                cell,
                previous,
            } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    layer.place_tile(*cell, previous.clone());
                }
            }
            EditCommand::AddObject { layer, object } | EditCommand::AddPolygon { layer, object } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    layer.remove_object(object.id);
                }
            }
            EditCommand::RemoveObject {
                layer,
                object,
                index,
            } => {
                if let Some(layer) = map.layer_by_id_mut(*layer) {
                    layer.insert_object(Some(*index), object.clone());
                }
            }
            EditCommand::ReshapePolygon {
                layer,
                object,
                before,
                ..
            } => set_outline(map, *layer, *object, before),
            EditCommand::TransformObject {
                layer,
                object,
                before,
                ..
            } => set_transform(map, *layer, *object, *before),
            EditCommand::Compound { commands, .. } => {
                // Later commands captured state produced by earlier ones
                for command in commands.iter().rev() {
                    command.invert(map);
                }
            }
        }
    }
}

fn set_outline(map: &mut Map, layer: Uuid, object: Uuid, points: &[[f32; 2]]) {
    if let Some(object) = map
        .layer_by_id_mut(layer)
        .and_then(|l| l.object_mut(object))
    {
        object.set_polygon_points(points.to_vec());
    }
}

fn set_transform(map: &mut Map, layer: Uuid, object: Uuid, transform: ObjectTransform) {
    if let Some(object) = map
        .layer_by_id_mut(layer)
        .and_then(|l| l.object_mut(object))
    {
        object.transform = transform;
    }
}

/// Builds a [`EditCommand::Compound`] whose parts capture pre-state in sequence.
///
/// Every pushed command is applied to the map immediately so the next constructor
/// sees its effect; [`CompoundBuilder::finish`] (or dropping the builder) rolls all
/// of them back, leaving the map exactly as it was found.
pub struct CompoundBuilder<'a> {
    map: &'a mut Map,
    description: String,
    commands: Vec<EditCommand>,
}

impl<'a> CompoundBuilder<'a> {
    pub fn new(map: &'a mut Map, description: impl Into<String>) -> Self {
        Self {
            map,
            description: description.into(),
            commands: Vec::new(),
        }
    }

    /// The map with every pushed command applied
    pub fn map(&self) -> &Map {
        self.map
    }

    /// Construct a command against the staged map and stage it.
    /// Returns `false` when the constructor declined.
    pub fn push_with(&mut self, build: impl FnOnce(&Map) -> Option<EditCommand>) -> bool {
        match build(self.map) {
            Some(command) => {
                command.apply(self.map);
                self.commands.push(command);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn rollback(&mut self) {
        for command in self.commands.iter().rev() {
            command.invert(self.map);
        }
    }

    /// Restore the map and return the compound, or `None` if nothing was staged
    pub fn finish(mut self) -> Option<EditCommand> {
        self.rollback();
        let commands = std::mem::take(&mut self.commands);
        if commands.is_empty() {
            return None;
        }
        Some(EditCommand::compound(
            std::mem::take(&mut self.description),
            commands,
        ))
    }
}

impl Drop for CompoundBuilder<'_> {
    fn drop(&mut self) {
        self.rollback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_core::{LayerKind, ObjectShape, Rotation};

    fn map_with_tiles() -> (Map, Uuid) {
        let map = Map::new("Test");
        let id = map.active_layer().id;
        (map, id)
    }

    fn tile_at(map: &Map, layer: Uuid, x: i32, y: i32) -> Option<TileInfo> {
        map.layer_by_id(layer)
            .and_then(|l| l.tile_at(CellCoord::new(x, y)))
            .cloned()
    }

    #[test]
    fn test_place_on_empty_cell_undoes_to_empty() {
        let (mut map, layer) = map_with_tiles();
        let cmd =
            EditCommand::place_tile(&map, layer, CellCoord::new(2, 2), TileInfo::new("Grass", 3))
                .unwrap();

        cmd.apply(&mut map);
        assert_eq!(tile_at(&map, layer, 2, 2), Some(TileInfo::new("Grass", 3)));

        cmd.invert(&mut map);
        assert_eq!(tile_at(&map, layer, 2, 2), None);
        assert_eq!(map.layer_by_id(layer).unwrap().tiles().unwrap().tile_count(), 0);
    }

    #[test]
    fn test_place_over_existing_restores_previous() {
        let (mut map, layer) = map_with_tiles();
        let cell = CellCoord::new(-5, 9);
        map.layer_by_id_mut(layer)
            .unwrap()
            .place_tile(cell, TileInfo::new("Water", 1).with_rotation(Rotation::R270));

        let cmd = EditCommand::place_tile(&map, layer, cell, TileInfo::new("Grass", 3)).unwrap();
        cmd.apply(&mut map);
        cmd.invert(&mut map);

        let restored = tile_at(&map, layer, -5, 9).unwrap();
        assert_eq!(restored, TileInfo::new("Water", 1));
        assert_eq!(restored.rotation, Rotation::R270);
    }

    #[test]
    fn test_erase_requires_a_tile() {
        let (mut map, layer) = map_with_tiles();
        assert!(EditCommand::erase_tile(&map, layer, CellCoord::new(0, 0)).is_none());

        map.layer_by_id_mut(layer)
            .unwrap()
            .place_tile(CellCoord::new(0, 0), TileInfo::new("Grass", 1));
        let erase = EditCommand::erase_tile(&map, layer, CellCoord::new(0, 0)).unwrap();
        erase.apply(&mut map);
        assert_eq!(tile_at(&map, layer, 0, 0), None);
        erase.invert(&mut map);
        assert_eq!(tile_at(&map, layer, 0, 0), Some(TileInfo::new("Grass", 1)));
    }

    #[test]
    fn test_locked_or_wrong_layer_yields_no_command() {
        let (mut map, layer) = map_with_tiles();
        let objects = map.add_layer(Layer::new_object_layer("Objects"));
        let objects_id = map.layer(objects).unwrap().id;

        assert!(EditCommand::place_tile(&map, objects_id, CellCoord::new(0, 0), TileInfo::new("A", 1)).is_none());
        assert!(EditCommand::place_tile(&map, Uuid::new_v4(), CellCoord::new(0, 0), TileInfo::new("A", 1)).is_none());
        assert!(EditCommand::add_object(&map, layer, MapObject::polygon("P", vec![])).is_none());

        map.toggle_layer_lock(0);
        assert!(EditCommand::place_tile(&map, layer, CellCoord::new(0, 0), TileInfo::new("A", 1)).is_none());
    }

    #[test]
    fn test_compound_with_positional_dependencies() {
        let (mut map, layer) = map_with_tiles();
        let cell = CellCoord::new(1, 1);
        map.layer_by_id_mut(layer)
            .unwrap()
            .place_tile(cell, TileInfo::new("Base", 0));
        let original = map.clone();

        let mut builder = CompoundBuilder::new(&mut map, "Stack");
        for id in 1..=3 {
            assert!(builder.push_with(|m| {
                EditCommand::place_tile(m, layer, cell, TileInfo::new("Stack", id))
            }));
        }
        let compound = builder.finish().unwrap();
        assert_eq!(map, original);

        // Each part remembered what the previous part left behind
        let EditCommand::Compound { commands, .. } = &compound else {
            panic!("expected compound");
        };
        let previous: Vec<_> = commands
            .iter()
            .map(|c| match c {
                EditCommand::PlaceTile { previous, .. } => previous.clone().map(|t| t.tile_id),
                _ => None,
            })
            .collect();
        assert_eq!(previous, vec![Some(0), Some(1), Some(2)]);

        compound.apply(&mut map);
        assert_eq!(tile_at(&map, layer, 1, 1), Some(TileInfo::new("Stack", 3)));
        compound.invert(&mut map);
        assert_eq!(map, original);
    }

    #[test]
    fn test_dropped_builder_rolls_back() {
        let (mut map, layer) = map_with_tiles();
        let original = map.clone();
        {
            let mut builder = CompoundBuilder::new(&mut map, "Abandoned");
            builder.push_with(|m| {
                EditCommand::place_tile(m, layer, CellCoord::new(0, 0), TileInfo::new("A", 1))
            });
            assert_eq!(builder.len(), 1);
        }
        assert_eq!(map, original);
    }

    #[test]
    fn test_empty_builder_finishes_to_none() {
        let (mut map, _) = map_with_tiles();
        let builder = CompoundBuilder::new(&mut map, "Nothing");
        assert!(builder.finish().is_none());
    }

    #[test]
    fn test_remove_object_restores_index() {
        let mut map = Map::with_layer("Test", Layer::new("Walls", LayerKind::Collision));
        let layer = map.active_layer().id;
        let ids: Vec<Uuid> = (0..3)
            .map(|i| {
                let object = MapObject::polygon(format!("W{i}"), vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
                let id = object.id;
                map.active_layer_mut().insert_object(None, object);
                id
            })
            .collect();
        let original = map.clone();

        let remove = EditCommand::remove_object(&map, layer, ids[1]).unwrap();
        remove.apply(&mut map);
        assert!(map.active_layer().find_object(ids[1]).is_none());
        remove.invert(&mut map);
        assert_eq!(map, original);
    }

    #[test]
    fn test_polygon_add_reshape_transform() {
        let mut map = Map::with_layer("Test", Layer::new("Nav", LayerKind::Navigation));
        let layer = map.active_layer().id;
        let square = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];

        assert!(EditCommand::add_polygon(&map, layer, "Bad", vec![[0.0, 0.0]]).is_none());
        let add = EditCommand::add_polygon(&map, layer, "Room", square.clone()).unwrap();
        add.apply(&mut map);
        let id = map.active_layer().objects().unwrap()[0].id;

        let grown = vec![[0.0, 0.0], [8.0, 0.0], [8.0, 4.0], [0.0, 4.0]];
        let reshape =
            EditCommand::reshape_polygon(&map, layer, id, BooleanOp::Union, grown.clone()).unwrap();
        assert_eq!(reshape.description(), "Reshape Polygon (Union)");
        reshape.apply(&mut map);
        assert_eq!(map.active_layer().find_object(id).unwrap().1.polygon_points(), Some(&grown[..]));

        let moved = ObjectTransform::at([10.0, 20.0]);
        let transform = EditCommand::transform_object(&map, layer, id, moved).unwrap();
        transform.apply(&mut map);
        assert_eq!(map.active_layer().find_object(id).unwrap().1.transform, moved);

        transform.invert(&mut map);
        reshape.invert(&mut map);
        let restored = map.active_layer().find_object(id).unwrap().1;
        assert_eq!(restored.polygon_points(), Some(&square[..]));
        assert_eq!(restored.transform, ObjectTransform::default());

        add.invert(&mut map);
        assert!(map.active_layer().objects().unwrap().is_empty());
    }

    #[test]
    fn test_reshape_requires_polygon() {
        let mut map = Map::with_layer("Test", Layer::new_object_layer("Objects"));
        let layer = map.active_layer().id;
        let point = MapObject::new("Spawn", ObjectShape::Point, ObjectTransform::default());
        let id = point.id;
        map.active_layer_mut().insert_object(None, point);

        assert!(EditCommand::reshape_polygon(&map, layer, id, BooleanOp::Subtract, vec![]).is_none());
        assert!(EditCommand::transform_object(&map, layer, id, ObjectTransform::at([1.0, 1.0])).is_some());
    }

    #[test]
    fn test_touches_locked_layer() {
        let (mut map, layer) = map_with_tiles();
        let cmd =
            EditCommand::place_tile(&map, layer, CellCoord::new(0, 0), TileInfo::new("A", 1)).unwrap();
        let compound = EditCommand::compound("Both", vec![cmd.clone(), cmd.clone()]);
        assert_eq!(compound.layers(), vec![layer]);
        assert!(!compound.touches_locked_layer(&map));

        map.toggle_layer_lock(0);
        assert!(cmd.touches_locked_layer(&map));
        assert!(compound.touches_locked_layer(&map));
    }

    #[test]
    fn test_missing_layer_is_noop_both_ways() {
        let (mut map, layer) = map_with_tiles();
        let cmd =
            EditCommand::place_tile(&map, layer, CellCoord::new(0, 0), TileInfo::new("A", 1)).unwrap();
        map.add_layer_below(0, Layer::new_tile_layer("Other"));
        map.delete_layer(0);
        let snapshot = map.clone();

        cmd.apply(&mut map);
        cmd.invert(&mut map);
        assert_eq!(map, snapshot);
    }
}
