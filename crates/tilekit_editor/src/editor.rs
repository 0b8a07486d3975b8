//! The editing kernel: context plus a bus with every controller registered

use std::path::PathBuf;
use tilekit_core::Map;

use crate::bus::{EventBus, Topic};
use crate::commands::Command;
use crate::context::EditorContext;
use crate::controllers::{
    Controller, LayerController, MapController, TilesetController, ToolController,
};
use crate::history::{HistoryController, HistoryState};
use crate::preferences::EditorPreferences;

/// Owns the editor state and routes published commands to the controllers.
///
/// Input and UI code only ever call [`Editor::publish`]; they read state back
/// through the accessors.
#[derive(Debug)]
pub struct Editor {
    ctx: EditorContext,
    bus: EventBus,
}

impl Editor {
    pub fn new(preferences: EditorPreferences) -> Self {
        let mut bus = EventBus::new();
        let controllers: [&dyn Controller; 5] = [
            &HistoryController,
            &ToolController,
            &LayerController,
            &TilesetController,
            &MapController,
        ];
        for controller in controllers {
            controller.register(&mut bus);
        }
        Self {
            ctx: EditorContext::new(preferences),
            bus,
        }
    }

    /// Persist preference changes to `path` from now on
    pub fn set_preferences_path(&mut self, path: Option<PathBuf>) {
        self.ctx.preferences_path = path;
    }

    pub fn publish(&mut self, command: impl Into<Command>) {
        self.bus.publish(&mut self.ctx, command);
    }

    pub fn publish_opt(&mut self, command: Option<impl Into<Command>>) {
        self.bus.publish_opt(&mut self.ctx, command);
    }

    /// Add a handler next to the built-in controllers, e.g. to refresh a view on
    /// every map change
    pub fn subscribe<F>(&mut self, topic: impl Into<Topic>, handler: F)
    where
        F: Fn(&mut EditorContext, &mut EventBus, &Command) + 'static,
    {
        self.bus.subscribe(topic, handler);
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn map(&self) -> &Map {
        &self.ctx.map
    }

    pub fn history(&self) -> &HistoryState {
        &self.ctx.history
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorPreferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Capability, EditCommand, LayerPosition, MenuAction, MoveDirection};
    use crate::context::EditorTool;
    use std::cell::Cell;
    use std::rc::Rc;
    use tilekit_core::{CellCoord, ChunkCoord, LayerKind, LocalCoord, TileInfo, Tileset};

    fn editor_with_grass() -> Editor {
        let mut editor = Editor::default();
        editor.publish(Command::LoadTileset(Tileset::new(
            "Grass", "grass.png", 16, 16, 4, 16,
        )));
        editor
    }

    #[test]
    fn test_place_erase_undo_scenario() {
        let mut editor = editor_with_grass();
        let layer = editor.map().active_layer().id;
        let cell = CellCoord::new(2, 2);

        let place = EditCommand::place_tile(editor.map(), layer, cell, TileInfo::new("Grass", 3));
        editor.publish_opt(place);
        let chunk = editor
            .map()
            .active_layer()
            .tiles()
            .and_then(|t| t.chunk(ChunkCoord::new(0, 0)))
            .unwrap();
        assert_eq!(chunk.get(LocalCoord::new(2, 2)), Some(&TileInfo::new("Grass", 3)));

        let erase = EditCommand::erase_tile(editor.map(), layer, cell);
        editor.publish_opt(erase);
        assert_eq!(editor.map().tile_at(0, cell), None);

        editor.publish(MenuAction::Undo);
        assert_eq!(editor.map().tile_at(0, cell), Some(&TileInfo::new("Grass", 3)));
        assert_eq!(editor.history().redo_description().as_deref(), Some("Erase Tile"));
    }

    #[test]
    fn test_undo_redo_through_tools() {
        let mut editor = editor_with_grass();
        editor.publish(Command::SelectTool(EditorTool::Paint));
        let mut after = Vec::new();
        for i in 0..6 {
            editor.publish(Command::SelectTile { tile_id: i, rotation: None });
            editor.publish(Command::ApplyTool {
                cell: CellCoord::new(i as i32 - 3, -(i as i32)),
            });
            after.push(editor.map().clone());
        }
        let before_redo = editor.map().clone();

        for _ in 0..6 {
            editor.publish(MenuAction::Undo);
        }
        assert_eq!(editor.map().active_layer().tiles().unwrap().tile_count(), 0);
        for _ in 0..6 {
            editor.publish(MenuAction::Redo);
        }
        assert_eq!(editor.map(), &before_redo);
        assert_eq!(editor.map(), after.last().unwrap());
    }

    #[test]
    fn test_undo_follows_layer_after_reorder() {
        let mut editor = editor_with_grass();
        let ground = editor.map().active_layer().id;
        let place = EditCommand::place_tile(
            editor.map(),
            ground,
            CellCoord::new(0, 0),
            TileInfo::new("Grass", 1),
        );
        editor.publish_opt(place);

        editor.publish(Command::AddLayer {
            position: LayerPosition::Below(0),
            kind: LayerKind::Tile,
            name: Some("Detail".to_string()),
        });
        editor.publish(Command::MoveLayer {
            index: 1,
            direction: MoveDirection::Up,
        });
        assert_eq!(editor.map().layers()[1].id, ground);

        editor.publish(MenuAction::Undo);
        assert_eq!(editor.map().tile_at(1, CellCoord::new(0, 0)), None);
        assert_eq!(editor.map().tile_at(0, CellCoord::new(0, 0)), None);
    }

    #[test]
    fn test_delete_last_layer_refused() {
        let mut editor = Editor::default();
        editor.publish(Command::DeleteLayer { index: 0 });
        assert_eq!(editor.map().layer_count(), 1);
    }

    #[test]
    fn test_external_subscriber_sees_map_changes() {
        let mut editor = editor_with_grass();
        let changes = Rc::new(Cell::new(0));
        let seen = changes.clone();
        editor.subscribe(Capability::ModifiesMap, move |_, _, _| seen.set(seen.get() + 1));

        editor.publish(Command::SelectTool(EditorTool::Rectangle));
        editor.publish(Command::SelectTile { tile_id: 2, rotation: None });
        editor.publish(Command::FillRect {
            min: CellCoord::new(0, 0),
            max: CellCoord::new(2, 2),
        });
        editor.publish(Command::ToggleLayerVisibility { index: 0 });

        // Fill compound plus the visibility toggle; tool and tile selection do not count
        assert_eq!(changes.get(), 2);
        assert!(editor.context().dirty);
    }
}
