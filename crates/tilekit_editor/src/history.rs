//! Undo/redo history of executed [`EditCommand`]s

use bevy::log::{debug, warn};
use tilekit_core::Map;

use crate::bus::EventBus;
use crate::commands::{Capability, Command, CommandKind, EditCommand, MenuAction};
use crate::controllers::Controller;

/// Undo and redo stacks.
///
/// Executing a new command clears the redo stack. When `max_depth` is non-zero the
/// oldest entries are dropped once the undo stack grows past it.
#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
    max_depth: usize,
}

impl HistoryState {
    /// `max_depth` of 0 keeps everything
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Apply a command, record it and clear the redo stack.
    ///
    /// A command aimed at a locked layer is still recorded; the layer ignores the
    /// write. Returns `false` in that case.
    pub fn execute(&mut self, command: EditCommand, map: &mut Map) -> bool {
        let writable = !command.touches_locked_layer(map);
        if !writable {
            warn!("{} on a locked layer has no effect", command.description());
        }
        command.apply(map);
        debug!("Executed {}", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();
        self.trim();
        writable
    }

    /// Revert the most recent command and move it to the redo stack.
    /// Returns `false` only when there was nothing to undo.
    pub fn undo(&mut self, map: &mut Map) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        if command.touches_locked_layer(map) {
            warn!("Undo {} on a locked layer has no effect", command.description());
        }
        command.invert(map);
        debug!("Undo {}", command.description());
        self.redo_stack.push(command);
        true
    }

    /// Re-apply the most recently undone command and move it back to the undo stack
    pub fn redo(&mut self, map: &mut Map) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        if command.touches_locked_layer(map) {
            warn!("Redo {} on a locked layer has no effect", command.description());
        }
        command.apply(map);
        debug!("Redo {}", command.description());
        self.undo_stack.push(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the command `undo` would revert
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(EditCommand::description)
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(EditCommand::description)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        self.trim();
    }

    fn trim(&mut self) {
        if self.max_depth > 0 && self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..excess);
        }
    }
}

/// Executes undoable commands and handles Undo/Redo menu actions
pub struct HistoryController;

impl Controller for HistoryController {
    fn register(&self, bus: &mut EventBus) {
        bus.subscribe(Capability::Undoable, |ctx, _, command| {
            if let Command::Edit(edit) = command {
                ctx.dirty |= ctx.history.execute(edit.clone(), &mut ctx.map);
            }
        });

        bus.subscribe(CommandKind::Menu, |ctx, _, command| {
            let changed = match command {
                Command::Menu(MenuAction::Undo) => ctx.history.undo(&mut ctx.map),
                Command::Menu(MenuAction::Redo) => ctx.history.redo(&mut ctx.map),
                _ => false,
            };
            ctx.dirty |= changed;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_core::{CellCoord, TileInfo};

    fn place(map: &Map, x: i32, tile_id: u32) -> EditCommand {
        let layer = map.active_layer().id;
        EditCommand::place_tile(map, layer, CellCoord::new(x, 0), TileInfo::new("A", tile_id))
            .unwrap()
    }

    #[test]
    fn test_undo_all_then_redo_all() {
        let mut map = Map::new("Test");
        let mut history = HistoryState::new(0);
        let original = map.clone();

        let mut snapshots = Vec::new();
        for i in 0..5 {
            // Overlapping cells so later commands capture earlier ones
            let cmd = place(&map, i % 2, i as u32);
            history.execute(cmd, &mut map);
            snapshots.push(map.clone());
        }

        for _ in 0..5 {
            assert!(history.undo(&mut map));
        }
        assert_eq!(map, original);
        assert!(!history.undo(&mut map));

        for snapshot in &snapshots {
            assert!(history.redo(&mut map));
            assert_eq!(&map, snapshot);
        }
        assert!(!history.redo(&mut map));
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut map = Map::new("Test");
        let mut history = HistoryState::new(0);
        history.execute(place(&map, 0, 1), &mut map);
        history.undo(&mut map);
        assert!(history.can_redo());

        history.execute(place(&map, 1, 2), &mut map);
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut map = Map::new("Test");
        let snapshot = map.clone();
        let mut history = HistoryState::default();
        assert!(!history.undo(&mut map));
        assert!(!history.redo(&mut map));
        assert_eq!(map, snapshot);
        assert_eq!(history.undo_description(), None);
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut map = Map::new("Test");
        let mut history = HistoryState::new(2);
        for i in 0..4 {
            history.execute(place(&map, i, i as u32), &mut map);
        }
        assert_eq!(history.undo_len(), 2);
        history.undo(&mut map);
        history.undo(&mut map);
        // The two oldest placements are no longer reversible
        assert_eq!(map.active_layer().tiles().unwrap().tile_count(), 2);

        history.set_max_depth(1);
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn test_locked_layer_does_not_stall_the_stacks() {
        let mut map = Map::new("Test");
        let mut history = HistoryState::new(0);
        history.execute(place(&map, 0, 1), &mut map);
        history.execute(place(&map, 1, 2), &mut map);
        history.undo(&mut map);
        assert_eq!(history.redo_len(), 1);

        map.toggle_layer_lock(0);
        let blocked = EditCommand::PlaceTile {
            layer: map.active_layer().id,
            cell: CellCoord::new(5, 5),
            tile: TileInfo::new("A", 9),
            previous: None,
        };
        // Recorded and redo invalidated, but the locked layer is untouched
        assert!(!history.execute(blocked, &mut map));
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo_len(), 2);
        assert_eq!(map.tile_at(0, CellCoord::new(5, 5)), None);

        // Undo keeps popping while locked; the writes are absorbed
        assert!(history.undo(&mut map));
        assert!(history.undo(&mut map));
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 2);
        assert_eq!(map.tile_at(0, CellCoord::new(0, 0)), Some(&TileInfo::new("A", 1)));
        assert!(!history.undo(&mut map));
    }
}
