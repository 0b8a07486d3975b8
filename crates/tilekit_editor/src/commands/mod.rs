//! Command model: every user intent is a `Command` value published on the event bus
//!
//! Structural commands (menu actions, tool/layer/tileset changes) are applied directly
//! by the controller that subscribes to them. Mutation commands are wrapped in
//! [`Command::Edit`] and carry the pre-state needed to reverse themselves; the
//! history controller executes and records them.

mod edit;
mod shortcuts;

pub use edit::{BooleanOp, CompoundBuilder, EditCommand};
pub use shortcuts::{queue_keyboard_shortcuts, shortcut_command};

use std::path::PathBuf;
use tilekit_core::{CellCoord, LayerKind, Rotation, Tileset};

use crate::context::EditorTool;

/// Actions from the Edit and File menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Undo,
    Redo,
    New,
    Save,
}

/// Where a new layer goes relative to an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerPosition {
    Above(usize),
    Below(usize),
    /// Above the currently active layer
    AboveActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Toward index 0 (top of the stack)
    Up,
    Down,
}

/// A user intent, published once on the [`EventBus`](crate::EventBus)
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Menu(MenuAction),

    // Tools
    SelectTool(EditorTool),
    /// Click/drag of the current tool on a cell
    ApplyTool { cell: CellCoord },
    /// Rectangle drag of the current tool (inclusive corners)
    FillRect { min: CellCoord, max: CellCoord },

    // Layers
    AddLayer {
        position: LayerPosition,
        kind: LayerKind,
        name: Option<String>,
    },
    MoveLayer { index: usize, direction: MoveDirection },
    DeleteLayer { index: usize },
    ToggleLayerVisibility { index: usize },
    ToggleLayerLock { index: usize },
    ToggleLayerExpanded { index: usize },
    RenameLayer { index: usize, name: String },
    SelectLayer { index: usize },

    // Tilesets
    LoadTileset(Tileset),
    RemoveTileset { name: String },
    SelectTileset { name: String },
    /// Pick a tile from the selected tileset; `rotation` of `None` keeps the current one
    SelectTile {
        tile_id: u32,
        rotation: Option<Rotation>,
    },
    /// Turn the brush a quarter turn clockwise
    RotateSelection,

    // Documents
    NewMap { name: Option<String> },
    /// Save to `path`, or to the current file when `None`
    SaveMap { path: Option<PathBuf> },
    OpenMap { path: PathBuf },

    /// Undoable mutation of the map
    Edit(EditCommand),
}

/// Concrete command variant, used as an exact-type subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Menu,
    SelectTool,
    ApplyTool,
    FillRect,
    AddLayer,
    MoveLayer,
    DeleteLayer,
    ToggleLayerVisibility,
    ToggleLayerLock,
    ToggleLayerExpanded,
    RenameLayer,
    SelectLayer,
    LoadTileset,
    RemoveTileset,
    SelectTileset,
    SelectTile,
    RotateSelection,
    NewMap,
    SaveMap,
    OpenMap,
    PlaceTile,
    EraseTile,
    AddObject,
    RemoveObject,
    AddPolygon,
    ReshapePolygon,
    TransformObject,
    Compound,
}

/// Capability shared by several command variants; subscribing to one reaches
/// every command that carries it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Executed and recorded by the history
    Undoable,
    MenuAction,
    /// Changes tile cells
    TileEdit,
    /// Changes objects on shape layers
    ObjectEdit,
    /// Changes the layer stack or layer flags
    LayerStructure,
    /// Changes the tool, layer or brush selection
    Selection,
    /// Adds or removes tilesets
    TilesetRegistry,
    /// Creates, opens or saves the map file
    Document,
    /// Leaves the map with unsaved changes
    ModifiesMap,
}

impl Command {
    /// The concrete variant of this command
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Menu(_) => CommandKind::Menu,
            Command::SelectTool(_) => CommandKind::SelectTool,
            Command::ApplyTool { .. } => CommandKind::ApplyTool,
            Command::FillRect { .. } => CommandKind::FillRect,
            Command::AddLayer { .. } => CommandKind::AddLayer,
            Command::MoveLayer { .. } => CommandKind::MoveLayer,
            Command::DeleteLayer { .. } => CommandKind::DeleteLayer,
            Command::ToggleLayerVisibility { .. } => CommandKind::ToggleLayerVisibility,
            Command::ToggleLayerLock { .. } => CommandKind::ToggleLayerLock,
            Command::ToggleLayerExpanded { .. } => CommandKind::ToggleLayerExpanded,
            Command::RenameLayer { .. } => CommandKind::RenameLayer,
            Command::SelectLayer { .. } => CommandKind::SelectLayer,
            Command::LoadTileset(_) => CommandKind::LoadTileset,
            Command::RemoveTileset { .. } => CommandKind::RemoveTileset,
            Command::SelectTileset { .. } => CommandKind::SelectTileset,
            Command::SelectTile { .. } => CommandKind::SelectTile,
            Command::RotateSelection => CommandKind::RotateSelection,
            Command::NewMap { .. } => CommandKind::NewMap,
            Command::SaveMap { .. } => CommandKind::SaveMap,
            Command::OpenMap { .. } => CommandKind::OpenMap,
            Command::Edit(edit) => edit.kind(),
        }
    }

    /// Capabilities this command carries, in dispatch order
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Command::Menu(_) => &[Capability::MenuAction],
            Command::SelectTool(_)
            | Command::SelectTileset { .. }
            | Command::SelectTile { .. }
            | Command::RotateSelection => &[Capability::Selection],
            Command::ApplyTool { .. } | Command::FillRect { .. } => &[],
            Command::AddLayer { .. }
            | Command::MoveLayer { .. }
            | Command::DeleteLayer { .. }
            | Command::ToggleLayerVisibility { .. }
            | Command::ToggleLayerLock { .. }
            | Command::RenameLayer { .. } => &[Capability::LayerStructure, Capability::ModifiesMap],
            Command::ToggleLayerExpanded { .. } => &[Capability::LayerStructure],
            Command::SelectLayer { .. } => &[Capability::LayerStructure, Capability::Selection],
            Command::LoadTileset(_) | Command::RemoveTileset { .. } => &[Capability::TilesetRegistry],
            Command::NewMap { .. } | Command::SaveMap { .. } | Command::OpenMap { .. } => {
                &[Capability::Document]
            }
            Command::Edit(edit) => edit.capabilities(),
        }
    }

    /// True if the command carries `capability`
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl From<EditCommand> for Command {
    fn from(edit: EditCommand) -> Self {
        Command::Edit(edit)
    }
}

impl From<MenuAction> for Command {
    fn from(action: MenuAction) -> Self {
        Command::Menu(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_core::{Map, TileInfo};

    #[test]
    fn test_edit_commands_are_undoable() {
        let map = Map::new("Test");
        let layer = map.active_layer().id;
        let place: Command =
            EditCommand::place_tile(&map, layer, CellCoord::new(0, 0), TileInfo::new("Grass", 1))
                .unwrap()
                .into();

        assert_eq!(place.kind(), CommandKind::PlaceTile);
        assert!(place.has_capability(Capability::Undoable));
        assert!(place.has_capability(Capability::TileEdit));
        assert!(!place.has_capability(Capability::ObjectEdit));
    }

    #[test]
    fn test_structural_commands_are_not_undoable() {
        let commands = [
            Command::Menu(MenuAction::Undo),
            Command::SelectTool(EditorTool::Erase),
            Command::DeleteLayer { index: 0 },
            Command::SelectTile { tile_id: 1, rotation: None },
            Command::NewMap { name: None },
        ];
        for command in &commands {
            assert!(!command.has_capability(Capability::Undoable), "{command:?}");
        }
        assert!(Command::Menu(MenuAction::Redo).has_capability(Capability::MenuAction));
    }

    #[test]
    fn test_select_layer_carries_two_capabilities() {
        let command = Command::SelectLayer { index: 0 };
        assert_eq!(
            command.capabilities(),
            &[Capability::LayerStructure, Capability::Selection]
        );
    }
}
