//! tilekit_editor - Command and undo kernel for the tilekit map editor
//!
//! This crate provides the editing core the UI drives:
//! - `Command` values describing every user intent
//! - `EventBus` routing commands by exact kind and by capability
//! - Undo/redo history of reversible map edits
//! - Controllers for tools, layers, tilesets and map files
//! - Preferences and map file persistence
//! - A Bevy plugin that feeds queued commands and keyboard shortcuts to the kernel
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tilekit_editor::EditorKernelPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorKernelPlugin::default())
//!         .run();
//! }
//! ```
//!
//! Without Bevy, drive an [`Editor`] directly:
//!
//! ```rust,ignore
//! let mut editor = Editor::default();
//! let layer = editor.map().active_layer().id;
//! let place = EditCommand::place_tile(editor.map(), layer, CellCoord::new(2, 2), TileInfo::new("Grass", 3));
//! editor.publish_opt(place);
//! editor.publish(MenuAction::Undo);
//! ```

pub mod bus;
pub mod commands;
pub mod context;
pub mod controllers;
pub mod editor;
pub mod history;
pub mod plugin;
pub mod preferences;
pub mod project;

// Re-export the data model
pub use tilekit_core;

pub use bus::{EventBus, Handler, Topic};
pub use commands::{
    BooleanOp, Capability, Command, CommandKind, CompoundBuilder, EditCommand, LayerPosition,
    MenuAction, MoveDirection,
};
pub use context::{EditorContext, EditorSelection, EditorTool};
pub use editor::Editor;
pub use history::{HistoryController, HistoryState};
pub use plugin::{EditorKernelPlugin, PendingCommands};
pub use preferences::EditorPreferences;
pub use project::{MapDocument, MapFileError};
