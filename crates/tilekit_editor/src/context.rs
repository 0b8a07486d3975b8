//! Mutable editor state threaded through every command handler

use bevy::log::error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tilekit_core::{Map, Rotation, TileInfo, TilesetManager};

use crate::history::HistoryState;
use crate::preferences::EditorPreferences;

/// Viewport tool that decides what a click on the map means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorTool {
    #[default]
    Select,
    Paint,
    Erase,
    Rectangle,
    Eyedropper,
}

impl EditorTool {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select",
            EditorTool::Paint => "Paint",
            EditorTool::Erase => "Erase",
            EditorTool::Rectangle => "Rectangle",
            EditorTool::Eyedropper => "Eyedropper",
        }
    }
}

/// What the user currently has picked in the tool bar and tileset panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorSelection {
    pub tool: EditorTool,
    pub tileset: Option<String>,
    pub tile_id: Option<u32>,
    /// Rotation applied to newly painted tiles
    pub rotation: Rotation,
}

impl EditorSelection {
    /// The tile the paint tools would place, if a tileset and tile are both selected
    pub fn tile(&self) -> Option<TileInfo> {
        let tileset = self.tileset.as_ref()?;
        let tile_id = self.tile_id?;
        Some(TileInfo::new(tileset.clone(), tile_id).with_rotation(self.rotation))
    }
}

/// All state the editing kernel owns.
///
/// One instance is created by the application and handed to every handler by
/// the event bus; nothing else mutates it.
#[derive(Debug)]
pub struct EditorContext {
    pub map: Map,
    pub tilesets: TilesetManager,
    pub selection: EditorSelection,
    pub history: HistoryState,
    pub preferences: EditorPreferences,
    /// Where preference changes are written; not persisted when `None`
    pub preferences_path: Option<PathBuf>,
    /// File the map was last opened from or saved to
    pub map_path: Option<PathBuf>,
    /// Unsaved changes since the last save/open/new
    pub dirty: bool,
}

impl EditorContext {
    pub fn new(preferences: EditorPreferences) -> Self {
        let map = Map::with_layer(
            preferences.default_map_name.clone(),
            tilekit_core::Layer::new_tile_layer(preferences.default_layer_name.clone()),
        );
        Self {
            map,
            tilesets: TilesetManager::new(),
            selection: EditorSelection {
                tool: preferences.last_tool,
                ..Default::default()
            },
            history: HistoryState::new(preferences.max_history),
            preferences,
            preferences_path: None,
            map_path: None,
            dirty: false,
        }
    }

    /// Write the preferences to `preferences_path`, if set
    pub fn save_preferences(&self) {
        let Some(path) = &self.preferences_path else {
            return;
        };
        if let Err(e) = self.preferences.save_to(path) {
            error!("Failed to save preferences: {}", e);
        }
    }

    /// Replace the map and forget all history
    pub fn reset_document(&mut self, map: Map, path: Option<PathBuf>) {
        self.map = map;
        self.map_path = path;
        self.history.clear();
        self.dirty = false;
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorPreferences::default())
    }
}
