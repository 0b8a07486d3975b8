//! User preferences that persist between editor sessions

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::context::EditorTool;

/// How many recently opened maps are remembered
pub const MAX_RECENT_MAPS: usize = 10;

/// Editor preferences, stored as JSON in the user's config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Maximum undo steps kept; 0 keeps everything
    pub max_history: usize,
    /// Name of the layer a new map starts with
    pub default_layer_name: String,
    /// Name given to new maps
    pub default_map_name: String,
    /// Recently opened or saved maps, most recent first
    pub recent_maps: Vec<PathBuf>,
    /// Tool selected when the editor starts
    pub last_tool: EditorTool,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            max_history: 200,
            default_layer_name: tilekit_core::DEFAULT_LAYER_NAME.to_string(),
            default_map_name: "Untitled".to_string(),
            recent_maps: Vec::new(),
            last_tool: EditorTool::Paint,
        }
    }
}

impl EditorPreferences {
    /// Move `path` to the front of the recent list
    pub fn push_recent_map(&mut self, path: &Path) {
        self.recent_maps.retain(|p| p != path);
        self.recent_maps.insert(0, path.to_path_buf());
        self.recent_maps.truncate(MAX_RECENT_MAPS);
    }
}
