//! Domain controllers: each subscribes to the commands it owns and applies them
//! to the [`EditorContext`](crate::EditorContext)

mod layer;
mod map;
mod tileset;
mod tool;

pub use layer::LayerController;
pub use map::MapController;
pub use tileset::TilesetController;
pub use tool::{ToolController, MAX_FILL_CELLS};

use crate::bus::EventBus;

/// Something that wires handlers into the bus once at startup
pub trait Controller {
    fn register(&self, bus: &mut EventBus);
}
