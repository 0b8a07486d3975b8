//! Layer stack management: add, move, delete, toggles, rename and selection

use bevy::log::debug;
use tilekit_core::{Layer, Map};

use super::Controller;
use crate::bus::EventBus;
use crate::commands::{Command, CommandKind, LayerPosition, MoveDirection};

pub struct LayerController;

impl Controller for LayerController {
    fn register(&self, bus: &mut EventBus) {
        bus.subscribe(CommandKind::AddLayer, |ctx, _, command| {
            if let Command::AddLayer {
                position,
                kind,
                name,
            } = command
            {
                let name = name.clone().unwrap_or_else(|| next_layer_name(&ctx.map));
                let layer = Layer::new(name, *kind);
                let index = match *position {
                    LayerPosition::Above(index) => ctx.map.add_layer_above(index, layer),
                    LayerPosition::Below(index) => ctx.map.add_layer_below(index, layer),
                    LayerPosition::AboveActive => {
                        let active = ctx.map.active_layer_index();
                        ctx.map.add_layer_above(active, layer)
                    }
                };
                debug!("Added {} layer at {}", kind.display_name(), index);
                ctx.dirty = true;
            }
        });

        bus.subscribe(CommandKind::MoveLayer, |ctx, _, command| {
            if let Command::MoveLayer { index, direction } = command {
                let moved = match direction {
                    MoveDirection::Up => ctx.map.move_layer_up(*index),
                    MoveDirection::Down => ctx.map.move_layer_down(*index),
                };
                ctx.dirty |= moved;
            }
        });

        bus.subscribe(CommandKind::DeleteLayer, |ctx, _, command| {
            if let Command::DeleteLayer { index } = command {
                match ctx.map.delete_layer(*index) {
                    Some(layer) => {
                        debug!("Deleted layer '{}'", layer.name);
                        ctx.dirty = true;
                    }
                    None => debug!("Refused to delete layer {}", index),
                }
            }
        });

        bus.subscribe(CommandKind::ToggleLayerVisibility, |ctx, _, command| {
            if let Command::ToggleLayerVisibility { index } = command {
                ctx.dirty |= ctx.map.toggle_layer_visibility(*index);
            }
        });

        bus.subscribe(CommandKind::ToggleLayerLock, |ctx, _, command| {
            if let Command::ToggleLayerLock { index } = command {
                ctx.dirty |= ctx.map.toggle_layer_lock(*index);
            }
        });

        // Fold state is view-only and does not dirty the map
        bus.subscribe(CommandKind::ToggleLayerExpanded, |ctx, _, command| {
            if let Command::ToggleLayerExpanded { index } = command {
                ctx.map.toggle_layer_expanded(*index);
            }
        });

        bus.subscribe(CommandKind::RenameLayer, |ctx, _, command| {
            if let Command::RenameLayer { index, name } = command {
                ctx.dirty |= ctx.map.rename_layer(*index, name.clone());
            }
        });

        bus.subscribe(CommandKind::SelectLayer, |ctx, _, command| {
            if let Command::SelectLayer { index } = command {
                if *index < ctx.map.layer_count() {
                    ctx.map.set_active_layer(*index);
                }
            }
        });
    }
}

/// First "Layer N" not already used
fn next_layer_name(map: &Map) -> String {
    (map.layer_count() + 1..)
        .map(|n| format!("Layer {}", n))
        .find(|name| map.layers().iter().all(|l| &l.name != name))
        .unwrap_or_else(|| "Layer".to_string())
}
