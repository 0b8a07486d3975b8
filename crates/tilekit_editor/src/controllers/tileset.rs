//! Tileset registry and brush selection

use bevy::log::{debug, info};

use super::Controller;
use crate::bus::EventBus;
use crate::commands::{Command, CommandKind};
use crate::context::EditorContext;

pub struct TilesetController;

impl Controller for TilesetController {
    fn register(&self, bus: &mut EventBus) {
        bus.subscribe(CommandKind::LoadTileset, |ctx, _, command| {
            if let Command::LoadTileset(tileset) = command {
                let name = tileset.name.clone();
                let replaced = ctx.tilesets.register(tileset.clone()).is_some();
                info!(
                    "{} tileset '{}' ({} tiles)",
                    if replaced { "Reloaded" } else { "Loaded" },
                    name,
                    tileset.tile_count
                );
                if ctx.selection.tileset.is_none() {
                    ctx.selection.tileset = Some(name);
                    ctx.selection.tile_id = None;
                }
                drop_invalid_tile(ctx);
            }
        });

        bus.subscribe(CommandKind::RemoveTileset, |ctx, _, command| {
            if let Command::RemoveTileset { name } = command {
                if ctx.tilesets.remove(name).is_none() {
                    return;
                }
                info!("Removed tileset '{}'", name);
                if ctx.selection.tileset.as_deref() == Some(name.as_str()) {
                    ctx.selection.tileset = ctx.tilesets.iter().next().map(|t| t.name.clone());
                    ctx.selection.tile_id = None;
                }
            }
        });

        bus.subscribe(CommandKind::SelectTileset, |ctx, _, command| {
            if let Command::SelectTileset { name } = command {
                if ctx.tilesets.get(name).is_none() {
                    debug!("Ignoring selection of unknown tileset '{}'", name);
                    return;
                }
                if ctx.selection.tileset.as_deref() != Some(name.as_str()) {
                    ctx.selection.tileset = Some(name.clone());
                    ctx.selection.tile_id = None;
                }
            }
        });

        bus.subscribe(CommandKind::SelectTile, |ctx, _, command| {
            if let Command::SelectTile { tile_id, rotation } = command {
                let valid = ctx
                    .selection
                    .tileset
                    .as_deref()
                    .is_some_and(|name| ctx.tilesets.contains_tile(name, *tile_id));
                if valid {
                    ctx.selection.tile_id = Some(*tile_id);
                    if let Some(rotation) = rotation {
                        ctx.selection.rotation = *rotation;
                    }
                }
            }
        });

        bus.subscribe(CommandKind::RotateSelection, |ctx, _, _| {
            ctx.selection.rotation = ctx.selection.rotation.rotated_cw();
        });
    }
}

/// Clear the selected tile if its tileset no longer has it
fn drop_invalid_tile(ctx: &mut EditorContext) {
    if let (Some(name), Some(tile_id)) = (&ctx.selection.tileset, ctx.selection.tile_id) {
        if !ctx.tilesets.contains_tile(name, tile_id) {
            ctx.selection.tile_id = None;
        }
    }
}
