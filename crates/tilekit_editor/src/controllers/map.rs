//! New/open/save of the edited map

use bevy::log::{info, warn};
use std::path::Path;
use tilekit_core::{Layer, Map};

use super::Controller;
use crate::bus::EventBus;
use crate::commands::{Command, CommandKind, MenuAction};
use crate::context::EditorContext;
use crate::project::{MapDocument, MapFileError};

pub struct MapController;

impl Controller for MapController {
    fn register(&self, bus: &mut EventBus) {
        bus.subscribe(CommandKind::Menu, |ctx, bus, command| match command {
            Command::Menu(MenuAction::New) => bus.publish(ctx, Command::NewMap { name: None }),
            Command::Menu(MenuAction::Save) => bus.publish(ctx, Command::SaveMap { path: None }),
            _ => {}
        });

        bus.subscribe(CommandKind::NewMap, |ctx, _, command| {
            if let Command::NewMap { name } = command {
                let map = fresh_map(ctx, name.clone());
                info!("New map '{}'", map.name);
                ctx.reset_document(map, None);
            }
        });

        bus.subscribe(CommandKind::SaveMap, |ctx, _, command| {
            if let Command::SaveMap { path } = command {
                let target = path.clone().or_else(|| ctx.map_path.clone());
                if let Err(e) = save_map(ctx, target.as_deref()) {
                    warn!("Failed to save map: {}", e);
                }
            }
        });

        bus.subscribe(CommandKind::OpenMap, |ctx, _, command| {
            if let Command::OpenMap { path } = command {
                open_map(ctx, path);
            }
        });
    }
}

fn fresh_map(ctx: &EditorContext, name: Option<String>) -> Map {
    Map::with_layer(
        name.unwrap_or_else(|| ctx.preferences.default_map_name.clone()),
        Layer::new_tile_layer(ctx.preferences.default_layer_name.clone()),
    )
}

fn save_map(ctx: &mut EditorContext, path: Option<&Path>) -> Result<(), MapFileError> {
    let path = path.ok_or(MapFileError::NoPath)?;
    MapDocument::new(ctx.map.clone(), &ctx.tilesets).save(path)?;

    info!("Saved map '{}' to {}", ctx.map.name, path.display());
    ctx.map_path = Some(path.to_path_buf());
    ctx.dirty = false;
    ctx.preferences.push_recent_map(path);
    ctx.save_preferences();
    Ok(())
}

/// Replace the document with the file's contents, or with a fresh map if it cannot be read
fn open_map(ctx: &mut EditorContext, path: &Path) {
    match MapDocument::load(path) {
        Ok(document) => {
            let missing = document.missing_tilesets();
            if !missing.is_empty() {
                warn!(
                    "Map {} references unknown tilesets: {}",
                    path.display(),
                    missing.join(", ")
                );
            }
            info!("Opened map '{}' from {}", document.map.name, path.display());
            ctx.tilesets = document.tileset_manager();
            ctx.selection.tileset = ctx.tilesets.iter().next().map(|t| t.name.clone());
            ctx.selection.tile_id = None;
            ctx.reset_document(document.map, Some(path.to_path_buf()));
            ctx.preferences.push_recent_map(path);
            ctx.save_preferences();
        }
        Err(e) => {
            warn!(
                "Failed to open map {}: {}. Starting a new map.",
                path.display(),
                e
            );
            let map = fresh_map(ctx, None);
            ctx.reset_document(map, None);
        }
    }
}
