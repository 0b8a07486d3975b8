//! Turns tool gestures on the viewport into edit commands

use bevy::log::warn;
use tilekit_core::{CellCoord, TileInfo};
use uuid::Uuid;

use super::Controller;
use crate::bus::EventBus;
use crate::commands::{Command, CommandKind, CompoundBuilder, EditCommand};
use crate::context::{EditorContext, EditorTool};

/// Largest rectangle a single fill may cover
pub const MAX_FILL_CELLS: i64 = 256 * 256;

pub struct ToolController;

impl Controller for ToolController {
    fn register(&self, bus: &mut EventBus) {
        bus.subscribe(CommandKind::SelectTool, |ctx, _, command| {
            if let Command::SelectTool(tool) = command {
                ctx.selection.tool = *tool;
                ctx.preferences.last_tool = *tool;
                ctx.save_preferences();
            }
        });

        bus.subscribe(CommandKind::ApplyTool, |ctx, bus, command| {
            if let Command::ApplyTool { cell } = command {
                apply_tool(ctx, bus, *cell);
            }
        });

        bus.subscribe(CommandKind::FillRect, |ctx, bus, command| {
            if let Command::FillRect { min, max } = command {
                let fill = build_fill(ctx, *min, *max);
                bus.publish_opt(ctx, fill);
            }
        });
    }
}

/// Same tile, same rotation: painting it again would record a no-op edit
fn already_painted(existing: Option<&TileInfo>, tile: &TileInfo) -> bool {
    existing.is_some_and(|t| t == tile && t.rotation == tile.rotation)
}

fn apply_tool(ctx: &mut EditorContext, bus: &mut EventBus, cell: CellCoord) {
    let layer = ctx.map.active_layer().id;
    match ctx.selection.tool {
        EditorTool::Select => {}
        EditorTool::Paint => {
            let Some(tile) = ctx.selection.tile() else {
                return;
            };
            if already_painted(ctx.map.active_layer().tile_at(cell), &tile) {
                return;
            }
            let place = EditCommand::place_tile(&ctx.map, layer, cell, tile);
            bus.publish_opt(ctx, place);
        }
        EditorTool::Erase => {
            let erase = EditCommand::erase_tile(&ctx.map, layer, cell);
            bus.publish_opt(ctx, erase);
        }
        EditorTool::Rectangle => {
            bus.publish(ctx, Command::FillRect { min: cell, max: cell });
        }
        EditorTool::Eyedropper => {
            let Some(picked) = ctx.map.active_layer().tile_at(cell).cloned() else {
                return;
            };
            bus.publish(
                ctx,
                Command::SelectTileset {
                    name: picked.tileset.clone(),
                },
            );
            bus.publish(
                ctx,
                Command::SelectTile {
                    tile_id: picked.tile_id,
                    rotation: Some(picked.rotation),
                },
            );
        }
    }
}

/// One compound covering the inclusive rectangle, or `None` when nothing would change
fn build_fill(ctx: &mut EditorContext, min: CellCoord, max: CellCoord) -> Option<EditCommand> {
    let (lo, hi) = (
        CellCoord::new(min.x.min(max.x), min.y.min(max.y)),
        CellCoord::new(min.x.max(max.x), min.y.max(max.y)),
    );
    let cells = (i64::from(hi.x) - i64::from(lo.x) + 1) * (i64::from(hi.y) - i64::from(lo.y) + 1);
    if cells > MAX_FILL_CELLS {
        warn!(
            "Rectangle of {} cells exceeds the fill limit of {}",
            cells, MAX_FILL_CELLS
        );
        return None;
    }

    let layer: Uuid = ctx.map.active_layer().id;
    let (description, tile) = match ctx.selection.tool {
        EditorTool::Erase => ("Erase Rectangle", None),
        EditorTool::Paint | EditorTool::Rectangle => ("Fill Rectangle", Some(ctx.selection.tile()?)),
        EditorTool::Select | EditorTool::Eyedropper => return None,
    };

    let mut builder = CompoundBuilder::new(&mut ctx.map, description);
    for y in lo.y..=hi.y {
        for x in lo.x..=hi.x {
            let cell = CellCoord::new(x, y);
            builder.push_with(|map| match &tile {
                Some(tile) => {
                    let existing = map.layer_by_id(layer)?.tile_at(cell);
                    if already_painted(existing, tile) {
                        return None;
                    }
                    EditCommand::place_tile(map, layer, cell, tile.clone())
                }
                None => EditCommand::erase_tile(map, layer, cell),
            });
        }
    }
    builder.finish()
}
