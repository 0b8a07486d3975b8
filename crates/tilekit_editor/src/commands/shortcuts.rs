//! Keyboard shortcut handling

use bevy::prelude::*;

use super::{Command, MenuAction};
use crate::context::EditorTool;
use crate::plugin::PendingCommands;

/// Map a key press to the command it triggers, if any
pub fn shortcut_command(key: KeyCode, ctrl: bool, shift: bool) -> Option<Command> {
    if ctrl {
        return match key {
            // Ctrl+Shift+Z or Ctrl+Y - Redo
            KeyCode::KeyZ if shift => Some(MenuAction::Redo.into()),
            KeyCode::KeyY => Some(MenuAction::Redo.into()),
            // Ctrl+Z - Undo
            KeyCode::KeyZ => Some(MenuAction::Undo.into()),
            KeyCode::KeyN => Some(MenuAction::New.into()),
            KeyCode::KeyS => Some(MenuAction::Save.into()),
            _ => None,
        };
    }

    let tool = match key {
        KeyCode::KeyV => EditorTool::Select,
        KeyCode::KeyB => EditorTool::Paint,
        KeyCode::KeyE => EditorTool::Erase,
        KeyCode::KeyR => EditorTool::Rectangle,
        KeyCode::KeyI => EditorTool::Eyedropper,
        // T - rotate the brush
        KeyCode::KeyT => return Some(Command::RotateSelection),
        _ => return None,
    };
    Some(Command::SelectTool(tool))
}

/// Queue commands for keys pressed this frame
pub fn queue_keyboard_shortcuts(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut pending: ResMut<PendingCommands>,
) {
    // No input plugin in headless apps
    let Some(keyboard) = keyboard else {
        return;
    };

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    for key in keyboard.get_just_pressed() {
        if let Some(command) = shortcut_command(*key, ctrl, shift) {
            pending.push(command);
        }
    }
}
