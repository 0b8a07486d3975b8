//! Bevy integration: owns the [`Editor`] and feeds it queued commands each frame

use bevy::prelude::*;

use crate::commands::{queue_keyboard_shortcuts, Command};
use crate::editor::Editor;
use crate::preferences::EditorPreferences;

/// Commands waiting to be published on the next update
#[derive(Resource, Default, Debug)]
pub struct PendingCommands(Vec<Command>);

impl PendingCommands {
    pub fn push(&mut self, command: impl Into<Command>) {
        self.0.push(command.into());
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.0.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Adds the editing kernel to an app.
///
/// The [`Editor`] is stored as a non-send resource (its handlers are `Rc`) and
/// is only touched from systems on the main thread.
#[derive(Default)]
pub struct EditorKernelPlugin {
    /// Preferences to start with; loaded from the config directory when `None`
    pub preferences: Option<EditorPreferences>,
}

impl EditorKernelPlugin {
    pub fn with_preferences(preferences: EditorPreferences) -> Self {
        Self {
            preferences: Some(preferences),
        }
    }
}

impl Plugin for EditorKernelPlugin {
    fn build(&self, app: &mut App) {
        // Only preferences loaded from the config directory are written back there
        let (preferences, preferences_path) = match &self.preferences {
            Some(preferences) => (preferences.clone(), None),
            None => (
                EditorPreferences::load(),
                EditorPreferences::preferences_path(),
            ),
        };
        info!(
            "Editor kernel starting (history depth {})",
            preferences.max_history
        );

        let mut editor = Editor::new(preferences);
        editor.set_preferences_path(preferences_path);

        app.insert_non_send_resource(editor)
            .init_resource::<PendingCommands>()
            .add_systems(
                Update,
                (queue_keyboard_shortcuts, process_pending_commands).chain(),
            );
    }
}

/// Publish everything queued this frame, in order
fn process_pending_commands(
    mut pending: ResMut<PendingCommands>,
    mut editor: NonSendMut<Editor>,
) {
    if pending.is_empty() {
        return;
    }
    for command in pending.drain() {
        editor.publish(command);
    }
}
