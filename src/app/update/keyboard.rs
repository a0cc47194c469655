// src/app/update/keyboard.rs
//! Keyboard and action message handlers

use crate::app::message::Message;
use crate::app::state::App;
use crate::features::Action;

/// Volume change per key press
const VOLUME_STEP: f32 = 0.05;

impl App {
    /// Handle keyboard-related messages
    pub fn handle_keyboard(&mut self, message: &Message) -> bool {
        match message {
            Message::KeyPressed(key) => {
                if let Some(action) = self.core.settings.keybindings.find_action(key) {
                    self.update(Message::ExecuteAction(action));
                }
                true
            }

            Message::ExecuteAction(action) => {
                self.execute_action(*action);
                true
            }

            _ => false,
        }
    }

    /// Execute a keybinding action
    fn execute_action(&mut self, action: Action) {
        let step = self.core.settings.playback.seek_step_secs;
        match action {
            Action::PlayPause => self.update(Message::TogglePlayback),
            Action::SeekForward => self.update(Message::SeekBy(step)),
            Action::SeekBackward => self.update(Message::SeekBy(-step)),
            Action::VolumeUp => self.update(Message::VolumeBy(VOLUME_STEP)),
            Action::VolumeDown => self.update(Message::VolumeBy(-VOLUME_STEP)),
            Action::CancelDrag => self.update(Message::GestureCancel),
            Action::Quit => self.update(Message::Quit),
        }
    }
}
