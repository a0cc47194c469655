//! Message update handlers - thin dispatcher delegating to submodules

mod keyboard;
mod lyrics;
mod playback;

use super::{App, Message};

impl App {
    /// Handle messages by delegating to appropriate submodule handlers
    pub fn update(&mut self, message: Message) {
        // Try each handler in order until one handles the message
        if self.handle_keyboard(&message) {
            return;
        }
        if self.handle_playback(&message) {
            return;
        }
        if self.handle_lyrics(&message) {
            return;
        }

        match message {
            Message::Resized(area) => self.relayout(area),
            Message::Quit => self.ui.should_quit = true,
            other => tracing::debug!("Unhandled message: {:?}", other),
        }
    }
}
