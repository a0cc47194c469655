// src/app/state.rs
//! Application state definitions

use std::path::PathBuf;
use std::time::Instant;

use crate::audio::{AudioEventReceiver, AudioHandle, AudioThreadHandle};
use crate::features::Settings;
use crate::features::lyrics::sync::{ScrollSyncController, StripAnimator};
use crate::features::media::{LyricsOrigin, TrackInfo};

use super::view::ShellLayout;

/// Main application state
pub struct App {
    /// Core infrastructure (settings, audio)
    pub core: CoreState,
    /// Lyric strip sync state
    pub lyrics: LyricsState,
    /// UI state (layout, seek preview, polling)
    pub ui: UiState,
}

/// Core Infrastructure & Services
pub struct CoreState {
    pub settings: Settings,
    /// Settings changed since startup and should be saved on exit
    pub settings_dirty: bool,
    pub audio: AudioHandle,
    /// Owner of the audio thread; `None` when driven by a bare handle
    pub audio_thread: Option<AudioThreadHandle>,
    pub audio_events: Option<AudioEventReceiver>,
    pub audio_path: PathBuf,
    pub track: TrackInfo,
}

/// Lyric strip state
pub struct LyricsState {
    pub controller: ScrollSyncController<StripAnimator>,
    pub origin: Option<LyricsOrigin>,
    /// Active pointer drag on the strip
    pub drag: Option<StripDrag>,
}

/// Pointer drag on the lyric strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripDrag {
    /// Animated scroll offset when the button went down
    pub anchor: f32,
    pub press_column: u16,
    /// Latest raw offset, may lie outside the strip
    pub offset: f32,
}

impl StripDrag {
    pub fn new(anchor: f32, press_column: u16) -> Self {
        Self {
            anchor,
            press_column,
            offset: anchor,
        }
    }

    /// Move the pointer; dragging left advances the strip
    pub fn move_to(&mut self, column: u16) -> f32 {
        self.offset = self.anchor + (self.press_column as f32 - column as f32);
        self.offset
    }
}

/// UI state
pub struct UiState {
    pub layout: ShellLayout,
    /// Slider position held while the seek slider is pressed
    pub seek_preview: Option<f64>,
    /// Poll the playback clock on the next due tick
    pub polling: bool,
    pub last_poll: Option<Instant>,
    pub last_frame: Instant,
    /// Last error or notice shown in the status line
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            layout: ShellLayout::default(),
            seek_preview: None,
            polling: false,
            last_poll: None,
            last_frame: Instant::now(),
            status_message: None,
            should_quit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_drag_travel() {
        let mut drag = StripDrag::new(10.0, 40);
        assert_eq!(drag.move_to(30), 20.0);
        assert_eq!(drag.move_to(45), 5.0);
        // Past the start gives a negative raw offset
        assert_eq!(drag.move_to(60), -10.0);
        assert_eq!(drag.anchor, 10.0);
    }
}
