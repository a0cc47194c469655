//! Application messages

use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::layout::Rect;

use crate::audio::AudioEvent;
use crate::features::Action;

/// Application messages
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ============ Terminal input ============
    /// Key pressed
    KeyPressed(KeyEvent),
    /// Raw mouse event, hit-tested by the lyrics handler
    Mouse(MouseEvent),
    /// Terminal lost focus
    FocusLost,
    /// Terminal resized; carries the full drawable area
    Resized(Rect),

    // ============ Actions ============
    ExecuteAction(Action),

    // ============ Playback ============
    /// Poll the playback clock
    PollPlayback,
    /// Event from the audio thread
    Audio(AudioEvent),
    /// Toggle play/pause
    TogglePlayback,
    /// Seek by a relative amount of seconds
    SeekBy(f64),
    /// Change volume by a relative amount
    VolumeBy(f32),

    // ============ Lyric strip ============
    /// Advance animations to this instant
    AnimationTick(Instant),
    /// Button pressed on the strip
    StripPressed { column: u16 },
    /// Pointer dragged with the strip gesture active
    StripDragged { column: u16 },
    /// Button released
    StripReleased,
    /// Wheel notch over the strip, positive scrolls forward
    StripWheel(i8),
    /// Drag interrupted (Esc or focus loss)
    GestureCancel,

    // ============ Seek slider ============
    /// Preview position while the slider is held
    SeekPreview(f64),
    /// Slider released, commit the preview
    SeekReleased,

    Quit,
}

impl Message {
    /// Translate a terminal event
    ///
    /// Key releases and repeats reported by some terminals are dropped.
    pub fn from_event(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Message::KeyPressed(key)),
            Event::Mouse(mouse) => Some(Message::Mouse(mouse)),
            Event::FocusLost => Some(Message::FocusLost),
            Event::Resize(width, height) => Some(Message::Resized(Rect::new(0, 0, width, height))),
            _ => None,
        }
    }
}
