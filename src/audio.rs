//! Audio playback module
//!
//! - `AudioPlayer`: rodio playback of a single local track
//! - `thread`: dedicated audio thread driven by commands
//! - `AudioHandle`: non-blocking control; the lyric engine's playback clock
//! - `events`: commands, events and shared playback state

pub mod events;
mod handle;
mod player;
mod thread;

pub use events::{AudioEvent, AudioEventReceiver};
pub use handle::AudioHandle;
pub use player::{PlaybackInfo, PlaybackStatus};
pub use thread::{AudioThreadHandle, spawn_audio_thread};
