//! Audio thread communication types
//!
//! This module provides commands and events for the audio thread architecture:
//! - `AudioCommand` - Commands sent from UI thread to audio thread
//! - `AudioEvent` - Events sent from audio thread to UI thread
//! - `SharedPlaybackState` - Thread-safe state for non-blocking UI reads
//!
//! ## Architecture
//! ```text
//! UI Thread (AudioHandle) --[AudioCommand]--> Audio Thread (AudioPlayer)
//! UI Thread              <--[AudioEvent]---- Audio Thread
//! UI Thread              <--[SharedState]--- Audio Thread (non-blocking reads)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::{PlaybackInfo, PlaybackStatus};

// ============ Commands (UI -> Audio Thread) ============

/// Commands sent from UI thread to audio thread
///
/// The UI thread sends and returns immediately. Results come back as `AudioEvent`.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Load a local file, playing it right away when `autoplay` is set
    Load { path: PathBuf, autoplay: bool },
    /// Resume (or restart a finished track)
    Play,
    /// Pause playback
    Pause,
    /// Stop playback and unload
    Stop,
    /// Seek to position
    Seek { position: Duration },
    /// Set volume (0.0 - 1.0)
    SetVolume { volume: f32 },
    /// Periodic tick for position sync and end-of-track detection
    Tick,
}

// ============ Events (Audio Thread -> UI) ============

/// Events emitted by the audio thread
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// A track was loaded
    Loaded { path: PathBuf, duration: Duration },
    /// Playback paused
    Paused { position: Duration },
    /// Playback resumed
    Resumed,
    /// Playback stopped
    Stopped,
    /// Seek completed successfully
    SeekComplete { position: Duration },
    /// Seek failed
    SeekFailed { error: String },
    /// Playback finished (track ended)
    Finished,
    /// Error occurred
    Error { message: String },
}

// ============ Shared State ============

/// Inner state protected by RwLock
#[derive(Debug, Clone)]
struct PlaybackStateInner {
    status: PlaybackStatus,
    position: Duration,
    duration: Duration,
    volume: f32,
    current_path: Option<PathBuf>,
    finished: bool,
}

impl Default for PlaybackStateInner {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
            current_path: None,
            finished: false,
        }
    }
}

/// Thread-safe shared playback state
///
/// UI thread reads this without blocking.
/// Audio thread updates it after each operation.
#[derive(Clone, Default)]
pub struct SharedPlaybackState {
    inner: Arc<RwLock<PlaybackStateInner>>,
}

impl std::fmt::Debug for SharedPlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("SharedPlaybackState")
            .field("status", &inner.status)
            .field("position", &inner.position)
            .field("duration", &inner.duration)
            .field("finished", &inner.finished)
            .finish()
    }
}

impl SharedPlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current playback info
    pub fn get_info(&self) -> PlaybackInfo {
        let inner = self.inner.read();
        PlaybackInfo {
            status: inner.status,
            position: inner.position,
            duration: inner.duration,
            volume: inner.volume,
            finished: inner.finished,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.inner.read().status == PlaybackStatus::Playing
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.inner.read().current_path.clone()
    }

    // ---- Update methods (called by audio thread) ----

    /// Update position
    ///
    /// Also set by the UI side when a seek is issued, so reads show the target
    /// before the audio thread catches up.
    pub fn set_position(&self, position: Duration) {
        self.inner.write().position = position;
    }

    pub fn set_volume(&self, volume: f32) {
        self.inner.write().volume = volume;
    }

    pub fn set_current_path(&self, path: Option<PathBuf>) {
        self.inner.write().current_path = path;
    }

    /// Update from PlaybackInfo
    pub fn update_from_info(&self, info: &PlaybackInfo) {
        let mut inner = self.inner.write();
        inner.status = info.status;
        inner.position = info.position;
        inner.duration = info.duration;
        inner.volume = info.volume;
        inner.finished = info.finished;
    }
}

// ============ Channel Types ============

/// Sender for audio commands (held by AudioHandle)
pub type AudioCommandSender = tokio::sync::mpsc::UnboundedSender<AudioCommand>;

/// Receiver for audio commands (held by audio thread)
pub type AudioCommandReceiver = tokio::sync::mpsc::UnboundedReceiver<AudioCommand>;

/// Sender for audio events (held by audio thread)
pub type AudioEventSender = tokio::sync::mpsc::UnboundedSender<AudioEvent>;

/// Receiver for audio events (held by App)
pub type AudioEventReceiver = tokio::sync::mpsc::UnboundedReceiver<AudioEvent>;

/// Create a new audio command channel
pub fn audio_command_channel() -> (AudioCommandSender, AudioCommandReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Create a new audio event channel
pub fn audio_event_channel() -> (AudioEventSender, AudioEventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_state_updates() {
        let state = SharedPlaybackState::new();
        assert!(!state.is_playing());

        state.update_from_info(&PlaybackInfo {
            status: PlaybackStatus::Playing,
            position: Duration::from_secs(3),
            duration: Duration::from_secs(10),
            volume: 0.5,
            finished: false,
        });
        assert!(state.is_playing());

        // Clones share the same state
        let other = state.clone();
        other.set_position(Duration::from_secs(7));
        assert_eq!(state.get_info().position, Duration::from_secs(7));
        assert_eq!(state.get_info().volume, 0.5);
    }
}
