//! Audio handle for non-blocking audio control from UI thread
//!
//! `AudioHandle` provides a non-blocking interface to control audio playback.
//! All methods send commands to the audio thread and return immediately.
//! State is read from `SharedPlaybackState` without blocking.

use std::path::PathBuf;
use std::time::Duration;

use super::events::{AudioCommand, AudioCommandSender, SharedPlaybackState};
use super::{PlaybackInfo, PlaybackStatus};
use crate::features::lyrics::sync::{PlaybackClock, PlaybackState};

/// Handle for controlling audio from UI thread
///
/// State queries read from shared state without blocking, even if the audio
/// thread is busy.
#[derive(Clone)]
pub struct AudioHandle {
    command_tx: AudioCommandSender,
    state: SharedPlaybackState,
}

impl std::fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioHandle")
            .field("state", &self.state)
            .finish()
    }
}

impl AudioHandle {
    pub fn new(command_tx: AudioCommandSender, state: SharedPlaybackState) -> Self {
        Self { command_tx, state }
    }

    fn send(&self, command: AudioCommand) -> Result<(), String> {
        self.command_tx
            .send(command)
            .map_err(|_| "Audio thread is not running".to_string())
    }

    // ============ Playback Control ============

    /// Load a local file
    ///
    /// Listen for `AudioEvent::Loaded` to know when the track is ready.
    pub fn load(&self, path: PathBuf, autoplay: bool) {
        let _ = self.send(AudioCommand::Load { path, autoplay });
    }

    pub fn play(&self) {
        let _ = self.send(AudioCommand::Play);
    }

    pub fn pause(&self) {
        let _ = self.send(AudioCommand::Pause);
    }

    /// Pause when playing, play otherwise
    pub fn toggle(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn stop(&self) {
        let _ = self.send(AudioCommand::Stop);
    }

    /// Seek to position
    ///
    /// The shared state position is updated immediately to the target position,
    /// so the next status read reflects the seek before the audio thread runs it.
    pub fn seek_to(&self, position: Duration) -> Result<(), String> {
        self.send(AudioCommand::Seek { position })?;
        self.state.set_position(position);
        Ok(())
    }

    /// Set volume
    pub fn set_volume(&self, volume: f32) {
        let _ = self.send(AudioCommand::SetVolume { volume });
    }

    /// Ask the audio thread to publish its position
    pub fn tick(&self) {
        let _ = self.send(AudioCommand::Tick);
    }

    // ============ State Queries (non-blocking reads) ============

    /// Get current playback info
    ///
    /// Reads from shared state, does not communicate with audio thread.
    pub fn get_info(&self) -> PlaybackInfo {
        self.state.get_info()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Check if player has no loaded audio
    pub fn is_empty(&self) -> bool {
        self.state.current_path().is_none() && self.get_info().status == PlaybackStatus::Stopped
    }
}

impl PlaybackClock for AudioHandle {
    fn status(&self) -> Result<PlaybackState, String> {
        if self.command_tx.is_closed() {
            return Err("Audio thread is not running".to_string());
        }
        let info = self.get_info();
        Ok(PlaybackState {
            position_seconds: info.position.as_secs_f64(),
            duration_seconds: info.duration.as_secs_f64(),
            is_playing: info.status == PlaybackStatus::Playing,
            did_finish: info.finished,
        })
    }

    fn seek(&self, time_seconds: f64) -> Result<(), String> {
        if !time_seconds.is_finite() {
            return Err(format!("Invalid seek target: {}", time_seconds));
        }
        self.seek_to(Duration::from_secs_f64(time_seconds.max(0.0)))
    }
}
