//! Playback collaborator boundary
//!
//! The engine never decodes or owns an audio device. It reads snapshots from
//! a [`PlaybackClock`] and hands seek requests back. Failures on either side
//! are logged here and treated as "nothing changed".

use super::mapping::sanitize_seconds;

/// Snapshot of the playback position feed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub is_playing: bool,
    pub did_finish: bool,
}

impl PlaybackState {
    /// Clamp negative and NaN times to 0
    pub fn sanitized(self) -> Self {
        Self {
            position_seconds: sanitize_seconds(self.position_seconds),
            duration_seconds: sanitize_seconds(self.duration_seconds),
            ..self
        }
    }
}

/// Seek emitted by a drag gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    pub time_seconds: f64,
}

/// Source of playback snapshots and sink of seeks
pub trait PlaybackClock {
    fn status(&self) -> Result<PlaybackState, String>;
    fn seek(&self, time_seconds: f64) -> Result<(), String>;
}

/// Query the clock, logging failures
pub fn read_status(clock: &impl PlaybackClock) -> Option<PlaybackState> {
    match clock.status() {
        Ok(state) => Some(state.sanitized()),
        Err(e) => {
            tracing::warn!("Playback status unavailable: {}", e);
            None
        }
    }
}

/// Forward a seek to the clock; returns whether it was accepted
pub fn dispatch_seek(clock: &impl PlaybackClock, request: SeekRequest) -> bool {
    match clock.seek(request.time_seconds) {
        Ok(()) => {
            tracing::debug!("Seek to {:.2}s", request.time_seconds);
            true
        }
        Err(e) => {
            tracing::warn!("Seek to {:.2}s failed: {}", request.time_seconds, e);
            false
        }
    }
}
