// src/app/update/playback.rs
//! Playback message handlers

use std::time::Instant;

use crate::app::message::Message;
use crate::app::state::App;
use crate::audio::AudioEvent;
use crate::features::lyrics::sync::{SeekRequest, dispatch_seek, read_status};

impl App {
    /// Handle playback-related messages
    pub fn handle_playback(&mut self, message: &Message) -> bool {
        match message {
            Message::PollPlayback => {
                self.poll_playback();
                true
            }

            Message::Audio(event) => {
                self.handle_audio_event(event);
                true
            }

            Message::TogglePlayback => {
                self.core.audio.toggle();
                self.ui.polling = true;
                true
            }

            &Message::SeekBy(delta) => {
                self.seek_by(delta);
                true
            }

            &Message::VolumeBy(delta) => {
                let volume = (self.core.settings.playback.volume + delta).clamp(0.0, 1.0);
                self.core.audio.set_volume(volume);
                if volume != self.core.settings.playback.volume {
                    self.core.settings.playback.volume = volume;
                    self.core.settings_dirty = true;
                }
                true
            }

            Message::SeekPreview(_) | Message::SeekReleased => {
                self.handle_seek_slider(message);
                true
            }

            _ => false,
        }
    }

    /// Read the clock and feed the controller
    ///
    /// The shared snapshot is refreshed by the audio thread on `Tick`, so each
    /// reading is up to one poll interval old. The tick goes out after the read
    /// to have a fresh snapshot waiting for the next poll.
    fn poll_playback(&mut self) {
        self.ui.last_poll = Some(Instant::now());
        // Slider preview owns the displayed position until release
        if !self.ui.polling || self.ui.seek_preview.is_some() {
            return;
        }

        let reading = read_status(&self.core.audio);
        self.core.audio.tick();
        let Some(state) = reading else {
            return;
        };
        self.lyrics.controller.playback_tick(state);

        if state.did_finish {
            tracing::info!("Playback finished, holding final position");
            self.ui.polling = false;
        } else if !state.is_playing {
            self.ui.polling = false;
        }
    }

    fn handle_audio_event(&mut self, event: &AudioEvent) {
        match event {
            AudioEvent::Loaded { path, duration } => {
                tracing::info!("Track ready: {:?} ({:?})", path, duration);
                self.ui.status_message = None;
                self.ui.polling = true;
            }
            AudioEvent::Resumed
            | AudioEvent::Paused { .. }
            | AudioEvent::SeekComplete { .. }
            | AudioEvent::Finished => {
                // One more reading picks up the new state
                self.ui.polling = true;
            }
            AudioEvent::Stopped => {}
            AudioEvent::SeekFailed { error } => {
                self.ui.status_message = Some(format!("Seek failed: {}", error));
                self.ui.polling = true;
            }
            AudioEvent::Error { message } => {
                tracing::error!("Audio error: {}", message);
                self.ui.status_message = Some(message.clone());
            }
        }
    }

    /// Relative keyboard seek, clamped to the track
    fn seek_by(&mut self, delta: f64) {
        let base = read_status(&self.core.audio)
            .map(|s| s.position_seconds)
            .unwrap_or_else(|| self.display_position());
        let duration = self.display_duration();
        let target = if duration > 0.0 {
            (base + delta).clamp(0.0, duration)
        } else {
            (base + delta).max(0.0)
        };

        if dispatch_seek(&self.core.audio, SeekRequest { time_seconds: target }) {
            self.ui.polling = true;
        }
    }

    /// Seek slider: preview drives the lyric view, release seeks once
    fn handle_seek_slider(&mut self, message: &Message) {
        match *message {
            Message::SeekPreview(time_seconds) => {
                self.ui.seek_preview = Some(time_seconds);
                let mut state = self.lyrics.controller.last_state().unwrap_or_default();
                state.position_seconds = time_seconds;
                state.duration_seconds = self.display_duration();
                state.did_finish = false;
                self.lyrics.controller.playback_tick(state);
            }
            Message::SeekReleased => {
                if let Some(time_seconds) = self.ui.seek_preview.take() {
                    dispatch_seek(&self.core.audio, SeekRequest { time_seconds });
                    self.ui.polling = true;
                }
            }
            _ => {}
        }
    }
}
