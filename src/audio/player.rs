//! Audio player using rodio
//!
//! Owns the output stream and a single sink for the loaded track. Lives on the
//! audio thread; the UI talks to it through `AudioHandle`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::cpal::traits::{DeviceTrait, HostTrait};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source, mixer::Mixer};

use crate::features::media;

/// Playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Current playback info
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackInfo {
    pub status: PlaybackStatus,
    pub position: Duration,
    pub duration: Duration,
    pub volume: f32,
    /// The track played to its end
    pub finished: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
            finished: false,
        }
    }
}

/// Audio player state
#[derive(Debug)]
struct PlayerState {
    status: PlaybackStatus,
    duration: Duration,
    volume: f32,
    paused_position: Option<Duration>,
    finished: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            duration: Duration::ZERO,
            volume: 1.0,
            paused_position: None,
            finished: false,
        }
    }
}

/// Single-track audio player
pub struct AudioPlayer {
    _stream: OutputStream,
    mixer: Mixer,
    current_sink: Option<Sink>,
    current_path: Option<PathBuf>,
    state: PlayerState,
}

impl AudioPlayer {
    /// Create a new audio player with the given output device (None = default)
    pub fn with_device(device_name: Option<&str>) -> Result<Self, String> {
        let mut stream = if let Some(name) = device_name {
            Self::create_stream_for_device(name)?
        } else {
            OutputStreamBuilder::open_default_stream()
                .map_err(|e| format!("Failed to create audio output: {}", e))?
        };
        // The terminal owns stderr while the UI is up
        stream.log_on_drop(false);
        let mixer = stream.mixer().clone();

        Ok(Self {
            _stream: stream,
            mixer,
            current_sink: None,
            current_path: None,
            state: PlayerState::default(),
        })
    }

    /// Create output stream for a specific device by name
    fn create_stream_for_device(device_name: &str) -> Result<OutputStream, String> {
        let host = rodio::cpal::default_host();

        // Find the device by name
        let device = host
            .output_devices()
            .map_err(|e| format!("Failed to enumerate devices: {}", e))?
            .find(|d| d.name().map(|n| n == device_name).unwrap_or(false))
            .ok_or_else(|| format!("Device not found: {}", device_name))?;

        // Get default config for the device
        let config = device
            .default_output_config()
            .map_err(|e| format!("Failed to get device config: {}", e))?;

        // Build stream with the device
        OutputStreamBuilder::from_device(device)
            .map_err(|e| format!("Failed to create stream builder: {}", e))?
            .with_sample_rate(config.sample_rate().0)
            .open_stream()
            .map_err(|e| format!("Failed to open stream: {}", e))
    }

    /// Decode a file into a new sink on our mixer
    fn open_sink(&self, path: &Path) -> Result<(Sink, Duration), String> {
        let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
        let reader = BufReader::new(file);
        let source = Decoder::new(reader).map_err(|e| format!("Failed to decode audio: {}", e))?;

        // Some containers only report their length through metadata
        let duration = source
            .total_duration()
            .or_else(|| media::probe_duration(path).map(Duration::from_secs_f64))
            .unwrap_or(Duration::ZERO);

        let sink = Sink::connect_new(&self.mixer);
        sink.append(source);
        sink.set_volume(self.state.volume);
        Ok((sink, duration))
    }

    /// Load a file, returning its duration
    ///
    /// The track starts paused unless `autoplay` is set.
    pub fn load(&mut self, path: PathBuf, autoplay: bool) -> Result<Duration, String> {
        self.stop();

        let (sink, duration) = self.open_sink(&path)?;
        if !autoplay {
            sink.pause();
        }

        self.state.status = if autoplay {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        };
        self.state.duration = duration;
        self.state.paused_position = (!autoplay).then_some(Duration::ZERO);
        self.state.finished = false;

        self.current_sink = Some(sink);
        self.current_path = Some(path);

        tracing::info!("Loaded audio, duration: {:?}", duration);
        Ok(duration)
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if let Some(sink) = self.current_sink.as_ref() {
            if self.state.finished {
                return;
            }
            let current_pos = sink.get_pos();
            sink.pause();
            self.state.status = PlaybackStatus::Paused;
            self.state.paused_position = Some(current_pos);
        }
    }

    /// Resume playback, restarting from the top after the track finished
    pub fn resume(&mut self) -> Result<(), String> {
        if self.current_sink.is_none() {
            return Err("No audio loaded".to_string());
        }
        if self.state.finished {
            self.seek(Duration::ZERO)?;
        }

        if let Some(sink) = &self.current_sink {
            sink.set_volume(self.state.volume);
            sink.play();
            self.state.status = PlaybackStatus::Playing;
            self.state.paused_position = None;
        }
        Ok(())
    }

    /// Stop playback and unload the track
    pub fn stop(&mut self) {
        if let Some(sink) = self.current_sink.take() {
            sink.stop();
        }
        self.state.status = PlaybackStatus::Stopped;
        self.state.paused_position = None;
    }

    /// Set volume (0.0 to 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;

        if let Some(sink) = &self.current_sink {
            sink.set_volume(volume);
        }
    }

    /// Seek to position
    pub fn seek(&mut self, position: Duration) -> Result<(), String> {
        let position = if self.state.duration.is_zero() {
            position
        } else {
            position.min(self.state.duration)
        };

        // First try direct seek
        if let Some(sink) = &self.current_sink {
            if !self.state.finished {
                match sink.try_seek(position) {
                    Ok(_) => {
                        tracing::debug!("Seek to {:?} successful", position);
                        if self.state.status == PlaybackStatus::Paused {
                            self.state.paused_position = Some(position);
                        }
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::debug!("Direct seek failed: {:?}, will try reload", e);
                    }
                }
            }
        } else {
            return Err("No audio loaded".to_string());
        }

        // Direct seek failed (or the sink already drained), reload the file
        tracing::info!("Reloading track to seek to {:?}", position);

        let path = self.current_path.clone().ok_or("No current path")?;
        let was_playing = self.state.status == PlaybackStatus::Playing;

        if let Some(old_sink) = self.current_sink.take() {
            old_sink.stop();
        }

        let (new_sink, duration) = self.open_sink(&path)?;
        let seek_result = new_sink.try_seek(position);

        if !was_playing {
            new_sink.pause();
        }

        self.state.duration = duration;
        self.state.status = if was_playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        };
        self.state.finished = false;
        self.current_sink = Some(new_sink);

        match seek_result {
            Ok(()) => {
                self.state.paused_position = (!was_playing).then_some(position);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Seek after reload also failed: {:?}", e);
                self.state.paused_position = (!was_playing).then_some(Duration::ZERO);
                Err("Seek not supported for this format".to_string())
            }
        }
    }

    /// Detect the end of the track; returns true once, when it happens
    pub fn poll_finished(&mut self) -> bool {
        if self.state.finished || self.state.status != PlaybackStatus::Playing {
            return false;
        }
        if self.is_finished() {
            self.state.finished = true;
            self.state.status = PlaybackStatus::Stopped;
            tracing::info!("Track finished");
            return true;
        }
        false
    }

    /// Check if playback finished
    ///
    /// Sink drained, or position within 500ms of the duration for formats
    /// where the sink never reports empty.
    fn is_finished(&self) -> bool {
        let Some(sink) = &self.current_sink else {
            return false;
        };
        if sink.empty() {
            return true;
        }
        let duration = self.state.duration.as_secs_f32();
        duration > 0.0 && sink.get_pos().as_secs_f32() >= duration - 0.5
    }

    /// Get current playback info
    pub fn get_info(&self) -> PlaybackInfo {
        let position = match &self.current_sink {
            _ if self.state.finished => self.state.duration,
            Some(sink) => match self.state.status {
                PlaybackStatus::Paused => {
                    self.state.paused_position.unwrap_or_else(|| sink.get_pos())
                }
                _ => sink.get_pos(),
            },
            None => Duration::ZERO,
        };

        PlaybackInfo {
            status: self.state.status,
            position,
            duration: self.state.duration,
            volume: self.state.volume,
            finished: self.state.finished,
        }
    }
}
