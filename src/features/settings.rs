//! Application settings persistence
//!
//! Handles saving and loading user preferences.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::KeyBindings;
use super::lyrics::sync::{ScrollExtent, SyncConfig};

/// How the lyric strip's total width is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtentMode {
    /// Sum of the measured token widths
    #[default]
    Measured,
    /// `fixed_token_width` per token
    FixedPerToken,
}

impl std::fmt::Display for ExtentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtentMode::Measured => write!(f, "measured"),
            ExtentMode::FixedPerToken => write!(f, "fixed per token"),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Lyric sync tuning
    #[serde(default)]
    pub sync: SyncSettings,
    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackSettings,
    /// Display and interface settings
    #[serde(default)]
    pub display: DisplaySettings,
    /// Custom keybindings
    #[serde(default)]
    pub keybindings: KeyBindings,
}

/// Lyric strip synchronization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Duration of each scroll/note animation
    pub animation_ms: u64,
    /// Minimum spacing between seeks while dragging
    pub seek_throttle_ms: u64,
    /// Playback status poll interval while playing
    pub poll_interval_ms: u64,
    /// Strip width mode
    pub extent: ExtentMode,
    /// Width per token in columns for `fixed_per_token`
    pub fixed_token_width: f32,
}

/// Playback-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume level (0.0 to 1.0)
    pub volume: f32,
    /// Start playing as soon as the track is loaded
    pub autoplay: bool,
    /// Step for keyboard seeking
    pub seek_step_secs: f64,
    /// Audio output device name (None = default device)
    pub audio_output_device: Option<String>,
}

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Blank columns between lyric tokens
    pub token_gap: u16,
    /// Show the note marker under the active token
    pub show_note: bool,
    /// Frame interval of the render loop
    pub frame_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            animation_ms: 300,
            seek_throttle_ms: 200,
            poll_interval_ms: 100,
            extent: ExtentMode::Measured,
            fixed_token_width: 8.0,
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            autoplay: true,
            seek_step_secs: 5.0,
            audio_output_device: None,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            token_gap: 1,
            show_note: true,
            frame_ms: 16,
        }
    }
}

impl SyncSettings {
    /// Controller configuration for these settings
    pub fn to_config(&self) -> SyncConfig {
        let extent = match self.extent {
            ExtentMode::Measured => ScrollExtent::Measured,
            ExtentMode::FixedPerToken => ScrollExtent::FixedPerToken(self.fixed_token_width),
        };
        SyncConfig {
            animation_duration: Duration::from_millis(self.animation_ms),
            seek_interval: Duration::from_millis(self.seek_throttle_ms),
            extent,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl DisplaySettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

impl Settings {
    /// Get the settings file path
    pub fn file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "lyricsync", "Lyricsync")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };
        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::Io(e.to_string()))?;
        let mut settings: Self =
            serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.playback.volume = settings.playback.volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(path) = Self::file_path() {
            self.save_to_file(&path)
        } else {
            Err(SettingsError::Io(
                "Could not determine config directory".to_string(),
            ))
        }
    }

    /// Save settings to a specific file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| SettingsError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Errors that can occur with settings
#[derive(Debug, Clone)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lyricsync_settings_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.sync.animation_ms, 300);
        assert_eq!(settings.sync.seek_throttle_ms, 200);
        assert_eq!(settings.sync.poll_interval_ms, 100);
        assert_eq!(settings.playback.volume, 1.0);
        assert!(settings.display.show_note);

        let config = settings.sync.to_config();
        assert_eq!(config.animation_duration, Duration::from_millis(300));
        assert_eq!(config.extent, ScrollExtent::Measured);
    }

    #[test]
    fn test_roundtrip_file() {
        let path = temp_file("roundtrip");
        let mut settings = Settings::default();
        settings.playback.volume = 0.4;
        settings.sync.extent = ExtentMode::FixedPerToken;
        settings.playback.audio_output_device = Some("pulse".to_string());

        settings.save_to_file(&path).unwrap();
        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(
            loaded.sync.to_config().extent,
            ScrollExtent::FixedPerToken(8.0)
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_fields_default() {
        let path = temp_file("partial");
        std::fs::write(&path, r#"{"sync": {"animation_ms": 120}, "playback": {"volume": 3.0}}"#)
            .unwrap();

        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded.sync.animation_ms, 120);
        assert_eq!(loaded.sync.seek_throttle_ms, 200);
        assert_eq!(loaded.playback.volume, 1.0);
        assert!(loaded.playback.autoplay);
        assert_eq!(loaded.keybindings, KeyBindings::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_errors() {
        let path = temp_file("broken");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Parse(_))
        ));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            Settings::load_from_file(Path::new("/nonexistent/settings.json")),
            Err(SettingsError::Io(_))
        ));
    }
}
