//! Media file discovery and metadata extraction
//!
//! Finds lyrics for an audio file from three sources, in order:
//! 1. A lyrics file given explicitly on the command line
//! 2. A same-name `.lrc` / `.json` file next to the audio
//! 3. Lyrics embedded in the audio file's tags

use anyhow::Result;
use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

pub mod lyrics;

pub use lyrics::{FoundLyrics, LyricsOrigin};

/// Display metadata of the loaded track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: Option<String>,
    /// Duration from container metadata, when known
    pub duration_secs: Option<f64>,
}

impl TrackInfo {
    /// `Artist - Title`, or just the title
    pub fn display_name(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{} - {}", artist, self.title),
            None => self.title.clone(),
        }
    }
}

/// Find lyrics for an audio file
pub fn find_lyrics(audio_path: &Path, explicit: Option<&Path>) -> Result<Option<FoundLyrics>> {
    lyrics::find_lyrics(audio_path, explicit)
}

/// Read title, artist and duration, falling back to the file name
pub fn read_track_info(audio_path: &Path) -> TrackInfo {
    let fallback_title = audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown Title".to_string());

    let mut info = TrackInfo {
        title: fallback_title,
        ..Default::default()
    };

    let tagged_file = match Probe::open(audio_path).and_then(|probe| probe.read()) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("No metadata for {:?}: {}", audio_path, e);
            return info;
        }
    };

    let duration = tagged_file.properties().duration();
    if !duration.is_zero() {
        info.duration_secs = Some(duration.as_secs_f64());
    }

    if let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    {
        if let Some(title) = tag.title().filter(|t| !t.trim().is_empty()) {
            info.title = title.trim().to_string();
        }
        info.artist = tag
            .artist()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
    }

    info
}

/// Read the track duration from container metadata, in seconds
///
/// Used when the decoder cannot tell the length up front.
pub fn probe_duration(audio_path: &Path) -> Option<f64> {
    let tagged_file = Probe::open(audio_path).ok()?.read().ok()?;
    let duration = tagged_file.properties().duration();
    if duration.is_zero() {
        None
    } else {
        Some(duration.as_secs_f64())
    }
}
