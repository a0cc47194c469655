//! Lyricsync - terminal player with a lyric strip that follows playback
//! and seeks when dragged

mod app;
mod audio;
mod features;
mod utils;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Session};
use crate::features::{Settings, media};

const AFTER_HELP: &str = "\
Lyrics come from [LYRICS] when given, else a same-name .lrc/.json file,
else the file's embedded tags.

Drag the lyric strip or the progress bar to seek. Settings live in the
platform config directory (settings.json).";

/// Lyricsync - terminal player whose lyric strip follows playback
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lyricsync", version, about, after_help = AFTER_HELP)]
struct CliArgs {
    /// Audio file to play
    audio: PathBuf,

    /// Lyrics file (.lrc or .json)
    lyrics: Option<PathBuf>,
}

/// Log to a file in the cache directory; the terminal belongs to the UI
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lyricsync=info"));

    let log_file = utils::cache_dir().and_then(|dir| {
        std::fs::create_dir_all(&dir).ok()?;
        File::create(dir.join("lyricsync.log")).ok()
    });

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    init_logging();

    if !args.audio.is_file() {
        bail!("Audio file not found: {}", args.audio.display());
    }

    let settings = Settings::load();
    let track = media::read_track_info(&args.audio);
    let lyrics = media::find_lyrics(&args.audio, args.lyrics.as_deref())
        .context("Failed to load lyrics")?;
    tracing::info!("Starting playback of {}", track.display_name());

    let audio_thread = audio::spawn_audio_thread(
        settings.playback.audio_output_device.as_deref(),
        settings.playback.volume,
    )
    .map_err(anyhow::Error::msg)?;

    let session = Session {
        audio_path: args.audio,
        track,
        lyrics,
    };
    let mut app = App::new(settings, session, audio_thread);

    let mut terminal = app::setup_terminal()?;
    let result = app.run(&mut terminal);
    app::restore_terminal();

    app.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("lyricsync").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_audio_only() {
        let parsed = parse(&["song.mp3"]).unwrap();
        assert_eq!(parsed.audio, PathBuf::from("song.mp3"));
        assert_eq!(parsed.lyrics, None);
    }

    #[test]
    fn test_parse_with_lyrics() {
        let parsed = parse(&["song.mp3", "words.lrc"]).unwrap();
        assert_eq!(parsed.lyrics, Some(PathBuf::from("words.lrc")));
    }

    #[test]
    fn test_parse_help_and_errors() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["song.mp3", "-h"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert!(parse(&[]).is_err());
        assert!(parse(&["a", "b", "c"]).is_err());
        assert_eq!(parse(&["--volume", "a"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
        // A lone dash is a path
        assert_eq!(parse(&["-"]).unwrap().audio, PathBuf::from("-"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
