//! Lyrics discovery for local audio files
//!
//! Finds lyrics from an explicit path, a same-name file or embedded metadata.
//! Uses the `features::lyrics` module for parsing.

use anyhow::{Context, Result, bail};
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::ItemKey;
use std::fs;
use std::path::{Path, PathBuf};

use crate::features::lyrics::{self, LyricToken};

/// Supported lyrics file extensions, in lookup order
const LYRICS_EXTENSIONS: &[&str] = &[
    "lrc",  // LRC, optionally with word tags
    "json", // Token list
];

/// Where a set of lyrics came from
#[derive(Debug, Clone, PartialEq)]
pub enum LyricsOrigin {
    /// Lyrics file on disk
    File(PathBuf),
    /// Timed lyrics in the audio file's tags
    Embedded,
    /// Untimed text in the audio file's tags
    EmbeddedPlain,
}

/// Tokens together with their source
#[derive(Debug, Clone, PartialEq)]
pub struct FoundLyrics {
    pub tokens: Vec<LyricToken>,
    pub origin: LyricsOrigin,
}

/// Find lyrics for an audio file
///
/// Priority:
/// 1. Explicit lyrics file (errors if unreadable or without tokens)
/// 2. Same-name lyrics file (.lrc, .json)
/// 3. Embedded lyrics (USLT tag)
pub fn find_lyrics(audio_path: &Path, explicit: Option<&Path>) -> Result<Option<FoundLyrics>> {
    // Priority 1: Explicit file
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lyrics file {:?}", path))?;
        let tokens = lyrics::parse_lyrics(&content);
        if tokens.is_empty() {
            bail!("No timed lyrics found in {:?}", path);
        }
        tracing::info!("Loaded {} lyric tokens from {:?}", tokens.len(), path);
        return Ok(Some(FoundLyrics {
            tokens,
            origin: LyricsOrigin::File(path.to_path_buf()),
        }));
    }

    // Priority 2: Same-name lyrics file
    if let Some(lyrics_path) = find_lyrics_file(audio_path) {
        if let Some(tokens) = lyrics::parse_lyrics_file(&lyrics_path) {
            tracing::info!("Loaded {} lyric tokens from {:?}", tokens.len(), lyrics_path);
            return Ok(Some(FoundLyrics {
                tokens,
                origin: LyricsOrigin::File(lyrics_path),
            }));
        }
        tracing::warn!("Ignoring lyrics file without tokens: {:?}", lyrics_path);
    }

    // Priority 3: Embedded lyrics
    if let Some(embedded) = extract_embedded_lyrics(audio_path) {
        let tokens = lyrics::parse_lyrics(&embedded);
        if !tokens.is_empty() {
            tracing::info!(
                "Loaded {} embedded lyric tokens from {:?}",
                tokens.len(),
                audio_path
            );
            return Ok(Some(FoundLyrics {
                tokens,
                origin: LyricsOrigin::Embedded,
            }));
        }

        // Plain text lyrics without timestamps - one token from the start
        if let Some(tokens) = plain_text_tokens(&embedded) {
            return Ok(Some(FoundLyrics {
                tokens,
                origin: LyricsOrigin::EmbeddedPlain,
            }));
        }
    }

    Ok(None)
}

/// Collapse untimed lyrics into a single token at 0
fn plain_text_tokens(text: &str) -> Option<Vec<LyricToken>> {
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");
    if joined.is_empty() {
        None
    } else {
        Some(vec![LyricToken::new(0.0, joined)])
    }
}

/// Find lyrics file with same name as audio file
fn find_lyrics_file(audio_path: &Path) -> Option<PathBuf> {
    let parent = audio_path.parent()?;
    let stem = audio_path.file_stem()?.to_str()?;

    for ext in LYRICS_EXTENSIONS {
        // Try lowercase extension
        let path = parent.join(format!("{}.{}", stem, ext));
        if path.exists() {
            return Some(path);
        }

        // Try uppercase extension
        let path = parent.join(format!("{}.{}", stem, ext.to_uppercase()));
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Extract embedded lyrics from audio file
fn extract_embedded_lyrics(audio_path: &Path) -> Option<String> {
    let tagged_file = Probe::open(audio_path).ok()?.read().ok()?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())?;

    tag.get_string(&ItemKey::Lyrics)
        .filter(|lyrics| !lyrics.is_empty())
        .map(|lyrics| lyrics.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lyricsync_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_lyrics_extensions() {
        assert_eq!(LYRICS_EXTENSIONS, &["lrc", "json"]);
    }

    #[test]
    fn test_same_name_file() {
        let dir = scratch_dir("same_name");
        let audio = dir.join("track.mp3");
        fs::write(dir.join("track.lrc"), "[00:01.00]I\n[00:02.00]want").unwrap();

        let found = find_lyrics(&audio, None).unwrap().unwrap();
        assert_eq!(found.tokens.len(), 2);
        assert_eq!(found.origin, LyricsOrigin::File(dir.join("track.lrc")));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_lrc_preferred_over_json() {
        let dir = scratch_dir("preferred");
        let audio = dir.join("song.ogg");
        fs::write(dir.join("song.json"), r#"[{"time":0,"text":"json"}]"#).unwrap();
        fs::write(dir.join("song.lrc"), "[00:00.00]lrc").unwrap();

        let found = find_lyrics(&audio, None).unwrap().unwrap();
        assert_eq!(found.tokens[0].text, "lrc");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = scratch_dir("explicit");
        let audio = dir.join("song.mp3");
        let explicit = dir.join("other.json");
        fs::write(dir.join("song.lrc"), "[00:00.00]same name").unwrap();
        fs::write(&explicit, r#"[{"time":0,"text":"explicit"}]"#).unwrap();

        let found = find_lyrics(&audio, Some(&explicit)).unwrap().unwrap();
        assert_eq!(found.tokens[0].text, "explicit");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_explicit_path_errors() {
        let dir = scratch_dir("explicit_err");
        let audio = dir.join("song.mp3");
        let empty = dir.join("empty.lrc");
        fs::write(&empty, "[ti:Only metadata]").unwrap();

        assert!(find_lyrics(&audio, Some(&dir.join("missing.lrc"))).is_err());
        assert!(find_lyrics(&audio, Some(&empty)).is_err());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_nothing_found() {
        let dir = scratch_dir("nothing");
        assert_eq!(find_lyrics(&dir.join("silent.wav"), None).unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_plain_text_tokens() {
        let tokens = plain_text_tokens("first line\n\n  second line \n").unwrap();
        assert_eq!(tokens, vec![LyricToken::new(0.0, "first line / second line")]);
        assert_eq!(plain_text_tokens(" \n "), None);
    }
}
