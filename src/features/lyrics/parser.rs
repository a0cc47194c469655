//! Lyrics parsing module
//!
//! Supports two formats:
//! - LRC: `[mm:ss.xx]text`, with optional `<mm:ss.xx>` word tags
//! - JSON: token lists `[{"time": 1, "text": "I"}]`

mod json;
mod lrc;
mod types;

pub use types::*;

use std::path::Path;

/// Detect lyrics format from content
pub fn detect_format(content: &str) -> LyricsFormat {
    let trimmed = content.trim_start_matches('\u{feff}').trim();

    // JSON token list: an array of objects (or an empty array)
    if let Some(rest) = trimmed.strip_prefix('[') {
        let rest = rest.trim_start();
        if rest.starts_with('{') || rest.starts_with(']') {
            return LyricsFormat::Json;
        }
        return LyricsFormat::Lrc;
    }

    LyricsFormat::Unknown
}

/// Parse lyrics from string content
pub fn parse_lyrics(content: &str) -> Vec<LyricToken> {
    let format = detect_format(content);
    parse_lyrics_with_format(content, format)
}

/// Parse lyrics with specified format
pub fn parse_lyrics_with_format(content: &str, format: LyricsFormat) -> Vec<LyricToken> {
    let content = content.trim_start_matches('\u{feff}');
    match format {
        LyricsFormat::Lrc => lrc::parse_lrc(content),
        LyricsFormat::Json => match json::parse_json(content) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!("Invalid JSON lyrics: {}", e);
                Vec::new()
            }
        },
        LyricsFormat::Unknown => {
            // Try LRC as fallback
            lrc::parse_lrc(content)
        }
    }
}

/// Parse lyrics from file
pub fn parse_lyrics_file(path: &Path) -> Option<Vec<LyricToken>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read lyrics {:?}: {}", path, e);
            return None;
        }
    };
    let tokens = parse_lyrics(&content);
    if tokens.is_empty() { None } else { Some(tokens) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_lrc() {
        let content = "[00:01.12]First line\n[00:05.00]Second line";
        assert_eq!(detect_format(content), LyricsFormat::Lrc);
        assert_eq!(detect_format("[ti:Title]\n[00:01.00]x"), LyricsFormat::Lrc);
    }

    #[test]
    fn test_detect_json() {
        assert_eq!(detect_format(r#"[{"time":1,"text":"I"}]"#), LyricsFormat::Json);
        assert_eq!(detect_format("\n  [\n  { \"time\": 0 }"), LyricsFormat::Json);
        assert_eq!(detect_format("[]"), LyricsFormat::Json);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_format("just some words"), LyricsFormat::Unknown);
    }

    #[test]
    fn test_parse_lrc() {
        let content = "\u{feff}[00:01.12]First line\n[00:05.00]Second line";
        let tokens = parse_lyrics(content);
        assert_eq!(tokens.len(), 2);
        assert!((tokens[0].start_time - 1.12).abs() < 1e-9);
    }

    #[test]
    fn test_parse_bad_json_is_empty() {
        assert!(parse_lyrics(r#"[{"time": "x"}]"#).is_empty());
    }

    #[test]
    fn test_parse_lyrics_file() {
        let path = std::env::temp_dir().join("lyricsync_parser_test.json");
        std::fs::write(&path, r#"[{"time":0,"text":"This"},{"time":1,"text":"is"}]"#).unwrap();
        let tokens = parse_lyrics_file(&path).unwrap();
        assert_eq!(tokens[1], LyricToken::new(1.0, "is"));
        let _ = std::fs::remove_file(&path);

        assert!(parse_lyrics_file(Path::new("/nonexistent/lyricsync.lrc")).is_none());
    }
}
