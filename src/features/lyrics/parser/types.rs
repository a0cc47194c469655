//! Lyrics data types

use serde::{Deserialize, Serialize};

/// Upper bound for any timestamp (999:99.999)
pub const MAX_TIME: f64 = 60039.999;

/// Lyrics format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsFormat {
    /// Line-level LRC `[mm:ss.xx]text`, optionally with `<mm:ss.xx>` word tags
    Lrc,
    /// Token list `[{"time": 1, "text": "I"}, ...]`
    Json,
    /// Unknown format
    Unknown,
}

/// One lyric word or phrase with the time it starts being sung
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LyricToken {
    /// Start time in seconds
    #[serde(rename = "time", alias = "startTime", alias = "start_time")]
    pub start_time: f64,
    /// The token text
    pub text: String,
}

impl LyricToken {
    pub fn new(start_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            text: text.into(),
        }
    }

    /// Check if the token is empty (whitespace only)
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Process tokens: drop blanks, clamp times and sort by start time
///
/// The sort is stable so tokens sharing a timestamp keep their file order.
pub fn process_tokens(tokens: &mut Vec<LyricToken>) {
    tokens.retain(|t| !t.is_empty());

    for token in tokens.iter_mut() {
        token.start_time = if token.start_time.is_finite() {
            token.start_time.clamp(0.0, MAX_TIME)
        } else {
            0.0
        };
    }

    tokens.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
}
