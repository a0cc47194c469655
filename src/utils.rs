//! Utility functions

use std::path::PathBuf;

// ============================================================================
// Time & Path Utilities
// ============================================================================

/// Format seconds as `m:ss`
///
/// Negative and NaN values show as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Get the base cache directory for lyricsync
pub fn cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "lyricsync", "Lyricsync")
        .map(|dirs| dirs.cache_dir().to_path_buf())
}
