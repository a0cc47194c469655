//! Lyrics module - parsing and playback sync
//!
//! - `parser`: LRC and JSON token lists
//! - `sync`: keeps the lyric strip in step with playback and maps drags to seeks

pub mod parser;
pub mod sync;

// Re-export commonly used items
pub use parser::*;
