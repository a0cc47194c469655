//! Time <-> offset conversions for the lyric strip
//!
//! Everything here is pure: the same inputs always give the same output.
//!
//! ```text
//! scroll = clamp(position / duration * extent, 0, max(extent - viewport, 0))
//! time   = offset / extent * duration        (dropped outside [0, duration])
//! ```

use super::metrics::WordMetrics;
use crate::features::lyrics::LyricToken;

/// How the total horizontal span of the strip is derived
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScrollExtent {
    /// Every token occupies the same width
    FixedPerToken(f32),
    /// Sum of the measured token widths (0 while unknown)
    #[default]
    Measured,
}

impl ScrollExtent {
    /// Resolve the extent in pixels for the current token sequence
    pub fn resolve(&self, token_count: usize, metrics: &WordMetrics) -> f32 {
        match *self {
            ScrollExtent::FixedPerToken(width) => sanitize_px(width) * token_count as f32,
            ScrollExtent::Measured => metrics.total_width().unwrap_or(0.0),
        }
    }
}

/// Where the strip and the note marker should be for a playback time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetOffset {
    /// Horizontal scroll of the strip
    pub scroll_offset_px: f32,
    /// Position of the note marker
    pub note_offset_px: f32,
    /// Token being sung
    pub active_token_index: usize,
}

/// Maps playback time onto strip geometry
#[derive(Debug, Clone, Copy)]
pub struct OffsetMapper<'a> {
    pub tokens: &'a [LyricToken],
    pub metrics: &'a WordMetrics,
    pub viewport_width: f32,
    pub scroll_extent: f32,
}

impl OffsetMapper<'_> {
    /// Compute the target offsets for a playback position
    ///
    /// Returns `None` for an empty token sequence; the caller keeps whatever
    /// it is showing.
    pub fn target_at(&self, position_seconds: f64, duration_seconds: f64) -> Option<TargetOffset> {
        let position = sanitize_seconds(position_seconds);
        let active_token_index = active_token_index(self.tokens, position)?;

        let scroll_offset_px = scroll_offset_for(
            position,
            duration_seconds,
            self.scroll_extent,
            self.viewport_width,
        );

        let note_offset_px = match self.metrics.total_width() {
            Some(total) => clamp_to_span(
                self.metrics.cumulative_width_before(active_token_index),
                total,
                self.viewport_width,
            ),
            None => 0.0,
        };

        Some(TargetOffset {
            scroll_offset_px,
            note_offset_px,
            active_token_index,
        })
    }
}

/// Scroll offset proportional to playback progress
pub fn scroll_offset_for(
    position_seconds: f64,
    duration_seconds: f64,
    scroll_extent: f32,
    viewport_width: f32,
) -> f32 {
    let position = sanitize_seconds(position_seconds);
    let duration = sanitize_seconds(duration_seconds);
    if duration <= 0.0 {
        return 0.0;
    }

    let extent = sanitize_px(scroll_extent);
    let raw = (position / duration * extent as f64) as f32;
    clamp_to_span(raw, extent, viewport_width)
}

/// Index of the last token whose start time is at or before `position`
///
/// Positions before the first token map to index 0. `None` only for an empty
/// sequence.
pub fn active_token_index(tokens: &[LyricToken], position_seconds: f64) -> Option<usize> {
    if tokens.is_empty() {
        return None;
    }
    let position = sanitize_seconds(position_seconds);
    let started = tokens.partition_point(|t| t.start_time <= position);
    Some(started.saturating_sub(1))
}

/// Convert a raw strip offset back into a playback time
///
/// Out-of-range results are a normal transient while dragging and are
/// dropped, as are degenerate extents and durations.
pub fn offset_to_time(offset_px: f32, scroll_extent: f32, duration_seconds: f64) -> Option<f64> {
    if !offset_px.is_finite() || !scroll_extent.is_finite() || !duration_seconds.is_finite() {
        return None;
    }
    if scroll_extent <= 0.0 || duration_seconds <= 0.0 {
        return None;
    }

    let time = offset_px as f64 / scroll_extent as f64 * duration_seconds;
    (0.0..=duration_seconds).contains(&time).then_some(time)
}

/// Clamp an offset into `[0, max(span - viewport, 0)]`
fn clamp_to_span(offset: f32, span: f32, viewport_width: f32) -> f32 {
    let max = (span - sanitize_px(viewport_width)).max(0.0);
    offset.clamp(0.0, max)
}

/// Negative and NaN seconds become 0
pub fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn sanitize_px(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
