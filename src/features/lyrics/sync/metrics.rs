//! Measured widths of lyric tokens
//!
//! The layout pass reports widths whenever it gets to them, in any order and
//! possibly more than once. Unmeasured tokens count as zero width so offsets
//! can always be computed; they self-correct once the width arrives.

/// Width table for the tokens of one track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordMetrics {
    /// Width per token index, `None` until first measured
    widths: Vec<Option<f32>>,
    /// Number of entries that have been measured at least once
    measured: usize,
}

impl WordMetrics {
    /// Create an empty table for `token_count` tokens
    pub fn new(token_count: usize) -> Self {
        Self {
            widths: vec![None; token_count],
            measured: 0,
        }
    }

    /// Forget all measurements and resize for a new token sequence
    pub fn reset(&mut self, token_count: usize) {
        self.widths.clear();
        self.widths.resize(token_count, None);
        self.measured = 0;
    }

    /// Store (or overwrite) the measured width of a token
    ///
    /// Returns true if the stored value changed. Negative or non-finite widths
    /// are stored as 0, indices past the token count are ignored.
    pub fn record(&mut self, index: usize, width_px: f32) -> bool {
        let Some(slot) = self.widths.get_mut(index) else {
            tracing::debug!(
                "Ignoring width for token {} (only {} tokens)",
                index,
                self.widths.len()
            );
            return false;
        };

        let width = if width_px.is_finite() {
            width_px.max(0.0)
        } else {
            0.0
        };

        if slot.is_none() {
            self.measured += 1;
        }
        let changed = *slot != Some(width);
        *slot = Some(width);
        changed
    }

    /// Sum of widths of all tokens before `index` (unmeasured count as 0)
    pub fn cumulative_width_before(&self, index: usize) -> f32 {
        self.widths
            .iter()
            .take(index)
            .map(|w| w.unwrap_or(0.0))
            .sum()
    }

    /// Total width of the strip, or `None` until every token was measured
    pub fn total_width(&self) -> Option<f32> {
        self.is_complete()
            .then(|| self.cumulative_width_before(self.widths.len()))
    }

    /// Whether every token has a width
    fn is_complete(&self) -> bool {
        self.measured == self.widths.len()
    }
}
