//! Arbitration between playback-driven and user-driven strip movement
//!
//! ```text
//!            gesture_start
//!   Auto  ------------------>  UserDragging
//!    ^                              |
//!    +--- gesture_end / cancel -----+
//! ```
//!
//! In `Auto` every playback tick re-targets the strip animation. While the
//! user drags, ticks only refresh the remembered playback state and drag
//! offsets become throttled seek requests. The two never run at once, so the
//! strip cannot feed its own movement back into playback.

use std::time::{Duration, Instant};

use super::animation::{AnimationChannel, AnimationDriver, DEFAULT_ANIMATION_DURATION};
use super::clock::{PlaybackState, SeekRequest};
use super::mapping::{OffsetMapper, ScrollExtent, TargetOffset, offset_to_time};
use super::metrics::WordMetrics;
use super::throttle::{DEFAULT_SEEK_INTERVAL, SeekThrottle};
use crate::features::lyrics::LyricToken;

/// Who currently drives the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Offsets follow playback time
    #[default]
    Auto,
    /// A drag gesture is in progress; playback follows the strip
    UserDragging,
}

/// Tunables for a controller instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    pub animation_duration: Duration,
    pub seek_interval: Duration,
    pub extent: ScrollExtent,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            animation_duration: DEFAULT_ANIMATION_DURATION,
            seek_interval: DEFAULT_SEEK_INTERVAL,
            extent: ScrollExtent::default(),
        }
    }
}

/// Sync state for one lyric display
#[derive(Debug)]
pub struct ScrollSyncController<A: AnimationDriver> {
    tokens: Vec<LyricToken>,
    metrics: WordMetrics,
    extent: ScrollExtent,
    viewport_width: f32,
    animation_duration: Duration,
    mode: SyncMode,
    throttle: SeekThrottle,
    driver: A,
    /// Most recent playback snapshot, kept during drags for the duration
    last_state: Option<PlaybackState>,
    last_target: Option<TargetOffset>,
}

impl<A: AnimationDriver> ScrollSyncController<A> {
    pub fn new(config: SyncConfig, driver: A) -> Self {
        Self {
            tokens: Vec::new(),
            metrics: WordMetrics::default(),
            extent: config.extent,
            viewport_width: 0.0,
            animation_duration: config.animation_duration,
            mode: SyncMode::Auto,
            throttle: SeekThrottle::new(config.seek_interval),
            driver,
            last_state: None,
            last_target: None,
        }
    }

    /// Replace the token sequence for a new track
    ///
    /// Width measurements and the previous target are discarded. The mode is
    /// left alone so an in-flight gesture still ends cleanly.
    pub fn load_tokens(&mut self, tokens: Vec<LyricToken>) {
        tracing::debug!("Loaded {} lyric tokens", tokens.len());
        self.metrics.reset(tokens.len());
        self.tokens = tokens;
        self.last_state = None;
        self.last_target = None;
    }

    pub fn tokens(&self) -> &[LyricToken] {
        &self.tokens
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn driver(&self) -> &A {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut A {
        &mut self.driver
    }

    pub fn last_target(&self) -> Option<TargetOffset> {
        self.last_target
    }

    pub fn last_state(&self) -> Option<PlaybackState> {
        self.last_state
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Update the visible strip width, re-targeting if it changed
    ///
    /// While dragging the width is only stored; the next tick in `Auto` uses it.
    pub fn set_viewport_width(&mut self, width_px: f32) {
        let width = if width_px.is_finite() {
            width_px.max(0.0)
        } else {
            0.0
        };
        if (width - self.viewport_width).abs() < f32::EPSILON {
            return;
        }
        self.viewport_width = width;
        if self.mode == SyncMode::Auto {
            self.refresh();
        }
    }

    /// Total strip width under the configured extent mode
    pub fn scroll_extent_px(&self) -> f32 {
        self.extent.resolve(self.tokens.len(), &self.metrics)
    }

    /// Start of a user drag; suspends automatic scrolling
    pub fn gesture_start(&mut self) {
        if self.mode == SyncMode::UserDragging {
            tracing::debug!("Gesture start while already dragging");
            return;
        }
        self.mode = SyncMode::UserDragging;
        tracing::debug!("Sync mode: UserDragging");
    }

    /// Raw strip offset reported during a drag
    ///
    /// Returns the seek to issue now, if the throttle lets one through.
    pub fn scroll_delta(&mut self, offset_px: f32, now: Instant) -> Option<SeekRequest> {
        if self.mode != SyncMode::UserDragging {
            return None;
        }

        let duration = self.last_state.map(|s| s.duration_seconds).unwrap_or(0.0);
        let extent = self.scroll_extent_px();
        let Some(time_seconds) = offset_to_time(offset_px, extent, duration) else {
            tracing::debug!(
                "Dropping out-of-range drag offset {:.1} (extent {:.1}, duration {:.2}s)",
                offset_px,
                extent,
                duration
            );
            return None;
        };

        self.throttle
            .offer(time_seconds, now)
            .map(|time_seconds| SeekRequest { time_seconds })
    }

    /// Release a seek held back by the throttle once its interval passed
    pub fn poll_pending_seek(&mut self, now: Instant) -> Option<SeekRequest> {
        if self.mode != SyncMode::UserDragging {
            return None;
        }
        self.throttle
            .poll(now)
            .map(|time_seconds| SeekRequest { time_seconds })
    }

    /// End of a drag; returns the held-back final seek, if any
    pub fn gesture_end(&mut self, now: Instant) -> Option<SeekRequest> {
        if self.mode != SyncMode::UserDragging {
            return None;
        }
        self.mode = SyncMode::Auto;
        tracing::debug!("Sync mode: Auto");
        self.throttle
            .flush(now)
            .map(|time_seconds| SeekRequest { time_seconds })
    }

    /// Interrupted drag; same transition as [`Self::gesture_end`]
    pub fn gesture_cancel(&mut self, now: Instant) -> Option<SeekRequest> {
        if self.mode == SyncMode::UserDragging {
            tracing::debug!("Gesture cancelled");
        }
        self.gesture_end(now)
    }

    /// New playback snapshot from the clock
    ///
    /// Returns the new target while in `Auto`, `None` while dragging or when
    /// there are no tokens.
    pub fn playback_tick(&mut self, state: PlaybackState) -> Option<TargetOffset> {
        self.last_state = Some(state.sanitized());
        if self.mode != SyncMode::Auto {
            return None;
        }
        self.refresh()
    }

    /// Width of a token reported by the layout pass
    pub fn word_measured(&mut self, index: usize, width_px: f32) -> Option<TargetOffset> {
        if !self.metrics.record(index, width_px) {
            return None;
        }
        if self.mode != SyncMode::Auto {
            return None;
        }
        self.refresh()
    }

    /// Re-target from the last known playback state
    fn refresh(&mut self) -> Option<TargetOffset> {
        let state = self.last_state?;
        let mapper = OffsetMapper {
            tokens: &self.tokens,
            metrics: &self.metrics,
            viewport_width: self.viewport_width,
            scroll_extent: self.scroll_extent_px(),
        };
        let target = mapper.target_at(state.position_seconds, state.duration_seconds)?;

        self.driver.animate_to(
            AnimationChannel::Scroll,
            target.scroll_offset_px,
            self.animation_duration,
        );
        self.driver.animate_to(
            AnimationChannel::Note,
            target.note_offset_px,
            self.animation_duration,
        );

        self.last_target = Some(target);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lyrics::sync::clock::testing::ManualClock;
    use crate::features::lyrics::sync::clock::{dispatch_seek, read_status};

    #[derive(Debug, Default)]
    struct RecordingDriver {
        calls: Vec<(AnimationChannel, f32, Duration)>,
    }

    impl AnimationDriver for RecordingDriver {
        fn animate_to(&mut self, channel: AnimationChannel, target: f32, duration: Duration) {
            self.calls.push((channel, target, duration));
        }
    }

    fn scenario_tokens() -> Vec<LyricToken> {
        ["This", "is", "the", "song", "lyrics"]
            .iter()
            .enumerate()
            .map(|(i, text)| LyricToken::new(i as f64, *text))
            .collect()
    }

    fn state(position_seconds: f64, duration_seconds: f64) -> PlaybackState {
        PlaybackState {
            position_seconds,
            duration_seconds,
            is_playing: true,
            did_finish: false,
        }
    }

    /// 5 tokens of 100px: extent 500, viewport 300
    fn fixed_controller() -> ScrollSyncController<RecordingDriver> {
        let config = SyncConfig {
            extent: ScrollExtent::FixedPerToken(100.0),
            ..Default::default()
        };
        let mut controller = ScrollSyncController::new(config, RecordingDriver::default());
        controller.load_tokens(scenario_tokens());
        controller.set_viewport_width(300.0);
        controller
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_tick_animates_both_channels() {
        let mut controller = fixed_controller();
        let target = controller.playback_tick(state(2.5, 5.0)).unwrap();

        assert_eq!(target.active_token_index, 2);
        assert_eq!(target.scroll_offset_px, 200.0);

        let calls = &controller.driver().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (AnimationChannel::Scroll, 200.0, DEFAULT_ANIMATION_DURATION));
        assert_eq!(calls[1].0, AnimationChannel::Note);
    }

    #[test]
    fn test_zero_duration_tick() {
        let mut controller = fixed_controller();
        let target = controller.playback_tick(state(3.0, 0.0)).unwrap();
        assert_eq!(target.scroll_offset_px, 0.0);
    }

    #[test]
    fn test_malformed_tick_is_clamped() {
        let mut controller = fixed_controller();
        let target = controller.playback_tick(state(-4.0, f64::NAN)).unwrap();
        assert_eq!(target.scroll_offset_px, 0.0);
        assert_eq!(target.active_token_index, 0);
    }

    #[test]
    fn test_drag_gesture_scenario() {
        let mut controller = fixed_controller();
        controller.playback_tick(state(0.0, 10.0));
        let t0 = Instant::now();

        controller.gesture_start();
        assert_eq!(controller.mode(), SyncMode::UserDragging);

        let mut seeks = Vec::new();
        seeks.extend(controller.scroll_delta(120.0, t0));
        seeks.extend(controller.gesture_end(t0 + Duration::from_millis(10)));

        assert_eq!(seeks.len(), 1);
        assert!(approx_eq(seeks[0].time_seconds, 2.4));
        assert_eq!(controller.mode(), SyncMode::Auto);
    }

    #[test]
    fn test_ticks_ignored_while_dragging() {
        let mut controller = fixed_controller();
        controller.playback_tick(state(1.0, 10.0));
        let before = controller.driver().calls.len();
        let target = controller.last_target();

        controller.gesture_start();
        assert_eq!(controller.playback_tick(state(6.0, 10.0)), None);
        assert_eq!(controller.word_measured(0, 30.0), None);
        assert_eq!(controller.driver().calls.len(), before);
        assert_eq!(controller.last_target(), target);
    }

    #[test]
    fn test_resize_ignored_while_dragging() {
        let mut controller = fixed_controller();
        controller.playback_tick(state(0.0, 10.0));
        let before = controller.last_target();
        let calls_before = controller.driver().calls.len();

        controller.gesture_start();
        controller.playback_tick(state(3.0, 10.0));
        controller.set_viewport_width(200.0);

        assert_eq!(controller.mode(), SyncMode::UserDragging);
        assert_eq!(controller.viewport_width(), 200.0);
        assert_eq!(controller.last_target(), before);
        assert_eq!(controller.driver().calls.len(), calls_before);

        // Back in Auto the stored width applies to the next tick
        controller.gesture_end(Instant::now());
        let target = controller.playback_tick(state(3.0, 10.0)).unwrap();
        assert_eq!(target.scroll_offset_px, 150.0);
    }

    #[test]
    fn test_no_seek_in_auto() {
        let mut controller = fixed_controller();
        controller.playback_tick(state(1.0, 10.0));
        let now = Instant::now();

        assert_eq!(controller.scroll_delta(120.0, now), None);
        assert_eq!(controller.poll_pending_seek(now), None);
        assert_eq!(controller.gesture_end(now), None);
    }

    #[test]
    fn test_out_of_range_drag_dropped() {
        let mut controller = fixed_controller();
        controller.playback_tick(state(0.0, 10.0));
        controller.gesture_start();
        let now = Instant::now();

        assert_eq!(controller.scroll_delta(-20.0, now), None);
        assert_eq!(controller.scroll_delta(900.0, now), None);
        assert_eq!(controller.gesture_end(now), None);
    }

    #[test]
    fn test_drag_without_duration_dropped() {
        let mut controller = fixed_controller();
        controller.gesture_start();
        assert_eq!(controller.scroll_delta(120.0, Instant::now()), None);
    }

    #[test]
    fn test_throttled_drag_emits_last_on_end() {
        let mut controller = fixed_controller();
        controller.playback_tick(state(0.0, 10.0));
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        controller.gesture_start();
        let first = controller.scroll_delta(50.0, t0).unwrap();
        assert!(approx_eq(first.time_seconds, 1.0));
        assert_eq!(controller.scroll_delta(60.0, t0 + ms(30)), None);
        assert_eq!(controller.scroll_delta(75.0, t0 + ms(60)), None);
        assert_eq!(controller.poll_pending_seek(t0 + ms(100)), None);

        let last = controller.gesture_end(t0 + ms(120)).unwrap();
        assert!(approx_eq(last.time_seconds, 1.5));
    }

    #[test]
    fn test_pending_seek_released_by_poll() {
        let mut controller = fixed_controller();
        controller.playback_tick(state(0.0, 10.0));
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        controller.gesture_start();
        controller.scroll_delta(50.0, t0);
        controller.scroll_delta(100.0, t0 + ms(50));

        let held = controller.poll_pending_seek(t0 + ms(210)).unwrap();
        assert!(approx_eq(held.time_seconds, 2.0));
        assert_eq!(controller.gesture_end(t0 + ms(220)), None);
    }

    #[test]
    fn test_cancel_matches_end() {
        let mut ended = fixed_controller();
        let mut cancelled = fixed_controller();
        let t0 = Instant::now();

        for controller in [&mut ended, &mut cancelled] {
            controller.playback_tick(state(0.0, 10.0));
            controller.gesture_start();
            controller.scroll_delta(50.0, t0);
            controller.scroll_delta(100.0, t0 + Duration::from_millis(20));
        }

        let a = ended.gesture_end(t0 + Duration::from_millis(40));
        let b = cancelled.gesture_cancel(t0 + Duration::from_millis(40));
        assert_eq!(a, b);
        assert_eq!(ended.mode(), SyncMode::Auto);
        assert_eq!(cancelled.mode(), SyncMode::Auto);

        // Auto again: ticks drive the strip
        assert!(cancelled.playback_tick(state(2.0, 10.0)).is_some());
    }

    #[test]
    fn test_late_measurement_retargets() {
        let mut controller = ScrollSyncController::new(SyncConfig::default(), RecordingDriver::default());
        controller.load_tokens(scenario_tokens());
        controller.set_viewport_width(100.0);

        for (i, w) in [40.0, 40.0, 40.0, 40.0].iter().enumerate() {
            controller.word_measured(i, *w);
        }
        let before = controller.playback_tick(state(2.5, 5.0)).unwrap();
        // Total unknown until the last token arrives
        assert_eq!(before.note_offset_px, 0.0);
        assert_eq!(before.scroll_offset_px, 0.0);

        let after = controller.word_measured(4, 40.0).unwrap();
        assert_eq!(controller.scroll_extent_px(), 200.0);
        assert_eq!(after.note_offset_px, 80.0);
        assert_eq!(after.scroll_offset_px, 100.0);

        // Re-delivery of the same width changes nothing
        assert_eq!(controller.word_measured(4, 40.0), None);
    }

    #[test]
    fn test_empty_tokens_freeze() {
        let mut controller = ScrollSyncController::new(SyncConfig::default(), RecordingDriver::default());
        assert_eq!(controller.playback_tick(state(1.0, 5.0)), None);
        assert!(controller.driver().calls.is_empty());
    }

    #[test]
    fn test_load_tokens_resets_metrics() {
        let mut controller = fixed_controller();
        controller.word_measured(0, 12.0);
        controller.playback_tick(state(1.0, 5.0));

        controller.load_tokens(vec![LyricToken::new(0.0, "new")]);
        assert_eq!(controller.scroll_extent_px(), 100.0);
        assert_eq!(controller.last_target(), None);
    }

    #[test]
    fn test_clock_roundtrip() {
        let clock = ManualClock::at(0.0, 10.0);
        let mut controller = fixed_controller();
        controller.playback_tick(read_status(&clock).unwrap());

        controller.gesture_start();
        let seek = controller.scroll_delta(120.0, Instant::now()).unwrap();
        assert!(dispatch_seek(&clock, seek));
        controller.gesture_end(Instant::now());

        let target = controller.playback_tick(read_status(&clock).unwrap()).unwrap();
        assert!((target.scroll_offset_px - 120.0).abs() < 1e-3);
        assert_eq!(target.active_token_index, 2);
    }
}
