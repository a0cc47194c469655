//! Timed interpolation of strip offsets
//!
//! The controller only says "go to X over D"; frames are advanced by the event
//! loop calling [`StripAnimator::update`]. A new target during a running
//! animation starts from the current value, so the motion never jumps.

use std::time::Duration;

/// Default duration of a scroll or note animation
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// Targets closer than this to the current one are not restarted
const RETARGET_EPSILON: f32 = 0.01;

/// Which animated value a target applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationChannel {
    /// Horizontal scroll of the strip
    Scroll,
    /// Note marker under the active token
    Note,
}

/// Receiver of animation targets
pub trait AnimationDriver {
    /// Start interpolating `channel` towards `target` over `duration`
    fn animate_to(&mut self, channel: AnimationChannel, target: f32, duration: Duration);
}

/// Ease-out cubic: fast start, soft landing
fn ease_out(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Single value interpolated with an ease-out curve
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    value: f32,
    elapsed: Duration,
    duration: Duration,
}

impl Tween {
    pub fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            value,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }

    /// Animate from the current value towards `target`
    pub fn retarget(&mut self, target: f32, duration: Duration) {
        if !target.is_finite() || (target - self.to).abs() < RETARGET_EPSILON {
            return;
        }

        self.from = self.value;
        self.to = target;
        self.elapsed = Duration::ZERO;
        self.duration = duration;

        if duration.is_zero() {
            self.value = target;
        }
    }

    /// Advance by `dt`; returns true while still moving
    pub fn update(&mut self, dt: Duration) -> bool {
        if !self.is_animating() {
            return false;
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        let progress = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.value = self.from + (self.to - self.from) * ease_out(progress);

        if self.elapsed >= self.duration {
            self.value = self.to;
        }
        self.is_animating()
    }

    /// Jump to `value` without animating
    pub fn set_value(&mut self, value: f32) {
        *self = Self::new(value);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.value != self.to && self.elapsed < self.duration
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Scroll and note animations for one lyric strip
#[derive(Debug, Clone, Default)]
pub struct StripAnimator {
    scroll: Tween,
    note: Tween,
}

impl StripAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both channels by one frame
    pub fn update(&mut self, dt: Duration) -> bool {
        let scroll = self.scroll.update(dt);
        let note = self.note.update(dt);
        scroll || note
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.value()
    }

    pub fn note_offset(&self) -> f32 {
        self.note.value()
    }

    /// Place the strip where a released drag left it
    pub fn set_scroll_offset(&mut self, value: f32) {
        self.scroll.set_value(value);
    }
}

impl AnimationDriver for StripAnimator {
    fn animate_to(&mut self, channel: AnimationChannel, target: f32, duration: Duration) {
        match channel {
            AnimationChannel::Scroll => self.scroll.retarget(target, duration),
            AnimationChannel::Note => self.note.retarget(target, duration),
        }
    }
}
