//! Rate limiting for drag-driven seeks
//!
//! The first seek of a burst goes out immediately. Later seeks arriving inside
//! the interval replace each other as a single pending value, released by
//! [`SeekThrottle::poll`] once the interval has elapsed or by
//! [`SeekThrottle::flush`] when the gesture ends. At most one seek leaves per
//! interval, and the last requested time is never lost.

use std::time::{Duration, Instant};

/// Default minimum spacing between emitted seeks
pub const DEFAULT_SEEK_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct SeekThrottle {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<f64>,
}

impl SeekThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    /// Offer a seek target; returns the time to emit now, if any
    pub fn offer(&mut self, time_seconds: f64, now: Instant) -> Option<f64> {
        if self.is_ready(now) {
            self.pending = None;
            self.last_emit = Some(now);
            Some(time_seconds)
        } else {
            self.pending = Some(time_seconds);
            None
        }
    }

    /// Release the pending seek if the interval has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        if self.pending.is_some() && self.is_ready(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Release the pending seek regardless of timing
    pub fn flush(&mut self, now: Instant) -> Option<f64> {
        let pending = self.pending.take()?;
        self.last_emit = Some(now);
        Some(pending)
    }

    fn is_ready(&self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }
}

impl Default for SeekThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_SEEK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_leading_edge_emits() {
        let mut throttle = SeekThrottle::default();
        let t0 = Instant::now();
        assert_eq!(throttle.offer(1.0, t0), Some(1.0));
        assert_eq!(throttle.flush(t0), None);
    }

    #[test]
    fn test_burst_keeps_latest() {
        let mut throttle = SeekThrottle::default();
        let t0 = Instant::now();
        assert_eq!(throttle.offer(1.0, t0), Some(1.0));
        assert_eq!(throttle.offer(1.1, t0 + ms(50)), None);
        assert_eq!(throttle.offer(1.2, t0 + ms(100)), None);
        assert_eq!(throttle.poll(t0 + ms(150)), None);
        assert_eq!(throttle.poll(t0 + ms(200)), Some(1.2));
        assert_eq!(throttle.poll(t0 + ms(500)), None);
    }

    #[test]
    fn test_one_emit_per_interval() {
        let mut throttle = SeekThrottle::default();
        let t0 = Instant::now();
        let mut emitted = 0;
        // 10 ms steps for one second
        for step in 0..100u64 {
            let now = t0 + ms(step * 10);
            if throttle.offer(step as f64, now).is_some() {
                emitted += 1;
            }
        }
        assert_eq!(emitted, 5);
    }

    #[test]
    fn test_flush_releases_pending() {
        let mut throttle = SeekThrottle::default();
        let t0 = Instant::now();
        throttle.offer(1.0, t0);
        throttle.offer(3.5, t0 + ms(20));
        assert_eq!(throttle.flush(t0 + ms(30)), Some(3.5));
        assert_eq!(throttle.flush(t0 + ms(40)), None);
    }

    #[test]
    fn test_flush_counts_as_emit() {
        let mut throttle = SeekThrottle::default();
        let t0 = Instant::now();
        throttle.offer(1.0, t0);
        throttle.offer(2.0, t0 + ms(50));
        throttle.flush(t0 + ms(60));
        assert_eq!(throttle.offer(3.0, t0 + ms(100)), None);
        assert_eq!(throttle.offer(4.0, t0 + ms(260)), Some(4.0));
    }

    #[test]
    fn test_emitting_clears_pending() {
        let mut throttle = SeekThrottle::default();
        let t0 = Instant::now();
        throttle.offer(1.0, t0);
        throttle.offer(2.0, t0 + ms(10));
        assert_eq!(throttle.offer(5.0, t0 + ms(210)), Some(5.0));
        assert_eq!(throttle.flush(t0 + ms(220)), None);
    }
}
