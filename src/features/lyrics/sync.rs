//! Lyric strip synchronization engine
//!
//! Keeps a horizontally scrolling lyric strip in step with playback and turns
//! drag gestures on the strip back into seek requests.
//!
//! ## Data flow
//! ```text
//! PlaybackClock --tick--> ScrollSyncController --target--> AnimationDriver
//!                               |   ^
//!                   SeekRequest |   | gesture_start / scroll_delta / gesture_end
//!                               v   |
//! PlaybackClock <--seek--  (throttled)      Layout --word_measured--> WordMetrics
//! ```
//!
//! - `metrics`: measured token widths and cumulative offsets
//! - `mapping`: pure time <-> offset conversions
//! - `controller`: the `Auto` / `UserDragging` state machine
//! - `throttle`: rate limiting for drag-driven seeks
//! - `clock`: playback collaborator boundary
//! - `animation`: timed interpolation of scroll and note offsets

pub mod animation;
pub mod clock;
pub mod controller;
pub mod mapping;
pub mod metrics;
pub mod throttle;

pub use animation::{AnimationChannel, AnimationDriver, StripAnimator, Tween};
pub use clock::{PlaybackClock, PlaybackState, SeekRequest, dispatch_seek, read_status};
pub use controller::{ScrollSyncController, SyncConfig, SyncMode};
pub use mapping::{OffsetMapper, ScrollExtent, TargetOffset, active_token_index, offset_to_time};
pub use metrics::WordMetrics;
pub use throttle::SeekThrottle;
