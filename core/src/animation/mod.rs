pub mod clock;
pub mod easing;
pub mod tween;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use easing::{AnimMode, Easing};
pub use tween::{TweenScheduler, MIN_TWEEN_DURATION};
