//! Tick pacing decision.
//!
//! After each tick the loop compares the time spent since the tick began
//! with the target interval.  Time left over is slept, scaled by
//! [`SLEEP_FACTOR`] so wake-up latency does not push ticks late; a tick
//! that used up its interval is reported as an overrun and the next tick
//! starts immediately, with no catch-up.

use std::time::Duration;

/// Fraction of the remaining interval actually slept.
pub const SLEEP_FACTOR: f64 = 0.99;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Pace {
    /// Sleep this long before the next tick.
    Sleep(Duration),
    /// The tick took this much longer than the interval.
    Behind(Duration),
}

pub fn pace(interval: Duration, elapsed: Duration) -> Pace {
    if elapsed < interval {
        Pace::Sleep((interval - elapsed).mul_f64(SLEEP_FACTOR))
    } else {
        Pace::Behind(elapsed - interval)
    }
}
