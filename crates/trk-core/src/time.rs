//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  `SimClock` maps it to
//! the exercise's simulated time of day:
//!
//!   sim_time = exercise_start + tick * tick_interval
//!
//! The control loop advances the clock once per executed tick.  Wall-clock
//! pacing is the loop's concern; the clock itself never reads the system
//! time, which keeps it deterministic under test.

use std::fmt;
use std::time::Duration;

use crate::{CoreError, CoreResult};

const SECS_PER_DAY: u64 = 86_400;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeOfDay ────────────────────────────────────────────────────────────────

/// Hour, minute and second within a day.  Used for the exercise start time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay {
    pub hour:   u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8, second: u8) -> CoreResult<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(CoreError::InvalidTimeOfDay(format!(
                "{hour:02}:{minute:02}:{second:02}"
            )));
        }
        Ok(Self { hour, minute, second })
    }

    /// Parse `HH:MM:SS` (or `HH:MM`, seconds defaulting to zero).
    pub fn parse(s: &str) -> CoreResult<Self> {
        let bad = || CoreError::InvalidTimeOfDay(s.to_string());
        let mut parts = s.trim().split(':');

        let mut field = |required: bool| -> CoreResult<u8> {
            match parts.next() {
                Some(p) => p.parse::<u8>().map_err(|_| bad()),
                None if required => Err(bad()),
                None => Ok(0),
            }
        };

        let hour = field(true)?;
        let minute = field(true)?;
        let second = field(false)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Self::new(hour, minute, second).map_err(|_| bad())
    }

    #[inline]
    pub fn seconds_of_day(self) -> u64 {
        self.hour as u64 * 3_600 + self.minute as u64 * 60 + self.second as u64
    }

    /// Inverse of [`seconds_of_day`][Self::seconds_of_day], wrapping at midnight.
    pub fn from_seconds_of_day(secs: u64) -> Self {
        let secs = secs % SECS_PER_DAY;
        Self {
            hour:   (secs / 3_600) as u8,
            minute: ((secs % 3_600) / 60) as u8,
            second: (secs % 60) as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated exercise time.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulated time of day at tick 0.
    pub exercise_start: TimeOfDay,
    /// Simulated time covered by one tick.
    pub tick_interval:  Duration,
    /// The current tick: advanced by `SimClock::advance()` each tick.
    pub current_tick:   Tick,
}

impl SimClock {
    /// Create a clock starting at `exercise_start` with the given resolution.
    pub fn new(exercise_start: TimeOfDay, tick_interval: Duration) -> CoreResult<Self> {
        if tick_interval.is_zero() {
            return Err(CoreError::ZeroTickInterval);
        }
        Ok(Self {
            exercise_start,
            tick_interval,
            current_tick: Tick::ZERO,
        })
    }

    /// Reset the clock to tick 0 at a new exercise start time.
    pub fn set_start(&mut self, exercise_start: TimeOfDay) {
        self.exercise_start = exercise_start;
        self.current_tick = Tick::ZERO;
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Simulated time elapsed since tick 0.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.tick_interval.saturating_mul(self.current_tick.0.min(u32::MAX as u64) as u32)
    }

    /// Simulated time of day at the current tick (wraps at midnight).
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_seconds_of_day(
            self.exercise_start.seconds_of_day() + self.elapsed().as_secs(),
        )
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_tick, self.time_of_day())
    }
}
