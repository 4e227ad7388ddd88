use std::fmt;
use std::time::{Duration, Instant};

/// Lifecycle of a [`ControlLoop`][crate::ControlLoop].
///
/// ```text
/// Idle ──start──► Running ──Terminate / cancel──► Terminating ──stop──► Stopped
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LoopState {
    Idle,
    Running,
    Terminating,
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopState::Idle        => "idle",
            LoopState::Running     => "running",
            LoopState::Terminating => "terminating",
            LoopState::Stopped     => "stopped",
        };
        f.write_str(s)
    }
}

/// Pacing state, created by `start()` and touched only by the loop.
#[derive(Copy, Clone, Debug)]
pub struct SchedulerState {
    pub tick_interval: Duration,
    pub running:       bool,
    /// Wall-clock instant the current (or last) tick began.
    pub last_tick_at:  Instant,
}

impl SchedulerState {
    pub fn new(tick_interval: Duration) -> Self {
        Self { tick_interval, running: true, last_tick_at: Instant::now() }
    }
}
