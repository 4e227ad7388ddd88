//! Control loop observer trait for progress reporting and instrumentation.

use std::time::Duration;

use trk_core::Tick;
use trk_net::MessageKind;

use crate::LoopState;

/// Callbacks invoked by [`ControlLoop`][crate::ControlLoop] at key points of
/// its lifecycle.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: overrun counter
///
/// ```rust,ignore
/// struct Overruns(u32);
///
/// impl LoopObserver for Overruns {
///     fn on_behind_schedule(&mut self, _tick: Tick, _overrun: Duration) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait LoopObserver {
    fn on_state_change(&mut self, _from: LoopState, _to: LoopState) {}

    /// Called after the clock advanced, before the world step.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the world step; `work` is the number of messages it
    /// produced.
    fn on_tick_end(&mut self, _tick: Tick, _work: usize) {}

    /// Called when a tick used up its whole interval.
    fn on_behind_schedule(&mut self, _tick: Tick, _overrun: Duration) {}

    /// Called for every control message dispatched; `handled` is `false`
    /// for kinds the loop only logs.
    fn on_message(&mut self, _kind: MessageKind, _handled: bool) {}

    /// Called once when the loop reaches `Stopped`.
    fn on_stopped(&mut self, _final_tick: Tick) {}
}

/// A [`LoopObserver`] that does nothing.
pub struct NoopObserver;

impl LoopObserver for NoopObserver {}
