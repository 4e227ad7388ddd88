//! The `WorldStep` trait: the per-tick simulation work.

use trk_core::{SimClock, Tick};
use trk_group::DistributedGroup;
use trk_net::Message;

/// Read-only view of the loop passed to every [`WorldStep::step`] call.
pub struct TickContext<'a> {
    /// The tick being executed (the clock has already advanced to it).
    pub tick:           Tick,
    pub clock:          &'a SimClock,
    /// Pilot commands received since the previous tick, oldest first.
    pub pilot_commands: &'a [Message],
    pub group:          &'a dyn DistributedGroup,
}

/// Physics and trajectory stepping, invoked once per tick.
///
/// The returned messages are forwarded to the track-out queue in order.
/// The step runs synchronously inside the loop; a step slower than the tick
/// interval shows up as a behind-schedule warning.
pub trait WorldStep: Send {
    fn step(&mut self, ctx: &TickContext<'_>) -> Vec<Message>;
}

impl<F> WorldStep for F
where
    F: FnMut(&TickContext<'_>) -> Vec<Message> + Send,
{
    fn step(&mut self, ctx: &TickContext<'_>) -> Vec<Message> {
        self(ctx)
    }
}

/// A [`WorldStep`] that never produces output.
pub struct IdleWorld;

impl WorldStep for IdleWorld {
    fn step(&mut self, _ctx: &TickContext<'_>) -> Vec<Message> {
        vec![]
    }
}
