//! Fluent builder for constructing a [`ControlLoop`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use trk_core::SimClock;
use trk_group::DistributedGroup;
use trk_net::MessageQueue;

use crate::{ControlConfig, ControlError, ControlLoop, ControlResult, WorldStep};

/// The four in-process queues between the loop and its bridges.
///
/// Every field is a cloneable handle; clones taken before the loop starts
/// stay connected to it.
#[derive(Clone, Debug)]
pub struct LoopQueues {
    pub config_in:  MessageQueue,
    pub config_out: MessageQueue,
    pub pilot_in:   MessageQueue,
    /// Bounded; a full track queue drops the newest report.
    pub track_out:  MessageQueue,
}

impl LoopQueues {
    pub fn new(track_capacity: usize) -> Self {
        Self {
            config_in:  MessageQueue::unbounded(),
            config_out: MessageQueue::unbounded(),
            pilot_in:   MessageQueue::unbounded(),
            track_out:  MessageQueue::bounded(track_capacity),
        }
    }
}

/// Fluent builder for [`ControlLoop`].
///
/// # Required inputs
///
/// - [`ControlConfig`]: validated again in `build()`
/// - `.world(w)`: the per-tick [`WorldStep`]
/// - `.group(g)`: the [`DistributedGroup`] this worker belongs to
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                   |
/// |------------------------|-------------------------------------------|
/// | `.queues(q)`           | `LoopQueues::new(config track capacity)`  |
/// | `.shutdown_token(t)`   | a fresh `CancellationToken`               |
pub struct ControlLoopBuilder {
    config: ControlConfig,
    world:  Option<Box<dyn WorldStep>>,
    group:  Option<Arc<dyn DistributedGroup>>,
    queues: Option<LoopQueues>,
    token:  Option<CancellationToken>,
}

impl ControlLoopBuilder {
    pub fn new(config: ControlConfig) -> Self {
        Self { config, world: None, group: None, queues: None, token: None }
    }

    pub fn world<W: WorldStep + 'static>(mut self, world: W) -> Self {
        self.world = Some(Box::new(world));
        self
    }

    pub fn group<G: DistributedGroup + 'static>(mut self, group: G) -> Self {
        self.group = Some(Arc::new(group));
        self
    }

    /// Share a group that other components also hold.
    pub fn shared_group(mut self, group: Arc<dyn DistributedGroup>) -> Self {
        self.group = Some(group);
        self
    }

    pub fn queues(mut self, queues: LoopQueues) -> Self {
        self.queues = Some(queues);
        self
    }

    /// Use an externally owned token, e.g. one cancelled by a signal handler.
    pub fn shutdown_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Validate inputs and return an `Idle` loop.
    pub fn build(self) -> ControlResult<ControlLoop> {
        self.config.validate()?;
        let world = self.world.ok_or(ControlError::MissingCollaborator("world step"))?;
        let group = self.group.ok_or(ControlError::MissingCollaborator("distributed group"))?;

        let clock = SimClock::new(self.config.start_time()?, self.config.tick_interval())?;
        let queues = self
            .queues
            .unwrap_or_else(|| LoopQueues::new(self.config.queues.track_capacity));

        Ok(ControlLoop::new(
            self.config,
            clock,
            world,
            group,
            queues,
            self.token.unwrap_or_default(),
        ))
    }
}
