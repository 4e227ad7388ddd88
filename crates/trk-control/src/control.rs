//! The `ControlLoop` struct and its control cycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use trk_core::{SimClock, Tick};
use trk_group::DistributedGroup;
use trk_net::{BridgeSet, BridgeStats, Message, MessageKind, NetListener, NetSender};

use crate::{
    ControlConfig, ControlError, ControlResult, LoopObserver, LoopQueues, LoopState, NetworkConfig,
    Pace, SchedulerState, TickContext, WorldStep, pace,
};

/// The real-time control loop of one worker.
///
/// Drives the simulation clock at the configured tick interval, dispatches
/// control messages, and moves messages between the world step and the
/// network queues.
///
/// Create via [`ControlLoopBuilder`][crate::ControlLoopBuilder].
pub struct ControlLoop {
    config:        ControlConfig,
    clock:         SimClock,
    world:         Box<dyn WorldStep>,
    group:         Arc<dyn DistributedGroup>,
    queues:        LoopQueues,
    token:         CancellationToken,
    state:         LoopState,
    scheduler:     Option<SchedulerState>,
    bridges:       BridgeSet,
    /// Per-bridge counters collected by `stop()`.
    bridge_stats:  Vec<(String, BridgeStats)>,
    /// Ticks executed since `start()`.
    ticks:         u64,
    dropped_track: u64,
}

impl ControlLoop {
    pub(crate) fn new(
        config: ControlConfig,
        clock:  SimClock,
        world:  Box<dyn WorldStep>,
        group:  Arc<dyn DistributedGroup>,
        queues: LoopQueues,
        token:  CancellationToken,
    ) -> Self {
        Self {
            config,
            clock,
            world,
            group,
            queues,
            token,
            state:         LoopState::Idle,
            scheduler:     None,
            bridges:       BridgeSet::new(),
            bridge_stats:  Vec::new(),
            ticks:         0,
            dropped_track: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Track reports dropped because the track-out queue was full.
    pub fn dropped_track_reports(&self) -> u64 {
        self.dropped_track
    }

    pub fn queues(&self) -> &LoopQueues {
        &self.queues
    }

    /// Bound address of a running bridge (`config-in`, `pilot-in`,
    /// `config-out`, `track-out`).
    pub fn bridge_addr(&self, name: &str) -> Option<SocketAddr> {
        self.bridges.local_addr(name)
    }

    /// Counters of every bridge, available once the loop has stopped.
    pub fn bridge_stats(&self) -> &[(String, BridgeStats)] {
        &self.bridge_stats
    }

    pub fn scheduler(&self) -> Option<&SchedulerState> {
        self.scheduler.as_ref()
    }

    /// Token that requests shutdown when cancelled.  The loop observes it at
    /// the next cycle boundary, or immediately while sleeping.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.token.clone()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// `Idle → Running`: reset the clock, start bridges when networking is
    /// configured on the root rank, and initialize pacing.
    pub async fn start<O: LoopObserver>(&mut self, observer: &mut O) -> ControlResult<()> {
        if self.state != LoopState::Idle {
            return Err(ControlError::InvalidState { operation: "start", state: self.state });
        }

        self.clock.set_start(self.config.start_time()?);
        if let Some(net) = self.config.network {
            if self.group.is_root() {
                if let Err(e) = self.start_bridges(net).await {
                    self.bridges.shutdown_all().await;
                    return Err(e);
                }
            } else {
                debug!(rank = %self.group.rank(), "non-root rank, network bridges not started");
            }
        }

        self.scheduler = Some(SchedulerState::new(self.config.tick_interval()));
        self.ticks = 0;
        info!(
            rank = %self.group.rank(),
            size = self.group.size(),
            interval = ?self.config.tick_interval(),
            clock = %self.clock,
            bridges = self.bridges.len(),
            "control loop started"
        );
        self.set_state(LoopState::Running, observer);
        Ok(())
    }

    /// `Terminating → Stopped`: shut every bridge down and report.
    pub async fn stop<O: LoopObserver>(&mut self, observer: &mut O) -> ControlResult<()> {
        if self.state != LoopState::Terminating {
            return Err(ControlError::InvalidState { operation: "stop", state: self.state });
        }

        self.bridge_stats = self.bridges.shutdown_all().await;
        for (name, stats) in &self.bridge_stats {
            debug!(bridge = %name, %stats, "bridge joined");
        }
        if let Some(s) = self.scheduler.as_mut() {
            s.running = false;
        }

        info!(
            ticks = self.ticks,
            final_tick = %self.clock.current_tick,
            dropped_track = self.dropped_track,
            "control loop stopped"
        );
        self.set_state(LoopState::Stopped, observer);
        observer.on_stopped(self.clock.current_tick);
        Ok(())
    }

    /// Run until terminated, then stop.  Starts the loop first when `Idle`.
    pub async fn run<O: LoopObserver>(&mut self, observer: &mut O) -> ControlResult<()> {
        self.run_until(None, observer).await
    }

    /// Run until `n` more ticks have executed or the loop terminates.
    ///
    /// When the tick budget runs out the loop stays `Running` and can be
    /// resumed; when it terminates it is also stopped.
    pub async fn run_ticks<O: LoopObserver>(
        &mut self,
        n: u64,
        observer: &mut O,
    ) -> ControlResult<()> {
        self.run_until(Some(n), observer).await
    }

    async fn run_until<O: LoopObserver>(
        &mut self,
        budget: Option<u64>,
        observer: &mut O,
    ) -> ControlResult<()> {
        match self.state {
            LoopState::Idle => self.start(observer).await?,
            LoopState::Running | LoopState::Terminating => {}
            LoopState::Stopped => {
                return Err(ControlError::InvalidState { operation: "run", state: self.state });
            }
        }

        let target = budget.map(|n| self.ticks + n);
        while self.state == LoopState::Running {
            if target.is_some_and(|t| self.ticks >= t) {
                return Ok(());
            }
            self.cycle(observer).await;
        }
        self.stop(observer).await
    }

    // ── Control cycle ─────────────────────────────────────────────────────

    async fn cycle<O: LoopObserver>(&mut self, observer: &mut O) {
        if self.token.is_cancelled() {
            info!("shutdown requested");
            self.set_state(LoopState::Terminating, observer);
            return;
        }

        let control = self
            .queues
            .config_in
            .try_pop()
            .or_else(|| self.group.try_recv().map(|(_, m)| m));

        match control {
            Some(message) => self.dispatch(message, observer),
            None => {
                let tick = self.tick(observer);
                self.pace(tick, observer).await;
            }
        }
    }

    fn dispatch<O: LoopObserver>(&mut self, message: Message, observer: &mut O) {
        let kind = message.kind;
        match kind {
            MessageKind::TERMINATE => {
                info!(%kind, "terminate received");
                observer.on_message(kind, true);
                if self.group.is_root() {
                    if let Err(e) = self.group.broadcast(&message) {
                        warn!(error = %e, "terminate not forwarded to group");
                    }
                }
                self.set_state(LoopState::Terminating, observer);
            }
            k if k.is_known() => {
                warn!(kind = %k, payload = message.payload.len(), "control message not handled");
                observer.on_message(k, false);
            }
            k => {
                warn!(kind = %k, "unrecognized control message");
                observer.on_message(k, false);
            }
        }
    }

    fn tick<O: LoopObserver>(&mut self, observer: &mut O) -> Tick {
        if let Some(s) = self.scheduler.as_mut() {
            s.last_tick_at = Instant::now();
        }
        self.clock.advance();
        self.ticks += 1;
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);

        let pilot_commands = self.queues.pilot_in.drain();
        let ctx = TickContext {
            tick,
            clock:          &self.clock,
            pilot_commands: &pilot_commands,
            group:          self.group.as_ref(),
        };
        let output = self.world.step(&ctx);
        let work = output.len();

        for message in output {
            if let Err(e) = self.queues.track_out.push(message) {
                self.dropped_track += 1;
                let kind = e.into_message().kind;
                warn!(%tick, %kind, "track queue full, report dropped");
            }
        }

        observer.on_tick_end(tick, work);
        tick
    }

    async fn pace<O: LoopObserver>(&mut self, tick: Tick, observer: &mut O) {
        let Some(scheduler) = self.scheduler else {
            return;
        };
        match pace(scheduler.tick_interval, scheduler.last_tick_at.elapsed()) {
            Pace::Sleep(d) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep(d) => {}
                }
            }
            Pace::Behind(overrun) => {
                warn!(%tick, ?overrun, "control loop behind schedule");
                observer.on_behind_schedule(tick, overrun);
            }
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn set_state<O: LoopObserver>(&mut self, to: LoopState, observer: &mut O) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(%from, %to, "control loop state change");
        observer.on_state_change(from, to);
    }

    async fn start_bridges(&mut self, net: NetworkConfig) -> ControlResult<()> {
        let q = &self.queues;
        // config-out and config-in share one channel; the listener skips
        // frames from our own sender so outbound control is not re-dispatched.
        let config_out =
            NetSender::new("config-out", net.config, q.config_out.clone()).start().await?;
        let own = config_out.local_addr();
        self.bridges.push(config_out);
        self.bridges.push(
            NetListener::new("config-in", net.config, q.config_in.clone())
                .ignore_own(own)
                .start()
                .await?,
        );
        self.bridges.push(
            NetListener::new("pilot-in", net.pilot_command, q.pilot_in.clone())
                .start()
                .await?,
        );
        self.bridges
            .push(NetSender::new("track-out", net.track, q.track_out.clone()).start().await?);
        Ok(())
    }
}
