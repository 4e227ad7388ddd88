//! Handles for running bridge tasks.
//!
//! Each listener or sender task owns its own `CancellationToken`.  Shutting
//! a handle down cancels exactly that task and waits for it to finish, so a
//! wedged bridge can be identified by name instead of hanging the whole
//! shutdown.

use std::fmt;
use std::net::SocketAddr;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{NetError, NetResult};

/// Per-task counters reported at shutdown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Frames delivered (pushed for listeners, sent for senders).
    pub frames:  u64,
    /// Frames lost to decode errors, full queues or send failures.
    pub dropped: u64,
}

impl fmt::Display for BridgeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} frames, {} dropped", self.frames, self.dropped)
    }
}

/// A running bridge task.
#[derive(Debug)]
pub struct BridgeHandle {
    name:       String,
    local_addr: SocketAddr,
    token:      CancellationToken,
    task:       JoinHandle<BridgeStats>,
}

impl BridgeHandle {
    pub(crate) fn new(
        name: String,
        local_addr: SocketAddr,
        token: CancellationToken,
        task: JoinHandle<BridgeStats>,
    ) -> Self {
        Self { name, local_addr, token, task }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address the task's socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the task and wait for it to acknowledge.
    pub async fn shutdown(self) -> NetResult<BridgeStats> {
        self.token.cancel();
        let stats = self
            .task
            .await
            .map_err(|source| NetError::Join { name: self.name.clone(), source })?;
        info!(bridge = %self.name, %stats, "bridge stopped");
        Ok(stats)
    }
}

/// All bridge tasks of one worker.
#[derive(Debug, Default)]
pub struct BridgeSet {
    handles: Vec<BridgeHandle>,
}

impl BridgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: BridgeHandle) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.handles.iter().map(BridgeHandle::name)
    }

    /// Bound address of the bridge called `name`.
    pub fn local_addr(&self, name: &str) -> Option<SocketAddr> {
        self.handles.iter().find(|h| h.name == name).map(BridgeHandle::local_addr)
    }

    /// Shut every bridge down in registration order.
    ///
    /// A task that fails to join is logged and reported with zeroed stats;
    /// the remaining bridges are still shut down.
    pub async fn shutdown_all(&mut self) -> Vec<(String, BridgeStats)> {
        let mut out = Vec::with_capacity(self.handles.len());
        for handle in self.handles.drain(..) {
            let name = handle.name().to_owned();
            match handle.shutdown().await {
                Ok(stats) => out.push((name, stats)),
                Err(e) => {
                    warn!(bridge = %name, error = %e, "bridge shutdown failed");
                    out.push((name, BridgeStats::default()));
                }
            }
        }
        out
    }
}
