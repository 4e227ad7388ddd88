//! `NetSender`: drains a queue onto the network.

use std::time::Duration;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    BridgeHandle, BridgeStats, ChannelAddress, Message, MessageQueue, NetError, NetResult, encode,
};

/// Sleep between polls of an empty queue.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

pub struct NetSender {
    name:          String,
    address:       ChannelAddress,
    queue:         MessageQueue,
    poll_interval: Duration,
}

impl NetSender {
    pub fn new(name: impl Into<String>, address: ChannelAddress, queue: MessageQueue) -> Self {
        Self {
            name: name.into(),
            address,
            queue,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bind an ephemeral socket on the configured interface and spawn the
    /// send task.
    pub async fn start(self) -> NetResult<BridgeHandle> {
        let bind = self.address.send_from();
        let socket = UdpSocket::bind(bind)
            .await
            .map_err(|source| NetError::Bind { addr: bind, source })?;
        if self.address.is_multicast() {
            socket.set_multicast_loop_v4(true)?;
        }

        let local_addr = socket.local_addr()?;
        info!(bridge = %self.name, address = %self.address, %local_addr, "sender started");

        let name = self.name.clone();
        let token = CancellationToken::new();
        let task = tokio::spawn(self.run(socket, token.clone()));
        Ok(BridgeHandle::new(name, local_addr, token, task))
    }

    async fn run(self, socket: UdpSocket, token: CancellationToken) -> BridgeStats {
        let mut stats = BridgeStats::default();

        while !token.is_cancelled() {
            match self.queue.try_pop() {
                Some(message) => self.send(&socket, &message, &mut stats).await,
                None => {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(self.poll_interval) => {}
                    }
                }
            }
        }

        // Flush what was queued before cancellation, e.g. final track reports.
        for message in self.queue.drain() {
            self.send(&socket, &message, &mut stats).await;
        }
        stats
    }

    async fn send(&self, socket: &UdpSocket, message: &Message, stats: &mut BridgeStats) {
        let frame = match encode(message) {
            Ok(f) => f,
            Err(e) => {
                stats.dropped += 1;
                warn!(
                    bridge = %self.name, kind = %message.kind, error = %e,
                    "unencodable message dropped"
                );
                return;
            }
        };
        match socket.send_to(&frame, self.address.target()).await {
            Ok(_) => {
                stats.frames += 1;
                debug!(bridge = %self.name, kind = %message.kind, len = frame.len(), "frame sent");
            }
            Err(e) => {
                stats.dropped += 1;
                warn!(
                    bridge = %self.name, kind = %message.kind, error = %e,
                    "send failed, message dropped"
                );
            }
        }
    }
}
