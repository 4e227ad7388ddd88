//! `NetListener`: receives datagrams and pushes decoded messages.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::{BridgeHandle, BridgeStats, ChannelAddress, MessageQueue, NetError, NetResult, decode};

/// Largest datagram accepted; longer frames are truncated by the OS and
/// then fail to decode.
const MAX_FRAME_SIZE: usize = 64 * 1024;

const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(100);

pub struct NetListener {
    name:     String,
    address:  ChannelAddress,
    queue:    MessageQueue,
    /// Local address of this worker's own sender on the same channel.
    own_from: Option<SocketAddr>,
}

impl NetListener {
    pub fn new(name: impl Into<String>, address: ChannelAddress, queue: MessageQueue) -> Self {
        Self { name: name.into(), address, queue, own_from: None }
    }

    /// Drop datagrams sent from `sender`, the bound address of a sender on
    /// the same channel.  A channel that is both sent to and listened on
    /// (unicast to self, or multicast with loopback) otherwise echoes every
    /// outbound frame back into the inbound queue.
    ///
    /// When `sender` is bound to the unspecified address only its port is
    /// compared.
    pub fn ignore_own(mut self, sender: SocketAddr) -> Self {
        self.own_from = Some(sender);
        self
    }

    fn is_own(&self, peer: SocketAddr) -> bool {
        self.own_from.is_some_and(|own| {
            own.port() == peer.port() && (own.ip().is_unspecified() || own.ip() == peer.ip())
        })
    }

    /// Bind the socket (joining the multicast group if needed) and spawn the
    /// receive task.
    ///
    /// Binding happens before the task starts so address errors surface
    /// here instead of inside a detached task.
    pub async fn start(self) -> NetResult<BridgeHandle> {
        let bind = self.address.listen_addr();
        let socket = UdpSocket::bind(bind)
            .await
            .map_err(|source| NetError::Bind { addr: bind, source })?;

        if self.address.is_multicast() {
            socket
                .join_multicast_v4(self.address.address, self.address.interface)
                .map_err(|source| NetError::Multicast {
                    group:     self.address.address,
                    interface: self.address.interface,
                    source,
                })?;
        }

        let local_addr = socket.local_addr()?;
        info!(bridge = %self.name, address = %self.address, %local_addr, "listener started");

        let name = self.name.clone();
        let token = CancellationToken::new();
        let task = tokio::spawn(self.run(socket, token.clone()));
        Ok(BridgeHandle::new(name, local_addr, token, task))
    }

    async fn run(self, socket: UdpSocket, token: CancellationToken) -> BridgeStats {
        let mut buffer = vec![0u8; MAX_FRAME_SIZE];
        let mut stats = BridgeStats::default();

        loop {
            let received = tokio::select! {
                _ = token.cancelled() => break,
                r = socket.recv_from(&mut buffer) => r,
            };

            let (len, peer) = match received {
                Ok(r) => r,
                Err(e) => {
                    warn!(bridge = %self.name, error = %e, "UDP receive error");
                    tokio::time::sleep(RECV_ERROR_BACKOFF).await;
                    continue;
                }
            };

            if self.is_own(peer) {
                trace!(bridge = %self.name, %peer, len, "own frame ignored");
                continue;
            }

            let message = match decode(&buffer[..len]) {
                Ok(m) => m,
                Err(e) => {
                    stats.dropped += 1;
                    warn!(bridge = %self.name, %peer, len, error = %e, "undecodable frame dropped");
                    continue;
                }
            };

            debug!(bridge = %self.name, %peer, kind = %message.kind, "frame received");
            match self.queue.push(message) {
                Ok(()) => stats.frames += 1,
                Err(e) => {
                    stats.dropped += 1;
                    warn!(bridge = %self.name, error = %e, "inbound queue rejected frame");
                }
            }
        }

        stats
    }
}
