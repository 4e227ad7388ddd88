//! Channel addressing read from the configuration document.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use serde::{Deserialize, Serialize};

/// The three network channels of a worker.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ChannelKind {
    /// Control and configuration commands, both directions.
    Config,
    /// Track reports produced each tick.
    Track,
    /// Commands typed by pilot operators.
    PilotCommand,
}

impl ChannelKind {
    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Config       => "config",
            ChannelKind::Track        => "track",
            ChannelKind::PilotCommand => "pilot_command",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a channel lives on the network.
///
/// `interface` selects the local interface; `address` is the group (for
/// multicast) or the peer/bind address (for unicast).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChannelAddress {
    #[serde(default = "unspecified")]
    pub interface: Ipv4Addr,
    pub address:   Ipv4Addr,
    pub port:      u16,
}

fn unspecified() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}

impl ChannelAddress {
    pub fn new(interface: Ipv4Addr, address: Ipv4Addr, port: u16) -> Self {
        Self { interface, address, port }
    }

    /// A unicast address on the loopback interface.
    pub fn localhost(port: u16) -> Self {
        Self::new(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST, port)
    }

    pub fn is_multicast(&self) -> bool {
        self.address.is_multicast()
    }

    /// Destination of outbound datagrams.
    pub fn target(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.address, self.port))
    }

    /// Local address a listener binds to: every interface for multicast
    /// groups, the configured address otherwise.
    pub fn listen_addr(&self) -> SocketAddr {
        let ip = if self.is_multicast() { Ipv4Addr::UNSPECIFIED } else { self.address };
        SocketAddr::V4(SocketAddrV4::new(ip, self.port))
    }

    /// Local address a sender binds to (ephemeral port on `interface`).
    pub fn send_from(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.interface, 0))
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} via {}", self.address, self.port, self.interface)
    }
}
