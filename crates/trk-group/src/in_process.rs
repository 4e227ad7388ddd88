//! Multi-rank group inside one process.
//!
//! Every rank owns one inbound channel; every member holds the senders of
//! all ranks.  Messages between a pair of ranks arrive in send order.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::debug;

use trk_core::Rank;
use trk_net::Message;

use crate::{DistributedGroup, GroupError, GroupResult};

type Envelope = (Rank, Message);

#[derive(Debug)]
pub struct InProcessGroup {
    rank:  Rank,
    peers: Arc<Vec<Sender<Envelope>>>,
    inbox: Receiver<Envelope>,
}

impl InProcessGroup {
    /// Create all `n` members of a group, indexed by rank.
    pub fn create(n: usize) -> GroupResult<Vec<InProcessGroup>> {
        if n == 0 {
            return Err(GroupError::EmptyGroup);
        }
        let (senders, inboxes): (Vec<_>, Vec<_>) = (0..n).map(|_| unbounded()).unzip();
        let peers = Arc::new(senders);

        Ok(inboxes
            .into_iter()
            .zip((0..).map(Rank))
            .map(|(inbox, rank)| InProcessGroup { rank, peers: Arc::clone(&peers), inbox })
            .collect())
    }
}

impl DistributedGroup for InProcessGroup {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn send(&self, to: Rank, message: Message) -> GroupResult<()> {
        self.check_rank(to)?;
        debug!(from = %self.rank, %to, kind = %message.kind, "group send");
        self.peers[to.index()]
            .send((self.rank, message))
            .map_err(|_| GroupError::Disconnected(to))
    }

    fn try_recv(&self) -> Option<(Rank, Message)> {
        self.inbox.try_recv().ok()
    }
}
