use crossbeam_channel::{Receiver, Sender, unbounded};

use trk_core::Rank;
use trk_net::Message;

use crate::{DistributedGroup, GroupResult};

/// A group of one.  Rank 0, size 1; messages sent to rank 0 come back
/// through [`try_recv`](DistributedGroup::try_recv).
#[derive(Debug)]
pub struct LocalGroup {
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl LocalGroup {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

impl Default for LocalGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl DistributedGroup for LocalGroup {
    fn rank(&self) -> Rank {
        Rank::ROOT
    }

    fn size(&self) -> usize {
        1
    }

    fn send(&self, to: Rank, message: Message) -> GroupResult<()> {
        self.check_rank(to)?;
        // Both ends live in `self`, so the channel cannot be disconnected.
        let _ = self.tx.send(message);
        Ok(())
    }

    fn try_recv(&self) -> Option<(Rank, Message)> {
        self.rx.try_recv().ok().map(|m| (Rank::ROOT, m))
    }
}
