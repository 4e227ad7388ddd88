use trk_core::Rank;
use trk_net::Message;

use crate::{GroupError, GroupResult};

/// Membership and point-to-point messaging of one worker.
///
/// `rank` and `size` never change after the group is joined.
pub trait DistributedGroup: Send + Sync {
    fn rank(&self) -> Rank;

    fn size(&self) -> usize;

    /// Deliver `message` to rank `to`.  Never blocks.
    fn send(&self, to: Rank, message: Message) -> GroupResult<()>;

    /// Next message addressed to this rank, with its sender.
    fn try_recv(&self) -> Option<(Rank, Message)>;

    fn is_root(&self) -> bool {
        self.rank() == Rank::ROOT
    }

    /// Send a copy of `message` to every other rank.
    fn broadcast(&self, message: &Message) -> GroupResult<()> {
        let me = self.rank();
        for r in (0..self.size()).filter_map(|r| Rank::try_from(r).ok()) {
            if r != me {
                self.send(r, message.clone())?;
            }
        }
        Ok(())
    }

    /// `Ok` when `to` names a member of this group.
    fn check_rank(&self, to: Rank) -> GroupResult<()> {
        if to.index() < self.size() {
            Ok(())
        } else {
            Err(GroupError::InvalidRank { rank: to, size: self.size() })
        }
    }
}
