//! `MessageQueue`: FIFO handoff between bridge tasks and the control loop.
//!
//! A queue is a cloneable handle over one crossbeam channel; every clone
//! pushes into and pops from the same FIFO.  No operation except
//! [`MessageQueue::pop_timeout`] blocks.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};

use crate::{Message, QueueError};

/// Default capacity of the outbound track queue.
pub const DEFAULT_TRACK_CAPACITY: usize = 1024;

#[derive(Clone, Debug)]
pub struct MessageQueue {
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl MessageQueue {
    pub fn unbounded() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A queue holding at most `capacity` messages.  `capacity` must be
    /// positive; zero is raised to one so pushes never rendezvous.
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity.max(1));
        Self { tx, rx }
    }

    /// Enqueue without blocking.  A full queue hands the message back.
    pub fn push(&self, message: Message) -> Result<(), QueueError> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(m) => QueueError::Full(m),
            TrySendError::Disconnected(m) => QueueError::Closed(m),
        })
    }

    /// Dequeue the oldest message, `None` when empty.
    pub fn try_pop(&self) -> Option<Message> {
        self.rx.try_recv().ok()
    }

    /// Dequeue, waiting up to `timeout` for a message.  Blocks the calling
    /// thread; async callers poll [`try_pop`](Self::try_pop) instead.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<Message> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Dequeue everything currently queued, oldest first.
    pub fn drain(&self) -> Vec<Message> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// `None` for unbounded queues.
    pub fn capacity(&self) -> Option<usize> {
        self.tx.capacity()
    }
}
