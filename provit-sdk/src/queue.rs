//! Delivery queue
//!
//! An unbounded FIFO channel between the host's calling threads and the
//! single background worker. Pushes never block and never fail due to
//! fullness; the consumer side blocks until an entry arrives. Ordering is
//! the order `push` was called, across all producing threads.

use crossbeam_channel::{Receiver, Sender};

use crate::event::DecisionEvent;

/// What flows through the queue
#[derive(Debug)]
pub(crate) enum Command {
    /// Transmit one event (exactly one attempt, then discard)
    Deliver(Box<DecisionEvent>),

    /// Drain marker: by FIFO, acking it means every event pushed before it
    /// has finished its transmission attempt
    Flush(Sender<()>),
}

/// Producer handle, held by the client facade
#[derive(Debug, Clone)]
pub(crate) struct DeliveryQueue {
    tx: Sender<Command>,
}

/// Consumer handle, owned by the background worker
#[derive(Debug)]
pub(crate) struct QueueConsumer {
    rx: Receiver<Command>,
}

impl DeliveryQueue {
    /// Create an unbounded queue and its consumer end
    pub fn unbounded() -> (DeliveryQueue, QueueConsumer) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (DeliveryQueue { tx }, QueueConsumer { rx })
    }

    /// Append an event. Returns false if the worker is gone.
    pub fn push(&self, event: DecisionEvent) -> bool {
        self.tx.send(Command::Deliver(Box::new(event))).is_ok()
    }

    /// Append a flush marker behind all pending events.
    /// Returns false if the worker is gone.
    pub fn push_flush(&self, ack: Sender<()>) -> bool {
        self.tx.send(Command::Flush(ack)).is_ok()
    }

    /// Current queue depth (approximate under concurrent modification;
    /// diagnostics only)
    pub fn len(&self) -> usize {
        self.tx.len()
    }
}

impl QueueConsumer {
    /// Block until an entry is available. Returns `None` once all producer
    /// handles have been dropped and the queue is empty.
    pub fn pop(&self) -> Option<Command> {
        self.rx.recv().ok()
    }
}
