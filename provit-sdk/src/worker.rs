//! Background delivery worker
//!
//! Exactly one worker thread runs per client instance. It owns a
//! current-thread tokio runtime and loops: pop a queue entry (the only
//! blocking point), drive the transmission to completion, discard the
//! entry whatever the outcome. A failed transmission is logged when the
//! debug flag is set and is otherwise invisible; the worker never dies
//! from a bad event. The loop ends when the producer side of the queue
//! disconnects.

use std::thread::JoinHandle;

use crate::error::{Error, Result};
use crate::queue::{Command, QueueConsumer};
use crate::transmit::Transmitter;

/// Spawn the delivery worker thread.
///
/// The runtime is built up front so a failure surfaces at client
/// construction rather than inside the thread.
pub(crate) fn spawn(
    consumer: QueueConsumer,
    transmitter: Transmitter,
    debug: bool,
) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Config(format!("failed to create runtime: {}", e)))?;

    std::thread::Builder::new()
        .name("provit-delivery".to_string())
        .spawn(move || run(runtime, consumer, transmitter, debug))
        .map_err(|e| Error::Config(format!("failed to spawn worker thread: {}", e)))
}

fn run(
    runtime: tokio::runtime::Runtime,
    consumer: QueueConsumer,
    transmitter: Transmitter,
    debug: bool,
) {
    while let Some(command) = consumer.pop() {
        match command {
            Command::Deliver(event) => {
                if let Err(e) = runtime.block_on(transmitter.send(&event)) {
                    // Single attempt, no dead-letter retention
                    if debug {
                        tracing::warn!(
                            event_id = %event.event_id,
                            decision_id = %event.decision_id,
                            error = %e,
                            "dropping event after failed delivery"
                        );
                    }
                }
            }
            Command::Flush(ack) => {
                // Receiver may have timed out and gone away
                let _ = ack.send(());
            }
        }
    }

    if debug {
        tracing::debug!("delivery worker stopped");
    }
}
