//! Client facade
//!
//! The public entry point. Construction wires up the encoder settings, the
//! delivery queue, the transmitter, and the background worker; `capture()`
//! is the single fire-and-forget call hosts integrate with.

use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::event::{DecisionEvent, ScoreValue};
use crate::queue::DeliveryQueue;
use crate::transmit::Transmitter;
use crate::worker;

/// ProVit evidence-capture client.
///
/// One client owns one delivery queue and one background worker. Multiple
/// host threads may call [`capture`](Self::capture) concurrently; events are
/// transmitted in capture order. Dropping the client drains pending events,
/// bounded by the configured drain timeout, so keep the client alive for the
/// lifetime of the host process and drop it (or call
/// [`shutdown`](Self::shutdown)) as part of orderly exit.
///
/// No call on this type ever propagates an encoding or network failure to
/// the host: failed events are dropped, optionally logged when the `debug`
/// setting is on.
///
/// # Example
///
/// ```rust,no_run
/// use provit_sdk::{ClientConfig, ProvitClient};
///
/// let client = ProvitClient::new(ClientConfig::new("pv_live_xxx"))?;
/// client.capture("txn-1042", "fraud-detector", "v2.3.1", "legitimate", 0.985);
/// # Ok::<(), provit_sdk::Error>(())
/// ```
#[derive(Debug)]
pub struct ProvitClient {
    queue: Option<DeliveryQueue>,
    worker: Option<JoinHandle<()>>,
    debug: bool,
    normalize_labels: bool,
    drain_timeout: Duration,
}

impl ProvitClient {
    /// Create a client and start its background worker.
    ///
    /// No network I/O happens here; the collector is first contacted when
    /// the worker picks up the first captured event. Returns an error only
    /// for unusable configuration (empty or non-header-safe API key, empty
    /// URL) or if the worker cannot be started.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let transmitter = Transmitter::new(&config)?;
        let (queue, consumer) = DeliveryQueue::unbounded();
        let worker = worker::spawn(consumer, transmitter, config.debug)?;

        Ok(Self {
            queue: Some(queue),
            worker: Some(worker),
            debug: config.debug,
            normalize_labels: config.normalize_labels,
            drain_timeout: config.drain_timeout,
        })
    }

    /// Capture one AI decision. Fire-and-forget.
    ///
    /// Returns immediately after encoding and enqueueing; the cost is
    /// independent of collector reachability. Accepts any printable `label`
    /// and any numeric-ish `confidence_score` (floats, integers, or strings
    /// like `"0.88"`). Never blocks on network I/O, never panics on bad
    /// input, never returns an error: an event whose confidence cannot be
    /// coerced to a number is silently dropped (logged when `debug` is on).
    pub fn capture(
        &self,
        decision_id: &str,
        model_name: &str,
        model_version: &str,
        label: impl ToString,
        confidence_score: impl Into<ScoreValue>,
    ) {
        let event = match DecisionEvent::encode(
            decision_id,
            model_name,
            model_version,
            label,
            confidence_score.into(),
            self.normalize_labels,
        ) {
            Ok(event) => event,
            Err(e) => {
                if self.debug {
                    tracing::warn!(decision_id, error = %e, "dropping event that failed to encode");
                }
                return;
            }
        };

        let pushed = match &self.queue {
            Some(queue) => queue.push(event),
            None => false,
        };
        if !pushed && self.debug {
            tracing::warn!(decision_id, "delivery worker unavailable; event dropped");
        }
    }

    /// Number of events awaiting transmission (diagnostics only; approximate
    /// while other threads are capturing)
    pub fn pending(&self) -> usize {
        self.queue.as_ref().map(DeliveryQueue::len).unwrap_or(0)
    }

    /// Block until every event captured before this call has finished its
    /// transmission attempt, up to `timeout`.
    ///
    /// Returns true if the queue drained in time, false if events were still
    /// pending when the bound elapsed. Safe to call from any thread.
    pub fn flush(&self, timeout: Duration) -> bool {
        let Some(queue) = &self.queue else {
            return true;
        };

        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        if !queue.push_flush(ack_tx) {
            // Worker already gone; nothing can still be in flight
            return true;
        }
        ack_rx.recv_timeout(timeout).is_ok()
    }

    /// Drain pending events (bounded by the configured drain timeout) and
    /// stop the background worker.
    ///
    /// Returns true if everything was delivered (or at least attempted)
    /// before the bound elapsed. On timeout, remaining events are abandoned;
    /// this is the accepted best-effort loss, not an error.
    pub fn shutdown(mut self) -> bool {
        self.teardown()
    }

    fn teardown(&mut self) -> bool {
        let drained = self.flush(self.drain_timeout);

        // Disconnect the queue so the worker loop ends
        self.queue.take();

        if let Some(handle) = self.worker.take() {
            if drained {
                let _ = handle.join();
            }
            // On timeout the thread is abandoned; it exits with the process.
            // Joining here could hold exit hostage to a dead network.
        }

        drained
    }
}

impl Drop for ProvitClient {
    fn drop(&mut self) {
        if self.queue.is_some() {
            let drained = self.teardown();
            if !drained && self.debug {
                tracing::warn!("drain timeout elapsed; abandoning undelivered events");
            }
        }
    }
}
