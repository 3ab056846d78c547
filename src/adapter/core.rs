/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Core ThreadedAdapter implementation.
//!
//! This module provides the main [`ThreadedAdapter`] struct that owns one
//! dedicated worker thread and serializes envelope processing through an
//! unbounded multi-producer/single-consumer channel.

use super::config::{AdapterConfig, RetryPolicy, ShutdownPolicy};
use super::envelope::Envelope;
use super::error::AdapterError;
use crossbeam::channel::{Receiver, Sender, unbounded};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, trace, warn};

/// What the worker pulls off the channel: an envelope to deliver, or the
/// shutdown sentinel sent by [`ThreadedAdapter::stop`].
enum Directive {
    Deliver(Pending),
    Shutdown,
}

/// An envelope together with its processing attempt count.
struct Pending {
    envelope: Envelope,
    attempts: u32,
}

impl Pending {
    fn new(envelope: Envelope) -> Self {
        Self {
            envelope,
            attempts: 0,
        }
    }
}

/// An adapter that decouples producers from a single serialized consumer.
///
/// Each adapter owns one dedicated worker thread, started on construction.
/// Producers on any thread call [`submit`] to enqueue an [`Envelope`]; the
/// worker dequeues envelopes one at a time, in submission order, and invokes
/// the processing callback with no lock held. A callback that returns
/// `false` (or panics) re-enqueues the envelope at the back of the queue,
/// behind anything submitted during the failed attempt, so delivery is
/// at-least-once and FIFO only among envelopes that never fail.
///
/// The callback must therefore tolerate redelivery of an identical
/// envelope. No timeout is enforced on a single invocation: a callback that
/// never returns stalls the worker permanently.
///
/// # Examples
///
/// ```
/// use msgbus_rs::adapter::{EndpointId, Envelope, ThreadedAdapter};
///
/// let mut adapter = ThreadedAdapter::spawn(|envelope| {
///     println!("envelope {} from {}", envelope.id(), envelope.sender());
///     true
/// });
///
/// assert!(adapter.submit(Envelope::new(EndpointId(1), None, b"md".to_vec())));
///
/// adapter.stop();
/// // After stop the worker has exited and submissions are rejected.
/// assert!(!adapter.submit(Envelope::new(EndpointId(1), None, b"md".to_vec())));
/// ```
///
/// [`submit`]: ThreadedAdapter::submit
pub struct ThreadedAdapter {
    /// Producer side of the envelope channel.
    tx: Sender<Directive>,

    /// Set by `stop`; checked by producers and by the worker on each wake.
    stopped: Arc<AtomicBool>,

    /// Worker thread handle, taken on the first `stop`.
    worker: Option<JoinHandle<()>>,
}

impl ThreadedAdapter {
    /// Starts an adapter with the default configuration.
    ///
    /// The worker thread is running when this returns. `process` is invoked
    /// on the worker thread for every dequeued envelope; returning `true`
    /// acknowledges it, returning `false` schedules a retry.
    #[must_use]
    pub fn spawn<F>(process: F) -> Self
    where
        F: FnMut(&Envelope) -> bool + Send + 'static,
    {
        Self::spawn_with_config(AdapterConfig::default(), process)
    }

    /// Starts an adapter with an explicit [`AdapterConfig`].
    ///
    /// # Arguments
    ///
    /// * `config` - Retry and shutdown policies
    /// * `process` - Processing callback, invoked on the worker thread
    ///
    /// # Panics
    ///
    /// Panics if the worker thread cannot be spawned.
    #[must_use]
    pub fn spawn_with_config<F>(config: AdapterConfig, process: F) -> Self
    where
        F: FnMut(&Envelope) -> bool + Send + 'static,
    {
        let (tx, rx) = unbounded();
        let stopped = Arc::new(AtomicBool::new(false));

        let worker_tx = tx.clone();
        let worker_stopped = stopped.clone();
        let worker = thread::Builder::new()
            .name("envelope-worker".to_string())
            .spawn(move || worker_loop(rx, worker_tx, worker_stopped, config, process))
            .expect("failed to spawn adapter worker thread");

        Self {
            tx,
            stopped,
            worker: Some(worker),
        }
    }

    /// Submits an envelope for processing. Callable from any thread.
    ///
    /// Submission is fire-and-forget: the caller never learns whether
    /// processing eventually succeeded. Returns `true` if the envelope was
    /// accepted, `false` once the adapter has been stopped.
    pub fn submit(&self, envelope: Envelope) -> bool {
        self.try_submit(envelope).is_ok()
    }

    /// Submits an envelope, reporting rejection as a typed error.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Stopped`] if the adapter has been stopped.
    pub fn try_submit(&self, envelope: Envelope) -> Result<(), AdapterError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(AdapterError::Stopped);
        }
        self.tx
            .send(Directive::Deliver(Pending::new(envelope)))
            .map_err(|_| AdapterError::Stopped)
    }

    /// Stops the adapter and joins the worker thread. Idempotent.
    ///
    /// Pending envelopes are discarded or drained according to the
    /// configured [`ShutdownPolicy`]. When this returns the worker thread
    /// has exited and any further [`submit`] returns `false`.
    ///
    /// [`submit`]: ThreadedAdapter::submit
    pub fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        let _ = self.tx.send(Directive::Shutdown);

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("adapter worker thread terminated abnormally");
            }
        }
    }

    /// Returns `true` once [`stop`] has been requested.
    ///
    /// [`stop`]: ThreadedAdapter::stop
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Returns the number of envelopes currently queued.
    ///
    /// The value is a snapshot; the worker may dequeue concurrently.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

impl Drop for ThreadedAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The worker routine: block on the channel, process one envelope per wake,
/// re-enqueue on failure.
fn worker_loop<F>(
    rx: Receiver<Directive>,
    tx: Sender<Directive>,
    stopped: Arc<AtomicBool>,
    config: AdapterConfig,
    mut process: F,
) where
    F: FnMut(&Envelope) -> bool,
{
    while let Ok(directive) = rx.recv() {
        if stopped.load(Ordering::SeqCst) {
            shut_down(&rx, directive, config.shutdown, &mut process);
            break;
        }

        let Directive::Deliver(mut pending) = directive else {
            continue;
        };

        pending.attempts += 1;
        if attempt(&mut process, &pending.envelope) {
            trace!(
                envelope = pending.envelope.id(),
                attempts = pending.attempts,
                "envelope processed"
            );
            continue;
        }

        match config.retry {
            RetryPolicy::Unbounded => {
                trace!(
                    envelope = pending.envelope.id(),
                    attempts = pending.attempts,
                    "processing failed, envelope re-enqueued"
                );
                let _ = tx.send(Directive::Deliver(pending));
            }
            RetryPolicy::Bounded {
                max_attempts,
                backoff,
            } => {
                if pending.attempts >= max_attempts {
                    warn!(
                        envelope = pending.envelope.id(),
                        attempts = pending.attempts,
                        "retry budget exhausted, envelope dropped"
                    );
                } else {
                    if !backoff.is_zero() {
                        thread::sleep(backoff);
                    }
                    let _ = tx.send(Directive::Deliver(pending));
                }
            }
        }
    }
}

/// Applies the shutdown policy to the directive in hand and everything
/// still queued behind it.
fn shut_down<F>(
    rx: &Receiver<Directive>,
    current: Directive,
    policy: ShutdownPolicy,
    process: &mut F,
) where
    F: FnMut(&Envelope) -> bool,
{
    match policy {
        ShutdownPolicy::Discard => {
            let mut discarded = usize::from(matches!(current, Directive::Deliver(_)));
            discarded += rx
                .try_iter()
                .filter(|d| matches!(d, Directive::Deliver(_)))
                .count();
            if discarded > 0 {
                debug!(discarded, "adapter stopping, pending envelopes discarded");
            }
        }
        ShutdownPolicy::Drain => {
            let mut drained = 0usize;
            let mut failed = 0usize;

            let mut drain_one = |pending: Pending| {
                if attempt(process, &pending.envelope) {
                    drained += 1;
                } else {
                    warn!(
                        envelope = pending.envelope.id(),
                        "envelope failed during drain, dropped"
                    );
                    failed += 1;
                }
            };

            if let Directive::Deliver(pending) = current {
                drain_one(pending);
            }
            for directive in rx.try_iter() {
                if let Directive::Deliver(pending) = directive {
                    drain_one(pending);
                }
            }

            debug!(drained, failed, "adapter stopping, pending envelopes drained");
        }
    }
}

/// Invokes the processing callback, converting a panic into a failed
/// attempt so the worker thread survives.
fn attempt<F>(process: &mut F, envelope: &Envelope) -> bool
where
    F: FnMut(&Envelope) -> bool,
{
    match panic::catch_unwind(AssertUnwindSafe(|| process(envelope))) {
        Ok(result) => result,
        Err(_) => {
            error!(
                envelope = envelope.id(),
                "processing callback panicked, envelope scheduled for retry"
            );
            false
        }
    }
}
