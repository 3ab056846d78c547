/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Transport wiring for command sequences.
//!
//! The [`SequenceRunner`] keeps the sequences currently in flight, keyed
//! by correlation id. It sends each outbound request through a
//! [`Transport`] and routes every inbound response back to the owning
//! [`CommandSequence`], emitting the follow-up request when the sequence
//! advances.

use super::core::{CommandSequence, SequenceOutcome};
use super::error::{SequenceError, TransportError};
use super::message::SessionMessage;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Capability interface to the bidirectional session channel.
///
/// The core never opens sockets itself; it only requires something able to
/// send an opaque outbound message tagged with a correlation id. Inbound
/// responses reach the runner through [`SequenceRunner::deliver`], tagged
/// with the same id.
pub trait Transport {
    /// Sends `message` tagged with `correlation_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the message could not be handed to
    /// the channel.
    fn send(&self, correlation_id: &str, message: &SessionMessage) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, correlation_id: &str, message: &SessionMessage) -> Result<(), TransportError> {
        (**self).send(correlation_id, message)
    }
}

/// Orchestrator feeding [`CommandSequence`]s to a [`Transport`] and
/// transport responses back into them.
///
/// # Examples
///
/// ```
/// use msgbus_rs::sequence::{SequenceRunner, SessionMessage, Transport, TransportError};
///
/// struct NullTransport;
///
/// impl Transport for NullTransport {
///     fn send(&self, _id: &str, _message: &SessionMessage) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
///
/// let runner = SequenceRunner::new(NullTransport);
/// assert_eq!(runner.in_flight(), 0);
/// ```
pub struct SequenceRunner<T: Transport> {
    transport: T,

    /// In-flight sequences keyed by correlation id.
    sequences: DashMap<String, CommandSequence>,
}

impl<T: Transport> SequenceRunner<T> {
    /// Creates a runner over the given transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sequences: DashMap::new(),
        }
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the number of sequences currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.sequences.len()
    }

    /// Starts a sequence and sends its first request.
    ///
    /// On success the sequence is registered under its correlation id,
    /// which is returned so the caller can later [`cancel`] or [`expire`]
    /// it.
    ///
    /// # Errors
    ///
    /// Propagates the start error, or a [`SequenceError::Transport`] if the
    /// first send fails. In both cases the sequence has already failed and
    /// its failure callback has fired.
    ///
    /// [`cancel`]: SequenceRunner::cancel
    /// [`expire`]: SequenceRunner::expire
    pub fn launch(&self, mut sequence: CommandSequence) -> Result<String, SequenceError> {
        let request = sequence.start()?;
        let correlation_id = sequence.sequence_id().to_string();

        if let Err(source) = self.transport.send(&correlation_id, &request) {
            let error = transport_failure(&sequence, source);
            sequence.fail(error.clone());
            return Err(error);
        }

        debug!(
            sequence = sequence.name(),
            id = %correlation_id,
            "sequence launched"
        );
        self.sequences.insert(correlation_id.clone(), sequence);
        Ok(correlation_id)
    }

    /// Routes an inbound response to its in-flight sequence.
    ///
    /// When the sequence advances, the follow-up request is sent through
    /// the transport; when it reaches a terminal state (completed, failed,
    /// or the follow-up send fails) it is dropped from the registry.
    ///
    /// Returns `false` if no sequence is registered under
    /// `correlation_id`; the response is dropped with a log line.
    pub fn deliver(&self, correlation_id: &str, response: &SessionMessage) -> bool {
        let Some((id, mut sequence)) = self.sequences.remove(correlation_id) else {
            warn!(correlation_id, "response for unknown sequence dropped");
            return false;
        };

        match sequence.on_response(response) {
            Ok(SequenceOutcome::Next(request)) => {
                match self.transport.send(&id, &request) {
                    Ok(()) => {
                        // still running, keep it registered
                        self.sequences.insert(id, sequence);
                    }
                    Err(source) => {
                        let error = transport_failure(&sequence, source);
                        sequence.fail(error);
                    }
                }
                true
            }
            Ok(SequenceOutcome::Completed) => true,
            // the sequence failed and already reported through its
            // failure callback
            Err(_) => true,
        }
    }

    /// Cancels an in-flight sequence.
    ///
    /// Returns `false` if no sequence is registered under
    /// `correlation_id`.
    pub fn cancel(&self, correlation_id: &str) -> bool {
        let Some((_, mut sequence)) = self.sequences.remove(correlation_id) else {
            return false;
        };
        sequence.cancel();
        true
    }

    /// Times out an in-flight sequence, failing it with
    /// [`SequenceError::Timeout`] for the step currently awaiting its
    /// response.
    ///
    /// Returns `false` if no sequence is registered under
    /// `correlation_id`.
    pub fn expire(&self, correlation_id: &str) -> bool {
        let Some((_, mut sequence)) = self.sequences.remove(correlation_id) else {
            return false;
        };
        let step = sequence.current_step().map_or(0, |s| s + 1);
        let name = sequence.current_step_name().unwrap_or("unknown");
        sequence.fail(SequenceError::Timeout { step, name });
        true
    }
}

/// Builds a step-scoped transport error for the step currently in flight.
fn transport_failure(sequence: &CommandSequence, source: TransportError) -> SequenceError {
    SequenceError::Transport {
        step: sequence.current_step().map_or(0, |s| s + 1),
        name: sequence.current_step_name().unwrap_or("unknown"),
        source,
    }
}
