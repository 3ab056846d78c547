/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Sequence error types.

use thiserror::Error;

/// Error returned by a [`Transport`] send.
///
/// [`Transport`]: super::runner::Transport
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport send failed: {0}")]
pub struct TransportError(pub String);

/// Errors that terminate a [`CommandSequence`].
///
/// Step-scoped variants carry the 1-based step number and the step name,
/// so a failure reads as e.g. `malformed response at step 3
/// (cc-address-list): ...`.
///
/// [`CommandSequence`]: super::core::CommandSequence
#[derive(Debug, Clone, Error)]
pub enum SequenceError {
    /// The response could not be parsed by the current step.
    #[error("malformed response at step {step} ({name}): {detail}")]
    MalformedResponse {
        /// Step number, 1-based.
        step: usize,
        /// Step name.
        name: &'static str,
        /// Parser diagnostic.
        detail: String,
    },

    /// The remote explicitly rejected the current step's request.
    #[error("step {step} ({name}) rejected by remote: {reason}")]
    RemoteRejected {
        /// Step number, 1-based.
        step: usize,
        /// Step name.
        name: &'static str,
        /// Reason reported by the remote.
        reason: String,
    },

    /// The current step's request could not be built.
    #[error("failed to build request for step {step} ({name}): {detail}")]
    RequestBuild {
        /// Step number, 1-based.
        step: usize,
        /// Step name.
        name: &'static str,
        /// Builder diagnostic.
        detail: String,
    },

    /// No response arrived for the current step in time.
    #[error("timed out waiting for response to step {step} ({name})")]
    Timeout {
        /// Step number, 1-based.
        step: usize,
        /// Step name.
        name: &'static str,
    },

    /// The transport failed while sending the current step's request.
    #[error("transport failure at step {step} ({name}): {source}")]
    Transport {
        /// Step number, 1-based.
        step: usize,
        /// Step name.
        name: &'static str,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },

    /// The sequence was cancelled externally.
    #[error("sequence cancelled")]
    Cancelled,

    /// The operation is not valid in the sequence's current state, e.g.
    /// starting twice or delivering a response to a terminal sequence.
    #[error("operation not valid in the current sequence state")]
    InvalidState,

    /// The sequence has no steps.
    #[error("sequence has no steps")]
    Empty,
}
