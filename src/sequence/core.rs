/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Core CommandSequence implementation.
//!
//! This module provides the main [`CommandSequence`] struct: an ordered
//! list of [`SequenceStep`]s driven through a strict
//! `Created → Running → {Completed | Failed}` life cycle by whichever
//! thread delivers the transport's responses.

use super::error::SequenceError;
use super::message::SessionMessage;
use super::property::Properties;
use super::step::{SequenceStep, StepContext, StepError};
use tracing::{debug, error};
use uuid::Uuid;

/// Life-cycle state of a [`CommandSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Constructed, not yet started.
    Created,

    /// Waiting for the response to step `step` (0-based).
    Running {
        /// Index of the step currently in flight.
        step: usize,
    },

    /// All steps parsed successfully; the completion callback has fired.
    Completed,

    /// A step failed, or the sequence was cancelled. Terminal.
    Failed,
}

/// Outcome of feeding one response into a sequence.
#[derive(Debug)]
pub enum SequenceOutcome {
    /// The step parsed; here is the next step's outbound request.
    Next(SessionMessage),

    /// The final step parsed; the sequence is complete.
    Completed,
}

type CompleteFn = Box<dyn FnOnce(Properties) + Send>;
type FailureFn = Box<dyn FnOnce(SequenceError) + Send>;

/// An ordered multi-step protocol exchange.
///
/// Each step builds an outbound request and parses the matching response;
/// values extracted along the way accumulate in a [`Properties`] map that
/// later steps may read. The sequence either completes fully, firing the
/// success callback exactly once with the accumulated properties, or fails
/// exactly once with a typed [`SequenceError`]. A terminal sequence must
/// not be reused; retrying means constructing a fresh instance.
///
/// Sequences are not thread-shared: one instance drives one in-flight
/// exchange and is driven by whichever thread delivers the responses.
///
/// # Examples
///
/// ```
/// use msgbus_rs::sequence::{
///     CommandSequence, MessageType, SequenceOutcome, SequenceStep, SessionMessage,
/// };
///
/// let step = SequenceStep::new(
///     "ping",
///     |_ctx, _properties| {
///         Ok(SessionMessage {
///             message_type: MessageType::PropertyRequest,
///             payload: b"ping".to_vec(),
///         })
///     },
///     |_ctx, _message, properties| {
///         properties.insert("pong", "1");
///         Ok(())
///     },
/// );
///
/// let mut sequence = CommandSequence::new("ping-pong", vec![step])
///     .on_complete(|properties| assert_eq!(properties.get("pong"), Some("1")));
///
/// let request = sequence.start().unwrap();
/// assert_eq!(request.payload, b"ping");
///
/// let response = SessionMessage {
///     message_type: MessageType::PropertyResponse,
///     payload: Vec::new(),
/// };
/// let outcome = sequence.on_response(&response).unwrap();
/// assert!(matches!(outcome, SequenceOutcome::Completed));
/// ```
pub struct CommandSequence {
    /// Sequence name used in errors and logging.
    name: &'static str,

    /// Correlation id linking requests to responses, assigned at
    /// construction.
    sequence_id: String,

    /// The ordered steps.
    steps: Vec<SequenceStep>,

    /// Current life-cycle state.
    state: SequenceState,

    /// Values accumulated by completed steps.
    properties: Properties,

    /// Success callback; taken when fired so it runs at most once.
    on_complete: Option<CompleteFn>,

    /// Failure callback; taken when fired so it runs at most once.
    on_failure: Option<FailureFn>,
}

impl CommandSequence {
    /// Creates a sequence from its ordered steps.
    ///
    /// A fresh UUID correlation id is assigned; it tags every outbound
    /// request the sequence builds.
    #[must_use]
    pub fn new(name: &'static str, steps: Vec<SequenceStep>) -> Self {
        Self {
            name,
            sequence_id: Uuid::new_v4().to_string(),
            steps,
            state: SequenceState::Created,
            properties: Properties::new(),
            on_complete: None,
            on_failure: None,
        }
    }

    /// Sets the callback fired exactly once on full-sequence success.
    #[must_use]
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Properties) + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Sets the callback fired exactly once when the sequence fails.
    #[must_use]
    pub fn on_failure<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(SequenceError) + Send + 'static,
    {
        self.on_failure = Some(Box::new(callback));
        self
    }

    /// Returns the sequence name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the correlation id.
    #[inline]
    #[must_use]
    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    /// Returns the current life-cycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Returns the 0-based index of the step in flight, if running.
    #[must_use]
    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            SequenceState::Running { step } => Some(step),
            _ => None,
        }
    }

    /// Returns the name of the step in flight, if running.
    #[must_use]
    pub fn current_step_name(&self) -> Option<&'static str> {
        self.current_step().map(|step| self.steps[step].name())
    }

    /// Returns the number of steps.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the sequence has no steps.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns `true` once the sequence has completed or failed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SequenceState::Completed | SequenceState::Failed
        )
    }

    /// Starts the sequence, building the first step's outbound request.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidState`] if the sequence was already
    ///   started
    /// - [`SequenceError::Empty`] if there are no steps (the sequence
    ///   fails)
    /// - [`SequenceError::RequestBuild`] if the first request cannot be
    ///   built (the sequence fails)
    pub fn start(&mut self) -> Result<SessionMessage, SequenceError> {
        if !matches!(self.state, SequenceState::Created) {
            return Err(SequenceError::InvalidState);
        }
        if self.steps.is_empty() {
            let err = SequenceError::Empty;
            self.fail_with(&err);
            return Err(err);
        }

        self.state = SequenceState::Running { step: 0 };
        debug!(
            sequence = self.name,
            id = %self.sequence_id,
            steps = self.steps.len(),
            "sequence started"
        );
        self.build_current()
    }

    /// Feeds the response to the step currently in flight.
    ///
    /// On parse success the extracted values are stored and the sequence
    /// either advances, returning the next request to send, or completes,
    /// firing the success callback with the accumulated [`Properties`].
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidState`] if the sequence is not running;
    ///   no callbacks fire
    /// - [`SequenceError::MalformedResponse`] / [`SequenceError::RemoteRejected`]
    ///   if the step's parser fails; the sequence fails
    /// - [`SequenceError::RequestBuild`] if the follow-up request cannot
    ///   be built; the sequence fails
    pub fn on_response(
        &mut self,
        response: &SessionMessage,
    ) -> Result<SequenceOutcome, SequenceError> {
        let SequenceState::Running { step } = self.state else {
            return Err(SequenceError::InvalidState);
        };

        let name = self.steps[step].name();
        let ctx = StepContext {
            sequence_id: &self.sequence_id,
            step: step + 1,
        };
        let parsed = self.steps[step].parse_response(&ctx, response, &mut self.properties);

        match parsed {
            Ok(()) => {
                if step + 1 == self.steps.len() {
                    self.state = SequenceState::Completed;
                    debug!(
                        sequence = self.name,
                        id = %self.sequence_id,
                        properties = self.properties.len(),
                        "sequence completed"
                    );
                    self.on_failure = None;
                    if let Some(callback) = self.on_complete.take() {
                        callback(std::mem::take(&mut self.properties));
                    }
                    Ok(SequenceOutcome::Completed)
                } else {
                    self.state = SequenceState::Running { step: step + 1 };
                    Ok(SequenceOutcome::Next(self.build_current()?))
                }
            }
            Err(StepError::Rejected(reason)) => {
                let err = SequenceError::RemoteRejected {
                    step: step + 1,
                    name,
                    reason,
                };
                self.fail_with(&err);
                Err(err)
            }
            Err(StepError::Malformed(detail)) => {
                let err = SequenceError::MalformedResponse {
                    step: step + 1,
                    name,
                    detail,
                };
                self.fail_with(&err);
                Err(err)
            }
        }
    }

    /// Cancels the sequence.
    ///
    /// A running (or not-yet-started) sequence transitions to `Failed`,
    /// firing the failure callback once with [`SequenceError::Cancelled`].
    /// No callbacks of any kind fire afterwards. Cancelling a terminal
    /// sequence is a no-op.
    pub fn cancel(&mut self) {
        if self.is_terminal() {
            return;
        }
        debug!(sequence = self.name, id = %self.sequence_id, "sequence cancelled");
        self.fail_with(&SequenceError::Cancelled);
    }

    /// Fails the sequence with an externally observed error, e.g. a
    /// transport loss or a response timeout.
    ///
    /// Fires the failure callback once. A terminal sequence is left
    /// untouched.
    pub fn fail(&mut self, error: SequenceError) {
        if self.is_terminal() {
            return;
        }
        self.fail_with(&error);
    }

    /// Builds the outbound request for the step in flight.
    fn build_current(&mut self) -> Result<SessionMessage, SequenceError> {
        let SequenceState::Running { step } = self.state else {
            return Err(SequenceError::InvalidState);
        };

        let ctx = StepContext {
            sequence_id: &self.sequence_id,
            step: step + 1,
        };
        match self.steps[step].build_request(&ctx, &self.properties) {
            Ok(request) => {
                debug!(
                    sequence = self.name,
                    id = %self.sequence_id,
                    step = step + 1,
                    name = self.steps[step].name(),
                    "request built"
                );
                Ok(request)
            }
            Err(source) => {
                let err = SequenceError::RequestBuild {
                    step: step + 1,
                    name: self.steps[step].name(),
                    detail: source.to_string(),
                };
                self.fail_with(&err);
                Err(err)
            }
        }
    }

    /// Marks the sequence failed and fires the failure callback at most
    /// once. The success callback is disarmed permanently.
    fn fail_with(&mut self, error: &SequenceError) {
        self.state = SequenceState::Failed;
        error!(
            sequence = self.name,
            id = %self.sequence_id,
            error = %error,
            "sequence failed"
        );
        self.on_complete = None;
        if let Some(callback) = self.on_failure.take() {
            callback(error.clone());
        }
    }
}
