/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Step descriptors for command sequences.
//!
//! A [`SequenceStep`] pairs a request-construction closure with a
//! response-parsing closure. Steps are plain data iterated by index, which
//! keeps per-step customization in the closures instead of a subclass
//! hierarchy.

use super::message::SessionMessage;
use super::property::Properties;
use std::fmt;
use thiserror::Error;

/// Failure reported by a step closure.
///
/// The owning [`CommandSequence`] decorates the error with the step number
/// and name before surfacing it.
///
/// [`CommandSequence`]: super::core::CommandSequence
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// The response (or a build input) was missing, of the wrong type, or
    /// unparseable.
    #[error("{0}")]
    Malformed(String),

    /// The remote explicitly rejected the request.
    #[error("{0}")]
    Rejected(String),
}

impl From<serde_json::Error> for StepError {
    fn from(source: serde_json::Error) -> Self {
        Self::Malformed(source.to_string())
    }
}

/// Per-invocation context handed to step closures.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Correlation id of the owning sequence.
    pub sequence_id: &'a str,

    /// Step number being executed, 1-based.
    pub step: usize,
}

type BuildFn =
    Box<dyn FnMut(&StepContext<'_>, &Properties) -> Result<SessionMessage, StepError> + Send>;
type ParseFn = Box<
    dyn FnMut(&StepContext<'_>, &SessionMessage, &mut Properties) -> Result<(), StepError> + Send,
>;

/// One step of a [`CommandSequence`]: a request builder plus the parser
/// for its response.
///
/// The builder may read values accumulated by earlier steps from the
/// [`Properties`] map; the parser stores whatever it extracts back into it.
///
/// # Examples
///
/// ```
/// use msgbus_rs::sequence::{MessageType, SequenceStep, SessionMessage};
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
/// assert_eq!(step.name(), "ping");
/// ```
///
/// [`CommandSequence`]: super::core::CommandSequence
pub struct SequenceStep {
    name: &'static str,
    build: BuildFn,
    parse: ParseFn,
}

impl SequenceStep {
    /// Creates a step from its two closures.
    ///
    /// # Arguments
    ///
    /// * `name` - Stable step name used in errors and logging
    /// * `build` - Constructs the step's outbound request
    /// * `parse` - Parses the step's response, storing extracted values
    #[must_use]
    pub fn new<B, P>(name: &'static str, build: B, parse: P) -> Self
    where
        B: FnMut(&StepContext<'_>, &Properties) -> Result<SessionMessage, StepError>
            + Send
            + 'static,
        P: FnMut(&StepContext<'_>, &SessionMessage, &mut Properties) -> Result<(), StepError>
            + Send
            + 'static,
    {
        Self {
            name,
            build: Box::new(build),
            parse: Box::new(parse),
        }
    }

    /// Returns the step's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn build_request(
        &mut self,
        ctx: &StepContext<'_>,
        properties: &Properties,
    ) -> Result<SessionMessage, StepError> {
        (self.build)(ctx, properties)
    }

    pub(crate) fn parse_response(
        &mut self,
        ctx: &StepContext<'_>,
        message: &SessionMessage,
        properties: &mut Properties,
    ) -> Result<(), StepError> {
        (self.parse)(ctx, message, properties)
    }
}

impl fmt::Debug for SequenceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceStep")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
