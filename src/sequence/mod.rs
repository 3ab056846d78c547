/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Multi-step command sequences for request/response session protocols.
//!
//! This module provides a [`CommandSequence`] state machine that drives a
//! strictly ordered list of protocol steps against a remote session
//! service. Each step builds an outbound [`SessionMessage`] and parses the
//! corresponding response; parsed values accumulate in a [`Properties`] map
//! that later steps may read and that the completion callback receives on
//! full-sequence success.
//!
//! # Architecture
//!
//! - Steps execute strictly in order; a step never re-executes after
//!   success
//! - Any step failure (malformed response, remote rejection, timeout,
//!   cancellation) terminates the sequence with a single typed failure
//!   callback; the success callback never fires and no partial results are
//!   delivered
//! - A [`SequenceRunner`] wires sequences to a [`Transport`], routing
//!   inbound responses by correlation id and emitting each follow-up
//!   request as the sequence advances
//!
//! # Examples
//!
//! ```
//! use msgbus_rs::sequence::user_info::load_user_info;
//! use msgbus_rs::sequence::message::PropertyQuery;
//!
//! let mut sequence = load_user_info("alice");
//! let first_request = sequence.start().unwrap();
//!
//! let query: PropertyQuery = first_request.decode().unwrap();
//! assert_eq!(query.user, "alice");
//! ```

pub mod core;
pub mod error;
pub mod message;
pub mod property;
pub mod runner;
pub mod step;
pub mod user_info;

#[cfg(test)]
mod tests;

// Re-export main types
pub use core::{CommandSequence, SequenceOutcome, SequenceState};
pub use error::{SequenceError, TransportError};
pub use message::{MessageType, SessionMessage};
pub use property::{Properties, property_description};
pub use runner::{SequenceRunner, Transport};
pub use step::{SequenceStep, StepContext, StepError};
