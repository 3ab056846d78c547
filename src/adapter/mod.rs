/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Threaded adapter for decoupled, serialized envelope processing.
//!
//! This module provides a [`ThreadedAdapter`] that accepts [`Envelope`]s
//! from arbitrarily many producer threads and hands them, one at a time and
//! in submission order, to a processing callback running on a single
//! dedicated worker thread.
//!
//! # Architecture
//!
//! - Envelopes are queued on an unbounded multi-producer/single-consumer
//!   channel; the channel doubles as the worker's wake signal
//! - Submission is fire-and-forget: producers never block waiting for
//!   processing, only on brief channel contention
//! - A processing callback that returns `false` (or panics) re-enqueues the
//!   envelope at the back of the queue for a later attempt
//! - [`ThreadedAdapter::stop`] is a cooperative, idempotent shutdown that
//!   joins the worker; pending envelopes are discarded or drained depending
//!   on [`ShutdownPolicy`]
//!
//! There is no bounded capacity and no backpressure: a producer that is
//! faster than the consumer grows the queue without limit.
//!
//! # Examples
//!
//! ```
//! use msgbus_rs::adapter::{EndpointId, Envelope, ThreadedAdapter};
//!
//! let mut adapter = ThreadedAdapter::spawn(|envelope| {
//!     // deliver the payload somewhere; `true` acknowledges the envelope
//!     !envelope.payload().is_empty()
//! });
//!
//! adapter.submit(Envelope::new(EndpointId(1), Some(EndpointId(2)), b"fill".to_vec()));
//! adapter.stop();
//! ```

pub mod config;
pub mod core;
pub mod envelope;
pub mod error;

#[cfg(test)]
mod tests;

// Re-export main types
pub use config::{AdapterConfig, RetryPolicy, ShutdownPolicy};
pub use core::ThreadedAdapter;
pub use envelope::{EndpointId, Envelope};
pub use error::AdapterError;
