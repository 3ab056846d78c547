/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! # MsgBus-rs
//!
//! A threaded message-routing and protocol-sequencing backbone for trading
//! terminals.
//!
//! The crate has two independent subsystems:
//!
//! - [`adapter`]: a [`ThreadedAdapter`] that decouples any number of
//!   producer threads from a single in-process consumer. Envelopes are
//!   pushed into an unbounded multi-producer/single-consumer channel and
//!   drained by one dedicated worker thread. A processing callback that
//!   reports failure causes the envelope to be re-enqueued for a later
//!   retry attempt, giving at-least-once delivery semantics.
//! - [`sequence`]: a [`CommandSequence`] state machine that drives strictly
//!   ordered multi-step request/response exchanges against a remote session
//!   service, plus a [`SequenceRunner`] that wires sequences to a
//!   [`Transport`] by correlation id.
//!
//! # Architecture
//!
//! - Producers call [`ThreadedAdapter::submit`] from any thread; submission
//!   is fire-and-forget and never blocks on processing
//! - The worker thread is the only consumer; it blocks in channel receive,
//!   never while holding a lock
//! - A failed processing attempt re-enqueues the envelope at the back of
//!   the queue, behind anything submitted in the meantime
//! - Each `CommandSequence` advances through its steps exactly once, either
//!   to completion (success callback with accumulated [`Properties`]) or to
//!   a single typed failure
//!
//! # Examples
//!
//! ```
//! use msgbus_rs::adapter::{EndpointId, Envelope, ThreadedAdapter};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let processed = Arc::new(AtomicUsize::new(0));
//! let counter = processed.clone();
//!
//! let mut adapter = ThreadedAdapter::spawn(move |_envelope| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     true
//! });
//!
//! let accepted = adapter.submit(Envelope::new(EndpointId(1), None, b"tick".to_vec()));
//! assert!(accepted);
//!
//! adapter.stop();
//! ```
//!
//! [`ThreadedAdapter`]: adapter::ThreadedAdapter
//! [`ThreadedAdapter::submit`]: adapter::ThreadedAdapter::submit
//! [`CommandSequence`]: sequence::CommandSequence
//! [`SequenceRunner`]: sequence::SequenceRunner
//! [`Transport`]: sequence::Transport
//! [`Properties`]: sequence::Properties

pub mod adapter;
pub mod sequence;

// Re-export main types
pub use adapter::{
    AdapterConfig, AdapterError, EndpointId, Envelope, RetryPolicy, ShutdownPolicy, ThreadedAdapter,
};
pub use sequence::{
    CommandSequence, Properties, SequenceError, SequenceOutcome, SequenceRunner, SequenceState,
    SequenceStep, SessionMessage, StepContext, StepError, Transport, TransportError,
};
