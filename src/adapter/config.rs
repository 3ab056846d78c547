/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Adapter configuration types.
//!
//! This module defines the retry and shutdown policies of a
//! [`ThreadedAdapter`]. The defaults reproduce the behavior terminals have
//! historically relied on: retry forever with no backoff, and discard
//! whatever is still queued when the adapter stops.
//!
//! [`ThreadedAdapter`]: super::core::ThreadedAdapter

use std::time::Duration;

/// Retry policy applied when the processing callback reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Retry forever with no backoff.
    ///
    /// An envelope whose callback can never succeed will be retried
    /// indefinitely, consuming worker time. This is the default.
    #[default]
    Unbounded,

    /// Retry up to `max_attempts` total attempts, pausing the worker for
    /// `backoff` before each re-enqueue. Exhausted envelopes are logged and
    /// dropped. At least one attempt is always made.
    Bounded {
        /// Total number of processing attempts allowed per envelope.
        max_attempts: u32,
        /// Pause before re-enqueueing a failed envelope.
        backoff: Duration,
    },
}

/// Policy applied to envelopes still queued when [`stop`] is called.
///
/// [`stop`]: super::core::ThreadedAdapter::stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownPolicy {
    /// Drop all unprocessed envelopes. Fast shutdown with documented work
    /// loss; the default.
    #[default]
    Discard,

    /// Give every pending envelope a single final processing attempt before
    /// the worker exits. Failures during the drain are logged and dropped,
    /// never retried.
    Drain,
}

/// Configuration for a [`ThreadedAdapter`].
///
/// # Examples
///
/// ```
/// use msgbus_rs::adapter::{AdapterConfig, RetryPolicy, ShutdownPolicy};
/// use std::time::Duration;
///
/// let config = AdapterConfig::new()
///     .with_retry(RetryPolicy::Bounded {
///         max_attempts: 5,
///         backoff: Duration::from_millis(10),
///     })
///     .with_shutdown(ShutdownPolicy::Drain);
///
/// assert_eq!(config.shutdown, ShutdownPolicy::Drain);
/// ```
///
/// [`ThreadedAdapter`]: super::core::ThreadedAdapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterConfig {
    /// Retry policy for failed processing attempts.
    pub retry: RetryPolicy,

    /// What to do with pending envelopes on shutdown.
    pub shutdown: ShutdownPolicy,
}

impl AdapterConfig {
    /// Creates a configuration with the default policies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the shutdown policy.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: ShutdownPolicy) -> Self {
        self.shutdown = shutdown;
        self
    }
}
