/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Envelope types.
//!
//! This module defines the [`Envelope`], the immutable unit of routed work
//! handled by the [`ThreadedAdapter`], and the [`EndpointId`] used for its
//! routing metadata.
//!
//! [`ThreadedAdapter`]: super::core::ThreadedAdapter

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a routing endpoint (a producer or consumer of envelopes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointId(pub u32);

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Global monotonic envelope id counter, shared by all adapters.
static NEXT_ENVELOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Immutable unit of routed work.
///
/// An envelope carries an opaque payload plus routing metadata: the sender,
/// an optional target, a monotonically increasing id usable for correlation,
/// and a creation timestamp. Once constructed an envelope is never mutated;
/// ownership transfers into the adapter's queue and then to the worker
/// thread for the duration of one processing attempt.
///
/// # Examples
///
/// ```
/// use msgbus_rs::adapter::{EndpointId, Envelope};
///
/// let envelope = Envelope::new(EndpointId(1), Some(EndpointId(2)), b"quote".to_vec());
/// assert_eq!(envelope.sender(), EndpointId(1));
/// assert_eq!(envelope.receiver(), Some(EndpointId(2)));
/// assert_eq!(envelope.payload(), b"quote");
/// assert!(envelope.id() > 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Monotonically increasing id, assigned at construction.
    id: u64,

    /// Endpoint that created the envelope.
    sender: EndpointId,

    /// Target endpoint, or `None` for broadcast delivery.
    receiver: Option<EndpointId>,

    /// Nanosecond timestamp taken at construction.
    timestamp_ns: u64,

    /// Opaque payload; the adapter never inspects it.
    payload: Vec<u8>,
}

impl Envelope {
    /// Creates a new envelope addressed to `receiver`.
    ///
    /// The id and creation timestamp are assigned here; both are fixed for
    /// the lifetime of the envelope.
    ///
    /// # Arguments
    ///
    /// * `sender` - Endpoint creating the envelope
    /// * `receiver` - Target endpoint, or `None` for broadcast
    /// * `payload` - Opaque payload bytes
    #[must_use]
    pub fn new(sender: EndpointId, receiver: Option<EndpointId>, payload: Vec<u8>) -> Self {
        Self {
            id: NEXT_ENVELOPE_ID.fetch_add(1, Ordering::Relaxed),
            sender,
            receiver,
            timestamp_ns: nanos_since_epoch(),
            payload,
        }
    }

    /// Creates a new envelope with no specific target.
    #[must_use]
    pub fn broadcast(sender: EndpointId, payload: Vec<u8>) -> Self {
        Self::new(sender, None, payload)
    }

    /// Returns the envelope's sequence/correlation id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the sending endpoint.
    #[inline]
    #[must_use]
    pub fn sender(&self) -> EndpointId {
        self.sender
    }

    /// Returns the target endpoint, if any.
    #[inline]
    #[must_use]
    pub fn receiver(&self) -> Option<EndpointId> {
        self.receiver
    }

    /// Returns the creation timestamp in nanoseconds since the Unix epoch.
    #[inline]
    #[must_use]
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    /// Returns the opaque payload.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes the envelope and returns its payload.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Returns the current time in nanoseconds since the Unix epoch.
#[inline]
fn nanos_since_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
