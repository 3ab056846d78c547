/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Session-service message types.
//!
//! A [`SessionMessage`] is the unit exchanged with the remote session
//! service: a message-type tag plus an opaque payload. The payload bodies
//! used by the built-in sequences are JSON-encoded; anything beyond that is
//! the transport's concern.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying the payload carried by a [`SessionMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Request for a single user property ([`PropertyQuery`]).
    PropertyRequest,

    /// Response carrying a single property value ([`PropertyReply`]).
    PropertyResponse,

    /// Request for the subledger snapshot of an account
    /// ([`SubledgerQuery`]).
    SubledgerRequest,

    /// Response carrying subledger balance entries ([`SubledgerReply`]).
    SubledgerResponse,

    /// Explicit rejection of a request ([`RejectNotice`]).
    Reject,
}

impl MessageType {
    /// Returns a human-readable name for diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PropertyRequest => "PropertyRequest",
            Self::PropertyResponse => "PropertyResponse",
            Self::SubledgerRequest => "SubledgerRequest",
            Self::SubledgerResponse => "SubledgerResponse",
            Self::Reject => "Reject",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Message exchanged with the session service.
///
/// # Examples
///
/// ```
/// use msgbus_rs::sequence::message::{MessageType, PropertyQuery, SessionMessage};
///
/// let query = PropertyQuery {
///     user: "alice".to_string(),
///     key: "UserID".to_string(),
///     request_id: "req-1".to_string(),
/// };
/// let message = SessionMessage::encode(MessageType::PropertyRequest, &query).unwrap();
///
/// let decoded: PropertyQuery = message.decode().unwrap();
/// assert_eq!(decoded, query);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMessage {
    /// Payload type tag.
    pub message_type: MessageType,

    /// Encoded payload body.
    pub payload: Vec<u8>,
}

impl SessionMessage {
    /// Encodes `body` as the JSON payload of a new message.
    ///
    /// # Errors
    ///
    /// Returns the underlying serialization error if `body` cannot be
    /// encoded.
    pub fn encode<T: Serialize>(
        message_type: MessageType,
        body: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            message_type,
            payload: serde_json::to_vec(body)?,
        })
    }

    /// Decodes the JSON payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns the underlying deserialization error if the payload is not
    /// valid JSON for `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

/// Request for one property of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyQuery {
    /// User the property belongs to. The bootstrap sequence addresses the
    /// first step by username and subsequent steps by resolved user id.
    pub user: String,

    /// Property name being requested.
    pub key: String,

    /// Correlation id of the owning sequence.
    pub request_id: String,
}

/// Response carrying a single property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyReply {
    /// Property name, echoed from the request.
    pub key: String,

    /// Property value.
    pub value: String,

    /// Correlation id, echoed from the request.
    pub request_id: String,
}

/// Request for the subledger snapshot of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubledgerQuery {
    /// Account name.
    pub account: String,

    /// Correlation id of the owning sequence.
    pub request_id: String,
}

/// One subledger balance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubledgerEntry {
    /// Currency code of the subledger.
    pub currency: String,

    /// Net position, serialized as a decimal string.
    pub net_position: String,
}

/// Response carrying the subledger entries of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubledgerReply {
    /// Balance entries, one per currency.
    pub entries: Vec<SubledgerEntry>,

    /// Correlation id, echoed from the request.
    pub request_id: String,
}

/// Explicit rejection of a request by the session service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectNotice {
    /// Reason reported by the remote.
    pub reason: String,
}
