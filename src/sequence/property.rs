/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Property name constants and the accumulated result map.
//!
//! The session service models per-user attributes as named properties.
//! This module defines the protocol property names, a diagnostic
//! description lookup, and the [`Properties`] map a [`CommandSequence`]
//! fills in as its steps complete.
//!
//! [`CommandSequence`]: super::core::CommandSequence

use std::collections::HashMap;

/// Unique user id property.
pub const USER_ID: &str = "UserID";

/// Submitted authentication address list property.
pub const SUBMITTED_AUTH_ADDRESS_LIST: &str = "SubmittedBtcAuthAddresses";

/// Submitted CC address list property.
pub const SUBMITTED_CC_ADDRESS_LIST: &str = "SubmittedCCAddresses";

/// Market session system property.
pub const MARKET_SESSION: &str = "MarketSession";

/// Socket access system property.
pub const SOCKET_ACCESS: &str = "SocketAccess";

/// General trading participation flag.
pub const BITCOIN_PARTICIPANT: &str = "BitcoinParticipant";

/// XBT dealing flag.
pub const BITCOIN_DEALER: &str = "BitcoinDealer";

/// Prefix for per-currency balance properties produced by the subledger
/// sequence.
pub const BALANCE_PREFIX: &str = "Balance.";

/// Returns a human-readable description of a protocol property name.
///
/// Consulted for diagnostics and logging only. Unknown names yield the
/// fixed `"undefined property"` string; no error is raised.
///
/// # Examples
///
/// ```
/// use msgbus_rs::sequence::property;
///
/// assert_eq!(property::property_description(property::USER_ID), "unique user ID");
/// assert_eq!(property::property_description("NoSuchKey"), "undefined property");
/// ```
#[must_use]
pub fn property_description(name: &str) -> &'static str {
    match name {
        USER_ID => "unique user ID",
        SUBMITTED_AUTH_ADDRESS_LIST => "submitted auth address list",
        SUBMITTED_CC_ADDRESS_LIST => "submitted CC address list",
        MARKET_SESSION => "market session (system property)",
        SOCKET_ACCESS => "socket access (system property)",
        BITCOIN_PARTICIPANT => "general trading",
        BITCOIN_DEALER => "XBT dealing",
        _ => "undefined property",
    }
}

/// Accumulated key/value result set of a command sequence.
///
/// Populated incrementally as steps complete and handed to the completion
/// callback only on full-sequence success. A failed sequence never exposes
/// partial results.
///
/// # Examples
///
/// ```
/// use msgbus_rs::sequence::{Properties, property};
///
/// let mut properties = Properties::new();
/// properties.insert(property::USER_ID, "u-1042");
///
/// assert_eq!(properties.get(property::USER_ID), Some("u-1042"));
/// assert_eq!(properties.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Creates an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a property value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of stored properties.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no properties are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the stored property names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Consumes the map and returns the underlying storage.
    #[must_use]
    pub fn into_inner(self) -> HashMap<String, String> {
        self.values
    }
}
