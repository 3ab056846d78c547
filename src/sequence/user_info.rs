/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Session bootstrap sequences.
//!
//! Builders for the command sequences a terminal runs against the session
//! service right after login: resolving the user id, loading the user-info
//! property set, and fetching account balance snapshots.
//!
//! All property steps share one request shape ([`PropertyQuery`]) and one
//! response parser; what varies per step is the property key and whether
//! the user is addressed by login name or by the id resolved in the first
//! step.

use super::core::CommandSequence;
use super::message::{
    MessageType, PropertyQuery, PropertyReply, RejectNotice, SessionMessage, SubledgerQuery,
    SubledgerReply,
};
use super::property::{
    BALANCE_PREFIX, BITCOIN_DEALER, BITCOIN_PARTICIPANT, Properties,
    SUBMITTED_AUTH_ADDRESS_LIST, SUBMITTED_CC_ADDRESS_LIST, USER_ID,
};
use super::step::{SequenceStep, StepContext, StepError};

/// Builds the user-info bootstrap sequence.
///
/// Five strictly ordered steps:
///
/// 1. resolve the user id by login name
/// 2. fetch the submitted auth address list
/// 3. fetch the submitted CC address list
/// 4. fetch the trading participant flag
/// 5. fetch the dealer flag
///
/// Steps 2-5 address the user by the id resolved in step 1. On success the
/// completion callback receives a [`Properties`] map with all five keys
/// populated; on any step failure the sequence fails without delivering
/// partial results.
///
/// # Examples
///
/// ```
/// use msgbus_rs::sequence::message::PropertyQuery;
/// use msgbus_rs::sequence::property;
/// use msgbus_rs::sequence::user_info::load_user_info;
///
/// let mut sequence = load_user_info("alice");
/// let request = sequence.start().unwrap();
///
/// let query: PropertyQuery = request.decode().unwrap();
/// assert_eq!(query.user, "alice");
/// assert_eq!(query.key, property::USER_ID);
/// ```
///
/// [`Properties`]: super::property::Properties
#[must_use]
pub fn load_user_info(username: impl Into<String>) -> CommandSequence {
    CommandSequence::new(
        "load-user-info",
        vec![
            resolve_user_id_step(username.into()),
            user_property_step("auth-address-list", SUBMITTED_AUTH_ADDRESS_LIST),
            user_property_step("cc-address-list", SUBMITTED_CC_ADDRESS_LIST),
            user_property_step("participant-flag", BITCOIN_PARTICIPANT),
            user_property_step("dealer-flag", BITCOIN_DEALER),
        ],
    )
}

/// Builds a one-step sequence resolving a user id by login name.
///
/// On success the completion callback receives a single-entry
/// [`Properties`] map keyed by [`USER_ID`].
///
/// [`Properties`]: super::property::Properties
#[must_use]
pub fn get_user_id(username: impl Into<String>) -> CommandSequence {
    CommandSequence::new("get-user-id", vec![resolve_user_id_step(username.into())])
}

/// Builds a one-step sequence fetching the subledger balance snapshot of
/// an account.
///
/// Each `(currency, net position)` entry of the response is stored as a
/// property named `Balance.<currency>`.
#[must_use]
pub fn find_account_balances(account: impl Into<String>) -> CommandSequence {
    let account = account.into();
    let step = SequenceStep::new(
        "find-subledgers",
        move |ctx: &StepContext<'_>, _properties| {
            let query = SubledgerQuery {
                account: account.clone(),
                request_id: ctx.sequence_id.to_owned(),
            };
            Ok(SessionMessage::encode(MessageType::SubledgerRequest, &query)?)
        },
        |_ctx: &StepContext<'_>, message, properties| {
            expect_message_type(message, MessageType::SubledgerResponse)?;
            let reply: SubledgerReply = message.decode()?;
            for entry in reply.entries {
                properties.insert(
                    format!("{BALANCE_PREFIX}{}", entry.currency),
                    entry.net_position,
                );
            }
            Ok(())
        },
    );

    CommandSequence::new("find-account-balances", vec![step])
}

/// Step resolving the user id: the only step addressed by login name.
fn resolve_user_id_step(username: String) -> SequenceStep {
    SequenceStep::new(
        "resolve-user-id",
        move |ctx: &StepContext<'_>, _properties| {
            let query = PropertyQuery {
                user: username.clone(),
                key: USER_ID.to_owned(),
                request_id: ctx.sequence_id.to_owned(),
            };
            Ok(SessionMessage::encode(MessageType::PropertyRequest, &query)?)
        },
        parse_property_reply(USER_ID),
    )
}

/// Step fetching one property of the user resolved in the first step.
fn user_property_step(name: &'static str, key: &'static str) -> SequenceStep {
    SequenceStep::new(
        name,
        move |ctx: &StepContext<'_>, properties| {
            let user_id = properties
                .get(USER_ID)
                .ok_or_else(|| StepError::Malformed("user id not resolved yet".to_string()))?;
            let query = PropertyQuery {
                user: user_id.to_owned(),
                key: key.to_owned(),
                request_id: ctx.sequence_id.to_owned(),
            };
            Ok(SessionMessage::encode(MessageType::PropertyRequest, &query)?)
        },
        parse_property_reply(key),
    )
}

/// Shared parser for single-property responses.
///
/// Accepts only a [`MessageType::PropertyResponse`] whose key matches the
/// requested one; a [`MessageType::Reject`] becomes a remote rejection,
/// anything else a malformed response.
fn parse_property_reply(
    expected_key: &'static str,
) -> impl FnMut(&StepContext<'_>, &SessionMessage, &mut Properties) -> Result<(), StepError> + Send + 'static
{
    move |_ctx: &StepContext<'_>, message: &SessionMessage, properties: &mut Properties| {
        expect_message_type(message, MessageType::PropertyResponse)?;
        let reply: PropertyReply = message.decode()?;
        if reply.key != expected_key {
            return Err(StepError::Malformed(format!(
                "property key mismatch: got {}, expected {expected_key}",
                reply.key
            )));
        }
        properties.insert(expected_key, reply.value);
        Ok(())
    }
}

/// Checks the response's message type, turning rejections and type
/// mismatches into step errors.
fn expect_message_type(message: &SessionMessage, expected: MessageType) -> Result<(), StepError> {
    match message.message_type {
        actual if actual == expected => Ok(()),
        MessageType::Reject => {
            let reason = message
                .decode::<RejectNotice>()
                .map(|notice| notice.reason)
                .unwrap_or_else(|_| "unspecified".to_string());
            Err(StepError::Rejected(reason))
        }
        other => Err(StepError::Malformed(format!(
            "unexpected message type {other}, expected {expected}"
        ))),
    }
}
