/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Adapter error types.

use thiserror::Error;

/// Errors that can occur when interacting with the [`ThreadedAdapter`].
///
/// [`ThreadedAdapter`]: super::core::ThreadedAdapter
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AdapterError {
    /// The adapter has been stopped; submissions are rejected.
    #[error("adapter has been stopped")]
    Stopped,
}
