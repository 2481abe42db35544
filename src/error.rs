//! Error types for store operations.

use thiserror::Error;

/// Errors surfaced by [`Store`](crate::Store) operations.
///
/// Every variant marks a programming-contract violation, not a transient
/// condition: callers should restructure rather than retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The dispatched action's discriminator was empty.
    #[error("action kind must be a non-empty string")]
    EmptyActionKind,

    /// A store method was called while a dispatch was already in progress,
    /// e.g. from inside a reducer.
    #[error("store may not be accessed while a dispatch is in progress")]
    DispatchInProgress,
}
