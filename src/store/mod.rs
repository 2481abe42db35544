//! The store: a transition engine paired with a listener registry.
//!
//! [`Store`] holds the current state and the reducer and executes
//! dispatches; [`Subscription`] handles come from the registry that
//! notifies listeners after each successful transition.

mod listeners;
mod store;

pub use listeners::Subscription;
pub use store::{create_store, Store};
