//! # Switchboard
//!
//! A minimal, predictable state container for Rust.
//!
//! A [`Store`] owns a single state value and replaces it only through a
//! pure reducer driven by dispatched actions. After every successful
//! transition it runs one notification round over the listeners that were
//! subscribed when the round started — listeners added or removed
//! mid-round take effect from the next round, courtesy of copy-on-write
//! listener lists.
//!
//! The store is synchronous and single-threaded; reentrant calls from
//! inside a reducer are rejected with [`StoreError::DispatchInProgress`]
//! rather than deadlocking or corrupting state.
//!
//! ## Example
//!
//! ```
//! use switchboard::{create_store, Action, INIT_KIND};
//!
//! enum CounterAction {
//!     Increment,
//!     Init,
//! }
//!
//! impl Action for CounterAction {
//!     fn kind(&self) -> &str {
//!         match self {
//!             CounterAction::Increment => "INCREMENT",
//!             CounterAction::Init => INIT_KIND,
//!         }
//!     }
//!
//!     fn seed() -> Self {
//!         CounterAction::Init
//!     }
//! }
//!
//! let store = create_store(
//!     |state: &i32, action: &CounterAction| match action {
//!         CounterAction::Increment => state + 1,
//!         _ => *state,
//!     },
//!     0,
//! )
//! .unwrap();
//!
//! let subscription = store
//!     .subscribe(|| println!("state changed"))
//!     .unwrap();
//!
//! store.dispatch(CounterAction::Increment).unwrap();
//! store.dispatch(CounterAction::Increment).unwrap();
//! assert_eq!(store.get_state(), Ok(2));
//!
//! subscription.unsubscribe().unwrap();
//! ```

pub mod action;
pub mod error;
pub mod store;

// Re-export main types for convenience
pub use action::{Action, INIT_KIND};
pub use error::StoreError;
pub use store::{create_store, Store, Subscription};
