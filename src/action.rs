//! Actions: tagged input values that drive state transitions.
//!
//! An action is an opaque application value carrying a non-empty
//! discriminator (its [`kind`](Action::kind)). The store never looks at
//! anything else; payload fields are a contract between the application
//! and its reducer.

/// Discriminator of the reserved action dispatched once when a store is
/// created. Reducers should treat it like any other unrecognized action
/// and fall through to their default arm.
pub const INIT_KIND: &str = "@@switchboard/INIT";

/// A dispatchable input value.
///
/// Implementors supply a discriminator per value and a single reserved
/// seed value used to initialize a freshly created store.
///
/// # Example
///
/// ```
/// use switchboard::{Action, INIT_KIND};
///
/// enum CounterAction {
///     Increment,
///     Decrement,
///     Init,
/// }
///
/// impl Action for CounterAction {
///     fn kind(&self) -> &str {
///         match self {
///             CounterAction::Increment => "INCREMENT",
///             CounterAction::Decrement => "DECREMENT",
///             CounterAction::Init => INIT_KIND,
///         }
///     }
///
///     fn seed() -> Self {
///         CounterAction::Init
///     }
/// }
/// ```
pub trait Action {
    /// Non-empty discriminator naming the transition this action requests.
    ///
    /// `dispatch` rejects actions whose kind is empty.
    fn kind(&self) -> &str;

    /// The reserved action dispatched exactly once at store creation, so a
    /// reducer's fallthrough arm can establish derived initial state.
    ///
    /// Application code must not match on it for business logic. Its kind
    /// is conventionally [`INIT_KIND`].
    fn seed() -> Self
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Toggle {
        On,
        Off,
        Init,
    }

    impl Action for Toggle {
        fn kind(&self) -> &str {
            match self {
                Toggle::On => "ON",
                Toggle::Off => "OFF",
                Toggle::Init => INIT_KIND,
            }
        }

        fn seed() -> Self {
            Toggle::Init
        }
    }

    #[test]
    fn kinds_are_non_empty() {
        assert_eq!(Toggle::On.kind(), "ON");
        assert_eq!(Toggle::Off.kind(), "OFF");
        assert!(!Toggle::seed().kind().is_empty());
    }

    #[test]
    fn seed_uses_reserved_kind() {
        assert_eq!(Toggle::seed().kind(), INIT_KIND);
    }
}
