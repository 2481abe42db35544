use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use crate::action::Action;
use crate::error::StoreError;
use crate::store::listeners::{ListenerRegistry, Subscription};

type Reducer<S, A> = Box<dyn Fn(&S, &A) -> S>;

/// A single-writer state container.
///
/// The store owns the current state and replaces it wholesale on each
/// successful [`dispatch`](Store::dispatch), then notifies subscribed
/// listeners. It is a cheap handle: clones share the same state, reducer
/// and listener registry.
///
/// The store is single-threaded by design and guards against logical
/// reentrancy: calling any store method from inside a running reducer
/// fails with [`StoreError::DispatchInProgress`]. Listeners run after the
/// transition completes, so they may freely dispatch, subscribe or read
/// state.
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

struct StoreInner<S, A> {
    reducer: Reducer<S, A>,
    state: RefCell<S>,
    is_dispatching: Rc<Cell<bool>>,
    listeners: Rc<ListenerRegistry>,
}

impl<S, A: Action> Store<S, A> {
    /// Create a store from a reducer and an initial state.
    ///
    /// Dispatches the reserved [`Action::seed`] action once through the
    /// full dispatch path, so the reducer's fallthrough arm can establish
    /// derived initial state.
    pub fn new(
        reducer: impl Fn(&S, &A) -> S + 'static,
        initial_state: S,
    ) -> Result<Self, StoreError> {
        let is_dispatching = Rc::new(Cell::new(false));
        let store = Self {
            inner: Rc::new(StoreInner {
                reducer: Box::new(reducer),
                state: RefCell::new(initial_state),
                is_dispatching: Rc::clone(&is_dispatching),
                listeners: ListenerRegistry::new(is_dispatching),
            }),
        };
        store.dispatch(A::seed())?;
        Ok(store)
    }

    /// Get a clone of the current state.
    ///
    /// Fails with [`StoreError::DispatchInProgress`] when called from
    /// inside a reducer, which would observe a half-applied transition.
    pub fn get_state(&self) -> Result<S, StoreError>
    where
        S: Clone,
    {
        self.read(S::clone)
    }

    /// Read the current state without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, StoreError> {
        if self.inner.is_dispatching.get() {
            return Err(StoreError::DispatchInProgress);
        }
        Ok(f(&self.inner.state.borrow()))
    }

    /// Run one transition-and-notify cycle.
    ///
    /// Validates the action, runs the reducer on the current state,
    /// installs the state it returns, then runs one notification round
    /// over the listeners registered when the round starts. Returns the
    /// action unchanged so callers may chain or inspect it.
    ///
    /// A panicking reducer propagates after the reentrancy flag is reset;
    /// the previous state stays current and the store remains usable.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        if action.kind().is_empty() {
            return Err(StoreError::EmptyActionKind);
        }
        if self.inner.is_dispatching.get() {
            return Err(StoreError::DispatchInProgress);
        }

        debug!("dispatching action kind={}", action.kind());
        {
            let _guard = DispatchGuard::acquire(&self.inner.is_dispatching);
            let next_state = {
                let state = self.inner.state.borrow();
                (self.inner.reducer)(&state, &action)
            };
            *self.inner.state.borrow_mut() = next_state;
        }
        self.inner.listeners.notify();
        Ok(action)
    }

    /// Register a listener invoked after every successful dispatch.
    ///
    /// Listeners subscribed during a notification round are first invoked
    /// in the following round. Fails with
    /// [`StoreError::DispatchInProgress`] when called from inside a
    /// reducer.
    pub fn subscribe(
        &self,
        listener: impl Fn() + 'static,
    ) -> Result<Subscription, StoreError> {
        self.inner.listeners.subscribe(Rc::new(listener))
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Marks a dispatch in progress for its lifetime. Dropping resets the
/// flag, so a panicking reducer cannot leave the store wedged.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Create a store from a reducer and an initial state.
///
/// Free-function spelling of [`Store::new`].
pub fn create_store<S, A: Action>(
    reducer: impl Fn(&S, &A) -> S + 'static,
    initial_state: S,
) -> Result<Store<S, A>, StoreError> {
    Store::new(reducer, initial_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::INIT_KIND;

    #[derive(Debug, Clone, PartialEq)]
    enum CounterAction {
        Increment,
        Decrement,
        Init,
        Bogus,
    }

    impl Action for CounterAction {
        fn kind(&self) -> &str {
            match self {
                CounterAction::Increment => "INCREMENT",
                CounterAction::Decrement => "DECREMENT",
                CounterAction::Init => INIT_KIND,
                CounterAction::Bogus => "",
            }
        }

        fn seed() -> Self {
            CounterAction::Init
        }
    }

    fn counter(state: &i32, action: &CounterAction) -> i32 {
        match action {
            CounterAction::Increment => state + 1,
            CounterAction::Decrement => state - 1,
            _ => *state,
        }
    }

    #[test]
    fn dispatch_runs_reducer_and_updates_state() {
        let store = create_store(counter, 0).unwrap();

        store.dispatch(CounterAction::Increment).unwrap();
        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(store.get_state(), Ok(2));

        store.dispatch(CounterAction::Decrement).unwrap();
        assert_eq!(store.get_state(), Ok(1));
    }

    #[test]
    fn dispatch_returns_the_action_unchanged() {
        let store = create_store(counter, 0).unwrap();
        let returned = store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(returned, CounterAction::Increment);
    }

    #[test]
    fn dispatch_rejects_empty_action_kind() {
        let store = create_store(counter, 0).unwrap();
        let err = store.dispatch(CounterAction::Bogus).unwrap_err();
        assert_eq!(err, StoreError::EmptyActionKind);
        assert_eq!(store.get_state(), Ok(0));
    }

    #[test]
    fn create_store_rejects_a_seed_with_empty_kind() {
        #[derive(Debug)]
        struct KindlessAction;

        impl Action for KindlessAction {
            fn kind(&self) -> &str {
                ""
            }

            fn seed() -> Self {
                KindlessAction
            }
        }

        let result = create_store(|state: &i32, _action: &KindlessAction| *state, 0);
        assert_eq!(result.err(), Some(StoreError::EmptyActionKind));
    }

    #[test]
    fn unknown_actions_leave_state_unchanged() {
        let store = create_store(counter, 7).unwrap();
        store.dispatch(CounterAction::Init).unwrap();
        assert_eq!(store.get_state(), Ok(7));
    }

    #[test]
    fn seed_action_reaches_the_reducer() {
        let store = create_store(
            |state: &i32, action: &CounterAction| match action.kind() {
                INIT_KIND => 42,
                _ => *state,
            },
            0,
        )
        .unwrap();
        assert_eq!(store.get_state(), Ok(42));
    }

    #[test]
    fn reducer_cannot_reenter_the_store() {
        let slot: Rc<RefCell<Option<Store<i32, CounterAction>>>> =
            Rc::new(RefCell::new(None));
        let observed = Rc::new(RefCell::new(Vec::new()));

        let store = {
            let slot = Rc::clone(&slot);
            let observed = Rc::clone(&observed);
            create_store(
                move |state: &i32, action: &CounterAction| {
                    if let Some(store) = slot.borrow().as_ref() {
                        observed.borrow_mut().push(store.get_state().unwrap_err());
                        observed
                            .borrow_mut()
                            .push(store.dispatch(action.clone()).unwrap_err());
                        observed
                            .borrow_mut()
                            .push(store.subscribe(|| {}).unwrap_err());
                    }
                    *state
                },
                0,
            )
            .unwrap()
        };
        *slot.borrow_mut() = Some(store.clone());

        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(
            *observed.borrow(),
            vec![
                StoreError::DispatchInProgress,
                StoreError::DispatchInProgress,
                StoreError::DispatchInProgress,
            ]
        );
    }

    #[test]
    fn panicking_reducer_leaves_store_usable() {
        let store = create_store(
            |state: &i32, action: &CounterAction| match action {
                CounterAction::Decrement => panic!("reducer blew up"),
                CounterAction::Increment => state + 1,
                _ => *state,
            },
            0,
        )
        .unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.dispatch(CounterAction::Decrement)
        }));
        assert!(result.is_err());

        // Flag was reset and the old state is still current.
        assert_eq!(store.get_state(), Ok(0));
        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(store.get_state(), Ok(1));
    }

    #[test]
    fn panicking_listener_aborts_the_round_but_not_the_store() {
        let store = create_store(counter, 0).unwrap();
        let later_calls = Rc::new(Cell::new(0));

        let first = store.subscribe(|| panic!("listener blew up")).unwrap();
        let _second = {
            let later_calls = Rc::clone(&later_calls);
            store
                .subscribe(move || later_calls.set(later_calls.get() + 1))
                .unwrap()
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.dispatch(CounterAction::Increment)
        }));
        assert!(result.is_err());

        // The panic unwound the round before the second listener ran, but
        // the transition itself had already been applied.
        assert_eq!(later_calls.get(), 0);
        assert_eq!(store.get_state(), Ok(1));

        // With the panicking listener removed the store works normally.
        first.unsubscribe().unwrap();
        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(later_calls.get(), 1);
        assert_eq!(store.get_state(), Ok(2));
    }

    #[test]
    fn listener_runs_after_state_is_updated() {
        let store = create_store(counter, 0).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let _sub = {
            let seen = Rc::clone(&seen);
            let handle = store.clone();
            store
                .subscribe(move || seen.borrow_mut().push(handle.get_state().unwrap()))
                .unwrap()
        };

        store.dispatch(CounterAction::Increment).unwrap();
        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn listener_may_dispatch_a_follow_up_action() {
        let store = create_store(counter, 0).unwrap();

        let _sub = {
            let handle = store.clone();
            store
                .subscribe(move || {
                    // Settle at 3 without re-triggering forever.
                    if handle.get_state().unwrap() < 3 {
                        handle.dispatch(CounterAction::Increment).unwrap();
                    }
                })
                .unwrap()
        };

        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(store.get_state(), Ok(3));
    }

    #[test]
    fn failed_dispatch_does_not_notify() {
        let store = create_store(counter, 0).unwrap();
        let calls = Rc::new(Cell::new(0));

        let _sub = {
            let calls = Rc::clone(&calls);
            store.subscribe(move || calls.set(calls.get() + 1)).unwrap()
        };

        let _ = store.dispatch(CounterAction::Bogus);
        assert_eq!(calls.get(), 0);

        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(calls.get(), 1);
    }
}
