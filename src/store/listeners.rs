use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::trace;

use crate::error::StoreError;

pub(crate) type Callback = Rc<dyn Fn()>;

#[derive(Clone)]
struct ListenerEntry {
    id: usize,
    callback: Callback,
}

/// Registry of listeners notified after each successful dispatch.
///
/// Two lists back the registry: `current` is whatever list the in-flight
/// (or most recently completed) notification round uses, `next` is the
/// list that subscribe/unsubscribe mutate. They alias the same `Rc` until
/// a mutation arrives after a round has started, at which point the
/// mutation copies `next` first, so the round in progress never sees it.
pub(crate) struct ListenerRegistry {
    // Handed to subscriptions so a handle outliving the store degrades
    // to a no-op instead of keeping the registry alive.
    weak_self: Weak<ListenerRegistry>,
    is_dispatching: Rc<Cell<bool>>,
    current: RefCell<Rc<Vec<ListenerEntry>>>,
    next: RefCell<Rc<Vec<ListenerEntry>>>,
    next_id: Cell<usize>,
}

impl ListenerRegistry {
    pub(crate) fn new(is_dispatching: Rc<Cell<bool>>) -> Rc<Self> {
        let listeners: Rc<Vec<ListenerEntry>> = Rc::new(Vec::new());
        Rc::new_cyclic(|weak| Self {
            weak_self: weak.clone(),
            is_dispatching,
            current: RefCell::new(Rc::clone(&listeners)),
            next: RefCell::new(listeners),
            next_id: Cell::new(0),
        })
    }

    /// Register a listener for all future notification rounds.
    ///
    /// Each call creates an independent subscription, even for the same
    /// callback: removal goes by subscription id, not callback identity.
    pub(crate) fn subscribe(&self, callback: Callback) -> Result<Subscription, StoreError> {
        if self.is_dispatching.get() {
            return Err(StoreError::DispatchInProgress);
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.with_next_mut(|next| next.push(ListenerEntry { id, callback }));
        trace!("subscribed listener id={}", id);

        Ok(Subscription {
            registry: self.weak_self.clone(),
            id,
            active: Cell::new(true),
        })
    }

    fn remove(&self, id: usize) {
        self.with_next_mut(|next| {
            if let Some(pos) = next.iter().position(|entry| entry.id == id) {
                next.remove(pos);
            }
        });
    }

    /// Mutate `next`, separating it first from any list still shared with
    /// `current` or an in-flight round. `Rc::make_mut` clones exactly when
    /// the list is shared, which is the copy-on-write step.
    fn with_next_mut(&self, f: impl FnOnce(&mut Vec<ListenerEntry>)) {
        let mut next = self.next.borrow_mut();
        f(Rc::make_mut(&mut next));
    }

    /// Run one notification round.
    ///
    /// Promotes `next` to `current` and invokes every listener captured at
    /// that instant, in subscription order. The round iterates its own `Rc`
    /// handle on the promoted list, so listeners that subscribe or
    /// unsubscribe mid-round only reshape `next` and take effect from the
    /// following round; the set invoked here is exactly the set present
    /// when the round started.
    pub(crate) fn notify(&self) {
        let round = {
            let next = self.next.borrow();
            *self.current.borrow_mut() = Rc::clone(&next);
            Rc::clone(&next)
        };
        trace!("notification round with {} listener(s)", round.len());
        for entry in round.iter() {
            (entry.callback)();
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.next.borrow().len()
    }
}

/// Handle to one registered listener.
///
/// Returned by [`Store::subscribe`](crate::Store::subscribe). Dropping the
/// handle does NOT unsubscribe; the subscription stays active until
/// [`unsubscribe`](Subscription::unsubscribe) is called or the store is
/// dropped.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<ListenerRegistry>,
    id: usize,
    active: Cell<bool>,
}

impl Subscription {
    /// Remove this listener from the registry.
    ///
    /// Idempotent: calling it on an already-inactive subscription is an
    /// `Ok` no-op. Fails with [`StoreError::DispatchInProgress`] when
    /// called from inside a reducer.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        if !self.active.get() {
            return Ok(());
        }
        let Some(registry) = self.registry.upgrade() else {
            // Store is gone; nothing left to remove from.
            self.active.set(false);
            return Ok(());
        };
        if registry.is_dispatching.get() {
            return Err(StoreError::DispatchInProgress);
        }

        self.active.set(false);
        registry.remove(self.id);
        trace!("unsubscribed listener id={}", self.id);
        Ok(())
    }

    /// Whether this subscription is still registered.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}
