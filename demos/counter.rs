//! Demonstration of a counter managed through dispatch and subscription

use switchboard::{create_store, Action, INIT_KIND};

enum CounterAction {
    Increment,
    Decrement,
    Init,
}

impl Action for CounterAction {
    fn kind(&self) -> &str {
        match self {
            CounterAction::Increment => "INCREMENT",
            CounterAction::Decrement => "DECREMENT",
            CounterAction::Init => INIT_KIND,
        }
    }

    fn seed() -> Self {
        CounterAction::Init
    }
}

fn main() {
    println!("=== Counter Example ===\n");

    let store = create_store(
        |state: &i32, action: &CounterAction| match action {
            CounterAction::Increment => state + 1,
            CounterAction::Decrement => state - 1,
            CounterAction::Init => *state,
        },
        0,
    )
    .expect("store creation");

    println!("1. Setting up subscriber");
    let subscription = {
        let store = store.clone();
        store
            .clone()
            .subscribe(move || {
                println!("   [Store Update] count = {}", store.get_state().unwrap());
            })
            .expect("subscribe")
    };

    println!("\n2. Dispatching actions");
    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Decrement).unwrap();

    println!("\n3. Final count: {}", store.get_state().unwrap());

    println!("\n4. Unsubscribing; further dispatches are silent");
    subscription.unsubscribe().unwrap();
    store.dispatch(CounterAction::Increment).unwrap();
    println!("   count = {}", store.get_state().unwrap());

    println!("\n✓ Example complete!");
}
