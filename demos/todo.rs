//! Demonstration of managing a todo list through reducers

use switchboard::{create_store, Action, INIT_KIND};

#[derive(Clone)]
enum TodoAction {
    Add(String),
    Complete(usize),
    Init,
}

impl Action for TodoAction {
    fn kind(&self) -> &str {
        match self {
            TodoAction::Add(_) => "ADD",
            TodoAction::Complete(_) => "COMPLETE",
            TodoAction::Init => INIT_KIND,
        }
    }

    fn seed() -> Self {
        TodoAction::Init
    }
}

#[derive(Clone, Default)]
struct TodoState {
    todos: Vec<(String, bool)>,
}

impl TodoState {
    fn stats(&self) -> (usize, usize) {
        let done = self.todos.iter().filter(|(_, completed)| *completed).count();
        (self.todos.len(), done)
    }
}

fn reduce(state: &TodoState, action: &TodoAction) -> TodoState {
    let mut next = state.clone();
    match action {
        TodoAction::Add(title) => next.todos.push((title.clone(), false)),
        TodoAction::Complete(index) => {
            if let Some(todo) = next.todos.get_mut(*index) {
                todo.1 = true;
            }
        }
        TodoAction::Init => {}
    }
    next
}

fn main() {
    println!("=== Todo Example ===\n");

    let store = create_store(reduce, TodoState::default()).expect("store creation");

    println!("1. Setting up subscriber");
    let _subscription = {
        let store = store.clone();
        store
            .clone()
            .subscribe(move || {
                let (total, done) = store.read(|s| s.stats()).unwrap();
                println!("   [Store Update] Total: {}, Done: {}", total, done);
            })
            .expect("subscribe")
    };

    println!("\n2. Adding todos");
    store.dispatch(TodoAction::Add("Learn Rust".to_string())).unwrap();
    store
        .dispatch(TodoAction::Add("Build a state container".to_string()))
        .unwrap();
    store
        .dispatch(TodoAction::Add("Write documentation".to_string()))
        .unwrap();

    println!("\n3. Completing the first todo");
    store.dispatch(TodoAction::Complete(0)).unwrap();

    println!("\n4. Current todos:");
    store
        .read(|state| {
            for (title, completed) in &state.todos {
                let mark = if *completed { "✓" } else { " " };
                println!("   [{}] {}", mark, title);
            }
        })
        .unwrap();

    println!("\n✓ Example complete!");
}
