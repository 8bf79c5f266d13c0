//! Plain counter: a hand-written reducer, typed actions and one subscriber

use oneway::{Action, InitAction, ReducerError, Store, INIT_ACTION_TYPE};
use std::sync::Arc;

#[derive(Clone, Debug)]
enum CounterAction {
    Init,
    Increment,
    Decrement,
    IncrementWith(i64),
}

impl Action for CounterAction {
    fn action_type(&self) -> &str {
        match self {
            CounterAction::Init => INIT_ACTION_TYPE,
            CounterAction::Increment => "INCREMENT",
            CounterAction::Decrement => "DECREMENT",
            CounterAction::IncrementWith(_) => "INCREMENT_WITH",
        }
    }
}

impl InitAction for CounterAction {
    fn init() -> Self {
        CounterAction::Init
    }
}

fn counter(state: Option<Arc<i64>>, action: &CounterAction) -> Result<Arc<i64>, ReducerError> {
    let state = state.unwrap_or_else(|| Arc::new(0));
    match action {
        CounterAction::Increment => Ok(Arc::new(*state + 1)),
        CounterAction::Decrement => Ok(Arc::new(*state - 1)),
        CounterAction::IncrementWith(n) => Ok(Arc::new(*state + n)),
        CounterAction::Init => Ok(state),
    }
}

fn main() -> Result<(), oneway::StoreError> {
    env_logger::init();

    println!("=== Counter Example ===\n");

    let store = Store::create(counter)?;

    // Subscribers get no arguments; they read the state through the store
    store.subscribe({
        let store = store.clone();
        move || println!("   [State] {}", store.get_state())
    });

    store.dispatch(CounterAction::Increment)?; // 1
    store.dispatch(CounterAction::Increment)?; // 2
    store.dispatch(CounterAction::Decrement)?; // 1
    store.dispatch(CounterAction::IncrementWith(5))?; // 6

    println!("\nFinal count: {}", store.get_state());
    Ok(())
}
