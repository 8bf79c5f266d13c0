//! Toolkit-style setup: action creators, case-built reducers, combined slices

use oneway::{
    combine, create_action, create_reducer, CaseReducer, LoggingMiddleware, RawAction, Store,
    StoreConfig,
};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
struct CounterState {
    count: i64,
}

#[derive(Clone, Debug, PartialEq)]
struct AuthState {
    authenticated: bool,
}

fn main() -> Result<(), oneway::StoreError> {
    env_logger::init();

    println!("=== Toolkit Example ===\n");

    let increment_counter = create_action::<i64>("INCREMENT");
    let decrement_counter = create_action::<i64>("DECREMENT");
    let increment_with_amount = create_action::<i64>("INCREMENT_WITH");
    let decrement_with_amount = create_action::<i64>("DECREMENT_WITH");
    let login_action = create_action::<i64>("LOGIN");
    let logout_action = create_action::<i64>("LOGOUT");

    let counter: CaseReducer<CounterState, RawAction<i64>> =
        create_reducer::<CounterState, RawAction<i64>, _>(CounterState { count: 0 }, |builder| {
            builder
                .add_case("INCREMENT", |state, _| state.count += 1)
                .add_case("DECREMENT", |state, _| state.count -= 1)
                .add_case("INCREMENT_WITH", |state, action| {
                    state.count += action.payload().copied().unwrap_or_default();
                })
                .add_case("DECREMENT_WITH", |state, action| {
                    state.count -= action.payload().copied().unwrap_or_default();
                })
                .add_default_case(|_, _| {});
        });

    let auth: CaseReducer<AuthState, RawAction<i64>> = create_reducer(
        AuthState {
            authenticated: false,
        },
        |builder| {
            builder
                .add_case_with("LOGIN", |_, _| {
                    Arc::new(AuthState {
                        authenticated: true,
                    })
                })
                .add_case_with("LOGOUT", |_, _| {
                    Arc::new(AuthState {
                        authenticated: false,
                    })
                })
                .add_default_case(|state, _| state.authenticated = false);
        },
    );

    let store = Store::builder()
        .reducer(combine().slice("counter", counter).slice("auth", auth))
        .middleware(LoggingMiddleware::labeled("toolkit"))
        .config(StoreConfig::new("toolkit").with_log_actions(true))
        .build_with_init()?;

    store.subscribe({
        let store = store.clone();
        move || {
            let state = store.get_state();
            let count = state.get::<CounterState>("counter").map(|c| c.count);
            let authenticated = state.get::<AuthState>("auth").map(|a| a.authenticated);
            println!(
                "   [State] count: {:?}, authenticated: {:?}",
                count.unwrap_or_default(),
                authenticated.unwrap_or_default()
            );
        }
    });

    println!("1. Counting");
    store.dispatch(increment_counter.create())?; // count: 1
    store.dispatch(increment_counter.create())?; // count: 2
    store.dispatch(increment_counter.create())?; // count: 3
    store.dispatch(increment_counter.create())?; // count: 4
    store.dispatch(decrement_counter.create())?; // count: 3
    store.dispatch(increment_with_amount.with(3))?; // count: 6
    store.dispatch(decrement_with_amount.with(5))?; // count: 1

    println!("\n2. Signing in and out");
    store.dispatch(login_action.create())?; // authenticated: true
    store.dispatch(logout_action.create())?; // authenticated: false

    println!("\n✓ Example complete!");
    Ok(())
}
