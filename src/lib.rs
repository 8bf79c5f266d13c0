//! # Oneway
//!
//! Unidirectional state management for Rust.
//!
//! State lives in a single [`Store`] and changes only by dispatching
//! actions through a reducer:
//!
//! ## Core
//!
//! - `Store<S, A>` - owns the state, runs the reducer, notifies subscribers
//! - `Reducer<S, A>` - pure `(state, action) -> state` function
//! - `Action` - tagged instruction describing a state change
//!
//! ## Building reducers
//!
//! - [`combine`] - one reducer over keyed slices, each with its own reducer
//! - [`create_reducer`] - case-by-case reducers with copy-on-write drafts
//! - [`create_action`] - factories for string-tagged [`RawAction`]s
//!
//! ## Plumbing
//!
//! - [`Middleware`] - intercept actions before the reducer sees them
//! - [`StoreConfig`] - store name, action logging and queue limits
//!
//! Logging goes through the [`log`] facade; install any logger to see it.

pub mod action;
pub mod config;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod store;

// Re-export main types for convenience
pub use action::{create_action, Action, ActionCreator, InitAction, RawAction, INIT_ACTION_TYPE};
pub use config::StoreConfig;
pub use error::{ReducerError, StoreError};
pub use middleware::{LoggingMiddleware, Middleware};
pub use reducer::{
    combine, create_reducer, produce, CaseReducer, CombineReducers, CombinedState, Reducer,
    ReducerBuilder,
};
pub use store::{Store, StoreBuilder, Subscription};
