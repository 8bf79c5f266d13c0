//! The store: single owner of application state.
//!
//! Stores hold the current state and a reducer, apply dispatched actions
//! through it and notify subscribers after every transition.

mod store;
mod subscription;

pub use store::{Store, StoreBuilder};
pub use subscription::Subscription;
