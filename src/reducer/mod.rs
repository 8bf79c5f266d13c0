//! Reducers: pure functions computing the next state from the current one.
//!
//! Besides the [`Reducer`] trait this module provides two ways of building
//! reducers:
//! - [`combine`] - one reducer over a keyed state, built from slice reducers
//! - [`create_reducer`] - case-by-case reducers written in mutate-then-return
//!   style, backed by copy-on-write

mod builder;
mod combine;
mod reducer;

pub use builder::{create_reducer, CaseReducer, ReducerBuilder};
pub use combine::{combine, CombineReducers, CombinedState};
pub use reducer::{produce, Reducer};
