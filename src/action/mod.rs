//! Actions: tagged instructions describing an intended state change.
//!
//! Typed enums implementing [`Action`] are the usual representation. For
//! string-tagged actions with an optional payload, use [`RawAction`] and
//! build them through an [`ActionCreator`].

mod action;

pub use action::{create_action, Action, ActionCreator, InitAction, RawAction, INIT_ACTION_TYPE};
