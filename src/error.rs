//! Error types for stores and reducers.

use std::error::Error as StdError;
use thiserror::Error;

/// Errors surfaced by [`Store`](crate::Store) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be constructed.
    #[error("cannot construct store: {reason}")]
    Construction { reason: String },

    /// The dispatched action carries no type.
    #[error("action has no type")]
    InvalidAction,

    /// `dispatch` was called while a reducer of the same store was running.
    #[error("dispatch of `{action_type}` while a reducer is running")]
    ReentrantDispatch { action_type: String },

    /// The reducer failed; the previous state was kept.
    #[error("reducer failed on `{action_type}`")]
    ReducerExecution {
        action_type: String,
        #[source]
        source: ReducerError,
    },

    /// The dispatched action was applied and its subscribers notified, but
    /// an action queued behind it failed; the rest of the queue was dropped.
    #[error("`{applied}` was applied but a queued dispatch failed")]
    QueuedDispatch {
        applied: String,
        #[source]
        source: Box<StoreError>,
    },

    /// Too many actions were queued during one dispatch.
    #[error("more than {limit} dispatches queued")]
    QueueOverflow { limit: usize },
}

impl StoreError {
    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        StoreError::Construction {
            reason: reason.into(),
        }
    }
}

/// Failure raised inside a reducer.
#[derive(Debug, Error)]
pub enum ReducerError {
    #[error("{0}")]
    Message(String),

    #[error("reducer panicked: {0}")]
    Panicked(String),

    /// A slice reducer of a combined reducer failed.
    #[error("slice `{key}` failed")]
    Slice {
        key: String,
        #[source]
        source: Box<ReducerError>,
    },

    /// A combined state held a slice of an unexpected type.
    #[error("slice `{key}` has an unexpected type")]
    SliceType { key: String },

    #[error("{0}")]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl ReducerError {
    /// Build a reducer error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        ReducerError::Message(message.into())
    }

    /// Wrap any error type.
    pub fn other<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ReducerError::Other(Box::new(err))
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ReducerError::Panicked(message)
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
