//! Middleware: interceptors that see every action before the reducer.
//!
//! Middleware runs in registration order. Each one may let the action
//! continue or consume it; a consumed action is neither reduced nor
//! announced to subscribers.

mod logging;

pub use logging::LoggingMiddleware;

/// Intercepts actions before they reach the reducer.
pub trait Middleware<S, A>: Send + Sync {
    /// Handle an action.
    ///
    /// - `action`: the action being dispatched
    /// - `state`: the state the reducer will receive
    ///
    /// Returns `true` to continue the chain, `false` to consume the action.
    fn handle(&self, action: &A, state: &S) -> bool;
}

impl<S, A, F> Middleware<S, A> for F
where
    F: Fn(&A, &S) -> bool + Send + Sync,
{
    fn handle(&self, action: &A, state: &S) -> bool {
        self(action, state)
    }
}
