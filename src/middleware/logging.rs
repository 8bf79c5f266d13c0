use super::Middleware;
use std::fmt::Debug;

/// Logs every action, and the state it is applied to, at debug level.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    label: Option<String>,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix log lines with `label`.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

impl<S: Debug, A: Debug> Middleware<S, A> for LoggingMiddleware {
    fn handle(&self, action: &A, state: &S) -> bool {
        match &self.label {
            Some(label) => log::debug!("[{}] action: {:?}, state: {:?}", label, action, state),
            None => log::debug!("action: {:?}, state: {:?}", action, state),
        }
        true
    }
}
