use crate::error::ReducerError;
use std::sync::Arc;

/// A pure function `(state, action) -> state`.
///
/// `state` is `None` when the reducer is asked for its initial value.
/// Returning the same `Arc` that was passed in signals "unchanged"; stores
/// keep that reference as is. Reducers must not mutate shared state and must
/// not call back into the store that runs them.
///
/// Any `Fn(Option<Arc<S>>, &A) -> Result<Arc<S>, ReducerError>` is a reducer.
///
/// # Examples
///
/// ```
/// use oneway::{Reducer, ReducerError};
/// use std::sync::Arc;
///
/// fn counter(state: Option<Arc<i64>>, delta: &i64) -> Result<Arc<i64>, ReducerError> {
///     let current = state.map_or(0, |s| *s);
///     Ok(Arc::new(current + delta))
/// }
///
/// let next = counter.reduce(Some(Arc::new(1)), &2).unwrap();
/// assert_eq!(*next, 3);
/// ```
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: Option<Arc<S>>, action: &A) -> Result<Arc<S>, ReducerError>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(Option<Arc<S>>, &A) -> Result<Arc<S>, ReducerError> + Send + Sync,
{
    fn reduce(&self, state: Option<Arc<S>>, action: &A) -> Result<Arc<S>, ReducerError> {
        self(state, action)
    }
}

/// Copy-on-write update: clone `state`, apply `recipe` to the copy and
/// return it as a fresh `Arc`.
///
/// The result never aliases `state`, so reducers can be written in
/// mutate-then-return style without touching the value a store still holds.
///
/// ```
/// use oneway::produce;
/// use std::sync::Arc;
///
/// let before = Arc::new(vec![1, 2]);
/// let after = produce(&before, |items| items.push(3));
///
/// assert_eq!(*before, vec![1, 2]);
/// assert_eq!(*after, vec![1, 2, 3]);
/// ```
pub fn produce<S, F>(state: &Arc<S>, recipe: F) -> Arc<S>
where
    S: Clone,
    F: FnOnce(&mut S),
{
    let mut draft = S::clone(state);
    recipe(&mut draft);
    Arc::new(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(state: Option<Arc<bool>>, _action: &()) -> Result<Arc<bool>, ReducerError> {
        Ok(Arc::new(!state.is_some_and(|s| *s)))
    }

    #[test]
    fn functions_are_reducers() {
        let on = toggle.reduce(None, &()).unwrap();
        assert!(*on);
        let off = toggle.reduce(Some(on), &()).unwrap();
        assert!(!*off);
    }

    #[test]
    fn produce_never_aliases() {
        let state = Arc::new(String::from("a"));
        let unchanged = produce(&state, |_| {});
        assert_eq!(unchanged, state);
        assert!(!Arc::ptr_eq(&unchanged, &state));
    }
}
