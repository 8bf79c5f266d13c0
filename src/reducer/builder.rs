use super::{produce, Reducer};
use crate::action::Action;
use crate::error::ReducerError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type DraftHandler<S, A> = Box<dyn Fn(&mut S, &A) + Send + Sync>;
type ReplaceHandler<S, A> = Box<dyn Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync>;

enum CaseHandler<S, A> {
    /// Edits a draft copy of the state.
    Draft(DraftHandler<S, A>),
    /// Returns the next state itself.
    Replace(ReplaceHandler<S, A>),
}

impl<S: Clone + PartialEq, A> CaseHandler<S, A> {
    fn run(&self, state: Arc<S>, action: &A) -> Arc<S> {
        match self {
            CaseHandler::Draft(handler) => {
                let next = produce(&state, |draft| handler(draft, action));
                // An untouched draft hands back the state it was copied from.
                if *next == *state {
                    state
                } else {
                    next
                }
            }
            CaseHandler::Replace(handler) => handler(&state, action),
        }
    }
}

/// Collects the cases of a [`CaseReducer`]. Obtained through
/// [`create_reducer`].
///
/// Cases come in two forms: [`add_case`](Self::add_case) edits a draft copy
/// of the state, [`add_case_with`](Self::add_case_with) returns the next
/// state outright. Both can be mixed in one reducer.
pub struct ReducerBuilder<S, A> {
    cases: HashMap<String, CaseHandler<S, A>>,
    default_case: Option<CaseHandler<S, A>>,
}

impl<S, A> ReducerBuilder<S, A> {
    fn new() -> Self {
        Self {
            cases: HashMap::new(),
            default_case: None,
        }
    }

    fn insert(&mut self, action_type: String, handler: CaseHandler<S, A>) -> &mut Self {
        assert!(
            !self.cases.contains_key(&action_type),
            "reducer already has a case for `{action_type}`"
        );
        self.cases.insert(action_type, handler);
        self
    }

    /// Handle actions of `action_type` with `handler`.
    ///
    /// The handler edits a private copy of the state. If the copy ends up
    /// equal to the state it came from, the previous state is kept.
    ///
    /// # Panics
    ///
    /// Panics if a case for `action_type` was already added.
    pub fn add_case<F>(&mut self, action_type: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut S, &A) + Send + Sync + 'static,
    {
        self.insert(action_type.into(), CaseHandler::Draft(Box::new(handler)))
    }

    /// Handle actions of `action_type` with a handler returning the next
    /// state. Returning the `Arc` it was given leaves the state unchanged.
    ///
    /// # Panics
    ///
    /// Panics if a case for `action_type` was already added.
    pub fn add_case_with<F>(&mut self, action_type: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
    {
        self.insert(action_type.into(), CaseHandler::Replace(Box::new(handler)))
    }

    /// Handle every action no case matches.
    ///
    /// Without a default case unmatched actions leave the state untouched.
    pub fn add_default_case<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut S, &A) + Send + Sync + 'static,
    {
        self.default_case = Some(CaseHandler::Draft(Box::new(handler)));
        self
    }

    /// Like [`add_default_case`](Self::add_default_case), with a handler
    /// returning the next state.
    pub fn add_default_case_with<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
    {
        self.default_case = Some(CaseHandler::Replace(Box::new(handler)));
        self
    }
}

/// Reducer dispatching on the action type to the cases registered with
/// [`create_reducer`].
pub struct CaseReducer<S, A> {
    initial: Arc<S>,
    cases: HashMap<String, CaseHandler<S, A>>,
    default_case: Option<CaseHandler<S, A>>,
}

impl<S, A> CaseReducer<S, A> {
    /// The state handed out when the reducer receives none.
    pub fn initial_state(&self) -> Arc<S> {
        Arc::clone(&self.initial)
    }
}

impl<S, A> fmt::Debug for CaseReducer<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cases: Vec<_> = self.cases.keys().collect();
        cases.sort();
        f.debug_struct("CaseReducer")
            .field("cases", &cases)
            .field("default_case", &self.default_case.is_some())
            .finish()
    }
}

impl<S, A> Reducer<S, A> for CaseReducer<S, A>
where
    S: Clone + PartialEq + Send + Sync,
    A: Action,
{
    fn reduce(&self, state: Option<Arc<S>>, action: &A) -> Result<Arc<S>, ReducerError> {
        let state = state.unwrap_or_else(|| Arc::clone(&self.initial));
        let handler = self
            .cases
            .get(action.action_type())
            .or(self.default_case.as_ref());

        match handler {
            Some(handler) => Ok(handler.run(state, action)),
            None => Ok(state),
        }
    }
}

/// Build a reducer case by case.
///
/// `initial` seeds the state when the reducer is called without one. Cases
/// added with [`ReducerBuilder::add_case`] are written against a mutable
/// draft that is a fresh copy of the current state, so the reducer never
/// edits a value a store still holds.
///
/// # Examples
///
/// ```
/// use oneway::{create_action, create_reducer, CaseReducer, RawAction, Reducer};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i64,
/// }
///
/// let increment = create_action::<i64>("INCREMENT");
/// let increment_with = create_action::<i64>("INCREMENT_WITH");
///
/// let reducer: CaseReducer<Counter, RawAction<i64>> = create_reducer::<Counter, RawAction<i64>, _>(Counter { count: 0 }, |builder| {
///     builder
///         .add_case("INCREMENT", |state, _| state.count += 1)
///         .add_case("INCREMENT_WITH", |state, action| {
///             state.count += action.payload().copied().unwrap_or_default();
///         });
/// });
///
/// let state = reducer.reduce(None, &increment.create()).unwrap();
/// let state = reducer.reduce(Some(state), &increment_with.with(3)).unwrap();
/// assert_eq!(state.count, 4);
/// ```
pub fn create_reducer<S, A, F>(initial: S, build: F) -> CaseReducer<S, A>
where
    F: FnOnce(&mut ReducerBuilder<S, A>),
{
    let mut builder = ReducerBuilder::new();
    build(&mut builder);
    CaseReducer {
        initial: Arc::new(initial),
        cases: builder.cases,
        default_case: builder.default_case,
    }
}
