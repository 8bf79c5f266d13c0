use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Type of the action a store dispatches to derive its initial state.
pub const INIT_ACTION_TYPE: &str = "@@oneway/INIT";

/// An action that can be dispatched to a store.
///
/// The action type identifies which reducer branch handles the action. An
/// empty type is treated as a missing one and rejected by
/// [`Store::dispatch`](crate::Store::dispatch).
///
/// # Examples
///
/// ```
/// use oneway::Action;
///
/// #[derive(Clone, Debug)]
/// enum CounterAction {
///     Increment,
///     IncrementWith(i64),
/// }
///
/// impl Action for CounterAction {
///     fn action_type(&self) -> &str {
///         match self {
///             CounterAction::Increment => "INCREMENT",
///             CounterAction::IncrementWith(_) => "INCREMENT_WITH",
///         }
///     }
/// }
///
/// assert_eq!(CounterAction::IncrementWith(5).action_type(), "INCREMENT_WITH");
/// ```
pub trait Action: fmt::Debug {
    fn action_type(&self) -> &str;
}

/// Actions able to represent the store's initialization sentinel.
///
/// Stores created without an explicit initial state dispatch
/// `InitAction::init()` to a reducer that receives no state, and keep what
/// it returns.
pub trait InitAction: Action {
    fn init() -> Self;
}

/// A string-tagged action with an optional payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAction<P = ()> {
    action_type: Cow<'static, str>,
    payload: Option<P>,
}

impl<P> RawAction<P> {
    /// Create an action without a payload.
    pub fn new(action_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: None,
        }
    }

    /// Create an action carrying `payload`.
    pub fn with_payload(action_type: impl Into<Cow<'static, str>>, payload: P) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Some(payload),
        }
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<P> {
        self.payload
    }
}

impl<P: fmt::Debug> Action for RawAction<P> {
    fn action_type(&self) -> &str {
        &self.action_type
    }
}

impl<P: fmt::Debug> InitAction for RawAction<P> {
    fn init() -> Self {
        RawAction::new(INIT_ACTION_TYPE)
    }
}

/// Factory for [`RawAction`]s of one type.
///
/// # Examples
///
/// ```
/// use oneway::{create_action, Action};
///
/// let increment_with = create_action::<i64>("INCREMENT_WITH");
/// let action = increment_with.with(3);
///
/// assert_eq!(action.action_type(), "INCREMENT_WITH");
/// assert_eq!(action.payload(), Some(&3));
/// assert!(increment_with.matches(&action));
/// ```
pub struct ActionCreator<P = ()> {
    action_type: Cow<'static, str>,
    _payload: PhantomData<fn(P)>,
}

impl<P> ActionCreator<P> {
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Create an action without a payload.
    pub fn create(&self) -> RawAction<P> {
        RawAction::new(self.action_type.clone())
    }

    /// Create an action carrying `payload`.
    pub fn with(&self, payload: P) -> RawAction<P> {
        RawAction::with_payload(self.action_type.clone(), payload)
    }

    /// Whether `action` was created by a creator of this type.
    pub fn matches<A: Action + ?Sized>(&self, action: &A) -> bool {
        action.action_type() == self.action_type
    }
}

impl<P> Clone for ActionCreator<P> {
    fn clone(&self) -> Self {
        Self {
            action_type: self.action_type.clone(),
            _payload: PhantomData,
        }
    }
}

impl<P> fmt::Debug for ActionCreator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("action_type", &self.action_type)
            .finish()
    }
}

/// Create an [`ActionCreator`] for `action_type`.
pub fn create_action<P>(action_type: impl Into<Cow<'static, str>>) -> ActionCreator<P> {
    ActionCreator {
        action_type: action_type.into(),
        _payload: PhantomData,
    }
}
