use super::subscription::{SubscriberList, Subscription};
use crate::action::{Action, InitAction};
use crate::config::StoreConfig;
use crate::error::{ReducerError, Result, StoreError};
use crate::middleware::Middleware;
use crate::reducer::Reducer;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type SharedReducer<S, A> = Arc<dyn Reducer<S, A>>;
type BoxedMiddleware<S, A> = Box<dyn Middleware<S, A>>;

/// A store owning one state value and the reducer that advances it.
///
/// State only changes through [`Store::dispatch`]: the reducer computes the
/// next state from the current one and the action, the store swaps it in and
/// then calls every subscriber in registration order.
///
/// `Store` is a handle; clones share the same state, so subscribers can keep
/// one to read the state or dispatch follow-up actions. Dispatch is
/// synchronous and must not race with another dispatch on a different thread.
///
/// # Examples
///
/// ```
/// use oneway::{Action, ReducerError, Store};
/// use std::sync::Arc;
///
/// #[derive(Clone, Debug)]
/// enum CounterAction {
///     Increment,
///     Decrement,
/// }
///
/// impl Action for CounterAction {
///     fn action_type(&self) -> &str {
///         match self {
///             CounterAction::Increment => "INCREMENT",
///             CounterAction::Decrement => "DECREMENT",
///         }
///     }
/// }
///
/// fn counter(state: Option<Arc<i64>>, action: &CounterAction) -> Result<Arc<i64>, ReducerError> {
///     let count = state.map_or(0, |s| *s);
///     Ok(Arc::new(match action {
///         CounterAction::Increment => count + 1,
///         CounterAction::Decrement => count - 1,
///     }))
/// }
///
/// let store = Store::new(counter, 0_i64);
/// store.dispatch(CounterAction::Increment).unwrap();
/// store.dispatch(CounterAction::Increment).unwrap();
/// store.dispatch(CounterAction::Decrement).unwrap();
/// assert_eq!(*store.get_state(), 1);
/// ```
pub struct Store<S, A> {
    inner: Arc<StoreInner<S, A>>,
}

struct StoreInner<S, A> {
    config: StoreConfig,
    state: RwLock<Arc<S>>,
    reducer: RwLock<SharedReducer<S, A>>,
    middleware: Vec<BoxedMiddleware<S, A>>,
    subscribers: Arc<Mutex<SubscriberList>>,
    // Set while the reducer runs.
    reducing: AtomicBool,
    // Set while a top-level dispatch, including its notification passes, runs.
    dispatching: AtomicBool,
    queue: Mutex<VecDeque<A>>,
}

impl<S, A> Store<S, A>
where
    S: 'static,
    A: Action + Clone + 'static,
{
    /// Create a store with a reducer and an initial state.
    pub fn new<R>(reducer: R, initial: impl Into<Arc<S>>) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self::from_parts(
            Arc::new(reducer),
            initial.into(),
            Vec::new(),
            StoreConfig::default(),
        )
    }

    /// Create a store whose initial state comes from the reducer.
    ///
    /// The reducer is called once with no state and
    /// [`InitAction::init`]; what it returns becomes the initial state.
    pub fn create<R>(reducer: R) -> Result<Self>
    where
        R: Reducer<S, A> + 'static,
        A: InitAction,
    {
        Self::builder().reducer(reducer).build_with_init()
    }

    pub fn builder() -> StoreBuilder<S, A> {
        StoreBuilder::new()
    }

    fn from_parts(
        reducer: SharedReducer<S, A>,
        initial: Arc<S>,
        middleware: Vec<BoxedMiddleware<S, A>>,
        config: StoreConfig,
    ) -> Self {
        log::debug!(
            "[{}] store created with {} middleware",
            config.name,
            middleware.len()
        );
        Self {
            inner: Arc::new(StoreInner {
                config,
                state: RwLock::new(initial),
                reducer: RwLock::new(reducer),
                middleware,
                subscribers: Arc::new(Mutex::new(SubscriberList::default())),
                reducing: AtomicBool::new(false),
                dispatching: AtomicBool::new(false),
                queue: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// The current state.
    ///
    /// Returns the same `Arc` until a dispatch stores a different one.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&read(&self.inner.state))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Dispatch an action and return it.
    ///
    /// Runs the middleware chain, then the reducer exactly once, stores the
    /// result and calls every subscriber registered when notification begins.
    /// If the reducer fails or panics the state is left as it was and no
    /// subscriber runs.
    ///
    /// Called from a subscriber or middleware, the action is queued and
    /// reduced once the current notification pass is over; the call returns
    /// right away. Whenever the outermost `dispatch` returns, by error or by
    /// unwinding out of a subscriber, whatever is still queued is discarded.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidAction`] if the action type is empty
    /// - [`StoreError::ReentrantDispatch`] if called from inside a reducer
    /// - [`StoreError::ReducerExecution`] if the reducer fails
    /// - [`StoreError::QueuedDispatch`] if this action was applied but an
    ///   action queued behind it failed
    /// - [`StoreError::QueueOverflow`] if too many actions are queued
    pub fn dispatch(&self, action: A) -> Result<A> {
        if action.action_type().is_empty() {
            return Err(StoreError::InvalidAction);
        }
        if self.inner.reducing.load(Ordering::SeqCst) {
            return Err(StoreError::ReentrantDispatch {
                action_type: action.action_type().to_string(),
            });
        }

        let Some(_dispatching) = FlagGuard::raise(&self.inner.dispatching) else {
            return self.enqueue(action);
        };

        let _queue = QueueReset::new(&self.inner);
        self.apply(&action)?;
        self.drain_queue()
            .map_err(|source| StoreError::QueuedDispatch {
                applied: action.action_type().to_string(),
                source: Box::new(source),
            })?;
        Ok(action)
    }

    /// Register a callback to run after every dispatch.
    ///
    /// The callback receives no arguments; read the state through a store
    /// handle. Registering the same callback twice creates two independent
    /// registrations.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = lock(&self.inner.subscribers).insert(Arc::new(callback));
        log::trace!("[{}] subscriber {} registered", self.inner.config.name, id);
        Subscription::new(id, &self.inner.subscribers)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    /// Swap the reducer and dispatch [`InitAction::init`] through it, so
    /// slices the new reducer introduces get seeded.
    pub fn replace_reducer<R>(&self, reducer: R) -> Result<()>
    where
        R: Reducer<S, A> + 'static,
        A: InitAction,
    {
        let init = A::init();
        if self.inner.reducing.load(Ordering::SeqCst) {
            return Err(StoreError::ReentrantDispatch {
                action_type: init.action_type().to_string(),
            });
        }
        self.swap_reducer(reducer);
        self.dispatch(init).map(|_| ())
    }

    /// Swap the reducer without dispatching anything.
    pub fn swap_reducer<R>(&self, reducer: R)
    where
        R: Reducer<S, A> + 'static,
    {
        *write(&self.inner.reducer) = Arc::new(reducer);
        log::debug!("[{}] reducer replaced", self.inner.config.name);
    }

    fn enqueue(&self, action: A) -> Result<A> {
        let limit = self.inner.config.max_queued_dispatches;
        let mut queue = lock(&self.inner.queue);
        if queue.len() >= limit {
            return Err(StoreError::QueueOverflow { limit });
        }
        log::trace!(
            "[{}] queueing `{}` behind the running dispatch",
            self.inner.config.name,
            action.action_type()
        );
        queue.push_back(action.clone());
        Ok(action)
    }

    fn drain_queue(&self) -> Result<()> {
        loop {
            let next = lock(&self.inner.queue).pop_front();
            let Some(action) = next else {
                return Ok(());
            };
            self.apply(&action)?;
        }
    }

    /// Middleware, reducer, state swap and notification for one action.
    fn apply(&self, action: &A) -> Result<()> {
        let name = &self.inner.config.name;
        let action_type = action.action_type();
        if self.inner.config.log_actions {
            log::debug!("[{}] dispatch `{}`: {:?}", name, action_type, action);
        }

        let current = self.get_state();
        for middleware in &self.inner.middleware {
            if !middleware.handle(action, &current) {
                log::debug!("[{}] `{}` consumed by middleware", name, action_type);
                return Ok(());
            }
        }

        let reducer = Arc::clone(&read(&self.inner.reducer));
        let Some(reducing) = FlagGuard::raise(&self.inner.reducing) else {
            return Err(StoreError::ReentrantDispatch {
                action_type: action_type.to_string(),
            });
        };
        let outcome = run_reducer(reducer.as_ref(), Some(current), action);
        drop(reducing);

        let next = outcome.map_err(|source| {
            log::warn!("[{}] reducer failed on `{}`: {}", name, action_type, source);
            StoreError::ReducerExecution {
                action_type: action_type.to_string(),
                source,
            }
        })?;

        *write(&self.inner.state) = next;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        let subscribers = lock(&self.inner.subscribers).snapshot();
        log::trace!(
            "[{}] notifying {} subscribers",
            self.inner.config.name,
            subscribers.len()
        );
        for subscriber in subscribers {
            subscriber();
        }
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.config.name)
            .field("state", &*read(&self.inner.state))
            .field("subscribers", &lock(&self.inner.subscribers).len())
            .finish()
    }
}

/// Builder for stores with middleware or custom configuration.
pub struct StoreBuilder<S, A> {
    reducer: Option<SharedReducer<S, A>>,
    initial: Option<Arc<S>>,
    middleware: Vec<BoxedMiddleware<S, A>>,
    config: StoreConfig,
}

impl<S, A> StoreBuilder<S, A>
where
    S: 'static,
    A: Action + Clone + 'static,
{
    fn new() -> Self {
        Self {
            reducer: None,
            initial: None,
            middleware: Vec::new(),
            config: StoreConfig::default(),
        }
    }

    pub fn reducer<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    pub fn initial_state(mut self, initial: impl Into<Arc<S>>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Append middleware; it runs after the middleware added before it.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S, A> + 'static,
    {
        self.middleware.push(Box::new(middleware));
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the store.
    ///
    /// # Errors
    ///
    /// [`StoreError::Construction`] if no reducer or no initial state was
    /// given. Use [`StoreBuilder::build_with_init`] to derive the initial
    /// state from the reducer.
    pub fn build(self) -> Result<Store<S, A>> {
        let reducer = self
            .reducer
            .ok_or_else(|| StoreError::construction("no reducer given"))?;
        let initial = self
            .initial
            .ok_or_else(|| StoreError::construction("no initial state given"))?;
        Ok(Store::from_parts(reducer, initial, self.middleware, self.config))
    }

    /// Build the store, asking the reducer for the initial state if none was
    /// given.
    ///
    /// # Errors
    ///
    /// [`StoreError::Construction`] if no reducer was given,
    /// [`StoreError::ReducerExecution`] if the reducer fails on the init
    /// action.
    pub fn build_with_init(self) -> Result<Store<S, A>>
    where
        A: InitAction,
    {
        let reducer = self
            .reducer
            .ok_or_else(|| StoreError::construction("no reducer given"))?;
        let initial = match self.initial {
            Some(initial) => initial,
            None => {
                let init = A::init();
                run_reducer(reducer.as_ref(), None, &init).map_err(|source| {
                    StoreError::ReducerExecution {
                        action_type: init.action_type().to_string(),
                        source,
                    }
                })?
            }
        };
        Ok(Store::from_parts(reducer, initial, self.middleware, self.config))
    }
}

fn run_reducer<S, A>(
    reducer: &dyn Reducer<S, A>,
    state: Option<Arc<S>>,
    action: &A,
) -> std::result::Result<Arc<S>, ReducerError> {
    match catch_unwind(AssertUnwindSafe(|| reducer.reduce(state, action))) {
        Ok(outcome) => outcome,
        Err(panic) => Err(ReducerError::from_panic(panic)),
    }
}

/// Raises an atomic flag for the lifetime of the guard.
struct FlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlagGuard<'a> {
    /// `None` if the flag is already raised.
    fn raise(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Empties the dispatch queue when the outermost dispatch ends.
struct QueueReset<'a, S, A> {
    inner: &'a StoreInner<S, A>,
}

impl<'a, S, A> QueueReset<'a, S, A> {
    fn new(inner: &'a StoreInner<S, A>) -> Self {
        Self { inner }
    }
}

impl<S, A> Drop for QueueReset<'_, S, A> {
    fn drop(&mut self) {
        let mut queue = lock(&self.inner.queue);
        if !queue.is_empty() {
            log::warn!(
                "[{}] discarding {} queued actions",
                self.inner.config.name,
                queue.len()
            );
            queue.clear();
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RawAction;
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Debug, PartialEq)]
    struct AppState {
        count: i64,
        name: String,
    }

    fn app_reducer(
        state: Option<Arc<AppState>>,
        action: &RawAction<i64>,
    ) -> std::result::Result<Arc<AppState>, ReducerError> {
        let state = state.unwrap_or_else(|| {
            Arc::new(AppState {
                count: 0,
                name: "test".to_string(),
            })
        });
        match action.action_type() {
            "ADD" => Ok(Arc::new(AppState {
                count: state.count + action.payload().copied().unwrap_or(1),
                ..AppState::clone(&state)
            })),
            "FAIL" => Err(ReducerError::msg("refused")),
            "PANIC" => panic!("reducer exploded"),
            _ => Ok(state),
        }
    }

    fn counting(calls: &Arc<AtomicUsize>) -> impl Fn() + Send + Sync + 'static {
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn store_get_dispatch() {
        let store = Store::create(app_reducer).unwrap();
        assert_eq!(store.get_state().count, 0);

        let action = store.dispatch(RawAction::with_payload("ADD", 42)).unwrap();
        assert_eq!(action.payload(), Some(&42));
        assert_eq!(store.get_state().count, 42);
        assert_eq!(store.get_state().name, "test");
    }

    #[test]
    fn store_subscribe() {
        let store = Store::create(app_reducer).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        store.subscribe(counting(&calls));

        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.dispatch(RawAction::new("ADD")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.dispatch(RawAction::new("NOOP")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_action_type_is_rejected() {
        let store = Store::create(app_reducer).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        store.subscribe(counting(&calls));

        let err = store.dispatch(RawAction::new("")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidAction));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_reducer_keeps_state() {
        let store = Store::create(app_reducer).unwrap();
        let before = store.get_state();

        let err = store.dispatch(RawAction::new("PANIC")).unwrap_err();
        match err {
            StoreError::ReducerExecution { action_type, source } => {
                assert_eq!(action_type, "PANIC");
                assert!(matches!(source, ReducerError::Panicked(ref msg) if msg == "reducer exploded"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(Arc::ptr_eq(&before, &store.get_state()));

        // The reducing flag must be cleared after the panic.
        store.dispatch(RawAction::new("ADD")).unwrap();
        assert_eq!(store.get_state().count, 1);
    }

    #[test]
    fn builder_requires_reducer_and_state() {
        let err = StoreBuilder::<AppState, RawAction<i64>>::new()
            .initial_state(AppState {
                count: 0,
                name: String::new(),
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, StoreError::Construction { .. }));

        let err = Store::builder().reducer(app_reducer).build().unwrap_err();
        assert_eq!(err.to_string(), "cannot construct store: no initial state given");
    }

    #[test]
    fn init_failure_is_a_reducer_error() {
        fn broken(
            _: Option<Arc<i64>>,
            _: &RawAction,
        ) -> std::result::Result<Arc<i64>, ReducerError> {
            Err(ReducerError::msg("no default"))
        }
        let err = Store::create(broken).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ReducerExecution { ref action_type, .. } if action_type == crate::INIT_ACTION_TYPE
        ));
    }

    #[test]
    fn middleware_can_consume() {
        let seen = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let store = Store::builder()
            .reducer(app_reducer)
            .middleware({
                let seen = seen.clone();
                move |_: &RawAction<i64>, _: &AppState| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    true
                }
            })
            .middleware(|action: &RawAction<i64>, _: &AppState| action.action_type() != "BLOCKED")
            .build_with_init()
            .unwrap();
        store.subscribe(counting(&calls));

        store.dispatch(RawAction::with_payload("ADD", 2)).unwrap();
        let blocked = store.dispatch(RawAction::with_payload("BLOCKED", 9)).unwrap();

        assert_eq!(blocked.action_type(), "BLOCKED");
        assert_eq!(store.get_state().count, 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = Store::create(app_reducer).unwrap();
        let handle = store.clone();
        handle.dispatch(RawAction::new("ADD")).unwrap();
        assert_eq!(store.get_state().count, 1);
        assert!(format!("{store:?}").contains("count: 1"));
    }
}
