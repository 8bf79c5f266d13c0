use super::Reducer;
use crate::error::ReducerError;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Slice = Arc<dyn Any + Send + Sync>;

/// State of a combined reducer: one slice per registered key.
///
/// Slices are stored type-erased and read back with [`CombinedState::get`].
#[derive(Clone, Default)]
pub struct CombinedState {
    slices: BTreeMap<String, Slice>,
}

impl CombinedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the slice under `key`. Used to preload state.
    pub fn with_slice<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.slices.insert(key.into(), Arc::new(value));
        self
    }

    /// The slice stored under `key`, if present and of type `T`.
    pub fn get<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.slices.get(key)?.clone().downcast::<T>().ok()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slices.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

impl fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedState")
            .field("keys", &self.slices.keys().collect::<Vec<_>>())
            .finish()
    }
}

trait SliceReducer<A>: Send + Sync {
    fn reduce(&self, key: &str, previous: Option<Slice>, action: &A) -> Result<Slice, ReducerError>;
}

struct TypedSlice<T, R> {
    reducer: R,
    _slice: PhantomData<fn() -> T>,
}

impl<T, A, R> SliceReducer<A> for TypedSlice<T, R>
where
    T: Any + Send + Sync,
    R: Reducer<T, A>,
{
    fn reduce(&self, key: &str, previous: Option<Slice>, action: &A) -> Result<Slice, ReducerError> {
        let previous = previous
            .map(|slice| {
                slice.downcast::<T>().map_err(|_| ReducerError::SliceType {
                    key: key.to_string(),
                })
            })
            .transpose()?;

        let next = self
            .reducer
            .reduce(previous, action)
            .map_err(|source| ReducerError::Slice {
                key: key.to_string(),
                source: Box::new(source),
            })?;
        Ok(next as Slice)
    }
}

/// A reducer over [`CombinedState`] built from keyed slice reducers.
///
/// Every action is passed to every slice reducer together with that slice's
/// previous value. The results go into a new `CombinedState`, so the
/// top-level reference changes on every dispatch while slices a reducer
/// left alone keep their identity.
///
/// # Examples
///
/// ```
/// use oneway::{combine, Reducer, ReducerError};
/// use std::sync::Arc;
///
/// fn hits(state: Option<Arc<u32>>, _: &&str) -> Result<Arc<u32>, ReducerError> {
///     Ok(Arc::new(state.map_or(0, |s| *s) + 1))
/// }
///
/// fn last(_state: Option<Arc<String>>, action: &&str) -> Result<Arc<String>, ReducerError> {
///     Ok(Arc::new(action.to_string()))
/// }
///
/// let root = combine().slice("hits", hits).slice("last", last);
/// let state = root.reduce(None, &"ping").unwrap();
///
/// assert_eq!(state.get::<u32>("hits").as_deref(), Some(&1));
/// assert_eq!(state.get::<String>("last").as_deref().map(String::as_str), Some("ping"));
/// ```
pub struct CombineReducers<A> {
    slices: Vec<(String, Box<dyn SliceReducer<A>>)>,
}

impl<A> CombineReducers<A> {
    /// Register `reducer` as the owner of the slice under `key`.
    ///
    /// Registering a key twice replaces the earlier reducer.
    pub fn slice<T, R>(mut self, key: impl Into<String>, reducer: R) -> Self
    where
        T: Any + Send + Sync,
        R: Reducer<T, A> + 'static,
    {
        let key = key.into();
        let slice: Box<dyn SliceReducer<A>> = Box::new(TypedSlice {
            reducer,
            _slice: PhantomData,
        });
        match self.slices.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = slice,
            None => self.slices.push((key, slice)),
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }
}

impl<A> Reducer<CombinedState, A> for CombineReducers<A> {
    fn reduce(
        &self,
        state: Option<Arc<CombinedState>>,
        action: &A,
    ) -> Result<Arc<CombinedState>, ReducerError> {
        if let Some(state) = &state {
            for key in state.keys() {
                if !self.slices.iter().any(|(known, _)| known == key) {
                    log::warn!("combined state has unexpected key `{}`, dropping it", key);
                }
            }
        }

        let mut next = CombinedState::new();
        for (key, reducer) in &self.slices {
            let previous = state.as_ref().and_then(|s| s.slices.get(key).cloned());
            let slice = reducer.reduce(key, previous, action)?;
            next.slices.insert(key.clone(), slice);
        }
        Ok(Arc::new(next))
    }
}

/// Start combining slice reducers. See [`CombineReducers`].
pub fn combine<A>() -> CombineReducers<A> {
    CombineReducers { slices: Vec::new() }
}
