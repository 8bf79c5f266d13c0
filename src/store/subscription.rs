use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

pub(crate) type Subscriber = Arc<dyn Fn() + Send + Sync>;

/// Registered subscribers in registration order.
#[derive(Default)]
pub(crate) struct SubscriberList {
    next_id: u64,
    entries: Vec<(u64, Subscriber)>,
}

impl SubscriberList {
    pub(crate) fn insert(&mut self, subscriber: Subscriber) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, subscriber));
        id
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    /// Point-in-time copy used for one notification pass.
    pub(crate) fn snapshot(&self) -> Vec<Subscriber> {
        self.entries
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle to one subscriber registration.
///
/// Dropping the handle keeps the subscriber registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<SubscriberList>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, subscribers: &Arc<Mutex<SubscriberList>>) -> Self {
        Self {
            id,
            subscribers: Arc::downgrade(subscribers),
        }
    }

    /// Remove this registration.
    ///
    /// Returns `false` if it was already removed or the store is gone. A
    /// notification pass that has already started still runs the subscriber;
    /// later passes do not.
    pub fn unsubscribe(&self) -> bool {
        match self.subscribers.upgrade() {
            Some(subscribers) => subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id),
            None => false,
        }
    }

    /// Whether the subscriber is still registered.
    pub fn is_active(&self) -> bool {
        self.subscribers.upgrade().is_some_and(|subscribers| {
            subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(self.id)
        })
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn remove_only_matching_id() {
        let calls = Arc::new(AtomicUsize::new(0));
        let list = Arc::new(Mutex::new(SubscriberList::default()));

        let subscriber: Subscriber = {
            let calls = calls.clone();
            Arc::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let first = Subscription::new(list.lock().unwrap().insert(subscriber.clone()), &list);
        let second = Subscription::new(list.lock().unwrap().insert(subscriber), &list);

        assert!(first.unsubscribe());
        assert!(!first.unsubscribe());
        assert!(!first.is_active());
        assert!(second.is_active());

        for subscriber in list.lock().unwrap().snapshot() {
            subscriber();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_after_store_is_gone() {
        let list = Arc::new(Mutex::new(SubscriberList::default()));
        let id = list.lock().unwrap().insert(Arc::new(|| {}));
        let subscription = Subscription::new(id, &list);
        drop(list);
        assert!(!subscription.unsubscribe());
        assert!(!subscription.is_active());
    }
}
