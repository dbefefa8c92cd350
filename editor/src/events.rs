use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::Weak;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct ListenerList<E> {
    next_id: u64,
    entries: Vec<(u64, Listener<E>)>,
}

/// Ordered set of listeners for one kind of event.
pub(crate) struct Listeners<E> {
    inner: Arc<Mutex<ListenerList<E>>>,
}

impl<E: 'static> Listeners<E> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ListenerList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub(crate) fn subscribe(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut list = lock(&self.inner);
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Arc::new(listener)));
            id
        };
        let weak: Weak<Mutex<ListenerList<E>>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Calls every listener in subscription order. The list is snapshotted
    /// first, so listeners may subscribe or unsubscribe while being called.
    pub(crate) fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = lock(&self.inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }
}

fn lock<E>(inner: &Mutex<ListenerList<E>>) -> MutexGuard<'_, ListenerList<E>> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Keeps a listener registered. Dropping it (or calling
/// [`Subscription::dispose`]) removes the listener; [`Subscription::detach`]
/// keeps it for the lifetime of the emitter.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn dispose(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
