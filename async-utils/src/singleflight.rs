use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::Shared;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use std::sync::MutexGuard;

/// Collapses concurrent calls for the same key into a single underlying
/// future. Every caller that arrives while a call is outstanding receives a
/// clone of the same result; once it settles the key is released and the next
/// call starts fresh.
pub struct Singleflight<K, V> {
    inflight: Mutex<HashMap<K, Shared<BoxFuture<'static, V>>>>,
}

impl<K, V> Default for Singleflight<K, V> {
    fn default() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> Singleflight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `make()` unless a call for `key` is already in flight, in which
    /// case the outstanding result is awaited instead. `make` is only invoked
    /// by the caller that starts the flight.
    pub async fn run<F, Fut>(&self, key: K, make: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let shared = {
            let mut inflight = self.lock();
            match inflight.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    let fut = make().boxed().shared();
                    inflight.insert(key.clone(), fut.clone());
                    fut
                }
            }
        };

        let value = shared.clone().await;

        // Any waiter may clear the slot, but only while it still holds the
        // flight this caller joined.
        let mut inflight = self.lock();
        if inflight
            .get(&key)
            .is_some_and(|current| current.ptr_eq(&shared))
        {
            inflight.remove(&key);
        }
        value
    }

    /// Number of keys with an outstanding call.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Shared<BoxFuture<'static, V>>>> {
        match self.inflight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
