use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Size and freshness bounds for one adapter cache.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of resident entries.
    pub capacity: NonZeroUsize,
    /// Time-to-live, measured from the moment a value is stored.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: Duration::from_secs(15),
        }
    }
}

/// Bounded cache with time-to-live from write and single-flight loading.
///
/// Entries are evicted least-recently-used once `capacity` is reached and
/// ignored once older than `ttl`. Concurrent [`TtlCache::get_or_load`] calls
/// for the same key coalesce into one loader invocation; every caller
/// receives a clone of that loader's outcome. A failed load is never stored,
/// so the next caller retries.
pub struct TtlCache<K, V, E> {
    ttl: Duration,
    inner: Mutex<LruCache<K, Slot<V, E>>>,
}

impl<K, V, E> std::fmt::Debug for TtlCache<K, V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<K, V, E> TtlCache<K, V, E>
where
    K: Clone + Eq + Hash,
    V: Clone,
    E: Clone,
{
    /// Creates an empty cache with the supplied bounds.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            ttl: config.ttl,
            inner: Mutex::new(LruCache::new(config.capacity)),
        }
    }

    /// Returns the fresh value for `key`, invoking `load` on a miss.
    ///
    /// Blocks while another caller is already loading the same key and
    /// shares that caller's outcome. If the in-flight loader unwinds, one
    /// waiter takes over the load.
    pub fn get_or_load<F>(&self, key: K, mut load: F) -> Result<V, E>
    where
        F: FnMut() -> Result<V, E>,
    {
        loop {
            let flight = {
                let mut map = self.lock_map();
                match map.get(&key) {
                    Some(Slot::Ready { value, written }) if written.elapsed() < self.ttl => {
                        return Ok(value.clone());
                    }
                    Some(Slot::Pending(flight)) => Arc::clone(flight),
                    _ => {
                        let flight = Arc::new(Flight::new());
                        map.put(key.clone(), Slot::Pending(Arc::clone(&flight)));
                        drop(map);
                        return self.lead(&key, &flight, &mut load);
                    }
                }
            };
            if let Some(outcome) = flight.wait() {
                return outcome;
            }
            // The leader unwound without an outcome; contend for the lead.
        }
    }

    fn lead<F>(&self, key: &K, flight: &Arc<Flight<V, E>>, load: &mut F) -> Result<V, E>
    where
        F: FnMut() -> Result<V, E>,
    {
        let guard = AbandonOnUnwind { cache: self, key, flight };
        let outcome = load();
        std::mem::forget(guard);

        {
            let mut map = self.lock_map();
            match &outcome {
                Ok(value) => {
                    map.put(
                        key.clone(),
                        Slot::Ready {
                            value: value.clone(),
                            written: Instant::now(),
                        },
                    );
                }
                // Failures must not poison the slot: drop the pending
                // marker (if it is still ours) so the next call retries.
                Err(_) => self.evict_pending(&mut map, key, flight),
            }
        }
        flight.finish(outcome.clone());
        outcome
    }

    fn evict_pending(&self, map: &mut LruCache<K, Slot<V, E>>, key: &K, flight: &Arc<Flight<V, E>>) {
        let ours = matches!(
            map.peek(key),
            Some(Slot::Pending(current)) if Arc::ptr_eq(current, flight)
        );
        if ours {
            map.pop(key);
        }
    }

    fn lock_map(&self) -> MutexGuard<'_, LruCache<K, Slot<V, E>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum Slot<V, E> {
    Ready { value: V, written: Instant },
    Pending(Arc<Flight<V, E>>),
}

struct Flight<V, E> {
    state: Mutex<FlightState<V, E>>,
    done: Condvar,
}

enum FlightState<V, E> {
    Running,
    Finished(Result<V, E>),
    Abandoned,
}

impl<V: Clone, E: Clone> Flight<V, E> {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlightState::Running),
            done: Condvar::new(),
        }
    }

    fn finish(&self, outcome: Result<V, E>) {
        let mut state = self.lock_state();
        *state = FlightState::Finished(outcome);
        self.done.notify_all();
    }

    fn abandon(&self) {
        let mut state = self.lock_state();
        *state = FlightState::Abandoned;
        self.done.notify_all();
    }

    /// Blocks until the leader reports; `None` means it never will.
    fn wait(&self) -> Option<Result<V, E>> {
        let mut state = self.lock_state();
        loop {
            match &*state {
                FlightState::Running => {
                    state = self
                        .done
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                FlightState::Finished(outcome) => return Some(outcome.clone()),
                FlightState::Abandoned => return None,
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FlightState<V, E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cleans up a pending marker when the loader unwinds mid-flight.
struct AbandonOnUnwind<'a, K, V, E>
where
    K: Clone + Eq + Hash,
    V: Clone,
    E: Clone,
{
    cache: &'a TtlCache<K, V, E>,
    key: &'a K,
    flight: &'a Arc<Flight<V, E>>,
}

impl<K, V, E> Drop for AbandonOnUnwind<'_, K, V, E>
where
    K: Clone + Eq + Hash,
    V: Clone,
    E: Clone,
{
    fn drop(&mut self) {
        let mut map = self.cache.lock_map();
        self.cache.evict_pending(&mut map, self.key, self.flight);
        drop(map);
        self.flight.abandon();
    }
}
