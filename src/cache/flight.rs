//! Single-Flight Module
//!
//! Deduplicates concurrent get-or-compute requests per key. The first caller
//! to miss becomes the leader and runs the producer; everyone else arriving
//! before the producer settles joins the same flight and receives the
//! broadcast outcome. A flight lives exactly as long as one recomputation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

/// Outcome shared between the leader and every joined caller.
///
/// The error is `Arc`-shared because all concurrent callers must receive the
/// same failure; the original error stays intact inside and is downcastable.
pub type FlightResult<V> = Result<V, Arc<anyhow::Error>>;

// == Flight Map ==
/// Registry of in-flight computations, one broadcast channel per key.
#[derive(Debug)]
pub(crate) struct FlightMap<K, V> {
    pending: Mutex<HashMap<K, broadcast::Sender<FlightResult<V>>>>,
}

/// Role handed to a caller after consulting the map.
pub(crate) enum FlightTicket<'a, K: Eq + Hash + Clone, V: Clone> {
    /// An existing flight covers this key; await its broadcast.
    Join(broadcast::Receiver<FlightResult<V>>),
    /// No flight exists; the caller leads and must settle the guard.
    Lead(FlightGuard<'a, K, V>),
}

impl<K, V> FlightMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Joins the pending flight for `key`, or registers a new one with the
    /// caller as leader.
    pub(crate) fn join_or_lead(&self, key: &K) -> FlightTicket<'_, K, V> {
        let mut pending = self.lock_pending();
        match pending.entry(key.clone()) {
            Entry::Occupied(slot) => FlightTicket::Join(slot.get().subscribe()),
            Entry::Vacant(slot) => {
                // Capacity 1: a flight broadcasts exactly one message.
                let (tx, _rx) = broadcast::channel(1);
                slot.insert(tx.clone());
                FlightTicket::Lead(FlightGuard {
                    map: self,
                    key: key.clone(),
                    tx,
                    settled: false,
                })
            }
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<K, broadcast::Sender<FlightResult<V>>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, key: &K) {
        self.lock_pending().remove(key);
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }
}

// == Flight Guard ==
/// Leadership of one in-flight computation.
///
/// The leader must call `complete` with the producer's outcome. If the guard
/// is dropped instead (the leader's future was cancelled), the flight entry
/// is released so waiters observe the closed channel and retry; no stale
/// flight can block a key forever.
pub(crate) struct FlightGuard<'a, K: Eq + Hash + Clone, V: Clone> {
    map: &'a FlightMap<K, V>,
    key: K,
    tx: broadcast::Sender<FlightResult<V>>,
    settled: bool,
}

impl<K, V> FlightGuard<'_, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Settles the flight: removes the pending entry, then broadcasts the
    /// outcome to every joined caller.
    ///
    /// The entry is removed first so that a caller arriving between removal
    /// and broadcast starts from the store (already populated on success)
    /// rather than joining a settled flight.
    pub(crate) fn complete(mut self, result: FlightResult<V>) {
        self.settled = true;
        self.map.remove(&self.key);
        // Ignore the send result: zero joined callers is fine.
        let _ = self.tx.send(result);
    }
}

impl<K, V> Drop for FlightGuard<'_, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        if !self.settled {
            self.map.remove(&self.key);
        }
    }
}
