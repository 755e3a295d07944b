use std::sync::{Arc, RwLock};

use crate::models::Position;

/// Latest-known-position store shared between the feed and the scheduler
///
/// Holds zero-or-one position; `update` replaces the whole snapshot under a
/// write lock held only for the assignment, so a concurrent reader never
/// observes a mix of old and new coordinates.
#[derive(Clone, Default)]
pub struct PositionStore {
    inner: Arc<RwLock<Option<Position>>>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the current position, visible to all subsequent reads
    pub fn update(&self, position: Position) {
        *self.inner.write().expect("position store lock poisoned") = Some(position);
    }

    /// Latest position, or `None` if no fix has ever arrived
    pub fn current(&self) -> Option<Position> {
        *self.inner.read().expect("position store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::thread;

    #[test]
    fn empty_until_first_fix() {
        let store = PositionStore::new();
        assert_eq!(store.current(), None);
    }

    #[test]
    fn reads_return_the_latest_snapshot() {
        let store = PositionStore::new();
        let first = Position::new(1.0, 2.0, Utc::now());
        let second = Position::new(3.0, 4.0, Utc::now());

        store.update(first);
        assert_eq!(store.current(), Some(first));
        assert_eq!(store.current(), Some(first));

        store.update(second);
        assert_eq!(store.current(), Some(second));
    }

    #[test]
    fn concurrent_updates_never_tear() {
        let store = PositionStore::new();
        let writer = store.clone();

        // Writer always keeps latitude == longitude, so a torn read would
        // show up as a mismatched pair.
        let handle = thread::spawn(move || {
            for i in 0..1_000 {
                let v = f64::from(i);
                writer.update(Position::new(v, v, Utc::now()));
            }
        });

        for _ in 0..1_000 {
            if let Some(position) = store.current() {
                assert_eq!(position.latitude, position.longitude);
            }
        }
        handle.join().unwrap();
    }
}
