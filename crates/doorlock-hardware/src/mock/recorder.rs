use std::sync::{Arc, Mutex, MutexGuard};

/// Shared, append-only event log behind a mock device and its handle.
#[derive(Debug)]
pub(crate) struct Recorder<T> {
    events: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<T: Clone> Recorder<T> {
    pub(crate) fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn push(&self, event: T) {
        self.lock().push(event);
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }

    pub(crate) fn last(&self) -> Option<T> {
        self.lock().last().cloned()
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a Vec half-written
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
