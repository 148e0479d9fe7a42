//! ==============================================================================
//! store.rs - shared reading store
//! ==============================================================================
//!
//! purpose:
//!     owns the single Reading the whole process shares.
//!     the simulator is the only writer, every http request is a reader.
//!
//! locking:
//!     one parking_lot mutex serializes every read and every write.
//!     readers copy the record out and drop the guard before doing anything
//!     else (json encoding, socket writes), so the critical section is a
//!     handful of f64 copies. the guard is never held across an .await.
//!
//! relationships:
//!     - used by: simulator.rs (update), server.rs (read)
//!     - created by: main.rs, handed to both at construction time
//!
//! ==============================================================================

use crate::domain::Reading;
use parking_lot::Mutex;
use std::sync::Arc;

/// clone-able handle to the shared reading
#[derive(Clone, Debug)]
pub struct ReadingStore {
    inner: Arc<Mutex<Reading>>,
}

impl ReadingStore {
    pub fn new(initial: Reading) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// consistent snapshot of the current reading
    pub fn read(&self) -> Reading {
        *self.inner.lock()
    }

    /// apply `f` with exclusive access; nobody sees the half-applied state
    pub fn update<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Reading) -> T,
    {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}
