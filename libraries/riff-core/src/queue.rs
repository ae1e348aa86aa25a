//! Queue store
//!
//! The queue is owned by the application: pages replace it when the user
//! starts a playlist, the queue panel reorders it, and so on. The playback
//! controller only reads snapshots and moves the active pointer through
//! [`QueueStore::set_active_id`].

use crate::error::{CoreError, Result};
use crate::types::{QueueSnapshot, TrackId};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Seam between the playback controller and the application's queue
pub trait QueueStore {
    /// Current ids and active pointer
    fn snapshot(&self) -> QueueSnapshot;

    /// Move the active pointer
    ///
    /// An id that is not in the queue is accepted; the store is then in the
    /// "active track not queued" state and navigation treats it as not found.
    fn set_active_id(&mut self, id: TrackId);
}

/// In-memory queue store
///
/// Ids are unique: inserting an id that is already queued is ignored, so the
/// active id is never present more than once.
#[derive(Debug, Clone, Default)]
pub struct PlayerQueue {
    ids: Vec<TrackId>,
    active_id: Option<TrackId>,
}

impl PlayerQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all ids (duplicates after the first occurrence are dropped)
    ///
    /// The active pointer is left untouched.
    pub fn set_ids<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<TrackId>,
    {
        self.ids.clear();
        for id in ids {
            self.push(id.into());
        }
    }

    /// Append an id, returns false if it was already queued
    pub fn push(&mut self, id: TrackId) -> bool {
        if self.ids.contains(&id) {
            debug!(track_id = %id, "Ignoring duplicate queue entry");
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove the id at `index`
    pub fn remove(&mut self, index: usize) -> Result<TrackId> {
        if index >= self.ids.len() {
            return Err(CoreError::IndexOutOfBounds {
                index,
                len: self.ids.len(),
            });
        }
        Ok(self.ids.remove(index))
    }

    /// Remove an id wherever it is, returns false if it was not queued
    pub fn remove_id(&mut self, id: &TrackId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|queued| queued != id);
        self.ids.len() != before
    }

    /// Move the entry at `from` to `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.ids.len();
        if from >= len {
            return Err(CoreError::IndexOutOfBounds { index: from, len });
        }
        if to >= len {
            return Err(CoreError::IndexOutOfBounds { index: to, len });
        }
        if from != to {
            let id = self.ids.remove(from);
            self.ids.insert(to, id);
        }
        Ok(())
    }

    /// Clear ids and the active pointer
    pub fn clear(&mut self) {
        self.ids.clear();
        self.active_id = None;
    }

    /// Clear only the active pointer
    pub fn clear_active(&mut self) {
        self.active_id = None;
    }

    /// Queued ids in order
    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    /// Active id, if any
    pub fn active_id(&self) -> Option<&TrackId> {
        self.active_id.as_ref()
    }

    /// Number of queued ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl QueueStore for PlayerQueue {
    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot::new(self.ids.clone(), self.active_id.clone())
    }

    fn set_active_id(&mut self, id: TrackId) {
        self.active_id = Some(id);
    }
}

/// Queue handle shared between the application and the controller
///
/// Everything runs on the UI thread, so a plain `Rc<RefCell<_>>` is enough.
/// Clones point at the same queue.
#[derive(Debug, Clone, Default)]
pub struct SharedQueue(Rc<RefCell<PlayerQueue>>);

impl SharedQueue {
    /// Create an empty shared queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared queue holding `ids`, with no active track
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TrackId>,
    {
        let mut queue = PlayerQueue::new();
        queue.set_ids(ids);
        Self(Rc::new(RefCell::new(queue)))
    }

    /// Read the queue
    pub fn with<R>(&self, f: impl FnOnce(&PlayerQueue) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Mutate the queue
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut PlayerQueue) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

impl QueueStore for SharedQueue {
    fn snapshot(&self) -> QueueSnapshot {
        self.0.borrow().snapshot()
    }

    fn set_active_id(&mut self, id: TrackId) {
        self.0.borrow_mut().set_active_id(id);
    }
}
