//! Core domain types shared by the queue store and the playback controller

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a track ID, rejecting empty or whitespace-only input
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidTrackId(id));
        }
        Ok(Self(id))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Display metadata for a track
///
/// Supplied by the host together with the track URL. The controller only
/// forwards it (media session, events); it never fetches or edits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track identifier (matches the queue entry)
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist / author name
    pub artist: String,

    /// Album name (optional)
    #[serde(default)]
    pub album: Option<String>,

    /// Cover art URL (optional)
    #[serde(default)]
    pub artwork_url: Option<String>,
}

impl TrackMetadata {
    /// Create metadata with title and artist only
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            artwork_url: None,
        }
    }
}

/// Point-in-time view of the queue store
///
/// `ids` keeps insertion order. `active_id` may name a track that is not in
/// `ids` (for example after it was removed mid-playback).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Ordered track identifiers
    pub ids: Vec<TrackId>,

    /// Currently active track
    pub active_id: Option<TrackId>,
}

impl QueueSnapshot {
    /// Create a snapshot
    pub fn new(ids: Vec<TrackId>, active_id: Option<TrackId>) -> Self {
        Self { ids, active_id }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the queue holds no tracks
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of the active track, if it is in the queue
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active_id.as_ref()?;
        self.ids.iter().position(|id| id == active)
    }

    /// Whether `id` is part of the queue
    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Tracks besides the one playing ("N in queue")
    pub fn upcoming_count(&self) -> usize {
        self.ids.len().saturating_sub(1)
    }
}
