//! Audio engine adapter
//!
//! [`AudioBackend`] is the platform seam (an HTML audio element in the
//! browser, a test double in tests). [`EngineAdapter`] owns the backend and
//! the single loaded resource, tags every load with a [`Generation`] and
//! filters backend callbacks that belong to a superseded load.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Load counter used to discard callbacks from superseded loads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Wrap a raw counter value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw counter value
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle chosen by the backend for a loaded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceHandle(pub u64);

/// Platform audio backend
///
/// `load` may return before the resource is playable; readiness, playback
/// and failures are reported later as [`EngineEvent`]s tagged with the
/// generation passed to `load`.
pub trait AudioBackend {
    /// Start loading `url`
    fn load(&mut self, url: &str, generation: Generation) -> Result<ResourceHandle, ResourceError>;

    /// Start or resume playback
    fn play(&mut self, handle: ResourceHandle);

    /// Pause playback
    fn pause(&mut self, handle: ResourceHandle);

    /// Jump to `seconds`, applied immediately
    fn seek(&mut self, handle: ResourceHandle, seconds: f64);

    /// Set output volume (0.0-1.0)
    fn set_volume(&mut self, handle: ResourceHandle, volume: f32);

    /// Current playback position in seconds
    fn position(&self, handle: ResourceHandle) -> f64;

    /// Track duration in seconds (0.0 while unknown)
    fn duration(&self, handle: ResourceHandle) -> f64;

    /// Release the resource
    fn unload(&mut self, handle: ResourceHandle);
}

/// Backend callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Generation of the load that produced this callback
    pub generation: Generation,

    /// What happened
    #[serde(flatten)]
    pub kind: EngineEventKind,
}

impl EngineEvent {
    /// Create an event
    pub fn new(generation: Generation, kind: EngineEventKind) -> Self {
        Self { generation, kind }
    }
}

/// Kinds of backend callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEventKind {
    /// Metadata loaded, resource can play
    Ready {
        /// Duration in seconds (0.0 if still unknown)
        duration: f64,
    },

    /// Playback started
    Play,

    /// Playback paused
    Pause,

    /// Playback reached the natural end
    End,

    /// A seek finished at `position`
    Seeked {
        /// Position in seconds
        position: f64,
    },

    /// Asynchronous load/decode failure
    Failed {
        /// Backend-provided reason
        message: String,
    },
}

#[derive(Debug, Clone)]
struct LoadedResource {
    handle: ResourceHandle,
    generation: Generation,
    url: String,
}

/// Owner of the single loaded resource
pub struct EngineAdapter {
    backend: Box<dyn AudioBackend>,
    loaded: Option<LoadedResource>,
    last_generation: Generation,
}

impl EngineAdapter {
    /// Wrap a backend
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            loaded: None,
            last_generation: Generation::default(),
        }
    }

    /// Load `url`, releasing the previous resource first
    ///
    /// The previous resource is released even if it never signalled
    /// readiness. A failed load consumes a generation and leaves nothing
    /// loaded.
    pub fn load(&mut self, url: &str) -> Result<Generation, ResourceError> {
        self.unload();

        let generation = self.last_generation.next();
        self.last_generation = generation;

        let handle = self.backend.load(url, generation)?;
        debug!(%generation, url, "Resource loading");
        self.loaded = Some(LoadedResource {
            handle,
            generation,
            url: url.to_string(),
        });
        Ok(generation)
    }

    /// Release the loaded resource, returns false if nothing was loaded
    pub fn unload(&mut self) -> bool {
        match self.loaded.take() {
            Some(resource) => {
                debug!(generation = %resource.generation, url = %resource.url, "Resource released");
                self.backend.unload(resource.handle);
                true
            }
            None => false,
        }
    }

    /// Whether `event` belongs to the loaded resource
    pub fn is_current(&self, event: &EngineEvent) -> bool {
        let current = self
            .loaded
            .as_ref()
            .is_some_and(|resource| resource.generation == event.generation);
        if !current {
            trace!(generation = %event.generation, "Stale engine event");
        }
        current
    }

    /// Whether a resource is loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Generation of the loaded resource
    pub fn generation(&self) -> Option<Generation> {
        self.loaded.as_ref().map(|resource| resource.generation)
    }

    /// Start playback, returns false if nothing is loaded
    pub fn play(&mut self) -> bool {
        let Some(handle) = self.handle() else {
            return false;
        };
        self.backend.play(handle);
        true
    }

    /// Pause playback, returns false if nothing is loaded
    pub fn pause(&mut self) -> bool {
        let Some(handle) = self.handle() else {
            return false;
        };
        self.backend.pause(handle);
        true
    }

    /// Seek, returns false if nothing is loaded
    pub fn seek(&mut self, seconds: f64) -> bool {
        let Some(handle) = self.handle() else {
            return false;
        };
        self.backend.seek(handle, seconds);
        true
    }

    /// Set volume, returns false if nothing is loaded
    pub fn set_volume(&mut self, volume: f32) -> bool {
        let Some(handle) = self.handle() else {
            return false;
        };
        self.backend.set_volume(handle, volume);
        true
    }

    /// Engine-reported `(position, duration)` in seconds
    pub fn progress(&self) -> Option<(f64, f64)> {
        let handle = self.handle()?;
        Some((self.backend.position(handle), self.backend.duration(handle)))
    }

    fn handle(&self) -> Option<ResourceHandle> {
        self.loaded.as_ref().map(|resource| resource.handle)
    }
}

impl fmt::Debug for EngineAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineAdapter")
            .field("loaded", &self.loaded)
            .field("last_generation", &self.last_generation)
            .finish_non_exhaustive()
    }
}
