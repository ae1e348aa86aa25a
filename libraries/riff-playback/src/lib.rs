//! Riff Player - Playback Controller
//!
//! Platform-agnostic playback controller for the Riff web player.
//!
//! This crate provides:
//! - Transport state machine (idle/loading/ready/playing/paused/ended)
//! - Queue navigation with wraparound
//! - Generation-tagged engine adapter (stale callbacks are dropped)
//! - Periodic progress sampling with a seek guard
//! - Keyboard shortcuts (space, arrows, M)
//! - OS media session bridge (best effort)
//!
//! # Architecture
//!
//! `riff-playback` owns no platform code. Everything it talks to is a trait
//! the host implements:
//! - [`AudioBackend`]: HTML audio element, or any other engine
//! - [`QueueStore`](riff_core::QueueStore): the shared queue
//! - [`Scheduler`]: `setInterval` / `clearInterval`
//! - [`KeyEventSource`]: the document key listener
//! - [`MediaSession`]: `navigator.mediaSession`, or `souvlaki` on desktop
//!   (`os-media-controls` feature)
//!
//! The `wasm` feature wraps the controller for JavaScript.
//!
//! # Example
//!
//! ```rust,no_run
//! use riff_core::{SharedQueue, TrackMetadata};
//! use riff_playback::{
//!     ControllerConfig, PlayerController, PlayerEvent, PlayerHost,
//! };
//! # use riff_playback::{AudioBackend, Generation, KeyEventSource, ListenerId,
//! #     ResourceError, ResourceHandle, Scheduler, TimerId};
//! # use std::time::Duration;
//! # struct Audio;
//! # impl AudioBackend for Audio {
//! #     fn load(&mut self, _: &str, _: Generation) -> Result<ResourceHandle, ResourceError> { Ok(ResourceHandle(1)) }
//! #     fn play(&mut self, _: ResourceHandle) {}
//! #     fn pause(&mut self, _: ResourceHandle) {}
//! #     fn seek(&mut self, _: ResourceHandle, _: f64) {}
//! #     fn set_volume(&mut self, _: ResourceHandle, _: f32) {}
//! #     fn position(&self, _: ResourceHandle) -> f64 { 0.0 }
//! #     fn duration(&self, _: ResourceHandle) -> f64 { 0.0 }
//! #     fn unload(&mut self, _: ResourceHandle) {}
//! # }
//! # struct Timers;
//! # impl Scheduler for Timers {
//! #     fn set_interval(&mut self, _: Duration) -> TimerId { TimerId(1) }
//! #     fn clear_interval(&mut self, _: TimerId) {}
//! # }
//! # struct Keys;
//! # impl KeyEventSource for Keys {
//! #     fn add_listener(&mut self) -> ListenerId { ListenerId(1) }
//! #     fn remove_listener(&mut self, _: ListenerId) {}
//! # }
//!
//! let queue = SharedQueue::from_ids(["a", "b", "c"]);
//! let host = PlayerHost::new(
//!     Box::new(Audio),
//!     Box::new(queue.clone()),
//!     Box::new(Timers),
//!     Box::new(Keys),
//! );
//! let mut player = PlayerController::mount(ControllerConfig::default(), host);
//!
//! player.next();
//! for event in player.drain_events() {
//!     if let PlayerEvent::TrackRequested { track_id } = event {
//!         let url = format!("https://cdn.example.com/{track_id}.mp3");
//!         player.load_track(&url, TrackMetadata::new(track_id, "Song", "Artist"));
//!     }
//! }
//! ```

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod input;
pub mod media;
pub mod navigator;
pub mod sampler;
pub mod transport;
pub mod types;

#[cfg(feature = "os-media-controls")]
pub mod os_media;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use config::ControllerConfig;
pub use controller::{PlayerController, PlayerHost};
pub use engine::{AudioBackend, EngineAdapter, EngineEvent, EngineEventKind, Generation, ResourceHandle};
pub use error::{EmptyQueueError, PlayerError, ResourceError, Result, UnsupportedMediaSessionError};
pub use events::PlayerEvent;
pub use input::{
    FocusTarget, InputDispatcher, KeyBinding, KeyEvent, KeyEventSource, KeyOutcome, Keymap, ListenerId,
    ShortcutAction,
};
pub use media::{MediaAction, MediaActionKind, MediaSession, MediaSessionBridge, NoopMediaSession, NowPlaying};
pub use navigator::{next_track, previous_track};
pub use sampler::{ProgressSampler, Scheduler, TimerId, DEFAULT_SAMPLE_INTERVAL};
pub use transport::{format_clock, TransportPhase, TransportSnapshot, TransportState};
pub use types::PlayerAction;

#[cfg(feature = "os-media-controls")]
pub use os_media::SouvlakiMediaSession;
