//! Player events
//!
//! Queued by the controller and drained by the host after each call, the
//! same way the UI is kept in sync elsewhere in the player:
//! - Phase changes (loading, playing, paused, ended)
//! - Track requests the host must resolve to a URL (`TrackRequested`)
//! - Position updates from the progress sampler or a seek
//! - Volume/mute changes and recoverable errors

use crate::engine::Generation;
use crate::transport::TransportPhase;
use riff_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerEvent {
    /// Transport phase changed
    StateChanged { phase: TransportPhase },

    /// A new track became active; the host should call `load_track`
    TrackRequested { track_id: TrackId },

    /// The engine accepted the resource for `track_id`
    TrackLoaded {
        track_id: TrackId,
        generation: Generation,
    },

    /// Track played to its natural end
    TrackEnded { track_id: TrackId },

    /// Position/duration in seconds
    PositionUpdate { current_time: f64, duration: f64 },

    /// Effective volume changed
    VolumeChanged { volume: f32, is_muted: bool },

    /// Recoverable failure, already logged
    Error { message: String },
}
