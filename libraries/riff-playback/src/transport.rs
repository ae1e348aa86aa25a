//! Transport state machine
//!
//! Owns phase, volume/mute, position and duration for the current track.
//!
//! ```text
//! Idle ─▶ Loading ─(ready)─▶ Ready ─(play)─▶ Playing ⇄ Paused
//!                                               │
//!                                             (end)
//!                                               ▼
//!                                             Ended ─(next track)─▶ Loading
//! ```
//!
//! Engine events are the source of truth for `Playing`, `Paused` and
//! `Ended`; the controller only asks the engine to play or pause.

use serde::{Deserialize, Serialize};

/// Transport phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportPhase {
    /// No track loaded
    Idle,

    /// Resource requested or loading
    Loading,

    /// Metadata loaded, not playing yet
    Ready,

    /// Playing audio
    Playing,

    /// Paused mid-track
    Paused,

    /// Reached the natural end
    Ended,
}

/// Transport state for the current track
///
/// Volume and mute are user preferences and survive track changes; phase,
/// position and duration are reset on every track change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    phase: TransportPhase,

    /// Level chosen by the user (0.0-1.0), kept while muted
    volume: f32,
    muted: bool,

    current_time: f64,

    /// 0.0 = unknown
    duration: f64,

    /// Samples below this position are ignored until the seek lands
    seek_floor: Option<f64>,

    /// Start playback once the resource is ready
    play_intent: bool,
}

impl TransportState {
    /// Create idle transport with an initial volume
    pub fn new(volume: f32) -> Self {
        Self {
            phase: TransportPhase::Idle,
            volume: clamp_volume(volume).unwrap_or(1.0),
            muted: false,
            current_time: 0.0,
            duration: 0.0,
            seek_floor: None,
            play_intent: false,
        }
    }

    // ===== Queries =====

    /// Current phase
    pub fn phase(&self) -> TransportPhase {
        self.phase
    }

    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        self.phase == TransportPhase::Playing
    }

    /// Volume sent to the engine (0.0 while muted)
    pub fn volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Level that un-muting restores
    pub fn unmuted_volume(&self) -> f32 {
        self.volume
    }

    /// Whether audio is muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Displayed position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration in seconds (0.0 while unknown)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Time left in seconds
    pub fn remaining(&self) -> f64 {
        (self.duration - self.current_time).max(0.0)
    }

    /// Whether playback starts once the resource is ready
    pub fn play_intent(&self) -> bool {
        self.play_intent
    }

    /// Serializable copy for UIs and bindings
    pub fn snapshot(&self) -> TransportSnapshot {
        TransportSnapshot {
            phase: self.phase,
            is_playing: self.is_playing(),
            volume: self.volume(),
            is_muted: self.muted,
            current_time: self.current_time,
            duration: self.duration,
            remaining: self.remaining(),
        }
    }

    // ===== Volume =====

    /// Set volume, clamped to 0.0-1.0; clears mute
    ///
    /// Returns the new engine volume, or `None` for NaN input (ignored).
    pub fn set_volume(&mut self, volume: f32) -> Option<f32> {
        let volume = clamp_volume(volume)?;
        self.volume = volume;
        self.muted = false;
        Some(self.volume())
    }

    /// Toggle mute, returns the new engine volume
    pub fn toggle_mute(&mut self) -> f32 {
        self.muted = !self.muted;
        self.volume()
    }

    // ===== Track lifecycle =====

    /// Enter `Loading` for a new track
    pub fn begin_loading(&mut self, play_intent: bool) {
        self.phase = TransportPhase::Loading;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.seek_floor = None;
        self.play_intent = play_intent;
    }

    /// Drop back to `Idle` (no resource)
    pub fn reset_idle(&mut self) {
        self.phase = TransportPhase::Idle;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.seek_floor = None;
        self.play_intent = false;
    }

    /// Set or clear the pending play request
    pub fn set_play_intent(&mut self, intent: bool) {
        self.play_intent = intent;
    }

    // ===== Engine events =====

    /// Metadata arrived; returns true if playback should start now
    pub fn mark_ready(&mut self, duration: f64) -> bool {
        self.update_duration(duration);
        if self.phase != TransportPhase::Loading {
            return false;
        }
        self.phase = TransportPhase::Ready;
        std::mem::take(&mut self.play_intent)
    }

    /// Engine started playing; returns true if the phase changed
    pub fn mark_playing(&mut self) -> bool {
        self.play_intent = false;
        self.transition(TransportPhase::Playing)
    }

    /// Engine paused; returns true if the phase changed
    pub fn mark_paused(&mut self) -> bool {
        match self.phase {
            TransportPhase::Playing | TransportPhase::Ready => {
                self.transition(TransportPhase::Paused)
            }
            _ => false,
        }
    }

    /// Engine reached the end; returns true if the phase changed
    pub fn mark_ended(&mut self) -> bool {
        self.play_intent = false;
        self.seek_floor = None;
        if self.duration > 0.0 {
            self.current_time = self.duration;
        }
        self.transition(TransportPhase::Ended)
    }

    // ===== Position =====

    /// Optimistic seek, returns the clamped target
    pub fn seek_to(&mut self, seconds: f64) -> f64 {
        let target = self.clamp_time(seconds);
        self.current_time = target;
        self.seek_floor = Some(target);
        target
    }

    /// Engine confirmed a seek
    pub fn seek_completed(&mut self, position: f64) {
        self.seek_floor = None;
        if position.is_finite() {
            self.current_time = self.clamp_time(position);
        }
    }

    /// Apply a progress sample; returns true if anything changed
    ///
    /// While a seek is in flight, samples behind the seek target are
    /// ignored so the displayed time never jumps back.
    pub fn apply_sample(&mut self, position: f64, duration: f64) -> bool {
        let duration_changed = self.update_duration(duration);

        if !position.is_finite() {
            return duration_changed;
        }
        if let Some(floor) = self.seek_floor {
            if position < floor {
                return duration_changed;
            }
            self.seek_floor = None;
        }

        let position = self.clamp_time(position);
        let position_changed = position != self.current_time;
        self.current_time = position;
        duration_changed || position_changed
    }

    fn update_duration(&mut self, duration: f64) -> bool {
        if !duration.is_finite() || duration <= 0.0 || duration == self.duration {
            return false;
        }
        self.duration = duration;
        self.current_time = self.current_time.min(duration);
        true
    }

    fn clamp_time(&self, seconds: f64) -> f64 {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }

    fn transition(&mut self, phase: TransportPhase) -> bool {
        if self.phase == phase {
            return false;
        }
        self.phase = phase;
        true
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Serializable transport view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSnapshot {
    pub phase: TransportPhase,
    pub is_playing: bool,
    pub volume: f32,
    pub is_muted: bool,
    pub current_time: f64,
    pub duration: f64,
    pub remaining: f64,
}

/// Clamp to 0.0-1.0; `None` for NaN
pub(crate) fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

/// Format seconds as `m:ss`
///
/// Zero, negative and non-finite input render as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
