//! Player controller
//!
//! Composition root for one mounted player. Owns the engine adapter, the
//! transport state, the progress sampler, the keyboard dispatcher and the
//! media session bridge, and reads the shared queue through [`QueueStore`].
//!
//! Everything runs on the host's UI thread. The host forwards engine
//! callbacks, timer ticks, key presses, media session actions and queue
//! mutations to the matching `handle_*` / `sync_queue` method, then drains
//! [`PlayerEvent`]s to update its UI. No action fails across this boundary:
//! errors are logged, reported as [`PlayerEvent::Error`] and the player falls
//! back to `Idle` or does nothing.

use crate::config::ControllerConfig;
use crate::engine::{AudioBackend, EngineAdapter, EngineEvent, EngineEventKind, Generation};
use crate::error::{EmptyQueueError, PlayerError, Result};
use crate::events::PlayerEvent;
use crate::input::{InputDispatcher, KeyEvent, KeyEventSource, KeyOutcome};
use crate::media::{MediaAction, MediaSession, MediaSessionBridge, NoopMediaSession, NowPlaying};
use crate::navigator;
use crate::sampler::{ProgressSampler, Scheduler, TimerId};
use crate::transport::{TransportPhase, TransportState};
use crate::types::PlayerAction;
use riff_core::{QueueSnapshot, QueueStore, TrackId, TrackMetadata};
use tracing::{debug, info, warn};

/// Host services the controller runs on
pub struct PlayerHost {
    pub backend: Box<dyn AudioBackend>,
    pub queue: Box<dyn QueueStore>,
    pub scheduler: Box<dyn Scheduler>,
    pub keys: Box<dyn KeyEventSource>,
    pub media: Box<dyn MediaSession>,
}

impl PlayerHost {
    /// Host without OS media session support
    pub fn new(
        backend: Box<dyn AudioBackend>,
        queue: Box<dyn QueueStore>,
        scheduler: Box<dyn Scheduler>,
        keys: Box<dyn KeyEventSource>,
    ) -> Self {
        Self {
            backend,
            queue,
            scheduler,
            keys,
            media: Box::new(NoopMediaSession),
        }
    }

    /// Use a platform media session
    pub fn with_media_session(mut self, media: Box<dyn MediaSession>) -> Self {
        self.media = media;
        self
    }
}

/// Direction for queue navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next,
    Previous,
}

/// Mounted player instance
pub struct PlayerController {
    config: ControllerConfig,
    engine: EngineAdapter,
    transport: TransportState,
    sampler: ProgressSampler,
    input: InputDispatcher,
    media: MediaSessionBridge,

    queue: Box<dyn QueueStore>,
    scheduler: Box<dyn Scheduler>,
    keys: Box<dyn KeyEventSource>,

    /// Track whose resource is loaded
    current: Option<TrackMetadata>,

    /// Track waiting for the host to call `load_track`
    requested: Option<TrackId>,

    pending_events: Vec<PlayerEvent>,
    mounted: bool,
}

impl PlayerController {
    /// Attach to the host and pick up the queue's active track
    pub fn mount(config: ControllerConfig, host: PlayerHost) -> Self {
        let mut controller = Self {
            engine: EngineAdapter::new(host.backend),
            transport: TransportState::new(config.initial_volume),
            sampler: ProgressSampler::new(config.sample_interval()),
            input: InputDispatcher::new(config.keymap.clone()),
            media: MediaSessionBridge::new(host.media),
            queue: host.queue,
            scheduler: host.scheduler,
            keys: host.keys,
            current: None,
            requested: None,
            pending_events: Vec::new(),
            mounted: true,
            config,
        };

        controller.input.attach(controller.keys.as_mut());
        controller.media.attach();
        info!(
            volume = controller.transport.volume(),
            autoplay = controller.config.autoplay,
            "Player mounted"
        );

        controller.sync_queue();
        controller
    }

    /// Release everything the controller holds; idempotent
    ///
    /// Afterwards every action and host callback is ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.release();
        self.input.detach(self.keys.as_mut());
        self.media.detach();
        self.mounted = false;
        info!("Player unmounted");
    }

    // ===== Transport actions =====

    /// Start or resume playback
    pub fn play(&mut self) {
        if !self.mounted {
            return;
        }
        match self.transport.phase() {
            TransportPhase::Playing => {}
            TransportPhase::Loading => self.transport.set_play_intent(true),
            TransportPhase::Ready | TransportPhase::Paused => {
                self.engine.play();
            }
            TransportPhase::Ended => {
                self.seek(0.0);
                self.engine.play();
                self.sampler.start(self.scheduler.as_mut());
            }
            TransportPhase::Idle => {
                let Some(id) = self.queue.snapshot().active_id else {
                    debug!("Play ignored, nothing queued");
                    return;
                };
                self.change_track(id, true);
            }
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if !self.mounted {
            return;
        }
        match self.transport.phase() {
            TransportPhase::Playing => {
                self.engine.pause();
            }
            TransportPhase::Loading | TransportPhase::Ready => self.transport.set_play_intent(false),
            TransportPhase::Idle | TransportPhase::Paused | TransportPhase::Ended => {}
        }
    }

    /// Pause if playing, play otherwise
    pub fn toggle_play_pause(&mut self) {
        if self.transport.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause and rewind to the start
    pub fn stop(&mut self) {
        self.pause();
        self.seek(0.0);
    }

    /// Toggle mute, keeping the chosen level
    pub fn toggle_mute(&mut self) {
        if !self.mounted {
            return;
        }
        let volume = self.transport.toggle_mute();
        self.engine.set_volume(volume);
        self.emit_volume();
    }

    /// Set volume (clamped to 0.0-1.0, NaN ignored); unmutes
    pub fn set_volume(&mut self, volume: f32) {
        if !self.mounted {
            return;
        }
        let Some(volume) = self.transport.set_volume(volume) else {
            warn!("Ignoring NaN volume");
            return;
        };
        self.engine.set_volume(volume);
        self.emit_volume();
    }

    /// Raise volume by the configured step
    pub fn volume_up(&mut self) {
        self.set_volume(self.transport.unmuted_volume() + self.config.volume_step);
    }

    /// Lower volume by the configured step
    pub fn volume_down(&mut self) {
        self.set_volume(self.transport.unmuted_volume() - self.config.volume_step);
    }

    /// Jump to `seconds`
    ///
    /// The displayed position moves immediately; later progress samples
    /// behind the target are ignored until the engine catches up.
    pub fn seek(&mut self, seconds: f64) {
        if !self.mounted {
            return;
        }
        if let Err(e) = self.try_seek(seconds) {
            debug!(error = %e, seconds, "Seek ignored");
        }
    }

    /// Skip to the next queued track, wrapping at the end
    pub fn next(&mut self) {
        if !self.mounted {
            return;
        }
        if let Err(e) = self.step(Step::Next) {
            debug!(error = %e, "Next ignored");
        }
    }

    /// Go back to the previous queued track, wrapping at the start
    ///
    /// With `previous_restart_threshold_secs` set, pressing previous later
    /// than that into a track restarts it instead.
    pub fn prev(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(threshold) = self.config.previous_restart_threshold_secs {
            if self.engine.is_loaded() && self.transport.current_time() > threshold {
                self.seek(0.0);
                return;
            }
        }
        if let Err(e) = self.step(Step::Previous) {
            debug!(error = %e, "Previous ignored");
        }
    }

    /// Load the resource for a track
    ///
    /// Normally called by the host in response to `TrackRequested`. Any
    /// previous resource is released first, even if it is still loading.
    /// A successful load also makes the track the queue's active id, so a
    /// later `sync_queue` keeps it.
    pub fn load_track(&mut self, url: &str, metadata: TrackMetadata) {
        if !self.mounted {
            return;
        }
        if let Err(e) = self.try_load(url, metadata) {
            warn!(error = %e, "Track failed to load");
            self.release();
            self.emit(PlayerEvent::Error {
                message: e.to_string(),
            });
        }
    }

    /// Run a user-level action
    pub fn perform(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Play => self.play(),
            PlayerAction::Pause => self.pause(),
            PlayerAction::TogglePlayPause => self.toggle_play_pause(),
            PlayerAction::Next => self.next(),
            PlayerAction::Previous => self.prev(),
            PlayerAction::ToggleMute => self.toggle_mute(),
            PlayerAction::Stop => self.stop(),
            PlayerAction::Seek(seconds) => self.seek(seconds),
            PlayerAction::SetVolume(volume) => self.set_volume(volume),
            PlayerAction::VolumeUp => self.volume_up(),
            PlayerAction::VolumeDown => self.volume_down(),
        }
    }

    // ===== Host callbacks =====

    /// Backend callback; events from superseded loads are dropped
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if !self.mounted || !self.engine.is_current(&event) {
            return;
        }
        let before = self.transport.phase();

        match event.kind {
            EngineEventKind::Ready { duration } => {
                let start = self.transport.mark_ready(duration);
                self.emit_position();
                if start {
                    self.engine.play();
                }
            }
            EngineEventKind::Play => {
                self.transport.mark_playing();
            }
            EngineEventKind::Pause => {
                self.transport.mark_paused();
            }
            EngineEventKind::Seeked { position } => {
                self.transport.seek_completed(position);
                self.emit_position();
            }
            EngineEventKind::End => {
                self.transport.mark_ended();
                self.on_transition(before);
                self.on_track_end();
                return;
            }
            EngineEventKind::Failed { message } => {
                warn!(generation = %event.generation, %message, "Playback failed");
                self.release();
                self.emit(PlayerEvent::Error { message });
                return;
            }
        }

        self.on_transition(before);
    }

    /// Timer tick; ticks from a disarmed timer are dropped
    pub fn handle_timer(&mut self, id: TimerId) {
        if !self.mounted || !self.sampler.accepts(id) {
            return;
        }
        let Some((position, duration)) = self.engine.progress() else {
            return;
        };
        if self.transport.apply_sample(position, duration) {
            self.emit_position();
        }
    }

    /// Key press; the host applies `prevent_default` from the outcome
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if !self.mounted {
            return KeyOutcome::ignored();
        }
        let outcome = self.input.dispatch(event);
        if let Some(action) = outcome.action {
            self.perform(action);
        }
        outcome
    }

    /// OS media session action
    pub fn handle_media_action(&mut self, action: MediaAction) {
        self.perform(action.player_action());
    }

    /// Reconcile with the queue after an external mutation
    ///
    /// A new active id starts a track change; a cleared active id releases
    /// the resource. Removing the playing track from the queue does not stop
    /// it.
    pub fn sync_queue(&mut self) {
        if !self.mounted {
            return;
        }
        match self.queue.snapshot().active_id {
            None => {
                if self.current.is_some() || self.requested.is_some() {
                    debug!("Active track cleared");
                    self.release();
                }
            }
            Some(id) => {
                let loaded = self.current.as_ref().map(|track| &track.id);
                if loaded != Some(&id) && self.requested.as_ref() != Some(&id) {
                    let intent = self.config.autoplay || self.transport.is_playing();
                    self.change_track(id, intent);
                }
            }
        }
    }

    /// Take queued events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Queries =====

    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    /// Track whose resource is loaded
    pub fn current_track(&self) -> Option<&TrackMetadata> {
        self.current.as_ref()
    }

    /// Track waiting for `load_track`
    pub fn requested_track(&self) -> Option<&TrackId> {
        self.requested.as_ref()
    }

    pub fn queue_snapshot(&self) -> QueueSnapshot {
        self.queue.snapshot()
    }

    /// Generation of the loaded resource
    pub fn generation(&self) -> Option<Generation> {
        self.engine.generation()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the OS media session turned out to be unavailable
    pub fn media_session_degraded(&self) -> bool {
        self.media.is_degraded()
    }

    // ===== Internals =====

    fn step(&mut self, step: Step) -> Result<()> {
        let snapshot = self.queue.snapshot();
        let target = match step {
            Step::Next => navigator::next_track(&snapshot),
            Step::Previous => navigator::previous_track(&snapshot),
        };
        let id = target.ok_or(EmptyQueueError)?;

        let intent = self.config.autoplay || self.transport.is_playing();
        self.queue.set_active_id(id.clone());
        self.change_track(id, intent);
        Ok(())
    }

    fn try_seek(&mut self, seconds: f64) -> Result<f64> {
        if !self.engine.is_loaded() {
            return Err(PlayerError::NoTrackLoaded);
        }
        let target = self.transport.seek_to(seconds);
        self.engine.seek(target);
        self.emit_position();
        Ok(target)
    }

    fn try_load(&mut self, url: &str, metadata: TrackMetadata) -> Result<Generation> {
        let before = self.transport.phase();
        self.sampler.stop(self.scheduler.as_mut());
        self.retire_current();
        if before != TransportPhase::Loading {
            self.transport.begin_loading(self.config.autoplay);
        }

        let generation = self.engine.load(url)?;
        self.engine.set_volume(self.transport.volume());
        self.sampler.start(self.scheduler.as_mut());

        info!(track = %metadata.id, %generation, "Track loaded");
        if self.queue.snapshot().active_id.as_ref() != Some(&metadata.id) {
            self.queue.set_active_id(metadata.id.clone());
        }
        self.requested = None;
        self.emit(PlayerEvent::TrackLoaded {
            track_id: metadata.id.clone(),
            generation,
        });
        self.current = Some(metadata);
        self.on_transition(before);
        Ok(generation)
    }

    /// Switch to `id` and ask the host for its resource
    fn change_track(&mut self, id: TrackId, play_intent: bool) {
        let before = self.transport.phase();
        self.sampler.stop(self.scheduler.as_mut());
        self.engine.unload();
        self.retire_current();

        self.transport.begin_loading(play_intent);
        debug!(track = %id, play_intent, "Track requested");
        self.requested = Some(id.clone());
        self.on_transition(before);
        self.emit(PlayerEvent::TrackRequested { track_id: id });
    }

    fn on_track_end(&mut self) {
        self.sampler.stop(self.scheduler.as_mut());
        if let Some(track) = &self.current {
            let track_id = track.id.clone();
            self.emit(PlayerEvent::TrackEnded { track_id });
        }

        let snapshot = self.queue.snapshot();
        let Some(id) = navigator::next_track(&snapshot) else {
            debug!("Queue empty, staying at end of track");
            return;
        };
        self.queue.set_active_id(id.clone());
        self.change_track(id, true);
    }

    /// Drop the resource and go idle
    fn release(&mut self) {
        let before = self.transport.phase();
        self.sampler.stop(self.scheduler.as_mut());
        self.engine.unload();
        self.retire_current();
        self.requested = None;
        self.transport.reset_idle();
        self.on_transition(before);
    }

    fn on_transition(&mut self, before: TransportPhase) {
        let phase = self.transport.phase();
        if phase != before {
            debug!(from = ?before, to = ?phase, "Transport phase changed");
            self.emit(PlayerEvent::StateChanged { phase });
        }
        self.publish_now_playing();
    }

    /// Forget the current track, showing it as stopped first
    fn retire_current(&mut self) {
        let Some(track) = self.current.take() else {
            return;
        };
        let info = NowPlaying::from_track(
            &track,
            false,
            self.transport.current_time(),
            self.transport.duration(),
        );
        self.media.publish(info);
    }

    fn publish_now_playing(&mut self) {
        let Some(track) = &self.current else {
            if self.transport.phase() == TransportPhase::Idle {
                self.media.clear_now_playing();
            }
            return;
        };
        let info = NowPlaying::from_track(
            track,
            self.transport.is_playing(),
            self.transport.current_time(),
            self.transport.duration(),
        );
        self.media.publish(info);
    }

    fn emit_position(&mut self) {
        self.emit(PlayerEvent::PositionUpdate {
            current_time: self.transport.current_time(),
            duration: self.transport.duration(),
        });
    }

    fn emit_volume(&mut self) {
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.transport.volume(),
            is_muted: self.transport.is_muted(),
        });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("transport", &self.transport)
            .field("current", &self.current.as_ref().map(|track| &track.id))
            .field("requested", &self.requested)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
