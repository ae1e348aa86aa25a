//! Test doubles for the host services
//!
//! Every double records into shared state so a test can inspect what the
//! controller did after handing ownership of the double to it.

#![allow(dead_code)]

use riff_core::{QueueStore, SharedQueue, TrackId, TrackMetadata};
use riff_playback::{
    AudioBackend, ControllerConfig, EngineEvent, EngineEventKind, Generation, KeyEventSource, ListenerId,
    MediaActionKind, MediaSession, NowPlaying, PlayerController, PlayerEvent, PlayerHost, ResourceError,
    ResourceHandle, Scheduler, TimerId, UnsupportedMediaSessionError,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Log to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

// ===== Audio backend =====

#[derive(Debug, Default)]
pub struct EngineLog {
    pub loads: Vec<(String, Generation, ResourceHandle)>,
    pub unloads: Vec<ResourceHandle>,
    pub plays: usize,
    pub pauses: usize,
    pub seeks: Vec<f64>,
    pub volumes: Vec<f32>,
    pub position: f64,
    pub duration: f64,
    next_handle: u64,
}

impl EngineLog {
    /// Resources loaded and not yet unloaded
    pub fn live_handles(&self) -> Vec<ResourceHandle> {
        self.loads
            .iter()
            .map(|(_, _, handle)| *handle)
            .filter(|handle| !self.unloads.contains(handle))
            .collect()
    }
}

/// Loads fail for URLs containing "broken"
pub struct RecordingBackend(pub Rc<RefCell<EngineLog>>);

impl AudioBackend for RecordingBackend {
    fn load(&mut self, url: &str, generation: Generation) -> Result<ResourceHandle, ResourceError> {
        if url.contains("broken") {
            return Err(ResourceError::new(url, "404 Not Found"));
        }
        let mut log = self.0.borrow_mut();
        log.next_handle += 1;
        let handle = ResourceHandle(log.next_handle);
        log.loads.push((url.to_string(), generation, handle));
        Ok(handle)
    }

    fn play(&mut self, _handle: ResourceHandle) {
        self.0.borrow_mut().plays += 1;
    }

    fn pause(&mut self, _handle: ResourceHandle) {
        self.0.borrow_mut().pauses += 1;
    }

    fn seek(&mut self, _handle: ResourceHandle, seconds: f64) {
        self.0.borrow_mut().seeks.push(seconds);
    }

    fn set_volume(&mut self, _handle: ResourceHandle, volume: f32) {
        self.0.borrow_mut().volumes.push(volume);
    }

    fn position(&self, _handle: ResourceHandle) -> f64 {
        self.0.borrow().position
    }

    fn duration(&self, _handle: ResourceHandle) -> f64 {
        self.0.borrow().duration
    }

    fn unload(&mut self, handle: ResourceHandle) {
        self.0.borrow_mut().unloads.push(handle);
    }
}

// ===== Scheduler =====

#[derive(Debug, Default)]
pub struct TimerLog {
    pub armed: Vec<TimerId>,
    pub cleared: Vec<TimerId>,
    pub periods: Vec<Duration>,
    next_id: u64,
}

pub struct ManualScheduler(pub Rc<RefCell<TimerLog>>);

impl Scheduler for ManualScheduler {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        let mut log = self.0.borrow_mut();
        log.next_id += 1;
        let id = TimerId(log.next_id);
        log.armed.push(id);
        log.periods.push(period);
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        let mut log = self.0.borrow_mut();
        log.armed.retain(|armed| *armed != id);
        log.cleared.push(id);
    }
}

// ===== Key source =====

#[derive(Debug, Default)]
pub struct KeyLog {
    pub active: Vec<ListenerId>,
    pub added: usize,
    pub removed: usize,
    next_id: u64,
}

pub struct RecordingKeySource(pub Rc<RefCell<KeyLog>>);

impl KeyEventSource for RecordingKeySource {
    fn add_listener(&mut self) -> ListenerId {
        let mut log = self.0.borrow_mut();
        log.next_id += 1;
        log.added += 1;
        let id = ListenerId(log.next_id);
        log.active.push(id);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        let mut log = self.0.borrow_mut();
        log.removed += 1;
        log.active.retain(|active| *active != id);
    }
}

// ===== Media session =====

#[derive(Debug, Default)]
pub struct MediaLog {
    pub handlers: Vec<MediaActionKind>,
    pub published: Vec<NowPlaying>,
    pub now_playing_clears: usize,
    pub clears: usize,
    pub calls: usize,
    /// Reject `set_now_playing` even though handlers were accepted
    pub fail_publish: bool,
}

pub struct RecordingMediaSession {
    pub log: Rc<RefCell<MediaLog>>,
    pub supported: bool,
}

impl MediaSession for RecordingMediaSession {
    fn set_action_handlers(&mut self, actions: &[MediaActionKind]) -> Result<(), UnsupportedMediaSessionError> {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        if !self.supported {
            return Err(UnsupportedMediaSessionError("mediaSession not in navigator".into()));
        }
        log.handlers.extend_from_slice(actions);
        Ok(())
    }

    fn set_now_playing(&mut self, info: &NowPlaying) -> Result<(), UnsupportedMediaSessionError> {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        if !self.supported || log.fail_publish {
            return Err(UnsupportedMediaSessionError("mediaSession not in navigator".into()));
        }
        log.published.push(info.clone());
        Ok(())
    }

    fn clear_now_playing(&mut self) {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        log.now_playing_clears += 1;
    }

    fn clear(&mut self) {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        log.clears += 1;
    }
}

// ===== Harness =====

pub struct Harness {
    pub player: PlayerController,
    pub queue: SharedQueue,
    pub engine: Rc<RefCell<EngineLog>>,
    pub timers: Rc<RefCell<TimerLog>>,
    pub keys: Rc<RefCell<KeyLog>>,
    pub media: Rc<RefCell<MediaLog>>,
}

impl Harness {
    pub fn new(ids: &[&str], active: Option<&str>) -> Self {
        Self::with_config(ids, active, ControllerConfig::default(), true)
    }

    pub fn with_config(ids: &[&str], active: Option<&str>, config: ControllerConfig, media_supported: bool) -> Self {
        init_tracing();
        let queue = SharedQueue::from_ids(ids.iter().copied());
        if let Some(active) = active {
            queue.with_mut(|q| q.set_active_id(TrackId::new(active)));
        }

        let engine = Rc::new(RefCell::new(EngineLog::default()));
        let timers = Rc::new(RefCell::new(TimerLog::default()));
        let keys = Rc::new(RefCell::new(KeyLog::default()));
        let media = Rc::new(RefCell::new(MediaLog::default()));

        let host = PlayerHost::new(
            Box::new(RecordingBackend(Rc::clone(&engine))),
            Box::new(queue.clone()),
            Box::new(ManualScheduler(Rc::clone(&timers))),
            Box::new(RecordingKeySource(Rc::clone(&keys))),
        )
        .with_media_session(Box::new(RecordingMediaSession {
            log: Rc::clone(&media),
            supported: media_supported,
        }));

        Self {
            player: PlayerController::mount(config, host),
            queue,
            engine,
            timers,
            keys,
            media,
        }
    }

    /// Answer every pending `TrackRequested` with a load, returns the events seen
    pub fn serve_requests(&mut self) -> Vec<PlayerEvent> {
        let events = self.player.drain_events();
        for event in &events {
            if let PlayerEvent::TrackRequested { track_id } = event {
                let url = format!("https://cdn.test/{track_id}.mp3");
                self.player.load_track(&url, metadata(track_id.as_str()));
            }
        }
        events
    }

    /// Deliver an engine callback for the currently loaded resource
    pub fn engine_event(&mut self, kind: EngineEventKind) {
        let generation = self.player.generation().expect("a resource is loaded");
        self.player.handle_engine_event(EngineEvent::new(generation, kind));
    }

    /// Drive the loaded track to `Playing`
    pub fn start_playing(&mut self, duration: f64) {
        self.engine_event(EngineEventKind::Ready { duration });
        self.engine_event(EngineEventKind::Play);
    }

    pub fn active_id(&self) -> Option<TrackId> {
        self.queue.with(|q| q.active_id().cloned())
    }

    pub fn media_fails_from_now(&self) {
        self.media.borrow_mut().fail_publish = true;
    }

    pub fn armed_timer(&self) -> Option<TimerId> {
        self.timers.borrow().armed.last().copied()
    }
}

pub fn metadata(id: &str) -> TrackMetadata {
    TrackMetadata::new(id, format!("Song {id}"), "Test Artist")
}

pub fn id(s: &str) -> TrackId {
    TrackId::new(s)
}
