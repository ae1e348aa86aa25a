//! OS media session integration
//!
//! [`MediaSession`] is the platform seam (`navigator.mediaSession` in a
//! browser, MPRIS/SMTC/Now Playing on desktop). [`MediaSessionBridge`]
//! registers action handlers, publishes now-playing info and degrades to a
//! no-op when the platform has no media session.

use crate::error::UnsupportedMediaSessionError;
use crate::types::PlayerAction;
use riff_core::TrackMetadata;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Media session action the host can route to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaActionKind {
    Play,
    Pause,
    PreviousTrack,
    NextTrack,
    SeekTo,
}

impl MediaActionKind {
    /// Handlers registered on attach
    pub const ALL: [MediaActionKind; 5] = [
        Self::Play,
        Self::Pause,
        Self::PreviousTrack,
        Self::NextTrack,
        Self::SeekTo,
    ];

    /// Web media session action name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::PreviousTrack => "previoustrack",
            Self::NextTrack => "nexttrack",
            Self::SeekTo => "seekto",
        }
    }
}

/// Media session action delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "seekTime", rename_all = "camelCase")]
pub enum MediaAction {
    Play,
    Pause,

    /// Desktop hardware keys often only send play/pause toggle
    Toggle,
    Next,
    Previous,

    /// Absolute position in seconds
    SeekTo(f64),
    Stop,
}

impl MediaAction {
    /// Controller action this media action triggers
    pub fn player_action(&self) -> PlayerAction {
        match *self {
            Self::Play => PlayerAction::Play,
            Self::Pause => PlayerAction::Pause,
            Self::Toggle => PlayerAction::TogglePlayPause,
            Self::Next => PlayerAction::Next,
            Self::Previous => PlayerAction::Previous,
            Self::SeekTo(seconds) => PlayerAction::Seek(seconds),
            Self::Stop => PlayerAction::Stop,
        }
    }
}

/// Now-playing info published to the OS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub artwork_url: Option<String>,
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
}

impl NowPlaying {
    /// Build from track metadata and transport values
    pub fn from_track(track: &TrackMetadata, is_playing: bool, position: f64, duration: f64) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            artwork_url: track.artwork_url.clone(),
            is_playing,
            position,
            duration,
        }
    }

    /// Equal apart from position
    fn same_display(&self, other: &NowPlaying) -> bool {
        self.title == other.title
            && self.artist == other.artist
            && self.album == other.album
            && self.artwork_url == other.artwork_url
            && self.is_playing == other.is_playing
            && self.duration == other.duration
    }
}

/// Platform media session
pub trait MediaSession {
    /// Register handlers for the given actions
    fn set_action_handlers(&mut self, actions: &[MediaActionKind]) -> Result<(), UnsupportedMediaSessionError>;

    /// Publish now-playing info
    fn set_now_playing(&mut self, info: &NowPlaying) -> Result<(), UnsupportedMediaSessionError>;

    /// Drop now-playing info, keeping the action handlers
    fn clear_now_playing(&mut self);

    /// Remove handlers and clear now-playing info
    fn clear(&mut self);
}

/// Media session that accepts everything and does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMediaSession;

impl MediaSession for NoopMediaSession {
    fn set_action_handlers(&mut self, _actions: &[MediaActionKind]) -> Result<(), UnsupportedMediaSessionError> {
        Ok(())
    }

    fn set_now_playing(&mut self, _info: &NowPlaying) -> Result<(), UnsupportedMediaSessionError> {
        Ok(())
    }

    fn clear_now_playing(&mut self) {}

    fn clear(&mut self) {}
}

/// Keeps the OS media session in sync with the player
pub struct MediaSessionBridge {
    session: Box<dyn MediaSession>,
    /// Publishing is live
    attached: bool,
    /// Handlers are registered with the session and must be removed on detach
    handlers_registered: bool,

    /// Set on the first unsupported error; everything is a no-op afterwards
    degraded: bool,
    last_published: Option<NowPlaying>,
}

impl MediaSessionBridge {
    pub fn new(session: Box<dyn MediaSession>) -> Self {
        Self {
            session,
            attached: false,
            handlers_registered: false,
            degraded: false,
            last_published: None,
        }
    }

    /// Register action handlers; no-op if attached or degraded
    pub fn attach(&mut self) {
        if self.attached || self.degraded {
            return;
        }
        match self.session.set_action_handlers(&MediaActionKind::ALL) {
            Ok(()) => {
                self.attached = true;
                self.handlers_registered = true;
                debug!("Media session attached");
            }
            Err(e) => self.degrade(&e),
        }
    }

    /// Publish now-playing info
    ///
    /// Skipped when nothing but the position changed since the last publish.
    pub fn publish(&mut self, info: NowPlaying) {
        if !self.attached {
            return;
        }
        if self
            .last_published
            .as_ref()
            .is_some_and(|last| last.same_display(&info))
        {
            return;
        }
        match self.session.set_now_playing(&info) {
            Ok(()) => self.last_published = Some(info),
            Err(e) => self.degrade(&e),
        }
    }

    /// Clear now-playing info without touching the handlers
    pub fn clear_now_playing(&mut self) {
        if !self.attached || self.last_published.is_none() {
            return;
        }
        self.session.clear_now_playing();
        self.last_published = None;
        debug!("Now playing cleared");
    }

    /// Remove handlers; returns false if none were registered
    ///
    /// Still clears after a degrade, as long as `attach` once succeeded.
    pub fn detach(&mut self) -> bool {
        if !self.handlers_registered {
            return false;
        }
        self.session.clear();
        self.handlers_registered = false;
        self.attached = false;
        self.last_published = None;
        debug!("Media session detached");
        true
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn degrade(&mut self, error: &UnsupportedMediaSessionError) {
        debug!(error = %error, "Media session unavailable, continuing without it");
        self.degraded = true;
        self.attached = false;
        self.last_published = None;
    }
}

impl std::fmt::Debug for MediaSessionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSessionBridge")
            .field("attached", &self.attached)
            .field("handlers_registered", &self.handlers_registered)
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        handlers: Vec<MediaActionKind>,
        published: Vec<NowPlaying>,
        now_playing_clears: usize,
        clears: usize,
        fail_publish: bool,
    }

    struct FakeSession {
        log: Rc<RefCell<Log>>,
        supported: bool,
    }

    impl MediaSession for FakeSession {
        fn set_action_handlers(&mut self, actions: &[MediaActionKind]) -> Result<(), UnsupportedMediaSessionError> {
            if !self.supported {
                return Err(UnsupportedMediaSessionError("no mediaSession".into()));
            }
            self.log.borrow_mut().handlers.extend_from_slice(actions);
            Ok(())
        }

        fn set_now_playing(&mut self, info: &NowPlaying) -> Result<(), UnsupportedMediaSessionError> {
            let mut log = self.log.borrow_mut();
            if log.fail_publish {
                return Err(UnsupportedMediaSessionError("metadata rejected".into()));
            }
            log.published.push(info.clone());
            Ok(())
        }

        fn clear_now_playing(&mut self) {
            self.log.borrow_mut().now_playing_clears += 1;
        }

        fn clear(&mut self) {
            self.log.borrow_mut().clears += 1;
        }
    }

    fn bridge(supported: bool) -> (MediaSessionBridge, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let session = FakeSession {
            log: Rc::clone(&log),
            supported,
        };
        (MediaSessionBridge::new(Box::new(session)), log)
    }

    fn info(is_playing: bool, position: f64) -> NowPlaying {
        let track = TrackMetadata::new("t1", "Song", "Artist");
        NowPlaying::from_track(&track, is_playing, position, 180.0)
    }

    #[test]
    fn attach_registers_all_handlers_once() {
        let (mut bridge, log) = bridge(true);
        bridge.attach();
        bridge.attach();
        assert_eq!(log.borrow().handlers, MediaActionKind::ALL.to_vec());
    }

    #[test]
    fn publish_skips_position_only_changes() {
        let (mut bridge, log) = bridge(true);
        bridge.attach();
        bridge.publish(info(true, 1.0));
        bridge.publish(info(true, 2.0));
        bridge.publish(info(false, 2.0));
        assert_eq!(log.borrow().published.len(), 2);
    }

    #[test]
    fn unsupported_session_degrades_silently() {
        let (mut bridge, log) = bridge(false);
        bridge.attach();
        bridge.publish(info(true, 0.0));

        assert!(bridge.is_degraded());
        assert!(!bridge.is_attached());
        assert!(log.borrow().published.is_empty());
        assert!(!bridge.detach());
    }

    #[test]
    fn detach_clears_once() {
        let (mut bridge, log) = bridge(true);
        bridge.attach();
        assert!(bridge.detach());
        assert!(!bridge.detach());
        assert_eq!(log.borrow().clears, 1);
    }

    #[test]
    fn clear_now_playing_keeps_handlers() {
        let (mut bridge, log) = bridge(true);
        bridge.attach();
        bridge.clear_now_playing();
        assert_eq!(log.borrow().now_playing_clears, 0);

        bridge.publish(info(true, 0.0));
        bridge.clear_now_playing();
        bridge.clear_now_playing();
        assert_eq!(log.borrow().now_playing_clears, 1);
        assert_eq!(log.borrow().clears, 0);
        assert!(bridge.is_attached());

        // Same info is published again after a clear
        bridge.publish(info(true, 0.0));
        assert_eq!(log.borrow().published.len(), 2);
    }

    #[test]
    fn detach_after_publish_failure_still_clears_handlers() {
        let (mut bridge, log) = bridge(true);
        bridge.attach();
        log.borrow_mut().fail_publish = true;
        bridge.publish(info(true, 0.0));

        assert!(bridge.is_degraded());
        assert!(!bridge.is_attached());
        assert!(bridge.detach());
        assert!(!bridge.detach());
        assert_eq!(log.borrow().clears, 1);
    }

    #[test]
    fn media_actions_map_to_player_actions() {
        assert_eq!(MediaAction::SeekTo(30.0).player_action(), PlayerAction::Seek(30.0));
        assert_eq!(MediaAction::Toggle.player_action(), PlayerAction::TogglePlayPause);
        assert_eq!(MediaActionKind::PreviousTrack.as_str(), "previoustrack");
    }

    #[test]
    fn media_action_wire_format() {
        let action: MediaAction = serde_json::from_str(r#"{"action":"seekTo","seekTime":12.5}"#).unwrap();
        assert_eq!(action, MediaAction::SeekTo(12.5));
        let action: MediaAction = serde_json::from_str(r#"{"action":"next"}"#).unwrap();
        assert_eq!(action, MediaAction::Next);
    }
}
