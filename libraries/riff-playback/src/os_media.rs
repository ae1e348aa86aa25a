//! Desktop media session backed by `souvlaki`
//!
//! MPRIS on Linux, Now Playing on macOS. Control events are forwarded over a
//! channel; the host drains it and calls `handle_media_action` on the
//! controller thread.

use crate::error::UnsupportedMediaSessionError;
use crate::media::{MediaAction, MediaActionKind, MediaSession, NowPlaying};
use souvlaki::{
    MediaControlEvent, MediaControls, MediaMetadata, MediaPlayback, MediaPosition, PlatformConfig,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::warn;

/// Media session for desktop platforms
pub struct SouvlakiMediaSession {
    display_name: String,
    dbus_name: String,
    controls: Option<MediaControls>,
    actions: Sender<MediaAction>,
}

impl SouvlakiMediaSession {
    /// Create a session and the receiver for its control events
    pub fn new(display_name: impl Into<String>, dbus_name: impl Into<String>) -> (Self, Receiver<MediaAction>) {
        let (tx, rx) = mpsc::channel();
        let session = Self {
            display_name: display_name.into(),
            dbus_name: dbus_name.into(),
            controls: None,
            actions: tx,
        };
        (session, rx)
    }

    /// Map a platform control event; `None` for events the player ignores
    pub fn map_control_event(event: MediaControlEvent) -> Option<MediaAction> {
        match event {
            MediaControlEvent::Play => Some(MediaAction::Play),
            MediaControlEvent::Pause => Some(MediaAction::Pause),
            MediaControlEvent::Toggle => Some(MediaAction::Toggle),
            MediaControlEvent::Next => Some(MediaAction::Next),
            MediaControlEvent::Previous => Some(MediaAction::Previous),
            MediaControlEvent::Stop => Some(MediaAction::Stop),
            MediaControlEvent::SetPosition(MediaPosition(position)) => {
                Some(MediaAction::SeekTo(position.as_secs_f64()))
            }
            _ => None,
        }
    }

    fn create_controls(&self) -> Result<MediaControls, UnsupportedMediaSessionError> {
        let mut controls = MediaControls::new(PlatformConfig {
            display_name: &self.display_name,
            dbus_name: &self.dbus_name,
            hwnd: None,
        })
        .map_err(|e| UnsupportedMediaSessionError(format!("{e:?}")))?;

        let tx = self.actions.clone();
        controls
            .attach(move |event| {
                if let Some(action) = Self::map_control_event(event) {
                    let _ = tx.send(action);
                }
            })
            .map_err(|e| UnsupportedMediaSessionError(format!("{e:?}")))?;

        Ok(controls)
    }
}

impl MediaSession for SouvlakiMediaSession {
    fn set_action_handlers(&mut self, _actions: &[MediaActionKind]) -> Result<(), UnsupportedMediaSessionError> {
        // The platform backends deliver every control; unmapped ones are dropped
        if self.controls.is_none() {
            self.controls = Some(self.create_controls()?);
        }
        Ok(())
    }

    fn set_now_playing(&mut self, info: &NowPlaying) -> Result<(), UnsupportedMediaSessionError> {
        let Some(controls) = self.controls.as_mut() else {
            return Err(UnsupportedMediaSessionError("media controls not attached".into()));
        };

        let duration = (info.duration > 0.0).then(|| Duration::from_secs_f64(info.duration));
        controls
            .set_metadata(MediaMetadata {
                title: Some(info.title.as_str()),
                artist: Some(info.artist.as_str()),
                album: info.album.as_deref(),
                cover_url: info.artwork_url.as_deref(),
                duration,
            })
            .map_err(|e| UnsupportedMediaSessionError(format!("{e:?}")))?;

        let progress = Some(MediaPosition(Duration::from_secs_f64(info.position.max(0.0))));
        let playback = if info.is_playing {
            MediaPlayback::Playing { progress }
        } else {
            MediaPlayback::Paused { progress }
        };
        controls
            .set_playback(playback)
            .map_err(|e| UnsupportedMediaSessionError(format!("{e:?}")))
    }

    fn clear_now_playing(&mut self) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        if let Err(e) = controls.set_playback(MediaPlayback::Stopped) {
            warn!(error = ?e, "Failed to publish stopped state");
        }
    }

    fn clear(&mut self) {
        let Some(mut controls) = self.controls.take() else {
            return;
        };
        if let Err(e) = controls.set_playback(MediaPlayback::Stopped) {
            warn!(error = ?e, "Failed to publish stopped state");
        }
        if let Err(e) = controls.detach() {
            warn!(error = ?e, "Failed to detach media controls");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_transport_controls() {
        assert_eq!(
            SouvlakiMediaSession::map_control_event(MediaControlEvent::Toggle),
            Some(MediaAction::Toggle)
        );
        assert_eq!(
            SouvlakiMediaSession::map_control_event(MediaControlEvent::SetPosition(MediaPosition(
                Duration::from_millis(50_000)
            ))),
            Some(MediaAction::SeekTo(50.0))
        );
        assert_eq!(SouvlakiMediaSession::map_control_event(MediaControlEvent::Quit), None);
    }
}
