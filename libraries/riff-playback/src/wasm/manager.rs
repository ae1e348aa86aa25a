//! WASM-compatible PlayerController wrapper

use super::host::{JsAudioBackend, JsKeySource, JsMediaSession, JsQueueStore, JsScheduler};
use super::types::WasmTrack;
use crate::engine::EngineEvent;
use crate::input::{FocusTarget, KeyEvent};
use crate::media::MediaAction;
use crate::sampler::TimerId;
use crate::{ControllerConfig, PlayerController, PlayerHost};
use wasm_bindgen::prelude::*;

/// WASM-compatible player controller
///
/// JavaScript drives it with host callbacks and reads changes back with
/// `drainEvents()` after each call.
#[wasm_bindgen]
pub struct WasmPlayerController {
    inner: PlayerController,
}

#[wasm_bindgen]
impl WasmPlayerController {
    /// Mount a controller on JS host objects
    ///
    /// `config` may be `undefined` for defaults; `mediaSession` may be
    /// `undefined` when the browser has none.
    #[wasm_bindgen(constructor)]
    pub fn new(
        backend: JsValue,
        queue: JsValue,
        scheduler: JsValue,
        keys: JsValue,
        media_session: JsValue,
        config: JsValue,
    ) -> Result<WasmPlayerController, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let config: ControllerConfig = if config.is_undefined() || config.is_null() {
            ControllerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let host = PlayerHost::new(
            Box::new(JsAudioBackend(backend)),
            Box::new(JsQueueStore(queue)),
            Box::new(JsScheduler(scheduler)),
            Box::new(JsKeySource(keys)),
        )
        .with_media_session(Box::new(JsMediaSession(media_session)));

        Ok(Self {
            inner: PlayerController::mount(config, host),
        })
    }

    // ===== Playback Control =====

    pub fn play(&mut self) {
        self.inner.play();
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) {
        self.inner.toggle_play_pause();
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    pub fn next(&mut self) {
        self.inner.next();
    }

    pub fn prev(&mut self) {
        self.inner.prev();
    }

    /// Seek to position in seconds
    pub fn seek(&mut self, seconds: f64) {
        self.inner.seek(seconds);
    }

    // ===== Volume Control =====

    /// Set volume (0.0-1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        self.inner.set_volume(volume);
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
    }

    // ===== Host callbacks =====

    /// Load the resource for a `trackRequested` event
    #[wasm_bindgen(js_name = loadTrack)]
    pub fn load_track(&mut self, url: &str, track: WasmTrack) {
        self.inner.load_track(url, track.into());
    }

    /// Forward an audio callback (`{ generation, type, ... }`)
    #[wasm_bindgen(js_name = handleEngineEvent)]
    pub fn handle_engine_event(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: EngineEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse engine event: {}", e)))?;
        self.inner.handle_engine_event(event);
        Ok(())
    }

    /// Forward a `setInterval` tick
    #[wasm_bindgen(js_name = handleTimer)]
    pub fn handle_timer(&mut self, id: f64) {
        self.inner.handle_timer(TimerId(id as u64));
    }

    /// Forward a keydown; returns whether to call `preventDefault()`
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, code: &str, in_text_input: bool) -> bool {
        let focus = if in_text_input {
            FocusTarget::TextInput
        } else {
            FocusTarget::Document
        };
        self.inner.handle_key(&KeyEvent::new(code, focus)).prevent_default
    }

    /// Forward a media session action (`{ action, seekTime? }`)
    #[wasm_bindgen(js_name = handleMediaAction)]
    pub fn handle_media_action(&mut self, action: JsValue) -> Result<(), JsValue> {
        let action: MediaAction = serde_wasm_bindgen::from_value(action)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse media action: {}", e)))?;
        self.inner.handle_media_action(action);
        Ok(())
    }

    /// Call after mutating the queue store
    #[wasm_bindgen(js_name = syncQueue)]
    pub fn sync_queue(&mut self) {
        self.inner.sync_queue();
    }

    // ===== State Queries =====

    /// Pending events as an array of `{ type, ... }` objects
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> JsValue {
        let events = self.inner.drain_events();
        serde_wasm_bindgen::to_value(&events).unwrap_or(JsValue::NULL)
    }

    /// Transport snapshot
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.transport().snapshot()).unwrap_or(JsValue::NULL)
    }

    /// Id of the loaded track
    #[wasm_bindgen(js_name = currentTrackId)]
    pub fn current_track_id(&self) -> Option<String> {
        self.inner
            .current_track()
            .map(|track| track.id.as_str().to_string())
    }

    /// Release the audio resource, timer and listeners
    pub fn unmount(&mut self) {
        self.inner.unmount();
    }
}
