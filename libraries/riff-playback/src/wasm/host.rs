//! Host services implemented by JavaScript objects
//!
//! Each adapter wraps a plain JS object and calls its methods by name:
//!
//! | Adapter          | Methods                                                        |
//! |------------------|----------------------------------------------------------------|
//! | `JsAudioBackend` | `load(url, generation)`, `play(h)`, `pause(h)`, `seek(h, s)`,  |
//! |                  | `setVolume(h, v)`, `position(h)`, `duration(h)`, `unload(h)`   |
//! | `JsQueueStore`   | `getQueue()`, `setActiveId(id)`                                |
//! | `JsScheduler`    | `setInterval(ms)`, `clearInterval(id)`                         |
//! | `JsKeySource`    | `addListener()`, `removeListener(id)`                          |
//! | `JsMediaSession` | `setActionHandlers(names)`, `setNowPlaying(info)`,             |
//! |                  | `clearNowPlaying()`, `clear()`                                 |

use super::types::JsQueue;
use crate::engine::{AudioBackend, Generation, ResourceHandle};
use crate::error::{ResourceError, UnsupportedMediaSessionError};
use crate::input::{KeyEventSource, ListenerId};
use crate::media::{MediaActionKind, MediaSession, NowPlaying};
use crate::sampler::{Scheduler, TimerId};
use js_sys::{Array, Function, Reflect};
use riff_core::{QueueSnapshot, QueueStore, TrackId};
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{method} is not a function")))?;
    let args: Array = args.iter().collect();
    function.apply(target, &args)
}

/// Call and log failures; for methods whose result is not needed
fn call_logged(target: &JsValue, method: &str, args: &[JsValue]) -> Option<JsValue> {
    match call(target, method, args) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(method, error = ?e, "Host call failed");
            None
        }
    }
}

fn describe(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

fn handle_arg(handle: ResourceHandle) -> JsValue {
    JsValue::from_f64(handle.0 as f64)
}

/// Audio element wrapper
pub struct JsAudioBackend(pub JsValue);

impl AudioBackend for JsAudioBackend {
    fn load(&mut self, url: &str, generation: Generation) -> Result<ResourceHandle, ResourceError> {
        let args = [JsValue::from_str(url), JsValue::from_f64(generation.value() as f64)];
        let handle = call(&self.0, "load", &args).map_err(|e| ResourceError::new(url, describe(&e)))?;
        let handle = handle
            .as_f64()
            .ok_or_else(|| ResourceError::new(url, "load() did not return a numeric handle"))?;
        Ok(ResourceHandle(handle as u64))
    }

    fn play(&mut self, handle: ResourceHandle) {
        call_logged(&self.0, "play", &[handle_arg(handle)]);
    }

    fn pause(&mut self, handle: ResourceHandle) {
        call_logged(&self.0, "pause", &[handle_arg(handle)]);
    }

    fn seek(&mut self, handle: ResourceHandle, seconds: f64) {
        call_logged(&self.0, "seek", &[handle_arg(handle), JsValue::from_f64(seconds)]);
    }

    fn set_volume(&mut self, handle: ResourceHandle, volume: f32) {
        let args = [handle_arg(handle), JsValue::from_f64(f64::from(volume))];
        call_logged(&self.0, "setVolume", &args);
    }

    fn position(&self, handle: ResourceHandle) -> f64 {
        call_logged(&self.0, "position", &[handle_arg(handle)])
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self, handle: ResourceHandle) -> f64 {
        call_logged(&self.0, "duration", &[handle_arg(handle)])
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }

    fn unload(&mut self, handle: ResourceHandle) {
        call_logged(&self.0, "unload", &[handle_arg(handle)]);
    }
}

/// Queue store wrapper
pub struct JsQueueStore(pub JsValue);

impl QueueStore for JsQueueStore {
    fn snapshot(&self) -> QueueSnapshot {
        let Some(value) = call_logged(&self.0, "getQueue", &[]) else {
            return QueueSnapshot::default();
        };
        match serde_wasm_bindgen::from_value::<JsQueue>(value) {
            Ok(queue) => queue.into(),
            Err(e) => {
                warn!(error = %e, "getQueue() returned an unexpected shape");
                QueueSnapshot::default()
            }
        }
    }

    fn set_active_id(&mut self, id: TrackId) {
        call_logged(&self.0, "setActiveId", &[JsValue::from_str(id.as_str())]);
    }
}

/// `setInterval` wrapper
pub struct JsScheduler(pub JsValue);

impl Scheduler for JsScheduler {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = call_logged(&self.0, "setInterval", &[JsValue::from_f64(period.as_millis() as f64)])
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        TimerId(id as u64)
    }

    fn clear_interval(&mut self, id: TimerId) {
        call_logged(&self.0, "clearInterval", &[JsValue::from_f64(id.0 as f64)]);
    }
}

/// Document key listener wrapper
pub struct JsKeySource(pub JsValue);

impl KeyEventSource for JsKeySource {
    fn add_listener(&mut self) -> ListenerId {
        let id = call_logged(&self.0, "addListener", &[])
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        ListenerId(id as u64)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        call_logged(&self.0, "removeListener", &[JsValue::from_f64(id.0 as f64)]);
    }
}

/// `navigator.mediaSession` wrapper
pub struct JsMediaSession(pub JsValue);

impl MediaSession for JsMediaSession {
    fn set_action_handlers(&mut self, actions: &[MediaActionKind]) -> Result<(), UnsupportedMediaSessionError> {
        if self.0.is_undefined() || self.0.is_null() {
            return Err(UnsupportedMediaSessionError("no media session object".into()));
        }
        let names: Array = actions.iter().map(|action| JsValue::from_str(action.as_str())).collect();
        call(&self.0, "setActionHandlers", &[names.into()])
            .map(|_| ())
            .map_err(|e| UnsupportedMediaSessionError(describe(&e)))
    }

    fn set_now_playing(&mut self, info: &NowPlaying) -> Result<(), UnsupportedMediaSessionError> {
        let value = serde_wasm_bindgen::to_value(info).map_err(|e| UnsupportedMediaSessionError(e.to_string()))?;
        call(&self.0, "setNowPlaying", &[value])
            .map(|_| ())
            .map_err(|e| UnsupportedMediaSessionError(describe(&e)))
    }

    fn clear_now_playing(&mut self) {
        call_logged(&self.0, "clearNowPlaying", &[]);
    }

    fn clear(&mut self) {
        call_logged(&self.0, "clear", &[]);
    }
}
