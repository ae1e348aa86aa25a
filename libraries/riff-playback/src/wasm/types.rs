//! WASM-compatible type definitions

use riff_core::{QueueSnapshot, TrackId, TrackMetadata};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Track metadata as passed from JavaScript
///
/// Uses camelCase field names and plain strings for ids.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[wasm_bindgen]
pub struct WasmTrack {
    id: String,
    title: String,
    artist: String,
    album: Option<String>,
    artwork_url: Option<String>,
}

#[wasm_bindgen]
impl WasmTrack {
    #[wasm_bindgen(constructor)]
    pub fn new(id: String, title: String, artist: String) -> Self {
        Self {
            id,
            title,
            artist,
            album: None,
            artwork_url: None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.title.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn artist(&self) -> String {
        self.artist.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn album(&self) -> Option<String> {
        self.album.clone()
    }

    #[wasm_bindgen(getter, js_name = artworkUrl)]
    pub fn artwork_url(&self) -> Option<String> {
        self.artwork_url.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_album(&mut self, album: Option<String>) {
        self.album = album;
    }

    #[wasm_bindgen(setter, js_name = artworkUrl)]
    pub fn set_artwork_url(&mut self, artwork_url: Option<String>) {
        self.artwork_url = artwork_url;
    }
}

impl From<WasmTrack> for TrackMetadata {
    fn from(track: WasmTrack) -> Self {
        Self {
            id: TrackId::new(track.id),
            title: track.title,
            artist: track.artist,
            album: track.album,
            artwork_url: track.artwork_url,
        }
    }
}

/// Shape returned by the JavaScript queue store's `getQueue()`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsQueue {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub active_id: Option<String>,
}

impl From<JsQueue> for QueueSnapshot {
    fn from(queue: JsQueue) -> Self {
        QueueSnapshot::new(
            queue.ids.into_iter().map(TrackId::new).collect(),
            queue.active_id.map(TrackId::new),
        )
    }
}
