//! WASM bindings for riff-playback
//!
//! Exposes the player controller to the browser. JavaScript supplies the
//! host services as plain objects (duck-typed) and forwards audio element
//! callbacks, `setInterval` ticks, key presses and media session actions.

pub mod host;
pub mod manager;
pub mod types;

pub use manager::WasmPlayerController;
pub use types::WasmTrack;
