//! Shared playback types

use serde::{Deserialize, Serialize};

/// User-level playback command
///
/// Keyboard shortcuts, OS media keys and UI buttons all resolve to one of
/// these before reaching the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PlayerAction {
    Play,
    Pause,
    TogglePlayPause,
    Next,
    Previous,
    ToggleMute,

    /// Pause and rewind to the start
    Stop,

    /// Seek to an absolute position in seconds
    Seek(f64),

    /// Set volume (0.0-1.0)
    SetVolume(f32),

    /// Raise volume by the configured step
    VolumeUp,

    /// Lower volume by the configured step
    VolumeDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wire_format() {
        let json = serde_json::to_string(&PlayerAction::Seek(42.0)).unwrap();
        assert_eq!(json, r#"{"type":"seek","value":42.0}"#);

        let action: PlayerAction = serde_json::from_str(r#"{"type":"togglePlayPause"}"#).unwrap();
        assert_eq!(action, PlayerAction::TogglePlayPause);
    }
}
