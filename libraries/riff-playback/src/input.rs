//! Keyboard shortcuts
//!
//! Maps host key events onto [`PlayerAction`]s. The host delivers raw key
//! codes (`KeyboardEvent.code` in a browser) together with where focus was,
//! and applies `prevent_default` from the returned [`KeyOutcome`].

use crate::types::PlayerAction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Action a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    /// Play or pause playback
    PlayPause,
    /// Skip to next track
    Next,
    /// Skip to previous track
    Previous,
    /// Increase volume
    VolumeUp,
    /// Decrease volume
    VolumeDown,
    /// Toggle mute
    Mute,
}

impl ShortcutAction {
    /// Stable string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayPause => "play_pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::Mute => "mute",
        }
    }

    /// Controller action this shortcut triggers
    pub fn player_action(&self) -> PlayerAction {
        match self {
            Self::PlayPause => PlayerAction::TogglePlayPause,
            Self::Next => PlayerAction::Next,
            Self::Previous => PlayerAction::Previous,
            Self::VolumeUp => PlayerAction::VolumeUp,
            Self::VolumeDown => PlayerAction::VolumeDown,
            Self::Mute => PlayerAction::ToggleMute,
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play_pause" => Ok(Self::PlayPause),
            "next" => Ok(Self::Next),
            "previous" => Ok(Self::Previous),
            "volume_up" => Ok(Self::VolumeUp),
            "volume_down" => Ok(Self::VolumeDown),
            "mute" => Ok(Self::Mute),
            other => Err(format!("Unknown shortcut action: {other}")),
        }
    }
}

/// Key code bound to an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Physical key code, e.g. `Space` or `ArrowRight`
    pub code: String,
    pub action: ShortcutAction,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl KeyBinding {
    pub fn new(code: impl Into<String>, action: ShortcutAction) -> Self {
        Self {
            code: code.into(),
            action,
            enabled: true,
        }
    }
}

/// Ordered set of key bindings
///
/// The first enabled binding for a code wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn new(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    /// Action bound to `code`, if any
    pub fn lookup(&self, code: &str) -> Option<ShortcutAction> {
        self.bindings
            .iter()
            .find(|binding| binding.enabled && binding.code == code)
            .map(|binding| binding.action)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }
}

impl Default for Keymap {
    /// Space toggles playback, arrows navigate, M mutes
    fn default() -> Self {
        Self::new(vec![
            KeyBinding::new("Space", ShortcutAction::PlayPause),
            KeyBinding::new("ArrowRight", ShortcutAction::Next),
            KeyBinding::new("ArrowLeft", ShortcutAction::Previous),
            KeyBinding::new("KeyM", ShortcutAction::Mute),
        ])
    }
}

/// Where keyboard focus was when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusTarget {
    #[default]
    Document,

    /// Text entry (input, textarea, contenteditable)
    TextInput,
}

/// Key press delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: String,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(code: impl Into<String>, focus: FocusTarget) -> Self {
        Self {
            code: code.into(),
            focus,
        }
    }
}

/// Result of dispatching a key event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyOutcome {
    pub action: Option<PlayerAction>,

    /// Host should suppress the default browser behaviour
    pub prevent_default: bool,
}

impl KeyOutcome {
    /// Event not handled
    pub fn ignored() -> Self {
        Self::default()
    }
}

/// Host keyboard listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(pub u64);

/// Host keyboard event source
pub trait KeyEventSource {
    /// Register the document-level listener
    fn add_listener(&mut self) -> ListenerId;

    /// Remove a listener previously returned by `add_listener`
    fn remove_listener(&mut self, id: ListenerId);
}

/// Routes key events to player actions while attached
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    keymap: Keymap,
    listener: Option<ListenerId>,
}

impl InputDispatcher {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            listener: None,
        }
    }

    /// Register with the host; no-op if already attached
    pub fn attach(&mut self, source: &mut dyn KeyEventSource) {
        if self.listener.is_some() {
            return;
        }
        let id = source.add_listener();
        debug!(listener = id.0, "Keyboard listener attached");
        self.listener = Some(id);
    }

    /// Unregister from the host; returns false if not attached
    pub fn detach(&mut self, source: &mut dyn KeyEventSource) -> bool {
        match self.listener.take() {
            Some(id) => {
                source.remove_listener(id);
                debug!(listener = id.0, "Keyboard listener detached");
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Resolve a key event
    ///
    /// Nothing fires while detached or while focus is in a text input, so
    /// typing a space into a search box never toggles playback.
    pub fn dispatch(&self, event: &KeyEvent) -> KeyOutcome {
        if self.listener.is_none() || event.focus == FocusTarget::TextInput {
            return KeyOutcome::ignored();
        }
        let Some(shortcut) = self.keymap.lookup(&event.code) else {
            return KeyOutcome::ignored();
        };
        trace!(code = %event.code, action = %shortcut, "Shortcut");
        KeyOutcome {
            action: Some(shortcut.player_action()),
            // Space would otherwise scroll the page
            prevent_default: event.code == "Space",
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(Keymap::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Listeners {
        next: u64,
        active: Vec<ListenerId>,
    }

    impl KeyEventSource for Listeners {
        fn add_listener(&mut self) -> ListenerId {
            self.next += 1;
            let id = ListenerId(self.next);
            self.active.push(id);
            id
        }

        fn remove_listener(&mut self, id: ListenerId) {
            self.active.retain(|active| *active != id);
        }
    }

    fn attached() -> (InputDispatcher, Listeners) {
        let mut source = Listeners::default();
        let mut dispatcher = InputDispatcher::default();
        dispatcher.attach(&mut source);
        (dispatcher, source)
    }

    #[test]
    fn space_toggles_and_prevents_scroll() {
        let (dispatcher, _source) = attached();
        let outcome = dispatcher.dispatch(&KeyEvent::new("Space", FocusTarget::Document));
        assert_eq!(outcome.action, Some(PlayerAction::TogglePlayPause));
        assert!(outcome.prevent_default);
    }

    #[test]
    fn arrows_navigate_without_prevent_default() {
        let (dispatcher, _source) = attached();
        let right = dispatcher.dispatch(&KeyEvent::new("ArrowRight", FocusTarget::Document));
        let left = dispatcher.dispatch(&KeyEvent::new("ArrowLeft", FocusTarget::Document));
        assert_eq!(right.action, Some(PlayerAction::Next));
        assert_eq!(left.action, Some(PlayerAction::Previous));
        assert!(!right.prevent_default);
    }

    #[test]
    fn text_input_focus_suppresses_everything() {
        let (dispatcher, _source) = attached();
        for code in ["Space", "ArrowRight", "ArrowLeft", "KeyM"] {
            let outcome = dispatcher.dispatch(&KeyEvent::new(code, FocusTarget::TextInput));
            assert_eq!(outcome, KeyOutcome::ignored(), "{code}");
        }
    }

    #[test]
    fn unbound_and_disabled_keys_are_ignored() {
        let mut keymap = Keymap::default();
        keymap.bindings.push(KeyBinding {
            code: "KeyN".into(),
            action: ShortcutAction::Next,
            enabled: false,
        });
        let mut source = Listeners::default();
        let mut dispatcher = InputDispatcher::new(keymap);
        dispatcher.attach(&mut source);

        assert_eq!(dispatcher.dispatch(&KeyEvent::new("KeyQ", FocusTarget::Document)).action, None);
        assert_eq!(dispatcher.dispatch(&KeyEvent::new("KeyN", FocusTarget::Document)).action, None);
    }

    #[test]
    fn attach_is_idempotent_and_detach_stops_dispatch() {
        let (mut dispatcher, mut source) = attached();
        dispatcher.attach(&mut source);
        assert_eq!(source.active.len(), 1);

        assert!(dispatcher.detach(&mut source));
        assert!(!dispatcher.detach(&mut source));
        assert!(source.active.is_empty());

        let outcome = dispatcher.dispatch(&KeyEvent::new("Space", FocusTarget::Document));
        assert_eq!(outcome, KeyOutcome::ignored());
    }

    #[test]
    fn shortcut_action_string_round_trip() {
        for action in [
            ShortcutAction::PlayPause,
            ShortcutAction::Next,
            ShortcutAction::Previous,
            ShortcutAction::VolumeUp,
            ShortcutAction::VolumeDown,
            ShortcutAction::Mute,
        ] {
            assert_eq!(action.as_str().parse::<ShortcutAction>(), Ok(action));
        }
        assert!("toggle_shuffle".parse::<ShortcutAction>().is_err());
    }
}
