//! Configuration loading tests

use riff_playback::{ControllerConfig, PlayerError, ShortcutAction};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_without_file() {
    let config = ControllerConfig::load_with_prefix(None, "RIFF_TEST_DEFAULTS").unwrap();
    assert_eq!(config, ControllerConfig::default());
}

#[test]
fn test_file_overrides_defaults() {
    let file = toml_file(
        r#"
sample_interval_ms = 250
initial_volume = 0.6
autoplay = false
previous_restart_threshold_secs = 3.0

[[keymap]]
code = "KeyK"
action = "play_pause"

[[keymap]]
code = "KeyL"
action = "next"
enabled = false
"#,
    );

    let config = ControllerConfig::load_with_prefix(Some(file.path()), "RIFF_TEST_FILE").unwrap();
    assert_eq!(config.sample_interval(), Duration::from_millis(250));
    assert_eq!(config.initial_volume, 0.6);
    assert!(!config.autoplay);
    assert_eq!(config.volume_step, 0.1);
    assert_eq!(config.previous_restart_threshold_secs, Some(3.0));
    assert_eq!(config.keymap.lookup("KeyK"), Some(ShortcutAction::PlayPause));
    assert_eq!(config.keymap.lookup("KeyL"), None);
    assert_eq!(config.keymap.lookup("Space"), None);
}

#[test]
fn test_environment_overrides_file() {
    let file = toml_file("sample_interval_ms = 250\n");
    std::env::set_var("RIFF_TEST_ENV_SAMPLE_INTERVAL_MS", "1000");

    let config = ControllerConfig::load_with_prefix(Some(file.path()), "RIFF_TEST_ENV").unwrap();
    std::env::remove_var("RIFF_TEST_ENV_SAMPLE_INTERVAL_MS");

    assert_eq!(config.sample_interval_ms, 1000);
}

#[test]
fn test_invalid_values_are_rejected() {
    let file = toml_file("sample_interval_ms = 0\n");
    let err = ControllerConfig::load_with_prefix(Some(file.path()), "RIFF_TEST_INVALID").unwrap_err();
    assert!(matches!(err, PlayerError::Config(_)));
    assert!(err.to_string().contains("sample_interval_ms"));
}

#[test]
fn test_missing_file_is_an_error() {
    let result = ControllerConfig::load_with_prefix(Some(Path::new("/nonexistent/riff.toml")), "RIFF_TEST_MISSING");
    assert!(matches!(result, Err(PlayerError::Config(_))));
}
