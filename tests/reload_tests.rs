//! Configuration reload for a running server state.

mod common;

use common::Harness;
use std::io::Write;
use std::sync::Arc;
use study_companion::{AppState, ConfigManager};
use tempfile::NamedTempFile;

const KEY_ENV: &str = "STUDY_COMPANION_RELOAD_TEST_KEY";

fn config_text(history_window: usize) -> String {
    format!(
        r#"
[providers.google]
type = "gemini"
api_key_env = "{KEY_ENV}"

[models.flash]
provider = "google"
model = "gemini-1.5-flash"

[agents.motivation]
model = "flash"
[agents.teaching]
model = "flash"
[agents.router]
model = "flash"

[chat]
history_window = {history_window}
"#
    )
}

fn write_config(file: &mut NamedTempFile, content: &str) {
    let handle = file.as_file_mut();
    handle.set_len(0).unwrap();
    std::io::Seek::rewind(handle).unwrap();
    handle.write_all(content.as_bytes()).unwrap();
    handle.flush().unwrap();
}

fn state_for(file: &NamedTempFile) -> AppState {
    std::env::set_var(KEY_ENV, "test-key");
    let manager = ConfigManager::new(file.path()).unwrap();
    AppState::new(manager, Harness::new().companion())
}

#[tokio::test]
async fn test_failed_reload_keeps_running_state() {
    let mut file = NamedTempFile::new().unwrap();
    write_config(&mut file, &config_text(6));
    let state = state_for(&file);
    let before = state.companion.load_full();

    write_config(&mut file, "this is [not toml");

    assert!(state.reload().await.is_err());
    assert_eq!(state.config_manager.config().chat.history_window, 6);
    assert!(Arc::ptr_eq(&before, &state.companion.load_full()));
}

#[cfg(feature = "openai")]
#[tokio::test]
async fn test_reload_rebuilds_agents_from_new_file() {
    let mut file = NamedTempFile::new().unwrap();
    write_config(&mut file, &config_text(6));
    let state = state_for(&file);
    let before = state.companion.load_full();

    write_config(&mut file, &config_text(10));

    state.reload().await.unwrap();
    assert_eq!(state.config_manager.config().chat.history_window, 10);

    let after = state.companion.load_full();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.history_window(), 10);
}
