//! LocalStorage backend (WASM only)

use web_sys::Storage;

use super::ScoreStore;

/// Reads and writes `window.localStorage`
///
/// Storage can be unavailable (privacy mode, sandboxed iframes). In that
/// case reads return `None` and writes are dropped.
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        if storage().is_none() {
            log::warn!("LocalStorage unavailable - scores will not persist");
        }
        Self
    }
}

fn storage() -> Option<Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

impl ScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        storage()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to persist {}", key);
            }
        }
    }
}
