use taskdesk_core::KeyValueStore;
use tracing::warn;
use web_sys::Storage;

/// `window.localStorage`. Unavailable storage (private mode, sandboxed frames)
/// behaves as empty and drops writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            warn!(key, "localStorage unavailable, value not persisted");
            return;
        };
        if storage.set_item(key, value).is_err() {
            warn!(key, "failed to write localStorage");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
