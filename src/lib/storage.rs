//! Durable key-value persistence behind a failure-safe contract. The session
//! store only ever sees the trait: reads return `None` when storage is
//! unavailable or the key is missing, and writes that fail are dropped after
//! logging. In-memory session state stays authoritative either way.

/// String-valued key-value durability contract. Implementations must never
/// panic or surface storage failures to callers.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `localStorage`-backed store. Private browsing modes and quota limits make
/// every call fallible, so each one degrades silently and logs for diagnostics.
#[cfg(target_arch = "wasm32")]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn local_storage() -> Option<web_sys::Storage> {
        match web_sys::window().map(|window| window.local_storage()) {
            Some(Ok(Some(storage))) => Some(storage),
            _ => {
                leptos::logging::warn!("local storage is unavailable");
                None
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::local_storage().and_then(|storage| storage.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::local_storage() {
            if storage.set_item(key, value).is_err() {
                leptos::logging::warn!("dropped write for key {key:?}");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local_storage() {
            if storage.remove_item(key).is_err() {
                leptos::logging::warn!("failed to remove key {key:?}");
            }
        }
    }
}

/// In-memory store used by native unit tests.
#[cfg(test)]
pub struct MemoryStore {
    entries: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: std::cell::RefCell::new(std::collections::HashMap::new()),
        }
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryStore};

    #[test]
    fn memory_store_round_trips_entries() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token"), None);

        store.set("token", "abc");
        assert_eq!(store.get("token"), Some("abc".to_string()));

        store.remove("token");
        assert_eq!(store.get("token"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = MemoryStore::with_entries(&[("user", "{}")]);
        store.remove("user");
        store.remove("user");
        assert_eq!(store.get("user"), None);
    }
}
