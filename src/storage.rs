//! Client-side preference persistence

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Read a flag written as `"true"` / `"false"`; anything else is `false`
pub fn read_flag(store: &dyn PreferenceStore, key: &str) -> bool {
    store.get(key).as_deref() == Some("true")
}

pub fn write_flag(store: &dyn PreferenceStore, key: &str, value: bool) -> Result<()> {
    store.set(key, if value { "true" } else { "false" })
}

/// In-memory store for headless hosts and tests
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::PreferenceStore;
    use crate::error::{Result, ShellError};

    /// `window.localStorage`; looked up per call since it can be revoked
    #[derive(Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage(&self) -> Result<web_sys::Storage> {
            let window = web_sys::window().ok_or(ShellError::NoWindow)?;
            window
                .local_storage()?
                .ok_or_else(|| ShellError::Storage("localStorage unavailable".to_string()))
        }
    }

    impl PreferenceStore for LocalStorageStore {
        fn get(&self, key: &str) -> Option<String> {
            match self.storage() {
                Ok(storage) => storage.get_item(key).ok().flatten(),
                Err(e) => {
                    tracing::debug!("preference read skipped: {}", e);
                    None
                }
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.storage()?
                .set_item(key, value)
                .map_err(|e| ShellError::Storage(format!("{:?}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_round_values() {
        let store = MemoryStore::new();
        assert!(!read_flag(&store, "sidebarCollapsed"));

        write_flag(&store, "sidebarCollapsed", true).unwrap();
        assert_eq!(store.get("sidebarCollapsed").as_deref(), Some("true"));
        assert!(read_flag(&store, "sidebarCollapsed"));

        write_flag(&store, "sidebarCollapsed", false).unwrap();
        assert_eq!(store.get("sidebarCollapsed").as_deref(), Some("false"));
    }

    #[test]
    fn test_unexpected_value_reads_false() {
        let store = MemoryStore::new();
        store.set("sidebarCollapsed", "TRUE").unwrap();
        assert!(!read_flag(&store, "sidebarCollapsed"));
        store.set("sidebarCollapsed", "1").unwrap();
        assert!(!read_flag(&store, "sidebarCollapsed"));
    }
}
