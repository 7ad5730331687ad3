//! `localStorage` backend

use crate::{KeyValueStore, StashError};

/// The browser's `window.localStorage`
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Fails with [`StashError::Unavailable`] outside a window context, or when the browser blocks storage
    /// (for example, some private browsing modes).
    pub fn new() -> Result<Self, StashError> {
        let storage = web_sys::window()
            .ok_or(StashError::Unavailable)?
            .local_storage()
            .map_err(|e| StashError::Backend(format!("{e:?}")))?
            .ok_or(StashError::Unavailable)
            .inspect_err(|_| log::warn!("localStorage is not available"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StashError> {
        self.storage
            .get_item(key)
            .map_err(|e| StashError::Backend(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StashError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StashError::Backend(format!("{e:?}")))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StashError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StashError::Backend(format!("{e:?}")))
    }
}
