//! This is a library for best-effort local persistence of small values.
//! It was created for a flash card game, so it doesn't include much that was not needed for that project.
//!
//! Storage model:
//! 1. A store maps string keys to string values, like the browser's `localStorage`.
//! 2. Typed values are stored as JSON through [`KeyValueStoreExt`].
//! 3. There is no versioning or migration. A missing key reads as `None`, a value that doesn't parse is an error.

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, thiserror::Error)]
pub enum StashError {
    #[error("Storage is not available in this environment")]
    Unavailable,

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Stored value for `{key}` is corrupt")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode value for `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A string-valued key/value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StashError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StashError>;

    fn remove_item(&mut self, key: &str) -> Result<(), StashError>;
}

/// JSON helpers for any [`KeyValueStore`]
pub trait KeyValueStoreExt: KeyValueStore {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StashError> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StashError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StashError> {
        let raw = serde_json::to_string(value).map_err(|source| StashError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set_item(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StashError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StashError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StashError> {
        (**self).remove_item(key)
    }
}

/// An in-memory store.
///
/// Clones share the same contents, so a clone kept aside survives the owner being dropped. That is how
/// a page reload is simulated in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StashError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StashError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StashError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_json::<bool>("spellingMode").unwrap(), None);
    }

    #[test]
    fn test_json_values_are_stored_as_text() {
        let mut store = MemoryStore::new();
        store.set_json("playedWords", &["cat", "dog"]).unwrap();
        store.set_json("spellingMode", &true).unwrap();

        assert_eq!(
            store.get_item("playedWords").unwrap().as_deref(),
            Some(r#"["cat","dog"]"#)
        );
        assert_eq!(
            store.get_json::<Vec<String>>("playedWords").unwrap(),
            Some(vec!["cat".to_string(), "dog".to_string()])
        );
        assert_eq!(store.get_json::<bool>("spellingMode").unwrap(), Some(true));
    }

    #[test]
    fn test_corrupt_value() {
        let mut store = MemoryStore::new();
        store.set_item("visitedCards", "[1, 2,").unwrap();

        let err = store.get_json::<Vec<usize>>("visitedCards").unwrap_err();
        assert!(matches!(err, StashError::Corrupt { ref key, .. } if key == "visitedCards"));
    }

    #[test]
    fn test_clones_share_contents() {
        let mut store = MemoryStore::new();
        let kept = store.clone();
        store.set_item("spellingMode", "false").unwrap();
        drop(store);

        assert_eq!(kept.get_item("spellingMode").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_remove_item() {
        let mut store = MemoryStore::new();
        store.set_item("spellingMode", "true").unwrap();
        store.remove_item("spellingMode").unwrap();
        assert_eq!(store.get_item("spellingMode").unwrap(), None);
    }

    #[test]
    fn test_boxed_store() {
        let shared = MemoryStore::new();
        let mut boxed: Box<dyn KeyValueStore> = Box::new(shared.clone());
        boxed.set_json("spellingMode", &true).unwrap();
        assert_eq!(shared.get_json::<bool>("spellingMode").unwrap(), Some(true));
    }
}
