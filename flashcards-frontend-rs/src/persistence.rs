use indexmap::IndexSet;
use stash::{KeyValueStore, KeyValueStoreExt as _, StashError};

pub(crate) const VISITED_CARDS_KEY: &str = "visitedCards";
pub(crate) const PLAYED_WORDS_KEY: &str = "playedWords";
pub(crate) const SPELLING_MODE_KEY: &str = "spellingMode";

/// What survives a reload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct StoredProgress {
    pub(crate) played_words: IndexSet<String>,
    pub(crate) spelling_mode: bool,
}

impl StoredProgress {
    /// Missing keys take their defaults. A value that is present but unreadable is an error.
    pub(crate) fn load(store: &dyn KeyValueStore) -> Result<Self, StashError> {
        let played_words = store
            .get_json::<IndexSet<String>>(PLAYED_WORDS_KEY)
            .inspect_err(|e| log::error!("Error reading played words: {e}"))?
            .unwrap_or_default();
        let spelling_mode = store
            .get_json::<bool>(SPELLING_MODE_KEY)
            .inspect_err(|e| log::error!("Error reading spelling mode: {e}"))?
            .unwrap_or_default();

        log::info!(
            "Loaded {} played words, spelling mode {}",
            played_words.len(),
            if spelling_mode { "on" } else { "off" }
        );
        Ok(Self {
            played_words,
            spelling_mode,
        })
    }
}

/// Persistence is best effort: a failed write is logged and the session carries on.
pub(crate) fn save_visited(store: &mut dyn KeyValueStore, visited: &IndexSet<usize>) {
    save(store, VISITED_CARDS_KEY, visited);
}

pub(crate) fn save_played_words(store: &mut dyn KeyValueStore, played_words: &IndexSet<String>) {
    save(store, PLAYED_WORDS_KEY, played_words);
}

pub(crate) fn save_spelling_mode(store: &mut dyn KeyValueStore, spelling_mode: bool) {
    save(store, SPELLING_MODE_KEY, &spelling_mode);
}

fn save<T: serde::Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = store.set_json(key, value) {
        log::warn!("Failed to persist {key}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash::MemoryStore;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let store = MemoryStore::new();
        assert_eq!(StoredProgress::load(&store).unwrap(), StoredProgress::default());
    }

    #[test]
    fn test_formats_match_browser_storage() {
        let mut store = MemoryStore::new();
        save_visited(&mut store, &IndexSet::from([0, 3, 1]));
        save_played_words(
            &mut store,
            &IndexSet::from(["cat".to_string(), "apple".to_string()]),
        );
        save_spelling_mode(&mut store, true);

        assert_eq!(
            store.get_item(VISITED_CARDS_KEY).unwrap().as_deref(),
            Some("[0,3,1]")
        );
        assert_eq!(
            store.get_item(PLAYED_WORDS_KEY).unwrap().as_deref(),
            Some(r#"["cat","apple"]"#)
        );
        assert_eq!(
            store.get_item(SPELLING_MODE_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_load_keeps_played_order() {
        let mut store = MemoryStore::new();
        store
            .set_item(PLAYED_WORDS_KEY, r#"["zebra","apple","mouse"]"#)
            .unwrap();
        store.set_item(SPELLING_MODE_KEY, "true").unwrap();

        let progress = StoredProgress::load(&store).unwrap();
        assert_eq!(
            progress.played_words.into_iter().collect::<Vec<_>>(),
            vec!["zebra", "apple", "mouse"]
        );
        assert!(progress.spelling_mode);
    }

    #[test]
    fn test_corrupt_spelling_mode_is_an_error() {
        let mut store = MemoryStore::new();
        store.set_item(SPELLING_MODE_KEY, "maybe").unwrap();
        assert!(matches!(
            StoredProgress::load(&store),
            Err(StashError::Corrupt { .. })
        ));
    }
}
