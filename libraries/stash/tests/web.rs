//! Runs against a real browser: `wasm-pack test --headless --firefox libraries/stash --features web`
#![cfg(all(target_arch = "wasm32", feature = "web"))]

use stash::web::LocalStorage;
use stash::{KeyValueStore, KeyValueStoreExt};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trips_json() {
    let mut storage = LocalStorage::new().unwrap();
    storage.set_json("stash-test-played", &["cat", "dog"]).unwrap();

    let played: Option<Vec<String>> = storage.get_json("stash-test-played").unwrap();
    assert_eq!(played, Some(vec!["cat".to_string(), "dog".to_string()]));

    storage.remove_item("stash-test-played").unwrap();
    assert_eq!(storage.get_item("stash-test-played").unwrap(), None);
}

#[wasm_bindgen_test]
fn local_storage_reports_corrupt_values() {
    let mut storage = LocalStorage::new().unwrap();
    storage.set_item("stash-test-corrupt", "{not json").unwrap();

    assert!(storage.get_json::<bool>("stash-test-corrupt").is_err());
    storage.remove_item("stash-test-corrupt").unwrap();
}
