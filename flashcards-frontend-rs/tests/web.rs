//! Runs against a real browser: `wasm-pack test --headless --firefox flashcards-frontend-rs`
#![cfg(target_arch = "wasm32")]

use flashcards_frontend_rs::{FlashCardGame, SessionConfig};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const CARDS: &str = r#"[
    { "word": "cat", "image": "/cat.png" },
    { "word": "dog", "image": "/dog.png" }
]"#;

#[wasm_bindgen_test]
fn test_game_starts_and_navigates() {
    let on_change = js_sys::Function::new_no_args("");
    let config = SessionConfig {
        seed: Some(1),
        ..SessionConfig::default()
    };
    let game = FlashCardGame::new(CARDS, Some(config), on_change).unwrap();
    assert_eq!(game.snapshot().deck_len, 2);

    game.next();
    let snapshot = game.snapshot();
    assert_eq!(snapshot.position, 1);
    assert_eq!(snapshot.visited_count, 2);
    assert_eq!(snapshot.progress_percent, 100.0);

    game.destroy();
}

#[wasm_bindgen_test]
fn test_bad_flashcard_json_is_rejected() {
    let on_change = js_sys::Function::new_no_args("");
    let error = FlashCardGame::new("[]", None, on_change).err().unwrap();
    assert!(error.as_string().unwrap().contains("empty"));
}

#[wasm_bindgen_test]
fn test_destroyed_game_ignores_input() {
    let on_change = js_sys::Function::new_no_args("");
    let config = SessionConfig {
        seed: Some(1),
        ..SessionConfig::default()
    };
    let game = FlashCardGame::new(CARDS, Some(config), on_change).unwrap();
    game.toggle_spelling_mode();
    game.destroy();

    game.next();
    game.speak();
    let snapshot = game.snapshot();
    assert_eq!(snapshot.position, 0);
    assert!(!snapshot.listening);

    // destroying twice is harmless
    game.destroy();
}
