#![deny(clippy::string_slice)]

pub mod celebration;
pub mod collaborators;
pub mod config;
mod persistence;
pub mod session;
pub mod snapshot;
pub mod timeline;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod utils;

pub use celebration::{ConfettiBurst, ConfettiPattern};
pub use config::{SessionConfig, SpeechSettings};
pub use session::{Command, Direction, Feedback, SessionController, SessionError};
pub use snapshot::{FeedbackView, SessionSnapshot};
pub use word_utils::{Card, Catalog};

#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use std::sync::LazyLock;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// putting this inside LOGGER prevents us from accidentally initializing the logger more than once
#[cfg(target_arch = "wasm32")]
#[allow(clippy::declare_interior_mutable_const)]
const LOGGER: LazyLock<()> = LazyLock::new(|| {
    utils::set_panic_hook();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
});

/// A flash card game bound to the page. `on_change` is called with a fresh [`SessionSnapshot`]
/// whenever anything visible changes.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct FlashCardGame {
    game: Rc<browser::Game>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl FlashCardGame {
    #[wasm_bindgen(constructor)]
    pub fn new(
        flashcards_json: &str,
        config: Option<SessionConfig>,
        on_change: js_sys::Function,
    ) -> Result<FlashCardGame, JsValue> {
        // used to only initialize the logger once
        #[allow(clippy::borrow_interior_mutable_const)]
        *LOGGER;

        let mut config = config.unwrap_or_default();
        config.seed.get_or_insert_with(utils::random_seed);

        let catalog = Catalog::from_json(flashcards_json).map_err(|e| error_to_js(&e))?;
        let game = browser::Game::new(catalog, config, on_change)
            .inspect_err(|e| log::error!("Error starting game: {e:?}"))
            .map_err(|e| error_to_js(&e))?;
        Ok(FlashCardGame { game })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.game.with_controller(|controller| controller.snapshot())
    }

    pub fn next(&self) {
        self.game.dispatch(|controller| controller.navigate(Direction::Next));
    }

    pub fn previous(&self) {
        self.game
            .dispatch(|controller| controller.navigate(Direction::Previous));
    }

    pub fn speak(&self) {
        self.game.dispatch(|controller| controller.speak_current());
    }

    pub fn shuffle(&self) {
        self.game.dispatch(|controller| controller.shuffle());
    }

    #[wasm_bindgen(js_name = newSet)]
    pub fn new_set(&self) {
        self.game.dispatch(|controller| controller.new_set());
    }

    #[wasm_bindgen(js_name = toggleSpellingMode)]
    pub fn toggle_spelling_mode(&self) {
        self.game
            .dispatch(|controller| controller.toggle_spelling_mode());
    }

    #[wasm_bindgen(js_name = stopListening)]
    pub fn stop_listening(&self) {
        self.game.dispatch(|controller| controller.stop_listening());
    }

    /// Stops speech, timers and listeners. The game does nothing after this.
    pub fn destroy(&self) {
        self.game.destroy();
    }
}

#[cfg(target_arch = "wasm32")]
fn error_to_js(error: &dyn std::error::Error) -> JsValue {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    JsValue::from_str(&message)
}
