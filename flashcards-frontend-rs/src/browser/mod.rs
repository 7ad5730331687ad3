//! Wiring between a [`SessionController`] and the page: browser collaborators, a single re-armed
//! `setTimeout` that drives the session timeline, the keyboard listener, and change notifications to JS.

mod audio;
mod confetti;
mod speech;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use stash::web::LocalStorage;
use stash::{KeyValueStore, MemoryStore};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use word_utils::Catalog;

use crate::collaborators::{Collaborators, SpeechInput};
use crate::config::SessionConfig;
use crate::session::{SessionController, SessionError};
use crate::utils;

pub(crate) struct Game {
    // released before `on_change` runs, since the listener may call straight back in
    controller: RefCell<SessionController>,
    on_change: js_sys::Function,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
    timeout_id: Cell<Option<i32>>,
    keydown: RefCell<Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>>,
    recognition: RefCell<Option<speech::RecognitionHandlers>>,
    destroyed: Cell<bool>,
}

impl Game {
    pub(crate) fn new(
        catalog: Catalog,
        config: SessionConfig,
        on_change: js_sys::Function,
    ) -> Result<Rc<Self>, SessionError> {
        let store: Box<dyn KeyValueStore> = match LocalStorage::new() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("Progress won't be saved, falling back to memory: {e}");
                Box::new(MemoryStore::new())
            }
        };

        let recognition = speech::create_recognition(&config.speech);
        let collaborators = Collaborators {
            speech_output: Box::new(speech::BrowserSpeechOutput::new(config.speech.clone())),
            speech_input: recognition.clone().map(|recognition| {
                Box::new(speech::BrowserSpeechInput::new(recognition)) as Box<dyn SpeechInput>
            }),
            celebration: Box::new(confetti::BrowserCelebration::new(config.celebration_ms)),
            sounds: Box::new(audio::BrowserSounds::new(
                config.success_sound_url.clone(),
                config.failure_sound_url.clone(),
            )),
        };

        let controller =
            SessionController::new(catalog, config, store, collaborators, utils::now_ms())?;

        let game = Rc::new(Self {
            controller: RefCell::new(controller),
            on_change,
            tick: RefCell::new(None),
            timeout_id: Cell::new(None),
            keydown: RefCell::new(None),
            recognition: RefCell::new(None),
            destroyed: Cell::new(false),
        });

        let weak = Rc::downgrade(&game);
        *game.tick.borrow_mut() = Some(Closure::new(move || {
            if let Some(game) = weak.upgrade() {
                game.timeout_id.set(None);
                game.dispatch(|_| {});
            }
        }));

        if let Some(recognition) = recognition {
            *game.recognition.borrow_mut() =
                Some(speech::RecognitionHandlers::connect(recognition, Rc::downgrade(&game)));
        }

        game.listen_for_keys();
        Ok(game)
    }

    /// Catches the session up to the current time, applies `action`, re-arms the timer and tells JS.
    /// Returns `None` without doing anything once the game is destroyed.
    pub(crate) fn dispatch<R>(
        self: &Rc<Self>,
        action: impl FnOnce(&mut SessionController) -> R,
    ) -> Option<R> {
        if self.destroyed.get() {
            log::debug!("Ignoring input to a destroyed game");
            return None;
        }
        let result = {
            let mut controller = self.controller.borrow_mut();
            controller.advance_to(utils::now_ms());
            action(&mut controller)
        };
        self.rearm();
        self.notify();
        Some(result)
    }

    pub(crate) fn with_controller<R>(&self, f: impl FnOnce(&SessionController) -> R) -> R {
        f(&self.controller.borrow())
    }

    /// Removes every listener and timer this game installed and silences it. Later input is ignored.
    pub(crate) fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        // the tick closure itself stays alive, since `on_change` may call this from inside a tick
        self.clear_timeout();
        self.controller.borrow_mut().teardown();

        // dropping the handlers detaches them from the recognizer
        self.recognition.borrow_mut().take();

        if let Some(keydown) = self.keydown.borrow_mut().take()
            && let Some(window) = web_sys::window()
        {
            let _ = window
                .remove_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
        }
    }

    fn rearm(&self) {
        self.clear_timeout();

        let Some(deadline) = self.controller.borrow().next_deadline() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let tick = self.tick.borrow();
        let Some(tick) = tick.as_ref() else {
            return;
        };

        let delay = (deadline - utils::now_ms()).max(0.0).ceil() as i32;
        match window
            .set_timeout_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), delay)
        {
            Ok(id) => self.timeout_id.set(Some(id)),
            Err(e) => log::error!("Failed to schedule session timer: {e:?}"),
        }
    }

    fn clear_timeout(&self) {
        if let Some(id) = self.timeout_id.take()
            && let Some(window) = web_sys::window()
        {
            window.clear_timeout_with_handle(id);
        }
    }

    fn notify(&self) {
        let snapshot = self.controller.borrow().snapshot();
        match serde_wasm_bindgen::to_value(&snapshot) {
            Ok(snapshot) => {
                if let Err(e) = self.on_change.call1(&JsValue::NULL, &snapshot) {
                    log::error!("Change listener threw: {e:?}");
                }
            }
            Err(e) => log::error!("Failed to serialize session snapshot: {e:?}"),
        }
    }

    fn listen_for_keys(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let weak: Weak<Self> = Rc::downgrade(self);
        let keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
            move |event: web_sys::KeyboardEvent| {
                if let Some(game) = weak.upgrade() {
                    game.dispatch(|controller| controller.handle_key(&event.key()));
                }
            },
        );
        if let Err(e) =
            window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
        {
            log::warn!("Keyboard shortcuts unavailable: {e:?}");
            return;
        }
        *self.keydown.borrow_mut() = Some(keydown);
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.destroy();
    }
}
