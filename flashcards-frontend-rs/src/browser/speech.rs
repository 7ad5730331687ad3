use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;

use super::Game;
use crate::collaborators::{SpeechInput, SpeechOutput};
use crate::config::SpeechSettings;

pub(crate) struct BrowserSpeechOutput {
    synth: Option<web_sys::SpeechSynthesis>,
    settings: SpeechSettings,
}

impl BrowserSpeechOutput {
    pub(crate) fn new(settings: SpeechSettings) -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        Self { synth, settings }
    }
}

impl SpeechOutput for BrowserSpeechOutput {
    fn speak(&mut self, text: &str) {
        let Some(synth) = &self.synth else {
            log::warn!("Speech synthesis not available");
            return;
        };

        // Cancel any ongoing speech
        synth.cancel();

        let utterance = match web_sys::SpeechSynthesisUtterance::new_with_text(text) {
            Ok(utterance) => utterance,
            Err(e) => {
                log::warn!("Could not create utterance for {text:?}: {e:?}");
                return;
            }
        };
        utterance.set_lang(&self.settings.lang);
        utterance.set_rate(self.settings.rate);
        utterance.set_pitch(self.settings.pitch);
        utterance.set_volume(self.settings.volume);
        synth.speak(&utterance);
    }

    fn cancel(&mut self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
    }
}

/// Builds a recognizer from whichever constructor the browser exposes. Chrome and Safari only have the
/// prefixed `webkitSpeechRecognition`.
pub(crate) fn create_recognition(settings: &SpeechSettings) -> Option<web_sys::SpeechRecognition> {
    let window = web_sys::window()?;
    let constructor = ["SpeechRecognition", "webkitSpeechRecognition"]
        .into_iter()
        .find_map(|name| {
            js_sys::Reflect::get(&window, &JsValue::from_str(name))
                .ok()
                .filter(|value| value.is_function())
        });
    let Some(constructor) = constructor else {
        log::warn!("Speech recognition not supported in this browser");
        return None;
    };

    let recognition: web_sys::SpeechRecognition =
        match js_sys::Reflect::construct(constructor.unchecked_ref(), &js_sys::Array::new()) {
            Ok(recognition) => recognition.unchecked_into(),
            Err(e) => {
                log::warn!("Failed to create speech recognition: {e:?}");
                return None;
            }
        };
    recognition.set_continuous(false);
    recognition.set_interim_results(false);
    recognition.set_lang(&settings.lang);
    Some(recognition)
}

pub(crate) struct BrowserSpeechInput {
    recognition: web_sys::SpeechRecognition,
}

impl BrowserSpeechInput {
    pub(crate) fn new(recognition: web_sys::SpeechRecognition) -> Self {
        Self { recognition }
    }
}

impl SpeechInput for BrowserSpeechInput {
    fn start(&mut self) {
        if let Err(e) = self.recognition.start() {
            log::warn!("Failed to start speech recognition: {e:?}");
        }
    }

    fn stop(&mut self) {
        self.recognition.stop();
    }

    fn abort(&mut self) {
        self.recognition.abort();
    }
}

/// The recognizer's result and error callbacks. They are detached when this is dropped.
pub(crate) struct RecognitionHandlers {
    recognition: web_sys::SpeechRecognition,
    _on_result: Closure<dyn FnMut(web_sys::SpeechRecognitionEvent)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
}

impl RecognitionHandlers {
    pub(crate) fn connect(recognition: web_sys::SpeechRecognition, game: Weak<Game>) -> Self {
        let result_game = game.clone();
        let on_result = Closure::<dyn FnMut(web_sys::SpeechRecognitionEvent)>::new(
            move |event: web_sys::SpeechRecognitionEvent| {
                let Some(game) = result_game.upgrade() else {
                    return;
                };
                let transcript = event
                    .results()
                    .and_then(|results| results.get(0))
                    .and_then(|result| result.get(0))
                    .map(|alternative| alternative.transcript());
                deliver_transcript(&game, transcript);
            },
        );

        let on_error =
            Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
                let Some(game) = game.upgrade() else {
                    return;
                };
                let code = js_sys::Reflect::get(&event, &JsValue::from_str("error"))
                    .ok()
                    .and_then(|code| code.as_string())
                    .unwrap_or_else(|| "unknown".to_string());
                game.dispatch(|controller| controller.recognition_error(&code));
            });

        recognition.set_onresult(Some(on_result.as_ref().unchecked_ref()));
        recognition.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Self {
            recognition,
            _on_result: on_result,
            _on_error: on_error,
        }
    }
}

fn deliver_transcript(game: &Rc<Game>, transcript: Option<String>) {
    match transcript {
        Some(transcript) => game.dispatch(|controller| controller.spelling_attempt(&transcript)),
        None => game.dispatch(|controller| controller.recognition_error("no-speech")),
    };
}

impl Drop for RecognitionHandlers {
    fn drop(&mut self) {
        self.recognition.set_onresult(None);
        self.recognition.set_onerror(None);
    }
}
