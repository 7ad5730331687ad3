use wasm_bindgen::prelude::*;

use crate::collaborators::{SoundEffect, SoundEffects};

pub(crate) struct BrowserSounds {
    success_url: String,
    failure_url: String,
    // autoplay policies reject `play()` until the user has interacted with the page
    on_rejected: Closure<dyn FnMut(JsValue)>,
}

impl BrowserSounds {
    pub(crate) fn new(success_url: String, failure_url: String) -> Self {
        Self {
            success_url,
            failure_url,
            on_rejected: Closure::new(|e: JsValue| {
                log::warn!("Sound effect was blocked: {e:?}");
            }),
        }
    }

    fn url(&self, effect: SoundEffect) -> &str {
        match effect {
            SoundEffect::Success => &self.success_url,
            SoundEffect::Failure => &self.failure_url,
        }
    }
}

impl SoundEffects for BrowserSounds {
    fn play(&mut self, effect: SoundEffect) {
        let url = self.url(effect);
        let audio = match web_sys::HtmlAudioElement::new_with_src(url) {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Could not load sound {url}: {e:?}");
                return;
            }
        };
        match audio.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.on_rejected);
            }
            Err(e) => log::warn!("Could not play sound {url}: {e:?}"),
        }
    }
}
