use std::cell::RefCell;
use std::rc::Rc;

use deck_sampler::{DeckRng, seeded_rng};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;

use crate::celebration::ConfettiPattern;
use crate::collaborators::Celebration;
use crate::utils;

/// Runs confetti patterns through the page's global `confetti` function (canvas-confetti), one set
/// of bursts per animation frame until the celebration is over.
pub(crate) struct BrowserCelebration {
    duration_ms: f64,
    state: Rc<RefCell<FrameState>>,
    // owned here rather than by itself so it is freed with the game
    _frame: Closure<dyn FnMut()>,
}

struct FrameState {
    pattern: ConfettiPattern,
    ends_at: f64,
    /// The pending `requestAnimationFrame`, if the loop is running
    request_id: Option<i32>,
    rng: DeckRng,
    frame_fn: Option<js_sys::Function>,
}

impl BrowserCelebration {
    pub(crate) fn new(duration_ms: f64) -> Self {
        let state = Rc::new(RefCell::new(FrameState {
            pattern: ConfettiPattern::SchoolPride,
            ends_at: 0.0,
            request_id: None,
            rng: seeded_rng(utils::random_seed()),
            frame_fn: None,
        }));

        let frame_state = state.clone();
        let frame = Closure::<dyn FnMut()>::new(move || {
            let mut state = frame_state.borrow_mut();
            let bursts = {
                let FrameState { pattern, rng, .. } = &mut *state;
                pattern.frame(rng)
            };
            fire(&bursts);

            state.request_id = if js_sys::Date::now() < state.ends_at {
                state.frame_fn.as_ref().and_then(request_frame)
            } else {
                None
            };
        });
        state.borrow_mut().frame_fn = Some(frame.as_ref().unchecked_ref::<js_sys::Function>().clone());

        Self {
            duration_ms,
            state,
            _frame: frame,
        }
    }
}

impl Celebration for BrowserCelebration {
    fn trigger(&mut self, pattern: ConfettiPattern) {
        if confetti_fn().is_none() {
            log::warn!("canvas-confetti is not loaded, skipping celebration");
            return;
        }

        let mut state = self.state.borrow_mut();
        state.pattern = pattern;
        state.ends_at = js_sys::Date::now() + self.duration_ms;
        if state.request_id.is_none() {
            state.request_id = state.frame_fn.as_ref().and_then(request_frame);
        }
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.ends_at = 0.0;
        if let Some(id) = state.request_id.take()
            && let Some(window) = web_sys::window()
            && let Err(e) = window.cancel_animation_frame(id)
        {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

impl Drop for BrowserCelebration {
    // a frame still queued with the browser would call the closure after it is freed
    fn drop(&mut self) {
        self.stop();
    }
}

fn confetti_fn() -> Option<js_sys::Function> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str("confetti"))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()
}

fn fire(bursts: &[crate::celebration::ConfettiBurst]) {
    let Some(confetti) = confetti_fn() else {
        return;
    };
    for burst in bursts {
        match serde_wasm_bindgen::to_value(burst) {
            Ok(options) => {
                if let Err(e) = confetti.call1(&JsValue::NULL, &options) {
                    log::warn!("confetti() threw: {e:?}");
                }
            }
            Err(e) => log::error!("Failed to serialize confetti burst: {e:?}"),
        }
    }
}

fn request_frame(frame: &js_sys::Function) -> Option<i32> {
    web_sys::window()?
        .request_animation_frame(frame)
        .inspect_err(|e| log::warn!("requestAnimationFrame failed: {e:?}"))
        .ok()
}
