//! The platform capabilities a session drives. Browser implementations live in `browser`; tests use
//! recording doubles.

use crate::celebration::ConfettiPattern;

/// Text to speech
pub trait SpeechOutput {
    /// Speaks `text`, cutting off anything still being spoken.
    fn speak(&mut self, text: &str);

    /// Cuts off whatever is being spoken.
    fn cancel(&mut self) {}
}

/// Single-shot speech recognition.
///
/// Results don't come back through this trait: the host delivers them to
/// [`SessionController::spelling_attempt`](crate::session::SessionController::spelling_attempt) or
/// [`SessionController::recognition_error`](crate::session::SessionController::recognition_error).
pub trait SpeechInput {
    fn start(&mut self);

    /// Stops listening and still delivers a result for what was heard so far.
    fn stop(&mut self);

    /// Stops listening and discards the activation.
    fn abort(&mut self);
}

pub trait Celebration {
    fn trigger(&mut self, pattern: ConfettiPattern);

    /// Ends a running celebration early.
    fn stop(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEffect {
    Success,
    Failure,
}

/// Short feedback sounds. Playback failures are the implementation's problem and never reported.
pub trait SoundEffects {
    fn play(&mut self, effect: SoundEffect);
}

/// Everything a [`SessionController`](crate::session::SessionController) talks to besides storage.
pub struct Collaborators {
    pub speech_output: Box<dyn SpeechOutput>,
    /// `None` when the platform has no speech recognition
    pub speech_input: Option<Box<dyn SpeechInput>>,
    pub celebration: Box<dyn Celebration>,
    pub sounds: Box<dyn SoundEffects>,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Call {
        Speak(String),
        StartListening,
        StopListening,
        AbortListening,
        CancelSpeech,
        Celebrate(ConfettiPattern),
        StopCelebration,
        Play(SoundEffect),
    }

    /// Shared call log; every double created from it appends here.
    #[derive(Clone, Default)]
    pub(crate) struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl Recorder {
        pub(crate) fn collaborators(&self, with_speech_input: bool) -> Collaborators {
            Collaborators {
                speech_output: Box::new(self.clone()),
                speech_input: with_speech_input
                    .then(|| Box::new(self.clone()) as Box<dyn SpeechInput>),
                celebration: Box::new(self.clone()),
                sounds: Box::new(self.clone()),
            }
        }

        pub(crate) fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }

        fn push(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl SpeechOutput for Recorder {
        fn speak(&mut self, text: &str) {
            self.push(Call::Speak(text.to_string()));
        }

        fn cancel(&mut self) {
            self.push(Call::CancelSpeech);
        }
    }

    impl SpeechInput for Recorder {
        fn start(&mut self) {
            self.push(Call::StartListening);
        }

        fn stop(&mut self) {
            self.push(Call::StopListening);
        }

        fn abort(&mut self) {
            self.push(Call::AbortListening);
        }
    }

    impl Celebration for Recorder {
        fn trigger(&mut self, pattern: ConfettiPattern) {
            self.push(Call::Celebrate(pattern));
        }

        fn stop(&mut self) {
            self.push(Call::StopCelebration);
        }
    }

    impl SoundEffects for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.push(Call::Play(effect));
        }
    }
}
