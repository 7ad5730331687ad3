//! The card session: which deck is showing, where the user is in it, what they've seen, and the
//! spelling-mode loop.
//!
//! All delayed steps (spelling prompt, microphone activation, feedback fade-out, moving on after a correct
//! answer, the automatic new set) are entries on the session's [`Timeline`]. The host calls
//! [`SessionController::advance_to`] with the current time to run whatever has come due.

use deck_sampler::{DeckRng, sample_set, seeded_rng, shuffle_unplayed_first, shuffled};
use indexmap::IndexSet;
use stash::{KeyValueStore, StashError};
use word_utils::text_cleanup::{spells_word, spoken_form};
use word_utils::{Card, Catalog, CatalogError};

use crate::celebration::ConfettiPattern;
use crate::collaborators::{Collaborators, SoundEffect};
use crate::config::SessionConfig;
use crate::persistence::{self, StoredProgress};
use crate::snapshot::{FeedbackView, SessionSnapshot};
use crate::timeline::{Timeline, TimerKey};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Could not load flashcards")]
    Catalog(#[from] CatalogError),

    #[error("Could not read saved progress")]
    Storage(#[from] StashError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// The position one step from `position` in a deck of `len` cards, wrapping at both ends.
    fn step(self, position: usize, len: usize) -> usize {
        match self {
            Direction::Next => (position + 1) % len,
            Direction::Previous => (position + len - 1) % len,
        }
    }
}

/// A user action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Navigate(Direction),
    /// Click on the card
    SpeakCurrent,
    Shuffle,
    NewSet,
    ToggleSpellingMode,
}

impl Command {
    /// Keyboard shortcuts, keyed by `KeyboardEvent.key`
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "<" => Some(Command::Navigate(Direction::Previous)),
            "ArrowRight" | ">" => Some(Command::Navigate(Direction::Next)),
            _ => None,
        }
    }
}

/// Result of the latest spelling attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { heard: String },
    RecognitionError,
}

impl Feedback {
    pub fn message(&self) -> String {
        match self {
            Feedback::Correct => "Correct!".to_string(),
            Feedback::Incorrect { heard } => format!("\"{heard}\" is not correct. Try again"),
            Feedback::RecognitionError => {
                "Error in speech recognition. Please try again.".to_string()
            }
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    SpellingPrompt,
    StartListening,
    AdvanceAfterCorrect,
    FadeOutFeedback,
    ClearFeedback,
    AutoNewSet,
}

impl Task {
    fn is_prompt_sequence(self) -> bool {
        matches!(self, Task::SpellingPrompt | Task::StartListening)
    }

    fn is_feedback(self) -> bool {
        matches!(self, Task::FadeOutFeedback | Task::ClearFeedback)
    }

    /// Everything tied to the card currently showing. The automatic new set belongs to the deck instead.
    fn is_transient(self) -> bool {
        !matches!(self, Task::AutoNewSet)
    }
}

pub struct SessionController {
    config: SessionConfig,
    /// The catalog, shuffled once at startup. New sets are drawn from it in this order.
    catalog: Vec<Card>,
    deck: Vec<Card>,
    position: usize,
    visited: IndexSet<usize>,
    played_words: IndexSet<String>,
    spelling_mode: bool,
    feedback: Option<Feedback>,
    fading_out: bool,
    listening: bool,
    auto_new_set: Option<TimerKey>,
    timeline: Timeline<Task>,
    rng: DeckRng,
    store: Box<dyn KeyValueStore>,
    collaborators: Collaborators,
}

impl SessionController {
    /// Starts a session on the whole catalog, restoring played words and spelling mode from `store`.
    ///
    /// Shuffles are seeded from `config.seed`; callers wanting a fresh order each run must fill it in.
    pub fn new(
        catalog: Catalog,
        config: SessionConfig,
        store: Box<dyn KeyValueStore>,
        collaborators: Collaborators,
        now_ms: f64,
    ) -> Result<Self, SessionError> {
        let StoredProgress {
            played_words,
            spelling_mode,
        } = StoredProgress::load(store.as_ref())?;

        let mut rng = seeded_rng(config.seed.unwrap_or_default());
        let catalog = shuffled(catalog.into_cards(), &mut rng);

        let mut session = Self {
            config,
            deck: catalog.clone(),
            catalog,
            position: 0,
            visited: IndexSet::from([0]),
            played_words,
            spelling_mode,
            feedback: None,
            fading_out: false,
            listening: false,
            auto_new_set: None,
            timeline: Timeline::new(now_ms),
            rng,
            store,
            collaborators,
        };
        persistence::save_visited(session.store.as_mut(), &session.visited);

        log::info!("Session started with {} cards", session.deck.len());
        Ok(session)
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Navigate(direction) => self.navigate(direction),
            Command::SpeakCurrent => self.speak_current(),
            Command::Shuffle => self.shuffle(),
            Command::NewSet => self.new_set(),
            Command::ToggleSpellingMode => self.toggle_spelling_mode(),
        }
    }

    /// Returns whether the key was a shortcut.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match Command::from_key(key) {
            Some(command) => {
                self.dispatch(command);
                true
            }
            None => false,
        }
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.cancel_transient();
        self.position = direction.step(self.position, self.deck.len());
        self.clear_feedback();

        self.visited.insert(self.position);
        persistence::save_visited(self.store.as_mut(), &self.visited);
        self.mark_played(self.position);
        self.present_current();
        self.check_deck_completed();
    }

    pub fn speak_current(&mut self) {
        self.cancel_prompt_sequence();
        self.present_current();
    }

    /// Reorders the current deck, unplayed cards first before the permutation.
    pub fn shuffle(&mut self) {
        self.cancel_transient();
        self.cancel_auto_new_set();

        let deck = std::mem::take(&mut self.deck);
        let played_words = &self.played_words;
        self.deck = shuffle_unplayed_first(
            deck,
            |card| played_words.contains(&card.word),
            &mut self.rng,
        );
        self.start_deck();
    }

    /// Replaces the deck with up to `set_size` cards, preferring words that haven't been played.
    pub fn new_set(&mut self) {
        self.cancel_transient();
        self.cancel_auto_new_set();

        let played_words = &self.played_words;
        let (deck, stats) = sample_set(
            &self.catalog,
            self.config.set_size.max(1),
            |card| played_words.contains(&card.word),
        );
        log::info!(
            "New set: {} unplayed and {} played cards out of {}",
            stats.unplayed_taken,
            stats.played_taken,
            stats.source_count
        );
        self.deck = deck;
        self.start_deck();
    }

    pub fn toggle_spelling_mode(&mut self) {
        self.cancel_transient();
        self.spelling_mode = !self.spelling_mode;
        persistence::save_spelling_mode(self.store.as_mut(), self.spelling_mode);
        self.clear_feedback();
    }

    /// Grades a recognized utterance against the current card.
    pub fn spelling_attempt(&mut self, transcript: &str) {
        self.listening = false;
        if !self.spelling_mode {
            log::debug!("Ignoring spelling attempt outside spelling mode");
            return;
        }
        if self.feedback == Some(Feedback::Correct) {
            log::debug!("Ignoring spelling attempt while moving on from a correct answer");
            return;
        }
        self.timeline.cancel_where(|task| task.is_feedback());
        self.fading_out = false;

        let word = &self.deck[self.position].word;
        if spells_word(transcript, word) {
            log::info!("Spelled {word:?} correctly");
            self.feedback = Some(Feedback::Correct);
            self.celebrate();
            self.timeline
                .schedule(self.config.correct_advance_delay_ms, Task::AdvanceAfterCorrect);
        } else {
            let heard = spoken_form(transcript);
            log::info!("Heard {heard:?} while expecting {word:?}");
            self.feedback = Some(Feedback::Incorrect { heard });
            self.collaborators.sounds.play(SoundEffect::Failure);
            self.timeline
                .schedule(self.config.incorrect_fade_delay_ms, Task::FadeOutFeedback);
        }
    }

    /// Reports a speech recognition failure. There is no automatic retry; the user clicks the card again.
    pub fn recognition_error(&mut self, code: &str) {
        self.listening = false;
        // this is what the recognizer reports after we abort it ourselves
        if code == "aborted" {
            log::debug!("Speech recognition aborted");
            return;
        }
        log::error!("Speech recognition error {code}");
        self.timeline.cancel_where(|task| task.is_feedback());
        self.feedback = Some(Feedback::RecognitionError);
        self.fading_out = false;
    }

    /// Ends the current recognition early; the recognizer still reports what it heard.
    pub fn stop_listening(&mut self) {
        if !self.listening {
            return;
        }
        if let Some(input) = self.collaborators.speech_input.as_mut() {
            input.stop();
        }
    }

    /// Runs every task due at or before `now_ms`.
    pub fn advance_to(&mut self, now_ms: f64) {
        while let Some((_, task)) = self.timeline.pop_due(now_ms) {
            self.run(task);
        }
    }

    pub fn advance_by(&mut self, elapsed_ms: f64) {
        self.advance_to(self.timeline.now() + elapsed_ms);
    }

    /// Cancels everything pending, silences speech and confetti, and releases the microphone. The
    /// session stays usable.
    pub fn teardown(&mut self) {
        let cancelled = self.timeline.cancel_all();
        self.auto_new_set = None;
        self.abort_listening();
        self.collaborators.speech_output.cancel();
        self.collaborators.celebration.stop();
        log::debug!("Session torn down, cancelled {cancelled} pending tasks");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let card = self.current_card().clone();
        let display_word = if self.spelling_mode {
            "???".to_string()
        } else {
            card.word.clone()
        };
        SessionSnapshot {
            card,
            display_word,
            position: self.position,
            deck_len: self.deck.len(),
            visited_count: self.visited.len(),
            progress_percent: self.visited.len() as f64 / self.deck.len() as f64 * 100.0,
            spelling_mode: self.spelling_mode,
            feedback: self.feedback.as_ref().map(|feedback| FeedbackView {
                message: feedback.message(),
                is_correct: feedback.is_correct(),
                fading_out: self.fading_out,
            }),
            listening: self.listening,
        }
    }

    pub fn current_card(&self) -> &Card {
        &self.deck[self.position]
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn visited(&self) -> &IndexSet<usize> {
        &self.visited
    }

    pub fn played_words(&self) -> &IndexSet<String> {
        &self.played_words
    }

    pub fn spelling_mode(&self) -> bool {
        self.spelling_mode
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_fading_out(&self) -> bool {
        self.fading_out
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn now(&self) -> f64 {
        self.timeline.now()
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.timeline.next_deadline()
    }

    pub fn pending_tasks(&self) -> usize {
        self.timeline.len()
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::SpellingPrompt => {
                let prompt = self.config.spelling_prompt.clone();
                self.collaborators.speech_output.speak(&prompt);
                self.fading_out = false;
                if self.collaborators.speech_input.is_some() {
                    self.timeline
                        .schedule(self.config.listen_delay_ms, Task::StartListening);
                } else {
                    log::warn!("Speech recognition not available");
                }
            }
            Task::StartListening => self.start_listening(),
            Task::AdvanceAfterCorrect => self.navigate(Direction::Next),
            Task::FadeOutFeedback => {
                self.fading_out = true;
                self.timeline
                    .schedule(self.config.fade_out_ms, Task::ClearFeedback);
            }
            Task::ClearFeedback => self.clear_feedback(),
            Task::AutoNewSet => {
                self.auto_new_set = None;
                self.new_set();
            }
        }
    }

    /// Speaks the current word. In spelling mode this also starts the prompt sequence.
    fn present_current(&mut self) {
        let word = self.deck[self.position].word.clone();
        self.collaborators.speech_output.speak(&word);
        if self.spelling_mode {
            self.timeline
                .schedule(self.config.prompt_delay_ms, Task::SpellingPrompt);
        }
    }

    fn start_deck(&mut self) {
        self.position = 0;
        self.visited = IndexSet::from([0]);
        persistence::save_visited(self.store.as_mut(), &self.visited);
        self.clear_feedback();
        self.mark_played(0);
        self.present_current();
        self.check_deck_completed();
    }

    // whatever scheduled this went through `cancel_prompt_sequence` first, so any earlier
    // recognition has already been aborted
    fn start_listening(&mut self) {
        let Some(input) = self.collaborators.speech_input.as_mut() else {
            log::warn!("Speech recognition not available");
            return;
        };
        input.start();
        self.listening = true;
    }

    fn abort_listening(&mut self) {
        if !self.listening {
            return;
        }
        self.listening = false;
        if let Some(input) = self.collaborators.speech_input.as_mut() {
            input.abort();
        }
    }

    fn mark_played(&mut self, position: usize) {
        let word = &self.deck[position].word;
        if !self.played_words.contains(word) {
            self.played_words.insert(word.clone());
            persistence::save_played_words(self.store.as_mut(), &self.played_words);
        }
    }

    fn check_deck_completed(&mut self) {
        if self.visited.len() < self.deck.len() || self.auto_new_set.is_some() {
            return;
        }
        log::info!("All {} cards visited", self.deck.len());
        self.celebrate();
        self.auto_new_set = Some(
            self.timeline
                .schedule(self.config.auto_new_set_delay_ms, Task::AutoNewSet),
        );
    }

    fn celebrate(&mut self) {
        let pattern = ConfettiPattern::random(&mut self.rng);
        self.collaborators.celebration.trigger(pattern);
        self.collaborators.sounds.play(SoundEffect::Success);
    }

    fn clear_feedback(&mut self) {
        self.feedback = None;
        self.fading_out = false;
    }

    fn cancel_prompt_sequence(&mut self) {
        self.timeline.cancel_where(|task| task.is_prompt_sequence());
        self.abort_listening();
    }

    fn cancel_transient(&mut self) {
        self.timeline.cancel_where(|task| task.is_transient());
        self.abort_listening();
    }

    fn cancel_auto_new_set(&mut self) {
        if let Some(key) = self.auto_new_set.take() {
            self.timeline.cancel(key);
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
