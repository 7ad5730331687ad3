use serde::Serialize;
use word_utils::Card;

/// Everything the UI needs to draw the game
#[derive(Clone, Debug, PartialEq, Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub card: Card,
    /// The word, or `???` in spelling mode
    pub display_word: String,
    pub position: usize,
    pub deck_len: usize,
    pub visited_count: usize,
    pub progress_percent: f64,
    pub spelling_mode: bool,
    pub feedback: Option<FeedbackView>,
    pub listening: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub message: String,
    pub is_correct: bool,
    pub fading_out: bool,
}
