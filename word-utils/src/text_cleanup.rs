//! Text cleanup for grading spoken spelling attempts
//!
//! Speech recognizers hand back a spelled word in many shapes ("C A T", " cat ", "Cat").
//! These helpers reduce a transcript to something that can be compared against a card's word.

/// The transcript as it should be shown back to the user: lowercased and trimmed.
pub fn spoken_form(transcript: &str) -> String {
    transcript.to_lowercase().trim().to_string()
}

/// Normalize a transcript for comparison
///
/// - Converts to lowercase
/// - Removes all whitespace, including whitespace between spelled-out letters
pub fn normalize_spelling(transcript: &str) -> String {
    spoken_form(transcript)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Whether a transcript spells `word`. Case and whitespace are ignored on the transcript side,
/// case is ignored on the word side.
pub fn spells_word(transcript: &str, word: &str) -> bool {
    normalize_spelling(transcript) == word.to_lowercase()
}
