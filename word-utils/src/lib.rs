pub mod text_cleanup;

use std::collections::BTreeSet;

/// A single flash card: the word to learn and a picture of it.
#[derive(
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Card {
    pub word: String,
    /// URL of the picture shown with the word
    pub image: String,
}

impl Card {
    pub fn new(word: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            image: image.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Flashcard data is not valid JSON")]
    Json(#[source] serde_json::Error),

    #[error("Flashcard catalog is empty")]
    Empty,
}

/// The full set of cards the game can draw from.
///
/// Words are unique within a catalog, so any deck built from it has no duplicate words either.
/// A catalog is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    /// Builds a catalog, keeping the first card for each word.
    pub fn new(cards: Vec<Card>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        let mut deduplicated = Vec::with_capacity(cards.len());
        for card in cards {
            if seen.insert(card.word.clone()) {
                deduplicated.push(card);
            } else {
                log::warn!("Dropping duplicate flashcard for word {:?}", card.word);
            }
        }

        if deduplicated.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self {
            cards: deduplicated,
        })
    }

    /// Parses a JSON array of `{ "word": ..., "image": ... }` objects.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)
            .inspect_err(|e| {
                log::error!("Error loading flashcards: {e}");
            })
            .map_err(CatalogError::Json)?;
        let catalog = Self::new(cards)?;
        log::info!("Flashcards loaded successfully: {}", catalog.len());
        Ok(catalog)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false, catalogs cannot be empty. Present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
