//! Shuffling and set sampling for flash card decks.
//!
//! Everything here is generic over the card type and takes the caller's random number generator,
//! so a seeded generator gives a reproducible deck.
//!
//! # Example
//!
//! ```
//! use deck_sampler::{sample_set, seeded_rng, shuffle_unplayed_first};
//!
//! let played = ["b", "d"];
//! let catalog = vec!["a", "b", "c", "d", "e"];
//!
//! // Unplayed cards are preferred when drawing a set
//! let (set, stats) = sample_set(&catalog, 3, |card| played.contains(card));
//! assert_eq!(set, vec!["a", "c", "e"]);
//! assert_eq!(stats.played_taken, 0);
//!
//! let mut rng = seeded_rng(7);
//! let shuffled = shuffle_unplayed_first(catalog.clone(), |card| played.contains(card), &mut rng);
//! assert_eq!(shuffled.len(), catalog.len());
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The generator used for decks. ChaCha8 is fast and gives the same sequence on every platform.
pub type DeckRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> DeckRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Returns the items in a uniformly random order.
pub fn shuffled<T, R>(mut items: Vec<T>, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    items.shuffle(rng);
    items
}

/// Reorders a deck for a reshuffle.
///
/// Cards that have not been played yet are moved in front of played ones, and then the whole deck is
/// permuted. The permutation is over the complete deck, so the result is a uniformly random order of
/// the same cards.
pub fn shuffle_unplayed_first<T, F, R>(items: Vec<T>, is_played: F, rng: &mut R) -> Vec<T>
where
    F: Fn(&T) -> bool,
    R: Rng + ?Sized,
{
    let (unplayed, played): (Vec<T>, Vec<T>) = items.into_iter().partition(|item| !is_played(item));
    let mut deck = unplayed;
    deck.extend(played);
    shuffled(deck, rng)
}

/// Draws a set of up to `set_size` items from `source`, preferring items that have not been played.
///
/// Unplayed items are taken in `source` order. If there are fewer than `set_size` of them, played items
/// (also in `source` order) fill the remaining slots. The result only has fewer than `set_size` items
/// when `source` itself is smaller. The stats say how the set was filled.
pub fn sample_set<T, F>(
    source: &[T],
    set_size: usize,
    is_played: F,
) -> (Vec<T>, SamplingStats)
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let mut set: Vec<T> = source
        .iter()
        .filter(|item| !is_played(item))
        .take(set_size)
        .cloned()
        .collect();
    let unplayed_taken = set.len();

    if set.len() < set_size {
        set.extend(
            source
                .iter()
                .filter(|item| is_played(item))
                .take(set_size - set.len())
                .cloned(),
        );
    }
    let played_taken = set.len() - unplayed_taken;

    (
        set,
        SamplingStats {
            source_count: source.len(),
            set_size,
            unplayed_taken,
            played_taken,
        },
    )
}

/// Statistics about how a set was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingStats {
    /// The number of items that could be drawn from
    pub source_count: usize,
    /// The requested set size
    pub set_size: usize,
    /// Items in the set that had not been played
    pub unplayed_taken: usize,
    /// Items in the set that were already played, used to fill up the quota
    pub played_taken: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_sample_prefers_unplayed() {
        let source = numbers(20);
        // even numbers have been played
        let (set, _) = sample_set(&source, 5, |n| n % 2 == 0);
        assert_eq!(set, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_sample_fills_with_played() {
        let source = numbers(12);
        // everything but 4 and 9 has been played
        let (set, stats) = sample_set(&source, 10, |n| *n != 4 && *n != 9);

        assert_eq!(set.len(), 10);
        assert_eq!(&set[..2], &[4, 9]);
        assert_eq!(&set[2..], &[0, 1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(stats.unplayed_taken, 2);
        assert_eq!(stats.played_taken, 8);
    }

    #[test]
    fn test_sample_smaller_than_set_size() {
        let source = numbers(4);
        let (set, stats) = sample_set(&source, 10, |_| false);
        assert_eq!(set, source);
        assert_eq!(stats.source_count, 4);
        assert_eq!(stats.played_taken, 0);
    }

    #[test]
    fn test_sample_all_played() {
        let source = numbers(15);
        let (set, _) = sample_set(&source, 10, |_| true);
        assert_eq!(set, numbers(10));
    }

    #[test]
    fn test_shuffle_keeps_every_card() {
        let mut rng = seeded_rng(42);
        let mut deck = shuffle_unplayed_first(numbers(50), |n| n % 3 == 0, &mut rng);
        deck.sort_unstable();
        assert_eq!(deck, numbers(50));
    }

    #[test]
    fn test_shuffle_deterministic() {
        let first = shuffled(numbers(100), &mut seeded_rng(1));
        let second = shuffled(numbers(100), &mut seeded_rng(1));
        assert_eq!(first, second);

        let other_seed = shuffled(numbers(100), &mut seeded_rng(2));
        assert_ne!(first, other_seed);
    }
}
