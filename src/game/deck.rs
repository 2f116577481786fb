use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use super::card::MAX_POINTS;

/// Number of cards in a full deck
pub const DECK_SIZE: usize = 52;

/// Draw pile of point values. The front is the next card drawn.
///
/// Cards returned to the deck are appended at the back in push order. Anyone
/// tracking that order could predict upcoming draws, so the deck reshuffles
/// itself before a draw once the pushes since the last shuffle are at least
/// as many as the cards left.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: VecDeque<u8>,
    pushed: usize,
}

impl Deck {
    /// Two 0s, four of each value from 1 to 12 and two 13s, unshuffled
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(DECK_SIZE);
        cards.extend([0, 0]);
        for points in 1..MAX_POINTS {
            cards.extend([points; 4]);
        }
        cards.extend([MAX_POINTS, MAX_POINTS]);

        Self { cards, pushed: 0 }
    }

    /// Builds a deck in the given order, front first
    pub fn from_cards(cards: impl IntoIterator<Item = u8>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            pushed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.cards.iter().copied()
    }

    /// Cards pushed since the last shuffle
    pub fn pushed_since_shuffle(&self) -> usize {
        self.pushed
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pushed = 0;
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Takes the front card, reshuffling first if the pushed cards could have
    /// cycled through the whole deck
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u8> {
        if self.pushed >= self.cards.len() {
            self.shuffle(rng);
        }
        self.cards.pop_front()
    }

    pub fn push(&mut self, points: u8) {
        self.cards.push_back(points);
        self.pushed += 1;
    }
}
