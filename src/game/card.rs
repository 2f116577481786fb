use std::collections::HashSet;

use super::player::PlayerId;

/// Highest point value a card can carry
pub const MAX_POINTS: u8 = 13;

/// A card held in a player's hand.
///
/// The point value is fixed for the card's lifetime; the set of players who
/// have seen its face only ever grows. Cards are moved between hands by value,
/// so their visibility history travels with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    points: u8,
    seen_by: HashSet<PlayerId>,
}

impl Card {
    pub fn new(points: u8) -> Self {
        debug_assert!(points <= MAX_POINTS, "card points out of range: {points}");
        Self {
            points,
            seen_by: HashSet::new(),
        }
    }

    pub fn points(&self) -> u8 {
        self.points
    }

    pub fn is_seen_by(&self, player: PlayerId) -> bool {
        self.seen_by.contains(&player)
    }

    /// Marks the card as seen; returns false if the player had already seen it
    pub fn reveal_to(&mut self, player: PlayerId) -> bool {
        self.seen_by.insert(player)
    }

    pub fn seen_by(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seen_by.iter().copied()
    }
}
