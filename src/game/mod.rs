// Public API
pub use card::Card;
pub use deck::{Deck, DECK_SIZE};
pub use errors::GameError;
pub use logic::{Game, GameState, Power, TurnAdvance, HAND_SIZE, INITIALLY_SEEN, MAX_SEATS};
pub use player::{CardView, Player, PlayerId, PlayerView, SyncData};

// Internal modules
mod card;
mod deck;
mod errors;
mod logic;
mod player;
