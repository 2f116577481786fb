use crate::game::{Game, GameError, GameState, Power, PlayerId};

use super::commands::CommandKind;

/// A precondition checked before a command touches the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The sender holds a seat
    Join,
    /// The game is in one of these states
    GameState(&'static [GameState]),
    /// The sender is the current player
    Turn,
    Power(Power),
}

const IN_GAME: &[GameState] = &[GameState::InGame];
const BETWEEN_ROUNDS: &[GameState] = &[GameState::NotStarted, GameState::RoundEnded];

const JOINED: &[Guard] = &[Guard::Join];
const LOBBY: &[Guard] = &[Guard::Join, Guard::GameState(BETWEEN_ROUNDS)];
const PLAYING: &[Guard] = &[Guard::Join, Guard::GameState(IN_GAME)];
const ON_TURN: &[Guard] = &[Guard::Join, Guard::GameState(IN_GAME), Guard::Turn];
const VIEW_SELF: &[Guard] = &[
    Guard::Join,
    Guard::GameState(IN_GAME),
    Guard::Turn,
    Guard::Power(Power::ViewSelf),
];
const VIEW_OTHER: &[Guard] = &[
    Guard::Join,
    Guard::GameState(IN_GAME),
    Guard::Turn,
    Guard::Power(Power::ViewOther),
];
const SWAP_OTHER: &[Guard] = &[
    Guard::Join,
    Guard::GameState(IN_GAME),
    Guard::Turn,
    Guard::Power(Power::SwapOther),
];

/// Guard chain for a command, checked in order. Join and reconnect are
/// handled before a seat exists, so they have none.
pub fn guards_for(kind: CommandKind) -> &'static [Guard] {
    match kind {
        CommandKind::Join | CommandKind::Reconnect => &[],
        CommandKind::SyncData => JOINED,
        CommandKind::VoteReady => LOBBY,
        CommandKind::DropCard => PLAYING,
        CommandKind::DrawCard
        | CommandKind::NextPlayer
        | CommandKind::CallStop
        | CommandKind::DropDrawn
        | CommandKind::SwapDrawn => ON_TURN,
        CommandKind::PowerViewSelf => VIEW_SELF,
        CommandKind::PowerViewOther => VIEW_OTHER,
        CommandKind::PowerSwapOther => SWAP_OTHER,
    }
}

impl Guard {
    fn check(&self, game: &Game, player: PlayerId) -> Result<(), GameError> {
        match self {
            Guard::Join => game.require_joined(player).map(|_| ()),
            Guard::GameState(states) => {
                if states.contains(&game.state()) {
                    Ok(())
                } else {
                    Err(GameError::WrongState)
                }
            }
            Guard::Turn => game.require_turn(player).map(|_| ()),
            Guard::Power(power) => game.require_power(*power),
        }
    }
}

/// Runs the chain and returns the sender's seat. The first failing guard
/// short-circuits the rest.
pub fn admit(game: &Game, player: PlayerId, guards: &[Guard]) -> Result<usize, GameError> {
    for guard in guards {
        guard.check(game, player)?;
    }
    game.require_joined(player)
}
