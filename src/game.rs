//! Two-player game abstraction shared by every engine
//!
//! Engines are pure: every method is a function of its arguments, so the
//! same engine value can drive training, evaluation and interactive play.

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::Result;

/// A seat at the table. `One` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Zero-based seat index, handy for per-seat arrays.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Whether `player` lost this game.
    pub fn is_loss_for(self, player: Player) -> bool {
        matches!(self, GameOutcome::Win(winner) if winner != player)
    }
}

/// Finite, fully observable, deterministic two-player game.
///
/// Actions are densely numbered by [`Game::action_index`] so that value
/// estimators can break ties deterministically and networks can lay out one
/// output per action. [`Game::legal_actions`] lists actions in ascending index
/// order.
pub trait Game: Debug + Clone + Default + Send + Sync + 'static {
    type State: Copy + Eq + Hash + Debug + Display + Send + Sync + Serialize + DeserializeOwned;
    type Action: Copy + Eq + Hash + Debug + Display + Send + Sync + Serialize + DeserializeOwned;

    /// Stable identifier, stored in trained-policy artifacts.
    const NAME: &'static str;

    /// Number of distinct actions across all states.
    const ACTION_COUNT: usize;

    /// Length of the vector produced by [`Game::encode`].
    const FEATURE_LEN: usize;

    /// Deterministic starting configuration.
    fn initial_state(&self) -> Self::State;

    /// Legal actions in ascending [`Game::action_index`] order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidState`] for terminal states.
    fn legal_actions(&self, state: &Self::State) -> Result<Vec<Self::Action>>;

    /// Apply an action and return the successor state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalAction`] if the action is not legal in
    /// `state`, or [`crate::Error::InvalidState`] if `state` is terminal.
    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State>;

    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Outcome of a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidState`] if the game is still running.
    fn outcome(&self, state: &Self::State) -> Result<GameOutcome>;

    /// Player whose turn it is.
    fn to_move(&self, state: &Self::State) -> Player;

    /// Dense index in `0..ACTION_COUNT`.
    fn action_index(action: Self::Action) -> usize;

    /// One-hot feature vector of length `FEATURE_LEN`.
    fn encode(state: &Self::State) -> Vec<f64>;

    /// Parse an action typed by a human.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if the text is not an action.
    /// Legality is checked separately by [`Game::apply`].
    fn parse_action(&self, input: &str) -> Result<Self::Action>;

    /// Short description of the accepted move notation.
    fn notation_help(&self) -> &'static str;

    /// Render an action in the notation [`Game::parse_action`] accepts.
    fn describe_action(&self, action: Self::Action) -> String {
        action.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::One.opponent().opponent(), Player::One);
    }

    #[test]
    fn test_is_loss_for() {
        let outcome = GameOutcome::Win(Player::Two);
        assert!(outcome.is_loss_for(Player::One));
        assert!(!outcome.is_loss_for(Player::Two));
        assert!(!GameOutcome::Draw.is_loss_for(Player::One));
    }
}
