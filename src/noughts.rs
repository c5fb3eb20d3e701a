//! Noughts-and-crosses engine

pub mod board;
pub mod lines;

pub use board::{Board, Cell};
pub use lines::{LineAnalyzer, WINNING_LINES};

use crate::{
    Error, Result,
    game::{Game, GameOutcome, Player},
};

/// The 3x3 game. Actions are cell indices `0..9`, row-major.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoughtsAndCrosses;

impl Game for NoughtsAndCrosses {
    type State = Board;
    type Action = usize;

    const NAME: &'static str = "noughts";
    const ACTION_COUNT: usize = 9;
    // 9 cells one-hot over {empty, X, O}, then the player to move.
    const FEATURE_LEN: usize = 9 * 3 + 2;

    fn initial_state(&self) -> Board {
        Board::new()
    }

    fn legal_actions(&self, state: &Board) -> Result<Vec<usize>> {
        if state.is_terminal() {
            return Err(Error::InvalidState {
                operation: "legal_actions".to_string(),
                state: state.encode(),
            });
        }
        Ok(state.empty_positions())
    }

    fn apply(&self, state: &Board, action: usize) -> Result<Board> {
        if state.is_terminal() {
            return Err(Error::InvalidState {
                operation: "apply".to_string(),
                state: state.encode(),
            });
        }
        state.make_move(action)
    }

    fn is_terminal(&self, state: &Board) -> bool {
        state.is_terminal()
    }

    fn outcome(&self, state: &Board) -> Result<GameOutcome> {
        match state.winner() {
            Some(winner) => Ok(GameOutcome::Win(winner)),
            None if state.is_full() => Ok(GameOutcome::Draw),
            None => Err(Error::InvalidState {
                operation: "outcome".to_string(),
                state: state.encode(),
            }),
        }
    }

    fn to_move(&self, state: &Board) -> Player {
        state.to_move
    }

    fn action_index(action: usize) -> usize {
        action
    }

    fn encode(state: &Board) -> Vec<f64> {
        let mut features = vec![0.0; Self::FEATURE_LEN];
        for (i, cell) in state.cells.iter().enumerate() {
            let slot = match cell {
                Cell::Empty => 0,
                Cell::X => 1,
                Cell::O => 2,
            };
            features[i * 3 + slot] = 1.0;
        }
        features[27 + state.to_move.index()] = 1.0;
        features
    }

    /// Accepts `B3` style (row letter, column digit) or a bare `1`-`9`.
    fn parse_action(&self, input: &str) -> Result<usize> {
        let text = input.trim().to_ascii_uppercase();
        let invalid = || Error::InvalidInput {
            input: input.trim().to_string(),
            expected: self.notation_help().to_string(),
        };

        let chars: Vec<char> = text.chars().collect();
        match chars.as_slice() {
            [digit @ '1'..='9'] => Ok(*digit as usize - '1' as usize),
            [row @ 'A'..='C', col @ '1'..='3'] => {
                Ok((*row as usize - 'A' as usize) * 3 + (*col as usize - '1' as usize))
            }
            _ => Err(invalid()),
        }
    }

    fn notation_help(&self) -> &'static str {
        "a square such as B3 (row A-C, column 1-3) or a number 1-9"
    }

    /// Squares off the board fall back to their raw index.
    fn describe_action(&self, action: usize) -> String {
        match ['A', 'B', 'C'].get(action / 3) {
            Some(row) => format!("{row}{}", action % 3 + 1),
            None => action.to_string(),
        }
    }
}
