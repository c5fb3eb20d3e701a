//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;
use crate::game::Player;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// The mark placed by `player`. Player one plays X.
    pub fn mark_of(player: Player) -> Cell {
        match player {
            Player::One => Cell::X,
            Player::Two => Cell::O,
        }
    }
}

/// Complete board state including cells and whose turn it is
///
/// This type is `Copy`: 9 bytes for cells plus 1 byte for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

impl Board {
    /// Create a new empty board with X (player one) to move
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; 9],
            to_move: Player::One,
        }
    }

    /// Create a board from a string of 9 cell characters.
    ///
    /// Whitespace is ignored. The player to move is inferred from the piece
    /// counts: X moves when the counts are equal, O when X is one ahead.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if there are not exactly 9
    /// cells, a character is not a cell, or the piece counts are impossible.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = |expected: &str| crate::Error::InvalidInput {
            input: s.to_string(),
            expected: expected.to_string(),
        };

        if chars.len() != 9 {
            return Err(invalid("exactly 9 cells"));
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| invalid("cells from '.', 'X', 'O'"))?;
        }

        let x = cells.iter().filter(|&&c| c == Cell::X).count();
        let o = cells.iter().filter(|&&c| c == Cell::O).count();
        let to_move = if x == o {
            Player::One
        } else if x == o + 1 {
            Player::Two
        } else {
            return Err(invalid("X count equal to O count or one more"));
        };

        Ok(Board { cells, to_move })
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place the mover's mark at `pos` and pass the turn.
    ///
    /// Only checks the target cell; callers that need terminal checks go
    /// through [`crate::game::Game::apply`].
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<Board, crate::Error> {
        if pos >= 9 || !self.is_empty(pos) {
            return Err(crate::Error::IllegalAction {
                action: pos.to_string(),
                state: self.encode(),
            });
        }

        let mut next = *self;
        next.cells[pos] = Cell::mark_of(self.to_move);
        next.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// Check if a player has three in a row
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_line(&self.cells, Cell::mark_of(player))
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&player| self.has_won(player))
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Compact single-line encoding, e.g. `X.O.X....`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|c| c.to_char()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Rows are labelled `A`-`C` to match the move notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   123")?;
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            let label = char::from(b'A' + row as u8);
            let line: String = chunk.iter().map(|c| c.to_char()).collect();
            write!(f, "{label}  {line}")?;
            if row < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_positions().len(), 9);
        assert_eq!(board.to_move, Player::One);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_make_move_alternates_marks() {
        let board = Board::new().make_move(4).unwrap().make_move(0).unwrap();
        assert_eq!(board.get(4), Cell::X);
        assert_eq!(board.get(0), Cell::O);
        assert_eq!(board.to_move, Player::One);
    }

    #[test]
    fn test_make_move_rejects_occupied_cell() {
        let board = Board::new().make_move(4).unwrap();
        let err = board.make_move(4).unwrap_err();
        assert!(matches!(err, crate::Error::IllegalAction { .. }));
        assert!(board.make_move(9).is_err());
    }

    #[test]
    fn test_from_string_infers_turn() {
        let board = Board::from_string("X.. .O. ..X").unwrap();
        assert_eq!(board.to_move, Player::Two);
        assert_eq!(board.encode(), "X...O...X");
    }

    #[test]
    fn test_from_string_rejects_bad_counts() {
        assert!(Board::from_string("XX.......").is_err());
        assert!(Board::from_string("X..").is_err());
        assert!(Board::from_string("X.Z......").is_err());
    }

    #[test]
    fn test_winner_and_draw() {
        let win = Board::from_string("XXXOO....").unwrap();
        assert_eq!(win.winner(), Some(Player::One));
        assert!(win.is_terminal());

        let draw = Board::from_string("XOXXOOOXX").unwrap();
        assert_eq!(draw.winner(), None);
        assert!(draw.is_full());
        assert!(draw.is_terminal());
    }

    #[test]
    fn test_display_labels_rows() {
        let board = Board::from_string("X.O.X....").unwrap();
        assert_eq!(board.to_string(), "   123\nA  X.O\nB  .X.\nC  ...");
    }
}
