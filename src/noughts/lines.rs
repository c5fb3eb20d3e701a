//! Winning line analysis for noughts-and-crosses

use super::Cell;

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if `mark` occupies all three cells of some line
    pub fn has_line(cells: &[Cell; 9], mark: Cell) -> bool {
        mark != Cell::Empty
            && WINNING_LINES
                .iter()
                .any(|line| line.iter().all(|&idx| cells[idx] == mark))
    }
}
