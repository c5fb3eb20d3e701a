//! Command implementations

use clap::ValueEnum;

pub mod compare;
pub mod evaluate;
pub mod play;
pub mod train;

/// Game selector shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    /// Noughts and crosses (tic-tac-toe)
    #[value(alias = "tictactoe")]
    Noughts,
    Chopsticks,
}
