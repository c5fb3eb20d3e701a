//! Head-to-head games between two stored policies
//!
//! Either policy may be a table or a network. A seat with a non-zero epsilon
//! plays a uniformly random move with that probability, so an empty store at
//! epsilon 1 stands in for a random player.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{
    config::ComparisonConfig,
    evaluation::{EvaluationResult, play_out},
};
use crate::{
    Error, Result,
    game::{Game, GameOutcome, Player},
    ports::ValueEstimator,
};

/// Tallies of a head-to-head run. `first` always moved first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

impl ComparisonResult {
    /// Results from the first mover's seat.
    pub fn first(&self) -> EvaluationResult {
        EvaluationResult::new(self.games, self.first_wins, self.draws, self.second_wins)
    }

    /// Results from the second mover's seat.
    pub fn second(&self) -> EvaluationResult {
        EvaluationResult::new(self.games, self.second_wins, self.draws, self.first_wins)
    }
}

/// Play `config.games` games with `first` moving first against `second`.
///
/// Both sides play greedily except for their configured exploration. Games
/// that reach `config.max_steps` count as draws.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if `config` fails validation, or any
/// engine error raised while playing.
pub fn compare<G, E1, E2>(
    game: &G,
    first: &E1,
    second: &E2,
    config: &ComparisonConfig,
) -> Result<ComparisonResult>
where
    G: Game,
    E1: ValueEstimator<G> + ?Sized,
    E2: ValueEstimator<G> + ?Sized,
{
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut result = ComparisonResult {
        games: config.games,
        first_wins: 0,
        second_wins: 0,
        draws: 0,
    };

    for _ in 0..config.games {
        let outcome = play_out(game, config.max_steps, |state, legal| {
            let mover = game.to_move(state);
            let epsilon = match mover {
                Player::One => config.first_epsilon,
                Player::Two => config.second_epsilon,
            };
            if epsilon > 0.0 && rng.random::<f64>() < epsilon {
                return legal.choose(&mut rng).copied().ok_or(Error::NoLegalActions);
            }
            match mover {
                Player::One => first.best_action(state, legal),
                Player::Two => second.best_action(state, legal),
            }
        })?;
        match outcome {
            GameOutcome::Win(Player::One) => result.first_wins += 1,
            GameOutcome::Win(Player::Two) => result.second_wins += 1,
            GameOutcome::Draw => result.draws += 1,
        }
    }

    log::info!(
        "compared {} vs {} over {} games of {}: {}-{}-{}",
        first.name(),
        second.name(),
        config.games,
        G::NAME,
        result.first_wins,
        result.draws,
        result.second_wins
    );
    Ok(result)
}
