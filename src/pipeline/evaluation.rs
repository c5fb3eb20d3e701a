//! Greedy evaluation against a uniformly random opponent

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::config::EvaluationConfig;
use crate::{
    Error, Result,
    game::{Game, GameOutcome},
    ports::ValueEstimator,
};

/// Win/draw/loss tallies from the agent's seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl EvaluationResult {
    pub fn new(games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if games > 0 {
                count as f64 / games as f64
            } else {
                0.0
            }
        };
        Self {
            games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }

    /// Fraction of games the agent did not lose.
    pub fn non_loss_rate(&self) -> f64 {
        self.win_rate + self.draw_rate
    }
}

/// Play `config.games` games of the frozen greedy policy in `store` against a
/// uniformly random opponent.
///
/// Games that reach `config.max_steps` count as draws.
pub fn evaluate<G, E>(game: &G, store: &E, config: &EvaluationConfig) -> Result<EvaluationResult>
where
    G: Game,
    E: ValueEstimator<G> + ?Sized,
{
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let (mut wins, mut draws, mut losses) = (0, 0, 0);

    for index in 0..config.games {
        let agent = config.agent_seat.seat_for(index);
        let outcome = play_out(game, config.max_steps, |state, legal| {
            if game.to_move(state) == agent {
                store.best_action(state, legal)
            } else {
                legal.choose(&mut rng).copied().ok_or(Error::NoLegalActions)
            }
        })?;
        match outcome {
            GameOutcome::Win(winner) if winner == agent => wins += 1,
            GameOutcome::Win(_) => losses += 1,
            GameOutcome::Draw => draws += 1,
        }
    }

    log::info!(
        "evaluated {} games of {}: {wins} wins, {draws} draws, {losses} losses",
        config.games,
        G::NAME
    );
    Ok(EvaluationResult::new(config.games, wins, draws, losses))
}

/// Play one game from the initial state, asking `choose` for every move.
///
/// A game still running after `max_steps` moves is a draw.
pub(crate) fn play_out<G, F>(game: &G, max_steps: usize, mut choose: F) -> Result<GameOutcome>
where
    G: Game,
    F: FnMut(&G::State, &[G::Action]) -> Result<G::Action>,
{
    let mut state = game.initial_state();
    let mut steps = 0;

    while !game.is_terminal(&state) && steps < max_steps {
        let legal = game.legal_actions(&state)?;
        let action = choose(&state, &legal)?;
        state = game.apply(&state, action)?;
        steps += 1;
    }

    if game.is_terminal(&state) {
        game.outcome(&state)
    } else {
        Ok(GameOutcome::Draw)
    }
}
