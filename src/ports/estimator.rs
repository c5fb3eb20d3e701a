//! Value estimator port - abstraction over Q-value backends
//!
//! The trainer, evaluation and interactive play only ever talk to this trait,
//! so a Q-table and a Q-network are interchangeable behind it.

use crate::{
    Error, Result,
    game::Game,
};

/// Estimates the value of taking an action in a state.
///
/// # Examples
///
/// ```
/// use rl_games::{
///     game::Game,
///     noughts::NoughtsAndCrosses,
///     ports::ValueEstimator,
///     q_learning::QTable,
/// };
///
/// let game = NoughtsAndCrosses;
/// let state = game.initial_state();
/// let mut table = QTable::<NoughtsAndCrosses>::new(0.0);
///
/// table.update(&state, 4, 1.0, 0.5);
/// assert_eq!(table.value(&state, 4), 0.5);
///
/// let legal = game.legal_actions(&state)?;
/// assert_eq!(table.best_action(&state, &legal)?, 4);
/// # Ok::<(), rl_games::Error>(())
/// ```
pub trait ValueEstimator<G: Game> {
    /// Current estimate for `(state, action)`.
    ///
    /// Never fails: unseen pairs get the backend's default.
    fn value(&self, state: &G::State, action: G::Action) -> f64;

    /// Move the estimate towards `target`:
    /// `value ← value + learning_rate · (target − value)`.
    ///
    /// This is the only mutation entry point.
    fn update(&mut self, state: &G::State, action: G::Action, target: f64, learning_rate: f64);

    /// Backend name, used in logs and artifacts.
    fn name(&self) -> &str;

    /// Estimates for each of `actions`, in the same order.
    ///
    /// Backends that can score every action at once should override this.
    fn action_values(&self, state: &G::State, actions: &[G::Action]) -> Vec<f64> {
        actions
            .iter()
            .map(|&action| self.value(state, action))
            .collect()
    }

    /// The action with the highest estimate.
    ///
    /// Ties go to the action with the lowest [`Game::action_index`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if `legal_actions` is empty.
    fn best_action(&self, state: &G::State, legal_actions: &[G::Action]) -> Result<G::Action> {
        let values = self.action_values(state, legal_actions);
        let mut best: Option<(G::Action, f64)> = None;

        for (&action, &value) in legal_actions.iter().zip(values.iter()) {
            best = match best {
                Some((current, best_value))
                    if best_value > value
                        || (best_value == value
                            && G::action_index(current) < G::action_index(action)) =>
                {
                    Some((current, best_value))
                }
                _ => Some((action, value)),
            };
        }

        best.map(|(action, _)| action).ok_or(Error::NoLegalActions)
    }

    /// `max_a value(state, a)` over `legal_actions`, or 0 when there are none.
    fn max_value(&self, state: &G::State, legal_actions: &[G::Action]) -> f64 {
        if legal_actions.is_empty() {
            return 0.0;
        }
        self.action_values(state, legal_actions)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
