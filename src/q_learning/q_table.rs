//! Tabular value store

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{game::Game, ports::ValueEstimator};

/// Q-table mapping (state, action) pairs to Q-values
///
/// States carry the player to move, so one table serves both seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct QTable<G: Game> {
    /// Q-values: (state, action) -> Q-value
    values: HashMap<(G::State, G::Action), f64>,
    /// Value reported for unseen state-action pairs
    default_value: f64,
}

impl<G: Game> QTable<G> {
    /// Create an empty Q-table
    pub fn new(default_value: f64) -> Self {
        Self {
            values: HashMap::new(),
            default_value,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &G::State, action: G::Action) -> f64 {
        self.values
            .get(&(*state, action))
            .copied()
            .unwrap_or(self.default_value)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: G::State, action: G::Action, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distinct states with at least one stored value.
    pub fn states(&self) -> HashSet<G::State> {
        self.values.keys().map(|(state, _)| *state).collect()
    }
}

impl<G: Game> ValueEstimator<G> for QTable<G> {
    fn value(&self, state: &G::State, action: G::Action) -> f64 {
        self.get(state, action)
    }

    fn update(&mut self, state: &G::State, action: G::Action, target: f64, learning_rate: f64) {
        let current = self.get(state, action);
        self.set(*state, action, current + learning_rate * (target - current));
    }

    fn name(&self) -> &str {
        "q-table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noughts::{Board, NoughtsAndCrosses};

    fn table() -> QTable<NoughtsAndCrosses> {
        QTable::new(0.0)
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::<NoughtsAndCrosses>::new(0.25);
        assert_eq!(qtable.get(&Board::new(), 0), 0.25);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = table();
        let state = Board::new();
        qtable.set(state, 4, 1.5);
        assert_eq!(qtable.get(&state, 4), 1.5);
        assert_eq!(qtable.size(), 1);
    }

    #[test]
    fn test_max_value() {
        let mut qtable = table();
        let state = Board::new();
        qtable.set(state, 0, 0.5);
        qtable.set(state, 1, 1.5);
        qtable.set(state, 2, 0.8);

        assert_eq!(qtable.max_value(&state, &[0, 1, 2]), 1.5);
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = table();
        let state = Board::new();
        qtable.set(state, 0, 0.5);
        qtable.set(state, 1, 1.5);
        qtable.set(state, 2, 0.8);

        assert_eq!(qtable.best_action(&state, &[0, 1, 2]).unwrap(), 1);
    }

    #[test]
    fn test_update_moves_towards_target() {
        let mut qtable = table();
        let state = Board::from_string("X........").unwrap();

        qtable.update(&state, 4, 1.0, 0.5);
        assert!((qtable.get(&state, 4) - 0.5).abs() < 1e-12);

        qtable.update(&state, 4, 1.0, 0.5);
        assert!((qtable.get(&state, 4) - 0.75).abs() < 1e-12);

        // A full step lands exactly on the target.
        qtable.update(&state, 4, -1.0, 1.0);
        assert_eq!(qtable.get(&state, 4), -1.0);
    }

    #[test]
    fn test_states_are_distinct() {
        let mut qtable = table();
        let first = Board::new();
        let second = Board::from_string("X........").unwrap();
        qtable.set(first, 0, 0.1);
        qtable.set(first, 1, 0.2);
        qtable.set(second, 4, 0.3);

        assert_eq!(qtable.states().len(), 2);
    }
}
