//! Common test utilities for the rl-games test suite.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};

use rl_games::game::Game;

/// Every state reachable from the initial state through legal moves,
/// terminal states included, in breadth-first order.
pub fn reachable_states<G: Game>(game: &G) -> Vec<G::State> {
    let start = game.initial_state();
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut order = Vec::new();

    while let Some(state) = queue.pop_front() {
        order.push(state);
        if game.is_terminal(&state) {
            continue;
        }
        for action in game.legal_actions(&state).expect("non-terminal state") {
            let next = game.apply(&state, action).expect("legal action applies");
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    order
}
