//! Episode records produced by training and evaluation

use crate::game::{Game, GameOutcome, Player};

/// One transition of an episode, seen from the player who moved.
#[derive(Debug, Clone)]
pub struct Step<G: Game> {
    pub player: Player,
    pub state: G::State,
    pub action: G::Action,
    pub next_state: G::State,
    /// 0 except on each player's last move, which carries the final reward
    /// from that player's perspective.
    pub reward: f64,
}

/// A complete play-through from the initial state.
#[derive(Debug, Clone)]
pub struct Episode<G: Game> {
    pub steps: Vec<Step<G>>,
    /// Draw when the episode was truncated.
    pub outcome: GameOutcome,
    /// Stopped at the step cap rather than at a terminal state.
    pub truncated: bool,
    /// Exploration rate used for the learning seats.
    pub epsilon: f64,
    /// Largest absolute change any update made to a stored value.
    pub max_value_change: f64,
    /// Seat whose results are tallied (the learning seat, or player one in
    /// self-play).
    pub perspective: Player,
}

impl<G: Game> Episode<G> {
    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            outcome: self.outcome,
            steps: self.steps.len(),
            truncated: self.truncated,
            epsilon: self.epsilon,
            max_value_change: self.max_value_change,
            perspective: self.perspective,
        }
    }

    /// Every state a player was asked to move from.
    pub fn decision_states(&self) -> impl Iterator<Item = &G::State> {
        self.steps.iter().map(|step| &step.state)
    }
}

/// Game-agnostic digest of an episode, handed to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub outcome: GameOutcome,
    pub steps: usize,
    pub truncated: bool,
    pub epsilon: f64,
    pub max_value_change: f64,
    pub perspective: Player,
}

impl EpisodeSummary {
    pub fn is_win(&self) -> bool {
        self.outcome == GameOutcome::Win(self.perspective)
    }

    pub fn is_loss(&self) -> bool {
        self.outcome.is_loss_for(self.perspective)
    }
}
