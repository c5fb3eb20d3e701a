//! Q-learning trainer
//!
//! Each episode runs `Start → (select ε-greedy → apply → observe) … →
//! Terminal → final updates`. A learning seat's previous `(state, action)` is
//! updated when that seat is about to move again, bootstrapping from the
//! state it now faces. At the end every pending pair is pulled towards its
//! seat's terminal reward with no bootstrap.

use std::{collections::VecDeque, path::Path};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::config::{TrainerConfig, TrainingMode};
use crate::{
    Error, Result,
    episode::{Episode, Step},
    game::{Game, GameOutcome, Player},
    ports::{Observer, ValueEstimator},
    q_learning::PolicyStore,
};

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes actually played
    pub episodes: usize,

    /// Tallies from the perspective of the first learning seat
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,

    /// Episodes cut off at the step cap (counted as draws)
    pub truncated: usize,

    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,

    /// Exploration rate of the last episode
    pub final_epsilon: f64,

    /// Whether the convergence check stopped training early
    pub converged: bool,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(episodes: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if episodes > 0 {
                count as f64 / episodes as f64
            } else {
                0.0
            }
        };

        Self {
            episodes,
            wins,
            draws,
            losses,
            truncated: 0,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            final_epsilon: 0.0,
            converged: false,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create summary {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs Q-learning episodes against a value store.
pub struct Trainer<G: Game> {
    game: G,
    config: TrainerConfig,
    rng: StdRng,
    observers: Vec<Box<dyn Observer>>,
}

impl<G: Game> Trainer<G> {
    /// Create a trainer for `game`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails
    /// [`TrainerConfig::validate`].
    pub fn new(game: G, config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            game,
            config,
            rng,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// A fresh store of the configured kind.
    pub fn new_store(&mut self) -> Result<PolicyStore<G>> {
        let seed = match self.config.seed {
            Some(seed) => seed,
            None => self.rng.random(),
        };
        PolicyStore::new(&self.config.policy, seed)
    }

    /// Build a fresh store and train it.
    pub fn train(&mut self) -> Result<(PolicyStore<G>, TrainingResult)> {
        let mut store = self.new_store()?;
        let result = self.run(&mut store)?;
        Ok((store, result))
    }

    /// Train `store` for the configured number of episodes.
    ///
    /// The store is consistent after every episode, so a run that fails
    /// part-way leaves it usable.
    pub fn run<E>(&mut self, store: &mut E) -> Result<TrainingResult>
    where
        E: ValueEstimator<G> + ?Sized,
    {
        let total = self.config.episodes;
        log::info!(
            "training {} with {} for {} episodes ({:?})",
            G::NAME,
            store.name(),
            total,
            self.config.mode
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let (mut wins, mut draws, mut losses, mut truncated) = (0, 0, 0, 0);
        let mut played = 0;
        let mut converged = false;
        let mut recent_changes = VecDeque::new();

        for episode in 0..total {
            let record = self.run_episode(store, episode)?;
            let summary = record.summary();
            played += 1;

            if summary.is_win() {
                wins += 1;
            } else if summary.is_loss() {
                losses += 1;
            } else {
                draws += 1;
            }
            if summary.truncated {
                truncated += 1;
            }

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }

            if let Some(convergence) = self.config.convergence {
                recent_changes.push_back(summary.max_value_change);
                if recent_changes.len() > convergence.window {
                    recent_changes.pop_front();
                }
                let largest = recent_changes.iter().copied().fold(0.0, f64::max);
                if recent_changes.len() == convergence.window && largest < convergence.threshold {
                    log::info!(
                        "converged after {} episodes (largest change {largest:.2e} over {} episodes)",
                        played,
                        convergence.window
                    );
                    converged = true;
                    break;
                }
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let mut result = TrainingResult::new(played, wins, draws, losses);
        result.truncated = truncated;
        result.converged = converged;
        result.final_epsilon = self.config.epsilon.value(played.saturating_sub(1));

        log::info!(
            "finished {} episodes: {} wins, {} draws, {} losses",
            result.episodes,
            result.wins,
            result.draws,
            result.losses
        );
        Ok(result)
    }

    /// Seats that learn in `episode`, indexed by [`Player::index`].
    fn learning_seats(&self, episode: usize) -> [bool; 2] {
        match self.config.mode {
            TrainingMode::SelfPlay => [true, true],
            TrainingMode::VsRandom => {
                let seat = self.config.agent_seat.seat_for(episode);
                [seat == Player::One, seat == Player::Two]
            }
        }
    }

    /// Play one episode and apply its updates to `store`.
    pub fn run_episode<E>(&mut self, store: &mut E, episode: usize) -> Result<Episode<G>>
    where
        E: ValueEstimator<G> + ?Sized,
    {
        let epsilon = self.config.epsilon.value(episode);
        let learning = self.learning_seats(episode);
        let perspective = match self.config.mode {
            TrainingMode::SelfPlay => Player::One,
            TrainingMode::VsRandom => self.config.agent_seat.seat_for(episode),
        };

        let mut pending: [Option<(G::State, G::Action)>; 2] = [None, None];
        let mut steps: Vec<Step<G>> = Vec::new();
        let mut max_value_change: f64 = 0.0;
        let mut truncated = false;
        let mut state = self.game.initial_state();

        while !self.game.is_terminal(&state) {
            if steps.len() >= self.config.max_steps {
                truncated = true;
                break;
            }

            let player = self.game.to_move(&state);
            let seat = player.index();
            let legal = self.game.legal_actions(&state)?;

            let action = if learning[seat] {
                if let Some((previous, previous_action)) = pending[seat].take() {
                    let target = self.config.discount * store.max_value(&state, &legal);
                    let change = self.update(store, &previous, previous_action, target);
                    max_value_change = max_value_change.max(change);
                }
                self.select_action(&*store, &state, &legal, epsilon)?
            } else {
                *legal.choose(&mut self.rng).ok_or(Error::NoLegalActions)?
            };

            let next_state = self.game.apply(&state, action)?;
            if learning[seat] {
                pending[seat] = Some((state, action));
            }
            steps.push(Step {
                player,
                state,
                action,
                next_state,
                reward: 0.0,
            });
            state = next_state;
        }

        let outcome = if truncated {
            GameOutcome::Draw
        } else {
            self.game.outcome(&state)?
        };

        for player in [Player::One, Player::Two] {
            let reward = self.config.rewards.for_player(outcome, player);
            if let Some((previous, previous_action)) = pending[player.index()].take() {
                let change = self.update(store, &previous, previous_action, reward);
                max_value_change = max_value_change.max(change);
            }
            if let Some(step) = steps.iter_mut().rev().find(|step| step.player == player) {
                step.reward = reward;
            }
        }

        Ok(Episode {
            steps,
            outcome,
            truncated,
            epsilon,
            max_value_change,
            perspective,
        })
    }

    /// ε-greedy choice among `legal`.
    fn select_action<E>(
        &mut self,
        store: &E,
        state: &G::State,
        legal: &[G::Action],
        epsilon: f64,
    ) -> Result<G::Action>
    where
        E: ValueEstimator<G> + ?Sized,
    {
        if self.rng.random::<f64>() < epsilon {
            legal
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoLegalActions)
        } else {
            store.best_action(state, legal)
        }
    }

    /// Apply one update and report how far the stored value moved.
    fn update<E>(&self, store: &mut E, state: &G::State, action: G::Action, target: f64) -> f64
    where
        E: ValueEstimator<G> + ?Sized,
    {
        let before = store.value(state, action);
        store.update(state, action, target, self.config.learning_rate);
        (store.value(state, action) - before).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chopsticks::Chopsticks,
        noughts::{Board, NoughtsAndCrosses},
        pipeline::{
            config::{AgentSeat, Convergence, EpsilonSchedule},
            observers::MetricsObserver,
        },
        q_learning::{PolicyKind, QTable},
    };

    fn config() -> TrainerConfig {
        TrainerConfig::default().with_episodes(200).with_seed(42)
    }

    #[test]
    fn test_trainer_rejects_invalid_config() {
        let result = Trainer::new(NoughtsAndCrosses, config().with_learning_rate(0.0));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_training_runs_all_episodes() {
        let mut trainer = Trainer::new(NoughtsAndCrosses, config())
            .unwrap()
            .with_observer(Box::new(MetricsObserver::new()));
        let (store, result) = trainer.train().unwrap();

        assert_eq!(result.episodes, 200);
        assert_eq!(result.wins + result.draws + result.losses, 200);
        assert!(!result.converged);
        assert!(store.as_table().is_some_and(|table| table.size() > 0));
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = || {
            let mut trainer = Trainer::new(Chopsticks, config()).unwrap();
            let (store, result) = trainer.train().unwrap();
            let size = store.as_table().map(QTable::size);
            (result, size)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_episode_rewards_follow_outcome() {
        let mut trainer = Trainer::new(NoughtsAndCrosses, config()).unwrap();
        let mut table = QTable::<NoughtsAndCrosses>::new(0.0);

        for episode in 0..20 {
            let record = trainer.run_episode(&mut table, episode).unwrap();
            assert!(!record.truncated);
            let last = record.steps.last().unwrap();
            assert!(NoughtsAndCrosses.is_terminal(&last.next_state));

            for player in [Player::One, Player::Two] {
                let expected = trainer.config().rewards.for_player(record.outcome, player);
                let rewards: Vec<f64> = record
                    .steps
                    .iter()
                    .filter(|step| step.player == player)
                    .map(|step| step.reward)
                    .collect();
                let (final_reward, earlier) = rewards.split_last().unwrap();
                assert_eq!(*final_reward, expected);
                assert!(earlier.iter().all(|&reward| reward == 0.0));
            }
        }
    }

    #[test]
    fn test_terminal_update_uses_reward_only() {
        let config = config()
            .with_learning_rate(1.0)
            .with_epsilon(EpsilonSchedule::Constant(0.0));
        let mut trainer = Trainer::new(NoughtsAndCrosses, config).unwrap();
        let mut table = QTable::<NoughtsAndCrosses>::new(0.0);

        let record = trainer.run_episode(&mut table, 0).unwrap();
        let outcome = record.outcome;
        for player in [Player::One, Player::Two] {
            let last = record
                .steps
                .iter()
                .rev()
                .find(|step| step.player == player)
                .unwrap();
            // With a full learning step the last pair equals the terminal reward.
            assert_eq!(
                table.get(&last.state, last.action),
                trainer.config().rewards.for_player(outcome, player)
            );
        }
    }

    #[test]
    fn test_bootstrap_uses_state_after_reply() {
        let config = config()
            .with_learning_rate(1.0)
            .with_discount(0.5)
            .with_epsilon(EpsilonSchedule::Constant(0.0));
        let mut trainer = Trainer::new(NoughtsAndCrosses, config).unwrap();
        let mut table = QTable::<NoughtsAndCrosses>::new(0.0);

        // Greedy play with ties to the lowest index always opens X0, O1, X2...
        let faced = Board::from_string("XO.......").unwrap();
        table.set(faced, 2, 0.8);

        let record = trainer.run_episode(&mut table, 0).unwrap();
        assert_eq!(record.steps[0].action, 0);
        assert_eq!(record.steps[1].action, 1);
        assert_eq!(record.steps[2].state, faced);
        assert_eq!(table.get(&Board::new(), 0), 0.5 * 0.8);
    }

    #[test]
    fn test_vs_random_only_updates_learning_seat() {
        let config = config()
            .with_mode(TrainingMode::VsRandom)
            .with_agent_seat(AgentSeat::Second);
        let mut trainer = Trainer::new(NoughtsAndCrosses, config).unwrap();
        let mut table = QTable::<NoughtsAndCrosses>::new(0.0);

        for episode in 0..50 {
            let record = trainer.run_episode(&mut table, episode).unwrap();
            assert_eq!(record.perspective, Player::Two);
        }
        // Every stored state has O to move.
        assert!(
            table
                .states()
                .iter()
                .all(|state| NoughtsAndCrosses.to_move(state) == Player::Two)
        );
    }

    #[test]
    fn test_chopsticks_truncation_scores_a_draw() {
        let config = config().with_max_steps(3).with_episodes(30);
        let mut trainer = Trainer::new(Chopsticks, config).unwrap();
        let mut table = QTable::<Chopsticks>::new(0.0);

        let record = trainer.run_episode(&mut table, 0).unwrap();
        assert!(record.truncated);
        assert_eq!(record.steps.len(), 3);
        assert_eq!(record.outcome, GameOutcome::Draw);

        let result = trainer.run(&mut table).unwrap();
        assert_eq!(result.truncated, 30);
        assert_eq!(result.draws, 30);
    }

    #[test]
    fn test_convergence_stops_early() {
        // Discount 0 and draw-only truncated episodes settle quickly at zero.
        let config = TrainerConfig::default()
            .with_episodes(10_000)
            .with_seed(1)
            .with_max_steps(1)
            .with_discount(0.0)
            .with_convergence(Convergence {
                threshold: 1e-9,
                window: 5,
            });
        let mut trainer = Trainer::new(Chopsticks, config).unwrap();
        let (_, result) = trainer.train().unwrap();
        assert!(result.converged);
        assert_eq!(result.episodes, 5);
    }

    #[test]
    fn test_network_store_trains() {
        let config = config()
            .with_episodes(50)
            .with_learning_rate(0.01)
            .with_policy_kind(PolicyKind::Network);
        let mut trainer = Trainer::new(NoughtsAndCrosses, config).unwrap();
        let (store, result) = trainer.train().unwrap();
        assert_eq!(store.kind(), PolicyKind::Network);
        assert_eq!(result.episodes, 50);
    }

    #[test]
    fn test_result_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let result = TrainingResult::new(4, 2, 1, 1);
        result.save(&path).unwrap();
        assert_eq!(TrainingResult::load(&path).unwrap(), result);
    }
}
