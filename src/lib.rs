//! # rl-games
//!
//! Noughts-and-crosses and chopsticks agents trained offline with one-step
//! temporal-difference Q-learning.
//!
//! - [`game`]: the [`Game`] trait, implemented by [`NoughtsAndCrosses`] and
//!   [`Chopsticks`]
//! - [`q_learning`]: value stores ([`QTable`], [`QNetwork`]) behind the
//!   [`ValueEstimator`] port, and versioned [`SavedPolicy`] artifacts
//! - [`pipeline`]: the [`Trainer`], greedy evaluation, head-to-head
//!   comparison and observers
//! - [`cli`]: the `train`, `evaluate`, `compare` and `play` commands
//!
//! ```
//! use rl_games::{NoughtsAndCrosses, Trainer, TrainerConfig, ValueEstimator, game::Game};
//!
//! let config = TrainerConfig::default().with_episodes(100).with_seed(1);
//! let mut trainer = Trainer::new(NoughtsAndCrosses, config)?;
//! let (store, result) = trainer.train()?;
//! assert_eq!(result.episodes, 100);
//!
//! let state = NoughtsAndCrosses.initial_state();
//! let legal = NoughtsAndCrosses.legal_actions(&state)?;
//! let opening = store.best_action(&state, &legal)?;
//! assert!(opening < 9);
//! # Ok::<(), rl_games::Error>(())
//! ```

pub mod adapters;
pub mod chopsticks;
pub mod cli;
pub mod episode;
pub mod error;
pub mod game;
pub mod noughts;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use chopsticks::Chopsticks;
pub use error::{Error, Result};
pub use game::{Game, GameOutcome, Player};
pub use noughts::NoughtsAndCrosses;
pub use pipeline::{
    ComparisonConfig, EvaluationConfig, Trainer, TrainerConfig, TrainingResult, compare, evaluate,
};
pub use ports::{Observer, PolicyRepository, ValueEstimator};
pub use q_learning::{PolicyKind, PolicyStore, QNetwork, QTable, SavedPolicy};
