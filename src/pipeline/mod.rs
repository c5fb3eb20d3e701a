//! Training and evaluation pipeline
//!
//! This module provides:
//! - Trainer configuration loaded from JSON or built in code
//! - The Q-learning trainer and its results
//! - Greedy evaluation against a random opponent
//! - Head-to-head comparison of two stored policies
//! - Observers for progress, metrics and logging

pub mod comparison;
pub mod config;
pub mod evaluation;
pub mod observers;
pub mod training;

pub use comparison::{ComparisonResult, compare};
pub use config::{
    AgentSeat, ComparisonConfig, Convergence, EpsilonSchedule, EvaluationConfig, Rewards,
    TrainerConfig, TrainingMode,
};
pub use evaluation::{EvaluationResult, evaluate};
pub use observers::{LogObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{Trainer, TrainingResult};

pub use crate::ports::Observer;
