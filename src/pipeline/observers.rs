//! Observer implementations for the trainer
//!
//! Observers allow composable reporting during training without coupling the
//! training loop to specific output formats.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, episode::EpisodeSummary, ports::Observer};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn tally(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        if summary.is_win() {
            self.wins += 1;
        } else if summary.is_loss() {
            self.losses += 1;
        } else {
            self.draws += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.tally());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    wins: usize,
    draws: usize,
    losses: usize,
    truncated: usize,
    episode_lengths: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    fn total(&self) -> usize {
        self.episode_lengths.len()
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            count as f64 / self.total() as f64
        }
    }

    /// Get average episode length in steps
    pub fn avg_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<usize>() as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total(),
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            truncated: self.truncated,
            win_rate: self.rate(self.wins),
            draw_rate: self.rate(self.draws),
            loss_rate: self.rate(self.losses),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub truncated: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_episode_length: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.episode_lengths.push(summary.steps);
        if summary.truncated {
            self.truncated += 1;
        }
        if summary.is_win() {
            self.wins += 1;
        } else if summary.is_loss() {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
        Ok(())
    }
}

/// Writes a debug line every `interval` episodes and warns when many
/// episodes in a row hit the step cap.
pub struct LogObserver {
    interval: usize,
    truncated_in_interval: usize,
    wins_in_interval: usize,
}

impl LogObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            truncated_in_interval: 0,
            wins_in_interval: 0,
        }
    }
}

impl Observer for LogObserver {
    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        if summary.truncated {
            self.truncated_in_interval += 1;
        }
        if summary.is_win() {
            self.wins_in_interval += 1;
        }

        if (episode + 1) % self.interval == 0 {
            log::debug!(
                "episode {}: epsilon {:.4}, wins {}/{}, last max value change {:.6}",
                episode + 1,
                summary.epsilon,
                self.wins_in_interval,
                self.interval,
                summary.max_value_change
            );
            if self.truncated_in_interval * 2 > self.interval {
                log::warn!(
                    "{} of the last {} episodes hit the step cap",
                    self.truncated_in_interval,
                    self.interval
                );
            }
            self.truncated_in_interval = 0;
            self.wins_in_interval = 0;
        }
        Ok(())
    }
}
