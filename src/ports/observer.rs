//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events, allowing
//! composable progress reporting and metrics without coupling the training
//! loop to specific output formats.

use crate::{Result, episode::EpisodeSummary};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once at the beginning
/// 2. `on_episode_end(episode, summary)` - after every episode's updates
/// 3. `on_training_end()` - once at the end, also after early convergence
///
/// # Examples
///
/// ```no_run
/// use rl_games::{episode::EpisodeSummary, ports::Observer};
///
/// struct LossCounter {
///     losses: usize,
/// }
///
/// impl Observer for LossCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         summary: &EpisodeSummary,
///     ) -> rl_games::Result<()> {
///         if summary.is_loss() {
///             self.losses += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after an episode has finished and its updates are applied.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
