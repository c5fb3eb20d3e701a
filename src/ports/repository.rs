//! Repository port for trained-policy persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage of trained-policy artifacts.

use std::path::Path;

use crate::{Result, game::Game, q_learning::SavedPolicy};

/// Port for persisting and loading trained policies.
///
/// Implementations must round-trip exactly: a loaded policy answers `value`
/// and `best_action` queries identically to the one that was saved.
///
/// # Examples
///
/// ```no_run
/// use rl_games::{
///     adapters::MsgPackRepository,
///     noughts::NoughtsAndCrosses,
///     ports::PolicyRepository,
///     q_learning::{PolicyStore, SavedPolicy, TrainingMetadata},
/// };
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let store = PolicyStore::<NoughtsAndCrosses>::table(0.0);
/// let saved = SavedPolicy::new(store, TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("noughts.policy"))?;
/// let loaded = repo.load::<NoughtsAndCrosses>(Path::new("noughts.policy"))?;
/// # Ok::<(), rl_games::Error>(())
/// ```
pub trait PolicyRepository {
    /// Save a policy artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the location cannot be
    /// written.
    fn save<G: Game>(&self, policy: &SavedPolicy<G>, path: &Path) -> Result<()>;

    /// Load a policy artifact for game `G`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read, the data is corrupt,
    /// the format version is unsupported, or the artifact belongs to another
    /// game.
    fn load<G: Game>(&self, path: &Path) -> Result<SavedPolicy<G>>;
}
