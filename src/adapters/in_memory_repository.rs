//! In-memory policy repository for testing.
//!
//! This adapter provides a pure in-memory implementation of PolicyRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    Result, error::Error, game::Game, ports::PolicyRepository, q_learning::SavedPolicy,
};

/// In-memory repository for testing.
///
/// Stores encoded artifacts in a shared HashMap keyed by path. Artifacts go
/// through the same MessagePack encoding as on disk, so version and game
/// checks behave identically.
///
/// # Examples
///
/// ```
/// use rl_games::adapters::InMemoryRepository;
/// use rl_games::noughts::NoughtsAndCrosses;
/// use rl_games::ports::PolicyRepository;
/// use rl_games::q_learning::{PolicyStore, SavedPolicy, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedPolicy::new(
///     PolicyStore::<NoughtsAndCrosses>::table(0.0),
///     TrainingMetadata::default(),
/// );
///
/// // Save to "memory" (not disk)
/// repo.save(&saved, Path::new("noughts"))?;
///
/// // Load from "memory"
/// let loaded = repo.load::<NoughtsAndCrosses>(Path::new("noughts"))?;
/// # Ok::<(), rl_games::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of artifacts currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored artifacts.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if an artifact exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl PolicyRepository for InMemoryRepository {
    fn save<G: Game>(&self, policy: &SavedPolicy<G>, path: &Path) -> Result<()> {
        let bytes = policy.to_bytes()?;
        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load<G: Game>(&self, path: &Path) -> Result<SavedPolicy<G>> {
        let storage = self.storage();
        let bytes = storage.get(&key(path)).ok_or_else(|| Error::Io {
            operation: format!("load policy from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;
        SavedPolicy::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chopsticks::{Chopsticks, Hand, Stroke},
        ports::ValueEstimator,
        q_learning::{PolicyStore, TrainingMetadata},
    };

    fn saved_policy() -> SavedPolicy<Chopsticks> {
        let mut store = PolicyStore::table(0.0);
        let split = Stroke::split(Hand::Left, 1).unwrap();
        store.update(&Chopsticks.initial_state(), split, -1.0, 0.5);
        SavedPolicy::new(store, TrainingMetadata::default())
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("chopsticks");

        // Initially empty
        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&saved_policy(), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        let loaded = repo.load::<Chopsticks>(path).unwrap();
        let split = Stroke::split(Hand::Left, 1).unwrap();
        assert_eq!(loaded.store.value(&Chopsticks.initial_state(), split), -0.5);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        let result = repo.load::<Chopsticks>(Path::new("nonexistent"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_clear_removes_all() {
        let repo = InMemoryRepository::new();
        repo.save(&saved_policy(), Path::new("p1")).unwrap();
        repo.save(&saved_policy(), Path::new("p2")).unwrap();
        assert_eq!(repo.count(), 2);

        repo.clear();
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let path = Path::new("shared");

        repo1.save(&saved_policy(), path).unwrap();
        assert!(repo2.load::<Chopsticks>(path).is_ok());
        assert_eq!(repo1.count(), 1);
        assert_eq!(repo2.count(), 1);
    }
}
