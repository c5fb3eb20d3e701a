//! Trained stores survive a save/load cycle unchanged.

use std::collections::HashSet;

use rl_games::{
    adapters::{InMemoryRepository, MsgPackRepository},
    chopsticks::Chopsticks,
    game::Game,
    noughts::NoughtsAndCrosses,
    pipeline::{Trainer, TrainerConfig, TrainingMode},
    ports::{PolicyRepository, ValueEstimator},
    q_learning::{PolicyKind, PolicyStore, SavedPolicy, TrainingMetadata},
};
use tempfile::tempdir;

/// Train for `episodes` and return the store plus every decision state seen.
fn train_and_record<G: Game>(
    game: G,
    config: TrainerConfig,
) -> (PolicyStore<G>, HashSet<G::State>) {
    let episodes = config.episodes;
    let mut trainer = Trainer::new(game, config).unwrap();
    let mut store = trainer.new_store().unwrap();
    let mut visited = HashSet::new();
    for episode in 0..episodes {
        let record = trainer.run_episode(&mut store, episode).unwrap();
        visited.extend(record.decision_states().copied());
    }
    (store, visited)
}

fn assert_same_choices<G: Game>(
    game: &G,
    original: &PolicyStore<G>,
    restored: &PolicyStore<G>,
    visited: &HashSet<G::State>,
) {
    assert!(!visited.is_empty());
    for state in visited {
        let legal = game.legal_actions(state).unwrap();
        assert_eq!(
            original.best_action(state, &legal).unwrap(),
            restored.best_action(state, &legal).unwrap(),
            "best action differs in {state}"
        );
        for &action in &legal {
            assert_eq!(original.value(state, action), restored.value(state, action));
        }
    }
}

#[test]
fn table_roundtrip_through_msgpack_file() {
    let config = TrainerConfig::default().with_episodes(300).with_seed(3);
    let (store, visited) = train_and_record(NoughtsAndCrosses, config);

    let dir = tempdir().unwrap();
    let path = dir.path().join("noughts.policy");
    let repo = MsgPackRepository::new();
    let saved = SavedPolicy::new(
        store.clone(),
        TrainingMetadata::new(300, TrainingMode::SelfPlay, Some(3)),
    );
    repo.save(&saved, &path).unwrap();

    let loaded = repo.load::<NoughtsAndCrosses>(&path).unwrap();
    assert_eq!(loaded.metadata.episodes_trained, 300);
    assert_eq!(loaded.metadata.policy, PolicyKind::Table);
    assert_same_choices(&NoughtsAndCrosses, &store, &loaded.into_store(), &visited);
}

#[test]
fn network_roundtrip_through_msgpack_file() {
    let config = TrainerConfig::default()
        .with_episodes(100)
        .with_seed(8)
        .with_learning_rate(0.01)
        .with_policy_kind(PolicyKind::Network);
    let (store, visited) = train_and_record(Chopsticks, config);
    assert_eq!(store.kind(), PolicyKind::Network);

    let dir = tempdir().unwrap();
    let path = dir.path().join("chopsticks.policy");
    let repo = MsgPackRepository::new();
    repo.save(&SavedPolicy::new(store.clone(), TrainingMetadata::default()), &path)
        .unwrap();

    let loaded = repo.load::<Chopsticks>(&path).unwrap();
    assert_eq!(loaded.metadata.policy, PolicyKind::Network);
    assert_same_choices(&Chopsticks, &store, &loaded.into_store(), &visited);
}

#[test]
fn chopsticks_table_roundtrip_in_memory() {
    let config = TrainerConfig::default().with_episodes(200).with_seed(21);
    let (store, visited) = train_and_record(Chopsticks, config);

    let repo = InMemoryRepository::new();
    let path = std::path::Path::new("chopsticks");
    repo.save(&SavedPolicy::new(store.clone(), TrainingMetadata::default()), path)
        .unwrap();
    let loaded = repo.load::<Chopsticks>(path).unwrap();
    assert_same_choices(&Chopsticks, &store, &loaded.store, &visited);
}
