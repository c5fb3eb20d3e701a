//! A table agent trained as the second player stops losing to a random
//! first player.

use rl_games::{
    noughts::NoughtsAndCrosses,
    pipeline::{
        AgentSeat, EpsilonSchedule, EvaluationConfig, Trainer, TrainerConfig, TrainingMode,
        evaluate,
    },
};

#[test]
fn second_player_table_agent_rarely_loses_to_random() {
    let config = TrainerConfig::default()
        .with_episodes(100_000)
        .with_seed(2024)
        .with_mode(TrainingMode::VsRandom)
        .with_agent_seat(AgentSeat::Second)
        .with_learning_rate(0.2)
        .with_discount(0.9)
        .with_epsilon(EpsilonSchedule::Linear {
            start: 1.0,
            end: 0.05,
            episodes: 80_000,
        });
    let mut trainer = Trainer::new(NoughtsAndCrosses, config).unwrap();
    let (store, training) = trainer.train().unwrap();
    assert_eq!(training.episodes, 100_000);

    let evaluation = evaluate(
        &NoughtsAndCrosses,
        &store,
        &EvaluationConfig::default()
            .with_games(2_000)
            .with_agent_seat(AgentSeat::Second)
            .with_seed(7),
    )
    .unwrap();

    assert!(
        evaluation.loss_rate <= 0.05,
        "lost {} of {} games",
        evaluation.losses,
        evaluation.games
    );
}
