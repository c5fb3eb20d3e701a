//! Scripted human sessions against a fixed policy.

use std::io::Cursor;

use rl_games::{
    chopsticks::Chopsticks,
    cli::commands::play::run_session,
    game::{Game, GameOutcome, Player},
    noughts::NoughtsAndCrosses,
    q_learning::QTable,
};

fn play<G: Game>(game: &G, human: Player, input: &str) -> (Option<GameOutcome>, String) {
    // An empty table always picks the lowest-index legal action.
    let table = QTable::<G>::new(0.0);
    let mut output = Vec::new();
    let outcome = run_session(game, &table, human, Cursor::new(input.to_string()), &mut output)
        .expect("session should not fail");
    (outcome, String::from_utf8(output).unwrap())
}

#[test]
fn noughts_full_game_as_second_player() {
    // The agent opens A1 then A2; A3 blocks and C1 completes the anti-diagonal.
    let (outcome, text) = play(&NoughtsAndCrosses, Player::Two, "B2\nA3\nC1\n");
    assert_eq!(outcome, Some(GameOutcome::Win(Player::Two)));
    assert!(text.contains("Agent plays A1"));
    assert!(text.contains("Your move> "));
}

#[test]
fn noughts_reprompts_until_legal() {
    let (outcome, text) = play(&NoughtsAndCrosses, Player::One, "hello\n\nB2\nA1\nC1\nA3\n");
    assert_eq!(outcome, Some(GameOutcome::Win(Player::One)));
    assert!(text.contains("could not read 'hello'"));
    assert!(text.contains("illegal action"));
    assert!(text.contains("You win!"));
}

#[test]
fn chopsticks_rejects_bad_notation_and_illegal_splits() {
    let (outcome, text) = play(&Chopsticks, Player::One, "poke\nsplit R 3\ntap L L\n");
    assert_eq!(outcome, None);
    assert!(text.contains("could not read 'poke'"));
    assert!(text.contains("illegal action split R 3"));
    assert!(text.contains("Agent plays"));
    assert!(text.contains("End of input"));
}
