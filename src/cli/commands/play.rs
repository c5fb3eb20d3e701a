//! Play command - A human against a trained agent in the terminal

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use super::{GameKind, train::train};
use crate::{
    adapters::MsgPackRepository,
    chopsticks::Chopsticks,
    game::{Game, GameOutcome, Player},
    noughts::NoughtsAndCrosses,
    pipeline::TrainerConfig,
    ports::{PolicyRepository, ValueEstimator},
    q_learning::PolicyStore,
};

/// Seat taken by the human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn player(self) -> Player {
        match self {
            Seat::First => Player::One,
            Seat::Second => Player::Two,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Play against a trained agent")]
pub struct PlayArgs {
    /// Game to play
    #[arg(value_enum)]
    pub game: GameKind,

    /// Trained policy file; without one an agent is trained first
    pub artifact: Option<PathBuf>,

    /// Your seat
    #[arg(long, value_enum, default_value_t = Seat::First)]
    pub seat: Seat,

    /// Training episodes when no policy file is given
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Random seed for on-the-spot training
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    match args.game {
        GameKind::Noughts => play(NoughtsAndCrosses, &args),
        GameKind::Chopsticks => play(Chopsticks, &args),
    }
}

fn play<G: Game>(game: G, args: &PlayArgs) -> Result<()> {
    let store = obtain_store(game.clone(), args)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let record = run_sessions(&game, &store, args.seat.player(), stdin.lock(), stdout.lock())
        .context("Interactive session failed")?;
    if record.games() > 1 {
        println!(
            "You won {}, the agent won {}, {} drawn.",
            record.human_wins, record.agent_wins, record.draws
        );
    }
    Ok(())
}

fn obtain_store<G: Game>(game: G, args: &PlayArgs) -> Result<PolicyStore<G>> {
    if let Some(path) = &args.artifact {
        let saved = MsgPackRepository::new()
            .load::<G>(path)
            .with_context(|| format!("Failed to load policy from {}", path.display()))?;
        return Ok(saved.into_store());
    }

    let mut config = TrainerConfig::default();
    if let Some(episodes) = args.episodes {
        config.episodes = episodes;
    }
    config.seed = args.seed;
    println!(
        "No policy given; training a {} agent for {} episodes first...",
        G::NAME,
        config.episodes
    );
    let (store, _) = train(game, config, true)?;
    Ok(store)
}

/// Results of the games finished in one sitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayRecord {
    pub human_wins: usize,
    pub agent_wins: usize,
    pub draws: usize,
}

impl PlayRecord {
    pub fn games(&self) -> usize {
        self.human_wins + self.agent_wins + self.draws
    }

    fn record(&mut self, outcome: GameOutcome, human: Player) {
        match outcome {
            GameOutcome::Win(winner) if winner == human => self.human_wins += 1,
            GameOutcome::Win(_) => self.agent_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }
}

/// Play games until the human declines another one.
///
/// The first game uses `first_seat`. After each finished game the human picks
/// a seat for the next one (`1` or `2`); a blank line, `quit` or the end of
/// input stops. Leaving a game part-way also stops.
pub fn run_sessions<G, E, R, W>(
    game: &G,
    store: &E,
    first_seat: Player,
    mut input: R,
    mut output: W,
) -> crate::Result<PlayRecord>
where
    G: Game,
    E: ValueEstimator<G> + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut record = PlayRecord::default();
    let mut human = first_seat;

    loop {
        match run_session(game, store, human, &mut input, &mut output)? {
            Some(outcome) => record.record(outcome, human),
            None => return Ok(record),
        }

        human = loop {
            write!(output, "\nPlay again as player 1 or 2? (blank to stop) ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(record);
            }
            match line.trim().to_ascii_lowercase().as_str() {
                "" | "q" | "quit" | "n" | "no" => return Ok(record),
                "1" | "first" => break Player::One,
                "2" | "second" => break Player::Two,
                other => writeln!(output, "'{other}' is not a seat. Answer 1 or 2.")?,
            }
        };
    }
}

/// Run one game between a human reading from `input` and the greedy policy
/// in `store`.
///
/// Unreadable or illegal moves are reported and the human is asked again.
/// Typing `quit` or reaching the end of input leaves the game; the result is
/// then `None`.
pub fn run_session<G, E, R, W>(
    game: &G,
    store: &E,
    human: Player,
    input: R,
    mut output: W,
) -> crate::Result<Option<GameOutcome>>
where
    G: Game,
    E: ValueEstimator<G> + ?Sized,
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "You are {human}. Enter {}, or 'quit' to leave.",
        game.notation_help()
    )?;

    let mut lines = input.lines();
    let mut state = game.initial_state();

    while !game.is_terminal(&state) {
        writeln!(output, "\n{state}")?;

        if game.to_move(&state) != human {
            let legal = game.legal_actions(&state)?;
            let action = store.best_action(&state, &legal)?;
            writeln!(output, "Agent plays {}", game.describe_action(action))?;
            state = game.apply(&state, action)?;
            continue;
        }

        state = loop {
            write!(output, "Your move> ")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                writeln!(output, "\nEnd of input, leaving the game.")?;
                return Ok(None);
            };
            let line = line?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("q") {
                writeln!(output, "Leaving the game.")?;
                return Ok(None);
            }

            match game
                .parse_action(text)
                .and_then(|action| game.apply(&state, action))
            {
                Ok(next) => break next,
                Err(e) if e.is_recoverable_input() => writeln!(output, "{e}. Try again.")?,
                Err(e) => return Err(e),
            }
        };
    }

    let outcome = game.outcome(&state)?;
    writeln!(output, "\n{state}")?;
    match outcome {
        GameOutcome::Win(winner) if winner == human => writeln!(output, "You win!")?,
        GameOutcome::Win(_) => writeln!(output, "The agent wins.")?,
        GameOutcome::Draw => writeln!(output, "It's a draw.")?,
    }
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::q_learning::QTable;

    fn session(input: &str, human: Player) -> (Option<GameOutcome>, String) {
        // An untrained table plays the lowest free square every time.
        let table = QTable::<NoughtsAndCrosses>::new(0.0);
        let mut output = Vec::new();
        let outcome = run_session(
            &NoughtsAndCrosses,
            &table,
            human,
            Cursor::new(input.to_string()),
            &mut output,
        )
        .unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_human_wins_scripted_game() {
        // The agent answers A1 then A2; C1, B2, A3 is the anti-diagonal.
        let (outcome, text) = session("B2\nC1\nA3\n", Player::One);
        assert_eq!(outcome, Some(GameOutcome::Win(Player::One)));
        assert!(text.contains("You win!"));
        assert!(text.contains("Agent plays A1"));
    }

    #[test]
    fn test_reprompts_on_bad_input() {
        let (outcome, text) = session("Z9\nB2\nB2\nC1\nA3\n", Player::One);
        assert_eq!(outcome, Some(GameOutcome::Win(Player::One)));
        assert!(text.contains("could not read 'Z9'"));
        assert!(text.contains("illegal action"));
    }

    #[test]
    fn test_end_of_input_leaves_cleanly() {
        let (outcome, text) = session("B2\n", Player::One);
        assert_eq!(outcome, None);
        assert!(text.contains("End of input"));
    }

    #[test]
    fn test_quit() {
        let (outcome, _) = session("quit\n", Player::Two);
        assert_eq!(outcome, None);
    }

    #[test]
    fn test_replay_switches_seat_then_stops() {
        let table = QTable::<NoughtsAndCrosses>::new(0.0);
        // Game one as X wins on the anti-diagonal. Game two as O: the agent
        // takes A1, A2, A3 while the human plays B1 and B2.
        let input = "B2\nC1\nA3\nhuh\n2\nB1\nB2\n\n";
        let mut output = Vec::new();
        let record = run_sessions(
            &NoughtsAndCrosses,
            &table,
            Player::One,
            Cursor::new(input),
            &mut output,
        )
        .unwrap();
        let text = String::from_utf8(output).unwrap();

        assert_eq!(
            record,
            PlayRecord {
                human_wins: 1,
                agent_wins: 1,
                draws: 0
            }
        );
        assert!(text.contains("'huh' is not a seat"));
        assert!(text.contains("You are player 2"));
        assert!(text.contains("The agent wins."));
    }

    #[test]
    fn test_replay_ends_with_input() {
        let table = QTable::<NoughtsAndCrosses>::new(0.0);
        let mut output = Vec::new();
        let record = run_sessions(
            &NoughtsAndCrosses,
            &table,
            Player::One,
            Cursor::new("B2\nC1\nA3\n"),
            &mut output,
        )
        .unwrap();
        assert_eq!(record.games(), 1);
        assert_eq!(record.human_wins, 1);
    }
}
