//! Compare command - Two policies head-to-head, in both seatings

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use super::GameKind;
use crate::{
    adapters::MsgPackRepository,
    chopsticks::Chopsticks,
    cli::output::{
        format_number, format_share, print_kv, print_section, print_stats_table, print_subsection,
    },
    game::Game,
    noughts::NoughtsAndCrosses,
    pipeline::{ComparisonConfig, ComparisonResult, compare},
    ports::{PolicyRepository, ValueEstimator},
    q_learning::PolicyStore,
};

/// Stands for a uniformly random player instead of a policy file.
pub const RANDOM: &str = "random";

#[derive(Parser, Debug)]
#[command(about = "Play two policies against each other")]
pub struct CompareArgs {
    /// Game both policies were trained on
    #[arg(value_enum)]
    pub game: GameKind,

    /// First policy file, or `random`
    pub first: String,

    /// Second policy file, or `random`
    pub second: String,

    /// Games per seating
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Chance that a policy plays a random move instead of its best one
    #[arg(long, default_value_t = 0.0)]
    pub epsilon: f64,

    /// Step cap per game; longer games count as draws
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Random seed for exploration and random players
    #[arg(long)]
    pub seed: Option<u64>,
}

/// One seating and its tallies.
#[derive(Debug, Clone)]
pub struct Matchup {
    pub first: String,
    pub second: String,
    pub result: ComparisonResult,
}

struct Contestant<G: Game> {
    label: String,
    store: PolicyStore<G>,
    epsilon: f64,
}

fn contestant<G: Game>(spec: &str, epsilon: f64) -> Result<Contestant<G>> {
    if spec.eq_ignore_ascii_case(RANDOM) {
        return Ok(Contestant {
            label: RANDOM.to_string(),
            store: PolicyStore::table(0.0),
            epsilon: 1.0,
        });
    }

    let path = Path::new(spec);
    let saved = MsgPackRepository::new()
        .load::<G>(path)
        .with_context(|| format!("Failed to load policy from {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(spec);
    Ok(Contestant {
        label: format!("{stem} ({})", saved.store.name()),
        store: saved.into_store(),
        epsilon,
    })
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let matchups = match args.game {
        GameKind::Noughts => compare_both(NoughtsAndCrosses, &args)?,
        GameKind::Chopsticks => compare_both(Chopsticks, &args)?,
    };

    print_section("Head-to-head results");
    print_kv("Games per seating", &format_number(args.games));
    for matchup in &matchups {
        let first = matchup.result.first();
        let second = matchup.result.second();
        print_subsection(&format!("{} vs {}", matchup.first, matchup.second));
        print_stats_table(&[
            ("First mover wins", format_share(first.wins, first.win_rate)),
            ("Draws", format_share(first.draws, first.draw_rate)),
            ("Second mover wins", format_share(second.wins, second.win_rate)),
        ]);
    }
    Ok(())
}

/// Play `first` against `second`, then with the seats swapped.
pub fn compare_both<G: Game>(game: G, args: &CompareArgs) -> Result<Vec<Matchup>> {
    let first = contestant::<G>(&args.first, args.epsilon)?;
    let second = contestant::<G>(&args.second, args.epsilon)?;

    let config = ComparisonConfig {
        games: args.games,
        first_epsilon: first.epsilon,
        second_epsilon: second.epsilon,
        max_steps: args.max_steps,
        seed: args.seed,
    };

    let mut matchups = Vec::with_capacity(2);
    for (a, b, config) in [(&first, &second, config), (&second, &first, config.swapped())] {
        let result = compare(&game, &a.store, &b.store, &config)
            .with_context(|| format!("Comparing {} with {} failed", a.label, b.label))?;
        matchups.push(Matchup {
            first: a.label.clone(),
            second: b.label.clone(),
            result,
        });
    }
    Ok(matchups)
}
