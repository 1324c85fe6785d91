//! Duel Forge - command line driver
//!
//! Loads a dataset, seats two automated agents, and plays games to
//! completion. Seeds make every run reproducible.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use duel_forge::game::{
    GameController, GameEndReason, GameLoop, GreedyAgent, PlayerAgent, RandomAgent, VerbosityLevel,
};
use duel_forge::loader;
use std::path::PathBuf;

/// Agent type for a seat
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AgentType {
    /// Makes random legal choices
    Random,
    /// Buys the most points it can afford
    Greedy,
}

impl AgentType {
    fn build(self, name: &str, seed: u64) -> Box<dyn PlayerAgent> {
        match self {
            AgentType::Random => Box::new(RandomAgent::new(name, seed)),
            AgentType::Greedy => Box::new(GreedyAgent::new(name, seed)),
        }
    }
}

/// Verbosity level (accepts both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Duel Forge - two-player card-drafting rules engine", long_about = None)]
struct Cli {
    /// Dataset directory holding cards.json and wonders.json
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Player 1 agent type
    #[arg(long, value_enum, default_value = "random")]
    p1: AgentType,

    /// Player 2 agent type
    #[arg(long, value_enum, default_value = "random")]
    p2: AgentType,

    /// Player 1 name
    #[arg(long, default_value = "Player 1")]
    p1_name: String,

    /// Player 2 name
    #[arg(long, default_value = "Player 2")]
    p2_name: String,

    /// Base random seed (game i runs with seed + i)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', default_value = "minimal")]
    verbosity: VerbosityArg,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (cards, wonders) = loader::load_dataset(&cli.data)
        .with_context(|| format!("loading dataset from {}", cli.data.display()))?;

    let mut wins = [0u32; 2];
    let mut draws = 0u32;

    for game_no in 0..cli.games {
        let seed = cli.seed + game_no as u64;
        let mut controller = GameController::new(
            cards.clone(),
            wonders.clone(),
            [&cli.p1_name, &cli.p2_name],
            seed,
            cli.verbosity.0,
        )?;

        let mut agents: [Box<dyn PlayerAgent>; 2] = [
            cli.p1.build(&cli.p1_name, seed.wrapping_add(1)),
            cli.p2.build(&cli.p2_name, seed.wrapping_add(2)),
        ];

        let result = GameLoop::new(&mut controller).run(&mut agents)?;

        for entry in controller.model().log.entries() {
            println!("{}", entry.message);
        }
        match result.end_reason {
            GameEndReason::Finished => {
                let outcome = match result.winner {
                    Some(idx) => format!(
                        "{} wins by {:?}",
                        controller.model().player(idx).name(),
                        result.victory.expect("finished games carry a victory type")
                    ),
                    None => "draw".to_string(),
                };
                println!(
                    "game {game_no} (seed {seed}): {outcome}, score {}-{} in {} actions",
                    result.scores[0], result.scores[1], result.actions_taken
                );
            }
            GameEndReason::ActionLimit => {
                println!("game {game_no} (seed {seed}): aborted at the action limit");
            }
        }

        match result.winner {
            Some(idx) => wins[idx] += 1,
            None => draws += 1,
        }
    }

    if cli.games > 1 {
        println!(
            "{}: {} wins, {}: {} wins, {} draws",
            cli.p1_name, wins[0], cli.p2_name, wins[1], draws
        );
    }
    Ok(())
}
