//! Game orchestration: state machine, commands, scoring, and agents

pub mod agents;
pub mod commands;
pub mod controller;
pub mod game_loop;
pub mod log;
pub mod phase;
pub mod rules;
pub mod scoring;
pub mod state;

pub use agents::{GreedyAgent, PlayerAgent, RandomAgent};
pub use commands::PendingInterrupt;
pub use controller::GameController;
pub use game_loop::{GameEndReason, GameLoop, GameResult};
pub use log::{GameLog, LogEntry, VerbosityLevel};
pub use phase::GamePhase;
pub use rules::RulesEngine;
pub use scoring::{ScoreBreakdown, ScoringManager};
pub use state::GameModel;
