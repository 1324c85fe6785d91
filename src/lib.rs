//! Duel Forge - rules engine for a two-player card-drafting board game
//!
//! The engine validates and executes player actions against a shared game
//! model: a card pyramid with covering/reveal semantics, a military track
//! with one-shot loot tokens, per-player resource and science bookkeeping,
//! and a closed effect system triggered by card and wonder construction.
//! Decision-making (human or AI) lives outside the core and talks to it
//! exclusively through `validate_action`/`process_action`.

pub mod core;
pub mod board;
pub mod game;
pub mod loader;
pub mod error;

pub use error::{DuelError, Result};
