//! Drives a game to completion with two agents

use crate::core::VictoryType;
use crate::game::agents::PlayerAgent;
use crate::game::controller::GameController;
use crate::game::phase::GamePhase;
use crate::game::scoring::ScoringManager;
use crate::{DuelError, Result};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    /// The rules engine declared an outcome
    Finished,
    /// The action cap was hit before the game ended
    ActionLimit,
}

/// Result of running a game to completion
#[derive(Debug, Clone)]
pub struct GameResult {
    /// Winner seat, `None` on a draw (or an aborted run)
    pub winner: Option<usize>,
    pub victory: Option<VictoryType>,
    pub end_reason: GameEndReason,
    pub actions_taken: u32,
    /// Final score totals, seat 0 first
    pub scores: [u32; 2],
}

/// Game loop manager
pub struct GameLoop<'a> {
    controller: &'a mut GameController,
    max_actions: u32,
}

impl<'a> GameLoop<'a> {
    pub fn new(controller: &'a mut GameController) -> Self {
        GameLoop {
            controller,
            // A real game takes well under 100 actions
            max_actions: 500,
        }
    }

    pub fn with_max_actions(mut self, max_actions: u32) -> Self {
        self.max_actions = max_actions;
        self
    }

    /// Alternate agent decisions until the game ends
    ///
    /// The seat whose turn (or interrupt) it is decides each step. An
    /// agent handing back an invalid action is a bug in the agent, not a
    /// game state, and aborts the run.
    pub fn run(&mut self, agents: &mut [Box<dyn PlayerAgent>; 2]) -> Result<GameResult> {
        let mut actions_taken = 0u32;

        while self.controller.phase() != GamePhase::GameOver {
            if actions_taken >= self.max_actions {
                return Ok(GameResult {
                    winner: None,
                    victory: None,
                    end_reason: GameEndReason::ActionLimit,
                    actions_taken,
                    scores: self.scores(),
                });
            }

            let seat = self.controller.model().current_player_index();
            let action = agents[seat].decide_action(self.controller).ok_or_else(|| {
                DuelError::InvalidAction(format!(
                    "agent {} found no action in phase {}",
                    agents[seat].name(),
                    self.controller.phase()
                ))
            })?;

            if !self.controller.process_action(&action) {
                return Err(DuelError::InvalidAction(format!(
                    "agent {} produced an invalid action: {}",
                    agents[seat].name(),
                    action.kind()
                )));
            }
            actions_taken += 1;
        }

        Ok(GameResult {
            winner: self.controller.model().winner(),
            victory: self.controller.model().victory_type(),
            end_reason: GameEndReason::Finished,
            actions_taken,
            scores: self.scores(),
        })
    }

    fn scores(&self) -> [u32; 2] {
        [
            ScoringManager::score(self.controller.model(), 0).total(),
            ScoringManager::score(self.controller.model(), 1).total(),
        ]
    }
}
