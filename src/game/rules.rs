//! Pure rule checks: science pairs and instant victory
//!
//! Nothing here mutates state; the controller acts on the verdicts.

use crate::core::types::config;
use crate::core::{Player, ScienceSymbol, VictoryType};
use crate::game::state::GameModel;

/// Outcome of an instant-victory check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictoryCheck {
    pub winner: usize,
    pub victory: VictoryType,
}

pub struct RulesEngine;

impl RulesEngine {
    /// Symbol that just reached the pair threshold and has not yet paid
    /// its bonus, if any
    pub fn new_science_pair(player: &Player) -> Option<ScienceSymbol> {
        ScienceSymbol::ALL.into_iter().find(|symbol| {
            player.science_symbol_count(*symbol) >= config::SCIENCE_PAIR_COUNT
                && !player.has_claimed_pair(*symbol)
        })
    }

    /// Military or science supremacy, checked after every action
    pub fn check_instant_victory(model: &GameModel) -> Option<VictoryCheck> {
        let military = &model.board().military;
        if military.is_supremacy() {
            let winner = military.leader().expect("supremacy implies a leader");
            return Some(VictoryCheck {
                winner,
                victory: VictoryType::Military,
            });
        }

        for (idx, player) in model.players().iter().enumerate() {
            if player.distinct_science_symbols() >= config::SCIENCE_WIN_THRESHOLD {
                return Some(VictoryCheck {
                    winner: idx,
                    victory: VictoryType::Science,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::log::VerbosityLevel;

    fn model() -> GameModel {
        GameModel::new(Vec::new(), Vec::new(), ["Alice", "Bob"], VerbosityLevel::Silent)
    }

    #[test]
    fn test_science_pair_detected_once() {
        let mut player = Player::new(0, "Alice");
        assert_eq!(RulesEngine::new_science_pair(&player), None);

        player.add_science_symbol(ScienceSymbol::Globe);
        assert_eq!(RulesEngine::new_science_pair(&player), None);

        player.add_science_symbol(ScienceSymbol::Globe);
        assert_eq!(
            RulesEngine::new_science_pair(&player),
            Some(ScienceSymbol::Globe)
        );

        // Claiming silences the symbol forever, even at higher counts
        player.add_claimed_pair(ScienceSymbol::Globe);
        player.add_science_symbol(ScienceSymbol::Globe);
        assert_eq!(RulesEngine::new_science_pair(&player), None);
    }

    #[test]
    fn test_military_supremacy() {
        let mut model = model();
        assert!(RulesEngine::check_instant_victory(&model).is_none());

        model.board_mut().military.advance(9, 1);
        let check = RulesEngine::check_instant_victory(&model).unwrap();
        assert_eq!(check.winner, 1);
        assert_eq!(check.victory, VictoryType::Military);
    }

    #[test]
    fn test_science_supremacy_needs_six_distinct() {
        let mut model = model();
        for symbol in ScienceSymbol::ALL.into_iter().take(5) {
            model.player_mut(1).add_science_symbol(symbol);
            // Duplicates of the same symbols must not count
            model.player_mut(1).add_science_symbol(symbol);
        }
        assert!(RulesEngine::check_instant_victory(&model).is_none());

        model.player_mut(1).add_science_symbol(ScienceSymbol::ALL[5]);
        let check = RulesEngine::check_instant_victory(&model).unwrap();
        assert_eq!(check.winner, 1);
        assert_eq!(check.victory, VictoryType::Science);
    }
}
