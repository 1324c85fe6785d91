//! Final scoring
//!
//! Runs once, after the age 3 pyramid is exhausted without a supremacy.
//! Sums built-card points (guilds included), wonder points, the military
//! tier, banked coins, and progress token points. Ties break on civilian
//! points; a full tie is a draw.

use crate::core::types::config;
use crate::core::{CardType, ProgressToken, VictoryType};
use crate::game::state::GameModel;

/// Per-player score breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub cards: u32,
    pub wonders: u32,
    pub military: u32,
    pub coins: u32,
    pub tokens: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.cards + self.wonders + self.military + self.coins + self.tokens
    }
}

pub struct ScoringManager;

impl ScoringManager {
    pub fn score(model: &GameModel, idx: usize) -> ScoreBreakdown {
        let player = model.player(idx);
        let opponent = model.player(1 - idx);

        let mut breakdown = ScoreBreakdown::default();
        for card_id in player.built_cards() {
            if let Ok(card) = model.card(*card_id) {
                breakdown.cards += card.victory_points(player, opponent);
            }
        }
        for wonder_id in player.built_wonders() {
            if let Ok(wonder) = model.wonder(*wonder_id) {
                breakdown.wonders += wonder.victory_points(player, opponent);
            }
        }
        breakdown.military = model.board().military.victory_points(idx);
        breakdown.coins = player.coins() / config::COINS_PER_VP;
        breakdown.tokens = Self::token_points(model, idx);
        breakdown
    }

    fn token_points(model: &GameModel, idx: usize) -> u32 {
        let player = model.player(idx);
        let mut points = 0;
        if player.has_token(ProgressToken::Agriculture) {
            points += config::AGRICULTURE_VP;
        }
        if player.has_token(ProgressToken::Philosophy) {
            points += config::PHILOSOPHY_VP;
        }
        if player.has_token(ProgressToken::Mathematics) {
            points += config::MATHEMATICS_VP_PER_TOKEN * player.token_count() as u32;
        }
        points
    }

    /// Civilian-card points only, for the tie-break
    pub fn civilian_points(model: &GameModel, idx: usize) -> u32 {
        let player = model.player(idx);
        let opponent = model.player(1 - idx);
        player
            .built_cards()
            .iter()
            .filter_map(|id| model.card(*id).ok())
            .filter(|card| card.card_type == CardType::Civilian)
            .map(|card| card.victory_points(player, opponent))
            .sum()
    }

    /// Decide the game at the end of age 3; `None` winner is a draw
    pub fn final_result(model: &GameModel) -> (Option<usize>, VictoryType) {
        let totals = [
            Self::score(model, 0).total(),
            Self::score(model, 1).total(),
        ];
        if totals[0] != totals[1] {
            let winner = if totals[0] > totals[1] { 0 } else { 1 };
            return (Some(winner), VictoryType::Civilian);
        }

        let civilian = [
            Self::civilian_points(model, 0),
            Self::civilian_points(model, 1),
        ];
        if civilian[0] != civilian[1] {
            let winner = if civilian[0] > civilian[1] { 0 } else { 1 };
            return (Some(winner), VictoryType::Civilian);
        }
        (None, VictoryType::Civilian)
    }
}
