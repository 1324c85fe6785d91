//! Automated players
//!
//! Agents are decision strategies over the public controller API: they
//! inspect read-only state, pre-validate candidate actions, and hand one
//! back. Each agent owns its own seeded generator, so a (game seed,
//! agent seed) pair replays identically.

use crate::core::{Action, Card, CardId, Effect, StartChoice};
use crate::game::controller::GameController;
use crate::game::phase::GamePhase;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A decision strategy for one seat
pub trait PlayerAgent {
    fn name(&self) -> &str;

    /// Produce one action for the current phase, or `None` when the agent
    /// sees nothing playable (only expected once the game is over)
    fn decide_action(&mut self, game: &GameController) -> Option<Action>;
}

/// Sum of the fixed victory points printed on a card
fn static_points(card: &Card) -> u32 {
    card.effects
        .iter()
        .map(|effect| match effect {
            Effect::VictoryPoints { points } => *points,
            _ => 0,
        })
        .sum()
}

fn selectable_cards(game: &GameController) -> Vec<CardId> {
    game.model()
        .board()
        .pyramid()
        .selectable()
        .map(|slot| slot.card)
        .collect()
}

/// Picks uniformly among legal actions, with a mild taste for wonders
pub struct RandomAgent {
    name: String,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        RandomAgent {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerAgent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide_action(&mut self, game: &GameController) -> Option<Action> {
        match game.phase() {
            GamePhase::Draft1 | GamePhase::Draft2 => game
                .model()
                .draft_pool()
                .choose(&mut self.rng)
                .map(|wonder| Action::DraftWonder { wonder: *wonder }),

            GamePhase::TokenSelectPair => game
                .model()
                .board()
                .available_tokens()
                .choose(&mut self.rng)
                .map(|token| Action::SelectProgressToken { token: *token }),

            GamePhase::TokenSelectLibrary => game
                .model()
                .board()
                .box_tokens()
                .choose(&mut self.rng)
                .map(|token| Action::SelectProgressToken { token: *token }),

            GamePhase::Destruction => {
                let mut candidates = game.model().opponent().built_cards().to_vec();
                candidates.shuffle(&mut self.rng);
                for card in candidates {
                    let action = Action::SelectDestruction { target: Some(card) };
                    if game.validate_action(&action).is_valid {
                        return Some(action);
                    }
                }
                Some(Action::SelectDestruction { target: None })
            }

            GamePhase::DiscardBuild => game
                .model()
                .board()
                .discard_pile()
                .choose(&mut self.rng)
                .map(|card| Action::SelectFromDiscard { card: *card }),

            GamePhase::StartPlayerSelect => {
                let choice = if self.rng.gen_bool(0.5) {
                    StartChoice::Me
                } else {
                    StartChoice::Opponent
                };
                Some(Action::ChooseStartingPlayer { choice })
            }

            GamePhase::AgePlay => {
                let mut cards = selectable_cards(game);
                cards.shuffle(&mut self.rng);
                let fallback = *cards.first()?;

                // Now and then, try to get a wonder on the table
                if self.rng.gen_ratio(1, 5) {
                    let wonders = game.model().current_player().unbuilt_wonders().to_vec();
                    for wonder in wonders {
                        for card in &cards {
                            let action = Action::BuildWonder {
                                card: *card,
                                wonder,
                            };
                            if game.validate_action(&action).is_valid {
                                return Some(action);
                            }
                        }
                    }
                }

                for card in &cards {
                    if self.rng.gen_bool(0.7) {
                        let action = Action::BuildCard { card: *card };
                        if game.validate_action(&action).is_valid {
                            return Some(action);
                        }
                    }
                }
                Some(Action::DiscardForCoins { card: fallback })
            }

            GamePhase::GameOver => None,
        }
    }
}

/// Buys the most points it can afford, favoring civilian cards, then
/// wonders; discards only as a last resort
pub struct GreedyAgent {
    name: String,
    rng: ChaCha8Rng,
}

impl GreedyAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        GreedyAgent {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn best_affordable_build(&self, game: &GameController) -> Option<(Action, u32)> {
        let mut best: Option<(Action, u32, bool)> = None;
        for card_id in selectable_cards(game) {
            let action = Action::BuildCard { card: card_id };
            if !game.validate_action(&action).is_valid {
                continue;
            }
            let Ok(card) = game.model().card(card_id) else {
                continue;
            };
            let points = static_points(card);
            let civilian = card.card_type == crate::core::CardType::Civilian;
            let better = match &best {
                None => true,
                Some((_, best_points, best_civ)) => {
                    points > *best_points || (points == *best_points && civilian && !best_civ)
                }
            };
            if better {
                best = Some((action, points, civilian));
            }
        }
        best.map(|(action, points, _)| (action, points))
    }
}

impl PlayerAgent for GreedyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide_action(&mut self, game: &GameController) -> Option<Action> {
        match game.phase() {
            GamePhase::Draft1 | GamePhase::Draft2 => game
                .model()
                .draft_pool()
                .choose(&mut self.rng)
                .map(|wonder| Action::DraftWonder { wonder: *wonder }),

            GamePhase::TokenSelectPair => game
                .model()
                .board()
                .available_tokens()
                .first()
                .map(|token| Action::SelectProgressToken { token: *token }),

            GamePhase::TokenSelectLibrary => game
                .model()
                .board()
                .box_tokens()
                .first()
                .map(|token| Action::SelectProgressToken { token: *token }),

            GamePhase::Destruction => {
                // Take the most valuable legal target
                let mut targets: Vec<(u32, CardId)> = game
                    .model()
                    .opponent()
                    .built_cards()
                    .iter()
                    .filter_map(|id| game.model().card(*id).ok())
                    .map(|card| (static_points(card), card.id))
                    .collect();
                targets.sort_by(|a, b| b.0.cmp(&a.0));
                for (_, card) in targets {
                    let action = Action::SelectDestruction { target: Some(card) };
                    if game.validate_action(&action).is_valid {
                        return Some(action);
                    }
                }
                Some(Action::SelectDestruction { target: None })
            }

            GamePhase::DiscardBuild => {
                let mut pile: Vec<(u32, CardId)> = game
                    .model()
                    .board()
                    .discard_pile()
                    .iter()
                    .filter_map(|id| game.model().card(*id).ok())
                    .map(|card| (static_points(card), card.id))
                    .collect();
                pile.sort_by(|a, b| b.0.cmp(&a.0));
                pile.first()
                    .map(|(_, card)| Action::SelectFromDiscard { card: *card })
            }

            GamePhase::StartPlayerSelect => Some(Action::ChooseStartingPlayer {
                choice: StartChoice::Me,
            }),

            GamePhase::AgePlay => {
                let best = self.best_affordable_build(game);
                if let Some((action, points)) = &best {
                    if *points > 0 {
                        return Some(*action);
                    }
                }

                let cards = selectable_cards(game);
                let wonders = game.model().current_player().unbuilt_wonders().to_vec();
                for wonder in wonders {
                    for card in &cards {
                        let action = Action::BuildWonder {
                            card: *card,
                            wonder,
                        };
                        if game.validate_action(&action).is_valid {
                            return Some(action);
                        }
                    }
                }

                if let Some((action, _)) = best {
                    return Some(action);
                }
                cards
                    .first()
                    .map(|card| Action::DiscardForCoins { card: *card })
            }

            GamePhase::GameOver => None,
        }
    }
}
