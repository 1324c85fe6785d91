//! Game phases and per-phase action validation
//!
//! Each phase accepts only the action types meaningful to it, and
//! validation is free of side effects: a rejected action proves the model
//! was not touched. The verdict carries the priced cost so callers can
//! surface it without recomputing.

use crate::core::types::config;
use crate::core::{cost, Action, ActionResult, Card, CardType, CostQuote, Wonder};
use crate::game::state::GameModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the game state machine
///
/// `Draft1`/`Draft2` cover the opening wonder draft; `AgePlay` is the main
/// loop; the four interrupt phases resolve one secondary decision before
/// play resumes; `StartPlayerSelect` bridges ages; `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Draft1,
    Draft2,
    AgePlay,
    TokenSelectPair,
    TokenSelectLibrary,
    Destruction,
    DiscardBuild,
    StartPlayerSelect,
    GameOver,
}

impl GamePhase {
    pub fn is_interrupt(self) -> bool {
        matches!(
            self,
            GamePhase::TokenSelectPair
                | GamePhase::TokenSelectLibrary
                | GamePhase::Destruction
                | GamePhase::DiscardBuild
        )
    }

    /// Validate `action` for the current player under this phase
    ///
    /// `pending_destruction` is the color a destruction interrupt is
    /// waiting on, if any.
    pub fn validate(
        self,
        action: &Action,
        model: &GameModel,
        pending_destruction: Option<CardType>,
    ) -> ActionResult {
        match self {
            GamePhase::Draft1 | GamePhase::Draft2 => validate_draft(action, model),
            GamePhase::AgePlay => validate_age_play(action, model),
            GamePhase::TokenSelectPair => validate_token_select(action, model, TokenSource::Board),
            GamePhase::TokenSelectLibrary => validate_token_select(action, model, TokenSource::Box),
            GamePhase::Destruction => validate_destruction(action, model, pending_destruction),
            GamePhase::DiscardBuild => validate_discard_build(action, model),
            GamePhase::StartPlayerSelect => match action {
                Action::ChooseStartingPlayer { .. } => ActionResult::ok(0),
                _ => wrong_action(action, self),
            },
            GamePhase::GameOver => ActionResult::invalid("the game is over"),
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Draft1 => "wonder draft (first four)",
            GamePhase::Draft2 => "wonder draft (second four)",
            GamePhase::AgePlay => "age play",
            GamePhase::TokenSelectPair => "progress token selection",
            GamePhase::TokenSelectLibrary => "progress token selection (box)",
            GamePhase::Destruction => "card destruction",
            GamePhase::DiscardBuild => "build from discard",
            GamePhase::StartPlayerSelect => "starting player selection",
            GamePhase::GameOver => "game over",
        };
        write!(f, "{name}")
    }
}

enum TokenSource {
    Board,
    Box,
}

fn wrong_action(action: &Action, phase: GamePhase) -> ActionResult {
    ActionResult::invalid(format!(
        "{} is not legal during {phase}",
        action.kind()
    ))
}

/// Price a card build for the current player: a held chain tag waives the
/// whole cost, otherwise the cost resolver decides.
pub(crate) fn build_card_quote(model: &GameModel, card: &Card) -> CostQuote {
    let player = model.current_player();
    if let Some(required) = &card.requires_chain {
        if player.has_chain_tag(required) {
            return CostQuote::free();
        }
    }
    cost::calculate_cost(player, &card.cost, model.opponent(), card.card_type)
}

/// Price a wonder build; wonders share one discount category.
pub(crate) fn build_wonder_quote(model: &GameModel, wonder: &Wonder) -> CostQuote {
    cost::calculate_cost(
        model.current_player(),
        &wonder.cost,
        model.opponent(),
        CardType::Wonder,
    )
}

fn validate_draft(action: &Action, model: &GameModel) -> ActionResult {
    let Action::DraftWonder { wonder } = action else {
        return ActionResult::invalid("only drafting a wonder is legal right now");
    };
    if model.draft_pool().contains(wonder) {
        ActionResult::ok(0)
    } else {
        ActionResult::invalid("that wonder is not in the draft pool")
    }
}

fn validate_age_play(action: &Action, model: &GameModel) -> ActionResult {
    match action {
        Action::BuildCard { card } => {
            if !model.board().pyramid().is_selectable(*card) {
                return ActionResult::invalid("that card is covered, taken, or unknown");
            }
            let Ok(card) = model.card(*card) else {
                return ActionResult::invalid("no such card");
            };
            let quote = build_card_quote(model, card);
            if quote.affordable {
                ActionResult::ok(quote.total)
            } else {
                ActionResult::invalid(format!(
                    "cannot afford {} ({} coins needed, {} held)",
                    card.name,
                    quote.total,
                    model.current_player().coins()
                ))
            }
        }
        Action::DiscardForCoins { card } => {
            if model.board().pyramid().is_selectable(*card) {
                ActionResult::ok(0)
            } else {
                ActionResult::invalid("that card is covered, taken, or unknown")
            }
        }
        Action::BuildWonder { card, wonder } => {
            if !model.board().pyramid().is_selectable(*card) {
                return ActionResult::invalid("the overlay card is covered, taken, or unknown");
            }
            if !model.current_player().owns_unbuilt_wonder(*wonder) {
                return ActionResult::invalid("you do not hold that unbuilt wonder");
            }
            if model.total_built_wonders() >= config::MAX_TOTAL_WONDERS {
                return ActionResult::invalid("all seven wonders have been built");
            }
            let Ok(wonder) = model.wonder(*wonder) else {
                return ActionResult::invalid("no such wonder");
            };
            let quote = build_wonder_quote(model, wonder);
            if quote.affordable {
                ActionResult::ok(quote.total)
            } else {
                ActionResult::invalid(format!(
                    "cannot afford {} ({} coins needed, {} held)",
                    wonder.name,
                    quote.total,
                    model.current_player().coins()
                ))
            }
        }
        _ => wrong_action(action, GamePhase::AgePlay),
    }
}

fn validate_token_select(action: &Action, model: &GameModel, source: TokenSource) -> ActionResult {
    let Action::SelectProgressToken { token } = action else {
        return ActionResult::invalid("a progress token must be chosen now");
    };
    let pool = match source {
        TokenSource::Board => model.board().available_tokens(),
        TokenSource::Box => model.board().box_tokens(),
    };
    if pool.contains(token) {
        ActionResult::ok(0)
    } else {
        ActionResult::invalid("that token is not available here")
    }
}

fn validate_destruction(
    action: &Action,
    model: &GameModel,
    pending_destruction: Option<CardType>,
) -> ActionResult {
    let Action::SelectDestruction { target } = action else {
        return ActionResult::invalid("a destruction target must be chosen now");
    };
    let Some(color) = pending_destruction else {
        return ActionResult::invalid("no destruction is pending");
    };

    match target {
        Some(card_id) => {
            let opponent = model.opponent();
            if !opponent.built_cards().contains(card_id) {
                return ActionResult::invalid("the opponent does not own that card");
            }
            match model.card(*card_id) {
                Ok(card) if card.card_type == color => ActionResult::ok(0),
                Ok(card) => ActionResult::invalid(format!(
                    "only a {} card may be destroyed, not a {} one",
                    color.color_name(),
                    card.card_type.color_name()
                )),
                Err(_) => ActionResult::invalid("no such card"),
            }
        }
        // Passing is legal exactly when there is nothing to destroy
        None => {
            if model.opponent().card_count(color) == 0 {
                ActionResult::ok(0)
            } else {
                ActionResult::invalid("a legal target exists; destruction cannot be skipped")
            }
        }
    }
}

fn validate_discard_build(action: &Action, model: &GameModel) -> ActionResult {
    let Action::SelectFromDiscard { card } = action else {
        return ActionResult::invalid("a discard-pile card must be chosen now");
    };
    if model.board().discard_pile().contains(card) {
        ActionResult::ok(0)
    } else {
        ActionResult::invalid("that card is not in the discard pile")
    }
}
