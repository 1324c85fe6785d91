//! Command execution: the only mutation path into the model
//!
//! The controller validates first, then hands the action here. Commands
//! receive the model plus a [`PendingInterrupt`] scratch object instead of
//! controller internals; everything an effect may request of the turn
//! (interrupt phase, extra turn, destruction color) is funneled through
//! it. An error out of this module after successful validation is an
//! engine bug, not a player mistake.

use crate::core::types::config;
use crate::core::{Action, CardId, CardType, Effect, ProgressToken, StartChoice, WonderId};
use crate::game::phase::{self, GamePhase};
use crate::game::state::GameModel;
use crate::{DuelError, Result};

/// What the just-executed command asks of the turn machinery
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingInterrupt {
    /// Interrupt phase to enter instead of ending the turn
    pub next_phase: Option<GamePhase>,
    /// Color a destruction interrupt is waiting on
    pub destruction_color: Option<CardType>,
    /// Suppress the player switch at turn end, once
    pub extra_turn: bool,
}

/// Execute a validated action under the given phase
pub fn execute(
    action: &Action,
    current_phase: GamePhase,
    model: &mut GameModel,
    pending: &mut PendingInterrupt,
) -> Result<()> {
    match action {
        Action::DraftWonder { wonder } => draft_wonder(model, *wonder),
        Action::BuildCard { card } => build_card(model, *card, pending),
        Action::DiscardForCoins { card } => discard_for_coins(model, *card),
        Action::BuildWonder { card, wonder } => build_wonder(model, *card, *wonder, pending),
        Action::SelectProgressToken { token } => {
            select_progress_token(model, *token, current_phase)
        }
        Action::SelectDestruction { target } => select_destruction(model, *target),
        Action::SelectFromDiscard { card } => select_from_discard(model, *card, pending),
        Action::ChooseStartingPlayer { choice } => choose_starting_player(model, *choice),
    }
}

fn contract_violation(what: impl Into<String>) -> DuelError {
    DuelError::InvalidAction(what.into())
}

fn draft_wonder(model: &mut GameModel, wonder_id: WonderId) -> Result<()> {
    if !model.take_from_draft_pool(wonder_id) {
        return Err(contract_violation("drafted wonder not in pool"));
    }
    let name = model.wonder(wonder_id)?.name.clone();
    let idx = model.current_player_index();
    model.player_mut(idx).add_unbuilt_wonder(wonder_id);

    let player = model.player(idx).name().to_string();
    model.log.normal(format!("{player} drafts {name}"));
    Ok(())
}

fn build_card(model: &mut GameModel, card_id: CardId, pending: &mut PendingInterrupt) -> Result<()> {
    let card = model.card(card_id)?.clone();
    let quote = phase::build_card_quote(model, &card);
    let chain_free = card
        .requires_chain
        .as_deref()
        .is_some_and(|tag| model.current_player().has_chain_tag(tag));

    model.board_mut().remove_from_pyramid(card_id)?;

    let (player, opponent, _, log) = model.turn_parts_mut();
    player.pay_coins(quote.total);
    if quote.trading > 0 && opponent.has_token(ProgressToken::Economy) {
        opponent.gain_coins(quote.trading);
        log.verbose(format!(
            "{} collects {} coins of trading fees",
            opponent.name(),
            quote.trading
        ));
    }
    if chain_free && player.has_token(ProgressToken::Urbanism) {
        player.gain_coins(config::URBANISM_CHAIN_BONUS);
        log.verbose(format!(
            "{} gains {} coins for building through a chain",
            player.name(),
            config::URBANISM_CHAIN_BONUS
        ));
    }
    player.construct_card(&card);
    log.normal(format!(
        "{} builds {} for {} coins",
        player.name(),
        card.name,
        quote.total
    ));

    apply_effects(&card.effects, model, pending);
    Ok(())
}

fn discard_for_coins(model: &mut GameModel, card_id: CardId) -> Result<()> {
    let name = model.card(card_id)?.name.clone();
    model.board_mut().remove_from_pyramid(card_id)?;
    model.board_mut().add_to_discard(card_id);

    let (player, _, _, log) = model.turn_parts_mut();
    let gain = config::BASE_DISCARD_GAIN + player.card_count(CardType::Commercial);
    player.gain_coins(gain);
    log.normal(format!(
        "{} discards {name} for {gain} coins",
        player.name()
    ));
    Ok(())
}

fn build_wonder(
    model: &mut GameModel,
    card_id: CardId,
    wonder_id: WonderId,
    pending: &mut PendingInterrupt,
) -> Result<()> {
    let wonder = model.wonder(wonder_id)?.clone();
    let quote = phase::build_wonder_quote(model, &wonder);

    model.board_mut().remove_from_pyramid(card_id)?;
    model.wonder_mut(wonder_id)?.build(card_id);

    let (player, opponent, _, log) = model.turn_parts_mut();
    player.pay_coins(quote.total);
    if quote.trading > 0 && opponent.has_token(ProgressToken::Economy) {
        opponent.gain_coins(quote.trading);
        log.verbose(format!(
            "{} collects {} coins of trading fees",
            opponent.name(),
            quote.trading
        ));
    }
    if !player.construct_wonder(wonder_id) {
        return Err(contract_violation("wonder not in the builder's hand"));
    }
    log.normal(format!(
        "{} builds {} for {} coins",
        player.name(),
        wonder.name,
        quote.total
    ));

    apply_effects(&wonder.effects, model, pending);

    // Theology makes every own wonder a play-again wonder
    if model.current_player().has_token(ProgressToken::Theology) {
        pending.extra_turn = true;
    }

    // The seventh wonder closes construction for good
    if model.total_built_wonders() >= config::MAX_TOTAL_WONDERS {
        let mut dropped = 0;
        for idx in 0..2 {
            dropped += model.player_mut(idx).clear_unbuilt_wonders();
        }
        if dropped > 0 {
            model.log.normal(format!(
                "the seventh wonder is built; {dropped} unbuilt wonders are discarded"
            ));
        }
    }
    Ok(())
}

fn select_progress_token(
    model: &mut GameModel,
    token: ProgressToken,
    current_phase: GamePhase,
) -> Result<()> {
    let taken = match current_phase {
        GamePhase::TokenSelectPair => model.board_mut().take_available_token(token),
        GamePhase::TokenSelectLibrary => model.board_mut().take_box_token(token),
        _ => return Err(contract_violation("no token selection is pending")),
    };
    if !taken {
        return Err(contract_violation("token not in the offered pool"));
    }

    let (player, _, _, log) = model.turn_parts_mut();
    player.add_progress_token(token);
    log.normal(format!("{} takes the {token} token", player.name()));
    Ok(())
}

fn select_destruction(model: &mut GameModel, target: Option<CardId>) -> Result<()> {
    let Some(card_id) = target else {
        let (player, _, _, log) = model.turn_parts_mut();
        log.normal(format!("{} has nothing to destroy", player.name()));
        return Ok(());
    };

    let card = model.card(card_id)?.clone();
    let (_, opponent, board, log) = model.turn_parts_mut();
    if !opponent.remove_built_card(&card) {
        return Err(contract_violation("destruction target not in opponent city"));
    }
    board.add_to_discard(card_id);
    log.normal(format!(
        "{} is destroyed and sent to the discard pile",
        card.name
    ));
    Ok(())
}

fn select_from_discard(
    model: &mut GameModel,
    card_id: CardId,
    pending: &mut PendingInterrupt,
) -> Result<()> {
    if model.board_mut().take_from_discard(card_id).is_none() {
        return Err(contract_violation("card not in the discard pile"));
    }
    let card = model.card(card_id)?.clone();

    let (player, _, _, log) = model.turn_parts_mut();
    player.construct_card(&card);
    log.normal(format!(
        "{} builds {} from the discard pile for free",
        player.name(),
        card.name
    ));

    apply_effects(&card.effects, model, pending);
    Ok(())
}

fn choose_starting_player(model: &mut GameModel, choice: StartChoice) -> Result<()> {
    let current = model.current_player_index();
    let starter = match choice {
        StartChoice::Me => current,
        StartChoice::Opponent => 1 - current,
    };
    model.set_current_player(starter);
    let name = model.player(starter).name().to_string();
    model.log.normal(format!("{name} will start the next age"));
    Ok(())
}

/// Apply an entity's effects in declaration order
///
/// No effect of a later action can interleave: this loop runs to
/// completion inside the command that triggered it, and at most one
/// interrupt request can come out of it.
fn apply_effects(effects: &[Effect], model: &mut GameModel, pending: &mut PendingInterrupt) {
    for effect in effects {
        apply_effect(effect, model, pending);
    }
}

fn apply_effect(effect: &Effect, model: &mut GameModel, pending: &mut PendingInterrupt) {
    let (player, opponent, board, log) = model.turn_parts_mut();
    match effect {
        Effect::Production {
            resources,
            choice,
            tradable,
        } => {
            if *choice {
                player.add_production_choice(resources.iter().map(|(r, _)| *r).collect());
            } else {
                for (resource, count) in resources {
                    player.add_resource(*resource, *count as u32, *tradable);
                }
            }
        }

        Effect::Military { shields, from_card } => {
            let mut shields = *shields;
            if *from_card && player.has_token(ProgressToken::Strategy) {
                shields += 1;
            }
            let events = board.military.advance(shields, player.id());
            log.verbose(format!(
                "{} advances the conflict pawn by {shields}",
                player.name()
            ));
            for event in events {
                let victim = if event.victim == player.id() {
                    &mut *player
                } else {
                    &mut *opponent
                };
                victim.pay_coins(event.coins);
                log.normal(format!(
                    "{} is looted for {} coins",
                    victim.name(),
                    event.coins
                ));
            }
        }

        Effect::Science { symbol } => {
            player.add_science_symbol(*symbol);
            log.verbose(format!("{} gains a {symbol:?} symbol", player.name()));
        }

        // Scores at the end of the game; nothing to do now
        Effect::VictoryPoints { .. } => {}

        Effect::Coins { amount } => {
            player.gain_coins(*amount);
            log.verbose(format!("{} gains {amount} coins", player.name()));
        }

        Effect::CoinsPerType {
            target,
            per_card,
            count_wonders,
        } => {
            let mut count = player.card_count(*target);
            if *count_wonders {
                count += player.built_wonder_count() as u32;
            }
            let amount = per_card * count;
            if amount > 0 {
                player.gain_coins(amount);
                log.verbose(format!("{} gains {amount} coins", player.name()));
            }
        }

        Effect::TradeDiscount { resource } => {
            player.set_trading_discount(*resource);
            log.verbose(format!(
                "{} now buys {resource} from the bank for 1 coin",
                player.name()
            ));
        }

        Effect::DestroyCard { color } => {
            pending.next_phase = Some(GamePhase::Destruction);
            pending.destruction_color = Some(*color);
            log.normal(format!(
                "{} may destroy an opponent {} card",
                player.name(),
                color.color_name()
            ));
        }

        Effect::ExtraTurn => {
            pending.extra_turn = true;
            log.normal(format!("{} will play again", player.name()));
        }

        Effect::BuildFromDiscard => {
            if board.discard_pile().is_empty() {
                log.normal("the discard pile is empty; nothing to build");
            } else {
                pending.next_phase = Some(GamePhase::DiscardBuild);
                log.normal(format!(
                    "{} may build a discard-pile card for free",
                    player.name()
                ));
            }
        }

        Effect::ProgressTokenSelect => {
            if board.box_tokens().is_empty() {
                log.normal("the token box is empty");
            } else {
                pending.next_phase = Some(GamePhase::TokenSelectLibrary);
                log.normal(format!(
                    "{} may pick a progress token from the box",
                    player.name()
                ));
            }
        }

        Effect::OpponentLoseCoins { amount } => {
            opponent.pay_coins(*amount);
            log.normal(format!("{} loses {amount} coins", opponent.name()));
        }

        Effect::Guild { criteria } => {
            let coins = criteria.construction_coins(player, opponent);
            if coins > 0 {
                player.gain_coins(coins);
                log.verbose(format!("{} gains {coins} coins", player.name()));
            }
        }
    }
}
