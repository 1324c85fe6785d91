//! The game controller
//!
//! Owns the model, the current phase, and the turn machinery. All player
//! input funnels through `validate_action`/`process_action`; the
//! controller never blocks, never calls out, and mutates only through the
//! command layer. Randomness (deck shuffles, token setup) comes from one
//! seeded generator injected at construction.

use crate::core::types::config;
use crate::core::{Action, ActionResult, Card, CardId, CardType, ProgressToken, VictoryType, Wonder};
use crate::game::commands::{self, PendingInterrupt};
use crate::game::log::VerbosityLevel;
use crate::game::phase::GamePhase;
use crate::game::rules::RulesEngine;
use crate::game::scoring::ScoringManager;
use crate::game::state::GameModel;
use crate::{DuelError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Pick order within each draft pool of four
const DRAFT_ORDER_1: [usize; 4] = [0, 1, 1, 0];
const DRAFT_ORDER_2: [usize; 4] = [1, 0, 0, 1];

pub struct GameController {
    model: GameModel,
    phase: GamePhase,
    extra_turn_pending: bool,
    /// Color the destruction interrupt is waiting on
    pending_destruction: Option<CardType>,
    /// Picks taken in the opening draft so far
    draft_turn: usize,
    rng: ChaCha8Rng,
}

impl GameController {
    /// Set up a new game from fully formed entities
    ///
    /// The dataset must carry a full pyramid per age and at least eight
    /// wonders; that is checked here once so age setup cannot fail later.
    pub fn new(
        cards: Vec<Card>,
        wonders: Vec<Wonder>,
        player_names: [&str; 2],
        seed: u64,
        verbosity: VerbosityLevel,
    ) -> Result<Self> {
        if wonders.len() < 2 * DRAFT_ORDER_1.len() {
            return Err(DuelError::InvalidDefinition(format!(
                "need at least {} wonders, got {}",
                2 * DRAFT_ORDER_1.len(),
                wonders.len()
            )));
        }

        let mut controller = GameController {
            model: GameModel::new(cards, wonders, player_names, verbosity),
            phase: GamePhase::Draft1,
            extra_turn_pending: false,
            pending_destruction: None,
            draft_turn: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };

        for age in 1..=3u8 {
            if controller.model.cards_of_age(age).len() < config::CARDS_PER_AGE {
                return Err(DuelError::InvalidDefinition(format!(
                    "age {age} needs {} cards, got {}",
                    config::CARDS_PER_AGE,
                    controller.model.cards_of_age(age).len()
                )));
            }
        }

        controller.setup_progress_tokens();
        controller.setup_wonder_draft();
        controller.model.set_current_player(DRAFT_ORDER_1[0]);
        controller.model.log.minimal("the wonder draft begins");
        Ok(controller)
    }

    fn setup_progress_tokens(&mut self) {
        let mut tokens = ProgressToken::ALL.to_vec();
        tokens.shuffle(&mut self.rng);
        let boxed = tokens.split_off(config::BOARD_TOKEN_COUNT);
        let boxed = boxed[..config::BOX_TOKEN_COUNT.min(boxed.len())].to_vec();
        self.model.board_mut().set_token_pools(tokens, boxed);
    }

    fn setup_wonder_draft(&mut self) {
        let mut ids: Vec<_> = self.model.wonders().iter().map(|(id, _)| *id).collect();
        ids.sort();
        ids.shuffle(&mut self.rng);
        self.model.set_remaining_wonders(ids);
        self.model.deal_draft_pool(DRAFT_ORDER_1.len());
    }

    // --- Queries ---

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn model(&self) -> &GameModel {
        &self.model
    }

    /// Color the pending destruction interrupt targets, if any
    pub fn pending_destruction(&self) -> Option<CardType> {
        self.pending_destruction
    }

    // --- Action pipeline ---

    /// Check an action against the current phase without touching state
    pub fn validate_action(&self, action: &Action) -> ActionResult {
        self.phase
            .validate(action, &self.model, self.pending_destruction)
    }

    /// Validate and execute one action
    ///
    /// Returns false iff validation failed, in which case nothing changed.
    pub fn process_action(&mut self, action: &Action) -> bool {
        let verdict = self.validate_action(action);
        if !verdict.is_valid {
            self.model.log.verbose(format!(
                "rejected {}: {}",
                action.kind(),
                verdict.message
            ));
            return false;
        }

        let mut pending = PendingInterrupt::default();
        if let Err(err) = commands::execute(action, self.phase, &mut self.model, &mut pending) {
            // A validated action must execute; anything else is an engine bug.
            panic!("command failed after validation: {err}");
        }
        if pending.extra_turn {
            self.extra_turn_pending = true;
        }

        if let Some(check) = RulesEngine::check_instant_victory(&self.model) {
            self.finish(Some(check.winner), check.victory);
            return true;
        }

        match self.phase {
            GamePhase::Draft1 | GamePhase::Draft2 => self.advance_draft(),
            GamePhase::StartPlayerSelect => {
                // The command already seated the chosen starter
                let next_age = self.model.current_age() + 1;
                self.begin_age(next_age);
                self.phase = GamePhase::AgePlay;
            }
            _ => {
                if let Some(next) = pending.next_phase {
                    // Enter the requested interrupt; the same player resolves it
                    self.pending_destruction = pending.destruction_color;
                    self.phase = next;
                } else {
                    if self.phase.is_interrupt() {
                        self.phase = GamePhase::AgePlay;
                        self.pending_destruction = None;
                    }
                    self.end_turn();
                }
            }
        }
        true
    }

    // --- Turn machinery ---

    fn advance_draft(&mut self) {
        self.draft_turn += 1;
        match self.draft_turn {
            t if t == DRAFT_ORDER_1.len() => {
                self.model.deal_draft_pool(DRAFT_ORDER_2.len());
                self.phase = GamePhase::Draft2;
                self.model.set_current_player(DRAFT_ORDER_2[0]);
            }
            t if t == DRAFT_ORDER_1.len() + DRAFT_ORDER_2.len() => {
                self.begin_age(1);
                self.phase = GamePhase::AgePlay;
                self.model.set_current_player(0);
            }
            t if t < DRAFT_ORDER_1.len() => {
                self.model.set_current_player(DRAFT_ORDER_1[t]);
            }
            t => {
                self.model
                    .set_current_player(DRAFT_ORDER_2[t - DRAFT_ORDER_1.len()]);
            }
        }
    }

    /// Shuffle the age deck and lay out its pyramid
    ///
    /// Age 3 mixes a fixed number of guild cards into the layout.
    fn begin_age(&mut self, age: u8) {
        let deck = self.prepare_deck(age);
        self.model
            .board_mut()
            .init_pyramid(age, &deck)
            .expect("deck sizes were checked at construction");
        self.model.set_current_age(age);
        self.model.log.minimal(format!("age {age} begins"));
    }

    fn prepare_deck(&mut self, age: u8) -> Vec<CardId> {
        let ids = self.model.cards_of_age(age);
        if age < 3 {
            let mut deck = ids;
            deck.shuffle(&mut self.rng);
            deck.truncate(config::CARDS_PER_AGE);
            return deck;
        }

        let (mut guilds, mut others): (Vec<_>, Vec<_>) = ids.into_iter().partition(|id| {
            self.model
                .card(*id)
                .map(|card| card.card_type == CardType::Guild)
                .unwrap_or(false)
        });
        guilds.shuffle(&mut self.rng);
        others.shuffle(&mut self.rng);

        let guild_count = config::GUILDS_IN_AGE_3.min(guilds.len());
        let mut deck = guilds;
        deck.truncate(guild_count);
        deck.extend(others.into_iter().take(config::CARDS_PER_AGE - guild_count));
        deck.shuffle(&mut self.rng);
        deck
    }

    fn end_turn(&mut self) {
        // A freshly completed science pair interrupts before anything else
        let idx = self.model.current_player_index();
        if let Some(symbol) = RulesEngine::new_science_pair(self.model.current_player()) {
            self.model.player_mut(idx).add_claimed_pair(symbol);
            if self.model.board().available_tokens().is_empty() {
                self.model
                    .log
                    .normal("a science pair completes, but no tokens remain");
            } else {
                self.model.log.normal(format!(
                    "{} pairs up {symbol:?} and picks a progress token",
                    self.model.current_player().name()
                ));
                self.phase = GamePhase::TokenSelectPair;
                return;
            }
        }

        if self.model.current_age() > 0 && self.model.board().pyramid().is_exhausted() {
            self.transition_age();
            return;
        }

        if self.extra_turn_pending {
            self.extra_turn_pending = false;
            self.model.log.normal(format!(
                "{} plays again",
                self.model.current_player().name()
            ));
        } else {
            self.model.switch_player();
        }
    }

    fn transition_age(&mut self) {
        // An unspent extra turn lapses with the age
        self.extra_turn_pending = false;

        if self.model.current_age() >= 3 {
            let (winner, victory) = ScoringManager::final_result(&self.model);
            self.finish(winner, victory);
            return;
        }

        // The military leader decides who opens the next age; on a level
        // track the player who closed this age decides.
        let chooser = self
            .model
            .board()
            .military
            .leader()
            .unwrap_or(self.model.current_player_index());
        self.model.set_current_player(chooser);
        self.phase = GamePhase::StartPlayerSelect;
        self.model.log.normal(format!(
            "age {} is over; {} chooses the next starting player",
            self.model.current_age(),
            self.model.player(chooser).name()
        ));
    }

    fn finish(&mut self, winner: Option<usize>, victory: VictoryType) {
        self.model.set_outcome(winner, victory);
        self.phase = GamePhase::GameOver;
        match winner {
            Some(idx) => {
                let name = self.model.player(idx).name().to_string();
                self.model
                    .log
                    .minimal(format!("{name} wins by {victory:?}"));
            }
            None => self.model.log.minimal("the game ends in a draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Effect, ResourceCost, ScienceSymbol, WonderId};

    /// Twenty free cards per age plus twelve bare wonders
    fn plain_dataset() -> (Vec<Card>, Vec<Wonder>) {
        let mut cards = Vec::new();
        let mut next = 0u32;
        for age in 1..=3u8 {
            for i in 0..config::CARDS_PER_AGE {
                let mut card = Card::new(
                    CardId::new(next),
                    format!("a{age}-c{i}"),
                    age,
                    CardType::Civilian,
                );
                card.effects.push(Effect::VictoryPoints { points: 1 });
                cards.push(card);
                next += 1;
            }
        }
        let wonders = (0..12u32)
            .map(|i| Wonder::new(WonderId::new(i), format!("wonder-{i}")))
            .collect();
        (cards, wonders)
    }

    fn controller_with(cards: Vec<Card>, wonders: Vec<Wonder>) -> GameController {
        GameController::new(cards, wonders, ["Alice", "Bob"], 7, VerbosityLevel::Silent).unwrap()
    }

    fn draft_all(controller: &mut GameController) {
        for _ in 0..8 {
            let wonder = controller.model().draft_pool()[0];
            assert!(controller.process_action(&Action::DraftWonder { wonder }));
        }
    }

    #[test]
    fn test_draft_flow() {
        let (cards, wonders) = plain_dataset();
        let mut controller = controller_with(cards, wonders);

        assert_eq!(controller.phase(), GamePhase::Draft1);
        let expected_picker = [0, 1, 1, 0, 1, 0, 0, 1];
        for picker in expected_picker {
            assert_eq!(controller.model().current_player_index(), picker);
            let wonder = controller.model().draft_pool()[0];
            assert!(controller.process_action(&Action::DraftWonder { wonder }));
        }

        assert_eq!(controller.phase(), GamePhase::AgePlay);
        assert_eq!(controller.model().current_age(), 1);
        assert_eq!(controller.model().current_player_index(), 0);
        for idx in 0..2 {
            assert_eq!(controller.model().player(idx).unbuilt_wonders().len(), 4);
        }
        assert_eq!(controller.model().board().pyramid().slots().len(), 20);
    }

    #[test]
    fn test_rejected_action_changes_nothing() {
        let (cards, wonders) = plain_dataset();
        let mut controller = controller_with(cards, wonders);

        let bogus = Action::BuildCard { card: CardId::new(0) };
        let verdict = controller.validate_action(&bogus);
        assert!(!verdict.is_valid);
        assert!(!controller.process_action(&bogus));
        assert_eq!(controller.phase(), GamePhase::Draft1);
        assert_eq!(controller.model().draft_pool().len(), 4);
    }

    #[test]
    fn test_build_and_turn_alternation() {
        let (cards, wonders) = plain_dataset();
        let mut controller = controller_with(cards, wonders);
        draft_all(&mut controller);

        let first = controller
            .model()
            .board()
            .pyramid()
            .selectable()
            .next()
            .unwrap()
            .card;
        assert!(controller.process_action(&Action::BuildCard { card: first }));
        assert_eq!(controller.model().player(0).built_cards(), &[first]);
        assert!(!controller.model().board().pyramid().is_selectable(first));
        assert_eq!(
            controller.model().current_player_index(),
            1,
            "the turn passes after a normal action"
        );
    }

    #[test]
    fn test_discard_pays_coins() {
        let (cards, wonders) = plain_dataset();
        let mut controller = controller_with(cards, wonders);
        draft_all(&mut controller);

        let card = controller
            .model()
            .board()
            .pyramid()
            .selectable()
            .next()
            .unwrap()
            .card;
        let before = controller.model().player(0).coins();
        assert!(controller.process_action(&Action::DiscardForCoins { card }));
        assert_eq!(
            controller.model().player(0).coins(),
            before + config::BASE_DISCARD_GAIN
        );
        assert_eq!(controller.model().board().discard_pile(), &[card]);
    }

    #[test]
    fn test_full_game_reaches_scoring() {
        let (cards, wonders) = plain_dataset();
        let mut controller = controller_with(cards, wonders);
        draft_all(&mut controller);

        // Discard through all three ages, answering the start-player
        // question between them.
        let mut guard = 0;
        while controller.phase() != GamePhase::GameOver {
            guard += 1;
            assert!(guard < 200, "game must terminate");
            let action = match controller.phase() {
                GamePhase::AgePlay => {
                    let card = controller
                        .model()
                        .board()
                        .pyramid()
                        .selectable()
                        .next()
                        .unwrap()
                        .card;
                    Action::DiscardForCoins { card }
                }
                GamePhase::StartPlayerSelect => Action::ChooseStartingPlayer {
                    choice: crate::core::StartChoice::Me,
                },
                other => panic!("unexpected phase {other:?}"),
            };
            assert!(controller.process_action(&action));
        }

        assert!(controller.model().is_over());
        assert_eq!(
            controller.model().victory_type(),
            Some(VictoryType::Civilian)
        );
        let verdict = controller.validate_action(&Action::ChooseStartingPlayer {
            choice: crate::core::StartChoice::Me,
        });
        assert!(!verdict.is_valid, "no action is legal after game over");
    }

    #[test]
    fn test_science_pair_interrupt_fires_once_per_symbol() {
        // All cards carry the same symbol: the first two builds by one
        // player complete a pair, later builds must not re-trigger it.
        let (mut cards, wonders) = plain_dataset();
        for card in cards.iter_mut() {
            card.card_type = CardType::Scientific;
            card.effects = [Effect::Science {
                symbol: ScienceSymbol::Wheel,
            }]
            .into_iter()
            .collect();
        }
        let mut controller = controller_with(cards, wonders);
        draft_all(&mut controller);

        let mut pair_interrupts = 0;
        let mut guard = 0;
        while controller.phase() != GamePhase::GameOver {
            guard += 1;
            assert!(guard < 300, "game must terminate");
            let action = match controller.phase() {
                GamePhase::AgePlay => {
                    let card = controller
                        .model()
                        .board()
                        .pyramid()
                        .selectable()
                        .next()
                        .unwrap()
                        .card;
                    Action::BuildCard { card }
                }
                GamePhase::TokenSelectPair => {
                    pair_interrupts += 1;
                    Action::SelectProgressToken {
                        token: controller.model().board().available_tokens()[0],
                    }
                }
                GamePhase::StartPlayerSelect => Action::ChooseStartingPlayer {
                    choice: crate::core::StartChoice::Me,
                },
                other => panic!("unexpected phase {other:?}"),
            };
            assert!(controller.process_action(&action));
        }

        // One Wheel pair per player, regardless of how many more copies
        // they stack up afterwards.
        assert_eq!(pair_interrupts, 2);
    }

    #[test]
    fn test_wonder_build_and_extra_turn() {
        let (cards, mut wonders) = plain_dataset();
        for wonder in wonders.iter_mut() {
            wonder.cost = ResourceCost::free();
            wonder.effects = [Effect::ExtraTurn].into_iter().collect();
        }
        let mut controller = controller_with(cards, wonders);
        draft_all(&mut controller);

        let card = controller
            .model()
            .board()
            .pyramid()
            .selectable()
            .next()
            .unwrap()
            .card;
        let wonder = controller.model().player(0).unbuilt_wonders()[0];
        assert!(controller.process_action(&Action::BuildWonder { card, wonder }));

        assert_eq!(controller.model().player(0).built_wonder_count(), 1);
        assert!(controller.model().wonder(wonder).unwrap().is_built());
        assert_eq!(
            controller.model().current_player_index(),
            0,
            "the extra turn suppresses the player switch once"
        );

        // The next plain action passes the turn normally
        let card = controller
            .model()
            .board()
            .pyramid()
            .selectable()
            .next()
            .unwrap()
            .card;
        assert!(controller.process_action(&Action::DiscardForCoins { card }));
        assert_eq!(controller.model().current_player_index(), 1);
    }
}
