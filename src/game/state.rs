//! The game model: aggregate root for all dynamic state
//!
//! Holds the two players, the board, the wonder draft pools, and the
//! entity repositories. It exposes read access freely and mutation only
//! through the narrow accessors the command layer uses; it contains no
//! rules logic of its own.

use crate::board::Board;
use crate::core::{Card, CardId, EntityStore, Player, VictoryType, Wonder, WonderId};
use crate::game::log::{GameLog, VerbosityLevel};
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameModel {
    players: [Player; 2],
    board: Board,

    cards: EntityStore<CardId, Card>,
    wonders: EntityStore<WonderId, Wonder>,

    /// 0 during the opening draft, then 1..=3
    current_age: u8,
    current_player: usize,
    winner: Option<usize>,
    victory: Option<VictoryType>,

    /// The four wonders currently visible to draft from
    draft_pool: Vec<WonderId>,
    /// Shuffled wonders not yet dealt into a draft pool
    remaining_wonders: Vec<WonderId>,

    pub log: GameLog,
}

impl GameModel {
    pub fn new(
        cards: Vec<Card>,
        wonders: Vec<Wonder>,
        player_names: [&str; 2],
        verbosity: VerbosityLevel,
    ) -> Self {
        let mut card_store = EntityStore::new();
        for card in cards {
            card_store.insert(card.id, card);
        }
        let mut wonder_store = EntityStore::new();
        for wonder in wonders {
            wonder_store.insert(wonder.id, wonder);
        }

        GameModel {
            players: [
                Player::new(0, player_names[0]),
                Player::new(1, player_names[1]),
            ],
            board: Board::new(),
            cards: card_store,
            wonders: wonder_store,
            current_age: 0,
            current_player: 0,
            winner: None,
            victory: None,
            draft_pool: Vec::new(),
            remaining_wonders: Vec::new(),
            log: GameLog::with_verbosity(verbosity),
        }
    }

    // --- Players ---

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, idx: usize) -> &Player {
        &self.players[idx]
    }

    pub fn player_mut(&mut self, idx: usize) -> &mut Player {
        &mut self.players[idx]
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    pub fn set_current_player(&mut self, idx: usize) {
        self.current_player = idx;
    }

    pub fn switch_player(&mut self) {
        self.current_player = 1 - self.current_player;
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn opponent(&self) -> &Player {
        &self.players[1 - self.current_player]
    }

    /// Mutable access to (current, opponent, board, log) at once
    ///
    /// This is the borrow shape every effect application needs.
    pub fn turn_parts_mut(&mut self) -> (&mut Player, &mut Player, &mut Board, &mut GameLog) {
        let (left, right) = self.players.split_at_mut(1);
        let (current, opponent) = if self.current_player == 0 {
            (&mut left[0], &mut right[0])
        } else {
            (&mut right[0], &mut left[0])
        };
        (current, opponent, &mut self.board, &mut self.log)
    }

    // --- Board & repositories ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    pub fn wonder(&self, id: WonderId) -> Result<&Wonder> {
        self.wonders.get(id)
    }

    pub fn wonder_mut(&mut self, id: WonderId) -> Result<&mut Wonder> {
        self.wonders.get_mut(id)
    }

    pub fn cards(&self) -> &EntityStore<CardId, Card> {
        &self.cards
    }

    pub fn wonders(&self) -> &EntityStore<WonderId, Wonder> {
        &self.wonders
    }

    /// All card ids of one age, in id order (callers shuffle)
    pub fn cards_of_age(&self, age: u8) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .cards
            .iter()
            .filter(|(_, card)| card.age == age)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    // --- Game progress ---

    pub fn current_age(&self) -> u8 {
        self.current_age
    }

    pub fn set_current_age(&mut self, age: u8) {
        self.current_age = age;
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn victory_type(&self) -> Option<VictoryType> {
        self.victory
    }

    pub fn is_over(&self) -> bool {
        self.victory.is_some()
    }

    /// Record the outcome; `winner` is `None` for a draw
    pub fn set_outcome(&mut self, winner: Option<usize>, victory: VictoryType) {
        self.winner = winner;
        self.victory = Some(victory);
    }

    /// Wonders built by both players together (the cap is global)
    pub fn total_built_wonders(&self) -> usize {
        self.players.iter().map(|p| p.built_wonder_count()).sum()
    }

    // --- Wonder draft pools ---

    pub fn draft_pool(&self) -> &[WonderId] {
        &self.draft_pool
    }

    pub fn remaining_wonders(&self) -> &[WonderId] {
        &self.remaining_wonders
    }

    pub fn set_remaining_wonders(&mut self, wonders: Vec<WonderId>) {
        self.remaining_wonders = wonders;
    }

    /// Deal the next `count` wonders from the shuffled stack into the pool
    pub fn deal_draft_pool(&mut self, count: usize) {
        self.draft_pool.clear();
        for _ in 0..count.min(self.remaining_wonders.len()) {
            let wonder = self.remaining_wonders.remove(0);
            self.draft_pool.push(wonder);
        }
    }

    pub fn take_from_draft_pool(&mut self, wonder: WonderId) -> bool {
        let Some(pos) = self.draft_pool.iter().position(|id| *id == wonder) else {
            return false;
        };
        self.draft_pool.remove(pos);
        true
    }
}
