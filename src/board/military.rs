//! The military track
//!
//! A single pawn on a [-9, 9] line. Positive territory means player 0 is
//! pushing into player 1's city and vice versa. Crossing the 3 and 6
//! marks for the first time burns a one-shot loot token that costs the
//! defender coins; reaching either end is an immediate military victory.

use crate::core::types::config;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One triggered loot token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LootEvent {
    /// Player who loses the coins
    pub victim: usize,
    pub coins: u32,
}

/// Loot token indices: two per side, values 5 and 2
const P0_LOSES_5: usize = 0;
const P0_LOSES_2: usize = 1;
const P1_LOSES_2: usize = 2;
const P1_LOSES_5: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilitaryTrack {
    position: i8,
    /// Armed flags; a consumed token never re-arms within a game
    loot_armed: [bool; 4],
}

impl Default for MilitaryTrack {
    fn default() -> Self {
        MilitaryTrack {
            position: 0,
            loot_armed: [true; 4],
        }
    }
}

impl MilitaryTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> i8 {
        self.position
    }

    pub fn loot_armed(&self) -> &[bool; 4] {
        &self.loot_armed
    }

    /// Player currently ahead, if any
    pub fn leader(&self) -> Option<usize> {
        match self.position {
            p if p > 0 => Some(0),
            p if p < 0 => Some(1),
            _ => None,
        }
    }

    /// Whether the pawn has reached a capital
    pub fn is_supremacy(&self) -> bool {
        self.position.abs() >= config::MILITARY_TRACK_MAX
    }

    /// Advance the pawn by `shields` toward the mover's opponent
    ///
    /// Returns the loot tokens consumed by this move, in threshold order.
    pub fn advance(&mut self, shields: u32, mover: usize) -> SmallVec<[LootEvent; 2]> {
        let delta = shields.min(i8::MAX as u32) as i8;
        let signed = if mover == 0 { delta } else { -delta };
        self.position = (self.position + signed)
            .clamp(-config::MILITARY_TRACK_MAX, config::MILITARY_TRACK_MAX);

        let mut events = SmallVec::new();
        if self.position >= config::MILITARY_THRESHOLD_LOOT_1 {
            self.consume(P1_LOSES_2, 1, config::MILITARY_LOOT_VALUE_1, &mut events);
        }
        if self.position >= config::MILITARY_THRESHOLD_LOOT_2 {
            self.consume(P1_LOSES_5, 1, config::MILITARY_LOOT_VALUE_2, &mut events);
        }
        if self.position <= -config::MILITARY_THRESHOLD_LOOT_1 {
            self.consume(P0_LOSES_2, 0, config::MILITARY_LOOT_VALUE_1, &mut events);
        }
        if self.position <= -config::MILITARY_THRESHOLD_LOOT_2 {
            self.consume(P0_LOSES_5, 0, config::MILITARY_LOOT_VALUE_2, &mut events);
        }
        events
    }

    fn consume(
        &mut self,
        token: usize,
        victim: usize,
        coins: u32,
        events: &mut SmallVec<[LootEvent; 2]>,
    ) {
        if self.loot_armed[token] {
            self.loot_armed[token] = false;
            events.push(LootEvent { victim, coins });
        }
    }

    /// End-game points for the given player's lead
    pub fn victory_points(&self, player: usize) -> u32 {
        if self.leader() != Some(player) {
            return 0;
        }
        match self.position.abs() {
            p if p >= config::MILITARY_THRESHOLD_LOOT_2 => config::MILITARY_VP_LEVEL_3,
            p if p >= config::MILITARY_THRESHOLD_LOOT_1 => config::MILITARY_VP_LEVEL_2,
            _ => config::MILITARY_VP_LEVEL_1,
        }
    }
}
