//! The shared board: military track, card pyramid, discard pile, tokens

pub mod military;
pub mod pyramid;

pub use military::{LootEvent, MilitaryTrack};
pub use pyramid::{CardPyramid, CardSlot};

use crate::core::{CardId, ProgressToken};
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    pub military: MilitaryTrack,
    pyramid: CardPyramid,
    discard_pile: Vec<CardId>,
    /// The five tokens anyone may take on a science pair
    available_tokens: Vec<ProgressToken>,
    /// Tokens in the box, reachable only through the library wonder
    box_tokens: Vec<ProgressToken>,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn pyramid(&self) -> &CardPyramid {
        &self.pyramid
    }

    pub fn discard_pile(&self) -> &[CardId] {
        &self.discard_pile
    }

    pub fn available_tokens(&self) -> &[ProgressToken] {
        &self.available_tokens
    }

    pub fn box_tokens(&self) -> &[ProgressToken] {
        &self.box_tokens
    }

    /// Replace the pyramid with the next age's layout
    pub fn init_pyramid(&mut self, age: u8, deck: &[CardId]) -> Result<()> {
        self.pyramid = CardPyramid::new(age, deck)?;
        Ok(())
    }

    pub fn remove_from_pyramid(&mut self, card: CardId) -> Result<()> {
        self.pyramid.remove_card(card)
    }

    pub fn add_to_discard(&mut self, card: CardId) {
        self.discard_pile.push(card);
    }

    /// Pull a specific card back out of the discard pile
    pub fn take_from_discard(&mut self, card: CardId) -> Option<CardId> {
        let pos = self.discard_pile.iter().position(|id| *id == card)?;
        Some(self.discard_pile.remove(pos))
    }

    pub fn set_token_pools(&mut self, available: Vec<ProgressToken>, boxed: Vec<ProgressToken>) {
        self.available_tokens = available;
        self.box_tokens = boxed;
    }

    pub fn take_available_token(&mut self, token: ProgressToken) -> bool {
        let Some(pos) = self.available_tokens.iter().position(|t| *t == token) else {
            return false;
        };
        self.available_tokens.remove(pos);
        true
    }

    pub fn take_box_token(&mut self, token: ProgressToken) -> bool {
        let Some(pos) = self.box_tokens.iter().position(|t| *t == token) else {
            return false;
        };
        self.box_tokens.remove(pos);
        true
    }
}
