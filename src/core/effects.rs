//! Card and wonder effect system
//!
//! Every consequence of constructing a card or wonder is one variant of a
//! closed [`Effect`] enum. Application happens in the command layer (the
//! only place allowed to mutate the model); this module owns the data
//! shape and the end-game scoring contribution of each variant.

use crate::core::types::config;
use crate::core::{CardType, Player, ResourceType, ScienceSymbol};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One consequence of constructing a card or wonder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grant resource production
    ///
    /// `choice` entries give one resource per listed type per purchase,
    /// resolved lazily when a cost is paid. `tradable` production is
    /// visible to the opponent and raises their bank prices.
    Production {
        resources: SmallVec<[(ResourceType, u8); 2]>,
        choice: bool,
        tradable: bool,
    },

    /// Add shields to the builder's side of the military track
    ///
    /// `from_card` marks red-card shields, which the Strategy token boosts.
    Military { shields: u32, from_card: bool },

    /// Add one science symbol
    Science { symbol: ScienceSymbol },

    /// Fixed points at final scoring; nothing at construction time
    VictoryPoints { points: u32 },

    /// Immediate coin grant
    Coins { amount: u32 },

    /// Coins per owned card of a category, optionally counting wonders
    CoinsPerType {
        target: CardType,
        per_card: u32,
        count_wonders: bool,
    },

    /// Fix the bank price of one resource at 1 coin
    TradeDiscount { resource: ResourceType },

    /// Interrupt: pick an opponent card of this color to destroy
    DestroyCard { color: CardType },

    /// Play again after this turn
    ExtraTurn,

    /// Interrupt: construct one discard-pile card for free
    BuildFromDiscard,

    /// Interrupt: pick a progress token from the box
    ProgressTokenSelect,

    /// Opponent loses coins, floored at zero
    OpponentLoseCoins { amount: u32 },

    /// End-game comparison scoring (purple cards)
    Guild { criteria: GuildCriteria },
}

impl Effect {
    /// End-game points contributed by this effect (zero for most variants)
    pub fn score(&self, owner: &Player, opponent: &Player) -> u32 {
        match self {
            Effect::VictoryPoints { points } => *points,
            Effect::Guild { criteria } => criteria.victory_points(owner, opponent),
            _ => 0,
        }
    }
}

/// What a guild card compares across the two cities
///
/// The strict majority holder scores; ties score zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuildCriteria {
    YellowCards,
    BrownGreyCards,
    Wonders,
    BlueCards,
    GreenCards,
    RedCards,
    Coins,
}

impl GuildCriteria {
    /// The counted quantity in one city
    pub fn count(self, player: &Player) -> u32 {
        match self {
            GuildCriteria::YellowCards => player.card_count(CardType::Commercial),
            GuildCriteria::BrownGreyCards => {
                player.card_count(CardType::RawMaterial) + player.card_count(CardType::Manufactured)
            }
            GuildCriteria::Wonders => player.built_wonder_count() as u32,
            GuildCriteria::BlueCards => player.card_count(CardType::Civilian),
            GuildCriteria::GreenCards => player.card_count(CardType::Scientific),
            GuildCriteria::RedCards => player.card_count(CardType::Military),
            GuildCriteria::Coins => player.coins(),
        }
    }

    /// The winning count, or zero on a tie
    fn majority_count(self, owner: &Player, opponent: &Player) -> u32 {
        let mine = self.count(owner);
        let theirs = self.count(opponent);
        if mine == theirs {
            0
        } else {
            mine.max(theirs)
        }
    }

    /// Coins paid out when the guild card is constructed
    pub fn construction_coins(self, owner: &Player, opponent: &Player) -> u32 {
        match self {
            // The coin guild only scores at the end
            GuildCriteria::Coins => 0,
            _ => self.majority_count(owner, opponent),
        }
    }

    /// Points contributed at final scoring
    pub fn victory_points(self, owner: &Player, opponent: &Player) -> u32 {
        let winning = self.majority_count(owner, opponent);
        match self {
            GuildCriteria::Coins => winning / config::COINS_PER_VP,
            _ => winning,
        }
    }
}
