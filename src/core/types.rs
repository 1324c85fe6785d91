//! Shared enumerations, action payloads, and rule constants

use crate::core::{CardId, WonderId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base resource types
///
/// Wood, stone, and clay are raw materials (brown cards); paper and glass
/// are manufactured goods (grey cards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Wood,
    Stone,
    Clay,
    Paper,
    Glass,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Wood,
        ResourceType::Stone,
        ResourceType::Clay,
        ResourceType::Paper,
        ResourceType::Glass,
    ];

    /// Dense index into per-resource arrays
    pub fn index(self) -> usize {
        match self {
            ResourceType::Wood => 0,
            ResourceType::Stone => 1,
            ResourceType::Clay => 2,
            ResourceType::Paper => 3,
            ResourceType::Glass => 4,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Wood => "wood",
            ResourceType::Stone => "stone",
            ResourceType::Clay => "clay",
            ResourceType::Paper => "paper",
            ResourceType::Glass => "glass",
        };
        write!(f, "{name}")
    }
}

/// Card categories
///
/// The category decides the card's color, its behavior, and how it scores.
/// `Wonder` is a pseudo-category used wherever rules count or discount
/// wonders alongside cards (guild criteria, construction discounts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Brown: produces raw materials
    RawMaterial,
    /// Grey: produces manufactured goods
    Manufactured,
    /// Blue: victory points
    Civilian,
    /// Green: science symbols
    Scientific,
    /// Yellow: coins, trading discounts, flexible production
    Commercial,
    /// Red: shields on the military track
    Military,
    /// Purple: end-game comparison scoring
    Guild,
    /// Wonders, treated as a category for counting purposes
    Wonder,
}

impl CardType {
    pub fn color_name(self) -> &'static str {
        match self {
            CardType::RawMaterial => "brown",
            CardType::Manufactured => "grey",
            CardType::Civilian => "blue",
            CardType::Scientific => "green",
            CardType::Commercial => "yellow",
            CardType::Military => "red",
            CardType::Guild => "purple",
            CardType::Wonder => "wonder",
        }
    }
}

/// Science symbols
///
/// Six distinct symbols appear on green cards; `Law` only exists on a
/// progress token. Collecting two of a kind pays a one-time token bonus;
/// collecting six distinct symbols wins the game outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScienceSymbol {
    Globe,
    Tablet,
    Mortar,
    Compass,
    Wheel,
    Quill,
    Law,
}

impl ScienceSymbol {
    pub const ALL: [ScienceSymbol; 7] = [
        ScienceSymbol::Globe,
        ScienceSymbol::Tablet,
        ScienceSymbol::Mortar,
        ScienceSymbol::Compass,
        ScienceSymbol::Wheel,
        ScienceSymbol::Quill,
        ScienceSymbol::Law,
    ];
}

/// Progress tokens
///
/// Ten passive or instant effects; five start on the board, three in the
/// box, two out of the game. Ownership is exclusive and permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressToken {
    /// 6 coins now, 4 points at scoring
    Agriculture,
    /// 6 coins now, 4 coins whenever a card is built free through a chain
    Urbanism,
    /// +1 shield on every military card built from now on
    Strategy,
    /// Every wonder the owner builds also grants the extra turn
    Theology,
    /// Trading fees the opponent pays go to the owner
    Economy,
    /// Civilian buildings cost 2 coins less
    Masonry,
    /// Wonders cost 2 coins less
    Architecture,
    /// Counts as one standing science symbol
    Law,
    /// 3 points per owned progress token at scoring
    Mathematics,
    /// 7 points at scoring
    Philosophy,
}

impl ProgressToken {
    pub const ALL: [ProgressToken; 10] = [
        ProgressToken::Agriculture,
        ProgressToken::Urbanism,
        ProgressToken::Strategy,
        ProgressToken::Theology,
        ProgressToken::Economy,
        ProgressToken::Masonry,
        ProgressToken::Architecture,
        ProgressToken::Law,
        ProgressToken::Mathematics,
        ProgressToken::Philosophy,
    ];
}

impl fmt::Display for ProgressToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// How the game was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryType {
    Military,
    Science,
    Civilian,
}

/// Which player goes first in the next age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartChoice {
    Me,
    Opponent,
}

/// A player's declared intent for one turn
///
/// Actions are transient value objects: the controller validates them
/// against the current phase and either rejects them without touching the
/// model or executes the matching command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Take a wonder from the draft pool (opening draft only)
    DraftWonder { wonder: WonderId },
    /// Pay for a selectable pyramid card and add it to the city
    BuildCard { card: CardId },
    /// Discard a selectable pyramid card for coins
    DiscardForCoins { card: CardId },
    /// Bury a selectable pyramid card to construct an unbuilt wonder
    BuildWonder { card: CardId, wonder: WonderId },
    /// Take a progress token (from the board or the box, per phase)
    SelectProgressToken { token: ProgressToken },
    /// Destroy an opponent card of the pending color; `None` is the
    /// explicit no-legal-target pass
    SelectDestruction { target: Option<CardId> },
    /// Construct a discard-pile card for free
    SelectFromDiscard { card: CardId },
    /// Pick the starting player for the next age
    ChooseStartingPlayer { choice: StartChoice },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::DraftWonder { .. } => "draft wonder",
            Action::BuildCard { .. } => "build card",
            Action::DiscardForCoins { .. } => "discard for coins",
            Action::BuildWonder { .. } => "build wonder",
            Action::SelectProgressToken { .. } => "select progress token",
            Action::SelectDestruction { .. } => "select destruction",
            Action::SelectFromDiscard { .. } => "build from discard",
            Action::ChooseStartingPlayer { .. } => "choose starting player",
        }
    }
}

/// Outcome of validating an action
///
/// `cost` is the total number of coins the action would charge, trading
/// fees included. Invalid results carry a reason and guarantee the model
/// was not touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub is_valid: bool,
    pub cost: u32,
    pub message: String,
}

impl ActionResult {
    pub fn ok(cost: u32) -> Self {
        ActionResult {
            is_valid: true,
            cost,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ActionResult {
            is_valid: false,
            cost: 0,
            message: message.into(),
        }
    }
}

/// Rule constants, collected so balance numbers live in one place
pub mod config {
    /// Starting coins per player
    pub const INITIAL_COINS: u32 = 7;
    /// Coins per victory point at final scoring
    pub const COINS_PER_VP: u32 = 3;
    /// Base coins for discarding a card (plus one per commercial card)
    pub const BASE_DISCARD_GAIN: u32 = 2;

    /// Masonry token: coin discount on civilian buildings
    pub const MASONRY_DISCOUNT: u32 = 2;
    /// Architecture token: coin discount on wonders
    pub const ARCHITECTURE_DISCOUNT: u32 = 2;

    /// Urbanism token: coins for building through a chain
    pub const URBANISM_CHAIN_BONUS: u32 = 4;
    /// Agriculture / Urbanism: coins granted on acquisition
    pub const TOKEN_COIN_GRANT: u32 = 6;

    pub const AGRICULTURE_VP: u32 = 4;
    pub const PHILOSOPHY_VP: u32 = 7;
    pub const MATHEMATICS_VP_PER_TOKEN: u32 = 3;

    /// Military track bounds and thresholds
    pub const MILITARY_TRACK_MAX: i8 = 9;
    pub const MILITARY_THRESHOLD_LOOT_1: i8 = 3;
    pub const MILITARY_THRESHOLD_LOOT_2: i8 = 6;
    pub const MILITARY_LOOT_VALUE_1: u32 = 2;
    pub const MILITARY_LOOT_VALUE_2: u32 = 5;
    /// End-game points for leading by 1-2 / 3-5 / 6-8 spaces
    pub const MILITARY_VP_LEVEL_1: u32 = 2;
    pub const MILITARY_VP_LEVEL_2: u32 = 5;
    pub const MILITARY_VP_LEVEL_3: u32 = 10;

    /// Distinct symbols needed for a science victory
    pub const SCIENCE_WIN_THRESHOLD: usize = 6;
    /// Identical symbols needed for the pair bonus
    pub const SCIENCE_PAIR_COUNT: u32 = 2;

    /// Base price of one bank resource before opponent production
    pub const TRADING_BASE_COST: u32 = 2;
    /// Combined wonder cap; building the 7th discards every unbuilt one
    pub const MAX_TOTAL_WONDERS: usize = 7;

    /// Progress tokens placed on the board at setup
    pub const BOARD_TOKEN_COUNT: usize = 5;
    /// Progress tokens placed in the box at setup
    pub const BOX_TOKEN_COUNT: usize = 3;

    /// Cards laid out in each age pyramid
    pub const CARDS_PER_AGE: usize = 20;
    /// Guild cards mixed into the age 3 deck
    pub const GUILDS_IN_AGE_3: usize = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_index_round_trip() {
        for (i, resource) in ResourceType::ALL.iter().enumerate() {
            assert_eq!(resource.index(), i);
        }
    }

    #[test]
    fn test_action_result_constructors() {
        let ok = ActionResult::ok(3);
        assert!(ok.is_valid);
        assert_eq!(ok.cost, 3);
        assert!(ok.message.is_empty());

        let bad = ActionResult::invalid("not your turn");
        assert!(!bad.is_valid);
        assert_eq!(bad.message, "not your turn");
    }
}
