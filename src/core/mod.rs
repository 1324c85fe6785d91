//! Core game types and entities

pub mod entity;
pub mod types;
pub mod card;
pub mod effects;
pub mod player;
pub mod cost;

pub use entity::{CardId, EntityKey, EntityStore, WonderId};
pub use types::{
    Action, ActionResult, CardType, ProgressToken, ResourceType, ScienceSymbol, StartChoice,
    VictoryType,
};
pub use card::{Card, ResourceCost, Wonder};
pub use effects::{Effect, GuildCriteria};
pub use player::Player;
pub use cost::CostQuote;
