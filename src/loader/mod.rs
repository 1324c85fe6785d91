//! Card and wonder definition loading
//!
//! The engine core never parses external formats; this module turns JSON
//! definition files into the fully formed entities the controller takes
//! at initialization. Definitions are declarative: a card names its cost,
//! chain tags, and effects, and instantiation assigns repository ids.
//!
//! Context the files do not spell out is derived here the way the rules
//! imply it: fixed production on brown and grey cards is tradable (it
//! raises the opponent's bank prices), shields printed on red cards count
//! as card shields for the Strategy token, wonder shields do not.

use crate::core::{
    Card, CardId, CardType, Effect, EntityKey, GuildCriteria, ResourceCost, ResourceType,
    ScienceSymbol, Wonder, WonderId,
};
use crate::Result;
use serde::Deserialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
struct CostDef {
    #[serde(default)]
    coins: u32,
    #[serde(default)]
    resources: BTreeMap<ResourceType, u8>,
}

impl CostDef {
    fn build(&self) -> ResourceCost {
        let mut cost = ResourceCost::coins(self.coins);
        for (resource, count) in &self.resources {
            cost.add_resource(*resource, *count);
        }
        cost
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
enum EffectDef {
    Production {
        resources: BTreeMap<ResourceType, u8>,
        #[serde(default)]
        choice: bool,
    },
    Military {
        shields: u32,
    },
    Science {
        symbol: ScienceSymbol,
    },
    VictoryPoints {
        points: u32,
    },
    Coins {
        amount: u32,
    },
    CoinsPerType {
        target: CardType,
        per_card: u32,
        #[serde(default)]
        count_wonders: bool,
    },
    TradeDiscount {
        resources: Vec<ResourceType>,
    },
    DestroyCard {
        color: CardType,
    },
    ExtraTurn,
    BuildFromDiscard,
    ProgressTokenSelect,
    OpponentLoseCoins {
        amount: u32,
    },
    Guild {
        criteria: GuildCriteria,
    },
}

impl EffectDef {
    /// Expand into engine effects, filling in source-dependent context
    fn build(&self, source_type: CardType, out: &mut SmallVec<[Effect; 2]>) {
        match self {
            EffectDef::Production { resources, choice } => {
                let tradable = !choice
                    && matches!(
                        source_type,
                        CardType::RawMaterial | CardType::Manufactured
                    );
                out.push(Effect::Production {
                    resources: resources.iter().map(|(r, c)| (*r, *c)).collect(),
                    choice: *choice,
                    tradable,
                });
            }
            EffectDef::Military { shields } => out.push(Effect::Military {
                shields: *shields,
                from_card: source_type == CardType::Military,
            }),
            EffectDef::Science { symbol } => out.push(Effect::Science { symbol: *symbol }),
            EffectDef::VictoryPoints { points } => {
                out.push(Effect::VictoryPoints { points: *points })
            }
            EffectDef::Coins { amount } => out.push(Effect::Coins { amount: *amount }),
            EffectDef::CoinsPerType {
                target,
                per_card,
                count_wonders,
            } => out.push(Effect::CoinsPerType {
                target: *target,
                per_card: *per_card,
                count_wonders: *count_wonders,
            }),
            EffectDef::TradeDiscount { resources } => {
                for resource in resources {
                    out.push(Effect::TradeDiscount {
                        resource: *resource,
                    });
                }
            }
            EffectDef::DestroyCard { color } => out.push(Effect::DestroyCard { color: *color }),
            EffectDef::ExtraTurn => out.push(Effect::ExtraTurn),
            EffectDef::BuildFromDiscard => out.push(Effect::BuildFromDiscard),
            EffectDef::ProgressTokenSelect => out.push(Effect::ProgressTokenSelect),
            EffectDef::OpponentLoseCoins { amount } => {
                out.push(Effect::OpponentLoseCoins { amount: *amount })
            }
            EffectDef::Guild { criteria } => out.push(Effect::Guild {
                criteria: *criteria,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CardDef {
    name: String,
    age: u8,
    #[serde(rename = "type")]
    card_type: CardType,
    #[serde(default)]
    cost: CostDef,
    #[serde(default)]
    chain: Option<String>,
    #[serde(default)]
    requires_chain: Option<String>,
    #[serde(default)]
    effects: Vec<EffectDef>,
}

impl CardDef {
    fn instantiate(&self, id: CardId) -> Card {
        let mut card = Card::new(id, self.name.clone(), self.age, self.card_type);
        card.cost = self.cost.build();
        card.chain_tag = self.chain.clone();
        card.requires_chain = self.requires_chain.clone();
        for def in &self.effects {
            def.build(self.card_type, &mut card.effects);
        }
        card
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct WonderDef {
    name: String,
    #[serde(default)]
    cost: CostDef,
    #[serde(default)]
    effects: Vec<EffectDef>,
}

impl WonderDef {
    fn instantiate(&self, id: WonderId) -> Wonder {
        let mut wonder = Wonder::new(id, self.name.clone());
        wonder.cost = self.cost.build();
        for def in &self.effects {
            def.build(CardType::Wonder, &mut wonder.effects);
        }
        wonder
    }
}

/// Parse a card definition document; ids follow file order
pub fn parse_cards(json: &str) -> Result<Vec<Card>> {
    let defs: Vec<CardDef> = serde_json::from_str(json)?;
    Ok(defs
        .iter()
        .enumerate()
        .map(|(i, def)| def.instantiate(CardId::from_raw(i as u32)))
        .collect())
}

/// Parse a wonder definition document; ids follow file order
pub fn parse_wonders(json: &str) -> Result<Vec<Wonder>> {
    let defs: Vec<WonderDef> = serde_json::from_str(json)?;
    Ok(defs
        .iter()
        .enumerate()
        .map(|(i, def)| def.instantiate(WonderId::from_raw(i as u32)))
        .collect())
}

pub fn load_cards(path: &Path) -> Result<Vec<Card>> {
    parse_cards(&fs::read_to_string(path)?)
}

pub fn load_wonders(path: &Path) -> Result<Vec<Wonder>> {
    parse_wonders(&fs::read_to_string(path)?)
}

/// Load `cards.json` and `wonders.json` from a dataset directory
pub fn load_dataset(dir: &Path) -> Result<(Vec<Card>, Vec<Wonder>)> {
    let cards = load_cards(&dir.join("cards.json"))?;
    let wonders = load_wonders(&dir.join("wonders.json"))?;
    Ok((cards, wonders))
}
