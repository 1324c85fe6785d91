//! Card and wonder entities
//!
//! Both are immutable after load, except for a wonder's built flag. They
//! are stored in the repository and referenced by id; the model never
//! clones them except transiently while a command applies their effects.

use crate::core::{CardId, CardType, Effect, Player, ResourceType, WonderId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Construction cost: coins plus a multiset of resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub coins: u32,
    /// Required resources, at most one entry per type
    pub resources: SmallVec<[(ResourceType, u8); 4]>,
}

impl ResourceCost {
    pub fn free() -> Self {
        ResourceCost::default()
    }

    pub fn coins(coins: u32) -> Self {
        ResourceCost {
            coins,
            resources: SmallVec::new(),
        }
    }

    /// Add a resource requirement, merging with an existing entry
    pub fn add_resource(&mut self, resource: ResourceType, count: u8) {
        if let Some((_, existing)) = self.resources.iter_mut().find(|(r, _)| *r == resource) {
            *existing += count;
        } else {
            self.resources.push((resource, count));
        }
    }

    pub fn amount(&self, resource: ResourceType) -> u8 {
        self.resources
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn is_free(&self) -> bool {
        self.coins == 0 && self.resources.is_empty()
    }
}

/// A building card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    /// Age the card belongs to (1, 2, or 3; guilds are age 3)
    pub age: u8,
    pub card_type: CardType,
    pub cost: ResourceCost,
    /// Chain tag this card grants once built
    pub chain_tag: Option<String>,
    /// Chain tag that, if already owned, waives the whole cost
    pub requires_chain: Option<String>,
    /// Consequences of construction, applied in declaration order
    pub effects: SmallVec<[Effect; 2]>,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>, age: u8, card_type: CardType) -> Self {
        Card {
            id,
            name: name.into(),
            age,
            card_type,
            cost: ResourceCost::free(),
            chain_tag: None,
            requires_chain: None,
            effects: SmallVec::new(),
        }
    }

    /// End-game points contributed by this card
    ///
    /// Guild cards depend on both players' cities, so scoring takes both.
    pub fn victory_points(&self, owner: &Player, opponent: &Player) -> u32 {
        self.effects
            .iter()
            .map(|effect| effect.score(owner, opponent))
            .sum()
    }
}

/// A wonder
///
/// Drafted at game start, built at most once by burying a pyramid card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wonder {
    pub id: WonderId,
    pub name: String,
    pub cost: ResourceCost,
    pub effects: SmallVec<[Effect; 2]>,
    built: bool,
    /// The card buried under this wonder; informational only
    overlay_card: Option<CardId>,
}

impl Wonder {
    pub fn new(id: WonderId, name: impl Into<String>) -> Self {
        Wonder {
            id,
            name: name.into(),
            cost: ResourceCost::free(),
            effects: SmallVec::new(),
            built: false,
            overlay_card: None,
        }
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn overlay_card(&self) -> Option<CardId> {
        self.overlay_card
    }

    /// Mark the wonder built on top of the given pyramid card
    pub fn build(&mut self, overlay: CardId) {
        self.built = true;
        self.overlay_card = Some(overlay);
    }

    pub fn victory_points(&self, owner: &Player, opponent: &Player) -> u32 {
        self.effects
            .iter()
            .map(|effect| effect.score(owner, opponent))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_cost_merging() {
        let mut cost = ResourceCost::coins(2);
        cost.add_resource(ResourceType::Wood, 1);
        cost.add_resource(ResourceType::Wood, 2);
        cost.add_resource(ResourceType::Glass, 1);

        assert_eq!(cost.coins, 2);
        assert_eq!(cost.amount(ResourceType::Wood), 3);
        assert_eq!(cost.amount(ResourceType::Glass), 1);
        assert_eq!(cost.amount(ResourceType::Stone), 0);
        assert_eq!(cost.resources.len(), 2);
        assert!(!cost.is_free());
        assert!(ResourceCost::free().is_free());
    }

    #[test]
    fn test_wonder_build_flag() {
        let mut wonder = Wonder::new(WonderId::new(0), "The Pyramids");
        assert!(!wonder.is_built());

        wonder.build(CardId::new(7));
        assert!(wonder.is_built());
        assert_eq!(wonder.overlay_card(), Some(CardId::new(7)));
    }
}
