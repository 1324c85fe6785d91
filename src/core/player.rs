//! Player state
//!
//! A player owns coins, built cards and wonders, production capability,
//! science progress, chain tags, and progress tokens. Everything needed
//! for cost and score calculation is cached here so those paths never
//! touch the entity repository.

use crate::core::types::config;
use crate::core::{
    Card, CardId, CardType, Effect, ProgressToken, ResourceType, ScienceSymbol, WonderId,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One "one of these per purchase" production grant
pub type ChoiceResources = SmallVec<[ResourceType; 3]>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: usize,
    name: String,
    coins: u32,

    built_cards: Vec<CardId>,
    /// Built-card tally per category, kept in sync with `built_cards`
    card_counts: FxHashMap<CardType, u32>,
    built_wonders: Vec<WonderId>,
    unbuilt_wonders: Vec<WonderId>,

    /// Own production, fixed entries only
    fixed_resources: FxHashMap<ResourceType, u32>,
    /// Production visible to the opponent; raises their trading prices.
    /// Subset of fixed production: choice grants never show up here.
    public_production: FxHashMap<ResourceType, u32>,
    /// Choice grants, each usable once per cost calculation
    choice_resources: Vec<ChoiceResources>,

    science_symbols: FxHashMap<ScienceSymbol, u32>,
    /// Symbols that already paid their one-time pair bonus
    claimed_pairs: FxHashSet<ScienceSymbol>,

    chain_tags: FxHashSet<String>,
    progress_tokens: FxHashSet<ProgressToken>,
    /// Resources whose bank price is fixed at 1 coin
    trading_discounts: FxHashSet<ResourceType>,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            coins: config::INITIAL_COINS,
            built_cards: Vec::new(),
            card_counts: FxHashMap::default(),
            built_wonders: Vec::new(),
            unbuilt_wonders: Vec::new(),
            fixed_resources: FxHashMap::default(),
            public_production: FxHashMap::default(),
            choice_resources: Vec::new(),
            science_symbols: FxHashMap::default(),
            claimed_pairs: FxHashSet::default(),
            chain_tags: FxHashSet::default(),
            progress_tokens: FxHashSet::default(),
            trading_discounts: FxHashSet::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn built_cards(&self) -> &[CardId] {
        &self.built_cards
    }

    pub fn built_wonders(&self) -> &[WonderId] {
        &self.built_wonders
    }

    pub fn built_wonder_count(&self) -> usize {
        self.built_wonders.len()
    }

    pub fn unbuilt_wonders(&self) -> &[WonderId] {
        &self.unbuilt_wonders
    }

    pub fn card_count(&self, card_type: CardType) -> u32 {
        self.card_counts.get(&card_type).copied().unwrap_or(0)
    }

    pub fn fixed_resource(&self, resource: ResourceType) -> u32 {
        self.fixed_resources.get(&resource).copied().unwrap_or(0)
    }

    pub fn public_production(&self, resource: ResourceType) -> u32 {
        self.public_production.get(&resource).copied().unwrap_or(0)
    }

    pub fn choice_resources(&self) -> &[ChoiceResources] {
        &self.choice_resources
    }

    pub fn science_symbol_count(&self, symbol: ScienceSymbol) -> u32 {
        self.science_symbols.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of different symbols with at least one copy
    pub fn distinct_science_symbols(&self) -> usize {
        ScienceSymbol::ALL
            .iter()
            .filter(|symbol| self.science_symbol_count(**symbol) > 0)
            .count()
    }

    pub fn has_claimed_pair(&self, symbol: ScienceSymbol) -> bool {
        self.claimed_pairs.contains(&symbol)
    }

    pub fn has_chain_tag(&self, tag: &str) -> bool {
        self.chain_tags.contains(tag)
    }

    pub fn has_token(&self, token: ProgressToken) -> bool {
        self.progress_tokens.contains(&token)
    }

    pub fn token_count(&self) -> usize {
        self.progress_tokens.len()
    }

    pub fn has_trading_discount(&self, resource: ResourceType) -> bool {
        self.trading_discounts.contains(&resource)
    }

    // --- Mutators ---

    pub fn gain_coins(&mut self, amount: u32) {
        self.coins += amount;
    }

    /// Deduct coins, floored at zero
    ///
    /// Callers that must not over-pay (cost payment) check affordability
    /// during validation; forced losses (loot, wonder effects) floor here.
    pub fn pay_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_sub(amount);
    }

    /// Grant production. Tradable production is also advertised to the
    /// opponent's price calculation.
    pub fn add_resource(&mut self, resource: ResourceType, count: u32, tradable: bool) {
        *self.fixed_resources.entry(resource).or_insert(0) += count;
        if tradable {
            *self.public_production.entry(resource).or_insert(0) += count;
        }
    }

    pub fn add_production_choice(&mut self, choices: ChoiceResources) {
        self.choice_resources.push(choices);
    }

    pub fn add_science_symbol(&mut self, symbol: ScienceSymbol) {
        *self.science_symbols.entry(symbol).or_insert(0) += 1;
    }

    pub fn add_claimed_pair(&mut self, symbol: ScienceSymbol) {
        self.claimed_pairs.insert(symbol);
    }

    pub fn add_chain_tag(&mut self, tag: impl Into<String>) {
        self.chain_tags.insert(tag.into());
    }

    pub fn set_trading_discount(&mut self, resource: ResourceType) {
        self.trading_discounts.insert(resource);
    }

    /// Acquire a progress token and apply its instant part
    pub fn add_progress_token(&mut self, token: ProgressToken) {
        self.progress_tokens.insert(token);
        match token {
            ProgressToken::Law => self.add_science_symbol(ScienceSymbol::Law),
            ProgressToken::Agriculture | ProgressToken::Urbanism => {
                self.gain_coins(config::TOKEN_COIN_GRANT);
            }
            _ => {}
        }
    }

    /// Register a constructed card: ownership, tallies, and chain tag.
    /// The card's effects are applied separately, in declaration order.
    pub fn construct_card(&mut self, card: &Card) {
        self.built_cards.push(card.id);
        *self.card_counts.entry(card.card_type).or_insert(0) += 1;
        if let Some(tag) = &card.chain_tag {
            self.chain_tags.insert(tag.clone());
        }
    }

    /// Remove a built card (destroyed by the opponent)
    ///
    /// Takes back the card's production and chain tag along with it.
    /// Returns false if the card is not in this city.
    pub fn remove_built_card(&mut self, card: &Card) -> bool {
        let Some(pos) = self.built_cards.iter().position(|id| *id == card.id) else {
            return false;
        };
        self.built_cards.remove(pos);
        if let Some(count) = self.card_counts.get_mut(&card.card_type) {
            *count = count.saturating_sub(1);
        }
        if let Some(tag) = &card.chain_tag {
            self.chain_tags.remove(tag);
        }
        self.retract_production(card);
        true
    }

    /// Reverse a card's production grants
    fn retract_production(&mut self, card: &Card) {
        for effect in &card.effects {
            let Effect::Production {
                resources,
                choice,
                tradable,
            } = effect
            else {
                continue;
            };
            if *choice {
                let set: ChoiceResources = resources.iter().map(|(r, _)| *r).collect();
                if let Some(pos) = self.choice_resources.iter().position(|c| *c == set) {
                    self.choice_resources.remove(pos);
                }
                continue;
            }
            for (resource, count) in resources {
                if let Some(owned) = self.fixed_resources.get_mut(resource) {
                    *owned = owned.saturating_sub(*count as u32);
                }
                if *tradable {
                    if let Some(public) = self.public_production.get_mut(resource) {
                        *public = public.saturating_sub(*count as u32);
                    }
                }
            }
        }
    }

    // --- Wonder management ---

    pub fn add_unbuilt_wonder(&mut self, wonder: WonderId) {
        self.unbuilt_wonders.push(wonder);
    }

    pub fn owns_unbuilt_wonder(&self, wonder: WonderId) -> bool {
        self.unbuilt_wonders.contains(&wonder)
    }

    /// Move a wonder from the unbuilt hand to the built list
    ///
    /// Returns false if the wonder is not in hand.
    pub fn construct_wonder(&mut self, wonder: WonderId) -> bool {
        let Some(pos) = self.unbuilt_wonders.iter().position(|id| *id == wonder) else {
            return false;
        };
        self.unbuilt_wonders.remove(pos);
        self.built_wonders.push(wonder);
        true
    }

    /// Drop every unbuilt wonder (seventh-wonder cap)
    pub fn clear_unbuilt_wonders(&mut self) -> usize {
        let dropped = self.unbuilt_wonders.len();
        self.unbuilt_wonders.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_coin_floor() {
        let mut player = Player::new(0, "Alice");
        assert_eq!(player.coins(), config::INITIAL_COINS);

        player.pay_coins(100);
        assert_eq!(player.coins(), 0, "coins must floor at zero");

        player.gain_coins(5);
        player.pay_coins(2);
        assert_eq!(player.coins(), 3);
    }

    #[test]
    fn test_production_visibility() {
        let mut player = Player::new(0, "Alice");
        player.add_resource(ResourceType::Wood, 2, true);
        player.add_resource(ResourceType::Glass, 1, false);

        assert_eq!(player.fixed_resource(ResourceType::Wood), 2);
        assert_eq!(player.public_production(ResourceType::Wood), 2);
        assert_eq!(player.fixed_resource(ResourceType::Glass), 1);
        assert_eq!(
            player.public_production(ResourceType::Glass),
            0,
            "non-tradable production must stay invisible to the opponent"
        );
    }

    #[test]
    fn test_construct_and_destroy_card() {
        let mut player = Player::new(0, "Alice");
        let mut card = Card::new(CardId::new(3), "Garrison", 1, CardType::Military);
        card.chain_tag = Some("SWORD".to_string());

        player.construct_card(&card);
        assert_eq!(player.card_count(CardType::Military), 1);
        assert!(player.has_chain_tag("SWORD"));

        assert!(player.remove_built_card(&card));
        assert_eq!(player.card_count(CardType::Military), 0);
        assert!(!player.has_chain_tag("SWORD"), "the chain link dies with the card");
        assert!(!player.remove_built_card(&card));
    }

    #[test]
    fn test_destruction_retracts_production() {
        let mut player = Player::new(0, "Alice");
        let mut card = Card::new(CardId::new(5), "Sawmill", 2, CardType::RawMaterial);
        card.effects.push(Effect::Production {
            resources: smallvec![(ResourceType::Wood, 2)],
            choice: false,
            tradable: true,
        });

        player.construct_card(&card);
        player.add_resource(ResourceType::Wood, 2, true);
        player.remove_built_card(&card);

        assert_eq!(player.fixed_resource(ResourceType::Wood), 0);
        assert_eq!(player.public_production(ResourceType::Wood), 0);
    }

    #[test]
    fn test_progress_token_instant_effects() {
        let mut player = Player::new(0, "Alice");

        player.add_progress_token(ProgressToken::Law);
        assert_eq!(player.science_symbol_count(ScienceSymbol::Law), 1);

        let before = player.coins();
        player.add_progress_token(ProgressToken::Agriculture);
        assert_eq!(player.coins(), before + config::TOKEN_COIN_GRANT);

        player.add_progress_token(ProgressToken::Strategy);
        assert!(player.has_token(ProgressToken::Strategy));
        assert_eq!(player.token_count(), 3);
    }

    #[test]
    fn test_wonder_hand_management() {
        let mut player = Player::new(1, "Bob");
        player.add_unbuilt_wonder(WonderId::new(0));
        player.add_unbuilt_wonder(WonderId::new(1));

        assert!(player.owns_unbuilt_wonder(WonderId::new(0)));
        assert!(player.construct_wonder(WonderId::new(0)));
        assert!(!player.construct_wonder(WonderId::new(0)));
        assert_eq!(player.built_wonder_count(), 1);

        assert_eq!(player.clear_unbuilt_wonders(), 1);
        assert!(player.unbuilt_wonders().is_empty());
    }

    #[test]
    fn test_distinct_science_symbols() {
        let mut player = Player::new(0, "Alice");
        player.add_science_symbol(ScienceSymbol::Globe);
        player.add_science_symbol(ScienceSymbol::Globe);
        player.add_science_symbol(ScienceSymbol::Wheel);

        assert_eq!(player.distinct_science_symbols(), 2);
        assert_eq!(player.science_symbol_count(ScienceSymbol::Globe), 2);
    }

    #[test]
    fn test_choice_resources_recorded() {
        let mut player = Player::new(0, "Alice");
        player.add_production_choice(smallvec![ResourceType::Wood, ResourceType::Clay]);
        assert_eq!(player.choice_resources().len(), 1);
    }
}
