//! Construction cost resolution
//!
//! Answers "can this player afford this cost, and for how many coins?"
//! The interesting part is choice production (cards granting one resource
//! out of a set per purchase): covering the residual requirement with
//! those entries is a small assignment problem, and the search must find
//! the assignment that minimizes total bank spend, not merely a feasible
//! one. Players hold only a handful of choice entries, so an exhaustive
//! search over entry assignments is exact and cheap.
//!
//! Resolution order:
//! 1. apply token coin discounts (Masonry / Architecture) to the coin part
//! 2. subtract owned fixed production from the resource requirement
//! 3. cover what remains with choice entries, minimizing bank cost
//! 4. buy every still-uncovered unit from the bank at
//!    `2 + opponent public production`, or flat 1 under a trading discount

use crate::core::player::ChoiceResources;
use crate::core::types::config;
use crate::core::{CardType, Player, ProgressToken, ResourceCost, ResourceType};

/// Priced verdict for one cost against one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostQuote {
    pub affordable: bool,
    /// Coins the action would charge in total
    pub total: u32,
    /// Portion of `total` paid to the bank for resources (relevant to the
    /// Economy token, which redirects trading fees to the opponent)
    pub trading: u32,
}

impl CostQuote {
    pub fn free() -> Self {
        CostQuote {
            affordable: true,
            total: 0,
            trading: 0,
        }
    }
}

/// Price of buying one unit of `resource` from the bank
pub fn trading_price(player: &Player, opponent: &Player, resource: ResourceType) -> u32 {
    if player.has_trading_discount(resource) {
        1
    } else {
        config::TRADING_BASE_COST + opponent.public_production(resource)
    }
}

/// Price a cost for `player`, trading against `opponent`
///
/// `target` is what is being constructed; it decides which token discount
/// applies. Pure function of the two players' states.
pub fn calculate_cost(
    player: &Player,
    cost: &ResourceCost,
    opponent: &Player,
    target: CardType,
) -> CostQuote {
    let mut coins = cost.coins;
    if target == CardType::Civilian && player.has_token(ProgressToken::Masonry) {
        coins = coins.saturating_sub(config::MASONRY_DISCOUNT);
    }
    if target == CardType::Wonder && player.has_token(ProgressToken::Architecture) {
        coins = coins.saturating_sub(config::ARCHITECTURE_DISCOUNT);
    }

    // Residual requirement after own fixed production
    let mut residual = [0u32; 5];
    for (resource, need) in &cost.resources {
        residual[resource.index()] = (*need as u32).saturating_sub(player.fixed_resource(*resource));
    }

    let mut prices = [0u32; 5];
    for resource in ResourceType::ALL {
        prices[resource.index()] = trading_price(player, opponent, resource);
    }

    let trading = min_bank_cost(player.choice_resources(), &mut residual, &prices);

    let total = coins + trading;
    CostQuote {
        affordable: player.coins() >= total,
        total,
        trading,
    }
}

/// Cheapest bank spend covering `residual`, given the choice entries
///
/// Recursive exhaustive search: each entry either covers one still-needed
/// unit of a resource in its set, or sits out. Bounded by the handful of
/// choice entries a player can accumulate.
fn min_bank_cost(entries: &[ChoiceResources], residual: &mut [u32; 5], prices: &[u32; 5]) -> u32 {
    let Some((entry, rest)) = entries.split_first() else {
        return residual
            .iter()
            .zip(prices.iter())
            .map(|(need, price)| need * price)
            .sum();
    };

    // Skipping the entry is always an option
    let mut best = min_bank_cost(rest, residual, prices);

    for resource in entry {
        let idx = resource.index();
        if residual[idx] == 0 {
            continue;
        }
        residual[idx] -= 1;
        best = best.min(min_bank_cost(rest, residual, prices));
        residual[idx] += 1;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn cost_of(resources: &[(ResourceType, u8)], coins: u32) -> ResourceCost {
        let mut cost = ResourceCost::coins(coins);
        for (resource, count) in resources {
            cost.add_resource(*resource, *count);
        }
        cost
    }

    #[test]
    fn test_free_cost_is_affordable() {
        let a = Player::new(0, "A");
        let b = Player::new(1, "B");
        let quote = calculate_cost(&a, &ResourceCost::free(), &b, CardType::Civilian);
        assert!(quote.affordable);
        assert_eq!(quote.total, 0);
    }

    #[test]
    fn test_fixed_production_covers_requirement() {
        let mut a = Player::new(0, "A");
        let b = Player::new(1, "B");
        a.add_resource(ResourceType::Wood, 2, true);

        let quote = calculate_cost(
            &a,
            &cost_of(&[(ResourceType::Wood, 2)], 0),
            &b,
            CardType::Civilian,
        );
        assert!(quote.affordable);
        assert_eq!(quote.total, 0);
    }

    #[test]
    fn test_bank_price_follows_opponent_production() {
        let a = Player::new(0, "A");
        let mut b = Player::new(1, "B");

        assert_eq!(trading_price(&a, &b, ResourceType::Clay), 2);

        b.add_resource(ResourceType::Clay, 2, true);
        assert_eq!(trading_price(&a, &b, ResourceType::Clay), 4);

        // Non-tradable production must not raise the price
        b.add_resource(ResourceType::Clay, 1, false);
        assert_eq!(trading_price(&a, &b, ResourceType::Clay), 4);
    }

    #[test]
    fn test_trading_discount_fixes_price_at_one() {
        let mut a = Player::new(0, "A");
        let mut b = Player::new(1, "B");
        b.add_resource(ResourceType::Stone, 3, true);
        a.set_trading_discount(ResourceType::Stone);

        assert_eq!(trading_price(&a, &b, ResourceType::Stone), 1);

        let quote = calculate_cost(
            &a,
            &cost_of(&[(ResourceType::Stone, 2)], 0),
            &b,
            CardType::Civilian,
        );
        assert_eq!(quote.total, 2);
        assert_eq!(quote.trading, 2);
    }

    #[test]
    fn test_choice_entry_covers_cheapest_unit() {
        // Fixed wood covers one unit; the {wood, clay} choice must cover
        // the clay unit so nothing is bought from the bank.
        let mut a = Player::new(0, "A");
        let b = Player::new(1, "B");
        a.add_resource(ResourceType::Wood, 1, true);
        a.add_production_choice(smallvec![ResourceType::Wood, ResourceType::Clay]);

        let quote = calculate_cost(
            &a,
            &cost_of(&[(ResourceType::Wood, 1), (ResourceType::Clay, 1)], 0),
            &b,
            CardType::Civilian,
        );
        assert!(quote.affordable);
        assert_eq!(quote.total, 0, "search must pick the zero-bank assignment");
    }

    #[test]
    fn test_choice_assignment_minimizes_bank_cost() {
        // One {wood, stone} entry, requirement of one wood and one stone.
        // Stone is expensive (opponent produces 3), wood is base price, so
        // the entry must cover stone and the bank sells the wood.
        let mut a = Player::new(0, "A");
        let mut b = Player::new(1, "B");
        b.add_resource(ResourceType::Stone, 3, true);
        a.add_production_choice(smallvec![ResourceType::Wood, ResourceType::Stone]);

        let quote = calculate_cost(
            &a,
            &cost_of(&[(ResourceType::Wood, 1), (ResourceType::Stone, 1)], 0),
            &b,
            CardType::Civilian,
        );
        assert_eq!(quote.total, 2, "cover 5-coin stone, buy 2-coin wood");
    }

    #[test]
    fn test_each_choice_entry_used_once() {
        let mut a = Player::new(0, "A");
        let b = Player::new(1, "B");
        a.add_production_choice(smallvec![ResourceType::Glass]);

        let quote = calculate_cost(
            &a,
            &cost_of(&[(ResourceType::Glass, 2)], 0),
            &b,
            CardType::Civilian,
        );
        // The single entry covers one unit; the second costs base price.
        assert_eq!(quote.total, 2);
    }

    #[test]
    fn test_affordability_against_coin_balance() {
        let a = Player::new(0, "A"); // 7 coins
        let mut b = Player::new(1, "B");
        b.add_resource(ResourceType::Paper, 2, true);

        // 2 paper at (2 + 2) = 8 coins > 7
        let quote = calculate_cost(
            &a,
            &cost_of(&[(ResourceType::Paper, 2)], 0),
            &b,
            CardType::Civilian,
        );
        assert!(!quote.affordable);
        assert_eq!(quote.total, 8);
    }

    #[test]
    fn test_masonry_discount_on_civilian_only() {
        let mut a = Player::new(0, "A");
        let b = Player::new(1, "B");
        a.add_progress_token(ProgressToken::Masonry);

        let cost = cost_of(&[], 3);
        let civilian = calculate_cost(&a, &cost, &b, CardType::Civilian);
        assert_eq!(civilian.total, 3 - config::MASONRY_DISCOUNT);

        let military = calculate_cost(&a, &cost, &b, CardType::Military);
        assert_eq!(military.total, 3);
    }

    #[test]
    fn test_architecture_discount_floors_at_zero() {
        let mut a = Player::new(0, "A");
        let b = Player::new(1, "B");
        a.add_progress_token(ProgressToken::Architecture);

        let quote = calculate_cost(&a, &cost_of(&[], 1), &b, CardType::Wonder);
        assert_eq!(quote.total, 0);
    }

    #[test]
    fn test_monotonic_in_fixed_production() {
        // Adding a fixed resource never increases the quoted total.
        let mut b = Player::new(1, "B");
        b.add_resource(ResourceType::Wood, 1, true);
        let cost = cost_of(&[(ResourceType::Wood, 2), (ResourceType::Clay, 1)], 1);

        let mut previous = u32::MAX;
        let mut a = Player::new(0, "A");
        for _ in 0..4 {
            let quote = calculate_cost(&a, &cost, &b, CardType::Civilian);
            assert!(quote.total <= previous);
            previous = quote.total;
            a.add_resource(ResourceType::Wood, 1, true);
        }
    }
}
