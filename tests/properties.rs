//! Property tests for rule filtering and unit price resolution.

use jiff::civil::{Date, date};
use proptest::prelude::*;
use rust_decimal::Decimal;

use rosette::prelude::*;

fn day() -> impl Strategy<Value = Date> {
    (1_i8..=12, 1_i8..=28).prop_map(|(month, day)| date(2026, month, day))
}

fn price() -> impl Strategy<Value = Decimal> {
    (0_i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind() -> impl Strategy<Value = RuleKind> {
    prop_oneof![
        (0_i64..=250).prop_map(|points| RuleKind::PercentageDiscount {
            percentage: Decimal::from(points)
        }),
        (0_i64..100_000).prop_map(|cents| RuleKind::FixedPrice {
            price: Decimal::new(cents, 2)
        }),
        (0_u32..5)
            .prop_flat_map(|buy| (Just(buy), 0..=buy))
            .prop_map(|(buy, pay)| RuleKind::BuyXPayY { buy, pay }),
        Just(RuleKind::BadgeOnly),
    ]
}

fn rule() -> impl Strategy<Value = PromotionRule> {
    (
        any::<bool>(),
        prop::option::of(day()),
        prop::option::of(day()),
        kind(),
    )
        .prop_map(|(enabled, start, end, kind)| {
            PromotionRule::new("rule", RuleScope::All, kind)
                .with_enabled(enabled)
                .with_window(start, end)
        })
}

proptest! {
    #[test]
    fn prop_filtering_is_idempotent(
        rules in prop::collection::vec(rule(), 0..8),
        on in day(),
    ) {
        let once = active_rules(&rules, on);
        let twice = active_rules(once.iter().copied(), on);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_discounted_price_is_never_negative(
        base in price(),
        kinds in prop::collection::vec(kind(), 0..6),
    ) {
        let product = Product::new("loaf", "bread", base);
        let rules: Vec<PromotionRule> = kinds
            .into_iter()
            .map(|kind| PromotionRule::new("rule", RuleScope::All, kind))
            .collect();
        let refs: Vec<&PromotionRule> = rules.iter().collect();

        let pricing = resolve_product_pricing(&product, &refs);

        prop_assert!(pricing.discounted_price >= Decimal::ZERO);
    }

    #[test]
    fn prop_fixed_price_never_raises_price(base in price(), cents in 1_i64..100_000) {
        let product = Product::new("loaf", "bread", base);
        let fixed = Decimal::new(cents, 2);
        let rule = PromotionRule::new(
            "fixed",
            RuleScope::All,
            RuleKind::FixedPrice { price: fixed },
        );

        let pricing = resolve_product_pricing(&product, &[&rule]);

        prop_assert_eq!(pricing.discounted_price, base.min(fixed));
    }

    #[test]
    fn prop_distinct_priorities_make_order_irrelevant(
        base in price(),
        (kinds, order) in prop::collection::vec(kind(), 1..6).prop_flat_map(|kinds| {
            let indices: Vec<usize> = (0..kinds.len()).collect();

            (Just(kinds), Just(indices).prop_shuffle())
        }),
    ) {
        let product = Product::new("loaf", "bread", base);
        let rules: Vec<PromotionRule> = kinds
            .into_iter()
            .zip(0_i32..)
            .map(|(kind, priority)| {
                PromotionRule::new(format!("rule-{priority}"), RuleScope::All, kind)
                    .with_priority(priority)
            })
            .collect();

        let supplied: Vec<&PromotionRule> = rules.iter().collect();
        let shuffled: Vec<&PromotionRule> = order.iter().filter_map(|&i| rules.get(i)).collect();

        let expected = resolve_product_pricing(&product, &supplied);
        let actual = resolve_product_pricing(&product, &shuffled);

        prop_assert_eq!(expected.discounted_price, actual.discounted_price);
        prop_assert_eq!(expected.has_promotion, actual.has_promotion);
    }

    #[test]
    fn prop_line_total_never_exceeds_undiscounted(
        base in price(),
        quantity in 0_u32..20,
        kinds in prop::collection::vec(kind(), 0..4),
    ) {
        let product = Product::new("loaf", "bread", base);
        let rules: Vec<PromotionRule> = kinds
            .into_iter()
            .map(|kind| PromotionRule::new("rule", RuleScope::All, kind))
            .collect();
        let refs: Vec<&PromotionRule> = rules.iter().collect();

        let line = resolve_line_pricing(&product, quantity, &refs);

        prop_assert!(line.total_price <= base * Decimal::from(quantity));
        prop_assert!(line.discount >= Decimal::ZERO);
        prop_assert_eq!(line.has_discount, line.discount > Decimal::ZERO);
    }

    #[test]
    fn prop_tier_total_follows_groups_and_remainder(
        base in price(),
        quantity in 0_u32..40,
        buy in 1_u32..8,
        pay in 0_u32..10,
    ) {
        let rule = PromotionRule::new("tier", RuleScope::All, RuleKind::BuyXPayY { buy, pay });
        let product = Product::new("loaf", "bread", base);

        let line = resolve_line_pricing(&product, quantity, &[&rule]);

        let payable = if quantity >= buy {
            (quantity / buy) * pay + quantity % buy
        } else {
            quantity
        };

        prop_assert_eq!(line.total_price, base * Decimal::from(payable));
        prop_assert_eq!(line.discount, base * Decimal::from(quantity) - line.total_price);
        prop_assert_eq!(line.tier.is_some(), quantity >= buy);
    }
}
