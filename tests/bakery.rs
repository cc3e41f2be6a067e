//! Integration test for the bakery fixture set.
//!
//! Cart on 2026-07-15, with the carrot cake special running:
//!
//! 1. Sourdough x2 at £4.50, 10% bread week: £8.10 (saves £0.90)
//! 2. Croissant x4 at £1.80, 3 for 2: 3 payable units, £5.40 (saves £1.80)
//! 3. Carrot cake x1 at £18.00, fixed £15.00: £15.00 (saves £3.00)
//! 4. Coffee beans x1, badge only: £9.00
//! 5. Eclair x1, unknown promotion kind treated as badge only: £2.50
//!
//! Total: £40.00 from £45.70. Free delivery over £30 is the first free
//! shipping rule reached and takes the credit.

use jiff::civil::date;
use rust_decimal::Decimal;
use testresult::TestResult;

use rosette::{
    badges::{DARK_TEXT, LIGHT_TEXT},
    prelude::*,
};

fn ids<'a>(aggregate: &CartAggregate<'a>) -> Vec<&'a str> {
    aggregate
        .applied_rule_ids
        .iter()
        .map(|&id| id.as_str())
        .collect()
}

#[test]
fn bakery_cart_in_july() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;
    let active = fixture.active_promotions(date(2026, 7, 15));

    let aggregate = aggregate_cart(fixture.cart_lines(), &active);

    let totals: Vec<Decimal> = aggregate.lines.iter().map(|line| line.total_price).collect();

    assert_eq!(
        totals,
        [
            Decimal::new(810, 2),
            Decimal::new(540, 2),
            Decimal::new(1500, 2),
            Decimal::new(900, 2),
            Decimal::new(250, 2),
        ]
    );

    assert_eq!(aggregate.subtotal, Decimal::new(4000, 2));
    assert_eq!(aggregate.total_discount, Decimal::new(570, 2));
    assert!(aggregate.free_shipping_granted);
    assert_eq!(
        aggregate.free_shipping_rule.map(|rule| rule.id.as_str()),
        Some("free-shipping-30")
    );
    assert_eq!(
        ids(&aggregate),
        [
            "bread-week",
            "croissant-tier",
            "cake-fixed",
            "free-shipping-30",
        ]
    );

    Ok(())
}

#[test]
fn bakery_cart_before_bread_week() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;
    let active = fixture.active_promotions(date(2026, 5, 1));

    let aggregate = aggregate_cart(fixture.cart_lines(), &active);

    // 9.00 + 5.40 + 18.00 + 9.00 + 2.50
    assert_eq!(aggregate.subtotal, Decimal::new(4390, 2));
    assert_eq!(aggregate.total_discount, Decimal::new(180, 2));
    assert_eq!(
        aggregate.free_shipping_rule.map(|rule| rule.id.as_str()),
        Some("free-shipping-30")
    );

    Ok(())
}

#[test]
fn disabled_rules_are_never_active() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;

    for day in [date(2026, 1, 1), date(2026, 7, 15), date(2027, 1, 1)] {
        assert!(
            fixture
                .active_promotions(day)
                .iter()
                .all(|rule| rule.id.as_str() != "winter-sale")
        );
    }

    Ok(())
}

#[test]
fn bakery_catalog_badges() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;
    let active = fixture.active_promotions(date(2026, 7, 15));

    let priced = resolve_catalog_pricing(fixture.products(), &active);

    let badge = |id: &str| {
        priced
            .iter()
            .find(|(product, _)| product.id.as_str() == id)
            .and_then(|(_, pricing)| pricing.primary_badge)
            .map(|badge| (badge.text, badge.text_color))
    };

    assert_eq!(badge("rye"), Some(("SALE", LIGHT_TEXT)));
    assert_eq!(badge("croissant"), Some(("3 FOR 2", DARK_TEXT)));
    assert_eq!(badge("coffee-beans"), Some(("NEW", LIGHT_TEXT)));
    assert_eq!(badge("eclair"), Some(("MEMBERS", LIGHT_TEXT)));

    let eclair = fixture.product("eclair")?;
    let pricing = resolve_product_pricing(eclair, &active);

    assert!(pricing.has_promotion);
    assert_eq!(pricing.discounted_price, eclair.base_price);

    Ok(())
}

#[test]
fn bakery_catalog_prices() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;
    let active = fixture.active_promotions(date(2026, 7, 15));

    let cake = resolve_product_pricing(fixture.product("carrot-cake")?, &active);
    let baguette = resolve_product_pricing(fixture.product("baguette")?, &active);
    let croissant = resolve_product_pricing(fixture.product("croissant")?, &active);

    assert_eq!(cake.discounted_price, Decimal::new(1500, 2));
    assert_eq!(baguette.discounted_price, Decimal::new(198, 2));

    // Quantity tiers only take effect on lines.
    assert_eq!(croissant.discounted_price, croissant.original_price);

    Ok(())
}
