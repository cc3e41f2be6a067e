//! Line Pricing
//!
//! Prices a quantity of one product, applying "buy X pay Y" quantity tiers on
//! top of the unit pricing.

use rust_decimal::Decimal;

use crate::{
    pricing::{ResolvedPricing, resolve_product_pricing},
    products::Product,
    promotions::{PromotionRule, RuleKind},
};

/// Pricing of a quantity of one product
#[derive(Debug, Clone, PartialEq)]
pub struct LinePricing<'a> {
    /// Effective unit price
    pub unit_price: Decimal,

    /// Effective line total
    pub total_price: Decimal,

    /// Amount taken off the undiscounted line total, negative when a tier
    /// charges for more units than it groups
    pub discount: Decimal,

    /// Whether `discount` is positive
    pub has_discount: bool,

    /// Quantity-tier rule that priced the line, if one qualified
    pub tier: Option<&'a PromotionRule>,

    /// Unit pricing the line was derived from
    pub pricing: ResolvedPricing<'a>,
}

impl<'a> LinePricing<'a> {
    /// Rules targeting the product, in the order they were supplied.
    pub fn applied_rules(&self) -> &[&'a PromotionRule] {
        &self.pricing.applied_rules
    }
}

/// Price `quantity` units of `product`.
///
/// The first "buy X pay Y" rule among the product's rules, in supplied order,
/// prices the line from the undiscounted unit price once the quantity reaches
/// its group size, superseding percentage and fixed price rules. Otherwise the
/// line is charged at the discounted unit price.
pub fn resolve_line_pricing<'a>(
    product: &Product,
    quantity: u32,
    active_rules: &[&'a PromotionRule],
) -> LinePricing<'a> {
    let pricing = resolve_product_pricing(product, active_rules);
    let original = pricing.original_price;
    let units = Decimal::from(quantity);
    let undiscounted_total = original.saturating_mul(units);

    if pricing.applied_rules.is_empty() {
        return LinePricing {
            unit_price: original,
            total_price: undiscounted_total,
            discount: Decimal::ZERO,
            has_discount: false,
            tier: None,
            pricing,
        };
    }

    // Tier rules are looked up in supplied order, not priority order.
    let tiered = pricing
        .applied_rules
        .iter()
        .copied()
        .find_map(|rule| match rule.kind {
            RuleKind::BuyXPayY { buy, pay } => Some((rule, buy, pay)),
            _ => None,
        })
        .and_then(|(rule, buy, pay)| {
            tier_total(original, quantity, buy, pay).map(|total| (rule, total))
        });

    let (unit_price, total_price, tier) = match tiered {
        Some((rule, total)) => (total / units, total, Some(rule)),
        None => {
            let unit = pricing.discounted_price;
            (unit, unit.saturating_mul(units), None)
        }
    };

    let discount = undiscounted_total.saturating_sub(total_price);

    LinePricing {
        unit_price,
        total_price,
        discount,
        has_discount: discount > Decimal::ZERO,
        tier,
        pricing,
    }
}

/// Line total under a "buy `buy` pay `pay`" tier, or `None` when the tier does
/// not apply to this quantity.
///
/// A group size of zero never applies.
fn tier_total(original: Decimal, quantity: u32, buy: u32, pay: u32) -> Option<Decimal> {
    if buy == 0 || quantity < buy {
        return None;
    }

    let groups = quantity / buy;
    let remaining = quantity % buy;
    let payable = groups.saturating_mul(pay).saturating_add(remaining);

    Some(original.saturating_mul(Decimal::from(payable)))
}
