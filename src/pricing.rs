//! Product Pricing
//!
//! Resolves the effective unit price and badges of a single product from the
//! promotion rules active right now.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use smallvec::SmallVec;
use tracing::trace;

use crate::{badges::ResolvedBadge, products::Product, promotions::PromotionRule};

/// Effective unit pricing of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPricing<'a> {
    /// Undiscounted unit price
    pub original_price: Decimal,

    /// Unit price after percentage and fixed price rules, never negative
    pub discounted_price: Decimal,

    /// Whether any rule targets the product, whether or not it changed the price
    pub has_promotion: bool,

    /// Rules targeting the product, in the order they were supplied
    pub applied_rules: SmallVec<[&'a PromotionRule; 4]>,

    /// Badge of the highest priority rule that has one
    pub primary_badge: Option<ResolvedBadge<'a>>,

    /// Every badge, highest priority first
    pub all_badges: SmallVec<[ResolvedBadge<'a>; 2]>,
}

impl ResolvedPricing<'_> {
    /// Pricing of a product no rule targets.
    pub fn unpromoted(product: &Product) -> Self {
        Self {
            original_price: product.base_price,
            discounted_price: product.base_price,
            has_promotion: false,
            applied_rules: SmallVec::new(),
            primary_badge: None,
            all_badges: SmallVec::new(),
        }
    }

    /// Amount taken off the unit price.
    pub fn unit_savings(&self) -> Decimal {
        self.original_price - self.discounted_price
    }
}

/// Resolve the unit price and badges of `product`.
///
/// Rules that target the product are evaluated highest priority first, ties
/// keeping their supplied order. Percentage discounts compound on the running
/// price, fixed prices can only lower it, and the result is clamped at zero.
/// The first badge encountered becomes the primary badge.
pub fn resolve_product_pricing<'a>(
    product: &Product,
    active_rules: &[&'a PromotionRule],
) -> ResolvedPricing<'a> {
    let applied_rules: SmallVec<[&'a PromotionRule; 4]> = active_rules
        .iter()
        .copied()
        .filter(|rule| rule.applies_to(product))
        .collect();

    if applied_rules.is_empty() {
        return ResolvedPricing::unpromoted(product);
    }

    let mut by_priority = applied_rules.clone();
    by_priority.sort_by_key(|rule| Reverse(rule.priority));

    let mut current = product.base_price;
    let mut all_badges: SmallVec<[ResolvedBadge<'a>; 2]> = SmallVec::new();

    for rule in by_priority {
        if let Some(badge) = &rule.badge {
            all_badges.push(badge.resolve());
        }

        current = rule.kind.apply_to_unit_price(current);
    }

    let discounted_price = current.max(Decimal::ZERO);

    trace!(
        product = %product.id,
        rules = applied_rules.len(),
        badges = all_badges.len(),
        %discounted_price,
        "resolved product pricing"
    );

    ResolvedPricing {
        original_price: product.base_price,
        discounted_price,
        has_promotion: true,
        applied_rules,
        primary_badge: all_badges.first().copied(),
        all_badges,
    }
}

/// Resolve pricing for every product of a catalog listing, in listing order.
pub fn resolve_catalog_pricing<'p, 'a>(
    products: &'p [Product],
    active_rules: &[&'a PromotionRule],
) -> Vec<(&'p Product, ResolvedPricing<'a>)> {
    products
        .iter()
        .map(|product| (product, resolve_product_pricing(product, active_rules)))
        .collect()
}
