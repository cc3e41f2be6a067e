//! Cart
//!
//! Aggregates line pricing over a whole cart and decides free shipping.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::{
    lines::{LinePricing, resolve_line_pricing},
    products::{Product, ProductId},
    promotions::{PromotionId, PromotionRule, RuleKind},
};

/// A cart line, carrying enough of the product for promotion targeting
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Product id
    pub product_id: ProductId,

    /// Product category key
    pub category: String,

    /// Undiscounted unit price
    pub unit_base_price: Decimal,

    /// Number of units
    pub quantity: u32,
}

impl CartLine {
    /// Create a new cart line.
    pub fn new(
        product_id: impl Into<ProductId>,
        category: impl Into<String>,
        unit_base_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            category: category.into(),
            unit_base_price,
            quantity,
        }
    }

    /// Create a line for `quantity` units of a catalog product.
    pub fn for_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            category: product.category.clone(),
            unit_base_price: product.base_price,
            quantity,
        }
    }

    /// The product identity promotions are matched against.
    pub fn product(&self) -> Product {
        Product::new(
            self.product_id.clone(),
            self.category.clone(),
            self.unit_base_price,
        )
    }
}

/// Priced cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartAggregate<'a> {
    /// Pricing of each line, in cart order
    pub lines: Vec<LinePricing<'a>>,

    /// Sum of effective line totals
    pub subtotal: Decimal,

    /// Sum of line discounts
    pub total_discount: Decimal,

    /// Whether a free shipping rule qualified
    pub free_shipping_granted: bool,

    /// The free shipping rule that took credit
    pub free_shipping_rule: Option<&'a PromotionRule>,

    /// Ids of discounting rules and the free shipping rule, first seen first
    pub applied_rule_ids: Vec<&'a PromotionId>,
}

impl CartAggregate<'_> {
    /// Cart total before any discount.
    pub fn original_subtotal(&self) -> Decimal {
        self.subtotal.saturating_add(self.total_discount)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Price every line of a cart and total it up.
///
/// Applied rule ids only collect rules from lines that were actually
/// discounted. Free shipping never acts on a line, so it is left out of that
/// union: shipping rules are considered in supplied order without regard to
/// their scope, and only the first whose threshold the subtotal reaches takes
/// credit.
#[tracing::instrument(
    name = "cart.aggregate",
    level = "debug",
    skip_all,
    fields(lines = lines.len(), rules = active_rules.len())
)]
pub fn aggregate_cart<'a>(
    lines: &[CartLine],
    active_rules: &[&'a PromotionRule],
) -> CartAggregate<'a> {
    let mut subtotal = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;
    let mut applied_rule_ids: Vec<&'a PromotionId> = Vec::new();
    let mut seen: FxHashSet<&'a PromotionId> = FxHashSet::default();

    let priced: Vec<LinePricing<'a>> = lines
        .iter()
        .map(|line| resolve_line_pricing(&line.product(), line.quantity, active_rules))
        .collect();

    for line in &priced {
        subtotal = subtotal.saturating_add(line.total_price);
        total_discount = total_discount.saturating_add(line.discount);

        if line.has_discount {
            for &rule in line.applied_rules() {
                if matches!(rule.kind, RuleKind::FreeShipping { .. }) {
                    continue;
                }

                if seen.insert(&rule.id) {
                    applied_rule_ids.push(&rule.id);
                }
            }
        }
    }

    let free_shipping_rule = active_rules.iter().copied().find(|rule| match rule.kind {
        RuleKind::FreeShipping { min_cart_amount } => min_cart_amount <= subtotal,
        _ => false,
    });

    if let Some(rule) = free_shipping_rule
        && seen.insert(&rule.id)
    {
        applied_rule_ids.push(&rule.id);
    }

    debug!(
        %subtotal,
        %total_discount,
        free_shipping = free_shipping_rule.is_some(),
        applied_rules = applied_rule_ids.len(),
        "aggregated cart"
    );

    CartAggregate {
        lines: priced,
        subtotal,
        total_discount,
        free_shipping_granted: free_shipping_rule.is_some(),
        free_shipping_rule,
        applied_rule_ids,
    }
}
