//! Rosette prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    badges::{Badge, BadgeTextColor, ResolvedBadge, contrast_text_color},
    cart::{CartAggregate, CartLine, aggregate_cart},
    fixtures::{Fixture, FixtureError},
    lines::{LinePricing, resolve_line_pricing},
    pricing::{ResolvedPricing, resolve_catalog_pricing, resolve_product_pricing},
    products::{Product, ProductId},
    promotions::{PromotionId, PromotionRule, RuleKind, RuleScope, filter::active_rules},
    receipt::{Receipt, ReceiptError},
};
