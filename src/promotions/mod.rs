//! Promotions
//!
//! Time-scoped pricing and display rules, together with the filter that picks
//! the rules active on a given day and the matcher that targets them at
//! products.

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::{badges::Badge, products::Product};

pub mod filter;
pub mod scope;

pub use scope::RuleScope;

/// Promotion identifier, as issued by the promotions store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromotionId(String);

impl PromotionId {
    /// Create a promotion id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromotionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PromotionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What a promotion does once it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Take a percentage off the running unit price (e.g., `20` for "20% off")
    PercentageDiscount {
        /// Percentage points to take off
        percentage: Decimal,
    },

    /// Lower the unit price to a fixed amount; never raises it
    FixedPrice {
        /// New unit price; ignored unless positive
        price: Decimal,
    },

    /// Buy `buy` units, pay for `pay` of them
    BuyXPayY {
        /// Group size
        buy: u32,

        /// Units charged per group
        pay: u32,
    },

    /// Waive shipping once the cart subtotal reaches a threshold
    FreeShipping {
        /// Minimum cart subtotal
        min_cart_amount: Decimal,
    },

    /// Display a badge without touching the price
    BadgeOnly,
}

impl RuleKind {
    /// Short, stable name of the kind, spelled as in fixture files.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::PercentageDiscount { .. } => "percentage_discount",
            RuleKind::FixedPrice { .. } => "fixed_price",
            RuleKind::BuyXPayY { .. } => "buy_x_pay_y",
            RuleKind::FreeShipping { .. } => "free_shipping",
            RuleKind::BadgeOnly => "badge_only",
        }
    }

    /// Apply this kind's unit price effect to a running price.
    ///
    /// Only percentage and fixed price rules change a unit price; quantity
    /// tiers and shipping waivers are resolved against a whole line or cart.
    pub fn apply_to_unit_price(&self, current: Decimal) -> Decimal {
        match *self {
            RuleKind::PercentageDiscount { percentage } => current
                .saturating_mul(Decimal::ONE.saturating_sub(percentage / Decimal::ONE_HUNDRED)),
            RuleKind::FixedPrice { price } if price > Decimal::ZERO => current.min(price),
            RuleKind::FixedPrice { .. }
            | RuleKind::BuyXPayY { .. }
            | RuleKind::FreeShipping { .. }
            | RuleKind::BadgeOnly => current,
        }
    }
}

/// A time-scoped pricing or display directive.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionRule {
    /// Promotion id
    pub id: PromotionId,

    /// Promotion display name
    pub name: String,

    /// Disabled rules are never considered
    pub enabled: bool,

    /// First day the rule is active, inclusive
    pub start_date: Option<Date>,

    /// Last day the rule is active, inclusive
    pub end_date: Option<Date>,

    /// Which products the rule targets
    pub scope: RuleScope,

    /// Price or display effect
    pub kind: RuleKind,

    /// Higher priorities are evaluated first
    pub priority: i32,

    /// Optional badge, independent of `kind`
    pub badge: Option<Badge>,
}

impl PromotionRule {
    /// Create an enabled, unbounded rule with default priority and no badge.
    pub fn new(id: impl Into<PromotionId>, scope: RuleScope, kind: RuleKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            enabled: true,
            start_date: None,
            end_date: None,
            scope,
            kind,
            priority: 0,
            badge: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict the rule to an inclusive date window.
    #[must_use]
    pub fn with_window(mut self, start_date: Option<Date>, end_date: Option<Date>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Attach a badge.
    #[must_use]
    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Set the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the rule is active on the given day.
    ///
    /// A rule is active when it is enabled and the day falls inside its
    /// window; a missing bound leaves that side of the window open.
    pub fn is_active_on(&self, day: Date) -> bool {
        self.enabled
            && self.start_date.is_none_or(|start| start <= day)
            && self.end_date.is_none_or(|end| end >= day)
    }

    /// Whether the rule targets the given product.
    pub fn applies_to(&self, product: &Product) -> bool {
        self.scope.matches(product)
    }
}
