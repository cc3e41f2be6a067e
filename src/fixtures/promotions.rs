//! Promotion Fixtures
//!
//! Rules are read leniently: malformed flags, dates and amounts are logged and
//! treated as absent, and unknown kinds degrade to badge-only rules.

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;
use tracing::{trace, warn};

use crate::{
    badges::{Badge, BadgeTextColor},
    promotions::{PromotionRule, RuleKind, RuleScope},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Promotion rules, in collection order
    pub promotions: Vec<PromotionFixture>,
}

/// Promotion rule fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Rule id
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Rules are disabled unless explicitly enabled
    pub enabled: Option<FlagFixture>,

    /// First day the rule is active
    pub start_date: Option<String>,

    /// Last day the rule is active
    pub end_date: Option<String>,

    /// Products the rule targets
    #[serde(default, with = "serde_norway::with::singleton_map")]
    pub scope: ScopeFixture,

    /// Rule kind (e.g., `percentage_discount`)
    #[serde(default)]
    pub kind: String,

    /// Kind parameters
    #[serde(default)]
    pub params: ParamsFixture,

    /// Evaluation priority, higher first
    pub priority: Option<NumberFixture>,

    /// Badge text; no badge when absent or blank
    pub badge_text: Option<String>,

    /// Badge background colour
    pub badge_color: Option<String>,

    /// Badge text colour, or `auto`
    pub badge_text_color: Option<String>,
}

/// Rule scope from YAML
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScopeFixture {
    /// Every product
    #[default]
    All,

    /// Products in a category
    Category(String),

    /// A single product
    Product(String),
}

impl From<ScopeFixture> for RuleScope {
    fn from(scope: ScopeFixture) -> Self {
        match scope {
            ScopeFixture::All => RuleScope::All,
            ScopeFixture::Category(category) => RuleScope::Category(category),
            ScopeFixture::Product(product) => RuleScope::Product(product.into()),
        }
    }
}

/// Kind parameters from YAML; each kind reads only the ones it needs
#[derive(Debug, Default, Deserialize)]
pub struct ParamsFixture {
    /// Percentage points off
    pub percentage: Option<NumberFixture>,

    /// Fixed unit price
    pub new_price: Option<NumberFixture>,

    /// Group size of a quantity tier
    pub buy_quantity: Option<NumberFixture>,

    /// Units charged per group
    pub pay_quantity: Option<NumberFixture>,

    /// Free shipping threshold
    pub min_cart_amount: Option<NumberFixture>,
}

/// A number written either bare or as a string
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberFixture {
    /// Parsed by the YAML reader
    Number(Decimal),

    /// Anything else, parsed leniently
    Text(String),
}

/// A flag written as a boolean, a number or a word
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FlagFixture {
    /// Parsed by the YAML reader
    Bool(bool),

    /// Non-zero is set
    Number(Decimal),

    /// Anything else, parsed leniently
    Text(String),
}

impl PromotionFixture {
    /// Convert into a [`PromotionRule`].
    ///
    /// This never fails; problems with individual fields are logged.
    pub fn into_rule(self) -> PromotionRule {
        let kind = self.rule_kind();
        let start_date = parse_day(&self.id, "start_date", self.start_date.as_deref());
        let end_date = parse_day(&self.id, "end_date", self.end_date.as_deref());
        let badge = self.badge();
        let enabled = parse_flag(&self.id, "enabled", self.enabled.as_ref());
        let priority = parse_priority(&self.id, self.priority.as_ref());

        let mut rule = PromotionRule::new(self.id, self.scope.into(), kind)
            .with_name(self.name)
            .with_enabled(enabled)
            .with_priority(priority)
            .with_window(start_date, end_date);

        rule.badge = badge;

        trace!(
            rule = %rule.id,
            kind = rule.kind.name(),
            enabled = rule.enabled,
            priority = rule.priority,
            "read promotion rule"
        );

        rule
    }

    fn rule_kind(&self) -> RuleKind {
        let id = self.id.as_str();
        let params = &self.params;

        match self.kind.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "percentage_discount" => RuleKind::PercentageDiscount {
                percentage: parse_amount(id, "percentage", params.percentage.as_ref()),
            },
            "fixed_price" => RuleKind::FixedPrice {
                price: parse_amount(id, "new_price", params.new_price.as_ref()),
            },
            "buy_x_pay_y" => RuleKind::BuyXPayY {
                buy: parse_quantity(id, "buy_quantity", params.buy_quantity.as_ref()),
                pay: parse_quantity(id, "pay_quantity", params.pay_quantity.as_ref()),
            },
            "free_shipping" => RuleKind::FreeShipping {
                min_cart_amount: parse_amount(
                    id,
                    "min_cart_amount",
                    params.min_cart_amount.as_ref(),
                ),
            },
            "badge_only" => RuleKind::BadgeOnly,
            other => {
                warn!(rule = id, kind = other, "unknown rule kind, treating as badge only");

                RuleKind::BadgeOnly
            }
        }
    }

    fn badge(&self) -> Option<Badge> {
        let text = self
            .badge_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())?;

        let mut badge = Badge::new(text);

        if let Some(color) = non_blank(self.badge_color.as_deref()) {
            badge = badge.with_color(color);
        }

        badge.text_color =
            BadgeTextColor::from(non_blank(self.badge_text_color.as_deref()).map(str::to_string));

        Some(badge)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse a calendar day, accepting plain dates, local datetimes and RFC 3339 timestamps.
fn parse_day(rule: &str, field: &str, raw: Option<&str>) -> Option<Date> {
    let raw = non_blank(raw)?;

    if let Ok(date) = raw.parse::<Date>() {
        return Some(date);
    }

    if let Ok(datetime) = raw.parse::<DateTime>() {
        return Some(datetime.date());
    }

    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Some(timestamp.to_zoned(TimeZone::UTC).date());
    }

    warn!(rule, field, value = raw, "unparsable date, treating as unbounded");

    None
}

/// Parse a decimal amount; absent or unparsable values are zero.
fn parse_amount(rule: &str, field: &str, value: Option<&NumberFixture>) -> Decimal {
    match value {
        None => Decimal::ZERO,
        Some(NumberFixture::Number(number)) => *number,
        Some(NumberFixture::Text(text)) => text.trim().parse().unwrap_or_else(|_err| {
            warn!(rule, field, value = %text, "unparsable amount, treating as zero");

            Decimal::ZERO
        }),
    }
}

/// Parse a flag; absent or unrecognised values are unset.
fn parse_flag(rule: &str, field: &str, value: Option<&FlagFixture>) -> bool {
    match value {
        None => false,
        Some(FlagFixture::Bool(flag)) => *flag,
        Some(FlagFixture::Number(number)) => !number.is_zero(),
        Some(FlagFixture::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "y" => true,
            "false" | "no" | "off" | "n" | "" => false,
            _ => {
                warn!(rule, field, value = %text, "unparsable flag, treating as unset");

                false
            }
        },
    }
}

/// Parse a priority; fractions are truncated and out of range values are zero.
fn parse_priority(rule: &str, value: Option<&NumberFixture>) -> i32 {
    let amount = parse_amount(rule, "priority", value);

    amount.trunc().to_i32().unwrap_or_else(|| {
        warn!(rule, %amount, "priority out of range, treating as zero");

        0
    })
}

/// Parse a unit count; fractions are truncated and negatives are zero.
fn parse_quantity(rule: &str, field: &str, value: Option<&NumberFixture>) -> u32 {
    let amount = parse_amount(rule, field, value);

    amount.trunc().to_u32().unwrap_or_else(|| {
        warn!(rule, field, %amount, "quantity out of range, treating as zero");

        0
    })
}
