//! Active Rule Filter

use jiff::civil::Date;

use crate::promotions::PromotionRule;

/// Select the rules active on `day`, keeping their relative order.
///
/// The result can be fed back in; filtering twice on the same day yields the
/// same rules.
pub fn active_rules<'a, I>(rules: I, day: Date) -> Vec<&'a PromotionRule>
where
    I: IntoIterator<Item = &'a PromotionRule>,
{
    rules
        .into_iter()
        .filter(|rule| rule.is_active_on(day))
        .collect()
}
