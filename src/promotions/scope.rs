//! Rule Scope

use crate::products::{Product, ProductId};

/// Targeting predicate of a promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleScope {
    /// Every product
    #[default]
    All,

    /// Products in the given category
    Category(String),

    /// A single product
    Product(ProductId),
}

impl RuleScope {
    /// Whether this scope targets the product.
    ///
    /// Comparisons are exact; there is no prefix or case-insensitive matching.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            RuleScope::All => true,
            RuleScope::Category(category) => product.category == *category,
            RuleScope::Product(id) => product.id == *id,
        }
    }
}
