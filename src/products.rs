//! Products

use std::fmt;

use rust_decimal::Decimal;

/// Product identifier, as issued by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Product, as seen by the pricing engine
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product display name
    pub name: String,

    /// Category key used by category-scoped promotions
    pub category: String,

    /// Undiscounted unit price
    pub base_price: Decimal,
}

impl Product {
    /// Create a product with an empty display name.
    pub fn new(id: impl Into<ProductId>, category: impl Into<String>, base_price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category: category.into(),
            base_price,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
