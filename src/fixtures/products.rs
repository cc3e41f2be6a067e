//! Product Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    #[serde(default)]
    pub name: String,

    /// Product category key
    pub category: String,

    /// Product price (e.g., "4.50 GBP")
    pub price: String,
}

impl ProductFixture {
    /// Convert into a [`Product`] with the given id, returning the price currency alongside.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn try_into_product(
        self,
        id: String,
    ) -> Result<(Product, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        if price.is_sign_negative() {
            return Err(FixtureError::InvalidPrice(self.price));
        }

        let product = Product::new(id, self.category, price).with_name(self.name);

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "4.50 GBP") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, parse_currency(currency_code)?))
}

/// Look up a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything other than GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
