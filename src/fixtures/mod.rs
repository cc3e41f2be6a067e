//! Fixtures
//!
//! Loads catalogs, promotion rules and carts from YAML files laid out as
//! `<base>/products/<set>.yml`, `<base>/promotions/<set>.yml` and
//! `<base>/carts/<set>.yml`.

use std::{fs, path::PathBuf};

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartLine,
    fixtures::{carts::CartFixture, products::ProductsFixture, promotions::PromotionsFixture},
    products::{Product, ProductId},
    promotions::{PromotionRule, filter::active_rules},
};

pub mod carts;
pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog, sorted by product id
    products: Vec<Product>,

    /// Product id -> index into `products`
    product_index: FxHashMap<ProductId, usize>,

    /// Promotion rules, in collection order
    promotions: Vec<PromotionRule>,

    /// Cart lines, in cart order
    cart: Vec<CartLine>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            product_index: FxHashMap::default(),
            promotions: Vec::new(),
            cart: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// Products already loaded under the same id are replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let mut entries: Vec<_> = fixture.products.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (id, product_fixture) in entries {
            let (product, currency) = product_fixture.try_into_product(id)?;

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.insert_product(product);
        }

        debug!(set = name, products = self.products.len(), "loaded products");

        Ok(self)
    }

    /// Load promotion rules from a YAML fixture file, appending to any already loaded
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        self.promotions.extend(
            fixture
                .promotions
                .into_iter()
                .map(promotions::PromotionFixture::into_rule),
        );

        debug!(set = name, promotions = self.promotions.len(), "loaded promotions");

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a line references
    /// a product that has not been loaded.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for line in fixture.lines {
            let cart_line = CartLine::for_product(self.product(&line.product)?, line.quantity);

            self.cart.push(cart_line);
        }

        debug!(set = name, lines = self.cart.len(), "loaded cart");

        Ok(self)
    }

    /// Load a complete fixture set (products, promotions and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_promotions(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&Product, FixtureError> {
        self.product_index
            .get(&ProductId::new(id))
            .and_then(|&index| self.products.get(index))
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Get all products, sorted by id
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Get all promotion rules, in collection order
    pub fn promotions(&self) -> &[PromotionRule] {
        &self.promotions
    }

    /// Get the rules active on `day`, in collection order
    pub fn active_promotions(&self, day: Date) -> Vec<&PromotionRule> {
        active_rules(&self.promotions, day)
    }

    /// Get the cart lines
    pub fn cart_lines(&self) -> &[CartLine] {
        &self.cart
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn insert_product(&mut self, product: Product) {
        if let Some(&index) = self.product_index.get(&product.id)
            && let Some(slot) = self.products.get_mut(index)
        {
            *slot = product;
            return;
        }

        self.product_index
            .insert(product.id.clone(), self.products.len());
        self.products.push(product);
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    const PRODUCTS: &str = r"
products:
  rye:
    name: Rye Loaf
    category: bread
    price: 4.00 GBP
  eclair:
    name: Chocolate Eclair
    category: pastry
    price: 2.50 GBP
";

    const PROMOTIONS: &str = r"
promotions:
  - id: summer
    enabled: true
    start_date: 2026-06-01
    end_date: 2026-08-31
    kind: percentage_discount
    params: {percentage: 10}
  - id: always
    enabled: true
    kind: badge_only
    badge_text: NEW
  - id: off
    kind: badge_only
";

    #[test]
    fn fixture_loads_products_promotions_and_cart() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "products", "shop", PRODUCTS)?;
        write_fixture(dir.path(), "promotions", "shop", PROMOTIONS)?;
        write_fixture(
            dir.path(),
            "carts",
            "shop",
            "lines:\n  - {product: eclair, quantity: 3}\n  - {product: rye}\n",
        )?;

        let fixture = Fixture::from_set_in(dir.path(), "shop")?;

        let ids: Vec<&str> = fixture.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["eclair", "rye"]);

        let rye = fixture.product("rye")?;
        assert_eq!(rye.name, "Rye Loaf");
        assert_eq!(rye.base_price, Decimal::new(400, 2));

        assert_eq!(fixture.promotions().len(), 3);
        assert_eq!(fixture.currency()?, GBP);

        let quantities: Vec<u32> = fixture.cart_lines().iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, [3, 1]);

        Ok(())
    }

    #[test]
    fn active_promotions_respect_windows_and_enabled_flag() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "promotions", "shop", PROMOTIONS)?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_promotions("shop")?;

        let in_summer: Vec<&str> = fixture
            .active_promotions(date(2026, 7, 1))
            .iter()
            .map(|rule| rule.id.as_str())
            .collect();
        assert_eq!(in_summer, ["summer", "always"]);

        let in_winter: Vec<&str> = fixture
            .active_promotions(date(2026, 12, 1))
            .iter()
            .map(|rule| rule.id.as_str())
            .collect();
        assert_eq!(in_winter, ["always"]);

        Ok(())
    }

    #[test]
    fn reloading_products_replaces_by_id() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "products", "shop", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "products",
            "repriced",
            "products:\n  rye:\n    category: bread\n    price: 4.20 GBP\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("shop")?.load_products("repriced")?;

        assert_eq!(fixture.products().len(), 2);
        assert_eq!(fixture.product("rye")?.base_price, Decimal::new(420, 2));

        Ok(())
    }

    #[test]
    fn currency_mismatch_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "mixed",
            "products:\n  a:\n    category: x\n    price: 1.00 GBP\n  b:\n    category: x\n    price: 1.00 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_products("mixed");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn cart_referencing_unknown_product_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "products", "shop", PRODUCTS)?;
        write_fixture(dir.path(), "carts", "shop", "lines:\n  - {product: scone}\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("shop")?;

        let result = fixture.load_cart("shop");

        assert!(matches!(result, Err(FixtureError::ProductNotFound(id)) if id == "scone"));

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_products("nothing"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn fixture_no_currency_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn bakery_set_loads() -> TestResult {
        let fixture = Fixture::from_set("bakery")?;

        assert!(!fixture.products().is_empty());
        assert!(!fixture.promotions().is_empty());
        assert!(!fixture.cart_lines().is_empty());
        assert_eq!(fixture.currency()?, GBP);

        Ok(())
    }
}
