//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for a cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines, in cart order
    pub lines: Vec<CartLineFixture>,
}

/// Cart line fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product id
    pub product: String,

    /// Number of units
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}
