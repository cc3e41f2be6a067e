//! Rosette
//!
//! Rosette resolves effective prices, badges, quantity tiers and free shipping for catalog
//! products and shopping carts from a set of promotion rules.

pub mod badges;
pub mod cart;
pub mod cli;
pub mod config;
pub mod fixtures;
pub mod lines;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
