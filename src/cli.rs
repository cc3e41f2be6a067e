//! Command line runner
//!
//! Loads a fixture set, prices it for the configured day and writes the result.

use std::{io, time::Instant};

use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::civil::Date;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::aggregate_cart,
    config::{CliConfig, Command},
    fixtures::{Fixture, FixtureError},
    pricing::resolve_catalog_pricing,
    receipt::{Receipt, ReceiptError, write_catalog},
};

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Fixture loading failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Rendering failed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Run the configured command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if the fixture set cannot be loaded or the output cannot be written.
pub fn run(config: &CliConfig, out: impl io::Write) -> Result<(), CliError> {
    let day = config.day();

    match config.command {
        Command::Catalog => catalog(config, day, out),
        Command::Cart => cart(config, day, out),
    }
}

#[tracing::instrument(name = "cli.catalog", skip_all, fields(set = %config.set, day = %day))]
fn catalog(config: &CliConfig, day: Date, mut out: impl io::Write) -> Result<(), CliError> {
    let mut fixture = Fixture::with_base_path(&config.fixtures);

    fixture
        .load_products(&config.set)?
        .load_promotions(&config.set)?;

    let currency = fixture.currency()?;

    let start = Instant::now();
    let active = fixture.active_promotions(day);
    let priced = resolve_catalog_pricing(fixture.products(), &active);
    let elapsed = start.elapsed();

    info!(
        products = priced.len(),
        active_rules = active.len(),
        "priced catalog"
    );

    write_catalog(&mut out, &priced, currency)?;

    writeln!(
        out,
        " {day}: {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}

#[tracing::instrument(name = "cli.cart", skip_all, fields(set = %config.set, day = %day))]
fn cart(config: &CliConfig, day: Date, mut out: impl io::Write) -> Result<(), CliError> {
    let fixture = Fixture::from_set_in(&config.fixtures, &config.set)?;
    let currency = fixture.currency()?;

    let start = Instant::now();
    let active = fixture.active_promotions(day);
    let aggregate = aggregate_cart(fixture.cart_lines(), &active);
    let elapsed = start.elapsed();

    info!(
        lines = aggregate.len(),
        active_rules = active.len(),
        subtotal = %aggregate.subtotal,
        free_shipping = aggregate.free_shipping_granted,
        "priced cart"
    );

    Receipt::new(&aggregate, fixture.cart_lines(), fixture.products(), currency)
        .write_to(&mut out)?;

    writeln!(
        out,
        " {day}: {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
