//! Receipt
//!
//! Renders priced catalogs and carts as terminal tables.

use std::{fmt::Write, io, ops::Range};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    badges::{ResolvedBadge, hex_rgb},
    cart::{CartAggregate, CartLine},
    lines::LinePricing,
    pricing::ResolvedPricing,
    products::{Product, ProductId},
    promotions::PromotionRule,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Amount too large to express in minor units.
    #[error("Amount out of range: {0}")]
    Overflow(Decimal),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Convert an amount in major units into money, rounding half away from zero
/// to whole minor units.
///
/// # Errors
///
/// Returns [`ReceiptError::Overflow`] if the amount does not fit in minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, ReceiptError> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or(ReceiptError::Overflow(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Write a catalog listing with promotional prices and badges.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output cannot be written.
pub fn write_catalog(
    mut out: impl io::Write,
    priced: &[(&Product, ResolvedPricing<'_>)],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record([
        "", "Product", "Category", "Price", "Promo Price", "Savings", "Badges",
    ]);

    let mut promoted_rows = Vec::new();

    for (index, (product, pricing)) in priced.iter().enumerate() {
        let savings = pricing.unit_savings();
        let (promo_price, savings_cell) = if savings > Decimal::ZERO {
            promoted_rows.push(index + 1);

            (
                to_money(pricing.discounted_price, currency)?.to_string(),
                savings_display(savings, pricing.original_price, currency)?,
            )
        } else {
            (String::new(), String::new())
        };

        builder.push_record([
            format!("#{:<3}", index + 1),
            display_name(&product.name, &product.id).to_string(),
            product.category.clone(),
            to_money(pricing.original_price, currency)?.to_string(),
            promo_price,
            savings_cell,
            pricing
                .all_badges
                .iter()
                .map(paint_badge)
                .collect::<Vec<_>>()
                .join(" "),
        ]);
    }

    write_table(&mut out, builder, 3..6, &promoted_rows)?;

    let promoted = priced
        .iter()
        .filter(|(_, pricing)| pricing.has_promotion)
        .count();

    writeln!(out, " {} products, {promoted} promoted\n", priced.len())
        .map_err(|_err| ReceiptError::IO)
}

/// Priced cart ready to be written out.
#[derive(Debug)]
pub struct Receipt<'a, 'r> {
    cart: &'a CartAggregate<'r>,
    lines: &'a [CartLine],
    names: FxHashMap<&'a ProductId, &'a str>,
    currency: &'static Currency,
}

impl<'a, 'r> Receipt<'a, 'r> {
    /// Create a receipt for `cart`, priced from `lines`, naming items from `products`.
    pub fn new(
        cart: &'a CartAggregate<'r>,
        lines: &'a [CartLine],
        products: &'a [Product],
        currency: &'static Currency,
    ) -> Self {
        let names = products
            .iter()
            .map(|product| (&product.id, product.name.as_str()))
            .collect();

        Self {
            cart,
            lines,
            names,
            currency,
        }
    }

    /// Total cost before any promotions
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is out of range.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, ReceiptError> {
        to_money(self.cart.original_subtotal(), self.currency)
    }

    /// Total amount to pay
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is out of range.
    pub fn total(&self) -> Result<Money<'static, Currency>, ReceiptError> {
        to_money(self.cart.subtotal, self.currency)
    }

    /// Amount saved by promotions
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is out of range.
    pub fn savings(&self) -> Result<Money<'static, Currency>, ReceiptError> {
        to_money(self.cart.total_discount, self.currency)
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be formatted or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "Qty",
            "Base Price",
            "Unit Price",
            "Line Total",
            "Savings",
            "Promotions",
        ]);

        let mut discounted_rows = Vec::new();

        for (index, (line, priced)) in self.lines.iter().zip(&self.cart.lines).enumerate() {
            if priced.has_discount {
                discounted_rows.push(index + 1);
            }

            builder.push_record(self.line_cells(index, line, priced)?);
        }

        write_table(&mut out, builder, 3..7, &discounted_rows)?;

        self.write_summary(&mut out)
    }

    fn line_cells(
        &self,
        index: usize,
        line: &CartLine,
        priced: &LinePricing<'_>,
    ) -> Result<[String; 8], ReceiptError> {
        let name = self
            .names
            .get(&line.product_id)
            .map_or(line.product_id.as_str(), |name| {
                display_name(name, &line.product_id)
            });

        let (unit_price, savings) = if priced.has_discount {
            let undiscounted = priced.total_price + priced.discount;

            (
                to_money(priced.unit_price, self.currency)?.to_string(),
                savings_display(priced.discount, undiscounted, self.currency)?,
            )
        } else {
            (String::new(), String::new())
        };

        let promotions = match priced.tier {
            Some(rule) => format!("{} (tier)", rule_label(rule)),
            None if priced.has_discount => priced
                .applied_rules()
                .iter()
                .map(|&rule| rule_label(rule))
                .collect::<Vec<_>>()
                .join("\n"),
            None => String::new(),
        };

        Ok([
            format!("#{:<3}", index + 1),
            name.to_string(),
            line.quantity.to_string(),
            to_money(priced.pricing.original_price, self.currency)?.to_string(),
            unit_price,
            to_money(priced.total_price, self.currency)?.to_string(),
            savings,
            promotions,
        ])
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let savings = savings_display(
            self.cart.total_discount,
            self.cart.original_subtotal(),
            self.currency,
        )?;

        let shipping = match self.cart.free_shipping_rule {
            Some(rule) => format!("Free ({})", rule_label(rule)),
            None => "Standard".to_string(),
        };

        let rows = [
            (" Subtotal:".to_string(), format!("{}  ", self.subtotal()?)),
            (
                " \x1b[1mTotal:\x1b[0m".to_string(),
                format!("\x1b[1m{}\x1b[0m  ", self.total()?),
            ),
            (
                " Savings:".to_string(),
                if savings.is_empty() {
                    format!("{}  ", self.savings()?)
                } else {
                    format!("{savings}  ")
                },
            ),
            (" Shipping:".to_string(), format!("{shipping}  ")),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or_default();

        let value_width = rows
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or_default();

        for (label, value) in &rows {
            write_summary_line(out, label, value, label_width, value_width)?;
        }

        if !self.cart.applied_rule_ids.is_empty() {
            let ids: Vec<&str> = self
                .cart
                .applied_rule_ids
                .iter()
                .map(|id| id.as_str())
                .collect();

            writeln!(out, "\n Applied: {}", ids.join(", ")).map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn display_name<'a>(name: &'a str, id: &'a ProductId) -> &'a str {
    if name.is_empty() { id.as_str() } else { name }
}

fn rule_label(rule: &PromotionRule) -> &str {
    if rule.name.is_empty() {
        rule.id.as_str()
    } else {
        &rule.name
    }
}

/// `-£x.xx (yy.yy%)`, or an empty string when nothing was saved.
fn savings_display(
    savings: Decimal,
    original: Decimal,
    currency: &'static Currency,
) -> Result<String, ReceiptError> {
    if savings <= Decimal::ZERO {
        return Ok(String::new());
    }

    Ok(format!(
        "-{} ({:.2}%)",
        to_money(savings, currency)?,
        percent_points(savings, original)
    ))
}

fn percent_points(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_default()
        .round_dp(2)
}

/// Badge text on its own background, using 24-bit ANSI colours.
fn paint_badge(badge: &ResolvedBadge<'_>) -> String {
    match (hex_rgb(badge.color), hex_rgb(badge.text_color)) {
        (Some([red, green, blue]), Some([text_red, text_green, text_blue])) => format!(
            "\x1b[48;2;{red};{green};{blue}m\x1b[38;2;{text_red};{text_green};{text_blue}m {} \x1b[0m",
            badge.text
        ),
        _ => format!("[{}]", badge.text),
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    amount_columns: Range<usize>,
    highlighted_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(amount_columns), Alignment::right());

    for &row in highlighted_rows {
        table.modify((row, 4), Color::FG_GREEN);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char != in_run {
            _ = out.write_str(if box_char { "\x1b[90m" } else { "\x1b[0m" });
            in_run = box_char;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Width of a string once ANSI escape sequences are removed.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            in_escape = !ch.is_ascii_alphabetic();
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {:>value_pad$}{value}",
        "", ""
    )
    .map_err(|_err| ReceiptError::IO)
}
