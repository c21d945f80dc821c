// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Step rounding for amount entry and display formatting in KRW or USD.
//!
//! Amounts are persisted in KRW (the base currency) and always land on a
//! multiple of [`STEP`]. USD is a display-only currency derived from the
//! current USD→KRW rate.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::fx::FALLBACK_RATE;

/// Smallest allowed increment of a base-currency amount.
pub const STEP: Decimal = Decimal::TEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayCurrency {
    #[default]
    #[serde(rename = "KRW")]
    Krw,
    #[serde(rename = "USD")]
    Usd,
}

impl DisplayCurrency {
    pub const BASE: DisplayCurrency = DisplayCurrency::Krw;

    pub fn code(self) -> &'static str {
        match self {
            DisplayCurrency::Krw => "KRW",
            DisplayCurrency::Usd => "USD",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            DisplayCurrency::Krw => "₩",
            DisplayCurrency::Usd => "$",
        }
    }
}

impl fmt::Display for DisplayCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DisplayCurrency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KRW" => Ok(DisplayCurrency::Krw),
            "USD" => Ok(DisplayCurrency::Usd),
            _ => Err(ValidationError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Round to the nearest multiple of [`STEP`], halves away from zero.
/// `None` when the rounded value does not fit in a `Decimal`.
pub fn round_to_step(value: Decimal) -> Option<Decimal> {
    let steps = (value / STEP).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    steps.checked_mul(STEP).map(|v| v.normalize())
}

/// Parse user-typed amount text. Thousands separators and surrounding
/// whitespace are tolerated.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKey {
    Up,
    Down,
}

/// The amount field of the entry form.
///
/// Free typing is left alone until [`AmountInput::blur`]; arrow keys move the
/// value by one step and never go below zero; [`AmountInput::submit_value`]
/// rounds again regardless of what is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountInput {
    text: String,
}

impl AmountInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Snap the typed value to the step grid. Empty or unparseable text is kept
    /// as typed so the submit path can report it.
    pub fn blur(&mut self) {
        if let Some(v) = parse_amount(&self.text).ok().and_then(round_to_step) {
            self.text = v.to_string();
        }
    }

    pub fn step(&mut self, key: StepKey) {
        let current = match parse_amount(&self.text) {
            Ok(v) => match round_to_step(v) {
                Some(r) => r,
                None => return,
            },
            Err(_) => Decimal::ZERO,
        };
        let next = match key {
            StepKey::Up => current.checked_add(STEP).unwrap_or(current),
            StepKey::Down => current
                .checked_sub(STEP)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO),
        };
        self.text = next.normalize().to_string();
    }

    pub fn submit_value(&self) -> Result<Decimal, ValidationError> {
        let value = round_to_step(parse_amount(&self.text)?)
            .ok_or_else(|| ValidationError::InvalidAmount(self.text.clone()))?;
        if value <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(value)
    }
}

/// Group the integer digits of a non-negative decimal string with commas.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

fn usable_rate(rate: Option<f64>) -> Decimal {
    rate.filter(|r| r.is_finite() && *r > 0.0)
        .and_then(|r| Decimal::try_from(r).ok())
        .filter(|d| !d.is_zero())
        .or_else(|| Decimal::try_from(FALLBACK_RATE).ok())
        .unwrap_or(Decimal::ONE)
}

/// Render a base-currency amount in the chosen display currency.
///
/// KRW: whole units with separators (`₩130,000`). USD: divided by `rate`
/// (fallback rate when absent) with exactly two fractional digits (`$100.00`).
pub fn format_currency(base_amount: Decimal, currency: DisplayCurrency, rate: Option<f64>) -> String {
    let (value, dp) = match currency {
        DisplayCurrency::Krw => (base_amount, 0),
        // A rate small enough to overflow the quotient is treated as unusable.
        DisplayCurrency::Usd => (
            base_amount
                .checked_div(usable_rate(rate))
                .or_else(|| base_amount.checked_div(usable_rate(None)))
                .unwrap_or(Decimal::ZERO),
            2,
        ),
    };
    let rounded = value
        .abs()
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", dp as usize, rounded);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let sign = if value < Decimal::ZERO && !rounded.is_zero() { "-" } else { "" };
    let grouped = group_thousands(int_part);
    match frac_part {
        Some(f) => format!("{sign}{}{grouped}.{f}", currency.glyph()),
        None => format!("{sign}{}{grouped}", currency.glyph()),
    }
}
