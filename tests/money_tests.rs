// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketledger::errors::ValidationError;
use pocketledger::money::{
    AmountInput, DisplayCurrency, StepKey, format_currency, parse_amount, round_to_step,
};
use rust_decimal::Decimal;

#[test]
fn round_to_step_is_idempotent_and_on_grid() {
    for tenths in 0..20_000i64 {
        let x = Decimal::new(tenths, 1);
        let r = round_to_step(x).unwrap();
        assert!((r % Decimal::TEN).is_zero(), "{} -> {}", x, r);
        assert_eq!(round_to_step(r), Some(r), "not idempotent at {}", x);
    }
}

#[test]
fn round_to_step_halves_go_up() {
    assert_eq!(round_to_step(Decimal::from(123)), Some(Decimal::from(120)));
    assert_eq!(round_to_step(Decimal::from(125)), Some(Decimal::from(130)));
    assert_eq!(round_to_step(Decimal::new(1249, 1)), Some(Decimal::from(120)));
    assert_eq!(round_to_step(Decimal::from(5)), Some(Decimal::from(10)));
    assert_eq!(round_to_step(Decimal::from(4)), Some(Decimal::ZERO));
}

const LARGEST: &str = "79228162514264337593543950335";
const LARGEST_ON_GRID: &str = "79228162514264337593543950330";

#[test]
fn round_to_step_reports_overflow() {
    assert_eq!(round_to_step(Decimal::MAX), None);
    let on_grid: Decimal = LARGEST_ON_GRID.parse().unwrap();
    assert_eq!(round_to_step(on_grid), Some(on_grid));
}

#[test]
fn amount_input_survives_values_at_the_decimal_limit() {
    let mut input = AmountInput::new(LARGEST);
    input.blur();
    assert_eq!(input.text(), LARGEST);
    assert_eq!(
        input.submit_value(),
        Err(ValidationError::InvalidAmount(LARGEST.into()))
    );
    input.step(StepKey::Up);
    assert_eq!(input.text(), LARGEST);

    input.set_text(LARGEST_ON_GRID);
    input.step(StepKey::Up);
    assert_eq!(input.text(), LARGEST_ON_GRID);
    input.step(StepKey::Down);
    assert_eq!(input.text(), "79228162514264337593543950320");
}

#[test]
fn amount_input_blur_and_arrow_keys() {
    let mut input = AmountInput::new("123");
    input.blur();
    assert_eq!(input.text(), "120");

    input.step(StepKey::Up);
    assert_eq!(input.text(), "130");

    input.set_text("0");
    input.step(StepKey::Down);
    assert_eq!(input.text(), "0");

    input.set_text("1,234");
    input.blur();
    assert_eq!(input.text(), "1230");

    input.set_text("abc");
    input.step(StepKey::Up);
    assert_eq!(input.text(), "10");
}

#[test]
fn amount_input_blur_leaves_unparseable_text() {
    let mut input = AmountInput::new("");
    input.blur();
    assert_eq!(input.text(), "");

    input.set_text("12a");
    input.blur();
    assert_eq!(input.text(), "12a");
}

#[test]
fn amount_input_submit_rounds_and_rejects() {
    assert_eq!(
        AmountInput::new("4567").submit_value().unwrap(),
        Decimal::from(4570)
    );
    assert_eq!(
        AmountInput::new("abc").submit_value(),
        Err(ValidationError::InvalidAmount("abc".into()))
    );
    assert_eq!(
        AmountInput::new("4").submit_value(),
        Err(ValidationError::NonPositiveAmount)
    );
    assert_eq!(
        AmountInput::new("-50").submit_value(),
        Err(ValidationError::NonPositiveAmount)
    );
}

#[test]
fn parse_amount_accepts_separators() {
    assert_eq!(parse_amount(" 12,000 ").unwrap(), Decimal::from(12000));
    assert!(parse_amount("twelve").is_err());
}

#[test]
fn format_currency_usd_and_krw() {
    let amt = Decimal::from(130_000);
    assert_eq!(format_currency(amt, DisplayCurrency::Usd, Some(1300.0)), "$100.00");
    assert_eq!(format_currency(amt, DisplayCurrency::Krw, Some(1300.0)), "₩130,000");
    assert_eq!(format_currency(Decimal::from(1000), DisplayCurrency::Usd, Some(1300.0)), "$0.77");
    assert_eq!(
        format_currency(Decimal::from(2_600_000), DisplayCurrency::Usd, Some(1300.0)),
        "$2,000.00"
    );
    assert_eq!(format_currency(Decimal::from(-5000), DisplayCurrency::Krw, None), "-₩5,000");
    assert_eq!(format_currency(Decimal::ZERO, DisplayCurrency::Krw, None), "₩0");
}

#[test]
fn format_currency_falls_back_without_usable_rate() {
    let amt = Decimal::from(130_000);
    assert_eq!(format_currency(amt, DisplayCurrency::Usd, None), "$100.00");
    assert_eq!(format_currency(amt, DisplayCurrency::Usd, Some(0.0)), "$100.00");
    assert_eq!(format_currency(amt, DisplayCurrency::Usd, Some(f64::NAN)), "$100.00");
}

#[test]
fn format_currency_ignores_vanishing_rates() {
    assert_eq!(
        format_currency(Decimal::from(1000), DisplayCurrency::Usd, Some(1e-30)),
        "$0.77"
    );
    assert_eq!(format_currency(Decimal::from(130_000), DisplayCurrency::Usd, Some(1e-27)), "$100.00");
}

#[test]
fn display_currency_parses_codes() {
    assert_eq!("usd".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::Usd);
    assert_eq!("KRW".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::Krw);
    assert!("EUR".parse::<DisplayCurrency>().is_err());
    assert_eq!(DisplayCurrency::BASE, DisplayCurrency::Krw);
}
