// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use chrono::{Duration, TimeZone, Utc};
use pocketledger::errors::RateFetchError;
use pocketledger::fx::{FALLBACK_RATE, RateCache, RateSource, parse_latest_rates};

/// Hands out queued results and counts calls.
struct ScriptedSource {
    results: RefCell<VecDeque<Result<f64, RateFetchError>>>,
    calls: Cell<usize>,
}

impl ScriptedSource {
    fn new(results: Vec<Result<f64, RateFetchError>>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            calls: Cell::new(0),
        }
    }
}

impl RateSource for ScriptedSource {
    fn fetch_usd_krw(&self) -> Result<f64, RateFetchError> {
        self.calls.set(self.calls.get() + 1);
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(RateFetchError::MissingQuote("KRW".into())))
    }
}

#[test]
fn empty_cache_uses_fallback() {
    let cache = RateCache::new();
    assert_eq!(cache.current(), FALLBACK_RATE);
    assert_eq!(cache.cached(), None);
    assert!(cache.is_stale(Utc::now()));
}

#[test]
fn failed_fetch_keeps_last_good_rate() {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let source = ScriptedSource::new(vec![
        Ok(1350.5),
        Err(RateFetchError::InvalidRate(-1.0)),
    ]);
    let mut cache = RateCache::new();

    assert_eq!(cache.refresh(&source, t0), 1350.5);
    assert_eq!(cache.fetched_at(), Some(t0));

    let t1 = t0 + Duration::hours(2);
    assert_eq!(cache.refresh(&source, t1), 1350.5);
    assert_eq!(cache.fetched_at(), Some(t0));
}

#[test]
fn failed_first_fetch_falls_back() {
    let source = ScriptedSource::new(vec![Err(RateFetchError::MissingQuote("KRW".into()))]);
    let mut cache = RateCache::new();
    assert_eq!(cache.refresh(&source, Utc::now()), FALLBACK_RATE);
    assert_eq!(cache.cached(), None);
}

#[test]
fn refreshes_only_when_an_hour_has_passed() {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let source = ScriptedSource::new(vec![Ok(1300.0), Ok(1310.0)]);
    let mut cache = RateCache::new();

    assert_eq!(cache.refresh_if_stale(&source, t0), 1300.0);
    assert_eq!(cache.refresh_if_stale(&source, t0 + Duration::minutes(59)), 1300.0);
    assert_eq!(source.calls.get(), 1);

    assert!(cache.is_stale(t0 + Duration::hours(1)));
    assert_eq!(cache.refresh_if_stale(&source, t0 + Duration::hours(1)), 1310.0);
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn latest_rates_body_yields_krw_quote() {
    let body = r#"{"base": "USD", "rates": {"EUR": 0.92, "KRW": 1342.5}}"#;
    assert_eq!(parse_latest_rates(body).unwrap(), 1342.5);
}

#[test]
fn latest_rates_body_rejects_missing_or_bad_quotes() {
    assert!(matches!(
        parse_latest_rates(r#"{"rates": {"EUR": 0.92}}"#),
        Err(RateFetchError::MissingQuote(q)) if q == "KRW"
    ));
    assert!(matches!(
        parse_latest_rates(r#"{"rates": {"KRW": 0}}"#),
        Err(RateFetchError::InvalidRate(_))
    ));
    assert!(matches!(
        parse_latest_rates(r#"{"rates": {"KRW": -5.5}}"#),
        Err(RateFetchError::InvalidRate(_))
    ));
    assert!(matches!(
        parse_latest_rates("<html>rate limited</html>"),
        Err(RateFetchError::Decode(_))
    ));
}
