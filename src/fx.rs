// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::RateFetchError;

/// USD→KRW rate used whenever no fetched value is available.
pub const FALLBACK_RATE: f64 = 1300.0;

pub const DEFAULT_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

pub fn refresh_interval() -> Duration {
    Duration::hours(1)
}

/// Source of the USD→KRW exchange rate.
pub trait RateSource {
    fn fetch_usd_krw(&self) -> Result<f64, RateFetchError>;
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Reads `{"rates": {"KRW": ...}}` from a latest-rates endpoint with base USD.
pub struct HttpRateSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpRateSource {
    pub fn new(client: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl RateSource for HttpRateSource {
    fn fetch_usd_krw(&self) -> Result<f64, RateFetchError> {
        debug!(url = %self.url, "fetching exchange rate");
        let body = self.client.get(&self.url).send()?.error_for_status()?.text()?;
        parse_latest_rates(&body)
    }
}

/// Pull the KRW quote out of a latest-rates body.
pub fn parse_latest_rates(body: &str) -> Result<f64, RateFetchError> {
    let parsed: LatestRates = serde_json::from_str(body)?;
    let rate = *parsed
        .rates
        .get("KRW")
        .ok_or_else(|| RateFetchError::MissingQuote("KRW".into()))?;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(RateFetchError::InvalidRate(rate));
    }
    Ok(rate)
}

/// Last fetched rate plus when it was fetched.
///
/// Overlapping refreshes are not coordinated; whichever completes last wins.
#[derive(Debug, Clone, Default)]
pub struct RateCache {
    rate: Option<f64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fetched rate, if any fetch has succeeded.
    pub fn cached(&self) -> Option<f64> {
        self.rate
    }

    pub fn current(&self) -> f64 {
        self.rate.unwrap_or(FALLBACK_RATE)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.fetched_at {
            Some(at) => now - at >= refresh_interval(),
            None => true,
        }
    }

    /// Fetch and store a new rate. Failures are absorbed: the previous value
    /// (or the fallback) stays in effect.
    pub fn refresh(&mut self, source: &dyn RateSource, now: DateTime<Utc>) -> f64 {
        match source.fetch_usd_krw() {
            Ok(rate) => {
                debug!(rate, "exchange rate refreshed");
                self.rate = Some(rate);
                self.fetched_at = Some(now);
            }
            Err(e) => warn!(error = %e, fallback = self.current(), "exchange rate fetch failed"),
        }
        self.current()
    }

    pub fn refresh_if_stale(&mut self, source: &dyn RateSource, now: DateTime<Utc>) -> f64 {
        if self.is_stale(now) {
            self.refresh(source, now)
        } else {
            self.current()
        }
    }
}
