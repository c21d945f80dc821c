// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures talking to the record store (local SQLite or the hosted API).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("record store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("record store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("record store sent unreadable JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("transaction {0} not found")]
    NotFound(i64),
    #[error("malformed transaction row: {0}")]
    Malformed(String),
}

/// Exchange-rate lookup failures. Never shown to the user; callers fall back
/// to [`crate::fx::FALLBACK_RATE`].
#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("rate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("rate response has no {0} quote")]
    MissingQuote(String),
    #[error("rate {0} is not a positive number")]
    InvalidRate(f64),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis service is not configured (set POCKETLEDGER_ANALYSIS_KEY)")]
    Unconfigured,
    #[error("analysis request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("analysis service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("analysis response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("analysis service returned no text")]
    EmptyResponse,
}

/// Local input problems, raised before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("at least one category required")]
    LastCategory,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("unknown transaction type '{0}', expected income or expense")]
    UnknownType(String),
    #[error("unknown currency '{0}', expected KRW or USD")]
    UnknownCurrency(String),
}

/// Outcome of a user action that validates locally and then calls the store.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
