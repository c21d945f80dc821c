// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{StoreError, ValidationError};
use crate::money::{STEP, round_to_step};

pub const EMPTY_DESCRIPTION: &str = "(no description)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            _ => Err(ValidationError::UnknownType(s.to_string())),
        }
    }
}

/// A persisted ledger entry. Immutable once the store has assigned `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal, // base currency, positive, multiple of 10
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Calendar day of `created_at` as seen in `tz`.
    pub fn day_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.created_at.with_timezone(tz).date_naive()
    }
}

/// A validated insert request; `id` and `created_at` come from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
}

impl NewTransaction {
    /// Round the amount to the step grid and fill the description placeholder.
    pub fn new(
        amount: Decimal,
        description: &str,
        category: &str,
        tx_type: TxType,
    ) -> Result<Self, ValidationError> {
        let amount = round_to_step(amount)
            .ok_or_else(|| ValidationError::InvalidAmount(amount.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        let description = match description.trim() {
            "" => EMPTY_DESCRIPTION.to_string(),
            d => d.to_string(),
        };
        Ok(Self {
            amount,
            description,
            category: category.trim().to_string(),
            tx_type,
        })
    }
}

/// A row as it arrives from either store, before any shape is trusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransactionRow {
    pub id: Option<i64>,
    pub amount: Option<serde_json::Value>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub created_at: Option<String>,
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Postgres `timestamp` without zone and SQLite `datetime('now')` are UTC.
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_row_amount(v: &serde_json::Value) -> Option<Decimal> {
    match v {
        serde_json::Value::Number(n) => n.to_string().parse().ok(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl TryFrom<RawTransactionRow> for Transaction {
    type Error = StoreError;

    fn try_from(row: RawTransactionRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .ok_or_else(|| StoreError::Malformed("missing id".into()))?;
        let malformed = |what: String| StoreError::Malformed(format!("row {id}: {what}"));

        let amount = row
            .amount
            .as_ref()
            .and_then(parse_row_amount)
            .ok_or_else(|| malformed(format!("amount {:?} is not numeric", row.amount)))?;
        if amount <= Decimal::ZERO || !(amount % STEP).is_zero() {
            return Err(malformed(format!("amount {amount} is not a positive multiple of {STEP}")));
        }

        let tx_type = row
            .tx_type
            .as_deref()
            .ok_or_else(|| malformed("missing type".into()))?
            .parse::<TxType>()
            .map_err(|e| malformed(e.to_string()))?;

        let created_at = row
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| malformed(format!("bad created_at {:?}", row.created_at)))?;

        let description = row
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| EMPTY_DESCRIPTION.to_string());

        Ok(Transaction {
            id,
            amount: amount.normalize(),
            description,
            category: row.category.unwrap_or_default(),
            tx_type,
            created_at,
        })
    }
}
