// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display preferences persisted in the `settings` table.
//!
//! Loaded once when the store is opened; every mutation is written back
//! immediately.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::warn;

use crate::categories::CategorySet;
use crate::errors::ValidationError;
use crate::money::DisplayCurrency;

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_CATEGORIES: &str = "categories";
pub const KEY_SELECTED_DATE: &str = "selected_date";

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub currency: DisplayCurrency,
    pub categories: CategorySet,
    pub selected_date: Option<NaiveDate>,
}

/// Owns the settings connection and the loaded [`Preferences`].
pub struct PreferenceStore {
    conn: Connection,
    prefs: Preferences,
}

impl PreferenceStore {
    /// Unknown or corrupt stored values are replaced by defaults.
    pub fn load(conn: Connection) -> Result<Self> {
        let currency = match get_setting(&conn, KEY_CURRENCY)? {
            Some(s) => s.parse().unwrap_or_else(|e: ValidationError| {
                warn!(error = %e, "ignoring stored currency");
                DisplayCurrency::default()
            }),
            None => DisplayCurrency::default(),
        };
        let categories = match get_setting(&conn, KEY_CATEGORIES)? {
            Some(json) => match serde_json::from_str::<Vec<String>>(&json) {
                Ok(names) => CategorySet::from(names),
                Err(e) => {
                    warn!(error = %e, "ignoring stored categories");
                    CategorySet::default()
                }
            },
            None => CategorySet::default(),
        };
        let selected_date = get_setting(&conn, KEY_SELECTED_DATE)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());
        Ok(Self {
            conn,
            prefs: Preferences {
                currency,
                categories,
                selected_date,
            },
        })
    }

    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn set_currency(&mut self, currency: DisplayCurrency) -> Result<()> {
        set_setting(&self.conn, KEY_CURRENCY, currency.code())?;
        self.prefs.currency = currency;
        Ok(())
    }

    fn save_categories(&self, categories: &CategorySet) -> Result<()> {
        let names: Vec<&str> = categories.iter().collect();
        let json = serde_json::to_string(&names).context("Encode categories")?;
        set_setting(&self.conn, KEY_CATEGORIES, &json)
    }

    /// Returns false when `name` was blank or already present.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let mut next = self.prefs.categories.clone();
        if !next.add(name) {
            return Ok(false);
        }
        self.save_categories(&next)?;
        self.prefs.categories = next;
        Ok(true)
    }

    /// The outer error is persistence; the inner one is the last-category guard.
    pub fn remove_category(&mut self, name: &str) -> Result<Result<bool, ValidationError>> {
        let mut next = self.prefs.categories.clone();
        match next.remove(name) {
            Ok(true) => {
                self.save_categories(&next)?;
                self.prefs.categories = next;
                Ok(Ok(true))
            }
            other => Ok(other),
        }
    }

    pub fn set_selected_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        match date {
            Some(d) => set_setting(&self.conn, KEY_SELECTED_DATE, &d.to_string())?,
            None => clear_setting(&self.conn, KEY_SELECTED_DATE)?,
        }
        self.prefs.selected_date = date;
        Ok(())
    }
}
