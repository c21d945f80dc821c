// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering transactions into calendar buckets and reducing them to totals.
//!
//! `created_at` is the only temporal key. It is converted to the bucketer's
//! timezone before the calendar day is taken, so two entries on the same
//! local day share a bucket even when their UTC dates differ.

use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TxType};

/// Income, expense and their difference over some set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn collect<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut t = Totals::default();
        for tx in txs {
            t.add(tx);
        }
        t
    }

    fn add(&mut self, tx: &Transaction) {
        match tx.tx_type {
            TxType::Income => self.income = self.income.saturating_add(tx.amount),
            TxType::Expense => self.expense = self.expense.saturating_add(tx.amount),
        }
        self.balance = self.income.saturating_sub(self.expense);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    pub income_count: usize,
    pub expense_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub totals: Totals,
    pub counts: DayCounts,
}

impl DaySummary {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            totals: Totals::default(),
            counts: DayCounts::default(),
        }
    }

    pub fn net(&self) -> Decimal {
        self.totals.balance
    }

    pub fn is_empty(&self) -> bool {
        self.counts.income_count == 0 && self.counts.expense_count == 0
    }

    fn add(&mut self, tx: &Transaction) {
        self.totals.add(tx);
        match tx.tx_type {
            TxType::Income => self.counts.income_count += 1,
            TxType::Expense => self.counts.expense_count += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bucketer<Tz: TimeZone> {
    tz: Tz,
}

impl Bucketer<Local> {
    pub fn local() -> Self {
        Self { tz: Local }
    }
}

impl<Tz: TimeZone> Bucketer<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn day_of(&self, tx: &Transaction) -> NaiveDate {
        tx.day_in(&self.tz)
    }

    /// Entries whose local calendar day equals `date`; time of day is ignored.
    pub fn transactions_on<'a>(&self, all: &'a [Transaction], date: NaiveDate) -> Vec<&'a Transaction> {
        all.iter().filter(|tx| self.day_of(tx) == date).collect()
    }

    /// Entries in the same year and month as `date`.
    pub fn transactions_in_month<'a>(
        &self,
        all: &'a [Transaction],
        date: NaiveDate,
    ) -> Vec<&'a Transaction> {
        all.iter()
            .filter(|tx| {
                let d = self.day_of(tx);
                d.year() == date.year() && d.month() == date.month()
            })
            .collect()
    }

    pub fn net_for_date(&self, all: &[Transaction], date: NaiveDate) -> Decimal {
        Totals::collect(self.transactions_on(all, date)).balance
    }

    pub fn counts_for_date(&self, all: &[Transaction], date: NaiveDate) -> DayCounts {
        self.summarize_day(all, date).counts
    }

    pub fn summarize_day(&self, all: &[Transaction], date: NaiveDate) -> DaySummary {
        let mut s = DaySummary::empty(date);
        for tx in self.transactions_on(all, date) {
            s.add(tx);
        }
        s
    }

    /// One summary per requested date, in the order given. Single pass over `all`.
    pub fn summarize_days(
        &self,
        all: &[Transaction],
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Vec<DaySummary> {
        let dates: Vec<NaiveDate> = dates.into_iter().collect();
        let mut by_day: HashMap<NaiveDate, DaySummary> =
            dates.iter().map(|d| (*d, DaySummary::empty(*d))).collect();
        for tx in all {
            if let Some(s) = by_day.get_mut(&self.day_of(tx)) {
                s.add(tx);
            }
        }
        dates
            .iter()
            .map(|d| by_day.get(d).copied().unwrap_or_else(|| DaySummary::empty(*d)))
            .collect()
    }
}

/// Day-click selection: clicking the selected day clears it, any other day
/// replaces it.
pub fn select_date(current: Option<NaiveDate>, clicked: NaiveDate) -> Option<NaiveDate> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}
