// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::bucket::{Bucketer, DaySummary, Totals};
use crate::calendar::{self, CalendarCell};
use crate::models::{Transaction, TxType};

pub const TOP_CATEGORY_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthDelta {
    pub income_delta: Decimal,
    /// `None` when the previous month had no income.
    pub income_delta_pct: Option<Decimal>,
    pub expense_delta: Decimal,
    /// `None` when the previous month had no expense.
    pub expense_delta_pct: Option<Decimal>,
    pub balance_delta: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthComparison {
    pub month: NaiveDate,
    pub current: Totals,
    pub previous: Totals,
    pub delta: MonthDelta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub cell: CalendarCell,
    pub summary: DaySummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub days: Vec<DaySummary>,
    pub totals: Totals,
}

fn pct_change(delta: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        None
    } else {
        Some(
            (delta / previous)
                .saturating_mul(Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

/// Differences from `previous` to `current`; percentages are rounded to one
/// decimal place.
pub fn month_over_month_delta(current: &Totals, previous: &Totals) -> MonthDelta {
    let income_delta = current.income.saturating_sub(previous.income);
    let expense_delta = current.expense.saturating_sub(previous.expense);
    MonthDelta {
        income_delta,
        income_delta_pct: pct_change(income_delta, previous.income),
        expense_delta,
        expense_delta_pct: pct_change(expense_delta, previous.expense),
        balance_delta: current.balance.saturating_sub(previous.balance),
    }
}

/// Read-only views over the in-memory transaction list.
#[derive(Debug, Clone)]
pub struct LedgerService<Tz: TimeZone> {
    bucketer: Bucketer<Tz>,
}

impl LedgerService<Local> {
    pub fn local() -> Self {
        Self::new(Bucketer::local())
    }
}

impl<Tz: TimeZone> LedgerService<Tz> {
    pub fn new(bucketer: Bucketer<Tz>) -> Self {
        Self { bucketer }
    }

    pub fn bucketer(&self) -> &Bucketer<Tz> {
        &self.bucketer
    }

    /// All-time totals.
    pub fn summary(&self, all: &[Transaction]) -> Totals {
        Totals::collect(all)
    }

    pub fn monthly_summary(&self, all: &[Transaction], month_ref: NaiveDate) -> Totals {
        Totals::collect(self.bucketer.transactions_in_month(all, month_ref))
    }

    pub fn month_comparison(&self, all: &[Transaction], month_ref: NaiveDate) -> MonthComparison {
        let current = self.monthly_summary(all, month_ref);
        let previous = self.monthly_summary(all, calendar::previous_month(month_ref));
        MonthComparison {
            month: calendar::first_of_month(month_ref),
            current,
            previous,
            delta: month_over_month_delta(&current, &previous),
        }
    }

    /// Expense categories of the month, largest first; ties by name.
    pub fn top_categories(
        &self,
        all: &[Transaction],
        month_ref: NaiveDate,
        limit: usize,
    ) -> Vec<CategoryTotal> {
        let mut by_cat: HashMap<&str, Decimal> = HashMap::new();
        for tx in self.bucketer.transactions_in_month(all, month_ref) {
            if tx.tx_type == TxType::Expense {
                let sum = by_cat.entry(tx.category.as_str()).or_insert(Decimal::ZERO);
                *sum = sum.saturating_add(tx.amount);
            }
        }
        let mut items: Vec<CategoryTotal> = by_cat
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
            })
            .collect();
        items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
        items.truncate(limit);
        items
    }

    pub fn calendar_month(&self, all: &[Transaction], reference: NaiveDate) -> Vec<CalendarDay> {
        let cells = calendar::month_grid(reference);
        let summaries = self
            .bucketer
            .summarize_days(all, cells.iter().map(|c| c.date));
        cells
            .into_iter()
            .zip(summaries)
            .map(|(cell, summary)| CalendarDay { cell, summary })
            .collect()
    }

    pub fn calendar_week(&self, all: &[Transaction], reference: NaiveDate) -> WeekView {
        let days = self
            .bucketer
            .summarize_days(all, calendar::week_grid(reference));
        let mut totals = Totals::default();
        for d in &days {
            totals.income = totals.income.saturating_add(d.totals.income);
            totals.expense = totals.expense.saturating_add(d.totals.expense);
        }
        totals.balance = totals.income.saturating_sub(totals.expense);
        WeekView { days, totals }
    }

    /// The list view: everything, or only the selected day. Newest first.
    pub fn day_view<'a>(
        &self,
        all: &'a [Transaction],
        selected: Option<NaiveDate>,
    ) -> Vec<&'a Transaction> {
        let mut rows = match selected {
            Some(date) => self.bucketer.transactions_on(all, date),
            None => all.iter().collect(),
        };
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        rows
    }

    /// Cumulative net at the end of each day of the month.
    pub fn daily_balance_series(
        &self,
        all: &[Transaction],
        month_ref: NaiveDate,
    ) -> Vec<(NaiveDate, Decimal)> {
        let first = calendar::first_of_month(month_ref);
        let days = first.iter_days().take(calendar::days_in_month(first) as usize);
        let mut running = Decimal::ZERO;
        self.bucketer
            .summarize_days(all, days)
            .into_iter()
            .map(|s| {
                running = running.saturating_add(s.net());
                (s.date, running)
            })
            .collect()
    }
}
