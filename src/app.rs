// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state: the in-memory transaction list plus the collaborators
//! that feed it.
//!
//! The list only changes on a confirmed store outcome (initial load, insert,
//! delete). Every aggregate view is computed from it on demand.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::analysis::{AnalysisClient, AnalysisRequest, ChatAnalysis, UnconfiguredAnalysis};
use crate::bucket::select_date;
use crate::chart::{ChartRenderer, TextBarChart};
use crate::config::Config;
use crate::db;
use crate::errors::{AnalysisError, EntryError, StoreError, ValidationError};
use crate::fx::{HttpRateSource, RateCache, RateSource};
use crate::ledger::LedgerService;
use crate::models::{NewTransaction, Transaction, TxType};
use crate::money::{AmountInput, DisplayCurrency, format_currency};
use crate::prefs::{PreferenceStore, Preferences};
use crate::store::{RecordStore, RestStore, SqliteStore};
use crate::utils::http_client;

/// Outbound capabilities, chosen when the app is composed.
pub struct Collaborators {
    pub store: Box<dyn RecordStore>,
    pub rate_source: Box<dyn RateSource>,
    pub analysis: Box<dyn AnalysisClient>,
    pub chart: Box<dyn ChartRenderer>,
}

impl Collaborators {
    pub fn from_config(config: &Config, local_db: &std::path::Path) -> Result<Self> {
        let client = http_client(config.http_timeout)?;
        let store: Box<dyn RecordStore> = match &config.remote_store {
            Some(remote) => {
                info!(url = %remote.url, table = %remote.table, "using hosted record store");
                Box::new(RestStore::new(
                    client.clone(),
                    &remote.url,
                    &remote.api_key,
                    &remote.table,
                ))
            }
            None => Box::new(SqliteStore::new(db::open_at(local_db)?)),
        };
        let analysis: Box<dyn AnalysisClient> = match &config.analysis {
            Some(a) => Box::new(ChatAnalysis::new(client.clone(), &a.url, &a.api_key, &a.model)),
            None => Box::new(UnconfiguredAnalysis),
        };
        Ok(Self {
            store,
            rate_source: Box::new(HttpRateSource::new(client, config.rate_url.clone())),
            analysis,
            chart: Box::new(TextBarChart::default()),
        })
    }
}

pub struct App<Tz: TimeZone = Local> {
    collab: Collaborators,
    prefs: PreferenceStore,
    rates: RateCache,
    ledger: LedgerService<Tz>,
    transactions: Vec<Transaction>,
}

impl App<Local> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = match &config.db_path {
            Some(p) => p.clone(),
            None => db::db_path()?,
        };
        let prefs = PreferenceStore::load(db::open_at(&path)?)?;
        let collab = Collaborators::from_config(config, &path)?;
        Ok(App::new(collab, prefs, LedgerService::local()))
    }
}

impl<Tz: TimeZone> App<Tz> {
    pub fn new(collab: Collaborators, prefs: PreferenceStore, ledger: LedgerService<Tz>) -> Self {
        Self {
            collab,
            prefs,
            rates: RateCache::new(),
            ledger,
            transactions: Vec::new(),
        }
    }

    /// Replace the local list with the store's contents.
    pub fn load(&mut self) -> Result<usize, StoreError> {
        let rows = self.collab.store.list()?;
        info!(count = rows.len(), "transactions loaded");
        self.transactions = rows;
        Ok(self.transactions.len())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn ledger(&self) -> &LedgerService<Tz> {
        &self.ledger
    }

    pub fn prefs(&self) -> &Preferences {
        self.prefs.get()
    }

    pub fn prefs_mut(&mut self) -> &mut PreferenceStore {
        &mut self.prefs
    }

    pub fn chart(&self) -> &dyn ChartRenderer {
        self.collab.chart.as_ref()
    }

    /// Validate the form, insert, then add the confirmed row locally.
    /// `category` defaults to the first registered category.
    pub fn add_transaction(
        &mut self,
        amount: &AmountInput,
        description: &str,
        category: Option<&str>,
        tx_type: TxType,
    ) -> Result<Transaction, EntryError> {
        let value = amount.submit_value()?;
        let categories = &self.prefs.get().categories;
        let category = match category {
            Some(c) if !categories.contains(c.trim()) => {
                return Err(ValidationError::UnknownCategory(c.to_string()).into());
            }
            other => categories.resolve_selection(other.map(str::trim)).to_string(),
        };
        let new = NewTransaction::new(value, description, &category, tx_type)?;
        let tx = self.collab.store.insert(&new)?;
        info!(id = tx.id, amount = %tx.amount, kind = %tx.tx_type, "transaction recorded");
        self.transactions.insert(0, tx.clone());
        Ok(tx)
    }

    /// Delete remotely first; the local row goes only once the store confirms.
    pub fn delete_transaction(&mut self, id: i64) -> Result<(), StoreError> {
        self.collab.store.delete(id)?;
        self.transactions.retain(|t| t.id != id);
        info!(id, "transaction deleted");
        Ok(())
    }

    pub fn rates(&self) -> &RateCache {
        &self.rates
    }

    pub fn refresh_rate_at(&mut self, now: DateTime<Utc>) -> f64 {
        self.rates.refresh(self.collab.rate_source.as_ref(), now)
    }

    pub fn refresh_rate(&mut self) -> f64 {
        self.refresh_rate_at(Utc::now())
    }

    /// Fetch only when nothing has been fetched within the refresh interval.
    pub fn ensure_rate(&mut self) -> f64 {
        self.rates
            .refresh_if_stale(self.collab.rate_source.as_ref(), Utc::now())
    }

    /// Make sure a recent rate is cached before amounts are shown in USD.
    /// Does nothing while the display currency is KRW.
    pub fn prepare_display(&mut self) {
        if self.prefs().currency == DisplayCurrency::Usd {
            self.ensure_rate();
        }
    }

    pub fn format_amount(&self, amount: Decimal) -> String {
        format_currency(amount, self.prefs().currency, Some(self.rates.current()))
    }

    /// Apply a day click and persist the resulting selection.
    pub fn click_date(&mut self, clicked: NaiveDate) -> Result<Option<NaiveDate>> {
        let next = select_date(self.prefs().selected_date, clicked);
        self.prefs.set_selected_date(next)?;
        Ok(next)
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.prefs.set_selected_date(None)
    }

    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        self.ledger
            .day_view(&self.transactions, self.prefs().selected_date)
    }

    pub fn analyze_month(&self, month_ref: NaiveDate) -> Result<String, AnalysisError> {
        let request = AnalysisRequest::for_month(&self.ledger, &self.transactions, month_ref);
        self.collab.analysis.analyze(&request).inspect_err(|e| {
            warn!(error = %e, month = %request.month_label, "analysis failed");
        })
    }
}
