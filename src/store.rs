// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record stores: where transaction rows live.
//!
//! Both implementations hand rows through [`RawTransactionRow`] so nothing
//! reaches the ledger without passing the same shape checks.

use chrono::{SecondsFormat, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use rusqlite::{Connection, params};
use serde_json::json;
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::models::{NewTransaction, RawTransactionRow, Transaction};

pub trait RecordStore {
    /// All rows, newest `created_at` first.
    fn list(&self) -> Result<Vec<Transaction>, StoreError>;
    fn insert(&self, new: &NewTransaction) -> Result<Transaction, StoreError>;
    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Convert raw rows, dropping (and logging) the ones that fail validation.
pub fn validate_rows(rows: Vec<RawTransactionRow>) -> Vec<Transaction> {
    rows.into_iter()
        .filter_map(|row| match Transaction::try_from(row) {
            Ok(tx) => Some(tx),
            Err(e) => {
                warn!(error = %e, "skipping malformed transaction row");
                None
            }
        })
        .collect()
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Expects the schema from [`crate::db::init_schema`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn fetch_row(&self, id: i64) -> Result<RawTransactionRow, StoreError> {
        let row = self.conn.query_row(
            "SELECT id, amount, description, category, type, created_at FROM transactions WHERE id=?1",
            params![id],
            raw_from_sql,
        )?;
        Ok(row)
    }
}

fn raw_from_sql(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawTransactionRow> {
    Ok(RawTransactionRow {
        id: r.get(0)?,
        amount: r.get::<_, Option<String>>(1)?.map(serde_json::Value::String),
        description: r.get(2)?,
        category: r.get(3)?,
        tx_type: r.get(4)?,
        created_at: r.get(5)?,
    })
}

impl RecordStore for SqliteStore {
    fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, description, category, type, created_at
             FROM transactions ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([], raw_from_sql)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(rows = rows.len(), "listed local transactions");
        Ok(validate_rows(rows))
    }

    fn insert(&self, new: &NewTransaction) -> Result<Transaction, StoreError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        self.conn.execute(
            "INSERT INTO transactions(amount, description, category, type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.amount.to_string(),
                new.description,
                new.category,
                new.tx_type.as_str(),
                created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Transaction::try_from(self.fetch_row(id)?)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

/// A hosted PostgREST-style table (`/rest/v1/<table>`), authenticated with an
/// API key sent both as `apikey` and as a bearer token.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestStore {
    pub fn new(client: Client, base_url: &str, api_key: &str, table: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
        }
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn rows(resp: Response) -> Result<Vec<RawTransactionRow>, StoreError> {
        let status = resp.status().as_u16();
        let body = resp.text()?;
        parse_rows(status, &body)
    }
}

/// Rows from a PostgREST response body; non-2xx becomes [`StoreError::Status`].
pub fn parse_rows(status: u16, body: &str) -> Result<Vec<RawTransactionRow>, StoreError> {
    if !(200..300).contains(&status) {
        return Err(StoreError::Status {
            status,
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}

/// A filtered DELETE that returned no representation matched nothing.
pub fn delete_outcome(id: i64, deleted: &[RawTransactionRow]) -> Result<(), StoreError> {
    if deleted.is_empty() {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

impl RecordStore for RestStore {
    fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        let resp = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()?;
        let rows = Self::rows(resp)?;
        debug!(rows = rows.len(), "listed remote transactions");
        Ok(validate_rows(rows))
    }

    fn insert(&self, new: &NewTransaction) -> Result<Transaction, StoreError> {
        let body = json!([{
            "amount": new.amount,
            "description": new.description,
            "category": new.category,
            "type": new.tx_type,
        }]);
        let resp = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()?;
        let row = Self::rows(resp)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Malformed("insert returned no row".into()))?;
        Transaction::try_from(row)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let filter = format!("eq.{id}");
        let resp = self
            .authed(self.client.delete(self.table_url()))
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .send()?;
        delete_outcome(id, &Self::rows(resp)?)
    }
}
