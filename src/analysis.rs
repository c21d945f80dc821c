// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Natural-language commentary on a month's spending.

use chrono::{NaiveDate, TimeZone};
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::calendar;
use crate::errors::AnalysisError;
use crate::ledger::{CategoryTotal, LedgerService, TOP_CATEGORY_COUNT};
use crate::models::Transaction;

pub const DEFAULT_ANALYSIS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gpt-4o-mini";

/// What the analysis service gets to see about a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub top_categories: Vec<CategoryTotal>,
    pub month_label: String,
}

impl AnalysisRequest {
    pub fn for_month<Tz: TimeZone>(
        ledger: &LedgerService<Tz>,
        all: &[Transaction],
        month_ref: NaiveDate,
    ) -> Self {
        let totals = ledger.monthly_summary(all, month_ref);
        Self {
            income: totals.income,
            expense: totals.expense,
            balance: totals.balance,
            top_categories: ledger.top_categories(all, month_ref, TOP_CATEGORY_COUNT),
            month_label: calendar::month_label(month_ref),
        }
    }

    pub fn prompt(&self) -> String {
        let top = if self.top_categories.is_empty() {
            "none".to_string()
        } else {
            self.top_categories
                .iter()
                .map(|c| format!("{} {} KRW", c.category, c.amount))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Household ledger for {}.\nIncome: {} KRW\nExpense: {} KRW\nBalance: {} KRW\n\
             Top expense categories: {}\n\
             Write 3-4 sentences of friendly, concrete commentary on this month's spending \
             and one practical suggestion.",
            self.month_label, self.income, self.expense, self.balance, top
        )
    }
}

pub trait AnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError>;
}

/// Stand-in used when no API key is configured.
pub struct UnconfiguredAnalysis;

impl AnalysisClient for UnconfiguredAnalysis {
    fn analyze(&self, _request: &AnalysisRequest) -> Result<String, AnalysisError> {
        Err(AnalysisError::Unconfigured)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client.
pub struct ChatAnalysis {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl ChatAnalysis {
    pub fn new(client: Client, url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

impl AnalysisClient for ChatAnalysis {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        info!(month = %request.month_label, model = %self.model, "requesting spending analysis");
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": "You are a concise personal finance assistant."},
                {"role": "user", "content": request.prompt()},
            ],
        });
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        let text = chat_text(status, &body)?;
        debug!(chars = text.len(), "analysis received");
        Ok(text)
    }
}

/// First non-blank message of a chat-completions response.
pub fn chat_text(status: u16, body: &str) -> Result<String, AnalysisError> {
    if !(200..300).contains(&status) {
        return Err(AnalysisError::Status {
            status,
            body: body.to_string(),
        });
    }
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .filter_map(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .ok_or(AnalysisError::EmptyResponse)
}
