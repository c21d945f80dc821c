// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::{DEFAULT_ANALYSIS_MODEL, DEFAULT_ANALYSIS_URL};
use crate::fx::DEFAULT_RATE_URL;

pub const DEFAULT_STORE_TABLE: &str = "transactions";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub api_key: String,
    pub model: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means the platform data dir.
    pub db_path: Option<PathBuf>,
    /// `None` means transactions live in the local SQLite file.
    pub remote_store: Option<RemoteStoreConfig>,
    pub rate_url: String,
    pub analysis: Option<AnalysisConfig>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let remote_store = match (get("POCKETLEDGER_STORE_URL"), get("POCKETLEDGER_STORE_KEY")) {
            (Some(url), Some(api_key)) => Some(RemoteStoreConfig {
                url,
                api_key,
                table: get("POCKETLEDGER_STORE_TABLE").unwrap_or_else(|| DEFAULT_STORE_TABLE.into()),
            }),
            _ => None,
        };

        let analysis = get("POCKETLEDGER_ANALYSIS_KEY")
            .or_else(|| get("OPENAI_API_KEY"))
            .map(|api_key| AnalysisConfig {
                api_key,
                model: get("POCKETLEDGER_ANALYSIS_MODEL")
                    .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.into()),
                url: get("POCKETLEDGER_ANALYSIS_URL").unwrap_or_else(|| DEFAULT_ANALYSIS_URL.into()),
            });

        let timeout_secs = match get("POCKETLEDGER_HTTP_TIMEOUT_SECS") {
            Some(s) => s
                .parse::<u64>()
                .with_context(|| format!("Invalid POCKETLEDGER_HTTP_TIMEOUT_SECS '{}'", s))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            db_path: get("POCKETLEDGER_DB").map(PathBuf::from),
            remote_store,
            rate_url: get("POCKETLEDGER_RATE_URL").unwrap_or_else(|| DEFAULT_RATE_URL.into()),
            analysis,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
