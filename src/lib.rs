// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analysis;
pub mod app;
pub mod bucket;
pub mod calendar;
pub mod categories;
pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod fx;
pub mod ledger;
pub mod models;
pub mod money;
pub mod prefs;
pub mod store;
pub mod utils;
