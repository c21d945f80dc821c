// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

pub const DEFAULT_CATEGORIES: [&str; 5] = ["Food", "Transport", "Shopping", "Living", "Other"];

/// Ordered, duplicate-free category labels. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", from = "Vec<String>")]
pub struct CategorySet {
    names: Vec<String>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl From<Vec<String>> for CategorySet {
    /// Blank and repeated labels are dropped; an empty result falls back to the
    /// defaults.
    fn from(names: Vec<String>) -> Self {
        let mut set = CategorySet { names: Vec::new() };
        for n in names {
            set.add(&n);
        }
        if set.names.is_empty() {
            return CategorySet::default();
        }
        set
    }
}

impl From<CategorySet> for Vec<String> {
    fn from(set: CategorySet) -> Self {
        set.names
    }
}

impl CategorySet {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn first(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(DEFAULT_CATEGORIES[0])
    }

    /// Append `name` (trimmed). Returns false for blanks and exact duplicates.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Remove `name`. Refused while only one category is left.
    pub fn remove(&mut self, name: &str) -> Result<bool, ValidationError> {
        if self.names.len() <= 1 {
            return Err(ValidationError::LastCategory);
        }
        let before = self.names.len();
        self.names.retain(|n| n != name);
        Ok(self.names.len() != before)
    }

    /// The category to preselect: `selected` while it still exists, otherwise
    /// the first remaining one.
    pub fn resolve_selection<'a>(&'a self, selected: Option<&'a str>) -> &'a str {
        match selected {
            Some(s) if self.contains(s) => s,
            _ => self.first(),
        }
    }
}

/// Visibility of the category manager panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Collapsed,
    Expanded,
}

impl PanelState {
    pub fn toggle(self) -> Self {
        match self {
            PanelState::Collapsed => PanelState::Expanded,
            PanelState::Expanded => PanelState::Collapsed,
        }
    }
}
