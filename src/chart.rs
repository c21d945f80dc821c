// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
}

pub trait ChartRenderer {
    /// `None` when this renderer draws nothing.
    fn render(&self, points: &[ChartPoint]) -> Option<String>;
}

pub struct NoChart;

impl ChartRenderer for NoChart {
    fn render(&self, _points: &[ChartPoint]) -> Option<String> {
        None
    }
}

/// Horizontal bars scaled to the largest magnitude. Negative values use `-`.
pub struct TextBarChart {
    pub width: usize,
}

impl Default for TextBarChart {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl ChartRenderer for TextBarChart {
    fn render(&self, points: &[ChartPoint]) -> Option<String> {
        if points.is_empty() {
            return None;
        }
        let max = points
            .iter()
            .map(|p| p.value.abs())
            .max()
            .unwrap_or(Decimal::ZERO);
        let label_w = points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);
        let mut out = String::new();
        for p in points {
            let len = if max.is_zero() {
                0
            } else {
                (p.value.abs() / max * Decimal::from(self.width))
                    .round()
                    .to_usize()
                    .unwrap_or(0)
            };
            let glyph = if p.value < Decimal::ZERO { "-" } else { "#" };
            out.push_str(&format!(
                "{:<label_w$} | {} {}\n",
                p.label,
                glyph.repeat(len),
                p.value
            ));
        }
        Some(out)
    }
}
