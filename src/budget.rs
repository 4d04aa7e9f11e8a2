//! Budget estimate for an energy mix: `amount × share% × unit price`, summed.
//!
//! Amounts are in 1000 toe and prices in million KRW per 1000 toe, as in the
//! Korean average price table; [`BudgetEstimate::total_eok`] converts the total
//! to 억 KRW (hundred million).

use crate::mix::{CategorySet, TOTAL};
use crate::models::Category;
use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Needed energy on first load of the budget panel (1000 toe).
pub const DEFAULT_NEEDED_ENERGY: f64 = 300_000.0;

/// Unit price per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitPrices(BTreeMap<Category, f64>);

impl UnitPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, price: f64) -> Self {
        self.insert(category, price);
        self
    }

    pub fn insert(&mut self, category: Category, price: f64) {
        self.0.insert(category, price);
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(c, p)| (*c, *p))
    }

    /// Parse a flat JSON object of prices.
    ///
    /// Keys may be category keys (`"nuclear"`), English labels, or the Korean
    /// labels of the source table (`"원자력"`). Unknown keys and non-numeric
    /// values are skipped.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let v: Value = serde_json::from_str(s).context("parse price table")?;
        let obj = v
            .as_object()
            .ok_or_else(|| anyhow!("unexpected price table shape: not an object"))?;
        let mut prices = Self::new();
        for (key, value) in obj {
            let Ok(category) = key.parse::<Category>() else {
                debug!("price table: skipping unknown key {:?}", key);
                continue;
            };
            let price = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match price {
                Some(p) if p.is_finite() => prices.insert(category, p),
                _ => debug!("price table: skipping non-numeric value for {}", key),
            }
        }
        Ok(prices)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("load prices from {}", path.display()))
    }
}

/// Parse a `category=price` pair, e.g. `nuclear=55.2`.
pub fn parse_price_pair(s: &str) -> Result<(Category, f64)> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected category=price, got {:?}", s))?;
    let category: Category = k.parse()?;
    let price = v
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid price for {}", category))?;
    if !price.is_finite() {
        bail!("invalid price for {}: {}", category, price);
    }
    Ok((category, price))
}

/// One category's line of the estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCost {
    pub category: Category,
    pub share: f64,
    /// `amount × share / 100`, in 1000 toe.
    pub energy: f64,
    pub unit_price: Option<f64>,
    /// Million KRW; zero when the price is missing.
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEstimate {
    pub amount: f64,
    pub rows: Vec<CategoryCost>,
}

impl BudgetEstimate {
    /// Total cost in million KRW.
    pub fn total_cost(&self) -> f64 {
        self.rows.iter().map(|r| r.cost).sum()
    }

    /// Total cost in 억 KRW.
    pub fn total_eok(&self) -> f64 {
        self.total_cost() / 100.0
    }

    pub fn cost_of(&self, category: Category) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.cost)
    }
}

/// Estimate the cost of producing `amount` with the shares of `mix`.
///
/// Negative or non-finite amounts count as zero.
pub fn estimate(mix: &CategorySet, amount: f64, prices: &UnitPrices) -> BudgetEstimate {
    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    let rows = mix
        .iter()
        .map(|slot| {
            let energy = amount * slot.share / TOTAL;
            let unit_price = prices.get(slot.category);
            CategoryCost {
                category: slot.category,
                share: slot.share,
                energy,
                unit_price,
                cost: energy * unit_price.unwrap_or(0.0),
            }
        })
        .collect();
    BudgetEstimate { amount, rows }
}
