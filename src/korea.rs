//! South Korea energy series behind the Korea view and the budget panel.
//!
//! Four JSON arrays with Korean field names, one object per row:
//! - `south_korea_energy_production.json`: generation by source per year
//!   (`시점`, `원자력`, `신재생에너지`, `화석연료`, `수력`, `기타`)
//! - `south_korea_energy_all.json`: production, net imports and consumption per
//!   year (`시점`, `생산`, `순수입`, `소비`)
//! - `south_korea_energy_price_24.json`: monthly unit price per source (`월`, ...)
//! - `south_korea_electric_save.json`: electricity usage and the reducible share
//!   per sector (`구분`, `사용량(kWh)`, `감축이후 사용량`, ...), with a `합계` total row

use crate::error::MixResult;
use crate::mix::{CategorySet, MixConfig, TOTAL};
use crate::models::{Category, FIVE_CATEGORIES, de_lenient_f64, de_whole};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const PRODUCTION_FILE: &str = "south_korea_energy_production.json";
pub const BALANCE_FILE: &str = "south_korea_energy_all.json";
pub const MONTHLY_PRICE_FILE: &str = "south_korea_energy_price_24.json";
pub const ELECTRIC_SAVE_FILE: &str = "south_korea_electric_save.json";

/// Sector label of the total row in the electricity saving table.
pub const TOTAL_SECTOR: &str = "합계";

/// Generation by source for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionYear {
    #[serde(rename = "시점", deserialize_with = "de_whole")]
    pub year: i32,
    #[serde(rename = "원자력", default, deserialize_with = "de_lenient_f64")]
    pub nuclear: Option<f64>,
    #[serde(rename = "신재생에너지", default, deserialize_with = "de_lenient_f64")]
    pub renewable: Option<f64>,
    #[serde(rename = "화석연료", default, deserialize_with = "de_lenient_f64")]
    pub fossil: Option<f64>,
    #[serde(rename = "수력", default, deserialize_with = "de_lenient_f64")]
    pub hydro: Option<f64>,
    #[serde(rename = "기타", default, deserialize_with = "de_lenient_f64")]
    pub other: Option<f64>,
}

impl ProductionYear {
    pub fn amount(&self, category: Category) -> f64 {
        match category {
            Category::Nuclear => self.nuclear,
            Category::Renewable => self.renewable,
            Category::Fossil => self.fossil,
            Category::Hydro => self.hydro,
            Category::Other => self.other,
        }
        .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        FIVE_CATEGORIES.iter().map(|&c| self.amount(c)).sum()
    }

    /// Percentage of each source in the year's total, in the five-category
    /// panel order. Empty when nothing was generated.
    pub fn shares(&self) -> Vec<(Category, f64)> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        FIVE_CATEGORIES
            .iter()
            .map(|&c| (c, self.amount(c) / total * TOTAL))
            .collect()
    }

    /// The year's actual mix as a slider set.
    pub fn to_mix(&self, config: MixConfig) -> MixResult<CategorySet> {
        CategorySet::new(self.shares(), config)
    }
}

/// Energy balance for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceYear {
    #[serde(rename = "시점", deserialize_with = "de_whole")]
    pub year: i32,
    #[serde(rename = "생산", default, deserialize_with = "de_lenient_f64")]
    pub production: Option<f64>,
    #[serde(rename = "순수입", default, deserialize_with = "de_lenient_f64")]
    pub net_imports: Option<f64>,
    #[serde(rename = "소비", default, deserialize_with = "de_lenient_f64")]
    pub consumption: Option<f64>,
}

/// Sources priced in the monthly table; finer than [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Nuclear,
    Coal,
    Oil,
    Lng,
    Pumped,
    Renewable,
    Hydro,
}

impl PriceSource {
    pub const ALL: [PriceSource; 7] = [
        PriceSource::Nuclear,
        PriceSource::Coal,
        PriceSource::Oil,
        PriceSource::Lng,
        PriceSource::Pumped,
        PriceSource::Renewable,
        PriceSource::Hydro,
    ];

    pub fn label_ko(self) -> &'static str {
        match self {
            PriceSource::Nuclear => "원자력",
            PriceSource::Coal => "석탄",
            PriceSource::Oil => "유류",
            PriceSource::Lng => "LNG",
            PriceSource::Pumped => "양수",
            PriceSource::Renewable => "신재생",
            PriceSource::Hydro => "수력",
        }
    }
}

/// Unit prices of one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPrice {
    #[serde(rename = "월", deserialize_with = "de_whole")]
    pub month: i32,
    #[serde(rename = "원자력", default, deserialize_with = "de_lenient_f64")]
    pub nuclear: Option<f64>,
    #[serde(rename = "석탄", default, deserialize_with = "de_lenient_f64")]
    pub coal: Option<f64>,
    #[serde(rename = "유류", default, deserialize_with = "de_lenient_f64")]
    pub oil: Option<f64>,
    #[serde(rename = "LNG", default, deserialize_with = "de_lenient_f64")]
    pub lng: Option<f64>,
    #[serde(rename = "양수", default, deserialize_with = "de_lenient_f64")]
    pub pumped: Option<f64>,
    #[serde(rename = "신재생", default, deserialize_with = "de_lenient_f64")]
    pub renewable: Option<f64>,
    #[serde(rename = "수력", default, deserialize_with = "de_lenient_f64")]
    pub hydro: Option<f64>,
}

impl MonthlyPrice {
    pub fn get(&self, source: PriceSource) -> Option<f64> {
        match source {
            PriceSource::Nuclear => self.nuclear,
            PriceSource::Coal => self.coal,
            PriceSource::Oil => self.oil,
            PriceSource::Lng => self.lng,
            PriceSource::Pumped => self.pumped,
            PriceSource::Renewable => self.renewable,
            PriceSource::Hydro => self.hydro,
        }
    }
}

/// One row of the electricity saving table as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingRecord {
    #[serde(rename = "구분")]
    pub sector: String,
    #[serde(rename = "사용량(kWh)", default, deserialize_with = "de_lenient_f64")]
    pub usage: Option<f64>,
    #[serde(rename = "감축이후 사용량", default, deserialize_with = "de_lenient_f64")]
    pub after_reduction: Option<f64>,
    #[serde(rename = "감축가능비율(%)", default, deserialize_with = "de_lenient_f64")]
    pub reduction_rate: Option<f64>,
    #[serde(rename = "감축률 설명", default)]
    pub description: String,
}

/// Sector usage with the reducible amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorReduction {
    pub sector: String,
    pub usage: f64,
    pub after_reduction: f64,
    /// `usage - after_reduction`.
    pub reduction: f64,
    pub reduction_rate: Option<f64>,
    pub description: String,
}

impl From<&SavingRecord> for SectorReduction {
    fn from(r: &SavingRecord) -> Self {
        let usage = r.usage.unwrap_or(0.0);
        let after_reduction = r.after_reduction.unwrap_or(usage);
        Self {
            sector: r.sector.clone(),
            usage,
            after_reduction,
            reduction: usage - after_reduction,
            reduction_rate: r.reduction_rate,
            description: r.description.clone(),
        }
    }
}

/// All four Korea series. Each is empty when its file was not loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KoreaData {
    production: Vec<ProductionYear>,
    balance: Vec<BalanceYear>,
    prices: Vec<MonthlyPrice>,
    savings: Vec<SavingRecord>,
}

impl KoreaData {
    pub fn new(
        mut production: Vec<ProductionYear>,
        mut balance: Vec<BalanceYear>,
        mut prices: Vec<MonthlyPrice>,
        savings: Vec<SavingRecord>,
    ) -> Self {
        production.sort_by_key(|p| p.year);
        balance.sort_by_key(|b| b.year);
        prices.sort_by_key(|p| p.month);
        Self {
            production,
            balance,
            prices,
            savings,
        }
    }

    /// Load the four files from `dir`. A missing file leaves its series empty;
    /// a malformed one is an error.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let data = Self::new(
            load_optional(&dir.join(PRODUCTION_FILE))?,
            load_optional(&dir.join(BALANCE_FILE))?,
            load_optional(&dir.join(MONTHLY_PRICE_FILE))?,
            load_optional(&dir.join(ELECTRIC_SAVE_FILE))?,
        );
        info!(
            "loaded Korea series from {}: {} production years, {} balance years, {} price months, {} saving rows",
            dir.display(),
            data.production.len(),
            data.balance.len(),
            data.prices.len(),
            data.savings.len()
        );
        Ok(data)
    }

    pub fn is_empty(&self) -> bool {
        self.production.is_empty()
            && self.balance.is_empty()
            && self.prices.is_empty()
            && self.savings.is_empty()
    }

    /// Generation by source, oldest year first.
    pub fn production(&self) -> &[ProductionYear] {
        &self.production
    }

    pub fn production_for(&self, year: i32) -> Option<&ProductionYear> {
        self.production.iter().find(|p| p.year == year)
    }

    /// Actual share of each source in `year`.
    pub fn shares_for(&self, year: i32) -> Option<Vec<(Category, f64)>> {
        self.production_for(year)
            .map(|p| p.shares())
            .filter(|s| !s.is_empty())
    }

    /// Production, net imports and consumption, oldest year first.
    pub fn balance(&self) -> &[BalanceYear] {
        &self.balance
    }

    pub fn balance_for(&self, year: i32) -> Option<&BalanceYear> {
        self.balance.iter().find(|b| b.year == year)
    }

    /// Monthly prices, January first.
    pub fn monthly_prices(&self) -> &[MonthlyPrice] {
        &self.prices
    }

    /// `(month, price)` for one source, skipping months without a price.
    pub fn price_series(&self, source: PriceSource) -> Vec<(i32, f64)> {
        self.prices
            .iter()
            .filter_map(|m| m.get(source).map(|p| (m.month, p)))
            .collect()
    }

    /// Per-sector reductions without the total row, largest usage first.
    pub fn reductions(&self) -> Vec<SectorReduction> {
        let mut rows: Vec<SectorReduction> = self
            .savings
            .iter()
            .filter(|r| r.sector.trim() != TOTAL_SECTOR)
            .map(SectorReduction::from)
            .collect();
        rows.sort_by(|a, b| b.usage.total_cmp(&a.usage));
        rows
    }

    /// The total row of the saving table, when present.
    pub fn reduction_total(&self) -> Option<SectorReduction> {
        self.savings
            .iter()
            .find(|r| r.sector.trim() == TOTAL_SECTOR)
            .map(SectorReduction::from)
    }
}

/// Parse one of the Korea JSON arrays.
pub fn parse_rows<T: DeserializeOwned>(s: &str) -> Result<Vec<T>> {
    serde_json::from_str(s).context("parse Korea series")
}

fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        warn!("{} not found, series left empty", path.display());
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_rows(&text).with_context(|| format!("load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn shares_follow_panel_order() {
        let p = ProductionYear {
            year: 2020,
            nuclear: Some(30.0),
            renewable: Some(10.0),
            fossil: Some(55.0),
            hydro: Some(1.0),
            other: Some(4.0),
        };
        let shares = p.shares();
        let order: Vec<Category> = shares.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, FIVE_CATEGORIES);
        assert_abs_diff_eq!(shares[0].1, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shares[1].1, 55.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shares[4].1, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_year_has_no_shares() {
        let p = ProductionYear {
            year: 2020,
            ..Default::default()
        };
        assert!(p.shares().is_empty());
    }
}
