//! Global electricity dataset: per-country generation, consumption and trade
//! series keyed by year.
//!
//! The source file is a JSON object keyed by country name:
//! ```json
//! { "Germany": { "region": "Europe",
//!                "net_generation": { "2018": 600.1 },
//!                "net_consumption": { "2018": 540.3 },
//!                "trade_balance": { "2018": -48.7 } } }
//! ```

use crate::models::{CountryRecord, Metric};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Rows shown by the consumption chart before "show all" is toggled.
pub const DEFAULT_TOP_N: usize = 30;

/// Map labels whose spelling differs from the dataset.
const NAME_VARIATIONS: &[(&str, &str)] = &[
    ("United States of America", "United States"),
    ("Russian Federation", "Russia"),
    ("Democratic Republic of the Congo", "Dem. Rep. Congo"),
    ("Central African Republic", "Central African Rep."),
    ("Dominican Rep.", "Dominican Republic"),
    ("Eq. Guinea", "Equatorial Guinea"),
    ("W. Sahara", "Western Sahara"),
    ("eSwatini", "Eswatini"),
    ("S. Sudan", "South Sudan"),
    ("Côte d'Ivoire", "Cote d'Ivoire"),
    ("Bosnia and Herz.", "Bosnia and Herzegovina"),
    ("Falkland Is.", "Falkland Islands"),
    ("Solomon Is.", "Solomon Islands"),
    ("Turkiye", "Turkey"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    countries: BTreeMap<String, CountryRecord>,
}

/// One row of the consumption ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub rank: usize,
    pub country: String,
    pub region: String,
    pub generation: f64,
    pub consumption: f64,
    pub imports: Option<f64>,
    /// `generation + imports` (imports count as zero when absent).
    pub total: f64,
    pub self_sufficiency: Option<f64>,
}

impl Dataset {
    pub fn from_records(records: impl IntoIterator<Item = CountryRecord>) -> Self {
        Self {
            countries: records.into_iter().map(|r| (r.name.clone(), r)).collect(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: BTreeMap<String, CountryRecord> =
            serde_json::from_str(s).context("parse electricity dataset")?;
        Ok(Self::from_records(raw.into_iter().map(|(name, mut r)| {
            r.name = name;
            r
        })))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let ds = Self::from_json_str(&text)
            .with_context(|| format!("load dataset from {}", path.display()))?;
        info!("loaded {} countries from {}", ds.len(), path.display());
        Ok(ds)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryRecord> {
        self.countries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(|k| k.as_str())
    }

    /// Look up a country by dataset name or by its map label.
    pub fn get(&self, name: &str) -> Option<&CountryRecord> {
        self.countries.get(name).or_else(|| {
            NAME_VARIATIONS
                .iter()
                .find(|(map_name, _)| *map_name == name)
                .and_then(|(_, data_name)| self.countries.get(*data_name))
        })
    }

    /// First and last year present in any series.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.countries.values().flat_map(|c| c.years());
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Countries with both generation and consumption in `year`, largest
    /// consumer first; `limit` keeps the first `n` rows.
    pub fn consumption_ranking(&self, year: i32, limit: Option<usize>) -> Vec<RankingRow> {
        let mut rows: Vec<RankingRow> = self
            .countries
            .values()
            .filter_map(|c| {
                let generation = c.value(Metric::NetGeneration, year)?;
                let consumption = c.value(Metric::NetConsumption, year)?;
                let imports = c.value(Metric::Imports, year);
                Some(RankingRow {
                    rank: 0,
                    country: c.name.clone(),
                    region: c.region.clone(),
                    generation,
                    consumption,
                    imports,
                    total: generation + imports.unwrap_or(0.0),
                    self_sufficiency: c.value(Metric::SelfSufficiency, year),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.consumption
                .total_cmp(&a.consumption)
                .then_with(|| a.country.cmp(&b.country))
        });
        if let Some(n) = limit {
            rows.truncate(n);
        }
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = i + 1;
        }
        rows
    }

    /// 1-based consumption rank of `name` in `year`.
    pub fn rank_of(&self, name: &str, year: i32) -> Option<usize> {
        let record = self.get(name)?;
        self.consumption_ranking(year, None)
            .iter()
            .find(|r| r.country == record.name)
            .map(|r| r.rank)
    }

    /// Whether `name` is among the `n` largest consumers of `year`.
    pub fn in_top(&self, name: &str, year: i32, n: usize) -> bool {
        self.rank_of(name, year).is_some_and(|rank| rank <= n)
    }

    /// Largest self-sufficiency rate of any country and year, rounded up to the next hundred.
    pub fn global_max_self_sufficiency(&self) -> f64 {
        let max = self
            .countries
            .values()
            .flat_map(|c| {
                c.years()
                    .filter_map(move |y| c.value(Metric::SelfSufficiency, y))
            })
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        (max / 100.0).ceil() * 100.0
    }
}
