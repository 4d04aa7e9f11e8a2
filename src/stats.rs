use crate::dataset::Dataset;
use crate::models::{CountryRecord, GroupKey, Metric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one metric in one year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: GroupKey,
    pub year: i32,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Region label used for the dataset-wide summary.
pub const ALL_REGIONS: &str = "All";

/// Summarize `metric` in `year` over every country.
pub fn metric_summary(ds: &Dataset, metric: Metric, year: i32) -> Summary {
    summarize(
        GroupKey {
            region: ALL_REGIONS.to_string(),
            metric,
        },
        year,
        ds.countries(),
    )
}

/// Summarize `metric` in `year` per region.
pub fn grouped_by_region(ds: &Dataset, metric: Metric, year: i32) -> Vec<Summary> {
    let mut groups: BTreeMap<String, Vec<&CountryRecord>> = BTreeMap::new();
    for c in ds.countries() {
        groups.entry(c.region.clone()).or_default().push(c);
    }
    groups
        .into_iter()
        .map(|(region, members)| summarize(GroupKey { region, metric }, year, members))
        .collect()
}

fn summarize<'a>(
    key: GroupKey,
    year: i32,
    records: impl IntoIterator<Item = &'a CountryRecord>,
) -> Summary {
    let mut vals = Vec::new();
    let mut missing = 0;
    for r in records {
        match r.value(key.metric, year) {
            Some(v) => vals.push(v),
            None => missing += 1,
        }
    }
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        key,
        year,
        count,
        missing,
        min,
        max,
        mean,
        median,
    }
}
