use crate::budget::BudgetEstimate;
use crate::dataset::RankingRow;
use crate::mix::CategorySet;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as formulas.
fn safe_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", s),
        _ => s.to_string(),
    }
}

/// Save a consumption ranking as CSV with header.
pub fn save_ranking_csv<P: AsRef<Path>>(rows: &[RankingRow], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "rank",
        "country",
        "region",
        "generation",
        "consumption",
        "imports",
        "total",
        "self_sufficiency",
    ))?;
    for r in rows {
        wtr.serialize((
            r.rank,
            safe_cell(&r.country),
            safe_cell(&r.region),
            r.generation,
            r.consumption,
            r.imports,
            r.total,
            r.self_sufficiency,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a consumption ranking as pretty JSON array.
pub fn save_ranking_json<P: AsRef<Path>>(rows: &[RankingRow], path: P) -> Result<()> {
    write_json(rows, path)
}

/// Save a budget estimate as CSV, one row per category plus a total row.
pub fn save_estimate_csv<P: AsRef<Path>>(estimate: &BudgetEstimate, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("category", "share", "energy", "unit_price", "cost"))?;
    for r in &estimate.rows {
        wtr.serialize((r.category.key(), r.share, r.energy, r.unit_price, r.cost))?;
    }
    wtr.serialize((
        "total",
        estimate.rows.iter().map(|r| r.share).sum::<f64>(),
        estimate.amount,
        None::<f64>,
        estimate.total_cost(),
    ))?;
    wtr.flush()?;
    Ok(())
}

/// Save a budget estimate as pretty JSON.
pub fn save_estimate_json<P: AsRef<Path>>(estimate: &BudgetEstimate, path: P) -> Result<()> {
    write_json(estimate, path)
}

/// Save a mix (shares, locks and config) as pretty JSON.
pub fn save_mix_json<P: AsRef<Path>>(mix: &CategorySet, path: P) -> Result<()> {
    write_json(mix, path)
}

/// Load a mix saved by [`save_mix_json`]; the shares and locks are validated again.
pub fn load_mix_json<P: AsRef<Path>>(path: P) -> Result<CategorySet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse mix from {}", path.display()))
}

fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
