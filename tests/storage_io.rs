use energy_mix::budget::{self, UnitPrices};
use energy_mix::dataset::RankingRow;
use energy_mix::{Category, CategorySet, storage};
use std::fs;

fn row(rank: usize, country: &str, region: &str) -> RankingRow {
    RankingRow {
        rank,
        country: country.into(),
        region: region.into(),
        generation: 100.0,
        consumption: 90.0,
        imports: None,
        total: 100.0,
        self_sufficiency: Some(111.1),
    }
}

#[test]
fn save_ranking_csv_and_json() {
    let rows = vec![row(1, "Germany", "Europe"), row(2, "France", "Europe")];
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("ranking.csv");
    storage::save_ranking_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("rank,country,region,"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());

    let json_path = dir.path().join("ranking.json");
    storage::save_ranking_json(&rows, &json_path).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), rows.len());
    assert_eq!(v[0]["country"], "Germany");
}

// Spreadsheets evaluate cells starting with = + - @ as formulas; names from a
// dataset file must come out as plain text.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let rows = vec![
        row(1, "=SUM(A1:A2)", "+Evil"),
        row(2, "@cmd", "-Region"),
    ];
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inject.csv");
    storage::save_ranking_csv(&rows, &path).unwrap();
    let txt = fs::read_to_string(&path).unwrap();
    assert!(txt.contains("'=SUM(A1:A2)"));
    assert!(txt.contains("'+Evil"));
    assert!(txt.contains("'@cmd"));
    assert!(txt.contains("'-Region"));
}

#[test]
fn estimate_csv_has_total_row() {
    let prices = UnitPrices::new().with(Category::Nuclear, 60.0);
    let est = budget::estimate(&CategorySet::default(), 1000.0, &prices);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("estimate.csv");
    storage::save_estimate_csv(&est, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 6);
    assert_eq!(&records[0][0], "nuclear");
    assert_eq!(&records[0][4], "3600.0");
    assert_eq!(&records[1][3], "");
    let total = &records[5];
    assert_eq!(&total[0], "total");
    assert_eq!(&total[2], "1000.0");
    assert_eq!(&total[4], "3600.0");
}
