use energy_mix::models::{CountryRecord, GroupKey, Metric};
use energy_mix::stats::{ALL_REGIONS, grouped_by_region, metric_summary};
use energy_mix::Dataset;
use std::collections::BTreeMap;

fn country(name: &str, region: &str, consumption: Option<f64>) -> CountryRecord {
    CountryRecord {
        name: name.into(),
        region: region.into(),
        net_consumption: consumption.map(|v| BTreeMap::from([(2018, v)])).unwrap_or_default(),
        ..Default::default()
    }
}

#[test]
fn grouped_stats_handle_missing_and_median_even_odd() {
    // Europe [1,2,3,4] -> median = (2+3)/2 = 2.5
    // Asia [10, None, 30] -> missing = 1, median = 20
    let ds = Dataset::from_records([
        country("A1", "Europe", Some(1.0)),
        country("A2", "Europe", Some(2.0)),
        country("A3", "Europe", Some(3.0)),
        country("A4", "Europe", Some(4.0)),
        country("B1", "Asia", Some(10.0)),
        country("B2", "Asia", None),
        country("B3", "Asia", Some(30.0)),
    ]);
    let got = grouped_by_region(&ds, Metric::NetConsumption, 2018);
    assert_eq!(got.len(), 2);

    let asia = &got[0];
    assert_eq!(
        asia.key,
        GroupKey {
            region: "Asia".into(),
            metric: Metric::NetConsumption
        }
    );
    assert_eq!(asia.count, 2);
    assert_eq!(asia.missing, 1);
    assert!((asia.median.unwrap() - 20.0).abs() < 1e-9);

    let europe = &got[1];
    assert_eq!(europe.count, 4);
    assert_eq!(europe.missing, 0);
    assert_eq!(europe.min, Some(1.0));
    assert_eq!(europe.max, Some(4.0));
    assert!((europe.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((europe.median.unwrap() - 2.5).abs() < 1e-9);

    let all = metric_summary(&ds, Metric::NetConsumption, 2018);
    assert_eq!(all.key.region, ALL_REGIONS);
    assert_eq!(all.count, 6);
    assert_eq!(all.missing, 1);
    assert_eq!(all.max, Some(30.0));
}

#[test]
fn empty_year_has_no_values() {
    let ds = Dataset::from_records([country("A1", "Europe", Some(1.0))]);
    let s = metric_summary(&ds, Metric::NetConsumption, 1990);
    assert_eq!(s.count, 0);
    assert_eq!(s.missing, 1);
    assert_eq!(s.mean, None);
    assert_eq!(s.median, None);
}
