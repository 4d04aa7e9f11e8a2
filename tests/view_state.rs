use energy_mix::models::CountryRecord;
use energy_mix::view::{DEFAULT_YEAR, KOREA};
use energy_mix::{Dataset, View, ViewState};
use std::collections::BTreeMap;

fn dataset(n: usize) -> Dataset {
    let mut records: Vec<CountryRecord> = (0..n)
        .map(|i| CountryRecord {
            name: format!("Country {:02}", i),
            region: "Nowhere".into(),
            net_generation: BTreeMap::from([(2018, 10.0)]),
            net_consumption: BTreeMap::from([(2018, 1000.0 - i as f64)]),
            ..Default::default()
        })
        .collect();
    records.push(CountryRecord {
        name: "United States".into(),
        region: "North America".into(),
        ..Default::default()
    });
    Dataset::from_records(records)
}

#[test]
fn starts_on_the_world_view() {
    let v = ViewState::new();
    assert_eq!(v.view, View::World);
    assert_eq!(v.year, DEFAULT_YEAR);
    assert_eq!(v.ranking_limit(), Some(30));
}

#[test]
fn korea_opens_its_own_view() {
    let mut v = ViewState::new();
    v.select_country(KOREA);
    assert_eq!(v.view, View::Korea);
    assert_eq!(v.selected_country.as_deref(), Some(KOREA));

    v.select_country("");
    assert_eq!(v.view, View::World);
    assert_eq!(v.selected_country, None);

    let ds = dataset(3);
    assert!(v.click_country(KOREA, &ds));
    assert_eq!(v.view, View::Korea);
    v.show_world();
    assert_eq!(v.view, View::World);
}

#[test]
fn clicking_a_country_opens_details() {
    let ds = dataset(3);
    let mut v = ViewState::new();
    assert!(v.click_country("United States of America", &ds));
    assert_eq!(v.detail_country.as_deref(), Some("United States"));
    assert_eq!(v.view, View::World);

    assert!(!v.click_country("Atlantis", &ds));
    assert_eq!(v.detail_country.as_deref(), Some("United States"));

    v.close_detail();
    assert_eq!(v.detail_country, None);
}

#[test]
fn year_is_clamped_to_the_data() {
    let mut v = ViewState::new();
    v.set_year(2030, Some((2000, 2021)));
    assert_eq!(v.year, 2021);
    v.set_year(1950, Some((2000, 2021)));
    assert_eq!(v.year, 2000);
    v.set_year(1950, None);
    assert_eq!(v.year, 1950);
}

#[test]
fn show_all_reveals_hidden_countries() {
    let ds = dataset(35);
    let mut v = ViewState::new();
    assert!(v.hidden_from_ranking("Country 33", &ds));
    assert!(!v.hidden_from_ranking("Country 03", &ds));
    assert!(!v.hidden_from_ranking("Atlantis", &ds));
    assert_eq!(ds.consumption_ranking(v.year, v.ranking_limit()).len(), 30);

    v.toggle_show_all();
    assert_eq!(v.ranking_limit(), None);
    assert!(!v.hidden_from_ranking("Country 33", &ds));
    assert_eq!(ds.consumption_ranking(v.year, v.ranking_limit()).len(), 35);
}
