use approx::assert_abs_diff_eq;
use energy_mix::korea::{
    self, BALANCE_FILE, ELECTRIC_SAVE_FILE, MONTHLY_PRICE_FILE, PRODUCTION_FILE, PriceSource,
    ProductionYear,
};
use energy_mix::mix::MixConfig;
use energy_mix::{Category, KoreaData};
use std::fs;

const PRODUCTION: &str = r#"[
    { "시점": 2019, "원자력": 145.9, "신재생에너지": 36.4, "화석연료": 373.1, "수력": 6.2, "기타": 1.6 },
    { "시점": "2018", "원자력": 133.5, "신재생에너지": 35.6, "화석연료": 392.6, "수력": 7.3, "기타": "--" }
]"#;

const BALANCE: &str = r#"[
    { "시점": 2019, "생산": 51.2, "순수입": 250.3, "소비": 303.1 },
    { "시점": 2018, "생산": 48.9, "순수입": 259.2, "소비": 307.5 }
]"#;

const PRICES: &str = r#"[
    { "월": 2, "원자력": 65.1, "석탄": 140.2, "유류": 250.0, "LNG": 210.3, "양수": 220.0, "신재생": 180.0, "수력": 150.0 },
    { "월": 1, "원자력": 63.0, "석탄": 138.0, "유류": null, "LNG": 205.0, "양수": 215.0, "신재생": 175.0, "수력": 149.0 }
]"#;

const SAVE: &str = r#"[
    { "구분": "합계", "사용량(kWh)": 1000.0, "감축이후 사용량": 850.0, "감축가능비율(%)": 15, "감축률 설명": "" },
    { "구분": "가정", "사용량(kWh)": 300.0, "감축이후 사용량": 270.0, "감축가능비율(%)": 10, "감축률 설명": "대기전력 차단" },
    { "구분": "산업", "사용량(kWh)": 550.0, "감축이후 사용량": 440.0, "감축가능비율(%)": 20, "감축률 설명": "공정 효율화" },
    { "구분": "상업", "사용량(kWh)": 150.0, "감축이후 사용량": 140.0, "감축가능비율(%)": 6.7 }
]"#;

fn sample() -> KoreaData {
    KoreaData::new(
        korea::parse_rows(PRODUCTION).unwrap(),
        korea::parse_rows(BALANCE).unwrap(),
        korea::parse_rows(PRICES).unwrap(),
        korea::parse_rows(SAVE).unwrap(),
    )
}

#[test]
fn actual_mix_for_a_year() {
    let data = sample();
    assert_eq!(data.production()[0].year, 2018);

    let shares = data.shares_for(2018).unwrap();
    let total = 133.5 + 35.6 + 392.6 + 7.3;
    assert_eq!(shares.len(), 5);
    assert_eq!(shares[0].0, Category::Nuclear);
    assert_abs_diff_eq!(shares[0].1, 133.5 / total * 100.0, epsilon = 1e-9);
    // the "--" placeholder counts as nothing generated
    assert_eq!(shares[4], (Category::Other, 0.0));
    assert_abs_diff_eq!(shares.iter().map(|(_, v)| v).sum::<f64>(), 100.0, epsilon = 1e-9);

    assert!(data.shares_for(1990).is_none());
}

#[test]
fn actual_mix_seeds_the_sliders() {
    let data = sample();
    let mut mix = data
        .production_for(2019)
        .unwrap()
        .to_mix(MixConfig::default())
        .unwrap();
    assert_abs_diff_eq!(mix.total(), 100.0, epsilon = 1e-9);
    assert!(mix.set_share(Category::Renewable, 30.0).unwrap().is_applied());
    assert_abs_diff_eq!(mix.total(), 100.0, epsilon = 0.05);

    let empty = ProductionYear {
        year: 2000,
        ..Default::default()
    };
    assert!(empty.to_mix(MixConfig::default()).is_err());
}

#[test]
fn balance_series_is_ordered() {
    let data = sample();
    let years: Vec<i32> = data.balance().iter().map(|b| b.year).collect();
    assert_eq!(years, [2018, 2019]);
    let b = data.balance_for(2019).unwrap();
    assert_eq!(b.production, Some(51.2));
    assert_eq!(b.net_imports, Some(250.3));
    assert_eq!(b.consumption, Some(303.1));
}

#[test]
fn monthly_prices_sorted_by_month() {
    let data = sample();
    assert_eq!(data.monthly_prices()[0].month, 1);
    assert_eq!(
        data.price_series(PriceSource::Nuclear),
        vec![(1, 63.0), (2, 65.1)]
    );
    assert_eq!(data.price_series(PriceSource::Oil), vec![(2, 250.0)]);
    assert_eq!(PriceSource::Lng.label_ko(), "LNG");
}

#[test]
fn reductions_skip_total_and_sort_by_usage() {
    let data = sample();
    let rows = data.reductions();
    let sectors: Vec<&str> = rows.iter().map(|r| r.sector.as_str()).collect();
    assert_eq!(sectors, ["산업", "가정", "상업"]);
    assert_abs_diff_eq!(rows[0].reduction, 110.0, epsilon = 1e-9);
    assert_eq!(rows[0].reduction_rate, Some(20.0));
    assert_eq!(rows[0].description, "공정 효율화");
    assert_eq!(rows[2].description, "");

    let total = data.reduction_total().unwrap();
    assert_eq!(total.reduction_rate, Some(15.0));
    assert_abs_diff_eq!(total.reduction, 150.0, epsilon = 1e-9);
}

#[test]
fn load_dir_tolerates_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(PRODUCTION_FILE), PRODUCTION).unwrap();
    fs::write(dir.path().join(MONTHLY_PRICE_FILE), PRICES).unwrap();
    fs::write(dir.path().join(ELECTRIC_SAVE_FILE), SAVE).unwrap();

    let data = KoreaData::load_dir(dir.path()).unwrap();
    assert_eq!(data.production().len(), 2);
    assert!(data.balance().is_empty());
    assert_eq!(data.monthly_prices().len(), 2);
    assert_eq!(data.reductions().len(), 3);

    fs::write(dir.path().join(BALANCE_FILE), "{ not json").unwrap();
    let err = KoreaData::load_dir(dir.path()).unwrap_err();
    assert!(format!("{:#}", err).contains(BALANCE_FILE));

    let empty = tempfile::tempdir().unwrap();
    assert!(KoreaData::load_dir(empty.path()).unwrap().is_empty());
}
