use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("emix"));
}

#[test]
fn mix_rebalances_unlocked_shares() {
    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args([
        "mix",
        "--shares",
        "fossil=40,nuclear=30,renewable=25,hydro=5",
        "--op",
        "set:fossil=70",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("70.0%"))
        .stdout(predicate::str::contains("15.0%"))
        .stdout(predicate::str::contains("12.5%"));
}

#[test]
fn refused_op_is_reported_not_fatal() {
    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args([
        "mix",
        "--shares",
        "fossil=40,nuclear=30,renewable=25,hydro=5",
        "--op",
        "lock:nuclear",
        "--op",
        "set:fossil=90",
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("No change for set:fossil=90"))
        .stdout(predicate::str::contains("[locked]"))
        .stdout(predicate::str::contains("40.0%"));
}

#[test]
fn unknown_category_fails() {
    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args(["mix", "--op", "set:coal=10"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid category: coal"));
}

#[test]
fn mix_budget_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("estimate.json");
    let saved = dir.path().join("mix.json");
    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args(["mix", "--price", "nuclear=60", "--price", "원자력=60", "--amount", "1000"])
        .arg("--out")
        .arg(&out)
        .arg("--save")
        .arg(&saved);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("억 KRW"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["amount"], 1000.0);
    assert_eq!(v["rows"].as_array().unwrap().len(), 5);

    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args(["mix", "--from"]).arg(&saved);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("71.0%"));
}

#[test]
fn countries_ranks_by_consumption() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    fs::write(
        &data,
        r#"{
            "Germany": { "region": "Europe",
                "net_generation": { "2018": 600 }, "net_consumption": { "2018": 540 } },
            "France": { "region": "Europe",
                "net_generation": { "2018": 550 }, "net_consumption": { "2018": 470 } },
            "Japan": { "region": "Asia & Oceania",
                "net_generation": { "2018": 980 }, "net_consumption": { "2018": "--" } }
        }"#,
    )
    .unwrap();
    let csv_out = dir.path().join("ranking.csv");

    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args(["countries", "--year", "2018", "--stats", "--data"])
        .arg(&data)
        .arg("--out")
        .arg(&csv_out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1. Germany"))
        .stdout(predicate::str::contains("2. France"))
        .stdout(predicate::str::contains("Japan").not());

    let txt = fs::read_to_string(&csv_out).unwrap();
    assert_eq!(txt.lines().count(), 3);
}

#[test]
fn zero_lock_ceiling_refuses_every_move() {
    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args(["mix", "--max-locked", "0", "--op", "set:fossil=50"]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("lock limit reached"))
        .stdout(predicate::str::contains("12.0%"));
}

#[test]
fn korea_prints_actual_mix_and_savings() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("south_korea_energy_production.json"),
        r#"[{ "시점": 2018, "원자력": 30, "신재생에너지": 10, "화석연료": 55, "수력": 1, "기타": 4 }]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("south_korea_electric_save.json"),
        r#"[
            { "구분": "합계", "사용량(kWh)": 900, "감축이후 사용량": 800, "감축가능비율(%)": 11 },
            { "구분": "가정", "사용량(kWh)": 300, "감축이후 사용량": 270, "감축가능비율(%)": 10 },
            { "구분": "산업", "사용량(kWh)": 600, "감축이후 사용량": 530, "감축가능비율(%)": 12 }
        ]"#,
    )
    .unwrap();
    let saved = dir.path().join("actual.json");

    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args(["korea", "--year", "2018", "--dir"])
        .arg(dir.path())
        .arg("--save")
        .arg(&saved);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fossil"))
        .stdout(predicate::str::contains("55.0%"))
        .stdout(predicate::str::contains("산업"))
        .stdout(predicate::str::contains("합계").not());

    let mut cmd = Command::cargo_bin("emix").unwrap();
    cmd.args(["mix", "--from"]).arg(&saved);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("30.0%"));
}
