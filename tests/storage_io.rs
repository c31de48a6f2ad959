mod common;

use covid_tracker::api::decode_countries;
use covid_tracker::rank::rank_by_cases;
use covid_tracker::storage::{save_csv, save_json};
use tempfile::tempdir;

#[test]
fn csv_export_has_header_and_ranked_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("countries.csv");
    let ranked = rank_by_cases(&decode_countries(common::COUNTRIES_JSON).unwrap());
    save_csv(&ranked, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("code,country,cases,today_cases"));
    assert!(lines[2].starts_with("ES,Spain,1500,0,"));
    assert!(lines[3].starts_with("AD,Andorra,500,3,"));
    // absent today figures stay empty
    assert!(lines[1].starts_with("FR,France,1500,20,1200,,100,2,"));
}

#[test]
fn json_export_round_trips_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("countries.json");
    let records = decode_countries(common::COUNTRIES_JSON).unwrap();
    save_json(&records, &path).unwrap();

    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["region_code"], "AD");
    assert_eq!(arr[1]["totals"]["today_deaths"], 2);
    assert!(arr[0]["totals"]["today_deaths"].is_null());
}
