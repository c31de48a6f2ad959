mod common;

use chrono::NaiveDate;
use covid_tracker::api::{decode_countries, decode_country, decode_global, decode_history};
use covid_tracker::{DecodeError, FetchError, Region};

#[test]
fn parse_global_snapshot() {
    let g = decode_global(common::GLOBAL_JSON).unwrap();
    assert_eq!(g.totals.cases, 500_000_000);
    assert_eq!(g.totals.today_cases, Some(1500));
    assert_eq!(g.totals.today_deaths, Some(0));
    assert_eq!(g.affected_countries, Some(228));
    assert_eq!(g.updated.unwrap().timestamp_millis(), 1_650_000_000_000);
}

#[test]
fn parse_country_list_keeps_upstream_order() {
    let list = decode_countries(common::COUNTRIES_JSON).unwrap();
    let codes: Vec<&str> = list.iter().map(|c| c.region_code.as_str()).collect();
    assert_eq!(codes, vec!["AD", "FR", "ES"]);

    let fr = &list[1];
    assert_eq!(fr.region_name, "France");
    assert_eq!(fr.coordinates.lat, 46.0);
    assert_eq!(fr.coordinates.lng, 2.0);
    assert_eq!(fr.totals.today_deaths, Some(2));
    assert_eq!(fr.totals.today_recovered, None);
    assert!(fr.flag_url.ends_with("fr.png"));
}

#[test]
fn country_without_iso2_is_skipped() {
    let body = r#"[
      {"country":"MS Zaandam","countryInfo":{"_id":null,"iso2":null,"lat":0,"long":0,"flag":"x.png"},
       "cases":9,"deaths":2,"recovered":0},
      {"country":"France","countryInfo":{"iso2":"FR","lat":46,"long":2,"flag":"fr.png"},
       "cases":1,"deaths":0,"recovered":0}
    ]"#;
    let list = decode_countries(body).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].region_code, "FR");
}

#[test]
fn country_without_country_info_is_malformed() {
    let body = r#"{"country":"France","cases":1,"deaths":0,"recovered":0}"#;
    let err = decode_country(body).unwrap_err();
    assert_eq!(
        err,
        DecodeError::MissingField {
            field: "countryInfo",
            context: "country `France`".into()
        }
    );

    // One broken record fails the whole list rather than leaking half-filled rows.
    let list = format!("[{body}]");
    assert!(decode_countries(&list).is_err());
}

#[test]
fn missing_totals_are_rejected() {
    let err = decode_global(r#"{"cases": 10, "deaths": 1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField { field: "recovered", .. }));
    assert!(matches!(decode_global("not json"), Err(DecodeError::Json(_))));
}

#[test]
fn worldwide_history_is_date_ordered() {
    let h = decode_history(common::HISTORY_JSON, &Region::Worldwide).unwrap();
    let dates: Vec<NaiveDate> = h.cases.keys().copied().collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2022, 1, 30).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 31).unwrap(),
            NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(),
        ]
    );
    assert_eq!(h.deaths.values().copied().collect::<Vec<_>>(), vec![10, 11, 11]);
}

#[test]
fn country_history_is_unwrapped_and_recovered_is_optional() {
    let body = r#"{"country":"France","province":["mainland"],
      "timeline":{"cases":{"3/1/23":5,"3/2/23":8},"deaths":{"3/1/23":0,"3/2/23":1}}}"#;
    let h = decode_history(body, &Region::Country("FR".into())).unwrap();
    assert_eq!(h.cases.len(), 2);
    assert!(h.recovered.is_empty());

    let err = decode_history(r#"{"country":"France"}"#, &Region::Country("FR".into())).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField { field: "timeline", .. }));
}

#[test]
fn bad_timeline_date_is_reported() {
    let body = r#"{"cases":{"yesterday":1},"deaths":{}}"#;
    assert_eq!(
        decode_history(body, &Region::Worldwide).unwrap_err(),
        DecodeError::Date("yesterday".into())
    );
}

#[test]
fn fetch_error_notices_are_short() {
    let e = FetchError::Status {
        url: "https://disease.sh/v3/covid-19/countries/XX".into(),
        status: 404,
        message: Some("Country not found or doesn't have any cases".into()),
    };
    assert_eq!(
        e.notice(),
        "Upstream error (404): Country not found or doesn't have any cases"
    );
    assert!(e.to_string().contains("HTTP 404"));

    let m = FetchError::Malformed {
        url: "u".into(),
        source: DecodeError::Json("eof".into()),
    };
    assert_eq!(m.notice(), "Unexpected data: invalid json: eof");
}
