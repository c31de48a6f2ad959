#![allow(dead_code)]

use covid_tracker::api::{decode_countries, decode_global, decode_history};
use covid_tracker::models::History;
use covid_tracker::{FetchError, GlobalSnapshot, LatLng, Region, RegionStat, StatsSource, Totals};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

pub const GLOBAL_JSON: &str = r#"{
  "updated": 1650000000000,
  "cases": 500000000, "todayCases": 1500,
  "deaths": 6200000, "todayDeaths": 0,
  "recovered": 450000000, "todayRecovered": 2300000,
  "affectedCountries": 228
}"#;

pub const COUNTRIES_JSON: &str = r#"[
  {"country":"Andorra","countryInfo":{"_id":20,"iso2":"AD","iso3":"AND","lat":42.5,"long":1.6,"flag":"https://disease.sh/assets/img/flags/ad.png"},
   "cases":500,"todayCases":3,"deaths":10,"recovered":450,"todayRecovered":1},
  {"country":"France","countryInfo":{"_id":250,"iso2":"FR","iso3":"FRA","lat":46,"long":2,"flag":"https://disease.sh/assets/img/flags/fr.png"},
   "cases":1500,"todayCases":20,"deaths":100,"todayDeaths":2,"recovered":1200},
  {"country":"Spain","countryInfo":{"_id":724,"iso2":"ES","iso3":"ESP","lat":40,"long":-4,"flag":"https://disease.sh/assets/img/flags/es.png"},
   "cases":1500,"todayCases":0,"deaths":120,"recovered":1100,"todayRecovered":5}
]"#;

pub const HISTORY_JSON: &str = r#"{
  "cases": {"1/30/22": 100, "1/31/22": 130, "2/1/22": 190},
  "deaths": {"1/30/22": 10, "1/31/22": 11, "2/1/22": 11},
  "recovered": {"1/30/22": 50, "1/31/22": 70, "2/1/22": 75}
}"#;

pub fn totals(cases: i64, recovered: i64, deaths: i64) -> Totals {
    Totals {
        cases,
        today_cases: None,
        recovered,
        today_recovered: None,
        deaths,
        today_deaths: None,
    }
}

pub fn stat(code: &str, cases: i64) -> RegionStat {
    RegionStat {
        region_code: code.into(),
        region_name: format!("Country {code}"),
        totals: totals(cases, 0, 0),
        coordinates: LatLng { lat: 0.0, lng: 0.0 },
        flag_url: String::new(),
    }
}

pub fn unavailable(path: &str) -> FetchError {
    FetchError::Status {
        url: format!("fixture://{path}"),
        status: 503,
        message: Some("fixture unavailable".into()),
    }
}

/// In-memory [`StatsSource`] serving the JSON fixtures above.
///
/// Per-country delays let tests make an earlier request finish after a later one.
#[derive(Default)]
pub struct FixtureSource {
    pub delays: HashMap<String, Duration>,
    pub failing: AtomicBool,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, region: &str, delay: Duration) -> Self {
        self.delays.insert(region.to_string(), delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn pause(&self, key: &str) {
        if let Some(d) = self.delays.get(key) {
            thread::sleep(*d);
        }
    }

    fn check(&self, path: &str) -> Result<(), FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(unavailable(path))
        } else {
            Ok(())
        }
    }
}

impl StatsSource for FixtureSource {
    fn global(&self) -> Result<GlobalSnapshot, FetchError> {
        self.pause("worldwide");
        self.check("all")?;
        Ok(decode_global(GLOBAL_JSON).unwrap())
    }

    fn countries(&self) -> Result<Vec<RegionStat>, FetchError> {
        self.check("countries")?;
        Ok(decode_countries(COUNTRIES_JSON).unwrap())
    }

    fn country(&self, code: &str) -> Result<RegionStat, FetchError> {
        self.pause(code);
        self.check(&format!("countries/{code}"))?;
        decode_countries(COUNTRIES_JSON)
            .unwrap()
            .into_iter()
            .find(|c| c.region_code.eq_ignore_ascii_case(code))
            .ok_or_else(|| FetchError::Status {
                url: format!("fixture://countries/{code}"),
                status: 404,
                message: Some("Country not found or doesn't have any cases".into()),
            })
    }

    fn history(&self, region: &Region, _last_days: u32) -> Result<History, FetchError> {
        self.check("historical")?;
        decode_history(HISTORY_JSON, &Region::Worldwide).map_err(|source| FetchError::Malformed {
            url: format!("fixture://historical/{region}"),
            source,
        })
    }
}
