use crate::error::DecodeError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Which statistic drives colours, circle sizes and the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cases,
    Recovered,
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Cases, Metric::Recovered, Metric::Deaths];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Recovered => "recovered",
            Metric::Deaths => "deaths",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cases" => Ok(Metric::Cases),
            "recovered" => Ok(Metric::Recovered),
            "deaths" => Ok(Metric::Deaths),
            other => Err(format!(
                "unknown metric `{other}` (expected cases, recovered or deaths)"
            )),
        }
    }
}

/// "worldwide" or one country, identified by its ISO2 code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Worldwide,
    Country(String),
}

impl Region {
    pub const WORLDWIDE: &'static str = "worldwide";

    /// Parse a dropdown value. Anything other than "worldwide" is a country code.
    pub fn parse(value: &str) -> Region {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(Self::WORLDWIDE) {
            Region::Worldwide
        } else {
            Region::Country(value.to_string())
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Region::Worldwide => Self::WORLDWIDE,
            Region::Country(code) => code,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Map centre and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewport {
    /// Initial view showing the Atlantic with both Americas and Europe/Africa.
    pub const WORLD: Viewport = Viewport {
        center: LatLng {
            lat: 34.80746,
            lng: -40.4796,
        },
        zoom: 3,
    };

    pub const COUNTRY_ZOOM: u8 = 4;

    pub fn focus(center: LatLng) -> Self {
        Viewport {
            center,
            zoom: Self::COUNTRY_ZOOM,
        }
    }

    /// Screen pixels per degree of longitude for a canvas `width` pixels wide.
    ///
    /// Zoom 3 shows roughly 90° across the canvas; every step halves that.
    pub fn px_per_degree(&self, width: f32) -> f32 {
        let span_deg = 720.0 / 2f32.powi(i32::from(self.zoom));
        width / span_deg
    }

    /// Equirectangular projection of `p` into a `width`×`height` canvas whose
    /// centre shows `self.center`.
    pub fn project(&self, p: LatLng, width: f32, height: f32) -> (f32, f32) {
        let k = self.px_per_degree(width);
        let x = width / 2.0 + (p.lng - self.center.lng) as f32 * k;
        let y = height / 2.0 - (p.lat - self.center.lat) as f32 * k;
        (x, y)
    }

    /// Convert a ground distance in metres to screen pixels at this zoom.
    pub fn meters_to_px(&self, meters: f64, width: f32) -> f32 {
        (meters / METERS_PER_DEGREE) as f32 * self.px_per_degree(width)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::WORLD
    }
}

const METERS_PER_DEGREE: f64 = 111_320.0;

/// Cumulative counts shared by global and per-country records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub cases: i64,
    pub today_cases: Option<i64>,
    pub recovered: i64,
    pub today_recovered: Option<i64>,
    pub deaths: i64,
    pub today_deaths: Option<i64>,
}

impl Totals {
    pub fn total(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Cases => self.cases,
            Metric::Recovered => self.recovered,
            Metric::Deaths => self.deaths,
        }
    }

    pub fn today(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Cases => self.today_cases,
            Metric::Recovered => self.today_recovered,
            Metric::Deaths => self.today_deaths,
        }
    }
}

/// Per-country snapshot as used by the table, map and dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStat {
    pub region_code: String,
    pub region_name: String,
    pub totals: Totals,
    pub coordinates: LatLng,
    pub flag_url: String,
}

impl RegionStat {
    pub fn value(&self, metric: Metric) -> i64 {
        self.totals.total(metric)
    }
}

/// Worldwide aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSnapshot {
    pub totals: Totals,
    pub updated: Option<DateTime<Utc>>,
    pub affected_countries: Option<u32>,
}

/// The record behind the counters: whatever the current selection resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionDetail {
    Worldwide(GlobalSnapshot),
    Country(RegionStat),
}

impl RegionDetail {
    pub fn totals(&self) -> &Totals {
        match self {
            RegionDetail::Worldwide(g) => &g.totals,
            RegionDetail::Country(c) => &c.totals,
        }
    }

    pub fn region(&self) -> Region {
        match self {
            RegionDetail::Worldwide(_) => Region::Worldwide,
            RegionDetail::Country(c) => Region::Country(c.region_code.clone()),
        }
    }

    /// Where the map should look once this record is shown.
    pub fn viewport(&self) -> Viewport {
        match self {
            RegionDetail::Worldwide(_) => Viewport::WORLD,
            RegionDetail::Country(c) => Viewport::focus(c.coordinates),
        }
    }
}

/// Daily cumulative series, ordered by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    pub cases: BTreeMap<NaiveDate, i64>,
    pub recovered: BTreeMap<NaiveDate, i64>,
    pub deaths: BTreeMap<NaiveDate, i64>,
}

impl History {
    pub fn series(&self, metric: Metric) -> &BTreeMap<NaiveDate, i64> {
        match metric {
            Metric::Cases => &self.cases,
            Metric::Recovered => &self.recovered,
            Metric::Deaths => &self.deaths,
        }
    }
}

/// Raw record from `/all`, `/countries` and `/countries/{code}`.
///
/// Every field is optional here; [`RegionStat::try_from`] and
/// [`GlobalSnapshot::try_from`] decide which ones are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    pub country: Option<String>,
    pub country_info: Option<RawCountryInfo>,
    pub cases: Option<i64>,
    pub today_cases: Option<i64>,
    pub recovered: Option<i64>,
    pub today_recovered: Option<i64>,
    pub deaths: Option<i64>,
    pub today_deaths: Option<i64>,
    /// Epoch milliseconds.
    pub updated: Option<i64>,
    pub affected_countries: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCountryInfo {
    pub iso2: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub flag: Option<String>,
}

impl RawStats {
    fn totals(&self, context: &str) -> Result<Totals, DecodeError> {
        Ok(Totals {
            cases: self.cases.ok_or_else(|| DecodeError::missing("cases", context))?,
            today_cases: self.today_cases,
            recovered: self
                .recovered
                .ok_or_else(|| DecodeError::missing("recovered", context))?,
            today_recovered: self.today_recovered,
            deaths: self
                .deaths
                .ok_or_else(|| DecodeError::missing("deaths", context))?,
            today_deaths: self.today_deaths,
        })
    }
}

impl TryFrom<RawStats> for GlobalSnapshot {
    type Error = DecodeError;

    fn try_from(raw: RawStats) -> Result<Self, Self::Error> {
        let totals = raw.totals("global totals")?;
        Ok(GlobalSnapshot {
            totals,
            updated: raw.updated.and_then(DateTime::from_timestamp_millis),
            affected_countries: raw.affected_countries,
        })
    }
}

impl TryFrom<RawStats> for RegionStat {
    type Error = DecodeError;

    fn try_from(raw: RawStats) -> Result<Self, Self::Error> {
        let name = raw
            .country
            .clone()
            .ok_or_else(|| DecodeError::missing("country", "country record"))?;
        let context = format!("country `{name}`");
        let totals = raw.totals(&context)?;
        let info = raw
            .country_info
            .ok_or_else(|| DecodeError::missing("countryInfo", context.as_str()))?;
        let code = info
            .iso2
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| DecodeError::missing("countryInfo.iso2", context.as_str()))?;
        let lat = info
            .lat
            .ok_or_else(|| DecodeError::missing("countryInfo.lat", context.as_str()))?;
        let lng = info
            .long
            .ok_or_else(|| DecodeError::missing("countryInfo.long", context.as_str()))?;
        Ok(RegionStat {
            region_code: code,
            region_name: name,
            totals,
            coordinates: LatLng { lat, lng },
            flag_url: info.flag.unwrap_or_default(),
        })
    }
}

/// Raw `timeline` object: `"m/d/yy"` keys to cumulative counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTimeline {
    pub cases: Option<HashMap<String, i64>>,
    pub recovered: Option<HashMap<String, i64>>,
    pub deaths: Option<HashMap<String, i64>>,
}

/// Raw `/historical/{code}` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCountryHistory {
    pub country: Option<String>,
    pub timeline: Option<RawTimeline>,
}

const TIMELINE_DATE_FORMAT: &str = "%m/%d/%y";

fn parse_series(raw: HashMap<String, i64>) -> Result<BTreeMap<NaiveDate, i64>, DecodeError> {
    raw.into_iter()
        .map(|(k, v)| {
            NaiveDate::parse_from_str(&k, TIMELINE_DATE_FORMAT)
                .map(|d| (d, v))
                .map_err(|_| DecodeError::Date(k))
        })
        .collect()
}

impl TryFrom<RawTimeline> for History {
    type Error = DecodeError;

    fn try_from(raw: RawTimeline) -> Result<Self, Self::Error> {
        let cases = raw
            .cases
            .ok_or_else(|| DecodeError::missing("cases", "timeline"))?;
        let deaths = raw
            .deaths
            .ok_or_else(|| DecodeError::missing("deaths", "timeline"))?;
        Ok(History {
            cases: parse_series(cases)?,
            // Upstream stopped publishing recoveries for some regions.
            recovered: parse_series(raw.recovered.unwrap_or_default())?,
            deaths: parse_series(deaths)?,
        })
    }
}
