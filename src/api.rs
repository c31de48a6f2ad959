//! Synchronous client for the **disease.sh** COVID-19 API (v3).
//!
//! Every endpoint returns a complete snapshot, so there is no pagination and
//! no merging: one request, one decoded value. Responses are validated at the
//! boundary and turned into the tidy types of [`crate::models`].
//!
//! ### Notes
//! - Failed requests are reported once; there is no retry or backoff.
//! - Country list entries without an ISO2 code (cruise ships and similar) are
//!   skipped with a warning rather than failing the whole list.
//! - Requests time out after 30s. Point the client at another server (a mirror
//!   or a local fixture server) with `COVID_API_BASE` or [`Client::with_base_url`].
//!
//! Typical usage:
//! ```no_run
//! # use covid_tracker::{Client, StatsSource};
//! let client = Client::new()?;
//! let world = client.global()?;
//! let countries = client.countries()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
use crate::error::{DecodeError, FetchError};
use crate::models::{
    GlobalSnapshot, History, RawCountryHistory, RawStats, RawTimeline, Region, RegionDetail,
    RegionStat,
};
use log::{debug, info, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://disease.sh";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "COVID_API_BASE";

/// Days of history requested for the line graph.
pub const DEFAULT_HISTORY_DAYS: u32 = 120;

/// Where snapshots come from.
///
/// [`Client`] talks to the real API; tests and the dispatcher only depend on
/// this trait.
pub trait StatsSource {
    /// `GET /v3/covid-19/all`
    fn global(&self) -> Result<GlobalSnapshot, FetchError>;

    /// `GET /v3/covid-19/countries`
    fn countries(&self) -> Result<Vec<RegionStat>, FetchError>;

    /// `GET /v3/covid-19/countries/{code}`
    fn country(&self, code: &str) -> Result<RegionStat, FetchError>;

    /// `GET /v3/covid-19/historical/{all|code}?lastdays={n}`
    fn history(&self, region: &Region, last_days: u32) -> Result<History, FetchError>;

    /// The detail record for a selection: the global aggregate for
    /// "worldwide", the country record otherwise.
    fn detail(&self, region: &Region) -> Result<RegionDetail, FetchError> {
        match region {
            Region::Worldwide => self.global().map(RegionDetail::Worldwide),
            Region::Country(code) => self.country(code).map(RegionDetail::Country),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

// Country codes go into the URL path; everything but - _ . is escaped.
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(part: &str) -> String {
    percent_encoding::utf8_percent_encode(part.trim(), SAFE).to_string()
}

impl Client {
    /// Client for [`DEFAULT_BASE_URL`], or `$COVID_API_BASE` when set.
    pub fn new() -> Result<Self, FetchError> {
        let base = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("covid_tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Network {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { base_url, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v3/covid-19/{}", self.base_url, path)
    }

    /// GET `url` and return the body of a 2xx response.
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        info!("GET {url}");
        let network = |source| FetchError::Network {
            url: url.to_string(),
            source,
        };
        let resp = self.http.get(url).send().map_err(network)?;
        let status = resp.status();
        let body = resp.text().map_err(network)?;
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }
        debug!("GET {url} -> {} bytes", body.len());
        Ok(body)
    }

    fn get_decoded<T>(
        &self,
        url: String,
        decode: impl FnOnce(&str) -> Result<T, DecodeError>,
    ) -> Result<T, FetchError> {
        let body = self.get_text(&url)?;
        decode(&body).map_err(|source| FetchError::Malformed { url, source })
    }
}

impl StatsSource for Client {
    fn global(&self) -> Result<GlobalSnapshot, FetchError> {
        self.get_decoded(self.url("all"), decode_global)
    }

    fn countries(&self) -> Result<Vec<RegionStat>, FetchError> {
        self.get_decoded(self.url("countries"), decode_countries)
    }

    fn country(&self, code: &str) -> Result<RegionStat, FetchError> {
        self.get_decoded(self.url(&format!("countries/{}", enc(code))), decode_country)
    }

    fn history(&self, region: &Region, last_days: u32) -> Result<History, FetchError> {
        let target = match region {
            Region::Worldwide => "all".to_string(),
            Region::Country(code) => enc(code),
        };
        let url = self.url(&format!("historical/{target}?lastdays={last_days}"));
        self.get_decoded(url, |body| decode_history(body, region))
    }
}

/// Pull the `message` field out of an error body, if it has one.
fn upstream_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    v.get("message")?.as_str().map(str::to_string)
}

/// Decode the `/all` payload.
pub fn decode_global(body: &str) -> Result<GlobalSnapshot, DecodeError> {
    let raw: RawStats = serde_json::from_str(body)?;
    GlobalSnapshot::try_from(raw)
}

/// Decode a `/countries/{code}` payload.
pub fn decode_country(body: &str) -> Result<RegionStat, DecodeError> {
    let raw: RawStats = serde_json::from_str(body)?;
    RegionStat::try_from(raw)
}

/// Decode the `/countries` payload.
///
/// A record without an ISO2 code cannot be selected or looked up, so it is
/// dropped; any other missing field fails the whole list.
pub fn decode_countries(body: &str) -> Result<Vec<RegionStat>, DecodeError> {
    let raws: Vec<RawStats> = serde_json::from_str(body)?;
    let mut out = Vec::with_capacity(raws.len());
    for raw in raws {
        match RegionStat::try_from(raw) {
            Ok(stat) => out.push(stat),
            Err(DecodeError::MissingField {
                field: "countryInfo.iso2",
                context,
            }) => warn!("skipping {context}: no ISO2 code"),
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// Decode a `/historical/...` payload. Worldwide returns the timeline at the
/// top level, countries wrap it in `{country, timeline}`.
pub fn decode_history(body: &str, region: &Region) -> Result<History, DecodeError> {
    let timeline: RawTimeline = match region {
        Region::Worldwide => serde_json::from_str(body)?,
        Region::Country(code) => {
            let wrapper: RawCountryHistory = serde_json::from_str(body)?;
            wrapper.timeline.ok_or_else(|| {
                let name = wrapper.country.unwrap_or_else(|| code.clone());
                DecodeError::missing("timeline", format!("history of `{name}`"))
            })?
        }
    };
    History::try_from(timeline)
}
