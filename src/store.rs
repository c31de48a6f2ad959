//! In-memory holder of the latest fetched snapshots.
//!
//! Each slot is replaced wholesale; a failed refresh leaves the previous
//! contents in place.

use crate::api::StatsSource;
use crate::error::FetchError;
use crate::models::{GlobalSnapshot, RegionDetail, RegionStat};
use crate::rank::rank_by_cases;
use ahash::AHashMap;
use log::info;
use serde::{Deserialize, Serialize};

/// One entry of the region dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOption {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    global: Option<GlobalSnapshot>,
    countries: Vec<RegionStat>,
    ranked: Vec<RegionStat>,
    options: Vec<CountryOption>,
    by_code: AHashMap<String, usize>,
    detail: Option<RegionDetail>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> Option<&GlobalSnapshot> {
        self.global.as_ref()
    }

    /// Country list in upstream order.
    pub fn countries(&self) -> &[RegionStat] {
        &self.countries
    }

    /// Country list ranked by cases.
    pub fn ranked(&self) -> &[RegionStat] {
        &self.ranked
    }

    pub fn options(&self) -> &[CountryOption] {
        &self.options
    }

    pub fn detail(&self) -> Option<&RegionDetail> {
        self.detail.as_ref()
    }

    /// Case-insensitive lookup by ISO2 code.
    pub fn country(&self, code: &str) -> Option<&RegionStat> {
        self.by_code
            .get(&code.to_ascii_uppercase())
            .map(|&i| &self.countries[i])
    }

    pub fn replace_global(&mut self, snapshot: GlobalSnapshot) {
        self.global = Some(snapshot);
    }

    /// Replace the country list and rebuild everything derived from it.
    pub fn replace_countries(&mut self, countries: Vec<RegionStat>) {
        self.options = countries
            .iter()
            .map(|c| CountryOption {
                code: c.region_code.clone(),
                name: c.region_name.clone(),
            })
            .collect();
        self.by_code = countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.region_code.to_ascii_uppercase(), i))
            .collect();
        self.ranked = rank_by_cases(&countries);
        self.countries = countries;
    }

    pub fn replace_detail(&mut self, detail: RegionDetail) {
        self.detail = Some(detail);
    }

    /// Fetch the global aggregate and replace that slot.
    pub fn refresh_global<S: StatsSource + ?Sized>(&mut self, source: &S) -> Result<(), FetchError> {
        let snapshot = source.global()?;
        self.replace_global(snapshot);
        Ok(())
    }

    /// Fetch the country list and replace that slot.
    pub fn refresh_countries<S: StatsSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<(), FetchError> {
        let countries = source.countries()?;
        info!("loaded {} countries", countries.len());
        self.replace_countries(countries);
        Ok(())
    }
}
