//! Which region is selected, which metric is active, and where the map looks.

use crate::models::{Metric, Region, RegionDetail, Viewport};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub region: Region,
    pub metric: Metric,
}

/// Identifies one detail request issued by [`RegionSelector::select_region`].
///
/// Only the ticket with the highest sequence number is current; results
/// carrying any older ticket are stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub region: Region,
}

#[derive(Debug, Clone)]
pub struct RegionSelector {
    selection: Selection,
    viewport: Viewport,
    seq: u64,
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionSelector {
    pub fn new() -> Self {
        Self {
            selection: Selection::default(),
            viewport: Viewport::WORLD,
            seq: 0,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Switch to `region` and return the ticket for the request that must be
    /// issued: the global aggregate for worldwide, the country record otherwise.
    pub fn select_region(&mut self, region: Region) -> RequestTicket {
        self.seq += 1;
        debug!("select {region} (request #{})", self.seq);
        self.selection.region = region.clone();
        RequestTicket {
            seq: self.seq,
            region,
        }
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.selection.metric = metric;
    }

    /// True when `ticket` belongs to the most recently issued request.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.seq == self.seq
    }

    /// Move the map to wherever `detail` should be shown.
    pub fn focus(&mut self, detail: &RegionDetail) {
        self.viewport = detail.viewport();
    }
}
