//! The dashboard state container.
//!
//! All mutation goes through [`Dashboard::apply`] (fetch results, metric
//! changes) and [`Dashboard::select_region`] (user picks a region). Both are
//! meant to be called from the interaction thread; fetches themselves may run
//! anywhere and come back as [`StateEvent`]s.

use crate::api::StatsSource;
use crate::error::FetchError;
use crate::models::{GlobalSnapshot, History, Metric, Region, RegionDetail, RegionStat, Totals, Viewport};
use crate::selection::{RegionSelector, RequestTicket, Selection};
use crate::store::SnapshotStore;
use log::{debug, warn};

/// A discrete state transition.
#[derive(Debug)]
pub enum StateEvent {
    GlobalFetched(Result<GlobalSnapshot, FetchError>),
    CountriesFetched(Result<Vec<RegionStat>, FetchError>),
    DetailFetched {
        ticket: RequestTicket,
        result: Result<RegionDetail, FetchError>,
    },
    HistoryFetched(Result<History, FetchError>),
    MetricChanged(Metric),
}

/// What [`Dashboard::apply`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// Result for a superseded selection; dropped without a notice.
    Stale,
    /// Fetch failed; prior state kept and a notice set.
    Failed,
}

/// Which fetch a failure notice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Global,
    Countries,
    History,
    Detail,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    store: SnapshotStore,
    selector: RegionSelector,
    history: Option<History>,
    /// Outstanding failures, oldest first. At most one entry per slot.
    notices: Vec<(Slot, String)>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        self.selector.selection()
    }

    pub fn viewport(&self) -> Viewport {
        self.selector.viewport()
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// Most recent failure message among the slots whose last fetch failed.
    pub fn notice(&self) -> Option<&str> {
        self.notices.last().map(|(_, text)| text.as_str())
    }

    /// Failure message for one slot, if its last fetch failed.
    pub fn notice_for(&self, slot: Slot) -> Option<&str> {
        self.notices
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, text)| text.as_str())
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.clear();
    }

    /// Totals behind the counters: the selected region's detail once it has
    /// arrived, the global aggregate before that.
    pub fn counter_totals(&self) -> Option<&Totals> {
        match self.store.detail() {
            Some(detail) => Some(detail.totals()),
            None => self.store.global().map(|g| &g.totals),
        }
    }

    /// Record a new selection. The caller issues the request named by the
    /// returned ticket and feeds its result back as
    /// [`StateEvent::DetailFetched`].
    pub fn select_region(&mut self, region: Region) -> RequestTicket {
        self.selector.select_region(region)
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.selector.set_metric(metric);
    }

    pub fn apply(&mut self, event: StateEvent) -> Applied {
        match event {
            StateEvent::GlobalFetched(result) => self.settle(Slot::Global, result, |d, snapshot| {
                d.store.replace_global(snapshot)
            }),
            StateEvent::CountriesFetched(result) => {
                self.settle(Slot::Countries, result, |d, list| d.store.replace_countries(list))
            }
            StateEvent::HistoryFetched(result) => {
                self.settle(Slot::History, result, |d, history| d.history = Some(history))
            }
            StateEvent::DetailFetched { ticket, result } => {
                if !self.selector.is_current(&ticket) {
                    debug!("discarding stale result for {} (#{})", ticket.region, ticket.seq);
                    return Applied::Stale;
                }
                self.settle(Slot::Detail, result, |d, detail| {
                    d.selector.focus(&detail);
                    d.store.replace_detail(detail);
                })
            }
            StateEvent::MetricChanged(metric) => {
                self.set_metric(metric);
                Applied::Updated
            }
        }
    }

    /// A success clears only its own slot's notice; a failure replaces it.
    fn settle<T>(
        &mut self,
        slot: Slot,
        result: Result<T, FetchError>,
        update: impl FnOnce(&mut Self, T),
    ) -> Applied {
        self.notices.retain(|(s, _)| *s != slot);
        match result {
            Ok(value) => {
                update(self, value);
                Applied::Updated
            }
            Err(e) => {
                warn!("{e}");
                self.notices.push((slot, e.notice()));
                Applied::Failed
            }
        }
    }

    /// Blocking initial load: global totals, country list and `history_days`
    /// of worldwide history, each applied independently.
    pub fn load<S: StatsSource + ?Sized>(&mut self, source: &S, history_days: u32) -> Vec<Applied> {
        vec![
            self.apply(StateEvent::GlobalFetched(source.global())),
            self.apply(StateEvent::CountriesFetched(source.countries())),
            self.apply(StateEvent::HistoryFetched(
                source.history(&Region::Worldwide, history_days),
            )),
        ]
    }

    /// Blocking region change: select, fetch the detail and apply it.
    pub fn select_and_fetch<S: StatsSource + ?Sized>(
        &mut self,
        source: &S,
        region: Region,
    ) -> Applied {
        let ticket = self.select_region(region);
        let result = source.detail(&ticket.region);
        self.apply(StateEvent::DetailFetched { ticket, result })
    }
}
