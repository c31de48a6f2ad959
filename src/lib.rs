//! covid_tracker
//!
//! A small Rust library for fetching COVID-19 snapshots from the public
//! disease.sh API and turning them into dashboard widgets. Pairs with the
//! `covid` CLI and the `covid-gui` desktop dashboard.
//!
//! ### Pipeline
//! - Fetch the global aggregate, the per-country list and the worldwide history
//! - Rank countries by cases for the table
//! - Track the selected region, active metric and map viewport; results for a
//!   superseded selection are discarded (last request issued wins)
//! - Derive counters, table rows, map circles and graph points
//!
//! ### Example
//! ```no_run
//! use covid_tracker::{Client, Dashboard, Region};
//! use covid_tracker::present::derive_view;
//!
//! let client = Client::new()?;
//! let mut dash = Dashboard::new();
//! dash.load(&client, covid_tracker::api::DEFAULT_HISTORY_DAYS);
//! dash.select_and_fetch(&client, Region::parse("FR"));
//! let view = derive_view(&dash);
//! for c in &view.counters {
//!     println!("{}: {} today, {} total", c.title, c.delta, c.total);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod dashboard;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod models;
pub mod present;
pub mod rank;
pub mod selection;
pub mod storage;
pub mod store;
pub mod viz;

pub use api::{Client, StatsSource};
pub use dashboard::{Applied, Dashboard, Slot, StateEvent};
pub use error::{DecodeError, FetchError};
pub use models::{GlobalSnapshot, LatLng, Metric, Region, RegionDetail, RegionStat, Totals, Viewport};
