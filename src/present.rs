//! Presentation adapter: turns snapshots and the current selection into the
//! plain values each widget renders. Pure functions, no hidden state.

use crate::dashboard::Dashboard;
use crate::format::{format_count, format_delta, format_magnitude};
use crate::models::{History, LatLng, Metric, RegionStat, Totals, Viewport};
use crate::store::CountryOption;
use chrono::NaiveDate;
use serde::Serialize;

/// Colour and circle scale per metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStyle {
    pub hex: &'static str,
    pub rgb: (u8, u8, u8),
    pub multiplier: f64,
}

pub const FILL_OPACITY: f32 = 0.4;

pub fn metric_style(metric: Metric) -> MetricStyle {
    match metric {
        Metric::Cases => MetricStyle {
            hex: "#CC1034",
            rgb: (204, 16, 52),
            multiplier: 200.0,
        },
        Metric::Recovered => MetricStyle {
            hex: "#7dd71d",
            rgb: (125, 215, 29),
            multiplier: 300.0,
        },
        Metric::Deaths => MetricStyle {
            hex: "#fb4443",
            rgb: (251, 68, 67),
            multiplier: 500.0,
        },
    }
}

/// Circle radius in metres for `value` of `metric`. Negative values draw nothing.
pub fn circle_radius(value: i64, metric: Metric) -> f64 {
    (value.max(0) as f64).sqrt() * metric_style(metric).multiplier
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub flag_url: String,
    pub name: String,
    pub cases: String,
    pub recovered: String,
    pub deaths: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleSpec {
    pub region_code: String,
    pub center: LatLng,
    /// Metres on the ground.
    pub radius: f64,
    pub color: &'static str,
    pub rgb: (u8, u8, u8),
    pub fill_opacity: f32,
    pub popup: Popup,
}

pub fn derive_map_overlay(records: &[RegionStat], metric: Metric) -> Vec<CircleSpec> {
    let style = metric_style(metric);
    records
        .iter()
        .map(|r| CircleSpec {
            region_code: r.region_code.clone(),
            center: r.coordinates,
            radius: circle_radius(r.value(metric), metric),
            color: style.hex,
            rgb: style.rgb,
            fill_opacity: FILL_OPACITY,
            popup: Popup {
                flag_url: r.flag_url.clone(),
                name: r.region_name.clone(),
                cases: format_count(r.totals.cases),
                recovered: format_count(r.totals.recovered),
                deaths: format_count(r.totals.deaths),
            },
        })
        .collect()
}

/// One info box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub metric: Metric,
    pub title: &'static str,
    /// Today's change, e.g. `"+1.5k"`.
    pub delta: String,
    /// Cumulative total, e.g. `"2.3m"`.
    pub total: String,
    pub is_red: bool,
    pub active: bool,
}

fn counter_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Cases => "Coronavirus Cases",
        Metric::Recovered => "Recovered",
        Metric::Deaths => "Deaths",
    }
}

/// Counters for cases, recovered and deaths, in that order. Before any data
/// has arrived every counter shows `"+0"` / `"0.0"`.
pub fn derive_counters(totals: Option<&Totals>, active: Metric) -> [Counter; 3] {
    Metric::ALL.map(|metric| Counter {
        metric,
        title: counter_title(metric),
        delta: format_delta(totals.and_then(|t| t.today(metric))),
        total: format_magnitude(totals.map(|t| t.total(metric))),
        is_red: metric != Metric::Recovered,
        active: metric == active,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub code: String,
    pub name: String,
    pub cases: String,
}

pub fn derive_table(ranked: &[RegionStat]) -> Vec<TableRow> {
    ranked
        .iter()
        .map(|r| TableRow {
            code: r.region_code.clone(),
            name: r.region_name.clone(),
            cases: format_count(r.totals.cases),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphPoint {
    pub date: NaiveDate,
    pub value: i64,
}

/// Daily new values of `metric`: each date minus the date before it. The
/// first date only seeds the difference.
pub fn derive_graph(history: &History, metric: Metric) -> Vec<GraphPoint> {
    let mut last: Option<i64> = None;
    let mut out = Vec::new();
    for (&date, &cumulative) in history.series(metric) {
        if let Some(prev) = last {
            out.push(GraphPoint {
                date,
                value: cumulative - prev,
            });
        }
        last = Some(cumulative);
    }
    out
}

/// Everything the widgets need for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub counters: [Counter; 3],
    pub table: Vec<TableRow>,
    pub overlay: Vec<CircleSpec>,
    pub graph: Vec<GraphPoint>,
    pub graph_title: String,
    pub viewport: Viewport,
    pub options: Vec<CountryOption>,
    pub notice: Option<String>,
}

pub fn derive_view(dashboard: &Dashboard) -> DashboardView {
    let store = dashboard.store();
    let metric = dashboard.selection().metric;
    DashboardView {
        counters: derive_counters(dashboard.counter_totals(), metric),
        table: derive_table(store.ranked()),
        overlay: derive_map_overlay(store.countries(), metric),
        graph: dashboard
            .history()
            .map(|h| derive_graph(h, metric))
            .unwrap_or_default(),
        graph_title: format!("Worldwide new {metric}"),
        viewport: dashboard.viewport(),
        options: store.options().to_vec(),
        notice: dashboard.notice().map(str::to_string),
    }
}
