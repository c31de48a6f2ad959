//! Whole pipeline over the three-country fixture: load, rank, select, derive.

mod common;

use common::FixtureSource;
use covid_tracker::present::{derive_counters, derive_view};
use covid_tracker::rank::rank_by_cases;
use covid_tracker::{Applied, Dashboard, Metric, Region, RegionDetail, StatsSource};

#[test]
fn lowest_case_country_is_ranked_last() {
    let source = FixtureSource::new();
    let countries = source.countries().unwrap();
    assert_eq!(
        countries.iter().map(|c| c.totals.cases).collect::<Vec<_>>(),
        vec![500, 1500, 1500]
    );
    let ranked = rank_by_cases(&countries);
    assert_eq!(ranked.last().unwrap().region_code, "AD");
}

#[test]
fn counter_for_absent_today_deaths_is_plus_zero() {
    let source = FixtureSource::new();
    let spain = source.country("ES").unwrap();
    assert_eq!(spain.totals.today_deaths, None);
    let counters = derive_counters(Some(&spain.totals), Metric::Cases);
    assert_eq!(counters[2].delta, "+0");
    assert_eq!(counters[2].total, "120.0");
    assert_eq!(counters[1].delta, "+5.0");
}

#[test]
fn store_lookup_and_table_after_load() {
    let source = FixtureSource::new();
    let mut dash = Dashboard::new();
    dash.load(&source, 3);

    let store = dash.store();
    assert_eq!(store.country("fr").unwrap().region_name, "France");
    assert!(store.country("XX").is_none());
    assert_eq!(
        store.options().iter().map(|o| o.code.as_str()).collect::<Vec<_>>(),
        vec!["AD", "FR", "ES"]
    );

    let view = derive_view(&dash);
    // equal cases keep upstream order
    assert_eq!(
        view.table.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["France", "Spain", "Andorra"]
    );
}

#[test]
fn switching_region_updates_counters() {
    let source = FixtureSource::new();
    let mut dash = Dashboard::new();
    dash.load(&source, 3);
    assert_eq!(derive_view(&dash).counters[0].total, "500.0m");

    assert_eq!(dash.select_and_fetch(&source, Region::parse("FR")), Applied::Updated);
    let view = derive_view(&dash);
    assert_eq!(view.counters[0].total, "1.5k");
    assert_eq!(view.counters[0].delta, "+20.0");
    assert_eq!(view.counters[2].delta, "+2.0");
    assert_eq!(view.viewport.zoom, 4);

    dash.select_and_fetch(&source, Region::Worldwide);
    assert!(matches!(dash.store().detail(), Some(RegionDetail::Worldwide(_))));
    assert_eq!(derive_view(&dash).counters[0].total, "500.0m");
}
