//! Ordering of per-country records for the table.
//!
//! The table ranks by cases, largest first, and equal records keep their
//! upstream order. [`rank_by_cases_later_first`] is the literal reading of the
//! dashboard's two-way comparator ("a first if a.cases > b.cases, otherwise
//! b first"), where the later of two equal records wins.

use crate::models::{Metric, RegionStat};
use std::cmp::Ordering;

/// How records with equal values are ordered relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieOrder {
    /// Input order preserved.
    #[default]
    Stable,
    /// Later input record first.
    LaterFirst,
}

/// Copy of `records` ordered by `cases`, largest first, ties in input order.
pub fn rank_by_cases(records: &[RegionStat]) -> Vec<RegionStat> {
    rank_by(records, Metric::Cases, TieOrder::Stable)
}

/// Copy of `records` ordered by `cases`, largest first, later ties first.
pub fn rank_by_cases_later_first(records: &[RegionStat]) -> Vec<RegionStat> {
    rank_by(records, Metric::Cases, TieOrder::LaterFirst)
}

/// Copy of `records` ordered by `metric`, largest first.
///
/// Input positions break ties, so the order is total and deterministic for
/// either [`TieOrder`].
pub fn rank_by(records: &[RegionStat], metric: Metric, ties: TieOrder) -> Vec<RegionStat> {
    let mut indexed: Vec<(usize, &RegionStat)> = records.iter().enumerate().collect();
    indexed.sort_unstable_by(|(ia, a), (ib, b)| {
        b.value(metric)
            .cmp(&a.value(metric))
            .then_with(|| tie_break(*ia, *ib, ties))
    });
    indexed.into_iter().map(|(_, r)| r.clone()).collect()
}

fn tie_break(ia: usize, ib: usize, ties: TieOrder) -> Ordering {
    match ties {
        TieOrder::Stable => ia.cmp(&ib),
        TieOrder::LaterFirst => ib.cmp(&ia),
    }
}
