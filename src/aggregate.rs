//! Per-user metrics derived from activation and chaser records.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::elevation::SummitElevations;
use crate::error::{Result, UnwrappedError};
use crate::models::{
    round_to, ActivationRecord, Axis, BusiestMonth, CategoryCount, CategoryScheme, ChaserContact,
    Distribution, QsoStats, Role, Season,
};
use crate::normalize::parse_activation_date;

/// Contacts a record contributes to one category label.
pub trait Tally {
    fn tally(&self, axis: Axis, label: &str) -> u64;
}

impl Tally for ActivationRecord {
    fn tally(&self, axis: Axis, label: &str) -> u64 {
        let counts = match axis {
            Axis::Band => &self.band_qsos,
            Axis::Mode => &self.mode_qsos,
        };
        counts.get(label).copied().unwrap_or(0)
    }
}

impl Tally for ChaserContact {
    fn tally(&self, axis: Axis, label: &str) -> u64 {
        let value = match axis {
            Axis::Band => self.band.as_deref(),
            Axis::Mode => self.mode.as_deref(),
        };
        u64::from(value == Some(label))
    }
}

/// Highest season running total across the activations.
///
/// Each upstream record already carries the cumulative total, so the
/// maximum is the season total; summing would count points repeatedly.
pub fn total_score(records: &[ActivationRecord]) -> Result<i64> {
    records
        .iter()
        .map(|record| record.total)
        .max()
        .ok_or(UnwrappedError::EmptyInput)
}

/// Activation with the most contacts; the earliest wins a tie.
pub fn best_activation(records: &[ActivationRecord]) -> Result<&ActivationRecord> {
    let mut best: Option<&ActivationRecord> = None;
    for record in records {
        if best.map_or(true, |current| record.qsos.unwrap_or(0) > current.qsos.unwrap_or(0)) {
            best = Some(record);
        }
    }
    best.ok_or(UnwrappedError::EmptyInput)
}

pub fn record_count<T>(records: &[T]) -> usize {
    records.len()
}

pub fn busiest_month(records: &[ActivationRecord]) -> Option<BusiestMonth> {
    // First date seen for each (year, month) and its count, in order of appearance.
    let mut counts: Vec<(NaiveDate, usize)> = Vec::new();

    for raw in records.iter().filter_map(|r| r.activation_date.as_deref()) {
        let date = match parse_activation_date(raw) {
            Ok(date) => date,
            Err(err) => {
                debug!(error = %err, "skipping activation date");
                continue;
            }
        };
        let month = (date.year(), date.month());
        match counts.iter_mut().find(|(seen, _)| (seen.year(), seen.month()) == month) {
            Some(entry) => entry.1 += 1,
            None => counts.push((date, 1)),
        }
    }

    let mut winner: Option<(NaiveDate, usize)> = None;
    for &entry in &counts {
        if winner.map_or(true, |(_, best)| entry.1 > best) {
            winner = Some(entry);
        }
    }

    winner.map(|(date, count)| BusiestMonth {
        label: date.format("%B %Y").to_string(),
        season: Season::from_month(date.month()),
        count,
    })
}

pub fn per_band_distribution<R: Tally>(records: &[R], role: Role) -> Distribution {
    distribution(records, role.band_scheme())
}

pub fn per_mode_distribution<R: Tally>(records: &[R], role: Role) -> Distribution {
    distribution(records, role.mode_scheme())
}

/// Sums every label of `scheme` across the records, keeping non-zero rows
/// in the scheme's order.
pub fn distribution<R: Tally>(records: &[R], scheme: &CategoryScheme) -> Distribution {
    let rows: Vec<CategoryCount> = scheme
        .labels
        .iter()
        .map(|label| CategoryCount {
            label: (*label).to_string(),
            count: records.iter().map(|r| r.tally(scheme.axis, label)).sum(),
        })
        .filter(|row| row.count > 0)
        .collect();

    let mut top: Option<&CategoryCount> = None;
    for row in &rows {
        if top.map_or(true, |best| row.count > best.count) {
            top = Some(row);
        }
    }
    let top = top.cloned();

    Distribution { rows, top }
}

/// Contact totals over the activations that report a count.
///
/// Records without `QSOs` are skipped; if none report one the average is
/// undefined and `DivisionUndefined` is returned.
pub fn qso_stats(records: &[ActivationRecord]) -> Result<QsoStats> {
    let reported: Vec<u64> = records.iter().filter_map(|r| r.qsos).collect();
    if reported.is_empty() {
        return Err(UnwrappedError::DivisionUndefined);
    }

    let qso_total: u64 = reported.iter().sum();
    let activation_count = reported.len();
    Ok(QsoStats {
        qso_total,
        activation_count,
        average: round_to(qso_total as f64 / activation_count as f64, 2),
    })
}

pub fn total_elevation_gain<E: SummitElevations + ?Sized>(
    records: &[ActivationRecord],
    elevations: &E,
) -> i64 {
    records
        .iter()
        .filter_map(|r| r.summit_code.as_deref())
        .map(|code| elevations.elevation_m(code))
        .sum()
}

pub fn unique_summit_count(contacts: &[ChaserContact]) -> usize {
    contacts
        .iter()
        .filter_map(|c| c.summit_code.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Chaser points are per contact, so they add up.
pub fn total_points(contacts: &[ChaserContact]) -> i64 {
    contacts.iter().map(|c| c.points).sum()
}
