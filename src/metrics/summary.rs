use std::collections::HashSet;

use indexmap::IndexMap;

use crate::data::model::{Field, Record};
use crate::error::{DashboardError, Result};

/// Number of distinct `VIN` strings. A missing VIN counts once, as `""`.
pub fn total_vehicles(records: &[Record]) -> usize {
    records
        .iter()
        .map(|r| r.get(Field::Vin))
        .collect::<HashSet<_>>()
        .len()
}

/// Occurrences of each value of `field`, in first-seen order.
pub fn count_by(records: &[Record], field: Field) -> IndexMap<&str, usize> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for rec in records {
        *counts.entry(rec.get(field)).or_insert(0) += 1;
    }
    counts
}

/// The most common value of `field`.
///
/// Ties go to the value inserted first. Fails with `EmptyDataset` when
/// there are no records.
pub fn most_frequent(records: &[Record], field: Field) -> Result<String> {
    let counts = count_by(records, field);
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
        .ok_or(DashboardError::EmptyDataset)
}

pub fn top_brand(records: &[Record]) -> Result<String> {
    most_frequent(records, Field::Make)
}

pub fn most_popular_model(records: &[Record]) -> Result<String> {
    most_frequent(records, Field::Model)
}

/// Mean `Electric Range` over every record. Unparseable ranges count as 0
/// but stay in the denominator; empty input yields NaN.
pub fn average_range(records: &[Record]) -> f64 {
    let total: f64 = records
        .iter()
        .map(|r| r.electric_range().unwrap_or(0) as f64)
        .sum();
    total / records.len() as f64
}
