use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexSet;

use super::model::{Field, FilterField, Record};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per filterable column
// ---------------------------------------------------------------------------

/// Per-column selection state for the County / City / Model Year dropdowns.
///
/// An empty (or missing) set means the column is unrestricted: every record
/// passes that column's test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeMap<FilterField, BTreeSet<String>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection for `field`.
    pub fn select<I, S>(&mut self, field: FilterField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected
            .insert(field, values.into_iter().map(Into::into).collect());
    }

    /// Tick or untick a single value, as the checkbox dropdown does.
    pub fn toggle(&mut self, field: FilterField, value: &str) {
        let selected = self.selected.entry(field).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn clear(&mut self, field: FilterField) {
        self.selected.remove(&field);
    }

    pub fn selected(&self, field: FilterField) -> Option<&BTreeSet<String>> {
        self.selected.get(&field).filter(|s| !s.is_empty())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    /// AND across columns, membership within a column.
    pub fn matches(&self, record: &Record) -> bool {
        FilterField::ALL.iter().all(|&field| match self.selected(field) {
            None => true,
            Some(allowed) => allowed.contains(record.get(field.field())),
        })
    }
}

/// Free-function form of [`SelectionState::matches`].
pub fn matches(record: &Record, selection: &SelectionState) -> bool {
    selection.matches(record)
}

/// Records passing every active filter, in input order.
pub fn filter_records(records: &[Record], selection: &SelectionState) -> Vec<Record> {
    if selection.is_unrestricted() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|rec| selection.matches(rec))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Distinct values for dropdown population
// ---------------------------------------------------------------------------

/// Non-empty values of `field` in first-occurrence order.
pub fn distinct_values(records: &[Record], field: FilterField) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for rec in records {
        let value = rec.get(field.field());
        if !value.is_empty() {
            seen.insert(value);
        }
    }
    seen.into_iter().map(str::to_string).collect()
}

/// Like [`distinct_values`], for a field chosen at runtime. Columns without
/// a filter control fail with `InvalidField`.
pub fn distinct_values_for(records: &[Record], field: Field) -> Result<Vec<String>> {
    let field = FilterField::try_from(field)?;
    Ok(distinct_values(records, field))
}
