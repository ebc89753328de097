use log::debug;

use crate::data::filter::{SelectionState, distinct_values, filter_records};
use crate::data::model::{FilterField, Record, VehicleDataset};
use crate::metrics::Dashboard;

/// A loaded dataset plus the current filter selection.
///
/// The filtered view is recomputed on every selection change; nothing else
/// is cached.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    dataset: VehicleDataset,
    selection: SelectionState,
    visible: Vec<Record>,
}

impl DashboardState {
    /// Ingest a loaded dataset with no filters applied.
    pub fn new(dataset: VehicleDataset) -> Self {
        let visible = dataset.records.clone();
        DashboardState {
            dataset,
            selection: SelectionState::new(),
            visible,
        }
    }

    pub fn dataset(&self) -> &VehicleDataset {
        &self.dataset
    }

    /// Records passing the current selection.
    pub fn visible(&self) -> &[Record] {
        &self.visible
    }

    /// Dropdown options, drawn from the whole dataset rather than the view.
    pub fn options(&self, field: FilterField) -> Vec<String> {
        distinct_values(&self.dataset.records, field)
    }

    pub fn select<I, S>(&mut self, field: FilterField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.select(field, values);
        self.refilter();
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, field: FilterField, value: &str) {
        self.selection.toggle(field, value);
        self.refilter();
    }

    pub fn clear_filter(&mut self, field: FilterField) {
        self.selection.clear(field);
        self.refilter();
    }

    /// Aggregates for the current view.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::compute(&self.visible)
    }

    fn refilter(&mut self) {
        self.visible = filter_records(&self.dataset.records, &self.selection);
        debug!(
            "selection matched {} of {} records",
            self.visible.len(),
            self.dataset.len()
        );
    }
}
