//! Filtering and aggregation engine behind an electric vehicle registration
//! dashboard.
//!
//! Records come from [`data::loader`], are narrowed by a
//! [`data::filter::SelectionState`], and are reduced to summary metrics and
//! per-year series by [`metrics`].

pub mod color;
pub mod data;
pub mod error;
pub mod metrics;
pub mod state;

pub use data::filter::{SelectionState, distinct_values, distinct_values_for, filter_records, matches};
pub use data::model::{Field, FilterField, Record, VehicleDataset, VehicleType};
pub use error::{DashboardError, Result};
pub use metrics::Dashboard;
pub use state::DashboardState;
