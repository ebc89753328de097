use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::Field;

/// Failures reported by the aggregation engine and the record source.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Distinct values were requested for a column that has no filter control.
    #[error("invalid filter field '{0}': use 'County', 'City', or 'Model Year'")]
    InvalidField(Field),

    /// A mode-based metric was asked for on zero records.
    #[error("no maximum exists: the record set is empty")]
    EmptyDataset,

    #[error("record source unavailable at {}: {reason}", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
