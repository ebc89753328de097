/// Aggregations over an already-filtered record slice.
///
/// Every function here is pure: it reads the records and returns a fresh
/// result, so they can run in any order.

pub mod series;
pub mod summary;

use serde::Serialize;

use crate::data::model::Record;
use series::{ManufacturerShare, YearRange, YearTypeCounts};

/// Every aggregate the dashboard shows, for one filtered view.
///
/// Mode metrics and the average range have no value on an empty view and
/// are `None` there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_vehicles: usize,
    pub top_brand: Option<String>,
    pub most_popular_model: Option<String>,
    pub average_range: Option<f64>,
    pub by_manufacturer: Vec<ManufacturerShare>,
    pub adoption_by_year: Vec<YearTypeCounts>,
    pub growth_by_year: Vec<YearTypeCounts>,
    pub range_by_year: Vec<YearRange>,
}

impl Dashboard {
    pub fn compute(records: &[Record]) -> Self {
        let non_empty = !records.is_empty();
        Dashboard {
            total_vehicles: summary::total_vehicles(records),
            top_brand: summary::top_brand(records).ok(),
            most_popular_model: summary::most_popular_model(records).ok(),
            average_range: non_empty.then(|| summary::average_range(records)),
            by_manufacturer: series::by_manufacturer(records),
            adoption_by_year: series::adoption_by_year(records),
            growth_by_year: series::growth_by_year(records),
            range_by_year: series::range_by_year(records),
        }
    }
}
