use indexmap::IndexMap;
use serde::Serialize;

use super::summary::count_by;
use crate::color::{manufacturer_color, to_hex};
use crate::data::model::{Field, Record, VehicleType, parse_int};

/// One slice of the manufacturer chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerShare {
    /// Lower-cased display label.
    pub manufacturer: String,
    pub count: usize,
    /// `#rrggbb`
    pub color: String,
}

/// BEV / PHEV registrations for one model year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearTypeCounts {
    pub year: String,
    pub bev: usize,
    pub phev: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub year: String,
    pub avg_range: i64,
}

/// Registrations per `Make`, in first-seen order, coloured by position.
///
/// Counting is case-sensitive; only the emitted label is lower-cased.
pub fn by_manufacturer(records: &[Record]) -> Vec<ManufacturerShare> {
    count_by(records, Field::Make)
        .into_iter()
        .enumerate()
        .map(|(index, (make, count))| ManufacturerShare {
            manufacturer: make.to_lowercase(),
            count,
            color: to_hex(manufacturer_color(index)),
        })
        .collect()
}

fn bucket_types<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<YearTypeCounts> {
    let mut years: IndexMap<&str, YearTypeCounts> = IndexMap::new();
    for rec in records {
        let year = rec.get(Field::ModelYear);
        let bucket = years.entry(year).or_insert_with(|| YearTypeCounts {
            year: year.to_string(),
            ..Default::default()
        });
        match rec.vehicle_type() {
            VehicleType::Bev => bucket.bev += 1,
            VehicleType::Phev => bucket.phev += 1,
            VehicleType::Other => {}
        }
    }
    years.into_values().collect()
}

/// BEV / PHEV counts per model year, in first-seen year order.
///
/// Every record opens a bucket for its year, including a blank year, even
/// when its type is neither BEV nor PHEV.
pub fn adoption_by_year(records: &[Record]) -> Vec<YearTypeCounts> {
    bucket_types(records)
}

/// Same as [`adoption_by_year`] but records with a blank `Model Year` or
/// `Electric Vehicle Type` are skipped entirely.
pub fn growth_by_year(records: &[Record]) -> Vec<YearTypeCounts> {
    bucket_types(records.iter().filter(|r| {
        !r.is_blank(Field::ModelYear) && !r.is_blank(Field::ElectricVehicleType)
    }))
}

/// Mean `Electric Range` per model year, rounded, ascending by numeric year.
///
/// Records with a blank year or an unparseable range are left out of both
/// sum and count. Years that do not parse as numbers sort after the rest,
/// in first-seen order.
pub fn range_by_year(records: &[Record]) -> Vec<YearRange> {
    let mut buckets: IndexMap<&str, (f64, usize)> = IndexMap::new();
    for rec in records {
        let year = rec.get(Field::ModelYear);
        let Some(range) = rec.electric_range() else {
            continue;
        };
        if year.is_empty() {
            continue;
        }
        let (total, count) = buckets.entry(year).or_insert((0.0, 0));
        *total += range as f64;
        *count += 1;
    }

    let mut out: Vec<YearRange> = buckets
        .into_iter()
        .map(|(year, (total, count))| YearRange {
            year: year.to_string(),
            avg_range: (total / count as f64).round() as i64,
        })
        .collect();
    // Stable sort keeps first-seen order among equal or unparseable keys.
    out.sort_by_key(|row| match parse_int(&row.year) {
        Some(y) => (0, y),
        None => (1, 0),
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{BEV_LABEL, PHEV_LABEL};

    fn ev(year: &str, kind: &str, range: &str) -> Record {
        Record::new()
            .with(Field::ModelYear, year)
            .with(Field::ElectricVehicleType, kind)
            .with(Field::ElectricRange, range)
    }

    fn row(year: &str, bev: usize, phev: usize) -> YearTypeCounts {
        YearTypeCounts {
            year: year.to_string(),
            bev,
            phev,
        }
    }

    #[test]
    fn manufacturers_keep_first_seen_order_and_lowercase() {
        let records: Vec<Record> = ["TESLA", "NISSAN", "TESLA", "Tesla"]
            .into_iter()
            .map(|m| Record::new().with(Field::Make, m))
            .collect();
        let shares = by_manufacturer(&records);

        let labels: Vec<(&str, usize)> = shares
            .iter()
            .map(|s| (s.manufacturer.as_str(), s.count))
            .collect();
        assert_eq!(labels, vec![("tesla", 2), ("nissan", 1), ("tesla", 1)]);
        assert_eq!(shares[0].color, "#d92626");
        assert_eq!(shares[1].color, "#26d959");
        assert_eq!(shares[2].color, "#8b26d9");
    }

    #[test]
    fn adoption_buckets_by_first_seen_year() {
        let records = vec![
            ev("2021", PHEV_LABEL, ""),
            ev("2020", BEV_LABEL, ""),
            ev("2021", BEV_LABEL, ""),
            ev("2020", "Hydrogen", ""),
        ];
        assert_eq!(
            adoption_by_year(&records),
            vec![row("2021", 1, 1), row("2020", 1, 0)]
        );
    }

    #[test]
    fn adoption_keeps_blank_buckets_growth_skips_them() {
        let records = vec![
            ev("2020", BEV_LABEL, ""),
            ev("", PHEV_LABEL, ""),
            ev("2019", "", ""),
        ];
        assert_eq!(
            adoption_by_year(&records),
            vec![row("2020", 1, 0), row("", 0, 1), row("2019", 0, 0)]
        );
        assert_eq!(growth_by_year(&records), vec![row("2020", 1, 0)]);
    }

    #[test]
    fn range_by_year_sorts_and_excludes_bad_ranges() {
        let records = vec![
            ev("2021", BEV_LABEL, "25"),
            ev("2020", BEV_LABEL, "250"),
            ev("2020", BEV_LABEL, ""),
            ev("2020", BEV_LABEL, "abc"),
            ev("2018", BEV_LABEL, "100"),
            ev("2018", BEV_LABEL, "101"),
            ev("", BEV_LABEL, "300"),
        ];
        let out = range_by_year(&records);
        let pairs: Vec<(&str, i64)> = out.iter().map(|r| (r.year.as_str(), r.avg_range)).collect();
        assert_eq!(pairs, vec![("2018", 101), ("2020", 250), ("2021", 25)]);
    }

    #[test]
    fn range_by_year_reads_leading_digits() {
        let records = vec![ev("2020", BEV_LABEL, "250 mi"), ev("2020", BEV_LABEL, "25.9")];
        let out = range_by_year(&records);
        assert_eq!(out, vec![YearRange { year: "2020".into(), avg_range: 138 }]);
    }

    #[test]
    fn range_by_year_survives_huge_ranges() {
        let records = vec![
            ev("2020", BEV_LABEL, "9223372036854775807"),
            ev("2020", BEV_LABEL, "1"),
        ];
        let out = range_by_year(&records);
        assert_eq!(out.len(), 1);
        assert!(out[0].avg_range > 4_000_000_000_000_000_000);
    }

    #[test]
    fn range_by_year_sorts_numerically() {
        let records = vec![ev("10000", BEV_LABEL, "1"), ev("999", BEV_LABEL, "2")];
        let years: Vec<String> = range_by_year(&records).into_iter().map(|r| r.year).collect();
        assert_eq!(years, vec!["999", "10000"]);
    }
}
