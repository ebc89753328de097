use std::collections::BTreeMap;
use std::fmt;

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Field – the closed set of columns the engine understands
// ---------------------------------------------------------------------------

/// A known column of the registration dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Vin,
    County,
    City,
    ModelYear,
    Make,
    Model,
    ElectricVehicleType,
    ElectricRange,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Vin,
        Field::County,
        Field::City,
        Field::ModelYear,
        Field::Make,
        Field::Model,
        Field::ElectricVehicleType,
        Field::ElectricRange,
    ];

    /// Canonical column header.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Vin => "VIN",
            Field::County => "County",
            Field::City => "City",
            Field::ModelYear => "Model Year",
            Field::Make => "Make",
            Field::Model => "Model",
            Field::ElectricVehicleType => "Electric Vehicle Type",
            Field::ElectricRange => "Electric Range",
        }
    }

    /// Map a source header to a field. The public dataset truncates VINs
    /// and labels the column `VIN (1-10)`.
    pub fn from_column(header: &str) -> Option<Field> {
        let header = header.trim();
        if header == "VIN (1-10)" {
            return Some(Field::Vin);
        }
        Field::ALL
            .into_iter()
            .find(|f| f.column_name() == header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// FilterField – columns that have a dropdown filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    County,
    City,
    ModelYear,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::County, FilterField::City, FilterField::ModelYear];

    pub fn field(self) -> Field {
        match self {
            FilterField::County => Field::County,
            FilterField::City => Field::City,
            FilterField::ModelYear => Field::ModelYear,
        }
    }
}

impl From<FilterField> for Field {
    fn from(f: FilterField) -> Self {
        f.field()
    }
}

impl TryFrom<Field> for FilterField {
    type Error = DashboardError;

    fn try_from(field: Field) -> Result<Self, Self::Error> {
        match field {
            Field::County => Ok(FilterField::County),
            Field::City => Ok(FilterField::City),
            Field::ModelYear => Ok(FilterField::ModelYear),
            other => Err(DashboardError::InvalidField(other)),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.field().fmt(f)
    }
}

// ---------------------------------------------------------------------------
// VehicleType
// ---------------------------------------------------------------------------

pub const BEV_LABEL: &str = "Battery Electric Vehicle (BEV)";
pub const PHEV_LABEL: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

/// Value of the `Electric Vehicle Type` column. Matching is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Bev,
    Phev,
    Other,
}

impl VehicleType {
    pub fn from_label(label: &str) -> Self {
        match label {
            BEV_LABEL => VehicleType::Bev,
            PHEV_LABEL => VehicleType::Phev,
            _ => VehicleType::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one registration row
// ---------------------------------------------------------------------------

/// One row of the dataset. Every value is the raw string from the source;
/// an absent field reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<Field, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for fixtures.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    /// `true` when the field is absent or holds the empty string.
    pub fn is_blank(&self, field: Field) -> bool {
        self.get(field).is_empty()
    }

    pub fn vehicle_type(&self) -> VehicleType {
        VehicleType::from_label(self.get(Field::ElectricVehicleType))
    }

    /// `Electric Range` as a base-10 integer, `None` when missing or malformed.
    pub fn electric_range(&self) -> Option<i64> {
        parse_int(self.get(Field::ElectricRange))
    }
}

impl FromIterator<(Field, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Leading base-10 integer of `raw`, after trimming whitespace.
///
/// An optional sign and the run of ASCII digits that follows are read; the
/// rest is ignored, so `"250 mi"` is 250 and `"25.9"` is 25. `None` when no
/// digit follows the sign. Values beyond `i64` saturate.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let magnitude = digits[..len].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

// ---------------------------------------------------------------------------
// VehicleDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All records in source order, plus the known columns the source carried.
#[derive(Debug, Clone, Default)]
pub struct VehicleDataset {
    pub records: Vec<Record>,
    /// Known columns present in the source, in header order.
    pub columns: Vec<Field>,
}

impl VehicleDataset {
    pub fn new(records: Vec<Record>, columns: Vec<Field>) -> Self {
        VehicleDataset { records, columns }
    }

    /// Build a dataset from bare records, inferring the column list.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<Field> = Vec::new();
        for rec in &records {
            for field in rec.fields.keys() {
                if !columns.contains(field) {
                    columns.push(*field);
                }
            }
        }
        columns.sort();
        VehicleDataset { records, columns }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_field_reads_as_empty() {
        let rec = Record::new().with(Field::Make, "Tesla");
        assert_eq!(rec.get(Field::Make), "Tesla");
        assert_eq!(rec.get(Field::County), "");
        assert!(rec.is_blank(Field::County));
    }

    #[test]
    fn vin_alias_maps_to_vin() {
        assert_eq!(Field::from_column("VIN (1-10)"), Some(Field::Vin));
        assert_eq!(Field::from_column("Model Year"), Some(Field::ModelYear));
        assert_eq!(Field::from_column("Postal Code"), None);
    }

    #[test]
    fn numeric_fields_parse_on_demand() {
        let rec = Record::new().with(Field::ElectricRange, " 250 ");
        assert_eq!(rec.electric_range(), Some(250));
        assert_eq!(Record::new().electric_range(), None);
    }

    #[test]
    fn parse_int_reads_leading_digits() {
        assert_eq!(parse_int("250 mi"), Some(250));
        assert_eq!(parse_int("25.9"), Some(25));
        assert_eq!(parse_int("  -12abc"), Some(-12));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("n/a"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("99999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn vehicle_type_matches_exactly() {
        assert_eq!(VehicleType::from_label(BEV_LABEL), VehicleType::Bev);
        assert_eq!(VehicleType::from_label(PHEV_LABEL), VehicleType::Phev);
        assert_eq!(VehicleType::from_label("battery electric vehicle (bev)"), VehicleType::Other);
        assert_eq!(Record::new().vehicle_type(), VehicleType::Other);
    }

    #[test]
    fn only_filterable_fields_convert() {
        assert_eq!(FilterField::try_from(Field::City).unwrap(), FilterField::City);
        let err = FilterField::try_from(Field::Make).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidField(Field::Make)));
    }
}
