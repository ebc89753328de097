/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → VehicleDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ VehicleDataset  │  Vec<Record>, known columns
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply County / City / Model Year selection → records
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
