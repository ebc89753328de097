use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Field, Record, VehicleDataset};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a registration dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one vehicle per row (the published dataset)
/// * `.json`    – `[{ "Make": "...", ... }, ...]` or `{ "data": [...] }`
/// * `.parquet` – one column per field; non-string columns are stringified
///
/// A file that cannot be opened fails with
/// [`DashboardError::SourceUnavailable`].
pub fn load_file(path: &Path) -> Result<VehicleDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::open(path).map_err(|e| DashboardError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let dataset = match ext.as_str() {
        "csv" => load_csv(file).context("loading CSV")?,
        "json" => load_json(file).context("loading JSON")?,
        "parquet" | "pq" => load_parquet(file).context("loading parquet")?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    info!(
        "loaded {} records ({} known columns) from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(dataset)
}

/// Resolve source headers to known fields, logging the ones we drop.
fn map_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> (Vec<Option<Field>>, Vec<Field>) {
    let mut mapping = Vec::new();
    let mut columns = Vec::new();
    for header in headers {
        let field = Field::from_column(header);
        match field {
            Some(f) if !columns.contains(&f) => columns.push(f),
            Some(_) => {}
            None => debug!("ignoring unknown column '{header}'"),
        }
        mapping.push(field);
    }
    (mapping, columns)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every cell kept as raw text.
/// Short rows leave the trailing fields absent; blank lines are skipped.
pub fn load_csv<R: Read>(reader: R) -> Result<VehicleDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let (mapping, columns) = map_headers(headers.iter());

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let record: Record = row
            .iter()
            .zip(&mapping)
            .filter_map(|(value, field)| field.map(|f| (f, value.to_string())))
            .collect();
        records.push(record);
    }

    Ok(VehicleDataset::new(records, columns))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema, records-oriented:
///
/// ```json
/// [
///   { "VIN (1-10)": "5YJ3E1EB4L", "Make": "TESLA", "Model Year": "2020", ... },
///   ...
/// ]
/// ```
///
/// The same array wrapped as `{ "data": [...] }` is accepted too.
/// Numbers and booleans are stringified; `null` leaves the field absent.
pub fn load_json<R: Read>(reader: R) -> Result<VehicleDataset> {
    let root: JsonValue = serde_json::from_reader(reader).context("parsing JSON")?;

    let rows = match &root {
        JsonValue::Array(rows) => rows,
        JsonValue::Object(obj) => obj
            .get("data")
            .and_then(JsonValue::as_array)
            .context("Expected a top-level array or a 'data' array")?,
        _ => bail!("Expected a top-level array or a 'data' array"),
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut columns: Vec<Field> = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut record = Record::new();
        for (key, val) in obj {
            let Some(field) = Field::from_column(key) else {
                continue;
            };
            if let Some(text) = json_to_text(val) {
                record.set(field, text);
                if !columns.contains(&field) {
                    columns.push(field);
                }
            }
        }
        records.push(record);
    }

    Ok(VehicleDataset::new(records, columns))
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Utf8 columns are kept verbatim; any other Arrow type goes through Arrow's
/// display formatter, so an Int64 `Model Year` of 2020 reads as `"2020"`.
/// Null cells leave the field absent.
pub fn load_parquet(file: File) -> Result<VehicleDataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let (mapping, columns) = map_headers(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    );
    let reader = builder.build().context("building parquet reader")?;

    let options = FormatOptions::default();
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let formatters = batch
            .columns()
            .iter()
            .zip(&mapping)
            .filter_map(|(col, field)| field.map(|f| (f, col)))
            .map(|(f, col)| {
                ArrayFormatter::try_new(col.as_ref(), &options)
                    .map(|fmt| (f, col, fmt))
                    .with_context(|| format!("formatting column '{f}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let record: Record = formatters
                .iter()
                .filter(|(_, col, _)| !col.is_null(row))
                .map(|(f, _, fmt)| (*f, fmt.value(row).to_string()))
                .collect();
            records.push(record);
        }
    }

    Ok(VehicleDataset::new(records, columns))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field as ArrowField, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    #[test]
    fn csv_keeps_raw_strings_and_aliases_vin() {
        let csv = "VIN (1-10),County,City,Model Year,Make,Electric Range,Postal Code\n\
                   5YJ3E1EB4L,King,Seattle,2020,TESLA,322,98101\n\
                   \n\
                   1N4AZ0CP8D,King,Kent,2013,NISSAN,,98031\n";
        let ds = load_csv(csv.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.columns,
            vec![
                Field::Vin,
                Field::County,
                Field::City,
                Field::ModelYear,
                Field::Make,
                Field::ElectricRange
            ]
        );
        assert_eq!(ds.records[0].get(Field::Vin), "5YJ3E1EB4L");
        assert_eq!(ds.records[1].get(Field::ElectricRange), "");
        assert_eq!(ds.records[1].electric_range(), None);
    }

    #[test]
    fn csv_short_rows_leave_fields_absent() {
        let csv = "Make,Model,County\nTOYOTA,PRIUS PRIME\n";
        let ds = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].get(Field::Model), "PRIUS PRIME");
        assert!(ds.records[0].is_blank(Field::County));
    }

    #[test]
    fn json_accepts_wrapped_array_and_stringifies() {
        let json = r#"{ "data": [
            { "Make": "KIA", "Model Year": 2022, "Electric Range": null, "State": "WA" }
        ] }"#;
        let ds = load_json(json.as_bytes()).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.get(Field::Make), "KIA");
        assert_eq!(rec.get(Field::ModelYear), "2022");
        assert!(rec.is_blank(Field::ElectricRange));
    }

    #[test]
    fn json_rejects_non_object_rows() {
        assert!(load_json("[1, 2]".as_bytes()).is_err());
        assert!(load_json(r#"{ "rows": [] }"#.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn parquet_columns_are_stringified() {
        let schema = Arc::new(Schema::new(vec![
            ArrowField::new("Make", DataType::Utf8, true),
            ArrowField::new("Model Year", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("FORD"), None])),
                Arc::new(Int64Array::from(vec![Some(2021), Some(2018)])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("ev_dashboard_loader_{}.parquet", std::process::id()));
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.columns, vec![Field::Make, Field::ModelYear]);
        assert_eq!(ds.records[0].get(Field::Make), "FORD");
        assert_eq!(ds.records[0].get(Field::ModelYear), "2021");
        assert!(ds.records[1].is_blank(Field::Make));
        assert_eq!(ds.records[1].get(Field::ModelYear), "2018");
    }
}
