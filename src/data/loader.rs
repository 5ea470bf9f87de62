use std::io;
use std::path::Path;

use arrow::array::{Array, AsArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Listing, VehicleDataset};
use super::{DataError, Result};

/// Columns the aggregation layer depends on. Descriptive columns
/// (`model`, `fuel`, `paint_color`, …) may be absent.
const REQUIRED_COLUMNS: [&str; 7] = [
    "price",
    "type",
    "odometer",
    "model_year",
    "condition",
    "days_listed",
    "date_posted",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a vehicle listing dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the `vehicles_us.csv` column set
/// * `.json`    – records-oriented: `[{ "price": 9400, "type": "sedan", ... }, ...]`
/// * `.parquet` – scalar columns with the same names
pub fn load_file(path: &Path) -> Result<VehicleDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Wire record
// ---------------------------------------------------------------------------

/// One row as it appears on disk. Numeric columns that real exports render
/// as floats ("2011.0", "1.0") are read as `f64` and narrowed afterwards.
#[derive(Debug, Deserialize)]
struct ListingRecord {
    price: f64,
    #[serde(default)]
    model_year: Option<f64>,
    #[serde(default)]
    model: Option<String>,
    condition: String,
    #[serde(default)]
    cylinders: Option<f64>,
    #[serde(default)]
    fuel: Option<String>,
    #[serde(default)]
    odometer: Option<f64>,
    #[serde(default)]
    transmission: Option<String>,
    #[serde(rename = "type")]
    vehicle_type: String,
    #[serde(default)]
    paint_color: Option<String>,
    #[serde(default)]
    is_4wd: Option<f64>,
    date_posted: NaiveDate,
    days_listed: i64,
}

impl From<ListingRecord> for Listing {
    fn from(rec: ListingRecord) -> Self {
        Listing {
            price: rec.price,
            model_year: rec.model_year.map(|y| y as i32),
            model: rec.model.filter(|s| !s.is_empty()),
            condition: rec.condition,
            cylinders: rec.cylinders.map(|c| c as i32),
            fuel: rec.fuel.filter(|s| !s.is_empty()),
            odometer: rec.odometer,
            transmission: rec.transmission.filter(|s| !s.is_empty()),
            vehicle_type: rec.vehicle_type,
            paint_color: rec.paint_color.filter(|s| !s.is_empty()),
            is_4wd: rec.is_4wd.map(|v| v != 0.0).unwrap_or(false),
            date_posted: rec.date_posted,
            days_listed: rec.days_listed,
            year_posted: 0,
            month_posted: 0,
        }
        .with_derived_date()
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one listing per row.
/// Empty cells in nullable columns become `None`.
fn load_csv(path: &Path) -> Result<VehicleDataset> {
    if !path.exists() {
        return Err(unavailable(path, io::ErrorKind::NotFound));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    verify_required_columns(&headers)?;

    let mut listings = Vec::new();
    for (row_no, result) in reader.deserialize::<ListingRecord>().enumerate() {
        let record = result.map_err(|e| DataError::BadRecord {
            row: row_no,
            message: e.to_string(),
        })?;
        listings.push(record.into());
    }

    Ok(VehicleDataset::from_listings(listings))
}

fn verify_required_columns(headers: &[String]) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "price": 9400,
///     "type": "sedan",
///     "condition": "good",
///     "odometer": 145000,
///     "date_posted": "2018-06-23",
///     "days_listed": 19
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<VehicleDataset> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::Unavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let records: Vec<ListingRecord> = serde_json::from_str(&text)?;
    Ok(VehicleDataset::from_listings(
        records.into_iter().map(Listing::from).collect(),
    ))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of listings.
///
/// Expected schema: one scalar column per CSV column. `date_posted` may be
/// either Utf8 (ISO date string, as Pandas writes object columns) or Date32.
fn load_parquet(path: &Path) -> Result<VehicleDataset> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Unavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut listings = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result?;

        for column in REQUIRED_COLUMNS {
            if batch.column_by_name(column).is_none() {
                return Err(DataError::MissingColumn(column.to_string()));
            }
        }

        for row in 0..batch.num_rows() {
            let row_no = row_base + row;
            listings.push(listing_from_batch(&batch, row, row_no)?);
        }
        row_base += batch.num_rows();
    }

    Ok(VehicleDataset::from_listings(listings))
}

fn listing_from_batch(batch: &RecordBatch, row: usize, row_no: usize) -> Result<Listing> {
    let price =
        f64_at(batch, "price", row).ok_or_else(|| bad_record(row_no, "null or non-numeric 'price'"))?;
    let vehicle_type =
        utf8_at(batch, "type", row).ok_or_else(|| bad_record(row_no, "null 'type'"))?;
    let condition =
        utf8_at(batch, "condition", row).ok_or_else(|| bad_record(row_no, "null 'condition'"))?;
    let date_posted =
        date_at(batch, "date_posted", row, row_no)?.ok_or_else(|| bad_record(row_no, "null 'date_posted'"))?;
    let days_listed = f64_at(batch, "days_listed", row)
        .ok_or_else(|| bad_record(row_no, "null or non-numeric 'days_listed'"))?
        as i64;

    Ok(Listing {
        price,
        model_year: f64_at(batch, "model_year", row).map(|y| y as i32),
        model: utf8_at(batch, "model", row),
        condition,
        cylinders: f64_at(batch, "cylinders", row).map(|c| c as i32),
        fuel: utf8_at(batch, "fuel", row),
        odometer: f64_at(batch, "odometer", row),
        transmission: utf8_at(batch, "transmission", row),
        vehicle_type,
        paint_color: utf8_at(batch, "paint_color", row),
        is_4wd: f64_at(batch, "is_4wd", row).map(|v| v != 0.0).unwrap_or(false),
        date_posted,
        days_listed,
        year_posted: 0,
        month_posted: 0,
    }
    .with_derived_date())
}

// -- Arrow column helpers --

/// Read a string cell; `None` when the column is absent or the cell is null.
fn utf8_at(batch: &RecordBatch, name: &str, row: usize) -> Option<String> {
    let col = batch.column_by_name(name)?;
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => {
            let a = col.as_string::<i64>();
            Some(a.value(row).to_string())
        }
        _ => None,
    }
}

/// Read a numeric cell as `f64`; accepts the integer and float widths
/// Pandas and Polars actually emit.
fn f64_at(batch: &RecordBatch, name: &str, row: usize) -> Option<f64> {
    let col = batch.column_by_name(name)?;
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    }
}

/// Read a calendar date cell from a Utf8 or Date32 column.
fn date_at(batch: &RecordBatch, name: &str, row: usize, row_no: usize) -> Result<Option<NaiveDate>> {
    let Some(col) = batch.column_by_name(name) else {
        return Ok(None);
    };
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let text = utf8_at(batch, name, row).unwrap_or_default();
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| bad_record(row_no, &format!("'{name}' = '{text}': {e}")))
        }
        DataType::Date32 => {
            let days = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .map(|a| a.value(row))
                .ok_or_else(|| bad_record(row_no, "expected Date32Array"))?;
            // Date32 counts days since the Unix epoch, chrono's NaiveDate default.
            Ok(Some(NaiveDate::default() + chrono::Duration::days(i64::from(days))))
        }
        other => Err(bad_record(
            row_no,
            &format!("'{name}' has unsupported type {other:?}"),
        )),
    }
}

fn bad_record(row: usize, message: &str) -> DataError {
    DataError::BadRecord {
        row,
        message: message.to_string(),
    }
}

fn unavailable(path: &Path, kind: io::ErrorKind) -> DataError {
    DataError::Unavailable {
        path: path.to_path_buf(),
        source: io::Error::from(kind),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::Builder;

    use super::*;

    const SAMPLE_CSV: &str = "\
price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed
9400,2011.0,bmw x5,good,6.0,gas,145000.0,automatic,SUV,,1.0,2018-06-23,19
25500,,ford f-150,good,6.0,gas,88705.0,automatic,pickup,white,1.0,2018-10-19,50
5500,2013.0,hyundai sonata,like new,4.0,gas,,automatic,sedan,red,,2019-02-07,79
";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut tmp = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(tmp, "{contents}").unwrap();
        tmp
    }

    #[test]
    fn csv_loads_with_derived_date_components() {
        let tmp = write_temp(".csv", SAMPLE_CSV);
        let ds = load_file(tmp.path()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.vehicle_types, vec!["SUV", "pickup", "sedan"]);
        assert_eq!(ds.price_bounds, (5500.0, 25500.0));

        let first = &ds.listings[0];
        assert_eq!(first.vehicle_type, "SUV");
        assert_eq!(first.year_posted, 2018);
        assert_eq!(first.month_posted, 6);
        assert_eq!(first.model_year, Some(2011));
        assert!(first.is_4wd);

        // Empty cells become None, not zeros.
        assert_eq!(ds.listings[1].model_year, None);
        assert_eq!(ds.listings[2].odometer, None);
        assert!(!ds.listings[2].is_4wd);
    }

    #[test]
    fn csv_load_is_idempotent() {
        let tmp = write_temp(".csv", SAMPLE_CSV);
        let a = load_file(tmp.path()).unwrap();
        let b = load_file(tmp.path()).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.vehicle_types, b.vehicle_types);
        assert_eq!(a.price_bounds, b.price_bounds);
        for (x, y) in a.listings.iter().zip(&b.listings) {
            assert_eq!(x.price, y.price);
            assert_eq!(x.date_posted, y.date_posted);
        }
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let tmp = write_temp(
            ".csv",
            "price,model_year,condition,days_listed,date_posted,odometer\n9400,2011,good,19,2018-06-23,145000\n",
        );
        let err = load_file(tmp.path()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(col) if col == "type"));
    }

    #[test]
    fn malformed_row_reports_row_number() {
        let tmp = write_temp(
            ".csv",
            "price,model_year,condition,odometer,type,days_listed,date_posted\n\
             9400,2011,good,145000,SUV,19,2018-06-23\n\
             not-a-price,2011,good,145000,SUV,19,2018-06-23\n",
        );
        let err = load_file(tmp.path()).unwrap_err();
        assert!(matches!(err, DataError::BadRecord { row: 1, .. }));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = load_file(Path::new("no_such_file.csv")).unwrap_err();
        assert!(matches!(err, DataError::Unavailable { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("listings.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn json_records_load() {
        let tmp = write_temp(
            ".json",
            r#"[
                {"price": 10000, "type": "suv", "condition": "good", "odometer": 120000,
                 "model_year": 2012, "date_posted": "2018-06-23", "days_listed": 19},
                {"price": 20000, "type": "sedan", "condition": "excellent",
                 "model_year": 2017, "date_posted": "2019-01-07", "days_listed": 30}
            ]"#,
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.listings[1].odometer, None);
        assert_eq!(ds.listings[1].year_posted, 2019);
    }

    #[test]
    fn parquet_scalar_columns_load() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("price", DataType::Float64, false),
            Field::new("model_year", DataType::Float64, true),
            Field::new("condition", DataType::Utf8, false),
            Field::new("odometer", DataType::Float64, true),
            Field::new("type", DataType::Utf8, false),
            Field::new("days_listed", DataType::Int64, false),
            Field::new("date_posted", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![10_000.0, 20_000.0])),
                Arc::new(Float64Array::from(vec![Some(2012.0), None])),
                Arc::new(StringArray::from(vec!["good", "excellent"])),
                Arc::new(Float64Array::from(vec![Some(120_000.0), None])),
                Arc::new(StringArray::from(vec!["suv", "sedan"])),
                Arc::new(Int64Array::from(vec![19, 30])),
                Arc::new(StringArray::from(vec!["2018-06-23", "2019-01-07"])),
            ],
        )
        .unwrap();

        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let file = tmp.reopen().unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.listings[0].vehicle_type, "suv");
        assert_eq!(ds.listings[0].month_posted, 6);
        assert_eq!(ds.listings[1].model_year, None);
        assert_eq!(ds.listings[1].odometer, None);
    }
}
