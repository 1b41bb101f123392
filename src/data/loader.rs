use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Table;
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a timing table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one numeric column per header (the format the
///                measurement programs write)
/// * `.json`    – `[{ "Index": 0, "Load": 212, ... }, ...]`
/// * `.parquet` – any schema whose columns cast to Float64
///
/// Empty cells and nulls load as NaN so they render as gaps.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(AnalysisError::UnsupportedFormat(other.to_string()).into()),
    };

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.column_names,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one row per measurement.
///
/// ```text
/// Index,Load,Prefetch
/// 0,231,118
/// 1,229,
/// ```
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let cell = record.get(col_idx).unwrap_or("");
            column.push(parse_cell(cell, row_no, &headers[col_idx])?);
        }
    }

    let table = Table::from_columns(headers.into_iter().zip(columns).collect())?;
    Ok(table)
}

fn parse_cell(s: &str, row: usize, col: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, column '{col}': '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). The first record
/// fixes the column set; later records may omit keys (NaN) but not add them.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let names: Vec<String> = match records.first() {
        Some(first) => first
            .as_object()
            .context("Row 0 is not a JSON object")?
            .keys()
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(records.len()); names.len()];

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if let Some(extra) = obj.keys().find(|k| !names.contains(*k)) {
            bail!("Row {i}: unexpected column '{extra}'");
        }

        for (name, column) in names.iter().zip(columns.iter_mut()) {
            column.push(json_to_f64(obj.get(name), i, name)?);
        }
    }

    let table = Table::from_columns(names.into_iter().zip(columns).collect())?;
    Ok(table)
}

fn json_to_f64(val: Option<&JsonValue>, row: usize, col: &str) -> Result<f64> {
    match val {
        None | Some(JsonValue::Null) => Ok(f64::NAN),
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .with_context(|| format!("Row {row}, column '{col}': number out of range")),
        Some(JsonValue::String(s)) => parse_cell(s, row, col),
        Some(other) => bail!("Row {row}, column '{col}': {other} is not a number"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Every column is cast to Float64; nulls become NaN.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, array) in batch.columns().iter().enumerate() {
            let as_f64 = cast(array, &DataType::Float64)
                .with_context(|| format!("column '{}' is not numeric", names[col_idx]))?;
            let values = as_f64
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array after cast")?;
            columns[col_idx].extend(values.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
    }

    let table = Table::from_columns(names.into_iter().zip(columns).collect())?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn temp_with(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_columns_and_gaps() {
        let file = temp_with(".csv", "Index,Load,Prefetch\n0,231,118\n1,229,\n2,233,121\n");
        let table = load_file(file.path()).unwrap();

        assert_eq!(table.column_names, ["Index", "Load", "Prefetch"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("Load").unwrap().values, [231.0, 229.0, 233.0]);
        let prefetch = &table.column("Prefetch").unwrap().values;
        assert_eq!(prefetch[0], 118.0);
        assert!(prefetch[1].is_nan());
    }

    #[test]
    fn csv_rejects_text_cells() {
        let file = temp_with(".csv", "Time\n12\nslow\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("'slow' is not a number"));
    }

    #[test]
    fn json_records() {
        let file = temp_with(
            ".json",
            r#"[{"tlb": 120, "errtlb": 1.5}, {"tlb": 98, "errtlb": null}]"#,
        );
        let table = load_file(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column("tlb").unwrap().values, [120.0, 98.0]);
        assert!(table.column("errtlb").unwrap().values[1].is_nan());
    }

    #[test]
    fn parquet_casts_to_float() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Index", arrow::datatypes::DataType::Int64, false),
            Field::new("Load", arrow::datatypes::DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![0, 1, 2])),
                Arc::new(Float64Array::from(vec![Some(230.0), None, Some(228.0)])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.column("Index").unwrap().values, [0.0, 1.0, 2.0]);
        assert!(table.column("Load").unwrap().values[1].is_nan());
    }

    #[test]
    fn unknown_extension() {
        let file = temp_with(".txt", "Time\n1\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::UnsupportedFormat("txt".into()))
        );
    }
}
