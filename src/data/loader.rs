use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{is_na, Book, BookTable, CellValue, Column, ColumnType};
use crate::config::Config;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the book catalog named by `config`.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one book per record (the usual export)
/// * `.json`    – `[{ "ISBN": "...", "Title": "...", ... }, ...]`
/// * `.parquet` – flat columns of strings, ints, floats or bools
pub fn load_books(config: &Config) -> Result<BookTable, LoadError> {
    let path = config.dataset_path.as_path();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, &config.index_column)?,
        "json" => load_json(path, &config.index_column)?,
        "parquet" | "pq" => load_parquet(path, &config.index_column)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} books ({} columns) from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, one of which is the index.
/// Column types are inferred from every non-missing cell of the column,
/// so a rating column holding `4`, `NA` and `3.87` becomes float.
fn load_csv(path: &Path, index_column: &str) -> Result<BookTable, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let id_idx = headers
        .iter()
        .position(|h| h == index_column)
        .ok_or_else(|| LoadError::MissingIndexColumn(index_column.to_string()))?;

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    let value_cols: Vec<usize> = (0..headers.len()).filter(|&i| i != id_idx).collect();
    let columns: Vec<Column> = value_cols
        .iter()
        .map(|&col_idx| {
            let dtype = ColumnType::infer(records.iter().map(|r| r.get(col_idx).unwrap_or("")))
                .unwrap_or_else(|| ColumnType::all_missing(records.len()));
            Column::new(headers[col_idx].clone(), dtype)
        })
        .collect();

    let books = records
        .iter()
        .map(|record| Book {
            id: record.get(id_idx).unwrap_or("").to_string(),
            values: value_cols
                .iter()
                .zip(&columns)
                .map(|(&col_idx, col)| col.dtype.parse_cell(record.get(col_idx).unwrap_or("")))
                .collect(),
        })
        .collect();

    BookTable::new(index_column, columns, books)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "ISBN": "0439785960", "Title": "Half-Blood Prince", "Average Rating": 4.57 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all record keys, in first-seen order; a key
/// missing from a record is read as null.
fn load_json(path: &Path, index_column: &str) -> Result<BookTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root.as_array().ok_or_else(|| LoadError::Malformed {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object().ok_or_else(|| LoadError::Malformed {
                row: i,
                message: "record is not a JSON object".to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !objects.is_empty() && !objects.iter().any(|o| o.contains_key(index_column)) {
        return Err(LoadError::MissingIndexColumn(index_column.to_string()));
    }

    let mut names: Vec<&String> = Vec::new();
    for key in objects.iter().flat_map(|o| o.keys()) {
        if key != index_column && !names.contains(&key) {
            names.push(key);
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .map(|name| {
            let dtype = json_column_type(objects.iter().filter_map(|o| o.get(name)))
                .unwrap_or_else(|| ColumnType::all_missing(objects.len()));
            Column::new(name.clone(), dtype)
        })
        .collect();

    let books = objects
        .iter()
        .enumerate()
        .map(|(i, obj)| {
            let id = match obj.get(index_column) {
                Some(JsonValue::String(s)) => s.clone(),
                Some(JsonValue::Number(n)) => n.to_string(),
                _ => {
                    return Err(LoadError::Malformed {
                        row: i,
                        message: format!("missing '{index_column}' value"),
                    })
                }
            };
            let values = columns
                .iter()
                .map(|col| json_to_cell(obj.get(&col.name), col.dtype))
                .collect();
            Ok(Book { id, values })
        })
        .collect::<Result<Vec<_>, _>>()?;

    BookTable::new(index_column, columns, books)
}

/// Like [`ColumnType::infer`]: nulls and NA strings are skipped.
fn json_column_type<'a>(values: impl Iterator<Item = &'a JsonValue>) -> Option<ColumnType> {
    let mut dtype: Option<ColumnType> = None;
    for val in values {
        let this = match val {
            JsonValue::Null => continue,
            JsonValue::String(s) if is_na(s) => continue,
            JsonValue::Number(n) if n.is_i64() => ColumnType::Integer,
            JsonValue::Number(_) => ColumnType::Float,
            JsonValue::Bool(_) => ColumnType::Bool,
            _ => return Some(ColumnType::Text),
        };
        dtype = Some(match (dtype, this) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(a), b) if a.is_numeric() && b.is_numeric() => ColumnType::Float,
            _ => return Some(ColumnType::Text),
        });
    }
    dtype
}

fn json_to_cell(val: Option<&JsonValue>, dtype: ColumnType) -> CellValue {
    match (val, dtype) {
        (None | Some(JsonValue::Null), _) => CellValue::Null,
        (Some(JsonValue::String(s)), _) if is_na(s) => CellValue::Null,
        (Some(JsonValue::Number(n)), ColumnType::Integer) => {
            n.as_i64().map(CellValue::Integer).unwrap_or(CellValue::Null)
        }
        (Some(JsonValue::Number(n)), ColumnType::Float) => {
            n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Null)
        }
        (Some(JsonValue::Bool(b)), ColumnType::Bool) => CellValue::Bool(*b),
        (Some(JsonValue::String(s)), _) => CellValue::Text(s.clone()),
        (Some(other), _) => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of books.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`, which
/// stores the index as a regular column) and **Polars**.
fn load_parquet(path: &Path, index_column: &str) -> Result<BookTable, LoadError> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(parquet_err)?;

    let id_idx = schema
        .index_of(index_column)
        .map_err(|_| LoadError::MissingIndexColumn(index_column.to_string()))?;

    let value_cols: Vec<usize> = (0..schema.fields().len()).filter(|&i| i != id_idx).collect();
    let columns: Vec<Column> = value_cols
        .iter()
        .map(|&i| {
            let field = schema.field(i);
            Column::new(field.name().clone(), arrow_column_type(field.data_type()))
        })
        .collect();

    let mut books = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        let id_col = batch.column(id_idx);

        for row in 0..batch.num_rows() {
            let id = match extract_cell(id_col, row) {
                CellValue::Null => {
                    return Err(LoadError::Malformed {
                        row: books.len(),
                        message: format!("null '{index_column}' value"),
                    })
                }
                cell => cell.to_string(),
            };
            let values = value_cols
                .iter()
                .map(|&i| extract_cell(batch.column(i), row))
                .collect();
            books.push(Book { id, values });
        }
    }

    BookTable::new(index_column, columns, books)
}

// -- Parquet / Arrow helpers --

fn arrow_column_type(data_type: &DataType) -> ColumnType {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => ColumnType::Integer,
        DataType::Float32 | DataType::Float64 => ColumnType::Float,
        DataType::Boolean => ColumnType::Bool,
        _ => ColumnType::Text,
    }
}

fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(v)
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => float_cell(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_cell(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        // Narrow integer types go through their display form.
        dt if arrow_column_type(dt) == ColumnType::Integer => array_value_to_string(col, row)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Null),
        _ => array_value_to_string(col, row)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null),
    }
}
