use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde_json::{Map, Value as JsonValue};

use crate::data::describe::{Summary, STATISTICS};
use crate::data::model::{BookTable, CellValue, ColumnType};

// ---------------------------------------------------------------------------
// Plain-text tables
// ---------------------------------------------------------------------------

/// Render the first `limit` books as an ASCII table, index column first.
pub fn render_books(table: &BookTable, limit: usize) -> Result<String, ArrowError> {
    let head = table.head(limit);

    let mut fields = vec![Field::new(head.index_name(), DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from_iter_values(
        head.books().iter().map(|b| b.id.as_str()),
    ))];

    for (idx, col) in head.columns().iter().enumerate() {
        let cells = head.column_values(idx);
        let (data_type, array): (DataType, ArrayRef) = match col.dtype {
            ColumnType::Integer => (
                DataType::Int64,
                Arc::new(Int64Array::from_iter(cells.map(|c| match c {
                    CellValue::Integer(i) => Some(*i),
                    _ => None,
                }))),
            ),
            ColumnType::Float => (
                DataType::Float64,
                Arc::new(Float64Array::from_iter(cells.map(CellValue::as_f64))),
            ),
            ColumnType::Bool => (
                DataType::Boolean,
                Arc::new(BooleanArray::from_iter(cells.map(|c| match c {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                }))),
            ),
            ColumnType::Text => (
                DataType::Utf8,
                Arc::new(StringArray::from_iter(
                    cells.map(|c| (!c.is_null()).then(|| c.to_string())),
                )),
            ),
        };
        fields.push(Field::new(col.name.as_str(), data_type, true));
        arrays.push(array);
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// Render a summary the way `describe()` lays it out: one row per
/// statistic, one column per field.
pub fn render_summary(summary: &Summary) -> Result<String, ArrowError> {
    let mut fields = vec![Field::new("", DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from_iter_values(STATISTICS))];

    for col in &summary.columns {
        fields.push(Field::new(col.column.as_str(), DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(col.values().to_vec())));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// The first `limit` books as an array of records.
pub fn books_to_json(table: &BookTable, limit: usize) -> Result<JsonValue, serde_json::Error> {
    table
        .books()
        .iter()
        .take(limit)
        .map(|book| {
            let mut record = Map::new();
            record.insert(table.index_name().to_string(), JsonValue::String(book.id.clone()));
            for (col, value) in table.columns().iter().zip(&book.values) {
                record.insert(col.name.clone(), serde_json::to_value(value)?);
            }
            Ok(JsonValue::Object(record))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(JsonValue::Array)
}

pub fn summary_to_json(summary: &Summary) -> Result<JsonValue, serde_json::Error> {
    serde_json::to_value(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::describe::describe;
    use crate::data::model::{columns, Book, Column};

    fn sample() -> BookTable {
        let cols = vec![
            Column::new(columns::TITLE, ColumnType::Text),
            Column::new(columns::AVERAGE_RATING, ColumnType::Float),
            Column::new(columns::RATINGS_COUNT, ColumnType::Integer),
        ];
        let books = vec![
            Book {
                id: "A1".into(),
                values: vec![
                    CellValue::Text("Dune".into()),
                    CellValue::Float(4.2),
                    CellValue::Integer(500),
                ],
            },
            Book {
                id: "A2".into(),
                values: vec![
                    CellValue::Text("Foundation".into()),
                    CellValue::Float(4.5),
                    CellValue::Null,
                ],
            },
        ];
        BookTable::new("ISBN", cols, books).unwrap()
    }

    #[test]
    fn render_books_respects_limit() {
        let text = render_books(&sample(), 1).unwrap();
        assert!(text.contains("ISBN"));
        assert!(text.contains("Dune"));
        assert!(!text.contains("Foundation"));
    }

    #[test]
    fn render_empty_table() {
        let text = render_books(&sample(), 0).unwrap();
        assert!(text.contains("Average Rating"));
    }

    #[test]
    fn render_summary_lists_statistics() {
        let text = render_summary(&describe(&sample())).unwrap();
        for label in ["count", "mean", "std", "25%", "max", "Ratings Count"] {
            assert!(text.contains(label), "missing {label} in\n{text}");
        }
    }

    #[test]
    fn json_records() {
        let json = books_to_json(&sample(), 10).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ISBN"], "A1");
        assert_eq!(rows[0]["Ratings Count"], 500);
        assert!(rows[1]["Ratings Count"].is_null());

        let summary = summary_to_json(&describe(&sample())).unwrap();
        assert_eq!(summary[0]["column"], "Average Rating");
        assert_eq!(summary[0]["count"], 2);
    }
}
