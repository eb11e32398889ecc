use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::LoadError;

/// Well-known column names of the books dataset.
pub mod columns {
    pub const TITLE: &str = "Title";
    pub const AVERAGE_RATING: &str = "Average Rating";
    pub const NUM_PAGES: &str = "Num Pages";
    pub const RATINGS_COUNT: &str = "Ratings Count";
    pub const TEXT_REVIEWS_COUNT: &str = "Text Reviews Count";
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so cells of one column can be sorted --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for numeric comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null, or a float NaN that slipped past the loader.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Cell texts read as missing, the same set `pandas.read_csv` uses.
pub const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Bool,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Infer a column type from raw text cells. Missing cells are ignored;
    /// `None` when every cell is missing.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut dtype: Option<ColumnType> = None;
        for cell in cells.into_iter().filter(|c| !is_na(c)) {
            let this = if cell.parse::<i64>().is_ok() {
                ColumnType::Integer
            } else if cell.parse::<f64>().is_ok() {
                ColumnType::Float
            } else if cell == "true" || cell == "false" {
                ColumnType::Bool
            } else {
                return Some(ColumnType::Text);
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

    /// Type of a column whose cells are all missing: float (all NaN) when
    /// there are rows, text for a header-only file.
    pub fn all_missing(n_rows: usize) -> Self {
        if n_rows == 0 {
            ColumnType::Text
        } else {
            ColumnType::Float
        }
    }

    /// Parse a raw text cell according to this column type.
    pub fn parse_cell(self, cell: &str) -> CellValue {
        if is_na(cell) {
            return CellValue::Null;
        }
        let parsed = match self {
            ColumnType::Integer => cell.parse().ok().map(CellValue::Integer),
            ColumnType::Float => cell.parse::<f64>().ok().map(|v| {
                if v.is_nan() {
                    CellValue::Null
                } else {
                    CellValue::Float(v)
                }
            }),
            ColumnType::Bool => Some(CellValue::Bool(cell == "true")),
            ColumnType::Text => None,
        };
        parsed.unwrap_or_else(|| CellValue::Text(cell.to_string()))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Column {
            name: name.into(),
            dtype,
        }
    }
}

// ---------------------------------------------------------------------------
// Book – one row of the table
// ---------------------------------------------------------------------------

/// A single book (one row of the source dataset).
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Value of the index column, kept verbatim.
    pub id: String,
    /// One cell per table column, in column order.
    pub values: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// BookTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered collection of books, unique by id.
#[derive(Debug, Clone, PartialEq)]
pub struct BookTable {
    index_name: String,
    columns: Vec<Column>,
    books: Vec<Book>,
}

impl BookTable {
    /// Build a table, checking row widths and id uniqueness.
    pub fn new(
        index_name: impl Into<String>,
        columns: Vec<Column>,
        books: Vec<Book>,
    ) -> Result<Self, LoadError> {
        let index_name = index_name.into();
        let mut seen = HashSet::with_capacity(books.len());
        for (row, book) in books.iter().enumerate() {
            if book.values.len() != columns.len() {
                return Err(LoadError::Malformed {
                    row,
                    message: format!(
                        "expected {} values but found {}",
                        columns.len(),
                        book.values.len()
                    ),
                });
            }
            if !seen.insert(book.id.as_str()) {
                return Err(LoadError::DuplicateId {
                    column: index_name,
                    id: book.id.clone(),
                });
            }
        }
        Ok(BookTable {
            index_name,
            columns,
            books,
        })
    }

    /// Derive a table sharing this table's schema. Callers only pass rows
    /// taken from `self`, so uniqueness already holds.
    fn derive(&self, books: Vec<Book>) -> Self {
        BookTable {
            index_name: self.index_name.clone(),
            columns: self.columns.clone(),
            books,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Number of books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column cells in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.books.iter().map(move |b| &b.values[idx])
    }

    /// New table holding the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        self.derive(indices.iter().map(|&i| self.books[i].clone()).collect())
    }

    /// New table holding the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        self.derive(self.books.iter().take(n).cloned().collect())
    }
}
