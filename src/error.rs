use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::ColumnType;

// ---------------------------------------------------------------------------
// Per-stage errors
// ---------------------------------------------------------------------------

/// Failure to turn a dataset file into a [`BookTable`](crate::data::model::BookTable).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed parquet file {}: {source}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("reading record batch from {}: {source}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset has no index column '{0}'")]
    MissingIndexColumn(String),

    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("duplicate value '{id}' in index column '{column}'")]
    DuplicateId { column: String, id: String },
}

/// A numeric condition could not be applied to the table.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("cannot filter on '{0}': no such column")]
    MissingColumn(String),

    #[error("cannot apply a numeric threshold to '{column}' ({dtype} column)")]
    NonNumeric { column: String, dtype: ColumnType },
}

/// Invalid sort request.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "unknown sort key '{0}' \
         (expected one of: rating, pages, ratings_count, title, reviews_count)"
    )]
    UnknownSortKey(String),

    #[error("cannot sort by '{0}': no such column")]
    MissingSortColumn(String),
}

// ---------------------------------------------------------------------------
// Pipeline error
// ---------------------------------------------------------------------------

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
