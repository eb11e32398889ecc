use std::path::PathBuf;

pub const DEFAULT_DATASET_PATH: &str = "output/books_enriched.csv";
pub const DEFAULT_INDEX_COLUMN: &str = "ISBN";

/// Where the catalog lives and which column identifies a book.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub index_column: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
        }
    }
}
