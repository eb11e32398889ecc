use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use super::model::{columns, BookTable, CellValue};
use crate::error::ConfigError;

/// The fields a catalog can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SortKey {
    Rating,
    Pages,
    RatingsCount,
    #[default]
    Title,
    ReviewsCount,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Rating,
        SortKey::Pages,
        SortKey::RatingsCount,
        SortKey::Title,
        SortKey::ReviewsCount,
    ];

    /// Dataset column this key orders by.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Rating => columns::AVERAGE_RATING,
            SortKey::Pages => columns::NUM_PAGES,
            SortKey::RatingsCount => columns::RATINGS_COUNT,
            SortKey::Title => columns::TITLE,
            SortKey::ReviewsCount => columns::TEXT_REVIEWS_COUNT,
        }
    }

    /// Command-line label.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Pages => "pages",
            SortKey::RatingsCount => "ratings_count",
            SortKey::Title => "title",
            SortKey::ReviewsCount => "reviews_count",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownSortKey(s.to_string()))
    }
}

/// Descending order with missing values last.
fn descending(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.cmp(a),
    }
}

/// A copy of `table` ordered by `key`, largest first. Ties keep their
/// existing relative order.
pub fn sort_books(table: &BookTable, key: SortKey) -> Result<BookTable, ConfigError> {
    let col = table
        .column_index(key.column())
        .ok_or_else(|| ConfigError::MissingSortColumn(key.column().to_string()))?;

    let mut order: Vec<usize> = (0..table.len()).collect();
    let books = table.books();
    // `sort_by` is stable.
    order.sort_by(|&a, &b| descending(&books[a].values[col], &books[b].values[col]));

    log::debug!("sorted {} books by {key}", table.len());
    Ok(table.select(&order))
}
