//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, DEFAULT_DATASET_PATH, DEFAULT_INDEX_COLUMN};
use crate::data::filter::FilterCriteria;
use crate::data::sort::SortKey;

/// Show top rated books.
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Filter by topic (title substring; underscores match spaces).
    #[arg(short = 't', value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Filter by minimum average rating (exclusive).
    #[arg(short = 'r', value_name = "MIN_RATING", allow_negative_numbers = true)]
    pub min_rating: Option<f64>,

    /// Filter by minimum ratings count (exclusive).
    #[arg(short = 'c', value_name = "MIN_COUNT", allow_negative_numbers = true)]
    pub min_count: Option<i64>,

    /// Field to sort by, descending.
    #[arg(short = 's', value_enum, default_value_t = SortKey::Title)]
    pub sort: SortKey,

    /// Print summary statistics instead of rows.
    #[arg(short = 'a', overrides_with = "no_aggregate")]
    pub aggregate: bool,

    /// Print rows (the default).
    #[arg(long = "no-a", overrides_with = "aggregate")]
    pub no_aggregate: bool,

    /// Number of books to list.
    #[arg(short = 'l', value_name = "N", default_value_t = 10)]
    pub list: usize,

    /// Dataset file (.csv, .json or .parquet).
    #[arg(short = 'd', long, default_value = DEFAULT_DATASET_PATH)]
    pub dataset: PathBuf,

    /// Column holding the unique book identifier.
    #[arg(long = "index-col", default_value = DEFAULT_INDEX_COLUMN)]
    pub index_column: String,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            dataset_path: self.dataset.clone(),
            index_column: self.index_column.clone(),
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            topic: self.topic.clone(),
            min_rating: self.min_rating,
            min_count: self.min_count,
        }
    }

    /// `-a` and `--no-a` override each other; the last one given wins.
    pub fn aggregate(&self) -> bool {
        self.aggregate && !self.no_aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bookshelf").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.sort, SortKey::Title);
        assert_eq!(cli.list, 10);
        assert!(!cli.aggregate());
        assert_eq!(cli.criteria(), FilterCriteria::default());
        assert_eq!(cli.config(), Config::default());
    }

    #[test]
    fn all_flags() {
        let cli = parse(&[
            "-t", "space_opera", "-r", "4.0", "-c", "100", "-s", "ratings_count", "-a", "-l", "5",
        ]);
        assert_eq!(
            cli.criteria(),
            FilterCriteria {
                topic: Some("space_opera".into()),
                min_rating: Some(4.0),
                min_count: Some(100),
            }
        );
        assert_eq!(cli.sort, SortKey::RatingsCount);
        assert!(cli.aggregate());
        assert_eq!(cli.list, 5);
    }

    #[test]
    fn zero_thresholds_are_kept() {
        let cli = parse(&["-r", "0", "-c", "0"]);
        assert_eq!(cli.criteria().min_rating, Some(0.0));
        assert_eq!(cli.criteria().min_count, Some(0));
    }

    #[test]
    fn last_aggregate_flag_wins() {
        assert!(!parse(&["-a", "--no-a"]).aggregate());
        assert!(parse(&["--no-a", "-a"]).aggregate());
    }

    #[test]
    fn rejects_unknown_sort_key() {
        assert!(Cli::try_parse_from(["bookshelf", "-s", "stars"]).is_err());
        assert!(Cli::try_parse_from(["bookshelf", "-l", "-3"]).is_err());
    }
}
