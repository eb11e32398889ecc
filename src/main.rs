mod cli;
mod config;
mod data;
mod error;
mod report;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use data::model::BookTable;
use data::{describe, filter, loader, sort};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}

/// Load → filter → sort.
fn select_books(cli: &Cli) -> error::Result<BookTable> {
    let books = loader::load_books(&cli.config())?;
    let books = filter::filter_books(&books, &cli.criteria())?;
    let books = sort::sort_books(&books, cli.sort)?;
    log::debug!("{} books after filtering and sorting", books.len());
    Ok(books)
}

/// Run the pipeline and render its output.
fn run(cli: &Cli) -> Result<String> {
    let books = select_books(cli)
        .with_context(|| format!("selecting books from {}", cli.dataset.display()))?;

    if cli.aggregate() {
        let summary = describe::describe(&books);
        if cli.json {
            Ok(report::summary_to_json(&summary)?.to_string())
        } else {
            report::render_summary(&summary).context("rendering summary")
        }
    } else if cli.json {
        Ok(report::books_to_json(&books, cli.list)?.to_string())
    } else {
        report::render_books(&books, cli.list).context("rendering books")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKS_CSV: &str = "\
ISBN,Title,Authors,Average Rating,Num Pages,Ratings Count,Text Reviews Count
A1,Dune,Frank Herbert,4.2,604,500,20
A2,Foundation,Isaac Asimov,4.5,255,50,30
A3,A Space Opera Saga,Jane Doe,3.9,410,120,5
";

    fn cli_for(dir: &tempfile::TempDir, args: &[&str]) -> Cli {
        let path = dir.path().join("books.csv");
        std::fs::write(&path, BOOKS_CSV).unwrap();
        let dataset = path.to_str().unwrap().to_string();
        let argv = ["bookshelf", "-d", dataset.as_str()]
            .into_iter()
            .chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn filters_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(&cli_for(&dir, &["-r", "4.0", "-c", "100"])).unwrap();
        assert!(out.contains("Dune"));
        assert!(!out.contains("Foundation"));
        assert!(!out.contains("Space Opera"));
    }

    #[test]
    fn json_rows_are_sorted_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(&cli_for(&dir, &["-s", "rating", "-l", "2", "--json"])).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
        let ids: Vec<_> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["ISBN"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["A2", "A1"]);
    }

    #[test]
    fn aggregate_summarizes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(&cli_for(&dir, &["-t", "space_opera", "-a", "--json"])).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(summary[0]["column"], "Average Rating");
        assert_eq!(summary[0]["count"], 1);
    }

    #[test]
    fn missing_dataset_fails() {
        let cli = Cli::try_parse_from(["bookshelf", "-d", "/nonexistent/books.csv"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<error::Error>(),
            Some(error::Error::Load(error::LoadError::Io { .. }))
        ));
    }
}
