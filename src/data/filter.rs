use super::model::{columns, BookTable, CellValue};
use crate::error::FilterError;

// ---------------------------------------------------------------------------
// Filter predicate: optional conditions, all of which must hold
// ---------------------------------------------------------------------------

/// Conditions a book must satisfy. `None` means "no constraint"; a
/// supplied zero is a real threshold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Title substring; underscores stand for spaces.
    pub topic: Option<String>,
    /// Keep books rated strictly above this.
    pub min_rating: Option<f64>,
    /// Keep books with strictly more ratings than this.
    pub min_count: Option<i64>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.min_rating.is_none() && self.min_count.is_none()
    }
}

/// A resolved condition bound to a column position.
enum Condition {
    Topic { col: usize, needle: String },
    Above { col: usize, threshold: f64 },
}

impl Condition {
    fn matches(&self, values: &[CellValue]) -> bool {
        match self {
            Condition::Topic { col, needle } => match &values[*col] {
                CellValue::Null => false,
                CellValue::Text(title) => title.to_lowercase().contains(needle),
                other => other.to_string().to_lowercase().contains(needle),
            },
            // Missing values compare false, like NaN.
            Condition::Above { col, threshold } => {
                values[*col].as_f64().is_some_and(|v| v > *threshold)
            }
        }
    }
}

/// Lower-cased needle for a topic argument: `"space_opera"` → `"space opera"`.
pub fn topic_needle(topic: &str) -> String {
    topic.replace('_', " ").to_lowercase()
}

fn numeric_column(table: &BookTable, name: &str) -> Result<usize, FilterError> {
    let idx = table
        .column_index(name)
        .ok_or_else(|| FilterError::MissingColumn(name.to_string()))?;
    let dtype = table.columns()[idx].dtype;
    // A header-only file types every column as text; nothing to compare.
    if !dtype.is_numeric() && !table.is_empty() {
        return Err(FilterError::NonNumeric {
            column: name.to_string(),
            dtype,
        });
    }
    Ok(idx)
}

fn resolve(table: &BookTable, criteria: &FilterCriteria) -> Result<Vec<Condition>, FilterError> {
    let mut conditions = Vec::new();

    if let Some(topic) = &criteria.topic {
        let col = table
            .column_index(columns::TITLE)
            .ok_or_else(|| FilterError::MissingColumn(columns::TITLE.to_string()))?;
        conditions.push(Condition::Topic {
            col,
            needle: topic_needle(topic),
        });
    }
    if let Some(threshold) = criteria.min_rating {
        let col = numeric_column(table, columns::AVERAGE_RATING)?;
        conditions.push(Condition::Above { col, threshold });
    }
    if let Some(min_count) = criteria.min_count {
        let col = numeric_column(table, columns::RATINGS_COUNT)?;
        conditions.push(Condition::Above {
            col,
            threshold: min_count as f64,
        });
    }

    Ok(conditions)
}

/// Return indices of books that pass all conditions, in table order.
pub fn filtered_indices(
    table: &BookTable,
    criteria: &FilterCriteria,
) -> Result<Vec<usize>, FilterError> {
    let conditions = resolve(table, criteria)?;
    Ok(table
        .books()
        .iter()
        .enumerate()
        .filter(|(_, book)| conditions.iter().all(|c| c.matches(&book.values)))
        .map(|(i, _)| i)
        .collect())
}

/// The books of `table` satisfying every condition in `criteria`.
pub fn filter_books(
    table: &BookTable,
    criteria: &FilterCriteria,
) -> Result<BookTable, FilterError> {
    if criteria.is_empty() {
        return Ok(table.clone());
    }
    let indices = filtered_indices(table, criteria)?;
    log::debug!("filter kept {} of {} books", indices.len(), table.len());
    if indices.is_empty() && !table.is_empty() {
        log::warn!("no books match {criteria:?}");
    }
    Ok(table.select(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Book, Column, ColumnType};

    fn table(rows: &[(&str, &str, Option<f64>, Option<i64>)]) -> BookTable {
        let cols = vec![
            Column::new(columns::TITLE, ColumnType::Text),
            Column::new(columns::AVERAGE_RATING, ColumnType::Float),
            Column::new(columns::RATINGS_COUNT, ColumnType::Integer),
        ];
        let books = rows
            .iter()
            .map(|(id, title, rating, count)| Book {
                id: id.to_string(),
                values: vec![
                    CellValue::Text(title.to_string()),
                    rating.map(CellValue::Float).unwrap_or(CellValue::Null),
                    count.map(CellValue::Integer).unwrap_or(CellValue::Null),
                ],
            })
            .collect();
        BookTable::new("ISBN", cols, books).unwrap()
    }

    fn ids(table: &BookTable) -> Vec<&str> {
        table.books().iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn rating_and_count_thresholds_combine() {
        let t = table(&[
            ("A1", "Dune", Some(4.2), Some(500)),
            ("A2", "Foundation", Some(4.5), Some(50)),
        ]);
        let criteria = FilterCriteria {
            min_rating: Some(4.0),
            min_count: Some(100),
            ..Default::default()
        };
        assert_eq!(ids(&filter_books(&t, &criteria).unwrap()), ["A1"]);
    }

    #[test]
    fn topic_underscores_are_spaces() {
        let t = table(&[
            ("A1", "A Space Opera Saga", None, None),
            ("A2", "Space: A History", None, None),
            ("A3", "SPACE OPERA", None, None),
        ]);
        let criteria = FilterCriteria {
            topic: Some("space_opera".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_books(&t, &criteria).unwrap()), ["A1", "A3"]);
    }

    #[test]
    fn thresholds_are_exclusive_and_zero_applies() {
        let t = table(&[
            ("A1", "Dune", Some(0.0), Some(0)),
            ("A2", "Emma", Some(4.0), Some(1)),
            ("A3", "Ulysses", None, None),
        ]);
        let by_rating = FilterCriteria {
            min_rating: Some(0.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_books(&t, &by_rating).unwrap()), ["A2"]);

        let by_count = FilterCriteria {
            min_count: Some(0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_books(&t, &by_count).unwrap()), ["A2"]);

        let exact = FilterCriteria {
            min_rating: Some(4.0),
            ..Default::default()
        };
        assert!(filter_books(&t, &exact).unwrap().is_empty());
    }

    #[test]
    fn no_conditions_is_identity() {
        let t = table(&[("A1", "Dune", Some(4.2), None), ("A2", "Emma", None, Some(3))]);
        assert_eq!(filter_books(&t, &FilterCriteria::default()).unwrap(), t);
    }

    #[test]
    fn sound_and_complete() {
        let t = table(&[
            ("A1", "Dune", Some(4.2), Some(500)),
            ("A2", "Dune Messiah", Some(3.9), Some(900)),
            ("A3", "Children of Dune", Some(4.1), Some(90)),
            ("A4", "Emma", Some(4.8), Some(1000)),
            ("A5", "dune again", None, Some(700)),
        ]);
        let criteria = FilterCriteria {
            topic: Some("dune".into()),
            min_rating: Some(4.0),
            min_count: Some(100),
        };
        let out = filter_books(&t, &criteria).unwrap();
        let keep = |b: &Book| {
            b.values[0].to_string().to_lowercase().contains("dune")
                && b.values[1].as_f64().is_some_and(|r| r > 4.0)
                && b.values[2].as_f64().is_some_and(|c| c > 100.0)
        };
        assert!(out.books().iter().all(keep));
        let expected: Vec<&str> = t
            .books()
            .iter()
            .filter(|&b| keep(b))
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids(&out), expected);
    }

    #[test]
    fn numeric_threshold_on_text_column_fails() {
        let cols = vec![Column::new(columns::AVERAGE_RATING, ColumnType::Text)];
        let books = vec![Book {
            id: "A1".into(),
            values: vec![CellValue::Text("great".into())],
        }];
        let t = BookTable::new("ISBN", cols, books).unwrap();
        let criteria = FilterCriteria {
            min_rating: Some(3.0),
            ..Default::default()
        };
        assert!(matches!(
            filter_books(&t, &criteria),
            Err(FilterError::NonNumeric { .. })
        ));
    }

    #[test]
    fn numeric_threshold_on_empty_text_column_is_empty() {
        let cols = vec![Column::new(columns::AVERAGE_RATING, ColumnType::Text)];
        let t = BookTable::new("ISBN", cols, vec![]).unwrap();
        let criteria = FilterCriteria {
            min_rating: Some(3.0),
            ..Default::default()
        };
        assert!(filter_books(&t, &criteria).unwrap().is_empty());
    }

    #[test]
    fn missing_column_fails() {
        let t = BookTable::new("ISBN", vec![], vec![]).unwrap();
        let criteria = FilterCriteria {
            min_count: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            filter_books(&t, &criteria),
            Err(FilterError::MissingColumn(ref c)) if c == columns::RATINGS_COUNT
        ));
    }
}
