use serde::Serialize;

use super::model::BookTable;

/// Row labels of a rendered summary.
pub const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics of one numeric column.
///
/// Everything but `count` is `None` when it is undefined for the data
/// (no values, or fewer than two values for `std`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Per-column statistics for every numeric column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Summary {
    pub columns: Vec<ColumnSummary>,
}

impl ColumnSummary {
    /// Statistic values in [`STATISTICS`] order.
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }

    fn from_values(column: &str, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let n = values.len();

        let mean = (n > 0).then(|| values.iter().sum::<f64>() / n as f64);
        let std = mean.filter(|_| n > 1).map(|m| {
            let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        ColumnSummary {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: values.first().copied(),
            p25: quantile(&values, 0.25),
            p50: quantile(&values, 0.50),
            p75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

/// Linearly interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Summarize every numeric column of `table`. Missing cells are skipped;
/// an empty table yields zero counts.
pub fn describe(table: &BookTable) -> Summary {
    let columns = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, col)| col.dtype.is_numeric())
        .map(|(idx, col)| {
            let values = table.column_values(idx).filter_map(|v| v.as_f64()).collect();
            ColumnSummary::from_values(&col.name, values)
        })
        .collect();
    Summary { columns }
}
