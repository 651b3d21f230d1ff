//! Descriptive statistics printed before the viewer opens.
//!
//! Every table is rendered through Arrow's pretty-printer so the terminal
//! output lines up the same way regardless of the column types.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::config::AnalysisConfig;
use crate::data::{DataError, Dataset, Value};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Summary of one numeric column, as `describe()` reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarise `values`; `None` when there is nothing to summarise.
    pub fn from_values(column: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        });

        Some(ColumnSummary {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Summaries of every numeric column, in column order.
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .columns()
        .iter()
        .filter(|col| dataset.is_numeric(col))
        .filter_map(|col| {
            let values = dataset.numeric_column(col).ok()?;
            ColumnSummary::from_values(col, &values)
        })
        .collect()
}

/// Null count per column, in column order.
pub fn missing_values(dataset: &Dataset) -> Vec<(String, usize)> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let n = dataset.rows().iter().filter(|row| row[idx].is_null()).count();
            (col.clone(), n)
        })
        .collect()
}

/// Mean of numeric column `of` for each distinct value of `by`.
///
/// Rows with a null key or a non-numeric value are skipped.
pub fn mean_by_group(
    dataset: &Dataset,
    by: &str,
    of: &str,
) -> Result<BTreeMap<Value, f64>, DataError> {
    let key_idx = dataset.column_index(by)?;
    let val_idx = dataset.column_index(of)?;

    let mut acc: BTreeMap<Value, (f64, usize)> = BTreeMap::new();
    for row in dataset.rows() {
        let key = &row[key_idx];
        let Some(v) = row[val_idx].as_f64() else {
            continue;
        };
        if key.is_null() {
            continue;
        }
        let entry = acc.entry(key.clone()).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }

    Ok(acc
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(batch: RecordBatch) -> Result<String> {
    Ok(pretty_format_batches(&[batch])
        .context("formatting table")?
        .to_string())
}

/// First `n` rows as a table.
pub fn render_overview(dataset: &Dataset, n: usize) -> Result<String> {
    let batch = dataset
        .head(n)
        .to_record_batch()
        .context("converting dataset overview")?;
    render(batch)
}

pub fn render_missing_values(missing: &[(String, usize)]) -> Result<String> {
    let schema = Schema::new(vec![
        Field::new("column", DataType::Utf8, false),
        Field::new("missing", DataType::Int64, false),
    ]);
    let names: ArrayRef = Arc::new(StringArray::from_iter_values(
        missing.iter().map(|(c, _)| c.as_str()),
    ));
    let counts: ArrayRef = Arc::new(Int64Array::from_iter_values(
        missing.iter().map(|(_, n)| *n as i64),
    ));
    let batch = RecordBatch::try_new(Arc::new(schema), vec![names, counts])
        .context("building missing-values table")?;
    render(batch)
}

/// One row per statistic, one column per summarised column.
pub fn render_summary(summaries: &[ColumnSummary]) -> Result<String> {
    const STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    let mut fields = vec![Field::new("", DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from_iter_values(STATS))];

    for s in summaries {
        let column = vec![
            Some(s.count as f64),
            Some(s.mean),
            s.std,
            Some(s.min),
            Some(s.q25),
            Some(s.median),
            Some(s.q75),
            Some(s.max),
        ];
        fields.push(Field::new(&s.column, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(column)));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building summary table")?;
    render(batch)
}

pub fn render_group_means(by: &str, of: &str, means: &BTreeMap<Value, f64>) -> Result<String> {
    let schema = Schema::new(vec![
        Field::new(by, DataType::Utf8, false),
        Field::new(of, DataType::Float64, false),
    ]);
    let keys: ArrayRef = Arc::new(StringArray::from_iter_values(
        means.keys().map(|k| k.to_string()),
    ));
    let values: ArrayRef = Arc::new(Float64Array::from_iter_values(means.values().copied()));
    let batch = RecordBatch::try_new(Arc::new(schema), vec![keys, values])
        .context("building group table")?;
    render(batch)
}

/// The full text printed for a loaded dataset: overview, missing values,
/// statistical summary, and the average review count per rating.
pub fn report(dataset: &Dataset, config: &AnalysisConfig) -> Result<String> {
    let mut out = String::new();

    out.push_str("Dataset Overview:\n");
    out.push_str(&render_overview(dataset, config.head_rows)?);
    out.push_str("\n\nMissing Values:\n");
    out.push_str(&render_missing_values(&missing_values(dataset))?);
    out.push_str("\n\nStatistical Summary:\n");
    out.push_str(&render_summary(&describe(dataset))?);

    let means = mean_by_group(dataset, "rating", "reviews")?;
    out.push_str("\n\nAverage Reviews per Rating:\n");
    out.push_str(&render_group_means("rating", "reviews", &means)?);
    out.push('\n');

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn products() -> Dataset {
        Dataset::new(
            vec!["title".into(), "price".into(), "rating".into(), "reviews".into()],
            vec![
                vec![
                    Value::String("Kettle".into()),
                    Value::Float(9.99),
                    Value::Integer(4),
                    Value::Integer(120),
                ],
                vec![
                    Value::String("Toaster".into()),
                    Value::Float(19.99),
                    Value::Integer(5),
                    Value::Integer(300),
                ],
            ],
        )
    }

    #[test]
    fn describe_two_products() {
        let summaries = describe(&products());
        let cols: Vec<&str> = summaries.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(cols, ["price", "rating", "reviews"]);

        let price = &summaries[0];
        assert_eq!(price.count, 2);
        assert!(close(price.mean, 14.99));
        assert!(close(price.median, 14.99));
        assert!(close(summaries[2].mean, 210.0));
        assert!(close(summaries[2].std.unwrap(), 127.27922061357856));
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!(close(quantile(&v, 0.25), 1.75));
        assert!(close(quantile(&v, 0.5), 2.5));
        assert!(close(quantile(&v, 0.75), 3.25));
        assert!(close(quantile(&[7.0], 0.75), 7.0));
    }

    #[test]
    fn single_value_has_no_std() {
        let s = ColumnSummary::from_values("x", &[3.0]).unwrap();
        assert_eq!(s.std, None);
        assert!(ColumnSummary::from_values("x", &[]).is_none());
    }

    #[test]
    fn missing_counts() {
        let ds = Dataset::new(
            vec!["price".into(), "reviews".into()],
            vec![
                vec![Value::Null, Value::Integer(1)],
                vec![Value::Float(2.0), Value::Null],
                vec![Value::Null, Value::Integer(3)],
            ],
        );
        assert_eq!(
            missing_values(&ds),
            vec![("price".to_string(), 2), ("reviews".to_string(), 1)]
        );
    }

    #[test]
    fn group_means() {
        let mut rows = products().rows().to_vec();
        rows.push(vec![
            Value::String("Mixer".into()),
            Value::Float(5.0),
            Value::Integer(4),
            Value::Integer(80),
        ]);
        rows.push(vec![Value::Null, Value::Null, Value::Null, Value::Integer(999)]);
        let ds = Dataset::new(products().columns().to_vec(), rows);

        let means = mean_by_group(&ds, "rating", "reviews").unwrap();
        assert_eq!(means.len(), 2);
        assert!(close(means[&Value::Integer(4)], 100.0));
        assert!(close(means[&Value::Integer(5)], 300.0));
    }

    #[test]
    fn group_means_need_both_columns() {
        let err = mean_by_group(&products(), "rating", "stars").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column } if column == "stars"));
    }

    #[test]
    fn report_has_every_section() {
        let text = report(&products(), &AnalysisConfig::default()).unwrap();
        for heading in [
            "Dataset Overview:",
            "Missing Values:",
            "Statistical Summary:",
            "Average Reviews per Rating:",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains("Toaster"));
        assert!(text.contains("mean"));
    }
}
