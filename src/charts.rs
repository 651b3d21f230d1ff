//! Plot-ready data for the three product figures.
//!
//! Nothing here draws; `ui::plot` turns these series into egui_plot items.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use crate::config::AnalysisConfig;
use crate::data::{DataError, Dataset, Value};

// ---------------------------------------------------------------------------
// Figures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
    PriceDistribution,
    RatingDistribution,
    ReviewsVsRating,
}

impl Figure {
    pub const ALL: [Figure; 3] = [
        Figure::PriceDistribution,
        Figure::RatingDistribution,
        Figure::ReviewsVsRating,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Figure::PriceDistribution => "Price Distribution of Products",
            Figure::RatingDistribution => "Product Rating Distribution",
            Figure::ReviewsVsRating => "Reviews vs Ratings",
        }
    }

    /// `(x, y)` axis labels.
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Figure::PriceDistribution => ("Price", "Frequency"),
            Figure::RatingDistribution => ("Rating", "Count"),
            Figure::ReviewsVsRating => ("Number of Reviews", "Rating"),
        }
    }
}

// ---------------------------------------------------------------------------
// Histogram + KDE
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins spanning `[min, max]`; the maximum lands in the last bin.
///
/// A single distinct value gets one unit-wide bin centred on it.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Scott's rule bandwidth: sample std · n^(-1/5).
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let h = var.sqrt() * (n as f64).powf(-0.2);
    (h > 0.0 && h.is_finite()).then_some(h)
}

/// Gaussian kernel density estimate sampled at `points` positions across
/// `[min - 3h, max + 3h]`. Returns `[x, density]` pairs.
pub fn kde(values: &[f64], points: usize) -> Vec<[f64; 2]> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(h) = scott_bandwidth(&finite) else {
        return Vec::new();
    };
    if points < 2 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = (min - 3.0 * h, max + 3.0 * h);
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (finite.len() as f64 * h * (2.0 * PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = finite
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / h).powi(2)).exp())
                .sum();
            [x, density * norm]
        })
        .collect()
}

/// Price histogram with a KDE curve scaled onto the count axis.
#[derive(Debug, Clone, Default)]
pub struct PriceChart {
    pub bins: Vec<Bin>,
    pub density: Vec<[f64; 2]>,
}

impl PriceChart {
    pub fn new(prices: &[f64], bins: usize, kde_points: usize) -> Self {
        let bins = histogram(prices, bins);
        let counted: usize = bins.iter().map(|b| b.count).sum();
        let scale = bins.first().map_or(0.0, Bin::width) * counted as f64;
        let density = kde(prices, kde_points)
            .into_iter()
            .map(|[x, d]| [x, d * scale])
            .collect();
        PriceChart { bins, density }
    }
}

// ---------------------------------------------------------------------------
// Categories and scatter
// ---------------------------------------------------------------------------

/// Rows per distinct non-null value of `column`, in value order.
pub fn category_counts(
    dataset: &Dataset,
    column: &str,
) -> Result<Vec<(Value, usize)>, DataError> {
    let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
    for v in dataset.column(column)?.filter(|v| !v.is_null()) {
        *counts.entry(v.clone()).or_insert(0) += 1;
    }
    Ok(counts.into_iter().collect())
}

/// `[x, y]` points for rows where both cells are numeric.
pub fn scatter(dataset: &Dataset, x: &str, y: &str) -> Result<Vec<[f64; 2]>, DataError> {
    let xi = dataset.column_index(x)?;
    let yi = dataset.column_index(y)?;

    let points: Vec<[f64; 2]> = dataset
        .rows()
        .iter()
        .filter_map(|row| Some([row[xi].as_f64()?, row[yi].as_f64()?]))
        .collect();

    let skipped = dataset.len() - points.len();
    if skipped > 0 {
        log::warn!("Skipped {skipped} rows without numeric '{x}' and '{y}'");
    }
    Ok(points)
}

// ---------------------------------------------------------------------------
// All three figures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ProductCharts {
    pub price: PriceChart,
    pub ratings: Vec<(Value, usize)>,
    pub reviews_vs_rating: Vec<[f64; 2]>,
}

impl ProductCharts {
    pub fn build(dataset: &Dataset, config: &AnalysisConfig) -> Result<Self, DataError> {
        let prices = dataset.numeric_column("price")?;
        let dropped = dataset.len() - prices.len();
        if dropped > 0 {
            log::warn!("Ignoring {dropped} non-numeric or empty prices");
        }

        let charts = ProductCharts {
            price: PriceChart::new(&prices, config.histogram_bins, config.kde_points),
            ratings: category_counts(dataset, "rating")?,
            reviews_vs_rating: scatter(dataset, "reviews", "rating")?,
        };
        log::debug!(
            "Built charts: {} price bins, {} rating categories, {} scatter points",
            charts.price.bins.len(),
            charts.ratings.len(),
            charts.reviews_vs_rating.len()
        );
        Ok(charts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_covers_every_value() {
        let values = [1.0, 2.0, 2.5, 3.0, 10.0];
        let bins = histogram(&values, 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 1.0);
        assert!((bins[2].end - 10.0).abs() < 1e-9);
        assert_eq!(bins[2].count, 1);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        assert!(histogram(&[], 50).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());

        let bins = histogram(&[4.0, 4.0, 4.0], 50);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].center(), 4.0);
    }

    #[test]
    fn kde_integrates_to_one() {
        let values = [9.99, 12.5, 14.0, 19.99, 25.0, 30.0];
        let curve = kde(&values, 400);
        assert_eq!(curve.len(), 400);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|[_, d]| d * step).sum();
        assert!((area - 1.0).abs() < 0.01, "area was {area}");
    }

    #[test]
    fn kde_scale_ignores_non_finite_prices() {
        let finite = [9.99, 12.5, 14.0, 19.99, 25.0, 30.0];
        let mut with_inf = finite.to_vec();
        with_inf.extend([f64::INFINITY, f64::NEG_INFINITY]);

        let clean = PriceChart::new(&finite, 10, 100);
        let noisy = PriceChart::new(&with_inf, 10, 100);
        assert_eq!(clean.bins, noisy.bins);
        for (a, b) in clean.density.iter().zip(&noisy.density) {
            assert!((a[1] - b[1]).abs() < 1e-12);
        }
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde(&[1.0], 100).is_empty());
        assert!(kde(&[2.0, 2.0], 100).is_empty());
        assert_eq!(scott_bandwidth(&[1.0, 3.0]).unwrap(), 2f64.sqrt() * 2f64.powf(-0.2));
    }

    fn products() -> Dataset {
        Dataset::new(
            vec!["price".into(), "rating".into(), "reviews".into()],
            vec![
                vec![Value::Float(9.99), Value::Integer(4), Value::Integer(120)],
                vec![Value::Float(19.99), Value::Integer(5), Value::Integer(300)],
                vec![Value::Float(5.0), Value::Integer(4), Value::Null],
                vec![Value::Null, Value::Null, Value::Integer(10)],
            ],
        )
    }

    #[test]
    fn rating_counts_skip_nulls() {
        let counts = category_counts(&products(), "rating").unwrap();
        assert_eq!(counts, vec![(Value::Integer(4), 2), (Value::Integer(5), 1)]);
    }

    #[test]
    fn scatter_keeps_complete_rows() {
        let points = scatter(&products(), "reviews", "rating").unwrap();
        assert_eq!(points, vec![[120.0, 4.0], [300.0, 5.0]]);
    }

    #[test]
    fn build_requires_the_product_columns() {
        let ds = Dataset::new(vec!["price".into()], vec![vec![Value::Float(1.0)]]);
        let err = ProductCharts::build(&ds, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column } if column == "rating"));
    }

    #[test]
    fn build_all_figures() {
        let charts = ProductCharts::build(&products(), &AnalysisConfig::default()).unwrap();
        assert_eq!(charts.price.bins.len(), 50);
        assert_eq!(charts.price.bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(charts.price.density.len(), 200);
        assert_eq!(charts.ratings.len(), 2);
        assert_eq!(charts.reviews_vs_rating.len(), 2);
    }
}
