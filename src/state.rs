use std::collections::BTreeMap;

use product_lens::charts::{Figure, ProductCharts};
use product_lens::color::ColorMap;
use product_lens::config::AnalysisConfig;
use product_lens::data::{DataError, Dataset, Value};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Everything the viewer shows, computed once from the loaded dataset.
pub struct AppState {
    /// Figure shown in the central panel.
    pub figure: Figure,

    pub charts: ProductCharts,

    /// Colours for the rating bars.
    pub rating_colors: ColorMap,

    /// Average review count per rating (side panel).
    pub reviews_per_rating: BTreeMap<Value, f64>,

    pub n_rows: usize,
    pub columns: Vec<String>,
}

impl AppState {
    pub fn new(dataset: &Dataset, config: &AnalysisConfig) -> Result<Self, DataError> {
        let charts = ProductCharts::build(dataset, config)?;
        let rating_colors = ColorMap::new(charts.ratings.iter().map(|(v, _)| v));
        let reviews_per_rating =
            product_lens::analysis::mean_by_group(dataset, "rating", "reviews")?;

        Ok(Self {
            figure: Figure::PriceDistribution,
            charts,
            rating_colors,
            reviews_per_rating,
            n_rows: dataset.len(),
            columns: dataset.columns().to_vec(),
        })
    }

    pub fn select(&mut self, figure: Figure) {
        if self.figure != figure {
            log::debug!("Showing '{}'", figure.title());
            self.figure = figure;
        }
    }
}
