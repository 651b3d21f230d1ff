// ---------------------------------------------------------------------------
// Run-wide settings
// ---------------------------------------------------------------------------

/// Columns the analysis and the three figures read.
pub const REQUIRED_COLUMNS: [&str; 3] = ["price", "rating", "reviews"];

/// Knobs shared by the analysis printout, the charts and the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Bars in the price histogram.
    pub histogram_bins: usize,
    /// Samples along the price KDE curve.
    pub kde_points: usize,
    /// Rows shown in the dataset overview.
    pub head_rows: usize,
    pub required_columns: Vec<String>,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            kde_points: 200,
            head_rows: 5,
            required_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            window_size: [1000.0, 600.0],
            min_window_size: [600.0, 400.0],
        }
    }
}

impl AnalysisConfig {
    pub fn required_columns(&self) -> Vec<&str> {
        self.required_columns.iter().map(String::as_str).collect()
    }
}
