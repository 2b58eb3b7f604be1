use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// A customer is churned when inactive for strictly more days than this.
    pub churn_window_days: i64,
    pub high_value_quantile: f64,
    pub medium_value_quantile: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            churn_window_days: 180,
            high_value_quantile: 0.8,
            medium_value_quantile: 0.5,
        }
    }
}

/// Presentation settings handed to the chart-data writer alongside each table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub theme: String,
    pub palette: Vec<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            theme: "whitegrid".to_string(),
            palette: vec![
                "#ff9999".to_string(),
                "#66b3ff".to_string(),
                "#99ff99".to_string(),
            ],
        }
    }
}
