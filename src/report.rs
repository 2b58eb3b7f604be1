use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::models::{CampaignMetrics, CustomerMetrics, SegmentSummary};

pub fn write_metrics<T: Serialize>(path: &Path, metrics: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    metrics.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(path = %path.display(), "metrics written");
    Ok(())
}

pub fn campaign_summary(metrics: &CampaignMetrics) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "--- Marketing Campaign Metrics ---");
    let _ = writeln!(output, "CTR: {:.2}%", metrics.ctr);
    let _ = writeln!(output, "Conversion Rate: {:.2}%", metrics.conversion_rate);
    let _ = writeln!(output, "CPL: {:.2}", metrics.cpl);
    let _ = writeln!(output, "ROI: {:.2}%", metrics.roi);
    let _ = writeln!(output, "CAC (approx.): {:.2}", metrics.cac);
    let _ = writeln!(
        output,
        "Top Campaign: {} (ROI: {:.2}%)",
        metrics.top_campaign, metrics.top_campaign_roi
    );
    let _ = writeln!(
        output,
        "Bottom Campaign: {} (ROI: {:.2}%)",
        metrics.bottom_campaign, metrics.bottom_campaign_roi
    );

    output
}

pub fn customer_summary(
    metrics: &CustomerMetrics,
    segments: &SegmentSummary,
    churn_window_days: i64,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "--- Customer Metrics ---");
    let _ = writeln!(output, "Active Customers: {}", metrics.active_customers);
    let _ = writeln!(output, "Buying Frequency: {:.2}", metrics.buying_frequency);
    let _ = writeln!(output, "Total Revenue: ${:.2}", metrics.total_revenue);
    let _ = writeln!(output, "Retention Rate: {:.2}%", metrics.retention_rate);
    let _ = writeln!(
        output,
        "Churn Rate (Inactive > {} days): {:.2}%",
        churn_window_days, metrics.churn_rate
    );
    let _ = writeln!(
        output,
        "High Value Customers (>= ${:.2}): {}",
        segments.high_cutoff, segments.high_count
    );
    let _ = writeln!(
        output,
        "Medium Value Customers (>= ${:.2}): {}",
        segments.medium_cutoff, segments.medium_count
    );
    let _ = writeln!(output, "Low Value Customers: {}", segments.low_count);

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign_metrics() -> CampaignMetrics {
        CampaignMetrics {
            ctr: 7.5,
            conversion_rate: 10.0,
            cpl: 13.333333,
            roi: 37.5,
            cac: 13.333333,
            top_campaign: "CMP-B".to_string(),
            top_campaign_roi: 100.0,
            bottom_campaign: "CMP-A".to_string(),
            bottom_campaign_roi: -25.0,
        }
    }

    #[test]
    fn writes_flat_record_with_report_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_metrics.json");
        write_metrics(&path, &campaign_metrics()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n    \"CTR\": 7.5"));
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 9);
        assert_eq!(object["Top Campaign"], "CMP-B");
        assert_eq!(object["Bottom Campaign ROI"], -25.0);
        assert!(object.values().all(|v| !v.is_object() && !v.is_array()));
    }

    #[test]
    fn customer_counts_serialize_as_integers() {
        let metrics = CustomerMetrics {
            active_customers: 3,
            buying_frequency: 2.0,
            total_revenue: 60.0,
            retention_rate: 200.0 / 3.0,
            churn_rate: 0.0,
            high_value_cutoff: 10.0,
            high_value_count: 3,
            medium_value_count: 0,
            low_value_count: 0,
        };
        let value = serde_json::to_value(&metrics).unwrap();
        assert!(value["Active Customers"].is_u64());
        assert!(value["High Value Count"].is_u64());
        assert!(value["Retention Rate"].is_f64());
    }

    #[test]
    fn unwritable_path_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("metrics.json");
        let err = write_metrics(&path, &campaign_metrics()).unwrap_err();
        assert!(matches!(err, crate::error::MetricsError::Io(_)));
    }

    #[test]
    fn campaign_summary_rounds_for_display() {
        let summary = campaign_summary(&campaign_metrics());
        assert!(summary.contains("Top Campaign: CMP-B (ROI: 100.00%)"));
        assert!(summary.contains("CPL: 13.33"));
    }
}
