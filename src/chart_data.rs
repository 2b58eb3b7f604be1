use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::campaign::CampaignEngine;
use crate::config::ChartStyle;
use crate::customer::CustomerEngine;
use crate::error::Result;
use crate::report::write_metrics;

#[derive(Debug, Serialize)]
struct SegmentShare {
    #[serde(rename = "Segment")]
    segment: &'static str,
    #[serde(rename = "Customers")]
    customers: usize,
}

pub fn write_campaign_tables(
    dir: &Path,
    engine: &CampaignEngine<'_>,
    style: &ChartStyle,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let written = vec![
        write_table(dir, "campaign_roi.csv", engine.campaign_aggregates())?,
        write_table(
            dir,
            "conv_rate_vs_spend.csv",
            &engine.daily_conversion_rates(),
        )?,
        write_table(dir, "monthly_impressions_ctr.csv", &engine.monthly_trends())?,
        write_style(dir, style)?,
    ];

    info!(dir = %dir.display(), files = written.len(), "campaign chart data written");
    Ok(written)
}

pub fn write_customer_tables(
    dir: &Path,
    engine: &CustomerEngine<'_>,
    style: &ChartStyle,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let segments = engine.segment_customers()?;
    let shares = [
        SegmentShare {
            segment: "High Value",
            customers: segments.high_count,
        },
        SegmentShare {
            segment: "Medium Value",
            customers: segments.medium_count,
        },
        SegmentShare {
            segment: "Low Value",
            customers: segments.low_count,
        },
    ];

    let written = vec![
        write_table(dir, "revenue_over_time.csv", &engine.monthly_revenue())?,
        write_table(dir, "category_revenue.csv", &engine.category_revenue())?,
        write_table(dir, "day_of_week.csv", &engine.orders_by_weekday())?,
        write_table(dir, "customer_segments.csv", &shares)?,
        write_table(dir, "customer_revenue.csv", engine.customer_aggregates())?,
        write_table(dir, "order_amounts.csv", &engine.order_amounts())?,
        write_style(dir, style)?,
    ];

    info!(dir = %dir.display(), files = written.len(), "customer chart data written");
    Ok(written)
}

fn write_table<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "table written");
    Ok(path)
}

fn write_style(dir: &Path, style: &ChartStyle) -> Result<PathBuf> {
    let path = dir.join("chart_style.json");
    write_metrics(&path, style)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::models::{CampaignRecord, CustomerRecord};
    use chrono::NaiveDate;

    #[test]
    fn campaign_tables_land_in_directory() {
        let records = vec![CampaignRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            campaign_id: "CMP-1".to_string(),
            impressions: 100,
            clicks: 10,
            conversions: 2,
            spend: 50.0,
            revenue: 80.0,
        }];
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");

        let engine = CampaignEngine::new(&records).unwrap();
        let files = write_campaign_tables(&out, &engine, &ChartStyle::default()).unwrap();
        assert_eq!(files.len(), 4);

        let roi = fs::read_to_string(out.join("campaign_roi.csv")).unwrap();
        let mut lines = roi.lines();
        assert_eq!(lines.next(), Some("Campaign ID,Spend,Revenue,ROI"));
        assert_eq!(lines.next(), Some("CMP-1,50.0,80.0,60.0"));
    }

    #[test]
    fn customer_segment_table_matches_report_counts() {
        let records: Vec<CustomerRecord> = (1..=5)
            .map(|i| CustomerRecord {
                customer_id: format!("C{i}"),
                order_date: NaiveDate::from_ymd_opt(2024, 1, i).unwrap(),
                signup_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                order_amount: 10.0,
                category: Some("Books".to_string()),
            })
            .collect();
        let dir = tempfile::tempdir().unwrap();

        let engine = CustomerEngine::new(&records, AnalysisConfig::default());
        let files = write_customer_tables(dir.path(), &engine, &ChartStyle::default()).unwrap();
        assert_eq!(files.len(), 7);

        let segments = fs::read_to_string(dir.path().join("customer_segments.csv")).unwrap();
        assert_eq!(
            segments,
            "Segment,Customers\nHigh Value,5\nMedium Value,0\nLow Value,0\n"
        );

        let orders = fs::read_to_string(dir.path().join("order_amounts.csv")).unwrap();
        let mut lines = orders.lines();
        assert_eq!(lines.next(), Some("Customer ID,Order Date,Order Amount"));
        assert_eq!(lines.next(), Some("C1,2024-01-01,10.0"));
        assert_eq!(lines.count(), 4);
    }
}
