use std::path::PathBuf;

use tracing::info;

use crate::campaign::CampaignEngine;
use crate::chart_data;
use crate::config::{AnalysisConfig, ChartStyle};
use crate::customer::CustomerEngine;
use crate::error::Result;
use crate::loader;
use crate::models::{CampaignMetrics, CustomerMetrics};
use crate::report;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub chart_dir: Option<PathBuf>,
    pub style: ChartStyle,
}

/// Load, clean, compute and write the campaign report. The report is only
/// written once every metric has been computed.
pub fn run_campaigns(options: &RunOptions) -> Result<CampaignMetrics> {
    let raw = loader::read_campaign_table(&options.input)?;
    let records = loader::clean_campaigns(&raw)?;

    let engine = CampaignEngine::new(&records)?;
    let metrics = engine.metrics()?;
    print!("{}", report::campaign_summary(&metrics));

    report::write_metrics(&options.output, &metrics)?;
    if let Some(dir) = &options.chart_dir {
        chart_data::write_campaign_tables(dir, &engine, &options.style)?;
    }

    info!(campaigns = engine.campaign_aggregates().len(), "campaign run finished");
    Ok(metrics)
}

pub fn run_customers(options: &RunOptions, config: AnalysisConfig) -> Result<CustomerMetrics> {
    let raw = loader::read_customer_table(&options.input)?;
    let cleaned = loader::clean_customers(&raw)?;
    println!("Removed {} duplicate rows.", cleaned.duplicates_removed);

    let engine = CustomerEngine::new(&cleaned.records, config);
    let metrics = engine.metrics()?;
    let segments = engine.segment_customers()?;
    print!(
        "{}",
        report::customer_summary(&metrics, &segments, config.churn_window_days)
    );

    report::write_metrics(&options.output, &metrics)?;
    if let Some(dir) = &options.chart_dir {
        chart_data::write_customer_tables(dir, &engine, &options.style)?;
    }

    info!(customers = engine.active_customers(), "customer run finished");
    Ok(metrics)
}
