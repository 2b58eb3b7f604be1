use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod campaign;
mod chart_data;
mod config;
mod customer;
mod error;
mod loader;
mod models;
mod pipeline;
mod report;
mod stats;

use config::{AnalysisConfig, ChartStyle};
use error::MetricsError;
use pipeline::RunOptions;

#[derive(Parser)]
#[command(name = "growth-metrics")]
#[command(about = "Campaign and customer metrics from flat CSV exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute marketing campaign metrics
    Campaigns {
        #[arg(long, env = "CAMPAIGN_INPUT", default_value = "marketing_campaigns.csv")]
        input: PathBuf,
        #[arg(long, env = "CAMPAIGN_OUTPUT", default_value = "campaign_metrics.json")]
        out: PathBuf,
        #[command(flatten)]
        charts: ChartArgs,
    },
    /// Compute customer transaction metrics
    Customers {
        #[arg(long, env = "CUSTOMER_INPUT", default_value = "customer_transactions.csv")]
        input: PathBuf,
        #[arg(long, env = "CUSTOMER_OUTPUT", default_value = "customer_metrics.json")]
        out: PathBuf,
        /// Days without an order after which a customer counts as churned
        #[arg(long, default_value_t = 180)]
        churn_days: i64,
        #[arg(long, default_value_t = 0.8)]
        high_quantile: f64,
        #[arg(long, default_value_t = 0.5)]
        medium_quantile: f64,
        #[command(flatten)]
        charts: ChartArgs,
    },
}

#[derive(Args)]
struct ChartArgs {
    /// Directory for chart-ready CSV tables
    #[arg(long)]
    chart_data: Option<PathBuf>,
    #[arg(long, default_value = "whitegrid")]
    theme: String,
}

impl ChartArgs {
    fn style(&self) -> ChartStyle {
        ChartStyle {
            theme: self.theme.clone(),
            ..ChartStyle::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "growth_metrics=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Campaigns { input, out, charts } => {
            let options = RunOptions {
                input,
                output: out,
                chart_dir: charts.chart_data.clone(),
                style: charts.style(),
            };
            match pipeline::run_campaigns(&options) {
                Err(MetricsError::InputNotFound(path)) => {
                    println!("Data file not found: {}.", path.display());
                }
                result => {
                    result.context("campaign analysis failed")?;
                    println!(
                        "Campaign analysis complete. Metrics written to {}.",
                        options.output.display()
                    );
                }
            }
        }
        Commands::Customers {
            input,
            out,
            churn_days,
            high_quantile,
            medium_quantile,
            charts,
        } => {
            anyhow::ensure!(
                (0.0..=1.0).contains(&high_quantile) && (0.0..=1.0).contains(&medium_quantile),
                "quantiles must lie in [0, 1]"
            );
            let config = AnalysisConfig {
                churn_window_days: churn_days,
                high_value_quantile: high_quantile,
                medium_value_quantile: medium_quantile,
            };
            let options = RunOptions {
                input,
                output: out,
                chart_dir: charts.chart_data.clone(),
                style: charts.style(),
            };
            match pipeline::run_customers(&options, config) {
                Err(MetricsError::InputNotFound(path)) => {
                    println!("Data file not found: {}.", path.display());
                }
                result => {
                    result.context("customer analysis failed")?;
                    println!(
                        "Customer analysis complete. Metrics written to {}.",
                        options.output.display()
                    );
                }
            }
        }
    }

    Ok(())
}
