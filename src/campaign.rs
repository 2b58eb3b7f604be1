use std::collections::BTreeMap;

use crate::error::{MetricsError, Result};
use crate::models::{
    CampaignAggregate, CampaignMetrics, CampaignRecord, CampaignTotals, DailyConversionPoint,
    MonthlyCampaignTrend,
};
use crate::stats::{percentage, ratio};

/// Metrics over a cleaned campaign dataset. The per-campaign table is built
/// once in [`CampaignEngine::new`].
pub struct CampaignEngine<'a> {
    records: &'a [CampaignRecord],
    campaigns: Vec<CampaignAggregate>,
}

impl<'a> CampaignEngine<'a> {
    pub fn new(records: &'a [CampaignRecord]) -> Result<Self> {
        let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for record in records {
            let entry = groups.entry(record.campaign_id.as_str()).or_insert((0.0, 0.0));
            entry.0 += record.spend;
            entry.1 += record.revenue;
        }

        let mut campaigns = groups
            .into_iter()
            .map(|(campaign_id, (spend, revenue))| -> Result<CampaignAggregate> {
                Ok(CampaignAggregate {
                    campaign_id: campaign_id.to_string(),
                    spend,
                    revenue,
                    roi: roi(revenue, spend)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // all-numeric IDs order by value, so "2" precedes "10"
        let all_numeric = campaigns
            .iter()
            .all(|campaign| campaign.campaign_id.parse::<f64>().is_ok());
        if all_numeric {
            campaigns.sort_by(|a, b| {
                let a = a.campaign_id.parse::<f64>().unwrap_or_default();
                let b = b.campaign_id.parse::<f64>().unwrap_or_default();
                a.total_cmp(&b)
            });
        }

        Ok(Self { records, campaigns })
    }

    pub fn totals(&self) -> CampaignTotals {
        self.records
            .iter()
            .fold(CampaignTotals::default(), |mut totals, record| {
                totals.impressions += record.impressions;
                totals.clicks += record.clicks;
                totals.conversions += record.conversions;
                totals.spend += record.spend;
                totals.revenue += record.revenue;
                totals
            })
    }

    pub fn ctr(&self) -> Result<f64> {
        let totals = self.totals();
        percentage(
            totals.clicks as f64,
            totals.impressions as f64,
            "CTR",
            "total impressions",
        )
    }

    pub fn conversion_rate(&self) -> Result<f64> {
        let totals = self.totals();
        percentage(
            totals.conversions as f64,
            totals.clicks as f64,
            "conversion rate",
            "total clicks",
        )
    }

    pub fn cost_per_lead(&self) -> Result<f64> {
        let totals = self.totals();
        ratio(
            totals.spend,
            totals.conversions as f64,
            "CPL",
            "total conversions",
        )
    }

    pub fn roi(&self) -> Result<f64> {
        let totals = self.totals();
        roi(totals.revenue, totals.spend)
    }

    /// Acquisition cost approximated by cost per lead.
    pub fn cost_acquisition_approx(&self) -> Result<f64> {
        self.cost_per_lead()
    }

    /// One row per campaign, ascending by Campaign ID (by value when every ID is numeric).
    pub fn campaign_aggregates(&self) -> &[CampaignAggregate] {
        &self.campaigns
    }

    /// Highest and lowest ROI campaigns; ties go to the lowest Campaign ID.
    pub fn top_and_bottom_campaign(&self) -> Result<(CampaignAggregate, CampaignAggregate)> {
        let mut iter = self.campaigns.iter();
        let first = iter
            .next()
            .ok_or(MetricsError::EmptyDataset("no campaigns to rank"))?;

        let (top, bottom) = iter.fold((first, first), |(top, bottom), current| {
            let top = if current.roi > top.roi { current } else { top };
            let bottom = if current.roi < bottom.roi {
                current
            } else {
                bottom
            };
            (top, bottom)
        });

        Ok((top.clone(), bottom.clone()))
    }

    pub fn metrics(&self) -> Result<CampaignMetrics> {
        if self.records.is_empty() {
            return Err(MetricsError::EmptyDataset("campaign dataset is empty after cleaning"));
        }

        let (top, bottom) = self.top_and_bottom_campaign()?;
        Ok(CampaignMetrics {
            ctr: self.ctr()?,
            conversion_rate: self.conversion_rate()?,
            cpl: self.cost_per_lead()?,
            roi: self.roi()?,
            cac: self.cost_acquisition_approx()?,
            top_campaign: top.campaign_id,
            top_campaign_roi: top.roi,
            bottom_campaign: bottom.campaign_id,
            bottom_campaign_roi: bottom.roi,
        })
    }

    /// Per-row conversion rate; `None` where a row has no clicks.
    pub fn daily_conversion_rates(&self) -> Vec<DailyConversionPoint> {
        self.records
            .iter()
            .map(|record| DailyConversionPoint {
                campaign_id: record.campaign_id.clone(),
                date: record.date,
                spend: record.spend,
                conversion_rate: percentage(
                    record.conversions as f64,
                    record.clicks as f64,
                    "daily conversion rate",
                    "clicks",
                )
                .ok(),
            })
            .collect()
    }

    /// Impressions, clicks and CTR per calendar month, oldest first.
    pub fn monthly_trends(&self) -> Vec<MonthlyCampaignTrend> {
        let mut months: BTreeMap<String, (u64, u64)> = BTreeMap::new();
        for record in self.records {
            let entry = months
                .entry(record.date.format("%Y-%m").to_string())
                .or_insert((0, 0));
            entry.0 += record.impressions;
            entry.1 += record.clicks;
        }

        months
            .into_iter()
            .map(|(month, (impressions, clicks))| MonthlyCampaignTrend {
                month,
                impressions,
                clicks,
                ctr: percentage(clicks as f64, impressions as f64, "monthly CTR", "impressions")
                    .ok(),
            })
            .collect()
    }
}

fn roi(revenue: f64, spend: f64) -> Result<f64> {
    percentage(revenue - spend, spend, "ROI", "total spend")
}
