use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    pub campaign_id: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub order_date: NaiveDate,
    pub signup_date: NaiveDate,
    pub order_amount: f64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CampaignTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignAggregate {
    #[serde(rename = "Campaign ID")]
    pub campaign_id: String,
    #[serde(rename = "Spend")]
    pub spend: f64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "ROI")]
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAggregate {
    #[serde(rename = "Customer ID")]
    pub customer_id: String,
    #[serde(rename = "Total Order Amount")]
    pub total_order_amount: f64,
    #[serde(rename = "Order Count")]
    pub order_count: usize,
    #[serde(rename = "Last Order Date")]
    pub last_order_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSummary {
    pub high_cutoff: f64,
    pub medium_cutoff: f64,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
}

/// Flat campaign report; field names are the persisted keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignMetrics {
    #[serde(rename = "CTR")]
    pub ctr: f64,
    #[serde(rename = "Conversion Rate")]
    pub conversion_rate: f64,
    #[serde(rename = "CPL")]
    pub cpl: f64,
    #[serde(rename = "ROI")]
    pub roi: f64,
    #[serde(rename = "CAC")]
    pub cac: f64,
    #[serde(rename = "Top Campaign")]
    pub top_campaign: String,
    #[serde(rename = "Top Campaign ROI")]
    pub top_campaign_roi: f64,
    #[serde(rename = "Bottom Campaign")]
    pub bottom_campaign: String,
    #[serde(rename = "Bottom Campaign ROI")]
    pub bottom_campaign_roi: f64,
}

/// Flat customer report; field names are the persisted keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMetrics {
    #[serde(rename = "Active Customers")]
    pub active_customers: usize,
    #[serde(rename = "Buying Frequency")]
    pub buying_frequency: f64,
    #[serde(rename = "Total Revenue")]
    pub total_revenue: f64,
    #[serde(rename = "Retention Rate")]
    pub retention_rate: f64,
    #[serde(rename = "Churn Rate")]
    pub churn_rate: f64,
    #[serde(rename = "High Value Cutoff")]
    pub high_value_cutoff: f64,
    #[serde(rename = "High Value Count")]
    pub high_value_count: usize,
    #[serde(rename = "Medium Value Count")]
    pub medium_value_count: usize,
    #[serde(rename = "Low Value Count")]
    pub low_value_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCampaignTrend {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Impressions")]
    pub impressions: u64,
    #[serde(rename = "Clicks")]
    pub clicks: u64,
    #[serde(rename = "CTR")]
    pub ctr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyConversionPoint {
    #[serde(rename = "Campaign ID")]
    pub campaign_id: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Spend")]
    pub spend: f64,
    #[serde(rename = "Daily_Conv_Rate")]
    pub conversion_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Order Amount")]
    pub order_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAmount {
    #[serde(rename = "Customer ID")]
    pub customer_id: String,
    #[serde(rename = "Order Date")]
    pub order_date: NaiveDate,
    #[serde(rename = "Order Amount")]
    pub order_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Order Amount")]
    pub order_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayOrders {
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Orders")]
    pub orders: usize,
}
