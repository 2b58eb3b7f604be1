use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::{MetricsError, Result};
use crate::models::{CampaignRecord, CustomerRecord};

pub const CAMPAIGN_COLUMNS: [&str; 7] = [
    "Date",
    "Campaign ID",
    "Impressions",
    "Clicks",
    "Conversions",
    "Spend",
    "Revenue",
];

pub const CUSTOMER_COLUMNS: [&str; 5] = [
    "Customer ID",
    "Order Date",
    "Signup Date",
    "Order Amount",
    "Category",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

// Cell values read as missing, in addition to an empty cell.
const MISSING_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|text| !is_missing(text)))
}

fn optional_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_text(deserializer)? {
        None => Ok(None),
        Some(text) => {
            let number: f64 = text.trim().parse().map_err(|_| {
                <D::Error as serde::de::Error>::custom(format!("invalid number {text:?}"))
            })?;
            Ok(Some(number).filter(|n| !n.is_nan()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCampaignRow {
    #[serde(rename = "Date", deserialize_with = "optional_text")]
    pub date: Option<String>,
    #[serde(rename = "Campaign ID", deserialize_with = "optional_text")]
    pub campaign_id: Option<String>,
    #[serde(rename = "Impressions", deserialize_with = "optional_number")]
    pub impressions: Option<f64>,
    #[serde(rename = "Clicks", deserialize_with = "optional_number")]
    pub clicks: Option<f64>,
    #[serde(rename = "Conversions", deserialize_with = "optional_number")]
    pub conversions: Option<f64>,
    #[serde(rename = "Spend", deserialize_with = "optional_number")]
    pub spend: Option<f64>,
    #[serde(rename = "Revenue", deserialize_with = "optional_number")]
    pub revenue: Option<f64>,
}

impl From<&CampaignRecord> for RawCampaignRow {
    fn from(record: &CampaignRecord) -> Self {
        Self {
            date: Some(record.date.to_string()),
            campaign_id: Some(record.campaign_id.clone()),
            impressions: Some(record.impressions as f64),
            clicks: Some(record.clicks as f64),
            conversions: Some(record.conversions as f64),
            spend: Some(record.spend),
            revenue: Some(record.revenue),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCustomerRow {
    #[serde(rename = "Customer ID", deserialize_with = "optional_text")]
    pub customer_id: Option<String>,
    #[serde(rename = "Order Date", deserialize_with = "optional_text")]
    pub order_date: Option<String>,
    #[serde(rename = "Signup Date", deserialize_with = "optional_text")]
    pub signup_date: Option<String>,
    #[serde(rename = "Order Amount", deserialize_with = "optional_number")]
    pub order_amount: Option<f64>,
    #[serde(rename = "Category", deserialize_with = "optional_text")]
    pub category: Option<String>,
}

impl RawCustomerRow {
    fn dedup_key(&self) -> (Option<&str>, Option<&str>, Option<&str>, Option<u64>, Option<&str>) {
        (
            self.customer_id.as_deref(),
            self.order_date.as_deref(),
            self.signup_date.as_deref(),
            // -0.0 and 0.0 compare equal as values
            self.order_amount.map(|v| if v == 0.0 { 0 } else { v.to_bits() }),
            self.category.as_deref(),
        )
    }
}

impl From<&CustomerRecord> for RawCustomerRow {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            customer_id: Some(record.customer_id.clone()),
            order_date: Some(record.order_date.to_string()),
            signup_date: Some(record.signup_date.to_string()),
            order_amount: Some(record.order_amount),
            category: record.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedCustomers {
    pub records: Vec<CustomerRecord>,
    pub duplicates_removed: usize,
}

pub fn read_campaign_table(path: &Path) -> Result<Vec<RawCampaignRow>> {
    read_table(path, &CAMPAIGN_COLUMNS)
}

pub fn read_customer_table(path: &Path) -> Result<Vec<RawCustomerRow>> {
    read_table(path, &CUSTOMER_COLUMNS)
}

fn read_table<T>(path: &Path, required: &[&str]) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Err(MetricsError::InputNotFound(path.to_path_buf()));
    }

    info!(path = %path.display(), "loading data");
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(MetricsError::DataFormat(format!(
                "missing required column {column:?} in {}",
                path.display()
            )));
        }
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        let row = result.map_err(|err| {
            MetricsError::DataFormat(format!("row {}: {err}", index + 1))
        })?;
        rows.push(row);
    }

    debug!(rows = rows.len(), "rows read");
    Ok(rows)
}

/// Drops rows missing Clicks or Spend, then rows with Spend <= 0, then parses dates.
pub fn clean_campaigns(rows: &[RawCampaignRow]) -> Result<Vec<CampaignRecord>> {
    let present: Vec<&RawCampaignRow> = rows
        .iter()
        .filter(|row| row.clicks.is_some() && row.spend.is_some())
        .collect();
    let missing_dropped = rows.len() - present.len();

    let positive: Vec<&RawCampaignRow> = present
        .into_iter()
        .filter(|row| row.spend.is_some_and(|spend| spend > 0.0))
        .collect();

    info!(
        missing_dropped,
        non_positive_spend_dropped = rows.len() - missing_dropped - positive.len(),
        kept = positive.len(),
        "cleaned campaign rows"
    );

    positive
        .into_iter()
        .map(|row| -> Result<CampaignRecord> {
            Ok(CampaignRecord {
                date: parse_date("Date", row.date.as_deref())?,
                campaign_id: row
                    .campaign_id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| MetricsError::DataFormat("missing Campaign ID".to_string()))?,
                impressions: parse_count("Impressions", row.impressions)?,
                clicks: parse_count("Clicks", row.clicks)?,
                conversions: parse_count("Conversions", row.conversions)?,
                spend: row.spend.unwrap_or_default(),
                revenue: row.revenue.unwrap_or(0.0),
            })
        })
        .collect()
}

/// Drops exact duplicates, rows missing Customer ID or Order Amount, rows with
/// Order Amount <= 0, then parses both date columns.
pub fn clean_customers(rows: &[RawCustomerRow]) -> Result<CleanedCustomers> {
    let mut seen = HashSet::new();
    let unique: Vec<&RawCustomerRow> = rows
        .iter()
        .filter(|&row| seen.insert(row.dedup_key()))
        .collect();
    let duplicates_removed = rows.len() - unique.len();

    let present: Vec<&RawCustomerRow> = unique
        .into_iter()
        .filter(|row| {
            row.customer_id.as_deref().is_some_and(|id| !id.is_empty())
                && row.order_amount.is_some()
        })
        .collect();

    let positive: Vec<&RawCustomerRow> = present
        .iter()
        .copied()
        .filter(|row| row.order_amount.is_some_and(|amount| amount > 0.0))
        .collect();

    info!(
        duplicates_removed,
        non_positive_amount_dropped = present.len() - positive.len(),
        kept = positive.len(),
        "cleaned customer rows"
    );

    let records = positive
        .into_iter()
        .map(|row| -> Result<CustomerRecord> {
            Ok(CustomerRecord {
                customer_id: row.customer_id.clone().unwrap_or_default(),
                order_date: parse_date("Order Date", row.order_date.as_deref())?,
                signup_date: parse_date("Signup Date", row.signup_date.as_deref())?,
                order_amount: row.order_amount.unwrap_or_default(),
                category: row.category.clone().filter(|category| !category.is_empty()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CleanedCustomers {
        records,
        duplicates_removed,
    })
}

pub fn parse_date(column: &'static str, value: Option<&str>) -> Result<NaiveDate> {
    let raw = value.unwrap_or_default().trim();
    let parse_error = || MetricsError::DateParse {
        column,
        value: raw.to_string(),
    };
    if raw.is_empty() {
        return Err(parse_error());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|datetime| datetime.date())
        })
        .ok_or_else(parse_error)
}

fn parse_count(column: &str, value: Option<f64>) -> Result<u64> {
    match value {
        None => Ok(0),
        Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as u64),
        Some(v) => Err(MetricsError::DataFormat(format!(
            "{column} must be a non-negative integer, got {v}"
        ))),
    }
}
