use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::AnalysisConfig;
use crate::error::{MetricsError, Result};
use crate::models::{
    CategoryRevenue, CustomerAggregate, CustomerMetrics, CustomerRecord, MonthlyRevenue,
    OrderAmount, SegmentSummary, WeekdayOrders,
};
use crate::stats::{percentage, quantile, ratio};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Customer metrics over a cleaned transaction dataset.
///
/// The per-customer aggregate table is built once in [`CustomerEngine::new`]
/// and every customer-level metric reads from it.
pub struct CustomerEngine<'a> {
    records: &'a [CustomerRecord],
    customers: Vec<CustomerAggregate>,
    segments: Option<SegmentSummary>,
    config: AnalysisConfig,
}

impl<'a> CustomerEngine<'a> {
    pub fn new(records: &'a [CustomerRecord], config: AnalysisConfig) -> Self {
        let mut groups: BTreeMap<&str, CustomerAggregate> = BTreeMap::new();
        for record in records {
            let entry = groups
                .entry(record.customer_id.as_str())
                .or_insert_with(|| CustomerAggregate {
                    customer_id: record.customer_id.clone(),
                    total_order_amount: 0.0,
                    order_count: 0,
                    last_order_date: record.order_date,
                });
            entry.total_order_amount += record.order_amount;
            entry.order_count += 1;
            entry.last_order_date = entry.last_order_date.max(record.order_date);
        }

        let customers: Vec<CustomerAggregate> = groups.into_values().collect();
        let segments = segment(&customers, &config);

        Self {
            records,
            customers,
            segments,
            config,
        }
    }

    pub fn customer_aggregates(&self) -> &[CustomerAggregate] {
        &self.customers
    }

    pub fn active_customers(&self) -> usize {
        self.customers.len()
    }

    pub fn buying_frequency(&self) -> Result<f64> {
        ratio(
            self.records.len() as f64,
            self.active_customers() as f64,
            "buying frequency",
            "active customers",
        )
    }

    pub fn total_revenue(&self) -> f64 {
        self.records.iter().map(|record| record.order_amount).sum()
    }

    pub fn retention_rate(&self) -> Result<f64> {
        let retained = self
            .customers
            .iter()
            .filter(|customer| customer.order_count > 1)
            .count();
        percentage(
            retained as f64,
            self.active_customers() as f64,
            "retention rate",
            "active customers",
        )
    }

    /// Latest order date in the dataset; churn is measured against this, not the clock.
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|record| record.order_date).max()
    }

    pub fn churn_rate(&self) -> Result<f64> {
        let current_date = self
            .reference_date()
            .ok_or(MetricsError::EmptyDataset("no orders to measure churn against"))?;
        let churned = self
            .customers
            .iter()
            .filter(|customer| {
                (current_date - customer.last_order_date).num_days()
                    > self.config.churn_window_days
            })
            .count();
        percentage(
            churned as f64,
            self.active_customers() as f64,
            "churn rate",
            "active customers",
        )
    }

    pub fn segment_customers(&self) -> Result<SegmentSummary> {
        self.segments
            .ok_or(MetricsError::EmptyDataset("no customers to segment"))
    }

    pub fn metrics(&self) -> Result<CustomerMetrics> {
        if self.records.is_empty() {
            return Err(MetricsError::EmptyDataset(
                "customer dataset is empty after cleaning",
            ));
        }

        let segments = self.segment_customers()?;
        Ok(CustomerMetrics {
            active_customers: self.active_customers(),
            buying_frequency: self.buying_frequency()?,
            total_revenue: self.total_revenue(),
            retention_rate: self.retention_rate()?,
            churn_rate: self.churn_rate()?,
            high_value_cutoff: segments.high_cutoff,
            high_value_count: segments.high_count,
            medium_value_count: segments.medium_count,
            low_value_count: segments.low_count,
        })
    }

    pub fn monthly_revenue(&self) -> Vec<MonthlyRevenue> {
        let mut months: BTreeMap<String, f64> = BTreeMap::new();
        for record in self.records {
            *months
                .entry(record.order_date.format("%Y-%m").to_string())
                .or_insert(0.0) += record.order_amount;
        }

        months
            .into_iter()
            .map(|(month, order_amount)| MonthlyRevenue {
                month,
                order_amount,
            })
            .collect()
    }

    pub fn order_amounts(&self) -> Vec<OrderAmount> {
        self.records
            .iter()
            .map(|record| OrderAmount {
                customer_id: record.customer_id.clone(),
                order_date: record.order_date,
                order_amount: record.order_amount,
            })
            .collect()
    }

    /// Revenue per category, largest first. Rows without a category are skipped.
    pub fn category_revenue(&self) -> Vec<CategoryRevenue> {
        let mut categories: BTreeMap<&str, f64> = BTreeMap::new();
        for record in self.records {
            if let Some(category) = record.category.as_deref() {
                *categories.entry(category).or_insert(0.0) += record.order_amount;
            }
        }

        let mut values: Vec<CategoryRevenue> = categories
            .into_iter()
            .map(|(category, order_amount)| CategoryRevenue {
                category: category.to_string(),
                order_amount,
            })
            .collect();
        values.sort_by(|a, b| b.order_amount.total_cmp(&a.order_amount));
        values
    }

    pub fn orders_by_weekday(&self) -> Vec<WeekdayOrders> {
        let mut counts = [0usize; 7];
        for record in self.records {
            counts[record.order_date.weekday().num_days_from_monday() as usize] += 1;
        }

        WEEKDAYS
            .iter()
            .zip(counts)
            .map(|(day, orders)| WeekdayOrders {
                day: weekday_name(*day).to_string(),
                orders,
            })
            .collect()
    }
}

fn segment(customers: &[CustomerAggregate], config: &AnalysisConfig) -> Option<SegmentSummary> {
    let mut revenues: Vec<f64> = customers
        .iter()
        .map(|customer| customer.total_order_amount)
        .collect();
    revenues.sort_by(f64::total_cmp);

    let high_cutoff = quantile(&revenues, config.high_value_quantile)?;
    let medium_cutoff = quantile(&revenues, config.medium_value_quantile)?;

    let mut summary = SegmentSummary {
        high_cutoff,
        medium_cutoff,
        high_count: 0,
        medium_count: 0,
        low_count: 0,
    };
    for revenue in revenues {
        if revenue >= high_cutoff {
            summary.high_count += 1;
        } else if revenue >= medium_cutoff {
            summary.medium_count += 1;
        } else {
            summary.low_count += 1;
        }
    }

    Some(summary)
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn order(customer_id: &str, days_before: i64, amount: f64) -> CustomerRecord {
        CustomerRecord {
            customer_id: customer_id.to_string(),
            order_date: base_date() - Duration::days(days_before),
            signup_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            order_amount: amount,
            category: Some("Electronics".to_string()),
        }
    }

    fn engine(records: &[CustomerRecord]) -> CustomerEngine<'_> {
        CustomerEngine::new(records, AnalysisConfig::default())
    }

    #[test]
    fn aggregates_group_by_customer() {
        let records = vec![
            order("C2", 5, 10.0),
            order("C1", 3, 20.0),
            order("C2", 1, 15.0),
        ];
        let engine = engine(&records);
        let customers = engine.customer_aggregates();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].customer_id, "C1");
        assert_eq!(customers[1].order_count, 2);
        assert!((customers[1].total_order_amount - 25.0).abs() < 1e-9);
        assert_eq!(customers[1].last_order_date, base_date() - Duration::days(1));
        assert_eq!(engine.active_customers(), 2);
        assert!((engine.buying_frequency().unwrap() - 1.5).abs() < 1e-9);
        assert!((engine.total_revenue() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn retention_counts_repeat_buyers() {
        let records = vec![
            order("A", 1, 10.0),
            order("B", 1, 10.0),
            order("B", 2, 10.0),
            order("C", 1, 10.0),
            order("C", 2, 10.0),
            order("C", 3, 10.0),
        ];
        let rate = engine(&records).retention_rate().unwrap();
        assert!((rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(format!("{rate:.2}"), "66.67");
    }

    #[test]
    fn churn_is_relative_to_latest_order() {
        let records = vec![order("A", 200, 10.0), order("B", 10, 10.0), order("B", 0, 5.0)];
        let rate = engine(&records).churn_rate().unwrap();
        assert_eq!(rate, 50.0);
    }

    #[test]
    fn churn_window_is_exclusive() {
        let records = vec![order("A", 180, 10.0), order("B", 0, 10.0)];
        assert_eq!(engine(&records).churn_rate().unwrap(), 0.0);
    }

    #[test]
    fn equal_revenues_all_land_in_high_segment() {
        let records: Vec<CustomerRecord> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|id| order(id, 0, 10.0))
            .collect();
        let summary = engine(&records).segment_customers().unwrap();
        assert_eq!(summary.high_cutoff, 10.0);
        assert_eq!(summary.medium_cutoff, 10.0);
        assert_eq!(summary.high_count, 5);
        assert_eq!(summary.medium_count, 0);
        assert_eq!(summary.low_count, 0);
    }

    #[test]
    fn segments_split_on_interpolated_cutoffs() {
        let records: Vec<CustomerRecord> = [("A", 10.0), ("B", 20.0), ("C", 30.0), ("D", 40.0), ("E", 50.0)]
            .iter()
            .map(|(id, amount)| order(id, 0, *amount))
            .collect();
        let summary = engine(&records).segment_customers().unwrap();
        assert!((summary.high_cutoff - 42.0).abs() < 1e-9);
        assert_eq!(summary.medium_cutoff, 30.0);
        assert_eq!(summary.high_count, 1);
        assert_eq!(summary.medium_count, 2);
        assert_eq!(summary.low_count, 2);
    }

    #[test]
    fn empty_dataset_is_explicit() {
        let engine = engine(&[]);
        assert!(matches!(engine.metrics(), Err(MetricsError::EmptyDataset(_))));
        assert!(matches!(
            engine.buying_frequency(),
            Err(MetricsError::DivisionByZero { .. })
        ));
        assert!(matches!(engine.churn_rate(), Err(MetricsError::EmptyDataset(_))));
    }

    #[test]
    fn metrics_collect_every_field() {
        let records = vec![
            order("A", 200, 10.0),
            order("B", 10, 30.0),
            order("B", 0, 20.0),
        ];
        let metrics = engine(&records).metrics().unwrap();
        assert_eq!(metrics.active_customers, 2);
        assert!((metrics.buying_frequency - 1.5).abs() < 1e-9);
        assert!((metrics.total_revenue - 60.0).abs() < 1e-9);
        assert_eq!(metrics.retention_rate, 50.0);
        assert_eq!(metrics.churn_rate, 50.0);
        assert!((metrics.high_value_cutoff - 42.0).abs() < 1e-9);
        assert_eq!(metrics.high_value_count, 1);
        assert_eq!(metrics.medium_value_count, 0);
        assert_eq!(metrics.low_value_count, 1);
    }

    #[test]
    fn trend_tables() {
        let mut records = vec![order("A", 0, 10.0), order("B", 40, 25.0)];
        records[1].category = Some("Books".to_string());
        records.push(CustomerRecord {
            category: None,
            ..order("C", 0, 5.0)
        });
        let engine = engine(&records);

        let months = engine.monthly_revenue();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-05");
        assert_eq!(months[1].month, "2024-06");
        assert!((months[1].order_amount - 15.0).abs() < 1e-9);

        let categories = engine.category_revenue();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Books");

        let weekdays = engine.orders_by_weekday();
        assert_eq!(weekdays.len(), 7);
        assert_eq!(weekdays[0].day, "Monday");
        // 2024-06-30 is a Sunday
        assert_eq!(weekdays[6].orders, 2);
        assert_eq!(weekdays.iter().map(|day| day.orders).sum::<usize>(), 3);

        let orders = engine.order_amounts();
        let amounts: Vec<f64> = orders.iter().map(|order| order.order_amount).collect();
        assert_eq!(amounts, vec![10.0, 25.0, 5.0]);
    }
}
