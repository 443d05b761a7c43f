use crate::ingestion::Product;
use crate::utils::{month_name, month_year_label, round_to_integer, week_end, MonthNameLocale};
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const COMPLETE_MONTH_MIN_WEEKS: u32 = 4;

/// Calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(&self, locale: MonthNameLocale) -> String {
        month_year_label(self.year, self.month, locale)
    }
}

/// Running forecast total for one SKU in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub sku: String,
    pub month: MonthKey,
    pub total: f64,
    pub weeks: u32,
}

impl MonthlyBucket {
    pub fn is_complete(&self, min_weeks: u32) -> bool {
        self.weeks >= min_weeks
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub sku: String,
    /// One cell per reported month; `None` when this SKU did not reach the
    /// minimum number of weeks in that month.
    pub cells: Vec<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyForecast {
    pub months: Vec<MonthKey>,
    pub labels: Vec<String>,
    pub rows: Vec<MonthlyRow>,
}

pub struct MonthlyAggregator {
    min_weeks: u32,
    locale: MonthNameLocale,
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new(COMPLETE_MONTH_MIN_WEEKS, MonthNameLocale::default())
    }
}

impl MonthlyAggregator {
    pub fn new(min_weeks: u32, locale: MonthNameLocale) -> Self {
        Self { min_weeks, locale }
    }

    /// Sums each product's forecast into calendar-month buckets.
    ///
    /// `horizon` is the shared forecast axis; a product contributes the value
    /// it forecasts for each horizon date, attributed to that date's month.
    /// Absent values neither add to the total nor count as a week.
    pub fn buckets(&self, products: &[Product], horizon: &[NaiveDate]) -> Vec<MonthlyBucket> {
        let mut buckets: Vec<MonthlyBucket> = Vec::new();

        for product in products {
            let mut per_month: BTreeMap<MonthKey, MonthlyBucket> = BTreeMap::new();
            for date in horizon {
                let Some(value) = product.forecast_value_on(*date) else {
                    continue;
                };
                let month = MonthKey::of(*date);
                let bucket = per_month.entry(month).or_insert_with(|| MonthlyBucket {
                    sku: product.sku().to_string(),
                    month,
                    total: 0.0,
                    weeks: 0,
                });
                bucket.total += value;
                bucket.weeks += 1;
            }
            buckets.extend(per_month.into_values());
        }

        buckets
    }

    pub fn aggregate(&self, products: &[Product], horizon: &[NaiveDate]) -> MonthlyForecast {
        let buckets = self.buckets(products, horizon);

        let months: Vec<MonthKey> = buckets
            .iter()
            .filter(|b| b.is_complete(self.min_weeks))
            .map(|b| b.month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        debug!(
            "Aggregated {} buckets across {} products; {} complete months",
            buckets.len(),
            products.len(),
            months.len()
        );

        let mut complete: BTreeMap<(&str, MonthKey), i64> = BTreeMap::new();
        for bucket in &buckets {
            if bucket.is_complete(self.min_weeks) {
                complete.insert(
                    (bucket.sku.as_str(), bucket.month),
                    round_to_integer(bucket.total),
                );
            }
        }

        let rows = products
            .iter()
            .map(|product| MonthlyRow {
                sku: product.sku().to_string(),
                cells: months
                    .iter()
                    .map(|month| complete.get(&(product.sku(), *month)).copied())
                    .collect(),
            })
            .collect();

        MonthlyForecast {
            labels: months.iter().map(|m| m.label(self.locale)).collect(),
            months,
            rows,
        }
    }

    /// Header for the week starting on `start`: the month label, or
    /// "MonthA→MonthB" when the week's seventh day falls in another month.
    pub fn week_label(&self, start: NaiveDate) -> String {
        let end = week_end(start);
        let start_name = month_name(start.month(), self.locale);
        let end_name = month_name(end.month(), self.locale);
        if start_name != end_name {
            format!("{}→{}", start_name, end_name)
        } else {
            month_year_label(start.year(), start.month(), self.locale)
        }
    }

    pub fn week_labels(&self, horizon: &[NaiveDate]) -> Vec<String> {
        horizon.iter().map(|d| self.week_label(*d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProductRecord;
    use chrono::Days;

    fn weekly_horizon(start: NaiveDate, weeks: u64) -> Vec<NaiveDate> {
        (0..weeks)
            .map(|w| start.checked_add_days(Days::new(7 * w)).unwrap())
            .collect()
    }

    fn product(sku: &str, horizon: &[NaiveDate], values: &[f64]) -> Product {
        let dates: Vec<String> = horizon.iter().map(|d| d.to_string()).collect();
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        Product::from_record(ProductRecord {
            sku: sku.to_string(),
            forecast_dates: dates.join(", "),
            forecast_values: values.join(", "),
            ..Default::default()
        })
    }

    #[test]
    fn test_complete_months_only() {
        // Jan 1..Feb 19 2024: five weeks in January, three in February.
        let horizon = weekly_horizon(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 8);
        let products = vec![product("A", &horizon, &[10.0, 10.0, 10.0, 10.0, 10.4, 5.0, 5.0, 5.0])];

        let result = MonthlyAggregator::default().aggregate(&products, &horizon);

        assert_eq!(result.months, vec![MonthKey { year: 2024, month: 1 }]);
        assert_eq!(result.labels, vec!["Enero 2024"]);
        assert_eq!(result.rows[0].cells, vec![Some(50)]);
    }

    #[test]
    fn test_incomplete_cell_is_blank_not_zero() {
        let horizon = weekly_horizon(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5);
        // B has only two forecast values, so it never completes January.
        let products = vec![
            product("A", &horizon, &[0.0, 0.0, 0.0, 0.0, 0.0]),
            product("B", &horizon, &[3.0, 4.0]),
        ];

        let result = MonthlyAggregator::default().aggregate(&products, &horizon);

        assert_eq!(result.months.len(), 1);
        assert_eq!(result.rows[0].cells, vec![Some(0)]);
        assert_eq!(result.rows[1].cells, vec![None]);
    }

    #[test]
    fn test_months_sorted_chronologically_across_years() {
        let horizon = weekly_horizon(NaiveDate::from_ymd_opt(2023, 11, 6).unwrap(), 13);
        let products = vec![product("A", &horizon, &[1.0; 13])];

        let result = MonthlyAggregator::default().aggregate(&products, &horizon);

        assert_eq!(
            result.labels,
            vec!["Noviembre 2023", "Diciembre 2023", "Enero 2024"]
        );
        assert_eq!(result.rows[0].cells, vec![Some(4), Some(4), Some(5)]);
    }

    #[test]
    fn test_buckets_track_week_counts() {
        let horizon = weekly_horizon(NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(), 3);
        let products = vec![product("A", &horizon, &[1.5, 2.5, 4.0])];

        let buckets = MonthlyAggregator::default().buckets(&products, &horizon);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].month, MonthKey { year: 2024, month: 1 });
        assert_eq!(buckets[0].weeks, 2);
        assert!((buckets[0].total - 4.0).abs() < 1e-9);
        assert_eq!(buckets[1].weeks, 1);
        assert!(!buckets[1].is_complete(COMPLETE_MONTH_MIN_WEEKS));
    }

    #[test]
    fn test_dropped_date_does_not_shift_later_weeks() {
        let horizon = weekly_horizon(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 4);
        let shifted = Product::from_record(ProductRecord {
            sku: "B".to_string(),
            forecast_dates: "2024-01-01 2024-02-30 2024-01-15 2024-01-22".to_string(),
            forecast_values: "1 2 3 4".to_string(),
            ..Default::default()
        });

        let buckets = MonthlyAggregator::default().buckets(&[shifted], &horizon);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].weeks, 3);
        assert!((buckets[0].total - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_week_label_transition() {
        let aggregator = MonthlyAggregator::default();

        let last_day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let label = aggregator.week_label(last_day);
        assert!(label.contains('→'));
        assert_eq!(label, "Enero→Febrero");

        let plain = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(aggregator.week_label(plain), "Enero 2024");

        let english = MonthlyAggregator::new(4, MonthNameLocale::English);
        assert_eq!(
            english.week_label(NaiveDate::from_ymd_opt(2023, 12, 28).unwrap()),
            "December→January"
        );
    }

    #[test]
    fn test_empty_inputs() {
        let aggregator = MonthlyAggregator::default();
        let result = aggregator.aggregate(&[], &[]);
        assert!(result.months.is_empty());
        assert!(result.rows.is_empty());
        assert!(aggregator.week_labels(&[]).is_empty());
    }
}
