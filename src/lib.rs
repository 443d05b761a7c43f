//! # Forecast Report Builder
//!
//! A library for turning product-forecast records, whose series arrive as
//! loosely structured strings, into chart-ready aligned series and
//! spreadsheet-ready report sheets.
//!
//! ## Core Concepts
//!
//! - **Product Record**: One SKU as delivered by the forecast API, with weekly sales,
//!   forecast dates and forecast values encoded inside string fields
//! - **Dataset**: The decoded, ordered product collection; raw strings are parsed once here
//! - **Aligned Series**: Historical and forecast values projected onto one sorted date axis,
//!   with explicit gaps instead of zeros
//! - **Monthly Buckets**: Weekly forecasts summed per calendar month; months with fewer than
//!   four weeks are left blank
//! - **Workbook**: Three ordered sheets (inventory levels, weekly and monthly forecasts)
//!
//! ## Example
//!
//! ```rust,ignore
//! use forecast_report_builder::*;
//!
//! let json = r#"[{
//!     "SKU": "X1",
//!     "Weekly_Sales": "[{\"Date\":\"2024-01-01\",\"CANTIDAD\":10}]",
//!     "Fechas_Pronostico": "2024-01-08",
//!     "Pronostico": "15"
//! }]"#;
//!
//! let dataset = Dataset::from_json_str(json).unwrap();
//! let aligned = SeriesAligner::align(dataset.resolve_sku(None).unwrap());
//! assert_eq!(aligned.axis_labels(), vec!["2024-01-01", "2024-01-08"]);
//!
//! let workbook = ReportBuilder::default().build(dataset);
//! ```

pub mod aggregation;
pub mod alignment;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod parsers;
pub mod report;
pub mod schema;
pub mod session;
pub mod utils;

#[cfg(feature = "http")]
pub mod http;

pub use aggregation::{MonthKey, MonthlyAggregator, MonthlyBucket, MonthlyForecast, MonthlyRow};
pub use alignment::{AlignedSeries, NamedSeries, SeriesAligner, SeriesKind};
pub use catalog::{page_count, paginate, CatalogPage, ProductFilter};
pub use config::{Credentials, DashboardConfig};
pub use dashboard::{top_products, DashboardSummary, RankedProduct, RankingMetric};
pub use error::{ForecastReportError, Result};
pub use export::{available_fields, export_selection, field_label, ExportFormat, ExportSelection};
pub use ingestion::{Dataset, Product};
pub use parsers::*;
pub use report::*;
pub use schema::*;
pub use session::{CredentialStore, Session, ViewContext};
pub use utils::MonthNameLocale;

#[cfg(feature = "http")]
pub use http::ApiClient;

use log::{debug, info};

pub struct ForecastReportProcessor;

impl ForecastReportProcessor {
    pub fn process(records: Vec<ProductRecord>, config: &DashboardConfig) -> Result<Workbook> {
        Self::process_dataset(&Dataset::from_records(records), config)
    }

    pub fn process_dataset(dataset: &Dataset, config: &DashboardConfig) -> Result<Workbook> {
        config.validate()?;

        info!("Processing forecast report for {} records", dataset.len());

        let horizon = dataset.forecast_horizon();
        debug!(
            "Forecast horizon has {} weeks starting {:?}",
            horizon.len(),
            horizon.first()
        );

        let workbook =
            ReportBuilder::new(config.min_weeks_per_month, config.month_names).build(&dataset);

        for sheet in &workbook.sheets {
            debug!(
                "Sheet '{}': {} columns, {} rows",
                sheet.name,
                sheet.header.len(),
                sheet.rows.len()
            );
        }

        Ok(workbook)
    }

    /// Decodes an API payload record by record; see [`Dataset::from_json_str`].
    pub fn process_json(json: &str, config: &DashboardConfig) -> Result<Workbook> {
        Self::process_dataset(&Dataset::from_json_str(json)?, config)
    }
}

pub fn process_forecast_report(records: Vec<ProductRecord>) -> Result<Workbook> {
    ForecastReportProcessor::process(records, &DashboardConfig::default())
}

pub fn process_with_config(
    records: Vec<ProductRecord>,
    config: &DashboardConfig,
) -> Result<Workbook> {
    ForecastReportProcessor::process(records, config)
}
