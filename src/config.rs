use crate::error::{ForecastReportError, Result};
use crate::utils::MonthNameLocale;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "https://sb1-xzau5n.onrender.com/api/data";
pub const DEFAULT_PAGE_SIZE: usize = 9;
pub const DEFAULT_MIN_WEEKS_PER_MONTH: u32 = 4;
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Endpoint returning the full product list as a JSON array.
    pub api_url: String,
    /// Products per catalog page.
    pub page_size: usize,
    /// Weekly contributions a month needs before it is reported.
    pub min_weeks_per_month: u32,
    /// Entries shown in each dashboard ranking.
    pub top_n: usize,
    pub month_names: MonthNameLocale,
    pub credentials: Vec<Credentials>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            min_weeks_per_month: DEFAULT_MIN_WEEKS_PER_MONTH,
            top_n: DEFAULT_TOP_N,
            month_names: MonthNameLocale::default(),
            credentials: Vec::new(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading dashboard configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ForecastReportError::InvalidPageSize(self.page_size));
        }
        if !(1..=5).contains(&self.min_weeks_per_month) {
            return Err(ForecastReportError::InvalidMinimumWeeks(
                self.min_weeks_per_month,
            ));
        }
        if self.top_n == 0 {
            return Err(ForecastReportError::InvalidTopN(self.top_n));
        }
        Ok(())
    }
}
