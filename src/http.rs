use crate::config::DashboardConfig;
use crate::error::{ForecastReportError, Result};
use crate::ingestion::Dataset;
use serde_json::Value;
use log::{error, info};
use reqwest::Client;

/// One-shot reader for the product endpoint. No retries, no timeout.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    url: String,
}

impl ApiClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw product objects as sent. A body that is not a JSON array fails the
    /// whole fetch; individual records are decoded later by [`Dataset`].
    pub async fn fetch_records(&self) -> Result<Vec<Value>> {
        info!("Fetching product data from {}", self.url);

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            error!("Product request failed: {}", e);
            ForecastReportError::FetchFailed(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Product API returned status {}", status);
            return Err(ForecastReportError::FetchFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let records: Vec<Value> = response.json().await.map_err(|e| {
            error!("Product API returned an unreadable body: {}", e);
            ForecastReportError::FetchFailed(e.to_string())
        })?;

        info!("Received {} product records", records.len());
        Ok(records)
    }

    pub async fn fetch_dataset(&self) -> Result<Dataset> {
        Ok(Dataset::from_values(self.fetch_records().await?))
    }
}
