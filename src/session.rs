use crate::alignment::{AlignedSeries, SeriesAligner};
use crate::catalog::{CatalogPage, ProductFilter};
use crate::config::{Credentials, DashboardConfig};
use crate::dashboard::{top_products, DashboardSummary, RankedProduct, RankingMetric};
use crate::error::{ForecastReportError, Result};
use crate::export::{export_selection, ExportFormat, ExportSelection};
use crate::ingestion::Dataset;
use crate::report::{ReportBuilder, Workbook};
use log::{info, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;

const TOKEN_LENGTH: usize = 32;

/// Static username/password lookup.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    accounts: Vec<Credentials>,
}

impl CredentialStore {
    pub fn new(accounts: Vec<Credentials>) -> Self {
        Self { accounts }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.credentials.clone())
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.accounts
            .iter()
            .any(|c| c.username == username && c.password == password)
    }
}

/// An authenticated user. Created only by [`Session::login`] and ended by
/// [`Session::logout`], which consumes it.
#[derive(Debug)]
pub struct Session {
    username: String,
    token: String,
}

impl Session {
    pub fn login(store: &CredentialStore, username: &str, password: &str) -> Result<Self> {
        if !store.verify(username, password) {
            warn!("Rejected login for user '{}'", username);
            return Err(ForecastReportError::InvalidCredentials);
        }

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        info!("User '{}' logged in", username);
        Ok(Self {
            username: username.to_string(),
            token,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn logout(self) {
        info!("User '{}' logged out", self.username);
    }
}

/// What every view receives: the signed-in session, the loaded data and
/// the dashboard settings.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub session: &'a Session,
    pub dataset: &'a Dataset,
    pub config: &'a DashboardConfig,
}

impl<'a> ViewContext<'a> {
    pub fn new(session: &'a Session, dataset: &'a Dataset, config: &'a DashboardConfig) -> Self {
        Self {
            session,
            dataset,
            config,
        }
    }

    pub fn from_optional(
        session: Option<&'a Session>,
        dataset: &'a Dataset,
        config: &'a DashboardConfig,
    ) -> Result<Self> {
        session
            .map(|s| Self::new(s, dataset, config))
            .ok_or(ForecastReportError::NotAuthenticated)
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_dataset(self.dataset)
    }

    pub fn ranking(&self, metric: RankingMetric) -> Vec<RankedProduct> {
        top_products(self.dataset, metric, self.config.top_n)
    }

    pub fn catalog(&self, filter: &ProductFilter, page: usize) -> CatalogPage<'a> {
        CatalogPage::build(self.dataset.products(), filter, self.config.page_size, page)
    }

    /// Chart series for the routed SKU, defaulting to the first product.
    pub fn analytics(&self, sku: Option<&str>) -> Option<AlignedSeries> {
        self.dataset.resolve_sku(sku).map(SeriesAligner::align)
    }

    pub fn workbook(&self) -> Workbook {
        ReportBuilder::new(self.config.min_weeks_per_month, self.config.month_names)
            .build(self.dataset)
    }

    pub fn export(&self, selection: &ExportSelection, format: ExportFormat) -> Result<String> {
        export_selection(self.dataset, selection, format)
    }
}
