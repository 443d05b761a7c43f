use crate::ingestion::{Dataset, Product};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingMetric {
    AverageWeeklyDemand,
    TotalQuantitySold,
    TotalSales,
}

impl RankingMetric {
    pub fn label(self) -> &'static str {
        match self {
            RankingMetric::AverageWeeklyDemand => "Demanda Media Semanal",
            RankingMetric::TotalQuantitySold => "Cantidad Vendida",
            RankingMetric::TotalSales => "Ventas Totales",
        }
    }

    pub fn value(self, product: &Product) -> f64 {
        match self {
            RankingMetric::AverageWeeklyDemand => product.record.average_weekly_demand,
            RankingMetric::TotalQuantitySold => product.record.total_quantity_sold,
            RankingMetric::TotalSales => product.record.total_sales,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// `None` for an empty dataset.
    pub average_weekly_demand: Option<f64>,
    pub total_quantity_sold: f64,
    pub total_sales: f64,
}

impl DashboardSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let products = dataset.products();
        let sum = |metric: RankingMetric| products.iter().map(|p| metric.value(p)).sum::<f64>();

        let average_weekly_demand = if products.is_empty() {
            None
        } else {
            Some(sum(RankingMetric::AverageWeeklyDemand) / products.len() as f64)
        };

        Self {
            average_weekly_demand,
            total_quantity_sold: sum(RankingMetric::TotalQuantitySold),
            total_sales: sum(RankingMetric::TotalSales),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    pub sku: String,
    pub value: f64,
}

/// The `n` products with the highest `metric`, highest first. Ties keep
/// dataset order.
pub fn top_products(dataset: &Dataset, metric: RankingMetric, n: usize) -> Vec<RankedProduct> {
    let mut ranked: Vec<RankedProduct> = dataset
        .products()
        .iter()
        .map(|p| RankedProduct {
            sku: p.sku().to_string(),
            value: metric.value(p),
        })
        .collect();

    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    ranked
}
