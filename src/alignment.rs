use crate::ingestion::Product;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Historical,
    Forecast,
    SafetyStock,
    ReorderPoint,
    MaximumStock,
}

impl SeriesKind {
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Historical => "Ventas Históricas",
            SeriesKind::Forecast => "Pronóstico",
            SeriesKind::SafetyStock => "Stock de Seguridad",
            SeriesKind::ReorderPoint => "Punto de Reorden",
            SeriesKind::MaximumStock => "Stock Máximo",
        }
    }

    /// Constant threshold lines drawn across the whole axis.
    pub fn is_threshold(self) -> bool {
        matches!(
            self,
            SeriesKind::SafetyStock | SeriesKind::ReorderPoint | SeriesKind::MaximumStock
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub kind: SeriesKind,
    pub label: String,
    /// One entry per axis point; `None` marks a point with no data.
    pub values: Vec<Option<f64>>,
}

/// Historical sales and forecast for one SKU projected onto a shared date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub sku: String,
    pub title: String,
    pub axis: Vec<NaiveDate>,
    pub series: Vec<NamedSeries>,
}

impl AlignedSeries {
    pub fn series(&self, kind: SeriesKind) -> Option<&NamedSeries> {
        self.series.iter().find(|s| s.kind == kind)
    }

    pub fn axis_labels(&self) -> Vec<String> {
        self.axis
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect()
    }
}

pub struct SeriesAligner;

impl SeriesAligner {
    pub fn align(product: &Product) -> AlignedSeries {
        let axis: Vec<NaiveDate> = product
            .weekly_sales
            .iter()
            .map(|s| s.date)
            .chain(product.forecast.iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // First occurrence wins when a source repeats a date.
        let mut historical: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for sale in &product.weekly_sales {
            historical.entry(sale.date).or_insert(sale.quantity);
        }

        let mut forecast: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
        for point in &product.forecast {
            forecast.entry(point.date).or_insert(point.value);
        }

        debug!(
            "Aligning SKU {}: {} historical, {} forecast, {} axis points",
            product.sku(),
            product.weekly_sales.len(),
            product.forecast.len(),
            axis.len()
        );

        let historical_values = axis.iter().map(|d| historical.get(d).copied()).collect();
        let forecast_values = axis
            .iter()
            .map(|d| forecast.get(d).copied().flatten())
            .collect();

        let mut series = vec![
            Self::named(SeriesKind::Historical, historical_values),
            Self::named(SeriesKind::Forecast, forecast_values),
        ];

        for (kind, level) in [
            (SeriesKind::SafetyStock, product.safety_stock()),
            (SeriesKind::ReorderPoint, product.reorder_point()),
            (SeriesKind::MaximumStock, product.maximum_stock()),
        ] {
            series.push(Self::named(kind, vec![Some(level); axis.len()]));
        }

        AlignedSeries {
            sku: product.sku().to_string(),
            title: format!("Ventas Históricas vs Pronóstico - SKU: {}", product.sku()),
            axis,
            series,
        }
    }

    fn named(kind: SeriesKind, values: Vec<Option<f64>>) -> NamedSeries {
        NamedSeries {
            kind,
            label: kind.label().to_string(),
            values,
        }
    }
}
