use crate::aggregation::MonthlyAggregator;
use crate::error::Result;
use crate::ingestion::Dataset;
use crate::utils::{round_to_integer, MonthNameLocale};
use log::info;
use serde::{Deserialize, Serialize};

pub const INVENTORY_LEVELS_SHEET: &str = "Niveles de Inventario";
pub const WEEKLY_FORECASTS_SHEET: &str = "Pronósticos Semanales";
pub const MONTHLY_FORECASTS_SHEET: &str = "Pronósticos Mensuales";

const MIN_COLUMN_WIDTH: usize = 10;
const COLUMN_PADDING: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(i64),
    /// No value. Distinct from `Number(0)`.
    Blank,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn rendered(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Blank => String::new(),
        }
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Blank)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Suggested width, in characters, for each column.
    pub column_widths: Vec<usize>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let column_widths = column_widths(&header, &rows);
        Self {
            name: name.into(),
            header,
            rows,
            column_widths,
        }
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::rendered))?;
        }
        finish_csv(writer)
    }
}

pub(crate) fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn column_widths(header: &[String], rows: &[Vec<Cell>]) -> Vec<usize> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    (0..columns)
        .map(|col| {
            let header_width = header.get(col).map(|h| h.chars().count()).unwrap_or(0);
            let widest_cell = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.rendered().chars().count())
                .max()
                .unwrap_or(0);
            (header_width.max(widest_cell) + COLUMN_PADDING).max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct ReportBuilder {
    aggregator: MonthlyAggregator,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            aggregator: MonthlyAggregator::default(),
        }
    }
}

impl ReportBuilder {
    pub fn new(min_weeks_per_month: u32, locale: MonthNameLocale) -> Self {
        Self {
            aggregator: MonthlyAggregator::new(min_weeks_per_month, locale),
        }
    }

    pub fn build(&self, dataset: &Dataset) -> Workbook {
        info!("Building forecast workbook for {} products", dataset.len());
        Workbook {
            sheets: vec![
                self.inventory_levels(dataset),
                self.weekly_forecasts(dataset),
                self.monthly_forecasts(dataset),
            ],
        }
    }

    pub fn inventory_levels(&self, dataset: &Dataset) -> Sheet {
        let header = ["SKU", "Stock de Seguridad", "Punto de Reorden", "Stock Máximo"]
            .map(String::from)
            .to_vec();

        let rows = dataset
            .products()
            .iter()
            .map(|p| {
                vec![
                    Cell::text(p.sku()),
                    Cell::Number(round_to_integer(p.safety_stock())),
                    Cell::Number(round_to_integer(p.reorder_point())),
                    Cell::Number(round_to_integer(p.maximum_stock())),
                ]
            })
            .collect();

        Sheet::new(INVENTORY_LEVELS_SHEET, header, rows)
    }

    pub fn weekly_forecasts(&self, dataset: &Dataset) -> Sheet {
        let horizon = dataset.forecast_horizon();

        let mut header = vec!["SKU".to_string()];
        header.extend(self.aggregator.week_labels(&horizon));

        let rows = dataset
            .products()
            .iter()
            .map(|p| {
                let mut row = vec![Cell::text(p.sku())];
                row.extend(
                    horizon
                        .iter()
                        .map(|date| Cell::from(p.forecast_value_on(*date).map(round_to_integer))),
                );
                row
            })
            .collect();

        Sheet::new(WEEKLY_FORECASTS_SHEET, header, rows)
    }

    pub fn monthly_forecasts(&self, dataset: &Dataset) -> Sheet {
        let horizon = dataset.forecast_horizon();
        let monthly = self.aggregator.aggregate(dataset.products(), &horizon);

        let mut header = vec!["SKU".to_string()];
        header.extend(monthly.labels);

        let rows = monthly
            .rows
            .into_iter()
            .map(|row| {
                let mut cells = vec![Cell::Text(row.sku)];
                cells.extend(row.cells.into_iter().map(Cell::from));
                cells
            })
            .collect();

        Sheet::new(MONTHLY_FORECASTS_SHEET, header, rows)
    }
}
