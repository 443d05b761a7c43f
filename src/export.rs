use crate::error::Result;
use crate::ingestion::Dataset;
use crate::parsers::display_value;
use crate::report::finish_csv;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    /// Tab-separated text that spreadsheet programs open directly.
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "reporte.csv",
            ExportFormat::Tsv => "reporte.tsv",
            ExportFormat::Json => "reporte.json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Tsv => "text/tab-separated-values",
            ExportFormat::Json => "application/json",
        }
    }
}

/// SKUs and wire field names chosen for an ad hoc export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSelection {
    pub skus: Vec<String>,
    pub fields: Vec<String>,
}

impl ExportSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the SKU if absent, removes it otherwise.
    pub fn toggle_sku(&mut self, sku: &str) {
        toggle(&mut self.skus, sku);
    }

    pub fn toggle_field(&mut self, field: &str) {
        toggle(&mut self.fields, field);
    }

    pub fn select_all_skus(&mut self, dataset: &Dataset) {
        self.skus = dataset
            .products()
            .iter()
            .map(|p| p.sku().to_string())
            .collect();
    }

    pub fn clear_skus(&mut self) {
        self.skus.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.skus.is_empty() || self.fields.is_empty()
    }
}

fn toggle(items: &mut Vec<String>, value: &str) {
    if let Some(pos) = items.iter().position(|v| v == value) {
        items.remove(pos);
    } else {
        items.push(value.to_string());
    }
}

/// Human-readable column label for a wire field name.
pub fn field_label(field: &str) -> &str {
    match field {
        "SKU" => "SKU",
        "Categoria" => "Categoría",
        "Categoria_No_Seleccionados" => "Categoría No Seleccionados",
        "Metodo" => "Método",
        "Demanda_Media_Semanal" => "Demanda Media Semanal",
        "Desviacion_Estandar" => "Desviación Estándar",
        "CV" => "CV (Coeficiente de Variación)",
        "Lead_Time_semanas" => "Tiempo de Entrega (semanas)",
        "Lead_Time_STD_semanas" => "Desviación Estándar del Tiempo de Entrega (semanas)",
        "MOQ" => "Cantidad Mínima de Pedido",
        "Nivel_de_Servicio" => "Nivel de Servicio",
        "Z" => "Z (Valor Z)",
        "Stock_Seguridad" => "Stock de Seguridad",
        "Punto_Reorden" => "Punto de Reorden",
        "Stock_Maximo" => "Stock Máximo",
        "Promedio_Ventas" => "Promedio de Ventas",
        "Pronostico" => "Pronóstico",
        "Fechas_Pronostico" => "Fechas de Pronóstico",
        "Total_Quantity_Sold" => "Cantidad Total Vendida",
        "Total_Sales" => "Ventas Totales",
        "First_Sale_Date" => "Fecha de Primera Venta",
        "Last_Sale_Date" => "Fecha de Última Venta",
        "DESCRIPCION" => "Descripción",
        "GRUPO" => "Grupo",
        "FABRICANTE" => "Fabricante",
        "Weekly_Sales" => "Ventas Semanales",
        other => other,
    }
}

/// Field names offered for export: those of the first record in the order
/// the API sent them, minus `id`.
pub fn available_fields(dataset: &Dataset) -> Vec<String> {
    dataset
        .products()
        .first()
        .map(|p| {
            p.fields
                .keys()
                .filter(|k| k.as_str() != "id")
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Selected fields of the selected records, in dataset order. Each row's
/// keys follow the selection's field order.
fn selected_rows(
    dataset: &Dataset,
    selection: &ExportSelection,
) -> Vec<serde_json::Map<String, serde_json::Value>> {
    dataset
        .products()
        .iter()
        .filter(|p| selection.skus.iter().any(|s| s == p.sku()))
        .map(|p| {
            selection
                .fields
                .iter()
                .map(|field| {
                    let value = p.fields.get(field).cloned().unwrap_or(serde_json::Value::Null);
                    (field.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// Renders the selection in the requested format.
///
/// Nothing selected produces an empty document of that format: an empty
/// string for delimited text, `[]` for JSON.
pub fn export_selection(
    dataset: &Dataset,
    selection: &ExportSelection,
    format: ExportFormat,
) -> Result<String> {
    if selection.is_empty() {
        debug!("Export requested with an empty selection");
        return match format {
            ExportFormat::Json => Ok("[]".to_string()),
            ExportFormat::Csv | ExportFormat::Tsv => Ok(String::new()),
        };
    }

    let rows = selected_rows(dataset, selection);
    debug!(
        "Exporting {} records x {} fields as {:?}",
        rows.len(),
        selection.fields.len(),
        format
    );

    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        ExportFormat::Csv => delimited(selection, &rows, b','),
        ExportFormat::Tsv => delimited(selection, &rows, b'\t'),
    }
}

fn delimited(
    selection: &ExportSelection,
    rows: &[serde_json::Map<String, serde_json::Value>],
    delimiter: u8,
) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(selection.fields.iter().map(|f| field_label(f)))?;
    for row in rows {
        writer.write_record(
            selection
                .fields
                .iter()
                .map(|f| row.get(f).map(display_value).unwrap_or_default()),
        )?;
    }

    finish_csv(writer)
}
