use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// One product as delivered by the forecast API.
///
/// Field names and string encodings are the upstream wire contract:
/// `Weekly_Sales` is a JSON array of `{"Date", "CANTIDAD"}` objects stored
/// inside a string, `Fechas_Pronostico` embeds ISO dates, and `Pronostico`
/// embeds decimal numbers positionally aligned with those dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProductRecord {
    #[serde(rename = "SKU", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    #[schemars(description = "Stock-keeping unit, unique product identifier")]
    pub sku: String,

    #[serde(rename = "DESCRIPCION", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    #[schemars(description = "Free-text description, possibly a JSON array encoded as a string")]
    pub description: String,

    #[serde(rename = "Categoria", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub category: String,

    #[serde(rename = "GRUPO", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    #[schemars(description = "Product group, possibly a JSON array encoded as a string")]
    pub group: String,

    #[serde(rename = "FABRICANTE", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    #[schemars(description = "Manufacturer, possibly a JSON array encoded as a string")]
    pub manufacturer: String,

    #[serde(rename = "Demanda_Media_Semanal", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    pub average_weekly_demand: f64,

    #[serde(rename = "Total_Quantity_Sold", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    pub total_quantity_sold: f64,

    #[serde(rename = "Total_Sales", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    pub total_sales: f64,

    #[serde(rename = "Stock_Seguridad", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    pub safety_stock: f64,

    #[serde(rename = "Punto_Reorden", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    pub reorder_point: f64,

    #[serde(rename = "Stock_Maximo", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    pub maximum_stock: f64,

    #[serde(rename = "CV", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    #[schemars(description = "Coefficient of variation of weekly demand")]
    pub coefficient_of_variation: f64,

    #[serde(rename = "Fechas_Pronostico", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    #[schemars(description = "String containing the forecast dates as embedded YYYY-MM-DD tokens")]
    pub forecast_dates: String,

    #[serde(rename = "Pronostico", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    #[schemars(description = "String containing forecast values as embedded decimal numbers, one per forecast date")]
    pub forecast_values: String,

    #[serde(rename = "Weekly_Sales", deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    #[schemars(description = "JSON array of {\"Date\": ..., \"CANTIDAD\": ...} objects encoded as a string")]
    pub weekly_sales: String,

    #[serde(
        rename = "Categoria_No_Seleccionados",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(description = "Demand classification label")]
    pub demand_classification: Option<String>,

    #[serde(rename = "Metodo", skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Forecasting method used upstream")]
    pub method: Option<String>,

    /// Any field the API sends that is not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reads `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProductRecord {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ProductRecord)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }

    /// The record as a JSON object keyed by wire field names, modelled
    /// fields first in declaration order, then any extra fields.
    pub fn to_field_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// One historical week of sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// One point on the forecast horizon. `value` is `None` when the upstream
/// value list was shorter than the date list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}
