use crate::error::Result;
use crate::parsers::{
    decode_display_field, parse_forecast_dates, parse_forecast_values, parse_weekly_sales,
};
use crate::schema::{ForecastPoint, ProductRecord, SalesPoint};
use crate::utils::parse_day;
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Read;

/// A product whose string-encoded fields have been decoded.
///
/// The raw record is kept alongside so exports can reproduce upstream values.
/// `fields` holds the wire object in the order the API sent its keys.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub record: ProductRecord,
    pub fields: Map<String, Value>,
    pub description: String,
    pub group: String,
    pub manufacturer: String,
    pub weekly_sales: Vec<SalesPoint>,
    pub forecast: Vec<ForecastPoint>,
}

impl Product {
    pub fn from_record(record: ProductRecord) -> Self {
        let fields = record.to_field_map();
        Self::decode(record, fields)
    }

    /// Decodes one wire object. Fails only when a field has the wrong JSON
    /// type for its slot; `null` counts as absent.
    pub fn from_value(value: Value) -> Result<Self> {
        let record: ProductRecord = serde_json::from_value(value.clone())?;
        let fields = match value {
            Value::Object(map) => map,
            _ => record.to_field_map(),
        };
        Ok(Self::decode(record, fields))
    }

    fn decode(record: ProductRecord, fields: Map<String, Value>) -> Self {
        let weekly_sales = parse_weekly_sales(&record.weekly_sales);
        if weekly_sales.is_empty() && !record.weekly_sales.trim().is_empty() {
            warn!("SKU {}: no usable weekly sales in Weekly_Sales", record.sku);
        }

        let forecast = pair_forecast(&record);

        Self {
            description: decode_display_field(&record.description),
            group: decode_display_field(&record.group),
            manufacturer: decode_display_field(&record.manufacturer),
            weekly_sales,
            forecast,
            record,
            fields,
        }
    }

    pub fn sku(&self) -> &str {
        &self.record.sku
    }

    pub fn category(&self) -> &str {
        &self.record.category
    }

    pub fn safety_stock(&self) -> f64 {
        self.record.safety_stock
    }

    pub fn reorder_point(&self) -> f64 {
        self.record.reorder_point
    }

    pub fn maximum_stock(&self) -> f64 {
        self.record.maximum_stock
    }

    pub fn forecast_dates(&self) -> Vec<NaiveDate> {
        self.forecast.iter().map(|p| p.date).collect()
    }

    /// Forecast value for the week starting on `date`, if this product has one.
    pub fn forecast_value_on(&self, date: NaiveDate) -> Option<f64> {
        self.forecast
            .iter()
            .find(|p| p.date == date)
            .and_then(|p| p.value)
    }
}

/// Pairs forecast dates with values by position.
///
/// Dates beyond the value list keep `value: None`; values beyond the date
/// list are dropped. Tokens that look like dates but are not valid calendar
/// days are removed after pairing so the remaining positions stay aligned.
fn pair_forecast(record: &ProductRecord) -> Vec<ForecastPoint> {
    let dates = parse_forecast_dates(&record.forecast_dates);
    let values = parse_forecast_values(&record.forecast_values);

    if dates.len() != values.len() {
        warn!(
            "SKU {}: {} forecast dates but {} forecast values; surplus treated as absent",
            record.sku,
            dates.len(),
            values.len()
        );
    }

    dates
        .iter()
        .enumerate()
        .filter_map(|(idx, raw_date)| match parse_day(raw_date) {
            Some(date) => Some(ForecastPoint {
                date,
                value: values.get(idx).copied(),
            }),
            None => {
                warn!(
                    "SKU {}: ignoring invalid forecast date '{}'",
                    record.sku, raw_date
                );
                None
            }
        })
        .collect()
}

/// The full, ordered product collection as returned by the API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    products: Vec<Product>,
}

impl Dataset {
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        info!("Decoding {} product records", records.len());
        let products = records.into_iter().map(Product::from_record).collect();
        Self { products }
    }

    /// Decodes each wire object on its own. A record whose fields have the
    /// wrong JSON types is logged and skipped; the rest are kept in order.
    pub fn from_values(values: Vec<Value>) -> Self {
        info!("Decoding {} product records", values.len());
        let products = values
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                let sku = value
                    .get("SKU")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{}", idx));
                match Product::from_value(value) {
                    Ok(product) => Some(product),
                    Err(e) => {
                        warn!("Skipping record {}: {}", sku, e);
                        None
                    }
                }
            })
            .collect();
        Self { products }
    }

    /// Fails only when the payload is not a JSON array.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        Ok(Self::from_values(values))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_reader(reader)?;
        Ok(Self::from_values(values))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku() == sku)
    }

    /// Product addressed by a SKU route. Falls back to the first product in
    /// API order when no SKU is given or the given one is unknown.
    pub fn resolve_sku(&self, requested: Option<&str>) -> Option<&Product> {
        if let Some(sku) = requested {
            if let Some(product) = self.get(sku) {
                return Some(product);
            }
            debug!("SKU {} not found, falling back to first product", sku);
        }
        self.products.first()
    }

    /// Forecast horizon shared by every record, taken from the first one.
    pub fn forecast_horizon(&self) -> Vec<NaiveDate> {
        self.products
            .first()
            .map(Product::forecast_dates)
            .unwrap_or_default()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in &self.products {
            if !categories.iter().any(|c| c == product.category()) {
                categories.push(product.category().to_string());
            }
        }
        categories
    }

    /// SKUs containing `term`, ignoring case.
    pub fn search_skus(&self, term: &str) -> Vec<&str> {
        let needle = term.to_lowercase();
        self.products
            .iter()
            .map(Product::sku)
            .filter(|sku| sku.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sku: &str, dates: &str, values: &str) -> ProductRecord {
        ProductRecord {
            sku: sku.to_string(),
            forecast_dates: dates.to_string(),
            forecast_values: values.to_string(),
            ..Default::default()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_forecast_pairs_by_position() {
        let product = Product::from_record(record(
            "A",
            "['2024-01-08', '2024-01-15']",
            "[15.0, 20.5]",
        ));

        assert_eq!(product.forecast.len(), 2);
        assert_eq!(product.forecast[0].value, Some(15.0));
        assert_eq!(
            product.forecast[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(product.forecast[1].value, Some(20.5));
    }

    #[test]
    fn test_surplus_dates_are_absent() {
        let product = Product::from_record(record("A", "2024-01-08 2024-01-15 2024-01-22", "5"));
        assert_eq!(product.forecast.len(), 3);
        assert_eq!(product.forecast_value_on(day(2024, 1, 8)), Some(5.0));
        assert_eq!(product.forecast_value_on(day(2024, 1, 15)), None);
        assert_eq!(product.forecast_value_on(day(2024, 1, 22)), None);
    }

    #[test]
    fn test_surplus_values_are_dropped() {
        let product = Product::from_record(record("A", "2024-01-08", "5 6 7"));
        assert_eq!(product.forecast.len(), 1);
        assert_eq!(product.forecast_value_on(day(2024, 1, 8)), Some(5.0));
    }

    #[test]
    fn test_invalid_calendar_date_keeps_alignment() {
        let product = Product::from_record(record("A", "2024-02-30 2024-03-04", "1 2"));
        assert_eq!(product.forecast.len(), 1);
        assert_eq!(
            product.forecast[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
        assert_eq!(product.forecast[0].value, Some(2.0));
        assert_eq!(product.forecast_value_on(day(2024, 3, 4)), Some(2.0));
        assert_eq!(product.forecast_value_on(day(2024, 2, 26)), None);
    }

    #[test]
    fn test_display_fields_decoded() {
        let product = Product::from_record(ProductRecord {
            sku: "A".to_string(),
            description: r#"["Tornillo", "3mm"]"#.to_string(),
            group: "Ferretería".to_string(),
            manufacturer: r#"["Acme"]"#.to_string(),
            ..Default::default()
        });

        assert_eq!(product.description, "Tornillo, 3mm");
        assert_eq!(product.group, "Ferretería");
        assert_eq!(product.manufacturer, "Acme");
    }

    #[test]
    fn test_resolve_sku_defaults_to_first() {
        let dataset = Dataset::from_records(vec![record("A1", "", ""), record("B2", "", "")]);

        assert_eq!(dataset.resolve_sku(Some("B2")).unwrap().sku(), "B2");
        assert_eq!(dataset.resolve_sku(Some("ZZ")).unwrap().sku(), "A1");
        assert_eq!(dataset.resolve_sku(None).unwrap().sku(), "A1");
        assert!(Dataset::default().resolve_sku(None).is_none());
    }

    #[test]
    fn test_categories_and_search() {
        let mut a = record("ABC-1", "", "");
        a.category = "A".to_string();
        let mut b = record("xyz-2", "", "");
        b.category = "B".to_string();
        let mut c = record("abd-3", "", "");
        c.category = "A".to_string();
        let dataset = Dataset::from_records(vec![a, b, c]);

        assert_eq!(dataset.categories(), vec!["A", "B"]);
        assert_eq!(dataset.search_skus("ab"), vec!["ABC-1", "abd-3"]);
        assert_eq!(dataset.search_skus(""), vec!["ABC-1", "xyz-2", "abd-3"]);
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[{"SKU": "A", "Fechas_Pronostico": "2024-01-08", "Pronostico": "3"}]"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(
            dataset.forecast_horizon(),
            vec![NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()]
        );

        assert!(Dataset::from_json_str("{").is_err());
    }

    #[test]
    fn test_null_fields_keep_the_record() {
        let json = r#"[
            {"SKU": "N1", "DESCRIPCION": null, "Total_Sales": null, "Weekly_Sales": null,
             "Fechas_Pronostico": "2024-01-08", "Pronostico": "3"},
            {"SKU": "OK", "Total_Sales": 10.0}
        ]"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(dataset.len(), 2);
        let n1 = dataset.get("N1").unwrap();
        assert_eq!(n1.description, "");
        assert_eq!(n1.record.total_sales, 0.0);
        assert!(n1.weekly_sales.is_empty());
        assert_eq!(n1.forecast_value_on(day(2024, 1, 8)), Some(3.0));
    }

    #[test]
    fn test_mistyped_record_is_skipped_alone() {
        let json = r#"[
            {"SKU": "BAD", "Total_Sales": "lots"},
            {"SKU": "OK", "Total_Sales": 10.0},
            "not an object"
        ]"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.products()[0].sku(), "OK");
    }

    #[test]
    fn test_fields_follow_received_key_order() {
        let json = r#"[{"Total_Sales": 5.0, "Lead_Time_semanas": 2, "SKU": "A"}]"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        let keys: Vec<&str> = dataset.products()[0]
            .fields
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["Total_Sales", "Lead_Time_semanas", "SKU"]);
    }
}
