use crate::ingestion::Product;
use serde::Serialize;

/// Conjunction of optional catalog predicates. Unset predicates match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub sku_prefix: Option<String>,
    pub category: Option<String>,
    pub group: Option<String>,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sku_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sku_prefix = non_empty(prefix.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = non_empty(group.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = non_empty(manufacturer.into());
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = non_empty(text.into());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(prefix) = &self.sku_prefix {
            if !product
                .sku()
                .to_uppercase()
                .starts_with(&prefix.to_uppercase())
            {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if product.category() != category {
                return false;
            }
        }

        if let Some(group) = &self.group {
            if !product.group.to_lowercase().contains(&group.to_lowercase()) {
                return false;
            }
        }

        if let Some(manufacturer) = &self.manufacturer {
            if &product.manufacturer != manufacturer {
                return false;
            }
        }

        if let Some(text) = &self.description {
            if !product
                .description
                .to_lowercase()
                .contains(&text.to_lowercase())
            {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Items on a 1-indexed page. Pages past the end, page 0 and a zero page
/// size all give an empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// One page of the filtered product catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage<'a> {
    pub items: Vec<&'a Product>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<'a> CatalogPage<'a> {
    pub fn build(
        products: &'a [Product],
        filter: &ProductFilter,
        page_size: usize,
        page: usize,
    ) -> Self {
        let filtered = filter.apply(products);
        let items = paginate(&filtered, page_size, page).to_vec();
        Self {
            items,
            page,
            total_pages: page_count(filtered.len(), page_size),
            total_items: filtered.len(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProductRecord;

    fn product(sku: &str, category: &str, group: &str, manufacturer: &str) -> Product {
        Product::from_record(ProductRecord {
            sku: sku.to_string(),
            category: category.to_string(),
            group: group.to_string(),
            manufacturer: manufacturer.to_string(),
            description: format!("Producto {}", sku),
            ..Default::default()
        })
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("ABC123", "A", r#"["Tornillos", "Acero"]"#, r#"["Acme"]"#),
            product("abd456", "B", "Tuercas", "Acme"),
            product("XYZ789", "A", "Arandelas de acero", "Globex"),
        ]
    }

    #[test]
    fn test_sku_prefix_is_case_insensitive() {
        let products = catalog();
        let hits = ProductFilter::new().with_sku_prefix("abc").apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sku(), "ABC123");

        let hits = ProductFilter::new().with_sku_prefix("AB").apply(&products);
        assert_eq!(hits.len(), 2);

        // Prefix only, not substring.
        assert!(ProductFilter::new().with_sku_prefix("123").apply(&products).is_empty());
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let products = catalog();

        let hits = ProductFilter::new()
            .with_category("A")
            .with_manufacturer("Acme")
            .apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sku(), "ABC123");

        let hits = ProductFilter::new().with_group("acero").apply(&products);
        assert_eq!(hits.len(), 2);

        let hits = ProductFilter::new()
            .with_group("acero")
            .with_sku_prefix("x")
            .apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sku(), "XYZ789");
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let products = catalog();
        assert_eq!(ProductFilter::new().apply(&products).len(), 3);
        assert_eq!(
            ProductFilter::new()
                .with_category("")
                .with_sku_prefix("")
                .apply(&products)
                .len(),
            3
        );
    }

    #[test]
    fn test_description_search() {
        let products = catalog();
        let hits = ProductFilter::new()
            .with_description("producto xyz")
            .apply(&products);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_paginate() {
        let data: Vec<usize> = (0..20).collect();

        assert_eq!(paginate(&data, 9, 1), &data[0..9]);
        assert_eq!(paginate(&data, 9, 2), &data[9..18]);
        assert_eq!(paginate(&data, 9, 3), &[18, 19]);
        assert!(paginate(&data, 9, 4).is_empty());
        assert!(paginate(&data, 9, 0).is_empty());
        assert!(paginate(&data, 0, 1).is_empty());
        assert!(paginate::<usize>(&[], 9, 1).is_empty());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(20, 9), 3);
        assert_eq!(page_count(18, 9), 2);
        assert_eq!(page_count(0, 9), 0);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_catalog_page() {
        let products = catalog();
        let page = CatalogPage::build(&products, &ProductFilter::new(), 2, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_previous());
        assert!(page.has_next());

        let page = CatalogPage::build(&products, &ProductFilter::new(), 2, 2);
        assert_eq!(page.items.len(), 1);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }
}
