use std::collections::HashMap;
use std::path::Path;

use crate::error::AppResult;
use crate::models::{CsvProduct, Product};

/// Immutable in-memory product catalog
///
/// Loaded once at startup and shared read-only for the process lifetime.
/// Products keep their file order, which Tier 3 of the recommendation
/// engine relies on.
pub struct CatalogStore {
    products: Vec<Product>,
    by_id: HashMap<u32, usize>,
}

impl CatalogStore {
    /// Loads the catalog from a CSV file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    fn from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> AppResult<Self> {
        let mut products = Vec::new();
        for row in reader.deserialize() {
            let row: CsvProduct = row?;
            products.push(Product::from(row));
        }
        Ok(Self::from_products(products))
    }

    /// Builds a catalog from already-constructed products
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut deduped: Vec<Product> = Vec::with_capacity(products.len());
        let mut by_id = HashMap::with_capacity(products.len());

        for product in products {
            if by_id.contains_key(&product.id) {
                tracing::warn!(product_id = product.id, "Duplicate catalog id, keeping first row");
                continue;
            }
            by_id.insert(product.id, deduped.len());
            deduped.push(product);
        }

        Self {
            products: deduped,
            by_id,
        }
    }

    /// Looks up a product by id
    pub fn get(&self, id: u32) -> Option<&Product> {
        self.by_id.get(&id).map(|&index| &self.products[index])
    }

    /// Whether the catalog carries the given id
    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
