//! Product records and queries.

use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Record};

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Price in minor currency units.
    pub price: u32,
    pub category: String,
    pub in_stock: bool,
}

impl Product {
    /// Creates a product record.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: u32,
        category: impl Into<String>,
        in_stock: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
            in_stock,
        }
    }
}

impl Record for Product {
    #[inline]
    fn id(&self) -> u32 {
        self.id
    }
}

/// The product collection.
pub type Products = Collection<Product>;

impl Collection<Product> {
    /// Returns products whose category equals `category` exactly.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Product> {
        self.filter(|product| product.category == category)
    }

    /// Returns products that are currently in stock.
    pub fn in_stock(&self) -> Vec<&Product> {
        self.filter(|product| product.in_stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    #[test]
    fn find_by_id_returns_product() {
        let products = Catalog::seeded().products;
        let product = products.find_by_id(1).expect("product 1 is seeded");
        assert_eq!(product.name, "Wireless Mouse");
        assert!(products.find_by_id(999).is_none());
    }

    #[test]
    fn filter_by_category_electronics() {
        let products = Catalog::seeded().products;
        let electronics = products.filter_by_category("electronics");
        assert_eq!(electronics.len(), 3);
        assert!(electronics.iter().all(|p| p.category == "electronics"));

        let ids: Vec<u32> = electronics.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn filter_by_unknown_category_is_empty() {
        let products = Catalog::seeded().products;
        assert!(products.filter_by_category("food").is_empty());
    }

    #[test]
    fn in_stock_excludes_out_of_stock() {
        let products = Catalog::seeded().products;
        let in_stock = products.in_stock();
        assert!(!in_stock.is_empty());
        assert!(in_stock.iter().all(|p| p.in_stock));

        for product in products.all().iter().filter(|p| !p.in_stock) {
            assert!(!in_stock.contains(&product));
        }
    }

    #[test]
    fn serializes_camel_case() {
        let product = Product::new(9, "Pen", 10, "stationery", false);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["inStock"], false);
        assert!(json.get("in_stock").is_none());
    }
}
