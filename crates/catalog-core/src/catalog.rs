//! Process-lifetime dataset store.

use crate::TRACING_TARGET_DATASET;
use crate::product::{Product, Products};
use crate::user::{Role, User, Users};

/// Both record collections, built once at startup.
#[derive(Debug, Clone)]
#[must_use = "catalog does nothing unless you query it"]
pub struct Catalog {
    pub users: Users,
    pub products: Products,
}

impl Catalog {
    /// Creates a catalog from the given collections.
    pub fn new(users: Users, products: Products) -> Self {
        Self { users, products }
    }

    /// Creates the catalog with the built-in seed data.
    pub fn seeded() -> Self {
        let catalog = Self::new(Users::new(seed_users()), Products::new(seed_products()));

        tracing::debug!(
            target: TRACING_TARGET_DATASET,
            users = catalog.users.len(),
            products = catalog.products.len(),
            "Seeded catalog datasets"
        );

        catalog
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_users() -> Vec<User> {
    vec![
        User::new(1, "Anurag", "anurag@example.com", Role::Admin),
        User::new(2, "Rahul", "rahul@example.com", Role::User),
        User::new(3, "Priya", "priya@example.com", Role::User),
        User::new(4, "Amit", "amit@example.com", Role::Admin),
    ]
}

fn seed_products() -> Vec<Product> {
    vec![
        Product::new(1, "Wireless Mouse", 599, "electronics", true),
        Product::new(2, "Mechanical Keyboard", 2499, "electronics", true),
        Product::new(3, "USB-C Hub", 1299, "electronics", false),
        Product::new(4, "Notebook", 149, "stationery", true),
        Product::new(5, "Backpack", 1999, "accessories", true),
    ]
}
