//! In-memory product list backing the catalog views.
//!
//! Views refresh it from the server and patch it after each successful
//! create/update/delete so the list re-renders without a refetch.

use vitrine_core::ProductId;

use crate::Product;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list (after a fresh `GET /products`).
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Insert a product, or replace the one with the same id.
    ///
    /// Products without an id are appended; they have not been persisted yet.
    pub fn upsert(&mut self, product: Product) {
        let existing = product
            .id
            .and_then(|id| self.products.iter().position(|p| p.id == Some(id)));
        match existing {
            Some(idx) => self.products[idx] = product,
            None => self.products.push(product),
        }
    }

    /// Remove by id, returning the removed product.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let idx = self.products.iter().position(|p| p.id == Some(id))?;
        Some(self.products.remove(idx))
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == Some(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn in_stock(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.in_stock)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
