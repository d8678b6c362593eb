use vitrine_client::ProductClient;
use vitrine_core::ProductId;
use vitrine_products::{Catalog, Product, ProductDraft};

use super::user_message;
use crate::notify::Notifications;

/// Product list and detail state for the catalog pages.
#[derive(Debug)]
pub struct CatalogView {
    client: ProductClient,
    catalog: Catalog,
    selected: Option<ProductId>,
}

impl CatalogView {
    pub fn new(client: ProductClient) -> Self {
        Self {
            client,
            catalog: Catalog::new(),
            selected: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Product shown on the detail page, if one is open.
    pub fn selected(&self) -> Option<&Product> {
        self.selected.and_then(|id| self.catalog.get(id))
    }

    /// Reload the list. On failure the previous list is kept.
    pub async fn refresh(&mut self, notifications: &mut Notifications) -> bool {
        match self.client.list_products().await {
            Ok(products) => {
                self.catalog.replace_all(products);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "product list failed");
                notifications.error(format!("Could not load products: {}", user_message(&err)));
                false
            }
        }
    }

    pub async fn open(
        &mut self,
        id: ProductId,
        notifications: &mut Notifications,
    ) -> Option<&Product> {
        match self.client.get_product(id).await {
            Ok(product) => {
                self.catalog.upsert(product);
                self.selected = Some(id);
                self.catalog.get(id)
            }
            Err(err) => {
                tracing::warn!(product_id = %id, error = %err, "product fetch failed");
                notifications.error(format!("Could not load product: {}", user_message(&err)));
                None
            }
        }
    }

    pub async fn create(
        &mut self,
        draft: &ProductDraft,
        notifications: &mut Notifications,
    ) -> Option<Product> {
        match self.client.create_product(draft).await {
            Ok(created) => {
                self.catalog.upsert(created.clone());
                notifications.success("Product created");
                Some(created)
            }
            Err(err) => {
                notifications.error(format!("Create error: {}", user_message(&err)));
                None
            }
        }
    }

    pub async fn update(
        &mut self,
        product: &Product,
        notifications: &mut Notifications,
    ) -> Option<Product> {
        match self.client.update_product(product).await {
            Ok(updated) => {
                self.catalog.upsert(updated.clone());
                notifications.success("Product updated");
                Some(updated)
            }
            Err(err) => {
                notifications.error(format!("Update error: {}", user_message(&err)));
                None
            }
        }
    }

    pub async fn delete(&mut self, id: ProductId, notifications: &mut Notifications) -> bool {
        match self.client.delete_product(id).await {
            Ok(()) => {
                self.catalog.remove(id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
                notifications.success("Product deleted");
                true
            }
            Err(err) => {
                notifications.error(format!("Delete error: {}", user_message(&err)));
                false
            }
        }
    }
}
