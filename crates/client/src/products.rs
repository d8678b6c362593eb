use vitrine_core::ProductId;
use vitrine_products::{Product, ProductDraft};

use crate::rest::RestClient;
use crate::ClientResult;

/// CRUD over `/products`.
///
/// Responses are checked against the canonical product schema; a mismatch is
/// a [`crate::ClientError::Parse`], never a half-filled product.
#[derive(Debug, Clone)]
pub struct ProductClient {
    rest: RestClient,
}

impl ProductClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let body = self.rest.get("/products").await?;
        Ok(Product::list_from_json(body)?)
    }

    pub async fn get_product(&self, id: ProductId) -> ClientResult<Product> {
        let body = self.rest.get(&format!("/products/{id}")).await?;
        Ok(Product::from_json(body)?)
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> ClientResult<Product> {
        draft.validate()?;
        let body = self
            .rest
            .post("/products", &draft.clone().into_product())
            .await?;
        let created = Product::from_json(body)?;
        tracing::info!(product_id = ?created.id, "product created");
        Ok(created)
    }

    pub async fn update_product(&self, product: &Product) -> ClientResult<Product> {
        product.validate_update()?;
        let id = product.require_id()?;
        let body = self.rest.put(&format!("/products/{id}"), product).await?;
        let updated = Product::from_json(body)?;
        tracing::info!(product_id = %id, "product updated");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: ProductId) -> ClientResult<()> {
        self.rest.delete(&format!("/products/{id}")).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
