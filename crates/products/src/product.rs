use serde::{Deserialize, Serialize};

use vitrine_core::{DomainError, DomainResult, ProductId, Validator};

/// Version of the canonical product shape below.
///
/// Older payloads used `title` instead of `name`; it is accepted on input and
/// never written.
pub const SCHEMA_VERSION: u32 = 1;

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_CREATE_PRICE: f64 = 0.0;
pub const MIN_UPDATE_PRICE: f64 = 3.0;

/// Catalog product (canonical schema v1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(alias = "title")]
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
}

impl Product {
    /// Decode one product from an untrusted JSON value.
    pub fn from_json(value: serde_json::Value) -> DomainResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| DomainError::schema(format!("product (schema v{SCHEMA_VERSION}): {e}")))
    }

    /// Decode a product list; one bad entry fails the whole list.
    pub fn list_from_json(value: serde_json::Value) -> DomainResult<Vec<Self>> {
        serde_json::from_value(value)
            .map_err(|e| DomainError::schema(format!("product list (schema v{SCHEMA_VERSION}): {e}")))
    }

    /// Update-form rules. The product must already carry an id.
    pub fn validate_update(&self) -> DomainResult<()> {
        if self.id.is_none() {
            return Err(DomainError::validation("id is required for update"));
        }
        validate_fields(
            &self.name,
            self.image.as_deref().unwrap_or_default(),
            self.price,
            MIN_UPDATE_PRICE,
        )
    }

    /// Id, or a validation error when the product was never persisted.
    pub fn require_id(&self) -> DomainResult<ProductId> {
        self.id
            .ok_or_else(|| DomainError::validation("product has no id"))
    }
}

/// Values of the create form, before the server assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub in_stock: bool,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            image: image.into(),
            in_stock: false,
        }
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Create-form rules: name ≥ 3 chars, image required, price ≥ 0.
    pub fn validate(&self) -> DomainResult<()> {
        validate_fields(&self.name, &self.image, self.price, MIN_CREATE_PRICE)
    }

    pub fn into_product(self) -> Product {
        Product {
            id: None,
            name: self.name.trim().to_string(),
            price: self.price,
            image: Some(self.image.trim().to_string()),
            in_stock: self.in_stock,
        }
    }
}

fn validate_fields(name: &str, image: &str, price: f64, min_price: f64) -> DomainResult<()> {
    let mut v = Validator::new();
    v.required("name", name)
        .min_len("name", name.trim(), MIN_NAME_LEN)
        .required("image", image)
        .min_value("price", price, min_price);
    v.finish()
}
