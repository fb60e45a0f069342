//! Admin product mutations.
//!
//! Image uploads need a stable product identifier for their storage path,
//! so creation is two-phase: persist the record with empty image fields to
//! obtain an id, upload the pending images under that id, then patch the
//! record with the resulting URLs. A failure after phase 1 triggers a
//! compensating delete of the half-created record before the original
//! error propagates.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use velo_data::cancel::CancelToken;
use velo_data::retry::retry;
use velo_store::{CollectionStore, ErrorCode, ObjectStorage, StoreError};

use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::product::{validate_common, FieldError, Product};
use crate::repo::{ProductRepository, PRODUCT_COLLECTION};

/// The submitted shape of a product: everything but the store-assigned id
/// and the image URLs, which only exist after upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub sub_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub actual_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_inventory")]
    pub inventory: i64,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

fn default_inventory() -> i64 {
    1
}

impl ProductDraft {
    /// Field-level validation, mirroring [`Product::validate`].
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_common(
            &mut errors,
            &self.name,
            &self.category,
            &self.sub_category,
            self.actual_price,
            self.price,
            self.discount_percentage,
            self.rating,
            self.inventory,
        );
        errors
    }

    /// The phase-1 document: the draft fields with empty image fields.
    fn to_fields(&self) -> Result<Map<String, Value>, CatalogError> {
        let mut fields = match serde_json::to_value(self).map_err(StoreError::from)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        fields.insert("images".to_string(), json!([]));
        fields.insert("image".to_string(), json!(""));
        Ok(fields)
    }

    /// The finished product once the store assigned an id and the images
    /// were uploaded.
    fn into_product(self, id: ProductId, images: Vec<String>, image: String) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            sub_category: self.sub_category,
            brand: self.brand,
            actual_price: self.actual_price,
            price: self.price,
            discount_percentage: self.discount_percentage,
            rating: self.rating,
            inventory: self.inventory,
            is_recommended: self.is_recommended,
            images,
            image,
            description: self.description,
            slug: self.slug,
        }
    }
}

/// An image awaiting upload during product creation.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PendingImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

impl Product {
    /// The stored field map, without the id (which the store owns).
    pub fn to_fields(&self) -> Result<Map<String, Value>, CatalogError> {
        let mut fields = match serde_json::to_value(self).map_err(StoreError::from)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        fields.remove("id");
        Ok(fields)
    }
}

impl<S: CollectionStore + ?Sized> ProductRepository<S> {
    /// Create a product with its images, two-phase.
    ///
    /// Position 0 of `images` becomes the designated thumbnail. A failure
    /// while uploading or patching deletes the phase-1 record and
    /// propagates the original error.
    pub async fn create_with_images(
        &self,
        draft: ProductDraft,
        images: &[PendingImage],
        storage: &dyn ObjectStorage,
        cancel: &CancelToken,
    ) -> Result<Product, CatalogError> {
        if let Some(error) = draft.validate().into_iter().next() {
            return Err(error.into());
        }

        // Phase 1: persist without images to obtain the identifier.
        let fields = draft.to_fields()?;
        let id = retry(self.retry_policy(), cancel, StoreError::is_transient, || {
            self.store().insert(PRODUCT_COLLECTION, fields.clone())
        })
        .await?;

        match self.attach_images(&id, fields, images, storage, cancel).await {
            Ok((urls, thumbnail)) => Ok(draft.into_product(ProductId::new(id), urls, thumbnail)),
            Err(e) => {
                tracing::warn!(%id, error = %e, "image phase failed, deleting phase-1 record");
                if let Err(delete_err) = self.store().delete(PRODUCT_COLLECTION, &id).await {
                    tracing::error!(%id, error = %delete_err, "compensating delete failed");
                }
                Err(e)
            }
        }
    }

    /// Phases 2 and 3: upload under the new id, then patch the record.
    async fn attach_images(
        &self,
        id: &str,
        mut fields: Map<String, Value>,
        images: &[PendingImage],
        storage: &dyn ObjectStorage,
        cancel: &CancelToken,
    ) -> Result<(Vec<String>, String), CatalogError> {
        if images.is_empty() {
            return Ok((Vec::new(), String::new()));
        }

        let mut urls = Vec::with_capacity(images.len());
        for image in images {
            let path = format!("products/{}/{}", id, image.file_name);
            urls.push(storage.upload(&path, image.bytes.clone()).await?);
        }
        let thumbnail = urls.first().cloned().unwrap_or_default();

        fields.insert("images".to_string(), json!(urls));
        fields.insert("image".to_string(), json!(thumbnail));
        retry(self.retry_policy(), cancel, StoreError::is_transient, || {
            self.store().update(PRODUCT_COLLECTION, id, fields.clone())
        })
        .await?;

        Ok((urls, thumbnail))
    }

    /// Replace a product's mutable fields.
    pub async fn update_product(
        &self,
        product: &Product,
        cancel: &CancelToken,
    ) -> Result<(), CatalogError> {
        if let Some(error) = product.validate().into_iter().next() {
            return Err(error.into());
        }
        let fields = product.to_fields()?;
        let result = retry(self.retry_policy(), cancel, StoreError::is_transient, || {
            self.store()
                .update(PRODUCT_COLLECTION, product.id.as_str(), fields.clone())
        })
        .await;
        match result {
            Ok(()) => Ok(()),
            Err(e) => match e.into_inner() {
                Some(source) if source.code() == Some(ErrorCode::NotFound) => {
                    Err(CatalogError::ProductNotFound(product.id.to_string()))
                }
                Some(source) => Err(CatalogError::Store(source)),
                None => Err(CatalogError::Cancelled),
            },
        }
    }

    /// Remove one image URL from a product.
    ///
    /// The record is updated first; the storage object is deleted out of
    /// band, and a deletion failure is logged rather than surfaced.
    pub async fn remove_image(
        &self,
        id: &ProductId,
        url: &str,
        storage: &dyn ObjectStorage,
        cancel: &CancelToken,
    ) -> Result<Product, CatalogError> {
        let mut product = self
            .fetch_by_id(id, cancel)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))?;

        product.images.retain(|existing| existing != url);
        if product.image == url {
            product.image = product.images.first().cloned().unwrap_or_default();
        }
        self.update_product(&product, cancel).await?;

        if let Err(e) = storage.delete(url).await {
            tracing::warn!(%id, %url, error = %e, "storage object deletion failed");
        }
        Ok(product)
    }
}
