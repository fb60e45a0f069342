//! Object storage interface for product and brand imagery.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{ErrorCode, StoreError};

/// Object storage: accepts a file under a logical path and returns a public
/// URL; supports deleting a previously uploaded object by that URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes under a logical path and return the public URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, StoreError>;

    /// Delete a previously uploaded object by its public URL.
    async fn delete(&self, url: &str) -> Result<(), StoreError>;
}

/// In-memory [`ObjectStorage`] for local runs and tests.
pub struct MemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::with_base_url("memory://storage")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn path_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.base_url)
            .map(|rest| rest.trim_start_matches('/'))
    }
}

impl Default for MemoryObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let mut objects = self.objects.write().unwrap();
        objects.insert(path.to_string(), bytes);
        Ok(format!("{}/{}", self.base_url, path))
    }

    async fn delete(&self, url: &str) -> Result<(), StoreError> {
        let path = self.path_of(url).ok_or_else(|| {
            StoreError::backend(ErrorCode::InvalidArgument, format!("foreign url {url}"))
        })?;
        let mut objects = self.objects.write().unwrap();
        objects.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_returns_url_under_base() {
        let storage = MemoryObjectStorage::new();
        let url = storage
            .upload("products/p1/front.jpg", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "memory://storage/products/p1/front.jpg");
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_url() {
        let storage = MemoryObjectStorage::new();
        let url = storage.upload("brands/trek.png", vec![0]).await.unwrap();
        storage.delete(&url).await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_delete_foreign_url_rejected() {
        let storage = MemoryObjectStorage::new();
        let err = storage.delete("https://elsewhere/x.png").await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidArgument));
    }
}
