//! The category structure document.
//!
//! A single stored document maps category name to subcategory name to the
//! brands carried there. The flattened "all brands" and "brands by
//! category" views are pure derivations recomputed on every read; no
//! separate stored copy is authoritative.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use velo_store::CollectionStore;

use crate::error::CatalogError;

/// Collection holding the structure document.
pub const CATEGORY_COLLECTION: &str = "categories";

/// Fixed id of the structure document.
pub const STRUCTURE_DOC_ID: &str = "structure";

/// Brands carried within one subcategory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandList {
    pub brands: Vec<String>,
}

/// The category → subcategory → brands document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStructure {
    #[serde(flatten)]
    categories: BTreeMap<String, BTreeMap<String, BrandList>>,
}

impl CategoryStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Subcategory names within a category, sorted.
    pub fn subcategories(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|subs| subs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Add a brand under a category/subcategory, creating the levels as
    /// needed. Returns false when the brand is already listed there
    /// (brands are unique within a subcategory, case-insensitively).
    pub fn add_brand(
        &mut self,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        brand: impl Into<String>,
    ) -> bool {
        let brand = brand.into();
        let list = self
            .categories
            .entry(category.into())
            .or_default()
            .entry(subcategory.into())
            .or_default();
        if list
            .brands
            .iter()
            .any(|b| b.eq_ignore_ascii_case(&brand))
        {
            return false;
        }
        list.brands.push(brand);
        true
    }

    /// Remove a brand from a category/subcategory. Returns whether the
    /// brand was present.
    pub fn remove_brand(&mut self, category: &str, subcategory: &str, brand: &str) -> bool {
        let Some(list) = self
            .categories
            .get_mut(category)
            .and_then(|subs| subs.get_mut(subcategory))
        else {
            return false;
        };
        let before = list.brands.len();
        list.brands.retain(|b| !b.eq_ignore_ascii_case(brand));
        list.brands.len() != before
    }

    /// Every brand reachable from the structure, deduplicated across
    /// subcategories and sorted. Recomputed on each call.
    pub fn all_brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = self
            .categories
            .values()
            .flat_map(|subs| subs.values())
            .flat_map(|list| list.brands.iter().cloned())
            .collect();
        brands.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        brands.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        brands
    }

    /// Brands reachable within one category, deduplicated and sorted.
    /// Recomputed on each call.
    pub fn brands_for(&self, category: &str) -> Vec<String> {
        let mut brands: Vec<String> = self
            .categories
            .get(category)
            .map(|subs| {
                subs.values()
                    .flat_map(|list| list.brands.iter().cloned())
                    .collect()
            })
            .unwrap_or_default();
        brands.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        brands.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        brands
    }

    /// Load the structure document; an absent document is an empty
    /// structure.
    pub async fn load<S: CollectionStore + ?Sized>(store: &S) -> Result<Self, CatalogError> {
        let Some(doc) = store.get(CATEGORY_COLLECTION, STRUCTURE_DOC_ID).await? else {
            return Ok(Self::default());
        };
        // The structure is the whole field map; the document id must not be
        // merged in or it would read as a category.
        let structure = serde_json::from_value(Value::Object(doc.fields))
            .map_err(velo_store::StoreError::from)?;
        Ok(structure)
    }

    /// Persist the structure document, replacing the previous version.
    pub async fn save<S: CollectionStore + ?Sized>(&self, store: &S) -> Result<(), CatalogError> {
        let fields: Map<String, Value> = match serde_json::to_value(self)
            .map_err(velo_store::StoreError::from)?
        {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        store.set(CATEGORY_COLLECTION, STRUCTURE_DOC_ID, fields).await?;
        Ok(())
    }
}
