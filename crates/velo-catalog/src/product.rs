//! The product record and its derivations.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// Storage path prefix for brand logos.
const BRAND_LOGO_PREFIX: &str = "/storage/brand-logos";

/// Logo served when a product carries no brand.
pub const DEFAULT_BRAND_LOGO: &str = "/storage/brand-logos/default.png";

/// A validated product record.
///
/// Field names mirror the document store (camelCase); the `id` is the
/// store-assigned identity merged in at decode time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identity, stable for the product's lifetime.
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub sub_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Original (pre-discount) price.
    pub actual_price: f64,
    /// Optional override "final" price. Takes precedence over the
    /// percentage discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Percentage discount in `[0, 100]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    /// Customer rating in `[0, 5]`.
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_inventory")]
    pub inventory: i64,
    #[serde(default)]
    pub is_recommended: bool,
    /// Gallery images. Display order is not significant, but position 0 is
    /// the default thumbnail candidate.
    #[serde(default)]
    pub images: Vec<String>,
    /// The designated thumbnail, distinct from the gallery.
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stored slug; derived from the name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

fn default_inventory() -> i64 {
    1
}

impl Product {
    /// The price a customer pays: the override price when set, otherwise
    /// the discounted original, otherwise the original.
    pub fn discounted_price(&self) -> f64 {
        if let Some(price) = self.price {
            return price;
        }
        match self.discount_percentage {
            Some(discount) => self.actual_price * (1.0 - discount / 100.0),
            None => self.actual_price,
        }
    }

    /// The discount rounded down to a whole percent; `None` exactly when
    /// no discount is stored.
    pub fn rounded_discount_percentage(&self) -> Option<f64> {
        self.discount_percentage.map(f64::floor)
    }

    /// Whether any discount or override price applies.
    pub fn is_discounted(&self) -> bool {
        self.discounted_price() < self.actual_price
    }

    /// The brand logo URL, derived from the brand name by convention
    /// (lowercased, spaces to hyphens) under the logo storage path.
    pub fn brand_logo(&self) -> String {
        match &self.brand {
            Some(brand) if !brand.trim().is_empty() => {
                format!("{}/{}.png", BRAND_LOGO_PREFIX, slugify(brand))
            }
            _ => DEFAULT_BRAND_LOGO.to_string(),
        }
    }

    /// The URL slug: the stored one, or derived from the name.
    pub fn slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.is_empty() => slug.clone(),
            _ => slugify(&self.name),
        }
    }

    /// The thumbnail to show in listings: the designated image, falling
    /// back to the first gallery image.
    pub fn thumbnail(&self) -> Option<&str> {
        if !self.image.is_empty() {
            return Some(&self.image);
        }
        self.images.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.inventory > 0
    }

    /// Field-level validation. Returns the first violation per field, in
    /// declaration order; empty when the record is valid.
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
}

/// A single validation failure on a named field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn validate_common(
    errors: &mut Vec<FieldError>,
    name: &str,
    category: &str,
    sub_category: &str,
    actual_price: f64,
    price: Option<f64>,
    discount_percentage: Option<f64>,
    rating: f64,
    inventory: i64,
) {
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "is required"));
    }
    if category.trim().is_empty() {
        errors.push(FieldError::new("category", "is required"));
    }
    if sub_category.trim().is_empty() {
        errors.push(FieldError::new("subCategory", "is required"));
    }
    if !actual_price.is_finite() || actual_price < 0.0 {
        errors.push(FieldError::new("actualPrice", "must be at least 0"));
    }
    if let Some(price) = price {
        if !price.is_finite() || price < 0.0 {
            errors.push(FieldError::new("price", "must be at least 0"));
        } else if price > actual_price {
            errors.push(FieldError::new("price", "must not exceed actualPrice"));
        }
    }
    if let Some(discount) = discount_percentage {
        if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
            errors.push(FieldError::new(
                "discountPercentage",
                "must be between 0 and 100",
            ));
        }
    }
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        errors.push(FieldError::new("rating", "must be between 0 and 5"));
    }
    if inventory < 0 {
        errors.push(FieldError::new("inventory", "must be at least 0"));
    }
}

/// Lowercase and hyphenate for URLs and storage paths.
pub(crate) fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut previous_hyphen = true;
    for c in input.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            previous_hyphen = false;
        } else if !previous_hyphen {
            slug.push('-');
            previous_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
