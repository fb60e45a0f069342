//! Product domain and listing engine for VeloCommerce.
//!
//! This crate owns the catalog's data model and the only genuinely
//! stateful part of the storefront: the product listing engine. It
//! provides:
//!
//! - **Domain**: the validated [`Product`] record with its pricing
//!   derivations, the [`CategoryStructure`] document, the cart.
//! - **Listing**: filter/sort composition, the hybrid cursor/offset
//!   pagination controller, and the listing state machine.
//! - **Repository**: resilient product queries over the document store,
//!   with schema validation, cursor degradation, and the count
//!   aggregation fallback.
//! - **Admin**: the two-phase product creation flow and image management.

pub mod admin;
pub mod cart;
pub mod category;
pub mod decode;
pub mod error;
pub mod ids;
pub mod listing;
pub mod product;
pub mod repo;

pub use error::CatalogError;
pub use ids::*;
pub use product::{FieldError, Product};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::admin::{PendingImage, ProductDraft};
    pub use crate::cart::{Cart, LineItem};
    pub use crate::category::CategoryStructure;
    pub use crate::decode::{decode_all, decode_document, Decoded};
    pub use crate::error::CatalogError;
    pub use crate::ids::*;
    pub use crate::listing::{
        decide, page_window, percent_decode, ListingState, PageMode, PageParams, PageWindow,
        ProductFilters, SortOption,
    };
    pub use crate::product::{FieldError, Product};
    pub use crate::repo::{ProductPage, ProductRepository};
}
