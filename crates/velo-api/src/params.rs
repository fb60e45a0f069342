//! Query-parameter parsing for listing surfaces.

use velo_catalog::prelude::{PageParams, ProductFilters, SortOption};
use velo_catalog::ProductId;

/// How the grid renders; purely presentational, but round-tripped through
/// the URL so links preserve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

/// Parameters accepted by category browsing pages: `brand` (repeatable),
/// `minPrice`, `maxPrice`, `sort`, `view`, `page`, `lastId`, `pageSize`.
#[derive(Debug, Clone, Default)]
pub struct ListingParams {
    pub brands: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: SortOption,
    pub view: ViewMode,
    pub page: u32,
    pub last_id: Option<String>,
    pub page_size: Option<usize>,
}

impl ListingParams {
    /// Parse from decoded query pairs. Unknown keys and unparseable
    /// values fall back to defaults rather than failing the request.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = Self {
            page: 1,
            ..Self::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                "brand" => {
                    if !value.is_empty() {
                        params.brands.push(value.clone());
                    }
                }
                "minPrice" => params.min_price = value.parse().ok(),
                "maxPrice" => params.max_price = value.parse().ok(),
                "sort" => params.sort = SortOption::from_str(value).unwrap_or_default(),
                "view" => params.view = ViewMode::from_str(value).unwrap_or_default(),
                "page" => params.page = value.parse().map(|p: u32| p.max(1)).unwrap_or(1),
                "lastId" => {
                    if !value.is_empty() {
                        params.last_id = Some(value.clone());
                    }
                }
                "pageSize" => params.page_size = value.parse().ok(),
                _ => {}
            }
        }
        params
    }

    /// The filter set these parameters describe. The cursor travels in
    /// [`ListingParams::page_params`], not here.
    pub fn filters(&self) -> ProductFilters {
        let mut filters = ProductFilters::new()
            .with_brands(self.brands.clone())
            .with_price_range(self.min_price, self.max_price)
            .with_sort(self.sort);
        if let Some(page_size) = self.page_size {
            filters = filters.with_page_size(page_size);
        }
        filters
    }

    /// The pagination decision encoded in the URL: `lastId` present means
    /// cursor mode, absent means offset mode.
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page.max(1),
            last_id: self.last_id.as_deref().map(ProductId::new),
        }
    }
}

/// Parameters accepted by the admin product list.
#[derive(Debug, Clone, Default)]
pub struct AdminListParams {
    pub page_size: Option<usize>,
    pub start_after_id: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub brand: Option<String>,
}

impl AdminListParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "pageSize" => params.page_size = value.parse().ok(),
                "startAfterId" => params.start_after_id = Some(value.clone()),
                "search" => params.search = Some(value.clone()),
                "category" => params.category = Some(value.clone()),
                "subCategory" => params.sub_category = Some(value.clone()),
                "brand" => params.brand = Some(value.clone()),
                _ => {}
            }
        }
        params
    }

    pub fn filters(&self) -> ProductFilters {
        let mut filters = ProductFilters::new()
            .with_categories(self.category.iter().cloned().collect())
            .with_sub_categories(self.sub_category.iter().cloned().collect())
            .with_brands(self.brand.iter().cloned().collect());
        if let Some(page_size) = self.page_size {
            filters = filters.with_page_size(page_size);
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_listing_params_defaults() {
        let params = ListingParams::from_pairs(&[]);
        assert_eq!(params.page, 1);
        assert_eq!(params.sort, SortOption::Rating);
        assert_eq!(params.view, ViewMode::Grid);
        assert!(params.last_id.is_none());
    }

    #[test]
    fn test_listing_params_repeatable_brand() {
        let params = ListingParams::from_pairs(&pairs(&[
            ("brand", "Trek"),
            ("brand", "Giant"),
            ("minPrice", "500"),
            ("maxPrice", "2000"),
            ("sort", "price_low"),
            ("view", "list"),
            ("page", "3"),
        ]));
        assert_eq!(params.brands, vec!["Trek", "Giant"]);
        assert_eq!(params.min_price, Some(500.0));
        assert_eq!(params.max_price, Some(2000.0));
        assert_eq!(params.sort, SortOption::PriceLow);
        assert_eq!(params.view, ViewMode::List);
        assert_eq!(params.page, 3);
    }

    #[test]
    fn test_listing_params_bad_values_fall_back() {
        let params = ListingParams::from_pairs(&pairs(&[
            ("page", "zero"),
            ("sort", "newest"),
            ("minPrice", "cheap"),
        ]));
        assert_eq!(params.page, 1);
        assert_eq!(params.sort, SortOption::Rating);
        assert!(params.min_price.is_none());
    }

    #[test]
    fn test_last_id_presence_selects_cursor_mode() {
        let with_cursor = ListingParams::from_pairs(&pairs(&[("page", "3"), ("lastId", "p24")]));
        assert!(with_cursor.page_params().mode(12).is_cursor());

        let without = ListingParams::from_pairs(&pairs(&[("page", "3")]));
        assert!(!without.page_params().mode(12).is_cursor());
    }

    #[test]
    fn test_admin_params() {
        let params = AdminListParams::from_pairs(&pairs(&[
            ("pageSize", "20"),
            ("startAfterId", "p7"),
            ("category", "road"),
        ]));
        assert_eq!(params.page_size, Some(20));
        assert_eq!(params.start_after_id.as_deref(), Some("p7"));
        let filters = params.filters();
        assert_eq!(filters.categories, vec!["road"]);
        assert_eq!(filters.page_size, 20);
    }
}
