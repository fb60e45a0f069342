//! Filter and sort composition for product listings.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::{json, Value};
use velo_store::{Direction, Op, QueryBuilder};

use crate::ids::ProductId;

/// Default listing page size.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Sort options exposed on listing surfaces. Each maps to exactly one
/// store sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOption {
    /// Alphabetical by name.
    Name,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best rated first (the default).
    #[default]
    Rating,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Name => "name",
            SortOption::PriceLow => "price_low",
            SortOption::PriceHigh => "price_high",
            SortOption::Rating => "rating",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortOption::Name),
            "price_low" => Some(SortOption::PriceLow),
            "price_high" => Some(SortOption::PriceHigh),
            "rating" => Some(SortOption::Rating),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Name => "Name: A-Z",
            SortOption::PriceLow => "Price: Low to High",
            SortOption::PriceHigh => "Price: High to Low",
            SortOption::Rating => "Highest Rated",
        }
    }

    /// The store field and direction this option orders by. Prices order
    /// by the stored original price; the customer-facing discounted price
    /// is a derivation the store cannot sort on.
    pub fn sort_key(&self) -> (&'static str, Direction) {
        match self {
            SortOption::Name => ("name", Direction::Asc),
            SortOption::PriceLow => ("actualPrice", Direction::Asc),
            SortOption::PriceHigh => ("actualPrice", Direction::Desc),
            SortOption::Rating => ("rating", Direction::Desc),
        }
    }
}

/// Filter set for a product listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilters {
    /// Category names to match (empty means all).
    pub categories: Vec<String>,
    /// Subcategory names to match (empty means all).
    pub sub_categories: Vec<String>,
    /// Brand names to match (empty means all).
    pub brands: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: SortOption,
    pub page_size: usize,
    /// Resume after this product (cursor mode). Only valid under the exact
    /// filter and sort set it was produced with.
    pub cursor_id: Option<ProductId>,
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            sub_categories: Vec::new(),
            brands: Vec::new(),
            min_price: None,
            max_price: None,
            sort: SortOption::default(),
            page_size: DEFAULT_PAGE_SIZE,
            cursor_id: None,
        }
    }
}

impl ProductFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_sub_categories(mut self, sub_categories: Vec<String>) -> Self {
        self.sub_categories = sub_categories;
        self
    }

    pub fn with_brands(mut self, brands: Vec<String>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    pub fn with_cursor(mut self, cursor_id: Option<ProductId>) -> Self {
        self.cursor_id = cursor_id;
        self
    }

    /// Compose predicates, the sort key, and the page-size limit into a
    /// query builder. The cursor is not included; resolving it to a
    /// concrete row is the repository's job.
    pub fn query(&self) -> QueryBuilder {
        self.query_with_limit(self.page_size as i64)
    }

    /// Same as [`ProductFilters::query`] with an explicit row limit;
    /// non-positive means unlimited.
    pub fn query_with_limit(&self, limit: i64) -> QueryBuilder {
        let (field, direction) = self.sort.sort_key();
        QueryBuilder::new()
            .filter_any("category", string_values(&self.categories))
            .filter_any("subCategory", string_values(&self.sub_categories))
            .filter_any("brand", string_values(&self.brands))
            .filter("actualPrice", Op::Ge, number_or_null(self.min_price))
            .filter("actualPrice", Op::Le, number_or_null(self.max_price))
            .order_by(field, direction)
            .limit(limit)
    }

    /// A stable digest of the filter set and sort order, excluding
    /// pagination state. A cursor taken under one fingerprint must never
    /// be used under another.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.categories.hash(&mut hasher);
        self.sub_categories.hash(&mut hasher);
        self.brands.hash(&mut hasher);
        self.min_price.map(f64::to_bits).hash(&mut hasher);
        self.max_price.map(f64::to_bits).hash(&mut hasher);
        self.sort.hash(&mut hasher);
        hasher.finish()
    }
}

fn string_values(values: &[String]) -> Vec<Value> {
    values.iter().map(|v| json!(v)).collect()
}

fn number_or_null(value: Option<f64>) -> Value {
    value.map(|v| json!(v)).unwrap_or(Value::Null)
}
