//! Shopping cart.

use serde::{Deserialize, Serialize};

use crate::ids::{CartId, ProductId};
use crate::product::Product;

/// A line in the cart, keyed by product id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    /// The price charged per unit: the product's discounted price at the
    /// time it was added.
    pub unit_price: f64,
    pub quantity: u32,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: CartId,
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self {
            id: CartId::generate(),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product, merging with an existing line. The resulting
    /// quantity is clamped to the product's inventory; returns the
    /// quantity actually in the cart afterwards.
    pub fn add(&mut self, product: &Product, quantity: u32) -> u32 {
        let available = product.inventory.max(0) as u32;
        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => {
                item.quantity = (item.quantity + quantity).min(available);
                item.quantity
            }
            None => {
                let quantity = quantity.min(available);
                if quantity == 0 {
                    return 0;
                }
                self.items.push(LineItem {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    unit_price: product.discounted_price(),
                    quantity,
                });
                quantity
            }
        }
    }

    /// Set a line's quantity, clamped to inventory; zero removes the line.
    pub fn set_quantity(&mut self, product: &Product, quantity: u32) -> u32 {
        if quantity == 0 {
            self.remove(&product.id);
            return 0;
        }
        let available = product.inventory.max(0) as u32;
        let quantity = quantity.min(available);
        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => {
                item.quantity = quantity;
                quantity
            }
            None => self.add(product, quantity),
        }
    }

    /// Remove a line entirely. Returns whether it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() != before
    }

    /// Total number of units across all lines.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64, discount: Option<f64>, inventory: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Bike {id}"),
            category: "road".to_string(),
            sub_category: "race".to_string(),
            brand: None,
            actual_price: price,
            price: None,
            discount_percentage: discount,
            rating: 4.0,
            inventory,
            is_recommended: false,
            images: Vec::new(),
            image: String::new(),
            description: None,
            slug: None,
        }
    }

    #[test]
    fn test_add_uses_discounted_price() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 1000.0, Some(20.0), 5), 2);
        assert_eq!(cart.subtotal(), 1600.0);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_add_merges_lines_and_clamps_to_inventory() {
        let mut cart = Cart::new();
        let bike = product("p1", 500.0, None, 3);
        assert_eq!(cart.add(&bike, 2), 2);
        assert_eq!(cart.add(&bike, 2), 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_out_of_stock_adds_nothing() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&product("p1", 500.0, None, 0), 1), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        let bike = product("p1", 500.0, None, 10);
        cart.add(&bike, 1);
        assert_eq!(cart.set_quantity(&bike, 4), 4);
        assert_eq!(cart.set_quantity(&bike, 0), 0);
        assert!(cart.is_empty());
        assert!(!cart.remove(&bike.id));
    }

    #[test]
    fn test_subtotal_across_lines() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 1000.0, None, 5), 1);
        cart.add(&product("p2", 200.0, Some(50.0), 5), 2);
        assert_eq!(cart.subtotal(), 1200.0);
    }
}
