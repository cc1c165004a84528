//! Catalog and order records
//!
//! Record identifiers are creation timestamps in milliseconds, matching the
//! format of the persisted JSON documents.

use serde::{Deserialize, Serialize};

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    pub stock: u32,
    /// URL path of the product image, e.g. `/uploads/169..._shoes.png`
    pub image: String,
}

/// A submitted order; immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub phone: String,
    pub governorate: String,
    pub area: String,
    /// Human-readable item description
    pub items: String,
    pub total: f64,
    /// Human-readable creation timestamp
    pub date: String,
}

/// One entry of the promotional image slider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderImage {
    pub image: String,
}

/// Decrement stock by one for each referenced product
///
/// Unknown ids and products already at zero stock are silently skipped, so
/// stock never goes below zero.
pub fn decrement_stock(products: &mut [Product], product_ids: &[i64]) {
    for id in product_ids {
        if let Some(product) = products.iter_mut().find(|p| p.id == *id) {
            if product.stock > 0 {
                product.stock -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, stock: u32) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            price: 1000.0,
            discount: 0.0,
            stock,
            image: String::new(),
        }
    }

    #[test]
    fn test_decrement_matching_products() {
        let mut products = vec![product(1, 5), product(2, 3)];
        decrement_stock(&mut products, &[1, 2]);
        assert_eq!(products[0].stock, 4);
        assert_eq!(products[1].stock, 2);
    }

    #[test]
    fn test_decrement_same_product_twice() {
        let mut products = vec![product(1, 5)];
        decrement_stock(&mut products, &[1, 1]);
        assert_eq!(products[0].stock, 3);
    }

    #[test]
    fn test_decrement_never_below_zero() {
        let mut products = vec![product(1, 1)];
        decrement_stock(&mut products, &[1, 1, 1]);
        assert_eq!(products[0].stock, 0);
    }

    #[test]
    fn test_decrement_ignores_unknown_ids() {
        let mut products = vec![product(1, 5)];
        decrement_stock(&mut products, &[42]);
        assert_eq!(products[0].stock, 5);
    }
}
