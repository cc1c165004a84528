//! Whole-document persistence layer
//!
//! Products, orders and slider entries each live in a flat JSON array file
//! that is read at startup and rewritten in full on every mutation.

mod collection;
mod models;

pub use collection::{Collection, StoreError};
pub use models::{decrement_stock, Order, Product, SliderImage};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

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

    /// Concurrent submissions against the same product must not lose
    /// decrements: every mutation runs inside the collection's write lock.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decrements_are_not_lost() {
        let products = Arc::new(Collection::in_memory());
        products.append(product(1, 100)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..40 {
            let products = Arc::clone(&products);
            handles.push(tokio::spawn(async move {
                products
                    .update(|items| decrement_stock(items, &[1]))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(products.all().await[0].stock, 60);
    }

    #[tokio::test]
    async fn test_orders_append_only_newest_first() {
        let orders = Collection::in_memory();
        for id in [100, 300, 200] {
            orders
                .append(Order {
                    id,
                    customer_name: "c".to_string(),
                    phone: "0770".to_string(),
                    governorate: "g".to_string(),
                    area: "a".to_string(),
                    items: "i".to_string(),
                    total: 1.0,
                    date: "d".to_string(),
                })
                .await
                .unwrap();
        }

        assert_eq!(orders.len().await, 3);

        // Admin listing sorts by id descending (most recent first).
        let mut listed = orders.all().await;
        listed.sort_by(|a, b| b.id.cmp(&a.id));
        let ids: Vec<i64> = listed.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![300, 200, 100]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decrements_stop_at_zero() {
        let products = Arc::new(Collection::in_memory());
        products.append(product(1, 10)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let products = Arc::clone(&products);
            handles.push(tokio::spawn(async move {
                products
                    .update(|items| decrement_stock(items, &[1]))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(products.all().await[0].stock, 0);
    }
}
