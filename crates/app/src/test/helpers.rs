//! Test Helpers

use crate::domain::{
    carts::models::NewCartLine,
    orders::models::{CustomerDetails, NewOrder, NewOrderLine},
};

pub(crate) fn new_line(user_id: &str, product_id: &str, quantity: i64) -> NewCartLine {
    NewCartLine {
        user_id: user_id.to_string(),
        product_id: product_id.to_string(),
        quantity,
        name: format!("Product {product_id}"),
        images: vec![format!("https://img.example.com/{product_id}.png")],
        price: 9.99,
    }
}

pub(crate) fn new_order(lines: &[(&str, i64, f64)]) -> NewOrder {
    NewOrder {
        customer: CustomerDetails::default(),
        items: lines
            .iter()
            .map(|&(product_id, quantity, price)| NewOrderLine {
                product_id: product_id.to_string(),
                name: format!("Product {product_id}"),
                quantity,
                price,
                images: Vec::new(),
            })
            .collect(),
        total: None,
    }
}
