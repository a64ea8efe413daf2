//! Seed data loaded at daemon start when `store.seed_fixtures` is true.

use od_schemas::Order;

/// The five fixture orders, ids "1" through "5".
pub fn fixture_orders() -> Vec<Order> {
    vec![
        Order::new("1")
            .with_name("Rahul")
            .with_order_items("veg pulav, biryani")
            .with_total_items("2")
            .with_payment("Done")
            .with_table_number("11"),
        Order::new("2")
            .with_name("Mayur")
            .with_order_items("Pav Bhaji, manchurian")
            .with_total_items("2")
            .with_payment("Done")
            .with_table_number("123"),
        Order::new("3")
            .with_name("Nikhil")
            .with_order_items("veg pulav")
            .with_total_items("1")
            .with_payment("Done")
            .with_table_number("12"),
        Order::new("4")
            .with_name("Sanajana")
            .with_order_items("chicken khima,roti")
            .with_total_items("2")
            .with_payment("pending")
            .with_table_number("1234"),
        Order::new("5")
            .with_name("rohit")
            .with_order_items("pulav")
            .with_total_items("1")
            .with_payment("pending")
            .with_table_number("1"),
    ]
}
