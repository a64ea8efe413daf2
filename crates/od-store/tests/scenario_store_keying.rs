//! Scenario: OrderStore keying rules
//!
//! # Invariants under test
//!
//! 1. `upsert` with a fresh id adds exactly one record; `get` returns it verbatim.
//! 2. `upsert` with an existing id overwrites the whole record (no field merge).
//! 3. `replace_existing` never creates a record.
//! 4. The empty id is a legal key.
//! 5. Fixture seeding yields ids "1".."5".

use od_schemas::Order;
use od_store::{fixture_orders, OrderStore, StoreError};

#[test]
fn fixtures_seed_five_orders() {
    let store = OrderStore::with_fixtures();
    assert_eq!(store.len(), 5);

    let ids: Vec<String> = store.list().into_iter().map(|o| o.id).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

    let rahul = store.get("1").expect("fixture 1 present");
    assert_eq!(rahul.name, "Rahul");
    assert_eq!(rahul.total_items, "2");
    assert_eq!(rahul.table_number, "11");
}

#[test]
fn fixture_ids_are_unique() {
    let mut ids: Vec<String> = fixture_orders().into_iter().map(|o| o.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn upsert_fresh_id_then_get_returns_same_fields() {
    let mut store = OrderStore::with_fixtures();
    let o = Order::new("6").with_name("Test").with_total_items("3");

    let prev = store.upsert(o.clone());
    assert!(prev.is_none());
    assert_eq!(store.len(), 6);
    assert_eq!(store.get("6"), Some(&o));
}

#[test]
fn upsert_existing_id_overwrites_without_merge() {
    let mut store = OrderStore::with_fixtures();
    let replacement = Order::new("1").with_name("Renamed");

    let prev = store.upsert(replacement.clone()).expect("had a record");
    assert_eq!(prev.name, "Rahul");
    assert_eq!(store.len(), 5);

    let now = store.get("1").unwrap();
    assert_eq!(now, &replacement);
    assert!(now.order_items.is_empty(), "old fields must not survive");
    assert!(now.payment.is_empty());
}

#[test]
fn replace_existing_unknown_id_leaves_store_unchanged() {
    let mut store = OrderStore::with_fixtures();
    let before = store.list();

    let err = store
        .replace_existing(Order::new("404").with_name("ghost"))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::UnknownOrder {
            id: "404".to_string()
        }
    );
    assert_eq!(store.len(), 5);
    assert!(!store.contains("404"));
    assert_eq!(store.list(), before);
}

#[test]
fn replace_existing_known_id_returns_previous() {
    let mut store = OrderStore::with_fixtures();

    let prev = store
        .replace_existing(Order::new("4").with_payment("Done"))
        .unwrap();
    assert_eq!(prev.payment, "pending");
    assert_eq!(store.get("4").unwrap().payment, "Done");
    assert!(store.get("4").unwrap().name.is_empty());
}

#[test]
fn empty_id_is_a_legal_key() {
    let mut store = OrderStore::new();
    assert!(store.is_empty());

    store.upsert(Order::default().with_name("anon"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("").unwrap().name, "anon");
}

#[test]
fn store_error_display_names_the_id() {
    let e = StoreError::UnknownOrder { id: "x".into() };
    assert_eq!(e.to_string(), "unknown order id=\"x\"");
}
