//! od-store
//!
//! In-memory order store: identifier → [`Order`].
//!
//! # Contract
//!
//! - One record per identifier. The map is keyed by `Order::id`, so a second
//!   create with the same identifier overwrites the first (whole record, no
//!   field merge).
//! - The empty identifier is a legal key.
//! - Records are never removed.
//!
//! # Thread-safety
//! `OrderStore` is plain data and not internally synchronized. The daemon
//! wraps it in a single `RwLock`; every request is one critical section.

mod fixtures;

use std::collections::HashMap;
use std::fmt;

use od_schemas::Order;

pub use fixtures::fixture_orders;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `replace_existing` was called for an identifier the store does not hold.
    UnknownOrder { id: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UnknownOrder { id } => write!(f, "unknown order id={id:?}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// OrderStore
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct OrderStore {
    /// order_id → order
    orders: HashMap<String, Order>,
}

impl OrderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the five fixture orders.
    pub fn with_fixtures() -> Self {
        let mut store = Self::new();
        for o in fixture_orders() {
            store.upsert(o);
        }
        store
    }

    /// Snapshot of every record, sorted by identifier.
    ///
    /// Callers must not rely on the ordering; it only keeps responses stable.
    pub fn list(&self) -> Vec<Order> {
        let mut out: Vec<Order> = self.orders.values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.orders.contains_key(id)
    }

    /// Insert `order` under `order.id`, overwriting any existing record.
    ///
    /// Returns the record that was replaced, if any.
    pub fn upsert(&mut self, order: Order) -> Option<Order> {
        self.orders.insert(order.id.clone(), order)
    }

    /// Overwrite the record with the same identifier.
    ///
    /// Never creates a record: an unknown identifier leaves the store
    /// untouched and returns [`StoreError::UnknownOrder`].
    pub fn replace_existing(&mut self, order: Order) -> Result<Order, StoreError> {
        match self.orders.get_mut(&order.id) {
            Some(slot) => Ok(std::mem::replace(slot, order)),
            None => Err(StoreError::UnknownOrder { id: order.id }),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
