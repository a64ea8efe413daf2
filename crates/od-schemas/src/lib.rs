//! Wire types shared by the store and the daemon.
//!
//! Every `Order` field is a free-text string. Missing fields decode to the
//! empty string and empty fields are left out of the encoded object, so a
//! client that sends `{"id":"7"}` gets exactly `{"id":"7"}` echoed back.

use serde::{Deserialize, Serialize};

/// A restaurant table's order.
///
/// No field is validated: `total_items` is a string (not a count) and
/// `payment` is whatever the client wrote ("Done", "pending", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Store key. The empty string is a legal key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub order_items: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub total_items: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payment: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub table_number: String,
}

impl Order {
    /// Order with only the identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_order_items(mut self, items: impl Into<String>) -> Self {
        self.order_items = items.into();
        self
    }

    pub fn with_total_items(mut self, total: impl Into<String>) -> Self {
        self.total_items = total.into();
        self
    }

    pub fn with_payment(mut self, payment: impl Into<String>) -> Self {
        self.payment = payment.into();
        self
    }

    pub fn with_table_number(mut self, table: impl Into<String>) -> Self {
        self.table_number = table.into();
        self
    }
}
