use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::status::PersistedStatus;

// ── Inbound drafts (normalized client input, pre-validation) ─────────────────

#[derive(Debug, Clone, Default)]
pub struct CustomerDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub pickup_time: Option<String>,
}

/// One submitted cart line. The menu-item id may arrive under either of two
/// field names; resolution happens in the creation workflow so a missing id
/// produces a proper validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub id: Option<i32>,
    pub menu_item_id: Option<i32>,
    pub quantity: Option<i64>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub customer: Option<CustomerDraft>,
    pub items: Vec<ItemDraft>,
    pub total_amount: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub pickup_type: Option<String>,
    pub pickup_address: Option<String>,
    pub delivery_address: Option<String>,
}

// ── Records handed to / read from the repository ─────────────────────────────

#[derive(Debug, Clone)]
pub struct NewOrderRecord {
    pub user_id: Option<i32>,
    pub total_amount: BigDecimal,
    pub payment_method: String,
    pub status: PersistedStatus,
    pub original_status: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub special_instructions: Option<String>,
    pub delivery_address: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_type: Option<String>,
}

/// Quantity and price are already normalized (quantity ≥ 1, price is the
/// snapshot taken at order time).
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total_amount: BigDecimal,
    pub payment_method: String,
    pub status: String,
    pub original_status: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub special_instructions: Option<String>,
    pub delivery_address: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_type: Option<String>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// The finer-grained UI label when the mirror column holds one, otherwise
    /// the persisted status.
    pub fn display_status(&self) -> &str {
        self.original_status.as_deref().unwrap_or(&self.status)
    }
}

/// A line item joined against the live menu record for display.
#[derive(Debug, Clone)]
pub struct LineItemView {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: OrderRecord,
    pub items: Vec<LineItemView>,
}

// ── Status workflow ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub notify: bool,
}

/// Fields written by one status-workflow update. `None` fields are left
/// untouched in the row.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub status: PersistedStatus,
    pub original_status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusFields {
    pub id: i32,
    pub status: String,
    pub original_status: Option<String>,
}
