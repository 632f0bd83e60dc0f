use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::menu::MenuItem;
use crate::domain::order::OrderRecord;
use crate::schema::{menu_items, order_items, orders, users};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
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

impl From<OrderRow> for OrderRecord {
    fn from(row: OrderRow) -> Self {
        OrderRecord {
            id: row.id,
            user_id: row.user_id,
            total_amount: row.total_amount,
            payment_method: row.payment_method,
            status: row.status,
            original_status: row.original_status,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            special_instructions: row.special_instructions,
            delivery_address: row.delivery_address,
            pickup_address: row.pickup_address,
            pickup_type: row.pickup_type,
            payment_reference: row.payment_reference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert row for `orders`. `None` fields are omitted from the generated
/// column list, which is how capability-gated optional columns stay out of
/// the statement entirely.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
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
}

/// Status-workflow write: `status` and `updated_at` always, the rest only
/// when provided.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderStatusChangeset {
    pub status: String,
    pub original_status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderPaymentChangeset {
    pub status: String,
    pub payment_reference: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItemRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: Option<String>,
    pub image: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            image: row.image,
            available: row.available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = menu_items)]
pub struct NewMenuItemRow {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: Option<String>,
    pub image: Option<String>,
    pub available: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = menu_items)]
pub struct MenuItemChangeset {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: Option<String>,
    pub image: Option<String>,
    pub available: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
