use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    LineItemView, NewLineItem, NewOrderRecord, OrderRecord, OrderUpdate, OrderWithItems,
};
use crate::domain::ports::OrderRepository;
use crate::domain::status::PersistedStatus;
use crate::schema::{menu_items, order_items, orders, users};

use super::models::{
    MenuItemRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderPaymentChangeset, OrderRow,
    OrderStatusChangeset, UserRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ───────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrderRecord, items: Vec<NewLineItem>) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    user_id: order.user_id,
                    total_amount: order.total_amount,
                    payment_method: order.payment_method,
                    status: order.status.as_str().to_string(),
                    original_status: order.original_status,
                    customer_name: order.customer_name,
                    customer_email: order.customer_email,
                    customer_phone: order.customer_phone,
                    special_instructions: order.special_instructions,
                    delivery_address: order.delivery_address,
                    pickup_address: order.pickup_address,
                    pickup_type: order.pickup_type,
                })
                .returning(orders::id)
                .get_result(conn)?;

            let item_rows: Vec<NewOrderItemRow> = items
                .into_iter()
                .map(|item| NewOrderItemRow {
                    order_id,
                    menu_item_id: item.menu_item_id,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&item_rows)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn get_by_id(&self, id: i32) -> Result<Option<OrderRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(OrderRecord::from))
    }

    fn get_by_user(&self, user_id: i32) -> Result<Vec<OrderRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load::<OrderRow>(&mut conn)?;

        Ok(rows.into_iter().map(OrderRecord::from).collect())
    }

    fn get_with_items(&self, id: i32) -> Result<Option<OrderWithItems>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        // Left join keeps line items whose menu record has since been removed.
        let rows: Vec<(OrderItemRow, Option<MenuItemRow>)> = order_items::table
            .left_join(menu_items::table)
            .filter(order_items::order_id.eq(order.id))
            .select((OrderItemRow::as_select(), Option::<MenuItemRow>::as_select()))
            .load(&mut conn)?;

        let items = rows
            .into_iter()
            .map(|(item, menu)| LineItemView {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                price: item.price,
                name: menu.as_ref().map(|m| m.name.clone()),
                description: menu.as_ref().and_then(|m| m.description.clone()),
                category: menu.as_ref().and_then(|m| m.category.clone()),
                image: menu.and_then(|m| m.image),
            })
            .collect();

        Ok(Some(OrderWithItems {
            order: OrderRecord::from(order),
            items,
        }))
    }

    fn update_status(&self, id: i32, update: OrderUpdate) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::update(orders::table.find(id))
            .set(&OrderStatusChangeset {
                status: update.status.as_str().to_string(),
                original_status: update.original_status,
                payment_method: update.payment_method,
                payment_reference: update.payment_reference,
                updated_at: Utc::now(),
            })
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_payment(
        &self,
        id: i32,
        payment_status: PersistedStatus,
        payment_reference: Option<String>,
    ) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::update(orders::table.find(id))
            .set(&OrderPaymentChangeset {
                status: payment_status.as_str().to_string(),
                payment_reference,
                updated_at: Utc::now(),
            })
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn user_contact(&self, user_id: i32) -> Result<Option<(String, String)>, DomainError> {
        let mut conn = self.pool.get()?;

        let user = users::table
            .find(user_id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(user.map(|u| (u.email, u.name)))
    }
}
