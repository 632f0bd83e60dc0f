use super::errors::DomainError;
use super::menu::{MenuItem, MenuItemDraft};
use super::order::{
    NewLineItem, NewOrderRecord, OrderRecord, OrderUpdate, OrderWithItems,
};
use super::status::PersistedStatus;

/// Sole gateway to the `orders` and `order_items` tables.
pub trait OrderRepository: Send + Sync + 'static {
    /// Insert the order and its line items in one transaction; returns the
    /// new order id. Rolls back on any failure.
    fn create(&self, order: NewOrderRecord, items: Vec<NewLineItem>) -> Result<i32, DomainError>;

    fn get_by_id(&self, id: i32) -> Result<Option<OrderRecord>, DomainError>;

    /// All orders for a user, newest first.
    fn get_by_user(&self, user_id: i32) -> Result<Vec<OrderRecord>, DomainError>;

    /// Order plus its line items enriched with menu metadata for display.
    fn get_with_items(&self, id: i32) -> Result<Option<OrderWithItems>, DomainError>;

    /// Returns the number of affected rows. Always touches `updated_at`.
    fn update_status(&self, id: i32, update: OrderUpdate) -> Result<usize, DomainError>;

    fn update_payment(
        &self,
        id: i32,
        payment_status: PersistedStatus,
        payment_reference: Option<String>,
    ) -> Result<usize, DomainError>;

    /// `(email, name)` for the given user, for notification resolution.
    fn user_contact(&self, user_id: i32) -> Result<Option<(String, String)>, DomainError>;
}

pub trait MenuRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<MenuItem>, DomainError>;
    fn get(&self, id: i32) -> Result<Option<MenuItem>, DomainError>;
    fn create(&self, draft: MenuItemDraft) -> Result<MenuItem, DomainError>;
    fn update(&self, id: i32, draft: MenuItemDraft) -> Result<Option<MenuItem>, DomainError>;
    fn delete(&self, id: i32) -> Result<usize, DomainError>;
}

/// Fire-and-forget order-status notification. Failures are logged by the
/// caller and never fail the status update.
pub trait NotificationSink: Send + Sync + 'static {
    fn notify(&self, email: &str, name: &str, order_id: i32, status: &str)
        -> Result<(), DomainError>;
}
