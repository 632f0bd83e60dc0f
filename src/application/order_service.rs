use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::domain::capabilities::SchemaCapabilities;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewLineItem, NewOrderRecord, OrderDraft, OrderRecord, OrderUpdate, OrderWithItems,
    StatusChange, StatusFields,
};
use crate::domain::ports::{NotificationSink, OrderRepository};
use crate::domain::status::{map_ui_status, PersistedStatus};

const DEFAULT_CUSTOMER_NAME: &str = "Guest";
const DEFAULT_CUSTOMER_EMAIL: &str = "guest@example.com";
const DEFAULT_CUSTOMER_PHONE: &str = "Not provided";
const DEFAULT_PAYMENT_METHOD: &str = "cash";
const DEFAULT_PICKUP_TYPE: &str = "restaurant";
const DEFAULT_PICKUP_ADDRESS: &str = "Restaurant Pickup";
const INSTRUCTION_SEPARATOR: &str = " | ";

/// The order lifecycle: creation, status transitions, payment updates and
/// reads. Generic over the repository port so tests can run it against an
/// in-memory fake.
pub struct OrderService<R> {
    repo: R,
    caps: SchemaCapabilities,
    notifier: Arc<dyn NotificationSink>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R, caps: SchemaCapabilities, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            repo,
            caps,
            notifier,
        }
    }

    /// Validate and normalize a raw order draft, then persist the order and
    /// its line items in one transaction. Guest checkout (`user_id == None`)
    /// is a first-class path.
    pub fn create_order(
        &self,
        user_id: Option<i32>,
        draft: OrderDraft,
    ) -> Result<i32, DomainError> {
        if draft.items.is_empty() {
            return Err(DomainError::InvalidInput(
                "order must contain at least one item".to_string(),
            ));
        }

        let items = normalize_items(&draft)?;
        let total_amount = resolve_total(draft.total_amount.as_deref(), &items)?;

        let customer = draft.customer.unwrap_or_default();
        let customer_name =
            non_empty(customer.name).unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string());
        let customer_email =
            non_empty(customer.email).unwrap_or_else(|| DEFAULT_CUSTOMER_EMAIL.to_string());
        let customer_phone = self.caps.customer_phone.is_present().then(|| {
            non_empty(customer.phone).unwrap_or_else(|| DEFAULT_CUSTOMER_PHONE.to_string())
        });

        let special_instructions =
            join_instructions(customer.pickup_time.as_deref(), customer.notes.as_deref());

        let delivery_address = if self.caps.delivery_address.is_present() {
            non_empty(draft.delivery_address).or_else(|| non_empty(customer.address))
        } else {
            None
        };
        let (pickup_type, pickup_address) = if self.caps.pickup_address.is_present() {
            (
                Some(non_empty(draft.pickup_type).unwrap_or_else(|| DEFAULT_PICKUP_TYPE.into())),
                Some(
                    non_empty(draft.pickup_address)
                        .unwrap_or_else(|| DEFAULT_PICKUP_ADDRESS.into()),
                ),
            )
        } else {
            (None, None)
        };

        let raw_status = non_empty(draft.status);
        let status = raw_status
            .as_deref()
            .and_then(map_ui_status)
            .unwrap_or(PersistedStatus::Pending);
        let original_status = if self.caps.original_status.is_present() {
            raw_status
        } else {
            None
        };

        let record = NewOrderRecord {
            user_id,
            total_amount,
            payment_method: non_empty(draft.payment_method)
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            status,
            original_status,
            customer_name,
            customer_email,
            customer_phone,
            special_instructions,
            delivery_address,
            pickup_address,
            pickup_type,
        };

        self.repo.create(record, items)
    }

    /// Apply a UI-vocabulary status change. Unknown labels keep the current
    /// persisted status while still updating the other fields.
    pub fn update_status(
        &self,
        id: i32,
        change: StatusChange,
    ) -> Result<StatusFields, DomainError> {
        let order = self.repo.get_by_id(id)?.ok_or(DomainError::NotFound)?;
        let current =
            PersistedStatus::parse(&order.status).unwrap_or(PersistedStatus::Pending);
        let mapped = map_ui_status(&change.status).unwrap_or(current);

        let original_status = if self.caps.original_status.is_present() {
            Some(change.status.clone())
        } else {
            None
        };

        let affected = self.repo.update_status(
            id,
            OrderUpdate {
                status: mapped,
                original_status: original_status.clone(),
                payment_method: change.payment_method,
                payment_reference: change.payment_reference,
            },
        )?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }

        if change.notify {
            self.try_notify(&order, mapped);
        }

        Ok(StatusFields {
            id,
            status: mapped.as_str().to_string(),
            original_status,
        })
    }

    /// Set the payment status (mapped through the same vocabulary table) and
    /// the payment reference once payment is confirmed.
    pub fn update_payment(
        &self,
        id: i32,
        payment_status: &str,
        payment_reference: Option<String>,
    ) -> Result<StatusFields, DomainError> {
        let order = self.repo.get_by_id(id)?.ok_or(DomainError::NotFound)?;
        let current =
            PersistedStatus::parse(&order.status).unwrap_or(PersistedStatus::Pending);
        let mapped = map_ui_status(payment_status).unwrap_or(current);

        let affected = self.repo.update_payment(id, mapped, payment_reference)?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(StatusFields {
            id,
            status: mapped.as_str().to_string(),
            original_status: None,
        })
    }

    pub fn get_order(&self, id: i32) -> Result<OrderWithItems, DomainError> {
        self.repo.get_with_items(id)?.ok_or(DomainError::NotFound)
    }

    pub fn orders_for_user(&self, user_id: i32) -> Result<Vec<OrderRecord>, DomainError> {
        self.repo.get_by_user(user_id)
    }

    /// Fire-and-forget: a sink failure is logged, never propagated.
    fn try_notify(&self, order: &OrderRecord, status: PersistedStatus) {
        let Some(user_id) = order.user_id else {
            return;
        };
        match self.repo.user_contact(user_id) {
            Ok(Some((email, name))) => {
                if let Err(e) = self.notifier.notify(&email, &name, order.id, status.as_str()) {
                    log::warn!("order {} notification failed: {}", order.id, e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!(
                    "could not resolve notification contact for user {}: {}",
                    user_id,
                    e
                );
            }
        }
    }
}

// ── Normalization helpers ────────────────────────────────────────────────────

fn normalize_items(draft: &OrderDraft) -> Result<Vec<NewLineItem>, DomainError> {
    draft
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let menu_item_id = item.id.or(item.menu_item_id).ok_or_else(|| {
                DomainError::InvalidInput(format!("item {} is missing a menu item id", idx))
            })?;
            let quantity = match item.quantity {
                Some(q) if (1..=i32::MAX as i64).contains(&q) => q as i32,
                _ => 1,
            };
            let price = item
                .price
                .as_deref()
                .and_then(parse_decimal)
                .unwrap_or_else(|| BigDecimal::from(0));
            Ok(NewLineItem {
                menu_item_id,
                quantity,
                price,
            })
        })
        .collect()
}

/// A submitted positive total wins; otherwise the total is repaired as
/// Σ(price × quantity). A repaired total that is still ≤ 0 fails creation.
fn resolve_total(
    submitted: Option<&str>,
    items: &[NewLineItem],
) -> Result<BigDecimal, DomainError> {
    let zero = BigDecimal::from(0);
    let total = submitted
        .and_then(parse_decimal)
        .filter(|t| *t > zero)
        .unwrap_or_else(|| {
            items.iter().fold(BigDecimal::from(0), |acc, item| {
                acc + &item.price * BigDecimal::from(item.quantity)
            })
        });
    if total <= zero {
        return Err(DomainError::InvalidInput(
            "order total must be positive".to_string(),
        ));
    }
    Ok(total)
}

fn parse_decimal(s: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(s.trim()).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn join_instructions(pickup_time: Option<&str>, notes: Option<&str>) -> Option<String> {
    let fragments: Vec<&str> = [pickup_time, notes]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(INSTRUCTION_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::ItemDraft;

    fn item(id: Option<i32>, quantity: Option<i64>, price: Option<&str>) -> ItemDraft {
        ItemDraft {
            id,
            menu_item_id: None,
            quantity,
            price: price.map(str::to_string),
        }
    }

    #[test]
    fn item_id_resolves_from_either_field() {
        let draft = OrderDraft {
            items: vec![
                item(Some(3), Some(1), Some("5.00")),
                ItemDraft {
                    id: None,
                    menu_item_id: Some(9),
                    quantity: Some(2),
                    price: Some("1.50".to_string()),
                },
            ],
            ..Default::default()
        };
        let items = normalize_items(&draft).unwrap();
        assert_eq!(items[0].menu_item_id, 3);
        assert_eq!(items[1].menu_item_id, 9);
    }

    #[test]
    fn missing_item_id_is_a_validation_error() {
        let draft = OrderDraft {
            items: vec![item(None, Some(1), Some("5.00"))],
            ..Default::default()
        };
        assert!(matches!(
            normalize_items(&draft),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn invalid_quantity_defaults_to_one() {
        let draft = OrderDraft {
            items: vec![
                item(Some(1), None, Some("2.00")),
                item(Some(2), Some(0), Some("2.00")),
                item(Some(3), Some(-4), Some("2.00")),
            ],
            ..Default::default()
        };
        let items = normalize_items(&draft).unwrap();
        assert!(items.iter().all(|i| i.quantity == 1));
    }

    #[test]
    fn unparsable_price_defaults_to_zero() {
        let draft = OrderDraft {
            items: vec![item(Some(1), Some(1), Some("not-a-number"))],
            ..Default::default()
        };
        let items = normalize_items(&draft).unwrap();
        assert_eq!(items[0].price, BigDecimal::from(0));
    }

    #[test]
    fn submitted_positive_total_wins() {
        let items = vec![NewLineItem {
            menu_item_id: 1,
            quantity: 2,
            price: BigDecimal::from(10),
        }];
        assert_eq!(
            resolve_total(Some("42.50"), &items).unwrap(),
            parse_decimal("42.50").unwrap()
        );
    }

    #[test]
    fn unparsable_total_falls_back_to_item_sum() {
        let items = vec![NewLineItem {
            menu_item_id: 7,
            quantity: 2,
            price: BigDecimal::from(50),
        }];
        assert_eq!(
            resolve_total(Some("abc"), &items).unwrap(),
            BigDecimal::from(100)
        );
    }

    #[test]
    fn non_positive_total_falls_back_to_item_sum() {
        let items = vec![NewLineItem {
            menu_item_id: 7,
            quantity: 3,
            price: BigDecimal::from(5),
        }];
        assert_eq!(
            resolve_total(Some("0"), &items).unwrap(),
            BigDecimal::from(15)
        );
        assert_eq!(
            resolve_total(Some("-10"), &items).unwrap(),
            BigDecimal::from(15)
        );
    }

    #[test]
    fn zero_item_sum_with_bad_total_fails() {
        let items = vec![NewLineItem {
            menu_item_id: 7,
            quantity: 1,
            price: BigDecimal::from(0),
        }];
        assert!(matches!(
            resolve_total(Some("garbage"), &items),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn instructions_join_non_empty_fragments() {
        assert_eq!(
            join_instructions(Some("18:30"), Some("no onions")),
            Some("18:30 | no onions".to_string())
        );
        assert_eq!(
            join_instructions(Some("18:30"), None),
            Some("18:30".to_string())
        );
        assert_eq!(join_instructions(Some("  "), None), None);
        assert_eq!(join_instructions(None, None), None);
    }
}
