use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::auth::{MaybeIdentity, RequireIdentity};
use crate::domain::order::{CustomerDraft, ItemDraft, OrderDraft, OrderRecord, StatusChange};
use crate::errors::AppError;
use crate::AppOrderService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "pickupTime", alias = "pickup_time")]
    pub pickup_time: Option<String>,
}

/// One submitted cart line. The menu-item id is accepted under `id` or
/// `menu_item_id`; quantity and price tolerate both numeric and string JSON
/// values, with normalization downstream.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemPayload {
    pub id: Option<i32>,
    pub menu_item_id: Option<i32>,
    #[schema(value_type = Option<i64>)]
    pub quantity: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer: Option<CustomerPayload>,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    #[schema(value_type = Option<String>)]
    pub total_amount: Option<Value>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub pickup_type: Option<String>,
    pub pickup_address: Option<String>,
    pub delivery_address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub menu_item_id: i32,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total_amount: String,
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
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(rename = "paymentReference", alias = "payment_reference")]
    pub payment_reference: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notify: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    #[serde(rename = "paymentStatus", alias = "payment_status")]
    pub payment_status: String,
    #[serde(rename = "paymentReference", alias = "payment_reference")]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub id: i32,
    pub status: String,
    pub original_status: Option<String>,
}

// ── DTO → draft conversion ───────────────────────────────────────────────────

fn value_to_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn value_to_int(value: Option<Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<CreateOrderRequest> for OrderDraft {
    fn from(req: CreateOrderRequest) -> Self {
        OrderDraft {
            customer: req.customer.map(|c| CustomerDraft {
                name: c.name,
                email: c.email,
                phone: c.phone,
                address: c.address,
                notes: c.notes,
                pickup_time: c.pickup_time,
            }),
            items: req
                .items
                .into_iter()
                .map(|i| ItemDraft {
                    id: i.id,
                    menu_item_id: i.menu_item_id,
                    quantity: value_to_int(i.quantity),
                    price: value_to_string(i.price),
                })
                .collect(),
            total_amount: value_to_string(req.total_amount),
            payment_method: req.payment_method,
            status: req.status,
            pickup_type: req.pickup_type,
            pickup_address: req.pickup_address,
            delivery_address: req.delivery_address,
        }
    }
}

fn order_response(order: OrderRecord, items: Vec<OrderItemResponse>) -> OrderResponse {
    OrderResponse {
        id: order.id,
        user_id: order.user_id,
        total_amount: order.total_amount.to_string(),
        payment_method: order.payment_method,
        status: order.status,
        original_status: order.original_status,
        customer_name: order.customer_name,
        customer_email: order.customer_email,
        customer_phone: order.customer_phone,
        special_instructions: order.special_instructions,
        delivery_address: order.delivery_address,
        pickup_address: order.pickup_address,
        pickup_type: order.pickup_type,
        payment_reference: order.payment_reference,
        created_at: order.created_at.to_rfc3339(),
        items,
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order together with its line items in a single transaction.
/// Guest checkout is the default; a valid bearer token attaches the caller's
/// user id.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppOrderService>,
    identity: MaybeIdentity,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = identity.0.map(|i| i.user_id);
    let draft: OrderDraft = body.into_inner().into();

    let id = web::block(move || service.create_order(user_id, draft)).await??;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        id,
        message: "Order created".to_string(),
    }))
}

/// GET /orders/{id}
///
/// Returns the order with its line items enriched with menu metadata.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let result = web::block(move || service.get_order(order_id)).await??;

    let items = result
        .items
        .into_iter()
        .map(|i| OrderItemResponse {
            menu_item_id: i.menu_item_id,
            quantity: i.quantity,
            price: i.price.to_string(),
            name: i.name,
            description: i.description,
            category: i.category,
            image: i.image,
        })
        .collect();

    Ok(HttpResponse::Ok().json(order_response(result.order, items)))
}

/// GET /orders/me
///
/// The caller's orders, newest first. The displayed status resolves from
/// `original_status` when the mirror holds a finer-grained label.
#[utoipa::path(
    get,
    path = "/orders/me",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Authentication required"),
    ),
    tag = "orders"
)]
pub async fn my_orders(
    service: web::Data<AppOrderService>,
    identity: RequireIdentity,
) -> Result<HttpResponse, AppError> {
    let user_id = identity.0.user_id;

    let orders = web::block(move || service.orders_for_user(user_id)).await??;

    let body: Vec<OrderResponse> = orders
        .into_iter()
        .map(|mut order| {
            let display = order.display_status().to_string();
            order.status = display;
            order_response(order, vec![])
        })
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /orders/{id}/status
///
/// Transitions the order through the UI-to-persisted status mapping.
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_status(
    service: web::Data<AppOrderService>,
    path: web::Path<i32>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();

    let fields = web::block(move || {
        service.update_status(
            order_id,
            StatusChange {
                status: body.status,
                payment_method: body.payment_method,
                payment_reference: body.payment_reference,
                notify: body.notify,
            },
        )
    })
    .await??;

    Ok(HttpResponse::Ok().json(StatusResponse {
        id: fields.id,
        status: fields.status,
        original_status: fields.original_status,
    }))
}

/// PUT /orders/{id}/payment
///
/// Records the payment outcome and reference for an order.
#[utoipa::path(
    put,
    path = "/orders/{id}/payment",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_payment(
    service: web::Data<AppOrderService>,
    path: web::Path<i32>,
    body: web::Json<UpdatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();

    let fields = web::block(move || {
        service.update_payment(order_id, &body.payment_status, body.payment_reference)
    })
    .await??;

    Ok(HttpResponse::Ok().json(json!({
        "id": fields.id,
        "status": fields.status,
        "message": "Payment updated",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_amount_accepts_number_and_string() {
        let req: CreateOrderRequest =
            serde_json::from_value(json!({ "items": [], "total_amount": 42.5 })).unwrap();
        let draft: OrderDraft = req.into();
        assert_eq!(draft.total_amount.as_deref(), Some("42.5"));

        let req: CreateOrderRequest =
            serde_json::from_value(json!({ "items": [], "total_amount": "19.99" })).unwrap();
        let draft: OrderDraft = req.into();
        assert_eq!(draft.total_amount.as_deref(), Some("19.99"));
    }

    #[test]
    fn item_quantity_accepts_number_and_string() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "items": [
                { "id": 1, "quantity": 2, "price": "5.00" },
                { "menu_item_id": 2, "quantity": "3", "price": 4.25 },
            ]
        }))
        .unwrap();
        let draft: OrderDraft = req.into();
        assert_eq!(draft.items[0].quantity, Some(2));
        assert_eq!(draft.items[1].quantity, Some(3));
        assert_eq!(draft.items[1].price.as_deref(), Some("4.25"));
    }

    #[test]
    fn malformed_numeric_values_become_none() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "items": [{ "id": 1, "quantity": [], "price": {} }],
            "total_amount": true,
        }))
        .unwrap();
        let draft: OrderDraft = req.into();
        assert_eq!(draft.items[0].quantity, None);
        assert_eq!(draft.items[0].price, None);
        assert_eq!(draft.total_amount, None);
    }

    #[test]
    fn pickup_time_accepts_both_casings() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "items": [],
            "customer": { "pickupTime": "18:30" },
        }))
        .unwrap();
        let draft: OrderDraft = req.into();
        assert_eq!(
            draft.customer.unwrap().pickup_time.as_deref(),
            Some("18:30")
        );
    }
}
