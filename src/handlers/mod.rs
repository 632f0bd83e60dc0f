pub mod menu;
pub mod orders;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::create_order,
        orders::get_order,
        orders::my_orders,
        orders::update_status,
        orders::update_payment,
        menu::list_menu,
        menu::get_menu_item,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
    ),
    components(schemas(
        orders::CreateOrderRequest,
        orders::CustomerPayload,
        orders::OrderItemPayload,
        orders::CreateOrderResponse,
        orders::OrderResponse,
        orders::OrderItemResponse,
        orders::UpdateStatusRequest,
        orders::UpdatePaymentRequest,
        orders::StatusResponse,
        menu::MenuItemRequest,
        menu::MenuItemResponse,
    )),
    tags(
        (name = "orders", description = "Order lifecycle"),
        (name = "menu", description = "Menu management"),
    )
)]
pub struct ApiDoc;
