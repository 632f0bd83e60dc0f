use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::RequireAdmin;
use crate::domain::menu::{MenuItem, MenuItemDraft};
use crate::domain::ports::MenuRepository;
use crate::errors::AppError;
use crate::infrastructure::menu_repo::DieselMenuRepository;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub category: Option<String>,
    pub image: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub category: Option<String>,
    pub image: Option<String>,
    pub available: bool,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        MenuItemResponse {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price.to_string(),
            category: item.category,
            image: item.image,
            available: item.available,
        }
    }
}

fn parse_draft(req: MenuItemRequest) -> Result<MenuItemDraft, AppError> {
    let price = BigDecimal::from_str(req.price.trim())
        .map_err(|_| AppError::Validation(format!("invalid price '{}'", req.price)))?;
    Ok(MenuItemDraft {
        name: req.name,
        description: req.description,
        price,
        category: req.category,
        image: req.image,
        available: req.available,
    })
}

/// GET /menu
#[utoipa::path(
    get,
    path = "/menu",
    responses((status = 200, description = "All menu items", body = [MenuItemResponse])),
    tag = "menu"
)]
pub async fn list_menu(repo: web::Data<DieselMenuRepository>) -> Result<HttpResponse, AppError> {
    let items = web::block(move || repo.list()).await??;
    let body: Vec<MenuItemResponse> = items.into_iter().map(MenuItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /menu/{id}
#[utoipa::path(
    get,
    path = "/menu/{id}",
    params(("id" = i32, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemResponse),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "menu"
)]
pub async fn get_menu_item(
    repo: web::Data<DieselMenuRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let item = web::block(move || repo.get(id)).await??;
    match item {
        Some(item) => Ok(HttpResponse::Ok().json(MenuItemResponse::from(item))),
        None => Err(AppError::NotFound),
    }
}

/// POST /menu (admin)
#[utoipa::path(
    post,
    path = "/menu",
    request_body = MenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemResponse),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
    ),
    tag = "menu"
)]
pub async fn create_menu_item(
    repo: web::Data<DieselMenuRepository>,
    _admin: RequireAdmin,
    body: web::Json<MenuItemRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = parse_draft(body.into_inner())?;
    let item = web::block(move || repo.create(draft)).await??;
    Ok(HttpResponse::Created().json(MenuItemResponse::from(item)))
}

/// PUT /menu/{id} (admin)
#[utoipa::path(
    put,
    path = "/menu/{id}",
    params(("id" = i32, Path, description = "Menu item id")),
    request_body = MenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItemResponse),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "menu"
)]
pub async fn update_menu_item(
    repo: web::Data<DieselMenuRepository>,
    _admin: RequireAdmin,
    path: web::Path<i32>,
    body: web::Json<MenuItemRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let draft = parse_draft(body.into_inner())?;
    let item = web::block(move || repo.update(id, draft)).await??;
    match item {
        Some(item) => Ok(HttpResponse::Ok().json(MenuItemResponse::from(item))),
        None => Err(AppError::NotFound),
    }
}

/// DELETE /menu/{id} (admin)
#[utoipa::path(
    delete,
    path = "/menu/{id}",
    params(("id" = i32, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "menu"
)]
pub async fn delete_menu_item(
    repo: web::Data<DieselMenuRepository>,
    _admin: RequireAdmin,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let affected = web::block(move || repo.delete(id)).await??;
    if affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(json!({ "id": id, "message": "Menu item deleted" })))
}
