use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct MenuItem {
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

#[derive(Debug, Clone)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: Option<String>,
    pub image: Option<String>,
    pub available: bool,
}
