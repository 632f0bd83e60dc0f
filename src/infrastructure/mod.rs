pub mod menu_repo;
pub mod models;
pub mod order_repo;
pub mod schema_probe;
