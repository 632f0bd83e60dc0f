pub mod application;
pub mod auth;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod notify;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use infrastructure::menu_repo::DieselMenuRepository;
use infrastructure::order_repo::DieselOrderRepository;
use notify::LogNotifier;

pub use db::{create_pool, spawn_pool_healthcheck, DbPool};
pub use domain::capabilities::SchemaCapabilities;

pub type AppOrderService = OrderService<DieselOrderRepository>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Probe the optional `orders` columns once. With no connection available the
/// capability set degrades to all-unknown (optional fields disabled).
pub fn resolve_capabilities(pool: &DbPool) -> SchemaCapabilities {
    match pool.get() {
        Ok(mut conn) => infrastructure::schema_probe::resolve_capabilities(&mut conn),
        Err(e) => {
            log::error!("could not probe schema capabilities: {}", e);
            SchemaCapabilities::unknown()
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    caps: SchemaCapabilities,
    jwt_secret: &str,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let order_service = web::Data::new(OrderService::new(
        DieselOrderRepository::new(pool.clone()),
        caps,
        Arc::new(LogNotifier),
    ));
    let menu_repo = web::Data::new(DieselMenuRepository::new(pool));
    let auth_config = web::Data::new(auth::AuthConfig::from_secret(jwt_secret));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(order_service.clone())
            .app_data(menu_repo.clone())
            .app_data(auth_config.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", handlers::ApiDoc::openapi()),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("/me", web::get().to(handlers::orders::my_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}/status", web::put().to(handlers::orders::update_status))
                    .route(
                        "/{id}/payment",
                        web::put().to(handlers::orders::update_payment),
                    ),
            )
            .service(
                web::scope("/menu")
                    .route("", web::get().to(handlers::menu::list_menu))
                    .route("", web::post().to(handlers::menu::create_menu_item))
                    .route("/{id}", web::get().to(handlers::menu::get_menu_item))
                    .route("/{id}", web::put().to(handlers::menu::update_menu_item))
                    .route("/{id}", web::delete().to(handlers::menu::delete_menu_item)),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
