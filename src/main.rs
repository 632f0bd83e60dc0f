use dotenvy::dotenv;
use feastflow::{
    build_server, create_pool, resolve_capabilities, run_migrations, spawn_pool_healthcheck,
};
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "feastflow-dev-secret".to_string());
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let healthcheck_secs: u64 = env::var("DB_HEALTHCHECK_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);

    let pool = create_pool(&database_url);
    run_migrations(&pool);
    let caps = resolve_capabilities(&pool);

    spawn_pool_healthcheck(pool.clone(), healthcheck_secs);

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(pool, caps, &jwt_secret, &host, port)?.await
}
